use std::collections::VecDeque;
use std::fmt;

use parking_lot::Mutex;

use crate::paint::Color;

/// Entries kept before the oldest are dropped.
pub const CONSOLE_CAPACITY: usize = 1000;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    #[inline]
    pub const fn label(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    /// Text color the console draws entries of this level in.
    pub fn color(self) -> Color {
        match self {
            LogLevel::Debug => Color::gray(0.5),
            LogLevel::Info => Color::white(),
            LogLevel::Warning => Color::rgba(1.0, 1.0, 0.0, 1.0),
            LogLevel::Error => Color::rgba(1.0, 0.0, 0.0, 1.0),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<log::Level> for LogLevel {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => LogLevel::Error,
            log::Level::Warn => LogLevel::Warning,
            log::Level::Info => LogLevel::Info,
            log::Level::Debug | log::Level::Trace => LogLevel::Debug,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    /// Local wall-clock time, `HH:MM:SS.mmm`.
    pub timestamp: String,
}

impl LogEntry {
    /// `[timestamp] [LEVEL] ` prefix shown before the message.
    pub fn header(&self) -> String {
        format!("[{}] [{}] ", self.timestamp, self.level)
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.header(), self.message)
    }
}

/// Which levels a console view shows.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LevelVisibility {
    pub debug: bool,
    pub info: bool,
    pub warning: bool,
    pub error: bool,
}

impl Default for LevelVisibility {
    fn default() -> Self {
        Self { debug: true, info: true, warning: true, error: true }
    }
}

impl LevelVisibility {
    #[inline]
    pub fn shows(&self, level: LogLevel) -> bool {
        match level {
            LogLevel::Debug => self.debug,
            LogLevel::Info => self.info,
            LogLevel::Warning => self.warning,
            LogLevel::Error => self.error,
        }
    }
}

#[derive(Debug)]
struct ConsoleState {
    entries: VecDeque<LogEntry>,
    scroll_to_bottom: bool,
}

impl ConsoleState {
    fn push(&mut self, level: LogLevel, message: String) {
        if self.entries.len() == CONSOLE_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(LogEntry { level, message, timestamp: timestamp() });
        self.scroll_to_bottom = true;
    }
}

/// In-memory log backing the editor's log window.
///
/// Safe to share across threads (`Arc<LogConsole>`); every operation takes one
/// short lock.
#[derive(Debug)]
pub struct LogConsole {
    state: Mutex<ConsoleState>,
}

impl Default for LogConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl LogConsole {
    pub fn new() -> Self {
        let mut state = ConsoleState { entries: VecDeque::new(), scroll_to_bottom: true };
        state.push(LogLevel::Info, "Log initialized.".to_string());
        Self { state: Mutex::new(state) }
    }

    pub fn add(&self, level: LogLevel, message: impl Into<String>) {
        self.state.lock().push(level, message.into());
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.add(LogLevel::Debug, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.add(LogLevel::Info, message);
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.add(LogLevel::Warning, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.add(LogLevel::Error, message);
    }

    /// Drops every entry, leaving a single "Log cleared." note.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.entries.clear();
        state.push(LogLevel::Info, "Log cleared.".to_string());
    }

    /// Snapshot of all entries, oldest first.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.state.lock().entries.iter().cloned().collect()
    }

    /// Snapshot of the entries `visibility` shows, oldest first.
    pub fn filtered(&self, visibility: &LevelVisibility) -> Vec<LogEntry> {
        self.state
            .lock()
            .entries
            .iter()
            .filter(|e| visibility.shows(e.level))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }

    /// Whether entries arrived since the last call; resets the flag.
    pub fn take_scroll_to_bottom(&self) -> bool {
        std::mem::take(&mut self.state.lock().scroll_to_bottom)
    }
}

fn timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S%.3f").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn starts_with_init_entry() {
        let c = LogConsole::new();
        let entries = c.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, "Log initialized.");
        assert_eq!(entries[0].level, LogLevel::Info);
    }

    #[test]
    fn timestamp_has_millisecond_format() {
        let c = LogConsole::new();
        let ts = &c.entries()[0].timestamp;
        assert_eq!(ts.len(), 12);
        assert_eq!(&ts[2..3], ":");
        assert_eq!(&ts[8..9], ".");
    }

    #[test]
    fn oldest_entries_are_dropped_at_capacity() {
        let c = LogConsole::new();
        for i in 0..CONSOLE_CAPACITY {
            c.info(format!("line {i}"));
        }
        let entries = c.entries();
        assert_eq!(entries.len(), CONSOLE_CAPACITY);
        assert_eq!(entries[0].message, "line 0");
        assert_eq!(entries[CONSOLE_CAPACITY - 1].message, format!("line {}", CONSOLE_CAPACITY - 1));
    }

    #[test]
    fn clear_leaves_single_note() {
        let c = LogConsole::new();
        c.error("boom");
        c.clear();
        let entries = c.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, "Log cleared.");
    }

    #[test]
    fn filtered_respects_visibility() {
        let c = LogConsole::new();
        c.debug("d");
        c.warn("w");
        c.error("e");
        let vis = LevelVisibility { debug: false, info: false, ..LevelVisibility::default() };
        let messages: Vec<_> = c.filtered(&vis).into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["w", "e"]);
    }

    #[test]
    fn scroll_flag_is_taken_once() {
        let c = LogConsole::new();
        assert!(c.take_scroll_to_bottom());
        assert!(!c.take_scroll_to_bottom());
        c.info("more");
        assert!(c.take_scroll_to_bottom());
    }

    #[test]
    fn header_formats_level_label() {
        let e = LogEntry {
            level: LogLevel::Warning,
            message: "careful".into(),
            timestamp: "12:00:00.000".into(),
        };
        assert_eq!(e.header(), "[12:00:00.000] [WARN] ");
        assert_eq!(e.to_string(), "[12:00:00.000] [WARN] careful");
    }

    #[test]
    fn log_levels_fold_trace_into_debug() {
        assert_eq!(LogLevel::from(log::Level::Trace), LogLevel::Debug);
        assert_eq!(LogLevel::from(log::Level::Warn), LogLevel::Warning);
    }

    #[test]
    fn concurrent_writers_are_all_recorded() {
        let c = Arc::new(LogConsole::new());
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let c = Arc::clone(&c);
                std::thread::spawn(move || {
                    for i in 0..50 {
                        c.info(format!("{t}-{i}"));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(c.len(), 1 + 4 * 50);
    }
}
