use std::sync::{Arc, Once};

use super::LogConsole;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info", "warn",
/// "blot_engine=debug,wgpu=warn"). Records that pass the filter are also
/// appended to `console` when one is given.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
    pub console: Option<Arc<LogConsole>>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
            console: None,
        }
    }
}

/// Forwards to `env_logger` and tees into the log console.
struct BlotLogger {
    inner: env_logger::Logger,
    console: Option<Arc<LogConsole>>,
}

impl log::Log for BlotLogger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        self.inner.enabled(metadata)
    }

    fn log(&self, record: &log::Record<'_>) {
        if !self.inner.matches(record) {
            return;
        }
        self.inner.log(record);
        if let Some(console) = &self.console {
            console.add(record.level().into(), record.args().to_string());
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// This function is idempotent; subsequent calls are ignored.
/// Intended usage is early in `main`.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = config.env_filter {
            builder.parse_filters(&filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Info);
        }

        builder.write_style(config.write_style);

        let inner = builder.build();
        let max_level = inner.filter();
        let logger = BlotLogger { inner, console: config.console };

        if log::set_boxed_logger(Box::new(logger)).is_ok() {
            log::set_max_level(max_level);
            log::debug!("logging initialized");
        }
    });
}
