use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{RecordingRenderer, Renderer, SoftwareRenderer};

/// Renderer handle shared between the rendering manager and its consumers
/// (canvases, tools). The manager's table is canonical; extra handles only
/// extend lifetime.
pub type SharedRenderer = Rc<RefCell<dyn Renderer>>;

/// Available renderer backends.
///
/// Serialized lowercase; deserialized through [`FromStr`], so display names
/// and aliases are accepted too.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum RendererType {
    /// Anti-aliased CPU raster.
    #[default]
    Software,
    /// Display list rasterized at the end of each frame.
    Recording,
}

impl RendererType {
    pub const ALL: [RendererType; 2] = [RendererType::Software, RendererType::Recording];

    /// Human-readable name, as listed in renderer pickers.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            RendererType::Software => "Software",
            RendererType::Recording => "Recording",
        }
    }
}

impl fmt::Display for RendererType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown renderer name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRendererType(pub String);

impl fmt::Display for UnknownRendererType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown renderer type: {:?}", self.0)
    }
}

impl std::error::Error for UnknownRendererType {}

impl FromStr for RendererType {
    type Err = UnknownRendererType;

    /// Case-insensitive; accepts a few legacy aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "software" | "cpu" | "blend2d" => Ok(RendererType::Software),
            "recording" | "display-list" => Ok(RendererType::Recording),
            _ => Err(UnknownRendererType(s.to_string())),
        }
    }
}

impl TryFrom<String> for RendererType {
    type Error = UnknownRendererType;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Names of every supported backend, in `RendererType::ALL` order.
pub fn available_renderer_names() -> Vec<&'static str> {
    RendererType::ALL.iter().map(|k| k.name()).collect()
}

/// Creates an uninitialized renderer of the given type.
pub fn create_renderer(kind: RendererType) -> Box<dyn Renderer> {
    match kind {
        RendererType::Software => Box::new(SoftwareRenderer::new()),
        RendererType::Recording => Box::new(RecordingRenderer::new()),
    }
}

/// Like [`create_renderer`] but returns a shareable handle.
pub fn create_shared_renderer(kind: RendererType) -> SharedRenderer {
    match kind {
        RendererType::Software => Rc::new(RefCell::new(SoftwareRenderer::new())),
        RendererType::Recording => Rc::new(RefCell::new(RecordingRenderer::new())),
    }
}
