use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::paint::Color;
use crate::render::RendererType;

/// Persisted rendering preferences.
///
/// Missing fields fall back to their defaults, so older settings files keep
/// loading as fields are added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderingSettings {
    pub default_renderer: RendererType,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub background: Color,
}

impl Default for RenderingSettings {
    fn default() -> Self {
        Self {
            default_renderer: RendererType::default(),
            canvas_width: 1280,
            canvas_height: 720,
            background: Color::white(),
        }
    }
}

impl RenderingSettings {
    /// Parses and validates a settings document.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let settings: Self =
            serde_json::from_value(value.clone()).context("parsing rendering settings")?;
        anyhow::ensure!(
            settings.canvas_width > 0 && settings.canvas_height > 0,
            "canvas size must be non-zero, got {}x{}",
            settings.canvas_width,
            settings.canvas_height
        );
        anyhow::ensure!(settings.background.is_finite(), "background color is not finite");
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self).context("serializing rendering settings")
    }
}
