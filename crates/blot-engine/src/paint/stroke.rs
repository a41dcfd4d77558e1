use serde::{Deserialize, Serialize};

/// Shape drawn at the open ends of a stroked line.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

/// Shape drawn where two stroked segments meet.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

/// Stroke geometry options beyond color and width.
///
/// `dash_array` alternates on/off lengths in user units. An empty array means a
/// solid stroke. An array the rasterizer cannot use (odd length, non-positive
/// total) also falls back to solid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub cap: LineCap,
    pub join: LineJoin,
    pub miter_limit: f32,
    pub dash_array: Vec<f32>,
    pub dash_offset: f32,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            cap: LineCap::Butt,
            join: LineJoin::Miter,
            miter_limit: 4.0,
            dash_array: Vec::new(),
            dash_offset: 0.0,
        }
    }
}

impl StrokeStyle {
    #[inline]
    pub fn with_cap(mut self, cap: LineCap) -> Self {
        self.cap = cap;
        self
    }

    #[inline]
    pub fn with_join(mut self, join: LineJoin) -> Self {
        self.join = join;
        self
    }

    #[inline]
    pub fn with_miter_limit(mut self, limit: f32) -> Self {
        self.miter_limit = limit;
        self
    }

    /// Sets the dash pattern and its phase.
    #[inline]
    pub fn with_dashes(mut self, dashes: Vec<f32>, offset: f32) -> Self {
        self.dash_array = dashes;
        self.dash_offset = offset;
        self
    }

    #[inline]
    pub fn is_dashed(&self) -> bool {
        !self.dash_array.is_empty()
    }

    /// Builds the tiny-skia stroke for `width`.
    pub(crate) fn to_skia(&self, width: f32) -> tiny_skia::Stroke {
        let dash = if self.is_dashed() {
            let dash = tiny_skia::StrokeDash::new(self.dash_array.clone(), self.dash_offset);
            if dash.is_none() {
                log::debug!("unusable dash pattern {:?}; stroking solid", self.dash_array);
            }
            dash
        } else {
            None
        };

        tiny_skia::Stroke {
            width,
            miter_limit: self.miter_limit.max(1.0),
            line_cap: match self.cap {
                LineCap::Butt => tiny_skia::LineCap::Butt,
                LineCap::Round => tiny_skia::LineCap::Round,
                LineCap::Square => tiny_skia::LineCap::Square,
            },
            line_join: match self.join {
                LineJoin::Miter => tiny_skia::LineJoin::Miter,
                LineJoin::Round => tiny_skia::LineJoin::Round,
                LineJoin::Bevel => tiny_skia::LineJoin::Bevel,
            },
            dash,
        }
    }
}
