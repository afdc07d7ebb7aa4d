use serde::{Deserialize, Serialize};

/// Line styling: a width plus an optional dash pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub width: f32,
    /// Alternating on/off lengths; empty means a solid line.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dash: Vec<f32>,
}

impl Default for Stroke {
    fn default() -> Self {
        Self::solid(1.0)
    }
}

impl Stroke {
    pub fn solid(width: f32) -> Self {
        Self {
            width,
            dash: Vec::new(),
        }
    }

    pub fn dashed(width: f32, dash: impl Into<Vec<f32>>) -> Self {
        Self {
            width,
            dash: dash.into(),
        }
    }

    pub fn is_dashed(&self) -> bool {
        !self.dash.is_empty()
    }
}

/// A font request. Rendering surfaces map the family name onto whatever fonts
/// they have available.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Font {
    pub family: String,
    pub size: f32,
    pub bold: bool,
}

impl Default for Font {
    fn default() -> Self {
        Self::new(10.0)
    }
}

impl Font {
    pub fn new(size: f32) -> Self {
        Self {
            family: "SansSerif".to_owned(),
            size,
            bold: false,
        }
    }

    pub fn bold(size: f32) -> Self {
        Self {
            bold: true,
            ..Self::new(size)
        }
    }
}

/// Which point of a text block is placed at the requested location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAnchor {
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    #[default]
    Center,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl TextAnchor {
    /// Horizontal position of the anchor as a fraction of the text width.
    pub(crate) fn x_fraction(self) -> f64 {
        match self {
            Self::TopLeft | Self::CenterLeft | Self::BottomLeft => 0.0,
            Self::TopCenter | Self::Center | Self::BottomCenter => 0.5,
            Self::TopRight | Self::CenterRight | Self::BottomRight => 1.0,
        }
    }

    /// Vertical position of the anchor as a fraction of the text height.
    pub(crate) fn y_fraction(self) -> f64 {
        match self {
            Self::TopLeft | Self::TopCenter | Self::TopRight => 0.0,
            Self::CenterLeft | Self::Center | Self::CenterRight => 0.5,
            Self::BottomLeft | Self::BottomCenter | Self::BottomRight => 1.0,
        }
    }
}
