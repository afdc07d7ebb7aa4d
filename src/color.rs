use serde::{Deserialize, Serialize};

/// A straight-alpha RGBA color with components in `0.0..=1.0`.
///
/// Paints in chart definitions are always plain colors so that they serialize
/// cleanly; convert into [`iced::Color`] at the rendering boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    #[serde(default = "opaque")]
    pub a: f32,
}

fn opaque() -> f32 {
    1.0
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
    pub const YELLOW: Color = Color::rgb(1.0, 1.0, 0.0);
    pub const MAGENTA: Color = Color::rgb(1.0, 0.0, 1.0);
    pub const CYAN: Color = Color::rgb(0.0, 1.0, 1.0);
    pub const ORANGE: Color = Color::rgb(1.0, 200.0 / 255.0, 0.0);
    pub const PINK: Color = Color::rgb(1.0, 175.0 / 255.0, 175.0 / 255.0);
    pub const GRAY: Color = Color::rgb(0.5, 0.5, 0.5);
    pub const LIGHT_GRAY: Color = Color::rgb(192.0 / 255.0, 192.0 / 255.0, 192.0 / 255.0);
    pub const DARK_GRAY: Color = Color::rgb(64.0 / 255.0, 64.0 / 255.0, 64.0 / 255.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Multiply the current alpha by `factor`.
    pub fn scale_alpha(self, factor: f32) -> Self {
        self.with_alpha(self.a * factor)
    }

    /// Build a color from hue/saturation/brightness, each in `0.0..=1.0`.
    pub fn from_hsb(hue: f32, saturation: f32, brightness: f32) -> Self {
        if saturation <= 0.0 {
            return Self::rgb(brightness, brightness, brightness);
        }
        let h = (hue - hue.floor()) * 6.0;
        let f = h - h.floor();
        let p = brightness * (1.0 - saturation);
        let q = brightness * (1.0 - saturation * f);
        let t = brightness * (1.0 - saturation * (1.0 - f));
        let (r, g, b) = match h as u32 {
            0 => (brightness, t, p),
            1 => (q, brightness, p),
            2 => (p, brightness, t),
            3 => (p, q, brightness),
            4 => (t, p, brightness),
            _ => (brightness, p, q),
        };
        Self::rgb(r, g, b)
    }

    pub fn darker(self) -> Self {
        const FACTOR: f32 = 0.7;
        Self::rgba(self.r * FACTOR, self.g * FACTOR, self.b * FACTOR, self.a)
    }

    pub fn brighter(self) -> Self {
        const FACTOR: f32 = 0.7;
        let lift = |c: f32| (c.max(0.1) / FACTOR).min(1.0);
        Self::rgba(lift(self.r), lift(self.g), lift(self.b), self.a)
    }
}

impl From<Color> for iced::Color {
    fn from(c: Color) -> Self {
        iced::Color::from_rgba(c.r, c.g, c.b, c.a)
    }
}

impl From<iced::Color> for Color {
    fn from(c: iced::Color) -> Self {
        Self::rgba(c.r, c.g, c.b, c.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hsb_primary_hues() {
        assert_eq!(Color::from_hsb(0.0, 1.0, 1.0), Color::RED);
        assert_eq!(Color::from_hsb(0.5, 1.0, 1.0), Color::CYAN);
        assert_eq!(Color::from_hsb(0.3, 0.0, 0.5), Color::rgb(0.5, 0.5, 0.5));
    }

    #[test]
    fn missing_alpha_deserializes_opaque() {
        let c: Color = serde_json::from_str(r#"{"r":0.5,"g":0.25,"b":1.0}"#).unwrap();
        assert_eq!(c.a, 1.0);
    }
}
