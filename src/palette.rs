//! Lookup tables mapping a z value onto a color.
use serde::{Deserialize, Serialize};

use crate::color::Color;

const ENTRIES: usize = 256;
const FIRST_RAMP_INDEX: i32 = 2;
const LAST_RAMP_INDEX: i32 = 255;

/// A 256-entry color table. Entries 0 and 1 are reserved (background and
/// foreground); values map onto the ramp in entries `2..=255`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorPalette {
    pub name: String,
    pub min_z: f64,
    pub max_z: f64,
    pub log_scale: bool,
    pub inverse: bool,
    pub stepped: bool,
    pub tick_values: Vec<f64>,
    r: Vec<u8>,
    g: Vec<u8>,
    b: Vec<u8>,
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::grey()
    }
}

impl ColorPalette {
    fn from_fn(name: &str, f: impl Fn(usize) -> (u8, u8, u8)) -> Self {
        let mut r = vec![0u8; ENTRIES];
        let mut g = vec![0u8; ENTRIES];
        let mut b = vec![0u8; ENTRIES];
        // Reserved entries: white background, black foreground.
        r[0] = 255;
        g[0] = 255;
        b[0] = 255;
        for i in 2..ENTRIES {
            (r[i], g[i], b[i]) = f(i);
        }
        Self {
            name: name.to_owned(),
            min_z: 0.0,
            max_z: 100.0,
            log_scale: false,
            inverse: false,
            stepped: false,
            tick_values: Vec::new(),
            r,
            g,
            b,
        }
    }

    /// A linear grey ramp from near-black to white.
    pub fn grey() -> Self {
        Self::from_fn("Grey", |i| (i as u8, i as u8, i as u8))
    }

    /// A hue ramp from blue through green and yellow to red.
    pub fn rainbow() -> Self {
        Self::from_fn("Rainbow", |i| {
            let t = (i - 2) as f32 / (ENTRIES - 3) as f32;
            let c = Color::from_hsb((1.0 - t) * (2.0 / 3.0), 1.0, 1.0);
            (
                (c.r * 255.0).round() as u8,
                (c.g * 255.0).round() as u8,
                (c.b * 255.0).round() as u8,
            )
        })
    }

    pub fn with_range(mut self, min_z: f64, max_z: f64) -> Self {
        self.min_z = min_z;
        self.max_z = max_z;
        self
    }

    pub fn with_log_scale(mut self, log_scale: bool) -> Self {
        self.log_scale = log_scale;
        self
    }

    pub fn with_inverse(mut self, inverse: bool) -> Self {
        self.inverse = inverse;
        self
    }

    /// Snap values down to the nearest tick before coloring.
    pub fn with_steps(mut self, mut tick_values: Vec<f64>) -> Self {
        tick_values.sort_by(f64::total_cmp);
        self.tick_values = tick_values;
        self.stepped = true;
        self
    }

    /// Table entry for `index`, clamped into range.
    pub fn entry(&self, index: usize) -> Color {
        let i = index.min(self.r.len().saturating_sub(1));
        match (self.r.get(i), self.g.get(i), self.b.get(i)) {
            (Some(&r), Some(&g), Some(&b)) => Color::from_rgb8(r, g, b),
            _ => Color::BLACK,
        }
    }

    /// The ramp index for `value`, always within `2..=255`.
    pub fn index_of(&self, value: f64) -> usize {
        let mut v = value;
        if self.stepped
            && let Some(&tick) = self.tick_values.iter().rev().find(|&&t| t <= v)
        {
            v = tick;
        }
        let (mut v, mut min, mut max) = (v, self.min_z, self.max_z);
        if self.log_scale {
            v = v.log10();
            min = min.log10();
            max = max.log10();
        }
        let span = max - min;
        let raw = if span.is_finite() && span > 0.0 && v.is_finite() {
            (253.0 * (v - min) / span) as i32 + FIRST_RAMP_INDEX
        } else {
            FIRST_RAMP_INDEX
        };
        let mut idx = raw.clamp(FIRST_RAMP_INDEX, LAST_RAMP_INDEX);
        if self.inverse {
            idx = LAST_RAMP_INDEX + FIRST_RAMP_INDEX - idx;
        }
        idx as usize
    }

    pub fn color(&self, value: f64) -> Color {
        self.entry(self.index_of(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_spans_ramp() {
        let p = ColorPalette::grey().with_range(0.0, 1.0);
        assert_eq!(p.index_of(0.0), 2);
        assert_eq!(p.index_of(1.0), 255);
        assert_eq!(p.index_of(-5.0), 2);
        assert_eq!(p.index_of(5.0), 255);
        assert_eq!(p.index_of(0.5), 128);
    }

    #[test]
    fn inverse_flips_ramp() {
        let p = ColorPalette::grey().with_range(0.0, 1.0).with_inverse(true);
        assert_eq!(p.index_of(0.0), 255);
        assert_eq!(p.index_of(1.0), 2);
    }

    #[test]
    fn stepped_snaps_down_to_tick() {
        let p = ColorPalette::grey()
            .with_range(0.0, 100.0)
            .with_steps(vec![50.0, 0.0]);
        assert_eq!(p.color(75.0), p.color(50.0));
        assert_eq!(p.color(10.0), p.color(0.0));
    }

    #[test]
    fn rainbow_runs_blue_to_red() {
        let p = ColorPalette::rainbow().with_range(0.0, 1.0);
        assert_eq!(p.color(0.0), Color::from_rgb8(0, 0, 255));
        assert_eq!(p.color(1.0), Color::from_rgb8(255, 0, 0));
    }
}
