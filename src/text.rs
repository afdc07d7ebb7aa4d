use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::geometry::{Insets, Rect, RectangleAnchor};
use crate::graphics::{Graphics, TextItem};
use crate::style::{Font, Stroke, TextAnchor};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
    pub line_count: usize,
}

pub trait TextMeasurer {
    fn measure(&self, text: &str, font: &Font) -> TextMetrics;
}

/// Measures text from character counts alone, so layout is reproducible
/// without a font database.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeterministicTextMeasurer {
    pub char_width_factor: f64,
    pub line_height_factor: f64,
}

impl Default for DeterministicTextMeasurer {
    fn default() -> Self {
        Self {
            char_width_factor: 0.6,
            line_height_factor: 1.2,
        }
    }
}

impl TextMeasurer for DeterministicTextMeasurer {
    fn measure(&self, text: &str, font: &Font) -> TextMetrics {
        let font_size = (font.size as f64).max(1.0);
        let mut line_count = 0usize;
        let mut max_chars = 0usize;
        for line in text.split('\n') {
            line_count += 1;
            max_chars = max_chars.max(line.chars().count());
        }
        let bold = if font.bold { 1.1 } else { 1.0 };
        TextMetrics {
            width: max_chars as f64 * font_size * self.char_width_factor * bold,
            height: line_count as f64 * font_size * self.line_height_factor,
            line_count,
        }
    }
}

/// A block of (possibly wrapped) text with padding, an optional background and
/// an optional outline.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBox {
    pub lines: Vec<String>,
    pub font: Font,
    pub paint: Color,
    pub background: Option<Color>,
    pub outline: Option<(Color, Stroke)>,
    pub padding: Insets,
}

impl TextBox {
    pub fn new(text: &str, font: &Font, paint: Color) -> Self {
        Self {
            lines: text.split('\n').map(str::to_owned).collect(),
            font: font.clone(),
            paint,
            background: None,
            outline: None,
            padding: Insets::uniform(2.0),
        }
    }

    /// Break `text` into lines no wider than `max_width` where word boundaries allow.
    pub fn wrapped(
        text: &str,
        font: &Font,
        paint: Color,
        max_width: f64,
        g: &dyn Graphics,
    ) -> Self {
        let mut lines = Vec::new();
        for paragraph in text.split('\n') {
            let mut current = String::new();
            for word in paragraph.split_whitespace() {
                let candidate = if current.is_empty() {
                    word.to_owned()
                } else {
                    format!("{current} {word}")
                };
                if !current.is_empty() && g.measure_text(&candidate, font).width > max_width {
                    lines.push(std::mem::replace(&mut current, word.to_owned()));
                } else {
                    current = candidate;
                }
            }
            lines.push(current);
        }
        Self {
            lines,
            ..Self::new("", font, paint)
        }
    }

    pub fn with_background(mut self, background: Option<Color>) -> Self {
        self.background = background;
        self
    }

    pub fn with_outline(mut self, outline: Option<(Color, Stroke)>) -> Self {
        self.outline = outline;
        self
    }

    pub fn with_padding(mut self, padding: Insets) -> Self {
        self.padding = padding;
        self
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    fn line_height(&self, g: &dyn Graphics) -> f64 {
        g.measure_text("", &self.font).height
    }

    fn content_size(&self, g: &dyn Graphics) -> (f64, f64) {
        let width = self
            .lines
            .iter()
            .map(|l| g.measure_text(l, &self.font).width)
            .fold(0.0, f64::max);
        (width, self.line_height(g) * self.lines.len() as f64)
    }

    pub fn size(&self, g: &dyn Graphics) -> (f64, f64) {
        let (w, h) = self.content_size(g);
        (self.padding.extend_width(w), self.padding.extend_height(h))
    }

    pub fn width(&self, g: &dyn Graphics) -> f64 {
        self.size(g).0
    }

    pub fn height(&self, g: &dyn Graphics) -> f64 {
        self.size(g).1
    }

    /// Draw the box so that its `anchor` point lands on `(x, y)`. Returns the box bounds.
    pub fn draw(&self, g: &mut dyn Graphics, x: f64, y: f64, anchor: RectangleAnchor) -> Rect {
        let (w, h) = self.size(g);
        let bounds = anchor.place(DVec2::new(x, y), w, h);
        if let Some(bg) = self.background {
            g.fill_rect(bounds, bg);
        }
        if let Some((paint, stroke)) = &self.outline {
            g.stroke_rect(bounds, *paint, stroke);
        }
        let inner = self.padding.trim(bounds);
        let line_height = self.line_height(g);
        for (i, line) in self.lines.iter().enumerate() {
            let pos = DVec2::new(inner.x, inner.y + i as f64 * line_height);
            g.draw_text(
                &TextItem::new(line.as_str(), pos, &self.font, self.paint)
                    .with_anchor(TextAnchor::TopLeft),
            );
        }
        bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::RecordingCanvas;

    #[test]
    fn measure_counts_widest_line() {
        let m = DeterministicTextMeasurer::default();
        let metrics = m.measure("ab\nabcd", &Font::new(10.0));
        assert!((metrics.width - 24.0).abs() < 1e-9);
        assert!((metrics.height - 24.0).abs() < 1e-9);
        assert_eq!(metrics.line_count, 2);
    }

    #[test]
    fn wrapped_breaks_on_word_boundaries() {
        let g = RecordingCanvas::new();
        // 6 units per char at size 10: "alpha beta" is 60 wide.
        let tb = TextBox::wrapped("alpha beta gamma", &Font::new(10.0), Color::BLACK, 40.0, &g);
        assert_eq!(tb.lines, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn draw_places_box_by_anchor() {
        let mut g = RecordingCanvas::new();
        let tb = TextBox::new("abc", &Font::new(10.0), Color::BLACK).with_padding(Insets::ZERO);
        let r = tb.draw(&mut g, 100.0, 50.0, RectangleAnchor::Right);
        assert!((r.max_x() - 100.0).abs() < 1e-9);
        assert!((r.center_y() - 50.0).abs() < 1e-9);
        assert_eq!(g.texts().count(), 1);
    }
}
