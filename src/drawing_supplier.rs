use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::shape::MarkerShape;
use crate::style::Stroke;

/// A source of series paints, strokes and shapes.
///
/// The `next_*` methods hand out the sequence in order (used when populating
/// explicit series styles); the indexed lookups serve drawing code, which only
/// has shared access to the plot.
pub trait DrawingSupplier {
    fn next_paint(&mut self) -> Color;
    fn next_outline_paint(&mut self) -> Color;
    fn next_fill_paint(&mut self) -> Color;
    fn next_stroke(&mut self) -> Stroke;
    fn next_outline_stroke(&mut self) -> Stroke;
    fn next_shape(&mut self) -> MarkerShape;

    fn paint(&self, index: usize) -> Color;
    fn outline_paint(&self, index: usize) -> Color;
    fn fill_paint(&self, index: usize) -> Color;
    fn stroke(&self, index: usize) -> Stroke;
    fn outline_stroke(&self, index: usize) -> Stroke;
    fn shape(&self, index: usize) -> MarkerShape;
}

fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::from_rgb8(r, g, b)
}

/// The classic series palette: saturated, dark, light, very dark and very light variants.
pub fn default_paint_sequence() -> Vec<Color> {
    vec![
        rgb(0xFF, 0x55, 0x55),
        rgb(0x55, 0x55, 0xFF),
        rgb(0x55, 0xFF, 0x55),
        rgb(0xFF, 0xFF, 0x55),
        rgb(0xFF, 0x55, 0xFF),
        rgb(0x55, 0xFF, 0xFF),
        Color::PINK,
        Color::GRAY,
        rgb(0xC0, 0x00, 0x00),
        rgb(0x00, 0x00, 0xC0),
        rgb(0x00, 0xC0, 0x00),
        rgb(0xC0, 0xC0, 0x00),
        rgb(0xC0, 0x00, 0xC0),
        rgb(0x00, 0xC0, 0xC0),
        Color::DARK_GRAY,
        rgb(0xFF, 0x40, 0x40),
        rgb(0x40, 0x40, 0xFF),
        rgb(0x40, 0xFF, 0x40),
        rgb(0xFF, 0xFF, 0x40),
        rgb(0xFF, 0x40, 0xFF),
        rgb(0x40, 0xFF, 0xFF),
        Color::LIGHT_GRAY,
        rgb(0x80, 0x00, 0x00),
        rgb(0x00, 0x00, 0x80),
        rgb(0x00, 0x80, 0x00),
        rgb(0x80, 0x80, 0x00),
        rgb(0x80, 0x00, 0x80),
        rgb(0x00, 0x80, 0x80),
        rgb(0xFF, 0x80, 0x80),
        rgb(0x80, 0x80, 0xFF),
        rgb(0x80, 0xFF, 0x80),
        rgb(0xFF, 0xFF, 0x80),
        rgb(0xFF, 0x80, 0xFF),
        rgb(0x80, 0xFF, 0xFF),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
struct Cursors {
    paint: usize,
    outline_paint: usize,
    fill_paint: usize,
    stroke: usize,
    outline_stroke: usize,
    shape: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultDrawingSupplier {
    pub paints: Vec<Color>,
    pub outline_paints: Vec<Color>,
    pub fill_paints: Vec<Color>,
    pub strokes: Vec<Stroke>,
    pub outline_strokes: Vec<Stroke>,
    pub shapes: Vec<MarkerShape>,
    #[serde(skip)]
    cursors: Cursors,
}

impl Default for DefaultDrawingSupplier {
    fn default() -> Self {
        Self {
            paints: default_paint_sequence(),
            outline_paints: vec![Color::GRAY],
            fill_paints: vec![Color::WHITE],
            strokes: vec![Stroke::solid(1.0)],
            outline_strokes: vec![Stroke::solid(1.0)],
            shapes: MarkerShape::STANDARD.to_vec(),
            cursors: Cursors::default(),
        }
    }
}

fn cycle<T: Clone>(items: &[T], index: usize, fallback: T) -> T {
    if items.is_empty() {
        fallback
    } else {
        items[index % items.len()].clone()
    }
}

impl DefaultDrawingSupplier {
    pub fn with_paints(mut self, paints: Vec<Color>) -> Self {
        self.paints = paints;
        self
    }

    /// Rewind every sequence to its first entry.
    pub fn reset(&mut self) {
        self.cursors = Cursors::default();
    }

    fn take(cursor: &mut usize) -> usize {
        let i = *cursor;
        *cursor = cursor.wrapping_add(1);
        i
    }
}

impl DrawingSupplier for DefaultDrawingSupplier {
    fn next_paint(&mut self) -> Color {
        let i = Self::take(&mut self.cursors.paint);
        self.paint(i)
    }

    fn next_outline_paint(&mut self) -> Color {
        let i = Self::take(&mut self.cursors.outline_paint);
        self.outline_paint(i)
    }

    fn next_fill_paint(&mut self) -> Color {
        let i = Self::take(&mut self.cursors.fill_paint);
        self.fill_paint(i)
    }

    fn next_stroke(&mut self) -> Stroke {
        let i = Self::take(&mut self.cursors.stroke);
        self.stroke(i)
    }

    fn next_outline_stroke(&mut self) -> Stroke {
        let i = Self::take(&mut self.cursors.outline_stroke);
        self.outline_stroke(i)
    }

    fn next_shape(&mut self) -> MarkerShape {
        let i = Self::take(&mut self.cursors.shape);
        self.shape(i)
    }

    fn paint(&self, index: usize) -> Color {
        cycle(&self.paints, index, Color::BLUE)
    }

    fn outline_paint(&self, index: usize) -> Color {
        cycle(&self.outline_paints, index, Color::GRAY)
    }

    fn fill_paint(&self, index: usize) -> Color {
        cycle(&self.fill_paints, index, Color::WHITE)
    }

    fn stroke(&self, index: usize) -> Stroke {
        cycle(&self.strokes, index, Stroke::default())
    }

    fn outline_stroke(&self, index: usize) -> Stroke {
        cycle(&self.outline_strokes, index, Stroke::default())
    }

    fn shape(&self, index: usize) -> MarkerShape {
        cycle(&self.shapes, index, MarkerShape::Square)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_paint_cycles_and_reset_rewinds() {
        let mut s = DefaultDrawingSupplier::default().with_paints(vec![Color::RED, Color::BLUE]);
        assert_eq!(s.next_paint(), Color::RED);
        assert_eq!(s.next_paint(), Color::BLUE);
        assert_eq!(s.next_paint(), Color::RED);
        s.reset();
        assert_eq!(s.next_paint(), Color::RED);
    }

    #[test]
    fn cursors_are_independent() {
        let mut s = DefaultDrawingSupplier::default();
        s.next_paint();
        s.next_paint();
        assert_eq!(s.next_shape(), MarkerShape::Square);
        assert_eq!(s.next_shape(), MarkerShape::Circle);
    }

    #[test]
    fn indexed_lookup_wraps() {
        let s = DefaultDrawingSupplier::default();
        let n = s.paints.len();
        assert_eq!(s.paint(n + 1), s.paint(1));
    }
}
