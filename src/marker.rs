use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::axis::{CategoryAxis, ValueAxis};
use crate::color::Color;
use crate::dataset::Range;
use crate::geometry::{Insets, Rect, RectangleAnchor, RectangleEdge};
use crate::graphics::{Graphics, TextItem};
use crate::style::{Font, Stroke, TextAnchor};

/// Whether a marker is drawn behind or in front of the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Layer {
    #[default]
    Foreground,
    Background,
}

/// What a marker highlights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MarkerKind {
    /// A single value on a value axis.
    Value(f64),
    /// A band between two values on a value axis.
    Interval { start: f64, end: f64 },
    /// One category on a category axis.
    Category(String),
}

/// A highlighted value, interval or category on a plot axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    /// What the marker highlights.
    pub kind: MarkerKind,
    /// Line color for value markers, fill color for bands.
    pub paint: Color,
    /// Optional outline drawn around interval and category bands.
    pub outline_paint: Option<Color>,
    /// Line stroke for value markers and band outlines.
    pub stroke: Stroke,
    /// Opacity applied to `paint`.
    pub alpha: f32,
    /// Optional label (drawn inside the marker bounds).
    pub label: Option<String>,
    pub label_font: Font,
    pub label_paint: Color,
    /// Where inside the marker bounds the label is placed.
    pub label_anchor: RectangleAnchor,
    /// Space between the label and the marker bounds.
    pub label_offset: Insets,
    pub layer: Layer,
    /// Category markers only: draw a line through the category middle instead of a band.
    pub draw_as_line: bool,
}

impl Marker {
    fn with_kind(kind: MarkerKind, paint: Color, alpha: f32) -> Self {
        Self {
            kind,
            paint,
            outline_paint: None,
            stroke: Stroke::solid(1.0),
            alpha,
            label: None,
            label_font: Font::new(9.0),
            label_paint: Color::BLACK,
            label_anchor: RectangleAnchor::TopLeft,
            label_offset: Insets::uniform(3.0),
            layer: Layer::Foreground,
            draw_as_line: false,
        }
    }

    /// A line at `value`.
    pub fn value(value: f64) -> Self {
        Self::with_kind(MarkerKind::Value(value), Color::GRAY, 0.8)
    }

    /// A translucent band between `start` and `end`.
    pub fn interval(start: f64, end: f64) -> Self {
        Self::with_kind(
            MarkerKind::Interval {
                start: start.min(end),
                end: start.max(end),
            },
            Color::rgb(0.75, 0.75, 0.9),
            0.5,
        )
    }

    /// A band covering the named category.
    pub fn category(key: impl Into<String>) -> Self {
        Self::with_kind(MarkerKind::Category(key.into()), Color::LIGHT_GRAY, 0.6)
    }

    /// Set the label drawn with the marker.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        let l = label.into();
        if !l.is_empty() {
            self.label = Some(l);
        }
        self
    }

    pub fn with_paint(mut self, paint: Color) -> Self {
        self.paint = paint;
        self
    }

    pub fn with_stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = stroke;
        self
    }

    pub fn with_layer(mut self, layer: Layer) -> Self {
        self.layer = layer;
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha.clamp(0.0, 1.0);
        self
    }

    pub fn with_draw_as_line(mut self, draw_as_line: bool) -> Self {
        self.draw_as_line = draw_as_line;
        self
    }

    fn line(data_area: &Rect, coord: f64, across_x: bool) -> (DVec2, DVec2) {
        if across_x {
            (
                DVec2::new(coord, data_area.min_y()),
                DVec2::new(coord, data_area.max_y()),
            )
        } else {
            (
                DVec2::new(data_area.min_x(), coord),
                DVec2::new(data_area.max_x(), coord),
            )
        }
    }

    fn band(data_area: &Rect, a: f64, b: f64, across_x: bool) -> Rect {
        let (lo, hi) = (a.min(b), a.max(b));
        if across_x {
            Rect::new(lo, data_area.y, hi - lo, data_area.height)
        } else {
            Rect::new(data_area.x, lo, data_area.width, hi - lo)
        }
    }

    fn draw_label(&self, g: &mut dyn Graphics, bounds: Rect) {
        let Some(label) = &self.label else {
            return;
        };
        let inner = self.label_offset.trim(bounds);
        let pos = self.label_anchor.coordinates(&inner);
        let anchor = match self.label_anchor {
            RectangleAnchor::TopLeft => TextAnchor::TopLeft,
            RectangleAnchor::Top => TextAnchor::TopCenter,
            RectangleAnchor::TopRight => TextAnchor::TopRight,
            RectangleAnchor::Left => TextAnchor::CenterLeft,
            RectangleAnchor::Center => TextAnchor::Center,
            RectangleAnchor::Right => TextAnchor::CenterRight,
            RectangleAnchor::BottomLeft => TextAnchor::BottomLeft,
            RectangleAnchor::Bottom => TextAnchor::BottomCenter,
            RectangleAnchor::BottomRight => TextAnchor::BottomRight,
        };
        g.draw_text(&TextItem::new(label.as_str(), pos, &self.label_font, self.label_paint).with_anchor(anchor));
    }

    /// Draw a value or interval marker against a value axis on `edge`.
    /// Markers outside the axis range are skipped.
    pub(crate) fn draw_value_marker(&self, g: &mut dyn Graphics, axis: &ValueAxis, range: Range, data_area: &Rect, edge: RectangleEdge) {
        let across_x = edge.is_top_or_bottom();
        let paint = self.paint.scale_alpha(self.alpha);
        match self.kind {
            MarkerKind::Value(v) => {
                if !range.contains(v) {
                    return;
                }
                let Some(coord) = axis.value_to_screen(v, range, data_area, edge) else {
                    return;
                };
                let (a, b) = Self::line(data_area, coord, across_x);
                g.draw_line(a, b, paint, &self.stroke);
                let bounds = if across_x {
                    Rect::new(coord, data_area.y, 0.0, data_area.height)
                } else {
                    Rect::new(data_area.x, coord, data_area.width, 0.0)
                };
                self.draw_label(g, bounds);
            }
            MarkerKind::Interval { start, end } => {
                if !range.intersects(start, end) {
                    return;
                }
                let s = axis.value_to_screen_clamped(range.constrain(start), range, data_area, edge);
                let e = axis.value_to_screen_clamped(range.constrain(end), range, data_area, edge);
                let band = Self::band(data_area, s, e, across_x);
                g.fill_rect(band, paint);
                if let Some(outline) = self.outline_paint {
                    g.stroke_rect(band, outline, &self.stroke);
                }
                self.draw_label(g, band);
            }
            MarkerKind::Category(_) => {}
        }
    }

    /// Draw a category marker against a category axis on `edge`.
    pub(crate) fn draw_category_marker(&self, g: &mut dyn Graphics, axis: &CategoryAxis, categories: &[String], data_area: &Rect, edge: RectangleEdge) {
        let MarkerKind::Category(key) = &self.kind else {
            return;
        };
        let Some(index) = categories.iter().position(|c| c == key) else {
            return;
        };
        let across_x = edge.is_top_or_bottom();
        let count = categories.len();
        let paint = self.paint.scale_alpha(self.alpha);
        if self.draw_as_line {
            let mid = axis.category_middle(index, count, data_area, edge);
            let (a, b) = Self::line(data_area, mid, across_x);
            g.draw_line(a, b, paint, &self.stroke);
            self.draw_label(g, Self::band(data_area, mid, mid, across_x));
        } else {
            let s = axis.category_start(index, count, data_area, edge);
            let e = axis.category_end(index, count, data_area, edge);
            let band = Self::band(data_area, s, e, across_x);
            g.fill_rect(band, paint);
            if let Some(outline) = self.outline_paint {
                g.stroke_rect(band, outline, &self.stroke);
            }
            self.draw_label(g, band);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::RecordingCanvas;

    #[test]
    fn value_marker_outside_range_is_skipped() {
        let mut g = RecordingCanvas::new();
        let axis = ValueAxis::default();
        let area = Rect::new(0.0, 0.0, 100.0, 100.0);
        Marker::value(50.0).draw_value_marker(&mut g, &axis, Range::ordered(0.0, 10.0), &area, RectangleEdge::Bottom);
        assert!(g.commands().is_empty());
        Marker::value(5.0).draw_value_marker(&mut g, &axis, Range::ordered(0.0, 10.0), &area, RectangleEdge::Bottom);
        assert_eq!(g.strokes().count(), 1);
    }

    #[test]
    fn interval_marker_is_clipped_to_range() {
        let mut g = RecordingCanvas::new();
        let axis = ValueAxis::default();
        let area = Rect::new(0.0, 0.0, 100.0, 100.0);
        Marker::interval(5.0, 50.0).draw_value_marker(&mut g, &axis, Range::ordered(0.0, 10.0), &area, RectangleEdge::Left);
        let (path, _) = g.fills().next().unwrap();
        let b = path.bounds();
        assert!((b.min_y() - 0.0).abs() < 1e-9);
        assert!((b.max_y() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn category_marker_fills_band() {
        let mut g = RecordingCanvas::new();
        let axis = CategoryAxis::default();
        let cats = vec!["a".to_owned(), "b".to_owned()];
        let area = Rect::new(0.0, 0.0, 100.0, 100.0);
        Marker::category("b").draw_category_marker(&mut g, &axis, &cats, &area, RectangleEdge::Bottom);
        let (path, _) = g.fills().next().unwrap();
        let b = path.bounds();
        assert!((b.max_x() - 95.0).abs() < 1e-9);
    }
}
