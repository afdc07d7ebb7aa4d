use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::axis::ValueAxis;
use crate::color::Color;
use crate::dataset::Range;
use crate::geometry::{Rect, RectangleEdge};
use crate::graphics::Graphics;
use crate::style::Stroke;
use crate::ticks::Tick;

/// Lines drawn across the data area at axis ticks (or category middles).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Gridlines {
    pub visible: bool,
    pub paint: Color,
    pub stroke: Stroke,
}

impl Default for Gridlines {
    fn default() -> Self {
        Self {
            visible: true,
            paint: Color::LIGHT_GRAY,
            stroke: Stroke::dashed(0.5, vec![2.0, 2.0]),
        }
    }
}

impl Gridlines {
    pub fn hidden() -> Self {
        Self {
            visible: false,
            ..Self::default()
        }
    }

    /// Draw one line per coordinate, perpendicular to an axis on `edge`.
    pub(crate) fn draw_at(&self, g: &mut dyn Graphics, area: &Rect, edge: RectangleEdge, coords: impl IntoIterator<Item = f64>) {
        if !self.visible {
            return;
        }
        for c in coords {
            let (a, b) = if edge.is_top_or_bottom() {
                if c < area.min_x() || c > area.max_x() {
                    continue;
                }
                (DVec2::new(c, area.min_y()), DVec2::new(c, area.max_y()))
            } else {
                if c < area.min_y() || c > area.max_y() {
                    continue;
                }
                (DVec2::new(area.min_x(), c), DVec2::new(area.max_x(), c))
            };
            g.draw_line(a, b, self.paint, &self.stroke);
        }
    }

    pub(crate) fn draw_value(
        &self,
        g: &mut dyn Graphics,
        axis: &ValueAxis,
        range: Range,
        ticks: &[Tick],
        area: &Rect,
        edge: RectangleEdge,
    ) {
        let coords: Vec<f64> = ticks
            .iter()
            .filter_map(|t| axis.value_to_screen(t.value, range, area, edge))
            .collect();
        self.draw_at(g, area, edge, coords);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::RecordingCanvas;

    #[test]
    fn lines_outside_area_are_skipped() {
        let mut g = RecordingCanvas::new();
        let area = Rect::new(0.0, 0.0, 100.0, 50.0);
        Gridlines::default().draw_at(&mut g, &area, RectangleEdge::Bottom, [10.0, 50.0, 150.0]);
        assert_eq!(g.strokes().count(), 2);
    }

    #[test]
    fn hidden_draws_nothing() {
        let mut g = RecordingCanvas::new();
        let area = Rect::new(0.0, 0.0, 100.0, 50.0);
        Gridlines::hidden().draw_at(&mut g, &area, RectangleEdge::Left, [10.0]);
        assert!(g.commands().is_empty());
    }
}
