use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::geometry::Rect;
use crate::graphics::{Graphics, TextItem};
use crate::labels::format_number;
use crate::style::{Font, Stroke, TextAnchor};
use crate::zoom::PlotOrientation;

/// A crosshair line for one axis of a plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Crosshair {
    pub visible: bool,
    /// Current value; updated from [`CrosshairState`] after drawing.
    pub value: f64,
    pub paint: Color,
    pub stroke: Stroke,
    /// Snap to the data item nearest the anchor instead of following it.
    pub locked_on_data: bool,
    pub label_visible: bool,
    /// Label template; `{0}` is replaced by the value.
    pub label_format: String,
    pub label_font: Font,
    pub label_paint: Color,
    pub label_background: Color,
}

impl Default for Crosshair {
    fn default() -> Self {
        Self {
            visible: false,
            value: 0.0,
            paint: Color::BLUE,
            stroke: Stroke::dashed(0.5, vec![2.0, 2.0]),
            locked_on_data: true,
            label_visible: false,
            label_format: "{0}".to_owned(),
            label_font: Font::new(10.0),
            label_paint: Color::BLACK,
            label_background: Color::rgba(1.0, 1.0, 0.75, 0.9),
        }
    }
}

impl Crosshair {
    pub fn visible() -> Self {
        Self {
            visible: true,
            ..Self::default()
        }
    }

    pub fn label(&self) -> String {
        self.label_format.replace("{0}", &format_number(self.value))
    }

    /// Draw at screen coordinate `coord`: a vertical line when `vertical`, else horizontal.
    pub fn draw(&self, g: &mut dyn Graphics, data_area: &Rect, coord: f64, vertical: bool) {
        if !self.visible {
            return;
        }
        let (a, b) = if vertical {
            if coord < data_area.min_x() || coord > data_area.max_x() {
                return;
            }
            (
                DVec2::new(coord, data_area.min_y()),
                DVec2::new(coord, data_area.max_y()),
            )
        } else {
            if coord < data_area.min_y() || coord > data_area.max_y() {
                return;
            }
            (
                DVec2::new(data_area.min_x(), coord),
                DVec2::new(data_area.max_x(), coord),
            )
        };
        g.draw_line(a, b, self.paint, &self.stroke);

        if self.label_visible {
            let text = self.label();
            let m = g.measure_text(&text, &self.label_font);
            let (pos, anchor) = if vertical {
                (DVec2::new(coord + 2.0, data_area.min_y() + 2.0), TextAnchor::TopLeft)
            } else {
                (DVec2::new(data_area.max_x() - 2.0, coord - 2.0), TextAnchor::BottomRight)
            };
            let bg_x = pos.x - m.width * anchor.x_fraction();
            let bg_y = pos.y - m.height * anchor.y_fraction();
            g.fill_rect(Rect::new(bg_x, bg_y, m.width, m.height), self.label_background);
            g.draw_text(&TextItem::new(text, pos, &self.label_font, self.label_paint).with_anchor(anchor));
        }
    }
}

/// Tracks the candidate crosshair point nearest to an anchor while items are drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrosshairState {
    /// The anchor point in screen space.
    pub anchor: Option<DVec2>,
    /// The anchor in data space.
    pub anchor_x: f64,
    pub anchor_y: f64,
    pub crosshair_x: f64,
    pub crosshair_y: f64,
    pub dataset_index: usize,
    /// Best distance found so far (squared for point updates).
    pub distance: f64,
    /// Compare distances in data units instead of screen units.
    pub distance_in_data_space: bool,
}

impl Default for CrosshairState {
    fn default() -> Self {
        Self {
            anchor: None,
            anchor_x: f64::NAN,
            anchor_y: f64::NAN,
            crosshair_x: 0.0,
            crosshair_y: 0.0,
            dataset_index: 0,
            distance: f64::INFINITY,
            distance_in_data_space: false,
        }
    }
}

impl CrosshairState {
    pub fn new(anchor: Option<DVec2>, anchor_x: f64, anchor_y: f64) -> Self {
        Self {
            anchor,
            anchor_x,
            anchor_y,
            ..Self::default()
        }
    }

    /// Offer the item `(x, y)` drawn at screen position `(trans_x, trans_y)`,
    /// where `trans_x` is along the domain axis.
    pub fn update_point(&mut self, x: f64, y: f64, dataset_index: usize, trans_x: f64, trans_y: f64, orientation: PlotOrientation) {
        let Some(anchor) = self.anchor else {
            return;
        };
        let d = if self.distance_in_data_space {
            (x - self.anchor_x).powi(2) + (y - self.anchor_y).powi(2)
        } else {
            let (ax, ay) = match orientation {
                PlotOrientation::Vertical => (anchor.x, anchor.y),
                PlotOrientation::Horizontal => (anchor.y, anchor.x),
            };
            (trans_x - ax).powi(2) + (trans_y - ay).powi(2)
        };
        if d < self.distance {
            self.crosshair_x = x;
            self.crosshair_y = y;
            self.dataset_index = dataset_index;
            self.distance = d;
        }
    }

    /// Offer a domain value only.
    pub fn update_x(&mut self, x: f64, dataset_index: usize) {
        let d = (x - self.anchor_x).abs();
        if d < self.distance {
            self.crosshair_x = x;
            self.dataset_index = dataset_index;
            self.distance = d;
        }
    }

    /// Offer a range value only.
    pub fn update_y(&mut self, y: f64, dataset_index: usize) {
        let d = (y - self.anchor_y).abs();
        if d < self.distance {
            self.crosshair_y = y;
            self.dataset_index = dataset_index;
            self.distance = d;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_point_keeps_nearest_in_screen_space() {
        let mut s = CrosshairState::new(Some(DVec2::new(100.0, 100.0)), 0.0, 0.0);
        s.update_point(1.0, 1.0, 0, 90.0, 100.0, PlotOrientation::Vertical);
        s.update_point(2.0, 2.0, 1, 200.0, 100.0, PlotOrientation::Vertical);
        assert_eq!((s.crosshair_x, s.crosshair_y, s.dataset_index), (1.0, 1.0, 0));
        assert_eq!(s.distance, 100.0);
    }

    #[test]
    fn horizontal_orientation_swaps_anchor() {
        let mut s = CrosshairState::new(Some(DVec2::new(10.0, 50.0)), 0.0, 0.0);
        // Domain runs down the screen, so trans_x compares with the anchor's y.
        s.update_point(1.0, 1.0, 0, 50.0, 10.0, PlotOrientation::Horizontal);
        assert_eq!(s.distance, 0.0);
    }

    #[test]
    fn without_anchor_nothing_updates() {
        let mut s = CrosshairState::default();
        s.update_point(1.0, 1.0, 0, 0.0, 0.0, PlotOrientation::Vertical);
        assert!(s.distance.is_infinite());
    }

    #[test]
    fn update_x_uses_absolute_distance() {
        let mut s = CrosshairState::new(None, 5.0, 0.0);
        s.update_x(7.0, 0);
        s.update_x(4.0, 1);
        assert_eq!(s.crosshair_x, 4.0);
        assert_eq!(s.dataset_index, 1);
    }
}
