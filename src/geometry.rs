//! Screen-space geometry shared by every plot: rectangles, insets and edges.
//!
//! Coordinates follow the usual canvas convention: `x` grows to the right and
//! `y` grows downward.
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a rectangle from two corner points in any order.
    pub fn from_corners(a: DVec2, b: DVec2) -> Self {
        let min = a.min(b);
        let max = a.max(b);
        Self::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }

    pub fn min_x(&self) -> f64 {
        self.x
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn min_y(&self) -> f64 {
        self.y
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(self.center_x(), self.center_y())
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Inclusive containment test.
    pub fn contains(&self, point: DVec2) -> bool {
        point.x >= self.x && point.x <= self.max_x() && point.y >= self.y && point.y <= self.max_y()
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.max_x()
            && other.x < self.max_x()
            && self.y < other.max_y()
            && other.y < self.max_y()
    }

    pub fn union(&self, other: &Rect) -> Rect {
        let min_x = self.x.min(other.x);
        let min_y = self.y.min(other.y);
        let max_x = self.max_x().max(other.max_x());
        let max_y = self.max_y().max(other.max_y());
        Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Shrink the rectangle by `dx` on the left and right and `dy` on the top and bottom.
    pub fn inset(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(
            self.x + dx,
            self.y + dy,
            (self.width - 2.0 * dx).max(0.0),
            (self.height - 2.0 * dy).max(0.0),
        )
    }
}

impl From<Rect> for iced::Rectangle {
    fn from(r: Rect) -> Self {
        iced::Rectangle {
            x: r.x as f32,
            y: r.y as f32,
            width: r.width as f32,
            height: r.height as f32,
        }
    }
}

/// How inset values are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnitType {
    /// Values are in screen units.
    #[default]
    Absolute,
    /// Values are fractions of the rectangle's width (left/right) or height (top/bottom).
    Relative,
}

/// Space to leave around the edges of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Insets {
    pub unit: UnitType,
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl Insets {
    pub const ZERO: Insets = Insets::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(top: f64, left: f64, bottom: f64, right: f64) -> Self {
        Self {
            unit: UnitType::Absolute,
            top,
            left,
            bottom,
            right,
        }
    }

    pub const fn relative(top: f64, left: f64, bottom: f64, right: f64) -> Self {
        Self {
            unit: UnitType::Relative,
            top,
            left,
            bottom,
            right,
        }
    }

    pub const fn uniform(v: f64) -> Self {
        Self::new(v, v, v, v)
    }

    pub fn left_inset(&self, width: f64) -> f64 {
        match self.unit {
            UnitType::Absolute => self.left,
            UnitType::Relative => self.left * width,
        }
    }

    pub fn right_inset(&self, width: f64) -> f64 {
        match self.unit {
            UnitType::Absolute => self.right,
            UnitType::Relative => self.right * width,
        }
    }

    pub fn top_inset(&self, height: f64) -> f64 {
        match self.unit {
            UnitType::Absolute => self.top,
            UnitType::Relative => self.top * height,
        }
    }

    pub fn bottom_inset(&self, height: f64) -> f64 {
        match self.unit {
            UnitType::Absolute => self.bottom,
            UnitType::Relative => self.bottom * height,
        }
    }

    pub fn trim_width(&self, width: f64) -> f64 {
        width - self.left_inset(width) - self.right_inset(width)
    }

    pub fn trim_height(&self, height: f64) -> f64 {
        height - self.top_inset(height) - self.bottom_inset(height)
    }

    pub fn extend_width(&self, width: f64) -> f64 {
        width + self.left_inset(width) + self.right_inset(width)
    }

    pub fn extend_height(&self, height: f64) -> f64 {
        height + self.top_inset(height) + self.bottom_inset(height)
    }

    /// Return `rect` with the insets removed from each side.
    pub fn trim(&self, rect: Rect) -> Rect {
        let left = self.left_inset(rect.width);
        let right = self.right_inset(rect.width);
        let top = self.top_inset(rect.height);
        let bottom = self.bottom_inset(rect.height);
        Rect::new(
            rect.x + left,
            rect.y + top,
            (rect.width - left - right).max(0.0),
            (rect.height - top - bottom).max(0.0),
        )
    }
}

/// One edge of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RectangleEdge {
    Top,
    Bottom,
    Left,
    Right,
}

impl RectangleEdge {
    pub fn is_top_or_bottom(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }

    pub fn is_left_or_right(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// The coordinate of this edge of `rect` (a y value for top/bottom, x for left/right).
    pub fn coordinate(self, rect: &Rect) -> f64 {
        match self {
            Self::Top => rect.min_y(),
            Self::Bottom => rect.max_y(),
            Self::Left => rect.min_x(),
            Self::Right => rect.max_x(),
        }
    }
}

/// An anchor point on a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RectangleAnchor {
    #[default]
    Center,
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl RectangleAnchor {
    pub fn coordinates(self, rect: &Rect) -> DVec2 {
        let (x, y) = match self {
            Self::Center => (rect.center_x(), rect.center_y()),
            Self::Top => (rect.center_x(), rect.min_y()),
            Self::Bottom => (rect.center_x(), rect.max_y()),
            Self::Left => (rect.min_x(), rect.center_y()),
            Self::Right => (rect.max_x(), rect.center_y()),
            Self::TopLeft => (rect.min_x(), rect.min_y()),
            Self::TopRight => (rect.max_x(), rect.min_y()),
            Self::BottomLeft => (rect.min_x(), rect.max_y()),
            Self::BottomRight => (rect.max_x(), rect.max_y()),
        };
        DVec2::new(x, y)
    }

    /// Place a `width` x `height` box so that its own anchor point sits at `point`.
    pub fn place(self, point: DVec2, width: f64, height: f64) -> Rect {
        let x = match self {
            Self::Left | Self::TopLeft | Self::BottomLeft => point.x,
            Self::Right | Self::TopRight | Self::BottomRight => point.x - width,
            Self::Center | Self::Top | Self::Bottom => point.x - width / 2.0,
        };
        let y = match self {
            Self::Top | Self::TopLeft | Self::TopRight => point.y,
            Self::Bottom | Self::BottomLeft | Self::BottomRight => point.y - height,
            Self::Center | Self::Left | Self::Right => point.y - height / 2.0,
        };
        Rect::new(x, y, width, height)
    }
}

/// Lengthen the segment `start..end` by fractions of its length at each end.
pub fn extend_line(start: DVec2, end: DVec2, start_pct: f64, end_pct: f64) -> (DVec2, DVec2) {
    let delta = end - start;
    (start - delta * start_pct, end + delta * end_pct)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_insets_scale_with_rect() {
        let insets = Insets::relative(0.1, 0.1, 0.1, 0.1);
        let r = insets.trim(Rect::new(0.0, 0.0, 200.0, 100.0));
        assert_eq!(r, Rect::new(20.0, 10.0, 160.0, 80.0));
    }

    #[test]
    fn anchor_place_right_aligns_box() {
        let r = RectangleAnchor::Right.place(DVec2::new(100.0, 50.0), 40.0, 10.0);
        assert_eq!(r, Rect::new(60.0, 45.0, 40.0, 10.0));
    }

    #[test]
    fn extend_line_grows_both_ends() {
        let (a, b) = extend_line(DVec2::new(0.0, 0.0), DVec2::new(10.0, 0.0), 0.2, 0.5);
        assert_eq!(a, DVec2::new(-2.0, 0.0));
        assert_eq!(b, DVec2::new(15.0, 0.0));
    }
}
