//! Vector paths and the standard series shapes.
//!
//! Angles are in degrees with 0° at 3 o'clock and positive extents running
//! anticlockwise on screen. Because screen `y` grows downward, the point at
//! angle `a` on an ellipse is `(cx + rx·cos a, cy − ry·sin a)`.
use std::f64::consts::FRAC_PI_2;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// Number of line segments used to flatten each cubic for hit testing and bounds.
const CUBIC_FLATTEN_STEPS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathCommand {
    MoveTo(DVec2),
    LineTo(DVec2),
    CubicTo(DVec2, DVec2, DVec2),
    Close,
}

/// How an arc is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ArcType {
    /// Just the curve.
    Open,
    /// The curve plus a straight segment joining its ends.
    Chord,
    /// The curve plus two segments through the ellipse centre.
    #[default]
    Pie,
}

/// A vector outline made of straight and cubic segments.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn move_to(&mut self, p: DVec2) {
        self.commands.push(PathCommand::MoveTo(p));
    }

    pub fn line_to(&mut self, p: DVec2) {
        self.commands.push(PathCommand::LineTo(p));
    }

    pub fn cubic_to(&mut self, c1: DVec2, c2: DVec2, p: DVec2) {
        self.commands.push(PathCommand::CubicTo(c1, c2, p));
    }

    pub fn close(&mut self) {
        self.commands.push(PathCommand::Close);
    }

    /// Append another path's commands.
    pub fn extend(&mut self, other: &Path) {
        self.commands.extend_from_slice(&other.commands);
    }

    pub fn line(from: DVec2, to: DVec2) -> Self {
        let mut p = Self::new();
        p.move_to(from);
        p.line_to(to);
        p
    }

    pub fn rectangle(rect: Rect) -> Self {
        Self::polygon(&[
            DVec2::new(rect.min_x(), rect.min_y()),
            DVec2::new(rect.max_x(), rect.min_y()),
            DVec2::new(rect.max_x(), rect.max_y()),
            DVec2::new(rect.min_x(), rect.max_y()),
        ])
    }

    /// A closed polygon through `points`.
    pub fn polygon(points: &[DVec2]) -> Self {
        let mut p = Self::new();
        let Some((first, rest)) = points.split_first() else {
            return p;
        };
        p.move_to(*first);
        for pt in rest {
            p.line_to(*pt);
        }
        p.close();
        p
    }

    /// An open polyline through `points`.
    pub fn polyline(points: &[DVec2]) -> Self {
        let mut p = Self::new();
        let Some((first, rest)) = points.split_first() else {
            return p;
        };
        p.move_to(*first);
        for pt in rest {
            p.line_to(*pt);
        }
        p
    }

    pub fn ellipse(bounds: Rect) -> Self {
        let mut p = Self::new();
        p.append_arc(bounds, 0.0, 360.0, false);
        p.close();
        p
    }

    pub fn circle(center: DVec2, radius: f64) -> Self {
        Self::ellipse(Rect::new(
            center.x - radius,
            center.y - radius,
            2.0 * radius,
            2.0 * radius,
        ))
    }

    /// A rectangle with corners rounded by an ellipse of `arc_w` x `arc_h`.
    pub fn round_rect(rect: Rect, arc_w: f64, arc_h: f64) -> Self {
        let aw = arc_w.min(rect.width).max(0.0);
        let ah = arc_h.min(rect.height).max(0.0);
        if aw == 0.0 || ah == 0.0 {
            return Self::rectangle(rect);
        }
        let corner = |x: f64, y: f64| Rect::new(x, y, aw, ah);
        let mut p = Self::new();
        p.append_arc(corner(rect.max_x() - aw, rect.min_y()), 90.0, -90.0, false);
        p.append_arc(corner(rect.max_x() - aw, rect.max_y() - ah), 0.0, -90.0, true);
        p.append_arc(corner(rect.min_x(), rect.max_y() - ah), 270.0, -90.0, true);
        p.append_arc(corner(rect.min_x(), rect.min_y()), 180.0, -90.0, true);
        p.close();
        p
    }

    /// An elliptical arc inside `bounds` starting at `start` degrees and sweeping `extent` degrees.
    pub fn arc(bounds: Rect, start: f64, extent: f64, kind: ArcType) -> Self {
        let mut p = Self::new();
        match kind {
            ArcType::Pie => {
                p.move_to(bounds.center());
                p.append_arc(bounds, start, extent, true);
                p.close();
            }
            ArcType::Chord => {
                p.append_arc(bounds, start, extent, false);
                p.close();
            }
            ArcType::Open => p.append_arc(bounds, start, extent, false),
        }
        p
    }

    /// Append an arc. When `connect` is set and the path already has a current
    /// point, a straight segment joins it to the start of the arc.
    pub fn append_arc(&mut self, bounds: Rect, start: f64, extent: f64, connect: bool) {
        let start_pt = arc_point(bounds, start);
        if connect && !self.commands.is_empty() {
            self.line_to(start_pt);
        } else {
            self.move_to(start_pt);
        }
        if extent == 0.0 {
            return;
        }

        let center = bounds.center();
        let radii = DVec2::new(bounds.width / 2.0, bounds.height / 2.0);
        let start = start.to_radians();
        let sweep = extent.clamp(-360.0, 360.0).to_radians();
        let segments = ((sweep.abs() / FRAC_PI_2).ceil() as usize).max(1);
        let seg = sweep / segments as f64;
        let k = 4.0 / 3.0 * (seg / 4.0).tan();

        let point = |t: f64| center + DVec2::new(radii.x * t.cos(), -radii.y * t.sin());
        let tangent = |t: f64| DVec2::new(-radii.x * t.sin(), -radii.y * t.cos());

        for i in 0..segments {
            let t1 = start + seg * i as f64;
            let t2 = t1 + seg;
            let c1 = point(t1) + tangent(t1) * k;
            let c2 = point(t2) - tangent(t2) * k;
            self.cubic_to(c1, c2, point(t2));
        }
    }

    pub fn translate(&self, offset: DVec2) -> Path {
        self.map_points(|p| p + offset)
    }

    /// Rotate about `origin` by `radians` (positive turns clockwise on screen).
    pub fn rotate(&self, origin: DVec2, radians: f64) -> Path {
        let rot = DVec2::from_angle(radians);
        self.map_points(|p| origin + rot.rotate(p - origin))
    }

    fn map_points(&self, f: impl Fn(DVec2) -> DVec2) -> Path {
        let commands = self
            .commands
            .iter()
            .map(|c| match *c {
                PathCommand::MoveTo(p) => PathCommand::MoveTo(f(p)),
                PathCommand::LineTo(p) => PathCommand::LineTo(f(p)),
                PathCommand::CubicTo(a, b, p) => PathCommand::CubicTo(f(a), f(b), f(p)),
                PathCommand::Close => PathCommand::Close,
            })
            .collect();
        Path { commands }
    }

    /// Flatten into polylines, one per subpath. Closed subpaths repeat their first point.
    pub fn flatten(&self) -> Vec<Vec<DVec2>> {
        let mut out: Vec<Vec<DVec2>> = Vec::new();
        let mut current: Vec<DVec2> = Vec::new();
        for cmd in &self.commands {
            match *cmd {
                PathCommand::MoveTo(p) => {
                    if current.len() > 1 {
                        out.push(std::mem::take(&mut current));
                    }
                    current.clear();
                    current.push(p);
                }
                PathCommand::LineTo(p) => current.push(p),
                PathCommand::CubicTo(c1, c2, p) => {
                    let p0 = current.last().copied().unwrap_or(c1);
                    for step in 1..=CUBIC_FLATTEN_STEPS {
                        let t = step as f64 / CUBIC_FLATTEN_STEPS as f64;
                        current.push(cubic_point(p0, c1, c2, p, t));
                    }
                }
                PathCommand::Close => {
                    if let Some(&first) = current.first() {
                        current.push(first);
                    }
                }
            }
        }
        if current.len() > 1 {
            out.push(current);
        }
        out
    }

    pub fn bounds(&self) -> Rect {
        let mut min = DVec2::splat(f64::INFINITY);
        let mut max = DVec2::splat(f64::NEG_INFINITY);
        for poly in self.flatten() {
            for p in poly {
                min = min.min(p);
                max = max.max(p);
            }
        }
        if min.x > max.x {
            return Rect::default();
        }
        Rect::from_corners(min, max)
    }

    /// Even-odd containment test against the flattened outline. Open subpaths
    /// are treated as implicitly closed.
    pub fn contains(&self, pt: DVec2) -> bool {
        let mut inside = false;
        for poly in self.flatten() {
            let n = poly.len();
            for i in 0..n {
                let a = poly[i];
                let b = poly[(i + 1) % n];
                if (a.y > pt.y) != (b.y > pt.y) {
                    let x = a.x + (pt.y - a.y) / (b.y - a.y) * (b.x - a.x);
                    if pt.x < x {
                        inside = !inside;
                    }
                }
            }
        }
        inside
    }
}

fn cubic_point(p0: DVec2, c1: DVec2, c2: DVec2, p: DVec2, t: f64) -> DVec2 {
    let u = 1.0 - t;
    p0 * (u * u * u) + c1 * (3.0 * u * u * t) + c2 * (3.0 * u * t * t) + p * (t * t * t)
}

/// The point at `angle` degrees on the ellipse inscribed in `bounds`.
pub fn arc_point(bounds: Rect, angle: f64) -> DVec2 {
    let a = angle.to_radians();
    DVec2::new(
        bounds.center_x() + bounds.width / 2.0 * a.cos(),
        bounds.center_y() - bounds.height / 2.0 * a.sin(),
    )
}

/// The ten standard series shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MarkerShape {
    #[default]
    Square,
    Circle,
    UpTriangle,
    Diamond,
    HorizontalRectangle,
    DownTriangle,
    HorizontalEllipse,
    RightTriangle,
    VerticalRectangle,
    LeftTriangle,
}

impl MarkerShape {
    pub const STANDARD: [MarkerShape; 10] = [
        Self::Square,
        Self::Circle,
        Self::UpTriangle,
        Self::Diamond,
        Self::HorizontalRectangle,
        Self::DownTriangle,
        Self::HorizontalEllipse,
        Self::RightTriangle,
        Self::VerticalRectangle,
        Self::LeftTriangle,
    ];

    /// Build the outline centred on `c`, fitting in a `size` x `size` box.
    pub fn to_path(self, c: DVec2, size: f64) -> Path {
        let d = size / 2.0;
        let p = |x: f64, y: f64| DVec2::new(c.x + x, c.y + y);
        match self {
            Self::Square => Path::rectangle(Rect::new(c.x - d, c.y - d, size, size)),
            Self::Circle => Path::circle(c, d),
            Self::UpTriangle => Path::polygon(&[p(0.0, -d), p(d, d), p(-d, d)]),
            Self::DownTriangle => Path::polygon(&[p(-d, -d), p(d, -d), p(0.0, d)]),
            Self::RightTriangle => Path::polygon(&[p(-d, -d), p(d, 0.0), p(-d, d)]),
            Self::LeftTriangle => Path::polygon(&[p(-d, 0.0), p(d, -d), p(d, d)]),
            Self::Diamond => Path::polygon(&[p(0.0, -d), p(d, 0.0), p(0.0, d), p(-d, 0.0)]),
            Self::HorizontalRectangle => {
                Path::rectangle(Rect::new(c.x - d, c.y - d / 2.0, size, d))
            }
            Self::VerticalRectangle => Path::rectangle(Rect::new(c.x - d / 2.0, c.y - d, d, size)),
            Self::HorizontalEllipse => Path::ellipse(Rect::new(c.x - d, c.y - d / 2.0, size, d)),
        }
    }
}
