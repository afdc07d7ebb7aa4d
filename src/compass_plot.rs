//! A compass rose with one needle per value dataset.
use glam::DVec2;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::color::Color;
use crate::dataset::ValueDataset;
use crate::error::{ChartError, Result};
use crate::geometry::Rect;
use crate::graphics::{Graphics, TextItem};
use crate::info::PlotRenderingInfo;
use crate::labels::format_number;
use crate::legend::LegendItem;
use crate::plot::{Plot, PlotBase};
use crate::shape::{ArcType, Path};
use crate::style::{Font, Stroke, TextAnchor};

/// Needle outlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NeedleKind {
    /// A line with an arrow head at the top.
    #[default]
    Arrow,
    Line,
    /// A long diamond pivoting near its tail.
    Long,
    /// A pointer on a round pin at the tail.
    Pin,
    /// A narrow pie slice hanging from its apex.
    Plum,
    /// A diamond split into a coloured tip and a highlighted tail.
    Pointer,
    /// A ship-shaped hull.
    Ship,
    /// Three arrows pointing downwind.
    Wind,
    /// A pointer on a pin at the centre.
    MiddlePin,
}

/// Which paint a needle part is filled with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Part {
    Fill,
    Highlight,
    Outline,
    /// Stroked only.
    Line,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeterNeedle {
    pub kind: NeedleKind,
    pub outline_paint: Option<Color>,
    pub outline_stroke: Stroke,
    pub fill_paint: Option<Color>,
    pub highlight_paint: Option<Color>,
    /// Arrow head half-width.
    pub size: f64,
    /// Pivot, as fractions of the needle area.
    pub rotate_x: f64,
    pub rotate_y: f64,
}

impl Default for MeterNeedle {
    fn default() -> Self {
        Self::new(NeedleKind::Arrow)
    }
}

impl MeterNeedle {
    pub fn new(kind: NeedleKind) -> Self {
        let mut needle = Self {
            kind,
            outline_paint: Some(Color::BLACK),
            outline_stroke: Stroke::solid(2.0),
            fill_paint: Some(Color::GRAY),
            highlight_paint: Some(Color::WHITE),
            size: 5.0,
            rotate_x: 0.5,
            rotate_y: 0.5,
        };
        match kind {
            NeedleKind::Arrow | NeedleKind::Wind => needle.fill_paint = Some(Color::RED),
            NeedleKind::Long => {
                needle.rotate_y = 0.8;
                needle.fill_paint = Some(Color::RED);
            }
            NeedleKind::Pointer => needle.fill_paint = Some(Color::RED),
            NeedleKind::Pin | NeedleKind::MiddlePin | NeedleKind::Plum => {
                needle.fill_paint = Some(Color::RED);
                needle.outline_stroke = Stroke::solid(1.0);
            }
            NeedleKind::Ship => needle.outline_stroke = Stroke::solid(1.0),
            NeedleKind::Line => {}
        }
        needle
    }

    pub fn pivot(&self, area: Rect) -> DVec2 {
        DVec2::new(
            area.x + area.width * self.rotate_x,
            area.y + area.height * self.rotate_y,
        )
    }

    /// The unrotated needle parts inside `area`, pointing up.
    fn parts(&self, area: Rect) -> Vec<(Path, Part)> {
        let mid_x = area.center_x();
        match self.kind {
            NeedleKind::Arrow => self.arrow(area, true),
            NeedleKind::Wind => {
                let spacing = self.size * 3.0;
                let mut parts = self.arrow(area, false);
                parts.extend(self.arrow(area.translate(-spacing, 0.0), false));
                parts.extend(self.arrow(area.translate(spacing, 0.0), false));
                parts
            }
            NeedleKind::Line => vec![(
                Path::line(DVec2::new(mid_x, area.min_y()), DVec2::new(mid_x, area.max_y())),
                Part::Line,
            )],
            NeedleKind::Long => {
                let mid_y = area.min_y() + area.height * 0.8;
                let tail = (area.max_y() - 2.0 * (area.max_y() - mid_y)).max(area.min_y());
                let top = DVec2::new(mid_x, area.min_y());
                let inner = DVec2::new(mid_x, tail);
                let left = DVec2::new(area.min_x(), mid_y);
                let right = DVec2::new(area.max_x(), mid_y);
                vec![
                    (Path::polygon(&[left, top, inner]), Part::Highlight),
                    (Path::polygon(&[right, top, inner]), Part::Fill),
                    (
                        Path::polygon(&[left, DVec2::new(mid_x, area.max_y()), right, inner]),
                        Part::Outline,
                    ),
                ]
            }
            NeedleKind::Pin => {
                let len = (area.width / 10.0).max(2.0);
                let pointer = Path::polygon(&[
                    DVec2::new(mid_x - len, area.max_y() - len),
                    DVec2::new(mid_x + len, area.max_y() - len),
                    DVec2::new(mid_x, area.min_y() + len),
                ]);
                let d = 4.0 * len;
                let pin = Path::ellipse(Rect::new(mid_x - d / 2.0, area.max_y() - d, d, d));
                vec![(pin, Part::Fill), (pointer, Part::Fill)]
            }
            NeedleKind::MiddlePin => {
                let mid_y = area.center_y();
                let len = (area.width / 10.0).max(2.0);
                let pointer = Path::polygon(&[
                    DVec2::new(mid_x - len, mid_y - len),
                    DVec2::new(mid_x + len, mid_y - len),
                    DVec2::new(mid_x, area.min_y()),
                ]);
                let d = 4.0 * len;
                let pin = Path::ellipse(Rect::new(mid_x - d / 2.0, mid_y - d, d, d));
                vec![(pin, Part::Fill), (pointer, Part::Fill)]
            }
            NeedleKind::Plum => {
                let radius = area.height;
                let half = area.width / 2.0;
                let bounds = Rect::new(mid_x - radius, area.min_y() - radius, 2.0 * radius, 2.0 * radius);
                let spread = (half / radius).clamp(-1.0, 1.0).asin().to_degrees();
                vec![(Path::arc(bounds, 270.0 - spread, 2.0 * spread, ArcType::Pie), Part::Fill)]
            }
            NeedleKind::Pointer => {
                let mid_y = area.center_y();
                let left = DVec2::new(area.min_x(), mid_y);
                let right = DVec2::new(area.max_x(), mid_y);
                vec![
                    (Path::polygon(&[left, DVec2::new(mid_x, area.min_y()), right]), Part::Fill),
                    (Path::polygon(&[left, DVec2::new(mid_x, area.max_y()), right]), Part::Highlight),
                ]
            }
            NeedleKind::Ship => {
                // Hull drawn in a 10 x 7 unit box anchored at the bottom-left corner.
                let sx = area.width / 10.0;
                let sy = area.height / 7.0;
                let frame = |x: f64| Rect::new(area.min_x() + x * sx, area.max_y() - 7.0 * sy, 10.0 * sx, 14.0 * sy);
                let mut hull = Path::new();
                hull.append_arc(frame(-9.0), 0.0, 25.5, false);
                hull.append_arc(frame(0.0), 154.5, 25.5, true);
                hull.close();
                vec![(hull, Part::Fill)]
            }
        }
    }

    fn arrow(&self, area: Rect, at_top: bool) -> Vec<(Path, Part)> {
        let x = area.center_x();
        let (tip, base_y) = if at_top {
            (DVec2::new(x, area.min_y()), area.min_y() + 4.0 * self.size)
        } else {
            (DVec2::new(x, area.max_y()), area.max_y() - 4.0 * self.size)
        };
        let shaft = Path::line(DVec2::new(x, area.min_y()), DVec2::new(x, area.max_y()));
        let head = Path::polygon(&[
            tip,
            DVec2::new(x + self.size, base_y),
            DVec2::new(x - self.size, base_y),
        ]);
        vec![(shaft, Part::Line), (head, Part::Fill)]
    }

    /// The needle's parts rotated `angle` degrees clockwise about the pivot.
    pub fn outline(&self, area: Rect, angle: f64) -> Vec<Path> {
        let pivot = self.pivot(area);
        self.parts(area)
            .into_iter()
            .map(|(p, _)| p.rotate(pivot, angle.to_radians()))
            .collect()
    }

    pub fn draw(&self, g: &mut dyn Graphics, area: Rect, angle: f64) {
        let pivot = self.pivot(area);
        let radians = angle.to_radians();
        let thin = Stroke::solid(1.0);
        for (path, part) in self.parts(area) {
            let path = if radians != 0.0 { path.rotate(pivot, radians) } else { path };
            let fill = match part {
                Part::Fill => self.fill_paint,
                Part::Highlight => self.highlight_paint,
                Part::Outline => self.outline_paint,
                Part::Line => None,
            };
            if let Some(fill) = fill {
                g.fill_path(&path, fill);
            }
            if let Some(outline) = self.outline_paint {
                let stroke = match part {
                    Part::Line => &self.outline_stroke,
                    _ => &thin,
                };
                g.stroke_path(&path, outline, stroke);
            }
        }
    }
}

/// Text shown under the rose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CompassLabelType {
    #[default]
    None,
    /// The first dataset's value.
    Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompassPlot {
    pub base: PlotBase,
    datasets: Vec<ValueDataset>,
    /// Needle per dataset; reused cyclically when there are more datasets.
    pub needles: Vec<MeterNeedle>,
    pub rose_paint: Color,
    pub rose_center_paint: Color,
    pub rose_highlight_paint: Color,
    /// Value corresponding to one full turn.
    revolution_distance: f64,
    pub draw_border: bool,
    pub label_type: CompassLabelType,
    pub label_font: Font,
    pub compass_font: Font,
}

impl Default for CompassPlot {
    fn default() -> Self {
        Self {
            base: PlotBase::default(),
            datasets: Vec::new(),
            needles: vec![MeterNeedle::new(NeedleKind::Arrow)],
            rose_paint: Color::YELLOW,
            rose_center_paint: Color::WHITE,
            rose_highlight_paint: Color::BLACK,
            revolution_distance: 360.0,
            draw_border: false,
            label_type: CompassLabelType::None,
            label_font: Font::new(12.0),
            compass_font: Font::bold(10.0),
        }
    }
}

impl CompassPlot {
    pub fn new(dataset: ValueDataset) -> Self {
        Self {
            datasets: vec![dataset],
            ..Self::default()
        }
    }

    /// Add a dataset drawn with `needle`; returns its index.
    pub fn add_dataset(&mut self, dataset: ValueDataset, needle: MeterNeedle) -> usize {
        self.datasets.push(dataset);
        let index = self.datasets.len() - 1;
        if self.needles.len() <= index {
            self.needles.resize(index, MeterNeedle::default());
            self.needles.push(needle);
        } else {
            self.needles[index] = needle;
        }
        index
    }

    pub fn datasets(&self) -> &[ValueDataset] {
        &self.datasets
    }

    pub fn dataset_mut(&mut self, index: usize) -> Result<&mut ValueDataset> {
        self.datasets.get_mut(index).ok_or(ChartError::DatasetIndex(index))
    }

    /// Replace the needle style for series `index`.
    pub fn set_series_needle(&mut self, index: usize, kind: NeedleKind) {
        if self.needles.len() <= index {
            self.needles.resize(index + 1, MeterNeedle::default());
        }
        self.needles[index] = MeterNeedle::new(kind);
    }

    pub fn revolution_distance(&self) -> f64 {
        self.revolution_distance
    }

    pub fn set_revolution_distance(&mut self, distance: f64) -> Result<()> {
        if !(distance > 0.0) {
            return Err(ChartError::invalid("revolution_distance", "must be positive"));
        }
        self.revolution_distance = distance;
        Ok(())
    }

    /// Needle angle in degrees clockwise from north.
    pub fn needle_angle(&self, value: f64) -> f64 {
        (value % self.revolution_distance) / self.revolution_distance * 360.0
    }

    fn draw_rose(&self, g: &mut dyn Graphics, center: DVec2, radius: f64) {
        let circle = |inset: f64| Path::circle(center, radius - inset);
        let mut ring = circle(0.0);
        ring.extend(&circle(15.0));
        g.fill_path(&ring, self.rose_paint);
        g.fill_path(&circle(15.0), self.rose_center_paint);

        let thin = Stroke::solid(1.0);
        for inset in [0.0, 10.0, 15.0, 40.0] {
            if radius > inset {
                g.stroke_path(&circle(inset), self.rose_highlight_paint, &thin);
            }
        }

        let compass_point = |deg: f64, r: f64| {
            let a = deg.to_radians();
            center - DVec2::new(a.sin(), a.cos()) * r
        };
        let (outer, inner) = (radius - 20.0, radius - 32.0);
        for step in 0..24 {
            let w = f64::from(step) * 15.0;
            g.draw_line(compass_point(w, inner), compass_point(w, outer), self.rose_highlight_paint, &thin);
        }
        for step in 0..4 {
            let w = 45.0 + f64::from(step) * 90.0;
            g.fill_path(&Path::circle(compass_point(w, radius - 26.0), 7.0), self.rose_highlight_paint);
        }

        let label_r = radius - 7.5;
        for (text, pos) in [
            ("N", DVec2::new(center.x, center.y - label_r)),
            ("E", DVec2::new(center.x + label_r, center.y)),
            ("S", DVec2::new(center.x, center.y + label_r)),
            ("W", DVec2::new(center.x - label_r, center.y)),
        ] {
            g.draw_text(&TextItem::new(text, pos, &self.compass_font, self.rose_highlight_paint));
        }
    }
}

impl Plot for CompassPlot {
    fn plot_type(&self) -> &'static str {
        "Compass Plot"
    }

    fn base(&self) -> &PlotBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut PlotBase {
        &mut self.base
    }

    fn draw(&self, g: &mut dyn Graphics, area: Rect, _anchor: Option<DVec2>, info: &mut PlotRenderingInfo) {
        let area = self.base.insets.trim(area);
        info.plot_area = area;
        info.data_area = area;
        if self.draw_border {
            self.base.fill_background(g, area);
        }

        let radius = (area.width.min(area.height) / 2.0).floor() - 1.0;
        if radius <= 0.0 {
            return;
        }
        let center = area.center();
        self.draw_rose(g, center, radius);

        let needle_area = Rect::new(center.x - radius / 6.0, center.y - radius / 2.0, radius / 3.0, radius);
        if !self.needles.is_empty() {
            for (i, dataset) in self.datasets.iter().enumerate().rev() {
                let Some(value) = dataset.value.filter(|v| v.is_finite()) else {
                    trace!(dataset = i, "no value for needle");
                    continue;
                };
                let needle = &self.needles[i % self.needles.len()];
                needle.draw(g, needle_area, self.needle_angle(value));
            }
        }

        if self.label_type == CompassLabelType::Value
            && let Some(value) = self.datasets.first().and_then(|d| d.value)
        {
            let pos = DVec2::new(center.x, center.y + radius / 2.0 + 4.0);
            g.draw_text(
                &TextItem::new(format_number(value), pos, &self.label_font, self.rose_highlight_paint)
                    .with_anchor(TextAnchor::TopCenter),
            );
        }

        if self.draw_border {
            self.base.draw_outline(g, area);
        }
    }

    fn legend_items(&self) -> Vec<LegendItem> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::RecordingCanvas;

    #[test]
    fn angle_wraps_at_revolution_distance() {
        let mut plot = CompassPlot::default();
        assert_eq!(plot.needle_angle(90.0), 90.0);
        assert_eq!(plot.needle_angle(450.0), 90.0);
        plot.set_revolution_distance(100.0).unwrap();
        assert_eq!(plot.needle_angle(25.0), 90.0);
        assert!(plot.set_revolution_distance(0.0).is_err());
    }

    #[test]
    fn east_needle_points_right() {
        let needle = MeterNeedle::new(NeedleKind::Arrow);
        let area = Rect::new(90.0, 50.0, 20.0, 100.0);
        let head = &needle.outline(area, 90.0)[1];
        let tip = head.flatten()[0][0];
        assert!((tip - DVec2::new(150.0, 100.0)).length() < 1e-9);
    }

    #[test]
    fn rose_has_ticks_dots_and_cardinal_labels() {
        let plot = CompassPlot::new(ValueDataset::new(45.0));
        let mut g = RecordingCanvas::new();
        let mut info = PlotRenderingInfo::new();
        plot.draw(&mut g, Rect::new(0.0, 0.0, 216.0, 208.0), None, &mut info);
        let labels: Vec<_> = g.texts().map(|t| t.content.as_str()).collect();
        assert_eq!(labels, ["N", "E", "S", "W"]);
        let dots = g
            .fills()
            .filter(|(p, c)| *c == plot.rose_highlight_paint && p.bounds().width < 15.0)
            .count();
        assert_eq!(dots, 4);
        let ticks = g.strokes().filter(|(p, _)| p.commands().len() == 2).count();
        assert!(ticks >= 24);
    }

    #[test]
    fn needle_per_dataset_cycles() {
        let mut plot = CompassPlot::new(ValueDataset::new(0.0));
        plot.add_dataset(ValueDataset::new(180.0), MeterNeedle::new(NeedleKind::Pointer));
        plot.add_dataset(ValueDataset::new(None), MeterNeedle::new(NeedleKind::Line));
        assert_eq!(plot.needles.len(), 3);
        plot.needles.truncate(2);
        let mut g = RecordingCanvas::new();
        plot.draw(&mut g, Rect::new(0.0, 0.0, 200.0, 200.0), None, &mut PlotRenderingInfo::new());
        // The pointer's red tip is drawn for dataset 1; dataset 2 has no value.
        assert!(g.fills().any(|(_, c)| c == Color::RED));
        assert!(plot.dataset_mut(5).is_err());
    }

    #[test]
    fn every_needle_kind_has_geometry() {
        let area = Rect::new(0.0, 0.0, 20.0, 60.0);
        for kind in [
            NeedleKind::Arrow,
            NeedleKind::Line,
            NeedleKind::Long,
            NeedleKind::Pin,
            NeedleKind::Plum,
            NeedleKind::Pointer,
            NeedleKind::Ship,
            NeedleKind::Wind,
            NeedleKind::MiddlePin,
        ] {
            let parts = MeterNeedle::new(kind).outline(area, 30.0);
            assert!(!parts.is_empty(), "{kind:?}");
            assert!(parts.iter().all(|p| !p.is_empty()), "{kind:?}");
        }
    }

    #[test]
    fn value_label_is_optional() {
        let mut plot = CompassPlot::new(ValueDataset::new(12.5));
        plot.label_type = CompassLabelType::Value;
        let mut g = RecordingCanvas::new();
        plot.draw(&mut g, Rect::new(0.0, 0.0, 200.0, 200.0), None, &mut PlotRenderingInfo::new());
        assert!(g.texts().any(|t| t.content == "12.5"));
    }
}
