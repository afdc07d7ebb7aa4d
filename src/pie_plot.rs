//! Pie charts.
//!
//! The plot area is split into three nested regions: the *link area* (where
//! label links bend towards their labels), the *explode area* (the outer limit
//! for exploded sections) and the *pie area* (regular sections). Labels either
//! sit beside the pie, de-overlapped by [`PieLabelDistributor`], or directly on
//! the sections when `simple_labels` is set.
use glam::DVec2;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::color::Color;
use crate::dataset::PieDataset;
use crate::drawing_supplier::DrawingSupplier;
use crate::entity::{ChartEntity, EntityKind};
use crate::error::{ChartError, Result};
use crate::geometry::{Insets, Rect, RectangleAnchor};
use crate::graphics::{Graphics, TextItem};
use crate::info::PlotRenderingInfo;
use crate::labels::PieSectionLabelGenerator;
use crate::legend::LegendItem;
use crate::pie_label::{PieLabelDistributor, PieLabelRecord};
use crate::plot::{Plot, PlotBase};
use crate::shape::{ArcType, MarkerShape, Path, arc_point};
use crate::style::{Font, Stroke};
use crate::text::TextBox;

/// Largest accepted interior gap.
pub const MAX_INTERIOR_GAP: f64 = 0.4;

/// Direction in which sections follow each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    Clockwise,
    Anticlockwise,
}

impl Rotation {
    /// Sign applied to angles: arcs run anticlockwise for positive extents.
    pub fn factor(self) -> f64 {
        match self {
            Self::Clockwise => -1.0,
            Self::Anticlockwise => 1.0,
        }
    }
}

/// Shape of the line joining a section to its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PieLabelLinkStyle {
    /// Three straight segments.
    #[default]
    Standard,
    QuadCurve,
    CubicCurve,
}

/// Regions computed for one draw of a pie.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PiePlotState {
    pub passes_required: usize,
    pub total: f64,
    pub link_area: Rect,
    pub explode_area: Rect,
    pub pie_area: Rect,
    pub pie_center: DVec2,
    pub pie_w_radius: f64,
    pub pie_h_radius: f64,
}

/// One visible section as handed to a [`SectionPainter`].
#[derive(Debug, Clone)]
pub(crate) struct Section<'a> {
    pub index: usize,
    pub key: &'a str,
    pub angle1: f64,
    pub extent: f64,
    pub arc_bounds: Rect,
}

/// Draws the sections of a pie-like plot, one pass at a time.
pub(crate) trait SectionPainter {
    fn passes(&self) -> usize;

    fn link_depth(&self, pie: &PiePlot) -> f64 {
        pie.label_link_depth
    }

    fn paint_section(
        &self,
        pie: &PiePlot,
        g: &mut dyn Graphics,
        state: &PiePlotState,
        section: &Section<'_>,
        pass: usize,
        info: &mut PlotRenderingInfo,
    );
}

/// Plain wedges: pass 0 shadows, pass 1 fills.
struct WedgePainter;

impl SectionPainter for WedgePainter {
    fn passes(&self) -> usize {
        2
    }

    fn paint_section(
        &self,
        pie: &PiePlot,
        g: &mut dyn Graphics,
        _state: &PiePlotState,
        section: &Section<'_>,
        pass: usize,
        info: &mut PlotRenderingInfo,
    ) {
        let arc = Path::arc(section.arc_bounds, section.angle1, section.extent, ArcType::Pie);
        match pass {
            0 => pie.draw_shadow(g, &arc),
            1 => {
                pie.fill_section(g, &arc, section);
                pie.add_section_entity(info, arc, section);
            }
            _ => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PiePlot {
    pub base: PlotBase,
    pub dataset: PieDataset,
    /// Identifies this pie in entities when several pies share a chart.
    pub pie_index: usize,
    /// Vertical space (fraction of plot height) kept clear above and below the pie.
    interior_gap: f64,
    /// Force the pie to be a circle rather than an ellipse.
    pub circular: bool,
    /// Angle of the first section's leading edge, in degrees (90 = 12 o'clock).
    pub start_angle: f64,
    pub direction: Rotation,
    pub section_paints: IndexMap<String, Color>,
    pub section_outlines_visible: bool,
    pub section_outline_paints: IndexMap<String, Color>,
    pub default_section_outline_paint: Color,
    pub default_section_outline_stroke: Stroke,
    pub shadow_paint: Option<Color>,
    pub shadow_x_offset: f64,
    pub shadow_y_offset: f64,
    /// Per-key explode fractions (relative to the pie radius).
    pub explode_percentages: IndexMap<String, f64>,
    pub ignore_null_values: bool,
    pub ignore_zero_values: bool,
    /// Sections sweeping fewer degrees than this are skipped.
    pub minimum_arc_angle_to_draw: f64,
    pub label_generator: Option<PieSectionLabelGenerator>,
    pub legend_label_generator: PieSectionLabelGenerator,
    pub tooltip_generator: Option<PieSectionLabelGenerator>,
    pub label_font: Font,
    pub label_paint: Color,
    pub label_background_paint: Option<Color>,
    pub label_outline_paint: Option<Color>,
    pub label_outline_stroke: Stroke,
    pub label_padding: Insets,
    /// Fraction of the plot width reserved for each column of labels.
    pub maximum_label_width: f64,
    /// Fraction of the plot width between the link area and the labels.
    pub label_gap: f64,
    pub simple_labels: bool,
    pub simple_label_offset: Insets,
    pub label_links_visible: bool,
    pub label_link_style: PieLabelLinkStyle,
    pub label_link_margin: f64,
    pub label_link_depth: f64,
    pub label_link_paint: Color,
    pub label_link_stroke: Stroke,
    #[serde(skip)]
    pub label_distributor: PieLabelDistributor,
}

impl Default for PiePlot {
    fn default() -> Self {
        Self::new(PieDataset::new())
    }
}

impl PiePlot {
    pub fn new(dataset: PieDataset) -> Self {
        Self {
            base: PlotBase::default(),
            dataset,
            pie_index: 0,
            interior_gap: 0.08,
            circular: true,
            start_angle: 90.0,
            direction: Rotation::Clockwise,
            section_paints: IndexMap::new(),
            section_outlines_visible: true,
            section_outline_paints: IndexMap::new(),
            default_section_outline_paint: Color::GRAY,
            default_section_outline_stroke: Stroke::solid(0.5),
            shadow_paint: Some(Color::GRAY),
            shadow_x_offset: 4.0,
            shadow_y_offset: 4.0,
            explode_percentages: IndexMap::new(),
            ignore_null_values: false,
            ignore_zero_values: false,
            minimum_arc_angle_to_draw: 0.00001,
            label_generator: Some(PieSectionLabelGenerator::default()),
            legend_label_generator: PieSectionLabelGenerator::default(),
            tooltip_generator: Some(PieSectionLabelGenerator::tooltips()),
            label_font: Font::new(10.0),
            label_paint: Color::BLACK,
            label_background_paint: Some(Color::from_rgb8(255, 255, 192)),
            label_outline_paint: Some(Color::BLACK),
            label_outline_stroke: Stroke::solid(0.5),
            label_padding: Insets::uniform(2.0),
            maximum_label_width: 0.14,
            label_gap: 0.025,
            simple_labels: false,
            simple_label_offset: Insets::relative(0.18, 0.18, 0.18, 0.18),
            label_links_visible: true,
            label_link_style: PieLabelLinkStyle::Standard,
            label_link_margin: 0.025,
            label_link_depth: 0.1,
            label_link_paint: Color::BLACK,
            label_link_stroke: Stroke::solid(0.5),
            label_distributor: PieLabelDistributor::new(),
        }
    }

    pub fn interior_gap(&self) -> f64 {
        self.interior_gap
    }

    pub fn set_interior_gap(&mut self, gap: f64) -> Result<()> {
        if !(0.0..=MAX_INTERIOR_GAP).contains(&gap) {
            return Err(ChartError::invalid(
                "interior_gap",
                format!("{gap} is outside 0..={MAX_INTERIOR_GAP}"),
            ));
        }
        self.interior_gap = gap;
        Ok(())
    }

    pub fn with_start_angle(mut self, degrees: f64) -> Self {
        self.start_angle = degrees;
        self
    }

    pub fn with_direction(mut self, direction: Rotation) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_simple_labels(mut self, simple: bool) -> Self {
        self.simple_labels = simple;
        self
    }

    pub fn with_circular(mut self, circular: bool) -> Self {
        self.circular = circular;
        self
    }

    pub fn set_section_paint(&mut self, key: impl Into<String>, paint: Color) {
        self.section_paints.insert(key.into(), paint);
    }

    pub fn set_section_outline_paint(&mut self, key: impl Into<String>, paint: Color) {
        self.section_outline_paints.insert(key.into(), paint);
    }

    /// Explode the section `key` by `percent` of the pie radius. Zero removes it.
    pub fn set_explode_percent(&mut self, key: impl Into<String>, percent: f64) {
        let key = key.into();
        if percent == 0.0 {
            self.explode_percentages.shift_remove(&key);
        } else {
            self.explode_percentages.insert(key, percent.max(0.0));
        }
    }

    pub fn explode_percent(&self, key: &str) -> f64 {
        self.explode_percentages.get(key).copied().unwrap_or(0.0)
    }

    /// The largest explode percent among the dataset's keys.
    pub fn maximum_explode_percent(&self) -> f64 {
        self.dataset
            .keys()
            .map(|k| self.explode_percent(k))
            .fold(0.0, f64::max)
    }

    /// Give every key without an explicit paint the supplier's next paint.
    pub fn auto_populate_section_paints(&mut self) {
        let keys: Vec<String> = self.dataset.keys().map(str::to_owned).collect();
        for key in keys {
            if !self.section_paints.contains_key(&key) {
                let paint = self.base.drawing_supplier.next_paint();
                self.section_paints.insert(key, paint);
            }
        }
    }

    pub fn section_paint(&self, key: &str) -> Color {
        self.section_paints.get(key).copied().unwrap_or_else(|| {
            let index = self.dataset.index_of(key).unwrap_or(0);
            self.base.drawing_supplier.paint(index)
        })
    }

    pub fn section_outline_paint(&self, key: &str) -> Color {
        self.section_outline_paints
            .get(key)
            .copied()
            .unwrap_or(self.default_section_outline_paint)
    }

    /// True when at least one section has a positive value.
    pub fn has_data(&self) -> bool {
        self.dataset.iter().any(|(_, v)| v.is_some_and(|v| v > 0.0))
    }

    fn include(&self, value: Option<f64>) -> bool {
        match value {
            None => !self.ignore_null_values,
            Some(v) if self.ignore_zero_values => v > 0.0,
            Some(v) => v >= 0.0,
        }
    }

    /// Compute the link, explode and pie areas for `plot_area` (insets already removed).
    pub fn layout(&self, plot_area: Rect) -> PiePlotState {
        let label_reserve = if self.label_generator.is_some() && !self.simple_labels {
            self.label_gap + self.maximum_label_width
        } else {
            0.0
        };
        let gap_h = plot_area.width * label_reserve * 2.0;
        let gap_v = plot_area.height * self.interior_gap * 2.0;
        let mut link = Rect::new(
            plot_area.x + gap_h / 2.0,
            plot_area.y + gap_v / 2.0,
            plot_area.width - gap_h,
            plot_area.height - gap_v,
        );
        if self.circular {
            let min = link.width.min(link.height) / 2.0;
            link = Rect::new(link.center_x() - min, link.center_y() - min, 2.0 * min, 2.0 * min);
        }

        let lm = if self.simple_labels {
            0.0
        } else {
            self.label_link_margin
        };
        let hh = link.width * lm * 2.0;
        let vv = link.height * lm * 2.0;
        let explode = Rect::new(link.x + hh / 2.0, link.y + vv / 2.0, link.width - hh, link.height - vv);

        let mep = self.maximum_explode_percent();
        let percent = mep / (1.0 + mep);
        let h1 = explode.width * percent;
        let v1 = explode.height * percent;
        let pie = Rect::new(
            explode.x + h1 / 2.0,
            explode.y + v1 / 2.0,
            explode.width - h1,
            explode.height - v1,
        );

        PiePlotState {
            passes_required: 2,
            total: self.dataset.total(),
            link_area: link,
            explode_area: explode,
            pie_area: pie,
            pie_center: pie.center(),
            pie_w_radius: pie.width / 2.0,
            pie_h_radius: pie.height / 2.0,
        }
    }

    /// Bounds for a section's arc, shifted outwards when exploded.
    /// `explode` is the section's explode percent relative to the maximum.
    pub fn arc_bounds(unexploded: Rect, exploded: Rect, angle: f64, extent: f64, explode: f64) -> Rect {
        if explode == 0.0 {
            return unexploded;
        }
        let mid = angle + extent / 2.0;
        let p1 = arc_point(unexploded, mid);
        let p2 = arc_point(exploded, mid);
        let delta = (p1 - p2) * explode;
        unexploded.translate(-delta.x, -delta.y)
    }

    pub(crate) fn draw_shadow(&self, g: &mut dyn Graphics, shape: &Path) {
        if let Some(shadow) = self.shadow_paint {
            let offset = DVec2::new(self.shadow_x_offset, self.shadow_y_offset);
            g.fill_path(&shape.translate(offset), self.base.fg(shadow));
        }
    }

    pub(crate) fn fill_section(&self, g: &mut dyn Graphics, shape: &Path, section: &Section<'_>) {
        g.fill_path(shape, self.base.fg(self.section_paint(section.key)));
        if self.section_outlines_visible {
            g.stroke_path(
                shape,
                self.section_outline_paint(section.key),
                &self.default_section_outline_stroke,
            );
        }
    }

    pub(crate) fn add_section_entity(&self, info: &mut PlotRenderingInfo, shape: Path, section: &Section<'_>) {
        let tooltip = self
            .tooltip_generator
            .as_ref()
            .and_then(|t| t.generate(&self.dataset, section.key));
        info.entities.add(
            ChartEntity::new(
                shape,
                EntityKind::PieSection {
                    pie_index: self.pie_index,
                    section_index: section.index,
                    key: section.key.to_owned(),
                },
            )
            .with_tooltip(tooltip),
        );
    }

    /// Frame, background and the pie itself. Returns the layout when something was drawn.
    pub(crate) fn draw_with(
        &self,
        g: &mut dyn Graphics,
        area: Rect,
        info: &mut PlotRenderingInfo,
        painter: &dyn SectionPainter,
    ) -> Option<PiePlotState> {
        let area = self.base.insets.trim(area);
        info.plot_area = area;
        info.data_area = area;
        self.base.fill_background(g, area);
        self.base.draw_outline(g, area);
        if !self.has_data() {
            self.base.draw_no_data_message(g, area);
            return None;
        }
        g.push_clip(area);
        let state = self.draw_pie(g, area, info, painter);
        g.pop_clip();
        Some(state)
    }

    fn draw_pie(
        &self,
        g: &mut dyn Graphics,
        plot_area: Rect,
        info: &mut PlotRenderingInfo,
        painter: &dyn SectionPainter,
    ) -> PiePlotState {
        let mut state = self.layout(plot_area);
        state.passes_required = painter.passes();
        debug!(
            pie = ?state.pie_area,
            link = ?state.link_area,
            total = state.total,
            "pie layout"
        );
        let mep = self.maximum_explode_percent();
        for pass in 0..state.passes_required {
            let mut latest = self.start_angle;
            for (index, (key, value)) in self.dataset.iter().enumerate() {
                let Some(value) = value.filter(|v| *v > 0.0) else {
                    continue;
                };
                let angle1 = latest;
                let angle2 = angle1 + self.direction.factor() * value / state.total * 360.0;
                latest = angle2;
                let extent = angle2 - angle1;
                if extent.abs() <= self.minimum_arc_angle_to_draw {
                    trace!(key, extent, "section too small to draw");
                    continue;
                }
                let ep = if mep > 0.0 {
                    self.explode_percent(key) / mep
                } else {
                    0.0
                };
                let section = Section {
                    index,
                    key,
                    angle1,
                    extent,
                    arc_bounds: Self::arc_bounds(state.pie_area, state.explode_area, angle1, extent, ep),
                };
                painter.paint_section(self, g, &state, &section, pass, info);
            }
        }

        if self.simple_labels {
            self.draw_simple_labels(g, &state);
        } else {
            self.draw_labels(g, plot_area, &state, painter.link_depth(self));
        }
        state
    }

    /// Mid angle (degrees) of every section that gets a label.
    fn label_angles(&self, total: f64) -> Vec<(&str, f64)> {
        let mut running = 0.0;
        let mut out = Vec::new();
        for (key, value) in self.dataset.iter() {
            if !self.include(value) {
                continue;
            }
            let v = value.unwrap_or(0.0);
            running += v;
            let mid = self.start_angle + self.direction.factor() * (running - v / 2.0) * 360.0 / total;
            out.push((key, mid));
        }
        out
    }

    fn draw_labels(&self, g: &mut dyn Graphics, plot_area: Rect, state: &PiePlotState, link_depth: f64) {
        let Some(generator) = &self.label_generator else {
            return;
        };
        let (left, right): (Vec<_>, Vec<_>) = self
            .label_angles(state.total)
            .into_iter()
            .partition(|(_, mid)| mid.to_radians().cos() < 0.0);

        let gap = plot_area.width * self.label_gap;
        let ww = state.link_area.x - gap - plot_area.x;
        let label_width = self.label_padding.trim_width(ww);

        for (side, is_left) in [(left, true), (right, false)] {
            let mut distributor = self.label_distributor.clone();
            distributor.clear();
            for (key, mid) in side {
                let Some(text) = generator.generate(&self.dataset, key) else {
                    continue;
                };
                let label = TextBox::wrapped(&text, &self.label_font, self.label_paint, label_width, &*g)
                    .with_background(self.label_background_paint)
                    .with_outline(self.label_outline_paint.map(|p| (p, self.label_outline_stroke.clone())))
                    .with_padding(self.label_padding);
                let theta = mid.to_radians();
                let base_y = state.pie_center.y - theta.sin() * state.link_area.height / 2.0;
                let height = label.height(&*g);
                let cos = if is_left { -theta.cos() } else { theta.cos() };
                distributor.add_record(PieLabelRecord::new(
                    key,
                    mid,
                    base_y,
                    label,
                    height,
                    gap / 2.0 + gap / 2.0 * cos,
                    1.0 - link_depth + self.explode_percent(key),
                ));
            }
            let hh = plot_area.height;
            let v_gap = hh * self.interior_gap;
            distributor.distribute_labels(plot_area.min_y() + v_gap, hh - 2.0 * v_gap);
            for record in distributor.records() {
                self.draw_linked_label(g, state, record, is_left);
            }
        }
    }

    fn draw_linked_label(&self, g: &mut dyn Graphics, state: &PiePlotState, record: &PieLabelRecord, left: bool) {
        let anchor_x = if left {
            state.link_area.min_x()
        } else {
            state.link_area.max_x()
        };
        let target = DVec2::new(
            if left {
                anchor_x - record.gap
            } else {
                anchor_x + record.gap
            },
            record.allocated_y,
        );
        if self.label_links_visible {
            let theta = record.angle.to_radians();
            let (sin, cos) = theta.sin_cos();
            let c = state.pie_center;
            let link = DVec2::new(
                c.x + cos * state.pie_w_radius * record.link_percent,
                c.y - sin * state.pie_h_radius * record.link_percent,
            );
            let elbow = DVec2::new(
                c.x + cos * state.link_area.width / 2.0,
                c.y - sin * state.link_area.height / 2.0,
            );
            let anchor = DVec2::new(anchor_x, elbow.y);
            let path = match self.label_link_style {
                PieLabelLinkStyle::Standard => Path::polyline(&[link, elbow, anchor, target]),
                PieLabelLinkStyle::QuadCurve => {
                    let mut p = Path::new();
                    p.move_to(target);
                    p.cubic_to(
                        target + (anchor - target) * (2.0 / 3.0),
                        elbow + (anchor - elbow) * (2.0 / 3.0),
                        elbow,
                    );
                    p.line_to(link);
                    p
                }
                PieLabelLinkStyle::CubicCurve => {
                    let mut p = Path::new();
                    p.move_to(target);
                    p.cubic_to(anchor, elbow, link);
                    p
                }
            };
            g.stroke_path(&path, self.label_link_paint, &self.label_link_stroke);
        }
        let anchor = if left {
            RectangleAnchor::Right
        } else {
            RectangleAnchor::Left
        };
        record.label.draw(g, target.x, target.y, anchor);
    }

    fn draw_simple_labels(&self, g: &mut dyn Graphics, state: &PiePlotState) {
        let Some(generator) = &self.label_generator else {
            return;
        };
        let labels_area = self.simple_label_offset.trim(state.link_area);
        for (key, mid) in self.label_angles(state.total) {
            let Some(text) = generator.generate(&self.dataset, key) else {
                continue;
            };
            let p = arc_point(labels_area, mid);
            let m = g.measure_text(&text, &self.label_font);
            let bounds = Rect::new(p.x - m.width / 2.0, p.y - m.height / 2.0, m.width, m.height);
            let bg = Rect::new(
                bounds.x - self.label_padding.left_inset(bounds.width),
                bounds.y - self.label_padding.top_inset(bounds.height),
                self.label_padding.extend_width(bounds.width),
                self.label_padding.extend_height(bounds.height),
            );
            if let Some(paint) = self.label_background_paint {
                g.fill_rect(bg, paint);
            }
            if let Some(paint) = self.label_outline_paint {
                g.stroke_rect(bg, paint, &self.label_outline_stroke);
            }
            g.draw_text(&TextItem::new(text, p, &self.label_font, self.label_paint));
        }
    }
}

impl Plot for PiePlot {
    fn plot_type(&self) -> &'static str {
        "Pie"
    }

    fn base(&self) -> &PlotBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut PlotBase {
        &mut self.base
    }

    fn draw(&self, g: &mut dyn Graphics, area: Rect, _anchor: Option<DVec2>, info: &mut PlotRenderingInfo) {
        self.draw_with(g, area, info, &WedgePainter);
    }

    fn legend_items(&self) -> Vec<LegendItem> {
        self.dataset
            .iter()
            .filter(|(_, v)| match v {
                None => !self.ignore_null_values,
                Some(v) if *v == 0.0 => !self.ignore_zero_values,
                Some(v) => *v > 0.0,
            })
            .filter_map(|(key, _)| {
                let label = self.legend_label_generator.generate(&self.dataset, key)?;
                let tooltip = self
                    .tooltip_generator
                    .as_ref()
                    .and_then(|t| t.generate(&self.dataset, key));
                let outline = self
                    .section_outlines_visible
                    .then(|| self.section_outline_paint(key));
                Some(
                    LegendItem::new(label, self.section_paint(key))
                        .with_series_key(key)
                        .with_shape(MarkerShape::Circle)
                        .with_outline(outline)
                        .with_tooltip(tooltip),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::RecordingCanvas;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn two_halves() -> PiePlot {
        PiePlot::new(PieDataset::new().with_value("A", 1.0).with_value("B", 1.0))
    }

    #[test]
    fn layout_reserves_label_columns_and_squares_link_area() {
        let plot = PiePlot::default();
        let s = plot.layout(Rect::new(0.0, 0.0, 400.0, 300.0));
        // Reserve 0.165 of the width each side, 0.08 of the height top and bottom.
        assert!(close(s.link_area.x, 74.0));
        assert!(close(s.link_area.y, 24.0));
        assert!(close(s.link_area.width, 252.0));
        assert!(close(s.link_area.height, 252.0));
        assert!(close(s.explode_area.width, 252.0 * 0.95));
        assert_eq!(s.pie_area, s.explode_area);
        assert_eq!(s.pie_center, DVec2::new(200.0, 150.0));
    }

    #[test]
    fn exploding_a_section_shrinks_the_pie() {
        let mut plot = two_halves();
        plot.set_explode_percent("A", 0.25);
        assert_eq!(plot.maximum_explode_percent(), 0.25);
        let s = plot.layout(Rect::new(0.0, 0.0, 400.0, 300.0));
        assert!(close(s.pie_area.width, s.explode_area.width * 0.8));

        // Section A covers the right half; its bounds move right.
        let moved = PiePlot::arc_bounds(s.pie_area, s.explode_area, 90.0, -180.0, 1.0);
        assert!(moved.x > s.pie_area.x);
        assert!(close(moved.y, s.pie_area.y));
    }

    #[test]
    fn interior_gap_is_validated() {
        let mut plot = PiePlot::default();
        assert!(plot.set_interior_gap(0.5).is_err());
        assert!(plot.set_interior_gap(-0.1).is_err());
        plot.set_interior_gap(0.2).unwrap();
        assert_eq!(plot.interior_gap(), 0.2);
    }

    #[test]
    fn sections_are_clockwise_from_twelve() {
        let plot = two_halves();
        let mut g = RecordingCanvas::new();
        let mut info = PlotRenderingInfo::new();
        plot.draw(&mut g, Rect::new(0.0, 0.0, 416.0, 308.0), None, &mut info);
        assert_eq!(info.entities.len(), 2);
        let c = plot.layout(plot.base.insets.trim(Rect::new(0.0, 0.0, 416.0, 308.0))).pie_center;
        let right = info.entity_at(c + DVec2::new(40.0, 0.0)).unwrap();
        assert!(matches!(&right.kind, EntityKind::PieSection { key, section_index: 0, .. } if key == "A"));
        assert_eq!(right.tooltip.as_deref(), Some("A: (1, 50%)"));
        let left = info.entity_at(c - DVec2::new(40.0, 0.0)).unwrap();
        assert!(matches!(&left.kind, EntityKind::PieSection { key, .. } if key == "B"));
    }

    #[test]
    fn zero_and_missing_values_draw_no_section() {
        let plot = PiePlot::new(
            PieDataset::new()
                .with_value("A", 3.0)
                .with_value("B", 0.0)
                .with_value("C", None),
        );
        let mut g = RecordingCanvas::new();
        let mut info = PlotRenderingInfo::new();
        plot.draw(&mut g, Rect::new(0.0, 0.0, 300.0, 300.0), None, &mut info);
        assert_eq!(info.entities.len(), 1);
    }

    #[test]
    fn linked_labels_sit_on_either_side() {
        let plot = two_halves();
        let mut g = RecordingCanvas::new();
        let mut info = PlotRenderingInfo::new();
        plot.draw(&mut g, Rect::new(0.0, 0.0, 416.0, 308.0), None, &mut info);
        let x_of = |s: &str| g.texts().find(|t| t.content == s).unwrap().position.x;
        assert!(x_of("A") > 208.0);
        assert!(x_of("B") < 208.0);
    }

    #[test]
    fn simple_labels_are_drawn_inside_the_pie() {
        let plot = two_halves().with_simple_labels(true);
        let mut g = RecordingCanvas::new();
        let mut info = PlotRenderingInfo::new();
        let area = Rect::new(0.0, 0.0, 316.0, 308.0);
        plot.draw(&mut g, area, None, &mut info);
        let state = plot.layout(plot.base.insets.trim(area));
        for t in g.texts() {
            assert!(t.position.distance(state.pie_center) < state.pie_w_radius);
        }
    }

    #[test]
    fn empty_dataset_shows_message() {
        let mut plot = PiePlot::default();
        plot.base.no_data_message = Some("Nothing".to_owned());
        let mut g = RecordingCanvas::new();
        let mut info = PlotRenderingInfo::new();
        plot.draw(&mut g, Rect::new(0.0, 0.0, 200.0, 200.0), None, &mut info);
        assert!(info.entities.is_empty());
        assert!(g.texts().any(|t| t.content == "Nothing"));
    }

    #[test]
    fn legend_honours_ignore_flags() {
        let mut plot = PiePlot::new(
            PieDataset::new()
                .with_value("A", 1.0)
                .with_value("B", 0.0)
                .with_value("C", None)
                .with_value("D", -2.0),
        );
        let labels = |p: &PiePlot| p.legend_items().into_iter().map(|i| i.label).collect::<Vec<_>>();
        assert_eq!(labels(&plot), vec!["A", "B", "C"]);
        plot.ignore_zero_values = true;
        plot.ignore_null_values = true;
        assert_eq!(labels(&plot), vec!["A"]);
    }

    #[test]
    fn auto_populate_keeps_explicit_paints() {
        let mut plot = two_halves();
        plot.set_section_paint("B", Color::BLACK);
        plot.auto_populate_section_paints();
        assert_eq!(plot.section_paint("B"), Color::BLACK);
        assert_eq!(plot.section_paint("A"), plot.base.drawing_supplier.paint(0));
    }
}
