//! Pie charts drawn as rings (doughnuts).
use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::dataset::PieDataset;
use crate::geometry::{Insets, Rect, extend_line};
use crate::graphics::{Graphics, TextItem};
use crate::info::PlotRenderingInfo;
use crate::legend::LegendItem;
use crate::pie_plot::{PiePlot, PiePlotState, Section, SectionPainter};
use crate::plot::{Plot, PlotBase};
use crate::shape::{Path, arc_point};
use crate::style::{Font, Stroke};

/// Text shown in the hole of the ring.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum CenterText {
    #[default]
    None,
    Fixed(String),
    /// The value of the first section, two decimals.
    FirstValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingPlot {
    pub pie: PiePlot,
    /// Ring thickness as a fraction of the pie radius.
    pub section_depth: f64,
    pub separators_visible: bool,
    pub separator_paint: Color,
    pub separator_stroke: Stroke,
    /// How far separators reach into the hole, as a fraction of their length.
    pub inner_separator_extension: f64,
    /// How far separators reach past the rim, as a fraction of their length.
    pub outer_separator_extension: f64,
    pub center_text: CenterText,
    pub center_text_font: Font,
    pub center_text_paint: Color,
}

impl Default for RingPlot {
    fn default() -> Self {
        Self::new(PieDataset::new())
    }
}

impl RingPlot {
    pub fn new(dataset: PieDataset) -> Self {
        Self {
            pie: PiePlot::new(dataset),
            section_depth: 0.2,
            separators_visible: true,
            separator_paint: Color::GRAY,
            separator_stroke: Stroke::solid(0.5),
            inner_separator_extension: 0.2,
            outer_separator_extension: 0.2,
            center_text: CenterText::None,
            center_text_font: Font::bold(12.0),
            center_text_paint: Color::BLACK,
        }
    }

    pub fn with_section_depth(mut self, depth: f64) -> Self {
        self.section_depth = depth;
        self
    }

    pub fn with_center_text(mut self, text: CenterText) -> Self {
        self.center_text = text;
        self
    }

    /// Annulus for one section plus the separator along its leading edge
    /// (inner arc end to outer arc start).
    pub fn section_shape(&self, arc_bounds: Rect, angle1: f64, extent: f64) -> (Path, (DVec2, DVec2)) {
        let depth = self.section_depth / 2.0;
        let inner = Insets::relative(depth, depth, depth, depth).trim(arc_bounds);
        let mut path = Path::new();
        path.append_arc(arc_bounds, angle1, extent, false);
        path.append_arc(inner, angle1 + extent, -extent, true);
        path.close();
        let separator = (arc_point(inner, angle1), arc_point(arc_bounds, angle1));
        (path, separator)
    }

    fn center_text(&self) -> Option<String> {
        match &self.center_text {
            CenterText::None => None,
            CenterText::Fixed(text) => Some(text.clone()),
            CenterText::FirstValue => self.pie.dataset.value_at(0).map(|v| format!("{v:.2}")),
        }
    }
}

impl SectionPainter for RingPlot {
    fn passes(&self) -> usize {
        3
    }

    fn link_depth(&self, pie: &PiePlot) -> f64 {
        pie.label_link_depth.min(self.section_depth / 2.0)
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
        let (path, (from, to)) = self.section_shape(section.arc_bounds, section.angle1, section.extent);
        match pass {
            0 => pie.draw_shadow(g, &path),
            1 => {
                pie.fill_section(g, &path, section);
                pie.add_section_entity(info, path, section);
            }
            2 if self.separators_visible => {
                let (a, b) = extend_line(from, to, self.inner_separator_extension, self.outer_separator_extension);
                g.draw_line(a, b, self.separator_paint, &self.separator_stroke);
            }
            _ => {}
        }
    }
}

impl Plot for RingPlot {
    fn plot_type(&self) -> &'static str {
        "Ring"
    }

    fn base(&self) -> &PlotBase {
        &self.pie.base
    }

    fn base_mut(&mut self) -> &mut PlotBase {
        &mut self.pie.base
    }

    fn draw(&self, g: &mut dyn Graphics, area: Rect, _anchor: Option<DVec2>, info: &mut PlotRenderingInfo) {
        if self.pie.draw_with(g, area, info, self).is_some()
            && let Some(text) = self.center_text()
        {
            let center = info.plot_area.center();
            g.draw_text(&TextItem::new(text, center, &self.center_text_font, self.center_text_paint));
        }
    }

    fn legend_items(&self) -> Vec<LegendItem> {
        self.pie.legend_items()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityKind;
    use crate::graphics::RecordingCanvas;

    fn ring() -> RingPlot {
        RingPlot::new(PieDataset::new().with_value("A", 1.0).with_value("B", 3.0))
    }

    #[test]
    fn hole_is_not_part_of_any_section() {
        let plot = ring();
        let mut g = RecordingCanvas::new();
        let mut info = PlotRenderingInfo::new();
        plot.draw(&mut g, Rect::new(0.0, 0.0, 416.0, 308.0), None, &mut info);
        assert_eq!(info.entities.len(), 2);
        let c = info.plot_area.center();
        assert!(info.entity_at(c).is_none());
        // Just inside the rim on the right belongs to A.
        let radius = plot.pie.layout(info.plot_area).pie_w_radius;
        let hit = info.entity_at(c + DVec2::new(radius * 0.95, -1.0)).unwrap();
        assert!(matches!(&hit.kind, EntityKind::PieSection { key, .. } if key == "A"));
    }

    #[test]
    fn separator_runs_from_inner_to_outer_edge() {
        let plot = ring();
        let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
        let (_, (inner, outer)) = plot.section_shape(bounds, 90.0, -90.0);
        assert!((inner.y - 10.0).abs() < 1e-9);
        assert!(outer.y.abs() < 1e-9);
        assert!((inner.x - 50.0).abs() < 1e-9);
    }

    #[test]
    fn three_passes_draw_separators() {
        let plot = ring();
        let mut g = RecordingCanvas::new();
        let mut info = PlotRenderingInfo::new();
        plot.draw(&mut g, Rect::new(0.0, 0.0, 416.0, 308.0), None, &mut info);
        let separators = g.strokes().filter(|(_, c)| *c == plot.separator_paint).count();
        // Two section outlines plus two separators, all grey.
        assert!(separators >= 4);
    }

    #[test]
    fn center_text_shows_first_value() {
        let plot = ring().with_center_text(CenterText::FirstValue);
        let mut g = RecordingCanvas::new();
        let mut info = PlotRenderingInfo::new();
        plot.draw(&mut g, Rect::new(0.0, 0.0, 300.0, 300.0), None, &mut info);
        let t = g.texts().find(|t| t.content == "1.00").unwrap();
        assert_eq!(t.position, info.plot_area.center());
    }

    #[test]
    fn link_depth_is_capped_by_section_depth() {
        let plot = ring().with_section_depth(0.1);
        assert_eq!(plot.link_depth(&plot.pie), 0.05);
    }
}
