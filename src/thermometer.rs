//! A thermometer: bulb, stem and a mercury column filled to the current value.
use glam::DVec2;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::axis::ValueAxis;
use crate::color::Color;
use crate::dataset::{Range, ValueDataset};
use crate::error::{ChartError, Result};
use crate::geometry::{Insets, Rect, RectangleEdge};
use crate::graphics::{Graphics, TextItem};
use crate::info::PlotRenderingInfo;
use crate::legend::LegendItem;
use crate::plot::{Plot, PlotBase};
use crate::shape::Path;
use crate::style::{Font, Stroke, TextAnchor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TemperatureUnit {
    None,
    Fahrenheit,
    #[default]
    Celsius,
    Kelvin,
}

impl TemperatureUnit {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Fahrenheit => "\u{b0}F",
            Self::Celsius => "\u{b0}C",
            Self::Kelvin => "\u{b0}K",
        }
    }
}

/// Where the current value is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ValueLocation {
    None,
    Right,
    Left,
    #[default]
    Bulb,
}

/// Side of the stem carrying the axis, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ThermometerAxisLocation {
    None,
    Left,
    #[default]
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubrangeKind {
    Normal,
    Warning,
    Critical,
}

impl SubrangeKind {
    const ALL: [SubrangeKind; 3] = [Self::Normal, Self::Warning, Self::Critical];

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Subrange {
    /// Values inside this range are painted with `paint`.
    pub range: Range,
    /// Axis range shown while following data inside this subrange.
    pub display: Range,
    pub paint: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThermometerPlot {
    pub base: PlotBase,
    pub dataset: ValueDataset,
    pub range_axis: ValueAxis,
    pub axis_location: ThermometerAxisLocation,
    lower_bound: f64,
    upper_bound: f64,
    pub units: TemperatureUnit,
    pub value_location: ValueLocation,
    pub value_font: Font,
    pub value_paint: Color,
    /// Number of decimals in the value text.
    pub value_decimals: usize,
    pub subranges: [Subrange; 3],
    pub subrange_indicators_visible: bool,
    pub use_subrange_paint: bool,
    pub follow_data_in_subranges: bool,
    pub show_value_lines: bool,
    pub mercury_paint: Color,
    pub thermometer_paint: Color,
    pub thermometer_stroke: Stroke,
    pub bulb_radius: f64,
    pub column_radius: f64,
    pub gap: f64,
}

impl Default for ThermometerPlot {
    fn default() -> Self {
        let sub = |lo, hi, paint| Subrange {
            range: Range::ordered(lo, hi),
            display: Range::ordered(lo, hi),
            paint,
        };
        Self {
            base: PlotBase {
                insets: Insets::relative(0.05, 0.05, 0.05, 0.05),
                ..PlotBase::default()
            },
            dataset: ValueDataset::default(),
            range_axis: ValueAxis::new("").with_range(Range::ordered(0.0, 100.0)),
            axis_location: ThermometerAxisLocation::Right,
            lower_bound: 0.0,
            upper_bound: 100.0,
            units: TemperatureUnit::Celsius,
            value_location: ValueLocation::Bulb,
            value_font: Font::bold(16.0),
            value_paint: Color::WHITE,
            value_decimals: 1,
            subranges: [
                sub(0.0, 50.0, Color::GREEN),
                sub(50.0, 75.0, Color::ORANGE),
                sub(75.0, 100.0, Color::RED),
            ],
            subrange_indicators_visible: true,
            use_subrange_paint: true,
            follow_data_in_subranges: false,
            show_value_lines: false,
            mercury_paint: Color::LIGHT_GRAY,
            thermometer_paint: Color::BLACK,
            thermometer_stroke: Stroke::solid(1.0),
            bulb_radius: 40.0,
            column_radius: 20.0,
            gap: 5.0,
        }
    }
}

/// Screen geometry of one thermometer draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermometerLayout {
    pub mid_x: f64,
    pub stem_top: f64,
    pub stem_bottom: f64,
    /// The strip the value axis maps onto.
    pub data_area: Rect,
    pub outer_bulb: Rect,
    pub inner_bulb: Rect,
}

impl ThermometerPlot {
    pub fn new(dataset: ValueDataset) -> Self {
        Self {
            dataset,
            ..Self::default()
        }
    }

    pub fn bounds(&self) -> Range {
        Range::ordered(self.lower_bound, self.upper_bound)
    }

    /// Set the overall value range, which also becomes the axis range.
    pub fn set_bounds(&mut self, lower: f64, upper: f64) -> Result<()> {
        let range = Range::new(lower, upper)?;
        self.lower_bound = range.lower;
        self.upper_bound = range.upper;
        self.range_axis.set_range(range);
        Ok(())
    }

    pub fn set_subrange(&mut self, kind: SubrangeKind, lower: f64, upper: f64) -> Result<()> {
        let range = Range::new(lower, upper)?;
        self.subranges[kind.index()].range = range;
        Ok(())
    }

    pub fn set_subrange_display(&mut self, kind: SubrangeKind, lower: f64, upper: f64) -> Result<()> {
        let range = Range::new(lower, upper)?;
        self.subranges[kind.index()].display = range;
        Ok(())
    }

    pub fn set_subrange_paint(&mut self, kind: SubrangeKind, paint: Color) {
        self.subranges[kind.index()].paint = paint;
    }

    pub fn set_radii(&mut self, bulb: f64, column: f64, gap: f64) -> Result<()> {
        if !(bulb > 0.0 && column > 0.0 && gap >= 0.0) {
            return Err(ChartError::invalid("radius", "bulb and column radii must be positive"));
        }
        if column > bulb {
            return Err(ChartError::invalid("column_radius", "must not exceed the bulb radius"));
        }
        self.bulb_radius = bulb;
        self.column_radius = column;
        self.gap = gap;
        Ok(())
    }

    /// The subrange containing `value`, checked critical first.
    pub fn subrange_of(&self, value: f64) -> Option<SubrangeKind> {
        SubrangeKind::ALL
            .into_iter()
            .rev()
            .find(|k| self.subranges[k.index()].range.contains(value))
    }

    /// Axis range for the current value.
    pub fn display_range(&self) -> Range {
        if self.follow_data_in_subranges
            && let Some(value) = self.dataset.value
            && let Some(kind) = self.subrange_of(value)
        {
            return self.subranges[kind.index()].display;
        }
        if self.range_axis.auto_range {
            self.bounds()
        } else {
            self.range_axis.range
        }
    }

    /// Mercury paint for the current value.
    pub fn current_paint(&self) -> Color {
        if self.use_subrange_paint
            && let Some(value) = self.dataset.value
            && let Some(kind) = self.subrange_of(value)
        {
            return self.subranges[kind.index()].paint;
        }
        self.mercury_paint
    }

    pub fn layout(&self, interior: Rect) -> ThermometerLayout {
        let mid_x = interior.center_x().floor();
        let bulb_d = self.bulb_radius * 2.0;
        let stem_top = (interior.min_y() + self.bulb_radius).floor();
        let stem_bottom = (interior.max_y() - bulb_d).floor();
        let data_area = Rect::new(
            mid_x - self.column_radius,
            stem_top,
            self.column_radius,
            (stem_bottom - stem_top).max(0.0),
        );
        let outer_bulb = Rect::new(mid_x - self.bulb_radius, stem_bottom, bulb_d, bulb_d);
        let g = self.gap;
        let inner_bulb = Rect::new(outer_bulb.x + g, outer_bulb.y + g, bulb_d - 2.0 * g, bulb_d - 2.0 * g);
        ThermometerLayout {
            mid_x,
            stem_top,
            stem_bottom,
            data_area,
            outer_bulb,
            inner_bulb,
        }
    }

    /// Bulb and stem outlines, outer then inner.
    fn outlines(&self, interior: Rect, l: &ThermometerLayout) -> [Path; 2] {
        let col_d = self.column_radius * 2.0;
        let g = self.gap;
        let mut outer = Path::ellipse(l.outer_bulb);
        outer.extend(&Path::round_rect(
            Rect::new(
                l.mid_x - self.column_radius,
                interior.min_y(),
                col_d,
                l.stem_bottom + self.bulb_radius * 2.0 - interior.min_y(),
            ),
            col_d,
            col_d,
        ));
        let mut inner = Path::ellipse(l.inner_bulb);
        inner.extend(&Path::round_rect(
            Rect::new(
                l.mid_x - self.column_radius + g,
                interior.min_y() + g,
                col_d - 2.0 * g,
                l.stem_bottom + self.bulb_radius * 2.0 - 2.0 * g - interior.min_y(),
            ),
            col_d - 2.0 * g,
            col_d - 2.0 * g,
        ));
        [outer, inner]
    }

    fn draw_mercury(&self, g: &mut dyn Graphics, interior: Rect, l: &ThermometerLayout, value: f64, range: Range) {
        let paint = self.current_paint();
        let width = self.column_radius * 2.0 - self.gap * 2.0;
        let half = self.column_radius - self.gap;
        let level = self
            .range_axis
            .value_to_screen_clamped(value, range, &l.data_area, RectangleEdge::Left)
            .round()
            .max(interior.min_y() + self.gap)
            .min(l.stem_bottom + self.bulb_radius);
        g.fill_path(&Path::ellipse(l.inner_bulb), paint);
        let column = Rect::new(l.mid_x - half, level, width, l.stem_bottom + self.bulb_radius - level);
        g.fill_path(&Path::round_rect(column, width, width.min(column.height)), paint);
        trace!(value, level, "mercury level");

        if self.show_value_lines {
            let x = l.mid_x + self.column_radius;
            g.draw_line(
                DVec2::new(x, level),
                DVec2::new(x + self.column_radius, level),
                self.thermometer_paint,
                &Stroke::solid(1.0),
            );
        }
    }

    fn draw_subrange_indicators(&self, g: &mut dyn Graphics, l: &ThermometerLayout, range: Range) {
        let x = l.mid_x + self.column_radius + 2.0;
        let stroke = Stroke::solid(2.0);
        for sub in &self.subranges {
            let r = sub.range;
            if r.upper < range.lower || r.lower > range.upper {
                continue;
            }
            let Some(lo) = self.range_axis.value_to_screen(r.lower.max(range.lower), range, &l.data_area, RectangleEdge::Left) else {
                continue;
            };
            let Some(hi) = self.range_axis.value_to_screen(r.upper.min(range.upper), range, &l.data_area, RectangleEdge::Left) else {
                continue;
            };
            g.draw_line(DVec2::new(x, lo), DVec2::new(x, hi), sub.paint, &stroke);
            g.draw_line(DVec2::new(x, lo), DVec2::new(x + 6.0, lo), sub.paint, &stroke);
            g.draw_line(DVec2::new(x, hi), DVec2::new(x + 6.0, hi), sub.paint, &stroke);
        }
    }

    fn draw_axis(&self, g: &mut dyn Graphics, l: &ThermometerLayout, range: Range) {
        let (cursor, edge) = match self.axis_location {
            ThermometerAxisLocation::None => return,
            ThermometerAxisLocation::Right => {
                let indicator = if self.subrange_indicators_visible { 10.0 } else { 0.0 };
                (l.mid_x + self.column_radius + indicator, RectangleEdge::Right)
            }
            ThermometerAxisLocation::Left => (l.mid_x - self.column_radius, RectangleEdge::Left),
        };
        self.range_axis.draw(g, range, cursor, &l.data_area, edge);
    }

    fn value_text(&self, value: f64) -> String {
        format!("{value:.*}", self.value_decimals)
    }

    fn draw_value(&self, g: &mut dyn Graphics, interior: Rect, l: &ThermometerLayout, value: f64) {
        let text = self.value_text(value);
        let (pos, anchor, paint) = match self.value_location {
            ValueLocation::None => return,
            ValueLocation::Right => (
                DVec2::new(l.mid_x + self.column_radius + self.gap, interior.center_y()),
                TextAnchor::CenterLeft,
                self.thermometer_paint,
            ),
            ValueLocation::Left => (
                DVec2::new(l.mid_x - self.column_radius - self.gap, interior.center_y()),
                TextAnchor::CenterRight,
                self.thermometer_paint,
            ),
            ValueLocation::Bulb => (l.outer_bulb.center(), TextAnchor::Center, self.value_paint),
        };
        g.draw_text(&TextItem::new(text, pos, &self.value_font, paint).with_anchor(anchor));
    }

    fn draw_units(&self, g: &mut dyn Graphics, interior: Rect, l: &ThermometerLayout) {
        let symbol = self.units.symbol();
        if symbol.is_empty() {
            return;
        }
        let width = g.measure_text(symbol, &self.value_font).width;
        let right = l.mid_x + self.column_radius + self.gap * 2.0 + width;
        let pos = if right > interior.max_x() {
            DVec2::new(l.mid_x - self.column_radius - self.gap, interior.min_y())
        } else {
            DVec2::new(l.mid_x + self.column_radius + self.gap * 2.0, interior.min_y())
        };
        let anchor = if right > interior.max_x() {
            TextAnchor::TopRight
        } else {
            TextAnchor::TopLeft
        };
        g.draw_text(&TextItem::new(symbol, pos, &self.value_font, self.thermometer_paint).with_anchor(anchor));
    }
}

impl Plot for ThermometerPlot {
    fn plot_type(&self) -> &'static str {
        "Thermometer Plot"
    }

    fn base(&self) -> &PlotBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut PlotBase {
        &mut self.base
    }

    fn draw(&self, g: &mut dyn Graphics, area: Rect, _anchor: Option<DVec2>, info: &mut PlotRenderingInfo) {
        info.plot_area = area;
        self.base.fill_background(g, area);
        let interior = self.base.insets.trim(area);
        let l = self.layout(interior);
        info.data_area = l.data_area;
        let range = self.display_range();

        let value = self.dataset.value.filter(|v| v.is_finite());
        if let Some(value) = value {
            self.draw_mercury(g, interior, &l, value, range);
        }
        if self.subrange_indicators_visible {
            self.draw_subrange_indicators(g, &l, range);
        }
        self.draw_axis(g, &l, range);
        if let Some(value) = value {
            self.draw_value(g, interior, &l, value);
        }
        self.draw_units(g, interior, &l);

        for outline in self.outlines(interior, &l) {
            g.stroke_path(&outline, self.thermometer_paint, &self.thermometer_stroke);
        }
        self.base.draw_outline(g, area);
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
    fn mercury_takes_the_subrange_paint() {
        let mut plot = ThermometerPlot::new(ValueDataset::new(80.0));
        assert_eq!(plot.subrange_of(80.0), Some(SubrangeKind::Critical));
        assert_eq!(plot.current_paint(), Color::RED);
        plot.dataset.value = Some(60.0);
        assert_eq!(plot.current_paint(), Color::ORANGE);
        plot.use_subrange_paint = false;
        assert_eq!(plot.current_paint(), Color::LIGHT_GRAY);
    }

    #[test]
    fn axis_follows_data_into_subranges() {
        let mut plot = ThermometerPlot::new(ValueDataset::new(60.0));
        plot.set_subrange_display(SubrangeKind::Warning, 45.0, 80.0).unwrap();
        assert_eq!(plot.display_range(), Range::ordered(0.0, 100.0));
        plot.follow_data_in_subranges = true;
        assert_eq!(plot.display_range(), Range::ordered(45.0, 80.0));
        plot.dataset.value = Some(150.0);
        assert_eq!(plot.display_range(), Range::ordered(0.0, 100.0));
    }

    #[test]
    fn bounds_and_radii_are_validated() {
        let mut plot = ThermometerPlot::default();
        assert!(plot.set_bounds(10.0, -10.0).is_err());
        plot.set_bounds(-40.0, 40.0).unwrap();
        assert_eq!(plot.display_range(), Range::ordered(-40.0, 40.0));
        assert!(plot.set_radii(10.0, 20.0, 2.0).is_err());
        assert!(plot.set_radii(0.0, 0.0, 2.0).is_err());
    }

    #[test]
    fn layout_puts_bulb_below_stem() {
        let plot = ThermometerPlot::default();
        let l = plot.layout(Rect::new(0.0, 0.0, 200.0, 400.0));
        assert_eq!(l.mid_x, 100.0);
        assert_eq!(l.stem_top, 40.0);
        assert_eq!(l.stem_bottom, 320.0);
        assert_eq!(l.outer_bulb, Rect::new(60.0, 320.0, 80.0, 80.0));
        assert_eq!(l.inner_bulb, Rect::new(65.0, 325.0, 70.0, 70.0));
    }

    #[test]
    fn draws_value_units_and_mercury() {
        let plot = ThermometerPlot::new(ValueDataset::new(42.0));
        let mut g = RecordingCanvas::new();
        let mut info = PlotRenderingInfo::new();
        plot.draw(&mut g, Rect::new(0.0, 0.0, 220.0, 440.0), None, &mut info);
        assert!(g.texts().any(|t| t.content == "42.0"));
        assert!(g.texts().any(|t| t.content == "\u{b0}C"));
        assert!(g.fills().any(|(_, c)| c == Color::GREEN));
    }

    #[test]
    fn missing_value_draws_no_mercury() {
        let plot = ThermometerPlot::default();
        let mut g = RecordingCanvas::new();
        plot.draw(&mut g, Rect::new(0.0, 0.0, 220.0, 440.0), None, &mut PlotRenderingInfo::new());
        assert!(!g.fills().any(|(_, c)| c == Color::GREEN));
        assert!(g.texts().all(|t| t.color != plot.value_paint));
    }
}
