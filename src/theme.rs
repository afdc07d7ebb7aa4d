//! Chart-wide fonts and paints, loadable from JSON and pushed into every plot.
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::axis::{AxisAppearance, ValueAxis};
use crate::category_plot::CategoryPlot;
use crate::chart::Chart;
use crate::color::Color;
use crate::drawing_supplier::default_paint_sequence;
use crate::error::Result;
use crate::gridlines::Gridlines;
use crate::plot::{ChartPlot, PlotBase};
use crate::style::Font;
use crate::xy_plot::XyPlot;

/// A partial theme file is valid; missing fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartTheme {
    pub name: String,
    pub title_font: Font,
    pub title_paint: Color,
    pub chart_background: Option<Color>,
    pub legend_item_font: Font,
    pub legend_item_paint: Color,
    pub legend_background: Option<Color>,
    pub plot_background: Option<Color>,
    pub plot_outline_paint: Color,
    pub label_link_paint: Color,
    pub axis_label_font: Font,
    pub axis_label_paint: Color,
    pub tick_label_font: Font,
    pub tick_label_paint: Color,
    pub axis_line_paint: Color,
    pub item_label_font: Font,
    pub item_label_paint: Color,
    pub domain_gridline_paint: Color,
    pub range_gridline_paint: Color,
    pub crosshair_paint: Color,
    pub shadow_paint: Option<Color>,
    /// Series paints handed to every plot's drawing supplier.
    pub paint_sequence: Vec<Color>,
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            name: "default".into(),
            title_font: Font::bold(18.0),
            title_paint: Color::BLACK,
            chart_background: Some(Color::WHITE),
            legend_item_font: Font::new(10.0),
            legend_item_paint: Color::DARK_GRAY,
            legend_background: Some(Color::WHITE),
            plot_background: Some(Color::LIGHT_GRAY),
            plot_outline_paint: Color::GRAY,
            label_link_paint: Color::BLACK,
            axis_label_font: Font::new(12.0),
            axis_label_paint: Color::DARK_GRAY,
            tick_label_font: Font::new(10.0),
            tick_label_paint: Color::DARK_GRAY,
            axis_line_paint: Color::GRAY,
            item_label_font: Font::new(10.0),
            item_label_paint: Color::BLACK,
            domain_gridline_paint: Color::WHITE,
            range_gridline_paint: Color::WHITE,
            crosshair_paint: Color::BLUE,
            shadow_paint: Some(Color::GRAY),
            paint_sequence: default_paint_sequence(),
        }
    }
}

impl ChartTheme {
    /// White plot background with dark grey gridlines and no shadows.
    pub fn legacy() -> Self {
        Self {
            name: "legacy".into(),
            plot_background: Some(Color::WHITE),
            domain_gridline_paint: Color::GRAY,
            range_gridline_paint: Color::GRAY,
            shadow_paint: None,
            ..Self::default()
        }
    }

    /// Light text on a black background.
    pub fn darkness() -> Self {
        Self {
            name: "darkness".into(),
            title_paint: Color::YELLOW,
            chart_background: Some(Color::BLACK),
            legend_item_paint: Color::WHITE,
            legend_background: Some(Color::BLACK),
            plot_background: Some(Color::BLACK),
            plot_outline_paint: Color::YELLOW,
            label_link_paint: Color::LIGHT_GRAY,
            axis_label_paint: Color::WHITE,
            tick_label_paint: Color::WHITE,
            axis_line_paint: Color::WHITE,
            item_label_paint: Color::WHITE,
            domain_gridline_paint: Color::from_rgb8(0xC0, 0xC0, 0xC0),
            range_gridline_paint: Color::from_rgb8(0xC0, 0xC0, 0xC0),
            crosshair_paint: Color::ORANGE,
            shadow_paint: None,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn apply(&self, chart: &mut Chart) {
        debug!(theme = %self.name, "applying chart theme");
        if let Some(title) = &mut chart.title {
            title.font = self.title_font.clone();
            title.paint = self.title_paint;
        }
        chart.background_paint = self.chart_background;
        if let Some(legend) = &mut chart.legend {
            legend.item_font = self.legend_item_font.clone();
            legend.item_paint = self.legend_item_paint;
            legend.background_paint = self.legend_background;
        }
        self.apply_to_plot(&mut chart.plot);
    }

    pub fn apply_to_plot(&self, plot: &mut ChartPlot) {
        match plot {
            ChartPlot::Pie(p) => {
                self.apply_to_base(&mut p.base);
                p.label_link_paint = self.label_link_paint;
                p.shadow_paint = self.shadow_paint;
            }
            ChartPlot::Ring(r) => {
                self.apply_to_base(&mut r.pie.base);
                r.pie.label_link_paint = self.label_link_paint;
                r.pie.shadow_paint = self.shadow_paint;
                r.center_text_paint = self.item_label_paint;
            }
            ChartPlot::Category(p) => self.apply_to_category(p),
            ChartPlot::Xy(p) => self.apply_to_xy(p),
            ChartPlot::CombinedDomainXy(c) => {
                self.apply_to_base(&mut c.base);
                self.apply_to_value_axis(&mut c.domain_axis);
                c.subplots_mut().iter_mut().for_each(|p| self.apply_to_xy(p));
            }
            ChartPlot::CombinedRangeXy(c) => {
                self.apply_to_base(&mut c.base);
                self.apply_to_value_axis(&mut c.range_axis);
                c.subplots_mut().iter_mut().for_each(|p| self.apply_to_xy(p));
            }
            ChartPlot::CombinedDomainCategory(c) => {
                self.apply_to_base(&mut c.base);
                self.apply_to_axis(&mut c.domain_axis.appearance);
                c.subplots_mut().iter_mut().for_each(|p| self.apply_to_category(p));
            }
            ChartPlot::CombinedRangeCategory(c) => {
                self.apply_to_base(&mut c.base);
                self.apply_to_value_axis(&mut c.range_axis);
                c.subplots_mut().iter_mut().for_each(|p| self.apply_to_category(p));
            }
            ChartPlot::Compass(p) => {
                self.apply_to_base(&mut p.base);
                p.label_font = self.item_label_font.clone();
            }
            ChartPlot::WaferMap(p) => self.apply_to_base(&mut p.base),
            ChartPlot::Thermometer(p) => {
                self.apply_to_base(&mut p.base);
                self.apply_to_value_axis(&mut p.range_axis);
            }
        }
    }

    fn apply_to_base(&self, base: &mut PlotBase) {
        base.background_paint = self.plot_background;
        base.outline_paint = self.plot_outline_paint;
        base.drawing_supplier.paints = self.paint_sequence.clone();
    }

    fn apply_to_axis(&self, axis: &mut AxisAppearance) {
        axis.label_font = self.axis_label_font.clone();
        axis.label_paint = self.axis_label_paint;
        axis.tick_label_font = self.tick_label_font.clone();
        axis.tick_label_paint = self.tick_label_paint;
        axis.axis_line_paint = self.axis_line_paint;
        axis.tick_mark_paint = self.axis_line_paint;
    }

    fn apply_to_value_axis(&self, axis: &mut ValueAxis) {
        self.apply_to_axis(&mut axis.appearance);
    }

    fn apply_to_gridlines(gridlines: &mut Gridlines, paint: Color) {
        gridlines.paint = paint;
    }

    fn apply_to_xy(&self, plot: &mut XyPlot) {
        self.apply_to_base(&mut plot.base);
        self.apply_to_value_axis(&mut plot.domain_axis);
        self.apply_to_value_axis(&mut plot.range_axis);
        Self::apply_to_gridlines(&mut plot.domain_gridlines, self.domain_gridline_paint);
        Self::apply_to_gridlines(&mut plot.range_gridlines, self.range_gridline_paint);
        plot.domain_crosshair.paint = self.crosshair_paint;
        plot.range_crosshair.paint = self.crosshair_paint;
        for r in &mut plot.renderers {
            r.item_label_font = self.item_label_font.clone();
            r.item_label_paint = self.item_label_paint;
        }
    }

    fn apply_to_category(&self, plot: &mut CategoryPlot) {
        self.apply_to_base(&mut plot.base);
        self.apply_to_axis(&mut plot.domain_axis.appearance);
        self.apply_to_value_axis(&mut plot.range_axis);
        Self::apply_to_gridlines(&mut plot.domain_gridlines, self.domain_gridline_paint);
        Self::apply_to_gridlines(&mut plot.range_gridlines, self.range_gridline_paint);
        plot.range_crosshair.paint = self.crosshair_paint;
        for r in &mut plot.renderers {
            r.item_label_font = self.item_label_font.clone();
            r.item_label_paint = self.item_label_paint;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combined::CombinedDomainXyPlot;
    use crate::dataset::{XyDataset, XySeries};
    use crate::xy_plot::XyRenderer;

    fn xy() -> XyPlot {
        let ds = XyDataset::new().with_series("s", XySeries::from_points(vec![[0.0, 1.0], [1.0, 2.0]]));
        XyPlot::new(ds, ValueAxis::new("x"), ValueAxis::new("y"), XyRenderer::line())
    }

    #[test]
    fn partial_theme_file_keeps_defaults() {
        let theme = ChartTheme::from_json(r#"{"name": "mine", "crosshair_paint": {"r": 1.0, "g": 0.0, "b": 0.0, "a": 1.0}}"#).unwrap();
        assert_eq!(theme.name, "mine");
        assert_eq!(theme.crosshair_paint, Color::RED);
        assert_eq!(theme.paint_sequence, default_paint_sequence());
        assert!(ChartTheme::from_json("[1, 2]").is_err());
    }

    #[test]
    fn apply_recurses_into_subplots() {
        let mut combined = CombinedDomainXyPlot::new(ValueAxis::new("x"));
        combined.add(xy(), 1).unwrap();
        combined.add(xy(), 2).unwrap();
        let mut chart = Chart::new(combined);
        chart.set_title("t");
        let theme = ChartTheme::darkness();
        theme.apply(&mut chart);

        assert_eq!(chart.background_paint, Some(Color::BLACK));
        assert_eq!(chart.title.as_ref().map(|t| t.paint), Some(Color::YELLOW));
        let ChartPlot::CombinedDomainXy(c) = &chart.plot else {
            panic!("plot type changed");
        };
        assert_eq!(c.domain_axis.appearance.tick_label_paint, Color::WHITE);
        for sub in c.subplots() {
            assert_eq!(sub.base.background_paint, Some(Color::BLACK));
            assert_eq!(sub.range_crosshair.paint, Color::ORANGE);
            assert_eq!(sub.range_axis.appearance.axis_line_paint, Color::WHITE);
        }
    }

    #[test]
    fn theme_round_trips_through_json() {
        let theme = ChartTheme::legacy();
        let json = theme.to_json_pretty().unwrap();
        assert_eq!(ChartTheme::from_json(&json).unwrap(), theme);
    }
}
