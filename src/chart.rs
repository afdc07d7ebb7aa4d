//! A complete chart: optional title, one plot and an optional legend.
use glam::DVec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::Color;
use crate::entity::{ChartEntity, EntityKind};
use crate::error::{ChartError, Result};
use crate::geometry::{Insets, Rect, RectangleAnchor, RectangleEdge};
use crate::graphics::Graphics;
use crate::info::ChartRenderingInfo;
use crate::legend::{LegendItem, LegendSettings};
use crate::plot::{ChartPlot, Plot};
use crate::style::{Font, Stroke};
use crate::text::TextBox;
use crate::zoom::{Pannable, Zoomable};

/// Title text drawn above the plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextTitle {
    pub text: String,
    pub visible: bool,
    pub font: Font,
    pub paint: Color,
    pub background_paint: Option<Color>,
    /// Space around the title block.
    pub padding: Insets,
}

impl Default for TextTitle {
    fn default() -> Self {
        Self {
            text: String::new(),
            visible: true,
            font: Font::bold(18.0),
            paint: Color::BLACK,
            background_paint: None,
            padding: Insets::uniform(2.0),
        }
    }
}

impl TextTitle {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    fn text_box(&self, g: &dyn Graphics, max_width: f64) -> TextBox {
        TextBox::wrapped(&self.text, &self.font, self.paint, max_width, g)
            .with_background(self.background_paint)
            .with_padding(self.padding)
    }

    /// Draw the title centred along the top of `area`; returns the space used.
    fn draw(&self, g: &mut dyn Graphics, area: Rect) -> Rect {
        let block = self.text_box(g, area.width);
        block.draw(g, area.center_x(), area.min_y(), RectangleAnchor::Top)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Chart {
    pub title: Option<TextTitle>,
    pub plot: ChartPlot,
    pub legend: Option<LegendSettings>,
    pub background_paint: Option<Color>,
    pub border_visible: bool,
    pub border_paint: Color,
    pub border_stroke: Stroke,
    pub padding: Insets,
}

impl Default for Chart {
    fn default() -> Self {
        Self::new(ChartPlot::Pie(Default::default()))
    }
}

impl Chart {
    /// A chart around `plot` with a legend and no title.
    pub fn new(plot: impl Into<ChartPlot>) -> Self {
        Self {
            title: None,
            plot: plot.into(),
            legend: Some(LegendSettings::default()),
            background_paint: Some(Color::WHITE),
            border_visible: false,
            border_paint: Color::BLACK,
            border_stroke: Stroke::solid(1.0),
            padding: Insets::uniform(5.0),
        }
    }

    pub fn set_title(&mut self, text: impl Into<String>) {
        match &mut self.title {
            Some(title) => title.text = text.into(),
            None => self.title = Some(TextTitle::new(text)),
        }
    }

    pub fn legend_items(&self) -> Vec<LegendItem> {
        self.plot.legend_items()
    }

    /// Paint the chart into `area` and record what was drawn where.
    pub fn draw(&self, g: &mut dyn Graphics, area: Rect, anchor: Option<DVec2>) -> ChartRenderingInfo {
        let mut info = ChartRenderingInfo {
            chart_area: area,
            ..ChartRenderingInfo::default()
        };
        if let Some(bg) = self.background_paint {
            g.fill_rect(area, bg);
        }
        let mut content = self.padding.trim(area);

        if let Some(title) = self.title.as_ref().filter(|t| t.visible && !t.text.is_empty()) {
            let used = title.draw(g, content);
            info.entities.add(
                ChartEntity::rect(used, EntityKind::Title).with_tooltip(Some(title.text.clone())),
            );
            let h = used.height.min(content.height);
            content = Rect::new(content.x, content.y + h, content.width, content.height - h);
        }

        if let Some(settings) = self.legend.as_ref().filter(|l| l.visible) {
            let items = self.legend_items();
            if !items.is_empty() {
                content = self.draw_legend(g, settings, &items, content, &mut info);
            }
        }

        debug!(
            plot = self.plot.plot_type(),
            width = content.width,
            height = content.height,
            "drawing plot"
        );
        self.plot.draw(g, content, anchor, &mut info.plot);

        if self.border_visible {
            g.stroke_rect(area, self.border_paint, &self.border_stroke);
        }
        info
    }

    /// Draw the legend along its edge of `content`; returns what is left for the plot.
    fn draw_legend(
        &self,
        g: &mut dyn Graphics,
        settings: &LegendSettings,
        items: &[LegendItem],
        content: Rect,
        info: &mut ChartRenderingInfo,
    ) -> Rect {
        let max_width = if settings.position.is_top_or_bottom() {
            content.width
        } else {
            content.width / 3.0
        };
        let layout = settings.arrange(g, items, max_width);
        let (w, h) = (layout.width.min(content.width), layout.height.min(content.height));
        let (block, rest) = match settings.position {
            RectangleEdge::Bottom => (
                Rect::new(content.center_x() - w / 2.0, content.max_y() - h, w, h),
                Rect::new(content.x, content.y, content.width, content.height - h),
            ),
            RectangleEdge::Top => (
                Rect::new(content.center_x() - w / 2.0, content.y, w, h),
                Rect::new(content.x, content.y + h, content.width, content.height - h),
            ),
            RectangleEdge::Left => (
                Rect::new(content.x, content.center_y() - h / 2.0, w, h),
                Rect::new(content.x + w, content.y, content.width - w, content.height),
            ),
            RectangleEdge::Right => (
                Rect::new(content.max_x() - w, content.center_y() - h / 2.0, w, h),
                Rect::new(content.x, content.y, content.width - w, content.height),
            ),
        };
        for entity in settings.draw(g, items, &layout, block) {
            info.entities.add(entity);
        }
        rest
    }

    /// Fold what the last draw resolved (crosshair values) back into the plot.
    pub fn apply_rendering_info(&mut self, info: &ChartRenderingInfo) {
        self.plot.after_draw(&info.plot);
    }

    pub fn zoomable(&self) -> Option<&dyn Zoomable> {
        self.plot.as_zoomable()
    }

    pub fn zoomable_mut(&mut self) -> Option<&mut dyn Zoomable> {
        self.plot.as_zoomable_mut()
    }

    pub fn pannable_mut(&mut self) -> Option<&mut dyn Pannable> {
        self.plot.as_pannable_mut()
    }

    pub fn restore_auto_bounds(&mut self) {
        self.plot.restore_auto_bounds();
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Builder for a [`Chart`].
///
/// ```ignore
/// let chart = ChartBuilder::new()
///     .with_title("Market share")
///     .with_plot(PiePlot::new(dataset))
///     .with_legend_position(RectangleEdge::Right)
///     .build()?;
/// ```
#[derive(Default)]
pub struct ChartBuilder {
    title: Option<TextTitle>,
    plot: Option<ChartPlot>,
    legend: Option<bool>,
    legend_position: Option<RectangleEdge>,
    background_paint: Option<Option<Color>>,
    border: Option<bool>,
    padding: Option<Insets>,
}

impl ChartBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        if !text.is_empty() {
            self.title = Some(TextTitle::new(text));
        }
        self
    }

    pub fn with_text_title(mut self, title: TextTitle) -> Self {
        self.title = Some(title);
        self
    }

    pub fn with_plot(mut self, plot: impl Into<ChartPlot>) -> Self {
        self.plot = Some(plot.into());
        self
    }

    /// Show or hide the legend. Legends are shown by default.
    pub fn with_legend(mut self, visible: bool) -> Self {
        self.legend = Some(visible);
        self
    }

    pub fn with_legend_position(mut self, edge: RectangleEdge) -> Self {
        self.legend_position = Some(edge);
        self
    }

    pub fn with_background(mut self, paint: Option<Color>) -> Self {
        self.background_paint = Some(paint);
        self
    }

    pub fn with_border(mut self, visible: bool) -> Self {
        self.border = Some(visible);
        self
    }

    pub fn with_padding(mut self, padding: Insets) -> Self {
        self.padding = Some(padding);
        self
    }

    pub fn build(self) -> Result<Chart> {
        let plot = self
            .plot
            .ok_or_else(|| ChartError::invalid("plot", "a chart needs a plot"))?;
        let mut chart = Chart::new(plot);
        chart.title = self.title;
        if self.legend == Some(false) {
            chart.legend = None;
        }
        if let (Some(legend), Some(edge)) = (chart.legend.as_mut(), self.legend_position) {
            legend.position = edge;
        }
        if let Some(bg) = self.background_paint {
            chart.background_paint = bg;
        }
        if let Some(border) = self.border {
            chart.border_visible = border;
        }
        if let Some(padding) = self.padding {
            chart.padding = padding;
        }
        Ok(chart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::PieDataset;
    use crate::graphics::RecordingCanvas;
    use crate::pie_plot::PiePlot;

    fn pie() -> PiePlot {
        PiePlot::new(PieDataset::new().with_value("One", 3.0).with_value("Two", 1.0))
    }

    #[test]
    fn builder_requires_a_plot() {
        assert!(ChartBuilder::new().with_title("t").build().is_err());
        let chart = ChartBuilder::new()
            .with_title("Shares")
            .with_plot(pie())
            .with_legend(false)
            .build()
            .unwrap();
        assert_eq!(chart.title.as_ref().map(|t| t.text.as_str()), Some("Shares"));
        assert!(chart.legend.is_none());
    }

    #[test]
    fn title_on_top_legend_at_bottom() {
        let mut chart = Chart::new(pie());
        chart.set_title("Shares");
        let mut g = RecordingCanvas::new();
        let info = chart.draw(&mut g, Rect::new(0.0, 0.0, 400.0, 300.0), None);

        let title = info.entities.iter().find(|e| e.kind == EntityKind::Title).unwrap();
        let plot_area = info.plot.plot_area;
        assert!(title.area.bounds().max_y() <= plot_area.min_y() + 1e-9);

        let legend: Vec<_> = info
            .entities
            .iter()
            .filter(|e| matches!(e.kind, EntityKind::LegendItem { .. }))
            .collect();
        assert_eq!(legend.len(), 2);
        assert!(legend.iter().all(|e| e.area.bounds().min_y() >= plot_area.max_y() - 1e-9));
    }

    #[test]
    fn legend_entities_win_over_plot() {
        let chart = ChartBuilder::new()
            .with_plot(pie())
            .with_legend_position(RectangleEdge::Right)
            .build()
            .unwrap();
        let mut g = RecordingCanvas::new();
        let info = chart.draw(&mut g, Rect::new(0.0, 0.0, 400.0, 300.0), None);
        let item = info
            .entities
            .iter()
            .find(|e| matches!(e.kind, EntityKind::LegendItem { .. }))
            .unwrap();
        let hit = info.entity_at(item.area.bounds().center()).unwrap();
        assert!(matches!(&hit.kind, EntityKind::LegendItem { series_key } if series_key == "One"));
        assert!(info.plot.plot_area.max_x() <= item.area.bounds().min_x() + 1e-9);
    }

    #[test]
    fn pie_charts_do_not_zoom() {
        let mut chart = Chart::new(pie());
        assert!(chart.zoomable_mut().is_none());
        assert!(chart.pannable_mut().is_none());
    }

    #[test]
    fn json_round_trip_keeps_definition() {
        let chart = ChartBuilder::new()
            .with_title("Shares")
            .with_plot(pie())
            .with_border(true)
            .build()
            .unwrap();
        let json = chart.to_json().unwrap();
        assert_eq!(Chart::from_json(&json).unwrap(), chart);
        assert!(Chart::from_json("{\"plot\": 3}").is_err());
    }
}
