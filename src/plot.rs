//! The plot abstraction shared by every chart type.
use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::category_plot::CategoryPlot;
use crate::color::Color;
use crate::combined::{
    CombinedDomainCategoryPlot, CombinedDomainXyPlot, CombinedRangeCategoryPlot, CombinedRangeXyPlot,
};
use crate::compass_plot::CompassPlot;
use crate::drawing_supplier::DefaultDrawingSupplier;
use crate::geometry::{Insets, Rect};
use crate::graphics::{Graphics, TextItem};
use crate::info::PlotRenderingInfo;
use crate::legend::LegendItem;
use crate::pie_plot::PiePlot;
use crate::ring_plot::RingPlot;
use crate::style::{Font, Stroke};
use crate::text::TextBox;
use crate::thermometer::ThermometerPlot;
use crate::wafer_map::WaferMapPlot;
use crate::xy_plot::XyPlot;
use crate::zoom::{Pannable, Zoomable};

/// Properties every plot has.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotBase {
    pub insets: Insets,
    pub background_paint: Option<Color>,
    pub background_alpha: f32,
    pub outline_visible: bool,
    pub outline_paint: Color,
    pub outline_stroke: Stroke,
    /// Opacity applied to data items.
    pub foreground_alpha: f32,
    /// Shown in place of the data when there is nothing to draw.
    pub no_data_message: Option<String>,
    pub no_data_font: Font,
    pub no_data_paint: Color,
    pub drawing_supplier: DefaultDrawingSupplier,
}

impl Default for PlotBase {
    fn default() -> Self {
        Self {
            insets: Insets::new(4.0, 8.0, 4.0, 8.0),
            background_paint: Some(Color::WHITE),
            background_alpha: 1.0,
            outline_visible: true,
            outline_paint: Color::GRAY,
            outline_stroke: Stroke::solid(0.5),
            foreground_alpha: 1.0,
            no_data_message: None,
            no_data_font: Font::new(12.0),
            no_data_paint: Color::BLACK,
            drawing_supplier: DefaultDrawingSupplier::default(),
        }
    }
}

impl PlotBase {
    pub fn fill_background(&self, g: &mut dyn Graphics, area: Rect) {
        if let Some(bg) = self.background_paint {
            g.fill_rect(area, bg.scale_alpha(self.background_alpha));
        }
    }

    pub fn draw_outline(&self, g: &mut dyn Graphics, area: Rect) {
        if self.outline_visible {
            g.stroke_rect(area, self.outline_paint, &self.outline_stroke);
        }
    }

    /// Centre the no-data message (if any) in `area`, wrapped to its width.
    pub fn draw_no_data_message(&self, g: &mut dyn Graphics, area: Rect) {
        let Some(message) = &self.no_data_message else {
            return;
        };
        let block = TextBox::wrapped(message, &self.no_data_font, self.no_data_paint, area.width, g)
            .with_padding(Insets::ZERO);
        let (_, h) = block.size(g);
        let line_h = if block.lines.is_empty() {
            0.0
        } else {
            h / block.lines.len() as f64
        };
        let top = area.center_y() - h / 2.0;
        for (i, line) in block.lines.iter().enumerate() {
            let pos = DVec2::new(area.center_x(), top + line_h * (i as f64 + 0.5));
            g.draw_text(&TextItem::new(line.as_str(), pos, &self.no_data_font, self.no_data_paint));
        }
    }

    /// `paint` with the foreground alpha applied.
    pub(crate) fn fg(&self, paint: Color) -> Color {
        paint.scale_alpha(self.foreground_alpha)
    }
}

/// Order in which overlaid datasets are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DatasetRenderingOrder {
    /// Dataset 0 first, so later datasets paint over it.
    Forward,
    /// Last dataset first, so the primary dataset ends up on top.
    #[default]
    Reverse,
}

impl DatasetRenderingOrder {
    pub(crate) fn indices(self, count: usize) -> Vec<usize> {
        match self {
            Self::Forward => (0..count).collect(),
            Self::Reverse => (0..count).rev().collect(),
        }
    }
}

/// A chart's drawing area content.
pub trait Plot {
    /// A short name for the plot kind.
    fn plot_type(&self) -> &'static str;

    fn base(&self) -> &PlotBase;

    fn base_mut(&mut self) -> &mut PlotBase;

    /// Draw into `area`. `anchor` is the last clicked point, used by crosshairs.
    fn draw(&self, g: &mut dyn Graphics, area: Rect, anchor: Option<DVec2>, info: &mut PlotRenderingInfo);

    fn legend_items(&self) -> Vec<LegendItem>;

    fn as_zoomable(&self) -> Option<&dyn Zoomable> {
        None
    }

    fn as_zoomable_mut(&mut self) -> Option<&mut dyn Zoomable> {
        None
    }

    fn as_pannable_mut(&mut self) -> Option<&mut dyn Pannable> {
        None
    }

    /// Return every axis to auto range.
    fn restore_auto_bounds(&mut self) {}

    /// Update state that depends on the last draw, such as crosshair values.
    fn after_draw(&mut self, info: &PlotRenderingInfo) {
        let _ = info;
    }
}

/// Every plot type, as stored in a serializable chart definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ChartPlot {
    Pie(PiePlot),
    Ring(RingPlot),
    Category(CategoryPlot),
    Xy(XyPlot),
    CombinedDomainXy(CombinedDomainXyPlot),
    CombinedRangeXy(CombinedRangeXyPlot),
    CombinedDomainCategory(CombinedDomainCategoryPlot),
    CombinedRangeCategory(CombinedRangeCategoryPlot),
    Compass(CompassPlot),
    WaferMap(WaferMapPlot),
    Thermometer(ThermometerPlot),
}

impl ChartPlot {
    pub fn as_plot(&self) -> &dyn Plot {
        match self {
            Self::Pie(p) => p,
            Self::Ring(p) => p,
            Self::Category(p) => p,
            Self::Xy(p) => p,
            Self::CombinedDomainXy(p) => p,
            Self::CombinedRangeXy(p) => p,
            Self::CombinedDomainCategory(p) => p,
            Self::CombinedRangeCategory(p) => p,
            Self::Compass(p) => p,
            Self::WaferMap(p) => p,
            Self::Thermometer(p) => p,
        }
    }

    pub fn as_plot_mut(&mut self) -> &mut dyn Plot {
        match self {
            Self::Pie(p) => p,
            Self::Ring(p) => p,
            Self::Category(p) => p,
            Self::Xy(p) => p,
            Self::CombinedDomainXy(p) => p,
            Self::CombinedRangeXy(p) => p,
            Self::CombinedDomainCategory(p) => p,
            Self::CombinedRangeCategory(p) => p,
            Self::Compass(p) => p,
            Self::WaferMap(p) => p,
            Self::Thermometer(p) => p,
        }
    }
}

impl Plot for ChartPlot {
    fn plot_type(&self) -> &'static str {
        self.as_plot().plot_type()
    }

    fn base(&self) -> &PlotBase {
        self.as_plot().base()
    }

    fn base_mut(&mut self) -> &mut PlotBase {
        self.as_plot_mut().base_mut()
    }

    fn draw(&self, g: &mut dyn Graphics, area: Rect, anchor: Option<DVec2>, info: &mut PlotRenderingInfo) {
        self.as_plot().draw(g, area, anchor, info);
    }

    fn legend_items(&self) -> Vec<LegendItem> {
        self.as_plot().legend_items()
    }

    fn as_zoomable(&self) -> Option<&dyn Zoomable> {
        self.as_plot().as_zoomable()
    }

    fn as_zoomable_mut(&mut self) -> Option<&mut dyn Zoomable> {
        self.as_plot_mut().as_zoomable_mut()
    }

    fn as_pannable_mut(&mut self) -> Option<&mut dyn Pannable> {
        self.as_plot_mut().as_pannable_mut()
    }

    fn restore_auto_bounds(&mut self) {
        self.as_plot_mut().restore_auto_bounds();
    }

    fn after_draw(&mut self, info: &PlotRenderingInfo) {
        self.as_plot_mut().after_draw(info);
    }
}

macro_rules! impl_from_plot {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(impl From<$ty> for ChartPlot {
            fn from(p: $ty) -> Self {
                Self::$variant(p)
            }
        })*
    };
}

impl_from_plot! {
    Pie => PiePlot,
    Ring => RingPlot,
    Category => CategoryPlot,
    Xy => XyPlot,
    CombinedDomainXy => CombinedDomainXyPlot,
    CombinedRangeXy => CombinedRangeXyPlot,
    CombinedDomainCategory => CombinedDomainCategoryPlot,
    CombinedRangeCategory => CombinedRangeCategoryPlot,
    Compass => CompassPlot,
    WaferMap => WaferMapPlot,
    Thermometer => ThermometerPlot,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::RecordingCanvas;

    #[test]
    fn no_data_message_is_centred() {
        let mut g = RecordingCanvas::new();
        let base = PlotBase {
            no_data_message: Some("No data".to_owned()),
            ..PlotBase::default()
        };
        let area = Rect::new(0.0, 0.0, 200.0, 100.0);
        base.draw_no_data_message(&mut g, area);
        let t = g.texts().next().unwrap();
        assert_eq!(t.content, "No data");
        assert_eq!(t.position, DVec2::new(100.0, 50.0));
    }

    #[test]
    fn background_honours_alpha() {
        let mut g = RecordingCanvas::new();
        let base = PlotBase {
            background_alpha: 0.5,
            ..PlotBase::default()
        };
        base.fill_background(&mut g, Rect::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(g.fills().next().unwrap().1.a, 0.5);
    }
}
