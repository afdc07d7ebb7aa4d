//! Pie, ring, category, XY, compass, wafer-map, thermometer and combined charts
//! for Iced.
//!
//! - Every plot draws through the [`Graphics`] trait, so the same layout can be
//!   painted on an iced canvas or recorded headlessly for tests and hit testing
//! - Drawing reports a [`ChartRenderingInfo`] with data areas and clickable entities
//! - XY and category plots zoom and pan; combined plots share one axis between subplots
//! - Charts and themes serialize to JSON
//!
//! Quick start:
//!
//! ```no_run
//! use iced_chart::{ChartBuilder, ChartWidget, PieDataset, PiePlot};
//!
//! let data = PieDataset::new()
//!     .with_value("Rust", 42.0)
//!     .with_value("C", 18.0)
//!     .with_value("Other", 7.5);
//! let chart = ChartBuilder::new()
//!     .with_title("Languages")
//!     .with_plot(PiePlot::new(data))
//!     .build()
//!     .unwrap();
//! let widget = ChartWidget::new(chart);
//! ```
//!
//! See `demos/` for more.
pub mod axis;
pub mod axis_scale;
pub mod category_plot;
pub mod chart;
pub mod color;
pub mod combined;
pub mod compass_plot;
pub mod controls;
pub mod crosshair;
pub mod dataset;
pub mod drawing_supplier;
pub mod entity;
pub mod error;
pub mod geometry;
pub mod graphics;
pub mod gridlines;
pub mod info;
pub mod labels;
pub mod legend;
pub mod marker;
pub mod message;
pub mod palette;
pub mod pie_label;
pub mod pie_plot;
pub mod plot;
pub mod ring_plot;
pub mod shape;
pub mod style;
pub mod text;
pub mod theme;
pub mod thermometer;
pub mod ticks;
pub mod wafer_map;
#[cfg(feature = "canvas")]
pub mod widget;
pub mod xy_plot;
pub mod zoom;

// Re-exports of public types.
pub use axis::{AxisLocation, CategoryAxis, ValueAxis};
pub use axis_scale::AxisScale;
pub use category_plot::{CategoryPlot, CategoryRenderer};
pub use chart::{Chart, ChartBuilder, TextTitle};
pub use color::Color;
pub use combined::{
    CombinedDomainCategoryPlot, CombinedDomainXyPlot, CombinedRangeCategoryPlot,
    CombinedRangeXyPlot,
};
pub use compass_plot::{CompassPlot, MeterNeedle, NeedleKind};
pub use controls::{ChartControls, PanControls, PickControls, ZoomControls};
pub use crosshair::Crosshair;
pub use dataset::{
    CategoryDataset, PieDataset, Range, ValueDataset, WaferMapDataset, XyDataset, XySeries,
};
pub use drawing_supplier::{DefaultDrawingSupplier, DrawingSupplier};
pub use entity::{ChartEntity, EntityKind};
pub use error::{ChartError, Result};
pub use geometry::{Insets, Rect, RectangleAnchor, RectangleEdge};
pub use graphics::{Graphics, RecordingCanvas};
pub use info::{ChartRenderingInfo, PlotRenderingInfo};
pub use legend::{LegendItem, LegendSettings};
pub use marker::Marker;
pub use message::{ChartUiMessage, EntityClick};
pub use palette::ColorPalette;
pub use pie_label::{PieLabelDistributor, PieLabelRecord};
pub use pie_plot::PiePlot;
pub use plot::{ChartPlot, Plot, PlotBase};
pub use ring_plot::RingPlot;
pub use style::{Font, Stroke, TextAnchor};
pub use theme::ChartTheme;
pub use thermometer::ThermometerPlot;
pub use wafer_map::{WaferMapPlot, WaferMapRenderer};
#[cfg(feature = "canvas")]
pub use widget::{ChartWidget, FrameGraphics};
pub use xy_plot::{XyPlot, XyRenderer};
pub use zoom::{Pannable, PlotOrientation, Zoomable};
