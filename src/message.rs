use glam::DVec2;

use crate::entity::ChartEntity;
use crate::geometry::Rect;

#[derive(Debug, Clone)]
/// Messages sent by the chart widget to the application.
///
/// These messages are generated in response to user interactions with the
/// chart; hand them back to [`crate::ChartWidget::update`]. Positions are in
/// widget-local coordinates and `viewport` is the area the chart was laid out in.
pub enum ChartUiMessage {
    /// Toggle the legend visibility.
    ToggleLegend,
    /// Shift the axes by fractions of their length.
    Pan {
        domain_percent: f64,
        range_percent: f64,
        source: DVec2,
        viewport: Rect,
    },
    /// Scale both axes about `source` (< 1 zooms in).
    Zoom {
        factor: f64,
        source: DVec2,
        viewport: Rect,
    },
    /// Zoom to the rectangle dragged out between two points.
    ZoomBox {
        from: DVec2,
        to: DVec2,
        viewport: Rect,
    },
    /// Return every axis to its automatic range.
    RestoreAutoBounds,
    /// A left click landed on a chart entity.
    EntityClicked(EntityClick),
    /// Move (or clear) the crosshair anchor.
    SetAnchor {
        anchor: Option<DVec2>,
        viewport: Rect,
    },
}

/// Context passed along with [`ChartUiMessage::EntityClicked`].
#[derive(Debug, Clone)]
pub struct EntityClick {
    /// The entity under the click.
    pub entity: ChartEntity,
    /// Widget-local click position.
    pub position: DVec2,
    pub viewport: Rect,
}
