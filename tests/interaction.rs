#![cfg(feature = "canvas")]

use glam::DVec2;
use iced_chart::entity::EntityKind;
use iced_chart::{
    Chart, ChartPlot, ChartUiMessage, ChartWidget, Crosshair, Rect, ValueAxis, XyDataset, XyPlot,
    XyRenderer, XySeries,
};

const VIEWPORT: Rect = Rect::new(0.0, 0.0, 500.0, 400.0);

fn widget() -> ChartWidget {
    let ds = XyDataset::new().with_series(
        "s",
        XySeries::from_points(vec![[0.0, 0.0], [5.0, 10.0], [10.0, 5.0]]),
    );
    let mut plot = XyPlot::new(ds, ValueAxis::new("x"), ValueAxis::new("y"), XyRenderer::lines_and_shapes());
    plot.domain_crosshair = Crosshair::visible();
    plot.range_crosshair = Crosshair::visible();
    ChartWidget::new(Chart::new(plot))
}

fn xy(widget: &ChartWidget) -> &XyPlot {
    match &widget.chart().plot {
        ChartPlot::Xy(p) => p,
        other => panic!("unexpected plot {other:?}"),
    }
}

#[test]
fn anchor_snaps_crosshairs_to_nearest_item() {
    let mut w = widget();
    let info = w.layout(VIEWPORT);
    let item = info
        .plot
        .entities
        .iter()
        .find(|e| matches!(e.kind, EntityKind::XyItem { item: 1, .. }))
        .and_then(|e| e.anchor)
        .unwrap();

    w.update(ChartUiMessage::SetAnchor {
        anchor: Some(item + DVec2::new(3.0, -2.0)),
        viewport: VIEWPORT,
    });
    assert_eq!(xy(&w).domain_crosshair.value, 5.0);
    assert_eq!(xy(&w).range_crosshair.value, 10.0);
}

#[test]
fn zoom_then_restore() {
    let mut w = widget();
    let center = w.layout(VIEWPORT).plot.data_area.center();
    let before = xy(&w).visible_domain_range();
    w.update(ChartUiMessage::Zoom {
        factor: 0.5,
        source: center,
        viewport: VIEWPORT,
    });
    let zoomed = xy(&w).domain_axis.range;
    assert!(!xy(&w).domain_axis.auto_range);
    assert!((zoomed.length() - before.length() / 2.0).abs() < 1e-9);

    w.update(ChartUiMessage::RestoreAutoBounds);
    assert!(xy(&w).domain_axis.auto_range && xy(&w).range_axis.auto_range);
}

#[test]
fn pan_shifts_both_axes() {
    let mut w = widget();
    let before_x = xy(&w).visible_domain_range();
    let before_y = xy(&w).visible_range();
    w.update(ChartUiMessage::Pan {
        domain_percent: 0.1,
        range_percent: -0.2,
        source: DVec2::new(250.0, 200.0),
        viewport: VIEWPORT,
    });
    let after_x = xy(&w).domain_axis.range;
    let after_y = xy(&w).range_axis.range;
    assert!((after_x.lower - (before_x.lower + 0.1 * before_x.length())).abs() < 1e-9);
    assert!((after_y.upper - (before_y.upper - 0.2 * before_y.length())).abs() < 1e-9);
}

#[test]
fn box_zoom_narrows_to_selection() {
    let mut w = widget();
    let da = w.layout(VIEWPORT).plot.data_area;
    let before = xy(&w).visible_domain_range();
    w.update(ChartUiMessage::ZoomBox {
        from: DVec2::new(da.min_x(), da.min_y()),
        to: DVec2::new(da.center_x(), da.max_y()),
        viewport: VIEWPORT,
    });
    let after = xy(&w).domain_axis.range;
    assert!((after.lower - before.lower).abs() < 1e-9);
    assert!((after.length() - before.length() / 2.0).abs() < 1e-9);
}

#[test]
fn toggling_the_legend_hides_it() {
    let mut w = widget();
    let with_legend = w.layout(VIEWPORT).plot.plot_area;
    w.update(ChartUiMessage::ToggleLegend);
    let without = w.layout(VIEWPORT).plot.plot_area;
    assert!(without.height > with_legend.height);
}
