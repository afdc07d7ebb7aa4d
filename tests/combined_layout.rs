use glam::DVec2;
use iced_chart::combined::{SubplotDirection, allocate_subplot_areas};
use iced_chart::{
    CategoryAxis, CategoryDataset, CategoryPlot, CategoryRenderer, Chart, ChartError, ChartPlot,
    CombinedDomainCategoryPlot, CombinedDomainXyPlot, RecordingCanvas, Rect, ValueAxis, XyDataset,
    XyPlot, XyRenderer, XySeries,
};

fn xy(label: &str, points: Vec<[f64; 2]>) -> XyPlot {
    let ds = XyDataset::new().with_series(label, XySeries::from_points(points));
    XyPlot::new(ds, ValueAxis::new("x"), ValueAxis::new(label), XyRenderer::line())
}

fn two_subplots() -> CombinedDomainXyPlot {
    let mut combined = CombinedDomainXyPlot::new(ValueAxis::new("time"));
    combined
        .add(xy("small", vec![[0.0, 0.1], [10.0, 0.9]]), 1)
        .unwrap();
    combined
        .add(xy("large", vec![[5.0, 10_000.0], [20.0, 250_000.0]]), 3)
        .unwrap();
    combined
}

#[test]
fn weights_split_the_usable_length() {
    let areas = allocate_subplot_areas(
        Rect::new(0.0, 0.0, 100.0, 410.0),
        &[1, 3],
        10.0,
        SubplotDirection::Vertical,
    );
    assert_eq!(areas, vec![Rect::new(0.0, 0.0, 100.0, 100.0), Rect::new(0.0, 110.0, 100.0, 300.0)]);

    let areas = allocate_subplot_areas(Rect::new(0.0, 0.0, 300.0, 50.0), &[1, 1, 1], 0.0, SubplotDirection::Horizontal);
    assert_eq!(areas.iter().map(|r| r.x).collect::<Vec<_>>(), vec![0.0, 100.0, 200.0]);
}

#[test]
fn zero_weight_is_rejected() {
    let mut combined = CombinedDomainXyPlot::new(ValueAxis::new("x"));
    assert!(matches!(combined.add(xy("s", vec![[0.0, 1.0]]), 0), Err(ChartError::InvalidWeight(0))));
    assert!(combined.subplots().is_empty());
}

#[test]
fn subplot_data_areas_line_up() {
    let chart = Chart::new(two_subplots());
    let info = chart.draw(&mut RecordingCanvas::new(), Rect::new(0.0, 0.0, 640.0, 480.0), None);

    let subs = &info.plot.subplots;
    assert_eq!(subs.len(), 2);
    let (a, b) = (subs[0].data_area, subs[1].data_area);
    assert!((a.min_x() - b.min_x()).abs() < 1e-9, "left edges differ: {a:?} vs {b:?}");
    assert!((a.width - b.width).abs() < 1e-9);
    assert!(a.max_y() <= b.min_y());

    let ratio = b.height / a.height;
    assert!((2.5..3.5).contains(&ratio), "weights not honoured: {ratio}");

    // The shared axis spans the union of both subplots' x values.
    let ChartPlot::CombinedDomainXy(plot) = &chart.plot else {
        unreachable!()
    };
    let range = plot.visible_range();
    assert!(range.lower <= 0.0 && range.upper >= 20.0);
}

#[test]
fn range_zoom_only_touches_the_subplot_under_the_cursor() {
    let mut chart = Chart::new(two_subplots());
    let info = chart.draw(&mut RecordingCanvas::new(), Rect::new(0.0, 0.0, 640.0, 480.0), None);
    let lower = info.plot.subplots[1].data_area;
    let source = lower.center();

    let zoom = chart.zoomable_mut().unwrap();
    zoom.zoom_range_axes(0.5, &info.plot, source, true);

    let ChartPlot::CombinedDomainXy(plot) = &chart.plot else {
        unreachable!()
    };
    assert!(plot.subplots()[0].range_axis.auto_range);
    assert!(!plot.subplots()[1].range_axis.auto_range);

    chart.restore_auto_bounds();
    let ChartPlot::CombinedDomainXy(plot) = &chart.plot else {
        unreachable!()
    };
    assert!(plot.subplots().iter().all(|s| s.range_axis.auto_range));
}

#[test]
fn panning_the_shared_axis_moves_every_subplot() {
    let mut chart = Chart::new(two_subplots());
    let info = chart.draw(&mut RecordingCanvas::new(), Rect::new(0.0, 0.0, 640.0, 480.0), None);
    let ChartPlot::CombinedDomainXy(plot) = &chart.plot else {
        unreachable!()
    };
    let before = plot.visible_range();

    chart
        .pannable_mut()
        .unwrap()
        .pan_domain_axes(0.25, &info.plot, DVec2::new(320.0, 240.0));

    let ChartPlot::CombinedDomainXy(plot) = &chart.plot else {
        unreachable!()
    };
    let after = plot.domain_axis.range;
    assert!((after.lower - (before.lower + before.length() * 0.25)).abs() < 1e-9);
    assert!((after.length() - before.length()).abs() < 1e-9);
}

#[test]
fn shared_category_axis_unions_categories() {
    let first = CategoryDataset::new()
        .with_value(1.0, "s1", "Jan")
        .with_value(2.0, "s1", "Feb");
    let second = CategoryDataset::new()
        .with_value(3.0, "s2", "Feb")
        .with_value(4.0, "s2", "Mar");
    let mut combined = CombinedDomainCategoryPlot::new(CategoryAxis::new("month"));
    for ds in [first, second] {
        let plot = CategoryPlot::new(ds, CategoryAxis::new(""), ValueAxis::new("v"), CategoryRenderer::bar());
        combined.add(plot, 1).unwrap();
    }
    assert_eq!(combined.categories(), vec!["Jan", "Feb", "Mar"]);

    let chart = Chart::new(combined);
    let info = chart.draw(&mut RecordingCanvas::new(), Rect::new(0.0, 0.0, 500.0, 400.0), None);
    assert_eq!(info.plot.subplots.len(), 2);
    assert_eq!(chart.legend_items().len(), 2);
}
