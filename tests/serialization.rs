use iced_chart::{
    CategoryAxis, CategoryDataset, CategoryPlot, CategoryRenderer, Chart, ChartBuilder, ChartPlot,
    ChartTheme, Color, CombinedDomainXyPlot, CompassPlot, PieDataset, PiePlot, RingPlot,
    Range, ThermometerPlot, ValueAxis, ValueDataset, WaferMapDataset, WaferMapPlot, XyDataset, XyPlot,
    XyRenderer, XySeries,
};

fn xy() -> XyPlot {
    let ds = XyDataset::new()
        .with_series("a", XySeries::from_points(vec![[0.0, 1.5], [1.0, -2.25], [2.0, 1e-7]]))
        .with_series("b", XySeries::from_points(vec![[0.5, 3.0]]));
    XyPlot::new(ds, ValueAxis::new("x"), ValueAxis::new("y"), XyRenderer::lines_and_shapes())
}

fn round_trip(chart: &Chart) -> Chart {
    let json = chart.to_json().unwrap();
    Chart::from_json(&json).unwrap()
}

#[test]
fn every_plot_kind_survives_json() {
    let mut pie = PiePlot::new(PieDataset::new().with_value("one", 1.0).with_value("none", None));
    pie.set_explode_percent("one", 0.3);
    pie.set_section_paint("one", Color::from_rgb8(12, 34, 56));

    let mut wafer = WaferMapDataset::new(3, 3, 1.0).unwrap();
    wafer.add_value(4.5, 0, 1).unwrap();
    wafer.add_value(7.0, 2, 2).unwrap();

    let mut combined = CombinedDomainXyPlot::new(ValueAxis::new("shared"));
    combined.add(xy(), 2).unwrap();
    combined.add(xy(), 1).unwrap();

    let category = CategoryPlot::new(
        CategoryDataset::new().with_value(1.0, "r", "c"),
        CategoryAxis::new("c"),
        ValueAxis::new("v"),
        CategoryRenderer::stacked_bar(),
    );

    let plots: Vec<ChartPlot> = vec![
        pie.into(),
        RingPlot::new(PieDataset::new().with_value("a", 2.0)).into(),
        category.into(),
        xy().into(),
        combined.into(),
        CompassPlot::new(ValueDataset::new(270.0)).into(),
        WaferMapPlot::new(wafer).into(),
        ThermometerPlot::new(ValueDataset::new(42.0)).into(),
    ];
    for plot in plots {
        let chart = ChartBuilder::new().with_title("round trip").with_plot(plot).build().unwrap();
        assert_eq!(round_trip(&chart), chart);
    }
}

#[test]
fn zoomed_axes_keep_their_range() {
    let mut plot = xy();
    plot.domain_axis.set_range(Range { lower: -1.0, upper: 4.0 });
    let chart = Chart::new(plot);
    let back = round_trip(&chart);
    let ChartPlot::Xy(p) = &back.plot else {
        panic!("wrong plot type");
    };
    assert!(!p.domain_axis.auto_range);
    assert_eq!((p.domain_axis.range.lower, p.domain_axis.range.upper), (-1.0, 4.0));
}

#[test]
fn malformed_json_is_an_error() {
    assert!(Chart::from_json("{\"plot\": {\"Nope\": {}}}").is_err());
    assert!(Chart::from_json("not json").is_err());
}

#[test]
fn themes_apply_after_loading() {
    let theme = ChartTheme::from_json(&ChartTheme::darkness().to_json_pretty().unwrap()).unwrap();
    let mut chart = Chart::new(xy());
    theme.apply(&mut chart);
    assert_eq!(chart.background_paint, Some(Color::BLACK));
    let back = round_trip(&chart);
    assert_eq!(back, chart);
}
