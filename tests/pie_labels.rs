use glam::DVec2;
use iced_chart::entity::EntityKind;
use iced_chart::text::TextBox;
use iced_chart::{
    Color, Font, PieDataset, PieLabelDistributor, PieLabelRecord, PiePlot, Plot,
    PlotRenderingInfo, RecordingCanvas, Rect,
};

fn crowded_pie() -> PieDataset {
    let mut data = PieDataset::new().with_value("Big", 100.0);
    for i in 0..10 {
        data.set_value(format!("S{i}"), 1.0);
    }
    data
}

#[test]
fn crowded_labels_do_not_overlap() {
    let plot = PiePlot::new(crowded_pie());
    let mut g = RecordingCanvas::new();
    let mut info = PlotRenderingInfo::new();
    let area = Rect::new(0.0, 0.0, 600.0, 600.0);
    plot.draw(&mut g, area, None, &mut info);

    let label_height = f64::from(plot.label_font.size) * 1.2 + 4.0;
    let keys: Vec<String> = plot.dataset.keys().map(str::to_owned).collect();
    let labels: Vec<DVec2> = g
        .texts()
        .filter(|t| t.color == plot.label_paint && keys.contains(&t.content))
        .map(|t| t.position)
        .collect();
    assert_eq!(labels.len(), keys.len());

    for left in [true, false] {
        let mut ys: Vec<f64> = labels
            .iter()
            .filter(|p| (p.x < area.center_x()) == left)
            .map(|p| p.y)
            .collect();
        ys.sort_by(f64::total_cmp);
        for pair in ys.windows(2) {
            assert!(
                pair[1] - pair[0] >= label_height - 1e-6,
                "labels {pair:?} overlap"
            );
        }
    }
}

#[test]
fn every_section_gets_an_entity() {
    let plot = PiePlot::new(crowded_pie());
    let mut g = RecordingCanvas::new();
    let mut info = PlotRenderingInfo::new();
    plot.draw(&mut g, Rect::new(0.0, 0.0, 400.0, 300.0), None, &mut info);

    let sections: Vec<&str> = info
        .entities
        .iter()
        .filter_map(|e| match &e.kind {
            EntityKind::PieSection { key, .. } => Some(key.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(sections.len(), 11);
    assert_eq!(sections[0], "Big");
}

#[test]
fn distributor_keeps_labels_inside_the_column() {
    let mut d = PieLabelDistributor::new();
    for (i, base_y) in [95.0, 100.0, 101.0, 102.0, 150.0, 151.0].into_iter().enumerate() {
        let key = format!("k{i}");
        let label = TextBox::new(&key, &Font::default(), Color::BLACK);
        d.add_record(PieLabelRecord::new(key, 0.0, base_y, label, 20.0, 0.0, 1.0));
    }
    d.distribute_labels(80.0, 200.0);

    assert!(!d.is_overlap());
    let records = d.records();
    assert!(records.windows(2).all(|w| w[0].base_y <= w[1].base_y));
    for r in records {
        assert!(r.lower_y() >= 80.0 - 1e-9 && r.upper_y() <= 280.0 + 1e-9, "{} escaped", r.key);
    }
}

#[test]
fn labels_that_cannot_fit_are_spread_evenly() {
    let mut d = PieLabelDistributor::new();
    for i in 0..5 {
        let key = format!("k{i}");
        let label = TextBox::new(&key, &Font::default(), Color::BLACK);
        d.add_record(PieLabelRecord::new(key, 0.0, 10.0, label, 20.0, 0.0, 1.0));
    }
    // 100 units of labels in a 90 unit column.
    d.distribute_labels(0.0, 90.0);

    let ys: Vec<f64> = d.records().iter().map(|r| r.allocated_y).collect();
    let steps: Vec<f64> = ys.windows(2).map(|w| w[1] - w[0]).collect();
    assert!(steps.iter().all(|s| (s - steps[0]).abs() < 1e-9));
    assert!((ys[0] - 10.0).abs() < 1e-9);
}
