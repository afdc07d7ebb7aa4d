//! A wafer map of simulated chip yields beside a compass and a thermometer.
//! Click a chip to read its value; "Resample" draws a new wafer.
use iced_chart::wafer_map::{NotchOrientation, PaintIndexBasis};
use iced_chart::{
    Chart, ChartBuilder, ChartPlot, ChartUiMessage, ChartWidget, CompassPlot, EntityKind,
    ThermometerPlot, ValueDataset, WaferMapDataset, WaferMapPlot, WaferMapRenderer,
};

use iced::widget::{button, column, row, text};
use iced::{Element, Length};
use rand_distr::{Distribution, Normal};
use tracing_subscriber::EnvFilter;

const CHIPS: u32 = 24;

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    iced::application(App::new, App::update, App::view).run()
}

struct App {
    wafer: ChartWidget,
    compass: ChartWidget,
    thermometer: ChartWidget,
    status: String,
}

#[derive(Debug, Clone)]
enum Message {
    Wafer(ChartUiMessage),
    Compass(ChartUiMessage),
    Thermometer(ChartUiMessage),
    Resample,
}

/// Chips inside the wafer circle get a yield drawn from a normal distribution
/// that sags towards the edge.
fn sample_wafer() -> WaferMapDataset {
    let mut rng = rand::rng();
    let noise = Normal::new(0.0, 4.0).unwrap();
    let mut ds = WaferMapDataset::new(CHIPS, CHIPS, 1.0).unwrap();
    let c = (CHIPS as f64 - 1.0) / 2.0;
    for y in 0..CHIPS {
        for x in 0..CHIPS {
            let r = ((x as f64 - c).powi(2) + (y as f64 - c).powi(2)).sqrt() / c;
            if r > 1.0 {
                continue;
            }
            let value = (95.0 - 25.0 * r * r + noise.sample(&mut rng)).clamp(0.0, 100.0);
            ds.add_value(value.round(), x, y).unwrap();
        }
    }
    ds
}

fn wafer_chart() -> Chart {
    let plot = WaferMapPlot::new(sample_wafer())
        .with_renderer(WaferMapRenderer::new(12, PaintIndexBasis::Value))
        .with_notch(NotchOrientation::Down);
    ChartBuilder::new()
        .with_title("Lot 7 yield")
        .with_plot(plot)
        .build()
        .unwrap()
}

impl App {
    fn new() -> Self {
        let compass = ChartBuilder::new()
            .with_title("Wind")
            .with_plot(CompassPlot::new(ValueDataset::new(225.0)))
            .with_legend(false)
            .build()
            .unwrap();
        let thermometer = ChartBuilder::new()
            .with_title("Furnace")
            .with_plot(ThermometerPlot::new(ValueDataset::new(62.5)))
            .with_legend(false)
            .build()
            .unwrap();
        Self {
            wafer: ChartWidget::new(wafer_chart()),
            compass: ChartWidget::new(compass),
            thermometer: ChartWidget::new(thermometer),
            status: "Click a chip".to_owned(),
        }
    }

    fn update(&mut self, message: Message) {
        match message {
            Message::Wafer(msg) => {
                if let ChartUiMessage::EntityClicked(click) = &msg
                    && let EntityKind::WaferChip { x, y, value } = click.entity.kind
                {
                    self.status = format!("chip ({x}, {y}): {value}");
                }
                self.wafer.update(msg);
            }
            Message::Compass(msg) => self.compass.update(msg),
            Message::Thermometer(msg) => self.thermometer.update(msg),
            Message::Resample => {
                if let ChartPlot::WaferMap(plot) = &mut self.wafer.chart_mut().plot {
                    plot.dataset = sample_wafer();
                }
            }
        }
    }

    fn view(&self) -> Element<'_, Message> {
        column![
            row![
                button(text("Resample")).on_press(Message::Resample),
                text(&self.status).size(14.0),
            ]
            .spacing(12.0),
            row![
                self.wafer.view().map(Message::Wafer),
                column![
                    self.compass.view().map(Message::Compass),
                    self.thermometer.view().map(Message::Thermometer),
                ]
                .width(Length::FillPortion(1)),
            ]
            .height(Length::Fill),
        ]
        .spacing(8.0)
        .padding(8.0)
        .into()
    }
}
