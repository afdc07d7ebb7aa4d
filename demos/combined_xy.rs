//! Three XY subplots sharing one time axis. Drag to pan, right-drag to box zoom,
//! Ctrl+scroll to zoom and click to move the crosshairs.
use iced_chart::{
    ChartBuilder, ChartTheme, ChartUiMessage, ChartWidget, CombinedDomainXyPlot, Crosshair,
    ValueAxis, XyDataset, XyPlot, XyRenderer, XySeries,
};

use iced::widget::{button, column, row, text};
use iced::{Element, Length};
use tracing_subscriber::EnvFilter;

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    iced::application(App::new, App::update, App::view).run()
}

struct App {
    widget: ChartWidget,
    dark: bool,
}

#[derive(Debug, Clone)]
enum Message {
    Chart(ChartUiMessage),
    ToggleTheme,
    ResetZoom,
}

fn subplot(label: &str, renderer: XyRenderer, f: impl Fn(f64) -> f64) -> XyPlot {
    let points = (0..200)
        .map(|i| {
            let t = i as f64 * 0.05;
            [t, f(t)]
        })
        .collect();
    let ds = XyDataset::new().with_series(label, XySeries::from_points(points));
    let mut plot = XyPlot::new(ds, ValueAxis::new("t"), ValueAxis::new(label), renderer);
    plot.domain_crosshair = Crosshair::visible();
    plot.range_crosshair = Crosshair::visible();
    plot
}

impl App {
    fn new() -> Self {
        let mut combined = CombinedDomainXyPlot::new(ValueAxis::new("time (s)"));
        combined
            .add(subplot("position", XyRenderer::line(), |t| (t * 1.3).sin() * 40.0), 3)
            .unwrap();
        combined
            .add(subplot("velocity", XyRenderer::step(), |t| (t * 1.3).cos() * 52.0), 1)
            .unwrap();
        combined
            .add(subplot("energy", XyRenderer::area(), |t| 1_000.0 + (t * 2.6).sin() * 800.0), 2)
            .unwrap();

        let chart = ChartBuilder::new()
            .with_title("Oscillator")
            .with_plot(combined)
            .build()
            .unwrap();
        Self {
            widget: ChartWidget::new(chart),
            dark: false,
        }
    }

    fn update(&mut self, message: Message) {
        match message {
            Message::Chart(msg) => self.widget.update(msg),
            Message::ToggleTheme => {
                self.dark = !self.dark;
                let theme = if self.dark {
                    ChartTheme::darkness()
                } else {
                    ChartTheme::default()
                };
                theme.apply(self.widget.chart_mut());
            }
            Message::ResetZoom => self.widget.update(ChartUiMessage::RestoreAutoBounds),
        }
    }

    fn view(&self) -> Element<'_, Message> {
        column![
            row![
                button(text("Toggle theme")).on_press(Message::ToggleTheme),
                button(text("Reset zoom")).on_press(Message::ResetZoom),
            ]
            .spacing(8.0),
            self.widget.view().map(Message::Chart),
        ]
        .spacing(8.0)
        .padding(8.0)
        .height(Length::Fill)
        .into()
    }
}
