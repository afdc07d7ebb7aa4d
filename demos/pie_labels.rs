//! A crowded pie chart next to a ring chart. Click a section to see its tooltip.
use iced_chart::ring_plot::CenterText;
use iced_chart::{
    ChartBuilder, ChartUiMessage, ChartWidget, PieDataset, PiePlot, RingPlot,
};

use iced::widget::{column, row, text};
use iced::{Element, Length};
use tracing_subscriber::EnvFilter;

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    iced::application(App::new, App::update, App::view).run()
}

struct App {
    pie: ChartWidget,
    ring: ChartWidget,
    status: String,
}

#[derive(Debug, Clone)]
enum Message {
    Pie(ChartUiMessage),
    Ring(ChartUiMessage),
}

fn browser_share() -> PieDataset {
    [
        ("Chrome", 64.7),
        ("Safari", 18.6),
        ("Edge", 5.2),
        ("Firefox", 2.8),
        ("Samsung Internet", 2.5),
        ("Opera", 2.2),
        ("UC Browser", 0.9),
        ("Android", 0.6),
        ("Yandex", 0.5),
        ("QQ", 0.4),
        ("Other", 1.6),
    ]
    .into_iter()
    .fold(PieDataset::new(), |ds, (k, v)| ds.with_value(k, v))
}

impl App {
    fn new() -> Self {
        let mut pie = PiePlot::new(browser_share());
        pie.set_explode_percent("Firefox", 0.25);
        let pie = ChartBuilder::new()
            .with_title("Browser share")
            .with_plot(pie)
            .build()
            .unwrap();

        let ring = RingPlot::new(browser_share())
            .with_section_depth(0.35)
            .with_center_text(CenterText::FirstValue);
        let ring = ChartBuilder::new()
            .with_title("As a ring")
            .with_plot(ring)
            .with_legend(false)
            .build()
            .unwrap();

        Self {
            pie: ChartWidget::new(pie),
            ring: ChartWidget::new(ring),
            status: "Click a section".to_owned(),
        }
    }

    fn update(&mut self, message: Message) {
        let (widget, msg) = match message {
            Message::Pie(msg) => (&mut self.pie, msg),
            Message::Ring(msg) => (&mut self.ring, msg),
        };
        if let ChartUiMessage::EntityClicked(click) = &msg {
            self.status = click
                .entity
                .tooltip
                .clone()
                .unwrap_or_else(|| format!("{:?}", click.entity.kind));
        }
        widget.update(msg);
    }

    fn view(&self) -> Element<'_, Message> {
        column![
            row![
                self.pie.view().map(Message::Pie),
                self.ring.view().map(Message::Ring),
            ]
            .height(Length::Fill),
            text(&self.status).size(14.0),
        ]
        .padding(8.0)
        .into()
    }
}
