//! The drawing surface plots paint onto.
//!
//! Plots only ever see `&mut dyn Graphics`. The [`RecordingCanvas`] keeps a
//! display list, which is what the tests inspect and what the canvas widget
//! replays onto an iced frame.
use glam::DVec2;

use crate::color::Color;
use crate::geometry::Rect;
use crate::shape::Path;
use crate::style::{Font, Stroke, TextAnchor};
use crate::text::{DeterministicTextMeasurer, TextMeasurer, TextMetrics};

/// A run of text to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    pub content: String,
    pub position: DVec2,
    pub font: Font,
    pub color: Color,
    pub anchor: TextAnchor,
    /// Rotation about `position` in radians, positive clockwise on screen.
    pub rotation: f64,
}

impl TextItem {
    pub fn new(content: impl Into<String>, position: DVec2, font: &Font, color: Color) -> Self {
        Self {
            content: content.into(),
            position,
            font: font.clone(),
            color,
            anchor: TextAnchor::Center,
            rotation: 0.0,
        }
    }

    pub fn with_anchor(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }
}

pub trait Graphics {
    fn fill_path(&mut self, path: &Path, color: Color);

    fn stroke_path(&mut self, path: &Path, color: Color, stroke: &Stroke);

    fn draw_text(&mut self, text: &TextItem);

    fn measure_text(&self, text: &str, font: &Font) -> TextMetrics;

    /// Restrict drawing to `rect` until the matching [`Graphics::pop_clip`].
    fn push_clip(&mut self, rect: Rect);

    fn pop_clip(&mut self);

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.fill_path(&Path::rectangle(rect), color);
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, stroke: &Stroke) {
        self.stroke_path(&Path::rectangle(rect), color, stroke);
    }

    fn draw_line(&mut self, from: DVec2, to: DVec2, color: Color, stroke: &Stroke) {
        self.stroke_path(&Path::line(from, to), color, stroke);
    }
}

/// One recorded drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Fill { path: Path, color: Color },
    Stroke { path: Path, color: Color, stroke: Stroke },
    Text(TextItem),
    PushClip(Rect),
    PopClip,
}

/// A headless [`Graphics`] that records a display list.
#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    commands: Vec<DrawCommand>,
    measurer: DeterministicTextMeasurer,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_measurer(measurer: DeterministicTextMeasurer) -> Self {
        Self {
            commands: Vec::new(),
            measurer,
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// All text runs, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &TextItem> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text(t) => Some(t),
            _ => None,
        })
    }

    pub fn fills(&self) -> impl Iterator<Item = (&Path, Color)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Fill { path, color } => Some((path, *color)),
            _ => None,
        })
    }

    pub fn strokes(&self) -> impl Iterator<Item = (&Path, Color)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Stroke { path, color, .. } => Some((path, *color)),
            _ => None,
        })
    }

    /// Play the recorded commands onto another surface.
    pub fn replay(&self, target: &mut dyn Graphics) {
        replay_commands(&self.commands, target);
    }
}

pub fn replay_commands(commands: &[DrawCommand], target: &mut dyn Graphics) {
    for cmd in commands {
        match cmd {
            DrawCommand::Fill { path, color } => target.fill_path(path, *color),
            DrawCommand::Stroke {
                path,
                color,
                stroke,
            } => target.stroke_path(path, *color, stroke),
            DrawCommand::Text(t) => target.draw_text(t),
            DrawCommand::PushClip(r) => target.push_clip(*r),
            DrawCommand::PopClip => target.pop_clip(),
        }
    }
}

impl Graphics for RecordingCanvas {
    fn fill_path(&mut self, path: &Path, color: Color) {
        if color.a <= 0.0 || path.is_empty() {
            return;
        }
        self.commands.push(DrawCommand::Fill {
            path: path.clone(),
            color,
        });
    }

    fn stroke_path(&mut self, path: &Path, color: Color, stroke: &Stroke) {
        if color.a <= 0.0 || stroke.width <= 0.0 || path.is_empty() {
            return;
        }
        self.commands.push(DrawCommand::Stroke {
            path: path.clone(),
            color,
            stroke: stroke.clone(),
        });
    }

    fn draw_text(&mut self, text: &TextItem) {
        if text.content.is_empty() {
            return;
        }
        self.commands.push(DrawCommand::Text(text.clone()));
    }

    fn measure_text(&self, text: &str, font: &Font) -> TextMetrics {
        self.measurer.measure(text, font)
    }

    fn push_clip(&mut self, rect: Rect) {
        self.commands.push(DrawCommand::PushClip(rect));
    }

    fn pop_clip(&mut self) {
        self.commands.push(DrawCommand::PopClip);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transparent_fills_are_not_recorded() {
        let mut g = RecordingCanvas::new();
        g.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::TRANSPARENT);
        g.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::RED);
        assert_eq!(g.fills().count(), 1);
    }

    #[test]
    fn replay_reproduces_display_list() {
        let mut a = RecordingCanvas::new();
        a.push_clip(Rect::new(0.0, 0.0, 5.0, 5.0));
        a.draw_line(DVec2::ZERO, DVec2::ONE, Color::BLACK, &Stroke::solid(1.0));
        a.draw_text(&TextItem::new("x", DVec2::ZERO, &Font::default(), Color::BLACK));
        a.pop_clip();

        let mut b = RecordingCanvas::new();
        a.replay(&mut b);
        assert_eq!(a.commands(), b.commands());
    }
}
