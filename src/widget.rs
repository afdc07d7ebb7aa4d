//! The iced canvas widget: paints a [`Chart`] and turns mouse and keyboard
//! input into zoom, pan and click messages.
use std::sync::atomic::{AtomicU64, Ordering};

use glam::DVec2;
use iced::{
    Element, Length, Point, Rectangle, Renderer, Theme, Vector,
    keyboard,
    mouse::{self, Interaction},
    time::Instant,
    widget::{
        canvas::{self, Frame, LineDash},
        text::LineHeight,
    },
};
use tracing::{debug, trace, warn};

use crate::chart::Chart;
use crate::color::Color;
use crate::controls::ChartControls;
use crate::geometry::Rect;
use crate::graphics::{Graphics, RecordingCanvas, TextItem};
use crate::info::ChartRenderingInfo;
use crate::message::{ChartUiMessage, EntityClick};
use crate::shape::{Path, PathCommand};
use crate::style::{Font, Stroke};
use crate::text::{DeterministicTextMeasurer, TextMeasurer, TextMetrics};
use crate::zoom::PlotOrientation;

/// Drags shorter than this (in pixels) count as clicks.
const DRAG_THRESHOLD: f64 = 4.0;

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

/// A [`Graphics`] surface that paints onto an iced canvas [`Frame`].
///
/// Text is measured with the same [`DeterministicTextMeasurer`] the headless
/// [`RecordingCanvas`] uses, so hit testing and painting agree on layout.
pub struct FrameGraphics<'a> {
    frame: &'a mut Frame,
    /// Subtracted from every coordinate; the top-left of the current clip.
    origin: DVec2,
    measurer: DeterministicTextMeasurer,
    /// Commands held back until their clip region closes.
    clips: Vec<(Rect, RecordingCanvas)>,
}

impl<'a> FrameGraphics<'a> {
    pub fn new(frame: &'a mut Frame) -> Self {
        Self::with_origin(frame, DVec2::ZERO, DeterministicTextMeasurer::default())
    }

    fn with_origin(frame: &'a mut Frame, origin: DVec2, measurer: DeterministicTextMeasurer) -> Self {
        Self {
            frame,
            origin,
            measurer,
            clips: Vec::new(),
        }
    }

    fn point(&self, p: DVec2) -> Point {
        let p = p - self.origin;
        Point::new(p.x as f32, p.y as f32)
    }

    fn to_canvas_path(&self, path: &Path) -> canvas::Path {
        canvas::Path::new(|b| {
            for cmd in path.commands() {
                match *cmd {
                    PathCommand::MoveTo(p) => b.move_to(self.point(p)),
                    PathCommand::LineTo(p) => b.line_to(self.point(p)),
                    PathCommand::CubicTo(c1, c2, p) => {
                        b.bezier_curve_to(self.point(c1), self.point(c2), self.point(p))
                    }
                    PathCommand::Close => b.close(),
                }
            }
        })
    }

    fn recording(&mut self) -> Option<&mut RecordingCanvas> {
        self.clips.last_mut().map(|(_, rec)| rec)
    }
}

fn iced_font(font: &Font) -> iced::Font {
    let base = if font.family.eq_ignore_ascii_case("monospaced") {
        iced::Font::MONOSPACE
    } else {
        iced::Font::DEFAULT
    };
    if font.bold {
        iced::Font {
            weight: iced::font::Weight::Bold,
            ..base
        }
    } else {
        base
    }
}

impl Graphics for FrameGraphics<'_> {
    fn fill_path(&mut self, path: &Path, color: Color) {
        if let Some(rec) = self.recording() {
            rec.fill_path(path, color);
            return;
        }
        let p = self.to_canvas_path(path);
        self.frame.fill(
            &p,
            canvas::Fill {
                style: canvas::Style::Solid(color.into()),
                rule: canvas::fill::Rule::EvenOdd,
            },
        );
    }

    fn stroke_path(&mut self, path: &Path, color: Color, stroke: &Stroke) {
        if let Some(rec) = self.recording() {
            rec.stroke_path(path, color, stroke);
            return;
        }
        let p = self.to_canvas_path(path);
        self.frame.stroke(
            &p,
            canvas::Stroke {
                style: canvas::Style::Solid(color.into()),
                width: stroke.width,
                line_dash: LineDash {
                    segments: &stroke.dash,
                    offset: 0,
                },
                ..canvas::Stroke::default()
            },
        );
    }

    fn draw_text(&mut self, text: &TextItem) {
        if let Some(rec) = self.recording() {
            rec.draw_text(text);
            return;
        }
        let (align_x, align_y) = {
            use crate::style::TextAnchor::*;
            use iced::Alignment::{Center as Mid, End, Start};
            match text.anchor {
                TopLeft => (Start, Start),
                TopCenter => (Mid, Start),
                TopRight => (End, Start),
                CenterLeft => (Start, Mid),
                Center => (Mid, Mid),
                CenterRight => (End, Mid),
                BottomLeft => (Start, End),
                BottomCenter => (Mid, End),
                BottomRight => (End, End),
            }
        };
        let position = self.point(text.position);
        let label = canvas::Text {
            content: text.content.clone(),
            position,
            color: text.color.into(),
            size: text.font.size.into(),
            line_height: LineHeight::Relative(self.measurer.line_height_factor as f32),
            font: iced_font(&text.font),
            align_x: align_x.into(),
            align_y: align_y.into(),
            ..canvas::Text::default()
        };
        if text.rotation == 0.0 {
            self.frame.fill_text(label);
        } else {
            self.frame.with_save(|frame| {
                frame.translate(Vector::new(position.x, position.y));
                frame.rotate(text.rotation as f32);
                frame.fill_text(canvas::Text {
                    position: Point::ORIGIN,
                    ..label
                });
            });
        }
    }

    fn measure_text(&self, text: &str, font: &Font) -> TextMetrics {
        self.measurer.measure(text, font)
    }

    fn push_clip(&mut self, rect: Rect) {
        self.clips.push((rect, RecordingCanvas::with_measurer(self.measurer)));
    }

    fn pop_clip(&mut self) {
        let Some((rect, recorded)) = self.clips.pop() else {
            warn!("pop_clip without a matching push_clip");
            return;
        };
        if let Some(parent) = self.recording() {
            parent.push_clip(rect);
            recorded.replay(parent);
            parent.pop_clip();
            return;
        }
        let top_left = self.point(DVec2::new(rect.x, rect.y));
        let region = Rectangle::new(
            top_left,
            iced::Size::new(rect.width.max(0.0) as f32, rect.height.max(0.0) as f32),
        );
        let measurer = self.measurer;
        self.frame.with_clip(region, |frame| {
            let mut inner = FrameGraphics::with_origin(frame, DVec2::new(rect.x, rect.y), measurer);
            recorded.replay(&mut inner);
        });
    }
}

/// An interactive chart for iced applications.
///
/// Feed the messages produced by [`ChartWidget::view`] back into
/// [`ChartWidget::update`].
pub struct ChartWidget {
    pub(crate) instance_id: u64,
    /// Bumped whenever the chart changes, so cached layouts are rebuilt.
    pub(crate) revision: u64,
    chart: Chart,
    pub(crate) controls: ChartControls,
    anchor: Option<DVec2>,
    cache: canvas::Cache,
}

impl ChartWidget {
    pub fn new(chart: Chart) -> Self {
        Self {
            instance_id: NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed),
            revision: 0,
            chart,
            controls: ChartControls::default(),
            anchor: None,
            cache: canvas::Cache::new(),
        }
    }

    pub fn with_controls(mut self, controls: ChartControls) -> Self {
        self.controls = controls;
        self
    }

    pub fn set_controls(&mut self, controls: ChartControls) {
        self.controls = controls;
    }

    pub fn chart(&self) -> &Chart {
        &self.chart
    }

    /// Mutable access to the chart; the next frame repaints it.
    pub fn chart_mut(&mut self) -> &mut Chart {
        self.invalidate();
        &mut self.chart
    }

    pub fn anchor(&self) -> Option<DVec2> {
        self.anchor
    }

    fn invalidate(&mut self) {
        self.revision = self.revision.wrapping_add(1);
        self.cache.clear();
    }

    /// Lay the chart out headlessly in `viewport`, as the next paint will.
    pub fn layout(&self, viewport: Rect) -> ChartRenderingInfo {
        let mut canvas = RecordingCanvas::new();
        self.chart.draw(&mut canvas, viewport, self.anchor)
    }

    fn orientation(&self) -> PlotOrientation {
        self.chart.zoomable().map(|z| z.orientation()).unwrap_or_default()
    }

    fn refresh_crosshairs(&mut self, viewport: Rect) {
        let info = self.layout(viewport);
        self.chart.apply_rendering_info(&info);
    }

    /// Handle a message sent by the widget.
    pub fn update(&mut self, msg: ChartUiMessage) {
        match msg {
            ChartUiMessage::ToggleLegend => {
                if let Some(legend) = &mut self.chart.legend {
                    legend.visible = !legend.visible;
                }
            }
            ChartUiMessage::Pan {
                domain_percent,
                range_percent,
                source,
                viewport,
            } => {
                let info = self.layout(viewport);
                if let Some(p) = self.chart.pannable_mut() {
                    if domain_percent != 0.0 && p.is_domain_pannable() {
                        p.pan_domain_axes(domain_percent, &info.plot, source);
                    }
                    if range_percent != 0.0 && p.is_range_pannable() {
                        p.pan_range_axes(range_percent, &info.plot, source);
                    }
                }
            }
            ChartUiMessage::Zoom {
                factor,
                source,
                viewport,
            } => {
                let info = self.layout(viewport);
                if let Some(z) = self.chart.zoomable_mut() {
                    debug!(factor, "zooming about cursor");
                    if z.is_domain_zoomable() {
                        z.zoom_domain_axes(factor, &info.plot, source, true);
                    }
                    if z.is_range_zoomable() {
                        z.zoom_range_axes(factor, &info.plot, source, true);
                    }
                }
            }
            ChartUiMessage::ZoomBox { from, to, viewport } => {
                let info = self.layout(viewport);
                let orientation = self.orientation();
                let Some((domain, range)) = box_zoom_fractions(info.plot.data_area, from, to, orientation) else {
                    return;
                };
                let source = (from + to) / 2.0;
                if let Some(z) = self.chart.zoomable_mut() {
                    debug!(?domain, ?range, "box zoom");
                    if z.is_domain_zoomable() {
                        z.zoom_domain_axes_range(domain.0, domain.1, &info.plot, source);
                    }
                    if z.is_range_zoomable() {
                        z.zoom_range_axes_range(range.0, range.1, &info.plot, source);
                    }
                }
            }
            ChartUiMessage::RestoreAutoBounds => self.chart.restore_auto_bounds(),
            ChartUiMessage::EntityClicked(EntityClick {
                position, viewport, ..
            }) => {
                self.anchor = Some(position);
                self.refresh_crosshairs(viewport);
            }
            ChartUiMessage::SetAnchor { anchor, viewport } => {
                self.anchor = anchor;
                self.refresh_crosshairs(viewport);
            }
        }
        self.invalidate();
    }

    /// View the chart widget.
    pub fn view(&self) -> Element<'_, ChartUiMessage> {
        canvas::Canvas::new(self).width(Length::Fill).height(Length::Fill).into()
    }
}

/// Fractions of the data area covered by a dragged box, as
/// `((domain_lower, domain_upper), (range_lower, range_upper))`.
pub fn box_zoom_fractions(
    data_area: Rect,
    from: DVec2,
    to: DVec2,
    orientation: PlotOrientation,
) -> Option<((f64, f64), (f64, f64))> {
    if data_area.is_empty() {
        return None;
    }
    let sel = Rect::from_corners(from, to);
    let (x0, x1) = (sel.min_x().max(data_area.min_x()), sel.max_x().min(data_area.max_x()));
    let (y0, y1) = (sel.min_y().max(data_area.min_y()), sel.max_y().min(data_area.max_y()));
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    let h = (
        (x0 - data_area.min_x()) / data_area.width,
        (x1 - data_area.min_x()) / data_area.width,
    );
    let v = (
        (data_area.max_y() - y1) / data_area.height,
        (data_area.max_y() - y0) / data_area.height,
    );
    Some(match orientation {
        PlotOrientation::Vertical => (h, v),
        PlotOrientation::Horizontal => (v, h),
    })
}

/// Pan percentages for a drag of `delta` pixels across `data_area`.
pub fn drag_pan_percents(data_area: Rect, delta: DVec2, orientation: PlotOrientation) -> (f64, f64) {
    if data_area.width <= 0.0 || data_area.height <= 0.0 {
        return (0.0, 0.0);
    }
    let w = -delta.x / data_area.width;
    let h = delta.y / data_area.height;
    match orientation {
        PlotOrientation::Vertical => (w, h),
        PlotOrientation::Horizontal => (h, w),
    }
}

#[derive(Debug, Clone)]
struct CachedLayout {
    instance_id: u64,
    revision: u64,
    viewport: Rect,
    info: ChartRenderingInfo,
}

#[derive(Debug, Default, Clone)]
pub(crate) struct PanState {
    pub(crate) active: bool,
    pub(crate) start: DVec2,
    pub(crate) last: DVec2,
    /// Set once the drag passes the click threshold.
    pub(crate) moved: bool,
}

#[derive(Debug, Default, Clone)]
pub(crate) struct SelectionState {
    pub(crate) active: bool,
    pub(crate) start: DVec2,
    pub(crate) end: DVec2,
}

/// Interaction state kept by iced between events.
///
/// Not part of the public API, but pub visibility is required for the canvas implementation.
#[derive(Debug, Default)]
pub struct WidgetState {
    layout: Option<CachedLayout>,
    pub(crate) viewport: Rect,
    pub(crate) cursor: DVec2,
    pub(crate) modifiers: keyboard::Modifiers,
    pub(crate) pan: PanState,
    pub(crate) selection: SelectionState,
    pub(crate) last_click: Option<Instant>,
}

impl WidgetState {
    fn info(&mut self, widget: &ChartWidget) -> &ChartRenderingInfo {
        let stale = self.layout.as_ref().is_none_or(|l| {
            l.instance_id != widget.instance_id || l.revision != widget.revision || l.viewport != self.viewport
        });
        if stale {
            trace!(revision = widget.revision, "rebuilding hit-test layout");
            self.layout = None;
        }
        let viewport = self.viewport;
        &self
            .layout
            .get_or_insert_with(|| CachedLayout {
                instance_id: widget.instance_id,
                revision: widget.revision,
                viewport,
                info: widget.layout(viewport),
            })
            .info
    }

    pub(crate) fn press_left(&mut self, widget: &ChartWidget, pos: DVec2, now: Instant) -> Option<ChartUiMessage> {
        let double = self
            .last_click
            .is_some_and(|prev| now.duration_since(prev).as_millis() < u128::from(widget.controls.zoom.double_click_ms));
        self.last_click = Some(now);
        if double && widget.controls.zoom.double_click_restore {
            self.last_click = None;
            self.pan = PanState::default();
            return Some(ChartUiMessage::RestoreAutoBounds);
        }
        self.pan = PanState {
            active: true,
            start: pos,
            last: pos,
            moved: false,
        };
        None
    }

    pub(crate) fn release_left(&mut self, widget: &ChartWidget, pos: DVec2) -> Option<ChartUiMessage> {
        let pan = std::mem::take(&mut self.pan);
        if !pan.active || pan.moved || !widget.controls.pick.click {
            return None;
        }
        let viewport = self.viewport;
        match self.info(widget).entity_at(pos) {
            Some(entity) => Some(ChartUiMessage::EntityClicked(EntityClick {
                entity: entity.clone(),
                position: pos,
                viewport,
            })),
            None => Some(ChartUiMessage::SetAnchor {
                anchor: Some(pos),
                viewport,
            }),
        }
    }

    /// Returns a message to publish and whether the overlay needs repainting.
    pub(crate) fn cursor_moved(&mut self, widget: &ChartWidget, pos: DVec2) -> (Option<ChartUiMessage>, bool) {
        self.cursor = pos;
        if self.selection.active {
            self.selection.end = pos;
            return (None, true);
        }
        if !self.pan.active || !widget.controls.pan.drag {
            return (None, false);
        }
        if !self.pan.moved && (pos - self.pan.start).length() <= DRAG_THRESHOLD {
            return (None, false);
        }
        self.pan.moved = true;
        let delta = pos - self.pan.last;
        self.pan.last = pos;
        if delta == DVec2::ZERO {
            return (None, false);
        }
        let data_area = self.info(widget).plot.data_area;
        let (domain_percent, range_percent) = drag_pan_percents(data_area, delta, widget.orientation());
        (
            Some(ChartUiMessage::Pan {
                domain_percent,
                range_percent,
                source: self.pan.start,
                viewport: self.viewport,
            }),
            false,
        )
    }

    pub(crate) fn press_right(&mut self, widget: &ChartWidget, pos: DVec2) -> bool {
        if !widget.controls.zoom.box_select {
            return false;
        }
        self.selection = SelectionState {
            active: true,
            start: pos,
            end: pos,
        };
        true
    }

    pub(crate) fn release_right(&mut self, widget: &ChartWidget, pos: DVec2) -> Option<ChartUiMessage> {
        let selection = std::mem::take(&mut self.selection);
        let size = (pos - selection.start).abs();
        if !selection.active || size.max_element() < widget.controls.zoom.min_box_size {
            return None;
        }
        Some(ChartUiMessage::ZoomBox {
            from: selection.start,
            to: pos,
            viewport: self.viewport,
        })
    }

    pub(crate) fn wheel(&mut self, widget: &ChartWidget, pos: DVec2, x: f32, y: f32) -> Option<ChartUiMessage> {
        if self.modifiers.contains(keyboard::Modifiers::CTRL) {
            if !widget.controls.zoom.ctrl_wheel || y == 0.0 {
                return None;
            }
            let step = widget.controls.zoom.wheel_factor;
            let factor = if y > 0.0 { 1.0 - step } else { 1.0 + step };
            return Some(ChartUiMessage::Zoom {
                factor,
                source: pos,
                viewport: self.viewport,
            });
        }
        if !widget.controls.pan.wheel {
            return None;
        }
        let step = widget.controls.pan.wheel_step;
        let ratio = y / x;
        let delta = if ratio.abs() > 2.0 {
            // Mostly vertical scroll.
            DVec2::new(0.0, -step * f64::from(y.signum()))
        } else if ratio.abs() < 0.5 {
            DVec2::new(-step * f64::from(x.signum()), 0.0)
        } else {
            return None;
        };
        let data_area = self.info(widget).plot.data_area;
        let (domain_percent, range_percent) = drag_pan_percents(data_area, delta, widget.orientation());
        Some(ChartUiMessage::Pan {
            domain_percent,
            range_percent,
            source: pos,
            viewport: self.viewport,
        })
    }

    pub(crate) fn escape(&mut self, widget: &ChartWidget) -> Option<ChartUiMessage> {
        self.selection = SelectionState::default();
        (widget.controls.pick.escape_clears_anchor && widget.anchor.is_some()).then_some(ChartUiMessage::SetAnchor {
            anchor: None,
            viewport: self.viewport,
        })
    }
}

fn local(cursor: mouse::Cursor, bounds: Rectangle) -> Option<DVec2> {
    cursor
        .position_in(bounds)
        .map(|p| DVec2::new(f64::from(p.x), f64::from(p.y)))
}

impl canvas::Program<ChartUiMessage> for ChartWidget {
    type State = WidgetState;

    fn update(
        &self,
        state: &mut Self::State,
        event: &iced::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<ChartUiMessage>> {
        state.viewport = Rect::new(0.0, 0.0, f64::from(bounds.width), f64::from(bounds.height));

        let (message, redraw) = match event {
            iced::Event::Mouse(mouse_event) => {
                let inside = local(cursor, bounds);
                // Drags keep going when the cursor leaves the widget.
                let pos = inside.or_else(|| {
                    cursor
                        .position()
                        .map(|p| DVec2::new(f64::from(p.x - bounds.x), f64::from(p.y - bounds.y)))
                });
                match (mouse_event, inside, pos) {
                    (mouse::Event::CursorMoved { .. }, _, Some(pos)) => state.cursor_moved(self, pos),
                    (mouse::Event::ButtonPressed(mouse::Button::Left), Some(pos), _) => {
                        (state.press_left(self, pos, Instant::now()), false)
                    }
                    (mouse::Event::ButtonReleased(mouse::Button::Left), _, Some(pos)) => {
                        (state.release_left(self, pos), false)
                    }
                    (mouse::Event::ButtonPressed(mouse::Button::Right), Some(pos), _) => {
                        (None, state.press_right(self, pos))
                    }
                    (mouse::Event::ButtonReleased(mouse::Button::Right), _, Some(pos)) => {
                        let was_active = state.selection.active;
                        (state.release_right(self, pos), was_active)
                    }
                    (mouse::Event::WheelScrolled { delta }, Some(pos), _) => {
                        let (x, y) = match *delta {
                            mouse::ScrollDelta::Lines { x, y } => (x, y),
                            mouse::ScrollDelta::Pixels { x, y } => (x, y),
                        };
                        (state.wheel(self, pos, x, y), false)
                    }
                    _ => (None, false),
                }
            }
            iced::Event::Keyboard(keyboard::Event::ModifiersChanged(modifiers)) => {
                state.modifiers = *modifiers;
                (None, false)
            }
            iced::Event::Keyboard(keyboard::Event::KeyPressed {
                key: keyboard::Key::Named(keyboard::key::Named::Escape),
                ..
            }) => {
                let redraw = state.selection.active;
                (state.escape(self), redraw)
            }
            _ => (None, false),
        };

        match message {
            Some(message) => Some(canvas::Action::publish(message).and_capture()),
            None => redraw.then(canvas::Action::request_redraw),
        }
    }

    fn draw(
        &self,
        state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let viewport = Rect::new(0.0, 0.0, f64::from(bounds.width), f64::from(bounds.height));
        let chart = self.cache.draw(renderer, bounds.size(), |frame| {
            let mut g = FrameGraphics::new(frame);
            self.chart.draw(&mut g, viewport, self.anchor);
        });
        let mut layers = vec![chart];

        if state.selection.active {
            let mut frame = Frame::new(renderer, bounds.size());
            let sel = Rect::from_corners(state.selection.start, state.selection.end);
            let mut g = FrameGraphics::new(&mut frame);
            g.fill_rect(sel, Color::rgba(0.2, 0.4, 1.0, 0.15));
            g.stroke_rect(sel, Color::rgba(0.2, 0.4, 1.0, 0.8), &Stroke::dashed(1.0, vec![4.0, 2.0]));
            layers.push(frame.into_geometry());
        }
        layers
    }

    fn mouse_interaction(&self, state: &Self::State, bounds: Rectangle, cursor: mouse::Cursor) -> Interaction {
        if state.pan.active && state.pan.moved {
            Interaction::Grabbing
        } else if state.selection.active {
            Interaction::Crosshair
        } else if let Some(pos) = local(cursor, bounds)
            && state
                .layout
                .as_ref()
                .and_then(|l| l.info.entity_at(pos))
                .is_some()
        {
            Interaction::Pointer
        } else {
            Interaction::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::ValueAxis;
    use crate::dataset::{XyDataset, XySeries};
    use crate::entity::EntityKind;
    use crate::xy_plot::{XyPlot, XyRenderer};
    use std::time::Duration;

    fn xy_widget() -> ChartWidget {
        let ds = XyDataset::new().with_series(
            "s",
            XySeries::from_points(vec![[0.0, 0.0], [5.0, 10.0], [10.0, 5.0]]),
        );
        let plot = XyPlot::new(ds, ValueAxis::new("x"), ValueAxis::new("y"), XyRenderer::shapes());
        ChartWidget::new(Chart::new(plot))
    }

    fn state() -> WidgetState {
        WidgetState {
            viewport: Rect::new(0.0, 0.0, 400.0, 300.0),
            ..WidgetState::default()
        }
    }

    #[test]
    fn box_fractions_measure_from_bottom_left() {
        let area = Rect::new(0.0, 0.0, 100.0, 100.0);
        let (d, r) = box_zoom_fractions(area, DVec2::new(20.0, 10.0), DVec2::new(60.0, 50.0), PlotOrientation::Vertical).unwrap();
        assert_eq!(d, (0.2, 0.6));
        assert_eq!(r, (0.5, 0.9));
        let (d, _) = box_zoom_fractions(area, DVec2::new(20.0, 10.0), DVec2::new(60.0, 50.0), PlotOrientation::Horizontal).unwrap();
        assert_eq!(d, (0.5, 0.9));
        assert!(box_zoom_fractions(area, DVec2::new(120.0, 10.0), DVec2::new(160.0, 50.0), PlotOrientation::Vertical).is_none());
    }

    #[test]
    fn drag_right_pans_domain_backwards() {
        let (d, r) = drag_pan_percents(Rect::new(0.0, 0.0, 200.0, 100.0), DVec2::new(20.0, 10.0), PlotOrientation::Vertical);
        assert_eq!(d, -0.1);
        assert_eq!(r, 0.1);
    }

    #[test]
    fn small_drags_are_clicks() {
        let widget = xy_widget();
        let mut s = state();
        let now = Instant::now();
        assert!(s.press_left(&widget, DVec2::new(100.0, 100.0), now).is_none());
        let (msg, _) = s.cursor_moved(&widget, DVec2::new(102.0, 101.0));
        assert!(msg.is_none());
        let msg = s.release_left(&widget, DVec2::new(102.0, 101.0));
        assert!(matches!(
            msg,
            Some(ChartUiMessage::SetAnchor { anchor: Some(_), .. } | ChartUiMessage::EntityClicked(_))
        ));
    }

    #[test]
    fn drag_publishes_pan() {
        let widget = xy_widget();
        let mut s = state();
        s.press_left(&widget, DVec2::new(100.0, 100.0), Instant::now());
        let (msg, _) = s.cursor_moved(&widget, DVec2::new(130.0, 100.0));
        let Some(ChartUiMessage::Pan { domain_percent, range_percent, .. }) = msg else {
            panic!("expected a pan, got {msg:?}");
        };
        assert!(domain_percent < 0.0);
        assert_eq!(range_percent, 0.0);
        assert!(s.release_left(&widget, DVec2::new(130.0, 100.0)).is_none());
    }

    #[test]
    fn double_click_restores_auto_bounds() {
        let widget = xy_widget();
        let mut s = state();
        let t0 = Instant::now();
        s.press_left(&widget, DVec2::new(50.0, 50.0), t0);
        s.release_left(&widget, DVec2::new(50.0, 50.0));
        let msg = s.press_left(&widget, DVec2::new(50.0, 50.0), t0 + Duration::from_millis(100));
        assert!(matches!(msg, Some(ChartUiMessage::RestoreAutoBounds)));
    }

    #[test]
    fn ctrl_wheel_zooms_and_plain_wheel_pans() {
        let widget = xy_widget();
        let mut s = state();
        assert!(matches!(
            s.wheel(&widget, DVec2::new(200.0, 150.0), 0.0, 1.0),
            Some(ChartUiMessage::Pan { range_percent, .. }) if range_percent < 0.0
        ));
        s.modifiers = keyboard::Modifiers::CTRL;
        assert!(matches!(
            s.wheel(&widget, DVec2::new(200.0, 150.0), 0.0, 1.0),
            Some(ChartUiMessage::Zoom { factor, .. }) if factor < 1.0
        ));
    }

    #[test]
    fn right_drag_box_zooms_the_chart() {
        let mut widget = xy_widget();
        let mut s = state();
        assert!(s.press_right(&widget, DVec2::new(100.0, 60.0)));
        let msg = s.release_right(&widget, DVec2::new(250.0, 200.0)).unwrap();
        let before = match &widget.chart().plot {
            crate::plot::ChartPlot::Xy(p) => p.visible_domain_range(),
            _ => unreachable!(),
        };
        widget.update(msg);
        let after = match &widget.chart().plot {
            crate::plot::ChartPlot::Xy(p) => p.domain_axis.range,
            _ => unreachable!(),
        };
        assert!(after.length() < before.length());
        widget.update(ChartUiMessage::RestoreAutoBounds);
        match &widget.chart().plot {
            crate::plot::ChartPlot::Xy(p) => assert!(p.domain_axis.auto_range),
            _ => unreachable!(),
        }
    }

    #[test]
    fn clicking_an_item_reports_it() {
        let widget = xy_widget();
        let mut s = state();
        let info = widget.layout(s.viewport);
        let item = info
            .plot
            .entities
            .iter()
            .find(|e| matches!(e.kind, EntityKind::XyItem { item: 1, .. }))
            .unwrap();
        let at = item.anchor.unwrap();
        s.press_left(&widget, at, Instant::now());
        let Some(ChartUiMessage::EntityClicked(click)) = s.release_left(&widget, at) else {
            panic!("expected an entity click");
        };
        assert!(matches!(click.entity.kind, EntityKind::XyItem { x, y, .. } if x == 5.0 && y == 10.0));
    }

    #[test]
    fn disabled_controls_ignore_gestures() {
        let widget = xy_widget().with_controls(ChartControls::disabled());
        let mut s = state();
        let p = DVec2::new(120.0, 120.0);
        assert!(s.wheel(&widget, p, 0.0, 1.0).is_none());
        assert!(!s.press_right(&widget, p));
        s.press_left(&widget, p, Instant::now());
        assert!(s.cursor_moved(&widget, p + DVec2::new(40.0, 0.0)).0.is_none());
        assert!(s.release_left(&widget, p).is_none());
    }

    #[test]
    fn escape_clears_anchor() {
        let mut widget = xy_widget();
        let mut s = state();
        assert!(s.escape(&widget).is_none());
        widget.update(ChartUiMessage::SetAnchor {
            anchor: Some(DVec2::new(10.0, 10.0)),
            viewport: s.viewport,
        });
        let msg = s.escape(&widget).unwrap();
        widget.update(msg);
        assert_eq!(widget.anchor(), None);
    }
}
