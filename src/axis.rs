//! Value and category axes: range calculation, screen mapping, space
//! reservation and drawing.
use std::f64::consts::FRAC_PI_2;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::axis_scale::AxisScale;
use crate::color::Color;
use crate::dataset::Range;
use crate::geometry::{Insets, Rect, RectangleAnchor, RectangleEdge};
use crate::graphics::{Graphics, TextItem};
use crate::style::{Font, Stroke, TextAnchor};
use crate::text::TextBox;
use crate::ticks::{Tick, generate_ticks};
use crate::zoom::PlotOrientation;

/// Space taken by axes around a data area.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisSpace {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl AxisSpace {
    pub fn add(&mut self, space: f64, edge: RectangleEdge) {
        match edge {
            RectangleEdge::Top => self.top += space,
            RectangleEdge::Bottom => self.bottom += space,
            RectangleEdge::Left => self.left += space,
            RectangleEdge::Right => self.right += space,
        }
    }

    /// Grow each side to at least the matching side of `other`.
    pub fn ensure_at_least(&mut self, other: &AxisSpace) {
        self.top = self.top.max(other.top);
        self.bottom = self.bottom.max(other.bottom);
        self.left = self.left.max(other.left);
        self.right = self.right.max(other.right);
    }

    pub fn ensure_at_least_edge(&mut self, space: f64, edge: RectangleEdge) {
        match edge {
            RectangleEdge::Top => self.top = self.top.max(space),
            RectangleEdge::Bottom => self.bottom = self.bottom.max(space),
            RectangleEdge::Left => self.left = self.left.max(space),
            RectangleEdge::Right => self.right = self.right.max(space),
        }
    }

    /// `area` with this space removed from its sides.
    pub fn shrink(&self, area: Rect) -> Rect {
        Insets::new(self.top, self.left, self.bottom, self.right).trim(area)
    }
}

/// Where an axis sits relative to its plot, before orientation is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AxisLocation {
    #[default]
    BottomOrLeft,
    TopOrRight,
}

impl AxisLocation {
    pub fn opposite(self) -> Self {
        match self {
            Self::BottomOrLeft => Self::TopOrRight,
            Self::TopOrRight => Self::BottomOrLeft,
        }
    }

    /// Edge for a domain axis under `orientation`.
    pub fn domain_edge(self, orientation: PlotOrientation) -> RectangleEdge {
        match (orientation, self) {
            (PlotOrientation::Vertical, Self::BottomOrLeft) => RectangleEdge::Bottom,
            (PlotOrientation::Vertical, Self::TopOrRight) => RectangleEdge::Top,
            (PlotOrientation::Horizontal, Self::BottomOrLeft) => RectangleEdge::Left,
            (PlotOrientation::Horizontal, Self::TopOrRight) => RectangleEdge::Right,
        }
    }

    /// Edge for a range axis under `orientation`.
    pub fn range_edge(self, orientation: PlotOrientation) -> RectangleEdge {
        match (orientation, self) {
            (PlotOrientation::Vertical, Self::BottomOrLeft) => RectangleEdge::Left,
            (PlotOrientation::Vertical, Self::TopOrRight) => RectangleEdge::Right,
            (PlotOrientation::Horizontal, Self::BottomOrLeft) => RectangleEdge::Bottom,
            (PlotOrientation::Horizontal, Self::TopOrRight) => RectangleEdge::Top,
        }
    }
}

/// The result of drawing an axis.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AxisState {
    /// Position of the next axis on the same edge.
    pub cursor: f64,
    pub ticks: Vec<Tick>,
    /// Screen area the axis occupied.
    pub area: Rect,
}

/// Appearance settings shared by every axis kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisAppearance {
    pub visible: bool,
    pub label: Option<String>,
    pub label_font: Font,
    pub label_paint: Color,
    pub label_insets: Insets,
    pub axis_line_visible: bool,
    pub axis_line_paint: Color,
    pub axis_line_stroke: Stroke,
    pub tick_labels_visible: bool,
    pub tick_label_font: Font,
    pub tick_label_paint: Color,
    pub tick_label_insets: Insets,
    pub tick_marks_visible: bool,
    pub tick_mark_inside_length: f64,
    pub tick_mark_outside_length: f64,
    pub tick_mark_paint: Color,
}

impl Default for AxisAppearance {
    fn default() -> Self {
        Self {
            visible: true,
            label: None,
            label_font: Font::new(12.0),
            label_paint: Color::BLACK,
            label_insets: Insets::uniform(3.0),
            axis_line_visible: true,
            axis_line_paint: Color::GRAY,
            axis_line_stroke: Stroke::solid(0.5),
            tick_labels_visible: true,
            tick_label_font: Font::new(10.0),
            tick_label_paint: Color::DARK_GRAY,
            tick_label_insets: Insets::new(2.0, 4.0, 2.0, 4.0),
            tick_marks_visible: true,
            tick_mark_inside_length: 0.0,
            tick_mark_outside_length: 2.0,
            tick_mark_paint: Color::GRAY,
        }
    }
}

impl AxisAppearance {
    fn label_space(&self, g: &dyn Graphics) -> f64 {
        match &self.label {
            Some(label) if !label.is_empty() => {
                let h = g.measure_text(label, &self.label_font).height;
                h + self.label_insets.top + self.label_insets.bottom
            }
            _ => 0.0,
        }
    }

    fn tick_mark_space(&self) -> f64 {
        if self.tick_marks_visible {
            self.tick_mark_outside_length
        } else {
            0.0
        }
    }

    /// Offset from the axis line along the outward normal of `edge`.
    fn outward(edge: RectangleEdge, cursor: f64, distance: f64) -> f64 {
        match edge {
            RectangleEdge::Top | RectangleEdge::Left => cursor - distance,
            RectangleEdge::Bottom | RectangleEdge::Right => cursor + distance,
        }
    }

    fn draw_axis_line(&self, g: &mut dyn Graphics, cursor: f64, data_area: &Rect, edge: RectangleEdge) {
        if !self.axis_line_visible {
            return;
        }
        let (a, b) = if edge.is_top_or_bottom() {
            (
                DVec2::new(data_area.min_x(), cursor),
                DVec2::new(data_area.max_x(), cursor),
            )
        } else {
            (
                DVec2::new(cursor, data_area.min_y()),
                DVec2::new(cursor, data_area.max_y()),
            )
        };
        g.draw_line(a, b, self.axis_line_paint, &self.axis_line_stroke);
    }

    fn draw_tick_mark(&self, g: &mut dyn Graphics, pos: f64, cursor: f64, edge: RectangleEdge) {
        if !self.tick_marks_visible {
            return;
        }
        let inner = Self::outward(edge, cursor, -self.tick_mark_inside_length);
        let outer = Self::outward(edge, cursor, self.tick_mark_outside_length);
        let (a, b) = if edge.is_top_or_bottom() {
            (DVec2::new(pos, inner), DVec2::new(pos, outer))
        } else {
            (DVec2::new(inner, pos), DVec2::new(outer, pos))
        };
        g.draw_line(a, b, self.tick_mark_paint, &Stroke::solid(0.5));
    }

    /// Draw the axis label centred along the data area; returns the new cursor.
    fn draw_label(&self, g: &mut dyn Graphics, cursor: f64, data_area: &Rect, edge: RectangleEdge) -> f64 {
        let Some(label) = self.label.as_deref().filter(|l| !l.is_empty()) else {
            return cursor;
        };
        let h = g.measure_text(label, &self.label_font).height;
        let ins = &self.label_insets;
        let (position, rotation, space) = match edge {
            RectangleEdge::Top => (
                DVec2::new(data_area.center_x(), cursor - ins.bottom - h / 2.0),
                0.0,
                ins.top + h + ins.bottom,
            ),
            RectangleEdge::Bottom => (
                DVec2::new(data_area.center_x(), cursor + ins.top + h / 2.0),
                0.0,
                ins.top + h + ins.bottom,
            ),
            RectangleEdge::Left => (
                DVec2::new(cursor - ins.right - h / 2.0, data_area.center_y()),
                -FRAC_PI_2,
                ins.left + h + ins.right,
            ),
            RectangleEdge::Right => (
                DVec2::new(cursor + ins.left + h / 2.0, data_area.center_y()),
                FRAC_PI_2,
                ins.left + h + ins.right,
            ),
        };
        g.draw_text(
            &TextItem::new(label, position, &self.label_font, self.label_paint).with_rotation(rotation),
        );
        Self::outward(edge, cursor, space)
    }
}

fn axis_area(edge: RectangleEdge, from: f64, to: f64, data_area: &Rect) -> Rect {
    let (lo, hi) = (from.min(to), from.max(to));
    if edge.is_top_or_bottom() {
        Rect::new(data_area.x, lo, data_area.width, hi - lo)
    } else {
        Rect::new(lo, data_area.y, hi - lo, data_area.height)
    }
}

/// A numerical axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueAxis {
    #[serde(flatten)]
    pub appearance: AxisAppearance,
    /// When set the range follows the data.
    pub auto_range: bool,
    /// The manual range, or the last configured auto range.
    pub range: Range,
    pub default_auto_range: Range,
    pub lower_margin: f64,
    pub upper_margin: f64,
    pub auto_range_includes_zero: bool,
    pub auto_range_minimum_size: f64,
    /// When positive, the auto range shows this much data back from the maximum.
    pub fixed_auto_range: f64,
    pub inverted: bool,
    pub scale: AxisScale,
    /// Minimum screen gap between tick labels.
    pub tick_spacing: f64,
}

impl Default for ValueAxis {
    fn default() -> Self {
        Self {
            appearance: AxisAppearance::default(),
            auto_range: true,
            range: Range::ordered(0.0, 1.0),
            default_auto_range: Range::ordered(0.0, 1.0),
            lower_margin: 0.05,
            upper_margin: 0.05,
            auto_range_includes_zero: false,
            auto_range_minimum_size: 1e-8,
            fixed_auto_range: 0.0,
            inverted: false,
            scale: AxisScale::Linear,
            tick_spacing: 40.0,
        }
    }
}

impl ValueAxis {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            appearance: AxisAppearance {
                label: Some(label.into()),
                ..AxisAppearance::default()
            },
            ..Self::default()
        }
    }

    pub fn with_includes_zero(mut self, include: bool) -> Self {
        self.auto_range_includes_zero = include;
        self
    }

    pub fn with_range(mut self, range: Range) -> Self {
        self.set_range(range);
        self
    }

    pub fn with_scale(mut self, scale: AxisScale) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    /// Fix the range and switch auto range off.
    pub fn set_range(&mut self, range: Range) {
        self.range = range;
        self.auto_range = false;
    }

    pub fn set_auto_range(&mut self, auto: bool) {
        self.auto_range = auto;
    }

    /// The range to display for `data`.
    pub fn effective_range(&self, data: Option<Range>) -> Range {
        if !self.auto_range {
            return self.range;
        }
        let Some(data) = data else {
            return self.default_auto_range;
        };

        let linear = if self.scale.is_log() {
            self.scale.range_to_linear(data)
        } else {
            data
        };
        let (mut lower, mut upper) = (linear.lower, linear.upper);
        if self.auto_range_includes_zero && !self.scale.is_log() {
            lower = lower.min(0.0);
            upper = upper.max(0.0);
        }
        let range = upper - lower;
        if self.fixed_auto_range > 0.0 {
            lower = upper - self.fixed_auto_range;
        } else {
            if range < self.auto_range_minimum_size {
                let expand = (self.auto_range_minimum_size - range) / 2.0;
                upper += expand;
                lower -= expand;
                if lower == upper {
                    let adjust = lower.abs() / 10.0;
                    lower -= adjust;
                    upper += adjust;
                }
            }
            upper += self.upper_margin * range;
            lower -= self.lower_margin * range;
        }

        if self.scale.is_log() {
            match (self.scale.from_linear(lower), self.scale.from_linear(upper)) {
                (Some(l), Some(u)) => Range::ordered(l, u),
                _ => self.default_auto_range,
            }
        } else {
            Range::ordered(lower, upper)
        }
    }

    /// Store the auto range for `data` so zoom and pan operate on what is shown.
    pub fn configure(&mut self, data: Option<Range>) {
        if self.auto_range {
            self.range = self.effective_range(data);
        }
    }

    fn linear_bounds(&self, range: Range) -> (f64, f64) {
        let r = self.scale.range_to_linear(range);
        (r.lower, r.upper)
    }

    fn screen_span(&self, area: &Rect, edge: RectangleEdge) -> (f64, f64) {
        let (min, max) = if edge.is_top_or_bottom() {
            (area.min_x(), area.max_x())
        } else {
            (area.max_y(), area.min_y())
        };
        if self.inverted { (max, min) } else { (min, max) }
    }

    /// Screen coordinate of `value` along `edge` of `area`. `None` for values
    /// the scale can't represent.
    pub fn value_to_screen(&self, value: f64, range: Range, area: &Rect, edge: RectangleEdge) -> Option<f64> {
        let v = self.scale.to_linear(value)?;
        let (lo, hi) = self.linear_bounds(range);
        let (min, max) = self.screen_span(area, edge);
        if hi == lo {
            return Some((min + max) / 2.0);
        }
        Some(min + (v - lo) / (hi - lo) * (max - min))
    }

    /// Like [`ValueAxis::value_to_screen`], but unrepresentable values clamp to the low end.
    pub(crate) fn value_to_screen_clamped(&self, value: f64, range: Range, area: &Rect, edge: RectangleEdge) -> f64 {
        self.value_to_screen(value, range, area, edge)
            .unwrap_or_else(|| self.screen_span(area, edge).0)
    }

    pub fn screen_to_value(&self, coord: f64, range: Range, area: &Rect, edge: RectangleEdge) -> f64 {
        let (lo, hi) = self.linear_bounds(range);
        let (min, max) = self.screen_span(area, edge);
        if max == min {
            return self.scale.from_linear(lo).unwrap_or(range.lower);
        }
        let v = lo + (coord - min) / (max - min) * (hi - lo);
        self.scale.from_linear(v).unwrap_or(range.lower)
    }

    fn set_linear_range(&mut self, lower: f64, upper: f64) {
        let (lower, upper) = (lower.min(upper), lower.max(upper));
        match (self.scale.from_linear(lower), self.scale.from_linear(upper)) {
            (Some(l), Some(u)) => self.set_range(Range::ordered(l, u)),
            _ => tracing::warn!(lower, upper, "ignoring unrepresentable axis range"),
        }
    }

    /// Scale the range about `anchor` by `percent`. A non-positive factor restores auto range.
    pub fn resize_range(&mut self, percent: f64, anchor: f64) {
        if percent <= 0.0 {
            self.set_auto_range(true);
            return;
        }
        let (lo, hi) = self.linear_bounds(self.range);
        let a = self.scale.to_linear(anchor).unwrap_or((lo + hi) / 2.0);
        let half = (hi - lo) * percent / 2.0;
        self.set_linear_range(a - half, a + half);
    }

    /// Scale the range by `percent` keeping `anchor` at the same relative position.
    pub fn resize_range2(&mut self, percent: f64, anchor: f64) {
        if percent <= 0.0 {
            self.set_auto_range(true);
            return;
        }
        let (lo, hi) = self.linear_bounds(self.range);
        let a = self.scale.to_linear(anchor).unwrap_or((lo + hi) / 2.0);
        let left = a - lo;
        let right = hi - a;
        self.set_linear_range(a - left * percent, a + right * percent);
    }

    /// Zoom to the fractions `lower_pct..upper_pct` of the current range,
    /// measured along the screen direction.
    pub fn zoom_range(&mut self, lower_pct: f64, upper_pct: f64) {
        let (lo, hi) = self.linear_bounds(self.range);
        let len = hi - lo;
        let (a, b) = if self.inverted {
            (lo + len * (1.0 - upper_pct), lo + len * (1.0 - lower_pct))
        } else {
            (lo + len * lower_pct, lo + len * upper_pct)
        };
        self.set_linear_range(a, b);
    }

    /// Shift the range by `percent` of its length.
    pub fn pan(&mut self, percent: f64) {
        let (lo, hi) = self.linear_bounds(self.range);
        let shift = (hi - lo) * percent;
        self.set_linear_range(lo + shift, hi + shift);
    }

    /// Tick values and labels for `range` laid along `edge` of `area`.
    pub fn refresh_ticks(&self, g: &dyn Graphics, range: Range, area: &Rect, edge: RectangleEdge) -> Vec<Tick> {
        let length = if edge.is_top_or_bottom() {
            area.width
        } else {
            area.height
        };
        let font = &self.appearance.tick_label_font;
        let ticks = generate_ticks(range, self.scale, length, self.tick_spacing);
        let needed = if edge.is_top_or_bottom() {
            ticks
                .iter()
                .map(|t| g.measure_text(&t.label, font).width)
                .fold(0.0, f64::max)
                + self.appearance.tick_label_insets.left
                + self.appearance.tick_label_insets.right
        } else {
            g.measure_text("0", font).height * 1.5
        };
        if needed > self.tick_spacing {
            generate_ticks(range, self.scale, length, needed)
        } else {
            ticks
        }
    }

    fn tick_label_extent(&self, g: &dyn Graphics, ticks: &[Tick], edge: RectangleEdge) -> f64 {
        let a = &self.appearance;
        if !a.tick_labels_visible {
            return 0.0;
        }
        if edge.is_top_or_bottom() {
            g.measure_text("0", &a.tick_label_font).height + a.tick_label_insets.top + a.tick_label_insets.bottom
        } else {
            ticks
                .iter()
                .map(|t| g.measure_text(&t.label, &a.tick_label_font).width)
                .fold(0.0, f64::max)
                + a.tick_label_insets.left
                + a.tick_label_insets.right
        }
    }

    /// Add the space this axis needs along `edge` to `space`.
    pub fn reserve_space(&self, g: &dyn Graphics, range: Range, plot_area: &Rect, edge: RectangleEdge, space: &mut AxisSpace) {
        if !self.appearance.visible {
            return;
        }
        let ticks = self.refresh_ticks(g, range, plot_area, edge);
        let total = self.tick_label_extent(g, &ticks, edge)
            + self.appearance.tick_mark_space()
            + self.appearance.label_space(g);
        space.add(total, edge);
    }

    /// Draw the axis with its line at `cursor` along `edge` of `data_area`.
    pub fn draw(&self, g: &mut dyn Graphics, range: Range, cursor: f64, data_area: &Rect, edge: RectangleEdge) -> AxisState {
        let ticks = self.refresh_ticks(g, range, data_area, edge);
        if !self.appearance.visible {
            return AxisState {
                cursor,
                ticks,
                area: Rect::default(),
            };
        }
        let a = &self.appearance;
        a.draw_axis_line(g, cursor, data_area, edge);

        let label_offset = a.tick_mark_space();
        let mut max_label_extent = 0.0f64;
        for tick in &ticks {
            let Some(pos) = self.value_to_screen(tick.value, range, data_area, edge) else {
                continue;
            };
            a.draw_tick_mark(g, pos, cursor, edge);
            if !a.tick_labels_visible {
                continue;
            }
            let metrics = g.measure_text(&tick.label, &a.tick_label_font);
            let (point, anchor, extent) = match edge {
                RectangleEdge::Top => (
                    DVec2::new(pos, cursor - label_offset - a.tick_label_insets.bottom),
                    TextAnchor::BottomCenter,
                    metrics.height + a.tick_label_insets.top + a.tick_label_insets.bottom,
                ),
                RectangleEdge::Bottom => (
                    DVec2::new(pos, cursor + label_offset + a.tick_label_insets.top),
                    TextAnchor::TopCenter,
                    metrics.height + a.tick_label_insets.top + a.tick_label_insets.bottom,
                ),
                RectangleEdge::Left => (
                    DVec2::new(cursor - label_offset - a.tick_label_insets.right, pos),
                    TextAnchor::CenterRight,
                    metrics.width + a.tick_label_insets.left + a.tick_label_insets.right,
                ),
                RectangleEdge::Right => (
                    DVec2::new(cursor + label_offset + a.tick_label_insets.left, pos),
                    TextAnchor::CenterLeft,
                    metrics.width + a.tick_label_insets.left + a.tick_label_insets.right,
                ),
            };
            max_label_extent = max_label_extent.max(extent);
            g.draw_text(
                &TextItem::new(tick.label.as_str(), point, &a.tick_label_font, a.tick_label_paint)
                    .with_anchor(anchor),
            );
        }

        let after_ticks = AxisAppearance::outward(edge, cursor, label_offset + max_label_extent);
        let end = a.draw_label(g, after_ticks, data_area, edge);
        AxisState {
            cursor: end,
            ticks,
            area: axis_area(edge, cursor, end, data_area),
        }
    }
}

/// An axis that lays out a list of categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryAxis {
    #[serde(flatten)]
    pub appearance: AxisAppearance,
    pub lower_margin: f64,
    pub upper_margin: f64,
    /// Fraction of the axis length shared out as gaps between categories.
    pub category_margin: f64,
    pub maximum_category_label_lines: usize,
}

impl Default for CategoryAxis {
    fn default() -> Self {
        Self {
            appearance: AxisAppearance {
                tick_marks_visible: false,
                ..AxisAppearance::default()
            },
            lower_margin: 0.05,
            upper_margin: 0.05,
            category_margin: 0.2,
            maximum_category_label_lines: 2,
        }
    }
}

impl CategoryAxis {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            appearance: AxisAppearance {
                label: Some(label.into()),
                tick_marks_visible: false,
                ..AxisAppearance::default()
            },
            ..Self::default()
        }
    }

    fn extent(area: &Rect, edge: RectangleEdge) -> (f64, f64) {
        if edge.is_top_or_bottom() {
            (area.x, area.width)
        } else {
            (area.y, area.height)
        }
    }

    pub fn category_size(&self, count: usize, area: &Rect, edge: RectangleEdge) -> f64 {
        if count == 0 {
            return 0.0;
        }
        let (_, available) = Self::extent(area, edge);
        let used = if count > 1 {
            1.0 - self.lower_margin - self.upper_margin - self.category_margin
        } else {
            1.0 - self.lower_margin - self.upper_margin
        };
        available * used / count as f64
    }

    pub fn category_gap(&self, count: usize, area: &Rect, edge: RectangleEdge) -> f64 {
        if count <= 1 {
            return 0.0;
        }
        let (_, available) = Self::extent(area, edge);
        available * self.category_margin / (count - 1) as f64
    }

    pub fn category_start(&self, index: usize, count: usize, area: &Rect, edge: RectangleEdge) -> f64 {
        let (start, available) = Self::extent(area, edge);
        let size = self.category_size(count, area, edge);
        let gap = self.category_gap(count, area, edge);
        start + available * self.lower_margin + index as f64 * (size + gap)
    }

    pub fn category_middle(&self, index: usize, count: usize, area: &Rect, edge: RectangleEdge) -> f64 {
        self.category_start(index, count, area, edge) + self.category_size(count, area, edge) / 2.0
    }

    pub fn category_end(&self, index: usize, count: usize, area: &Rect, edge: RectangleEdge) -> f64 {
        self.category_start(index, count, area, edge) + self.category_size(count, area, edge)
    }

    /// Index of the category band containing `coord`, if any.
    pub fn category_at(&self, coord: f64, count: usize, area: &Rect, edge: RectangleEdge) -> Option<usize> {
        (0..count).find(|&i| {
            coord >= self.category_start(i, count, area, edge) && coord <= self.category_end(i, count, area, edge)
        })
    }

    fn label_block(&self, g: &dyn Graphics, category: &str, count: usize, area: &Rect, edge: RectangleEdge) -> TextBox {
        let a = &self.appearance;
        let mut block = if edge.is_top_or_bottom() {
            let width = (self.category_size(count, area, edge) + self.category_gap(count, area, edge)).max(1.0);
            TextBox::wrapped(category, &a.tick_label_font, a.tick_label_paint, width, g)
        } else {
            TextBox::new(category, &a.tick_label_font, a.tick_label_paint)
        };
        block.lines.truncate(self.maximum_category_label_lines.max(1));
        block.with_padding(a.tick_label_insets)
    }

    pub fn reserve_space(&self, g: &dyn Graphics, categories: &[String], plot_area: &Rect, edge: RectangleEdge, space: &mut AxisSpace) {
        if !self.appearance.visible {
            return;
        }
        let mut extent = 0.0f64;
        if self.appearance.tick_labels_visible {
            for c in categories {
                let (w, h) = self.label_block(g, c, categories.len(), plot_area, edge).size(g);
                extent = extent.max(if edge.is_top_or_bottom() { h } else { w });
            }
        }
        space.add(
            extent + self.appearance.tick_mark_space() + self.appearance.label_space(g),
            edge,
        );
    }

    pub fn draw(&self, g: &mut dyn Graphics, categories: &[String], cursor: f64, data_area: &Rect, edge: RectangleEdge) -> AxisState {
        if !self.appearance.visible {
            return AxisState {
                cursor,
                ..AxisState::default()
            };
        }
        let a = &self.appearance;
        a.draw_axis_line(g, cursor, data_area, edge);
        let count = categories.len();
        let offset = a.tick_mark_space();
        let mut extent = 0.0f64;
        for (i, c) in categories.iter().enumerate() {
            let mid = self.category_middle(i, count, data_area, edge);
            a.draw_tick_mark(g, mid, cursor, edge);
            if !a.tick_labels_visible {
                continue;
            }
            let block = self.label_block(g, c, count, data_area, edge);
            let bounds = match edge {
                RectangleEdge::Top => block.draw(g, mid, cursor - offset, RectangleAnchor::Bottom),
                RectangleEdge::Bottom => block.draw(g, mid, cursor + offset, RectangleAnchor::Top),
                RectangleEdge::Left => block.draw(g, cursor - offset, mid, RectangleAnchor::Right),
                RectangleEdge::Right => block.draw(g, cursor + offset, mid, RectangleAnchor::Left),
            };
            extent = extent.max(if edge.is_top_or_bottom() {
                bounds.height
            } else {
                bounds.width
            });
        }
        let after = AxisAppearance::outward(edge, cursor, offset + extent);
        let end = a.draw_label(g, after, data_area, edge);
        AxisState {
            cursor: end,
            ticks: Vec::new(),
            area: axis_area(edge, cursor, end, data_area),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::RecordingCanvas;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn auto_range_applies_margins() {
        let axis = ValueAxis::default();
        let r = axis.effective_range(Some(Range::ordered(0.0, 100.0)));
        assert!(approx(r.lower, -5.0) && approx(r.upper, 105.0));
    }

    #[test]
    fn auto_range_includes_zero() {
        let axis = ValueAxis::default().with_includes_zero(true);
        let r = axis.effective_range(Some(Range::ordered(10.0, 20.0)));
        assert!(approx(r.lower, -1.0) && approx(r.upper, 21.0));
    }

    #[test]
    fn auto_range_defaults_without_data() {
        let axis = ValueAxis::default();
        assert_eq!(axis.effective_range(None), Range::ordered(0.0, 1.0));
    }

    #[test]
    fn fixed_auto_range_trails_maximum() {
        let axis = ValueAxis {
            fixed_auto_range: 10.0,
            ..ValueAxis::default()
        };
        let r = axis.effective_range(Some(Range::ordered(0.0, 50.0)));
        assert!(approx(r.lower, 40.0) && approx(r.upper, 50.0));
    }

    #[test]
    fn value_to_screen_runs_upward_on_left_edge() {
        let axis = ValueAxis::default();
        let area = Rect::new(0.0, 0.0, 100.0, 200.0);
        let range = Range::ordered(0.0, 10.0);
        assert!(approx(axis.value_to_screen(0.0, range, &area, RectangleEdge::Left).unwrap(), 200.0));
        assert!(approx(axis.value_to_screen(10.0, range, &area, RectangleEdge::Left).unwrap(), 0.0));
        assert!(approx(axis.screen_to_value(50.0, range, &area, RectangleEdge::Left), 7.5));
    }

    #[test]
    fn inverted_axis_flips_mapping() {
        let axis = ValueAxis::default().with_inverted(true);
        let area = Rect::new(0.0, 0.0, 100.0, 100.0);
        let range = Range::ordered(0.0, 10.0);
        assert!(approx(axis.value_to_screen(0.0, range, &area, RectangleEdge::Bottom).unwrap(), 100.0));
    }

    #[test]
    fn resize_range_centres_on_anchor() {
        let mut axis = ValueAxis::default().with_range(Range::ordered(0.0, 100.0));
        axis.resize_range(0.5, 20.0);
        assert!(approx(axis.range.lower, -5.0) && approx(axis.range.upper, 45.0));
        assert!(!axis.auto_range);
    }

    #[test]
    fn resize_range2_keeps_anchor_fraction() {
        let mut axis = ValueAxis::default().with_range(Range::ordered(0.0, 100.0));
        axis.resize_range2(0.5, 20.0);
        assert!(approx(axis.range.lower, 10.0) && approx(axis.range.upper, 60.0));
    }

    #[test]
    fn non_positive_factor_restores_auto_range() {
        let mut axis = ValueAxis::default().with_range(Range::ordered(0.0, 100.0));
        axis.resize_range(0.0, 50.0);
        assert!(axis.auto_range);
    }

    #[test]
    fn zoom_range_respects_inversion() {
        let mut axis = ValueAxis::default().with_range(Range::ordered(0.0, 100.0));
        axis.zoom_range(0.25, 0.5);
        assert!(approx(axis.range.lower, 25.0) && approx(axis.range.upper, 50.0));

        let mut inv = ValueAxis::default()
            .with_inverted(true)
            .with_range(Range::ordered(0.0, 100.0));
        inv.zoom_range(0.25, 0.5);
        assert!(approx(inv.range.lower, 50.0) && approx(inv.range.upper, 75.0));
    }

    #[test]
    fn pan_shifts_by_fraction() {
        let mut axis = ValueAxis::default().with_range(Range::ordered(0.0, 10.0));
        axis.pan(0.1);
        assert!(approx(axis.range.lower, 1.0) && approx(axis.range.upper, 11.0));
    }

    #[test]
    fn category_layout_shares_margins() {
        let axis = CategoryAxis::default();
        let area = Rect::new(0.0, 0.0, 1000.0, 100.0);
        let e = RectangleEdge::Bottom;
        // 1000 * (1 - 0.05 - 0.05 - 0.2) / 4 = 175; gap = 1000 * 0.2 / 3
        assert!(approx(axis.category_size(4, &area, e), 175.0));
        assert!(approx(axis.category_gap(4, &area, e), 200.0 / 3.0));
        assert!(approx(axis.category_start(0, 4, &area, e), 50.0));
        assert!(approx(axis.category_start(1, 4, &area, e), 50.0 + 175.0 + 200.0 / 3.0));
        assert!(approx(axis.category_end(3, 4, &area, e), 950.0));
    }

    #[test]
    fn single_category_takes_all_but_margins() {
        let axis = CategoryAxis::default();
        let area = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(approx(axis.category_size(1, &area, RectangleEdge::Bottom), 90.0));
    }

    #[test]
    fn axis_space_ensure_and_shrink() {
        let mut a = AxisSpace::default();
        a.add(20.0, RectangleEdge::Left);
        let mut b = AxisSpace::default();
        b.add(30.0, RectangleEdge::Bottom);
        a.ensure_at_least(&b);
        assert_eq!(a.shrink(Rect::new(0.0, 0.0, 100.0, 100.0)), Rect::new(20.0, 0.0, 80.0, 70.0));
    }

    #[test]
    fn drawn_axis_reports_consumed_space() {
        let mut g = RecordingCanvas::new();
        let axis = ValueAxis::new("Value");
        let data = Rect::new(50.0, 10.0, 300.0, 200.0);
        let range = Range::ordered(0.0, 100.0);
        let mut space = AxisSpace::default();
        axis.reserve_space(&g, range, &data, RectangleEdge::Left, &mut space);
        let state = axis.draw(&mut g, range, data.min_x(), &data, RectangleEdge::Left);
        assert!(!state.ticks.is_empty());
        assert!(approx(data.min_x() - state.cursor, space.left));
    }
}
