//! Plots made of weighted subplots that share one axis.
//!
//! The parent reserves space for the shared axis, hands out the remaining
//! length to its subplots in proportion to their weights, and makes every
//! subplot reserve the same space for its own (non-shared) axis so the data
//! areas line up. The shared axis is drawn once against the combined data area.
use std::borrow::Cow;

use glam::DVec2;
use indexmap::IndexSet;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::axis::{AxisLocation, AxisSpace, CategoryAxis, ValueAxis};
use crate::category_plot::{CategoryParentAxes, CategoryPlot};
use crate::dataset::Range;
use crate::error::{ChartError, Result};
use crate::geometry::{Insets, Rect, RectangleEdge};
use crate::graphics::Graphics;
use crate::info::PlotRenderingInfo;
use crate::legend::LegendItem;
use crate::plot::{Plot, PlotBase};
use crate::xy_plot::{XyParentAxes, XyPlot, pan_axis, zoom_axis};
use crate::zoom::{Pannable, PlotOrientation, Zoomable};

/// Gap between neighbouring subplots.
pub const DEFAULT_GAP: f64 = 5.0;

/// How subplots are laid out inside their parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubplotDirection {
    /// Top to bottom.
    Vertical,
    /// Left to right.
    Horizontal,
}

/// Split `area` into one rectangle per weight along `direction`, with `gap`
/// between neighbours. Each subplot gets `(length - gap * (n - 1)) * weight / total`.
pub fn allocate_subplot_areas(area: Rect, weights: &[u32], gap: f64, direction: SubplotDirection) -> Vec<Rect> {
    let total: u64 = weights.iter().map(|&w| u64::from(w)).sum();
    if weights.is_empty() || total == 0 {
        return Vec::new();
    }
    let total = total as f64;
    let gaps = gap * (weights.len() - 1) as f64;
    let usable = match direction {
        SubplotDirection::Vertical => area.height - gaps,
        SubplotDirection::Horizontal => area.width - gaps,
    }
    .max(0.0);

    let mut cursor = match direction {
        SubplotDirection::Vertical => area.y,
        SubplotDirection::Horizontal => area.x,
    };
    weights
        .iter()
        .map(|&w| {
            let len = usable * f64::from(w) / total;
            let r = match direction {
                SubplotDirection::Vertical => Rect::new(area.x, cursor, area.width, len),
                SubplotDirection::Horizontal => Rect::new(cursor, area.y, len, area.height),
            };
            cursor += len + gap;
            r
        })
        .collect()
}

fn check_weight(weight: u32) -> Result<()> {
    if weight == 0 {
        return Err(ChartError::InvalidWeight(weight));
    }
    Ok(())
}

/// Subplots stack across the shared domain axis.
fn domain_direction(orientation: PlotOrientation) -> SubplotDirection {
    match orientation {
        PlotOrientation::Vertical => SubplotDirection::Vertical,
        PlotOrientation::Horizontal => SubplotDirection::Horizontal,
    }
}

/// Subplots sit side by side along the shared range axis.
fn range_direction(orientation: PlotOrientation) -> SubplotDirection {
    match orientation {
        PlotOrientation::Vertical => SubplotDirection::Horizontal,
        PlotOrientation::Horizontal => SubplotDirection::Vertical,
    }
}

fn coordinate_along(edge: RectangleEdge, point: DVec2) -> f64 {
    if edge.is_top_or_bottom() { point.x } else { point.y }
}

/// A plot that can live inside a combined plot.
pub(crate) trait Subplot: Plot + Clone {
    fn weight(&self) -> u32;

    fn set_weight(&mut self, weight: u32);

    fn subplot_orientation(&self) -> PlotOrientation;

    fn set_subplot_orientation(&mut self, orientation: PlotOrientation);
}

impl Subplot for XyPlot {
    fn weight(&self) -> u32 {
        self.weight
    }

    fn set_weight(&mut self, weight: u32) {
        self.weight = weight;
    }

    fn subplot_orientation(&self) -> PlotOrientation {
        self.orientation
    }

    fn set_subplot_orientation(&mut self, orientation: PlotOrientation) {
        self.orientation = orientation;
    }
}

impl Subplot for CategoryPlot {
    fn weight(&self) -> u32 {
        self.weight
    }

    fn set_weight(&mut self, weight: u32) {
        self.weight = weight;
    }

    fn subplot_orientation(&self) -> PlotOrientation {
        self.orientation
    }

    fn set_subplot_orientation(&mut self, orientation: PlotOrientation) {
        self.orientation = orientation;
    }
}

fn default_gap() -> f64 {
    DEFAULT_GAP
}

/// The subplots of a combined plot, plus the orientation they all follow.
///
/// Every way in (`add`, `set_orientation`, deserialization) leaves each
/// subplot on the shared orientation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct Subplots<P> {
    orientation: PlotOrientation,
    gap: f64,
    plots: Vec<P>,
}

impl<P> Default for Subplots<P> {
    fn default() -> Self {
        Self {
            orientation: PlotOrientation::Vertical,
            gap: DEFAULT_GAP,
            plots: Vec::new(),
        }
    }
}

impl<'de, P: Subplot + Deserialize<'de>> Deserialize<'de> for Subplots<P> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Stored<P> {
            #[serde(default)]
            orientation: PlotOrientation,
            #[serde(default = "default_gap")]
            gap: f64,
            #[serde(default = "Vec::new")]
            plots: Vec<P>,
        }

        let stored = Stored::<P>::deserialize(deserializer)?;
        let mut subplots = Self {
            orientation: stored.orientation,
            gap: stored.gap,
            plots: stored.plots,
        };
        subplots.set_orientation(stored.orientation);
        Ok(subplots)
    }
}

impl<P: Subplot> Subplots<P> {
    fn orientation(&self) -> PlotOrientation {
        self.orientation
    }

    fn set_orientation(&mut self, orientation: PlotOrientation) {
        self.orientation = orientation;
        for p in &mut self.plots {
            p.set_subplot_orientation(orientation);
        }
    }

    fn add(&mut self, mut subplot: P, weight: u32) -> Result<()> {
        check_weight(weight)?;
        subplot.set_weight(weight);
        subplot.set_subplot_orientation(self.orientation);
        subplot.base_mut().insets = Insets::ZERO;
        self.plots.push(subplot);
        Ok(())
    }

    fn remove(&mut self, index: usize) -> Result<P> {
        if index >= self.plots.len() {
            return Err(ChartError::SubplotNotFound(index));
        }
        Ok(self.plots.remove(index))
    }

    fn weights(&self) -> Vec<u32> {
        self.plots.iter().map(Subplot::weight).collect()
    }

    /// The subplots as drawn. Any subplot whose orientation was changed
    /// behind the parent's back is drawn with the parent's orientation.
    fn aligned(&self) -> Cow<'_, [P]> {
        if self.plots.iter().all(|p| p.subplot_orientation() == self.orientation) {
            return Cow::Borrowed(self.plots.as_slice());
        }
        debug!(orientation = ?self.orientation, "realigning subplot orientation");
        let mut plots = self.plots.clone();
        for p in &mut plots {
            p.set_subplot_orientation(self.orientation);
        }
        Cow::Owned(plots)
    }

    fn legend_items(&self) -> Vec<LegendItem> {
        self.plots.iter().flat_map(Plot::legend_items).collect()
    }

    fn restore_auto_bounds(&mut self) {
        self.plots.iter_mut().for_each(Plot::restore_auto_bounds);
    }

    fn after_draw(&mut self, info: &PlotRenderingInfo) {
        for (p, sub_info) in self.plots.iter_mut().zip(&info.subplots) {
            p.after_draw(sub_info);
        }
    }

    /// Run `f` on the subplot under `source`, or on all of them when the
    /// point is outside every subplot.
    fn for_targets(&mut self, info: &PlotRenderingInfo, source: DVec2, mut f: impl FnMut(&mut P, &PlotRenderingInfo)) {
        let targets: Vec<usize> = match info.subplot_index(source) {
            Some(i) if i < self.plots.len() => vec![i],
            _ => (0..self.plots.len()).collect(),
        };
        for i in targets {
            let sub_info = info.subplot_info(i).cloned().unwrap_or_default();
            f(&mut self.plots[i], &sub_info);
        }
    }
}

/// Draws `count` subplots laid out around a shared axis.
struct SharedLayout {
    data_area: Rect,
    subplot_areas: Vec<Rect>,
    /// Space every subplot reserves for its own axis.
    subplot_space: AxisSpace,
}

impl SharedLayout {
    fn compute(
        area: Rect,
        shared_space: AxisSpace,
        weights: &[u32],
        gap: f64,
        direction: SubplotDirection,
        measure: impl Fn(usize, &Rect) -> AxisSpace,
    ) -> Self {
        let adjusted = shared_space.shrink(area);
        let subplot_areas = allocate_subplot_areas(adjusted, weights, gap, direction);
        let mut subplot_space = AxisSpace::default();
        for (i, sub) in subplot_areas.iter().enumerate() {
            subplot_space.ensure_at_least(&measure(i, sub));
        }
        let mut space = shared_space;
        space.ensure_at_least(&subplot_space);
        let data_area = space.shrink(area);
        debug!(subplots = subplot_areas.len(), ?data_area, "combined plot layout");
        Self {
            data_area,
            subplot_areas,
            subplot_space,
        }
    }
}

/// XY subplots sharing one domain axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombinedDomainXyPlot {
    pub base: PlotBase,
    pub domain_axis: ValueAxis,
    pub domain_axis_location: AxisLocation,
    subplots: Subplots<XyPlot>,
}

impl Default for CombinedDomainXyPlot {
    fn default() -> Self {
        Self::new(ValueAxis::default())
    }
}

impl CombinedDomainXyPlot {
    pub fn new(domain_axis: ValueAxis) -> Self {
        Self {
            base: PlotBase::default(),
            domain_axis,
            domain_axis_location: AxisLocation::BottomOrLeft,
            subplots: Subplots::default(),
        }
    }

    pub fn with_gap(mut self, gap: f64) -> Self {
        self.subplots.gap = gap;
        self
    }

    pub fn gap(&self) -> f64 {
        self.subplots.gap
    }

    /// Add a subplot taking `weight` shares of the space.
    pub fn add(&mut self, subplot: XyPlot, weight: u32) -> Result<()> {
        self.subplots.add(subplot, weight)
    }

    pub fn remove(&mut self, index: usize) -> Result<XyPlot> {
        self.subplots.remove(index)
    }

    pub fn subplots(&self) -> &[XyPlot] {
        &self.subplots.plots
    }

    pub fn subplots_mut(&mut self) -> &mut [XyPlot] {
        &mut self.subplots.plots
    }

    pub fn orientation(&self) -> PlotOrientation {
        self.subplots.orientation()
    }

    /// Change the orientation of this plot and every subplot.
    pub fn set_orientation(&mut self, orientation: PlotOrientation) {
        self.subplots.set_orientation(orientation);
    }

    pub fn domain_edge(&self) -> RectangleEdge {
        self.domain_axis_location.domain_edge(self.orientation())
    }

    pub fn data_range(&self) -> Option<Range> {
        self.subplots()
            .iter()
            .fold(None, |acc, s| Range::combine(acc, s.domain_data_range()))
    }

    pub fn visible_range(&self) -> Range {
        self.domain_axis.effective_range(self.data_range())
    }
}

impl Plot for CombinedDomainXyPlot {
    fn plot_type(&self) -> &'static str {
        "Combined_Domain_XYPlot"
    }

    fn base(&self) -> &PlotBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut PlotBase {
        &mut self.base
    }

    fn draw(&self, g: &mut dyn Graphics, area: Rect, anchor: Option<DVec2>, info: &mut PlotRenderingInfo) {
        let area = self.base.insets.trim(area);
        info.plot_area = area;
        let range = self.visible_range();
        let edge = self.domain_edge();
        let subplots = self.subplots.aligned();

        let mut shared = AxisSpace::default();
        self.domain_axis.reserve_space(&*g, range, &area, edge, &mut shared);
        let layout = SharedLayout::compute(
            area,
            shared,
            &self.subplots.weights(),
            self.gap(),
            domain_direction(self.orientation()),
            |i, sub| subplots[i].measure_range_axis_space(&*g, sub),
        );
        info.data_area = layout.data_area;

        if subplots.is_empty() {
            self.base.draw_no_data_message(g, layout.data_area);
        }
        self.domain_axis
            .draw(g, range, edge.coordinate(&layout.data_area), &layout.data_area, edge);

        for (subplot, sub_area) in subplots.iter().zip(&layout.subplot_areas) {
            let mut sub_info = PlotRenderingInfo::new();
            let parent = XyParentAxes {
                domain: Some((&self.domain_axis, range)),
                fixed_range_space: Some(layout.subplot_space),
                ..XyParentAxes::default()
            };
            subplot.draw_in(g, *sub_area, anchor, &mut sub_info, parent);
            info.add_subplot_info(sub_info);
        }
    }

    fn legend_items(&self) -> Vec<LegendItem> {
        self.subplots.legend_items()
    }

    fn as_zoomable(&self) -> Option<&dyn Zoomable> {
        Some(self)
    }

    fn as_zoomable_mut(&mut self) -> Option<&mut dyn Zoomable> {
        Some(self)
    }

    fn as_pannable_mut(&mut self) -> Option<&mut dyn Pannable> {
        Some(self)
    }

    fn restore_auto_bounds(&mut self) {
        self.domain_axis.set_auto_range(true);
        self.subplots.restore_auto_bounds();
    }

    fn after_draw(&mut self, info: &PlotRenderingInfo) {
        self.subplots.after_draw(info);
    }
}

impl Zoomable for CombinedDomainXyPlot {
    fn is_domain_zoomable(&self) -> bool {
        true
    }

    fn is_range_zoomable(&self) -> bool {
        true
    }

    fn orientation(&self) -> PlotOrientation {
        self.subplots.orientation()
    }

    fn zoom_domain_axes(&mut self, factor: f64, info: &PlotRenderingInfo, source: DVec2, use_anchor: bool) {
        self.domain_axis.configure(self.data_range());
        let edge = self.domain_edge();
        let anchor = use_anchor.then(|| {
            self.domain_axis.screen_to_value(
                coordinate_along(edge, source),
                self.domain_axis.range,
                &info.data_area,
                edge,
            )
        });
        zoom_axis(&mut self.domain_axis, factor, anchor);
    }

    fn zoom_domain_axes_range(&mut self, lower: f64, upper: f64, _info: &PlotRenderingInfo, _source: DVec2) {
        self.domain_axis.configure(self.data_range());
        self.domain_axis.zoom_range(lower, upper);
    }

    fn zoom_range_axes(&mut self, factor: f64, info: &PlotRenderingInfo, source: DVec2, use_anchor: bool) {
        self.subplots
            .for_targets(info, source, |p, sub_info| p.zoom_range_axes(factor, sub_info, source, use_anchor));
    }

    fn zoom_range_axes_range(&mut self, lower: f64, upper: f64, info: &PlotRenderingInfo, source: DVec2) {
        self.subplots
            .for_targets(info, source, |p, sub_info| p.zoom_range_axes_range(lower, upper, sub_info, source));
    }
}

impl Pannable for CombinedDomainXyPlot {
    fn is_domain_pannable(&self) -> bool {
        true
    }

    fn is_range_pannable(&self) -> bool {
        self.subplots().iter().any(|s| s.range_pannable)
    }

    fn pan_domain_axes(&mut self, percent: f64, _info: &PlotRenderingInfo, _source: DVec2) {
        self.domain_axis.configure(self.data_range());
        pan_axis(&mut self.domain_axis, percent);
    }

    fn pan_range_axes(&mut self, percent: f64, info: &PlotRenderingInfo, source: DVec2) {
        self.subplots
            .for_targets(info, source, |p, sub_info| p.pan_range_axes(percent, sub_info, source));
    }
}

/// XY subplots sharing one range axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombinedRangeXyPlot {
    pub base: PlotBase,
    pub range_axis: ValueAxis,
    pub range_axis_location: AxisLocation,
    subplots: Subplots<XyPlot>,
}

impl Default for CombinedRangeXyPlot {
    fn default() -> Self {
        Self::new(ValueAxis::default())
    }
}

impl CombinedRangeXyPlot {
    pub fn new(range_axis: ValueAxis) -> Self {
        Self {
            base: PlotBase::default(),
            range_axis,
            range_axis_location: AxisLocation::BottomOrLeft,
            subplots: Subplots::default(),
        }
    }

    pub fn with_gap(mut self, gap: f64) -> Self {
        self.subplots.gap = gap;
        self
    }

    pub fn gap(&self) -> f64 {
        self.subplots.gap
    }

    pub fn add(&mut self, subplot: XyPlot, weight: u32) -> Result<()> {
        self.subplots.add(subplot, weight)
    }

    pub fn remove(&mut self, index: usize) -> Result<XyPlot> {
        self.subplots.remove(index)
    }

    pub fn subplots(&self) -> &[XyPlot] {
        &self.subplots.plots
    }

    pub fn subplots_mut(&mut self) -> &mut [XyPlot] {
        &mut self.subplots.plots
    }

    pub fn orientation(&self) -> PlotOrientation {
        self.subplots.orientation()
    }

    pub fn set_orientation(&mut self, orientation: PlotOrientation) {
        self.subplots.set_orientation(orientation);
    }

    pub fn range_edge(&self) -> RectangleEdge {
        self.range_axis_location.range_edge(self.orientation())
    }

    pub fn data_range(&self) -> Option<Range> {
        self.subplots()
            .iter()
            .fold(None, |acc, s| Range::combine(acc, s.range_data_range()))
    }

    pub fn visible_range(&self) -> Range {
        self.range_axis.effective_range(self.data_range())
    }
}

impl Plot for CombinedRangeXyPlot {
    fn plot_type(&self) -> &'static str {
        "Combined_Range_XYPlot"
    }

    fn base(&self) -> &PlotBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut PlotBase {
        &mut self.base
    }

    fn draw(&self, g: &mut dyn Graphics, area: Rect, anchor: Option<DVec2>, info: &mut PlotRenderingInfo) {
        let area = self.base.insets.trim(area);
        info.plot_area = area;
        let range = self.visible_range();
        let edge = self.range_edge();
        let subplots = self.subplots.aligned();

        let mut shared = AxisSpace::default();
        self.range_axis.reserve_space(&*g, range, &area, edge, &mut shared);
        let layout = SharedLayout::compute(
            area,
            shared,
            &self.subplots.weights(),
            self.gap(),
            range_direction(self.orientation()),
            |i, sub| subplots[i].measure_domain_axis_space(&*g, sub),
        );
        info.data_area = layout.data_area;

        if subplots.is_empty() {
            self.base.draw_no_data_message(g, layout.data_area);
        }
        self.range_axis
            .draw(g, range, edge.coordinate(&layout.data_area), &layout.data_area, edge);

        for (subplot, sub_area) in subplots.iter().zip(&layout.subplot_areas) {
            let mut sub_info = PlotRenderingInfo::new();
            let parent = XyParentAxes {
                range: Some((&self.range_axis, range)),
                fixed_domain_space: Some(layout.subplot_space),
                ..XyParentAxes::default()
            };
            subplot.draw_in(g, *sub_area, anchor, &mut sub_info, parent);
            info.add_subplot_info(sub_info);
        }
    }

    fn legend_items(&self) -> Vec<LegendItem> {
        self.subplots.legend_items()
    }

    fn as_zoomable(&self) -> Option<&dyn Zoomable> {
        Some(self)
    }

    fn as_zoomable_mut(&mut self) -> Option<&mut dyn Zoomable> {
        Some(self)
    }

    fn as_pannable_mut(&mut self) -> Option<&mut dyn Pannable> {
        Some(self)
    }

    fn restore_auto_bounds(&mut self) {
        self.range_axis.set_auto_range(true);
        self.subplots.restore_auto_bounds();
    }

    fn after_draw(&mut self, info: &PlotRenderingInfo) {
        self.subplots.after_draw(info);
    }
}

impl Zoomable for CombinedRangeXyPlot {
    fn is_domain_zoomable(&self) -> bool {
        true
    }

    fn is_range_zoomable(&self) -> bool {
        true
    }

    fn orientation(&self) -> PlotOrientation {
        self.subplots.orientation()
    }

    fn zoom_domain_axes(&mut self, factor: f64, info: &PlotRenderingInfo, source: DVec2, use_anchor: bool) {
        self.subplots
            .for_targets(info, source, |p, sub_info| p.zoom_domain_axes(factor, sub_info, source, use_anchor));
    }

    fn zoom_domain_axes_range(&mut self, lower: f64, upper: f64, info: &PlotRenderingInfo, source: DVec2) {
        self.subplots
            .for_targets(info, source, |p, sub_info| p.zoom_domain_axes_range(lower, upper, sub_info, source));
    }

    fn zoom_range_axes(&mut self, factor: f64, info: &PlotRenderingInfo, source: DVec2, use_anchor: bool) {
        self.range_axis.configure(self.data_range());
        let edge = self.range_edge();
        let anchor = use_anchor.then(|| {
            self.range_axis.screen_to_value(
                coordinate_along(edge, source),
                self.range_axis.range,
                &info.data_area,
                edge,
            )
        });
        zoom_axis(&mut self.range_axis, factor, anchor);
    }

    fn zoom_range_axes_range(&mut self, lower: f64, upper: f64, _info: &PlotRenderingInfo, _source: DVec2) {
        self.range_axis.configure(self.data_range());
        self.range_axis.zoom_range(lower, upper);
    }
}

impl Pannable for CombinedRangeXyPlot {
    fn is_domain_pannable(&self) -> bool {
        self.subplots().iter().any(|s| s.domain_pannable)
    }

    fn is_range_pannable(&self) -> bool {
        true
    }

    fn pan_domain_axes(&mut self, percent: f64, info: &PlotRenderingInfo, source: DVec2) {
        self.subplots
            .for_targets(info, source, |p, sub_info| p.pan_domain_axes(percent, sub_info, source));
    }

    fn pan_range_axes(&mut self, percent: f64, _info: &PlotRenderingInfo, _source: DVec2) {
        self.range_axis.configure(self.data_range());
        pan_axis(&mut self.range_axis, percent);
    }
}

/// Category subplots sharing one category axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombinedDomainCategoryPlot {
    pub base: PlotBase,
    pub domain_axis: CategoryAxis,
    pub domain_axis_location: AxisLocation,
    subplots: Subplots<CategoryPlot>,
}

impl Default for CombinedDomainCategoryPlot {
    fn default() -> Self {
        Self::new(CategoryAxis::default())
    }
}

impl CombinedDomainCategoryPlot {
    pub fn new(domain_axis: CategoryAxis) -> Self {
        Self {
            base: PlotBase::default(),
            domain_axis,
            domain_axis_location: AxisLocation::BottomOrLeft,
            subplots: Subplots::default(),
        }
    }

    pub fn with_gap(mut self, gap: f64) -> Self {
        self.subplots.gap = gap;
        self
    }

    pub fn gap(&self) -> f64 {
        self.subplots.gap
    }

    pub fn add(&mut self, subplot: CategoryPlot, weight: u32) -> Result<()> {
        self.subplots.add(subplot, weight)
    }

    pub fn remove(&mut self, index: usize) -> Result<CategoryPlot> {
        self.subplots.remove(index)
    }

    pub fn subplots(&self) -> &[CategoryPlot] {
        &self.subplots.plots
    }

    pub fn subplots_mut(&mut self) -> &mut [CategoryPlot] {
        &mut self.subplots.plots
    }

    pub fn orientation(&self) -> PlotOrientation {
        self.subplots.orientation()
    }

    pub fn set_orientation(&mut self, orientation: PlotOrientation) {
        self.subplots.set_orientation(orientation);
    }

    pub fn domain_edge(&self) -> RectangleEdge {
        self.domain_axis_location.domain_edge(self.orientation())
    }

    /// Ordered union of the subplots' categories.
    pub fn categories(&self) -> Vec<String> {
        self.subplots()
            .iter()
            .flat_map(CategoryPlot::categories)
            .collect::<IndexSet<String>>()
            .into_iter()
            .collect()
    }
}

impl Plot for CombinedDomainCategoryPlot {
    fn plot_type(&self) -> &'static str {
        "Combined_Domain_CategoryPlot"
    }

    fn base(&self) -> &PlotBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut PlotBase {
        &mut self.base
    }

    fn draw(&self, g: &mut dyn Graphics, area: Rect, anchor: Option<DVec2>, info: &mut PlotRenderingInfo) {
        let area = self.base.insets.trim(area);
        info.plot_area = area;
        let categories = self.categories();
        let edge = self.domain_edge();
        let subplots = self.subplots.aligned();

        let mut shared = AxisSpace::default();
        self.domain_axis.reserve_space(&*g, &categories, &area, edge, &mut shared);
        let layout = SharedLayout::compute(
            area,
            shared,
            &self.subplots.weights(),
            self.gap(),
            domain_direction(self.orientation()),
            |i, sub| subplots[i].measure_range_axis_space(&*g, sub),
        );
        info.data_area = layout.data_area;

        if subplots.is_empty() {
            self.base.draw_no_data_message(g, layout.data_area);
        }
        self.domain_axis
            .draw(g, &categories, edge.coordinate(&layout.data_area), &layout.data_area, edge);

        for (subplot, sub_area) in subplots.iter().zip(&layout.subplot_areas) {
            let mut sub_info = PlotRenderingInfo::new();
            let parent = CategoryParentAxes {
                domain: Some((&self.domain_axis, categories.as_slice())),
                fixed_range_space: Some(layout.subplot_space),
                ..CategoryParentAxes::default()
            };
            subplot.draw_in(g, *sub_area, anchor, &mut sub_info, parent);
            info.add_subplot_info(sub_info);
        }
    }

    fn legend_items(&self) -> Vec<LegendItem> {
        self.subplots.legend_items()
    }

    fn as_zoomable(&self) -> Option<&dyn Zoomable> {
        Some(self)
    }

    fn as_zoomable_mut(&mut self) -> Option<&mut dyn Zoomable> {
        Some(self)
    }

    fn as_pannable_mut(&mut self) -> Option<&mut dyn Pannable> {
        Some(self)
    }

    fn restore_auto_bounds(&mut self) {
        self.subplots.restore_auto_bounds();
    }

    fn after_draw(&mut self, info: &PlotRenderingInfo) {
        self.subplots.after_draw(info);
    }
}

impl Zoomable for CombinedDomainCategoryPlot {
    fn is_domain_zoomable(&self) -> bool {
        false
    }

    fn is_range_zoomable(&self) -> bool {
        true
    }

    fn orientation(&self) -> PlotOrientation {
        self.subplots.orientation()
    }

    fn zoom_domain_axes(&mut self, _factor: f64, _info: &PlotRenderingInfo, _source: DVec2, _use_anchor: bool) {}

    fn zoom_domain_axes_range(&mut self, _lower: f64, _upper: f64, _info: &PlotRenderingInfo, _source: DVec2) {}

    fn zoom_range_axes(&mut self, factor: f64, info: &PlotRenderingInfo, source: DVec2, use_anchor: bool) {
        self.subplots
            .for_targets(info, source, |p, sub_info| p.zoom_range_axes(factor, sub_info, source, use_anchor));
    }

    fn zoom_range_axes_range(&mut self, lower: f64, upper: f64, info: &PlotRenderingInfo, source: DVec2) {
        self.subplots
            .for_targets(info, source, |p, sub_info| p.zoom_range_axes_range(lower, upper, sub_info, source));
    }
}

impl Pannable for CombinedDomainCategoryPlot {
    fn is_domain_pannable(&self) -> bool {
        false
    }

    fn is_range_pannable(&self) -> bool {
        self.subplots().iter().any(|s| s.range_pannable)
    }

    fn pan_domain_axes(&mut self, _percent: f64, _info: &PlotRenderingInfo, _source: DVec2) {}

    fn pan_range_axes(&mut self, percent: f64, info: &PlotRenderingInfo, source: DVec2) {
        self.subplots
            .for_targets(info, source, |p, sub_info| p.pan_range_axes(percent, sub_info, source));
    }
}

/// Category subplots sharing one value axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombinedRangeCategoryPlot {
    pub base: PlotBase,
    pub range_axis: ValueAxis,
    pub range_axis_location: AxisLocation,
    subplots: Subplots<CategoryPlot>,
}

impl Default for CombinedRangeCategoryPlot {
    fn default() -> Self {
        Self::new(ValueAxis::default())
    }
}

impl CombinedRangeCategoryPlot {
    pub fn new(range_axis: ValueAxis) -> Self {
        Self {
            base: PlotBase::default(),
            range_axis,
            range_axis_location: AxisLocation::BottomOrLeft,
            subplots: Subplots::default(),
        }
    }

    pub fn with_gap(mut self, gap: f64) -> Self {
        self.subplots.gap = gap;
        self
    }

    pub fn gap(&self) -> f64 {
        self.subplots.gap
    }

    pub fn add(&mut self, subplot: CategoryPlot, weight: u32) -> Result<()> {
        self.subplots.add(subplot, weight)
    }

    pub fn remove(&mut self, index: usize) -> Result<CategoryPlot> {
        self.subplots.remove(index)
    }

    pub fn subplots(&self) -> &[CategoryPlot] {
        &self.subplots.plots
    }

    pub fn subplots_mut(&mut self) -> &mut [CategoryPlot] {
        &mut self.subplots.plots
    }

    pub fn orientation(&self) -> PlotOrientation {
        self.subplots.orientation()
    }

    pub fn set_orientation(&mut self, orientation: PlotOrientation) {
        self.subplots.set_orientation(orientation);
    }

    pub fn range_edge(&self) -> RectangleEdge {
        self.range_axis_location.range_edge(self.orientation())
    }

    pub fn data_range(&self) -> Option<Range> {
        self.subplots()
            .iter()
            .fold(None, |acc, s| Range::combine(acc, s.data_range()))
    }

    pub fn visible_range(&self) -> Range {
        self.range_axis.effective_range(self.data_range())
    }
}

impl Plot for CombinedRangeCategoryPlot {
    fn plot_type(&self) -> &'static str {
        "Combined_Range_CategoryPlot"
    }

    fn base(&self) -> &PlotBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut PlotBase {
        &mut self.base
    }

    fn draw(&self, g: &mut dyn Graphics, area: Rect, anchor: Option<DVec2>, info: &mut PlotRenderingInfo) {
        let area = self.base.insets.trim(area);
        info.plot_area = area;
        let range = self.visible_range();
        let edge = self.range_edge();
        let subplots = self.subplots.aligned();

        let mut shared = AxisSpace::default();
        self.range_axis.reserve_space(&*g, range, &area, edge, &mut shared);
        let layout = SharedLayout::compute(
            area,
            shared,
            &self.subplots.weights(),
            self.gap(),
            range_direction(self.orientation()),
            |i, sub| subplots[i].measure_domain_axis_space(&*g, sub),
        );
        info.data_area = layout.data_area;

        if subplots.is_empty() {
            self.base.draw_no_data_message(g, layout.data_area);
        }
        self.range_axis
            .draw(g, range, edge.coordinate(&layout.data_area), &layout.data_area, edge);

        for (subplot, sub_area) in subplots.iter().zip(&layout.subplot_areas) {
            let mut sub_info = PlotRenderingInfo::new();
            let parent = CategoryParentAxes {
                range: Some((&self.range_axis, range)),
                fixed_domain_space: Some(layout.subplot_space),
                ..CategoryParentAxes::default()
            };
            subplot.draw_in(g, *sub_area, anchor, &mut sub_info, parent);
            info.add_subplot_info(sub_info);
        }
    }

    fn legend_items(&self) -> Vec<LegendItem> {
        self.subplots.legend_items()
    }

    fn as_zoomable(&self) -> Option<&dyn Zoomable> {
        Some(self)
    }

    fn as_zoomable_mut(&mut self) -> Option<&mut dyn Zoomable> {
        Some(self)
    }

    fn as_pannable_mut(&mut self) -> Option<&mut dyn Pannable> {
        Some(self)
    }

    fn restore_auto_bounds(&mut self) {
        self.range_axis.set_auto_range(true);
        self.subplots.restore_auto_bounds();
    }

    fn after_draw(&mut self, info: &PlotRenderingInfo) {
        self.subplots.after_draw(info);
    }
}

impl Zoomable for CombinedRangeCategoryPlot {
    fn is_domain_zoomable(&self) -> bool {
        false
    }

    fn is_range_zoomable(&self) -> bool {
        true
    }

    fn orientation(&self) -> PlotOrientation {
        self.subplots.orientation()
    }

    fn zoom_domain_axes(&mut self, _factor: f64, _info: &PlotRenderingInfo, _source: DVec2, _use_anchor: bool) {}

    fn zoom_domain_axes_range(&mut self, _lower: f64, _upper: f64, _info: &PlotRenderingInfo, _source: DVec2) {}

    fn zoom_range_axes(&mut self, factor: f64, info: &PlotRenderingInfo, source: DVec2, use_anchor: bool) {
        self.range_axis.configure(self.data_range());
        let edge = self.range_edge();
        let anchor = use_anchor.then(|| {
            self.range_axis.screen_to_value(
                coordinate_along(edge, source),
                self.range_axis.range,
                &info.data_area,
                edge,
            )
        });
        zoom_axis(&mut self.range_axis, factor, anchor);
    }

    fn zoom_range_axes_range(&mut self, lower: f64, upper: f64, _info: &PlotRenderingInfo, _source: DVec2) {
        self.range_axis.configure(self.data_range());
        self.range_axis.zoom_range(lower, upper);
    }
}

impl Pannable for CombinedRangeCategoryPlot {
    fn is_domain_pannable(&self) -> bool {
        false
    }

    fn is_range_pannable(&self) -> bool {
        true
    }

    fn pan_domain_axes(&mut self, _percent: f64, _info: &PlotRenderingInfo, _source: DVec2) {}

    fn pan_range_axes(&mut self, percent: f64, _info: &PlotRenderingInfo, _source: DVec2) {
        self.range_axis.configure(self.data_range());
        pan_axis(&mut self.range_axis, percent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category_plot::CategoryRenderer;
    use crate::dataset::{CategoryDataset, XyDataset, XySeries};
    use crate::graphics::RecordingCanvas;
    use crate::xy_plot::XyRenderer;

    fn xy(points: Vec<[f64; 2]>) -> XyPlot {
        XyPlot::new(
            XyDataset::new().with_series("s", XySeries::from_points(points)),
            ValueAxis::default(),
            ValueAxis::new("y"),
            XyRenderer::line(),
        )
    }

    fn bars(value: f64) -> CategoryPlot {
        let data = CategoryDataset::new().with_value(value, "s", "A").with_value(value * 2.0, "s", "B");
        CategoryPlot::new(data, CategoryAxis::default(), ValueAxis::new("v"), CategoryRenderer::bar())
    }

    fn render(plot: &dyn Plot) -> PlotRenderingInfo {
        let mut g = RecordingCanvas::new();
        let mut info = PlotRenderingInfo::new();
        plot.draw(&mut g, Rect::new(0.0, 0.0, 400.0, 300.0), None, &mut info);
        info
    }

    /// Subplots stacked along `direction` must span the same extent as the
    /// shared data area across it.
    fn assert_lined_up(info: &PlotRenderingInfo, direction: SubplotDirection) {
        assert_eq!(info.subplots.len(), 2);
        let shared = info.data_area;
        for sub in &info.subplots {
            let a = sub.data_area;
            let (start, end, shared_start, shared_end) = match direction {
                SubplotDirection::Vertical => (a.x, a.max_x(), shared.x, shared.max_x()),
                SubplotDirection::Horizontal => (a.y, a.max_y(), shared.y, shared.max_y()),
            };
            assert!((start - shared_start).abs() < 1e-9, "{a:?} vs {shared:?}");
            assert!((end - shared_end).abs() < 1e-9, "{a:?} vs {shared:?}");
        }
    }

    #[test]
    fn areas_follow_weights_and_gap() {
        let area = Rect::new(0.0, 0.0, 100.0, 110.0);
        let rects = allocate_subplot_areas(area, &[1, 3], 10.0, SubplotDirection::Vertical);
        assert_eq!(rects[0], Rect::new(0.0, 0.0, 100.0, 25.0));
        assert_eq!(rects[1], Rect::new(0.0, 35.0, 100.0, 75.0));

        let rects = allocate_subplot_areas(area, &[1, 1], 0.0, SubplotDirection::Horizontal);
        assert_eq!(rects[1], Rect::new(50.0, 0.0, 50.0, 110.0));
        assert!(allocate_subplot_areas(area, &[], 5.0, SubplotDirection::Vertical).is_empty());
    }

    #[test]
    fn weights_beyond_u32_total_still_split() {
        let area = Rect::new(0.0, 0.0, 100.0, 205.0);
        let rects = allocate_subplot_areas(area, &[u32::MAX, 2], 5.0, SubplotDirection::Vertical);
        assert_eq!(rects.len(), 2);
        assert!(rects[1].height > 0.0 && rects[1].height < 1e-6);
        assert!((rects[0].height + rects[1].height - 200.0).abs() < 1e-9);

        let rects = allocate_subplot_areas(area, &[u32::MAX, u32::MAX], 0.0, SubplotDirection::Horizontal);
        assert!((rects[0].width - 50.0).abs() < 1e-9);
        assert!((rects[1].x - 50.0).abs() < 1e-9);
    }

    #[test]
    fn huge_weights_draw() {
        let mut plot = CombinedDomainXyPlot::default();
        plot.add(xy(vec![[0.0, 1.0], [1.0, 2.0]]), u32::MAX).unwrap();
        plot.add(xy(vec![[0.0, 3.0], [1.0, 4.0]]), 2).unwrap();
        let info = render(&plot);
        assert_eq!(info.subplots.len(), 2);
        let (big, small) = (info.subplots[0].data_area, info.subplots[1].data_area);
        assert!(big.height > small.height);
        assert!(big.height.is_finite() && small.height >= 0.0);
    }

    #[test]
    fn zero_weight_is_rejected() {
        let mut plot = CombinedDomainXyPlot::default();
        assert!(matches!(plot.add(xy(vec![]), 0), Err(ChartError::InvalidWeight(0))));
        assert!(plot.subplots().is_empty());
        assert!(matches!(plot.remove(0), Err(ChartError::SubplotNotFound(0))));
    }

    #[test]
    fn add_clears_insets_and_sets_orientation() {
        let mut plot = CombinedDomainXyPlot::default();
        plot.set_orientation(PlotOrientation::Horizontal);
        plot.add(xy(vec![[0.0, 1.0]]), 2).unwrap();
        let s = &plot.subplots()[0];
        assert_eq!(s.base.insets, Insets::ZERO);
        assert_eq!(s.orientation, PlotOrientation::Horizontal);
        assert_eq!(s.weight, 2);
    }

    #[test]
    fn shared_domain_lines_up_data_areas() {
        let mut plot = CombinedDomainXyPlot::default();
        plot.add(xy(vec![[0.0, 1.0], [10.0, 2.0]]), 1).unwrap();
        // Big numbers need wider tick labels on this subplot's range axis.
        plot.add(xy(vec![[5.0, 100000.0], [20.0, 200000.0]]), 2).unwrap();

        let mut g = RecordingCanvas::new();
        let mut info = PlotRenderingInfo::new();
        plot.draw(&mut g, Rect::new(0.0, 0.0, 400.0, 400.0), None, &mut info);

        assert_eq!(info.subplots.len(), 2);
        let a = info.subplots[0].data_area;
        let b = info.subplots[1].data_area;
        assert!((a.x - b.x).abs() < 1e-9);
        assert!((a.width - b.width).abs() < 1e-9);
        assert!((a.x - info.data_area.x).abs() < 1e-9);
        assert!(b.height > a.height * 1.5);
        assert_eq!(plot.data_range(), Some(Range::new(0.0, 20.0).unwrap()));
    }

    #[test]
    fn domain_xy_orientation_reaches_subplots() {
        let mut plot = CombinedDomainXyPlot::default();
        plot.add(xy(vec![[0.0, 1.0], [1.0, 2.0]]), 1).unwrap();
        plot.add(xy(vec![[0.0, 500.0], [1.0, 9000.0]]), 1).unwrap();
        plot.set_orientation(PlotOrientation::Horizontal);
        assert_eq!(plot.orientation(), PlotOrientation::Horizontal);
        assert!(plot.subplots().iter().all(|s| s.orientation == PlotOrientation::Horizontal));
        assert_lined_up(&render(&plot), SubplotDirection::Horizontal);
    }

    #[test]
    fn range_xy_orientation_reaches_subplots() {
        let mut plot = CombinedRangeXyPlot::default();
        plot.add(xy(vec![[0.0, 1.0], [1.0, 2.0]]), 1).unwrap();
        plot.add(xy(vec![[0.0, 5.0], [1000.0, 7.0]]), 1).unwrap();
        plot.set_orientation(PlotOrientation::Horizontal);
        assert!(plot.subplots().iter().all(|s| s.orientation == PlotOrientation::Horizontal));
        assert_lined_up(&render(&plot), SubplotDirection::Vertical);
    }

    #[test]
    fn domain_category_orientation_reaches_subplots() {
        let mut plot = CombinedDomainCategoryPlot::default();
        plot.add(bars(1.0), 1).unwrap();
        plot.add(bars(1000.0), 1).unwrap();
        plot.set_orientation(PlotOrientation::Horizontal);
        assert!(plot.subplots().iter().all(|s| s.orientation == PlotOrientation::Horizontal));
        assert_lined_up(&render(&plot), SubplotDirection::Horizontal);
    }

    #[test]
    fn range_category_orientation_reaches_subplots() {
        let mut plot = CombinedRangeCategoryPlot::default();
        plot.add(bars(1.0), 1).unwrap();
        plot.add(bars(3.0), 1).unwrap();
        plot.set_orientation(PlotOrientation::Horizontal);
        assert!(plot.subplots().iter().all(|s| s.orientation == PlotOrientation::Horizontal));
        assert_lined_up(&render(&plot), SubplotDirection::Vertical);
    }

    #[test]
    fn stray_subplot_orientation_is_drawn_like_the_parent() {
        let mut plot = CombinedRangeXyPlot::default();
        plot.add(xy(vec![[0.0, 1.0], [1.0, 2.0]]), 1).unwrap();
        plot.add(xy(vec![[0.0, 5.0], [1.0, 7.0]]), 1).unwrap();
        plot.subplots_mut()[1].orientation = PlotOrientation::Horizontal;
        assert_lined_up(&render(&plot), SubplotDirection::Horizontal);
    }

    #[test]
    fn loading_realigns_subplot_orientation() {
        let mut plot = CombinedRangeCategoryPlot::default();
        plot.add(bars(1.0), 1).unwrap();
        plot.add(bars(2.0), 1).unwrap();
        let mut json = serde_json::to_value(&plot).unwrap();
        json["subplots"]["orientation"] = serde_json::json!("Horizontal");

        let loaded: CombinedRangeCategoryPlot = serde_json::from_value(json).unwrap();
        assert_eq!(loaded.orientation(), PlotOrientation::Horizontal);
        assert!(loaded.subplots().iter().all(|s| s.orientation == PlotOrientation::Horizontal));
        assert_eq!(loaded.gap(), DEFAULT_GAP);
    }

    #[test]
    fn non_shared_zoom_targets_subplot_under_cursor() {
        let mut plot = CombinedDomainXyPlot::default();
        plot.add(xy(vec![[0.0, 1.0], [1.0, 2.0]]), 1).unwrap();
        plot.add(xy(vec![[0.0, 1.0], [1.0, 2.0]]), 1).unwrap();
        let mut g = RecordingCanvas::new();
        let mut info = PlotRenderingInfo::new();
        plot.draw(&mut g, Rect::new(0.0, 0.0, 300.0, 300.0), None, &mut info);

        let before = plot.subplots()[1].visible_range();
        let source = info.subplots[0].data_area.center();
        plot.zoom_range_axes(0.5, &info, source, false);
        assert!(!plot.subplots()[0].range_axis.auto_range);
        assert_eq!(plot.subplots()[1].visible_range(), before);

        plot.zoom_range_axes(0.5, &info, DVec2::new(-10.0, -10.0), false);
        assert!(!plot.subplots()[1].range_axis.auto_range);
    }

    #[test]
    fn shared_axis_zooms_once() {
        let mut plot = CombinedDomainXyPlot::default();
        plot.add(xy(vec![[0.0, 1.0], [10.0, 2.0]]), 1).unwrap();
        let info = PlotRenderingInfo::new();
        let before = plot.visible_range();
        plot.zoom_domain_axes(0.5, &info, DVec2::ZERO, false);
        assert!((plot.visible_range().length() - before.length() / 2.0).abs() < 1e-9);
        plot.restore_auto_bounds();
        assert_eq!(plot.visible_range(), before);
    }

    #[test]
    fn range_xy_places_subplots_side_by_side() {
        let mut plot = CombinedRangeXyPlot::default();
        plot.add(xy(vec![[0.0, 1.0], [1.0, 2.0]]), 1).unwrap();
        plot.add(xy(vec![[0.0, 5.0], [1.0, 7.0]]), 1).unwrap();
        let info = render(&plot);
        let (a, b) = (info.subplots[0].data_area, info.subplots[1].data_area);
        assert!(b.x > a.max_x());
        assert!((a.y - b.y).abs() < 1e-9 && (a.height - b.height).abs() < 1e-9);
        assert_eq!(plot.data_range().unwrap().upper, 7.0);
    }

    #[test]
    fn domain_category_uses_union_of_categories() {
        let mut plot = CombinedDomainCategoryPlot::default();
        let first = CategoryDataset::new().with_value(1.0, "s", "A").with_value(2.0, "s", "B");
        let second = CategoryDataset::new().with_value(3.0, "t", "B").with_value(4.0, "t", "C");
        plot.add(CategoryPlot::new(first, CategoryAxis::default(), ValueAxis::default(), CategoryRenderer::bar()), 1)
            .unwrap();
        plot.add(CategoryPlot::new(second, CategoryAxis::default(), ValueAxis::default(), CategoryRenderer::bar()), 1)
            .unwrap();
        assert_eq!(plot.categories(), ["A", "B", "C"]);

        let mut g = RecordingCanvas::new();
        let mut info = PlotRenderingInfo::new();
        plot.draw(&mut g, Rect::new(0.0, 0.0, 300.0, 300.0), None, &mut info);
        // "B" lines up across both subplots.
        let b_top = info.subplots[0].entities.get(1).unwrap().area.bounds();
        let b_bottom = info.subplots[1].entities.get(0).unwrap().area.bounds();
        assert!((b_top.center_x() - b_bottom.center_x()).abs() < 1e-9);
        assert_eq!(plot.legend_items().len(), 2);
    }

    #[test]
    fn range_category_shares_value_axis() {
        let mut plot = CombinedRangeCategoryPlot::default();
        let small = CategoryDataset::new().with_value(1.0, "s", "A");
        let large = CategoryDataset::new().with_value(10.0, "s", "A");
        plot.add(CategoryPlot::new(small, CategoryAxis::default(), ValueAxis::default(), CategoryRenderer::bar()), 1)
            .unwrap();
        plot.add(CategoryPlot::new(large, CategoryAxis::default(), ValueAxis::default(), CategoryRenderer::bar()), 1)
            .unwrap();
        let info = render(&plot);
        let short = info.subplots[0].entities.get(0).unwrap().area.bounds();
        let tall = info.subplots[1].entities.get(0).unwrap().area.bounds();
        assert!((short.max_y() - tall.max_y()).abs() < 1e-9);
        assert!((tall.height / short.height - 10.0).abs() < 1e-6);
    }
}
