//! Zoom and pan contracts implemented by plots with value axes.
use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::info::PlotRenderingInfo;

/// Whether the domain axis runs horizontally (`Vertical`) or vertically (`Horizontal`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlotOrientation {
    #[default]
    Vertical,
    Horizontal,
}

/// A plot whose axes can be zoomed.
///
/// `info` is the rendering info from the last draw and `source` is the screen
/// point the gesture happened at. Combined plots use `source` to pick the
/// subplot a non-shared axis belongs to.
pub trait Zoomable {
    fn is_domain_zoomable(&self) -> bool;

    fn is_range_zoomable(&self) -> bool;

    fn orientation(&self) -> PlotOrientation;

    /// Scale the domain axes by `factor` (< 1 zooms in). With `use_anchor` the
    /// value under `source` stays put; a non-positive factor restores auto range.
    fn zoom_domain_axes(&mut self, factor: f64, info: &PlotRenderingInfo, source: DVec2, use_anchor: bool);

    /// Zoom the domain axes to the fractions `lower..upper` of their current range.
    fn zoom_domain_axes_range(&mut self, lower: f64, upper: f64, info: &PlotRenderingInfo, source: DVec2);

    fn zoom_range_axes(&mut self, factor: f64, info: &PlotRenderingInfo, source: DVec2, use_anchor: bool);

    fn zoom_range_axes_range(&mut self, lower: f64, upper: f64, info: &PlotRenderingInfo, source: DVec2);
}

/// A plot whose axes can be panned.
pub trait Pannable {
    fn is_domain_pannable(&self) -> bool;

    fn is_range_pannable(&self) -> bool;

    /// Shift the domain axes by `percent` of their length.
    fn pan_domain_axes(&mut self, percent: f64, info: &PlotRenderingInfo, source: DVec2);

    fn pan_range_axes(&mut self, percent: f64, info: &PlotRenderingInfo, source: DVec2);
}
