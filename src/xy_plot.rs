//! Plots of `(x, y)` series against two value axes.
use glam::DVec2;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::axis::{AxisLocation, AxisSpace, ValueAxis};
use crate::color::Color;
use crate::crosshair::{Crosshair, CrosshairState};
use crate::dataset::{Range, XyDataset, XySeries};
use crate::drawing_supplier::DrawingSupplier;
use crate::entity::{ChartEntity, EntityKind};
use crate::geometry::{Rect, RectangleEdge};
use crate::graphics::{Graphics, TextItem};
use crate::gridlines::Gridlines;
use crate::info::PlotRenderingInfo;
use crate::labels::XyItemLabelGenerator;
use crate::legend::LegendItem;
use crate::marker::{Layer, Marker};
use crate::plot::{DatasetRenderingOrder, Plot, PlotBase};
use crate::shape::{MarkerShape, Path};
use crate::style::{Font, Stroke, TextAnchor};
use crate::zoom::{Pannable, PlotOrientation, Zoomable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum XyRendererKind {
    #[default]
    Line,
    Shapes,
    LinesAndShapes,
    /// Filled down to zero.
    Area,
    /// Horizontal then vertical segments between items.
    Step,
}

impl XyRendererKind {
    fn lines(self) -> bool {
        matches!(self, Self::Line | Self::LinesAndShapes | Self::Step)
    }

    fn shapes(self) -> bool {
        matches!(self, Self::Shapes | Self::LinesAndShapes)
    }
}

/// Order in which the series of one dataset are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SeriesRenderingOrder {
    Forward,
    #[default]
    Reverse,
}

impl SeriesRenderingOrder {
    fn indices(self, count: usize) -> Vec<usize> {
        match self {
            Self::Forward => (0..count).collect(),
            Self::Reverse => (0..count).rev().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct XyRenderer {
    pub kind: XyRendererKind,
    pub series_paints: IndexMap<String, Color>,
    pub series_strokes: IndexMap<String, Stroke>,
    pub series_shapes: IndexMap<String, MarkerShape>,
    pub shape_size: f64,
    /// Stroke shape outlines instead of filling them.
    pub shapes_outlined: bool,
    pub item_labels_visible: bool,
    pub item_label_generator: XyItemLabelGenerator,
    pub item_label_font: Font,
    pub item_label_paint: Color,
    pub tooltip_generator: Option<XyItemLabelGenerator>,
}

impl Default for XyRenderer {
    fn default() -> Self {
        Self {
            kind: XyRendererKind::Line,
            series_paints: IndexMap::new(),
            series_strokes: IndexMap::new(),
            series_shapes: IndexMap::new(),
            shape_size: 6.0,
            shapes_outlined: false,
            item_labels_visible: false,
            item_label_generator: XyItemLabelGenerator::default(),
            item_label_font: Font::new(10.0),
            item_label_paint: Color::BLACK,
            tooltip_generator: Some(XyItemLabelGenerator::tooltips()),
        }
    }
}

/// Where the items of one dataset go.
struct ItemContext<'a> {
    data_area: Rect,
    orientation: PlotOrientation,
    domain_axis: &'a ValueAxis,
    domain_range: Range,
    domain_edge: RectangleEdge,
    range_axis: &'a ValueAxis,
    range: Range,
    range_edge: RectangleEdge,
    dataset: &'a XyDataset,
    dataset_index: usize,
    series_offset: usize,
}

impl ItemContext<'_> {
    /// Screen position of a data point, or `None` if either axis can't show it.
    fn project(&self, x: f64, y: f64) -> Option<DVec2> {
        let tx = self
            .domain_axis
            .value_to_screen(x, self.domain_range, &self.data_area, self.domain_edge)?;
        let ty = self
            .range_axis
            .value_to_screen(y, self.range, &self.data_area, self.range_edge)?;
        Some(match self.orientation {
            PlotOrientation::Vertical => DVec2::new(tx, ty),
            PlotOrientation::Horizontal => DVec2::new(ty, tx),
        })
    }

    /// Screen position of `x` on the zero line of the range axis.
    fn base_point(&self, x: f64) -> Option<DVec2> {
        let zero = self.range.constrain(0.0);
        self.project(x, zero)
    }
}

impl XyRenderer {
    pub fn new(kind: XyRendererKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn line() -> Self {
        Self::new(XyRendererKind::Line)
    }

    pub fn shapes() -> Self {
        Self::new(XyRendererKind::Shapes)
    }

    pub fn lines_and_shapes() -> Self {
        Self::new(XyRendererKind::LinesAndShapes)
    }

    pub fn area() -> Self {
        Self::new(XyRendererKind::Area)
    }

    pub fn step() -> Self {
        Self::new(XyRendererKind::Step)
    }

    pub fn with_series_paint(mut self, key: impl Into<String>, paint: Color) -> Self {
        self.series_paints.insert(key.into(), paint);
        self
    }

    pub fn with_series_stroke(mut self, key: impl Into<String>, stroke: Stroke) -> Self {
        self.series_strokes.insert(key.into(), stroke);
        self
    }

    pub fn series_paint(&self, key: &str, index: usize, supplier: &dyn DrawingSupplier) -> Color {
        self.series_paints
            .get(key)
            .copied()
            .unwrap_or_else(|| supplier.paint(index))
    }

    pub fn series_stroke(&self, key: &str, index: usize, supplier: &dyn DrawingSupplier) -> Stroke {
        self.series_strokes
            .get(key)
            .cloned()
            .unwrap_or_else(|| supplier.stroke(index))
    }

    pub fn series_shape(&self, key: &str, index: usize, supplier: &dyn DrawingSupplier) -> MarkerShape {
        self.series_shapes
            .get(key)
            .copied()
            .unwrap_or_else(|| supplier.shape(index))
    }

    /// Value range the range axis must cover for `dataset`.
    pub fn find_range_bounds(&self, dataset: &XyDataset) -> Option<Range> {
        match self.kind {
            XyRendererKind::Area => Range::expand_to_include(dataset.range_range(), 0.0),
            _ => dataset.range_range(),
        }
    }

    pub fn legend_item(&self, key: &str, index: usize, supplier: &dyn DrawingSupplier) -> LegendItem {
        let mut item = LegendItem::new(key, self.series_paint(key, index, supplier))
            .with_shape(self.series_shape(key, index, supplier));
        if self.kind.lines() {
            item = item.with_line(self.series_stroke(key, index, supplier));
        }
        item.shape_visible = self.kind.shapes() || self.kind == XyRendererKind::Area;
        if self.kind == XyRendererKind::Area {
            item.shape = MarkerShape::Square;
        }
        item
    }

    /// Draw one series. Pass 0 draws lines and areas, pass 1 shapes and hotspots.
    #[allow(clippy::too_many_arguments)]
    fn draw_series(
        &self,
        base: &PlotBase,
        g: &mut dyn Graphics,
        ctx: &ItemContext<'_>,
        info: &mut PlotRenderingInfo,
        crosshair: &mut CrosshairState,
        series_index: usize,
        pass: usize,
    ) {
        let Some((key, series)) = ctx.dataset.series(series_index) else {
            return;
        };
        let index = ctx.series_offset + series_index;
        let supplier = &base.drawing_supplier;
        let paint = base.fg(self.series_paint(key, index, supplier));
        if pass == 0 {
            self.draw_series_lines(g, ctx, series, paint, &self.series_stroke(key, index, supplier));
            return;
        }

        let shape = self.series_shape(key, index, supplier);
        for (item, &[x, y]) in series.items.iter().enumerate() {
            if !x.is_finite() || !y.is_finite() {
                trace!(series = key, item, "skipping non-finite item");
                continue;
            }
            let Some(p) = ctx.project(x, y) else {
                continue;
            };
            let outline = shape.to_path(p, self.shape_size);
            if self.kind.shapes() {
                if self.shapes_outlined {
                    g.stroke_path(&outline, paint, &Stroke::solid(1.0));
                } else {
                    g.fill_path(&outline, paint);
                }
            }
            if self.item_labels_visible {
                let text = self.item_label_generator.generate(key, x, y);
                let pos = p - DVec2::new(0.0, self.shape_size / 2.0 + 2.0);
                g.draw_text(
                    &TextItem::new(text, pos, &self.item_label_font, self.item_label_paint)
                        .with_anchor(TextAnchor::BottomCenter),
                );
            }

            let (trans_x, trans_y) = match ctx.orientation {
                PlotOrientation::Vertical => (p.x, p.y),
                PlotOrientation::Horizontal => (p.y, p.x),
            };
            crosshair.update_point(x, y, ctx.dataset_index, trans_x, trans_y, ctx.orientation);

            if !ctx.data_area.contains(p) {
                continue;
            }
            let tooltip = self.tooltip_generator.as_ref().map(|t| t.generate(key, x, y));
            info.entities.add(
                ChartEntity::new(
                    outline,
                    EntityKind::XyItem {
                        dataset_index: ctx.dataset_index,
                        series_index,
                        item,
                        x,
                        y,
                    },
                )
                .with_tooltip(tooltip)
                .with_anchor(p),
            );
        }
    }

    fn draw_series_lines(&self, g: &mut dyn Graphics, ctx: &ItemContext<'_>, series: &XySeries, paint: Color, stroke: &Stroke) {
        if !self.kind.lines() && self.kind != XyRendererKind::Area {
            return;
        }
        let mut previous: Option<(f64, DVec2)> = None;
        for &[x, y] in &series.items {
            let current = (x.is_finite() && y.is_finite())
                .then(|| ctx.project(x, y))
                .flatten();
            let Some(p1) = current else {
                // A gap breaks the line.
                previous = None;
                continue;
            };
            if let Some((x0, p0)) = previous {
                match self.kind {
                    XyRendererKind::Line | XyRendererKind::LinesAndShapes => g.draw_line(p0, p1, paint, stroke),
                    XyRendererKind::Step => {
                        let corner = match ctx.orientation {
                            PlotOrientation::Vertical => DVec2::new(p1.x, p0.y),
                            PlotOrientation::Horizontal => DVec2::new(p0.x, p1.y),
                        };
                        g.stroke_path(&Path::polyline(&[p0, corner, p1]), paint, stroke);
                    }
                    XyRendererKind::Area => {
                        if let (Some(b0), Some(b1)) = (ctx.base_point(x0), ctx.base_point(x)) {
                            g.fill_path(&Path::polygon(&[b0, p0, p1, b1]), paint);
                        }
                    }
                    XyRendererKind::Shapes => {}
                }
            }
            previous = Some((x, p1));
        }
    }
}

/// Axes supplied by a combined parent plot.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct XyParentAxes<'a> {
    pub domain: Option<(&'a ValueAxis, Range)>,
    pub range: Option<(&'a ValueAxis, Range)>,
    pub fixed_domain_space: Option<AxisSpace>,
    pub fixed_range_space: Option<AxisSpace>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct XyPlot {
    pub base: PlotBase,
    pub datasets: Vec<XyDataset>,
    /// Renderer per dataset. Datasets without one use renderer 0.
    pub renderers: Vec<XyRenderer>,
    pub domain_axis: ValueAxis,
    pub range_axis: ValueAxis,
    pub orientation: PlotOrientation,
    pub domain_axis_location: AxisLocation,
    pub range_axis_location: AxisLocation,
    pub domain_gridlines: Gridlines,
    pub range_gridlines: Gridlines,
    pub domain_markers: Vec<Marker>,
    pub range_markers: Vec<Marker>,
    pub domain_crosshair: Crosshair,
    pub range_crosshair: Crosshair,
    pub rendering_order: DatasetRenderingOrder,
    pub series_rendering_order: SeriesRenderingOrder,
    pub weight: u32,
    pub fixed_domain_axis_space: Option<AxisSpace>,
    pub fixed_range_axis_space: Option<AxisSpace>,
    /// Data point dividing the background into quadrants.
    pub quadrant_origin: DVec2,
    /// Top-left, top-right, bottom-left, bottom-right.
    pub quadrant_paints: [Option<Color>; 4],
    pub domain_pannable: bool,
    pub range_pannable: bool,
}

impl Default for XyPlot {
    fn default() -> Self {
        Self {
            base: PlotBase::default(),
            datasets: Vec::new(),
            renderers: vec![XyRenderer::default()],
            domain_axis: ValueAxis::default(),
            range_axis: ValueAxis::default(),
            orientation: PlotOrientation::Vertical,
            domain_axis_location: AxisLocation::BottomOrLeft,
            range_axis_location: AxisLocation::BottomOrLeft,
            domain_gridlines: Gridlines::default(),
            range_gridlines: Gridlines::default(),
            domain_markers: Vec::new(),
            range_markers: Vec::new(),
            domain_crosshair: Crosshair::default(),
            range_crosshair: Crosshair::default(),
            rendering_order: DatasetRenderingOrder::Reverse,
            series_rendering_order: SeriesRenderingOrder::Reverse,
            weight: 1,
            fixed_domain_axis_space: None,
            fixed_range_axis_space: None,
            quadrant_origin: DVec2::ZERO,
            quadrant_paints: [None; 4],
            domain_pannable: true,
            range_pannable: true,
        }
    }
}

impl XyPlot {
    pub fn new(dataset: XyDataset, domain_axis: ValueAxis, range_axis: ValueAxis, renderer: XyRenderer) -> Self {
        Self {
            datasets: vec![dataset],
            renderers: vec![renderer],
            domain_axis,
            range_axis,
            ..Self::default()
        }
    }

    pub fn with_orientation(mut self, orientation: PlotOrientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }

    /// Overlay another dataset; returns its index.
    pub fn add_dataset(&mut self, dataset: XyDataset, renderer: XyRenderer) -> usize {
        self.datasets.push(dataset);
        let index = self.datasets.len() - 1;
        if self.renderers.len() <= index {
            self.renderers.resize(index, XyRenderer::default());
            self.renderers.push(renderer);
        } else {
            self.renderers[index] = renderer;
        }
        index
    }

    pub fn add_domain_marker(&mut self, marker: Marker) {
        self.domain_markers.push(marker);
    }

    pub fn add_range_marker(&mut self, marker: Marker) {
        self.range_markers.push(marker);
    }

    pub fn renderer_for(&self, dataset: usize) -> Option<&XyRenderer> {
        self.renderers.get(dataset).or_else(|| self.renderers.first())
    }

    pub fn domain_edge(&self) -> RectangleEdge {
        self.domain_axis_location.domain_edge(self.orientation)
    }

    pub fn range_edge(&self) -> RectangleEdge {
        self.range_axis_location.range_edge(self.orientation)
    }

    /// Union of the x ranges of every dataset.
    pub fn domain_data_range(&self) -> Option<Range> {
        self.datasets
            .iter()
            .fold(None, |acc, ds| Range::combine(acc, ds.domain_range()))
    }

    /// Union of the y ranges every renderer needs.
    pub fn range_data_range(&self) -> Option<Range> {
        self.datasets.iter().enumerate().fold(None, |acc, (i, ds)| {
            let r = self.renderer_for(i).and_then(|r| r.find_range_bounds(ds));
            Range::combine(acc, r)
        })
    }

    pub fn visible_domain_range(&self) -> Range {
        self.domain_axis.effective_range(self.domain_data_range())
    }

    pub fn visible_range(&self) -> Range {
        self.range_axis.effective_range(self.range_data_range())
    }

    /// Store the crosshair values resolved during the last draw.
    pub fn apply_crosshair_state(&mut self, state: &CrosshairState) {
        self.domain_crosshair.value = state.crosshair_x;
        self.range_crosshair.value = state.crosshair_y;
    }

    fn series_offsets(&self) -> Vec<usize> {
        self.datasets
            .iter()
            .scan(0, |acc, ds| {
                let start = *acc;
                *acc += ds.series_count();
                Some(start)
            })
            .collect()
    }

    fn reserve(
        &self,
        g: &dyn Graphics,
        plot_area: &Rect,
        axis: Option<(&ValueAxis, Range)>,
        edge: RectangleEdge,
        fixed: Option<AxisSpace>,
        space: &mut AxisSpace,
    ) {
        if let Some(fixed) = fixed {
            if edge.is_top_or_bottom() {
                space.ensure_at_least_edge(fixed.top, RectangleEdge::Top);
                space.ensure_at_least_edge(fixed.bottom, RectangleEdge::Bottom);
            } else {
                space.ensure_at_least_edge(fixed.left, RectangleEdge::Left);
                space.ensure_at_least_edge(fixed.right, RectangleEdge::Right);
            }
        } else if let Some((axis, range)) = axis {
            axis.reserve_space(g, range, plot_area, edge, space);
        }
    }

    /// Space this plot's own domain axis needs inside `plot_area`.
    pub(crate) fn measure_domain_axis_space(&self, g: &dyn Graphics, plot_area: &Rect) -> AxisSpace {
        let mut space = AxisSpace::default();
        let axis = Some((&self.domain_axis, self.visible_domain_range()));
        self.reserve(g, plot_area, axis, self.domain_edge(), None, &mut space);
        space
    }

    /// Space this plot's own range axis needs inside `plot_area`.
    pub(crate) fn measure_range_axis_space(&self, g: &dyn Graphics, plot_area: &Rect) -> AxisSpace {
        let mut space = AxisSpace::default();
        let axis = Some((&self.range_axis, self.visible_range()));
        self.reserve(g, plot_area, axis, self.range_edge(), None, &mut space);
        space
    }

    fn draw_quadrants(&self, g: &mut dyn Graphics, ctx: &ItemContext<'_>) {
        if self.quadrant_paints.iter().all(Option::is_none) {
            return;
        }
        let area = ctx.data_area;
        let origin = ctx
            .project(self.quadrant_origin.x, self.quadrant_origin.y)
            .unwrap_or_else(|| area.center())
            .clamp(DVec2::new(area.min_x(), area.min_y()), DVec2::new(area.max_x(), area.max_y()));
        let (ox, oy) = (origin.x, origin.y);
        let rects = [
            Rect::new(area.min_x(), area.min_y(), ox - area.min_x(), oy - area.min_y()),
            Rect::new(ox, area.min_y(), area.max_x() - ox, oy - area.min_y()),
            Rect::new(area.min_x(), oy, ox - area.min_x(), area.max_y() - oy),
            Rect::new(ox, oy, area.max_x() - ox, area.max_y() - oy),
        ];
        for (paint, rect) in self.quadrant_paints.iter().zip(rects) {
            if let Some(paint) = paint
                && !rect.is_empty()
            {
                g.fill_rect(rect, *paint);
            }
        }
    }

    fn draw_markers(&self, g: &mut dyn Graphics, layer: Layer, ctx: &ItemContext<'_>) {
        for m in self.domain_markers.iter().filter(|m| m.layer == layer) {
            m.draw_value_marker(g, ctx.domain_axis, ctx.domain_range, &ctx.data_area, ctx.domain_edge);
        }
        for m in self.range_markers.iter().filter(|m| m.layer == layer) {
            m.draw_value_marker(g, ctx.range_axis, ctx.range, &ctx.data_area, ctx.range_edge);
        }
    }

    pub(crate) fn draw_in(
        &self,
        g: &mut dyn Graphics,
        area: Rect,
        anchor: Option<DVec2>,
        info: &mut PlotRenderingInfo,
        parent: XyParentAxes<'_>,
    ) {
        let area = self.base.insets.trim(area);
        info.plot_area = area;

        let (domain_axis, domain_range) = parent
            .domain
            .unwrap_or((&self.domain_axis, self.visible_domain_range()));
        let (range_axis, range) = parent.range.unwrap_or((&self.range_axis, self.visible_range()));
        let domain_edge = self.domain_edge();
        let range_edge = self.range_edge();
        let own_domain = parent.domain.is_none().then_some((domain_axis, domain_range));
        let own_range = parent.range.is_none().then_some((range_axis, range));

        let mut space = AxisSpace::default();
        self.reserve(
            &*g,
            &area,
            own_domain,
            domain_edge,
            parent.fixed_domain_space.or(self.fixed_domain_axis_space),
            &mut space,
        );
        self.reserve(
            &*g,
            &area,
            own_range,
            range_edge,
            parent.fixed_range_space.or(self.fixed_range_axis_space),
            &mut space,
        );
        let data_area = space.shrink(area);
        info.data_area = data_area;
        debug!(?data_area, "xy plot layout");

        self.base.fill_background(g, data_area);

        let domain_ticks = match own_domain {
            Some(_) => {
                domain_axis
                    .draw(g, domain_range, domain_edge.coordinate(&data_area), &data_area, domain_edge)
                    .ticks
            }
            None => domain_axis.refresh_ticks(&*g, domain_range, &data_area, domain_edge),
        };
        let range_ticks = match own_range {
            Some(_) => range_axis
                .draw(g, range, range_edge.coordinate(&data_area), &data_area, range_edge)
                .ticks,
            None => range_axis.refresh_ticks(&*g, range, &data_area, range_edge),
        };

        let anchor = anchor.filter(|a| data_area.contains(*a));
        let (anchor_x, anchor_y) = anchor.map_or((f64::NAN, f64::NAN), |a| {
            let (dc, rc) = match self.orientation {
                PlotOrientation::Vertical => (a.x, a.y),
                PlotOrientation::Horizontal => (a.y, a.x),
            };
            (
                domain_axis.screen_to_value(dc, domain_range, &data_area, domain_edge),
                range_axis.screen_to_value(rc, range, &data_area, range_edge),
            )
        });
        let mut crosshair = CrosshairState::new(anchor, anchor_x, anchor_y);
        crosshair.crosshair_x = self.domain_crosshair.value;
        crosshair.crosshair_y = self.range_crosshair.value;

        let empty = XyDataset::new();
        let frame = ItemContext {
            data_area,
            orientation: self.orientation,
            domain_axis,
            domain_range,
            domain_edge,
            range_axis,
            range,
            range_edge,
            dataset: &empty,
            dataset_index: 0,
            series_offset: 0,
        };

        g.push_clip(data_area);
        self.draw_quadrants(g, &frame);
        self.domain_gridlines
            .draw_value(g, domain_axis, domain_range, &domain_ticks, &data_area, domain_edge);
        self.range_gridlines
            .draw_value(g, range_axis, range, &range_ticks, &data_area, range_edge);
        self.draw_markers(g, Layer::Background, &frame);

        let offsets = self.series_offsets();
        let mut found_data = false;
        for i in self.rendering_order.indices(self.datasets.len()) {
            let dataset = &self.datasets[i];
            let Some(renderer) = self.renderer_for(i) else {
                continue;
            };
            if dataset.is_empty() {
                continue;
            }
            found_data = true;
            let ctx = ItemContext {
                dataset,
                dataset_index: i,
                series_offset: offsets[i],
                ..frame
            };
            let order = self.series_rendering_order.indices(dataset.series_count());
            for pass in 0..2 {
                for &s in &order {
                    renderer.draw_series(&self.base, g, &ctx, info, &mut crosshair, s, pass);
                }
            }
        }

        self.draw_markers(g, Layer::Foreground, &frame);
        g.pop_clip();

        if !found_data {
            self.base.draw_no_data_message(g, data_area);
        }

        if anchor.is_some() {
            if !self.domain_crosshair.locked_on_data {
                crosshair.crosshair_x = anchor_x;
            }
            if !self.range_crosshair.locked_on_data {
                crosshair.crosshair_y = anchor_y;
            }
        }
        let vertical_domain = self.orientation == PlotOrientation::Vertical;
        if self.domain_crosshair.visible
            && let Some(coord) = domain_axis.value_to_screen(crosshair.crosshair_x, domain_range, &data_area, domain_edge)
        {
            let ch = Crosshair {
                value: crosshair.crosshair_x,
                ..self.domain_crosshair.clone()
            };
            ch.draw(g, &data_area, coord, vertical_domain);
        }
        if self.range_crosshair.visible
            && let Some(coord) = range_axis.value_to_screen(crosshair.crosshair_y, range, &data_area, range_edge)
        {
            let ch = Crosshair {
                value: crosshair.crosshair_y,
                ..self.range_crosshair.clone()
            };
            ch.draw(g, &data_area, coord, !vertical_domain);
        }
        info.crosshair = Some(crosshair);

        self.base.draw_outline(g, data_area);
    }

    /// Data value under `source` along the domain direction of the last draw.
    pub(crate) fn domain_value_at(&self, info: &PlotRenderingInfo, source: DVec2) -> f64 {
        let coord = match self.orientation {
            PlotOrientation::Vertical => source.x,
            PlotOrientation::Horizontal => source.y,
        };
        self.domain_axis
            .screen_to_value(coord, self.domain_axis.range, &info.data_area, self.domain_edge())
    }

    pub(crate) fn range_value_at(&self, info: &PlotRenderingInfo, source: DVec2) -> f64 {
        let coord = match self.orientation {
            PlotOrientation::Vertical => source.y,
            PlotOrientation::Horizontal => source.x,
        };
        self.range_axis
            .screen_to_value(coord, self.range_axis.range, &info.data_area, self.range_edge())
    }
}

/// Scale `axis` by `factor`, about `anchor` when given, else about its centre.
pub(crate) fn zoom_axis(axis: &mut ValueAxis, factor: f64, anchor: Option<f64>) {
    match anchor {
        Some(a) => axis.resize_range2(factor, a),
        None => {
            let centre = axis.range.central_value();
            axis.resize_range(factor, centre);
        }
    }
}

/// Pan `axis` by `percent` of its length, in screen direction.
pub(crate) fn pan_axis(axis: &mut ValueAxis, percent: f64) {
    let percent = if axis.inverted { -percent } else { percent };
    axis.pan(percent);
}

impl Plot for XyPlot {
    fn plot_type(&self) -> &'static str {
        "XY"
    }

    fn base(&self) -> &PlotBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut PlotBase {
        &mut self.base
    }

    fn draw(&self, g: &mut dyn Graphics, area: Rect, anchor: Option<DVec2>, info: &mut PlotRenderingInfo) {
        self.draw_in(g, area, anchor, info, XyParentAxes::default());
    }

    fn legend_items(&self) -> Vec<LegendItem> {
        let supplier = &self.base.drawing_supplier;
        let offsets = self.series_offsets();
        let mut items = Vec::new();
        for (i, ds) in self.datasets.iter().enumerate() {
            let Some(renderer) = self.renderer_for(i) else {
                continue;
            };
            for (s, (key, _)) in ds.iter().enumerate() {
                items.push(
                    renderer
                        .legend_item(key, offsets[i] + s, supplier)
                        .with_dataset_index(i),
                );
            }
        }
        items
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
        self.range_axis.set_auto_range(true);
    }

    fn after_draw(&mut self, info: &PlotRenderingInfo) {
        if let Some(state) = &info.crosshair {
            self.apply_crosshair_state(state);
        }
    }
}

impl Zoomable for XyPlot {
    fn is_domain_zoomable(&self) -> bool {
        true
    }

    fn is_range_zoomable(&self) -> bool {
        true
    }

    fn orientation(&self) -> PlotOrientation {
        self.orientation
    }

    fn zoom_domain_axes(&mut self, factor: f64, info: &PlotRenderingInfo, source: DVec2, use_anchor: bool) {
        self.domain_axis.configure(self.domain_data_range());
        let anchor = use_anchor.then(|| self.domain_value_at(info, source));
        zoom_axis(&mut self.domain_axis, factor, anchor);
    }

    fn zoom_domain_axes_range(&mut self, lower: f64, upper: f64, _info: &PlotRenderingInfo, _source: DVec2) {
        self.domain_axis.configure(self.domain_data_range());
        self.domain_axis.zoom_range(lower, upper);
    }

    fn zoom_range_axes(&mut self, factor: f64, info: &PlotRenderingInfo, source: DVec2, use_anchor: bool) {
        self.range_axis.configure(self.range_data_range());
        let anchor = use_anchor.then(|| self.range_value_at(info, source));
        zoom_axis(&mut self.range_axis, factor, anchor);
    }

    fn zoom_range_axes_range(&mut self, lower: f64, upper: f64, _info: &PlotRenderingInfo, _source: DVec2) {
        self.range_axis.configure(self.range_data_range());
        self.range_axis.zoom_range(lower, upper);
    }
}

impl Pannable for XyPlot {
    fn is_domain_pannable(&self) -> bool {
        self.domain_pannable
    }

    fn is_range_pannable(&self) -> bool {
        self.range_pannable
    }

    fn pan_domain_axes(&mut self, percent: f64, _info: &PlotRenderingInfo, _source: DVec2) {
        if !self.domain_pannable {
            return;
        }
        self.domain_axis.configure(self.domain_data_range());
        pan_axis(&mut self.domain_axis, percent);
    }

    fn pan_range_axes(&mut self, percent: f64, _info: &PlotRenderingInfo, _source: DVec2) {
        if !self.range_pannable {
            return;
        }
        self.range_axis.configure(self.range_data_range());
        pan_axis(&mut self.range_axis, percent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::RecordingCanvas;

    fn dataset() -> XyDataset {
        XyDataset::new()
            .with_series("up", XySeries::from_points(vec![[0.0, 0.0], [1.0, 2.0], [2.0, 4.0]]))
            .with_series("down", XySeries::from_points(vec![[0.0, 4.0], [1.0, 2.0], [2.0, 0.0]]))
    }

    fn plot(renderer: XyRenderer) -> XyPlot {
        XyPlot::new(dataset(), ValueAxis::new("x"), ValueAxis::new("y"), renderer)
    }

    fn draw(plot: &XyPlot, anchor: Option<DVec2>) -> (RecordingCanvas, PlotRenderingInfo) {
        let mut g = RecordingCanvas::new();
        let mut info = PlotRenderingInfo::new();
        plot.draw(&mut g, Rect::new(0.0, 0.0, 400.0, 300.0), anchor, &mut info);
        (g, info)
    }

    #[test]
    fn one_entity_per_item() {
        let (_, info) = draw(&plot(XyRenderer::line()), None);
        assert_eq!(info.entities.len(), 6);
        let tips: Vec<_> = info.entities.iter().filter_map(|e| e.tooltip.as_deref()).collect();
        assert!(tips.contains(&"up: (1, 2)"));
    }

    #[test]
    fn entity_anchor_is_the_projected_point() {
        let p = plot(XyRenderer::shapes());
        let (_, info) = draw(&p, None);
        let e = info
            .entities
            .iter()
            .find(|e| matches!(e.kind, EntityKind::XyItem { series_index: 0, item: 2, .. }))
            .unwrap();
        let a = e.anchor.unwrap();
        let dx = p
            .domain_axis
            .value_to_screen(2.0, p.visible_domain_range(), &info.data_area, RectangleEdge::Bottom)
            .unwrap();
        let dy = p
            .range_axis
            .value_to_screen(4.0, p.visible_range(), &info.data_area, RectangleEdge::Left)
            .unwrap();
        assert!((a - DVec2::new(dx, dy)).length() < 1e-9);
        assert_eq!(info.entity_at(a), Some(e));
    }

    #[test]
    fn horizontal_orientation_swaps_axes() {
        let p = plot(XyRenderer::shapes()).with_orientation(PlotOrientation::Horizontal);
        assert_eq!(p.domain_edge(), RectangleEdge::Left);
        assert_eq!(p.range_edge(), RectangleEdge::Bottom);
        let (_, info) = draw(&p, None);
        // Larger x values sit higher up the screen.
        let y_of = |item| {
            info.entities
                .iter()
                .find(|e| matches!(e.kind, EntityKind::XyItem { series_index: 0, item: i, .. } if i == item))
                .and_then(|e| e.anchor)
                .unwrap()
                .y
        };
        assert!(y_of(2) < y_of(0));
    }

    #[test]
    fn gaps_break_lines() {
        let ds = XyDataset::new().with_series(
            "s",
            XySeries::from_points(vec![[0.0, 1.0], [1.0, f64::NAN], [2.0, 1.0], [3.0, 2.0]]),
        );
        let p = XyPlot::new(ds, ValueAxis::default(), ValueAxis::default(), XyRenderer::line());
        let (g, info) = draw(&p, None);
        let series_paint = p.base.drawing_supplier.paint(0);
        assert_eq!(g.strokes().filter(|(_, c)| *c == series_paint).count(), 1);
        assert_eq!(info.entities.len(), 3);
    }

    #[test]
    fn area_range_includes_zero() {
        let ds = XyDataset::new().with_series("s", XySeries::from_points(vec![[0.0, 5.0], [1.0, 6.0]]));
        let p = XyPlot::new(ds, ValueAxis::default(), ValueAxis::default(), XyRenderer::area());
        assert_eq!(p.range_data_range().unwrap().lower, 0.0);
    }

    #[test]
    fn step_draws_corners() {
        let (g, _) = draw(&plot(XyRenderer::step()), None);
        let paint = XyPlot::default().base.drawing_supplier.paint(0);
        let step = g.strokes().find(|(_, c)| *c == paint).unwrap().0;
        assert_eq!(step.flatten()[0].len(), 3);
    }

    #[test]
    fn crosshairs_lock_onto_data() {
        let mut p = plot(XyRenderer::shapes());
        p.domain_crosshair = Crosshair::visible();
        p.range_crosshair = Crosshair::visible();
        let (_, info) = draw(&p, None);
        let target = info
            .entities
            .iter()
            .find(|e| matches!(e.kind, EntityKind::XyItem { series_index: 1, item: 0, .. }))
            .and_then(|e| e.anchor)
            .unwrap();
        let (_, info) = draw(&p, Some(target + DVec2::new(2.0, -1.0)));
        p.after_draw(&info);
        assert_eq!((p.domain_crosshair.value, p.range_crosshair.value), (0.0, 4.0));
    }

    #[test]
    fn unlocked_crosshair_follows_anchor() {
        let mut p = plot(XyRenderer::shapes());
        p.domain_crosshair = Crosshair {
            locked_on_data: false,
            ..Crosshair::visible()
        };
        let (_, info) = draw(&p, None);
        let mid = info.data_area.center();
        let (_, info) = draw(&p, Some(mid));
        p.after_draw(&info);
        assert!((p.domain_crosshair.value - p.visible_domain_range().central_value()).abs() < 1e-9);
    }

    #[test]
    fn anchored_zoom_keeps_value_under_cursor() {
        let mut p = plot(XyRenderer::line());
        let (_, info) = draw(&p, None);
        let source = DVec2::new(info.data_area.min_x() + info.data_area.width * 0.25, info.data_area.center_y());
        p.domain_axis.configure(p.domain_data_range());
        let before = p.domain_value_at(&info, source);
        p.zoom_domain_axes(0.5, &info, source, true);
        let (_, info) = draw(&p, None);
        assert!((p.domain_value_at(&info, source) - before).abs() < 1e-9);
        assert!(!p.domain_axis.auto_range);
    }

    #[test]
    fn box_zoom_and_restore() {
        let mut p = plot(XyRenderer::line());
        let (_, info) = draw(&p, None);
        let full = p.visible_range();
        p.zoom_range_axes_range(0.25, 0.75, &info, DVec2::ZERO);
        let zoomed = p.visible_range();
        assert!((zoomed.length() - full.length() / 2.0).abs() < 1e-9);
        p.restore_auto_bounds();
        assert_eq!(p.visible_range(), full);
    }

    #[test]
    fn pan_respects_flags_and_inversion() {
        let mut p = plot(XyRenderer::line());
        let (_, info) = draw(&p, None);
        let start = p.visible_domain_range();
        p.domain_pannable = false;
        p.pan_domain_axes(0.1, &info, DVec2::ZERO);
        assert_eq!(p.visible_domain_range(), start);

        p.domain_pannable = true;
        p.domain_axis.inverted = true;
        p.pan_domain_axes(0.1, &info, DVec2::ZERO);
        assert!(p.visible_domain_range().lower < start.lower);
    }

    #[test]
    fn quadrants_fill_background() {
        let mut p = plot(XyRenderer::line());
        p.quadrant_origin = DVec2::new(1.0, 2.0);
        p.quadrant_paints = [Some(Color::RED), None, None, Some(Color::BLUE)];
        let (g, _) = draw(&p, None);
        assert_eq!(g.fills().filter(|(_, c)| *c == Color::RED || *c == Color::BLUE).count(), 2);
    }

    #[test]
    fn legend_reflects_renderer() {
        let mut p = plot(XyRenderer::lines_and_shapes());
        p.add_dataset(
            XyDataset::new().with_series("extra", XySeries::from_points(vec![[0.0, 1.0]])),
            XyRenderer::area(),
        );
        let items = p.legend_items();
        assert_eq!(items.len(), 3);
        assert!(items[0].line_visible && items[0].shape_visible);
        assert!(!items[2].line_visible);
        assert_eq!(items[2].fill_paint, p.base.drawing_supplier.paint(2));
    }
}
