//! Plots of values against named categories: bar, stacked bar, line and area charts.
use glam::DVec2;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::axis::{AxisLocation, AxisSpace, CategoryAxis, ValueAxis};
use crate::color::Color;
use crate::crosshair::{Crosshair, CrosshairState};
use crate::dataset::{CategoryDataset, Range};
use crate::drawing_supplier::DrawingSupplier;
use crate::entity::{ChartEntity, EntityKind};
use crate::geometry::{Rect, RectangleEdge};
use crate::graphics::{Graphics, TextItem};
use crate::gridlines::Gridlines;
use crate::info::PlotRenderingInfo;
use crate::labels::CategoryItemLabelGenerator;
use crate::legend::LegendItem;
use crate::marker::{Layer, Marker};
use crate::plot::{DatasetRenderingOrder, Plot, PlotBase};
use crate::shape::{MarkerShape, Path};
use crate::style::{Font, Stroke, TextAnchor};
use crate::zoom::{Pannable, PlotOrientation, Zoomable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CategoryRendererKind {
    #[default]
    Bar,
    StackedBar,
    Line,
    Area,
}

/// Draws the items of one category dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryRenderer {
    pub kind: CategoryRendererKind,
    /// Fraction of the axis length shared out as gaps between the bars of one category.
    pub item_margin: f64,
    /// Upper bound for a bar's width, as a fraction of the axis length.
    pub maximum_bar_width: f64,
    /// Paint overrides keyed by row (series) key.
    pub series_paints: IndexMap<String, Color>,
    pub series_strokes: IndexMap<String, Stroke>,
    pub draw_bar_outline: bool,
    pub bar_outline_paint: Color,
    /// Line renderer: draw a shape at every item.
    pub shapes_visible: bool,
    pub shape_size: f64,
    pub item_labels_visible: bool,
    pub item_label_generator: CategoryItemLabelGenerator,
    pub item_label_font: Font,
    pub item_label_paint: Color,
    pub tooltip_generator: Option<CategoryItemLabelGenerator>,
}

impl Default for CategoryRenderer {
    fn default() -> Self {
        Self {
            kind: CategoryRendererKind::Bar,
            item_margin: 0.2,
            maximum_bar_width: 1.0,
            series_paints: IndexMap::new(),
            series_strokes: IndexMap::new(),
            draw_bar_outline: false,
            bar_outline_paint: Color::GRAY,
            shapes_visible: true,
            shape_size: 6.0,
            item_labels_visible: false,
            item_label_generator: CategoryItemLabelGenerator::default(),
            item_label_font: Font::new(10.0),
            item_label_paint: Color::BLACK,
            tooltip_generator: Some(CategoryItemLabelGenerator::tooltips()),
        }
    }
}

/// Where items of one dataset are drawn.
struct ItemContext<'a> {
    data_area: Rect,
    orientation: PlotOrientation,
    domain_axis: &'a CategoryAxis,
    domain_edge: RectangleEdge,
    categories: &'a [String],
    range_axis: &'a ValueAxis,
    range: Range,
    range_edge: RectangleEdge,
    dataset: &'a CategoryDataset,
    dataset_index: usize,
    /// Index of the dataset's first series in the plot-wide series sequence.
    series_offset: usize,
}

impl ItemContext<'_> {
    fn domain_space(&self) -> f64 {
        match self.orientation {
            PlotOrientation::Vertical => self.data_area.width,
            PlotOrientation::Horizontal => self.data_area.height,
        }
    }

    fn to_screen(&self, value: f64) -> f64 {
        self.range_axis
            .value_to_screen_clamped(value, self.range, &self.data_area, self.range_edge)
    }

    fn category(&self, column: usize) -> Option<usize> {
        let key = self.dataset.column_key(column)?;
        self.categories.iter().position(|c| c == key)
    }

    /// A screen point from a domain coordinate and a range coordinate.
    fn point(&self, domain: f64, range: f64) -> DVec2 {
        match self.orientation {
            PlotOrientation::Vertical => DVec2::new(domain, range),
            PlotOrientation::Horizontal => DVec2::new(range, domain),
        }
    }

    /// A screen rectangle from spans along the domain and range directions.
    fn rect(&self, domain_start: f64, domain_len: f64, range_start: f64, range_len: f64) -> Rect {
        match self.orientation {
            PlotOrientation::Vertical => Rect::new(domain_start, range_start, domain_len, range_len),
            PlotOrientation::Horizontal => Rect::new(range_start, domain_start, range_len, domain_len),
        }
    }
}

/// Mutable outputs collected while drawing items.
struct ItemSink<'a> {
    info: &'a mut PlotRenderingInfo,
    crosshair: &'a mut CrosshairState,
    lock_crosshair: bool,
}

impl CategoryRenderer {
    pub fn bar() -> Self {
        Self::default()
    }

    pub fn stacked_bar() -> Self {
        Self {
            kind: CategoryRendererKind::StackedBar,
            ..Self::default()
        }
    }

    pub fn line() -> Self {
        Self {
            kind: CategoryRendererKind::Line,
            ..Self::default()
        }
    }

    pub fn area() -> Self {
        Self {
            kind: CategoryRendererKind::Area,
            ..Self::default()
        }
    }

    pub fn with_series_paint(mut self, key: impl Into<String>, paint: Color) -> Self {
        self.series_paints.insert(key.into(), paint);
        self
    }

    pub fn with_item_labels(mut self, visible: bool) -> Self {
        self.item_labels_visible = visible;
        self
    }

    fn passes(&self) -> usize {
        match self.kind {
            CategoryRendererKind::Line => 2,
            _ => 1,
        }
    }

    /// Value range the axis must show for `dataset`.
    pub fn find_range(&self, dataset: &CategoryDataset) -> Option<Range> {
        match self.kind {
            CategoryRendererKind::Bar => Range::expand_to_include(dataset.range(), 0.0),
            CategoryRendererKind::StackedBar => dataset.stacked_range(),
            CategoryRendererKind::Line | CategoryRendererKind::Area => dataset.range(),
        }
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

    /// Width of every bar in a category, along the domain direction.
    fn bar_width(&self, ctx: &ItemContext<'_>) -> f64 {
        let space = ctx.domain_space();
        let columns = ctx.categories.len();
        let rows = match self.kind {
            CategoryRendererKind::StackedBar => 1,
            _ => ctx.dataset.row_count(),
        };
        let axis = ctx.domain_axis;
        let category_margin = if columns > 1 { axis.category_margin } else { 0.0 };
        let item_margin = if rows > 1 { self.item_margin } else { 0.0 };
        let used = space * (1.0 - axis.lower_margin - axis.upper_margin - category_margin - item_margin);
        let max_width = space * self.maximum_bar_width;
        if rows * columns > 0 {
            (used / (rows * columns) as f64).min(max_width)
        } else {
            used.min(max_width)
        }
    }

    /// Domain coordinate where the bar for `row` in category `cat` starts.
    fn bar_w0(&self, ctx: &ItemContext<'_>, row: usize, cat: usize, bar_width: f64) -> f64 {
        let space = ctx.domain_space();
        let columns = ctx.categories.len();
        let rows = ctx.dataset.row_count();
        let axis = ctx.domain_axis;
        if self.kind == CategoryRendererKind::Bar && rows > 1 {
            let series_gap = space * self.item_margin / (columns * (rows - 1)) as f64;
            let mut factor = 1.0 - self.item_margin - axis.lower_margin - axis.upper_margin;
            if columns > 1 {
                factor -= axis.category_margin;
            }
            let series_w = space * factor / (columns * rows) as f64;
            axis.category_start(cat, columns, &ctx.data_area, ctx.domain_edge)
                + row as f64 * (series_w + series_gap)
                + series_w / 2.0
                - bar_width / 2.0
        } else {
            axis.category_middle(cat, columns, &ctx.data_area, ctx.domain_edge) - bar_width / 2.0
        }
    }

    fn draw_dataset(&self, base: &PlotBase, g: &mut dyn Graphics, ctx: &ItemContext<'_>, sink: &mut ItemSink<'_>) {
        let bar_width = self.bar_width(ctx);
        for pass in 0..self.passes() {
            for column in 0..ctx.dataset.column_count() {
                let Some(cat) = ctx.category(column) else {
                    continue;
                };
                for row in 0..ctx.dataset.row_count() {
                    let Some(value) = ctx.dataset.value(row, column) else {
                        continue;
                    };
                    if !value.is_finite() {
                        trace!(row, column, "skipping non-finite value");
                        continue;
                    }
                    match self.kind {
                        CategoryRendererKind::Bar => {
                            self.draw_bar(base, g, ctx, sink, row, column, cat, value, bar_width)
                        }
                        CategoryRendererKind::StackedBar => {
                            self.draw_stacked_bar(base, g, ctx, sink, row, column, cat, value, bar_width)
                        }
                        CategoryRendererKind::Line => {
                            self.draw_line_item(base, g, ctx, sink, row, column, cat, value, pass)
                        }
                        CategoryRendererKind::Area => {
                            self.draw_area_item(base, g, ctx, sink, row, column, cat, value)
                        }
                    }
                }
            }
        }
    }

    fn paint(&self, base: &PlotBase, ctx: &ItemContext<'_>, row: usize) -> Color {
        let key = ctx.dataset.row_key(row).unwrap_or_default();
        base.fg(self.series_paint(key, ctx.series_offset + row, &base.drawing_supplier))
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_bar(
        &self,
        base: &PlotBase,
        g: &mut dyn Graphics,
        ctx: &ItemContext<'_>,
        sink: &mut ItemSink<'_>,
        row: usize,
        column: usize,
        cat: usize,
        value: f64,
        bar_width: f64,
    ) {
        let (low, high) = (value.min(0.0), value.max(0.0));
        if high < ctx.range.lower || low > ctx.range.upper {
            return;
        }
        let t0 = ctx.to_screen(low.max(ctx.range.lower));
        let t1 = ctx.to_screen(high.min(ctx.range.upper));
        let w0 = self.bar_w0(ctx, row, cat, bar_width);
        let bar = ctx.rect(w0, bar_width, t0.min(t1), (t1 - t0).abs());
        self.fill_bar(base, g, ctx, row, bar);
        let tip = ctx.point(w0 + bar_width / 2.0, ctx.to_screen(value));
        self.finish_item(g, ctx, sink, row, column, value, Path::rectangle(bar), tip);
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_stacked_bar(
        &self,
        base: &PlotBase,
        g: &mut dyn Graphics,
        ctx: &ItemContext<'_>,
        sink: &mut ItemSink<'_>,
        row: usize,
        column: usize,
        cat: usize,
        value: f64,
        bar_width: f64,
    ) {
        let (mut positive_base, mut negative_base) = (0.0, 0.0);
        for r in 0..row {
            match ctx.dataset.value(r, column) {
                Some(v) if v > 0.0 => positive_base += v,
                Some(v) => negative_base += v,
                None => {}
            }
        }
        let start = if value > 0.0 { positive_base } else { negative_base };
        let t_base = ctx.to_screen(start);
        let t_value = ctx.to_screen(start + value);
        let w0 = ctx
            .domain_axis
            .category_middle(cat, ctx.categories.len(), &ctx.data_area, ctx.domain_edge)
            - bar_width / 2.0;
        let bar = ctx.rect(w0, bar_width, t_base.min(t_value), (t_value - t_base).abs());
        self.fill_bar(base, g, ctx, row, bar);
        let tip = ctx.point(w0 + bar_width / 2.0, t_value);
        self.finish_item(g, ctx, sink, row, column, value, Path::rectangle(bar), tip);
    }

    fn fill_bar(&self, base: &PlotBase, g: &mut dyn Graphics, ctx: &ItemContext<'_>, row: usize, bar: Rect) {
        g.fill_rect(bar, self.paint(base, ctx, row));
        if self.draw_bar_outline {
            g.stroke_rect(bar, self.bar_outline_paint, &Stroke::solid(0.5));
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_line_item(
        &self,
        base: &PlotBase,
        g: &mut dyn Graphics,
        ctx: &ItemContext<'_>,
        sink: &mut ItemSink<'_>,
        row: usize,
        column: usize,
        cat: usize,
        value: f64,
        pass: usize,
    ) {
        let count = ctx.categories.len();
        let x1 = ctx
            .domain_axis
            .category_middle(cat, count, &ctx.data_area, ctx.domain_edge);
        let y1 = ctx.to_screen(value);
        let p1 = ctx.point(x1, y1);
        let key = ctx.dataset.row_key(row).unwrap_or_default();
        let index = ctx.series_offset + row;
        let paint = self.paint(base, ctx, row);
        if pass == 0 {
            if column > 0
                && let Some(previous) = ctx.dataset.value(row, column - 1)
                && let Some(prev_cat) = ctx.category(column - 1)
            {
                let x0 = ctx
                    .domain_axis
                    .category_middle(prev_cat, count, &ctx.data_area, ctx.domain_edge);
                let p0 = ctx.point(x0, ctx.to_screen(previous));
                g.draw_line(p0, p1, paint, &self.series_stroke(key, index, &base.drawing_supplier));
            }
            return;
        }
        let shape = base.drawing_supplier.shape(index).to_path(p1, self.shape_size);
        if self.shapes_visible {
            g.fill_path(&shape, paint);
        }
        self.finish_item(g, ctx, sink, row, column, value, shape, p1);
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_area_item(
        &self,
        base: &PlotBase,
        g: &mut dyn Graphics,
        ctx: &ItemContext<'_>,
        sink: &mut ItemSink<'_>,
        row: usize,
        column: usize,
        cat: usize,
        value: f64,
    ) {
        let count = ctx.categories.len();
        let axis = ctx.domain_axis;
        let x0 = axis.category_start(cat, count, &ctx.data_area, ctx.domain_edge);
        let x1 = axis.category_middle(cat, count, &ctx.data_area, ctx.domain_edge);
        let x2 = axis.category_end(cat, count, &ctx.data_area, ctx.domain_edge);
        // Tapered ends: halfway to the neighbour, or down to zero at the edges.
        let y0 = match column.checked_sub(1).and_then(|c| ctx.dataset.value(row, c)) {
            Some(prev) => (prev + value) / 2.0,
            None => 0.0,
        };
        let y2 = match ctx.dataset.value(row, column + 1) {
            Some(next) => (next + value) / 2.0,
            None => 0.0,
        };
        let zero = ctx.to_screen(0.0);
        let points = [
            ctx.point(x0, zero),
            ctx.point(x0, ctx.to_screen(y0)),
            ctx.point(x1, ctx.to_screen(value)),
            ctx.point(x2, ctx.to_screen(y2)),
            ctx.point(x2, zero),
        ];
        let area = Path::polygon(&points);
        g.fill_path(&area, self.paint(base, ctx, row));
        self.finish_item(g, ctx, sink, row, column, value, area, points[2]);
    }

    /// Item label, crosshair candidate and entity for a drawn item.
    #[allow(clippy::too_many_arguments)]
    fn finish_item(
        &self,
        g: &mut dyn Graphics,
        ctx: &ItemContext<'_>,
        sink: &mut ItemSink<'_>,
        row: usize,
        column: usize,
        value: f64,
        shape: Path,
        anchor: DVec2,
    ) {
        if self.item_labels_visible
            && let Some(text) = self.item_label_generator.generate(ctx.dataset, row, column)
        {
            let (pos, text_anchor) = match ctx.orientation {
                PlotOrientation::Vertical => (anchor - DVec2::new(0.0, 2.0), TextAnchor::BottomCenter),
                PlotOrientation::Horizontal => (anchor + DVec2::new(2.0, 0.0), TextAnchor::CenterLeft),
            };
            g.draw_text(
                &TextItem::new(text, pos, &self.item_label_font, self.item_label_paint).with_anchor(text_anchor),
            );
        }

        if sink.lock_crosshair {
            let (trans_x, trans_y) = match ctx.orientation {
                PlotOrientation::Vertical => (anchor.x, anchor.y),
                PlotOrientation::Horizontal => (anchor.y, anchor.x),
            };
            sink.crosshair
                .update_point(column as f64, value, ctx.dataset_index, trans_x, trans_y, ctx.orientation);
        }

        let (Some(row_key), Some(column_key)) = (ctx.dataset.row_key(row), ctx.dataset.column_key(column)) else {
            return;
        };
        let tooltip = self
            .tooltip_generator
            .as_ref()
            .and_then(|t| t.generate(ctx.dataset, row, column));
        sink.info.entities.add(
            ChartEntity::new(
                shape,
                EntityKind::CategoryItem {
                    dataset_index: ctx.dataset_index,
                    row_key: row_key.to_owned(),
                    column_key: column_key.to_owned(),
                    value,
                },
            )
            .with_tooltip(tooltip)
            .with_anchor(anchor),
        );
    }
}

/// Axes supplied by a combined parent plot.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct CategoryParentAxes<'a> {
    /// Shared domain axis and the categories it lays out.
    pub domain: Option<(&'a CategoryAxis, &'a [String])>,
    /// Shared range axis and its range.
    pub range: Option<(&'a ValueAxis, Range)>,
    pub fixed_domain_space: Option<AxisSpace>,
    pub fixed_range_space: Option<AxisSpace>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryPlot {
    pub base: PlotBase,
    /// Overlaid datasets; index 0 is the primary dataset.
    pub datasets: Vec<CategoryDataset>,
    /// Renderer per dataset. Datasets without one use renderer 0.
    pub renderers: Vec<CategoryRenderer>,
    pub domain_axis: CategoryAxis,
    pub range_axis: ValueAxis,
    pub orientation: PlotOrientation,
    pub domain_axis_location: AxisLocation,
    pub range_axis_location: AxisLocation,
    pub domain_gridlines: Gridlines,
    pub range_gridlines: Gridlines,
    pub domain_markers: Vec<Marker>,
    pub range_markers: Vec<Marker>,
    pub range_crosshair: Crosshair,
    pub rendering_order: DatasetRenderingOrder,
    /// Share of the space given to this plot inside a combined plot.
    pub weight: u32,
    pub fixed_domain_axis_space: Option<AxisSpace>,
    pub fixed_range_axis_space: Option<AxisSpace>,
    pub range_pannable: bool,
}

impl Default for CategoryPlot {
    fn default() -> Self {
        Self {
            base: PlotBase::default(),
            datasets: Vec::new(),
            renderers: vec![CategoryRenderer::default()],
            domain_axis: CategoryAxis::default(),
            range_axis: ValueAxis::default(),
            orientation: PlotOrientation::Vertical,
            domain_axis_location: AxisLocation::BottomOrLeft,
            range_axis_location: AxisLocation::BottomOrLeft,
            domain_gridlines: Gridlines::hidden(),
            range_gridlines: Gridlines::default(),
            domain_markers: Vec::new(),
            range_markers: Vec::new(),
            range_crosshair: Crosshair::default(),
            rendering_order: DatasetRenderingOrder::Reverse,
            weight: 1,
            fixed_domain_axis_space: None,
            fixed_range_axis_space: None,
            range_pannable: true,
        }
    }
}

impl CategoryPlot {
    pub fn new(dataset: CategoryDataset, domain_axis: CategoryAxis, range_axis: ValueAxis, renderer: CategoryRenderer) -> Self {
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

    /// Overlay another dataset; returns its index.
    pub fn add_dataset(&mut self, dataset: CategoryDataset, renderer: CategoryRenderer) -> usize {
        self.datasets.push(dataset);
        let index = self.datasets.len() - 1;
        if self.renderers.len() <= index {
            self.renderers.resize(index, CategoryRenderer::default());
            self.renderers.push(renderer);
        } else {
            self.renderers[index] = renderer;
        }
        index
    }

    pub fn add_range_marker(&mut self, marker: Marker) {
        self.range_markers.push(marker);
    }

    pub fn add_domain_marker(&mut self, marker: Marker) {
        self.domain_markers.push(marker);
    }

    pub fn renderer_for(&self, dataset: usize) -> Option<&CategoryRenderer> {
        self.renderers.get(dataset).or_else(|| self.renderers.first())
    }

    /// Ordered union of every dataset's column keys.
    pub fn categories(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for ds in &self.datasets {
            for key in ds.column_keys() {
                if !out.iter().any(|k| k == key) {
                    out.push(key.to_owned());
                }
            }
        }
        out
    }

    /// Union of the value ranges every renderer needs.
    pub fn data_range(&self) -> Option<Range> {
        self.datasets.iter().enumerate().fold(None, |acc, (i, ds)| {
            let r = self.renderer_for(i).and_then(|r| r.find_range(ds));
            Range::combine(acc, r)
        })
    }

    pub fn domain_edge(&self) -> RectangleEdge {
        self.domain_axis_location.domain_edge(self.orientation)
    }

    pub fn range_edge(&self) -> RectangleEdge {
        self.range_axis_location.range_edge(self.orientation)
    }

    /// The range the range axis currently shows.
    pub fn visible_range(&self) -> Range {
        self.range_axis.effective_range(self.data_range())
    }

    fn reserve_range_space(
        &self,
        g: &dyn Graphics,
        plot_area: &Rect,
        axis: Option<(&ValueAxis, Range)>,
        fixed: Option<AxisSpace>,
        space: &mut AxisSpace,
    ) {
        if let Some(fixed) = fixed {
            match self.orientation {
                PlotOrientation::Horizontal => {
                    space.ensure_at_least_edge(fixed.top, RectangleEdge::Top);
                    space.ensure_at_least_edge(fixed.bottom, RectangleEdge::Bottom);
                }
                PlotOrientation::Vertical => {
                    space.ensure_at_least_edge(fixed.left, RectangleEdge::Left);
                    space.ensure_at_least_edge(fixed.right, RectangleEdge::Right);
                }
            }
        } else if let Some((axis, range)) = axis {
            axis.reserve_space(g, range, plot_area, self.range_edge(), space);
        }
    }

    fn reserve_domain_space(
        &self,
        g: &dyn Graphics,
        plot_area: &Rect,
        axis: Option<(&CategoryAxis, &[String])>,
        fixed: Option<AxisSpace>,
        space: &mut AxisSpace,
    ) {
        if let Some(fixed) = fixed {
            match self.orientation {
                PlotOrientation::Horizontal => {
                    space.ensure_at_least_edge(fixed.left, RectangleEdge::Left);
                    space.ensure_at_least_edge(fixed.right, RectangleEdge::Right);
                }
                PlotOrientation::Vertical => {
                    space.ensure_at_least_edge(fixed.top, RectangleEdge::Top);
                    space.ensure_at_least_edge(fixed.bottom, RectangleEdge::Bottom);
                }
            }
        } else if let Some((axis, categories)) = axis {
            axis.reserve_space(g, categories, plot_area, self.domain_edge(), space);
        }
    }

    /// Space this plot's own range axis needs inside `plot_area`.
    pub(crate) fn measure_range_axis_space(&self, g: &dyn Graphics, plot_area: &Rect) -> AxisSpace {
        let mut space = AxisSpace::default();
        let axis = Some((&self.range_axis, self.visible_range()));
        self.reserve_range_space(g, plot_area, axis, None, &mut space);
        space
    }

    /// Space this plot's own domain axis needs inside `plot_area`.
    pub(crate) fn measure_domain_axis_space(&self, g: &dyn Graphics, plot_area: &Rect) -> AxisSpace {
        let mut space = AxisSpace::default();
        let categories = self.categories();
        self.reserve_domain_space(g, plot_area, Some((&self.domain_axis, &categories)), None, &mut space);
        space
    }

    pub(crate) fn draw_in(
        &self,
        g: &mut dyn Graphics,
        area: Rect,
        anchor: Option<DVec2>,
        info: &mut PlotRenderingInfo,
        parent: CategoryParentAxes<'_>,
    ) {
        let area = self.base.insets.trim(area);
        info.plot_area = area;

        let own_categories;
        let (domain_axis, categories) = match parent.domain {
            Some(shared) => shared,
            None => {
                own_categories = self.categories();
                (&self.domain_axis, own_categories.as_slice())
            }
        };
        let (range_axis, range) = parent
            .range
            .unwrap_or((&self.range_axis, self.visible_range()));
        let domain_edge = self.domain_edge();
        let range_edge = self.range_edge();

        let mut space = AxisSpace::default();
        let own_range = parent.range.is_none().then_some((range_axis, range));
        let own_domain = parent.domain.is_none().then_some((domain_axis, categories));
        self.reserve_range_space(
            &*g,
            &area,
            own_range,
            parent.fixed_range_space.or(self.fixed_range_axis_space),
            &mut space,
        );
        self.reserve_domain_space(
            &*g,
            &area,
            own_domain,
            parent.fixed_domain_space.or(self.fixed_domain_axis_space),
            &mut space,
        );
        let data_area = space.shrink(area);
        info.data_area = data_area;

        self.base.fill_background(g, data_area);
        if own_domain.is_some() {
            domain_axis.draw(g, categories, domain_edge.coordinate(&data_area), &data_area, domain_edge);
        }
        let ticks = if own_range.is_some() {
            range_axis
                .draw(g, range, range_edge.coordinate(&data_area), &data_area, range_edge)
                .ticks
        } else {
            range_axis.refresh_ticks(&*g, range, &data_area, range_edge)
        };

        let anchor = anchor.filter(|a| data_area.contains(*a));
        let anchor_y = anchor.map_or(f64::NAN, |a| {
            let coord = match self.orientation {
                PlotOrientation::Vertical => a.y,
                PlotOrientation::Horizontal => a.x,
            };
            range_axis.screen_to_value(coord, range, &data_area, range_edge)
        });
        let mut crosshair = CrosshairState::new(anchor, f64::NAN, anchor_y);
        crosshair.crosshair_y = self.range_crosshair.value;

        g.push_clip(data_area);
        let middles: Vec<f64> = (0..categories.len())
            .map(|i| domain_axis.category_middle(i, categories.len(), &data_area, domain_edge))
            .collect();
        self.domain_gridlines.draw_at(g, &data_area, domain_edge, middles);
        self.range_gridlines
            .draw_value(g, range_axis, range, &ticks, &data_area, range_edge);

        self.draw_markers(g, Layer::Background, domain_axis, categories, range_axis, range, &data_area);

        let mut found_data = false;
        let offsets: Vec<usize> = self
            .datasets
            .iter()
            .scan(0, |acc, ds| {
                let start = *acc;
                *acc += ds.row_count();
                Some(start)
            })
            .collect();
        for i in self.rendering_order.indices(self.datasets.len()) {
            let dataset = &self.datasets[i];
            let Some(renderer) = self.renderer_for(i) else {
                warn!(dataset = i, "no renderer for dataset");
                continue;
            };
            if dataset.is_empty() {
                continue;
            }
            found_data = true;
            let ctx = ItemContext {
                data_area,
                orientation: self.orientation,
                domain_axis,
                domain_edge,
                categories,
                range_axis,
                range,
                range_edge,
                dataset,
                dataset_index: i,
                series_offset: offsets[i],
            };
            let mut sink = ItemSink {
                info: &mut *info,
                crosshair: &mut crosshair,
                lock_crosshair: self.range_crosshair.locked_on_data,
            };
            renderer.draw_dataset(&self.base, g, &ctx, &mut sink);
        }

        self.draw_markers(g, Layer::Foreground, domain_axis, categories, range_axis, range, &data_area);
        g.pop_clip();

        if !found_data {
            self.base.draw_no_data_message(g, data_area);
        }

        if !self.range_crosshair.locked_on_data && anchor.is_some() {
            crosshair.crosshair_y = anchor_y;
        }
        if self.range_crosshair.visible
            && let Some(coord) = range_axis.value_to_screen(crosshair.crosshair_y, range, &data_area, range_edge)
        {
            let value_crosshair = Crosshair {
                value: crosshair.crosshair_y,
                ..self.range_crosshair.clone()
            };
            value_crosshair.draw(g, &data_area, coord, self.orientation == PlotOrientation::Horizontal);
        }
        info.crosshair = Some(crosshair);

        self.base.draw_outline(g, data_area);
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_markers(
        &self,
        g: &mut dyn Graphics,
        layer: Layer,
        domain_axis: &CategoryAxis,
        categories: &[String],
        range_axis: &ValueAxis,
        range: Range,
        data_area: &Rect,
    ) {
        for m in self.domain_markers.iter().filter(|m| m.layer == layer) {
            m.draw_category_marker(g, domain_axis, categories, data_area, self.domain_edge());
        }
        for m in self.range_markers.iter().filter(|m| m.layer == layer) {
            m.draw_value_marker(g, range_axis, range, data_area, self.range_edge());
        }
    }

    fn range_anchor(&mut self, info: &PlotRenderingInfo, source: DVec2) -> f64 {
        let coord = match self.orientation {
            PlotOrientation::Vertical => source.y,
            PlotOrientation::Horizontal => source.x,
        };
        let edge = self.range_edge();
        self.range_axis
            .screen_to_value(coord, self.range_axis.range, &info.data_area, edge)
    }
}

impl Plot for CategoryPlot {
    fn plot_type(&self) -> &'static str {
        "Category"
    }

    fn base(&self) -> &PlotBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut PlotBase {
        &mut self.base
    }

    fn draw(&self, g: &mut dyn Graphics, area: Rect, anchor: Option<DVec2>, info: &mut PlotRenderingInfo) {
        self.draw_in(g, area, anchor, info, CategoryParentAxes::default());
    }

    fn legend_items(&self) -> Vec<LegendItem> {
        let supplier = &self.base.drawing_supplier;
        let mut items = Vec::new();
        let mut offset = 0;
        for (i, ds) in self.datasets.iter().enumerate() {
            let Some(renderer) = self.renderer_for(i) else {
                continue;
            };
            for (row, key) in ds.row_keys().enumerate() {
                let index = offset + row;
                let mut item = LegendItem::new(key, renderer.series_paint(key, index, supplier))
                    .with_dataset_index(i);
                if renderer.kind == CategoryRendererKind::Line {
                    item = item
                        .with_shape(supplier.shape(index))
                        .with_line(renderer.series_stroke(key, index, supplier));
                    item.shape_visible = renderer.shapes_visible;
                } else {
                    item = item.with_shape(MarkerShape::Square);
                }
                items.push(item);
            }
            offset += ds.row_count();
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
        self.range_axis.set_auto_range(true);
    }

    fn after_draw(&mut self, info: &PlotRenderingInfo) {
        if let Some(state) = &info.crosshair {
            self.range_crosshair.value = state.crosshair_y;
        }
    }
}

impl Zoomable for CategoryPlot {
    fn is_domain_zoomable(&self) -> bool {
        false
    }

    fn is_range_zoomable(&self) -> bool {
        true
    }

    fn orientation(&self) -> PlotOrientation {
        self.orientation
    }

    fn zoom_domain_axes(&mut self, _factor: f64, _info: &PlotRenderingInfo, _source: DVec2, _use_anchor: bool) {}

    fn zoom_domain_axes_range(&mut self, _lower: f64, _upper: f64, _info: &PlotRenderingInfo, _source: DVec2) {}

    fn zoom_range_axes(&mut self, factor: f64, info: &PlotRenderingInfo, source: DVec2, use_anchor: bool) {
        self.range_axis.configure(self.data_range());
        if use_anchor {
            let anchor = self.range_anchor(info, source);
            self.range_axis.resize_range2(factor, anchor);
        } else {
            let centre = self.range_axis.range.central_value();
            self.range_axis.resize_range(factor, centre);
        }
    }

    fn zoom_range_axes_range(&mut self, lower: f64, upper: f64, _info: &PlotRenderingInfo, _source: DVec2) {
        self.range_axis.configure(self.data_range());
        self.range_axis.zoom_range(lower, upper);
    }
}

impl Pannable for CategoryPlot {
    fn is_domain_pannable(&self) -> bool {
        false
    }

    fn is_range_pannable(&self) -> bool {
        self.range_pannable
    }

    fn pan_domain_axes(&mut self, _percent: f64, _info: &PlotRenderingInfo, _source: DVec2) {}

    fn pan_range_axes(&mut self, percent: f64, _info: &PlotRenderingInfo, _source: DVec2) {
        if !self.range_pannable {
            return;
        }
        self.range_axis.configure(self.data_range());
        let percent = if self.range_axis.inverted { -percent } else { percent };
        self.range_axis.pan(percent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::RecordingCanvas;

    fn sales() -> CategoryDataset {
        CategoryDataset::new()
            .with_value(4.0, "2024", "Q1")
            .with_value(6.0, "2024", "Q2")
            .with_value(2.0, "2025", "Q1")
            .with_value(8.0, "2025", "Q2")
    }

    fn draw(plot: &CategoryPlot) -> (RecordingCanvas, PlotRenderingInfo) {
        let mut g = RecordingCanvas::new();
        let mut info = PlotRenderingInfo::new();
        plot.draw(&mut g, Rect::new(0.0, 0.0, 500.0, 400.0), None, &mut info);
        (g, info)
    }

    fn bars(info: &PlotRenderingInfo) -> Vec<Rect> {
        info.entities.iter().map(|e| e.area.bounds()).collect()
    }

    #[test]
    fn bar_width_follows_margins() {
        let plot = CategoryPlot::new(sales(), CategoryAxis::default(), ValueAxis::default(), CategoryRenderer::bar());
        let (_, info) = draw(&plot);
        let w = info.data_area.width;
        // used = w * (1 - 0.05 - 0.05 - 0.2 - 0.2) over 2 rows x 2 columns
        let expected = w * 0.5 / 4.0;
        for b in bars(&info) {
            assert!((b.width - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn maximum_bar_width_caps_bars() {
        let mut renderer = CategoryRenderer::bar();
        renderer.maximum_bar_width = 0.05;
        let plot = CategoryPlot::new(sales(), CategoryAxis::default(), ValueAxis::default(), renderer);
        let (_, info) = draw(&plot);
        let cap = info.data_area.width * 0.05;
        assert!(bars(&info).iter().all(|b| (b.width - cap).abs() < 1e-6));
    }

    #[test]
    fn bars_grow_from_zero() {
        let plot = CategoryPlot::new(sales(), CategoryAxis::default(), ValueAxis::default(), CategoryRenderer::bar());
        let (_, info) = draw(&plot);
        let range = plot.visible_range();
        assert!(range.lower <= 0.0);
        let zero = plot
            .range_axis
            .value_to_screen(0.0, range, &info.data_area, RectangleEdge::Left)
            .unwrap();
        for b in bars(&info) {
            assert!((b.max_y() - zero).abs() < 1e-6);
        }
    }

    #[test]
    fn stacked_bars_share_a_column() {
        let plot = CategoryPlot::new(sales(), CategoryAxis::default(), ValueAxis::default(), CategoryRenderer::stacked_bar());
        let (_, info) = draw(&plot);
        let b = bars(&info);
        // Entities are emitted column by column: Q1/2024, Q1/2025, ...
        assert!((b[0].x - b[1].x).abs() < 1e-9);
        assert!((b[1].max_y() - b[0].min_y()).abs() < 1e-6);
        assert!(plot.visible_range().upper >= 14.0);
    }

    #[test]
    fn entity_reports_row_and_column() {
        let plot = CategoryPlot::new(sales(), CategoryAxis::default(), ValueAxis::default(), CategoryRenderer::bar());
        let (_, info) = draw(&plot);
        let e = info.entities.get(3).unwrap();
        match &e.kind {
            EntityKind::CategoryItem { row_key, column_key, value, .. } => {
                assert_eq!((row_key.as_str(), column_key.as_str(), *value), ("2025", "Q2", 8.0));
            }
            other => panic!("unexpected entity {other:?}"),
        }
        assert_eq!(e.tooltip.as_deref(), Some("(2025, Q2) = 8"));
        let centre = e.area.bounds().center();
        assert_eq!(info.entity_at(centre), Some(e));
    }

    #[test]
    fn horizontal_bars_run_along_x() {
        let plot = CategoryPlot::new(sales(), CategoryAxis::default(), ValueAxis::default(), CategoryRenderer::bar())
            .with_orientation(PlotOrientation::Horizontal);
        let (_, info) = draw(&plot);
        let b = bars(&info);
        assert!(b[3].width > b[2].width);
        assert!((b[3].min_x() - b[2].min_x()).abs() < 1e-6);
    }

    #[test]
    fn line_renderer_draws_segments_and_shapes() {
        let plot = CategoryPlot::new(sales(), CategoryAxis::default(), ValueAxis::default(), CategoryRenderer::line());
        let (g, info) = draw(&plot);
        assert_eq!(info.entities.len(), 4);
        assert!(info.entities.iter().all(|e| e.anchor.is_some()));
        let legend = plot.legend_items();
        assert_eq!(legend.len(), 2);
        assert!(legend[0].line_visible);
        assert!(g.fills().count() >= 4);
    }

    #[test]
    fn area_renderer_tapers_to_zero() {
        let ds = CategoryDataset::new().with_value(10.0, "s", "a");
        let plot = CategoryPlot::new(ds, CategoryAxis::default(), ValueAxis::default().with_includes_zero(true), CategoryRenderer::area());
        let (_, info) = draw(&plot);
        let b = info.entities.get(0).unwrap().area.bounds();
        let zero = plot
            .range_axis
            .value_to_screen(0.0, plot.visible_range(), &info.data_area, RectangleEdge::Left)
            .unwrap();
        assert!((b.max_y() - zero).abs() < 1e-6);
    }

    #[test]
    fn empty_plot_shows_message() {
        let mut plot = CategoryPlot::default();
        plot.base.no_data_message = Some("empty".to_owned());
        let (g, info) = draw(&plot);
        assert!(info.entities.is_empty());
        assert!(g.texts().any(|t| t.content == "empty"));
    }

    #[test]
    fn crosshair_locks_onto_nearest_item() {
        let mut plot = CategoryPlot::new(sales(), CategoryAxis::default(), ValueAxis::default(), CategoryRenderer::line());
        plot.range_crosshair = Crosshair::visible();
        let mut g = RecordingCanvas::new();
        let mut info = PlotRenderingInfo::new();
        let area = Rect::new(0.0, 0.0, 500.0, 400.0);
        plot.draw(&mut g, area, None, &mut info);
        let target = info.entities.get(3).unwrap().anchor.unwrap();

        let mut info = PlotRenderingInfo::new();
        plot.draw(&mut g, area, Some(target + DVec2::new(3.0, 3.0)), &mut info);
        plot.after_draw(&info);
        assert_eq!(plot.range_crosshair.value, 8.0);
    }

    #[test]
    fn range_zoom_and_pan() {
        let mut plot = CategoryPlot::new(sales(), CategoryAxis::default(), ValueAxis::default(), CategoryRenderer::bar());
        let (_, info) = draw(&plot);
        let before = plot.visible_range();
        plot.zoom_range_axes(0.5, &info, info.data_area.center(), false);
        let after = plot.visible_range();
        assert!((after.length() - before.length() / 2.0).abs() < 1e-9);
        plot.pan_range_axes(0.1, &info, DVec2::ZERO);
        assert!((plot.visible_range().lower - (after.lower + after.length() * 0.1)).abs() < 1e-9);
        plot.restore_auto_bounds();
        assert_eq!(plot.visible_range(), before);
    }

    #[test]
    fn overlaid_datasets_offset_series_paints() {
        let mut plot = CategoryPlot::new(sales(), CategoryAxis::default(), ValueAxis::default(), CategoryRenderer::bar());
        plot.add_dataset(CategoryDataset::new().with_value(1.0, "target", "Q1"), CategoryRenderer::line());
        let legend = plot.legend_items();
        assert_eq!(legend.len(), 3);
        assert_eq!(legend[2].fill_paint, plot.base.drawing_supplier.paint(2));
        assert_eq!(legend[2].dataset_index, 1);
    }
}
