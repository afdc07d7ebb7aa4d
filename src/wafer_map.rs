//! Semiconductor wafer maps: a grid of chips inside a notched circle.
use glam::DVec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::Color;
use crate::dataset::WaferMapDataset;
use crate::drawing_supplier::{DefaultDrawingSupplier, DrawingSupplier};
use crate::entity::{ChartEntity, EntityKind};
use crate::geometry::Rect;
use crate::graphics::Graphics;
use crate::info::PlotRenderingInfo;
use crate::labels::format_number;
use crate::legend::LegendItem;
use crate::plot::{Plot, PlotBase};
use crate::shape::Path;
use crate::style::Stroke;

/// Notch diameter as a fraction of the wafer diameter.
const NOTCH_FRACTION: f64 = 0.04;

/// How values are grouped once there are more distinct values than paints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaintIndexBasis {
    /// Equal value steps between the minimum and maximum.
    #[default]
    Value,
    /// Equal numbers of distinct values per paint.
    Position,
}

/// Where the orientation notch is cut into the wafer edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NotchOrientation {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaferMapRenderer {
    pub paint_limit: usize,
    pub basis: PaintIndexBasis,
    pub chip_outline_paint: Color,
    pub empty_chip_paint: Color,
}

impl Default for WaferMapRenderer {
    fn default() -> Self {
        Self {
            paint_limit: 35,
            basis: PaintIndexBasis::Value,
            chip_outline_paint: Color::LIGHT_GRAY,
            empty_chip_paint: Color::WHITE,
        }
    }
}

/// Sorted `(value, paint index)` pairs for every distinct chip value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PaintIndex {
    entries: Vec<(f64, usize)>,
    /// Whether each value got its own paint.
    pub one_per_value: bool,
}

impl PaintIndex {
    pub fn get(&self, value: f64) -> Option<usize> {
        self.entries
            .binary_search_by(|(v, _)| v.total_cmp(&value))
            .ok()
            .map(|i| self.entries[i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct paints in use.
    pub fn paint_count(&self) -> usize {
        self.entries.last().map_or(0, |(_, i)| i + 1)
    }

    /// The smallest and largest value mapped to `paint`.
    pub fn band(&self, paint: usize) -> Option<(f64, f64)> {
        let mut values = self.entries.iter().filter(|(_, i)| *i == paint).map(|(v, _)| *v);
        let first = values.next()?;
        Some((first, values.last().unwrap_or(first)))
    }
}

impl WaferMapRenderer {
    pub fn new(paint_limit: usize, basis: PaintIndexBasis) -> Self {
        Self {
            paint_limit: paint_limit.max(1),
            basis,
            ..Self::default()
        }
    }

    pub fn paint_index(&self, dataset: &WaferMapDataset) -> PaintIndex {
        let unique = dataset.unique_values();
        let limit = self.paint_limit.max(1);
        if unique.len() <= limit {
            return PaintIndex {
                entries: unique.into_iter().enumerate().map(|(i, v)| (v, i)).collect(),
                one_per_value: true,
            };
        }
        let entries = match self.basis {
            PaintIndexBasis::Position => {
                let per_paint = unique.len().div_ceil(limit);
                unique
                    .into_iter()
                    .enumerate()
                    .map(|(i, v)| (v, i / per_paint))
                    .collect()
            }
            PaintIndexBasis::Value => {
                let (min, max) = (unique[0], unique[unique.len() - 1]);
                let step = (max - min) / limit as f64;
                let mut cut = min + step;
                let mut paint = 0;
                unique
                    .into_iter()
                    .map(|v| {
                        while v > cut && paint + 1 < limit {
                            cut += step;
                            paint += 1;
                        }
                        (v, paint)
                    })
                    .collect()
            }
        };
        PaintIndex {
            entries,
            one_per_value: false,
        }
    }

    pub fn chip_paint(&self, index: &PaintIndex, value: f64, supplier: &DefaultDrawingSupplier) -> Color {
        index
            .get(value)
            .map_or(self.empty_chip_paint, |i| supplier.paint(i))
    }

    pub fn legend_items(&self, dataset: &WaferMapDataset, supplier: &DefaultDrawingSupplier) -> Vec<LegendItem> {
        let index = self.paint_index(dataset);
        (0..index.paint_count())
            .filter_map(|paint| {
                let (lo, hi) = index.band(paint)?;
                let label = if index.one_per_value || lo == hi {
                    format_number(lo)
                } else {
                    format!("{} - {}", format_number(lo), format_number(hi))
                };
                Some(LegendItem::new(label, supplier.paint(paint)).with_dataset_index(0))
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WaferMapPlot {
    pub base: PlotBase,
    pub dataset: WaferMapDataset,
    pub renderer: WaferMapRenderer,
    pub notch: NotchOrientation,
}

impl WaferMapPlot {
    pub fn new(dataset: WaferMapDataset) -> Self {
        Self {
            dataset,
            ..Self::default()
        }
    }

    pub fn with_renderer(mut self, renderer: WaferMapRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_notch(mut self, notch: NotchOrientation) -> Self {
        self.notch = notch;
        self
    }

    /// The largest square centred in `area`.
    pub fn wafer_area(area: Rect) -> Rect {
        let side = area.width.min(area.height);
        Rect::new(
            area.x + (area.width - side) / 2.0,
            area.y + (area.height - side) / 2.0,
            side,
            side,
        )
    }

    pub fn notch_frame(&self, wafer: Rect) -> Rect {
        let d = wafer.width * NOTCH_FRACTION;
        let c = match self.notch {
            NotchOrientation::Up => DVec2::new(wafer.center_x(), wafer.min_y()),
            NotchOrientation::Down => DVec2::new(wafer.center_x(), wafer.max_y()),
            NotchOrientation::Left => DVec2::new(wafer.min_x(), wafer.center_y()),
            NotchOrientation::Right => DVec2::new(wafer.max_x(), wafer.center_y()),
        };
        Rect::new(c.x - d / 2.0, c.y - d / 2.0, d, d)
    }

    /// Screen rectangle of chip `(x, y)`; row 0 is at the top.
    pub fn chip_rect(&self, wafer: Rect, x: u32, y: u32) -> Rect {
        let space = self.dataset.chip_space;
        let nx = f64::from(self.dataset.max_chip_x().max(1));
        let ny = f64::from(self.dataset.max_chip_y().max(1));
        let w = (wafer.width - (space * nx - 1.0)) / nx;
        let h = (wafer.height - (space * ny - 1.0)) / ny;
        let (x, y) = (f64::from(x), f64::from(y));
        Rect::new(wafer.x + w * x + space * x, wafer.y + h * y + space * y, w, h)
    }

    fn draw_edge(&self, g: &mut dyn Graphics, wafer: Rect) {
        let edge = Path::ellipse(wafer);
        g.fill_path(&edge, Color::WHITE);
        g.stroke_path(&edge, Color::BLACK, &Stroke::solid(1.0));
        let notch = Path::ellipse(self.notch_frame(wafer));
        g.fill_path(&notch, self.base.background_paint.unwrap_or(Color::WHITE));
        g.stroke_path(&notch, Color::BLACK, &Stroke::solid(1.0));
    }

    fn draw_chips(&self, g: &mut dyn Graphics, wafer: Rect, info: &mut PlotRenderingInfo) {
        let index = self.renderer.paint_index(&self.dataset);
        let supplier = &self.base.drawing_supplier;
        let outline = Stroke::solid(1.0);
        for x in 0..self.dataset.max_chip_x() {
            for y in 0..self.dataset.max_chip_y() {
                let chip = self.chip_rect(wafer, x, y);
                let value = self.dataset.chip_value(x, y);
                let paint = value.map_or(self.renderer.empty_chip_paint, |v| {
                    self.renderer.chip_paint(&index, v, supplier)
                });
                g.fill_rect(chip, self.base.fg(paint));
                g.stroke_rect(chip, self.renderer.chip_outline_paint, &outline);
                if let Some(value) = value {
                    info.entities.add(
                        ChartEntity::rect(chip, EntityKind::WaferChip { x, y, value })
                            .with_tooltip(Some(format!("({x}, {y}): {}", format_number(value))))
                            .with_anchor(chip.center()),
                    );
                }
            }
        }
    }
}

impl Plot for WaferMapPlot {
    fn plot_type(&self) -> &'static str {
        "WMAP_Plot"
    }

    fn base(&self) -> &PlotBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut PlotBase {
        &mut self.base
    }

    fn draw(&self, g: &mut dyn Graphics, area: Rect, _anchor: Option<DVec2>, info: &mut PlotRenderingInfo) {
        let area = self.base.insets.trim(area);
        info.plot_area = area;
        self.base.fill_background(g, area);
        let wafer = Self::wafer_area(area);
        info.data_area = wafer;
        if wafer.is_empty() {
            return;
        }
        debug!(
            chips_x = self.dataset.max_chip_x(),
            chips_y = self.dataset.max_chip_y(),
            "drawing wafer map"
        );
        self.draw_edge(g, wafer);
        if self.dataset.is_empty() {
            self.base.draw_no_data_message(g, area);
        } else {
            self.draw_chips(g, wafer, info);
        }
        self.base.draw_outline(g, area);
    }

    fn legend_items(&self) -> Vec<LegendItem> {
        self.renderer.legend_items(&self.dataset, &self.base.drawing_supplier)
    }
}
