use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::entity::{ChartEntity, EntityKind};
use crate::geometry::{Insets, Rect, RectangleEdge};
use crate::graphics::{Graphics, TextItem};
use crate::shape::{MarkerShape, Path};
use crate::style::{Font, Stroke, TextAnchor};

const SWATCH_SIZE: f64 = 8.0;
const SWATCH_GAP: f64 = 4.0;

/// An entry in a chart legend.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendItem {
    pub label: String,
    pub tooltip: Option<String>,
    pub shape: MarkerShape,
    pub shape_visible: bool,
    pub fill_paint: Color,
    pub outline_paint: Option<Color>,
    pub line_visible: bool,
    pub line_stroke: Stroke,
    pub series_key: String,
    pub dataset_index: usize,
}

impl LegendItem {
    pub fn new(label: impl Into<String>, fill_paint: Color) -> Self {
        let label = label.into();
        Self {
            series_key: label.clone(),
            label,
            tooltip: None,
            shape: MarkerShape::Square,
            shape_visible: true,
            fill_paint,
            outline_paint: None,
            line_visible: false,
            line_stroke: Stroke::solid(1.0),
            dataset_index: 0,
        }
    }

    pub fn with_series_key(mut self, key: impl Into<String>) -> Self {
        self.series_key = key.into();
        self
    }

    pub fn with_shape(mut self, shape: MarkerShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_line(mut self, stroke: Stroke) -> Self {
        self.line_visible = true;
        self.line_stroke = stroke;
        self
    }

    pub fn with_outline(mut self, paint: Option<Color>) -> Self {
        self.outline_paint = paint;
        self
    }

    pub fn with_dataset_index(mut self, index: usize) -> Self {
        self.dataset_index = index;
        self
    }

    pub fn with_tooltip(mut self, tooltip: Option<String>) -> Self {
        self.tooltip = tooltip;
        self
    }

    fn width(&self, g: &dyn Graphics, font: &Font) -> f64 {
        let swatch = if self.line_visible {
            SWATCH_SIZE * 2.0
        } else {
            SWATCH_SIZE
        };
        swatch + SWATCH_GAP + g.measure_text(&self.label, font).width
    }

    fn draw_swatch(&self, g: &mut dyn Graphics, center: DVec2) {
        if self.line_visible {
            let half = SWATCH_SIZE;
            g.draw_line(
                center - DVec2::new(half, 0.0),
                center + DVec2::new(half, 0.0),
                self.fill_paint,
                &self.line_stroke,
            );
        }
        if self.shape_visible {
            let shape = self.shape.to_path(center, SWATCH_SIZE);
            g.fill_path(&shape, self.fill_paint);
            if let Some(outline) = self.outline_paint {
                g.stroke_path(&shape, outline, &Stroke::solid(0.5));
            }
        }
    }
}

/// How the chart lays out its legend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendSettings {
    pub visible: bool,
    pub position: RectangleEdge,
    pub item_font: Font,
    pub item_paint: Color,
    pub background_paint: Option<Color>,
    pub outline_paint: Option<Color>,
    pub margin: Insets,
    pub padding: Insets,
    /// Horizontal gap between items on a row.
    pub item_gap: f64,
}

impl Default for LegendSettings {
    fn default() -> Self {
        Self {
            visible: true,
            position: RectangleEdge::Bottom,
            item_font: Font::new(10.0),
            item_paint: Color::BLACK,
            background_paint: Some(Color::WHITE),
            outline_paint: Some(Color::GRAY),
            margin: Insets::uniform(4.0),
            padding: Insets::uniform(4.0),
            item_gap: 10.0,
        }
    }
}

/// Item boxes of an arranged legend, relative to the block's top-left corner.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LegendLayout {
    pub items: Vec<Rect>,
    pub width: f64,
    pub height: f64,
}

impl LegendSettings {
    fn row_height(&self, g: &dyn Graphics) -> f64 {
        g.measure_text("", &self.item_font).height.max(SWATCH_SIZE)
    }

    /// Flow items into rows no wider than `max_width` (top/bottom legends) or
    /// stack them one per row (left/right legends).
    pub fn arrange(&self, g: &dyn Graphics, items: &[LegendItem], max_width: f64) -> LegendLayout {
        let row_h = self.row_height(g);
        let avail = self.padding.trim_width(self.margin.trim_width(max_width)).max(0.0);
        let stack = self.position.is_left_or_right();
        let mut rects = Vec::with_capacity(items.len());
        let (mut x, mut y, mut widest) = (0.0f64, 0.0f64, 0.0f64);
        for item in items {
            let w = item.width(g, &self.item_font);
            if x > 0.0 && (stack || x + w > avail) {
                x = 0.0;
                y += row_h;
            }
            rects.push(Rect::new(x, y, w, row_h));
            x += w + self.item_gap;
            widest = widest.max(x - self.item_gap);
        }
        let content_h = if items.is_empty() { 0.0 } else { y + row_h };
        LegendLayout {
            items: rects,
            width: self.margin.extend_width(self.padding.extend_width(widest)),
            height: self.margin.extend_height(self.padding.extend_height(content_h)),
        }
    }

    /// Draw an arranged legend into `area`, returning one entity per item.
    pub fn draw(&self, g: &mut dyn Graphics, items: &[LegendItem], layout: &LegendLayout, area: Rect) -> Vec<ChartEntity> {
        let frame = self.margin.trim(area);
        if let Some(bg) = self.background_paint {
            g.fill_rect(frame, bg);
        }
        if let Some(outline) = self.outline_paint {
            g.stroke_rect(frame, outline, &Stroke::solid(0.5));
        }
        let inner = self.padding.trim(frame);
        let mut entities = Vec::with_capacity(items.len());
        for (item, r) in items.iter().zip(&layout.items) {
            let r = r.translate(inner.x, inner.y);
            let swatch_w = if item.line_visible {
                SWATCH_SIZE * 2.0
            } else {
                SWATCH_SIZE
            };
            item.draw_swatch(g, DVec2::new(r.x + swatch_w / 2.0, r.center_y()));
            g.draw_text(
                &TextItem::new(
                    item.label.as_str(),
                    DVec2::new(r.x + swatch_w + SWATCH_GAP, r.center_y()),
                    &self.item_font,
                    self.item_paint,
                )
                .with_anchor(TextAnchor::CenterLeft),
            );
            entities.push(
                ChartEntity::new(
                    Path::rectangle(r),
                    EntityKind::LegendItem {
                        series_key: item.series_key.clone(),
                    },
                )
                .with_tooltip(item.tooltip.clone()),
            );
        }
        entities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::RecordingCanvas;

    #[test]
    fn arrange_wraps_rows() {
        let g = RecordingCanvas::new();
        let settings = LegendSettings {
            margin: Insets::ZERO,
            padding: Insets::ZERO,
            ..LegendSettings::default()
        };
        // Each item: 8 + 4 + 5 chars * 6 = 42 wide.
        let items: Vec<_> = ["alpha", "bravo", "delta"]
            .iter()
            .map(|l| LegendItem::new(*l, Color::RED))
            .collect();
        let layout = settings.arrange(&g, &items, 100.0);
        assert_eq!(layout.items[1].y, 0.0);
        assert!(layout.items[2].y > 0.0);
        assert_eq!(layout.items[2].x, 0.0);
    }

    #[test]
    fn draw_emits_legend_entities() {
        let mut g = RecordingCanvas::new();
        let settings = LegendSettings::default();
        let items = vec![LegendItem::new("a", Color::RED), LegendItem::new("b", Color::BLUE)];
        let layout = settings.arrange(&g, &items, 400.0);
        let area = Rect::new(0.0, 300.0, 400.0, layout.height);
        let entities = settings.draw(&mut g, &items, &layout, area);
        assert_eq!(entities.len(), 2);
        assert!(matches!(&entities[1].kind, EntityKind::LegendItem { series_key } if series_key == "b"));
    }
}
