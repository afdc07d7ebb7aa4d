//! Hit regions recorded while drawing, for click-to-entity lookup.
use glam::DVec2;

use crate::geometry::Rect;
use crate::shape::Path;

/// What a [`ChartEntity`] refers to.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityKind {
    Plot,
    Axis,
    Title,
    LegendItem {
        series_key: String,
    },
    PieSection {
        pie_index: usize,
        section_index: usize,
        key: String,
    },
    CategoryItem {
        dataset_index: usize,
        row_key: String,
        column_key: String,
        value: f64,
    },
    XyItem {
        dataset_index: usize,
        series_index: usize,
        item: usize,
        x: f64,
        y: f64,
    },
    WaferChip {
        x: u32,
        y: u32,
        value: f64,
    },
}

/// A region of the rendered chart plus what it represents.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartEntity {
    pub area: Path,
    pub tooltip: Option<String>,
    pub kind: EntityKind,
    /// The data point's screen position, for items drawn as points.
    pub anchor: Option<DVec2>,
}

impl ChartEntity {
    pub fn new(area: Path, kind: EntityKind) -> Self {
        Self {
            area,
            tooltip: None,
            kind,
            anchor: None,
        }
    }

    pub fn rect(area: Rect, kind: EntityKind) -> Self {
        Self::new(Path::rectangle(area), kind)
    }

    pub fn with_tooltip(mut self, tooltip: Option<String>) -> Self {
        self.tooltip = tooltip;
        self
    }

    pub fn with_anchor(mut self, anchor: DVec2) -> Self {
        self.anchor = Some(anchor);
        self
    }

    pub fn contains(&self, point: DVec2) -> bool {
        self.area.bounds().contains(point) && self.area.contains(point)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct EntityCollection {
    entities: Vec<ChartEntity>,
}

impl EntityCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entity: ChartEntity) {
        self.entities.push(entity);
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn clear(&mut self) {
        self.entities.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChartEntity> {
        self.entities.iter()
    }

    pub fn get(&self, index: usize) -> Option<&ChartEntity> {
        self.entities.get(index)
    }

    /// The topmost entity under `point`. Later entities were drawn over earlier
    /// ones, so the search runs backwards.
    pub fn entity_at(&self, point: DVec2) -> Option<&ChartEntity> {
        self.entities.iter().rev().find(|e| e.contains(point))
    }

    /// The anchored entity nearest to `point` within `radius` screen units.
    pub fn nearest_item(&self, point: DVec2, radius: f64) -> Option<&ChartEntity> {
        let mut best: Option<(&ChartEntity, f64)> = None;
        for e in &self.entities {
            let Some(anchor) = e.anchor else {
                continue;
            };
            let d2 = anchor.distance_squared(point);
            if d2 > radius * radius {
                continue;
            }
            if best.is_none_or(|(_, best_d2)| d2 < best_d2) {
                best = Some((e, d2));
            }
        }
        best.map(|(e, _)| e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_at_prefers_last_added() {
        let mut c = EntityCollection::new();
        c.add(ChartEntity::rect(Rect::new(0.0, 0.0, 100.0, 100.0), EntityKind::Plot));
        c.add(ChartEntity::rect(Rect::new(10.0, 10.0, 10.0, 10.0), EntityKind::Title));
        assert_eq!(c.entity_at(DVec2::new(15.0, 15.0)).unwrap().kind, EntityKind::Title);
        assert_eq!(c.entity_at(DVec2::new(50.0, 50.0)).unwrap().kind, EntityKind::Plot);
        assert!(c.entity_at(DVec2::new(150.0, 50.0)).is_none());
    }

    #[test]
    fn nearest_item_respects_radius() {
        let mut c = EntityCollection::new();
        let item = |i: usize, x: f64| {
            ChartEntity::rect(Rect::new(x - 2.0, -2.0, 4.0, 4.0), EntityKind::XyItem {
                dataset_index: 0,
                series_index: 0,
                item: i,
                x,
                y: 0.0,
            })
            .with_anchor(DVec2::new(x, 0.0))
        };
        c.add(item(0, 0.0));
        c.add(item(1, 10.0));
        let hit = c.nearest_item(DVec2::new(7.0, 0.0), 5.0).unwrap();
        assert!(matches!(hit.kind, EntityKind::XyItem { item: 1, .. }));
        assert!(c.nearest_item(DVec2::new(50.0, 0.0), 5.0).is_none());
    }
}
