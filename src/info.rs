use glam::DVec2;

use crate::crosshair::CrosshairState;
use crate::entity::{ChartEntity, EntityCollection};
use crate::geometry::Rect;

/// Layout and hit regions produced by drawing one plot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlotRenderingInfo {
    pub plot_area: Rect,
    pub data_area: Rect,
    pub subplots: Vec<PlotRenderingInfo>,
    pub entities: EntityCollection,
    /// Crosshair values resolved during drawing.
    pub crosshair: Option<CrosshairState>,
}

impl PlotRenderingInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_subplot_info(&mut self, info: PlotRenderingInfo) {
        self.subplots.push(info);
    }

    pub fn subplot_info(&self, index: usize) -> Option<&PlotRenderingInfo> {
        self.subplots.get(index)
    }

    /// Index of the first subplot whose data area contains `point`.
    pub fn subplot_index(&self, point: DVec2) -> Option<usize> {
        self.subplots
            .iter()
            .position(|s| s.data_area.contains(point))
    }

    /// The topmost entity at `point`, searching subplots before this plot's own entities.
    pub fn entity_at(&self, point: DVec2) -> Option<&ChartEntity> {
        self.subplots
            .iter()
            .rev()
            .find_map(|s| s.entity_at(point))
            .or_else(|| self.entities.entity_at(point))
    }

    /// Nearest anchored entity within `radius`, over the whole plot tree.
    pub fn nearest_item(&self, point: DVec2, radius: f64) -> Option<&ChartEntity> {
        let own = self.entities.nearest_item(point, radius);
        let nested = self.subplots.iter().filter_map(|s| s.nearest_item(point, radius));
        own.into_iter().chain(nested).min_by(|a, b| {
            let da = a.anchor.map_or(f64::INFINITY, |p| p.distance_squared(point));
            let db = b.anchor.map_or(f64::INFINITY, |p| p.distance_squared(point));
            da.total_cmp(&db)
        })
    }

    /// Total number of entities in the tree.
    pub fn entity_count(&self) -> usize {
        self.entities.len() + self.subplots.iter().map(Self::entity_count).sum::<usize>()
    }
}

/// Everything recorded while drawing a chart.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartRenderingInfo {
    pub chart_area: Rect,
    pub plot: PlotRenderingInfo,
    /// Title and legend entities.
    pub entities: EntityCollection,
}

impl ChartRenderingInfo {
    pub fn entity_at(&self, point: DVec2) -> Option<&ChartEntity> {
        self.entities
            .entity_at(point)
            .or_else(|| self.plot.entity_at(point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityKind;

    #[test]
    fn subplot_index_finds_containing_area() {
        let mut info = PlotRenderingInfo::new();
        for y in [0.0, 100.0] {
            info.add_subplot_info(PlotRenderingInfo {
                data_area: Rect::new(0.0, y, 100.0, 90.0),
                ..PlotRenderingInfo::default()
            });
        }
        assert_eq!(info.subplot_index(DVec2::new(50.0, 150.0)), Some(1));
        assert_eq!(info.subplot_index(DVec2::new(50.0, 95.0)), None);
    }

    #[test]
    fn nested_entities_win_over_parent() {
        let mut child = PlotRenderingInfo::new();
        child
            .entities
            .add(ChartEntity::rect(Rect::new(0.0, 0.0, 10.0, 10.0), EntityKind::Title));
        let mut parent = PlotRenderingInfo::new();
        parent
            .entities
            .add(ChartEntity::rect(Rect::new(0.0, 0.0, 100.0, 100.0), EntityKind::Plot));
        parent.add_subplot_info(child);
        assert_eq!(parent.entity_at(DVec2::new(5.0, 5.0)).unwrap().kind, EntityKind::Title);
        assert_eq!(parent.entity_count(), 2);
    }
}
