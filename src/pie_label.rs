//! Vertical de-overlapping of linked pie labels.
//!
//! Each side of a pie collects one [`PieLabelRecord`] per section, placed at
//! the height where its link line leaves the pie. [`PieLabelDistributor`] then
//! moves labels apart so that none overlap, trying progressively more
//! disruptive passes: push overlapping labels down, push them up, and finally
//! spread every label evenly over the available height.
use std::cmp::Ordering;

use tracing::trace;

use crate::text::TextBox;

/// One label waiting to be positioned.
#[derive(Debug, Clone, PartialEq)]
pub struct PieLabelRecord {
    pub key: String,
    /// Mid angle of the section in degrees.
    pub angle: f64,
    /// Preferred y: where the link line meets the pie's label radius.
    pub base_y: f64,
    /// Assigned y (label centre).
    pub allocated_y: f64,
    pub label: TextBox,
    pub label_height: f64,
    /// Horizontal gap between the link line and the label.
    pub gap: f64,
    /// Where the link starts, as a fraction of the pie radius.
    pub link_percent: f64,
}

impl PieLabelRecord {
    pub fn new(key: impl Into<String>, angle: f64, base_y: f64, label: TextBox, label_height: f64, gap: f64, link_percent: f64) -> Self {
        Self {
            key: key.into(),
            angle,
            base_y,
            allocated_y: base_y,
            label,
            label_height,
            gap,
            link_percent,
        }
    }

    pub fn lower_y(&self) -> f64 {
        self.allocated_y - self.label_height / 2.0
    }

    pub fn upper_y(&self) -> f64 {
        self.allocated_y + self.label_height / 2.0
    }

    fn cmp_base_y(&self, other: &Self) -> Ordering {
        self.base_y.total_cmp(&other.base_y)
    }
}

/// Assigns non-overlapping heights to a column of pie labels.
#[derive(Debug, Clone, PartialEq)]
pub struct PieLabelDistributor {
    labels: Vec<PieLabelRecord>,
    /// Minimum vertical gap kept between neighbouring labels.
    pub min_gap: f64,
}

impl Default for PieLabelDistributor {
    fn default() -> Self {
        Self::new()
    }
}

impl PieLabelDistributor {
    pub fn new() -> Self {
        Self {
            labels: Vec::new(),
            min_gap: 4.0,
        }
    }

    pub fn clear(&mut self) {
        self.labels.clear();
    }

    pub fn add_record(&mut self, record: PieLabelRecord) {
        self.labels.push(record);
    }

    pub fn item_count(&self) -> usize {
        self.labels.len()
    }

    pub fn record(&self, index: usize) -> Option<&PieLabelRecord> {
        self.labels.get(index)
    }

    pub fn records(&self) -> &[PieLabelRecord] {
        &self.labels
    }

    /// Position every label within `min_y..min_y + height`.
    pub fn distribute_labels(&mut self, min_y: f64, height: f64) {
        self.labels.sort_by(PieLabelRecord::cmp_base_y);
        if self.is_overlap() {
            self.adjust_downwards(min_y, height);
        }
        if self.is_overlap() {
            trace!("pie labels still overlap after moving down");
            self.adjust_upwards(min_y);
        }
        if self.is_overlap() {
            trace!(count = self.labels.len(), "spreading pie labels evenly");
            self.spread_evenly(min_y, height);
        }
    }

    /// Whether any label starts above the end of the one before it.
    pub fn is_overlap(&self) -> bool {
        let mut y = 0.0;
        for r in &self.labels {
            if y > r.lower_y() {
                return true;
            }
            y = r.upper_y();
        }
        false
    }

    /// Walk downwards, moving each label clear of its predecessor.
    pub(crate) fn adjust_downwards(&mut self, min_y: f64, height: f64) {
        for i in 1..self.labels.len() {
            let prev_upper = self.labels[i - 1].upper_y();
            let r1 = &mut self.labels[i];
            if r1.lower_y() < prev_upper {
                let h = r1.label_height;
                r1.allocated_y = (min_y + height - h / 2.0).min(prev_upper + self.min_gap + h / 2.0);
            }
        }
    }

    /// Walk upwards, moving each label clear of its successor.
    pub(crate) fn adjust_upwards(&mut self, min_y: f64) {
        for i in (1..self.labels.len()).rev() {
            let next_lower = self.labels[i].lower_y();
            let r1 = &mut self.labels[i - 1];
            if r1.upper_y() > next_lower {
                let h = r1.label_height;
                r1.allocated_y = (min_y + h / 2.0).max(next_lower - self.min_gap - h / 2.0);
            }
        }
    }

    /// Stack every label from `min_y` with equal gaps filling `height`.
    pub(crate) fn spread_evenly(&mut self, min_y: f64, height: f64) {
        let total: f64 = self.labels.iter().map(|r| r.label_height).sum();
        let gap = if self.labels.len() > 1 {
            (height - total) / (self.labels.len() - 1) as f64
        } else {
            0.0
        };
        let mut y = min_y;
        for r in &mut self.labels {
            y += r.label_height / 2.0;
            r.allocated_y = y;
            y += r.label_height / 2.0 + gap;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::style::Font;

    fn record(key: &str, base_y: f64, h: f64) -> PieLabelRecord {
        let tb = TextBox::new(key, &Font::default(), Color::BLACK);
        PieLabelRecord::new(key, 0.0, base_y, tb, h, 0.0, 1.0)
    }

    fn allocated(d: &PieLabelDistributor) -> Vec<f64> {
        d.records().iter().map(|r| r.allocated_y).collect()
    }

    #[test]
    fn separated_labels_stay_put_but_sorted() {
        let mut d = PieLabelDistributor::new();
        d.add_record(record("b", 100.0, 10.0));
        d.add_record(record("a", 50.0, 10.0));
        d.distribute_labels(0.0, 200.0);
        assert_eq!(allocated(&d), vec![50.0, 100.0]);
        assert_eq!(d.record(0).unwrap().key, "a");
    }

    #[test]
    fn overlapping_labels_are_pushed_down() {
        let mut d = PieLabelDistributor::new();
        d.add_record(record("a", 50.0, 10.0));
        d.add_record(record("b", 52.0, 10.0));
        d.distribute_labels(0.0, 200.0);
        // 55 (upper of a) + 4 gap + 5 half height
        assert_eq!(allocated(&d), vec![50.0, 64.0]);
        assert!(!d.is_overlap());
    }

    #[test]
    fn labels_at_bottom_are_pushed_up() {
        let mut d = PieLabelDistributor::new();
        d.add_record(record("a", 190.0, 10.0));
        d.add_record(record("b", 195.0, 10.0));
        d.distribute_labels(0.0, 200.0);
        // b is capped at 200 - 5, so a moves up: 190 - 4 - 5.
        assert_eq!(allocated(&d), vec![181.0, 195.0]);
        assert!(!d.is_overlap());
    }

    #[test]
    fn crowded_labels_are_spread_evenly() {
        let mut d = PieLabelDistributor::new();
        for i in 0..5 {
            d.add_record(record(&format!("k{i}"), 20.0, 10.0));
        }
        d.distribute_labels(0.0, 60.0);
        // 50 units of labels over 60: gaps of 2.5
        assert_eq!(allocated(&d), vec![5.0, 17.5, 30.0, 42.5, 55.0]);
    }

    #[test]
    fn is_overlap_starts_from_zero() {
        let mut d = PieLabelDistributor::new();
        d.add_record(record("a", 2.0, 10.0));
        assert!(d.is_overlap());
    }
}
