//! Datasets consumed by the plots.
//!
//! Missing values are `None`; non-finite values are treated as missing when
//! computing ranges.
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, Result};

/// A closed interval `lower..=upper`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub lower: f64,
    pub upper: f64,
}

impl Range {
    pub fn new(lower: f64, upper: f64) -> Result<Self> {
        if lower > upper || lower.is_nan() || upper.is_nan() {
            return Err(ChartError::InvalidRange { lower, upper });
        }
        Ok(Self { lower, upper })
    }

    /// Build a range from bounds already known to be ordered.
    pub(crate) const fn ordered(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    pub fn length(&self) -> f64 {
        self.upper - self.lower
    }

    pub fn central_value(&self) -> f64 {
        self.lower / 2.0 + self.upper / 2.0
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }

    pub fn intersects(&self, lower: f64, upper: f64) -> bool {
        lower <= self.upper && upper >= self.lower
    }

    /// Clamp `value` into the range.
    pub fn constrain(&self, value: f64) -> f64 {
        value.clamp(self.lower, self.upper)
    }

    /// The smallest range covering both inputs.
    pub fn combine(a: Option<Range>, b: Option<Range>) -> Option<Range> {
        match (a, b) {
            (Some(a), Some(b)) => Some(Range::ordered(
                a.lower.min(b.lower),
                a.upper.max(b.upper),
            )),
            (a, None) => a,
            (None, b) => b,
        }
    }

    /// Grow by fractions of the current length at each end.
    pub fn expand(&self, lower_margin: f64, upper_margin: f64) -> Range {
        let len = self.length();
        let mut lower = self.lower - len * lower_margin;
        let mut upper = self.upper + len * upper_margin;
        if lower > upper {
            let mid = lower / 2.0 + upper / 2.0;
            lower = mid;
            upper = mid;
        }
        Range::ordered(lower, upper)
    }

    pub fn expand_to_include(range: Option<Range>, value: f64) -> Option<Range> {
        if !value.is_finite() {
            return range;
        }
        Some(match range {
            Some(r) => Range::ordered(r.lower.min(value), r.upper.max(value)),
            None => Range::ordered(value, value),
        })
    }

    pub fn shift(&self, delta: f64) -> Range {
        Range::ordered(self.lower + delta, self.upper + delta)
    }

    /// Range of the finite values in `values`, or `None` when there are none.
    pub fn of(values: impl IntoIterator<Item = f64>) -> Option<Range> {
        values
            .into_iter()
            .fold(None, |acc, v| Range::expand_to_include(acc, v))
    }
}

/// Ordered key → value pairs, one per pie section.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PieDataset {
    values: IndexMap<String, Option<f64>>,
}

impl PieDataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<Option<f64>>) -> Self {
        self.set_value(key, value);
        self
    }

    /// Set the value for `key`, appending it if the key is new.
    pub fn set_value(&mut self, key: impl Into<String>, value: impl Into<Option<f64>>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Result<Option<f64>> {
        self.values
            .shift_remove(key)
            .ok_or_else(|| ChartError::UnknownKey(key.to_owned()))
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn value(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied().flatten()
    }

    pub fn value_at(&self, index: usize) -> Option<f64> {
        self.values.get_index(index).and_then(|(_, v)| *v)
    }

    pub fn key(&self, index: usize) -> Option<&str> {
        self.values.get_index(index).map(|(k, _)| k.as_str())
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.values.get_index_of(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<f64>)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Sum of the positive values.
    pub fn total(&self) -> f64 {
        self.values
            .values()
            .filter_map(|v| *v)
            .filter(|v| *v > 0.0)
            .sum()
    }
}

/// A table of values indexed by row (series) and column (category) keys.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoryDataset {
    row_keys: IndexSet<String>,
    column_keys: IndexSet<String>,
    /// `data[row][column]`
    data: Vec<Vec<Option<f64>>>,
}

impl CategoryDataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(
        mut self,
        value: impl Into<Option<f64>>,
        row: impl Into<String>,
        column: impl Into<String>,
    ) -> Self {
        self.add_value(value, row, column);
        self
    }

    /// Set a cell, creating its row and column if needed.
    pub fn add_value(
        &mut self,
        value: impl Into<Option<f64>>,
        row: impl Into<String>,
        column: impl Into<String>,
    ) {
        let (r, new_row) = self.row_keys.insert_full(row.into());
        if new_row {
            self.data.push(vec![None; self.column_keys.len()]);
        }
        let (c, new_col) = self.column_keys.insert_full(column.into());
        if new_col {
            for row in &mut self.data {
                row.push(None);
            }
        }
        self.data[r][c] = value.into();
    }

    /// Replace an existing cell.
    pub fn set_value(&mut self, value: Option<f64>, row: &str, column: &str) -> Result<()> {
        let r = self
            .row_index(row)
            .ok_or_else(|| ChartError::UnknownKey(row.to_owned()))?;
        let c = self
            .column_index(column)
            .ok_or_else(|| ChartError::UnknownKey(column.to_owned()))?;
        self.data[r][c] = value;
        Ok(())
    }

    pub fn value(&self, row: usize, column: usize) -> Option<f64> {
        self.data.get(row)?.get(column).copied().flatten()
    }

    pub fn value_by_key(&self, row: &str, column: &str) -> Option<f64> {
        self.value(self.row_index(row)?, self.column_index(column)?)
    }

    pub fn row_keys(&self) -> impl Iterator<Item = &str> {
        self.row_keys.iter().map(String::as_str)
    }

    pub fn column_keys(&self) -> impl Iterator<Item = &str> {
        self.column_keys.iter().map(String::as_str)
    }

    pub fn row_key(&self, index: usize) -> Option<&str> {
        self.row_keys.get_index(index).map(String::as_str)
    }

    pub fn column_key(&self, index: usize) -> Option<&str> {
        self.column_keys.get_index(index).map(String::as_str)
    }

    pub fn row_index(&self, key: &str) -> Option<usize> {
        self.row_keys.get_index_of(key)
    }

    pub fn column_index(&self, key: &str) -> Option<usize> {
        self.column_keys.get_index_of(key)
    }

    pub fn row_count(&self) -> usize {
        self.row_keys.len()
    }

    pub fn column_count(&self) -> usize {
        self.column_keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.iter().flatten().all(Option::is_none)
    }

    pub fn range(&self) -> Option<Range> {
        Range::of(self.data.iter().flatten().filter_map(|v| *v))
    }

    /// Range of the per-category stacked totals, always including zero.
    pub fn stacked_range(&self) -> Option<Range> {
        let mut out = None;
        for c in 0..self.column_count() {
            let (mut pos, mut neg) = (0.0, 0.0);
            for r in 0..self.row_count() {
                match self.value(r, c) {
                    Some(v) if v > 0.0 => pos += v,
                    Some(v) if v < 0.0 => neg += v,
                    _ => {}
                }
            }
            out = Range::expand_to_include(out, pos);
            out = Range::expand_to_include(out, neg);
        }
        out
    }
}

/// One series of `(x, y)` items.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct XySeries {
    pub items: Vec<[f64; 2]>,
}

impl XySeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_points(items: Vec<[f64; 2]>) -> Self {
        Self { items }
    }

    pub fn add(&mut self, x: f64, y: f64) {
        self.items.push([x, y]);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn x(&self, item: usize) -> Option<f64> {
        self.items.get(item).map(|p| p[0])
    }

    pub fn y(&self, item: usize) -> Option<f64> {
        self.items.get(item).map(|p| p[1])
    }
}

/// A keyed collection of [`XySeries`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct XyDataset {
    series: IndexMap<String, XySeries>,
}

impl XyDataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, key: impl Into<String>, series: XySeries) -> Self {
        self.add_series(key, series);
        self
    }

    /// Add (or replace) the series stored under `key`.
    pub fn add_series(&mut self, key: impl Into<String>, series: XySeries) {
        self.series.insert(key.into(), series);
    }

    pub fn remove_series(&mut self, key: &str) -> Result<XySeries> {
        self.series
            .shift_remove(key)
            .ok_or_else(|| ChartError::UnknownKey(key.to_owned()))
    }

    pub fn series(&self, index: usize) -> Option<(&str, &XySeries)> {
        self.series
            .get_index(index)
            .map(|(k, s)| (k.as_str(), s))
    }

    pub fn series_mut(&mut self, key: &str) -> Option<&mut XySeries> {
        self.series.get_mut(key)
    }

    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &XySeries)> {
        self.series.iter().map(|(k, s)| (k.as_str(), s))
    }

    pub fn is_empty(&self) -> bool {
        self.series.values().all(XySeries::is_empty)
    }

    pub fn domain_range(&self) -> Option<Range> {
        Range::of(self.series.values().flat_map(|s| s.items.iter().map(|p| p[0])))
    }

    pub fn range_range(&self) -> Option<Range> {
        Range::of(self.series.values().flat_map(|s| s.items.iter().map(|p| p[1])))
    }
}

/// A single value, as shown by compass and thermometer plots.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ValueDataset {
    pub value: Option<f64>,
}

impl ValueDataset {
    pub fn new(value: impl Into<Option<f64>>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// Largest number of chips a wafer grid may hold.
pub const MAX_WAFER_CHIPS: usize = 1 << 24;

/// Chip values on a wafer, addressed by `(x, y)` chip coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredWaferMap")]
pub struct WaferMapDataset {
    max_chip_x: u32,
    max_chip_y: u32,
    /// Gap between chips, in screen units.
    pub chip_space: f64,
    /// Row-major: `values[y * max_chip_x + x]`.
    values: Vec<Option<f64>>,
}

#[derive(Deserialize)]
struct StoredWaferMap {
    max_chip_x: u32,
    max_chip_y: u32,
    chip_space: f64,
    values: Vec<Option<f64>>,
}

impl TryFrom<StoredWaferMap> for WaferMapDataset {
    type Error = ChartError;

    fn try_from(stored: StoredWaferMap) -> Result<Self> {
        let cells = chip_count(stored.max_chip_x, stored.max_chip_y)?;
        if stored.values.len() != cells {
            return Err(ChartError::invalid(
                "values",
                format!("expected {cells} chips, found {}", stored.values.len()),
            ));
        }
        Ok(Self {
            max_chip_x: stored.max_chip_x,
            max_chip_y: stored.max_chip_y,
            chip_space: stored.chip_space,
            values: stored.values,
        })
    }
}

/// Cells in a `nx` by `ny` grid, if it stays within [`MAX_WAFER_CHIPS`].
fn chip_count(nx: u32, ny: u32) -> Result<usize> {
    (nx as usize)
        .checked_mul(ny as usize)
        .filter(|&n| n <= MAX_WAFER_CHIPS)
        .ok_or_else(|| {
            ChartError::invalid(
                "chip coordinates",
                format!("a {nx} x {ny} grid exceeds {MAX_WAFER_CHIPS} chips"),
            )
        })
}

impl Default for WaferMapDataset {
    fn default() -> Self {
        Self {
            max_chip_x: 0,
            max_chip_y: 0,
            chip_space: 1.0,
            values: Vec::new(),
        }
    }
}

impl WaferMapDataset {
    /// An empty `max_chip_x` by `max_chip_y` grid.
    pub fn new(max_chip_x: u32, max_chip_y: u32, chip_space: f64) -> Result<Self> {
        Ok(Self {
            max_chip_x,
            max_chip_y,
            chip_space,
            values: vec![None; chip_count(max_chip_x, max_chip_y)?],
        })
    }

    pub fn max_chip_x(&self) -> u32 {
        self.max_chip_x
    }

    pub fn max_chip_y(&self) -> u32 {
        self.max_chip_y
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.max_chip_x && y < self.max_chip_y).then(|| y as usize * self.max_chip_x as usize + x as usize)
    }

    /// Set the value of chip `(x, y)`, growing the grid if the chip lies
    /// outside it. Fails if the grown grid would exceed [`MAX_WAFER_CHIPS`].
    pub fn add_value(&mut self, value: f64, x: u32, y: u32) -> Result<()> {
        if self.index(x, y).is_none() {
            let (Some(x_end), Some(y_end)) = (x.checked_add(1), y.checked_add(1)) else {
                return Err(ChartError::invalid("chip coordinates", format!("({x}, {y}) is out of range")));
            };
            let nx = self.max_chip_x.max(x_end);
            let ny = self.max_chip_y.max(y_end);
            let mut grown = vec![None; chip_count(nx, ny)?];
            for cy in 0..self.max_chip_y {
                for cx in 0..self.max_chip_x {
                    grown[cy as usize * nx as usize + cx as usize] = self.chip_value(cx, cy);
                }
            }
            self.values = grown;
            self.max_chip_x = nx;
            self.max_chip_y = ny;
        }
        if let Some(slot) = self.index(x, y).and_then(|i| self.values.get_mut(i)) {
            *slot = Some(value);
        }
        Ok(())
    }

    pub fn chip_value(&self, x: u32, y: u32) -> Option<f64> {
        self.index(x, y).and_then(|i| self.values.get(i)).copied().flatten()
    }

    fn finite_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().filter_map(|v| *v).filter(|v| v.is_finite())
    }

    pub fn min_value(&self) -> Option<f64> {
        self.finite_values().reduce(f64::min)
    }

    pub fn max_value(&self) -> Option<f64> {
        self.finite_values().reduce(f64::max)
    }

    /// The distinct chip values in ascending order.
    pub fn unique_values(&self) -> Vec<f64> {
        let mut v: Vec<f64> = self.finite_values().collect();
        v.sort_by(f64::total_cmp);
        v.dedup();
        v
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_new_rejects_inverted_bounds() {
        assert!(matches!(
            Range::new(2.0, 1.0),
            Err(ChartError::InvalidRange { .. })
        ));
        assert!(Range::new(1.0, 1.0).is_ok());
    }

    #[test]
    fn pie_total_ignores_missing_and_negative() {
        let ds = PieDataset::new()
            .with_value("a", 3.0)
            .with_value("b", None)
            .with_value("c", -2.0)
            .with_value("d", 1.0);
        assert_eq!(ds.total(), 4.0);
        assert_eq!(ds.index_of("d"), Some(3));
    }

    #[test]
    fn pie_set_value_keeps_position() {
        let mut ds = PieDataset::new().with_value("a", 1.0).with_value("b", 2.0);
        ds.set_value("a", 5.0);
        assert_eq!(ds.key(0), Some("a"));
        assert_eq!(ds.value("a"), Some(5.0));
    }

    #[test]
    fn category_add_value_grows_table() {
        let ds = CategoryDataset::new()
            .with_value(1.0, "s1", "c1")
            .with_value(2.0, "s2", "c2");
        assert_eq!(ds.row_count(), 2);
        assert_eq!(ds.column_count(), 2);
        assert_eq!(ds.value(0, 1), None);
        assert_eq!(ds.value_by_key("s2", "c2"), Some(2.0));
    }

    #[test]
    fn stacked_range_sums_per_category() {
        let ds = CategoryDataset::new()
            .with_value(1.0, "s1", "c1")
            .with_value(2.0, "s2", "c1")
            .with_value(-4.0, "s1", "c2");
        let r = ds.stacked_range().unwrap();
        assert_eq!((r.lower, r.upper), (-4.0, 3.0));
    }

    #[test]
    fn wafer_grid_grows_and_keeps_values() {
        let mut ds = WaferMapDataset::new(2, 2, 1.0).unwrap();
        ds.add_value(1.0, 1, 1).unwrap();
        ds.add_value(3.0, 4, 0).unwrap();
        ds.add_value(1.0, 0, 0).unwrap();
        assert_eq!(ds.max_chip_x(), 5);
        assert_eq!(ds.chip_value(1, 1), Some(1.0));
        assert_eq!(ds.chip_value(4, 0), Some(3.0));
        assert_eq!(ds.unique_values(), vec![1.0, 3.0]);
    }

    #[test]
    fn wafer_rejects_oversized_grids() {
        assert!(matches!(
            WaferMapDataset::new(u32::MAX, u32::MAX, 1.0),
            Err(ChartError::InvalidArgument { .. })
        ));

        let mut ds = WaferMapDataset::new(2, 2, 1.0).unwrap();
        ds.add_value(2.0, 1, 0).unwrap();
        assert!(ds.add_value(1.0, u32::MAX, 0).is_err());
        assert!(ds.add_value(1.0, 0, u32::MAX).is_err());
        assert!(ds.add_value(1.0, 70_000, 70_000).is_err());
        // A rejected chip leaves the grid untouched.
        assert_eq!((ds.max_chip_x(), ds.max_chip_y()), (2, 2));
        assert_eq!(ds.chip_value(1, 0), Some(2.0));
        assert_eq!(ds.chip_value(u32::MAX, u32::MAX), None);
    }

    #[test]
    fn wafer_load_checks_grid_size() {
        let bad = r#"{"max_chip_x":3,"max_chip_y":3,"chip_space":1.0,"values":[null]}"#;
        assert!(serde_json::from_str::<WaferMapDataset>(bad).is_err());
        let good = r#"{"max_chip_x":1,"max_chip_y":2,"chip_space":1.0,"values":[null,4.0]}"#;
        let ds: WaferMapDataset = serde_json::from_str(good).unwrap();
        assert_eq!(ds.chip_value(0, 1), Some(4.0));
    }
}
