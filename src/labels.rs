//! Template-driven label and tooltip generators.
//!
//! Templates use positional placeholders: `{0}`, `{1}`, `{2}`, `{3}`. Missing
//! values render as `-`.
use serde::{Deserialize, Serialize};

use crate::dataset::{CategoryDataset, PieDataset};

/// Up to three decimals, trailing zeros trimmed.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let s = format!("{value:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_owned() } else { s.to_owned() }
}

/// Whole percent, e.g. `0.256` → `"26%"`.
pub fn format_percent(fraction: f64) -> String {
    format!("{:.0}%", fraction * 100.0)
}

fn fill(template: &str, args: &[&str]) -> String {
    let mut out = template.to_owned();
    for (i, a) in args.iter().enumerate() {
        out = out.replace(&format!("{{{i}}}"), a);
    }
    out
}

fn value_text(v: Option<f64>) -> String {
    v.map_or_else(|| "-".to_owned(), format_number)
}

/// `{0}` key, `{1}` value, `{2}` percentage of total, `{3}` total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieSectionLabelGenerator {
    pub format: String,
}

impl Default for PieSectionLabelGenerator {
    fn default() -> Self {
        Self::new("{0}")
    }
}

impl PieSectionLabelGenerator {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
        }
    }

    pub fn tooltips() -> Self {
        Self::new("{0}: ({1}, {2})")
    }

    pub fn generate(&self, dataset: &PieDataset, key: &str) -> Option<String> {
        dataset.index_of(key)?;
        let value = dataset.value(key);
        let total = dataset.total();
        let percent = match value {
            Some(v) if total > 0.0 && v > 0.0 => format_percent(v / total),
            Some(_) => format_percent(0.0),
            None => "-".to_owned(),
        };
        Some(fill(
            &self.format,
            &[key, &value_text(value), &percent, &format_number(total)],
        ))
    }
}

/// `{0}` row (series) key, `{1}` column (category) key, `{2}` value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryItemLabelGenerator {
    pub format: String,
}

impl Default for CategoryItemLabelGenerator {
    fn default() -> Self {
        Self::new("{2}")
    }
}

impl CategoryItemLabelGenerator {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
        }
    }

    pub fn tooltips() -> Self {
        Self::new("({0}, {1}) = {2}")
    }

    pub fn generate(&self, dataset: &CategoryDataset, row: usize, column: usize) -> Option<String> {
        let row_key = dataset.row_key(row)?;
        let column_key = dataset.column_key(column)?;
        Some(fill(
            &self.format,
            &[row_key, column_key, &value_text(dataset.value(row, column))],
        ))
    }
}

/// `{0}` series key, `{1}` x, `{2}` y.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XyItemLabelGenerator {
    pub format: String,
}

impl Default for XyItemLabelGenerator {
    fn default() -> Self {
        Self::new("{2}")
    }
}

impl XyItemLabelGenerator {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
        }
    }

    pub fn tooltips() -> Self {
        Self::new("{0}: ({1}, {2})")
    }

    pub fn generate(&self, series_key: &str, x: f64, y: f64) -> String {
        fill(&self.format, &[series_key, &format_number(x), &format_number(y)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_trim_trailing_zeros() {
        assert_eq!(format_number(2.0), "2");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(1.23456), "1.235");
        assert_eq!(format_number(-0.0001), "0");
    }

    #[test]
    fn pie_templates_fill_all_placeholders() {
        let ds = PieDataset::new().with_value("A", 1.0).with_value("B", 3.0);
        let g = PieSectionLabelGenerator::new("{0} = {1} ({2} of {3})");
        assert_eq!(g.generate(&ds, "B").unwrap(), "B = 3 (75% of 4)");
        assert_eq!(
            PieSectionLabelGenerator::tooltips().generate(&ds, "A").unwrap(),
            "A: (1, 25%)"
        );
        assert!(g.generate(&ds, "missing").is_none());
    }

    #[test]
    fn category_and_xy_templates() {
        let ds = CategoryDataset::new().with_value(4.5, "S1", "C1");
        assert_eq!(
            CategoryItemLabelGenerator::tooltips().generate(&ds, 0, 0).unwrap(),
            "(S1, C1) = 4.5"
        );
        assert_eq!(
            XyItemLabelGenerator::tooltips().generate("s", 1.0, 2.25),
            "s: (1, 2.25)"
        );
    }
}
