use serde::{Deserialize, Serialize};

use crate::dataset::Range;

/// How data values are spaced along a value axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum AxisScale {
    /// Screen distance is proportional to the raw value.
    #[default]
    Linear,

    /// Screen distance is proportional to `log_{base}(value)`.
    ///
    /// Only positive values are representable on this axis.
    Log {
        /// The base of the logarithm.
        base: f64,
    },
}

impl AxisScale {
    /// Transform a data value into the axis' linear space.
    pub(crate) fn to_linear(self, value: f64) -> Option<f64> {
        match self {
            Self::Linear => value.is_finite().then_some(value),
            Self::Log { base } => (value.is_finite() && value > 0.0)
                .then(|| value.log(base))
                .filter(|v| v.is_finite()),
        }
    }

    /// Inverse of [`AxisScale::to_linear`].
    pub(crate) fn from_linear(self, value: f64) -> Option<f64> {
        match self {
            Self::Linear => value.is_finite().then_some(value),
            Self::Log { base } => {
                if !value.is_finite() {
                    return None;
                }
                let out = base.powf(value);
                (out.is_finite() && out > 0.0).then_some(out)
            }
        }
    }

    /// Map a data range into linear space. Log ranges reaching zero or below
    /// are clipped to a tiny positive lower bound.
    pub(crate) fn range_to_linear(self, range: Range) -> Range {
        match self {
            Self::Linear => range,
            Self::Log { .. } => {
                let upper = self.to_linear(range.upper.max(f64::MIN_POSITIVE)).unwrap_or(1.0);
                let lower = self
                    .to_linear(range.lower)
                    .unwrap_or(upper - 1.0)
                    .min(upper);
                Range::ordered(lower, upper)
            }
        }
    }

    pub(crate) fn is_log(self) -> bool {
        matches!(self, Self::Log { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_rejects_non_positive() {
        let s = AxisScale::Log { base: 10.0 };
        assert_eq!(s.to_linear(0.0), None);
        assert_eq!(s.to_linear(-1.0), None);
        assert!((s.to_linear(100.0).unwrap() - 2.0).abs() < 1e-12);
        assert!((s.from_linear(3.0).unwrap() - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn log_range_clips_lower_bound() {
        let s = AxisScale::Log { base: 10.0 };
        let r = s.range_to_linear(Range::ordered(0.0, 100.0));
        assert!((r.upper - 2.0).abs() < 1e-12);
        assert!((r.lower - 1.0).abs() < 1e-12);
    }
}
