use crate::axis_scale::AxisScale;
use crate::dataset::Range;

/// A labelled position along a value axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    /// The value at this tick in data coordinates.
    pub value: f64,

    /// The step between neighbouring ticks (in linear space for log axes).
    pub step_size: f64,

    pub label: String,
}

/// Formats a tick value given the step between ticks.
pub(crate) fn default_formatter(value: f64, step: f64) -> String {
    let log_step = step.log10();
    if !log_step.is_finite() || log_step >= 0.0 {
        format!("{value:.0}")
    } else {
        let decimal_places = (-log_step).ceil() as usize;
        format!("{value:.decimal_places$}")
    }
}

/// Generate ticks for `range` so that neighbouring ticks are at least
/// `min_spacing` screen units apart along an axis `length` units long.
pub(crate) fn generate_ticks(
    range: Range,
    scale: AxisScale,
    length: f64,
    min_spacing: f64,
) -> Vec<Tick> {
    let linear = scale.range_to_linear(range);
    let span = linear.length();
    if !span.is_finite() || span <= 0.0 || length <= 0.0 {
        return Vec::new();
    }

    let target = (length / min_spacing.max(1.0)).floor().max(1.0);
    let mut step = nice_step(span / target);
    if scale.is_log() {
        // Whole decades only.
        step = step.max(1.0).round();
    }

    let start = (linear.lower / step).ceil() * step;
    let mut ticks = Vec::new();
    let mut i = 0u32;
    loop {
        let v = start + step * f64::from(i);
        if v > linear.upper + step * 1e-9 {
            break;
        }
        i += 1;
        // Avoid printing "-0".
        let v = if v.abs() < step * 1e-9 { 0.0 } else { v };
        let Some(value) = scale.from_linear(v) else {
            continue;
        };
        let label = if scale.is_log() {
            format_log_tick(value)
        } else {
            default_formatter(value, step)
        };
        ticks.push(Tick {
            value,
            step_size: step,
            label,
        });
    }
    ticks
}

fn format_log_tick(value: f64) -> String {
    if (1e-3..1e6).contains(&value) {
        let log_step = value.log10().floor().min(0.0);
        default_formatter(value, 10f64.powf(log_step))
    } else {
        format!("{value:e}")
    }
}

/// Calculate a "nice" step size for the desired division size.
/// Returns a value that is a multiple of 1, 2, 5, or 10 times a power of 10.
pub fn nice_step(raw: f64) -> f64 {
    const NICE_STEP_BASES: [f64; 4] = [1.0, 2.0, 5.0, 10.0];
    if !raw.is_finite() || raw <= 0.0 {
        return 1.0;
    }
    let exp = raw.log10().floor();
    let base = 10.0_f64.powf(exp);
    for &m in &NICE_STEP_BASES {
        if raw <= m * base {
            return m * base;
        }
    }
    base * 10.0
}
