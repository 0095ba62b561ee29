use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};

use super::axis::AxisType;
use super::extract::millis_to_datetime;
use super::types::AxisRange;

pub const MS_PER_MINUTE: f64 = 60_000.0;
pub const MS_PER_HOUR: f64 = MS_PER_MINUTE * 60.0;
pub const MS_PER_DAY: f64 = MS_PER_HOUR * 24.0;

/// Upper bound on generated ticks; ranges with nice steps stay far below it.
pub const MAX_TICK_COUNT: usize = 10_000;

/// Computes a "nice" step from {1, 2, 5, 10}·10^k for rounding or dividing
/// `[min, max]`.
///
/// The span is divided by `scale` first and the step multiplied by it after,
/// which lets time axes pick steps in whole days or 30-day months. A span that
/// is exactly a power of ten is divided into ten steps instead of one.
#[must_use]
pub fn number_range_step(min: f64, max: f64, scale: f64) -> f64 {
    let span = max / scale - min / scale;
    if !span.is_finite() || span <= 0.0 {
        return scale;
    }

    let step = 10f64.powf(span.log10().floor());
    if span / step > 10.0 {
        return step * 2.0 * scale;
    }
    if span / step == 1.0 {
        return span / 10.0 * scale;
    }
    step * scale
}

/// Step for rounding or ticking a range on an axis of the given type.
#[must_use]
pub fn range_step(range: AxisRange, axis_type: AxisType) -> f64 {
    match axis_type {
        AxisType::Group | AxisType::Stack => 1.0,
        AxisType::Time => {
            let diff = range.max - range.min;
            if diff > 100.0 * MS_PER_DAY {
                number_range_step(range.min, range.max, MS_PER_DAY * 30.0)
            } else if diff > 3.0 * MS_PER_DAY {
                number_range_step(range.min, range.max, MS_PER_DAY)
            } else {
                number_range_step(range.min, range.max, 1.0)
            }
        }
        AxisType::Number => number_range_step(range.min, range.max, 1.0),
    }
}

/// Integer positions `ceil(min)..=floor(max)` for categorical axes.
#[must_use]
pub fn category_ticks(range: AxisRange) -> Vec<f64> {
    let first = range.min.ceil();
    let last = range.max.floor();
    if !first.is_finite() || !last.is_finite() || last < first {
        return Vec::new();
    }
    // Clamp in float space; the span can exceed usize.
    let count = (last - first).min((MAX_TICK_COUNT - 1) as f64) as usize + 1;
    (0..count).map(|index| first + index as f64).collect()
}

/// Arithmetic sequence from `range.min` stepping by `step` while `<= range.max`.
///
/// Each tick is computed as `min + i * step` and snapped to the step's decimal
/// precision so accumulated float error never shows up in labels.
#[must_use]
pub fn stepped_ticks(range: AxisRange, step: f64) -> Vec<f64> {
    if !step.is_finite() || step <= 0.0 || range.is_inverted() {
        return Vec::new();
    }
    if range.is_degenerate() {
        return vec![range.min];
    }

    let steps = range.span() / step;
    let rounded = steps.round();
    // Endpoints of rounded ranges are whole steps apart up to float noise.
    let count = if (steps - rounded).abs() <= 1e-6 {
        rounded
    } else {
        steps.floor()
    };
    let count = (count as usize).min(MAX_TICK_COUNT - 1);

    let precision = step_precision(step);
    (0..=count)
        .map(|index| snap_to_precision(range.min + index as f64 * step, precision))
        .collect()
}

/// First UTC month start `>= range.min`, then every month start `< range.max`.
#[must_use]
pub fn month_ticks(range: AxisRange) -> Vec<f64> {
    let Some(start) = millis_to_datetime(range.min) else {
        return Vec::new();
    };
    let Some(mut cursor) = start_of_month(start) else {
        return Vec::new();
    };
    if (cursor.timestamp_millis() as f64) < range.min {
        let Some(next) = cursor.checked_add_months(Months::new(1)) else {
            return Vec::new();
        };
        cursor = next;
    }

    let mut ticks = Vec::new();
    while (cursor.timestamp_millis() as f64) < range.max && ticks.len() < MAX_TICK_COUNT {
        ticks.push(cursor.timestamp_millis() as f64);
        let Some(next) = cursor.checked_add_months(Months::new(1)) else {
            break;
        };
        cursor = next;
    }
    ticks
}

fn start_of_month(dt: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let date = NaiveDate::from_ymd_opt(dt.year(), dt.month(), 1)?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}

/// Decimal places used to snap multiples of `step`, one finer than the step
/// itself so steps like 0.25 survive.
fn step_precision(step: f64) -> i32 {
    let magnitude = step.log10().floor();
    if !magnitude.is_finite() || magnitude >= 0.0 {
        return 0;
    }
    (-magnitude as i32 + 1).min(15)
}

fn snap_to_precision(value: f64, precision: i32) -> f64 {
    let snapped = if precision == 0 {
        snap_integral(value)
    } else {
        let factor = 10f64.powi(precision);
        (value * factor).round() / factor
    };
    // -0 would print as "-0" in labels.
    if snapped == 0.0 { 0.0 } else { snapped }
}

/// Rounds values within float noise of a whole number; others pass through.
fn snap_integral(value: f64) -> f64 {
    let rounded = value.round();
    if (value - rounded).abs() <= 1e-9 * rounded.abs().max(1.0) {
        rounded
    } else {
        value
    }
}
