use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use super::transform::AffineTransform;
use super::types::Rect;
use crate::error::{ChartError, ChartResult};

/// Which screen direction the category axis runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BarOrientation {
    /// Categories on the horizontal axis; bars grow vertically.
    Vertical,
    /// Categories on the vertical axis; bars grow horizontally.
    Horizontal,
}

/// Slot of one bar trace among its siblings on a category axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarLayout {
    pub ratio: f64,
    pub trace_index: usize,
    pub trace_count: usize,
    pub orientation: BarOrientation,
    pub stacked: bool,
}

impl BarLayout {
    pub fn new(
        ratio: f64,
        trace_index: usize,
        trace_count: usize,
        orientation: BarOrientation,
    ) -> ChartResult<Self> {
        if !ratio.is_finite() || ratio <= 0.0 || ratio > 1.0 {
            return Err(ChartError::InvalidConfig(format!(
                "bar ratio must be in (0, 1], got {ratio}"
            )));
        }
        if trace_index >= trace_count {
            return Err(ChartError::InvalidData(format!(
                "bar trace index {trace_index} out of {trace_count} siblings"
            )));
        }
        Ok(Self {
            ratio,
            trace_index,
            trace_count,
            orientation,
            stacked: false,
        })
    }

    /// Stacked bars share one full-width slot per category.
    #[must_use]
    pub fn stacked(mut self) -> Self {
        self.stacked = true;
        self
    }

    /// Bar thickness in category units.
    ///
    /// Grouped bars use `ratio² / n`: the group spans `ratio`, and each bar
    /// keeps a gap to its neighbours inside the group.
    #[must_use]
    pub fn thickness(&self) -> f64 {
        if self.stacked {
            self.ratio
        } else {
            self.ratio * self.ratio / self.trace_count as f64
        }
    }

    /// Offset of the bar's leading edge from the category centre.
    #[must_use]
    pub fn offset(&self) -> f64 {
        let r = self.ratio;
        if self.stacked {
            return -r / 2.0;
        }
        let n = self.trace_count as f64;
        let i = self.trace_index as f64;
        -r / 2.0 + ((i + 0.5) / n) * r - self.thickness() / 2.0
    }
}

/// Running per-category totals shared by the traces of one stack.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StackBaselines(IndexMap<OrderedFloat<f64>, f64>);

impl StackBaselines {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current baseline of `category` and moves it by `value`.
    pub fn push(&mut self, category: f64, value: f64) -> f64 {
        let total = self.0.entry(OrderedFloat(category)).or_insert(0.0);
        let base = *total;
        *total += value;
        base
    }

    #[must_use]
    pub fn total(&self, category: f64) -> f64 {
        self.0.get(&OrderedFloat(category)).copied().unwrap_or(0.0)
    }
}

/// One bar in data and screen space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarGeometry {
    pub category: f64,
    pub value: f64,
    pub base: f64,
    /// Screen rectangle with non-negative width and height.
    pub rect: Rect,
}

/// Builds screen rectangles for one bar trace.
///
/// `categories` are category indices and `values` the bar lengths, paired by
/// row. Rows without a category are skipped; missing values draw from the
/// baseline with zero length. Stacked layouts read and advance `baselines`,
/// which must be shared by the sibling traces in order.
#[must_use]
pub fn build_bars(
    layout: BarLayout,
    categories: &[Option<f64>],
    values: &[Option<f64>],
    transform: AffineTransform,
    baselines: &mut StackBaselines,
) -> Vec<BarGeometry> {
    let thickness = layout.thickness();
    let offset = layout.offset();

    categories
        .iter()
        .zip(values)
        .filter_map(|(category, value)| {
            let category = (*category)?;
            let value = value.unwrap_or(0.0);
            let base = if layout.stacked {
                baselines.push(category, value)
            } else {
                0.0
            };
            let data_rect = match layout.orientation {
                BarOrientation::Vertical => {
                    Rect::new(category + offset, base, thickness, value)
                }
                BarOrientation::Horizontal => {
                    Rect::new(base, category + offset, value, thickness)
                }
            };
            Some(BarGeometry {
                category,
                value,
                base,
                rect: transform.apply_rect(data_rect).normalized(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{BarLayout, BarOrientation, StackBaselines};

    #[test]
    fn single_grouped_trace_is_centred() {
        let layout = BarLayout::new(0.75, 0, 1, BarOrientation::Vertical).expect("layout");
        assert!((layout.thickness() - 0.5625).abs() <= 1e-12);
        // Centre of the bar sits on the category.
        assert!((layout.offset() + layout.thickness() / 2.0).abs() <= 1e-12);
    }

    #[test]
    fn rejects_out_of_range_ratio_and_index() {
        assert!(BarLayout::new(0.0, 0, 1, BarOrientation::Vertical).is_err());
        assert!(BarLayout::new(1.2, 0, 1, BarOrientation::Vertical).is_err());
        assert!(BarLayout::new(0.5, 2, 2, BarOrientation::Vertical).is_err());
    }

    #[test]
    fn baselines_accumulate_per_category() {
        let mut baselines = StackBaselines::new();
        assert_eq!(baselines.push(0.0, 3.0), 0.0);
        assert_eq!(baselines.push(1.0, 1.0), 0.0);
        assert_eq!(baselines.push(0.0, 2.0), 3.0);
        assert_eq!(baselines.total(0.0), 5.0);
    }
}
