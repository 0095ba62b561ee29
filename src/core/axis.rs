//! Axis lifecycle for one layout pass.
//!
//! Each stage is its own value: [`AxisSeed`] (uninitialized) →
//! [`RangedAxis`] (range computed) → [`RoundedAxis`] (rounded) →
//! [`ResolvedAxis`] (ticks computed). Transitions consume the previous stage,
//! so a later stage can never be observed half-updated.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::data::Record;
use super::extract::{CategoryGroups, ColumnReader};
use super::label_format::value_title;
use super::style::{LabelStyle, LineStyle};
use super::ticks::{category_ticks, month_ticks, range_step, stepped_ticks};
use super::types::{AxisRange, extend_range};
use crate::error::{ChartError, ChartResult};

pub const DEFAULT_BAR_RATIO: f64 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AxisType {
    #[default]
    Number,
    /// Categorical; sibling bars are laid side by side.
    Group,
    /// Categorical; sibling bars are summed on a shared baseline.
    Stack,
    /// Epoch milliseconds.
    Time,
}

impl AxisType {
    #[must_use]
    pub fn is_categorical(self) -> bool {
        matches!(self, Self::Group | Self::Stack)
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Group => "group",
            Self::Stack => "stack",
            Self::Time => "time",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisSide {
    Top,
    Bottom,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisOrientation {
    Horizontal,
    Vertical,
}

impl AxisSide {
    pub const ALL: [Self; 4] = [Self::Top, Self::Right, Self::Bottom, Self::Left];

    #[must_use]
    pub fn orientation(self) -> AxisOrientation {
        match self {
            Self::Top | Self::Bottom => AxisOrientation::Horizontal,
            Self::Left | Self::Right => AxisOrientation::Vertical,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Requested axis range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RangeSpec {
    /// Fit the data, then round out to nice numbers.
    #[default]
    Auto,
    /// Used verbatim; never rounded.
    Manual(AxisRange),
}

impl RangeSpec {
    #[must_use]
    pub fn is_auto(self) -> bool {
        matches!(self, Self::Auto)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TickMode {
    #[default]
    Auto,
    /// Ticks come from [`AxisSpec::ticks`].
    Manual,
    /// Calendar month starts; time axes only.
    Months,
}

/// Declarative axis configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisSpec {
    #[serde(rename = "type")]
    pub axis_type: AxisType,
    pub range: RangeSpec,
    pub tick_mode: TickMode,
    /// Caller-supplied ticks for [`TickMode::Manual`].
    pub ticks: Vec<f64>,
    pub tick_format: Option<String>,
    pub hover_format: Option<String>,
    pub tick_length: f64,
    pub bar_ratio: Option<f64>,
    pub title: Option<String>,
    pub style: Option<LineStyle>,
    pub label_style: Option<LabelStyle>,
    pub title_style: Option<LabelStyle>,
    pub grid_style: Option<LineStyle>,
    /// Categories known before any data is read; data may append more.
    pub groups: Vec<String>,
}

impl AxisSpec {
    #[must_use]
    pub fn new(axis_type: AxisType) -> Self {
        Self {
            axis_type,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.range = RangeSpec::Manual(AxisRange::new(min, max));
        self
    }

    #[must_use]
    pub fn with_tick_mode(mut self, tick_mode: TickMode) -> Self {
        self.tick_mode = tick_mode;
        self
    }

    #[must_use]
    pub fn with_manual_ticks(mut self, ticks: Vec<f64>) -> Self {
        self.tick_mode = TickMode::Manual;
        self.ticks = ticks;
        self
    }

    #[must_use]
    pub fn with_tick_format(mut self, format: impl Into<String>) -> Self {
        self.tick_format = Some(format.into());
        self
    }

    #[must_use]
    pub fn with_tick_length(mut self, tick_length: f64) -> Self {
        self.tick_length = tick_length;
        self
    }

    #[must_use]
    pub fn with_bar_ratio(mut self, ratio: f64) -> Self {
        self.bar_ratio = Some(ratio);
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_grid(mut self, grid_style: LineStyle) -> Self {
        self.grid_style = Some(grid_style);
        self
    }

    #[must_use]
    pub fn bar_ratio(&self) -> f64 {
        self.bar_ratio.unwrap_or(DEFAULT_BAR_RATIO)
    }

    /// Rejects structurally invalid configuration before a layout pass starts.
    pub fn validate(&self) -> ChartResult<()> {
        if self.tick_mode == TickMode::Months && self.axis_type != AxisType::Time {
            return Err(ChartError::UnsupportedTickMode {
                axis_type: self.axis_type.name().to_owned(),
            });
        }
        if let RangeSpec::Manual(range) = self.range {
            if !range.min.is_finite() || !range.max.is_finite() {
                return Err(ChartError::InvalidConfig(
                    "manual axis range must be finite".to_owned(),
                ));
            }
        }
        if let Some(ratio) = self.bar_ratio {
            if !ratio.is_finite() || ratio <= 0.0 || ratio > 1.0 {
                return Err(ChartError::InvalidConfig(format!(
                    "bar ratio must be in (0, 1], got {ratio}"
                )));
            }
        }
        if !self.tick_length.is_finite() || self.tick_length < 0.0 {
            return Err(ChartError::InvalidConfig(
                "tick length must be finite and >= 0".to_owned(),
            ));
        }
        if self.ticks.iter().any(|tick| !tick.is_finite()) {
            return Err(ChartError::InvalidConfig(
                "manual ticks must be finite".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Uninitialized axis: configuration plus any pre-seeded categories.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisSeed {
    name: String,
    spec: AxisSpec,
    groups: CategoryGroups,
}

impl AxisSeed {
    #[must_use]
    pub fn new(name: impl Into<String>, spec: AxisSpec) -> Self {
        let groups = spec.groups.iter().cloned().collect();
        Self {
            name: name.into(),
            spec,
            groups,
        }
    }

    /// Enters the range-computed stage without reading any data.
    ///
    /// Manual ranges are adopted immediately; categorical axes cover the
    /// pre-seeded groups.
    #[must_use]
    pub fn into_ranged(self) -> RangedAxis {
        let computed_range = match self.spec.range {
            RangeSpec::Manual(range) => Some(range),
            RangeSpec::Auto if self.spec.axis_type.is_categorical() && !self.groups.is_empty() => {
                Some(category_range(&self.groups))
            }
            RangeSpec::Auto => None,
        };
        RangedAxis {
            name: self.name,
            spec: self.spec,
            groups: self.groups,
            computed_range,
        }
    }

    /// Computes the range from one trace column.
    #[must_use]
    pub fn compute_range<R: Record>(self, rows: &[R], column: &str) -> RangedAxis {
        self.into_ranged().extend_with(rows, column)
    }
}

/// Axis with a data-derived (or manual) range.
#[derive(Debug, Clone, PartialEq)]
pub struct RangedAxis {
    name: String,
    spec: AxisSpec,
    groups: CategoryGroups,
    computed_range: Option<AxisRange>,
}

impl RangedAxis {
    /// Extends the range with another trace column sharing this axis.
    ///
    /// Categorical axes intern new categories and cover `[-0.5, n - 0.5]` so
    /// each category sits on an integer. Other auto axes take the union of the
    /// previous range and the column's finite values.
    #[must_use]
    pub fn extend_with<R: Record>(mut self, rows: &[R], column: &str) -> Self {
        if let RangeSpec::Manual(range) = self.spec.range {
            self.computed_range = Some(range);
            if self.spec.axis_type.is_categorical() {
                ColumnReader::for_axis(column, self.spec.axis_type).read(rows, &mut self.groups);
            }
            return self;
        }

        let values = ColumnReader::for_axis(column, self.spec.axis_type).read(rows, &mut self.groups);
        if self.spec.axis_type.is_categorical() {
            self.computed_range = Some(category_range(&self.groups));
            trace!(
                axis = %self.name,
                column,
                groups = self.groups.len(),
                "categorical axis range"
            );
            return self;
        }

        let column_range = AxisRange::from_values(values.into_iter().flatten());
        self.computed_range = extend_range(self.computed_range, column_range);
        trace!(
            axis = %self.name,
            column,
            range = ?self.computed_range,
            "extended axis range"
        );
        self
    }

    /// Overrides an auto range, e.g. with the stacked category maximum.
    #[must_use]
    pub fn force_range(mut self, range: AxisRange) -> Self {
        if self.spec.range.is_auto() {
            self.computed_range = Some(range);
        }
        self
    }

    /// Widens an auto range so it contains the zero baseline of bars.
    #[must_use]
    pub fn include_zero(mut self) -> Self {
        if self.spec.range.is_auto() {
            if let Some(range) = self.computed_range {
                self.computed_range = Some(AxisRange::new(range.min.min(0.0), range.max.max(0.0)));
            }
        }
        self
    }

    /// Rounds the range out to nice numbers.
    ///
    /// Manual ranges, missing ranges and categorical axes are passed through
    /// unchanged and report `false`.
    #[must_use]
    pub fn round(self) -> (RoundedAxis, bool) {
        let Some(range) = self.computed_range else {
            return (self.into_unrounded(), false);
        };
        if !self.spec.range.is_auto() || self.spec.axis_type.is_categorical() {
            return (self.into_unrounded(), false);
        }

        let (rounded, step) = round_range(range, self.spec.axis_type);
        debug!(
            axis = %self.name,
            from = ?range,
            to = ?rounded,
            step,
            "rounded axis range"
        );
        (
            RoundedAxis {
                name: self.name,
                spec: self.spec,
                groups: self.groups,
                computed_range: Some(rounded),
                step: Some(step),
            },
            true,
        )
    }

    fn into_unrounded(self) -> RoundedAxis {
        RoundedAxis {
            name: self.name,
            spec: self.spec,
            groups: self.groups,
            computed_range: self.computed_range,
            step: None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn spec(&self) -> &AxisSpec {
        &self.spec
    }

    #[must_use]
    pub fn groups(&self) -> &CategoryGroups {
        &self.groups
    }

    #[must_use]
    pub fn computed_range(&self) -> Option<AxisRange> {
        self.computed_range
    }
}

/// Axis whose range has been rounded (or deliberately left as is).
#[derive(Debug, Clone, PartialEq)]
pub struct RoundedAxis {
    name: String,
    spec: AxisSpec,
    groups: CategoryGroups,
    computed_range: Option<AxisRange>,
    step: Option<f64>,
}

impl RoundedAxis {
    /// Generates tick positions for the computed range.
    ///
    /// A missing or inverted range is a recoverable error: the caller keeps
    /// the axis without ticks.
    pub fn compute_ticks(&self) -> ChartResult<Vec<f64>> {
        let Some(range) = self.computed_range else {
            return Err(ChartError::MissingRange {
                axis: self.name.clone(),
            });
        };
        if range.is_inverted() {
            return Err(ChartError::InvertedRange {
                axis: self.name.clone(),
                min: range.min,
                max: range.max,
            });
        }

        if self.spec.axis_type.is_categorical() {
            return Ok(category_ticks(range));
        }

        let ticks = match self.spec.tick_mode {
            TickMode::Manual => self.spec.ticks.clone(),
            TickMode::Months => {
                if self.spec.axis_type != AxisType::Time {
                    return Err(ChartError::UnsupportedTickMode {
                        axis_type: self.spec.axis_type.name().to_owned(),
                    });
                }
                month_ticks(range)
            }
            TickMode::Auto => {
                // Reusing the rounding step keeps both range ends on a tick.
                let step = self
                    .step
                    .unwrap_or_else(|| range_step(range, self.spec.axis_type));
                stepped_ticks(range, step)
            }
        };
        debug!(axis = %self.name, count = ticks.len(), "computed ticks");
        Ok(ticks)
    }

    /// Finishes the lifecycle with the given ticks.
    #[must_use]
    pub fn into_resolved(self, ticks: Vec<f64>) -> ResolvedAxis {
        ResolvedAxis {
            name: self.name,
            spec: self.spec,
            groups: self.groups,
            computed_range: self.computed_range,
            ticks,
        }
    }

    /// Computes ticks and resolves, returning the tick error alongside an
    /// axis without ticks when generation fails.
    #[must_use]
    pub fn resolve(self) -> (ResolvedAxis, Option<ChartError>) {
        match self.compute_ticks() {
            Ok(ticks) => (self.into_resolved(ticks), None),
            Err(err) => (self.into_resolved(Vec::new()), Some(err)),
        }
    }

    #[must_use]
    pub fn computed_range(&self) -> Option<AxisRange> {
        self.computed_range
    }

    /// Step used for rounding, when rounding happened.
    #[must_use]
    pub fn step(&self) -> Option<f64> {
        self.step
    }
}

/// Final axis state handed to geometry builders.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAxis {
    name: String,
    spec: AxisSpec,
    groups: CategoryGroups,
    computed_range: Option<AxisRange>,
    ticks: Vec<f64>,
}

impl ResolvedAxis {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn spec(&self) -> &AxisSpec {
        &self.spec
    }

    #[must_use]
    pub fn axis_type(&self) -> AxisType {
        self.spec.axis_type
    }

    #[must_use]
    pub fn groups(&self) -> &CategoryGroups {
        &self.groups
    }

    #[must_use]
    pub fn computed_range(&self) -> Option<AxisRange> {
        self.computed_range
    }

    /// Range used for transforms; axes without data fall back to `[0, 1]`.
    #[must_use]
    pub fn transform_range(&self) -> AxisRange {
        self.computed_range.unwrap_or(AxisRange::new(0.0, 1.0))
    }

    #[must_use]
    pub fn ticks(&self) -> &[f64] {
        &self.ticks
    }

    /// Label for `value` using an explicit format.
    #[must_use]
    pub fn value_title(&self, value: f64, format: Option<&str>) -> Option<String> {
        value_title(self.spec.axis_type, &self.groups, value, format)
    }

    #[must_use]
    pub fn tick_label(&self, value: f64) -> Option<String> {
        self.value_title(value, self.spec.tick_format.as_deref())
    }

    /// Hover labels prefer `hover_format` and fall back to `tick_format`.
    #[must_use]
    pub fn hover_label(&self, value: f64) -> Option<String> {
        let format = self
            .spec
            .hover_format
            .as_deref()
            .or(self.spec.tick_format.as_deref());
        self.value_title(value, format)
    }
}

/// Range centering each of the axis categories on an integer.
#[must_use]
pub fn category_range(groups: &CategoryGroups) -> AxisRange {
    AxisRange::new(-0.5, groups.len() as f64 - 0.5)
}

/// Snaps `range` out to multiples of its nice step; returns the step too.
#[must_use]
pub fn round_range(range: AxisRange, axis_type: AxisType) -> (AxisRange, f64) {
    let step = range_step(range, axis_type);
    let rounded = AxisRange::new(
        (range.min / step).floor() * step,
        (range.max / step).ceil() * step,
    );
    (rounded, step)
}

/// Rows of one trace feeding a stacked categorical axis.
#[derive(Debug, Clone, Copy)]
pub struct StackSource<'a, R> {
    pub rows: &'a [R],
    pub category_column: &'a str,
    pub value_column: &'a str,
}

/// Sums the values of every category across all traces sharing a stack.
///
/// A category is counted as soon as it appears; unparseable values add nothing.
#[must_use]
pub fn stack_group_sums<'a, R, I>(sources: I) -> IndexMap<String, f64>
where
    R: Record + 'a,
    I: IntoIterator<Item = StackSource<'a, R>>,
{
    let mut sums: IndexMap<String, f64> = IndexMap::new();
    for source in sources {
        for row in source.rows {
            let Some(category) = row
                .cell(source.category_column)
                .and_then(|cell| cell.category_key())
            else {
                continue;
            };
            let value = row
                .cell(source.value_column)
                .and_then(|cell| cell.as_number())
                .unwrap_or(0.0);
            *sums.entry(category).or_insert(0.0) += value;
        }
    }
    sums
}

/// Value-axis range for a stack: `[0, max(category sums)]`.
#[must_use]
pub fn stacked_range(sums: &IndexMap<String, f64>) -> AxisRange {
    let max = sums
        .values()
        .copied()
        .filter(|value| value.is_finite())
        .fold(None, |best: Option<f64>, value| {
            Some(best.map_or(value, |best| best.max(value)))
        })
        .unwrap_or(0.0);
    AxisRange::new(0.0, max)
}
