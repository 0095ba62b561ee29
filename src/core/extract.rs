//! Column extraction: turns trace rows into numeric sequences for one axis.
//!
//! The value kind of a column is fixed by the axis it is bound to and resolved
//! once per read pass through [`ColumnReader`].

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use super::axis::AxisType;
use super::data::{CellValue, Record};

const NAIVE_DATE_TIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const NAIVE_DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// How cells of a column are coerced to numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueKind {
    Numeric,
    /// Index of the cell's category in the axis groups.
    Categorical,
    /// Epoch milliseconds.
    Temporal,
}

impl From<AxisType> for ValueKind {
    fn from(axis_type: AxisType) -> Self {
        match axis_type {
            AxisType::Number => Self::Numeric,
            AxisType::Group | AxisType::Stack => Self::Categorical,
            AxisType::Time => Self::Temporal,
        }
    }
}

/// Ordered set of category labels; a label's index is its position.
///
/// Labels are only ever appended, so indices handed out earlier stay valid.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryGroups(IndexSet<String>);

impl CategoryGroups {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the index of `label`, appending it when unseen.
    pub fn intern(&mut self, label: String) -> usize {
        self.0.insert_full(label).0
    }

    #[must_use]
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.0.get_index_of(label)
    }

    #[must_use]
    pub fn label(&self, index: usize) -> Option<&str> {
        self.0.get_index(index).map(String::as_str)
    }

    pub fn extend<I>(&mut self, labels: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.0.extend(labels);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for CategoryGroups {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Reads one column with a value kind resolved up front.
#[derive(Debug, Clone, Copy)]
pub struct ColumnReader<'a> {
    column: &'a str,
    kind: ValueKind,
}

impl<'a> ColumnReader<'a> {
    #[must_use]
    pub fn new(column: &'a str, kind: ValueKind) -> Self {
        Self { column, kind }
    }

    #[must_use]
    pub fn for_axis(column: &'a str, axis_type: AxisType) -> Self {
        Self::new(column, ValueKind::from(axis_type))
    }

    #[must_use]
    pub fn kind(self) -> ValueKind {
        self.kind
    }

    /// Reads every row; categorical columns intern new labels into `groups`.
    pub fn read<R: Record>(self, rows: &[R], groups: &mut CategoryGroups) -> Vec<Option<f64>> {
        rows.iter()
            .map(|row| self.read_cell(row.cell(self.column), groups))
            .collect()
    }

    /// Reads every row against frozen groups; unknown labels become gaps.
    #[must_use]
    pub fn read_frozen<R: Record>(self, rows: &[R], groups: &CategoryGroups) -> Vec<Option<f64>> {
        rows.iter()
            .map(|row| {
                let cell = row.cell(self.column)?;
                match self.kind {
                    ValueKind::Categorical => cell
                        .category_key()
                        .and_then(|label| groups.index_of(&label))
                        .map(|index| index as f64),
                    ValueKind::Numeric => cell.as_number(),
                    ValueKind::Temporal => temporal_value(cell),
                }
            })
            .collect()
    }

    fn read_cell(self, cell: Option<&CellValue>, groups: &mut CategoryGroups) -> Option<f64> {
        let cell = cell?;
        match self.kind {
            ValueKind::Categorical => cell
                .category_key()
                .map(|label| groups.intern(label) as f64),
            ValueKind::Numeric => cell.as_number(),
            ValueKind::Temporal => temporal_value(cell),
        }
    }
}

/// Extracts one column as numbers for an axis of the given type.
///
/// Categorical axes reuse and extend `groups`; other axes ignore it.
pub fn extract_numbers<R: Record>(
    axis_type: AxisType,
    groups: &mut CategoryGroups,
    rows: &[R],
    column: &str,
) -> Vec<Option<f64>> {
    ColumnReader::for_axis(column, axis_type).read(rows, groups)
}

/// Unique non-empty string forms of a column, in first-seen order.
#[must_use]
pub fn extract_categories<R: Record>(rows: &[R], column: &str) -> IndexSet<String> {
    rows.iter()
        .filter_map(|row| row.cell(column).and_then(CellValue::category_key))
        .collect()
}

fn temporal_value(cell: &CellValue) -> Option<f64> {
    match cell {
        CellValue::Number(value) => value.is_finite().then_some(*value),
        CellValue::Text(text) => parse_timestamp_millis(text),
        CellValue::Bool(_) | CellValue::Empty => None,
    }
}

/// Parses a calendar timestamp into epoch milliseconds.
///
/// Accepts RFC 3339 and common ISO-like forms; timestamps without an offset
/// are read as UTC.
#[must_use]
pub fn parse_timestamp_millis(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.timestamp_millis() as f64);
    }

    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc().timestamp_millis() as f64);
        }
    }

    for format in NAIVE_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            let midnight = date.and_hms_opt(0, 0, 0)?;
            return Some(midnight.and_utc().timestamp_millis() as f64);
        }
    }

    None
}

/// Converts epoch milliseconds back to a UTC timestamp.
#[must_use]
pub fn millis_to_datetime(millis: f64) -> Option<DateTime<Utc>> {
    if !millis.is_finite() {
        return None;
    }
    DateTime::<Utc>::from_timestamp_millis(millis.round() as i64)
}
