use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One scalar cell of a trace row.
///
/// JSON rows deserialize untagged: numbers, strings, booleans, and `null`
/// (which maps to `Empty`, the gap sentinel).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Bool(bool),
    #[default]
    Empty,
}

impl CellValue {
    /// Empty cells and blank strings count as missing values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(text) => text.is_empty(),
            Self::Number(_) | Self::Bool(_) => false,
        }
    }

    /// String form used for category assignment, `None` for empty cells.
    #[must_use]
    pub fn category_key(&self) -> Option<String> {
        match self {
            Self::Empty => None,
            Self::Text(text) if text.is_empty() => None,
            Self::Text(text) => Some(text.clone()),
            Self::Number(value) => Some(format_plain_number(*value)),
            Self::Bool(value) => Some(value.to_string()),
        }
    }

    /// Lenient numeric reading: numbers pass through, text is parsed.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            Self::Number(value) => *value,
            Self::Text(text) => text.trim().parse::<f64>().ok()?,
            Self::Bool(_) | Self::Empty => return None,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Empty, Into::into)
    }
}

/// Shortest round-trip form of a number, with `-0` printed as `0`.
#[must_use]
pub fn format_plain_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_owned();
    }
    value.to_string()
}

/// Keyed access to the cells of one data row.
///
/// Extraction is generic over this trait so hosts can feed their own row
/// types without copying them into [`Row`].
pub trait Record {
    fn cell(&self, column: &str) -> Option<&CellValue>;
}

/// Insertion-ordered row used by [`crate::core::TraceSpec`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(IndexMap<String, CellValue>);

impl Row {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<CellValue>) {
        self.0.insert(column.into(), value.into());
    }

    #[must_use]
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Record for Row {
    fn cell(&self, column: &str) -> Option<&CellValue> {
        self.0.get(column)
    }
}

impl Record for IndexMap<String, CellValue> {
    fn cell(&self, column: &str) -> Option<&CellValue> {
        self.get(column)
    }
}

impl Record for HashMap<String, CellValue> {
    fn cell(&self, column: &str) -> Option<&CellValue> {
        self.get(column)
    }
}

impl Record for BTreeMap<String, CellValue> {
    fn cell(&self, column: &str) -> Option<&CellValue> {
        self.get(column)
    }
}

impl<K, V> FromIterator<(K, V)> for Row
where
    K: Into<String>,
    V: Into<CellValue>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(column, value)| (column.into(), value.into()))
                .collect(),
        )
    }
}
