//! # Records
//!
//! A record is an arbitrarily nested structure of maps and sequences with
//! scalar leaves. Columns, group keys and summaries address fields with
//! dot-separated paths such as `"owner.age"` or `"tags.0"`.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::error::{Result, TableError};

/// A value inside a record. Leaves are scalars, inner nodes are maps or
/// sequences.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(from = "serde_json::Value")]
pub enum FieldValue {
    /// Absent value. Missing keys resolve to this.
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Date(NaiveDateTime),
    List(Vec<FieldValue>),
    Map(BTreeMap<String, FieldValue>),
}

/// Records are field values, usually maps.
pub type Record = FieldValue;

impl FieldValue {
    /// Build a map record from `(key, value)` pairs.
    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        FieldValue::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    fn kind_name(&self) -> &'static str {
        match self {
            FieldValue::Null => "absent",
            FieldValue::Bool(_) => "a boolean",
            FieldValue::Number(_) => "a number",
            FieldValue::Text(_) => "a string",
            FieldValue::Date(_) => "a date",
            FieldValue::List(_) => "a sequence",
            FieldValue::Map(_) => "a map",
        }
    }

    /// Resolve a dot-separated path against this record.
    ///
    /// Segments that parse as non-negative integers index sequences; every
    /// other segment is a map key. A missing final key yields
    /// [`FieldValue::Null`]. Stepping through an absent or scalar
    /// intermediate is an error, as is an empty path or segment.
    pub fn resolve(&self, path: &str) -> Result<&FieldValue> {
        if path.is_empty() {
            return Err(TableError::key(path, "empty path"));
        }

        let mut current = self;
        let mut walked = 0;
        for segment in path.split('.') {
            if segment.is_empty() {
                return Err(TableError::key(path, "empty path segment"));
            }

            current = match current {
                FieldValue::Map(map) => map.get(segment).unwrap_or(&NULL),
                FieldValue::List(items) => {
                    let index: usize = segment.parse().map_err(|_| {
                        TableError::key(
                            path,
                            format!("`{}` cannot index a sequence", segment),
                        )
                    })?;
                    items.get(index).unwrap_or(&NULL)
                }
                other => {
                    let parent = if walked == 0 {
                        "record".to_string()
                    } else {
                        format!("`{}`", &path[..walked - 1])
                    };
                    return Err(TableError::key(
                        path,
                        format!("{} is {}, not a map or sequence", parent, other.kind_name()),
                    ));
                }
            };
            walked += segment.len() + 1;
        }

        Ok(current)
    }
}

static NULL: FieldValue = FieldValue::Null;

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => FieldValue::Null,
            serde_json::Value::Bool(b) => FieldValue::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map_or(FieldValue::Null, FieldValue::Number),
            serde_json::Value::String(s) => FieldValue::Text(s),
            serde_json::Value::Array(items) => {
                FieldValue::List(items.into_iter().map(FieldValue::from).collect())
            }
            serde_json::Value::Object(map) => {
                FieldValue::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Number(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Number(v as f64)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Number(v as f64)
    }
}

impl From<u32> for FieldValue {
    fn from(v: u32) -> Self {
        FieldValue::Number(v as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(v: NaiveDateTime) -> Self {
        FieldValue::Date(v)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(FieldValue::Null, Into::into)
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(v: Vec<T>) -> Self {
        FieldValue::List(v.into_iter().map(Into::into).collect())
    }
}
