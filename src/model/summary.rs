//! Grouping and summary row declarations.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::format::Formats;
use crate::model::{Align, FieldValue};

/// A grouping key: a field path plus how to format it. Keys are compared
/// by their formatted text, never by raw value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "GroupSpecInput")]
pub struct GroupSpec {
    pub path: String,
    /// `None` inherits the formats of the column bound to `path`.
    pub formats: Option<Formats>,
    pub empty: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum GroupSpecInput {
    Path(String),
    Spec {
        value: String,
        #[serde(default)]
        formats: Option<Formats>,
        #[serde(default)]
        empty: Option<String>,
    },
}

impl From<GroupSpecInput> for GroupSpec {
    fn from(input: GroupSpecInput) -> Self {
        match input {
            GroupSpecInput::Path(path) => GroupSpec::new(&path),
            GroupSpecInput::Spec {
                value,
                formats,
                empty,
            } => GroupSpec {
                path: value,
                formats,
                empty,
            },
        }
    }
}

impl GroupSpec {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            formats: None,
            empty: None,
        }
    }

    pub fn formats(mut self, formats: Formats) -> Self {
        self.formats = Some(formats);
        self
    }

    pub fn empty(mut self, text: &str) -> Self {
        self.empty = Some(text.to_string());
        self
    }
}

impl From<&str> for GroupSpec {
    fn from(path: &str) -> Self {
        GroupSpec::new(path)
    }
}

/// A column participating in a summary row, optionally overriding the
/// table column's alignment and formats.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "SummaryColumnInput")]
pub struct SummaryColumn {
    pub path: String,
    pub align: Option<Align>,
    pub formats: Option<Formats>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SummaryColumnInput {
    Path(String),
    Column {
        value: String,
        #[serde(default)]
        align: Option<Align>,
        #[serde(default)]
        formats: Option<Formats>,
    },
}

impl From<SummaryColumnInput> for SummaryColumn {
    fn from(input: SummaryColumnInput) -> Self {
        match input {
            SummaryColumnInput::Path(path) => SummaryColumn::new(&path),
            SummaryColumnInput::Column {
                value,
                align,
                formats,
            } => SummaryColumn {
                path: value,
                align,
                formats,
            },
        }
    }
}

impl SummaryColumn {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            align: None,
            formats: None,
        }
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = Some(align);
        self
    }

    pub fn formats(mut self, formats: Formats) -> Self {
        self.formats = Some(formats);
        self
    }
}

impl From<&str> for SummaryColumn {
    fn from(path: &str) -> Self {
        SummaryColumn::new(path)
    }
}

/// Override values keyed by full field path.
pub type SummaryValues = BTreeMap<String, FieldValue>;

/// The whole-table summary row, printed once after the last record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarySpec {
    pub title: String,
    #[serde(rename = "headers")]
    pub columns: Vec<SummaryColumn>,
    /// Static values that win over accumulated ones.
    #[serde(rename = "value", default)]
    pub values: SummaryValues,
    #[serde(default)]
    pub empty: Option<String>,
}

impl SummarySpec {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Default::default()
        }
    }

    pub fn column(mut self, column: impl Into<SummaryColumn>) -> Self {
        self.columns.push(column.into());
        self
    }

    pub fn value(mut self, path: &str, value: impl Into<FieldValue>) -> Self {
        self.values.insert(path.to_string(), value.into());
        self
    }

    pub fn empty(mut self, text: &str) -> Self {
        self.empty = Some(text.to_string());
        self
    }
}

/// A summary row emitted at the end of every run of records sharing the
/// compound key formed by `group_by`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedSummarySpec {
    pub title: String,
    #[serde(rename = "grouped")]
    pub group_by: Vec<GroupSpec>,
    #[serde(rename = "headers")]
    pub columns: Vec<SummaryColumn>,
    /// Per-key overrides. An entry applies to a run when every group path
    /// in it formats the same as the run's key.
    #[serde(rename = "value", default)]
    pub overrides: Vec<SummaryValues>,
    #[serde(default)]
    pub empty: Option<String>,
    /// Separator between key values in the row title.
    #[serde(default)]
    pub joiner: Option<String>,
}

impl GroupedSummarySpec {
    pub fn new<G, I>(title: &str, group_by: I) -> Self
    where
        G: Into<GroupSpec>,
        I: IntoIterator<Item = G>,
    {
        Self {
            title: title.to_string(),
            group_by: group_by.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn column(mut self, column: impl Into<SummaryColumn>) -> Self {
        self.columns.push(column.into());
        self
    }

    pub fn override_values(mut self, values: SummaryValues) -> Self {
        self.overrides.push(values);
        self
    }

    pub fn empty(mut self, text: &str) -> Self {
        self.empty = Some(text.to_string());
        self
    }

    pub fn joiner(mut self, joiner: &str) -> Self {
        self.joiner = Some(joiner.to_string());
        self
    }
}
