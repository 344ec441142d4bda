//! Header tree declarations.
//!
//! A header is either bound to a value path (a column) or groups child
//! headers under a shared title. Only value headers are leaves, so
//! flattening a tree yields the table's columns in left-to-right order.

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use crate::format::Formats;
use crate::model::FieldValue;

/// Horizontal text alignment inside a cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    #[default]
    Center,
    Right,
}

/// A value transform applied to a resolved field before formatting.
#[derive(Clone)]
pub struct Transform(Arc<dyn Fn(&FieldValue) -> FieldValue + Send + Sync>);

impl Transform {
    pub fn new(f: impl Fn(&FieldValue) -> FieldValue + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn apply(&self, value: &FieldValue) -> FieldValue {
        (self.0)(value)
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Transform(..)")
    }
}

/// A node of the declared header tree.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Header {
    Group(GroupHeader),
    Value(ValueHeader),
}

/// A leaf header bound to a field path.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueHeader {
    pub title: String,
    /// Dot path of the displayed field.
    #[serde(rename = "value")]
    pub path: String,
    /// Fixed width in points. `None` (or zero) means auto.
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub align: Option<Align>,
    #[serde(default)]
    pub formats: Option<Formats>,
    /// Text shown for absent or empty values.
    #[serde(default)]
    pub empty: Option<String>,
    #[serde(skip)]
    pub transform: Option<Transform>,
}

/// A header grouping child headers under one title.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupHeader {
    pub title: String,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub align: Option<Align>,
    pub headers: Vec<Header>,
}

impl Header {
    /// A column header bound to `path`.
    pub fn value(title: &str, path: &str) -> Self {
        Header::Value(ValueHeader {
            title: title.to_string(),
            path: path.to_string(),
            width: None,
            align: None,
            formats: None,
            empty: None,
            transform: None,
        })
    }

    /// A group header over `headers`.
    pub fn group(title: &str, headers: Vec<Header>) -> Self {
        Header::Group(GroupHeader {
            title: title.to_string(),
            width: None,
            align: None,
            headers,
        })
    }

    pub fn width(mut self, width: f64) -> Self {
        match &mut self {
            Header::Value(h) => h.width = Some(width),
            Header::Group(h) => h.width = Some(width),
        }
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        match &mut self {
            Header::Value(h) => h.align = Some(align),
            Header::Group(h) => h.align = Some(align),
        }
        self
    }

    /// Set the column's formats. No effect on group headers.
    pub fn formats(mut self, formats: Formats) -> Self {
        if let Header::Value(h) = &mut self {
            h.formats = Some(formats);
        }
        self
    }

    /// Set the column's empty text. No effect on group headers.
    pub fn empty(mut self, text: &str) -> Self {
        if let Header::Value(h) = &mut self {
            h.empty = Some(text.to_string());
        }
        self
    }

    /// Set the column's value transform. No effect on group headers.
    pub fn transform(
        mut self,
        f: impl Fn(&FieldValue) -> FieldValue + Send + Sync + 'static,
    ) -> Self {
        if let Header::Value(h) = &mut self {
            h.transform = Some(Transform::new(f));
        }
        self
    }

    pub fn title(&self) -> &str {
        match self {
            Header::Value(h) => &h.title,
            Header::Group(h) => &h.title,
        }
    }

    /// Declared width; zero counts as auto.
    pub fn fixed_width(&self) -> Option<f64> {
        let width = match self {
            Header::Value(h) => h.width,
            Header::Group(h) => h.width,
        };
        width.filter(|w| *w > 0.0)
    }

    /// Number of header levels nested below this node.
    pub fn deep_levels(&self) -> usize {
        match self {
            Header::Value(_) => 0,
            Header::Group(g) => g
                .headers
                .iter()
                .map(|h| h.deep_levels() + 1)
                .max()
                .unwrap_or(1),
        }
    }
}

/// Flatten a header tree into its columns, in document order.
pub fn flatten(headers: &[Header]) -> Vec<&ValueHeader> {
    let mut columns = Vec::new();
    collect_columns(headers, &mut columns);
    columns
}

fn collect_columns<'a>(headers: &'a [Header], out: &mut Vec<&'a ValueHeader>) {
    for header in headers {
        match header {
            Header::Value(v) => out.push(v),
            Header::Group(g) => collect_columns(&g.headers, out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner_tree() -> Vec<Header> {
        vec![
            Header::value("#", "i").width(30.0),
            Header::value("Name", "name"),
            Header::group(
                "Owner",
                vec![
                    Header::value("Name", "owner.name"),
                    Header::group("Contact", vec![Header::value("Mail", "owner.mail")]),
                    Header::value("Age", "owner.age").width(40.0),
                ],
            ),
        ]
    }

    #[test]
    fn flatten_keeps_document_order() {
        let tree = owner_tree();
        let paths: Vec<&str> = flatten(&tree).iter().map(|c| c.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["i", "name", "owner.name", "owner.mail", "owner.age"]
        );
    }

    #[test]
    fn deep_levels_counts_nesting_below_node() {
        let tree = owner_tree();
        assert_eq!(tree[0].deep_levels(), 0);
        assert_eq!(tree[2].deep_levels(), 2);
        assert_eq!(Header::group("Empty", vec![]).deep_levels(), 1);
    }

    #[test]
    fn zero_width_is_auto() {
        assert_eq!(Header::value("A", "a").width(0.0).fixed_width(), None);
        assert_eq!(Header::value("A", "a").width(12.0).fixed_width(), Some(12.0));
    }

    #[test]
    fn deserializes_nested_headers() {
        let json = r##"[
            { "title": "#", "value": "i", "width": 30 },
            { "title": "Owner", "headers": [
                { "title": "Age", "value": "owner.age", "align": "right",
                  "formats": { "number": { "fixed": 1 } } }
            ] }
        ]"##;
        let tree: Vec<Header> = serde_json::from_str(json).unwrap();
        assert_eq!(tree[0].title(), "#");
        assert!(matches!(tree[1], Header::Group(_)));
        let columns = flatten(&tree);
        assert_eq!(columns[1].align, Some(Align::Right));
        assert_eq!(columns[1].formats, Some(Formats::fixed(1)));
    }
}
