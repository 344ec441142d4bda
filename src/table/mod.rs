//! # Table
//!
//! The user-facing description of a report table: records, the header
//! tree, an optional grouping key, summaries and the accumulators that feed
//! them. Configuration is fluent and consuming; once built, a table is only
//! read by the layout engine.

pub mod accumulate;

use std::collections::HashMap;

use crate::error::Result;
use crate::layout::{LayoutEngine, RenderedTable};
use crate::model::{
    flatten, FieldValue, GroupSpec, GroupedSummarySpec, Header, Record, SummarySpec, ValueHeader,
};
use crate::style::TableOptions;
use crate::surface::Surface;

pub use accumulate::{Accumulator, Average, Count, FnAccumulator, Max, Min, State, Sum};
pub(crate) use accumulate::DynAccumulator;

use accumulate::Erased;

const DEFAULT_EMPTY_TEXT: &str = "No Data";

/// A report table ready to be rendered onto a [`Surface`].
pub struct Table {
    records: Vec<Record>,
    headers: Vec<Header>,
    group: Option<GroupSpec>,
    summary: Option<SummarySpec>,
    grouped_summaries: Vec<GroupedSummarySpec>,
    accumulators: HashMap<String, Box<dyn DynAccumulator>>,
    empty_text: String,
    title: Option<String>,
}

impl Table {
    pub fn new<R, I>(headers: Vec<Header>, records: I) -> Self
    where
        R: Into<Record>,
        I: IntoIterator<Item = R>,
    {
        Self {
            records: records.into_iter().map(Into::into).collect(),
            headers,
            group: None,
            summary: None,
            grouped_summaries: Vec::new(),
            accumulators: HashMap::new(),
            empty_text: DEFAULT_EMPTY_TEXT.to_string(),
            title: None,
        }
    }

    /// Build a table from a JSON header array and a JSON record array.
    pub fn from_json(headers: &str, records: &str) -> Result<Self> {
        let headers: Vec<Header> = serde_json::from_str(headers)?;
        let records: Vec<FieldValue> = serde_json::from_str(records)?;
        Ok(Self::new(headers, records))
    }

    /// Separate runs of records with a banner row showing the key. A bare
    /// path takes the formats and empty text of the column bound to it.
    pub fn group_by(mut self, group: impl Into<GroupSpec>) -> Self {
        let mut group = group.into();
        if let Some(column) = self.column(&group.path) {
            if group.formats.is_none() {
                group.formats = column.formats.clone();
            }
            if group.empty.is_none() {
                group.empty = column.empty.clone();
            }
        }
        self.group = Some(group);
        self
    }

    /// Set the whole-table summary row.
    pub fn summary(mut self, mut summary: SummarySpec) -> Self {
        summary.columns = self.merge_columns(summary.columns, |c| &c.path);
        self.summary = Some(summary);
        self
    }

    /// Append a per-run summary row.
    pub fn grouped_summary(mut self, mut summary: GroupedSummarySpec) -> Self {
        summary.columns = self.merge_columns(summary.columns, |c| &c.path);
        self.grouped_summaries.push(summary);
        self
    }

    /// Register the accumulator for column `path`, replacing any previous
    /// one.
    pub fn accumulator<A>(mut self, path: &str, accumulator: A) -> Self
    where
        A: Accumulator + 'static,
    {
        self.accumulators
            .insert(path.to_string(), Box::new(Erased(accumulator)));
        self
    }

    /// Register a closure accumulator for column `path`.
    pub fn aggregate<S, N, R>(self, path: &str, next: N, resolve: R) -> Self
    where
        S: Clone + 'static,
        N: Fn(&FieldValue, Option<S>) -> S + 'static,
        R: Fn(Option<&S>) -> FieldValue + 'static,
    {
        self.accumulator(path, FnAccumulator::new(next, resolve))
    }

    /// Text of the single row shown when there are no records.
    pub fn empty_text(mut self, text: &str) -> Self {
        self.empty_text = text.to_string();
        self
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    /// Lay the table out onto `surface`, starting at its cursor unless the
    /// options pin a position.
    pub fn render<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        options: &TableOptions,
    ) -> Result<RenderedTable> {
        LayoutEngine::new().render(self, surface, options)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    pub fn columns(&self) -> Vec<&ValueHeader> {
        flatten(&self.headers)
    }

    pub fn group(&self) -> Option<&GroupSpec> {
        self.group.as_ref()
    }

    pub fn summary_spec(&self) -> Option<&SummarySpec> {
        self.summary.as_ref()
    }

    pub fn grouped_summary_specs(&self) -> &[GroupedSummarySpec] {
        &self.grouped_summaries
    }

    pub fn empty_text_str(&self) -> &str {
        &self.empty_text
    }

    pub fn title_text(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub(crate) fn accumulator_for(&self, path: &str) -> Option<&dyn DynAccumulator> {
        self.accumulators.get(path).map(|a| &**a)
    }

    fn column(&self, path: &str) -> Option<&ValueHeader> {
        self.columns().into_iter().find(|c| c.path == path)
    }

    /// Keep only entries naming a real column, in column order.
    fn merge_columns<T>(&self, declared: Vec<T>, path_of: impl Fn(&T) -> &String) -> Vec<T> {
        let mut declared: Vec<Option<T>> = declared.into_iter().map(Some).collect();
        let mut merged = Vec::new();
        for column in self.columns() {
            let found = declared
                .iter_mut()
                .find(|d| d.as_ref().is_some_and(|d| *path_of(d) == column.path));
            if let Some(entry) = found.and_then(Option::take) {
                merged.push(entry);
            }
        }
        merged
    }
}
