//! # Summaries
//!
//! Summary rows show accumulated column values under the data columns they
//! summarize. Columns a summary does not reference are merged into filler
//! cells: the leading filler carries the row title, later ones a dash.
//!
//! The table summary folds every record and prints once at the end. A
//! grouped summary folds runs of records sharing a compound key and prints
//! when its run ends, then starts over.
//!
//! The driver asks for a row's height before the record that completes it
//! has been folded. Values are therefore resolved from a projection: a
//! clone of the state with the pending record folded in. Projections are
//! memoized by how many records they account for, so the row printed later
//! shows exactly the text that was measured.

use std::collections::HashMap;

use log::debug;

use crate::error::Result;
use crate::format::{format_value, Formats};
use crate::layout::cells::{print_text, text_height};
use crate::layout::grouping::{format_key, same_key};
use crate::layout::header::Column;
use crate::model::{
    Align, FieldValue, GroupSpec, GroupedSummarySpec, Record, SummaryColumn, SummaryValues,
};
use crate::style::{Appearance, ResolvedOptions};
use crate::surface::Surface;
use crate::table::{State, Table};

const DEFAULT_SUMMARY_EMPTY: &str = "-";
const DEFAULT_JOINER: &str = ",";

/// What a summary cell shows.
#[derive(Debug, Clone, PartialEq)]
pub enum CellContent {
    /// The row title, in the leading filler.
    Title,
    /// A filler between referenced columns.
    Gap,
    Value { path: String, formats: Formats },
}

/// A summary cell spanning one or more table columns.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryCell {
    pub width: f64,
    pub align: Align,
    pub content: CellContent,
}

/// Lay summary cells out under `columns`. `declared` must already be in
/// column order.
pub fn prepare_summary_cells(
    declared: &[SummaryColumn],
    columns: &[Column],
    border: f64,
) -> Vec<SummaryCell> {
    let mut cells = Vec::new();
    let mut filler = (
        SummaryCell {
            width: 0.0,
            align: Align::Left,
            content: CellContent::Title,
        },
        0usize,
    );
    let mut pending = declared.iter().peekable();

    for column in columns {
        if let Some(summary) = pending.next_if(|s| s.path == column.path) {
            if filler.1 > 0 {
                cells.push(filler.0);
            }
            cells.push(SummaryCell {
                width: column.width,
                align: summary.align.unwrap_or(column.align),
                content: CellContent::Value {
                    path: column.path.clone(),
                    formats: summary
                        .formats
                        .clone()
                        .unwrap_or_else(|| column.formats.clone()),
                },
            });
            filler = (
                SummaryCell {
                    width: 0.0,
                    align: Align::Center,
                    content: CellContent::Gap,
                },
                0,
            );
            continue;
        }

        if filler.1 > 0 {
            filler.0.width += border;
        }
        filler.0.width += column.width;
        filler.1 += 1;
    }

    if filler.1 > 0 {
        cells.push(filler.0);
    }
    cells
}

/// Accumulator states for one summary row, one slot per referenced path.
#[derive(Debug, Clone)]
struct States(Vec<Option<State>>);

/// Cells, paths and appearance shared by both summary kinds.
struct SummaryRow<'t> {
    table: &'t Table,
    paths: Vec<&'t str>,
    cells: Vec<SummaryCell>,
    empty: String,
    appearance: Appearance,
}

impl<'t> SummaryRow<'t> {
    fn new(
        table: &'t Table,
        declared: &'t [SummaryColumn],
        columns: &[Column],
        empty: Option<&str>,
        appearance: &Appearance,
        opts: &ResolvedOptions,
    ) -> Self {
        Self {
            table,
            paths: declared.iter().map(|c| c.path.as_str()).collect(),
            cells: prepare_summary_cells(declared, columns, opts.border.width),
            empty: empty.unwrap_or(DEFAULT_SUMMARY_EMPTY).to_string(),
            appearance: appearance.clone(),
        }
    }

    fn empty_states(&self) -> States {
        States(vec![None; self.paths.len()])
    }

    /// Fold `record` into `states`. Paths without an accumulator keep no
    /// state.
    fn fold(&self, states: &mut States, record: &Record) -> Result<()> {
        for (path, slot) in self.paths.iter().zip(states.0.iter_mut()) {
            let value = record.resolve(path)?;
            if let Some(acc) = self.table.accumulator_for(path) {
                *slot = Some(acc.next(value, slot.take()));
            }
        }
        Ok(())
    }

    fn resolve(&self, states: &States) -> SummaryValues {
        let mut values = SummaryValues::new();
        for (path, slot) in self.paths.iter().zip(states.0.iter()) {
            if let Some(acc) = self.table.accumulator_for(path) {
                values.insert(path.to_string(), acc.resolve(slot.as_ref()));
            }
        }
        values
    }

    fn texts(&self, values: &SummaryValues, title: &str) -> Vec<String> {
        self.cells
            .iter()
            .map(|cell| match &cell.content {
                CellContent::Title => title.to_string(),
                CellContent::Gap => self.empty.clone(),
                CellContent::Value { path, formats } => format_value(
                    values.get(path).unwrap_or(&FieldValue::Null),
                    formats,
                    &self.empty,
                ),
            })
            .collect()
    }

    fn height<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        texts: &[String],
        opts: &ResolvedOptions,
    ) -> f64 {
        let mut height: f64 = 0.0;
        for (cell, text) in self.cells.iter().zip(texts) {
            height = height.max(text_height(
                surface,
                text,
                cell.width,
                &opts.margins,
                &self.appearance.font,
            ));
        }
        height + opts.border.width
    }

    #[allow(clippy::too_many_arguments)]
    fn draw<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        texts: &[String],
        x: f64,
        y: f64,
        height: f64,
        cell_height: f64,
        opts: &ResolvedOptions,
    ) {
        let border = opts.border.width;
        surface.fill_rect(x, y, opts.width, height, opts.border.color);

        let mut cx = x;
        for (cell, text) in self.cells.iter().zip(texts) {
            cx += border;
            surface.fill_rect(cx, y, cell.width, cell_height, self.appearance.background);
            print_text(
                surface,
                text,
                cx,
                y,
                cell.width,
                cell_height,
                cell.align,
                &opts.margins,
                &self.appearance,
            );
            cx += cell.width;
        }
    }
}

/// The whole-table summary row.
pub(crate) struct StaticSummary<'t> {
    row: SummaryRow<'t>,
    title: &'t str,
    overrides: &'t SummaryValues,
    states: States,
    folded: usize,
    memo: Option<(usize, Vec<String>)>,
}

impl<'t> StaticSummary<'t> {
    pub(crate) fn new(table: &'t Table, columns: &[Column], opts: &ResolvedOptions) -> Option<Self> {
        let spec = table.summary_spec()?;
        let row = SummaryRow::new(
            table,
            &spec.columns,
            columns,
            spec.empty.as_deref(),
            &opts.summary,
            opts,
        );
        let states = row.empty_states();
        Some(Self {
            row,
            title: &spec.title,
            overrides: &spec.values,
            states,
            folded: 0,
            memo: None,
        })
    }

    pub(crate) fn agg(&mut self, record: &Record) -> Result<()> {
        self.row.fold(&mut self.states, record)?;
        self.folded += 1;
        Ok(())
    }

    /// Cell texts with `pending` folded in, if given.
    fn texts(&mut self, pending: Option<&Record>) -> Result<&[String]> {
        let count = self.folded + usize::from(pending.is_some());
        if !matches!(&self.memo, Some((memo_count, _)) if *memo_count == count) {
            let values = match pending {
                Some(record) => {
                    let mut projected = self.states.clone();
                    self.row.fold(&mut projected, record)?;
                    self.row.resolve(&projected)
                }
                None => self.row.resolve(&self.states),
            };
            let mut values = values;
            values.extend(self.overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
            self.memo = Some((count, self.row.texts(&values, self.title)));
        }
        Ok(self.memo.as_ref().map(|(_, texts)| texts.as_slice()).unwrap_or(&[]))
    }

    /// Height of the row once `pending` has been folded.
    pub(crate) fn height<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        pending: Option<&Record>,
        opts: &ResolvedOptions,
    ) -> Result<f64> {
        let texts = self.texts(pending)?.to_vec();
        Ok(self.row.height(surface, &texts, opts))
    }

    pub(crate) fn print<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        x: f64,
        y: f64,
        height: f64,
        opts: &ResolvedOptions,
    ) -> Result<()> {
        let texts = self.texts(None)?.to_vec();
        let cell_height = (height - opts.border.width).max(0.0);
        self.row.draw(surface, &texts, x, y, height, cell_height, opts);
        Ok(())
    }
}

/// Accumulation over one run of records sharing a key.
#[derive(Debug, Clone)]
struct Run<'t> {
    first: &'t Record,
    count: usize,
    states: States,
}

impl Run<'_> {
    fn memo_key(&self) -> (usize, usize) {
        (self.first as *const Record as usize, self.count)
    }
}

/// One grouped summary row.
pub(crate) struct GroupedSummary<'t> {
    row: SummaryRow<'t>,
    title: &'t str,
    group_by: &'t [GroupSpec],
    overrides: &'t [SummaryValues],
    joiner: &'t str,
    run: Option<Run<'t>>,
    memo: HashMap<(usize, usize), Vec<String>>,
}

impl<'t> GroupedSummary<'t> {
    fn new(
        table: &'t Table,
        spec: &'t GroupedSummarySpec,
        columns: &[Column],
        opts: &ResolvedOptions,
    ) -> Self {
        Self {
            row: SummaryRow::new(
                table,
                &spec.columns,
                columns,
                spec.empty.as_deref(),
                &opts.grouped_summary,
                opts,
            ),
            title: &spec.title,
            group_by: &spec.group_by,
            overrides: &spec.overrides,
            joiner: spec.joiner.as_deref().unwrap_or(DEFAULT_JOINER),
            run: None,
            memo: HashMap::new(),
        }
    }

    /// The run `record` belongs to, not yet including it.
    fn run_for(&self, record: &'t Record) -> Result<Run<'t>> {
        if let Some(run) = &self.run {
            if same_key(self.group_by, Some(run.first), Some(record))? {
                return Ok(run.clone());
            }
        }
        Ok(Run {
            first: record,
            count: 0,
            states: self.row.empty_states(),
        })
    }

    fn agg(&mut self, record: &'t Record) -> Result<()> {
        let mut run = self.run_for(record)?;
        self.row.fold(&mut run.states, record)?;
        run.count += 1;
        self.run = Some(run);
        Ok(())
    }

    fn title_for(&self, first: &Record) -> Result<String> {
        let mut keys = Vec::with_capacity(self.group_by.len());
        for spec in self.group_by {
            keys.push(format_key(spec, first.resolve(&spec.path)?));
        }
        Ok(format!("{}: {}", self.title, keys.join(self.joiner)))
    }

    /// Static values for the run starting at `first`: the first override
    /// whose group fields all format like the run's key.
    fn overrides_for(&self, first: &Record) -> Result<Option<&'t SummaryValues>> {
        'candidates: for candidate in self.overrides {
            for spec in self.group_by {
                let formats = spec.formats.clone().unwrap_or_default();
                let wanted = format_value(first.resolve(&spec.path)?, &formats, "");
                let given = format_value(
                    candidate.get(&spec.path).unwrap_or(&FieldValue::Null),
                    &formats,
                    "",
                );
                if wanted != given {
                    continue 'candidates;
                }
            }
            return Ok(Some(candidate));
        }
        Ok(None)
    }

    fn texts_for(&mut self, run: &Run<'t>) -> Result<Vec<String>> {
        let key = run.memo_key();
        if let Some(texts) = self.memo.get(&key) {
            return Ok(texts.clone());
        }
        let mut values = self.row.resolve(&run.states);
        if let Some(overrides) = self.overrides_for(run.first)? {
            values.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        let title = self.title_for(run.first)?;
        let texts = self.row.texts(&values, &title);
        self.memo.insert(key, texts.clone());
        Ok(texts)
    }

    /// Height of the row due after `curr`, or zero while `after` continues
    /// the run. `curr` is not folded yet.
    fn height<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        curr: &'t Record,
        after: Option<&Record>,
        opts: &ResolvedOptions,
    ) -> Result<f64> {
        if after.is_some() && same_key(self.group_by, Some(curr), after)? {
            return Ok(0.0);
        }
        let mut projected = self.run_for(curr)?;
        self.row.fold(&mut projected.states, curr)?;
        projected.count += 1;

        let texts = self.texts_for(&projected)?;
        Ok(self.row.height(surface, &texts, opts))
    }

    /// Draw the row for the current run and close the run.
    #[allow(clippy::too_many_arguments)]
    fn print<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        x: f64,
        y: f64,
        height: f64,
        bottom_border: bool,
        opts: &ResolvedOptions,
    ) -> Result<()> {
        let Some(run) = self.run.take() else {
            return Ok(());
        };
        let texts = self.texts_for(&run)?;
        let cell_height =
            (height - if bottom_border { opts.border.width } else { 0.0 }).max(0.0);
        self.row.draw(surface, &texts, x, y, height, cell_height, opts);
        self.memo.clear();
        debug!("Grouped summary `{}` closed after {} records", self.title, run.count);
        Ok(())
    }

    /// Height of a run that was never printed.
    fn pending_height<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        opts: &ResolvedOptions,
    ) -> Result<f64> {
        let Some(run) = self.run.clone() else {
            return Ok(0.0);
        };
        let texts = self.texts_for(&run)?;
        Ok(self.row.height(surface, &texts, opts))
    }
}

/// Heights of the stacked grouped summaries due after one row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryHeights {
    pub all: f64,
    pub items: Vec<f64>,
    /// Index of the lowest row with a non-zero height.
    pub last: Option<usize>,
}

/// A summary row drawn by [`GroupedSummaries::print`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrintedSummary {
    pub index: usize,
    pub y: f64,
    pub height: f64,
}

/// Every grouped summary of a table, driven as one block.
pub(crate) struct GroupedSummaries<'t> {
    items: Vec<GroupedSummary<'t>>,
}

impl<'t> GroupedSummaries<'t> {
    pub(crate) fn new(table: &'t Table, columns: &[Column], opts: &ResolvedOptions) -> Self {
        Self {
            items: table
                .grouped_summary_specs()
                .iter()
                .map(|spec| GroupedSummary::new(table, spec, columns, opts))
                .collect(),
        }
    }

    pub(crate) fn agg(&mut self, record: &'t Record) -> Result<()> {
        for item in &mut self.items {
            item.agg(record)?;
        }
        Ok(())
    }

    /// Heights of the rows due after `curr` when `after` follows it.
    pub(crate) fn height<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        curr: Option<&'t Record>,
        after: Option<&Record>,
        opts: &ResolvedOptions,
    ) -> Result<SummaryHeights> {
        let mut heights = SummaryHeights::default();
        let Some(curr) = curr else {
            return Ok(heights);
        };
        for (i, item) in self.items.iter_mut().enumerate() {
            let h = item.height(surface, curr, after, opts)?;
            heights.all += h;
            heights.items.push(h);
            if h != 0.0 {
                heights.last = Some(i);
            }
        }
        Ok(heights)
    }

    /// Draw the rows with a non-zero height, stacked from `y`. Only the last
    /// of them may leave its bottom border open.
    pub(crate) fn print<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        x: f64,
        y: f64,
        heights: &SummaryHeights,
        bottom_border: bool,
        opts: &ResolvedOptions,
    ) -> Result<Vec<PrintedSummary>> {
        let mut printed = Vec::new();
        let mut y = y;
        for (i, item) in self.items.iter_mut().enumerate() {
            let height = heights.items.get(i).copied().unwrap_or(0.0);
            if height == 0.0 {
                continue;
            }
            let border = if heights.last == Some(i) { bottom_border } else { true };
            item.print(surface, x, y, height, border, opts)?;
            printed.push(PrintedSummary { index: i, y, height });
            y += height;
        }
        Ok(printed)
    }

    /// Close every run still open.
    pub(crate) fn flush<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        x: f64,
        y: f64,
        opts: &ResolvedOptions,
    ) -> Result<Vec<PrintedSummary>> {
        let mut heights = SummaryHeights::default();
        for (i, item) in self.items.iter_mut().enumerate() {
            let h = item.pending_height(surface, opts)?;
            heights.all += h;
            heights.items.push(h);
            if h != 0.0 {
                heights.last = Some(i);
            }
        }
        self.print(surface, x, y, &heights, true, opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::header;
    use crate::model::{Header, SummarySpec};
    use crate::style::TableOptions;
    use crate::surface::PageRecorder;
    use crate::table::{Average, Sum};

    fn headers() -> Vec<Header> {
        vec![
            Header::value("Name", "name"),
            Header::value("City", "city"),
            Header::value("Age", "age"),
            Header::value("Score", "score"),
        ]
    }

    fn person(name: &str, city: &str, age: i32, score: i32) -> Record {
        FieldValue::map([
            ("name", FieldValue::from(name)),
            ("city", FieldValue::from(city)),
            ("age", FieldValue::from(age)),
            ("score", FieldValue::from(score)),
        ])
    }

    fn setup(table: &Table) -> (PageRecorder, ResolvedOptions, Vec<Column>) {
        let mut surface = PageRecorder::default();
        let opts = TableOptions::default().resolve((0.0, 0.0), 406.0);
        let layout = header::prepare(&mut surface, table.headers(), &opts);
        (surface, opts, layout.columns)
    }

    #[test]
    fn cells_merge_unreferenced_columns() {
        let table = Table::new(headers(), Vec::<Record>::new());
        let (_, _, columns) = setup(&table);
        // 400 inner width, 3 borders between 4 columns.
        let width = columns[0].width;
        let cells = prepare_summary_cells(
            &[SummaryColumn::new("age").align(Align::Right)],
            &columns,
            3.0,
        );
        assert_eq!(cells.len(), 3);
        assert_eq!(cells[0].content, CellContent::Title);
        assert_eq!(cells[0].align, Align::Left);
        assert!((cells[0].width - (2.0 * width + 3.0)).abs() < 1e-9);
        assert_eq!(cells[1].align, Align::Right);
        assert_eq!(cells[2].content, CellContent::Gap);
        assert!((cells[2].width - width).abs() < 1e-9);
    }

    #[test]
    fn leading_referenced_column_drops_title_cell() {
        let table = Table::new(headers(), Vec::<Record>::new());
        let (_, _, columns) = setup(&table);
        let cells = prepare_summary_cells(&[SummaryColumn::new("name")], &columns, 3.0);
        assert!(matches!(cells[0].content, CellContent::Value { .. }));
        assert_eq!(cells[1].content, CellContent::Gap);
        assert_eq!(cells.len(), 2);
    }

    #[test]
    fn static_summary_projects_pending_record() {
        let records = vec![person("a", "X", 10, 1), person("b", "X", 20, 1), person("c", "Y", 30, 1)];
        let table = Table::new(headers(), records)
            .summary(SummarySpec::new("Total").column("age"))
            .accumulator("age", Average);
        let (mut surface, opts, columns) = setup(&table);
        let mut summary = StaticSummary::new(&table, &columns, &opts).unwrap();

        summary.agg(&table.records()[0]).unwrap();
        summary.agg(&table.records()[1]).unwrap();
        let projected = summary.texts(Some(&table.records()[2])).unwrap().to_vec();
        assert_eq!(projected, vec!["Total", "20", "-"]);

        summary.agg(&table.records()[2]).unwrap();
        let h = summary.height(&mut surface, None, &opts).unwrap();
        assert!(h > 0.0);
        assert_eq!(summary.texts(None).unwrap(), projected.as_slice());
    }

    #[test]
    fn static_override_wins() {
        let table = Table::new(headers(), vec![person("a", "X", 10, 5)])
            .summary(
                SummarySpec::new("Total")
                    .column("age")
                    .column("score")
                    .value("score", "n/a"),
            )
            .accumulator("age", Sum)
            .accumulator("score", Sum);
        let (_, opts, columns) = setup(&table);
        let mut summary = StaticSummary::new(&table, &columns, &opts).unwrap();
        summary.agg(&table.records()[0]).unwrap();
        assert_eq!(summary.texts(None).unwrap(), &["Total", "10", "n/a"]);
    }

    #[test]
    fn missing_accumulator_renders_empty_text() {
        let table = Table::new(headers(), vec![person("a", "X", 10, 5)])
            .summary(SummarySpec::new("Total").column("age").empty("--"));
        let (_, opts, columns) = setup(&table);
        let mut summary = StaticSummary::new(&table, &columns, &opts).unwrap();
        summary.agg(&table.records()[0]).unwrap();
        assert_eq!(summary.texts(None).unwrap(), &["Total", "--", "--"]);
    }

    #[test]
    fn zero_is_not_empty() {
        let table = Table::new(headers(), vec![person("a", "X", 0, 0)])
            .summary(SummarySpec::new("Total").column("age"))
            .accumulator("age", Sum);
        let (_, opts, columns) = setup(&table);
        let mut summary = StaticSummary::new(&table, &columns, &opts).unwrap();
        summary.agg(&table.records()[0]).unwrap();
        assert_eq!(summary.texts(None).unwrap()[1], "0");
    }

    fn run_grouped(table: &Table) -> Vec<Vec<String>> {
        let (mut surface, opts, columns) = setup(table);
        let spec = &table.grouped_summary_specs()[0];
        let mut grouped = GroupedSummary::new(table, spec, &columns, &opts);
        let records = table.records();
        let mut rows = Vec::new();
        for (i, record) in records.iter().enumerate() {
            let after = records.get(i + 1);
            let h = grouped.height(&mut surface, record, after, &opts).unwrap();
            grouped.agg(record).unwrap();
            if h > 0.0 {
                let run = grouped.run.clone().unwrap();
                rows.push(grouped.texts_for(&run).unwrap());
                grouped.print(&mut surface, 0.0, 0.0, h, true, &opts).unwrap();
            }
        }
        rows
    }

    #[test]
    fn runs_reset_at_key_boundaries() {
        let records = vec![
            person("a", "A", 1, 0),
            person("b", "A", 2, 0),
            person("c", "B", 4, 0),
            person("d", "A", 8, 0),
        ];
        let table = Table::new(headers(), records)
            .grouped_summary(GroupedSummarySpec::new("City", ["city"]).column("age"))
            .accumulator("age", Sum);
        let rows = run_grouped(&table);
        let sums: Vec<&str> = rows.iter().map(|r| r[1].as_str()).collect();
        assert_eq!(sums, vec!["3", "4", "8"]);
        assert_eq!(rows[0][0], "City: A");
        assert_eq!(rows[1][0], "City: B");
    }

    #[test]
    fn compound_title_and_override() {
        let records = vec![person("a", "A", 1, 0), person("b", "B", 1, 0)];
        let mut values = SummaryValues::new();
        values.insert("city".into(), "B".into());
        values.insert("name".into(), "b".into());
        values.insert("age".into(), "fixed".into());
        let table = Table::new(headers(), records)
            .grouped_summary(
                GroupedSummarySpec::new("Group", ["city", "name"])
                    .column("age")
                    .joiner(" / ")
                    .override_values(values),
            )
            .accumulator("age", Sum);
        let rows = run_grouped(&table);
        assert_eq!(rows[0][0], "Group: A / a");
        assert_eq!(rows[0][1], "1");
        assert_eq!(rows[1][0], "Group: B / b");
        assert_eq!(rows[1][1], "fixed");
    }

    #[test]
    fn heights_report_last_due_row() {
        let records = vec![person("a", "A", 1, 0), person("b", "A", 1, 0)];
        let table = Table::new(headers(), records)
            .grouped_summary(GroupedSummarySpec::new("By name", ["name"]).column("age"))
            .grouped_summary(GroupedSummarySpec::new("By city", ["city"]).column("age"));
        let (mut surface, opts, columns) = setup(&table);
        let mut all = GroupedSummaries::new(&table, &columns, &opts);
        let records = table.records();

        let first = all
            .height(&mut surface, Some(&records[0]), Some(&records[1]), &opts)
            .unwrap();
        assert!(first.items[0] > 0.0);
        assert_eq!(first.items[1], 0.0);
        assert_eq!(first.last, Some(0));

        let last = all
            .height(&mut surface, Some(&records[1]), None, &opts)
            .unwrap();
        assert_eq!(last.last, Some(1));
        assert!((last.all - last.items[0] - last.items[1]).abs() < 1e-9);

        assert_eq!(
            all.height(&mut surface, None, None, &opts).unwrap(),
            SummaryHeights::default()
        );
    }

    #[test]
    fn flush_closes_open_runs() {
        let records = vec![person("a", "A", 1, 0), person("b", "A", 2, 0)];
        let table = Table::new(headers(), records)
            .grouped_summary(GroupedSummarySpec::new("City", ["city"]).column("age"))
            .accumulator("age", Sum);
        let (mut surface, opts, columns) = setup(&table);
        let mut all = GroupedSummaries::new(&table, &columns, &opts);
        all.agg(&table.records()[0]).unwrap();
        all.agg(&table.records()[1]).unwrap();

        let printed = all.flush(&mut surface, 0.0, 100.0, &opts).unwrap();
        assert_eq!(printed.len(), 1);
        assert_eq!(printed[0].y, 100.0);
        assert!(surface.pages()[0].texts().any(|t| t == "3"));
        assert!(all.flush(&mut surface, 0.0, 0.0, &opts).unwrap().is_empty());
    }
}
