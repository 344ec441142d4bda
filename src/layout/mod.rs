//! # Table Layout Engine
//!
//! Takes a [`Table`] and lays it INTO pages on a [`Surface`].
//!
//! Records are walked with a two-record lookahead. Before a row is drawn,
//! the engine measures what the page must still hold: the row with its
//! group banner and any grouped summaries that close after it, plus the
//! next row with its own banner and summaries, plus the table summary when
//! the next row is the last. When that does not fit, the current row is
//! sized to end exactly at the page bottom, a new page is started, the
//! header band is drawn again and, if the group continues, so is its banner.
//!
//! Measurements and draws go through the surface in strict program order.
//! The engine tracks its own `y` and leaves the surface cursor below the
//! table when done.

pub(crate) mod cells;
pub(crate) mod grouping;
pub mod header;
pub mod page_break;
pub mod summary;

use log::{debug, trace};

use crate::error::Result;
use crate::model::Record;
use crate::style::{ResolvedOptions, TableOptions};
use crate::surface::Surface;
use crate::table::Table;

use grouping::Grouping;
use header::HeaderLayout;
use page_break::{decide_break, BreakDecision, Footprint};
use summary::{GroupedSummaries, PrintedSummary, StaticSummary};

/// The kind of an emitted row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Title,
    Header,
    /// Group banner, including continuation banners after a page break.
    Banner,
    /// Data row for the record at this index.
    Data(usize),
    /// The row shown when there are no records.
    Empty,
    /// Grouped summary row, by index of its declaration.
    GroupedSummary(usize),
    Summary,
}

/// One row drawn by a render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct EmittedRow {
    pub kind: RowKind,
    /// Page index relative to the page the table started on.
    pub page: usize,
    pub y: f64,
    pub height: f64,
    /// Sized to the page bottom instead of its content.
    pub clamped: bool,
}

/// What a render pass drew, in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderedTable {
    pub rows: Vec<EmittedRow>,
    /// Pages touched, the starting page included.
    pub pages: usize,
    /// `y` just below the last row.
    pub bottom: f64,
}

impl RenderedTable {
    pub fn rows_of(&self, kind: RowKind) -> impl Iterator<Item = &EmittedRow> {
        self.rows.iter().filter(move |r| r.kind == kind)
    }

    pub fn count(&self, kind: RowKind) -> usize {
        self.rows_of(kind).count()
    }
}

/// The main layout engine.
#[derive(Debug, Default, Clone, Copy)]
pub struct LayoutEngine;

/// Mutable state of one pass: where we are and what was drawn.
struct Pass<'a, S: Surface + ?Sized> {
    surface: &'a mut S,
    opts: &'a ResolvedOptions,
    header: &'a HeaderLayout,
    y: f64,
    page: usize,
    report: RenderedTable,
}

impl<S: Surface + ?Sized> Pass<'_, S> {
    fn emit(&mut self, kind: RowKind, height: f64, clamped: bool) {
        self.report.rows.push(EmittedRow {
            kind,
            page: self.page,
            y: self.y,
            height,
            clamped,
        });
        self.y += height;
    }

    fn emit_summaries(&mut self, printed: Vec<PrintedSummary>) {
        for row in printed {
            self.report.rows.push(EmittedRow {
                kind: RowKind::GroupedSummary(row.index),
                page: self.page,
                y: row.y,
                height: row.height,
                clamped: false,
            });
            self.y = row.y + row.height;
        }
    }

    fn new_page(&mut self) {
        self.surface.add_page();
        self.page += 1;
        let (_, top) = self.surface.cursor();
        self.y = top;
        self.surface.set_cursor(self.opts.x, top);
    }

    fn print_header(&mut self) {
        let height = self.header.band_height(self.opts.border.width);
        header::print_headers(self.surface, self.header, self.opts.x, self.y, self.opts);
        self.emit(RowKind::Header, height, false);
    }
}

impl LayoutEngine {
    pub fn new() -> Self {
        Self
    }

    /// Render `table` onto `surface`.
    pub fn render<S: Surface + ?Sized>(
        &self,
        table: &Table,
        surface: &mut S,
        options: &TableOptions,
    ) -> Result<RenderedTable> {
        let bounds = surface.content_bounds();
        let opts = options.resolve(surface.cursor(), bounds.content_width());
        let limit = bounds.bottom_limit();
        let header = header::prepare(surface, table.headers(), &opts);
        let header_height = header.band_height(opts.border.width);
        surface.set_cursor(opts.x, opts.y);

        let title_height = match table.title_text() {
            Some(title) => cells::title_height(surface, title, &opts),
            None => 0.0,
        };

        let mut pass = Pass {
            surface,
            opts: &opts,
            header: &header,
            y: opts.y,
            page: 0,
            report: RenderedTable::default(),
        };

        let mut records = table.records().iter();
        let Some(first) = records.next() else {
            render_empty(&mut pass, table, title_height, header_height, limit);
            return Ok(finish(pass));
        };
        let mut next = records.next();

        let group = table.group().map(Grouping::new);
        let mut summary = StaticSummary::new(table, &header.columns, &opts);
        let mut grouped = GroupedSummaries::new(table, &header.columns, &opts);

        let mut row_height = cells::row_height(pass.surface, first, &header.columns, &opts)?;
        let mut group_height = banner_height(&group, pass.surface, None, Some(first), &opts)?;
        let mut summary_heights = grouped.height(pass.surface, Some(first), next, &opts)?;

        if pass.y + title_height + header_height + row_height + group_height > limit {
            debug!("Table does not fit below y {:.2}, starting on a new page", pass.y);
            pass.new_page();
        }
        print_title(&mut pass, table, title_height);
        pass.print_header();

        let mut current = Some(first);
        let mut index = 0;
        while let Some(record) = current {
            if let Some(summary) = summary.as_mut() {
                summary.agg(record)?;
            }
            grouped.agg(record)?;

            let sub_next = records.next();
            let next_row_height = match next {
                Some(n) => cells::row_height(pass.surface, n, &header.columns, &opts)?,
                None => 0.0,
            };
            let next_group_height = banner_height(&group, pass.surface, Some(record), next, &opts)?;
            let next_summary_heights = grouped.height(pass.surface, next, sub_next, &opts)?;
            let closing = match (summary.as_mut(), sub_next) {
                (Some(summary), None) => summary.height(pass.surface, next, &opts)?,
                _ => 0.0,
            };

            let footprint = Footprint {
                banner: group_height,
                row: row_height,
                summaries: summary_heights.all,
                next_row: next_row_height,
                next_banner: next_group_height,
                next_summaries: next_summary_heights.all,
                closing,
            };
            let (height, fits) = match decide_break(pass.y, limit, &footprint) {
                BreakDecision::Place => (row_height, true),
                BreakDecision::BreakAfter { row_height } => {
                    trace!("Row {} clamped to {:.2}", index, row_height);
                    (row_height, false)
                }
            };

            if let Some(group) = &group {
                if group_height > 0.0 {
                    group.print(pass.surface, record, opts.x, pass.y, group_height, &opts)?;
                    pass.emit(RowKind::Banner, group_height, false);
                }
            }

            let bottom_border = opts.force_border_in_continue || summary_heights.all != 0.0 || fits;
            cells::print_row(
                pass.surface,
                record,
                &header.columns,
                opts.x,
                pass.y,
                height,
                bottom_border,
                &opts,
            )?;
            pass.emit(RowKind::Data(index), height, !fits);

            let printed = grouped.print(
                pass.surface,
                opts.x,
                pass.y,
                &summary_heights,
                opts.force_border_in_continue || fits,
                &opts,
            )?;
            pass.emit_summaries(printed);

            if !fits {
                debug!("Page break after row {} on page {}", index, pass.page + 1);
                pass.new_page();
                pass.print_header();
                if let Some(group) = &group {
                    if group.continues(record, next)? {
                        let height = group.height(pass.surface, None, Some(record), &opts)?;
                        group.print(pass.surface, record, opts.x, pass.y, height, &opts)?;
                        pass.emit(RowKind::Banner, height, false);
                    }
                }
            }

            current = next;
            next = sub_next;
            row_height = next_row_height;
            group_height = next_group_height;
            summary_heights = next_summary_heights;
            index += 1;
        }

        let printed = grouped.flush(pass.surface, opts.x, pass.y, &opts)?;
        pass.emit_summaries(printed);

        if let Some(summary) = summary.as_mut() {
            let height = summary.height(pass.surface, None, &opts)?;
            summary.print(pass.surface, opts.x, pass.y, height, &opts)?;
            pass.emit(RowKind::Summary, height, false);
        }

        Ok(finish(pass))
    }
}

fn banner_height<S: Surface + ?Sized>(
    group: &Option<Grouping<'_>>,
    surface: &mut S,
    prev: Option<&Record>,
    curr: Option<&Record>,
    opts: &ResolvedOptions,
) -> Result<f64> {
    match group {
        Some(group) => group.height(surface, prev, curr, opts),
        None => Ok(0.0),
    }
}

fn print_title<S: Surface + ?Sized>(pass: &mut Pass<'_, S>, table: &Table, height: f64) {
    if let Some(title) = table.title_text() {
        cells::print_title(pass.surface, title, pass.opts.x, pass.y, height, pass.opts);
        pass.emit(RowKind::Title, height, false);
    }
}

fn render_empty<S: Surface + ?Sized>(
    pass: &mut Pass<'_, S>,
    table: &Table,
    title_height: f64,
    header_height: f64,
    limit: f64,
) {
    let text = table.empty_text_str();
    let height = cells::banner_height(pass.surface, text, &pass.opts.cell, pass.opts);
    if pass.y + title_height + header_height + height > limit {
        pass.new_page();
    }
    print_title(pass, table, title_height);
    pass.print_header();

    debug!("No records, printing `{}`", text);
    cells::print_banner(
        pass.surface,
        text,
        pass.opts.x,
        pass.y,
        height,
        &pass.opts.cell,
        pass.opts,
    );
    pass.emit(RowKind::Empty, height, false);
}

fn finish<S: Surface + ?Sized>(mut pass: Pass<'_, S>) -> RenderedTable {
    pass.surface.set_cursor(pass.opts.x, pass.y);
    pass.report.pages = pass.page + 1;
    pass.report.bottom = pass.y;
    pass.report
}
