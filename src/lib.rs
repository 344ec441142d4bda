//! # Folio
//!
//! A page-native report table engine.
//!
//! A report table is a tree of column headers over a list of records, with
//! optional group banners between runs of records that share a key, summary
//! rows after each run, and a summary row for the whole table. Folio lays
//! such a table INTO pages: every row is placed with the page bottom as a
//! hard constraint, the header band is repeated on each new page, and a
//! group that continues across a break gets its banner again.
//!
//! Folio does not write PDF. It draws through the [`Surface`] trait, which a
//! backend implements over its own document type. [`PageRecorder`] is the
//! bundled surface: it measures text with real font metrics and records
//! draw commands per page.
//!
//! ## Architecture
//!
//! ```text
//! Records + headers (API/JSON)
//!       ↓
//!   [table]    — Table builder: grouping, summaries, accumulators
//!       ↓
//!   [style]    — Resolve options into per-band appearances
//!       ↓
//!   [layout]   — Header tree, banners, summaries, pagination
//!       ↓
//!   [surface]  — Measure and draw, page by page
//! ```

pub mod error;
pub mod font;
pub mod format;
pub mod layout;
pub mod model;
pub mod style;
pub mod surface;
pub mod table;
pub mod text;

pub use error::{Result, TableError};
pub use format::{Formats, NumberFormat};
pub use layout::{EmittedRow, LayoutEngine, RenderedTable, RowKind};
pub use model::{
    Align, FieldValue, GroupSpec, GroupedSummarySpec, Header, Record, SummaryColumn, SummarySpec,
    SummaryValues,
};
pub use style::TableOptions;
pub use surface::{PageConfig, PageRecorder, RecordedPage, Surface};
pub use table::Table;

/// Render a table described as JSON onto fresh default pages.
///
/// `headers` is a header tree array, `records` a record array and `options`
/// a [`TableOptions`] object. Returns the recorded pages.
pub fn render_json(headers: &str, records: &str, options: &str) -> Result<Vec<RecordedPage>> {
    let table = Table::from_json(headers, records)?;
    let options = TableOptions::from_json(options)?;
    let mut recorder = PageRecorder::default();
    table.render(&mut recorder, &options)?;
    Ok(recorder.into_pages())
}
