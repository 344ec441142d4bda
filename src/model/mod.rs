//! # Table Model
//!
//! The input representation for the table engine: records to print, the
//! declared header tree, and grouping/summary declarations. Everything here
//! is plain data that can be built in code or deserialized from JSON.
//!
//! Records are duck-typed (nested maps and sequences) so the header tree is
//! what pins each displayed path down. Layout turns these declarations into
//! prepared forms with concrete sizes at the start of every render pass.

pub mod header;
pub mod record;
pub mod summary;

pub use header::{flatten, Align, GroupHeader, Header, Transform, ValueHeader};
pub use record::{FieldValue, Record};
pub use summary::{GroupSpec, GroupedSummarySpec, SummaryColumn, SummarySpec, SummaryValues};
