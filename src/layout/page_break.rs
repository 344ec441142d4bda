//! # Page Break Decisions
//!
//! Before a data row is drawn, the driver sums what the page must still
//! hold: the row with its banner and due summaries, and the next row with
//! its own. If that does not fit, the current row is stretched or squeezed
//! to end exactly at the page bottom and the table continues on a new page.

use log::{trace, warn};

/// Vertical space claimed around one data row.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Footprint {
    /// Banner before the current row.
    pub banner: f64,
    pub row: f64,
    /// Grouped summaries due after the current row.
    pub summaries: f64,
    pub next_row: f64,
    pub next_banner: f64,
    pub next_summaries: f64,
    /// The table summary, when it follows the next row.
    pub closing: f64,
}

impl Footprint {
    pub fn total(&self) -> f64 {
        self.banner
            + self.row
            + self.summaries
            + self.next_row
            + self.next_banner
            + self.next_summaries
            + self.closing
    }
}

/// What to do with the current row.
#[derive(Debug, Clone, PartialEq)]
pub enum BreakDecision {
    /// The row and what follows it fit; draw at natural height.
    Place,
    /// Draw the row at `row_height`, filling the page, then break.
    BreakAfter { row_height: f64 },
}

/// Decide whether the row at `y` and its successor fit above `limit`.
pub fn decide_break(y: f64, limit: f64, footprint: &Footprint) -> BreakDecision {
    let bottom = y + footprint.total();
    trace!("Footprint {:?} at y {:.2} reaches {:.2} of {:.2}", footprint, y, bottom, limit);

    if bottom <= limit {
        return BreakDecision::Place;
    }

    let remaining = limit - y - footprint.summaries - footprint.banner;
    if remaining < 0.0 {
        warn!("Row clamped to zero height: y {:.2} is {:.2}pt past the page bottom", y, -remaining);
    }
    BreakDecision::BreakAfter {
        row_height: remaining.max(0.0),
    }
}
