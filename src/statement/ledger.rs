//! The ledger table of the statement: the rows, their running balance, and how they are spread
//! over pages.

use crate::model::{Amount, Transaction};
use chrono::{DateTime, FixedOffset};

/// Where the table header goes on the first page, below the summary block.
pub(super) const FIRST_PAGE_TOP: f32 = 120.0;
/// Where the table header goes on every following page, below the reduced header.
pub(super) const CONTINUATION_TOP: f32 = 35.0;
/// Space taken by the table header.
pub(super) const TABLE_HEADER_HEIGHT: f32 = 10.0;
/// Height of a single row.
pub(super) const ROW_HEIGHT: f32 = 10.0;
/// A new page is started before any row whose baseline would be below this.
pub(super) const PAGE_BREAK_Y: f32 = 275.0;
/// Rows per page assumed when estimating the page count for the footer.
pub(super) const ESTIMATED_ROWS_PER_PAGE: usize = 18;

/// The amount column a row's amount goes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    /// Money out, shown as a magnitude.
    Debit(Amount),
    /// Money in, including zero amounts.
    Credit(Amount),
}

/// One line of the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerRow {
    pub(super) date: String,
    pub(super) description: String,
    pub(super) entry: Entry,
    pub(super) balance: Amount,
}

impl LedgerRow {
    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn entry(&self) -> Entry {
        self.entry
    }

    /// The running balance after this row.
    pub fn balance(&self) -> Amount {
        self.balance
    }
}

/// Builds ledger rows from transactions that are already in chronological order. The running
/// balance starts at zero and accumulates each signed amount. Dates are shown in `offset`.
pub fn ledger_rows(chronological: &[&Transaction], offset: FixedOffset) -> Vec<LedgerRow> {
    let mut running = Amount::ZERO;
    chronological
        .iter()
        .map(|t| {
            let amount = t.amount();
            running += amount;
            let entry = if amount.is_negative() {
                Entry::Debit(amount.abs())
            } else {
                Entry::Credit(amount)
            };
            LedgerRow {
                date: format_date(t.created_at(), offset),
                description: t.text().to_string(),
                entry,
                balance: running,
            }
        })
        .collect()
}

/// `YYYY/MM/DD` in the given offset.
pub(super) fn format_date(at: DateTime<FixedOffset>, offset: FixedOffset) -> String {
    at.with_timezone(&offset).format("%Y/%m/%d").to_string()
}

/// The number of pages printed in the footer. This is a fixed rows-per-page estimate and does
/// not follow the actual page breaks.
pub fn estimated_page_count(rows: usize) -> usize {
    rows.div_ceil(ESTIMATED_ROWS_PER_PAGE).max(1)
}

/// A row placed on a page at baseline `y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Index of the row across the whole ledger.
    pub row: usize,
    /// Zero-based page index.
    pub page: usize,
    /// Baseline of the row, in millimetres from the top of the page.
    pub y: f32,
}

/// Places `rows` rows on pages. The first page's table starts below the summary block; when the
/// cursor passes the break threshold a new page with the reduced header is started.
pub fn place_rows(rows: usize) -> Vec<Placement> {
    let mut page = 0;
    let mut y = FIRST_PAGE_TOP + TABLE_HEADER_HEIGHT;
    let mut placements = Vec::with_capacity(rows);
    for row in 0..rows {
        if y > PAGE_BREAK_Y {
            page += 1;
            y = CONTINUATION_TOP + TABLE_HEADER_HEIGHT;
        }
        placements.push(Placement { row, page, y });
        y += ROW_HEIGHT;
    }
    placements
}
