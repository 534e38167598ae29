use crate::api::{self, Mode};
use crate::commands::Out;
use crate::tracker::{TableRow, Tracker};
use crate::{Config, Result};
use chrono::FixedOffset;
use std::fmt::Write;

/// Fetches the transactions and formats them as a table, oldest first.
pub async fn list(config: Config, mode: Mode, offset: FixedOffset) -> Result<Out<Vec<TableRow>>> {
    let tracker = Tracker::load(api::store(&config, mode).await?).await?;
    let rows = tracker.table(offset);
    if rows.is_empty() {
        return Ok(Out::new("There are no transactions", rows));
    }
    Ok(Out::new(format_table(&rows), rows))
}

fn format_table(rows: &[TableRow]) -> String {
    let width = rows
        .iter()
        .map(|r| r.description.chars().count())
        .max()
        .unwrap_or(0)
        .max("Description".len());
    let mut s = format!(
        "\n{:>3}  {:<width$}  {:<13}  {:>14}  {:<10}  ID",
        "#", "Description", "Category", "Amount", "Date"
    );
    for r in rows {
        let _ = write!(
            s,
            "\n{:>3}  {:<width$}  {:<13}  {:>14}  {:<10}  {}",
            r.number,
            r.description,
            r.category,
            r.amount.to_string(),
            r.date,
            r.id
        );
    }
    s
}
