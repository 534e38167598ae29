use crate::api::{self, Mode};
use crate::commands::Out;
use crate::summary::{ChartSlice, Totals};
use crate::tracker::Tracker;
use crate::{Config, Result};
use serde::Serialize;
use std::fmt::Write;

/// Shown in place of the category breakdown when nothing has a category total.
pub const NO_DATA: &str = "No data available";

/// The figures shown by `fintrack summary`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub totals: Totals,
    pub categories: Vec<ChartSlice>,
}

/// Fetches the transactions and summarizes them.
pub async fn summary(config: Config, mode: Mode) -> Result<Out<Summary>> {
    let tracker = Tracker::load(api::store(&config, mode).await?).await?;
    let summary = Summary {
        totals: tracker.totals(),
        categories: tracker.chart_slices(),
    };
    Ok(Out::new(format_summary(&summary), summary))
}

fn format_summary(summary: &Summary) -> String {
    let totals = &summary.totals;
    let mut s = format!(
        "\nIncome:   {}\nExpenses: {}\nBalance:  {}\n\nSpending by category:",
        totals.income(),
        totals.expense(),
        totals.balance()
    );
    if summary.categories.is_empty() {
        let _ = write!(s, "\n  {NO_DATA}");
    }
    for slice in &summary.categories {
        let _ = write!(
            s,
            "\n  {:<13} {:>14} {:>4}%",
            slice.total().label(),
            slice.total().value().to_string(),
            slice.percent()
        );
    }
    s
}
