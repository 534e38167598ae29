//! Derives totals from a list of transactions.
//!
//! Everything here is a pure function of its input and is recomputed whenever it is needed.

use crate::model::{Amount, Category, Rgb, Transaction};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Income, expense and balance over a set of transactions.
///
/// `income` is the sum of positive amounts, `expense` is the sum of negative amounts (so it is
/// never positive) and `balance` is the sum of all amounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    income: Amount,
    expense: Amount,
    balance: Amount,
}

impl Totals {
    /// Computes the totals of `transactions`.
    pub fn new<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        let mut totals = Totals::default();
        for amount in transactions.into_iter().map(Transaction::amount) {
            totals.balance += amount;
            if amount.is_positive() {
                totals.income += amount;
            } else if amount.is_negative() {
                totals.expense += amount;
            }
        }
        totals
    }

    pub fn income(&self) -> Amount {
        self.income
    }

    pub fn expense(&self) -> Amount {
        self.expense
    }

    pub fn balance(&self) -> Amount {
        self.balance
    }
}

/// The total of one category: the sum of the absolute amounts of its transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    category: Category,
    value: Amount,
}

impl CategoryTotal {
    pub fn category(&self) -> Category {
        self.category
    }

    pub fn label(&self) -> &'static str {
        self.category.name()
    }

    pub fn value(&self) -> Amount {
        self.value
    }

    pub fn color(&self) -> Rgb {
        self.category.color()
    }
}

/// Per-category totals for all five categories in their fixed order. Categories with nothing in
/// them are present with a zero value, which is what the statement legend needs.
///
/// Transactions whose category is not one of the five are left out.
pub fn category_totals<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
) -> Vec<CategoryTotal> {
    let mut sums = [Amount::ZERO; Category::ALL.len()];
    for t in transactions {
        if let Some(category) = t.category().known() {
            if let Some(ix) = Category::ALL.iter().position(|c| *c == category) {
                sums[ix] += t.amount().abs();
            }
        }
    }
    Category::ALL
        .into_iter()
        .zip(sums)
        .map(|(category, value)| CategoryTotal { category, value })
        .collect()
}

/// A slice of the category chart, with its share of the whole as a whole-number percentage.
/// Halves round up, so a 12.5% share is labeled 13.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChartSlice {
    #[serde(flatten)]
    total: CategoryTotal,
    percent: u32,
}

impl ChartSlice {
    pub fn total(&self) -> &CategoryTotal {
        &self.total
    }

    pub fn percent(&self) -> u32 {
        self.percent
    }
}

/// The chart-facing view of the category totals: zero categories are omitted. An empty result
/// means there is nothing to chart.
pub fn chart_slices<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Vec<ChartSlice> {
    let totals: Vec<CategoryTotal> = category_totals(transactions)
        .into_iter()
        .filter(|t| !t.value().is_zero())
        .collect();
    let whole: Decimal = totals.iter().map(|t| t.value().value()).sum();
    totals
        .into_iter()
        .map(|total| {
            let percent = if whole.is_zero() {
                0
            } else {
                (total.value().value() * Decimal::ONE_HUNDRED / whole)
                    .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                    .to_u32()
                    .unwrap_or_default()
            };
            ChartSlice { total, percent }
        })
        .collect()
}
