use crate::model::{Amount, Category, TransactionCategory};
use crate::Result;
use anyhow::ensure;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// The longest description the transaction store will accept.
pub const MAX_TEXT_LEN: usize = 200;

/// A single transaction as returned by the transaction store. Transactions are never modified
/// after they are fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    id: String,
    text: String,
    #[serde(default)]
    category: TransactionCategory,
    amount: Amount,
    created_at: DateTime<FixedOffset>,
}

impl Transaction {
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        category: impl Into<TransactionCategory>,
        amount: Amount,
        created_at: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            category: category.into(),
            amount,
            created_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn category(&self) -> &TransactionCategory {
        &self.category
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn created_at(&self) -> DateTime<FixedOffset> {
        self.created_at
    }
}

/// The list of transactions held by the client. It is always replaced as a whole when the store
/// is re-fetched, so the order of `data` is the order in which the store returned them.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transactions {
    data: Vec<Transaction>,
}

impl Transactions {
    pub fn new(data: Vec<Transaction>) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &[Transaction] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.data.iter()
    }

    /// Returns references to the transactions ordered oldest first. The sort is stable, so
    /// transactions with the same `created_at` keep the order they arrived in.
    pub fn chronological(&self) -> Vec<&Transaction> {
        let mut sorted: Vec<&Transaction> = self.data.iter().collect();
        sorted.sort_by_key(|t| t.created_at);
        sorted
    }
}

impl From<Vec<Transaction>> for Transactions {
    fn from(value: Vec<Transaction>) -> Self {
        Self::new(value)
    }
}

impl<'a> IntoIterator for &'a Transactions {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

/// The payload sent to the store to create a transaction. The store assigns `id` and
/// `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTransaction {
    text: String,
    amount: Amount,
    category: Category,
}

impl NewTransaction {
    /// Validates user input. The description must contain something other than whitespace and fit
    /// in the store's column, and an amount must be present with at most two decimal places.
    pub fn new(text: impl Into<String>, amount: Option<Amount>, category: Category) -> Result<Self> {
        let text = text.into();
        ensure!(!text.trim().is_empty(), "A description is required");
        ensure!(
            text.chars().count() <= MAX_TEXT_LEN,
            "The description is longer than {MAX_TEXT_LEN} characters"
        );
        let Some(amount) = amount else {
            anyhow::bail!("An amount is required");
        };
        ensure!(
            amount.fits_cents(),
            "The amount {} has more than two decimal places",
            amount.value()
        );
        Ok(Self {
            text,
            amount,
            category,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn category(&self) -> Category {
        self.category
    }
}
