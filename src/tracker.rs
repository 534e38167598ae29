//! The tracker holds the current snapshot of transactions and keeps it in step with the store.
//!
//! Every mutation is followed by a full refetch, so the snapshot is always what the store last
//! reported. A failed refetch after a mutation is logged on its own and does not undo the
//! mutation's success. Aggregates and the statement are computed from the snapshot.

use crate::api::Store;
use crate::error::{ErrorType, IntoResult};
use crate::model::{Amount, Category, NewTransaction, Transaction, Transactions};
use crate::statement::Statement;
use crate::summary::{category_totals, chart_slices, CategoryTotal, ChartSlice, Totals};
use crate::Result;
use anyhow::Context;
use chrono::{DateTime, FixedOffset};
use image::DynamicImage;
use serde::Serialize;
use tracing::{debug, error, warn};

/// Shown when a transaction was created.
pub const TRANSACTION_ADDED: &str = "Transaction added";
/// Shown when a statement was rendered.
pub const STATEMENT_GENERATED: &str = "Statement Generated";
/// Attached to errors from fetching the transaction list.
pub const FETCH_FAILED: &str = "Failed to fetch transactions";

/// One line of the transaction table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    /// 1-based position in chronological order.
    pub number: usize,
    pub id: String,
    pub description: String,
    pub category: String,
    pub amount: Amount,
    pub date: String,
}

pub struct Tracker {
    store: Box<dyn Store + Send>,
    transactions: Transactions,
}

impl Tracker {
    /// Creates a tracker with an empty snapshot. Call `refresh` to load it.
    pub fn new(store: Box<dyn Store + Send>) -> Self {
        Self {
            store,
            transactions: Transactions::default(),
        }
    }

    /// Creates a tracker and loads its snapshot.
    pub async fn load(store: Box<dyn Store + Send>) -> Result<Self> {
        let mut tracker = Self::new(store);
        tracker.refresh().await?;
        Ok(tracker)
    }

    pub fn transactions(&self) -> &Transactions {
        &self.transactions
    }

    /// Replaces the snapshot with the store's current list. On failure the snapshot is kept.
    pub async fn refresh(&mut self) -> Result<()> {
        let transactions = self
            .store
            .list()
            .await
            .context(FETCH_FAILED)
            .pub_result(ErrorType::Store)?;
        debug!("Fetched {} transactions", transactions.len());
        self.transactions = transactions;
        Ok(())
    }

    /// Validates and creates a transaction, then refreshes. Nothing is sent to the store if the
    /// input is invalid. Once the store accepts the transaction this returns `Ok` even if the
    /// refresh fails.
    pub async fn add(
        &mut self,
        text: &str,
        amount: Option<Amount>,
        category: Category,
    ) -> Result<Transaction> {
        let new = NewTransaction::new(text, amount, category).pub_result(ErrorType::Validation)?;
        let created = self
            .store
            .create(&new)
            .await
            .context("Unable to create the transaction")
            .pub_result(ErrorType::Store)?;
        self.refresh_after_change().await;
        Ok(created)
    }

    /// Deletes a transaction, then refreshes. As with `add`, a failed refresh does not fail the
    /// delete.
    pub async fn delete(&mut self, id: &str) -> Result<()> {
        self.store
            .delete(id)
            .await
            .with_context(|| format!("Unable to delete transaction '{id}'"))
            .pub_result(ErrorType::Store)?;
        self.refresh_after_change().await;
        Ok(())
    }

    /// The snapshot is left as it was when the refetch fails.
    async fn refresh_after_change(&mut self) {
        if let Err(e) = self.refresh().await {
            error!("{e:#}");
        }
    }

    pub fn totals(&self) -> Totals {
        Totals::new(&self.transactions)
    }

    pub fn category_totals(&self) -> Vec<CategoryTotal> {
        category_totals(&self.transactions)
    }

    /// The categories to chart, with percentages. Empty when there is nothing to chart.
    pub fn chart_slices(&self) -> Vec<ChartSlice> {
        chart_slices(&self.transactions)
    }

    /// The transaction table in chronological order. Dates are shown in `offset`.
    pub fn table(&self, offset: FixedOffset) -> Vec<TableRow> {
        self.transactions
            .chronological()
            .into_iter()
            .enumerate()
            .map(|(i, t)| TableRow {
                number: i + 1,
                id: t.id().to_string(),
                description: t.text().to_string(),
                category: t.category().display_name().to_string(),
                amount: t.amount(),
                date: t
                    .created_at()
                    .with_timezone(&offset)
                    .format("%Y/%m/%d")
                    .to_string(),
            })
            .collect()
    }

    /// Renders the statement for the current snapshot.
    pub fn export(
        &self,
        generated_at: DateTime<FixedOffset>,
        logo: Option<&DynamicImage>,
    ) -> Result<Vec<u8>> {
        if self.transactions.is_empty() {
            warn!("There are no transactions, the statement will have an empty ledger");
        }
        Statement::new(&self.transactions, self.totals(), generated_at)
            .with_logo(logo)
            .render()
            .context("Unable to render the statement")
            .pub_result(ErrorType::Render)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::TestStore;
    use crate::error::error_type;
    use anyhow::anyhow;
    use std::str::FromStr;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use uuid::Uuid;

    /// A store that counts calls and can be told to fail.
    struct FlakyStore {
        inner: TestStore,
        fail_list: bool,
        /// Start failing `list` once a create or delete has gone through.
        fail_list_after_change: bool,
        calls: Arc<AtomicUsize>,
    }

    impl FlakyStore {
        fn new(inner: TestStore, calls: Arc<AtomicUsize>) -> Self {
            Self {
                inner,
                fail_list: false,
                fail_list_after_change: false,
                calls,
            }
        }

        fn changed(&mut self) {
            if self.fail_list_after_change {
                self.fail_list = true;
            }
        }
    }

    #[async_trait::async_trait]
    impl Store for FlakyStore {
        async fn list(&mut self) -> Result<Transactions> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_list {
                return Err(anyhow!("connection refused"));
            }
            self.inner.list().await
        }

        async fn create(&mut self, new: &NewTransaction) -> Result<Transaction> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let created = self.inner.create(new).await?;
            self.changed();
            Ok(created)
        }

        async fn delete(&mut self, id: &str) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.delete(id).await?;
            self.changed();
            Ok(())
        }
    }

    fn empty_store() -> TestStore {
        let store = TestStore::new(format!("tracker-{}", Uuid::new_v4()));
        store.set_state(Vec::new()).unwrap();
        store
    }

    fn amount(s: &str) -> Option<Amount> {
        Some(Amount::from_str(s).unwrap())
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[tokio::test]
    async fn test_add_refreshes() {
        let mut tracker = Tracker::load(Box::new(empty_store())).await.unwrap();
        assert!(tracker.transactions().is_empty());

        tracker.add("Salary", amount("100"), Category::Food).await.unwrap();
        tracker
            .add("Bus", amount("-40"), Category::Transport)
            .await
            .unwrap();
        assert_eq!(tracker.transactions().len(), 2);

        let totals = tracker.totals();
        assert_eq!(totals.income(), Amount::from_str("100").unwrap());
        assert_eq!(totals.expense(), Amount::from_str("-40").unwrap());
        assert_eq!(totals.balance(), Amount::from_str("60").unwrap());

        let categories = tracker.category_totals();
        assert_eq!(categories[0].value(), Amount::from_str("100").unwrap());
        assert_eq!(categories[1].value(), Amount::from_str("40").unwrap());
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_store() {
        let calls = Arc::new(AtomicUsize::new(0));
        let store = FlakyStore::new(empty_store(), calls.clone());
        let mut tracker = Tracker::new(Box::new(store));

        for (text, value) in [("", amount("5")), ("   ", amount("5")), ("Coffee", None)] {
            let e = tracker.add(text, value, Category::Food).await.unwrap_err();
            assert_eq!(error_type(&e), Some(ErrorType::Validation));
            assert_eq!(e.to_string(), "Invalid input");
        }
        let long = "x".repeat(201);
        assert!(tracker.add(&long, amount("5"), Category::Food).await.is_err());

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(tracker.transactions().is_empty());
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_snapshot() {
        let inner = TestStore::new(format!("tracker-{}", Uuid::new_v4()));
        let before = inner.state().unwrap().len();
        let mut tracker = Tracker::load(Box::new(inner)).await.unwrap();
        assert_eq!(tracker.transactions().len(), before);
        let snapshot = tracker.transactions().clone();

        let mut flaky = FlakyStore::new(empty_store(), Arc::new(AtomicUsize::new(0)));
        flaky.fail_list = true;
        tracker.store = Box::new(flaky);
        let e = tracker.refresh().await.unwrap_err();
        assert_eq!(error_type(&e), Some(ErrorType::Store));
        assert!(format!("{e:#}").contains(FETCH_FAILED));
        assert_eq!(tracker.transactions(), &snapshot);
    }

    #[tokio::test]
    async fn test_delete_refreshes() {
        let mut tracker = Tracker::load(Box::new(empty_store())).await.unwrap();
        let created = tracker
            .add("Lunch", amount("-80"), Category::Food)
            .await
            .unwrap();
        tracker.add("Gift", amount("50"), Category::Other).await.unwrap();
        tracker.delete(created.id()).await.unwrap();
        assert_eq!(tracker.transactions().len(), 1);
        assert_eq!(tracker.transactions().data()[0].text(), "Gift");

        let e = tracker.delete("missing").await.unwrap_err();
        assert_eq!(error_type(&e), Some(ErrorType::Store));
    }

    #[tokio::test]
    async fn test_change_succeeds_when_refetch_fails() {
        let key = format!("tracker-{}", Uuid::new_v4());
        let shared = TestStore::new(&key);
        shared.set_state(Vec::new()).unwrap();
        let mut flaky = FlakyStore::new(TestStore::new(&key), Arc::new(AtomicUsize::new(0)));
        flaky.fail_list_after_change = true;
        let mut tracker = Tracker::load(Box::new(flaky)).await.unwrap();

        let created = tracker
            .add("Coffee", amount("-30"), Category::Food)
            .await
            .unwrap();
        assert_eq!(shared.state().unwrap().len(), 1);
        // The snapshot is the one from before the add.
        assert!(tracker.transactions().is_empty());

        tracker.delete(created.id()).await.unwrap();
        assert!(shared.state().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_table_is_chronological() {
        let tracker = Tracker::load(Box::new(TestStore::new(format!(
            "tracker-{}",
            Uuid::new_v4()
        ))))
        .await
        .unwrap();
        let table = tracker.table(utc());
        assert_eq!(table.len(), tracker.transactions().len());
        assert_eq!(table[0].number, 1);
        assert_eq!(table[0].description, "Salary");
        let last = table.last().unwrap();
        assert_eq!(last.description, "Cash deposit");
        // A blank category is shown as Other.
        assert_eq!(last.category, "Other");
        let dates: Vec<_> = table.iter().map(|r| r.date.clone()).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted);
    }

    #[tokio::test]
    async fn test_export() {
        let mut tracker = Tracker::load(Box::new(empty_store())).await.unwrap();
        let at = DateTime::parse_from_rfc3339("2025-06-30T12:00:00+02:00").unwrap();
        assert!(tracker.chart_slices().is_empty());
        let empty = tracker.export(at, None).unwrap();
        assert!(empty.starts_with(b"%PDF"));

        tracker.add("Rent", amount("-9500"), Category::Utilities).await.unwrap();
        let bytes = tracker.export(at, None).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert_eq!(tracker.chart_slices().len(), 1);
        assert_eq!(tracker.chart_slices()[0].percent(), 100);
    }
}
