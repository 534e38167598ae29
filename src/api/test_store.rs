//! Implements the `Store` trait using in-memory data.
//!
//! Note: this is compiled even in the "production" version of this app so that we can run the whole
//! app, top-to-bottom, without a transaction service.

use crate::api::Store;
use crate::model::{Amount, NewTransaction, Transaction, TransactionCategory, Transactions};
use crate::Result;
use anyhow::{anyhow, bail, Context};
use chrono::{DateTime, FixedOffset, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Cursor;
use std::str::FromStr;
use std::sync::{Mutex, OnceLock};
use tracing::trace;
use uuid::Uuid;

/// Data held by every `TestStore`, keyed by the store's `key`. This lets separate `TestStore`
/// instances, such as the one a command creates and the one a test inspects, see the same data.
static STATE: OnceLock<Mutex<HashMap<String, Vec<Transaction>>>> = OnceLock::new();

/// An implementation of the `Store` trait that does not use the network. The first time a key is
/// used its data is seeded with sample transactions.
pub struct TestStore {
    key: String,
}

impl TestStore {
    /// Create a `TestStore` whose data is identified by `key`, typically the configured API URL.
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// The transactions currently held, newest first, the way the service lists them.
    pub fn state(&self) -> Result<Vec<Transaction>> {
        self.with_state(|data| data.clone())
    }

    /// Replaces the transactions held for this key.
    pub fn set_state(&self, transactions: Vec<Transaction>) -> Result<()> {
        self.with_state(|data| *data = transactions)
    }

    /// Runs `f` on this key's transactions, seeding them on first use.
    fn with_state<R>(&self, f: impl FnOnce(&mut Vec<Transaction>) -> R) -> Result<R> {
        let mut state = STATE
            .get_or_init(|| Mutex::new(HashMap::new()))
            .lock()
            .map_err(|_| anyhow!("The test store state is poisoned"))?;
        if !state.contains_key(&self.key) {
            state.insert(self.key.clone(), seed_data()?);
        }
        Ok(f(state.entry(self.key.clone()).or_default()))
    }
}

#[async_trait::async_trait]
impl Store for TestStore {
    async fn list(&mut self) -> Result<Transactions> {
        trace!("list for {}", self.key);
        Ok(Transactions::new(self.state()?))
    }

    async fn create(&mut self, new: &NewTransaction) -> Result<Transaction> {
        trace!("create for {}", self.key);
        let transaction = Transaction::new(
            Uuid::new_v4().to_string(),
            new.text(),
            new.category(),
            new.amount(),
            Utc::now().fixed_offset(),
        );
        self.with_state(|data| data.insert(0, transaction.clone()))?;
        Ok(transaction)
    }

    async fn delete(&mut self, id: &str) -> Result<()> {
        trace!("delete {id} for {}", self.key);
        let removed = self.with_state(|data| {
            let index = data.iter().position(|t| t.id() == id)?;
            Some(data.remove(index))
        })?;
        if removed.is_none() {
            bail!("No transaction with id '{id}'");
        }
        Ok(())
    }
}

/// One row of the seed CSV.
#[derive(Debug, Deserialize)]
struct SeedRow {
    id: String,
    text: String,
    category: String,
    amount: String,
    created_at: String,
}

impl SeedRow {
    fn into_transaction(self) -> Result<Transaction> {
        let amount = Amount::from_str(&self.amount)
            .with_context(|| format!("Bad seed amount '{}'", self.amount))?;
        let created_at: DateTime<FixedOffset> = DateTime::parse_from_rfc3339(&self.created_at)
            .with_context(|| format!("Bad seed date '{}'", self.created_at))?;
        Ok(Transaction::new(
            self.id,
            self.text,
            TransactionCategory::parse(&self.category),
            amount,
            created_at,
        ))
    }
}

/// Parses the seed data, newest first.
fn seed_data() -> Result<Vec<Transaction>> {
    let mut rdr = csv::Reader::from_reader(Cursor::new(TRANSACTION_DATA.as_bytes()));
    let mut transactions = Vec::new();
    for result in rdr.deserialize::<SeedRow>() {
        let row = result.context("Bad seed row")?;
        transactions.push(row.into_transaction()?);
    }
    transactions.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
    Ok(transactions)
}

/// Seed transaction data. One row has a category outside the fixed set and one has none.
const TRANSACTION_DATA: &str = r##"id,text,category,amount,created_at
8a4f7c1e-53b2-4d0e-9c61-0b7e2f3a9d01,Salary,Other,25000.00,2025-06-01T08:00:00+02:00
8a4f7c1e-53b2-4d0e-9c61-0b7e2f3a9d02,Woolworths groceries,Food,-1245.67,2025-06-02T17:42:10+02:00
8a4f7c1e-53b2-4d0e-9c61-0b7e2f3a9d03,Gautrain monthly pass,Transport,-1380.00,2025-06-03T07:15:00+02:00
8a4f7c1e-53b2-4d0e-9c61-0b7e2f3a9d04,City Power prepaid electricity,Utilities,-850.00,2025-06-05T12:05:33+02:00
8a4f7c1e-53b2-4d0e-9c61-0b7e2f3a9d05,Streaming subscription,Entertainment,-199.00,2025-06-07T20:30:00+02:00
8a4f7c1e-53b2-4d0e-9c61-0b7e2f3a9d06,Uber to the airport,Transport,-312.40,2025-06-09T05:50:12+02:00
8a4f7c1e-53b2-4d0e-9c61-0b7e2f3a9d07,Freelance design work,Other,4200.00,2025-06-12T15:00:00+02:00
8a4f7c1e-53b2-4d0e-9c61-0b7e2f3a9d08,Pick n Pay groceries,Food,-932.15,2025-06-14T10:22:45+02:00
8a4f7c1e-53b2-4d0e-9c61-0b7e2f3a9d09,Rent,Rent,-9500.00,2025-06-15T09:00:00+02:00
8a4f7c1e-53b2-4d0e-9c61-0b7e2f3a9d10,Water and lights,Utilities,-640.25,2025-06-18T11:11:11+02:00
8a4f7c1e-53b2-4d0e-9c61-0b7e2f3a9d11,Cinema tickets,Entertainment,-260.00,2025-06-21T19:45:00+02:00
8a4f7c1e-53b2-4d0e-9c61-0b7e2f3a9d12,Cash deposit,,500.00,2025-06-25T13:30:00+02:00
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;

    fn key() -> String {
        format!("test-store-{}", Uuid::new_v4())
    }

    #[test]
    fn test_seed_data() {
        let data = seed_data().unwrap();
        assert_eq!(data.len(), 12);
        // Newest first.
        assert_eq!(data[0].text(), "Cash deposit");
        assert_eq!(data[0].category().as_str(), "");
        assert_eq!(data[11].text(), "Salary");
        let rent = data.iter().find(|t| t.text() == "Rent").unwrap();
        assert_eq!(rent.category().known(), None);
    }

    #[tokio::test]
    async fn test_create_and_delete() {
        let mut store = TestStore::new(key());
        let before = store.list().await.unwrap().len();

        let new = NewTransaction::new(
            "Coffee",
            Some(Amount::from_str("-35.499").unwrap()),
            Category::Food,
        )
        .unwrap();
        let created = store.create(&new).await.unwrap();
        assert_eq!(created.amount(), Amount::from_str("-35.50").unwrap());

        let list = store.list().await.unwrap();
        assert_eq!(list.len(), before + 1);
        assert_eq!(list.data()[0].id(), created.id());

        store.delete(created.id()).await.unwrap();
        assert_eq!(store.list().await.unwrap().len(), before);
        assert!(store.delete(created.id()).await.is_err());
    }

    #[tokio::test]
    async fn test_instances_share_state_by_key() {
        let key = key();
        let a = TestStore::new(&key);
        let mut b = TestStore::new(&key);
        a.set_state(Vec::new()).unwrap();
        assert!(b.list().await.unwrap().is_empty());
        let other = TestStore::new(format!("{key}-other"));
        assert!(!other.state().unwrap().is_empty());
    }
}
