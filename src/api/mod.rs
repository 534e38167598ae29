//! Access to the transaction store.
//!
//! The store is a small REST service holding the transaction list. The `Store` trait abstracts it
//! so that the whole program can also run against in-memory data, see `TestStore`.

mod rest;
mod test_store;

use crate::error::{ErrorType, IntoResult};
use crate::model::{NewTransaction, Transaction, Transactions};
use crate::{Config, Result};
use tracing::debug;

pub(crate) use rest::{base_url, RestStore};
pub use test_store::TestStore;

/// When this environment variable is set and non-empty the program uses `TestStore` instead of the
/// REST service.
pub const TEST_MODE_ENV: &str = "FINTRACK_IN_TEST_MODE";

/// The operations the transaction store supports.
#[async_trait::async_trait]
pub trait Store {
    /// Fetches every transaction.
    async fn list(&mut self) -> Result<Transactions>;

    /// Creates a transaction. The store assigns its id and creation time.
    async fn create(&mut self, new: &NewTransaction) -> Result<Transaction>;

    /// Deletes the transaction with the given `id`.
    async fn delete(&mut self, id: &str) -> Result<()>;
}

/// Which `Store` implementation to use.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Talk to the REST service at the configured `api_url`.
    #[default]
    Rest,
    /// Use in-memory data seeded with sample transactions.
    Test,
}

impl Mode {
    /// `Mode::Test` when `FINTRACK_IN_TEST_MODE` is set to something non-empty, otherwise
    /// `Mode::Rest`.
    pub fn from_env() -> Self {
        match std::env::var(TEST_MODE_ENV) {
            Ok(value) if !value.is_empty() => Mode::Test,
            _ => Mode::Rest,
        }
    }
}

/// Creates the `Store` for `mode`.
pub async fn store(config: &Config, mode: Mode) -> Result<Box<dyn Store + Send>> {
    debug!("Using the {mode:?} transaction store");
    match mode {
        Mode::Rest => Ok(Box::new(
            RestStore::new(config.api_url()).pub_result(ErrorType::Config)?,
        )),
        Mode::Test => Ok(Box::new(TestStore::new(config.api_url()))),
    }
}
