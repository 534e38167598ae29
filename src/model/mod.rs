//! Types that represent the core data model, such as `Transaction`, `Amount` and `Category`.
mod amount;
mod category;
mod transaction;

pub use amount::{Amount, AmountError, CURRENCY, DECIMAL_PLACES};
pub use category::{Category, Rgb, TransactionCategory};
pub use transaction::{NewTransaction, Transaction, Transactions, MAX_TEXT_LEN};
