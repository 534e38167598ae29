use crate::api::{self, Mode};
use crate::args::AddArgs;
use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::model::{Amount, Transaction};
use crate::tracker::{Tracker, TRANSACTION_ADDED};
use crate::{Config, Result};
use anyhow::Context;
use std::str::FromStr;

/// Validates and creates a transaction.
///
/// The description must not be blank and may be at most 200 characters long, and an amount with
/// at most two decimal places must be given. Invalid input is rejected before anything is sent to the store.
pub async fn add(config: Config, mode: Mode, args: AddArgs) -> Result<Out<Transaction>> {
    let amount = args
        .amount()
        .map(|s| Amount::from_str(s).with_context(|| format!("'{s}' is not an amount")))
        .transpose()
        .pub_result(ErrorType::Validation)?;
    let mut tracker = Tracker::new(api::store(&config, mode).await?);
    let created = tracker.add(args.text(), amount, args.category()).await?;
    Ok(Out::new(TRANSACTION_ADDED, created))
}
