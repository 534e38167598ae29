//! Implements the `Store` trait against the transaction REST service.

use crate::api::Store;
use crate::model::{NewTransaction, Transaction, Transactions};
use crate::Result;
use anyhow::{ensure, Context};
use reqwest::{Client, Response};
use tracing::trace;
use url::Url;

const TRANSACTIONS: &str = "transactions/";

/// Talks to `{api_url}/transactions/` and `{api_url}/transactions/{id}/`.
pub(crate) struct RestStore {
    client: Client,
    base: Url,
}

impl RestStore {
    pub(crate) fn new(api_url: &str) -> Result<Self> {
        let base = base_url(api_url)?;
        let client = Client::builder()
            .build()
            .context("Unable to create the HTTP client")?;
        Ok(Self { client, base })
    }

    fn transactions_url(&self) -> Result<Url> {
        self.base
            .join(TRANSACTIONS)
            .context("Unable to build the transactions URL")
    }

    fn transaction_url(&self, id: &str) -> Result<Url> {
        self.transactions_url()?
            .join(&format!("{id}/"))
            .with_context(|| format!("Unable to build the URL for transaction '{id}'"))
    }
}

#[async_trait::async_trait]
impl Store for RestStore {
    async fn list(&mut self) -> Result<Transactions> {
        let url = self.transactions_url()?;
        trace!("GET {url}");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Unable to reach {url}"))?;
        check_status(&response)?;
        response
            .json::<Transactions>()
            .await
            .context("Unable to parse the transaction list")
    }

    async fn create(&mut self, new: &NewTransaction) -> Result<Transaction> {
        let url = self.transactions_url()?;
        trace!("POST {url}");
        let response = self
            .client
            .post(url.clone())
            .json(new)
            .send()
            .await
            .with_context(|| format!("Unable to reach {url}"))?;
        check_status(&response)?;
        response
            .json::<Transaction>()
            .await
            .context("Unable to parse the created transaction")
    }

    async fn delete(&mut self, id: &str) -> Result<()> {
        let url = self.transaction_url(id)?;
        trace!("DELETE {url}");
        let response = self
            .client
            .delete(url.clone())
            .send()
            .await
            .with_context(|| format!("Unable to reach {url}"))?;
        check_status(&response)
    }
}

fn check_status(response: &Response) -> Result<()> {
    let status = response.status();
    ensure!(
        status.is_success(),
        "The transaction store responded with {status} for {}",
        response.url()
    );
    Ok(())
}

/// Parses `api_url` so that relative joins land below it, i.e. with a trailing slash.
pub(crate) fn base_url(api_url: &str) -> Result<Url> {
    let mut url =
        Url::parse(api_url).with_context(|| format!("Invalid transaction store URL '{api_url}'"))?;
    ensure!(
        !url.cannot_be_a_base(),
        "The transaction store URL '{api_url}' cannot have paths joined to it"
    );
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
