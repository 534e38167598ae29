use crate::api;
use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the home directory and an initial `config.json` file.
///
/// # Arguments
/// - `home` - The directory that will be the home directory, e.g. `$HOME/fintrack`
/// - `api_url` - The base URL of the transaction service, e.g. `http://localhost:8000/api`
/// - `logo` - An optional image shown in the statement header
///
/// # Errors
/// - Returns an error if any file operations fail.
pub async fn init(home: &Path, api_url: &str, logo: Option<&Path>) -> Result<Out<()>> {
    api::base_url(api_url)
        .with_context(|| format!("'{api_url}' is not a usable transaction store URL"))
        .pub_result(ErrorType::Validation)?;
    let config = Config::create(home, api_url, logo)
        .await
        .context("Unable to create the home directory and config")
        .pub_result(ErrorType::Config)?;
    Ok(format!(
        "Successfully created the fintrack config at {}",
        config.config_path().display()
    )
    .into())
}
