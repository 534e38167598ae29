use crate::api::{self, Mode};
use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::statement::{load_logo, STATEMENT_FILENAME};
use crate::tracker::{Tracker, STATEMENT_GENERATED};
use crate::{utils, Config, Result};
use chrono::{DateTime, FixedOffset};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Fetches a fresh snapshot of the transactions and writes the statement to
/// `OBICS_Statement.pdf` in `out`, or in the configured output directory if `out` is `None`.
pub async fn export(
    config: Config,
    mode: Mode,
    out: Option<&Path>,
    generated_at: DateTime<FixedOffset>,
) -> Result<Out<PathBuf>> {
    let tracker = Tracker::load(api::store(&config, mode).await?).await?;
    let logo = config.logo_path().and_then(|p| load_logo(&p));
    let bytes = tracker.export(generated_at, logo.as_ref())?;

    let dir = out.map(Path::to_path_buf).unwrap_or_else(|| config.output_dir());
    utils::make_dir(&dir).await.pub_result(ErrorType::Filesystem)?;
    let path = dir.join(STATEMENT_FILENAME);
    utils::write(&path, &bytes)
        .await
        .pub_result(ErrorType::Filesystem)?;
    debug!("Wrote {} bytes to {}", bytes.len(), path.display());

    Ok(Out::new(
        format!("{STATEMENT_GENERATED}: {}", path.display()),
        path,
    ))
}
