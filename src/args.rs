//! These structs provide the CLI interface for the fintrack CLI.

use crate::model::Category;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// fintrack: A command-line client for a personal finance tracker.
///
/// Transactions are kept by a small REST service. This program lists, adds and deletes them,
/// summarizes income, expenses and spending by category, and exports a PDF statement.
///
/// Run `fintrack init --api-url <URL>` first to point the program at the service.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the home directory and the configuration file.
    ///
    /// This is the first command you should run. By default the home directory is
    /// $HOME/fintrack; pass --home or set FINTRACK_HOME to put it somewhere else.
    Init(InitArgs),
    /// Print every transaction, oldest first.
    List,
    /// Add a transaction.
    Add(AddArgs),
    /// Delete a transaction by its ID, as shown by `fintrack list`.
    Delete(DeleteArgs),
    /// Print income, expenses, the balance and spending by category.
    Summary,
    /// Write the PDF statement.
    Export(ExportArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where fintrack configuration is held. Defaults to ~/fintrack
    #[arg(long, env = "FINTRACK_HOME", default_value_t = default_home())]
    home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, home: PathBuf) -> Self {
        Self {
            log_level,
            home: home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn home(&self) -> &DisplayPath {
        &self.home
    }
}

/// (Not shown): Args for the `fintrack init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The base URL of the transaction service, e.g. http://localhost:8000/api
    #[arg(long)]
    api_url: String,

    /// An image to show in the statement header. Relative paths are resolved against the home
    /// directory.
    #[arg(long)]
    logo: Option<PathBuf>,
}

impl InitArgs {
    pub fn new(api_url: impl Into<String>, logo: Option<PathBuf>) -> Self {
        Self {
            api_url: api_url.into(),
            logo,
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn logo(&self) -> Option<&Path> {
        self.logo.as_deref()
    }
}

/// (Not shown): Args for the `fintrack add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    /// What the transaction was for. At most 200 characters.
    #[arg(long)]
    text: String,

    /// The signed amount: positive for income, negative for an expense. At most two decimal places.
    #[arg(long, allow_hyphen_values = true)]
    amount: Option<String>,

    /// The spending category. Matched without regard to case.
    #[arg(long, value_enum, ignore_case = true, default_value_t = Category::Other)]
    category: Category,
}

impl AddArgs {
    pub fn new(text: impl Into<String>, amount: Option<String>, category: Category) -> Self {
        Self {
            text: text.into(),
            amount,
            category,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn amount(&self) -> Option<&str> {
        self.amount.as_deref()
    }

    pub fn category(&self) -> Category {
        self.category
    }
}

/// (Not shown): Args for the `fintrack delete` command.
#[derive(Debug, Parser, Clone)]
pub struct DeleteArgs {
    /// The ID of the transaction to delete.
    id: String,
}

impl DeleteArgs {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// (Not shown): Args for the `fintrack export` command.
#[derive(Debug, Parser, Clone)]
pub struct ExportArgs {
    /// The directory to write the statement to. Defaults to `output_dir` from the config, or the
    /// home directory.
    #[arg(long)]
    out: Option<PathBuf>,
}

impl ExportArgs {
    pub fn new(out: Option<PathBuf>) -> Self {
        Self { out }
    }

    pub fn out(&self) -> Option<&Path> {
        self.out.as_deref()
    }
}

fn default_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("fintrack"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --home or FINTRACK_HOME instead of relying on the default \
                fintrack home directory. If you continue using the program right now, you may \
                have problems!",
            );
            PathBuf::from("fintrack")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}
