//! A client for a personal finance tracker. It keeps a snapshot of the transactions held by a
//! small REST service, aggregates income, expenses and category totals, and renders a paginated
//! PDF statement.

pub mod api;
pub mod args;
pub mod commands;
mod config;
mod error;
pub mod model;
pub mod statement;
pub mod summary;
pub mod tracker;
mod utils;


pub use api::Mode;
pub use config::Config;
pub use error::{error_type, Error, ErrorType, IntoResult, Result};
