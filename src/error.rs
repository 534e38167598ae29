use std::fmt::{Display, Formatter};

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// The category of a failure that is surfaced to the user. Attached to an `anyhow::Error` as
/// context so that the outermost handler can tell what kind of notification to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// User input was rejected before anything was sent to the transaction store.
    Validation,
    /// The transaction store could not be reached or refused the request.
    Store,
    /// The statement document could not be produced.
    Render,
    /// The configuration file or home directory is missing or invalid.
    Config,
    /// Reading or writing a local file failed.
    Filesystem,
}

impl Display for ErrorType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorType::Validation => "Invalid input",
            ErrorType::Store => "Transaction store error",
            ErrorType::Render => "Statement rendering error",
            ErrorType::Config => "Configuration error",
            ErrorType::Filesystem => "Filesystem error",
        };
        f.write_str(s)
    }
}

/// Tags an error with the `ErrorType` that describes it to the user.
pub trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T> IntoResult<T> for Result<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| e.context(error_type))
    }
}

/// Finds the outermost `ErrorType` attached to `e`, if any.
pub fn error_type(e: &Error) -> Option<ErrorType> {
    e.downcast_ref::<ErrorType>().copied()
}
