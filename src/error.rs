//! Error types shared by the whole crate.
//!
//! Internally everything is an `anyhow::Error`. Errors that leave the command layer are tagged
//! with an `ErrorType` so that callers can tell a broken configuration apart from a malformed
//! document or a bad request without parsing messages.

use std::fmt::{Display, Formatter};

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// The broad category of a public error.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum ErrorType {
    /// The home directory or `config.json` is missing or invalid.
    Config,
    /// A persisted or imported document could not be understood.
    Format,
    /// Reading or writing a file failed.
    Storage,
    /// The operator asked for something that cannot be done, e.g. an unknown unit.
    Request,
}

impl Display for ErrorType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorType::Config => "Configuration error",
            ErrorType::Format => "Invalid format",
            ErrorType::Storage => "Storage error",
            ErrorType::Request => "Invalid request",
        };
        f.write_str(s)
    }
}

impl std::error::Error for ErrorType {}

/// Tags an error with its `ErrorType` on its way out of the command layer.
pub(crate) trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T, E> IntoResult<T> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| e.into().context(error_type))
    }
}

/// Returns the `ErrorType` that an error was tagged with, if any.
pub fn error_type(e: &Error) -> Option<ErrorType> {
    e.downcast_ref::<ErrorType>().copied()
}
