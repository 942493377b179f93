//! Database error types.
//!
//! Every adapter translates failures of its native client into a single
//! carrier, [`StoreError`], so callers never see engine-specific error types.
//! It uses miette for diagnostic output and thiserror for derive macros.

use miette::Diagnostic;
use thiserror::Error;

/// Code used when no engine-native error code applies.
pub const NO_CODE: i64 = -1;

/// Store operation error.
///
/// `code` holds the engine-native error code (SQLite extended result code,
/// MySQL server error number, numeric PostgreSQL SQLSTATE) or [`NO_CODE`].
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
#[error("Store error ({code}): {message}")]
#[diagnostic(code(growbook::db::store_error))]
pub struct StoreError {
    code: i64,
    message: String,
}

impl StoreError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Error without an engine-native code.
    pub fn other(message: impl Into<String>) -> Self {
        Self::new(NO_CODE, message)
    }

    /// Returned by data operations on a store that has no live connection.
    pub fn not_connected(engine: &str) -> Self {
        Self::other(format!("{} store is not connected", engine))
    }

    pub fn code(&self) -> i64 {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Result type for store operations.
pub type DbResult<T> = Result<T, StoreError>;

/// Translate a sqlx failure into a [`StoreError`].
///
/// `native_code` extracts the engine-specific numeric code from a database
/// error; every adapter supplies its own.
pub(crate) fn translate(
    context: &str,
    error: sqlx::Error,
    native_code: impl Fn(&(dyn sqlx::error::DatabaseError + 'static)) -> Option<i64>,
) -> StoreError {
    let code = error
        .as_database_error()
        .and_then(|db_error| native_code(db_error))
        .unwrap_or(NO_CODE);
    StoreError::new(code, format!("{}: {}", context, error))
}
