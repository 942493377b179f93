use miette::Diagnostic;
use thiserror::Error;

use crate::config::ConfigError;
use crate::db::StoreError;

#[derive(Error, Diagnostic, Debug)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(code(growbook::db::store_error))]
    Store(#[from] StoreError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error("Unknown engine '{name}'")]
    #[diagnostic(
        code(growbook::cli::unknown_engine),
        help("Run `growbook engines` to list the engines built into this binary.")
    )]
    UnknownEngine { name: String },

    #[error("Cannot reach the {engine} database '{target}'")]
    #[diagnostic(
        code(growbook::cli::connection_failed),
        help("Check the connection settings with `growbook config show`.")
    )]
    ConnectionFailed { engine: String, target: String },

    #[error("No {kind} named '{name}'")]
    #[diagnostic(code(growbook::cli::not_found))]
    NotFound { kind: &'static str, name: String },

    #[error("Password required for {engine}")]
    #[diagnostic(
        code(growbook::cli::password_required),
        help("Pass --password or set GROWBOOK_PASSWORD.")
    )]
    PasswordRequired { engine: String },

    #[error("Invalid date '{value}'")]
    #[diagnostic(
        code(growbook::cli::invalid_date),
        help("Use YYYY-MM-DD or \"YYYY-MM-DD HH:MM:SS\".")
    )]
    InvalidDate { value: String },

    #[error("Could not format output: {message}")]
    #[diagnostic(code(growbook::cli::output))]
    Output { message: String },
}

impl CliError {
    pub(crate) fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        CliError::NotFound {
            kind,
            name: name.into(),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Output {
            message: e.to_string(),
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;
