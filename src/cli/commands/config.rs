use std::path::Path;

use crate::cli::error::CliResult;
use crate::cli::utils::OutputFormat;
use crate::config::Config;
use crate::db::DatabaseSettings;

/// Print the effective settings the way they would be saved.
pub fn show_config(settings: &DatabaseSettings, format: OutputFormat) -> CliResult<String> {
    let config = Config {
        database: settings.sanitized(),
    };
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&config)?),
        OutputFormat::Table => Ok(config.to_yaml()?.trim_end().to_string()),
    }
}

pub fn save_config(settings: &DatabaseSettings, path: &Path) -> CliResult<String> {
    Config {
        database: settings.clone(),
    }
    .save(path)?;
    Ok(format!("Saved {} settings to {}", settings.engine, path.display()))
}
