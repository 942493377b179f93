//! Shared utilities for CLI commands

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::error::{CliError, CliResult};
use crate::db::{DATE_FORMAT, DATETIME_FORMAT, parse_timestamp};

/// How list and show commands print their results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Truncate a string with ellipsis if it exceeds max length
pub fn truncate_with_ellipsis(s: &str, max: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

/// `-` for empty values
pub fn or_dash(s: &str) -> String {
    if s.is_empty() {
        "-".to_string()
    } else {
        s.to_string()
    }
}

/// Apply consistent table styling
pub fn apply_table_style(table: &mut Table) {
    table.with(Style::rounded());
}

/// Render `items` as a table of `D` rows, or as pretty JSON.
pub fn render<T, D>(items: &[T], format: OutputFormat, empty: &str) -> CliResult<String>
where
    T: Serialize,
    D: Tabled + for<'a> From<&'a T>,
{
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(items)?),
        OutputFormat::Table if items.is_empty() => Ok(empty.to_string()),
        OutputFormat::Table => {
            let rows: Vec<D> = items.iter().map(D::from).collect();
            let mut table = Table::new(rows);
            apply_table_style(&mut table);
            Ok(table.to_string())
        }
    }
}

/// Parse a user-supplied date, with or without time of day.
pub fn parse_date(value: &str) -> CliResult<DateTime<Utc>> {
    let value = value.trim();
    parse_timestamp(value, DATETIME_FORMAT)
        .or_else(|_| parse_timestamp(value, DATE_FORMAT))
        .map_err(|_| CliError::InvalidDate {
            value: value.to_string(),
        })
}
