use tabled::Tabled;

use crate::cli::commands::growlog::find_growlog;
use crate::cli::error::{CliError, CliResult};
use crate::cli::utils::{OutputFormat, parse_date, render, truncate_with_ellipsis};
use crate::db::{DATETIME_FORMAT, GrowlogEntry, Id, Store};

#[derive(Tabled)]
pub(crate) struct EntryDisplay {
    #[tabled(rename = "ID")]
    pub(crate) id: i64,
    #[tabled(rename = "Date")]
    pub(crate) created_on: String,
    #[tabled(rename = "Text")]
    pub(crate) text: String,
}

impl From<&GrowlogEntry> for EntryDisplay {
    fn from(entry: &GrowlogEntry) -> Self {
        Self {
            id: entry.id,
            created_on: entry.created_on_format(DATETIME_FORMAT),
            text: truncate_with_ellipsis(&entry.text, 70),
        }
    }
}

pub async fn list_entries(
    store: &mut dyn Store,
    title: &str,
    format: OutputFormat,
) -> CliResult<String> {
    let growlog = find_growlog(store, title).await?;
    let entries = store.get_growlog_entries(growlog.id).await?;
    render::<_, EntryDisplay>(&entries, format, "No entries yet.")
}

pub async fn add_entry(
    store: &mut dyn Store,
    title: &str,
    text: &str,
    date: Option<&str>,
) -> CliResult<String> {
    let date = date.map(parse_date).transpose()?;
    let growlog = find_growlog(store, title).await?;

    let mut entry = GrowlogEntry::new(growlog.id, text);
    if let Some(date) = date {
        entry.created_on = date;
    }
    store.add_growlog_entry(&entry).await?;

    Ok(format!(
        "Added entry to '{}' dated {}",
        growlog.title,
        entry.created_on_format(DATETIME_FORMAT)
    ))
}

pub async fn remove_entry(store: &mut dyn Store, id: Id) -> CliResult<String> {
    if store.get_growlog_entry(id).await?.is_none() {
        return Err(CliError::not_found("entry", id.to_string()));
    }
    store.remove_growlog_entry(id).await?;
    Ok(format!("Removed entry {}", id))
}
