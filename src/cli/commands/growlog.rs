use clap::ValueEnum;
use tabled::Tabled;

use crate::cli::commands::strain::{StrainDisplay, find_strain};
use crate::cli::error::{CliError, CliResult};
use crate::cli::utils::{OutputFormat, or_dash, parse_date, render, truncate_with_ellipsis};
use crate::db::{DATE_FORMAT, Growlog, Store, now};

/// Which growlogs `growlog list` shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum GrowlogFilter {
    #[default]
    All,
    Ongoing,
    Finished,
    Flowering,
}

#[derive(Tabled)]
pub(crate) struct GrowlogDisplay {
    #[tabled(rename = "ID")]
    pub(crate) id: i64,
    #[tabled(rename = "Title")]
    pub(crate) title: String,
    #[tabled(rename = "State")]
    pub(crate) state: &'static str,
    #[tabled(rename = "Started")]
    pub(crate) created_on: String,
    #[tabled(rename = "Flowering")]
    pub(crate) flower_on: String,
    #[tabled(rename = "Finished")]
    pub(crate) finished_on: String,
}

fn state(growlog: &Growlog) -> &'static str {
    if growlog.is_finished() {
        "finished"
    } else if growlog.is_flowering() {
        "flowering"
    } else {
        "vegetative"
    }
}

impl From<&Growlog> for GrowlogDisplay {
    fn from(growlog: &Growlog) -> Self {
        Self {
            id: growlog.id,
            title: truncate_with_ellipsis(&growlog.title, 40),
            state: state(growlog),
            created_on: growlog.created_on_format(DATE_FORMAT),
            flower_on: or_dash(&growlog.flower_on_format(DATE_FORMAT)),
            finished_on: or_dash(&growlog.finished_on_format(DATE_FORMAT)),
        }
    }
}

pub(crate) async fn find_growlog(store: &mut dyn Store, title: &str) -> CliResult<Growlog> {
    store
        .get_growlog(title)
        .await?
        .ok_or_else(|| CliError::not_found("growlog", title))
}

pub async fn list_growlogs(
    store: &mut dyn Store,
    filter: GrowlogFilter,
    format: OutputFormat,
) -> CliResult<String> {
    let growlogs = match filter {
        GrowlogFilter::All => store.get_growlogs().await?,
        GrowlogFilter::Ongoing => store.get_ongoing_growlogs().await?,
        GrowlogFilter::Finished => store.get_finished_growlogs().await?,
        GrowlogFilter::Flowering => store.get_flowering_growlogs().await?,
    };
    render::<_, GrowlogDisplay>(&growlogs, format, "No growlogs found.")
}

/// Start a growlog, or update the description and start date of an existing one.
pub async fn add_growlog(
    store: &mut dyn Store,
    title: &str,
    description: Option<&str>,
    started: Option<&str>,
) -> CliResult<String> {
    let started = started.map(parse_date).transpose()?;
    let mut growlog = store
        .get_growlog(title)
        .await?
        .unwrap_or_else(|| Growlog::new(title, ""));
    let created = growlog.is_new();

    if let Some(description) = description {
        growlog.description = description.to_string();
    }
    if let Some(started) = started {
        growlog.created_on = started;
    }

    store.add_growlog(&growlog).await?;
    let saved = find_growlog(store, title).await?;
    Ok(format!(
        "{} growlog '{}' (id {})",
        if created { "Started" } else { "Updated" },
        saved.title,
        saved.id
    ))
}

/// Mark a growlog as flowering since `date` (default: now).
pub async fn flower_growlog(
    store: &mut dyn Store,
    title: &str,
    date: Option<&str>,
) -> CliResult<String> {
    let date = date.map(parse_date).transpose()?.unwrap_or_else(now);
    let mut growlog = find_growlog(store, title).await?;
    growlog.set_flower_on(Some(date));
    store.add_growlog(&growlog).await?;
    Ok(format!(
        "Growlog '{}' flowering since {}",
        growlog.title,
        growlog.flower_on_format(DATE_FORMAT)
    ))
}

/// Mark a growlog as finished on `date` (default: now).
pub async fn finish_growlog(
    store: &mut dyn Store,
    title: &str,
    date: Option<&str>,
) -> CliResult<String> {
    let date = date.map(parse_date).transpose()?.unwrap_or_else(now);
    let mut growlog = find_growlog(store, title).await?;
    growlog.set_finished_on(Some(date));
    store.add_growlog(&growlog).await?;
    Ok(format!(
        "Growlog '{}' finished on {}",
        growlog.title,
        growlog.finished_on_format(DATE_FORMAT)
    ))
}

pub async fn remove_growlog(store: &mut dyn Store, title: &str) -> CliResult<String> {
    let growlog = find_growlog(store, title).await?;
    store.remove_growlog(growlog.id).await?;
    Ok(format!("Removed growlog '{}' and its entries", growlog.title))
}

pub async fn link_strain(
    store: &mut dyn Store,
    title: &str,
    breeder: &str,
    strain: &str,
) -> CliResult<String> {
    let growlog = find_growlog(store, title).await?;
    let strain = find_strain(store, breeder, strain).await?;
    store.add_strain_to_growlog(growlog.id, strain.id).await?;
    Ok(format!(
        "Growing '{}/{}' in '{}'",
        strain.breeder_name, strain.name, growlog.title
    ))
}

pub async fn unlink_strain(
    store: &mut dyn Store,
    title: &str,
    breeder: &str,
    strain: &str,
) -> CliResult<String> {
    let growlog = find_growlog(store, title).await?;
    let strain = find_strain(store, breeder, strain).await?;
    store.remove_strain_from_growlog(growlog.id, strain.id).await?;
    Ok(format!(
        "Removed '{}/{}' from '{}'",
        strain.breeder_name, strain.name, growlog.title
    ))
}

/// Strains grown in a growlog.
pub async fn list_growlog_strains(
    store: &mut dyn Store,
    title: &str,
    format: OutputFormat,
) -> CliResult<String> {
    let growlog = find_growlog(store, title).await?;
    let strains = store.get_strains_for_growlog(growlog.id).await?;
    render::<_, StrainDisplay>(&strains, format, "No strains in this growlog.")
}
