use tabled::Tabled;

use crate::cli::commands::breeder::find_breeder;
use crate::cli::error::{CliError, CliResult};
use crate::cli::utils::{OutputFormat, or_dash, render, truncate_with_ellipsis};
use crate::db::{Store, Strain};

#[derive(Tabled)]
pub(crate) struct StrainDisplay {
    #[tabled(rename = "ID")]
    pub(crate) id: i64,
    #[tabled(rename = "Breeder")]
    pub(crate) breeder: String,
    #[tabled(rename = "Name")]
    pub(crate) name: String,
    #[tabled(rename = "Info")]
    pub(crate) info: String,
    #[tabled(rename = "Seedfinder")]
    pub(crate) seedfinder: String,
}

impl From<&Strain> for StrainDisplay {
    fn from(strain: &Strain) -> Self {
        Self {
            id: strain.id,
            breeder: strain.breeder_name.clone(),
            name: strain.name.clone(),
            info: or_dash(&truncate_with_ellipsis(&strain.info, 40)),
            seedfinder: or_dash(&strain.seedfinder),
        }
    }
}

/// Optional strain fields given on the command line.
#[derive(Debug, Default)]
pub struct StrainFields<'a> {
    pub info: Option<&'a str>,
    pub description: Option<&'a str>,
    pub homepage: Option<&'a str>,
    pub seedfinder: Option<&'a str>,
}

impl StrainFields<'_> {
    fn apply(&self, strain: &mut Strain) {
        if let Some(info) = self.info {
            strain.info = info.to_string();
        }
        if let Some(description) = self.description {
            strain.description = description.to_string();
        }
        if let Some(homepage) = self.homepage {
            strain.homepage = homepage.to_string();
        }
        if let Some(seedfinder) = self.seedfinder {
            strain.seedfinder = seedfinder.to_string();
        }
    }
}

pub(crate) async fn find_strain(
    store: &mut dyn Store,
    breeder: &str,
    name: &str,
) -> CliResult<Strain> {
    let breeder = find_breeder(store, breeder).await?;
    store
        .get_strain(breeder.id, name)
        .await?
        .ok_or_else(|| CliError::not_found("strain", format!("{}/{}", breeder.name, name)))
}

pub async fn list_strains(
    store: &mut dyn Store,
    breeder: Option<&str>,
    format: OutputFormat,
) -> CliResult<String> {
    let strains = match breeder {
        Some(name) => {
            let breeder = find_breeder(store, name).await?;
            store.get_strains_for_breeder(breeder.id).await?
        }
        None => store.get_strains().await?,
    };
    render::<_, StrainDisplay>(&strains, format, "No strains found.")
}

/// Create a strain under `breeder`, or update the given fields of an existing one.
pub async fn add_strain(
    store: &mut dyn Store,
    breeder: &str,
    name: &str,
    fields: StrainFields<'_>,
) -> CliResult<String> {
    let owner = find_breeder(store, breeder).await?;
    let mut strain = store
        .get_strain(owner.id, name)
        .await?
        .unwrap_or_else(|| Strain::new(owner.id, name));
    let created = strain.is_new();
    fields.apply(&mut strain);

    store.add_strain(&strain).await?;
    let saved = find_strain(store, breeder, name).await?;

    Ok(format!(
        "{} strain '{}/{}' (id {})",
        if created { "Added" } else { "Updated" },
        saved.breeder_name,
        saved.name,
        saved.id
    ))
}

pub async fn remove_strain(store: &mut dyn Store, breeder: &str, name: &str) -> CliResult<String> {
    let strain = find_strain(store, breeder, name).await?;
    store.remove_strain(strain.id).await?;
    Ok(format!("Removed strain '{}/{}'", strain.breeder_name, strain.name))
}
