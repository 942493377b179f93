use tabled::Tabled;

use crate::cli::error::{CliError, CliResult};
use crate::cli::utils::{OutputFormat, or_dash, render, truncate_with_ellipsis};
use crate::db::{Breeder, Store};

#[derive(Tabled)]
pub(crate) struct BreederDisplay {
    #[tabled(rename = "ID")]
    pub(crate) id: i64,
    #[tabled(rename = "Name")]
    pub(crate) name: String,
    #[tabled(rename = "Homepage")]
    pub(crate) homepage: String,
}

impl From<&Breeder> for BreederDisplay {
    fn from(breeder: &Breeder) -> Self {
        Self {
            id: breeder.id,
            name: breeder.name.clone(),
            homepage: or_dash(&truncate_with_ellipsis(&breeder.homepage, 60)),
        }
    }
}

/// Look up a breeder by name, failing when it does not exist.
pub(crate) async fn find_breeder(store: &mut dyn Store, name: &str) -> CliResult<Breeder> {
    store
        .get_breeder(name)
        .await?
        .ok_or_else(|| CliError::not_found("breeder", name))
}

pub async fn list_breeders(store: &mut dyn Store, format: OutputFormat) -> CliResult<String> {
    let breeders = store.get_breeders().await?;
    render::<_, BreederDisplay>(&breeders, format, "No breeders found.")
}

/// Create a breeder, or update the homepage of an existing one.
pub async fn add_breeder(
    store: &mut dyn Store,
    name: &str,
    homepage: Option<&str>,
) -> CliResult<String> {
    let breeder = match store.get_breeder(name).await? {
        Some(mut existing) => {
            if let Some(homepage) = homepage {
                existing.homepage = homepage.to_string();
            }
            existing
        }
        None => Breeder::new(name, homepage.unwrap_or_default()),
    };
    let created = breeder.is_new();

    store.add_breeder(&breeder).await?;
    let saved = find_breeder(store, name).await?;

    Ok(format!(
        "{} breeder '{}' (id {})",
        if created { "Added" } else { "Updated" },
        saved.name,
        saved.id
    ))
}

pub async fn remove_breeder(store: &mut dyn Store, name: &str) -> CliResult<String> {
    let breeder = find_breeder(store, name).await?;
    store.remove_breeder(breeder.id).await?;
    Ok(format!("Removed breeder '{}' and its strains", breeder.name))
}
