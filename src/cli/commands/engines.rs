use std::sync::Arc;

use serde::Serialize;
use tabled::Tabled;

use crate::cli::error::CliResult;
use crate::cli::utils::{OutputFormat, or_dash, render};
use crate::db::{Capabilities, DatabaseSettings, StoreFactory};

#[derive(Debug, Serialize)]
pub(crate) struct EngineInfo {
    pub(crate) engine: String,
    pub(crate) description: String,
    pub(crate) defaults: DatabaseSettings,
}

#[derive(Tabled)]
pub(crate) struct EngineDisplay {
    #[tabled(rename = "Engine")]
    pub(crate) engine: String,
    #[tabled(rename = "Description")]
    pub(crate) description: String,
    #[tabled(rename = "Capabilities")]
    pub(crate) capabilities: String,
    #[tabled(rename = "Default target")]
    pub(crate) target: String,
}

/// Short description of where `settings` point to.
pub(crate) fn describe_target(settings: &DatabaseSettings) -> String {
    if settings.has(Capabilities::NAME_IS_FILENAME) {
        return settings.dbname.clone();
    }

    let mut target = String::new();
    if let Some(user) = settings.active_user() {
        target.push_str(user);
        target.push('@');
    }
    target.push_str(settings.active_host().unwrap_or("localhost"));
    if let Some(port) = settings.active_port() {
        target.push_str(&format!(":{}", port));
    }
    target.push('/');
    target.push_str(&settings.dbname);
    target
}

impl From<&EngineInfo> for EngineDisplay {
    fn from(info: &EngineInfo) -> Self {
        Self {
            engine: info.engine.clone(),
            description: info.description.clone(),
            capabilities: info.defaults.capabilities.to_string(),
            target: or_dash(&describe_target(&info.defaults)),
        }
    }
}

pub fn list_engines(
    factories: &[Arc<dyn StoreFactory>],
    format: OutputFormat,
) -> CliResult<String> {
    let engines: Vec<EngineInfo> = factories
        .iter()
        .map(|factory| EngineInfo {
            engine: factory.engine().to_string(),
            description: factory.description().to_string(),
            defaults: factory.default_settings().sanitized(),
        })
        .collect();
    render::<_, EngineDisplay>(&engines, format, "No engines registered.")
}
