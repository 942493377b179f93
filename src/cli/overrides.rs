//! Command-line overrides for the configured connection settings.

use std::sync::Arc;

use clap::Args;
use tracing::warn;

use crate::cli::error::{CliError, CliResult};
use crate::db::{Capabilities, DatabaseSettings, StoreFactory};

#[derive(Args, Debug, Default, Clone)]
pub struct SettingsOverrides {
    /// Storage engine (see `growbook engines`)
    #[arg(long, global = true)]
    pub engine: Option<String>,

    /// Database name, or file path for file-based engines
    #[arg(long = "db", global = true)]
    pub dbname: Option<String>,

    /// Server host
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Server user
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Server password
    #[arg(long, global = true, env = "GROWBOOK_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

fn ignored(flag: &str, engine: &str) {
    warn!("--{} has no effect for engine '{}'", flag, engine);
}

impl SettingsOverrides {
    /// Apply the overrides on top of `settings`.
    ///
    /// Switching engines starts over from the new engine's defaults. Values
    /// for fields the engine has no capability for are ignored.
    pub fn apply(
        &self,
        mut settings: DatabaseSettings,
        lookup: impl Fn(&str) -> Option<Arc<dyn StoreFactory>>,
    ) -> CliResult<DatabaseSettings> {
        if let Some(engine) = self.engine.as_deref().filter(|e| *e != settings.engine) {
            let factory = lookup(engine).ok_or_else(|| CliError::UnknownEngine {
                name: engine.to_string(),
            })?;
            settings = factory.default_settings();
        }

        if let Some(dbname) = &self.dbname {
            settings.dbname = dbname.clone();
        }

        let engine = settings.engine.clone();
        let capabilities = settings.capabilities;
        let fields: [(&str, Capabilities, &Option<String>, &mut String); 3] = [
            ("host", Capabilities::HAS_HOST, &self.host, &mut settings.host),
            ("user", Capabilities::HAS_USER, &self.user, &mut settings.user),
            (
                "password",
                Capabilities::HAS_PASSWORD,
                &self.password,
                &mut settings.password,
            ),
        ];
        for (flag, capability, value, field) in fields {
            if let Some(value) = value {
                if capabilities.contains(capability) {
                    *field = value.clone();
                } else {
                    ignored(flag, &engine);
                }
            }
        }

        if let Some(port) = self.port {
            if settings.has(Capabilities::HAS_PORT) {
                settings.port = port;
            } else {
                ignored("port", &engine);
            }
        }

        if settings.ask_password && settings.active_password().is_none() {
            return Err(CliError::PasswordRequired { engine });
        }
        Ok(settings)
    }
}
