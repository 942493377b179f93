mod commands;
pub mod error;
pub mod overrides;
pub mod utils;


use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cli::commands::growlog::GrowlogFilter;
use crate::cli::error::{CliError, CliResult};
use crate::cli::overrides::SettingsOverrides;
use crate::cli::utils::OutputFormat;
use crate::config::{Config, paths};
use crate::db::{DatabaseSettings, Id, Store, registry};

#[derive(Parser)]
#[command(name = "growbook")]
#[command(author, version, about = "Grow diary database tool", long_about = None)]
pub struct Cli {
    /// Config file (default: $XDG_CONFIG_HOME/growbook/config.yaml)
    #[arg(long, global = true, env = "GROWBOOK_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: SettingsOverrides,

    /// Output format for lists
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List available storage engines
    Engines,
    /// Show or save connection settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    #[command(flatten)]
    Data(DataCommands),
}

#[derive(Subcommand)]
enum DataCommands {
    /// Breeder management commands
    Breeder {
        #[command(subcommand)]
        command: BreederCommands,
    },
    /// Strain management commands
    Strain {
        #[command(subcommand)]
        command: StrainCommands,
    },
    /// Growlog management commands
    Growlog {
        #[command(subcommand)]
        command: GrowlogCommands,
    },
    /// Growlog entry commands
    Entry {
        #[command(subcommand)]
        command: EntryCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective settings
    Show,
    /// Write the effective settings to the config file
    Save,
}

#[derive(Subcommand)]
enum DbCommands {
    /// Check that the database can be reached
    Test,
    /// Create the growbook tables
    Init,
}

#[derive(Subcommand)]
enum BreederCommands {
    /// List breeders
    List,
    /// Add a breeder, or update its homepage
    Add {
        name: String,
        #[arg(long)]
        homepage: Option<String>,
    },
    /// Remove a breeder and its strains
    Remove { name: String },
}

#[derive(Subcommand)]
enum StrainCommands {
    /// List strains
    List {
        /// Only strains of this breeder
        #[arg(long)]
        breeder: Option<String>,
    },
    /// Add a strain, or update the given fields
    Add {
        breeder: String,
        name: String,
        #[arg(long)]
        info: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        homepage: Option<String>,
        #[arg(long)]
        seedfinder: Option<String>,
    },
    /// Remove a strain
    Remove { breeder: String, name: String },
}

#[derive(Subcommand)]
enum GrowlogCommands {
    /// List growlogs
    List {
        #[arg(long, value_enum, default_value_t = GrowlogFilter::All)]
        show: GrowlogFilter,
    },
    /// Start a growlog, or update it
    Add {
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// Start date (YYYY-MM-DD [HH:MM:SS]); default now
        #[arg(long)]
        started: Option<String>,
    },
    /// Mark a growlog as flowering
    Flower {
        title: String,
        #[arg(long)]
        date: Option<String>,
    },
    /// Mark a growlog as finished
    Finish {
        title: String,
        #[arg(long)]
        date: Option<String>,
    },
    /// Remove a growlog and its entries
    Remove { title: String },
    /// Add a strain to a growlog
    Link {
        title: String,
        breeder: String,
        strain: String,
    },
    /// Remove a strain from a growlog
    Unlink {
        title: String,
        breeder: String,
        strain: String,
    },
    /// List the strains of a growlog
    Strains { title: String },
}

#[derive(Subcommand)]
enum EntryCommands {
    /// List the entries of a growlog
    List { title: String },
    /// Add an entry to a growlog
    Add {
        title: String,
        text: String,
        #[arg(long)]
        date: Option<String>,
    },
    /// Remove an entry
    Remove { id: Id },
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("growbook=info"));
    // A second initialization (e.g. from tests) is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub async fn run() -> miette::Result<()> {
    let cli = Cli::parse();
    init_tracing();
    registry::init();

    let Some(command) = cli.command else {
        let _ = Cli::command().print_help();
        return Ok(());
    };

    let output = execute(&cli.config, &cli.overrides, cli.format, command).await?;
    println!("{}", output);
    Ok(())
}

async fn execute(
    config: &Option<PathBuf>,
    overrides: &SettingsOverrides,
    format: OutputFormat,
    command: Commands,
) -> CliResult<String> {
    let config_path = config.clone().unwrap_or_else(paths::get_config_path);
    let config = Config::load(&config_path)?;
    let settings = overrides.apply(config.database, registry::lookup)?;

    match command {
        Commands::Engines => commands::engines::list_engines(&registry::list(), format),
        Commands::Config { command } => match command {
            ConfigCommands::Show => commands::config::show_config(&settings, format),
            ConfigCommands::Save => commands::config::save_config(&settings, &config_path),
        },
        Commands::Db { command } => {
            let mut store = create_store(settings)?;
            let result = match command {
                DbCommands::Test => commands::db::test_database(store.as_mut()).await,
                DbCommands::Init => commands::db::init_database(store.as_mut()).await,
            };
            store.close().await;
            result
        }
        Commands::Data(command) => {
            let mut store = create_store(settings)?;
            let result = match store.connect().await {
                Ok(()) => dispatch(store.as_mut(), command, format).await,
                Err(e) => Err(e.into()),
            };
            store.close().await;
            result
        }
    }
}

fn create_store(settings: DatabaseSettings) -> CliResult<Box<dyn Store>> {
    let engine = settings.engine.clone();
    registry::create(settings).ok_or(CliError::UnknownEngine { name: engine })
}

async fn dispatch(
    store: &mut dyn Store,
    command: DataCommands,
    format: OutputFormat,
) -> CliResult<String> {
    use commands::{breeder, entry, growlog, strain};

    match command {
        DataCommands::Breeder { command } => match command {
            BreederCommands::List => breeder::list_breeders(store, format).await,
            BreederCommands::Add { name, homepage } => {
                breeder::add_breeder(store, &name, homepage.as_deref()).await
            }
            BreederCommands::Remove { name } => breeder::remove_breeder(store, &name).await,
        },
        DataCommands::Strain { command } => match command {
            StrainCommands::List { breeder } => {
                strain::list_strains(store, breeder.as_deref(), format).await
            }
            StrainCommands::Add {
                breeder,
                name,
                info,
                description,
                homepage,
                seedfinder,
            } => {
                let fields = strain::StrainFields {
                    info: info.as_deref(),
                    description: description.as_deref(),
                    homepage: homepage.as_deref(),
                    seedfinder: seedfinder.as_deref(),
                };
                strain::add_strain(store, &breeder, &name, fields).await
            }
            StrainCommands::Remove { breeder, name } => {
                strain::remove_strain(store, &breeder, &name).await
            }
        },
        DataCommands::Growlog { command } => match command {
            GrowlogCommands::List { show } => growlog::list_growlogs(store, show, format).await,
            GrowlogCommands::Add {
                title,
                description,
                started,
            } => {
                growlog::add_growlog(store, &title, description.as_deref(), started.as_deref())
                    .await
            }
            GrowlogCommands::Flower { title, date } => {
                growlog::flower_growlog(store, &title, date.as_deref()).await
            }
            GrowlogCommands::Finish { title, date } => {
                growlog::finish_growlog(store, &title, date.as_deref()).await
            }
            GrowlogCommands::Remove { title } => growlog::remove_growlog(store, &title).await,
            GrowlogCommands::Link {
                title,
                breeder,
                strain,
            } => growlog::link_strain(store, &title, &breeder, &strain).await,
            GrowlogCommands::Unlink {
                title,
                breeder,
                strain,
            } => growlog::unlink_strain(store, &title, &breeder, &strain).await,
            GrowlogCommands::Strains { title } => {
                growlog::list_growlog_strains(store, &title, format).await
            }
        },
        DataCommands::Entry { command } => match command {
            EntryCommands::List { title } => entry::list_entries(store, &title, format).await,
            EntryCommands::Add { title, text, date } => {
                entry::add_entry(store, &title, &text, date.as_deref()).await
            }
            EntryCommands::Remove { id } => entry::remove_entry(store, id).await,
        },
    }
}
