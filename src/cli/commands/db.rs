use crate::cli::commands::engines::describe_target;
use crate::cli::error::{CliError, CliResult};
use crate::db::Store;

/// Check that the configured database can be reached.
pub async fn test_database(store: &mut dyn Store) -> CliResult<String> {
    let target = describe_target(store.settings());
    if store.test_connection().await {
        Ok(format!("Connection to {} database '{}' OK", store.engine(), target))
    } else {
        Err(CliError::ConnectionFailed {
            engine: store.engine().to_string(),
            target,
        })
    }
}

/// Create the growbook tables.
pub async fn init_database(store: &mut dyn Store) -> CliResult<String> {
    store.create_database().await?;
    Ok(format!(
        "Created growbook tables in {} database '{}'",
        store.engine(),
        describe_target(store.settings())
    ))
}
