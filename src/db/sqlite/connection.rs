//! SQLite connection lifecycle and schema creation.

use std::io::ErrorKind;
use std::path::Path;

use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{Connection, Executor, SqliteConnection};
use tracing::{debug, info, instrument, warn};

use super::{SCHEMA, begin, sqlite_error};
use crate::db::schema::split_statements;
use crate::db::transaction::finish;
use crate::db::{DatabaseSettings, DbResult};

/// Files SQLite may leave next to the database.
const SIDECAR_SUFFIXES: [&str; 3] = ["-journal", "-wal", "-shm"];

fn options(settings: &DatabaseSettings) -> SqliteConnectOptions {
    SqliteConnectOptions::new()
        .filename(&settings.dbname)
        .create_if_missing(true)
        .foreign_keys(true)
}

/// Open (creating if missing) the database file named by `settings.dbname`.
#[instrument(skip(settings), fields(dbname = %settings.dbname))]
pub(super) async fn open(settings: &DatabaseSettings) -> DbResult<SqliteConnection> {
    settings.validate()?;

    let conn = SqliteConnection::connect_with(&options(settings))
        .await
        .map_err(|e| {
            sqlite_error(
                &format!("Could not open database '{}'", settings.dbname),
                e,
            )
        })?;

    info!("Opened SQLite database");
    Ok(conn)
}

pub(super) async fn close(conn: SqliteConnection) {
    if let Err(e) = conn.close().await {
        warn!(error = %e, "Closing SQLite connection failed");
    }
}

/// Try to open the database and close it again.
///
/// A file created only for this check is removed afterwards, together with
/// any journal files.
#[instrument(skip(settings), fields(dbname = %settings.dbname))]
pub(super) async fn try_open(settings: &DatabaseSettings) -> bool {
    if let Err(e) = settings.validate() {
        warn!(error = %e, "Invalid SQLite settings");
        return false;
    }

    let path = Path::new(&settings.dbname);
    let existed = path.exists();
    let sidecars_existed: Vec<bool> = SIDECAR_SUFFIXES
        .iter()
        .map(|suffix| sidecar(path, suffix).exists())
        .collect();

    let reachable = match SqliteConnection::connect_with(&options(settings)).await {
        Ok(conn) => {
            close(conn).await;
            true
        }
        Err(e) => {
            warn!(error = %e, "SQLite connection test failed");
            false
        }
    };

    if !existed {
        remove_if_present(path);
    }
    for (suffix, existed) in SIDECAR_SUFFIXES.iter().zip(sidecars_existed) {
        if !existed {
            remove_if_present(&sidecar(path, suffix));
        }
    }

    reachable
}

fn sidecar(path: &Path, suffix: &str) -> std::path::PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    name.into()
}

fn remove_if_present(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => debug!(path = %path.display(), "Removed scratch database file"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "Could not remove scratch database file"),
    }
}

/// Run the schema script inside a single transaction.
pub(super) async fn create_schema(conn: &mut SqliteConnection) -> DbResult<()> {
    let statements = split_statements(SCHEMA);
    let mut tx = begin(conn).await?;

    let mut result = Ok(());
    for (index, statement) in statements.iter().enumerate() {
        debug!(statement = index + 1, "Executing schema statement");
        if let Err(e) = Executor::execute(&mut *tx, sqlx::raw_sql(statement)).await {
            result = Err(sqlite_error(
                &format!("Schema statement {} failed", index + 1),
                e,
            ));
            break;
        }
    }

    finish(tx, result, sqlite_error).await?;
    info!(statements = statements.len(), "Created SQLite schema");
    Ok(())
}
