//! MySQL connection lifecycle and schema creation.

use std::time::Duration;

use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::{Connection, Executor};
use tracing::{debug, info, instrument, warn};

use super::{SCHEMA, mysql_error};
use crate::db::schema::split_statements;
use crate::db::{DatabaseSettings, DbResult, StoreError};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connect options built from the fields the settings' capabilities enable.
fn options(settings: &DatabaseSettings) -> MySqlConnectOptions {
    let mut options = MySqlConnectOptions::new()
        .database(&settings.dbname)
        .charset("utf8mb4");

    if let Some(host) = settings.active_host() {
        options = options.host(host);
    }
    if let Some(port) = settings.active_port() {
        options = options.port(port);
    }
    if let Some(user) = settings.active_user() {
        options = options.username(user);
    }
    if let Some(password) = settings.active_password() {
        options = options.password(password);
    }
    options
}

async fn connect(settings: &DatabaseSettings) -> DbResult<MySqlConnection> {
    settings.validate()?;

    let target = format!("{}@{}:{}", settings.dbname, settings.host, settings.port);
    match tokio::time::timeout(CONNECT_TIMEOUT, MySqlConnection::connect_with(&options(settings)))
        .await
    {
        Ok(Ok(conn)) => Ok(conn),
        Ok(Err(e)) => Err(mysql_error(&format!("Could not connect to '{}'", target), e)),
        Err(_) => Err(StoreError::other(format!(
            "Timed out connecting to '{}' after {}s",
            target,
            CONNECT_TIMEOUT.as_secs()
        ))),
    }
}

#[instrument(skip(settings), fields(host = %settings.host, dbname = %settings.dbname))]
pub(super) async fn open(settings: &DatabaseSettings) -> DbResult<MySqlConnection> {
    let conn = connect(settings).await?;
    info!("Connected to MySQL server");
    Ok(conn)
}

pub(super) async fn close(conn: MySqlConnection) {
    if let Err(e) = conn.close().await {
        warn!(error = %e, "Closing MySQL connection failed");
    }
}

/// Open a throwaway connection and close it again.
#[instrument(skip(settings), fields(host = %settings.host, dbname = %settings.dbname))]
pub(super) async fn try_open(settings: &DatabaseSettings) -> bool {
    match connect(settings).await {
        Ok(conn) => {
            close(conn).await;
            true
        }
        Err(e) => {
            warn!(error = %e, "MySQL connection test failed");
            false
        }
    }
}

/// Run the schema script statement by statement.
///
/// MySQL commits DDL implicitly, so there is no surrounding transaction;
/// execution stops at the first failing statement.
pub(super) async fn create_schema(conn: &mut MySqlConnection) -> DbResult<()> {
    let statements = split_statements(SCHEMA);

    for (index, statement) in statements.iter().enumerate() {
        debug!(statement = index + 1, "Executing schema statement");
        Executor::execute(&mut *conn, sqlx::raw_sql(statement))
            .await
            .map_err(|e| mysql_error(&format!("Schema statement {} failed", index + 1), e))?;
    }

    info!(statements = statements.len(), "Created MySQL schema");
    Ok(())
}
