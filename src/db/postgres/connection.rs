//! PostgreSQL connection lifecycle and schema creation.

use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::{Connection, Executor};
use tracing::{debug, info, instrument, warn};

use super::{SCHEMA, begin, postgres_error};
use crate::db::schema::split_statements;
use crate::db::transaction::finish;
use crate::db::{DatabaseSettings, DbResult, StoreError};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

fn options(settings: &DatabaseSettings) -> PgConnectOptions {
    let mut options = PgConnectOptions::new()
        .database(&settings.dbname)
        .application_name("growbook");

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

async fn connect(settings: &DatabaseSettings) -> DbResult<PgConnection> {
    settings.validate()?;

    let target = format!("{}@{}:{}", settings.dbname, settings.host, settings.port);
    match tokio::time::timeout(CONNECT_TIMEOUT, PgConnection::connect_with(&options(settings)))
        .await
    {
        Ok(Ok(conn)) => Ok(conn),
        Ok(Err(e)) => Err(postgres_error(&format!("Could not connect to '{}'", target), e)),
        Err(_) => Err(StoreError::other(format!(
            "Timed out connecting to '{}' after {}s",
            target,
            CONNECT_TIMEOUT.as_secs()
        ))),
    }
}

#[instrument(skip(settings), fields(host = %settings.host, dbname = %settings.dbname))]
pub(super) async fn open(settings: &DatabaseSettings) -> DbResult<PgConnection> {
    let conn = connect(settings).await?;
    info!("Connected to PostgreSQL server");
    Ok(conn)
}

pub(super) async fn close(conn: PgConnection) {
    if let Err(e) = conn.close().await {
        warn!(error = %e, "Closing PostgreSQL connection failed");
    }
}

#[instrument(skip(settings), fields(host = %settings.host, dbname = %settings.dbname))]
pub(super) async fn try_open(settings: &DatabaseSettings) -> bool {
    match connect(settings).await {
        Ok(conn) => {
            close(conn).await;
            true
        }
        Err(e) => {
            warn!(error = %e, "PostgreSQL connection test failed");
            false
        }
    }
}

/// Run the schema script inside a single transaction; PostgreSQL DDL is
/// transactional, so a failure leaves no tables behind.
pub(super) async fn create_schema(conn: &mut PgConnection) -> DbResult<()> {
    let statements = split_statements(SCHEMA);
    let mut tx = begin(conn).await?;

    let mut result = Ok(());
    for (index, statement) in statements.iter().enumerate() {
        debug!(statement = index + 1, "Executing schema statement");
        if let Err(e) = Executor::execute(&mut *tx, sqlx::raw_sql(statement)).await {
            result = Err(postgres_error(
                &format!("Schema statement {} failed", index + 1),
                e,
            ));
            break;
        }
    }

    finish(tx, result, postgres_error).await?;
    info!(statements = statements.len(), "Created PostgreSQL schema");
    Ok(())
}
