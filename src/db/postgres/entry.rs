//! Growlog entry queries for PostgreSQL.

use sqlx::postgres::{PgConnection, PgRow};

use super::{begin, postgres_error};
use crate::db::rows;
use crate::db::transaction::finish;
use crate::db::{
    DATETIME_FORMAT, DbResult, GrowlogEntry, Id, StoreError, format_timestamp,
};

const SELECT: &str = "SELECT e.id, e.growlog_id, e.text,
        to_char(e.created_on, 'YYYY-MM-DD HH24:MI:SS') AS created_on
    FROM growlog_entry e";

fn from_row(row: &PgRow) -> DbResult<GrowlogEntry> {
    rows::entry_from_text_row(row, postgres_error)
}

pub(super) async fn get_for_growlog(
    conn: &mut PgConnection,
    growlog_id: Id,
) -> DbResult<Vec<GrowlogEntry>> {
    let rows = sqlx::query(&format!(
        "{} WHERE e.growlog_id = $1 ORDER BY e.created_on, e.id",
        SELECT
    ))
    .bind(growlog_id)
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| {
        postgres_error(&format!("Could not list entries of growlog {}", growlog_id), e)
    })?;

    rows.iter().map(from_row).collect()
}

pub(super) async fn get_by_id(conn: &mut PgConnection, id: Id) -> DbResult<Option<GrowlogEntry>> {
    let row = sqlx::query(&format!("{} WHERE e.id = $1", SELECT))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| postgres_error(&format!("Could not fetch growlog entry {}", id), e))?;

    row.as_ref().map(from_row).transpose()
}

async fn write(conn: &mut PgConnection, entry: &GrowlogEntry) -> DbResult<()> {
    let created_on = format_timestamp(&entry.created_on, DATETIME_FORMAT);

    if entry.is_new() {
        sqlx::query(
            "INSERT INTO growlog_entry (growlog_id, text, created_on)
             VALUES ($1, $2, $3::timestamp)",
        )
        .bind(entry.growlog_id)
        .bind(&entry.text)
        .bind(created_on)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            postgres_error(
                &format!("Could not add entry to growlog {}", entry.growlog_id),
                e,
            )
        })?;
        return Ok(());
    }

    let result = sqlx::query(
        "UPDATE growlog_entry SET growlog_id = $1, text = $2, created_on = $3::timestamp
         WHERE id = $4",
    )
    .bind(entry.growlog_id)
    .bind(&entry.text)
    .bind(created_on)
    .bind(entry.id)
    .execute(&mut *conn)
    .await
    .map_err(|e| postgres_error(&format!("Could not update growlog entry {}", entry.id), e))?;

    if result.rows_affected() == 0 {
        return Err(StoreError::other(format!("No growlog entry with id {}", entry.id)));
    }
    Ok(())
}

pub(super) async fn add(conn: &mut PgConnection, entry: &GrowlogEntry) -> DbResult<()> {
    let mut tx = begin(conn).await?;
    let result = write(&mut *tx, entry).await;
    finish(tx, result, postgres_error).await
}

pub(super) async fn remove(conn: &mut PgConnection, id: Id) -> DbResult<()> {
    let mut tx = begin(conn).await?;
    let result = sqlx::query("DELETE FROM growlog_entry WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map(|_| ())
        .map_err(|e| postgres_error(&format!("Could not remove growlog entry {}", id), e));
    finish(tx, result, postgres_error).await
}
