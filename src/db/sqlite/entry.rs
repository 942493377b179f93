//! Growlog entry queries for SQLite.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

use super::{begin, sqlite_error};
use crate::db::transaction::finish;
use crate::db::{DbResult, GrowlogEntry, Id, StoreError, from_unix_seconds};

fn from_row(row: &SqliteRow) -> DbResult<GrowlogEntry> {
    let column = |e| sqlite_error("Malformed growlog entry row", e);
    let created_on: i64 = row.try_get("created_on").map_err(column)?;

    Ok(GrowlogEntry {
        id: row.try_get("id").map_err(column)?,
        growlog_id: row.try_get("growlog_id").map_err(column)?,
        text: row.try_get("text").map_err(column)?,
        created_on: from_unix_seconds(created_on)?,
    })
}

pub(super) async fn get_for_growlog(
    conn: &mut SqliteConnection,
    growlog_id: Id,
) -> DbResult<Vec<GrowlogEntry>> {
    let rows = sqlx::query(
        "SELECT id, growlog_id, text, created_on FROM growlog_entry
         WHERE growlog_id = ? ORDER BY created_on, id",
    )
    .bind(growlog_id)
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| sqlite_error(&format!("Could not list entries of growlog {}", growlog_id), e))?;

    rows.iter().map(from_row).collect()
}

pub(super) async fn get_by_id(
    conn: &mut SqliteConnection,
    id: Id,
) -> DbResult<Option<GrowlogEntry>> {
    let row = sqlx::query("SELECT id, growlog_id, text, created_on FROM growlog_entry WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| sqlite_error(&format!("Could not fetch growlog entry {}", id), e))?;

    row.as_ref().map(from_row).transpose()
}

async fn write(conn: &mut SqliteConnection, entry: &GrowlogEntry) -> DbResult<()> {
    if entry.is_new() {
        sqlx::query("INSERT INTO growlog_entry (growlog_id, text, created_on) VALUES (?, ?, ?)")
            .bind(entry.growlog_id)
            .bind(&entry.text)
            .bind(entry.created_on.timestamp())
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                sqlite_error(
                    &format!("Could not add entry to growlog {}", entry.growlog_id),
                    e,
                )
            })?;
        return Ok(());
    }

    let result = sqlx::query(
        "UPDATE growlog_entry SET growlog_id = ?, text = ?, created_on = ? WHERE id = ?",
    )
    .bind(entry.growlog_id)
    .bind(&entry.text)
    .bind(entry.created_on.timestamp())
    .bind(entry.id)
    .execute(&mut *conn)
    .await
    .map_err(|e| sqlite_error(&format!("Could not update growlog entry {}", entry.id), e))?;

    if result.rows_affected() == 0 {
        return Err(StoreError::other(format!("No growlog entry with id {}", entry.id)));
    }
    Ok(())
}

pub(super) async fn add(conn: &mut SqliteConnection, entry: &GrowlogEntry) -> DbResult<()> {
    let mut tx = begin(conn).await?;
    let result = write(&mut *tx, entry).await;
    finish(tx, result, sqlite_error).await
}

pub(super) async fn remove(conn: &mut SqliteConnection, id: Id) -> DbResult<()> {
    let mut tx = begin(conn).await?;
    let result = sqlx::query("DELETE FROM growlog_entry WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map(|_| ())
        .map_err(|e| sqlite_error(&format!("Could not remove growlog entry {}", id), e));
    finish(tx, result, sqlite_error).await
}
