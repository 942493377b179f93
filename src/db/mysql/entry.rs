//! Growlog entry queries for MySQL.

use sqlx::mysql::{MySqlConnection, MySqlRow};

use super::{begin, mysql_error};
use crate::db::rows;
use crate::db::transaction::finish;
use crate::db::{
    DATETIME_FORMAT, DbResult, GrowlogEntry, Id, StoreError, format_timestamp,
};

const SELECT: &str = "SELECT id, growlog_id, text,
        DATE_FORMAT(created_on, '%Y-%m-%d %H:%i:%s') AS created_on
    FROM growlog_entry";

fn from_row(row: &MySqlRow) -> DbResult<GrowlogEntry> {
    rows::entry_from_text_row(row, mysql_error)
}

pub(super) async fn get_for_growlog(
    conn: &mut MySqlConnection,
    growlog_id: Id,
) -> DbResult<Vec<GrowlogEntry>> {
    // Order on the column, not on the formatted alias
    let rows = sqlx::query(&format!(
        "{} WHERE growlog_id = ? ORDER BY growlog_entry.created_on, id",
        SELECT
    ))
    .bind(growlog_id)
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| mysql_error(&format!("Could not list entries of growlog {}", growlog_id), e))?;

    rows.iter().map(from_row).collect()
}

pub(super) async fn get_by_id(
    conn: &mut MySqlConnection,
    id: Id,
) -> DbResult<Option<GrowlogEntry>> {
    let row = sqlx::query(&format!("{} WHERE id = ?", SELECT))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| mysql_error(&format!("Could not fetch growlog entry {}", id), e))?;

    row.as_ref().map(from_row).transpose()
}

async fn write(conn: &mut MySqlConnection, entry: &GrowlogEntry) -> DbResult<()> {
    let created_on = format_timestamp(&entry.created_on, DATETIME_FORMAT);

    if entry.is_new() {
        sqlx::query("INSERT INTO growlog_entry (growlog_id, text, created_on) VALUES (?, ?, ?)")
            .bind(entry.growlog_id)
            .bind(&entry.text)
            .bind(created_on)
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                mysql_error(
                    &format!("Could not add entry to growlog {}", entry.growlog_id),
                    e,
                )
            })?;
        return Ok(());
    }

    let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM growlog_entry WHERE id = ?")
        .bind(entry.id)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| mysql_error(&format!("Could not fetch growlog entry {}", entry.id), e))?;
    if exists == 0 {
        return Err(StoreError::other(format!("No growlog entry with id {}", entry.id)));
    }

    sqlx::query("UPDATE growlog_entry SET growlog_id = ?, text = ?, created_on = ? WHERE id = ?")
        .bind(entry.growlog_id)
        .bind(&entry.text)
        .bind(created_on)
        .bind(entry.id)
        .execute(&mut *conn)
        .await
        .map_err(|e| mysql_error(&format!("Could not update growlog entry {}", entry.id), e))?;
    Ok(())
}

pub(super) async fn add(conn: &mut MySqlConnection, entry: &GrowlogEntry) -> DbResult<()> {
    let mut tx = begin(conn).await?;
    let result = write(&mut *tx, entry).await;
    finish(tx, result, mysql_error).await
}

pub(super) async fn remove(conn: &mut MySqlConnection, id: Id) -> DbResult<()> {
    let mut tx = begin(conn).await?;
    let result = sqlx::query("DELETE FROM growlog_entry WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map(|_| ())
        .map_err(|e| mysql_error(&format!("Could not remove growlog entry {}", id), e));
    finish(tx, result, mysql_error).await
}
