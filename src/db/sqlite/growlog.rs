//! Growlog queries for SQLite, including the growlog/strain join table.
//!
//! Timestamps are stored as unix seconds. Unset flowering and finishing
//! dates are NULL.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

use super::{begin, sqlite_error};
use crate::db::transaction::finish;
use crate::db::{DbResult, Growlog, Id, StoreError, from_unix_seconds};

fn from_row(row: &SqliteRow) -> DbResult<Growlog> {
    let column = |e| sqlite_error("Malformed growlog row", e);

    let created_on: i64 = row.try_get("created_on").map_err(column)?;
    let flower_on: Option<i64> = row.try_get("flower_on").map_err(column)?;
    let finished_on: Option<i64> = row.try_get("finished_on").map_err(column)?;

    Ok(Growlog {
        id: row.try_get("id").map_err(column)?,
        title: row.try_get("title").map_err(column)?,
        description: row.try_get("description").map_err(column)?,
        created_on: from_unix_seconds(created_on)?,
        flower_on: flower_on.map(from_unix_seconds).transpose()?,
        finished_on: finished_on.map(from_unix_seconds).transpose()?,
    })
}

async fn fetch(
    conn: &mut SqliteConnection,
    sql: &'static str,
    context: &str,
) -> DbResult<Vec<Growlog>> {
    let rows = sqlx::query(sql)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| sqlite_error(context, e))?;

    rows.iter().map(from_row).collect()
}

pub(super) async fn get_all(conn: &mut SqliteConnection) -> DbResult<Vec<Growlog>> {
    fetch(
        conn,
        "SELECT id, title, description, created_on, flower_on, finished_on
         FROM growlog ORDER BY title",
        "Could not list growlogs",
    )
    .await
}

pub(super) async fn get_ongoing(conn: &mut SqliteConnection) -> DbResult<Vec<Growlog>> {
    fetch(
        conn,
        "SELECT id, title, description, created_on, flower_on, finished_on
         FROM growlog WHERE finished_on IS NULL ORDER BY title",
        "Could not list ongoing growlogs",
    )
    .await
}

pub(super) async fn get_finished(conn: &mut SqliteConnection) -> DbResult<Vec<Growlog>> {
    fetch(
        conn,
        "SELECT id, title, description, created_on, flower_on, finished_on
         FROM growlog WHERE finished_on IS NOT NULL ORDER BY title",
        "Could not list finished growlogs",
    )
    .await
}

pub(super) async fn get_flowering(conn: &mut SqliteConnection) -> DbResult<Vec<Growlog>> {
    fetch(
        conn,
        "SELECT id, title, description, created_on, flower_on, finished_on
         FROM growlog WHERE flower_on IS NOT NULL AND finished_on IS NULL ORDER BY title",
        "Could not list flowering growlogs",
    )
    .await
}

pub(super) async fn get_for_strain(
    conn: &mut SqliteConnection,
    strain_id: Id,
) -> DbResult<Vec<Growlog>> {
    let rows = sqlx::query(
        "SELECT g.id, g.title, g.description, g.created_on, g.flower_on, g.finished_on
         FROM growlog_strain gs JOIN growlog g ON g.id = gs.growlog_id
         WHERE gs.strain_id = ?
         ORDER BY g.title",
    )
    .bind(strain_id)
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| sqlite_error(&format!("Could not list growlogs of strain {}", strain_id), e))?;

    rows.iter().map(from_row).collect()
}

pub(super) async fn get_by_title(
    conn: &mut SqliteConnection,
    title: &str,
) -> DbResult<Option<Growlog>> {
    let row = sqlx::query(
        "SELECT id, title, description, created_on, flower_on, finished_on
         FROM growlog WHERE title = ?",
    )
    .bind(title)
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| sqlite_error(&format!("Could not fetch growlog '{}'", title), e))?;

    row.as_ref().map(from_row).transpose()
}

pub(super) async fn get_by_id(conn: &mut SqliteConnection, id: Id) -> DbResult<Option<Growlog>> {
    let row = sqlx::query(
        "SELECT id, title, description, created_on, flower_on, finished_on
         FROM growlog WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| sqlite_error(&format!("Could not fetch growlog {}", id), e))?;

    row.as_ref().map(from_row).transpose()
}

async fn write(conn: &mut SqliteConnection, growlog: &Growlog) -> DbResult<()> {
    let created_on = growlog.created_on.timestamp();
    let flower_on = growlog.flower_on.map(|ts| ts.timestamp());
    let finished_on = growlog.finished_on.map(|ts| ts.timestamp());

    if growlog.is_new() {
        sqlx::query(
            "INSERT INTO growlog (title, description, created_on, flower_on, finished_on)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&growlog.title)
        .bind(&growlog.description)
        .bind(created_on)
        .bind(flower_on)
        .bind(finished_on)
        .execute(&mut *conn)
        .await
        .map_err(|e| sqlite_error(&format!("Could not add growlog '{}'", growlog.title), e))?;
        return Ok(());
    }

    let result = sqlx::query(
        "UPDATE growlog SET title = ?, description = ?, created_on = ?, flower_on = ?,
                finished_on = ?
         WHERE id = ?",
    )
    .bind(&growlog.title)
    .bind(&growlog.description)
    .bind(created_on)
    .bind(flower_on)
    .bind(finished_on)
    .bind(growlog.id)
    .execute(&mut *conn)
    .await
    .map_err(|e| sqlite_error(&format!("Could not update growlog {}", growlog.id), e))?;

    if result.rows_affected() == 0 {
        return Err(StoreError::other(format!("No growlog with id {}", growlog.id)));
    }
    Ok(())
}

pub(super) async fn add(conn: &mut SqliteConnection, growlog: &Growlog) -> DbResult<()> {
    let mut tx = begin(conn).await?;
    let result = write(&mut *tx, growlog).await;
    finish(tx, result, sqlite_error).await
}

pub(super) async fn remove(conn: &mut SqliteConnection, id: Id) -> DbResult<()> {
    let mut tx = begin(conn).await?;
    let result = sqlx::query("DELETE FROM growlog WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map(|_| ())
        .map_err(|e| sqlite_error(&format!("Could not remove growlog {}", id), e));
    finish(tx, result, sqlite_error).await
}

pub(super) async fn link_strain(
    conn: &mut SqliteConnection,
    growlog_id: Id,
    strain_id: Id,
) -> DbResult<()> {
    let mut tx = begin(conn).await?;
    let result = sqlx::query(
        "INSERT INTO growlog_strain (growlog_id, strain_id) VALUES (?, ?)
         ON CONFLICT (growlog_id, strain_id) DO NOTHING",
    )
    .bind(growlog_id)
    .bind(strain_id)
    .execute(&mut *tx)
    .await
    .map(|_| ())
    .map_err(|e| {
        sqlite_error(
            &format!("Could not add strain {} to growlog {}", strain_id, growlog_id),
            e,
        )
    });
    finish(tx, result, sqlite_error).await
}

pub(super) async fn unlink_strain(
    conn: &mut SqliteConnection,
    growlog_id: Id,
    strain_id: Id,
) -> DbResult<()> {
    let mut tx = begin(conn).await?;
    let result = sqlx::query("DELETE FROM growlog_strain WHERE growlog_id = ? AND strain_id = ?")
        .bind(growlog_id)
        .bind(strain_id)
        .execute(&mut *tx)
        .await
        .map(|_| ())
        .map_err(|e| {
            sqlite_error(
                &format!("Could not remove strain {} from growlog {}", strain_id, growlog_id),
                e,
            )
        });
    finish(tx, result, sqlite_error).await
}
