//! Growlog queries for MySQL, including the growlog/strain join table.

use sqlx::mysql::{MySqlConnection, MySqlRow};

use super::{begin, mysql_error};
use crate::db::rows::{self, format_optional};
use crate::db::transaction::finish;
use crate::db::{
    DATETIME_FORMAT, DbResult, Growlog, Id, StoreError, format_timestamp,
};

const SELECT: &str = "SELECT g.id, g.title, g.description,
        DATE_FORMAT(g.created_on, '%Y-%m-%d %H:%i:%s') AS created_on,
        DATE_FORMAT(g.flower_on, '%Y-%m-%d %H:%i:%s') AS flower_on,
        DATE_FORMAT(g.finished_on, '%Y-%m-%d %H:%i:%s') AS finished_on
    FROM growlog g";

fn from_row(row: &MySqlRow) -> DbResult<Growlog> {
    rows::growlog_from_text_row(row, mysql_error)
}

async fn fetch(conn: &mut MySqlConnection, filter: &str, context: &str) -> DbResult<Vec<Growlog>> {
    let rows = sqlx::query(&format!("{} {} ORDER BY g.title", SELECT, filter))
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| mysql_error(context, e))?;

    rows.iter().map(from_row).collect()
}

pub(super) async fn get_all(conn: &mut MySqlConnection) -> DbResult<Vec<Growlog>> {
    fetch(conn, "", "Could not list growlogs").await
}

pub(super) async fn get_ongoing(conn: &mut MySqlConnection) -> DbResult<Vec<Growlog>> {
    fetch(
        conn,
        "WHERE g.finished_on IS NULL",
        "Could not list ongoing growlogs",
    )
    .await
}

pub(super) async fn get_finished(conn: &mut MySqlConnection) -> DbResult<Vec<Growlog>> {
    fetch(
        conn,
        "WHERE g.finished_on IS NOT NULL",
        "Could not list finished growlogs",
    )
    .await
}

pub(super) async fn get_flowering(conn: &mut MySqlConnection) -> DbResult<Vec<Growlog>> {
    fetch(
        conn,
        "WHERE g.flower_on IS NOT NULL AND g.finished_on IS NULL",
        "Could not list flowering growlogs",
    )
    .await
}

pub(super) async fn get_for_strain(
    conn: &mut MySqlConnection,
    strain_id: Id,
) -> DbResult<Vec<Growlog>> {
    let rows = sqlx::query(&format!(
        "{} JOIN growlog_strain gs ON gs.growlog_id = g.id
         WHERE gs.strain_id = ? ORDER BY g.title",
        SELECT
    ))
    .bind(strain_id)
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| mysql_error(&format!("Could not list growlogs of strain {}", strain_id), e))?;

    rows.iter().map(from_row).collect()
}

pub(super) async fn get_by_title(
    conn: &mut MySqlConnection,
    title: &str,
) -> DbResult<Option<Growlog>> {
    let row = sqlx::query(&format!("{} WHERE g.title = ?", SELECT))
        .bind(title)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| mysql_error(&format!("Could not fetch growlog '{}'", title), e))?;

    row.as_ref().map(from_row).transpose()
}

pub(super) async fn get_by_id(conn: &mut MySqlConnection, id: Id) -> DbResult<Option<Growlog>> {
    let row = sqlx::query(&format!("{} WHERE g.id = ?", SELECT))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| mysql_error(&format!("Could not fetch growlog {}", id), e))?;

    row.as_ref().map(from_row).transpose()
}

async fn write(conn: &mut MySqlConnection, growlog: &Growlog) -> DbResult<()> {
    let created_on = format_timestamp(&growlog.created_on, DATETIME_FORMAT);
    let flower_on = format_optional(growlog.flower_on);
    let finished_on = format_optional(growlog.finished_on);

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
        .map_err(|e| mysql_error(&format!("Could not add growlog '{}'", growlog.title), e))?;
        return Ok(());
    }

    let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM growlog WHERE id = ?")
        .bind(growlog.id)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| mysql_error(&format!("Could not fetch growlog {}", growlog.id), e))?;
    if exists == 0 {
        return Err(StoreError::other(format!("No growlog with id {}", growlog.id)));
    }

    sqlx::query(
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
    .map_err(|e| mysql_error(&format!("Could not update growlog {}", growlog.id), e))?;
    Ok(())
}

pub(super) async fn add(conn: &mut MySqlConnection, growlog: &Growlog) -> DbResult<()> {
    let mut tx = begin(conn).await?;
    let result = write(&mut *tx, growlog).await;
    finish(tx, result, mysql_error).await
}

pub(super) async fn remove(conn: &mut MySqlConnection, id: Id) -> DbResult<()> {
    let mut tx = begin(conn).await?;
    let result = sqlx::query("DELETE FROM growlog WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map(|_| ())
        .map_err(|e| mysql_error(&format!("Could not remove growlog {}", id), e));
    finish(tx, result, mysql_error).await
}

pub(super) async fn link_strain(
    conn: &mut MySqlConnection,
    growlog_id: Id,
    strain_id: Id,
) -> DbResult<()> {
    let mut tx = begin(conn).await?;
    let result = sqlx::query(
        "INSERT INTO growlog_strain (growlog_id, strain_id) VALUES (?, ?)
         ON DUPLICATE KEY UPDATE growlog_id = growlog_id",
    )
    .bind(growlog_id)
    .bind(strain_id)
    .execute(&mut *tx)
    .await
    .map(|_| ())
    .map_err(|e| {
        mysql_error(
            &format!("Could not add strain {} to growlog {}", strain_id, growlog_id),
            e,
        )
    });
    finish(tx, result, mysql_error).await
}

pub(super) async fn unlink_strain(
    conn: &mut MySqlConnection,
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
            mysql_error(
                &format!("Could not remove strain {} from growlog {}", strain_id, growlog_id),
                e,
            )
        });
    finish(tx, result, mysql_error).await
}
