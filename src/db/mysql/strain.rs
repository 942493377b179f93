//! Strain queries for MySQL.

use sqlx::mysql::{MySqlConnection, MySqlRow};

use super::{begin, mysql_error};
use crate::db::rows::{self, STRAIN_SELECT as SELECT};
use crate::db::transaction::finish;
use crate::db::{DbResult, Id, StoreError, Strain};

fn from_row(row: &MySqlRow) -> DbResult<Strain> {
    rows::strain_from_row(row, mysql_error)
}

pub(super) async fn get_all(conn: &mut MySqlConnection) -> DbResult<Vec<Strain>> {
    let rows = sqlx::query(&format!("{} ORDER BY b.name, s.name", SELECT))
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| mysql_error("Could not list strains", e))?;

    rows.iter().map(from_row).collect()
}

pub(super) async fn get_for_breeder(
    conn: &mut MySqlConnection,
    breeder_id: Id,
) -> DbResult<Vec<Strain>> {
    let rows = sqlx::query(&format!("{} WHERE s.breeder_id = ? ORDER BY s.name", SELECT))
        .bind(breeder_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            mysql_error(&format!("Could not list strains of breeder {}", breeder_id), e)
        })?;

    rows.iter().map(from_row).collect()
}

pub(super) async fn get_for_growlog(
    conn: &mut MySqlConnection,
    growlog_id: Id,
) -> DbResult<Vec<Strain>> {
    let rows = sqlx::query(&format!(
        "{} JOIN growlog_strain gs ON gs.strain_id = s.id
         WHERE gs.growlog_id = ? ORDER BY b.name, s.name",
        SELECT
    ))
    .bind(growlog_id)
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| mysql_error(&format!("Could not list strains of growlog {}", growlog_id), e))?;

    rows.iter().map(from_row).collect()
}

pub(super) async fn get_by_name(
    conn: &mut MySqlConnection,
    breeder_id: Id,
    name: &str,
) -> DbResult<Option<Strain>> {
    let row = sqlx::query(&format!("{} WHERE s.breeder_id = ? AND s.name = ?", SELECT))
        .bind(breeder_id)
        .bind(name)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| mysql_error(&format!("Could not fetch strain '{}'", name), e))?;

    row.as_ref().map(from_row).transpose()
}

pub(super) async fn get_by_id(conn: &mut MySqlConnection, id: Id) -> DbResult<Option<Strain>> {
    let row = sqlx::query(&format!("{} WHERE s.id = ?", SELECT))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| mysql_error(&format!("Could not fetch strain {}", id), e))?;

    row.as_ref().map(from_row).transpose()
}

async fn write(conn: &mut MySqlConnection, strain: &Strain) -> DbResult<()> {
    if strain.is_new() {
        sqlx::query(
            "INSERT INTO strain (breeder_id, name, info, description, homepage, seedfinder)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(strain.breeder_id)
        .bind(&strain.name)
        .bind(&strain.info)
        .bind(&strain.description)
        .bind(&strain.homepage)
        .bind(&strain.seedfinder)
        .execute(&mut *conn)
        .await
        .map_err(|e| mysql_error(&format!("Could not add strain '{}'", strain.name), e))?;
        return Ok(());
    }

    let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM strain WHERE id = ?")
        .bind(strain.id)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| mysql_error(&format!("Could not fetch strain {}", strain.id), e))?;
    if exists == 0 {
        return Err(StoreError::other(format!("No strain with id {}", strain.id)));
    }

    sqlx::query(
        "UPDATE strain SET breeder_id = ?, name = ?, info = ?, description = ?, homepage = ?,
                seedfinder = ?
         WHERE id = ?",
    )
    .bind(strain.breeder_id)
    .bind(&strain.name)
    .bind(&strain.info)
    .bind(&strain.description)
    .bind(&strain.homepage)
    .bind(&strain.seedfinder)
    .bind(strain.id)
    .execute(&mut *conn)
    .await
    .map_err(|e| mysql_error(&format!("Could not update strain {}", strain.id), e))?;
    Ok(())
}

pub(super) async fn add(conn: &mut MySqlConnection, strain: &Strain) -> DbResult<()> {
    let mut tx = begin(conn).await?;
    let result = write(&mut *tx, strain).await;
    finish(tx, result, mysql_error).await
}

pub(super) async fn remove(conn: &mut MySqlConnection, id: Id) -> DbResult<()> {
    let mut tx = begin(conn).await?;
    let result = sqlx::query("DELETE FROM strain WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map(|_| ())
        .map_err(|e| mysql_error(&format!("Could not remove strain {}", id), e));
    finish(tx, result, mysql_error).await
}
