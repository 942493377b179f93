//! Strain queries for SQLite.
//!
//! Reads join `breeder` to fill in the denormalized breeder name.

use sqlx::sqlite::SqliteRow;
use sqlx::SqliteConnection;

use super::{begin, sqlite_error};
use crate::db::rows::{self, STRAIN_SELECT};
use crate::db::transaction::finish;
use crate::db::{DbResult, Id, StoreError, Strain};

fn from_row(row: &SqliteRow) -> DbResult<Strain> {
    rows::strain_from_row(row, sqlite_error)
}

pub(super) async fn get_all(conn: &mut SqliteConnection) -> DbResult<Vec<Strain>> {
    let rows = sqlx::query(&format!("{} ORDER BY b.name, s.name", STRAIN_SELECT))
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| sqlite_error("Could not list strains", e))?;

    rows.iter().map(from_row).collect()
}

pub(super) async fn get_for_breeder(
    conn: &mut SqliteConnection,
    breeder_id: Id,
) -> DbResult<Vec<Strain>> {
    let rows = sqlx::query(&format!("{} WHERE s.breeder_id = ? ORDER BY s.name", STRAIN_SELECT))
        .bind(breeder_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            sqlite_error(&format!("Could not list strains of breeder {}", breeder_id), e)
        })?;

    rows.iter().map(from_row).collect()
}

pub(super) async fn get_for_growlog(
    conn: &mut SqliteConnection,
    growlog_id: Id,
) -> DbResult<Vec<Strain>> {
    let rows = sqlx::query(&format!(
        "{} JOIN growlog_strain gs ON gs.strain_id = s.id
         WHERE gs.growlog_id = ? ORDER BY b.name, s.name",
        STRAIN_SELECT
    ))
    .bind(growlog_id)
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| sqlite_error(&format!("Could not list strains of growlog {}", growlog_id), e))?;

    rows.iter().map(from_row).collect()
}

pub(super) async fn get_by_name(
    conn: &mut SqliteConnection,
    breeder_id: Id,
    name: &str,
) -> DbResult<Option<Strain>> {
    let row = sqlx::query(&format!("{} WHERE s.breeder_id = ? AND s.name = ?", STRAIN_SELECT))
        .bind(breeder_id)
        .bind(name)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| sqlite_error(&format!("Could not fetch strain '{}'", name), e))?;

    row.as_ref().map(from_row).transpose()
}

pub(super) async fn get_by_id(conn: &mut SqliteConnection, id: Id) -> DbResult<Option<Strain>> {
    let row = sqlx::query(&format!("{} WHERE s.id = ?", STRAIN_SELECT))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| sqlite_error(&format!("Could not fetch strain {}", id), e))?;

    row.as_ref().map(from_row).transpose()
}

async fn write(conn: &mut SqliteConnection, strain: &Strain) -> DbResult<()> {
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
        .map_err(|e| sqlite_error(&format!("Could not add strain '{}'", strain.name), e))?;
        return Ok(());
    }

    let result = sqlx::query(
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
    .map_err(|e| sqlite_error(&format!("Could not update strain {}", strain.id), e))?;

    if result.rows_affected() == 0 {
        return Err(StoreError::other(format!("No strain with id {}", strain.id)));
    }
    Ok(())
}

pub(super) async fn add(conn: &mut SqliteConnection, strain: &Strain) -> DbResult<()> {
    let mut tx = begin(conn).await?;
    let result = write(&mut *tx, strain).await;
    finish(tx, result, sqlite_error).await
}

pub(super) async fn remove(conn: &mut SqliteConnection, id: Id) -> DbResult<()> {
    let mut tx = begin(conn).await?;
    let result = sqlx::query("DELETE FROM strain WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map(|_| ())
        .map_err(|e| sqlite_error(&format!("Could not remove strain {}", id), e));
    finish(tx, result, sqlite_error).await
}
