//! Strain queries for PostgreSQL.

use sqlx::postgres::{PgConnection, PgRow};

use super::{begin, postgres_error};
use crate::db::rows::{self, STRAIN_SELECT as SELECT};
use crate::db::transaction::finish;
use crate::db::{DbResult, Id, StoreError, Strain};

fn from_row(row: &PgRow) -> DbResult<Strain> {
    rows::strain_from_row(row, postgres_error)
}

pub(super) async fn get_all(conn: &mut PgConnection) -> DbResult<Vec<Strain>> {
    let rows = sqlx::query(&format!("{} ORDER BY b.name, s.name", SELECT))
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| postgres_error("Could not list strains", e))?;

    rows.iter().map(from_row).collect()
}

pub(super) async fn get_for_breeder(
    conn: &mut PgConnection,
    breeder_id: Id,
) -> DbResult<Vec<Strain>> {
    let rows = sqlx::query(&format!("{} WHERE s.breeder_id = $1 ORDER BY s.name", SELECT))
        .bind(breeder_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            postgres_error(&format!("Could not list strains of breeder {}", breeder_id), e)
        })?;

    rows.iter().map(from_row).collect()
}

pub(super) async fn get_for_growlog(
    conn: &mut PgConnection,
    growlog_id: Id,
) -> DbResult<Vec<Strain>> {
    let rows = sqlx::query(&format!(
        "{} JOIN growlog_strain gs ON gs.strain_id = s.id
         WHERE gs.growlog_id = $1 ORDER BY b.name, s.name",
        SELECT
    ))
    .bind(growlog_id)
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| {
        postgres_error(&format!("Could not list strains of growlog {}", growlog_id), e)
    })?;

    rows.iter().map(from_row).collect()
}

pub(super) async fn get_by_name(
    conn: &mut PgConnection,
    breeder_id: Id,
    name: &str,
) -> DbResult<Option<Strain>> {
    let row = sqlx::query(&format!("{} WHERE s.breeder_id = $1 AND s.name = $2", SELECT))
        .bind(breeder_id)
        .bind(name)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| postgres_error(&format!("Could not fetch strain '{}'", name), e))?;

    row.as_ref().map(from_row).transpose()
}

pub(super) async fn get_by_id(conn: &mut PgConnection, id: Id) -> DbResult<Option<Strain>> {
    let row = sqlx::query(&format!("{} WHERE s.id = $1", SELECT))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| postgres_error(&format!("Could not fetch strain {}", id), e))?;

    row.as_ref().map(from_row).transpose()
}

async fn write(conn: &mut PgConnection, strain: &Strain) -> DbResult<()> {
    if strain.is_new() {
        sqlx::query(
            "INSERT INTO strain (breeder_id, name, info, description, homepage, seedfinder)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(strain.breeder_id)
        .bind(&strain.name)
        .bind(&strain.info)
        .bind(&strain.description)
        .bind(&strain.homepage)
        .bind(&strain.seedfinder)
        .execute(&mut *conn)
        .await
        .map_err(|e| postgres_error(&format!("Could not add strain '{}'", strain.name), e))?;
        return Ok(());
    }

    let result = sqlx::query(
        "UPDATE strain SET breeder_id = $1, name = $2, info = $3, description = $4,
                homepage = $5, seedfinder = $6
         WHERE id = $7",
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
    .map_err(|e| postgres_error(&format!("Could not update strain {}", strain.id), e))?;

    if result.rows_affected() == 0 {
        return Err(StoreError::other(format!("No strain with id {}", strain.id)));
    }
    Ok(())
}

pub(super) async fn add(conn: &mut PgConnection, strain: &Strain) -> DbResult<()> {
    let mut tx = begin(conn).await?;
    let result = write(&mut *tx, strain).await;
    finish(tx, result, postgres_error).await
}

pub(super) async fn remove(conn: &mut PgConnection, id: Id) -> DbResult<()> {
    let mut tx = begin(conn).await?;
    let result = sqlx::query("DELETE FROM strain WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map(|_| ())
        .map_err(|e| postgres_error(&format!("Could not remove strain {}", id), e));
    finish(tx, result, postgres_error).await
}
