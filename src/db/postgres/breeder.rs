//! Breeder queries for PostgreSQL.

use sqlx::postgres::{PgConnection, PgRow};

use super::{begin, postgres_error};
use crate::db::rows::{self, BREEDER_SELECT};
use crate::db::transaction::finish;
use crate::db::{Breeder, DbResult, Id, StoreError};

fn from_row(row: &PgRow) -> DbResult<Breeder> {
    rows::breeder_from_row(row, postgres_error)
}

pub(super) async fn get_all(conn: &mut PgConnection) -> DbResult<Vec<Breeder>> {
    let rows = sqlx::query(&format!("{} ORDER BY name", BREEDER_SELECT))
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| postgres_error("Could not list breeders", e))?;

    rows.iter().map(from_row).collect()
}

pub(super) async fn get_by_name(conn: &mut PgConnection, name: &str) -> DbResult<Option<Breeder>> {
    let row = sqlx::query(&format!("{} WHERE name = $1", BREEDER_SELECT))
        .bind(name)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| postgres_error(&format!("Could not fetch breeder '{}'", name), e))?;

    row.as_ref().map(from_row).transpose()
}

pub(super) async fn get_by_id(conn: &mut PgConnection, id: Id) -> DbResult<Option<Breeder>> {
    let row = sqlx::query(&format!("{} WHERE id = $1", BREEDER_SELECT))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| postgres_error(&format!("Could not fetch breeder {}", id), e))?;

    row.as_ref().map(from_row).transpose()
}

async fn write(conn: &mut PgConnection, breeder: &Breeder) -> DbResult<()> {
    if breeder.is_new() {
        sqlx::query("INSERT INTO breeder (name, homepage) VALUES ($1, $2)")
            .bind(&breeder.name)
            .bind(&breeder.homepage)
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                postgres_error(&format!("Could not add breeder '{}'", breeder.name), e)
            })?;
        return Ok(());
    }

    let result = sqlx::query("UPDATE breeder SET name = $1, homepage = $2 WHERE id = $3")
        .bind(&breeder.name)
        .bind(&breeder.homepage)
        .bind(breeder.id)
        .execute(&mut *conn)
        .await
        .map_err(|e| postgres_error(&format!("Could not update breeder {}", breeder.id), e))?;

    if result.rows_affected() == 0 {
        return Err(StoreError::other(format!("No breeder with id {}", breeder.id)));
    }
    Ok(())
}

pub(super) async fn add(conn: &mut PgConnection, breeder: &Breeder) -> DbResult<()> {
    breeder.validate()?;
    let mut tx = begin(conn).await?;
    let result = write(&mut *tx, breeder).await;
    finish(tx, result, postgres_error).await
}

pub(super) async fn remove(conn: &mut PgConnection, id: Id) -> DbResult<()> {
    let mut tx = begin(conn).await?;
    let result = sqlx::query("DELETE FROM breeder WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map(|_| ())
        .map_err(|e| postgres_error(&format!("Could not remove breeder {}", id), e));
    finish(tx, result, postgres_error).await
}
