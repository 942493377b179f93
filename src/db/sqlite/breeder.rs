//! Breeder queries for SQLite.

use sqlx::sqlite::SqliteRow;
use sqlx::SqliteConnection;

use super::{begin, sqlite_error};
use crate::db::rows::{self, BREEDER_SELECT};
use crate::db::transaction::finish;
use crate::db::{Breeder, DbResult, Id, StoreError};

fn from_row(row: &SqliteRow) -> DbResult<Breeder> {
    rows::breeder_from_row(row, sqlite_error)
}

pub(super) async fn get_all(conn: &mut SqliteConnection) -> DbResult<Vec<Breeder>> {
    let rows = sqlx::query(&format!("{} ORDER BY name", BREEDER_SELECT))
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| sqlite_error("Could not list breeders", e))?;

    rows.iter().map(from_row).collect()
}

pub(super) async fn get_by_name(
    conn: &mut SqliteConnection,
    name: &str,
) -> DbResult<Option<Breeder>> {
    let row = sqlx::query(&format!("{} WHERE name = ?", BREEDER_SELECT))
        .bind(name)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| sqlite_error(&format!("Could not fetch breeder '{}'", name), e))?;

    row.as_ref().map(from_row).transpose()
}

pub(super) async fn get_by_id(conn: &mut SqliteConnection, id: Id) -> DbResult<Option<Breeder>> {
    let row = sqlx::query(&format!("{} WHERE id = ?", BREEDER_SELECT))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| sqlite_error(&format!("Could not fetch breeder {}", id), e))?;

    row.as_ref().map(from_row).transpose()
}

async fn write(conn: &mut SqliteConnection, breeder: &Breeder) -> DbResult<()> {
    if breeder.is_new() {
        sqlx::query("INSERT INTO breeder (name, homepage) VALUES (?, ?)")
            .bind(&breeder.name)
            .bind(&breeder.homepage)
            .execute(&mut *conn)
            .await
            .map_err(|e| sqlite_error(&format!("Could not add breeder '{}'", breeder.name), e))?;
        return Ok(());
    }

    let result = sqlx::query("UPDATE breeder SET name = ?, homepage = ? WHERE id = ?")
        .bind(&breeder.name)
        .bind(&breeder.homepage)
        .bind(breeder.id)
        .execute(&mut *conn)
        .await
        .map_err(|e| sqlite_error(&format!("Could not update breeder {}", breeder.id), e))?;

    if result.rows_affected() == 0 {
        return Err(StoreError::other(format!("No breeder with id {}", breeder.id)));
    }
    Ok(())
}

pub(super) async fn add(conn: &mut SqliteConnection, breeder: &Breeder) -> DbResult<()> {
    breeder.validate()?;
    let mut tx = begin(conn).await?;
    let result = write(&mut *tx, breeder).await;
    finish(tx, result, sqlite_error).await
}

pub(super) async fn remove(conn: &mut SqliteConnection, id: Id) -> DbResult<()> {
    let mut tx = begin(conn).await?;
    let result = sqlx::query("DELETE FROM breeder WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map(|_| ())
        .map_err(|e| sqlite_error(&format!("Could not remove breeder {}", id), e));
    finish(tx, result, sqlite_error).await
}
