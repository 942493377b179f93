//! Breeder queries for MySQL.

use sqlx::mysql::{MySqlConnection, MySqlRow};

use super::{begin, mysql_error};
use crate::db::rows::{self, BREEDER_SELECT};
use crate::db::transaction::finish;
use crate::db::{Breeder, DbResult, Id, StoreError};

fn from_row(row: &MySqlRow) -> DbResult<Breeder> {
    rows::breeder_from_row(row, mysql_error)
}

pub(super) async fn get_all(conn: &mut MySqlConnection) -> DbResult<Vec<Breeder>> {
    let rows = sqlx::query(&format!("{} ORDER BY name", BREEDER_SELECT))
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| mysql_error("Could not list breeders", e))?;

    rows.iter().map(from_row).collect()
}

pub(super) async fn get_by_name(
    conn: &mut MySqlConnection,
    name: &str,
) -> DbResult<Option<Breeder>> {
    let row = sqlx::query(&format!("{} WHERE name = ?", BREEDER_SELECT))
        .bind(name)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| mysql_error(&format!("Could not fetch breeder '{}'", name), e))?;

    row.as_ref().map(from_row).transpose()
}

pub(super) async fn get_by_id(conn: &mut MySqlConnection, id: Id) -> DbResult<Option<Breeder>> {
    let row = sqlx::query(&format!("{} WHERE id = ?", BREEDER_SELECT))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| mysql_error(&format!("Could not fetch breeder {}", id), e))?;

    row.as_ref().map(from_row).transpose()
}

async fn write(conn: &mut MySqlConnection, breeder: &Breeder) -> DbResult<()> {
    if breeder.is_new() {
        sqlx::query("INSERT INTO breeder (name, homepage) VALUES (?, ?)")
            .bind(&breeder.name)
            .bind(&breeder.homepage)
            .execute(&mut *conn)
            .await
            .map_err(|e| mysql_error(&format!("Could not add breeder '{}'", breeder.name), e))?;
        return Ok(());
    }

    // MySQL reports zero affected rows for an update that changes nothing
    let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM breeder WHERE id = ?")
        .bind(breeder.id)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| mysql_error(&format!("Could not fetch breeder {}", breeder.id), e))?;
    if exists == 0 {
        return Err(StoreError::other(format!("No breeder with id {}", breeder.id)));
    }

    sqlx::query("UPDATE breeder SET name = ?, homepage = ? WHERE id = ?")
        .bind(&breeder.name)
        .bind(&breeder.homepage)
        .bind(breeder.id)
        .execute(&mut *conn)
        .await
        .map_err(|e| mysql_error(&format!("Could not update breeder {}", breeder.id), e))?;
    Ok(())
}

pub(super) async fn add(conn: &mut MySqlConnection, breeder: &Breeder) -> DbResult<()> {
    breeder.validate()?;
    let mut tx = begin(conn).await?;
    let result = write(&mut *tx, breeder).await;
    finish(tx, result, mysql_error).await
}

pub(super) async fn remove(conn: &mut MySqlConnection, id: Id) -> DbResult<()> {
    let mut tx = begin(conn).await?;
    let result = sqlx::query("DELETE FROM breeder WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map(|_| ())
        .map_err(|e| mysql_error(&format!("Could not remove breeder {}", id), e));
    finish(tx, result, mysql_error).await
}
