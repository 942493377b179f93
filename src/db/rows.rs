//! Row mapping shared by the adapters.
//!
//! Mappers are generic over [`sqlx::Row`] so a column change is made once.
//! Each adapter passes its own error translation function. Growlog and
//! entry mappers read timestamps as `DATETIME_FORMAT` text, which is how the
//! server engines select them; SQLite stores unix seconds and maps those rows
//! itself.

use chrono::{DateTime, Utc};
use sqlx::{ColumnIndex, Decode, Row, Type};

use crate::db::{
    Breeder, DATETIME_FORMAT, DbResult, Growlog, GrowlogEntry, StoreError, Strain,
    format_timestamp, parse_timestamp,
};

/// Engine-specific translation of a sqlx failure.
pub(crate) type Translate = fn(&str, sqlx::Error) -> StoreError;

/// Breeder columns; append the filter and ordering.
pub(crate) const BREEDER_SELECT: &str = "SELECT id, name, homepage FROM breeder";

/// Strain columns joined with the owning breeder's name.
pub(crate) const STRAIN_SELECT: &str = "SELECT s.id, s.breeder_id, b.name AS breeder_name,
        s.name, s.info, s.description, s.homepage, s.seedfinder
    FROM strain s JOIN breeder b ON b.id = s.breeder_id";

pub(crate) fn breeder_from_row<'r, R>(row: &'r R, translate: Translate) -> DbResult<Breeder>
where
    R: Row,
    for<'a> &'a str: ColumnIndex<R>,
    i64: Decode<'r, R::Database> + Type<R::Database>,
    String: Decode<'r, R::Database> + Type<R::Database>,
{
    let column = |e| translate("Malformed breeder row", e);
    Ok(Breeder {
        id: row.try_get("id").map_err(column)?,
        name: row.try_get("name").map_err(column)?,
        homepage: row.try_get("homepage").map_err(column)?,
    })
}

pub(crate) fn strain_from_row<'r, R>(row: &'r R, translate: Translate) -> DbResult<Strain>
where
    R: Row,
    for<'a> &'a str: ColumnIndex<R>,
    i64: Decode<'r, R::Database> + Type<R::Database>,
    String: Decode<'r, R::Database> + Type<R::Database>,
{
    let column = |e| translate("Malformed strain row", e);
    Ok(Strain {
        id: row.try_get("id").map_err(column)?,
        breeder_id: row.try_get("breeder_id").map_err(column)?,
        breeder_name: row.try_get("breeder_name").map_err(column)?,
        name: row.try_get("name").map_err(column)?,
        info: row.try_get("info").map_err(column)?,
        description: row.try_get("description").map_err(column)?,
        homepage: row.try_get("homepage").map_err(column)?,
        seedfinder: row.try_get("seedfinder").map_err(column)?,
    })
}

pub(crate) fn parse_optional(text: Option<String>) -> DbResult<Option<DateTime<Utc>>> {
    text.map(|text| parse_timestamp(&text, DATETIME_FORMAT))
        .transpose()
}

/// Bind value for a nullable timestamp column.
pub(crate) fn format_optional(timestamp: Option<DateTime<Utc>>) -> Option<String> {
    timestamp.map(|ts| format_timestamp(&ts, DATETIME_FORMAT))
}

pub(crate) fn growlog_from_text_row<'r, R>(row: &'r R, translate: Translate) -> DbResult<Growlog>
where
    R: Row,
    for<'a> &'a str: ColumnIndex<R>,
    i64: Decode<'r, R::Database> + Type<R::Database>,
    String: Decode<'r, R::Database> + Type<R::Database>,
    Option<String>: Decode<'r, R::Database> + Type<R::Database>,
{
    let column = |e| translate("Malformed growlog row", e);
    let created_on: String = row.try_get("created_on").map_err(column)?;

    Ok(Growlog {
        id: row.try_get("id").map_err(column)?,
        title: row.try_get("title").map_err(column)?,
        description: row.try_get("description").map_err(column)?,
        created_on: parse_timestamp(&created_on, DATETIME_FORMAT)?,
        flower_on: parse_optional(row.try_get("flower_on").map_err(column)?)?,
        finished_on: parse_optional(row.try_get("finished_on").map_err(column)?)?,
    })
}

pub(crate) fn entry_from_text_row<'r, R>(
    row: &'r R,
    translate: Translate,
) -> DbResult<GrowlogEntry>
where
    R: Row,
    for<'a> &'a str: ColumnIndex<R>,
    i64: Decode<'r, R::Database> + Type<R::Database>,
    String: Decode<'r, R::Database> + Type<R::Database>,
{
    let column = |e| translate("Malformed growlog entry row", e);
    let created_on: String = row.try_get("created_on").map_err(column)?;

    Ok(GrowlogEntry {
        id: row.try_get("id").map_err(column)?,
        growlog_id: row.try_get("growlog_id").map_err(column)?,
        text: row.try_get("text").map_err(column)?,
        created_on: parse_timestamp(&created_on, DATETIME_FORMAT)?,
    })
}
