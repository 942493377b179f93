//! Data access layer.
//!
//! This module provides a trait-based persistence interface, allowing the
//! embedded SQLite engine and the MySQL/PostgreSQL client/server engines to
//! be swapped without changing the code that edits or lists records.
//!
//! # Architecture
//!
//! - `error`: the single `StoreError` carrier
//! - `models`: domain entities (Breeder, Strain, Growlog, GrowlogEntry)
//! - `settings`: connection settings and capability flags
//! - `repository`: the `Store` trait
//! - `registry`: engine name to adapter factory table
//! - `rows`: column lists and row mappers shared by the adapters
//! - `sqlite`, `mysql`, `postgres`: engine adapters

pub(crate) mod error;
mod models;
pub mod registry;
mod repository;
mod rows;
pub mod schema;
mod settings;
mod transaction;
mod utils;

pub mod sqlite;

#[cfg(feature = "mysql")]
pub mod mysql;

#[cfg(feature = "postgres")]
pub mod postgres;

#[cfg(test)]
pub(crate) mod contract;

pub use error::{DbResult, NO_CODE, StoreError};
pub use models::*;
pub use registry::{Registry, StoreFactory};
pub use repository::*;
pub use settings::{Capabilities, DatabaseSettings};
pub use utils::{DATE_FORMAT, DATETIME_FORMAT, format_timestamp, now, parse_timestamp};

pub(crate) use utils::from_unix_seconds;
