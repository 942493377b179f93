//! SQLite implementation of the [`Store`] trait.
//!
//! The embedded engine keeps the whole database in one file named by
//! `DatabaseSettings::dbname`. Every write runs inside an explicit
//! transaction and every value is bound through a prepared statement.

mod breeder;
mod connection;
mod entry;
mod growlog;
mod strain;

#[cfg(test)]
mod store_test;

use async_trait::async_trait;
use sqlx::{Connection, Sqlite, SqliteConnection, Transaction};

use crate::config::paths::get_default_db_path;
use crate::db::error::translate;
use crate::db::{
    Breeder, Capabilities, DatabaseSettings, DbResult, Growlog, GrowlogEntry, Id, Store,
    StoreError, StoreFactory, Strain,
};

/// Registry name of the embedded engine.
pub const ENGINE: &str = "sqlite";

/// Schema script executed by `create_database`.
pub(crate) const SCHEMA: &str = include_str!("../../../data/sql/sqlite/create.sql");

/// Factory registered under [`ENGINE`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteFactory;

impl StoreFactory for SqliteFactory {
    fn engine(&self) -> &'static str {
        ENGINE
    }

    fn description(&self) -> &str {
        "SQLite (embedded file)"
    }

    fn default_settings(&self) -> DatabaseSettings {
        let mut settings = DatabaseSettings::new(ENGINE, Capabilities::NAME_IS_FILENAME);
        settings.dbname = get_default_db_path().to_string_lossy().into_owned();
        settings
    }

    fn create(&self, settings: DatabaseSettings) -> Box<dyn Store> {
        Box::new(SqliteStore::new(settings))
    }
}

/// Adapter over a single SQLite connection.
pub struct SqliteStore {
    settings: DatabaseSettings,
    conn: Option<SqliteConnection>,
}

impl SqliteStore {
    pub fn new(settings: DatabaseSettings) -> Self {
        Self {
            settings,
            conn: None,
        }
    }

    fn connection(&mut self) -> DbResult<&mut SqliteConnection> {
        self.conn
            .as_mut()
            .ok_or_else(|| StoreError::not_connected(ENGINE))
    }
}

/// Map a sqlx failure to a [`StoreError`] carrying the SQLite extended result code.
pub(crate) fn sqlite_error(context: &str, error: sqlx::Error) -> StoreError {
    translate(context, error, |db_error| {
        db_error.code().and_then(|code| code.parse().ok())
    })
}

async fn begin(conn: &mut SqliteConnection) -> DbResult<Transaction<'_, Sqlite>> {
    conn.begin()
        .await
        .map_err(|e| sqlite_error("Could not begin transaction", e))
}

#[async_trait]
impl Store for SqliteStore {
    fn engine(&self) -> &'static str {
        ENGINE
    }

    fn settings(&self) -> &DatabaseSettings {
        &self.settings
    }

    async fn connect(&mut self) -> DbResult<()> {
        if self.conn.is_some() {
            return Ok(());
        }
        self.conn = Some(connection::open(&self.settings).await?);
        Ok(())
    }

    async fn close(&mut self) {
        if let Some(conn) = self.conn.take() {
            connection::close(conn).await;
        }
    }

    fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    async fn test_connection(&mut self) -> bool {
        match self.conn.as_mut() {
            Some(conn) => conn.ping().await.is_ok(),
            None => connection::try_open(&self.settings).await,
        }
    }

    async fn create_database(&mut self) -> DbResult<()> {
        self.connect().await?;
        connection::create_schema(self.connection()?).await
    }

    async fn get_breeders(&mut self) -> DbResult<Vec<Breeder>> {
        breeder::get_all(self.connection()?).await
    }

    async fn get_breeder(&mut self, name: &str) -> DbResult<Option<Breeder>> {
        breeder::get_by_name(self.connection()?, name).await
    }

    async fn get_breeder_by_id(&mut self, id: Id) -> DbResult<Option<Breeder>> {
        breeder::get_by_id(self.connection()?, id).await
    }

    async fn add_breeder(&mut self, breeder: &Breeder) -> DbResult<()> {
        breeder::add(self.connection()?, breeder).await
    }

    async fn remove_breeder(&mut self, id: Id) -> DbResult<()> {
        breeder::remove(self.connection()?, id).await
    }

    async fn get_strains(&mut self) -> DbResult<Vec<Strain>> {
        strain::get_all(self.connection()?).await
    }

    async fn get_strains_for_breeder(&mut self, breeder_id: Id) -> DbResult<Vec<Strain>> {
        strain::get_for_breeder(self.connection()?, breeder_id).await
    }

    async fn get_strain(&mut self, breeder_id: Id, name: &str) -> DbResult<Option<Strain>> {
        strain::get_by_name(self.connection()?, breeder_id, name).await
    }

    async fn get_strain_by_id(&mut self, id: Id) -> DbResult<Option<Strain>> {
        strain::get_by_id(self.connection()?, id).await
    }

    async fn add_strain(&mut self, strain: &Strain) -> DbResult<()> {
        strain::add(self.connection()?, strain).await
    }

    async fn remove_strain(&mut self, id: Id) -> DbResult<()> {
        strain::remove(self.connection()?, id).await
    }

    async fn get_growlogs(&mut self) -> DbResult<Vec<Growlog>> {
        growlog::get_all(self.connection()?).await
    }

    async fn get_ongoing_growlogs(&mut self) -> DbResult<Vec<Growlog>> {
        growlog::get_ongoing(self.connection()?).await
    }

    async fn get_finished_growlogs(&mut self) -> DbResult<Vec<Growlog>> {
        growlog::get_finished(self.connection()?).await
    }

    async fn get_flowering_growlogs(&mut self) -> DbResult<Vec<Growlog>> {
        growlog::get_flowering(self.connection()?).await
    }

    async fn get_growlog(&mut self, title: &str) -> DbResult<Option<Growlog>> {
        growlog::get_by_title(self.connection()?, title).await
    }

    async fn get_growlog_by_id(&mut self, id: Id) -> DbResult<Option<Growlog>> {
        growlog::get_by_id(self.connection()?, id).await
    }

    async fn add_growlog(&mut self, growlog: &Growlog) -> DbResult<()> {
        growlog::add(self.connection()?, growlog).await
    }

    async fn remove_growlog(&mut self, id: Id) -> DbResult<()> {
        growlog::remove(self.connection()?, id).await
    }

    async fn get_strains_for_growlog(&mut self, growlog_id: Id) -> DbResult<Vec<Strain>> {
        strain::get_for_growlog(self.connection()?, growlog_id).await
    }

    async fn get_growlogs_for_strain(&mut self, strain_id: Id) -> DbResult<Vec<Growlog>> {
        growlog::get_for_strain(self.connection()?, strain_id).await
    }

    async fn add_strain_to_growlog(&mut self, growlog_id: Id, strain_id: Id) -> DbResult<()> {
        growlog::link_strain(self.connection()?, growlog_id, strain_id).await
    }

    async fn remove_strain_from_growlog(
        &mut self,
        growlog_id: Id,
        strain_id: Id,
    ) -> DbResult<()> {
        growlog::unlink_strain(self.connection()?, growlog_id, strain_id).await
    }

    async fn get_growlog_entries(&mut self, growlog_id: Id) -> DbResult<Vec<GrowlogEntry>> {
        entry::get_for_growlog(self.connection()?, growlog_id).await
    }

    async fn get_growlog_entry(&mut self, id: Id) -> DbResult<Option<GrowlogEntry>> {
        entry::get_by_id(self.connection()?, id).await
    }

    async fn add_growlog_entry(&mut self, entry: &GrowlogEntry) -> DbResult<()> {
        entry::add(self.connection()?, entry).await
    }

    async fn remove_growlog_entry(&mut self, id: Id) -> DbResult<()> {
        entry::remove(self.connection()?, id).await
    }
}
