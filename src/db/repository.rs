//! The persistence contract every storage engine adapter satisfies.
//!
//! Callers depend on [`Store`] alone and obtain concrete adapters through the
//! engine registry, so no engine-specific type leaks past this module.

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::db::{Breeder, DatabaseSettings, DbResult, Growlog, GrowlogEntry, Id, Strain};

/// Persistence interface over one storage engine instance.
///
/// An adapter owns a single native connection. Methods take `&mut self`; use
/// one instance per task or synchronize externally.
///
/// Writes (`add_*`, `remove_*`, link maintenance) run in their own transaction
/// that is committed before the call returns or rolled back on failure.
/// Lookups return `Ok(None)` or an empty vector when nothing matches; only
/// connectivity and query failures are errors.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Store: Send {
    /// Registry name of the engine this adapter talks to.
    fn engine(&self) -> &'static str;

    /// Settings the adapter was created with.
    fn settings(&self) -> &DatabaseSettings;

    // -- lifecycle ------------------------------------------------------------

    /// Establish the native connection, or make sure an existing one is alive.
    ///
    /// On failure the adapter is left disconnected.
    async fn connect(&mut self) -> DbResult<()>;

    /// Release the native connection. Safe to call when already closed.
    async fn close(&mut self);

    /// Whether a connection handle is held. Does not touch the network.
    fn is_connected(&self) -> bool;

    /// Check the configured target without keeping any new connection.
    async fn test_connection(&mut self) -> bool;

    /// Create the schema from the engine's embedded script.
    async fn create_database(&mut self) -> DbResult<()>;

    // -- breeders -------------------------------------------------------------

    /// All breeders ordered by name.
    async fn get_breeders(&mut self) -> DbResult<Vec<Breeder>>;

    async fn get_breeder(&mut self, name: &str) -> DbResult<Option<Breeder>>;

    async fn get_breeder_by_id(&mut self, id: Id) -> DbResult<Option<Breeder>>;

    /// Insert when `breeder.id == 0`, otherwise update by id.
    async fn add_breeder(&mut self, breeder: &Breeder) -> DbResult<()>;

    /// Delete a breeder and its strains. Absent ids are not an error.
    async fn remove_breeder(&mut self, id: Id) -> DbResult<()>;

    // -- strains --------------------------------------------------------------

    /// All strains ordered by breeder name, then strain name.
    async fn get_strains(&mut self) -> DbResult<Vec<Strain>>;

    async fn get_strains_for_breeder(&mut self, breeder_id: Id) -> DbResult<Vec<Strain>>;

    async fn get_strain(&mut self, breeder_id: Id, name: &str) -> DbResult<Option<Strain>>;

    async fn get_strain_by_id(&mut self, id: Id) -> DbResult<Option<Strain>>;

    /// Insert when `strain.id == 0`, otherwise update by id.
    async fn add_strain(&mut self, strain: &Strain) -> DbResult<()>;

    async fn remove_strain(&mut self, id: Id) -> DbResult<()>;

    // -- growlogs -------------------------------------------------------------

    /// All growlogs ordered by title.
    async fn get_growlogs(&mut self) -> DbResult<Vec<Growlog>>;

    /// Growlogs without a finishing date.
    async fn get_ongoing_growlogs(&mut self) -> DbResult<Vec<Growlog>>;

    /// Growlogs with a finishing date.
    async fn get_finished_growlogs(&mut self) -> DbResult<Vec<Growlog>>;

    /// Ongoing growlogs that have started flowering.
    async fn get_flowering_growlogs(&mut self) -> DbResult<Vec<Growlog>>;

    async fn get_growlog(&mut self, title: &str) -> DbResult<Option<Growlog>>;

    async fn get_growlog_by_id(&mut self, id: Id) -> DbResult<Option<Growlog>>;

    /// Insert when `growlog.id == 0`, otherwise update by id.
    async fn add_growlog(&mut self, growlog: &Growlog) -> DbResult<()>;

    /// Delete a growlog together with its entries and strain links.
    async fn remove_growlog(&mut self, id: Id) -> DbResult<()>;

    // -- growlog <-> strain ---------------------------------------------------

    async fn get_strains_for_growlog(&mut self, growlog_id: Id) -> DbResult<Vec<Strain>>;

    async fn get_growlogs_for_strain(&mut self, strain_id: Id) -> DbResult<Vec<Growlog>>;

    /// Link a strain to a growlog. Linking twice is a no-op.
    async fn add_strain_to_growlog(&mut self, growlog_id: Id, strain_id: Id) -> DbResult<()>;

    async fn remove_strain_from_growlog(&mut self, growlog_id: Id, strain_id: Id)
    -> DbResult<()>;

    // -- growlog entries ------------------------------------------------------

    /// Entries of a growlog ordered by creation time.
    async fn get_growlog_entries(&mut self, growlog_id: Id) -> DbResult<Vec<GrowlogEntry>>;

    async fn get_growlog_entry(&mut self, id: Id) -> DbResult<Option<GrowlogEntry>>;

    /// Insert when `entry.id == 0`, otherwise update by id.
    async fn add_growlog_entry(&mut self, entry: &GrowlogEntry) -> DbResult<()>;

    async fn remove_growlog_entry(&mut self, id: Id) -> DbResult<()>;
}
