//! Engine registry.
//!
//! Maps an engine name to the factory that builds its adapter. A process-wide
//! instance is populated once by [`init`] with every engine compiled into the
//! binary; callers pick an engine by name and only ever see `dyn Store`.

use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use tracing::debug;

use crate::db::{DatabaseSettings, Store};

/// Builds adapters for one storage engine.
pub trait StoreFactory: Send + Sync {
    /// Registry key, e.g. `sqlite`.
    fn engine(&self) -> &'static str;

    /// Human-readable engine name for engine pickers.
    fn description(&self) -> &str;

    /// Settings pre-filled for this engine, capabilities included.
    fn default_settings(&self) -> DatabaseSettings;

    /// New adapter bound to `settings`. Does not connect.
    fn create(&self, settings: DatabaseSettings) -> Box<dyn Store>;
}

/// Ordered table of engine factories.
#[derive(Clone, Default)]
pub struct Registry {
    factories: Vec<Arc<dyn StoreFactory>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every engine compiled into this build.
    pub fn with_builtin_engines() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(crate::db::sqlite::SqliteFactory));
        #[cfg(feature = "mysql")]
        registry.register(Arc::new(crate::db::mysql::MySqlFactory));
        #[cfg(feature = "postgres")]
        registry.register(Arc::new(crate::db::postgres::PostgresFactory));
        registry
    }

    /// Add a factory, replacing any earlier one registered under the same name.
    ///
    /// A replacement keeps the position of the factory it replaces.
    pub fn register(&mut self, factory: Arc<dyn StoreFactory>) {
        match self
            .factories
            .iter_mut()
            .find(|existing| existing.engine() == factory.engine())
        {
            Some(slot) => *slot = factory,
            None => self.factories.push(factory),
        }
    }

    pub fn lookup(&self, engine: &str) -> Option<Arc<dyn StoreFactory>> {
        self.factories
            .iter()
            .find(|factory| factory.engine() == engine)
            .cloned()
    }

    /// Registered factories in registration order.
    pub fn list(&self) -> Vec<Arc<dyn StoreFactory>> {
        self.factories.clone()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Build an adapter for `settings.engine`, if that engine is registered.
    pub fn create(&self, settings: DatabaseSettings) -> Option<Box<dyn Store>> {
        self.lookup(&settings.engine)
            .map(|factory| factory.create(settings))
    }
}

static REGISTRY: LazyLock<RwLock<Registry>> = LazyLock::new(|| RwLock::new(Registry::new()));

/// Register the built-in engines. Does nothing if the registry is already populated.
///
/// Returns whether this call populated the registry.
pub fn init() -> bool {
    let mut registry = REGISTRY.write().unwrap_or_else(PoisonError::into_inner);
    if !registry.is_empty() {
        return false;
    }

    *registry = Registry::with_builtin_engines();
    debug!(
        engines = ?registry.list().iter().map(|f| f.engine().to_string()).collect::<Vec<_>>(),
        "Registered storage engines"
    );
    true
}

/// Add or replace a factory in the process-wide registry.
pub fn register(factory: Arc<dyn StoreFactory>) {
    REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register(factory);
}

pub fn lookup(engine: &str) -> Option<Arc<dyn StoreFactory>> {
    REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .lookup(engine)
}

pub fn list() -> Vec<Arc<dyn StoreFactory>> {
    REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .list()
}

/// Build an adapter from the process-wide registry.
pub fn create(settings: DatabaseSettings) -> Option<Box<dyn Store>> {
    REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .create(settings)
}
