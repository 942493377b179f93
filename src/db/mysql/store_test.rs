//! MySQL adapter tests.
//!
//! Tests that need a server read `GROWBOOK_TEST_MYSQL_HOST` (plus optional
//! `_PORT`, `_USER`, `_PASSWORD`, `_DB`) and return early when it is unset.
//! They drop and recreate the growbook tables in that database.

use serial_test::serial;

use super::{MySqlFactory, MySqlStore};
use crate::db::{DatabaseSettings, Store, StoreFactory, contract};

fn unreachable_settings() -> DatabaseSettings {
    let mut settings = MySqlFactory.default_settings();
    settings.host = "127.0.0.1".to_string();
    // Reserved port with no listener
    settings.port = 1;
    settings
}

async fn live_store() -> Option<MySqlStore> {
    let settings = contract::settings_from_env("MYSQL", MySqlFactory.default_settings())?;
    let mut store = MySqlStore::new(settings);
    store.connect().await.expect("Test server should accept connections");

    sqlx::raw_sql(
        "DROP TABLE IF EXISTS growlog_entry, growlog_strain, growlog, strain, breeder",
    )
    .execute(store.connection().expect("connected"))
    .await
    .expect("Dropping old tables should succeed");

    store
        .create_database()
        .await
        .expect("Schema creation should succeed");
    Some(store)
}

#[test]
fn factory_defaults() {
    let settings = MySqlFactory.default_settings();
    assert_eq!(MySqlFactory.engine(), "mysql");
    assert_eq!(settings.engine, "mysql");
    assert_eq!(settings.host, "localhost");
    assert_eq!(settings.port, 3306);
    assert!(!settings.name_is_filename());
    assert!(settings.active_password().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn unreachable_server_fails_quietly_on_test() {
    let mut store = MySqlStore::new(unreachable_settings());
    assert!(!store.test_connection().await);
    assert!(!store.is_connected());
}

#[tokio::test(flavor = "multi_thread")]
async fn unreachable_server_fails_connect() {
    let mut store = MySqlStore::new(unreachable_settings());

    let err = store.connect().await.unwrap_err();
    assert!(err.message().contains("127.0.0.1"));
    assert!(!store.is_connected());

    let err = store.get_breeders().await.unwrap_err();
    assert_eq!(err.code(), -1);
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_host_is_rejected() {
    let mut settings = MySqlFactory.default_settings();
    settings.host.clear();
    let mut store = MySqlStore::new(settings);
    assert!(store.connect().await.is_err());
}

#[tokio::test(flavor = "multi_thread")]
#[serial(mysql)]
async fn live_breeders_and_strains() {
    let Some(mut store) = live_store().await else {
        return;
    };
    contract::breeders_and_strains(&mut store).await;
    store.close().await;
}

#[tokio::test(flavor = "multi_thread")]
#[serial(mysql)]
async fn live_growlog_lifecycle() {
    let Some(mut store) = live_store().await else {
        return;
    };
    contract::growlog_lifecycle(&mut store).await;
    contract::growlog_strain_links(&mut store).await;
    store.close().await;
}

#[tokio::test(flavor = "multi_thread")]
#[serial(mysql)]
async fn live_connect_keeps_healthy_connection() {
    let Some(mut store) = live_store().await else {
        return;
    };
    store.connect().await.expect("Reconnect check should succeed");
    assert!(store.test_connection().await);

    let err = store.create_database().await.unwrap_err();
    assert_eq!(err.code(), 1050, "ER_TABLE_EXISTS_ERROR");
    store.close().await;
}

async fn kill_connection(store: &mut MySqlStore) -> u64 {
    let id: u64 = sqlx::query_scalar("SELECT CONNECTION_ID()")
        .fetch_one(store.connection().expect("connected"))
        .await
        .expect("Connection id query should succeed");
    let mut killer = MySqlStore::new(store.settings().clone());
    killer.connect().await.expect("Second connection should open");
    sqlx::raw_sql(&format!("KILL {}", id))
        .execute(killer.connection().expect("connected"))
        .await
        .expect("KILL should succeed");
    killer.close().await;
    id
}

#[tokio::test(flavor = "multi_thread")]
#[serial(mysql)]
async fn live_connect_replaces_dropped_connection() {
    let Some(mut store) = live_store().await else {
        return;
    };
    let port = store.settings.port;
    kill_connection(&mut store).await;

    // Dead connection and an unreachable target: the handle is dropped
    store.settings.port = 1;
    assert!(store.connect().await.is_err());
    assert!(!store.is_connected());
    assert_eq!(store.get_breeders().await.unwrap_err().code(), -1);

    store.settings.port = port;
    store.connect().await.expect("Reconnect should succeed");
    assert!(store.is_connected());
    assert!(store.get_breeders().await.expect("Query should succeed").is_empty());
    store.close().await;
}

#[tokio::test(flavor = "multi_thread")]
#[serial(mysql)]
async fn live_connect_silently_reconnects() {
    let Some(mut store) = live_store().await else {
        return;
    };
    let id = kill_connection(&mut store).await;

    store.connect().await.expect("Stale connection should be replaced");
    let new_id: u64 = sqlx::query_scalar("SELECT CONNECTION_ID()")
        .fetch_one(store.connection().expect("connected"))
        .await
        .expect("Connection id query should succeed");
    assert_ne!(new_id, id);
    store.close().await;
}
