use chrono::{TimeZone, Utc};
use tempfile::TempDir;

use crate::cli::commands::breeder::add_breeder;
use crate::cli::commands::growlog::{
    GrowlogFilter, add_growlog, finish_growlog, flower_growlog, link_strain,
    list_growlog_strains, list_growlogs, remove_growlog, unlink_strain,
};
use crate::cli::commands::strain::{StrainFields, add_strain};
use crate::cli::error::CliError;
use crate::cli::utils::OutputFormat;
use crate::db::sqlite::SqliteStore;
use crate::db::{Capabilities, DatabaseSettings, Store};

async fn setup_store() -> (TempDir, SqliteStore) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let mut settings = DatabaseSettings::new("sqlite", Capabilities::NAME_IS_FILENAME);
    settings.dbname = dir.path().join("growbook.db").to_string_lossy().into_owned();
    let mut store = SqliteStore::new(settings);
    store.create_database().await.expect("Failed to create schema");
    (dir, store)
}

#[tokio::test]
async fn test_add_growlog_with_start_date() {
    let (_dir, mut store) = setup_store().await;

    let output = add_growlog(&mut store, "Balcony 2024", Some("Four pots"), Some("2024-04-20"))
        .await
        .unwrap();
    assert_eq!(output, "Started growlog 'Balcony 2024' (id 1)");

    let growlog = store.get_growlog("Balcony 2024").await.unwrap().unwrap();
    assert_eq!(growlog.description, "Four pots");
    assert_eq!(
        growlog.created_on,
        Utc.with_ymd_and_hms(2024, 4, 20, 0, 0, 0).unwrap()
    );
    assert!(growlog.is_ongoing());
}

#[tokio::test]
async fn test_add_existing_growlog_updates_description() {
    let (_dir, mut store) = setup_store().await;
    add_growlog(&mut store, "Tent", None, Some("2024-01-01")).await.unwrap();

    let output = add_growlog(&mut store, "Tent", Some("80x80 tent"), None)
        .await
        .unwrap();
    assert_eq!(output, "Updated growlog 'Tent' (id 1)");

    let growlog = store.get_growlog("Tent").await.unwrap().unwrap();
    assert_eq!(growlog.description, "80x80 tent");
    assert_eq!(
        growlog.created_on,
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    );
}

#[tokio::test]
async fn test_add_growlog_rejects_bad_date() {
    let (_dir, mut store) = setup_store().await;
    let err = add_growlog(&mut store, "Tent", None, Some("20.04.2024"))
        .await
        .unwrap_err();
    assert!(matches!(err, CliError::InvalidDate { .. }));
    assert!(store.get_growlogs().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_growlog_lifecycle_filters() {
    let (_dir, mut store) = setup_store().await;
    add_growlog(&mut store, "Indoor", None, Some("2024-01-01")).await.unwrap();
    add_growlog(&mut store, "Outdoor", None, Some("2024-04-01")).await.unwrap();

    let output = flower_growlog(&mut store, "Indoor", Some("2024-02-15"))
        .await
        .unwrap();
    assert_eq!(output, "Growlog 'Indoor' flowering since 2024-02-15");

    let flowering = list_growlogs(&mut store, GrowlogFilter::Flowering, OutputFormat::Table)
        .await
        .unwrap();
    assert!(flowering.contains("Indoor"));
    assert!(flowering.contains("flowering"));
    assert!(!flowering.contains("Outdoor"));

    let output = finish_growlog(&mut store, "Indoor", Some("2024-04-10 18:00:00"))
        .await
        .unwrap();
    assert_eq!(output, "Growlog 'Indoor' finished on 2024-04-10");

    let finished = list_growlogs(&mut store, GrowlogFilter::Finished, OutputFormat::Table)
        .await
        .unwrap();
    assert!(finished.contains("Indoor"));
    assert!(!finished.contains("Outdoor"));

    let ongoing = list_growlogs(&mut store, GrowlogFilter::Ongoing, OutputFormat::Table)
        .await
        .unwrap();
    assert!(ongoing.contains("Outdoor"));
    assert!(ongoing.contains("vegetative"));
    assert!(!ongoing.contains("Indoor"));

    let flowering = list_growlogs(&mut store, GrowlogFilter::Flowering, OutputFormat::Table)
        .await
        .unwrap();
    assert_eq!(flowering, "No growlogs found.");
}

#[tokio::test]
async fn test_flower_unknown_growlog() {
    let (_dir, mut store) = setup_store().await;
    let err = flower_growlog(&mut store, "Nothing", None).await.unwrap_err();
    assert_eq!(err.to_string(), "No growlog named 'Nothing'");
}

#[tokio::test]
async fn test_list_growlogs_json() {
    let (_dir, mut store) = setup_store().await;
    add_growlog(&mut store, "Tent", None, Some("2024-01-01 08:00:00"))
        .await
        .unwrap();

    let output = list_growlogs(&mut store, GrowlogFilter::All, OutputFormat::Json)
        .await
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value[0]["title"], "Tent");
    assert!(value[0]["finished_on"].is_null());
}

#[tokio::test]
async fn test_link_and_unlink_strain() {
    let (_dir, mut store) = setup_store().await;
    add_breeder(&mut store, "Sensi Seeds", None).await.unwrap();
    add_strain(&mut store, "Sensi Seeds", "Jack Herer", StrainFields::default())
        .await
        .unwrap();
    add_growlog(&mut store, "Tent", None, None).await.unwrap();

    let output = link_strain(&mut store, "Tent", "Sensi Seeds", "Jack Herer")
        .await
        .unwrap();
    assert_eq!(output, "Growing 'Sensi Seeds/Jack Herer' in 'Tent'");
    link_strain(&mut store, "Tent", "Sensi Seeds", "Jack Herer")
        .await
        .unwrap();

    let strains = list_growlog_strains(&mut store, "Tent", OutputFormat::Table)
        .await
        .unwrap();
    assert_eq!(strains.matches("Jack Herer").count(), 1);

    let output = unlink_strain(&mut store, "Tent", "Sensi Seeds", "Jack Herer")
        .await
        .unwrap();
    assert_eq!(output, "Removed 'Sensi Seeds/Jack Herer' from 'Tent'");

    let strains = list_growlog_strains(&mut store, "Tent", OutputFormat::Table)
        .await
        .unwrap();
    assert_eq!(strains, "No strains in this growlog.");
}

#[tokio::test]
async fn test_link_unknown_strain() {
    let (_dir, mut store) = setup_store().await;
    add_breeder(&mut store, "Sensi Seeds", None).await.unwrap();
    add_growlog(&mut store, "Tent", None, None).await.unwrap();

    let err = link_strain(&mut store, "Tent", "Sensi Seeds", "Haze")
        .await
        .unwrap_err();
    assert!(matches!(err, CliError::NotFound { kind: "strain", .. }));
}

#[tokio::test]
async fn test_remove_growlog() {
    let (_dir, mut store) = setup_store().await;
    add_growlog(&mut store, "Tent", None, None).await.unwrap();

    let output = remove_growlog(&mut store, "Tent").await.unwrap();
    assert_eq!(output, "Removed growlog 'Tent' and its entries");
    assert!(store.get_growlog("Tent").await.unwrap().is_none());
}
