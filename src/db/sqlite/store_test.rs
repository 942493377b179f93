//! CRUD tests for the SQLite store.

use chrono::{Duration, TimeZone, Utc};
use tempfile::TempDir;

use super::SqliteStore;
use crate::db::contract;
use crate::db::{Breeder, Capabilities, DatabaseSettings, Growlog, GrowlogEntry, Store, Strain};

async fn setup_store() -> (TempDir, SqliteStore) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let mut settings = DatabaseSettings::new("sqlite", Capabilities::NAME_IS_FILENAME);
    settings.dbname = dir.path().join("growbook.db").to_string_lossy().into_owned();

    let mut store = SqliteStore::new(settings);
    store
        .create_database()
        .await
        .expect("Schema creation should succeed");
    (dir, store)
}

async fn add_sensi_seeds(store: &mut SqliteStore) -> Breeder {
    store
        .add_breeder(&Breeder::new("Sensi Seeds", ""))
        .await
        .expect("Add breeder should succeed");
    store
        .get_breeder("Sensi Seeds")
        .await
        .expect("Get breeder should succeed")
        .expect("Breeder should exist")
}

async fn add_strain(store: &mut SqliteStore, breeder_id: i64, name: &str) -> Strain {
    store
        .add_strain(&Strain::new(breeder_id, name))
        .await
        .expect("Add strain should succeed");
    store
        .get_strain(breeder_id, name)
        .await
        .expect("Get strain should succeed")
        .expect("Strain should exist")
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_store_returns_empty_lists() {
    let (_dir, mut store) = setup_store().await;

    assert!(store.get_breeders().await.unwrap().is_empty());
    assert!(store.get_strains().await.unwrap().is_empty());
    assert!(store.get_growlogs().await.unwrap().is_empty());
    assert!(store.get_growlog_entries(1).await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_records_are_none() {
    let (_dir, mut store) = setup_store().await;

    assert!(store.get_breeder("Nobody").await.unwrap().is_none());
    assert!(store.get_breeder_by_id(42).await.unwrap().is_none());
    assert!(store.get_strain(1, "Nothing").await.unwrap().is_none());
    assert!(store.get_strain_by_id(42).await.unwrap().is_none());
    assert!(store.get_growlog("Nothing").await.unwrap().is_none());
    assert!(store.get_growlog_by_id(42).await.unwrap().is_none());
    assert!(store.get_growlog_entry(42).await.unwrap().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn first_breeder_gets_id_one() {
    let (_dir, mut store) = setup_store().await;

    let breeder = add_sensi_seeds(&mut store).await;
    assert_eq!(breeder.id, 1);
    assert_eq!(breeder.name, "Sensi Seeds");
    assert_eq!(breeder.homepage, "");
}

#[tokio::test(flavor = "multi_thread")]
async fn update_breeder_keeps_single_row() {
    let (_dir, mut store) = setup_store().await;
    let mut breeder = add_sensi_seeds(&mut store).await;

    breeder.homepage = "https://sensiseeds.com".to_string();
    store.add_breeder(&breeder).await.expect("Update should succeed");

    let fetched = store.get_breeder_by_id(breeder.id).await.unwrap().unwrap();
    assert_eq!(fetched, breeder);
    assert_eq!(store.get_breeders().await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn update_unknown_id_fails() {
    let (_dir, mut store) = setup_store().await;

    let mut ghost = Breeder::new("Ghost", "");
    ghost.id = 99;
    let err = store.add_breeder(&ghost).await.unwrap_err();
    assert!(err.message().contains("No breeder with id 99"));
    assert!(store.get_breeders().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn duplicate_breeder_name_is_rolled_back() {
    let (_dir, mut store) = setup_store().await;
    add_sensi_seeds(&mut store).await;

    let err = store
        .add_breeder(&Breeder::new("Sensi Seeds", "https://dup.example"))
        .await
        .unwrap_err();
    assert_ne!(err.code(), -1);
    assert!(err.message().contains("Sensi Seeds"));

    let breeders = store.get_breeders().await.unwrap();
    assert_eq!(breeders.len(), 1);
    assert_eq!(breeders[0].homepage, "");
}

#[tokio::test(flavor = "multi_thread")]
async fn breeders_are_ordered_by_name() {
    let (_dir, mut store) = setup_store().await;
    for name in ["Paradise Seeds", "Dutch Passion", "Sensi Seeds"] {
        store.add_breeder(&Breeder::new(name, "")).await.unwrap();
    }

    let names: Vec<_> = store
        .get_breeders()
        .await
        .unwrap()
        .into_iter()
        .map(|b| b.name)
        .collect();
    assert_eq!(names, vec!["Dutch Passion", "Paradise Seeds", "Sensi Seeds"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn remove_is_idempotent() {
    let (_dir, mut store) = setup_store().await;
    let breeder = add_sensi_seeds(&mut store).await;

    store.remove_breeder(breeder.id).await.expect("First remove should succeed");
    store.remove_breeder(breeder.id).await.expect("Second remove should succeed");
    assert!(store.get_breeder_by_id(breeder.id).await.unwrap().is_none());

    store.remove_strain(7).await.expect("Removing absent strain is fine");
    store.remove_growlog(7).await.expect("Removing absent growlog is fine");
    store.remove_growlog_entry(7).await.expect("Removing absent entry is fine");
}

#[tokio::test(flavor = "multi_thread")]
async fn strain_lists_carry_breeder_name() {
    let (_dir, mut store) = setup_store().await;
    let breeder = add_sensi_seeds(&mut store).await;

    let mut strain = Strain::new(breeder.id, "Jack Herer");
    strain.info = "Sativa dominant".to_string();
    strain.seedfinder = "Jack_Herer".to_string();
    store.add_strain(&strain).await.expect("Add strain should succeed");

    let strains = store.get_strains_for_breeder(breeder.id).await.unwrap();
    assert_eq!(strains.len(), 1);
    assert_eq!(strains[0].name, "Jack Herer");
    assert_eq!(strains[0].breeder_name, "Sensi Seeds");
    assert_eq!(strains[0].info, "Sativa dominant");
    assert_eq!(strains[0].seedfinder, "Jack_Herer");
    assert_ne!(strains[0].id, 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn strain_names_are_unique_per_breeder_only() {
    let (_dir, mut store) = setup_store().await;
    let sensi = add_sensi_seeds(&mut store).await;
    store.add_breeder(&Breeder::new("Clone Shop", "")).await.unwrap();
    let other = store.get_breeder("Clone Shop").await.unwrap().unwrap();

    add_strain(&mut store, sensi.id, "Skunk #1").await;
    add_strain(&mut store, other.id, "Skunk #1").await;
    assert!(store.add_strain(&Strain::new(sensi.id, "Skunk #1")).await.is_err());

    let all = store.get_strains().await.unwrap();
    let labels: Vec<_> = all
        .iter()
        .map(|s| format!("{}/{}", s.breeder_name, s.name))
        .collect();
    assert_eq!(labels, vec!["Clone Shop/Skunk #1", "Sensi Seeds/Skunk #1"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn strain_requires_existing_breeder() {
    let (_dir, mut store) = setup_store().await;
    assert!(store.add_strain(&Strain::new(42, "Orphan")).await.is_err());
    assert!(store.get_strains().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn update_strain_overwrites_all_fields() {
    let (_dir, mut store) = setup_store().await;
    let breeder = add_sensi_seeds(&mut store).await;
    let mut strain = add_strain(&mut store, breeder.id, "Jack Herer").await;

    strain.description = "Named after the activist".to_string();
    strain.homepage = "https://sensiseeds.com/jack-herer".to_string();
    store.add_strain(&strain).await.expect("Update should succeed");

    let fetched = store.get_strain_by_id(strain.id).await.unwrap().unwrap();
    assert_eq!(fetched, strain);
    assert_eq!(store.get_strains().await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn removing_breeder_removes_its_strains() {
    let (_dir, mut store) = setup_store().await;
    let breeder = add_sensi_seeds(&mut store).await;
    add_strain(&mut store, breeder.id, "Jack Herer").await;

    store.remove_breeder(breeder.id).await.unwrap();
    assert!(store.get_strains().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn growlog_moves_from_ongoing_to_finished() {
    let (_dir, mut store) = setup_store().await;
    let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();

    let mut growlog = Growlog::new("Grow #1", "");
    growlog.created_on = t0;
    store.add_growlog(&growlog).await.expect("Add growlog should succeed");

    let titles = |logs: Vec<Growlog>| logs.into_iter().map(|g| g.title).collect::<Vec<_>>();
    assert_eq!(titles(store.get_ongoing_growlogs().await.unwrap()), vec!["Grow #1"]);
    assert!(store.get_finished_growlogs().await.unwrap().is_empty());

    let mut growlog = store.get_growlog("Grow #1").await.unwrap().unwrap();
    assert_eq!(growlog.created_on, t0);
    assert_eq!(growlog.flower_on, None);
    assert_eq!(growlog.finished_on, None);

    growlog.set_finished_on(Some(t0 + Duration::days(90)));
    store.add_growlog(&growlog).await.expect("Update should succeed");

    assert!(store.get_ongoing_growlogs().await.unwrap().is_empty());
    assert_eq!(titles(store.get_finished_growlogs().await.unwrap()), vec!["Grow #1"]);
    assert_eq!(store.get_growlogs().await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn flowering_growlogs_exclude_finished() {
    let (_dir, mut store) = setup_store().await;
    let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();

    let mut vegging = Growlog::new("Vegging", "");
    vegging.created_on = t0;
    let mut flowering = Growlog::new("Flowering", "");
    flowering.created_on = t0;
    flowering.set_flower_on(Some(t0 + Duration::days(30)));
    let mut harvested = Growlog::new("Harvested", "");
    harvested.created_on = t0;
    harvested.set_flower_on(Some(t0 + Duration::days(30)));
    harvested.set_finished_on(Some(t0 + Duration::days(90)));

    for growlog in [&vegging, &flowering, &harvested] {
        store.add_growlog(growlog).await.unwrap();
    }

    let flowering_now = store.get_flowering_growlogs().await.unwrap();
    assert_eq!(flowering_now.len(), 1);
    assert_eq!(flowering_now[0].title, "Flowering");
    assert_eq!(flowering_now[0].flower_on, Some(t0 + Duration::days(30)));
}

#[tokio::test(flavor = "multi_thread")]
async fn growlog_titles_are_unique() {
    let (_dir, mut store) = setup_store().await;
    store.add_growlog(&Growlog::new("Grow #1", "")).await.unwrap();
    assert!(store.add_growlog(&Growlog::new("Grow #1", "again")).await.is_err());
}

#[tokio::test(flavor = "multi_thread")]
async fn growlog_strain_links() {
    let (_dir, mut store) = setup_store().await;
    let breeder = add_sensi_seeds(&mut store).await;
    let jack = add_strain(&mut store, breeder.id, "Jack Herer").await;
    let skunk = add_strain(&mut store, breeder.id, "Skunk #1").await;

    store.add_growlog(&Growlog::new("Grow #1", "")).await.unwrap();
    let growlog = store.get_growlog("Grow #1").await.unwrap().unwrap();

    store.add_strain_to_growlog(growlog.id, skunk.id).await.unwrap();
    store.add_strain_to_growlog(growlog.id, jack.id).await.unwrap();
    store
        .add_strain_to_growlog(growlog.id, jack.id)
        .await
        .expect("Linking twice is a no-op");

    let names: Vec<_> = store
        .get_strains_for_growlog(growlog.id)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, vec!["Jack Herer", "Skunk #1"]);

    let growlogs = store.get_growlogs_for_strain(jack.id).await.unwrap();
    assert_eq!(growlogs.len(), 1);
    assert_eq!(growlogs[0].id, growlog.id);

    store.remove_strain_from_growlog(growlog.id, jack.id).await.unwrap();
    store
        .remove_strain_from_growlog(growlog.id, jack.id)
        .await
        .expect("Unlinking twice is a no-op");
    assert_eq!(store.get_strains_for_growlog(growlog.id).await.unwrap().len(), 1);
    assert!(store.get_growlogs_for_strain(jack.id).await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn linking_unknown_strain_fails() {
    let (_dir, mut store) = setup_store().await;
    store.add_growlog(&Growlog::new("Grow #1", "")).await.unwrap();
    let growlog = store.get_growlog("Grow #1").await.unwrap().unwrap();

    assert!(store.add_strain_to_growlog(growlog.id, 404).await.is_err());
}

#[tokio::test(flavor = "multi_thread")]
async fn entries_are_ordered_by_creation() {
    let (_dir, mut store) = setup_store().await;
    store.add_growlog(&Growlog::new("Grow #1", "")).await.unwrap();
    let growlog = store.get_growlog("Grow #1").await.unwrap().unwrap();
    let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();

    let mut later = GrowlogEntry::new(growlog.id, "First pistils");
    later.created_on = t0 + Duration::days(40);
    let mut earlier = GrowlogEntry::new(growlog.id, "Germinated");
    earlier.created_on = t0;
    store.add_growlog_entry(&later).await.unwrap();
    store.add_growlog_entry(&earlier).await.unwrap();

    let entries = store.get_growlog_entries(growlog.id).await.unwrap();
    let texts: Vec<_> = entries.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, vec!["Germinated", "First pistils"]);
    assert_eq!(entries[0].created_on, t0);

    let mut edited = entries[1].clone();
    edited.text = "First pistils, day 40".to_string();
    store.add_growlog_entry(&edited).await.unwrap();
    let fetched = store.get_growlog_entry(edited.id).await.unwrap().unwrap();
    assert_eq!(fetched, edited);
    assert_eq!(store.get_growlog_entries(growlog.id).await.unwrap().len(), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn removing_growlog_removes_entries_and_links() {
    let (_dir, mut store) = setup_store().await;
    let breeder = add_sensi_seeds(&mut store).await;
    let strain = add_strain(&mut store, breeder.id, "Jack Herer").await;

    store.add_growlog(&Growlog::new("Grow #1", "")).await.unwrap();
    let growlog = store.get_growlog("Grow #1").await.unwrap().unwrap();
    store.add_strain_to_growlog(growlog.id, strain.id).await.unwrap();
    store
        .add_growlog_entry(&GrowlogEntry::new(growlog.id, "Germinated"))
        .await
        .unwrap();

    store.remove_growlog(growlog.id).await.unwrap();

    assert!(store.get_growlog_entries(growlog.id).await.unwrap().is_empty());
    assert!(store.get_growlogs_for_strain(strain.id).await.unwrap().is_empty());
    assert!(store.get_strain_by_id(strain.id).await.unwrap().is_some());
}

#[tokio::test(flavor = "multi_thread")]
async fn entry_requires_existing_growlog() {
    let (_dir, mut store) = setup_store().await;
    assert!(
        store
            .add_growlog_entry(&GrowlogEntry::new(404, "Lost note"))
            .await
            .is_err()
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn data_survives_reconnect() {
    let (_dir, mut store) = setup_store().await;
    add_sensi_seeds(&mut store).await;

    store.close().await;
    store.connect().await.expect("Reconnect should succeed");

    let breeders = store.get_breeders().await.unwrap();
    assert_eq!(breeders.len(), 1);
    assert_eq!(breeders[0].name, "Sensi Seeds");
}

#[tokio::test(flavor = "multi_thread")]
async fn shared_store_contract() {
    let (_dir, mut store) = setup_store().await;
    contract::breeders_and_strains(&mut store).await;
    contract::growlog_lifecycle(&mut store).await;
    contract::growlog_strain_links(&mut store).await;
}
