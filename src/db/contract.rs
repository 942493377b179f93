//! Behaviour every `Store` implementation must share.
//!
//! The server adapters run these against a live database when one is
//! configured through the environment; each function expects freshly
//! created, empty tables.

use chrono::{Duration, TimeZone, Utc};

use crate::db::{Breeder, DatabaseSettings, Growlog, GrowlogEntry, Store, Strain};

/// Settings for a server engine read from `GROWBOOK_TEST_<PREFIX>_*`.
///
/// Returns `None` (and the calling test is skipped) when `_HOST` is unset.
pub(crate) fn settings_from_env(
    prefix: &str,
    defaults: DatabaseSettings,
) -> Option<DatabaseSettings> {
    let var = |name: &str| std::env::var(format!("GROWBOOK_TEST_{}_{}", prefix, name)).ok();

    let mut settings = defaults;
    settings.host = var("HOST")?;
    if let Some(port) = var("PORT").and_then(|p| p.parse().ok()) {
        settings.port = port;
    }
    if let Some(user) = var("USER") {
        settings.user = user;
    }
    if let Some(password) = var("PASSWORD") {
        settings.password = password;
    }
    if let Some(dbname) = var("DB") {
        settings.dbname = dbname;
    }
    Some(settings)
}

pub(crate) async fn breeders_and_strains(store: &mut dyn Store) {
    for name in ["", "   "] {
        let err = store
            .add_breeder(&Breeder::new(name, ""))
            .await
            .expect_err("Blank breeder name must be rejected");
        assert_eq!(err.code(), -1);
        assert_eq!(err.message(), "Breeder name must not be empty");
    }
    assert!(store.get_breeders().await.unwrap().is_empty());

    store
        .add_breeder(&Breeder::new("Sensi Seeds", ""))
        .await
        .expect("Add breeder should succeed");
    let mut breeder = store
        .get_breeder("Sensi Seeds")
        .await
        .expect("Get breeder should succeed")
        .expect("Breeder should exist");
    assert_ne!(breeder.id, 0);
    assert_eq!(breeder.homepage, "");

    breeder.homepage = "https://sensiseeds.com".to_string();
    store.add_breeder(&breeder).await.expect("Update should succeed");
    // Saving unchanged values is still a valid update
    store.add_breeder(&breeder).await.expect("No-op update should succeed");
    assert_eq!(store.get_breeders().await.unwrap(), vec![breeder.clone()]);

    let mut ghost = Breeder::new("Ghost", "");
    ghost.id = breeder.id + 1000;
    assert!(store.add_breeder(&ghost).await.is_err());

    let mut blanked = breeder.clone();
    blanked.name = String::new();
    assert!(store.add_breeder(&blanked).await.is_err());
    assert_eq!(
        store.get_breeder_by_id(breeder.id).await.unwrap(),
        Some(breeder.clone())
    );

    // Names differing only in case are distinct on every engine
    store
        .add_breeder(&Breeder::new("sensi seeds", ""))
        .await
        .expect("Case variant should be a separate breeder");
    let variant = store.get_breeder("sensi seeds").await.unwrap().unwrap();
    assert_ne!(variant.id, breeder.id);
    assert_eq!(store.get_breeders().await.unwrap().len(), 2);
    store.remove_breeder(variant.id).await.unwrap();

    store
        .add_strain(&Strain::new(breeder.id, "Jack Herer"))
        .await
        .expect("Add strain should succeed");
    let strains = store.get_strains_for_breeder(breeder.id).await.unwrap();
    assert_eq!(strains.len(), 1);
    assert_eq!(strains[0].name, "Jack Herer");
    assert_eq!(strains[0].breeder_name, "Sensi Seeds");

    assert!(
        store
            .add_strain(&Strain::new(breeder.id, "Jack Herer"))
            .await
            .is_err(),
        "Duplicate strain name must be rejected"
    );

    store
        .add_strain(&Strain::new(breeder.id, "JACK HERER"))
        .await
        .expect("Case variant should be a separate strain");
    assert_eq!(store.get_strains_for_breeder(breeder.id).await.unwrap().len(), 2);

    store.remove_breeder(breeder.id).await.unwrap();
    store.remove_breeder(breeder.id).await.unwrap();
    assert!(store.get_strains().await.unwrap().is_empty());
}

pub(crate) async fn growlog_lifecycle(store: &mut dyn Store) {
    let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();

    let mut growlog = Growlog::new("Grow #1", "Indoor tent");
    growlog.created_on = t0;
    store.add_growlog(&growlog).await.expect("Add growlog should succeed");

    let mut growlog = store.get_growlog("Grow #1").await.unwrap().unwrap();
    assert_eq!(growlog.created_on, t0);
    assert!(growlog.is_ongoing());
    assert_eq!(store.get_ongoing_growlogs().await.unwrap().len(), 1);
    assert!(store.get_finished_growlogs().await.unwrap().is_empty());

    growlog.set_flower_on(Some(t0 + Duration::days(30)));
    store.add_growlog(&growlog).await.unwrap();
    assert_eq!(store.get_flowering_growlogs().await.unwrap().len(), 1);

    growlog.set_finished_on(Some(t0 + Duration::days(90)));
    store.add_growlog(&growlog).await.unwrap();
    assert!(store.get_ongoing_growlogs().await.unwrap().is_empty());
    assert!(store.get_flowering_growlogs().await.unwrap().is_empty());
    let finished = store.get_finished_growlogs().await.unwrap();
    assert_eq!(finished, vec![growlog.clone()]);

    let mut later = GrowlogEntry::new(growlog.id, "Harvest");
    later.created_on = t0 + Duration::days(90);
    let mut earlier = GrowlogEntry::new(growlog.id, "Germinated");
    earlier.created_on = t0;
    store.add_growlog_entry(&later).await.unwrap();
    store.add_growlog_entry(&earlier).await.unwrap();
    let texts: Vec<_> = store
        .get_growlog_entries(growlog.id)
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.text)
        .collect();
    assert_eq!(texts, vec!["Germinated", "Harvest"]);

    store.remove_growlog(growlog.id).await.unwrap();
    assert!(store.get_growlog_entries(growlog.id).await.unwrap().is_empty());
    assert!(store.get_growlog_by_id(growlog.id).await.unwrap().is_none());
}

pub(crate) async fn growlog_strain_links(store: &mut dyn Store) {
    store.add_breeder(&Breeder::new("Sensi Seeds", "")).await.unwrap();
    let breeder = store.get_breeder("Sensi Seeds").await.unwrap().unwrap();
    store
        .add_strain(&Strain::new(breeder.id, "Skunk #1"))
        .await
        .unwrap();
    let strain = store
        .get_strain(breeder.id, "Skunk #1")
        .await
        .unwrap()
        .unwrap();
    store.add_growlog(&Growlog::new("Grow #2", "")).await.unwrap();
    let growlog = store.get_growlog("Grow #2").await.unwrap().unwrap();

    store.add_strain_to_growlog(growlog.id, strain.id).await.unwrap();
    store.add_strain_to_growlog(growlog.id, strain.id).await.unwrap();
    assert_eq!(store.get_strains_for_growlog(growlog.id).await.unwrap(), vec![strain.clone()]);
    assert_eq!(store.get_growlogs_for_strain(strain.id).await.unwrap().len(), 1);
    assert!(store.add_strain_to_growlog(growlog.id, strain.id + 1000).await.is_err());

    store.remove_strain_from_growlog(growlog.id, strain.id).await.unwrap();
    store.remove_strain_from_growlog(growlog.id, strain.id).await.unwrap();
    assert!(store.get_strains_for_growlog(growlog.id).await.unwrap().is_empty());

    store.remove_growlog(growlog.id).await.unwrap();
    store.remove_breeder(breeder.id).await.unwrap();
}
