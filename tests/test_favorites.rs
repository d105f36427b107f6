//! Integration tests for the durable favorites store.

use std::fs;

use pokemontcg_sdk::FavoritesStore;

mod common;
use common::card;

// ---------------------------------------------------------------------------
// Basic toggling
// ---------------------------------------------------------------------------

#[test]
fn set_and_get_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let store = FavoritesStore::open(dir.path().join("favorites.json")).unwrap();

    assert!(store.get("base1-58").is_none());

    let pikachu = card("base1-58", "Pikachu", Some("Common"));
    store.set_favorite("base1-58", true, Some(&pikachu)).unwrap();

    let record = store.get("base1-58").unwrap();
    assert!(record.is_favorite);
    assert_eq!(record.name, "Pikachu");
    assert_eq!(record.rarity.as_deref(), Some("Common"));
}

#[test]
fn toggle_on_then_off_is_an_idempotent_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let store = FavoritesStore::open(dir.path().join("favorites.json")).unwrap();

    let pikachu = card("base1-58", "Pikachu", Some("Common"));
    store.set_favorite("base1-58", true, Some(&pikachu)).unwrap();
    store.set_favorite("base1-58", false, None).unwrap();

    // The record survives with the flag off; the favorites list excludes it.
    let record = store.get("base1-58").unwrap();
    assert!(!record.is_favorite);
    assert_eq!(record.name, "Pikachu");
    assert!(store.list_favorites().is_empty());
}

#[test]
fn toggle_without_snapshot_creates_a_bare_record() {
    let dir = tempfile::tempdir().unwrap();
    let store = FavoritesStore::open(dir.path().join("favorites.json")).unwrap();

    store.set_favorite("sm9-33", true, None).unwrap();

    let record = store.get("sm9-33").unwrap();
    assert!(record.is_favorite);
    assert!(record.to_card().is_none());
}

#[test]
fn later_snapshot_refreshes_denormalized_fields() {
    let dir = tempfile::tempdir().unwrap();
    let store = FavoritesStore::open(dir.path().join("favorites.json")).unwrap();

    store.set_favorite("base1-58", true, None).unwrap();

    let mut pikachu = card("base1-58", "Pikachu", Some("Common"));
    pikachu.hp = Some("50".to_string());
    store.set_favorite("base1-58", true, Some(&pikachu)).unwrap();

    let record = store.get("base1-58").unwrap();
    assert_eq!(record.name, "Pikachu");
    assert_eq!(record.hp.as_deref(), Some("50"));
}

#[test]
fn list_favorites_is_sorted_by_card_id() {
    let dir = tempfile::tempdir().unwrap();
    let store = FavoritesStore::open(dir.path().join("favorites.json")).unwrap();

    store.set_favorite("c", true, None).unwrap();
    store.set_favorite("a", true, None).unwrap();
    store.set_favorite("b", true, None).unwrap();
    store.set_favorite("d", false, None).unwrap();

    let ids: Vec<String> = store
        .list_favorites()
        .into_iter()
        .map(|r| r.card_id)
        .collect();
    assert_eq!(ids, ["a", "b", "c"]);
}

// ---------------------------------------------------------------------------
// Durability
// ---------------------------------------------------------------------------

#[test]
fn records_persist_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("favorites.json");

    {
        let store = FavoritesStore::open(&path).unwrap();
        let pikachu = card("base1-58", "Pikachu", Some("Common"));
        store.set_favorite("base1-58", true, Some(&pikachu)).unwrap();
    }

    let reopened = FavoritesStore::open(&path).unwrap();
    let record = reopened.get("base1-58").unwrap();
    assert!(record.is_favorite);
    assert_eq!(record.name, "Pikachu");
}

#[test]
fn old_format_file_loads_with_backfilled_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("favorites.json");
    fs::write(
        &path,
        r#"[{"cardId": "base1-58", "isFavorite": true}]"#,
    )
    .unwrap();

    let store = FavoritesStore::open(&path).unwrap();
    let record = store.get("base1-58").unwrap();
    assert!(record.is_favorite);
    assert_eq!(record.name, "");
    assert!(record.types.is_empty());
    assert_eq!(store.list_favorites().len(), 1);
}

#[test]
fn corrupt_file_is_sidelined_not_deleted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("favorites.json");
    fs::write(&path, "not json at all {{{").unwrap();

    let store = FavoritesStore::open(&path).unwrap();
    assert!(store.list_favorites().is_empty());

    let sidelined = dir.path().join("favorites.json.corrupt");
    assert!(sidelined.exists());
    assert_eq!(fs::read_to_string(sidelined).unwrap(), "not json at all {{{");

    // The store is fully usable after recovery.
    store.set_favorite("a", true, None).unwrap();
    assert_eq!(store.list_favorites().len(), 1);
}

// ---------------------------------------------------------------------------
// Change notifications
// ---------------------------------------------------------------------------

#[tokio::test]
async fn notification_fires_once_per_successful_set() {
    let dir = tempfile::tempdir().unwrap();
    let store = FavoritesStore::open(dir.path().join("favorites.json")).unwrap();

    let mut changes = store.subscribe();

    store.set_favorite("a", true, None).unwrap();
    store.set_favorite("b", true, None).unwrap();

    assert_eq!(changes.recv().await.unwrap(), "a");
    assert_eq!(changes.recv().await.unwrap(), "b");
    assert!(changes.try_recv().is_err());
}

#[tokio::test]
async fn notification_arrives_after_the_durable_write() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("favorites.json");
    let store = FavoritesStore::open(&path).unwrap();

    let mut changes = store.subscribe();
    store.set_favorite("base1-58", true, None).unwrap();

    let id = changes.recv().await.unwrap();
    // By the time the event is observable, the record is on disk.
    let on_disk = fs::read_to_string(&path).unwrap();
    assert!(on_disk.contains(&id));
}
