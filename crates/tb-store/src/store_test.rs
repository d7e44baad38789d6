//! Tests for Store record collections, staging, and commit.

use super::*;
use tb_core::schema::{current, legacy};
use tb_core::{Equipment, LegacyEquipment};

fn store() -> Store {
    Store::in_memory(&current(), SyncMode::Local).unwrap()
}

fn names(items: &[Equipment]) -> Vec<&str> {
    items.iter().map(|e| e.name.as_str()).collect()
}

#[test]
fn insert_is_invisible_until_commit() {
    let store = store();
    store.insert(&Equipment::new("Rod")).unwrap();
    assert!(store.has_changes().unwrap());
    assert!(store.fetch_all::<Equipment>().unwrap().is_empty());

    assert_eq!(store.commit().unwrap(), 1);
    assert!(!store.has_changes().unwrap());
    assert_eq!(store.count::<Equipment>().unwrap(), 1);
}

#[test]
fn fetch_all_preserves_insertion_order() {
    let store = store();
    for name in ["Reel", "Rod", "Lure", "Net"] {
        store.insert(&Equipment::new(name)).unwrap();
    }
    store.commit().unwrap();

    let items = store.fetch_all::<Equipment>().unwrap();
    assert_eq!(names(&items), vec!["Reel", "Rod", "Lure", "Net"]);
}

#[test]
fn fetch_by_id() {
    let store = store();
    let item = Equipment::new("Tackle box").with_category("Storage");
    store.insert(&item).unwrap();
    store.commit().unwrap();

    let found = store.fetch::<Equipment>(&item.id).unwrap().unwrap();
    assert_eq!(found, item);
    assert!(store
        .fetch::<Equipment>(&RecordId::new_v4())
        .unwrap()
        .is_none());
}

#[test]
fn update_in_place() {
    let store = store();
    let mut item = Equipment::new("Spinnerbait");
    store.insert(&item).unwrap();
    store.commit().unwrap();

    item.quantity = 4;
    item.is_equipped = true;
    store.update(&item).unwrap();
    store.commit().unwrap();

    let items = store.fetch_all::<Equipment>().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, 4);
    assert!(items[0].is_equipped);
}

#[test]
fn update_of_missing_record_fails_whole_commit() {
    let store = store();
    store.insert(&Equipment::new("Kept out")).unwrap();
    store.update(&Equipment::new("Never inserted")).unwrap();

    let err = store.commit().unwrap_err();
    assert!(matches!(err, StoreError::Commit(_)));
    assert_eq!(store.count::<Equipment>().unwrap(), 0, "batch rolled back");
    assert!(store.has_changes().unwrap(), "staged changes are kept");

    store.discard_changes().unwrap();
    assert!(!store.has_changes().unwrap());
}

#[test]
fn delete_by_id() {
    let store = store();
    let keep = Equipment::new("Keep");
    let drop = Equipment::new("Drop");
    store.insert(&keep).unwrap();
    store.insert(&drop).unwrap();
    store.commit().unwrap();

    store.delete(&drop).unwrap();
    store.commit().unwrap();

    let items = store.fetch_all::<Equipment>().unwrap();
    assert_eq!(names(&items), vec!["Keep"]);
}

#[test]
fn delete_without_id_matches_payload() {
    let store = Store::in_memory(&legacy(), SyncMode::Local).unwrap();
    let anonymous = LegacyEquipment {
        id: None,
        name: "Unlabelled".to_string(),
        category: None,
        timestamp: chrono::Utc::now(),
        is_equipped: false,
    };
    store.insert(&anonymous).unwrap();
    store.commit().unwrap();
    assert_eq!(store.count::<LegacyEquipment>().unwrap(), 1);

    store.delete(&anonymous).unwrap();
    store.commit().unwrap();
    assert_eq!(store.count::<LegacyEquipment>().unwrap(), 0);
}

#[test]
fn update_without_id_is_rejected() {
    let store = Store::in_memory(&legacy(), SyncMode::Local).unwrap();
    let anonymous = LegacyEquipment {
        id: None,
        name: "Unlabelled".to_string(),
        category: None,
        timestamp: chrono::Utc::now(),
        is_equipped: false,
    };
    let err = store.update(&anonymous).unwrap_err();
    assert!(matches!(err, StoreError::MissingIdentifier { .. }));
}

#[test]
fn undeclared_record_type() {
    #[derive(serde::Serialize, serde::Deserialize)]
    struct Lure {
        id: RecordId,
    }
    impl Record for Lure {
        const RECORD_TYPE: &'static str = "lure";
        const FIELDS: &'static [&'static str] = &["id"];
        fn record_id(&self) -> Option<RecordId> {
            Some(self.id)
        }
    }

    let store = store();
    assert!(store.fetch_all::<Lure>().unwrap().is_empty());
    assert_eq!(store.count::<Lure>().unwrap(), 0);
    let err = store
        .insert(&Lure {
            id: RecordId::new_v4(),
        })
        .unwrap_err();
    assert!(matches!(err, StoreError::UnknownRecordType { .. }));
}

#[test]
fn empty_commit_is_a_no_op() {
    assert_eq!(store().commit().unwrap(), 0);
}

#[test]
fn accessors() {
    let store = Store::in_memory(&current(), SyncMode::Cloud).unwrap();
    assert_eq!(store.sync_mode(), SyncMode::Cloud);
    assert_eq!(store.schema().version(), 2);
    assert_eq!(store.location(), &StoreLocation::Memory);
    assert!(store.path().is_none());
}
