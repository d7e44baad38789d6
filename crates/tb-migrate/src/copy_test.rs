use super::*;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tb_core::schema::{current, legacy};
use tb_core::{Equipment, LegacyEquipment, SyncMode};

fn current_store() -> Store {
    Store::in_memory(&current(), SyncMode::Local).unwrap()
}

fn legacy_store() -> Store {
    Store::in_memory(&legacy(), SyncMode::Local).unwrap()
}

fn legacy_item(name: &str, id: Option<RecordId>) -> LegacyEquipment {
    LegacyEquipment {
        id,
        name: name.to_string(),
        category: Some("Rods".to_string()),
        timestamp: Utc::now(),
        is_equipped: true,
    }
}

/// A record type no built-in schema declares.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Bait {
    name: String,
}

impl Record for Bait {
    const RECORD_TYPE: &'static str = "bait";
    const FIELDS: &'static [&'static str] = &["name"];

    fn record_id(&self) -> Option<RecordId> {
        None
    }
}

#[test]
fn copies_only_records_missing_from_dest() {
    let source = current_store();
    let dest = current_store();
    let a = Equipment::new("A");
    let b = Equipment::new("B");
    source.insert(&a).unwrap();
    source.insert(&b).unwrap();
    source.commit().unwrap();
    dest.insert(&a).unwrap();
    dest.commit().unwrap();

    let inserted = copy_all::<Equipment, Equipment, _>(&source, &dest, |e| e).unwrap();

    assert_eq!(inserted, 1);
    let names: Vec<String> = dest
        .fetch_all::<Equipment>()
        .unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(names, vec!["A", "B"]);
}

#[test]
fn second_copy_inserts_nothing() {
    let source = current_store();
    let dest = current_store();
    source.insert(&Equipment::new("A")).unwrap();
    source.commit().unwrap();

    assert_eq!(copy_all::<Equipment, Equipment, _>(&source, &dest, |e| e).unwrap(), 1);
    assert_eq!(copy_all::<Equipment, Equipment, _>(&source, &dest, |e| e).unwrap(), 0);
    assert_eq!(dest.count::<Equipment>().unwrap(), 1);
}

#[test]
fn transforms_legacy_rows_and_keeps_identifiers() {
    let source = legacy_store();
    let dest = current_store();
    let id = RecordId::new_v4();
    source.insert(&legacy_item("Spinning rod", Some(id))).unwrap();
    source.commit().unwrap();

    let inserted = copy_all::<LegacyEquipment, Equipment, _>(&source, &dest, Equipment::from).unwrap();

    assert_eq!(inserted, 1);
    let copied = dest.fetch::<Equipment>(&id).unwrap().unwrap();
    assert_eq!(copied.name, "Spinning rod");
    assert_eq!(copied.category.as_deref(), Some("Rods"));
    assert!(copied.is_equipped);
    assert_eq!(copied.quantity, 1);
}

#[test]
fn records_without_identifier_are_always_inserted() {
    let source = legacy_store();
    let dest = legacy_store();
    source.insert(&legacy_item("Old reel", None)).unwrap();
    source.commit().unwrap();

    copy_all::<LegacyEquipment, LegacyEquipment, _>(&source, &dest, |e| e).unwrap();
    copy_all::<LegacyEquipment, LegacyEquipment, _>(&source, &dest, |e| e).unwrap();

    assert_eq!(dest.count::<LegacyEquipment>().unwrap(), 2);
}

#[test]
fn preserves_source_order() {
    let source = current_store();
    let dest = current_store();
    for name in ["first", "second", "third"] {
        source.insert(&Equipment::new(name)).unwrap();
    }
    source.commit().unwrap();

    copy_all::<Equipment, Equipment, _>(&source, &dest, |e| e).unwrap();

    let names: Vec<String> = dest
        .fetch_all::<Equipment>()
        .unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(names, vec!["first", "second", "third"]);
}

#[test]
fn empty_source_commits_nothing() {
    let source = legacy_store();
    let dest = current_store();

    let inserted = copy_all::<LegacyEquipment, Equipment, _>(&source, &dest, Equipment::from).unwrap();

    assert_eq!(inserted, 0);
    assert!(!dest.has_changes().unwrap());
}

#[test]
fn staging_failure_leaves_dest_untouched() {
    let source = current_store();
    let dest = current_store();
    source.insert(&Equipment::new("A")).unwrap();
    source.commit().unwrap();
    dest.insert(&Equipment::new("pending")).unwrap();

    let err = copy_all::<Equipment, Bait, _>(&source, &dest, |e| Bait { name: e.name }).unwrap_err();

    assert!(matches!(err, MigrationError::Stage { ref record_type, .. } if record_type == "bait"));
    assert!(!dest.has_changes().unwrap());
    assert_eq!(dest.count::<Equipment>().unwrap(), 0);
}
