use super::*;
use chrono::Utc;
use tb_core::schema::{current, legacy};
use tb_core::{RecordId, SyncMode};

#[test]
fn builtin_steps_are_registered_in_order() {
    let registry = builtin_registry(Arc::new(Settings::in_memory())).unwrap();
    let versions: Vec<u32> = registry.steps().iter().map(|s| s.version()).collect();
    assert_eq!(versions, vec![1]);
    assert!(!registry.steps()[0].description().is_empty());
}

#[test]
fn v1_converts_legacy_equipment() {
    let source = Store::in_memory(&legacy(), SyncMode::Local).unwrap();
    let dest = Store::in_memory(&current(), SyncMode::Local).unwrap();
    let id = RecordId::new_v4();
    source
        .insert(&LegacyEquipment {
            id: Some(id),
            name: "Tackle box".to_string(),
            category: None,
            timestamp: Utc::now(),
            is_equipped: false,
        })
        .unwrap();
    source.commit().unwrap();

    let registry = builtin_registry(Arc::new(Settings::in_memory())).unwrap();
    registry.apply_pending(&source, &dest).unwrap();

    let migrated = dest.fetch::<Equipment>(&id).unwrap().unwrap();
    assert_eq!(migrated.name, "Tackle box");
    assert_eq!(registry.last_applied_version().unwrap(), 1);
}

#[test]
fn v1_keeps_all_fields_from_a_current_source() {
    let source = Store::in_memory(&current(), SyncMode::Local).unwrap();
    let dest = Store::in_memory(&current(), SyncMode::Cloud).unwrap();
    let mut item = Equipment::new("Waders").with_category("Apparel");
    item.quantity = 2;
    item.notes = Some("patched left boot".to_string());
    source.insert(&item).unwrap();
    source.commit().unwrap();

    copy_equipment(&source, &dest).unwrap();

    assert_eq!(dest.fetch::<Equipment>(&item.id).unwrap(), Some(item));
}

#[test]
fn carry_adds_only_missing_records() {
    let source = Store::in_memory(&current(), SyncMode::Cloud).unwrap();
    let dest = Store::in_memory(&current(), SyncMode::Local).unwrap();
    let shared = Equipment::new("Rod A");
    let added = Equipment::new("Reel B");
    for store in [&source, &dest] {
        store.insert(&shared).unwrap();
        store.commit().unwrap();
    }
    source.insert(&added).unwrap();
    source.commit().unwrap();

    assert_eq!(carry_current_records(&source, &dest).unwrap(), 1);
    assert_eq!(dest.count::<Equipment>().unwrap(), 2);
    assert_eq!(dest.fetch::<Equipment>(&added.id).unwrap(), Some(added));
}
