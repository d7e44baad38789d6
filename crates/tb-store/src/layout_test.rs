use super::*;

fn count(conn: &Connection, sql: &str) -> i64 {
    conn.query_row(sql, [], |row| row.get::<_, i64>(0)).unwrap()
}

#[test]
fn fresh_store_is_stamped() {
    let conn = Connection::open_in_memory().unwrap();
    let schema = tb_core::schema::current();
    ensure_layout(&conn, &schema, ":memory:").unwrap();

    let stamp = read_stamp(&conn).unwrap().unwrap();
    assert_eq!(stamp.schema_name, "tacklebox");
    assert_eq!(stamp.version, 2);
    assert_eq!(stamp.fingerprint, schema.fingerprint());
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM rec_equipment"), 0);
}

#[test]
fn reopening_with_same_schema_is_accepted() {
    let conn = Connection::open_in_memory().unwrap();
    let schema = tb_core::schema::current();
    ensure_layout(&conn, &schema, ":memory:").unwrap();
    ensure_layout(&conn, &schema, ":memory:").unwrap();
    assert_eq!(count(&conn, &format!("SELECT COUNT(*) FROM {STAMP_TABLE}")), 1);
}

#[test]
fn different_schema_is_rejected() {
    let conn = Connection::open_in_memory().unwrap();
    ensure_layout(&conn, &tb_core::schema::legacy(), "legacy.duckdb").unwrap();

    let err = ensure_layout(&conn, &tb_core::schema::current(), "legacy.duckdb").unwrap_err();
    match err {
        StoreOpenError::IncompatibleLayout {
            path,
            expected,
            found,
        } => {
            assert_eq!(path, "legacy.duckdb");
            assert_eq!(expected, "tacklebox v2");
            assert_eq!(found, "tacklebox v1");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn table_names_are_prefixed() {
    assert_eq!(table_name("equipment"), "rec_equipment");
}
