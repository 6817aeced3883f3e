#![allow(clippy::unwrap_used)]

use super::*;

#[test]
fn test_get_missing_key() {
    let db = Database::open_in_memory().unwrap();
    assert_eq!(db.get("budget_settings").unwrap(), None);
}

#[test]
fn test_set_then_get() {
    let db = Database::open_in_memory().unwrap();
    db.set("expense_records", "[]").unwrap();
    assert_eq!(db.get("expense_records").unwrap().as_deref(), Some("[]"));
}

#[test]
fn test_set_replaces_whole_value() {
    let db = Database::open_in_memory().unwrap();
    db.set("k", r#"{"a":1}"#).unwrap();
    db.set("k", r#"{"b":2}"#).unwrap();
    assert_eq!(db.get("k").unwrap().as_deref(), Some(r#"{"b":2}"#));
    assert_eq!(db.keys().unwrap(), vec!["k".to_string()]);
}

#[test]
fn test_remove() {
    let db = Database::open_in_memory().unwrap();
    db.set("k", "1").unwrap();
    db.remove("k").unwrap();
    assert_eq!(db.get("k").unwrap(), None);
    // Removing again is a no-op
    db.remove("k").unwrap();
}

#[test]
fn test_keys_sorted() {
    let db = Database::open_in_memory().unwrap();
    db.set("reviewBlogs", "[]").unwrap();
    db.set("asset_records", "[]").unwrap();
    assert_eq!(
        db.keys().unwrap(),
        vec!["asset_records".to_string(), "reviewBlogs".to_string()]
    );
}

#[test]
fn test_reopen_keeps_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.db");
    {
        let db = Database::open(&path).unwrap();
        db.set("budget_history", "[]").unwrap();
    }
    let db = Database::open(&path).unwrap();
    assert_eq!(db.get("budget_history").unwrap().as_deref(), Some("[]"));
}

#[test]
fn test_schema_version_recorded() {
    let db = Database::open_in_memory().unwrap();
    let version: i32 = db
        .conn
        .query_row("SELECT version FROM schema_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, schema::CURRENT_VERSION);
}

#[test]
fn test_set_many_writes_every_entry() {
    let db = Database::open_in_memory().unwrap();
    db.set("budget_settings", "{}").unwrap();
    db.set_many(&[
        ("budget_settings", r#"{"default":{}}"#.to_string()),
        ("expense_records", "[]".to_string()),
    ])
    .unwrap();
    assert_eq!(
        db.get("budget_settings").unwrap().as_deref(),
        Some(r#"{"default":{}}"#)
    );
    assert_eq!(db.get("expense_records").unwrap().as_deref(), Some("[]"));
}

#[test]
fn test_set_many_rolls_back_on_failure() {
    let db = Database::open_in_memory().unwrap();
    db.conn
        .execute_batch(
            "CREATE TRIGGER reject_expenses BEFORE INSERT ON kv
             WHEN NEW.key = 'expense_records'
             BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
        )
        .unwrap();
    db.set("budget_settings", "{}").unwrap();

    let result = db.set_many(&[
        ("budget_settings", r#"{"default":{}}"#.to_string()),
        ("expense_records", "[]".to_string()),
    ]);
    assert!(result.is_err());
    assert_eq!(db.get("budget_settings").unwrap().as_deref(), Some("{}"));
    assert_eq!(db.get("expense_records").unwrap(), None);
}

#[test]
fn test_reopen_keeps_single_version_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.db");
    drop(Database::open(&path).unwrap());
    let db = Database::open(&path).unwrap();
    let rows: i64 = db
        .conn
        .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}
