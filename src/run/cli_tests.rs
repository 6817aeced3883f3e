#![allow(clippy::unwrap_used)]

use super::*;
use crate::config::Config;
use rust_decimal_macros::dec;

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn offline_session(dir: &tempfile::TempDir) -> Session {
    let mut config = Config::from_lookup(|_| None).unwrap();
    config.data_dir = Some(dir.path().to_path_buf());
    config.offline = true;
    Session::open(&config).unwrap()
}

#[test]
fn test_flag_takes_following_value() {
    let a = args(&["add", "food=10", "--month", "2024-02", "--note", "lunch"]);
    assert_eq!(flag(&a, "--month"), Some("2024-02"));
    assert_eq!(flag(&a, "--note"), Some("lunch"));
    assert_eq!(flag(&a, "--missing"), None);
}

#[test]
fn test_positionals_skip_flag_values() {
    let a = args(&["food=10", "--month", "2024-02", "travel=5"]);
    assert_eq!(positionals(&a), vec!["food=10", "travel=5"]);
}

#[test]
fn test_expense_draft_from_pairs() {
    let a = args(&["food=12.50", "Travel=100", "--month", "2024-02"]);
    let draft = expense_draft(&a).unwrap();
    assert_eq!(draft.amounts.food, dec!(12.50));
    assert_eq!(draft.amounts.travel, dec!(100));
    assert_eq!(draft.month, Some(Month::parse("2024-02").unwrap()));
    assert!(draft.note.is_none());
}

#[test]
fn test_expense_draft_rejects_bad_input() {
    assert!(expense_draft(&args(&["--note", "x"])).is_err());
    assert!(expense_draft(&args(&["rent=10"])).is_err());
    assert!(expense_draft(&args(&["food=-1"])).is_err());
}

#[test]
fn test_shellexpand_leaves_plain_paths() {
    assert_eq!(shellexpand("/tmp/data.json"), "/tmp/data.json");
    assert!(!shellexpand("~/data.json").starts_with('~'));
}

#[test]
fn test_budget_set_and_roll_through_cli() {
    let dir = tempfile::tempdir().unwrap();
    let session = offline_session(&dir);

    as_cli(&args(&["pl", "budget", "set", "2026-01", "food", "500"]), &session).unwrap();
    as_cli(&args(&["pl", "budget", "roll", "2026-02"]), &session).unwrap();

    assert_eq!(
        session.budgets.resolve_amount("2026-01", Category::Food).unwrap(),
        dec!(500)
    );
}

#[test]
fn test_unknown_commands_fail() {
    let dir = tempfile::tempdir().unwrap();
    let session = offline_session(&dir);

    assert!(as_cli(&args(&["pl", "frobnicate"]), &session).is_err());
    assert!(as_cli(&args(&["pl", "budget", "frobnicate"]), &session).is_err());
    assert!(as_cli(&args(&["pl", "budget", "set", "2026-13", "food", "1"]), &session).is_err());
}

#[test]
fn test_export_then_import_file() {
    let dir = tempfile::tempdir().unwrap();
    let session = offline_session(&dir);
    let path = dir.path().join("backup.json");
    let path = path.to_str().unwrap();

    as_cli(&args(&["pl", "expenses", "add", "food=20", "--month", "2025-06"]), &session).unwrap();
    as_cli(&args(&["pl", "export", path]), &session).unwrap();
    as_cli(&args(&["pl", "expenses", "clear"]), &session).unwrap();
    assert!(session.expenses.records().unwrap().is_empty());

    as_cli(&args(&["pl", "import", path]), &session).unwrap();
    let records = session.expenses.records().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].amounts.food, dec!(20));
}

#[test]
fn test_import_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let session = offline_session(&dir);
    let path = dir.path().join("nope.json");

    assert!(as_cli(&args(&["pl", "import", path.to_str().unwrap()]), &session).is_err());
}

#[test]
fn test_expense_patch_names_only_given_fields() {
    let patch = expense_patch(&args(&["food=25", "--note", "groceries"])).unwrap();
    assert_eq!(patch.amounts.len(), 1);
    assert_eq!(patch.amounts.get(&Category::Food), Some(&dec!(25)));
    assert!(patch.month.is_none());
    assert_eq!(patch.note.as_deref(), Some("groceries"));

    assert!(expense_patch(&args(&[])).is_err());
}

#[test]
fn test_expense_update_through_cli_keeps_other_categories() {
    let dir = tempfile::tempdir().unwrap();
    let session = offline_session(&dir);

    as_cli(
        &args(&["pl", "expenses", "add", "food=10", "travel=40", "--month", "2025-06"]),
        &session,
    )
    .unwrap();
    let id = session.expenses.records().unwrap()[0].id;
    as_cli(&args(&["pl", "expenses", "update", &id.to_string(), "food=25"]), &session).unwrap();

    let record = &session.expenses.records().unwrap()[0];
    assert_eq!(record.amounts.food, dec!(25));
    assert_eq!(record.amounts.travel, dec!(40));
    assert_eq!(record.total, dec!(65));
}
