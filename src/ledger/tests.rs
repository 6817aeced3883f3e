#![allow(clippy::unwrap_used)]

use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::models::{
    BudgetHistoryRecord, CategoryAmounts, ChangeType, ExpenseRecord, Group, HistoryUpdate,
};

fn month(s: &str) -> Month {
    Month::parse(s).unwrap()
}

fn at(day: u32, hour: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap()
}

fn budget(pairs: &[(Category, Decimal)]) -> BudgetSet {
    let mut set = BudgetSet::default();
    for (c, amount) in pairs {
        set.set_category(*c, *amount);
    }
    set
}

fn expense(id: i64, date: &str, pairs: &[(Category, Decimal)]) -> ExpenseRecord {
    let mut amounts = CategoryAmounts::default();
    for (c, amount) in pairs {
        amounts.set(*c, *amount);
    }
    ExpenseRecord {
        id,
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        total: amounts.sum(),
        amounts,
        note: None,
    }
}

fn assert_totals_consistent(set: &BudgetSet) {
    assert_eq!(set.necessary.total, set.categories.group_sum(Group::Necessary));
    assert_eq!(
        set.discretionary.total,
        set.categories.group_sum(Group::Discretionary)
    );
    assert_eq!(set.total, set.necessary.total + set.discretionary.total);
}

// ── Resolution ────────────────────────────────────────────────

#[test]
fn test_resolve_exact_month() {
    let mut table = BudgetTable::default();
    table
        .monthly
        .insert(month("2026-01"), budget(&[(Category::Food, dec!(800))]));
    assert_eq!(
        resolve_amount(&table, month("2026-01"), Category::Food),
        dec!(800)
    );
}

#[test]
fn test_resolve_without_monthly_entries_returns_default() {
    let mut table = BudgetTable::default();
    table.default = budget(&[(Category::Food, dec!(1000)), (Category::Travel, dec!(300))]);
    assert_eq!(resolve(&table, month("2030-07")), table.default);
}

#[test]
fn test_resolve_closest_month() {
    let mut table = BudgetTable::default();
    table
        .monthly
        .insert(month("2025-01"), budget(&[(Category::Food, dec!(100))]));
    table
        .monthly
        .insert(month("2025-10"), budget(&[(Category::Food, dec!(900))]));
    assert_eq!(
        resolve_amount(&table, month("2025-08"), Category::Food),
        dec!(900)
    );
    assert_eq!(
        resolve_amount(&table, month("2025-03"), Category::Food),
        dec!(100)
    );
}

#[test]
fn test_resolve_tie_prefers_earlier_month() {
    let mut table = BudgetTable::default();
    table
        .monthly
        .insert(month("2025-02"), budget(&[(Category::Pets, dec!(20))]));
    table
        .monthly
        .insert(month("2025-06"), budget(&[(Category::Pets, dec!(60))]));
    assert_eq!(
        resolve_amount(&table, month("2025-04"), Category::Pets),
        dec!(20)
    );
}

#[test]
fn test_resolve_missing_category_is_zero() {
    let table = BudgetTable::default();
    assert_eq!(
        resolve_amount(&table, month("2025-04"), Category::Clothing),
        Decimal::ZERO
    );
}

#[test]
fn test_resolve_recomputes_missing_totals() {
    let table: BudgetTable = serde_json::from_str(
        r#"{"default":{"categories":{"food":50}},
            "monthly":{"2026-01":{"categories":{"food":300,"travel":100},"total":0}}}"#,
    )
    .unwrap();

    let set = resolve(&table, month("2026-01"));
    assert_eq!(set.total, dec!(400));
    assert_totals_consistent(&set);

    let defaults_only = BudgetTable {
        monthly: Default::default(),
        ..table
    };
    let set = resolve(&defaults_only, month("2026-01"));
    assert_eq!(set.total, dec!(50));
    assert_totals_consistent(&set);
}

// ── Amount parsing ────────────────────────────────────────────

#[test]
fn test_parse_amount() {
    assert_eq!(parse_amount("1500").unwrap(), dec!(1500));
    assert_eq!(parse_amount(" 12.50 ").unwrap(), dec!(12.50));
    assert_eq!(parse_amount("0").unwrap(), Decimal::ZERO);
    assert!(matches!(parse_amount("abc"), Err(Error::InvalidAmount(_))));
    assert!(matches!(parse_amount("-1"), Err(Error::InvalidAmount(_))));
    assert!(matches!(parse_amount(""), Err(Error::InvalidAmount(_))));
}

// ── Set ───────────────────────────────────────────────────────

#[test]
fn test_set_current_month_changes_default() {
    let mut table = BudgetTable::default();
    let mut history = Vec::new();
    let rec = apply_set(
        &mut table,
        &mut history,
        month("2026-03"),
        Category::Food,
        dec!(1200),
        month("2026-03"),
        at(1, 9),
    )
    .unwrap();

    assert_eq!(rec.change_type, ChangeType::DefaultBudgetChange);
    assert_eq!(rec.old_amount, Decimal::ZERO);
    assert_eq!(table.default.categories.food, dec!(1200));
    assert!(table.monthly.is_empty());
    assert_eq!(history.len(), 1);
    assert_totals_consistent(&table.default);
}

#[test]
fn test_set_past_month_creates_monthly_entry_from_nearest_prior() {
    let mut table = BudgetTable::default();
    table.default = budget(&[(Category::Food, dec!(500))]);
    table.monthly.insert(
        month("2025-09"),
        budget(&[(Category::Food, dec!(700)), (Category::Pets, dec!(40))]),
    );
    let mut history = Vec::new();

    let rec = apply_set(
        &mut table,
        &mut history,
        month("2025-12"),
        Category::Pets,
        dec!(90),
        month("2026-03"),
        at(1, 9),
    )
    .unwrap();

    assert_eq!(rec.change_type, ChangeType::HistoricalBudgetChange);
    assert_eq!(rec.old_amount, dec!(40));
    let entry = &table.monthly[&month("2025-12")];
    assert_eq!(entry.categories.food, dec!(700));
    assert_eq!(entry.categories.pets, dec!(90));
    assert_totals_consistent(entry);
    // Default untouched
    assert_eq!(table.default.categories.pets, Decimal::ZERO);
}

#[test]
fn test_set_then_resolve_round_trips_for_every_category() {
    let current = month("2026-03");
    for (i, category) in Category::all().iter().enumerate() {
        for m in ["2025-11", "2026-03", "2026-08"] {
            let mut table = BudgetTable::default();
            let mut history = Vec::new();
            let amount = Decimal::from(100 * (i as i64 + 1));
            apply_set(
                &mut table,
                &mut history,
                month(m),
                *category,
                amount,
                current,
                at(1, 9),
            )
            .unwrap();
            assert_eq!(resolve_amount(&table, month(m), *category), amount);
            assert_totals_consistent(&resolve(&table, month(m)));
        }
    }
}

#[test]
fn test_set_rejects_negative_amount_without_mutation() {
    let mut table = BudgetTable::default();
    let mut history = Vec::new();
    let err = apply_set(
        &mut table,
        &mut history,
        month("2026-03"),
        Category::Food,
        dec!(-5),
        month("2026-03"),
        at(1, 9),
    )
    .unwrap_err();
    assert!(matches!(err, Error::InvalidAmount(_)));
    assert_eq!(table, BudgetTable::default());
    assert!(history.is_empty());
}

// ── Rollover ──────────────────────────────────────────────────

#[test]
fn test_roll_epoch_first_month_has_no_rollover() {
    let mut table = BudgetTable::default();
    table.default = budget(&[(Category::Food, dec!(1000))]);
    let expenses = vec![expense(1, "2025-11-30", &[(Category::Food, dec!(5000))])];

    let roll = calculate_roll(&table, &expenses, month("2025-12"), month("2025-12"));
    assert_eq!(roll.carried_forward, GroupFigures::default());
    assert_eq!(roll.deficit, GroupFigures::default());
    assert_eq!(roll.available_budget, roll.current_budget);
    assert_eq!(roll.current_budget.necessary, dec!(1000));
}

#[test]
fn test_roll_overspend_becomes_deficit() {
    let mut table = BudgetTable::default();
    table.default = budget(&[(Category::Food, dec!(1000))]);
    let expenses = vec![
        expense(1, "2026-01-10", &[(Category::Food, dec!(700))]),
        expense(2, "2026-01-31", &[(Category::Food, dec!(500))]),
    ];

    let roll = calculate_roll(&table, &expenses, month("2026-02"), month("2025-12"));
    assert_eq!(roll.deficit.necessary, dec!(200));
    assert_eq!(roll.carried_forward.necessary, Decimal::ZERO);
    assert_eq!(roll.current_budget.necessary, dec!(1000));
    assert_eq!(roll.available_budget.necessary, dec!(800));
}

#[test]
fn test_roll_underspend_carries_forward() {
    let mut table = BudgetTable::default();
    table.default = budget(&[(Category::Food, dec!(1200)), (Category::Travel, dec!(800))]);
    let expenses = vec![expense(
        1,
        "2026-01-15",
        &[(Category::Food, dec!(1000)), (Category::Travel, dec!(500))],
    )];

    let roll = calculate_roll(&table, &expenses, month("2026-02"), month("2025-12"));
    assert_eq!(roll.carried_forward.total, dec!(500));
    assert_eq!(roll.current_budget.total, dec!(2000));
    assert_eq!(roll.available_budget.total, dec!(2500));
}

#[test]
fn test_roll_only_looks_back_one_month() {
    let mut table = BudgetTable::default();
    table.default = budget(&[(Category::Food, dec!(1000))]);
    // Heavy overspend two months back must not reach March.
    let expenses = vec![
        expense(1, "2026-01-10", &[(Category::Food, dec!(9000))]),
        expense(2, "2026-02-10", &[(Category::Food, dec!(1000))]),
    ];

    let roll = calculate_roll(&table, &expenses, month("2026-03"), month("2025-12"));
    assert_eq!(roll.deficit.total, Decimal::ZERO);
    assert_eq!(roll.carried_forward.total, Decimal::ZERO);
    assert_eq!(roll.available_budget.total, dec!(1000));
}

#[test]
fn test_roll_available_never_negative() {
    let mut table = BudgetTable::default();
    table.default = budget(&[(Category::Pets, dec!(100))]);
    let expenses = vec![expense(1, "2026-01-10", &[(Category::Pets, dec!(900))])];

    let roll = calculate_roll(&table, &expenses, month("2026-02"), month("2025-12"));
    assert_eq!(roll.deficit.discretionary, dec!(800));
    assert_eq!(roll.available_budget.discretionary, Decimal::ZERO);
}

// ── Stats ─────────────────────────────────────────────────────

#[test]
fn test_stats_per_category_and_totals() {
    let mut table = BudgetTable::default();
    table.default = budget(&[
        (Category::Food, dec!(1000)),
        (Category::Transport, dec!(200)),
        (Category::Entertainment, dec!(300)),
    ]);
    let expenses = vec![
        expense(
            1,
            "2026-02-05",
            &[(Category::Food, dec!(400)), (Category::Entertainment, dec!(350))],
        ),
        expense(2, "2026-02-20", &[(Category::Transport, dec!(50))]),
        // Other month ignored
        expense(3, "2026-03-01", &[(Category::Food, dec!(999))]),
    ];

    let stats = get_stats(&table, &expenses, month("2026-02"), month("2025-12"));
    let food = stats.categories[&Category::Food];
    assert_eq!(food.budget, dec!(1000));
    assert_eq!(food.actual, dec!(400));
    assert_eq!(food.remaining, dec!(600));
    assert_eq!(stats.categories[&Category::Entertainment].remaining, dec!(-50));
    assert_eq!(stats.categories.len(), 10);

    assert_eq!(stats.necessary.actual, dec!(450));
    assert_eq!(stats.discretionary.actual, dec!(350));
    assert_eq!(stats.total.budget, dec!(1500));
    assert_eq!(stats.total.actual, dec!(800));
    assert_eq!(stats.total.remaining, dec!(700));
    // January had no spending, so all of January's budget carries forward.
    assert_eq!(stats.available_budget.total, dec!(3000));
}

// ── History edit / delete ─────────────────────────────────────

fn seeded_history() -> (BudgetTable, Vec<BudgetHistoryRecord>) {
    let mut table = BudgetTable::default();
    let mut history = Vec::new();
    let current = month("2026-03");
    apply_set(&mut table, &mut history, month("2025-12"), Category::Food, dec!(600), current, at(1, 8)).unwrap();
    apply_set(&mut table, &mut history, month("2025-12"), Category::Food, dec!(650), current, at(1, 9)).unwrap();
    apply_set(&mut table, &mut history, month("2026-03"), Category::Travel, dec!(400), current, at(1, 10)).unwrap();
    (table, history)
}

#[test]
fn test_edit_reapplies_amount() {
    let (mut table, mut history) = seeded_history();
    let id = history[2].id;
    let update = HistoryUpdate {
        new_amount: Some(dec!(450)),
        ..Default::default()
    };
    let edited = apply_edit(&mut table, &mut history, id, &update, at(2, 9)).unwrap();

    assert_eq!(edited.new_amount, dec!(450));
    assert_eq!(edited.updated_at, Some(at(2, 9)));
    assert_eq!(table.default.categories.travel, dec!(450));
    assert_totals_consistent(&table.default);
}

#[test]
fn test_edit_historical_record() {
    let (mut table, mut history) = seeded_history();
    let id = history[0].id;
    let update = HistoryUpdate {
        new_amount: Some(dec!(610)),
        ..Default::default()
    };
    apply_edit(&mut table, &mut history, id, &update, at(2, 9)).unwrap();
    let entry = &table.monthly[&month("2025-12")];
    assert_eq!(entry.categories.food, dec!(610));
    assert_totals_consistent(entry);
}

#[test]
fn test_edit_unknown_id_is_not_found() {
    let (mut table, mut history) = seeded_history();
    let err = apply_edit(&mut table, &mut history, 42, &HistoryUpdate::default(), at(2, 9))
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn test_delete_restores_newest_remaining() {
    let (mut table, mut history) = seeded_history();
    let newest_food = history[1].id;
    let deleted = apply_delete(&mut table, &mut history, newest_food).unwrap();

    assert_eq!(deleted.new_amount, dec!(650));
    assert_eq!(history.len(), 2);
    let entry = &table.monthly[&month("2025-12")];
    assert_eq!(entry.categories.food, dec!(600));
    assert_totals_consistent(entry);
}

#[test]
fn test_delete_only_record_resets_to_nearest_prior() {
    let mut table = BudgetTable::default();
    table
        .monthly
        .insert(month("2025-10"), budget(&[(Category::Gifts, dec!(120))]));
    let mut history = Vec::new();
    let rec = apply_set(
        &mut table,
        &mut history,
        month("2025-12"),
        Category::Gifts,
        dec!(300),
        month("2026-03"),
        at(1, 9),
    )
    .unwrap();

    apply_delete(&mut table, &mut history, rec.id).unwrap();
    assert_eq!(table.monthly[&month("2025-12")].categories.gifts, dec!(120));
}

#[test]
fn test_delete_only_record_without_prior_resets_to_zero() {
    let mut table = BudgetTable::default();
    let mut history = Vec::new();
    let rec = apply_set(
        &mut table,
        &mut history,
        month("2025-12"),
        Category::Gifts,
        dec!(300),
        month("2026-03"),
        at(1, 9),
    )
    .unwrap();

    apply_delete(&mut table, &mut history, rec.id).unwrap();
    let entry = &table.monthly[&month("2025-12")];
    assert_eq!(entry.categories.gifts, Decimal::ZERO);
    assert_totals_consistent(entry);
}

#[test]
fn test_delete_default_change_resets_to_zero() {
    let (mut table, mut history) = seeded_history();
    let id = history[2].id;
    apply_delete(&mut table, &mut history, id).unwrap();
    assert_eq!(table.default.categories.travel, Decimal::ZERO);
    assert_eq!(table.default.total, Decimal::ZERO);
}

#[test]
fn test_delete_unknown_id_is_not_found() {
    let (mut table, mut history) = seeded_history();
    assert!(matches!(
        apply_delete(&mut table, &mut history, 7),
        Err(Error::NotFound(_))
    ));
    assert_eq!(history.len(), 3);
}
