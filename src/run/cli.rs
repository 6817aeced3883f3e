use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::path::Path;

use super::format::{format_amount, truncate, usage_bar};
use crate::ledger::{parse_amount, GroupFigures};
use crate::models::{
    AssetDraft, AssetRecord, Blog, BlogDraft, Category, ChangeType, ExpenseDraft, ExpensePatch,
    ExpenseRecord, Group, HistoryUpdate, Month, Note, NoteDraft, ReadingEntry, StockDraft,
    StockPatch,
};
use crate::session::Session;
use crate::storage::ReadingList;

pub(crate) fn as_cli(args: &[String], session: &Session) -> Result<()> {
    let Some(command) = args.get(1) else {
        print_usage();
        return Ok(());
    };
    let rest = &args[2..];
    match command.as_str() {
        "budget" | "b" => cli_budget(rest, session),
        "expenses" | "e" => cli_expenses(rest, session),
        "assets" => cli_assets(rest, session),
        "stocks" => cli_stocks(rest, session),
        "blogs" => cli_reading(
            rest,
            &session.blogs,
            |args| {
                Ok(BlogDraft {
                    title: required(args, 0, "title")?.to_string(),
                    url: flag(args, "--url").unwrap_or_default().to_string(),
                    kind: flag(args, "--type").unwrap_or("blog").to_string(),
                    author: flag(args, "--author").unwrap_or_default().to_string(),
                })
            },
            |blog: &Blog| format!("{:<8} {}", blog.kind, blog.author),
        ),
        "notes" => cli_reading(
            rest,
            &session.notes,
            |args| {
                Ok(NoteDraft {
                    title: required(args, 0, "title")?.to_string(),
                    content: flag(args, "--content").unwrap_or_default().to_string(),
                    tags: flag(args, "--tags")
                        .map(|t| {
                            t.split(',')
                                .map(|s| s.trim().to_string())
                                .filter(|s| !s.is_empty())
                                .collect::<Vec<_>>()
                        })
                        .unwrap_or_default(),
                    kind: flag(args, "--type").unwrap_or("thought").to_string(),
                })
            },
            |note: &Note| format!("{:<8} {}", note.kind, note.tags.join(",")),
        ),
        "export" => cli_export(rest, session),
        "import" => cli_import(rest, session),
        "status" => cli_status(session),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("pocketledger {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("pocketledger - offline-first personal finance ledger");
    println!();
    println!("Usage: pocketledger <command> [args]");
    println!();
    println!("Budget:");
    println!("  budget show [YYYY-MM] [category]      Effective budget for a month");
    println!("  budget set <YYYY-MM> <category> <amt> Set one category (past months only change that month)");
    println!("  budget roll [YYYY-MM]                 Carry-forward, deficit and available budget");
    println!("  budget stats [YYYY-MM]                Budget against actual spending");
    println!("  budget history [YYYY-MM]              Budget change log");
    println!("  budget edit <id> [--amount N] [--old N] [--month M] [--category C]");
    println!("  budget delete <id>                    Delete a change and restore the prior amount");
    println!("  budget clear                          Remove all budgets and history");
    println!();
    println!("Expenses:");
    println!("  expenses list | latest | years | clear");
    println!("  expenses add <category>=<amt>... [--month YYYY-MM] [--note text]");
    println!("  expenses update <id> [<category>=<amt>...] [--month YYYY-MM] [--note text]");
    println!("  expenses delete <id>");
    println!();
    println!("Assets and stocks:");
    println!("  assets list | latest | clear | delete <id>");
    println!("  assets add <live> <invest> <bond> [--note text]");
    println!("  assets export [path] | import <path>");
    println!("  stocks list | clear | delete <id>");
    println!("  stocks add <code> <name> <buy> <sell> <shares> <price>");
    println!("  stocks update <id> [--price N] [--buy N] [--sell N] [--shares N] [--name S] [--code S]");
    println!("  stocks export [path] | import <path>");
    println!();
    println!("Reading lists:");
    println!("  blogs|notes list | recommend | stats | clear | delete <id> | read <id>");
    println!("  blogs add <title> [--url U] [--type blog|podcast|movie|book] [--author A]");
    println!("  notes add <title> [--content C] [--tags a,b] [--type T]");
    println!();
    println!("Data:");
    println!("  export [path]                         Write budgets, history, expenses and assets");
    println!("  import <path>                         Replace them from an export file");
    println!("  status                                Backup reminders and stored keys");
    println!("  --help, -h                            Show this help");
    println!("  --version, -V                         Show version");
    println!();
    println!("Environment: POCKETLEDGER_API_URL, POCKETLEDGER_DATA_DIR, POCKETLEDGER_OFFLINE,");
    println!("             POCKETLEDGER_TIMEOUT_MS, POCKETLEDGER_EPOCH, RUST_LOG");
}

// ── Argument helpers ─────────────────────────────────────────

fn flag<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == name)
        .map(|w| w[1].as_str())
}

/// Arguments that are neither `--flags` nor their values.
fn positionals(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut skip_value = false;
    for arg in args {
        if skip_value {
            skip_value = false;
        } else if arg.starts_with("--") {
            skip_value = true;
        } else {
            out.push(arg.as_str());
        }
    }
    out
}

fn required<'a>(args: &'a [String], index: usize, name: &str) -> Result<&'a str> {
    positionals(args)
        .get(index)
        .copied()
        .ok_or_else(|| anyhow::anyhow!("Missing <{name}>"))
}

fn optional_amount(args: &[String], name: &str) -> Result<Option<Decimal>> {
    flag(args, name)
        .map(|raw| parse_amount(raw).map_err(anyhow::Error::from))
        .transpose()
}

fn current_month() -> String {
    chrono::Local::now().format("%Y-%m").to_string()
}

fn month_arg(args: &[String]) -> String {
    positionals(args)
        .first()
        .map(|m| m.to_string())
        .unwrap_or_else(current_month)
}

fn parse_id(raw: &str) -> Result<i64> {
    raw.parse()
        .with_context(|| format!("Invalid id '{raw}', expected a number"))
}

fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

fn output_path(args: &[String], prefix: &str) -> String {
    positionals(args)
        .first()
        .map(|p| shellexpand(p))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            let today = chrono::Local::now().format("%Y-%m-%d");
            format!("{home}/{prefix}{today}.json")
        })
}

fn read_input(args: &[String]) -> Result<String> {
    let path = shellexpand(required(args, 0, "path")?);
    std::fs::read_to_string(&path).with_context(|| format!("Failed to read {path}"))
}

// ── Budget ───────────────────────────────────────────────────

fn cli_budget(args: &[String], session: &Session) -> Result<()> {
    let sub = args.first().map(String::as_str).unwrap_or("show");
    let rest = args.get(1..).unwrap_or_default();
    let budgets = &session.budgets;

    match sub {
        "show" => {
            let month = month_arg(rest);
            if let Some(category) = positionals(rest).get(1) {
                let category = Category::parse(category)?;
                let amount = budgets.resolve_amount(&month, category)?;
                println!("{category} {month}: {}", format_amount(amount));
                return Ok(());
            }
            let set = budgets.resolve(&month)?;
            println!("Budget - {month}");
            println!("{}", "─".repeat(40));
            for group in Group::all() {
                println!("  {:<22} {:>14}", group.as_str(), format_amount(set.group_total(*group)));
                for category in group.members() {
                    println!(
                        "    {:<20} {:>14}",
                        category.as_str(),
                        format_amount(set.categories.get(*category))
                    );
                }
            }
            println!("  {:<22} {:>14}", "total", format_amount(set.total));
            Ok(())
        }
        "set" => {
            let month = required(rest, 0, "YYYY-MM")?;
            let category = Category::parse(required(rest, 1, "category")?)?;
            let amount = parse_amount(required(rest, 2, "amount")?)?;
            budgets.set_budget(month, category, amount)?;
            println!("Set {category} for {month} to {}", format_amount(amount));
            Ok(())
        }
        "roll" => {
            let month = month_arg(rest);
            let roll = budgets.calculate_roll(&month)?;
            println!("Rollover - {month}");
            println!(
                "{:<15} {:>14} {:>14} {:>14} {:>14}",
                "", "carried", "deficit", "budget", "available"
            );
            println!("{}", "─".repeat(75));
            let rows: [(&str, fn(&GroupFigures) -> Decimal); 3] = [
                ("necessary", |g| g.necessary),
                ("discretionary", |g| g.discretionary),
                ("total", |g| g.total),
            ];
            for (name, pick) in rows {
                println!(
                    "{:<15} {:>14} {:>14} {:>14} {:>14}",
                    name,
                    format_amount(pick(&roll.carried_forward)),
                    format_amount(pick(&roll.deficit)),
                    format_amount(pick(&roll.current_budget)),
                    format_amount(pick(&roll.available_budget)),
                );
            }
            Ok(())
        }
        "stats" => {
            let month = month_arg(rest);
            let stats = budgets.get_stats(&month)?;
            println!("Budget vs actual - {month}");
            println!("{}", "─".repeat(76));
            for (category, line) in &stats.categories {
                let marker = if line.remaining < Decimal::ZERO { " !" } else { "" };
                println!(
                    "  {:<18} {:>12} {:>12} {:>12}  {}{marker}",
                    category.as_str(),
                    format_amount(line.budget),
                    format_amount(line.actual),
                    format_amount(line.remaining),
                    usage_bar(line.actual, line.budget, 12),
                );
            }
            println!("{}", "─".repeat(76));
            for (name, line) in [
                ("necessary", stats.necessary),
                ("discretionary", stats.discretionary),
                ("total", stats.total),
            ] {
                println!(
                    "  {:<18} {:>12} {:>12} {:>12}",
                    name,
                    format_amount(line.budget),
                    format_amount(line.actual),
                    format_amount(line.remaining),
                );
            }
            println!();
            for group in Group::all() {
                println!(
                    "  available {:<14} {:>12}",
                    group.as_str(),
                    format_amount(stats.available_budget.get(*group))
                );
            }
            println!(
                "  available {:<14} {:>12}",
                "total",
                format_amount(stats.available_budget.total)
            );
            Ok(())
        }
        "history" => {
            let history = match positionals(rest).first() {
                Some(month) => budgets.history_by_month(month)?,
                None => budgets.history()?,
            };
            if history.is_empty() {
                println!("No budget changes");
                return Ok(());
            }
            println!(
                "{:<14} {:<8} {:<18} {:>12} {:>12}  {:<9} When",
                "ID", "Month", "Category", "Old", "New", "Scope"
            );
            println!("{}", "─".repeat(96));
            for record in &history {
                let scope = match record.change_type {
                    ChangeType::DefaultBudgetChange => "default",
                    ChangeType::HistoricalBudgetChange => "month",
                };
                println!(
                    "{:<14} {:<8} {:<18} {:>12} {:>12}  {:<9} {}",
                    record.id,
                    record.month,
                    record.category.as_str(),
                    format_amount(record.old_amount),
                    format_amount(record.new_amount),
                    scope,
                    record.timestamp.format("%Y-%m-%d %H:%M"),
                );
            }
            Ok(())
        }
        "edit" => {
            let id = parse_id(required(rest, 0, "id")?)?;
            let update = HistoryUpdate {
                month: flag(rest, "--month").map(Month::parse).transpose()?,
                category: flag(rest, "--category").map(Category::parse).transpose()?,
                old_amount: optional_amount(rest, "--old")?,
                new_amount: optional_amount(rest, "--amount")?,
            };
            if update.is_empty() {
                anyhow::bail!("Nothing to change. Use --amount, --old, --month or --category");
            }
            let record = budgets.update_history_record(id, &update)?;
            println!(
                "Updated {}: {} {} -> {}",
                record.id,
                record.month,
                record.category,
                format_amount(record.new_amount)
            );
            Ok(())
        }
        "delete" => {
            let id = parse_id(required(rest, 0, "id")?)?;
            let record = budgets.delete_history_record(id)?;
            println!("Deleted change {} ({} {})", record.id, record.month, record.category);
            Ok(())
        }
        "clear" => {
            budgets.clear_all()?;
            println!("Cleared all budgets and history");
            Ok(())
        }
        other => anyhow::bail!("Unknown budget command: {other}"),
    }
}

// ── Expenses ─────────────────────────────────────────────────

/// `<category>=<amount>` positionals, in order.
fn amount_pairs(args: &[String]) -> Result<Vec<(Category, Decimal)>> {
    positionals(args)
        .into_iter()
        .filter(|a| a.contains('='))
        .map(|pair| -> Result<(Category, Decimal)> {
            let (category, amount) = pair
                .split_once('=')
                .ok_or_else(|| anyhow::anyhow!("Expected <category>=<amount>, got '{pair}'"))?;
            Ok((Category::parse(category)?, parse_amount(amount)?))
        })
        .collect()
}

fn expense_draft(args: &[String]) -> Result<ExpenseDraft> {
    let pairs = amount_pairs(args)?;
    if pairs.is_empty() {
        anyhow::bail!("Give at least one <category>=<amount>");
    }
    let mut draft = ExpenseDraft {
        month: flag(args, "--month").map(Month::parse).transpose()?,
        note: flag(args, "--note").map(str::to_string),
        ..Default::default()
    };
    for (category, amount) in pairs {
        draft.amounts.set(category, amount);
    }
    Ok(draft)
}

fn expense_patch(args: &[String]) -> Result<ExpensePatch> {
    let patch = ExpensePatch {
        month: flag(args, "--month").map(Month::parse).transpose()?,
        amounts: amount_pairs(args)?.into_iter().collect(),
        total: None,
        note: flag(args, "--note").map(str::to_string),
    };
    if patch.is_empty() {
        anyhow::bail!("Nothing to change. Give <category>=<amount>, --month or --note");
    }
    Ok(patch)
}

fn print_expenses(records: &[ExpenseRecord]) {
    if records.is_empty() {
        println!("No expense records");
        return;
    }
    println!("{:<14} {:<10} {:>12}  Breakdown", "ID", "Date", "Total");
    println!("{}", "─".repeat(70));
    for record in records {
        let breakdown: Vec<String> = record
            .amounts
            .iter()
            .filter(|(_, amount)| !amount.is_zero())
            .map(|(category, amount)| format!("{category}={}", format_amount(amount)))
            .collect();
        println!(
            "{:<14} {:<10} {:>12}  {}",
            record.id,
            record.date,
            format_amount(record.total),
            truncate(&breakdown.join(" "), 60)
        );
    }
}

fn cli_expenses(args: &[String], session: &Session) -> Result<()> {
    let sub = args.first().map(String::as_str).unwrap_or("list");
    let rest = args.get(1..).unwrap_or_default();
    let expenses = &session.expenses;

    match sub {
        "list" => {
            print_expenses(&expenses.records()?);
            Ok(())
        }
        "add" => {
            let records = expenses.add(&expense_draft(rest)?)?;
            println!("Added expense ({} records)", records.len());
            Ok(())
        }
        "update" => {
            let id = parse_id(required(rest, 0, "id")?)?;
            expenses.update(id, &expense_patch(&rest[1..])?)?;
            println!("Updated expense {id}");
            Ok(())
        }
        "delete" => {
            let id = parse_id(required(rest, 0, "id")?)?;
            let records = expenses.delete(id)?;
            println!("Deleted expense {id} ({} left)", records.len());
            Ok(())
        }
        "latest" => {
            match expenses.latest()? {
                Some(record) => print_expenses(&[record]),
                None => println!("No expense records"),
            }
            Ok(())
        }
        "years" => {
            for (year, summary) in expenses.grouped_by_year()? {
                println!("{year}  {:>14}", format_amount(summary.total));
                for (month, total) in &summary.monthly {
                    println!("  {month}  {:>12}", format_amount(*total));
                }
            }
            Ok(())
        }
        "clear" => {
            expenses.clear()?;
            println!("Cleared all expense records");
            Ok(())
        }
        other => anyhow::bail!("Unknown expenses command: {other}"),
    }
}

// ── Assets ───────────────────────────────────────────────────

fn print_assets(records: &[AssetRecord]) {
    if records.is_empty() {
        println!("No asset records");
        return;
    }
    println!(
        "{:<14} {:<10} {:>14} {:>14} {:>14} {:>14}",
        "ID", "Date", "Live", "Invest", "Bond", "Total"
    );
    println!("{}", "─".repeat(85));
    for record in records {
        println!(
            "{:<14} {:<10} {:>14} {:>14} {:>14} {:>14}",
            record.id,
            record.date,
            format_amount(record.live_money),
            format_amount(record.invest_money),
            format_amount(record.bond_money),
            format_amount(record.total()),
        );
    }
}

fn cli_assets(args: &[String], session: &Session) -> Result<()> {
    let sub = args.first().map(String::as_str).unwrap_or("list");
    let rest = args.get(1..).unwrap_or_default();
    let assets = &session.assets;

    match sub {
        "list" => {
            print_assets(&assets.records()?);
            Ok(())
        }
        "add" => {
            let draft = AssetDraft {
                live_money: parse_amount(required(rest, 0, "live")?)?,
                invest_money: parse_amount(required(rest, 1, "invest")?)?,
                bond_money: parse_amount(required(rest, 2, "bond")?)?,
                total: None,
                note: flag(rest, "--note").map(str::to_string),
            };
            let records = assets.add(&draft)?;
            println!("Added asset snapshot ({} records)", records.len());
            Ok(())
        }
        "delete" => {
            let id = parse_id(required(rest, 0, "id")?)?;
            assets.delete(id)?;
            println!("Deleted asset record {id}");
            Ok(())
        }
        "latest" => {
            match assets.latest()? {
                Some(record) => print_assets(&[record]),
                None => println!("No asset records"),
            }
            Ok(())
        }
        "clear" => {
            assets.clear()?;
            println!("Cleared all asset records");
            Ok(())
        }
        "export" => {
            let path = output_path(rest, "assetRecords_");
            std::fs::write(&path, assets.export_json()?)
                .with_context(|| format!("Failed to write {path}"))?;
            println!("Exported asset records to {path}");
            Ok(())
        }
        "import" => {
            let records = assets.import_json(&read_input(rest)?)?;
            println!("Imported {} asset records", records.len());
            Ok(())
        }
        other => anyhow::bail!("Unknown assets command: {other}"),
    }
}

// ── Stocks ───────────────────────────────────────────────────

fn cli_stocks(args: &[String], session: &Session) -> Result<()> {
    let sub = args.first().map(String::as_str).unwrap_or("list");
    let rest = args.get(1..).unwrap_or_default();
    let stocks = &session.stocks;

    match sub {
        "list" => {
            let list = stocks.stocks()?;
            if list.is_empty() {
                println!("No stocks");
                return Ok(());
            }
            println!(
                "{:<8} {:<16} {:>10} {:>10} {:>10} {:>14}  {:<5} ID",
                "Code", "Name", "Price", "Buy", "Sell", "Value", "Zone"
            );
            println!("{}", "─".repeat(100));
            for stock in &list {
                let zone = if stock.in_buy_zone() {
                    "BUY"
                } else if stock.in_sell_zone() {
                    "SELL"
                } else {
                    ""
                };
                println!(
                    "{:<8} {:<16} {:>10} {:>10} {:>10} {:>14}  {:<5} {}",
                    stock.code,
                    truncate(&stock.name, 16),
                    format_amount(stock.current_price),
                    format_amount(stock.buy_point),
                    format_amount(stock.sell_point),
                    format_amount(stock.market_value()),
                    zone,
                    stock.id,
                );
            }
            Ok(())
        }
        "add" => {
            let draft = StockDraft {
                code: required(rest, 0, "code")?.to_string(),
                name: required(rest, 1, "name")?.to_string(),
                buy_point: parse_amount(required(rest, 2, "buy")?)?,
                sell_point: parse_amount(required(rest, 3, "sell")?)?,
                shares: parse_amount(required(rest, 4, "shares")?)?,
                current_price: parse_amount(required(rest, 5, "price")?)?,
                ..Default::default()
            };
            let list = stocks.add(draft)?;
            println!("Added stock ({} on watchlist)", list.len());
            Ok(())
        }
        "update" => {
            let id = required(rest, 0, "id")?;
            let patch = StockPatch {
                code: flag(rest, "--code").map(str::to_string),
                name: flag(rest, "--name").map(str::to_string),
                buy_point: optional_amount(rest, "--buy")?,
                sell_point: optional_amount(rest, "--sell")?,
                shares: optional_amount(rest, "--shares")?,
                current_price: optional_amount(rest, "--price")?,
            };
            stocks.update(id, &patch)?;
            println!("Updated stock {id}");
            Ok(())
        }
        "delete" => {
            let id = required(rest, 0, "id")?;
            stocks.delete(id)?;
            println!("Deleted stock {id}");
            Ok(())
        }
        "clear" => {
            stocks.clear()?;
            println!("Cleared the watchlist");
            Ok(())
        }
        "export" => {
            let path = output_path(rest, "blueChipStocks_");
            std::fs::write(&path, stocks.export_json()?)
                .with_context(|| format!("Failed to write {path}"))?;
            println!("Exported stocks to {path}");
            Ok(())
        }
        "import" => {
            let list = stocks.import_json(&read_input(rest)?)?;
            println!("Imported {} stocks", list.len());
            Ok(())
        }
        other => anyhow::bail!("Unknown stocks command: {other}"),
    }
}

// ── Reading lists ────────────────────────────────────────────

fn cli_reading<T: ReadingEntry>(
    args: &[String],
    list: &ReadingList<T>,
    draft: impl Fn(&[String]) -> Result<T::Draft>,
    describe: impl Fn(&T) -> String,
) -> Result<()> {
    let sub = args.first().map(String::as_str).unwrap_or("list");
    let rest = args.get(1..).unwrap_or_default();
    let name = list.kind().as_str();

    match sub {
        "list" => {
            let items = list.items()?;
            if items.is_empty() {
                println!("No {name}");
                return Ok(());
            }
            for item in &items {
                println!("{:<36}  {:<40} {}", item.id(), truncate(item.title(), 40), describe(item));
            }
            Ok(())
        }
        "add" => {
            let items = list.add(draft(rest)?)?;
            println!("Added to {name} ({} items)", items.len());
            Ok(())
        }
        "delete" => {
            let id = required(rest, 0, "id")?;
            list.delete(id)?;
            println!("Deleted {id}");
            Ok(())
        }
        "recommend" => {
            match list.recommend()? {
                Some(item) => println!("{}  {}  {}", item.title(), describe(&item), item.id()),
                None => println!("No {name} to recommend"),
            }
            Ok(())
        }
        "read" => {
            let id = required(rest, 0, "id")?;
            list.mark_read(id)?;
            println!("Marked {id} as read");
            Ok(())
        }
        "stats" => {
            let metadata = list.metadata()?;
            let items = list.items()?;
            println!("{:<40} {:>11} {:>6}  Last read", "Title", "Recommended", "Read");
            println!("{}", "─".repeat(80));
            for item in &items {
                let last_read = metadata
                    .reading_times
                    .get(item.id())
                    .and_then(|times| times.last())
                    .map(|t| t.format("%Y-%m-%d").to_string())
                    .unwrap_or_default();
                println!(
                    "{:<40} {:>11} {:>6}  {}",
                    truncate(item.title(), 40),
                    metadata.recommendation_counts.get(item.id()).copied().unwrap_or(0),
                    metadata.read_counts.get(item.id()).copied().unwrap_or(0),
                    last_read,
                );
            }
            Ok(())
        }
        "clear" => {
            list.clear()?;
            println!("Cleared {name}");
            Ok(())
        }
        other => anyhow::bail!("Unknown {name} command: {other}"),
    }
}

// ── Export / import ──────────────────────────────────────────

fn cli_export(args: &[String], session: &Session) -> Result<()> {
    let path = output_path(args, "personal-finance-data-");
    let document = session.transfer.export_to_file(Path::new(&path))?;
    println!(
        "Exported {} expense records and {} budget changes to {path}",
        document.data.expense_records.len(),
        document.data.budget_history.len()
    );
    Ok(())
}

fn cli_import(args: &[String], session: &Session) -> Result<()> {
    let path = shellexpand(required(args, 0, "path")?);
    if !Path::new(&path).exists() {
        anyhow::bail!("File not found: {path}");
    }
    let data = session.transfer.import_from_file(Path::new(&path))?;
    println!(
        "Imported {} expense records, {} budget changes, {} asset records",
        data.expense_records.len(),
        data.budget_history.len(),
        data.assets_data.len()
    );
    Ok(())
}

fn cli_status(session: &Session) -> Result<()> {
    let due = |flag: bool| if flag { "backup due" } else { "ok" };
    println!("Epoch:   {}", session.budgets.epoch());
    println!("Assets:  {}", due(session.assets.backup_due()?));
    println!("Stocks:  {}", due(session.stocks.backup_due()?));
    println!();
    println!("Stored keys:");
    for key in session.db.keys()? {
        println!("  {key}");
    }
    Ok(())
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
