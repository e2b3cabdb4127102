//! Intake command implementations (CSV import, SMS parsing)

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use fincoach_core::{import, sms::SmsParser, validate, CategoryTable};
use tracing::info;

use super::{load_or_default, money, print_json, truncate};

pub fn cmd_import(
    data: &Path,
    file: &Path,
    categories: Option<&Path>,
    no_categorize: bool,
    now: NaiveDateTime,
) -> Result<()> {
    println!("📥 Importing {}...", file.display());

    let table = if no_categorize {
        None
    } else {
        Some(CategoryTable::load(categories).context("Failed to load category table")?)
    };

    let transactions = import::import_file(file, table.as_ref())
        .with_context(|| format!("Failed to parse {}", file.display()))?;
    for (row, tx) in transactions.iter().enumerate() {
        validate::validate_transaction_date(tx.occurred_at, now)
            .with_context(|| format!("Row {} of {}", row + 2, file.display()))?;
    }

    let mut snapshot = load_or_default(data)?;
    let added = import::merge_into(&mut snapshot, transactions)
        .with_context(|| format!("Failed to merge into {}", data.display()))?;
    snapshot
        .save(data)
        .with_context(|| format!("Failed to write {}", data.display()))?;

    info!(added, total = snapshot.transactions.len(), "Import complete");
    println!("✅ Imported {} transactions into {}", added, data.display());
    println!("   Snapshot now holds {} transactions", snapshot.transactions.len());

    Ok(())
}

pub fn cmd_parse_sms(
    data: &Path,
    text: &str,
    now: NaiveDateTime,
    save: bool,
    json: bool,
) -> Result<()> {
    let parser = SmsParser::new().context("Failed to compile SMS patterns")?;
    let Some(parsed) = parser.parse(text, now) else {
        anyhow::bail!("No amount found in SMS: {}", truncate(text, 60));
    };

    validate::validate_amount(parsed.transaction.amount).context("Rejected SMS amount")?;

    if json {
        print_json(&parsed)?;
    } else {
        println!("📱 {} via {}", parsed.transaction.kind, parsed.bank);
        println!("   Amount:   {}", money(parsed.transaction.amount));
        println!("   Category: {}", parsed.transaction.category);
        println!("   Date:     {}", parsed.transaction.occurred_at.format("%Y-%m-%d %H:%M"));
    }

    if save {
        let mut snapshot = load_or_default(data)?;
        import::merge_into(&mut snapshot, vec![parsed.transaction])
            .with_context(|| format!("Failed to merge into {}", data.display()))?;
        snapshot
            .save(data)
            .with_context(|| format!("Failed to write {}", data.display()))?;
        if !json {
            println!("✅ Saved to {}", data.display());
        }
    }

    Ok(())
}
