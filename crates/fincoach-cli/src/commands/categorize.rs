//! Categorization command implementations (categorize, batch, suggest)

use std::path::Path;

use anyhow::{Context, Result};
use fincoach_core::categorize::{BatchItem, CategoryTable};

use super::{print_json, truncate, RULE};

fn load_table(path: Option<&Path>) -> Result<CategoryTable> {
    CategoryTable::load(path).context("Failed to load category table")
}

pub fn cmd_categorize(categories: Option<&Path>, description: &str, json: bool) -> Result<()> {
    let table = load_table(categories)?;
    let result = table.categorize(description);

    if json {
        return print_json(&result);
    }

    println!("🏷️  {} → {}", truncate(description, 40), result.category);
    match &result.matched_keyword {
        Some(keyword) => println!(
            "   matched \"{}\" (confidence {:.2})",
            keyword, result.confidence
        ),
        None => println!("   no keyword matched"),
    }
    Ok(())
}

pub fn cmd_categorize_batch(categories: Option<&Path>, batch: &Path, json: bool) -> Result<()> {
    let table = load_table(categories)?;
    let content = std::fs::read_to_string(batch)
        .with_context(|| format!("Failed to read {}", batch.display()))?;
    let items: Vec<BatchItem> =
        serde_json::from_str(&content).context("Batch file must be a JSON array of items")?;

    let results = table.batch_categorize(&items);
    if json {
        return print_json(&results);
    }

    println!();
    println!("🏷️  Categorized {} transactions", results.len());
    println!("{}", RULE);
    for (item, result) in items.iter().zip(&results) {
        println!(
            "   #{:<6} {:<40} {}",
            item.transaction_id,
            truncate(&item.description, 40),
            result.result.category
        );
    }
    println!();
    Ok(())
}

pub fn cmd_suggest(categories: Option<&Path>, description: &str, json: bool) -> Result<()> {
    let table = load_table(categories)?;
    let suggestions = table.suggestions(description);

    if json {
        return print_json(&suggestions);
    }

    if suggestions.is_empty() {
        println!("No category suggestions for \"{}\"", truncate(description, 40));
        return Ok(());
    }

    println!("💡 Suggestions for \"{}\"", truncate(description, 40));
    for (rank, s) in suggestions.iter().enumerate() {
        println!(
            "   {}. {:<16} {:.2}  ({})",
            rank + 1,
            s.category,
            s.confidence,
            s.matched_keywords.join(", ")
        );
    }
    Ok(())
}
