//! Grouping of dated amounts
//!
//! Every function takes records by reference and returns a fresh mapping.
//! Keys come from each record's own timestamp, so an empty input always
//! yields an empty result.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDateTime};

use crate::models::{CategoryTotal, MonthlyBucket, Transaction, TransactionKind};

/// "YYYY-MM" key for a timestamp
pub fn month_key(at: NaiveDateTime) -> String {
    at.format("%Y-%m").to_string()
}

/// ISO week key, e.g. "2024-W09"
pub fn week_key(at: NaiveDateTime) -> String {
    let week = at.iso_week();
    format!("{}-W{:02}", week.year(), week.week())
}

pub fn group_by_category<'a, I>(records: I) -> HashMap<String, Vec<&'a Transaction>>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut groups: HashMap<String, Vec<&Transaction>> = HashMap::new();
    for tx in records {
        groups.entry(tx.category.clone()).or_default().push(tx);
    }
    groups
}

/// Sum of amounts per calendar month, ordered chronologically
pub fn group_by_month<'a, I>(records: I) -> BTreeMap<String, f64>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    group_by_key(records, |tx| month_key(tx.occurred_at))
}

/// Sum of amounts per calendar day ("YYYY-MM-DD")
pub fn group_by_day<'a, I>(records: I) -> BTreeMap<String, f64>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    group_by_key(records, |tx| tx.occurred_at.format("%Y-%m-%d").to_string())
}

pub fn group_by_week<'a, I>(records: I) -> BTreeMap<String, f64>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    group_by_key(records, |tx| week_key(tx.occurred_at))
}

fn group_by_key<'a, I, F>(records: I, key: F) -> BTreeMap<String, f64>
where
    I: IntoIterator<Item = &'a Transaction>,
    F: Fn(&Transaction) -> String,
{
    let mut totals = BTreeMap::new();
    for tx in records {
        *totals.entry(key(tx)).or_insert(0.0) += tx.amount;
    }
    totals
}

/// Per-category totals sorted by descending total.
///
/// Ties keep the order in which each category first appeared.
pub fn category_totals<'a, I>(records: I) -> Vec<CategoryTotal>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut totals: Vec<CategoryTotal> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for tx in records {
        match index.get(tx.category.as_str()) {
            Some(&i) => {
                totals[i].total += tx.amount;
                totals[i].count += 1;
            }
            None => {
                index.insert(tx.category.as_str(), totals.len());
                totals.push(CategoryTotal {
                    category: tx.category.clone(),
                    total: tx.amount,
                    count: 1,
                });
            }
        }
    }

    totals.sort_by(|a, b| {
        b.total
            .partial_cmp(&a.total)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    totals
}

pub fn total_by_kind<'a, I>(records: I, kind: TransactionKind) -> f64
where
    I: IntoIterator<Item = &'a Transaction>,
{
    records
        .into_iter()
        .filter(|t| t.kind == kind)
        .map(|t| t.amount)
        .sum()
}

/// Records with `since <= occurred_at < until`
pub fn within<'a, I>(records: I, since: NaiveDateTime, until: NaiveDateTime) -> Vec<&'a Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    records
        .into_iter()
        .filter(|t| t.occurred_at >= since && t.occurred_at < until)
        .collect()
}

/// Monthly totals as buckets, oldest first
pub fn monthly_buckets<'a, I>(records: I) -> Vec<MonthlyBucket>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    group_by_month(records)
        .into_iter()
        .map(|(month, total)| MonthlyBucket { month, total })
        .collect()
}
