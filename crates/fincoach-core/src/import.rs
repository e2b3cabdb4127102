//! CSV transaction import
//!
//! Expected header (case-insensitive, any column order):
//! `amount,type,category,description,transaction_date`
//!
//! Only `amount` and `transaction_date` are required. When `type` is absent
//! the sign of the amount decides: negative is an expense, positive income.
//! Blank categories are filled by the keyword categorizer when one is given.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord};
use tracing::debug;

use crate::categorize::{CategoryTable, UNCATEGORIZED};
use crate::error::{Error, Result};
use crate::models::{Snapshot, Transaction, TransactionKind};

/// Column positions resolved from the header row
struct Columns {
    id: Option<usize>,
    amount: usize,
    kind: Option<usize>,
    category: Option<usize>,
    description: Option<usize>,
    date: usize,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |names: &[&str]| {
            headers
                .iter()
                .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
        };

        Ok(Self {
            id: find(&["id"]),
            amount: find(&["amount"])
                .ok_or_else(|| Error::InvalidInput("CSV is missing an amount column".into()))?,
            kind: find(&["type", "kind"]),
            category: find(&["category"]),
            description: find(&["description", "memo"]),
            date: find(&["transaction_date", "date"]).ok_or_else(|| {
                Error::InvalidInput("CSV is missing a transaction_date column".into())
            })?,
        })
    }
}

fn field<'r>(record: &'r StringRecord, index: Option<usize>) -> Option<&'r str> {
    index
        .and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Parse transactions from CSV data
pub fn parse_csv<R: Read>(reader: R, categories: Option<&CategoryTable>) -> Result<Vec<Transaction>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns = Columns::from_headers(rdr.headers()?)?;
    let mut transactions = Vec::new();

    for (row, result) in rdr.records().enumerate() {
        let record = result?;
        let line = row + 2;

        let amount_str = field(&record, Some(columns.amount))
            .ok_or_else(|| Error::InvalidInput(format!("Row {}: missing amount", line)))?;
        let signed = parse_amount(amount_str)?;

        let kind = match field(&record, columns.kind) {
            Some(s) => s
                .parse::<TransactionKind>()
                .map_err(|e| Error::InvalidInput(format!("Row {}: {}", line, e)))?,
            None if signed < 0.0 => TransactionKind::Expense,
            None => TransactionKind::Income,
        };

        let date_str = field(&record, Some(columns.date))
            .ok_or_else(|| Error::InvalidInput(format!("Row {}: missing date", line)))?;
        let occurred_at = parse_date(date_str)?;

        let description = field(&record, columns.description).map(str::to_string);

        let category = match (field(&record, columns.category), categories, &description) {
            (Some(c), _, _) => c.to_lowercase(),
            (None, Some(table), Some(desc)) => table.categorize(desc).category,
            _ => UNCATEGORIZED.to_string(),
        };

        let mut tx = Transaction::new(signed.abs(), kind, category, occurred_at);
        tx.description = description;
        if let Some(id) = field(&record, columns.id) {
            tx.id = id
                .parse()
                .map_err(|_| Error::InvalidInput(format!("Row {}: invalid id {}", line, id)))?;
        }
        transactions.push(tx);
    }

    debug!("Parsed {} CSV transactions", transactions.len());
    Ok(transactions)
}

/// Parse a CSV file from disk
pub fn import_file(path: &Path, categories: Option<&CategoryTable>) -> Result<Vec<Transaction>> {
    let file = std::fs::File::open(path)?;
    parse_csv(file, categories)
}

/// Append imported records to a snapshot, assigning fresh ids to records
/// without one or whose id is already taken. Returns how many were added.
///
/// Nothing is appended when the id space runs out.
pub fn merge_into(snapshot: &mut Snapshot, transactions: Vec<Transaction>) -> Result<usize> {
    let mut used: HashSet<i64> = snapshot.transactions.iter().map(|t| t.id).collect();
    // Highest id seen so far; fresh ids are handed out above it
    let mut last_id = used.iter().copied().max().unwrap_or(0);
    let mut merged = Vec::with_capacity(transactions.len());

    for mut tx in transactions {
        if tx.id == 0 || used.contains(&tx.id) {
            let original = tx.id;
            last_id = last_id
                .checked_add(1)
                .ok_or_else(|| Error::InvalidInput("No transaction ids left to assign".into()))?;
            tx.id = last_id;
            if original != 0 {
                debug!(original, id = tx.id, "Reassigned duplicate transaction id");
            }
        } else {
            last_id = last_id.max(tx.id);
        }
        used.insert(tx.id);
        merged.push(tx);
    }

    let count = merged.len();
    snapshot.transactions.extend(merged);
    Ok(count)
}

/// Parse a timestamp or a bare date (taken as midnight)
fn parse_date(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();

    let datetime_formats = [
        "%Y-%m-%dT%H:%M:%S%.f", // 2024-01-15T09:30:00
        "%Y-%m-%d %H:%M:%S%.f", // 2024-01-15 09:30:00
        "%Y-%m-%dT%H:%M",       // 2024-01-15T09:30
        "%Y-%m-%d %H:%M",       // 2024-01-15 09:30
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }

    let date_formats = [
        "%Y-%m-%d", // 2024-01-15
        "%m/%d/%Y", // 01/15/2024
        "%d-%m-%Y", // 15-01-2024
    ];
    for fmt in date_formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            if let Some(dt) = date.and_hms_opt(0, 0, 0) {
                return Ok(dt);
            }
        }
    }

    Err(Error::InvalidInput(format!("Unable to parse date: {}", s)))
}

/// Parse an amount, tolerating currency symbols and thousands separators
fn parse_amount(s: &str) -> Result<f64> {
    let cleaned: String = s
        .trim()
        .trim_start_matches("Rs.")
        .trim_start_matches("Rs")
        .replace(['$', '₹', ',', ' '], "")
        .replace('(', "-")
        .replace(')', "");

    cleaned
        .parse::<f64>()
        .map_err(|_| Error::InvalidInput(format!("Unable to parse amount: {}", s)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{at, day};

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-01-15T09:30:00").unwrap(), at(2024, 1, 15, 9) + chrono::Duration::minutes(30));
        assert_eq!(parse_date("2024-01-15").unwrap(), day(2024, 1, 15));
        assert_eq!(parse_date("01/15/2024").unwrap(), day(2024, 1, 15));
        assert!(parse_date("yesterday").is_err());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("$1,234.56").unwrap(), 1234.56);
        assert_eq!(parse_amount("Rs.2,500").unwrap(), 2500.0);
        assert_eq!(parse_amount("(100.00)").unwrap(), -100.0);
        assert!(parse_amount("abc").is_err());
    }

    #[test]
    fn test_parse_csv_with_type_column() {
        let csv = "amount,type,category,description,transaction_date
1200,expense,Rent,June rent,2024-06-01
5000,income,salary,,2024-06-01T09:00:00";

        let txs = parse_csv(csv.as_bytes(), None).unwrap();
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0].category, "rent");
        assert_eq!(txs[0].kind, TransactionKind::Expense);
        assert_eq!(txs[0].description.as_deref(), Some("June rent"));
        assert_eq!(txs[1].kind, TransactionKind::Income);
        assert_eq!(txs[1].description, None);
        assert_eq!(txs[1].occurred_at, at(2024, 6, 1, 9));
    }

    #[test]
    fn test_sign_decides_kind_without_type_column() {
        let csv = "Date,Description,Amount
2024-06-02,Coffee,-4.50
2024-06-03,Refund,20.00";

        let txs = parse_csv(csv.as_bytes(), None).unwrap();
        assert_eq!(txs[0].kind, TransactionKind::Expense);
        assert_eq!(txs[0].amount, 4.5);
        assert_eq!(txs[0].category, UNCATEGORIZED);
        assert_eq!(txs[1].kind, TransactionKind::Income);
    }

    #[test]
    fn test_blank_category_is_categorized() {
        let table = CategoryTable::default();
        let csv = "amount,type,category,description,transaction_date
15.99,expense,,Netflix subscription,2024-06-02";

        let txs = parse_csv(csv.as_bytes(), Some(&table)).unwrap();
        assert_eq!(txs[0].category, "entertainment");
    }

    #[test]
    fn test_missing_required_column() {
        let csv = "type,category\nexpense,food";
        assert!(matches!(
            parse_csv(csv.as_bytes(), None),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_bad_type_reports_row() {
        let csv = "amount,type,transaction_date\n10,transfer,2024-06-02";
        match parse_csv(csv.as_bytes(), None) {
            Err(Error::InvalidInput(msg)) => assert!(msg.starts_with("Row 2")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_merge_assigns_ids() {
        let mut snapshot = Snapshot::default();
        snapshot
            .transactions
            .push(Transaction::expense(1.0, "food", day(2024, 6, 1)).with_id(7));

        let added = merge_into(
            &mut snapshot,
            vec![
                Transaction::expense(2.0, "food", day(2024, 6, 2)),
                Transaction::expense(3.0, "food", day(2024, 6, 3)),
            ],
        )
        .unwrap();

        assert_eq!(added, 2);
        let ids: Vec<i64> = snapshot.transactions.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![7, 8, 9]);
    }

    #[test]
    fn test_merge_reassigns_taken_ids() {
        let mut snapshot = Snapshot::default();
        snapshot
            .transactions
            .push(Transaction::expense(1.0, "food", day(2024, 6, 1)).with_id(7));

        merge_into(
            &mut snapshot,
            vec![
                Transaction::expense(2.0, "food", day(2024, 6, 2)).with_id(7),
                Transaction::expense(3.0, "food", day(2024, 6, 3)).with_id(3),
                Transaction::expense(4.0, "food", day(2024, 6, 4)).with_id(3),
                Transaction::expense(5.0, "food", day(2024, 6, 5)),
            ],
        )
        .unwrap();

        let ids: Vec<i64> = snapshot.transactions.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![7, 8, 3, 9, 10]);
        // The reassigned record keeps its content
        assert_eq!(snapshot.transactions[1].amount, 2.0);
    }

    #[test]
    fn test_merge_at_max_id() {
        let mut snapshot = Snapshot::default();
        snapshot
            .transactions
            .push(Transaction::expense(1.0, "food", day(2024, 6, 1)).with_id(i64::MAX));

        let result = merge_into(
            &mut snapshot,
            vec![
                Transaction::expense(2.0, "food", day(2024, 6, 2)).with_id(5),
                Transaction::expense(3.0, "food", day(2024, 6, 3)),
            ],
        );

        assert!(matches!(result, Err(Error::InvalidInput(_))));
        assert_eq!(snapshot.transactions.len(), 1);

        // An explicit, unused id still merges
        let added = merge_into(
            &mut snapshot,
            vec![Transaction::expense(2.0, "food", day(2024, 6, 2)).with_id(5)],
        )
        .unwrap();
        assert_eq!(added, 1);
        assert_eq!(snapshot.transactions[1].id, 5);
    }
}
