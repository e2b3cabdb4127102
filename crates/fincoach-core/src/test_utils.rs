//! Shared fixtures for tests
//!
//! Enabled for this crate's unit tests and for downstream crates through the
//! `test-utils` feature.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::models::{Goal, Jar, Snapshot, Transaction, UserProfile};

/// Panics on an invalid date; fixtures only.
pub fn at(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, 0, 0))
        .expect("valid fixture timestamp")
}

pub fn day(year: i32, month: u32, day: u32) -> NaiveDateTime {
    at(year, month, day, 0)
}

/// Expenses of `amount` in `category`, one every `step_days`, ending at `end`
pub fn expense_series(
    amount: f64,
    category: &str,
    end: NaiveDateTime,
    count: usize,
    step_days: i64,
) -> Vec<Transaction> {
    (0..count)
        .map(|i| Transaction::expense(amount, category, end - Duration::days(i as i64 * step_days)))
        .collect()
}

/// A user with six months of steady history, two goals and two jars.
///
/// `now` is the evaluation instant; all records fall before it.
pub fn sample_snapshot(now: NaiveDateTime) -> Snapshot {
    let mut transactions = Vec::new();
    let mut id = 1;
    for month in 0..6 {
        let base = now - Duration::days(month * 30 + 2);
        transactions.push(
            Transaction::income(5000.0, "salary", base)
                .with_id(id)
                .with_description("ACME PAYROLL salary"),
        );
        id += 1;
        for (amount, category, offset) in [
            (1200.0, "rent", 0),
            (80.0, "food", 1),
            (95.0, "food", 3),
            (60.0, "transportation", 5),
            (45.0, "entertainment", 8),
        ] {
            transactions.push(
                Transaction::expense(amount, category, base - Duration::days(offset)).with_id(id),
            );
            id += 1;
        }
    }

    Snapshot {
        profile: Some(UserProfile {
            monthly_income: 5000.0,
            monthly_budget: 3000.0,
        }),
        transactions,
        goals: vec![
            Goal::new("Emergency cushion", 6000.0, now + Duration::days(365))
                .with_id(1)
                .with_current_amount(1500.0),
            Goal::new("New laptop", 1200.0, now + Duration::days(90))
                .with_id(2)
                .with_current_amount(1200.0),
        ],
        jars: vec![
            Jar::new("Rainy day", 5000.0, None).with_id(1).with_balance(2500.0),
            Jar::new("Travel", 2000.0, Some("#10B981".to_string()))
                .with_id(2)
                .with_balance(400.0),
        ],
    }
}
