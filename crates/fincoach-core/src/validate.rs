//! Input checks for records, goals and budgets
//!
//! Each validator returns the value unchanged on success so it can be used
//! inline: `let amount = validate_amount(raw)?;`

use chrono::NaiveDateTime;

use crate::error::{Error, Result};

/// Upper bound for a single transaction (one crore)
pub const MAX_TRANSACTION_AMOUNT: f64 = 10_000_000.0;

pub fn validate_amount(amount: f64) -> Result<f64> {
    if amount <= 0.0 || amount.is_nan() {
        return Err(Error::InvalidInput("Amount must be greater than 0".into()));
    }
    if amount > MAX_TRANSACTION_AMOUNT {
        return Err(Error::InvalidInput("Amount exceeds maximum limit".into()));
    }
    Ok(amount)
}

pub fn validate_transaction_date(date: NaiveDateTime, now: NaiveDateTime) -> Result<NaiveDateTime> {
    if date > now {
        return Err(Error::InvalidInput(
            "Transaction date cannot be in the future".into(),
        ));
    }
    Ok(date)
}

pub fn validate_deadline(deadline: NaiveDateTime, now: NaiveDateTime) -> Result<NaiveDateTime> {
    if deadline <= now {
        return Err(Error::InvalidInput("Deadline must be in the future".into()));
    }
    Ok(deadline)
}

pub fn validate_target_amount(amount: f64) -> Result<f64> {
    if amount <= 0.0 || amount.is_nan() {
        return Err(Error::InvalidInput(
            "Target amount must be greater than 0".into(),
        ));
    }
    Ok(amount)
}

pub fn validate_budget(amount: f64) -> Result<f64> {
    validate_non_negative(amount, "Budget amount")
}

/// `what` names the field in the error, e.g. "Goal 'Car' target amount"
pub fn validate_non_negative(amount: f64, what: &str) -> Result<f64> {
    if amount < 0.0 || amount.is_nan() {
        return Err(Error::InvalidInput(format!("{} cannot be negative", what)));
    }
    Ok(amount)
}
