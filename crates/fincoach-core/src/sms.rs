//! UPI SMS parsing for Indian bank alerts
//!
//! Bank alerts arrive as free text ("Rs.1,250.00 debited from A/c XX1234 ...").
//! [`SmsParser`] pulls out the amount, direction and issuing bank so the text
//! can be stored as a candidate [`Transaction`]. The category is left as
//! [`UNCATEGORIZED`] for the keyword categorizer to fill in later.

use chrono::NaiveDateTime;
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use tracing::debug;

use crate::categorize::UNCATEGORIZED;
use crate::error::Result;
use crate::models::{Transaction, TransactionKind};

/// Banks recognised in alert text, checked in order
const BANK_PATTERNS: &[(&str, &str)] = &[
    ("HDFC", r"HDFC Bank|HDFC"),
    ("ICICI", r"ICICI Bank|ICICI"),
    ("SBI", r"State Bank|SBI"),
    ("Axis", r"Axis Bank|Axis"),
    ("Kotak", r"Kotak Bank|Kotak"),
];

const INCOME_WORDS: &[&str] = &["credited", "received", "deposited"];

const DESCRIPTION_CHARS: usize = 100;

pub const UNKNOWN_BANK: &str = "Unknown";

/// A transaction recovered from an SMS, plus the bank that sent it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedSms {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub bank: String,
}

/// Compiled patterns for bank alerts
pub struct SmsParser {
    amount: Regex,
    banks: Vec<(&'static str, Regex)>,
}

impl SmsParser {
    pub fn new() -> Result<Self> {
        let amount = Regex::new(r"Rs\.?\s*([0-9,]+(?:\.[0-9]{2})?)")?;
        let mut banks = Vec::with_capacity(BANK_PATTERNS.len());
        for (name, pattern) in BANK_PATTERNS {
            let re = RegexBuilder::new(pattern).case_insensitive(true).build()?;
            banks.push((*name, re));
        }
        Ok(Self { amount, banks })
    }

    /// Parse one alert. Returns `None` when no amount can be read.
    pub fn parse(&self, text: &str, now: NaiveDateTime) -> Option<ParsedSms> {
        let captured = self.amount.captures(text)?.get(1)?.as_str();
        let amount = match captured.replace(',', "").parse::<f64>() {
            Ok(amount) => amount,
            Err(_) => {
                debug!(captured, "SMS amount did not parse");
                return None;
            }
        };

        let lower = text.to_lowercase();
        let kind = if INCOME_WORDS.iter().any(|w| lower.contains(w)) {
            TransactionKind::Income
        } else {
            TransactionKind::Expense
        };

        let description: String = text.chars().take(DESCRIPTION_CHARS).collect();
        let bank = self.bank(text);

        debug!(amount, kind = %kind, bank, "Parsed SMS");

        Some(ParsedSms {
            transaction: Transaction::new(amount, kind, UNCATEGORIZED, now)
                .with_description(description),
            bank: bank.to_string(),
        })
    }

    /// First bank whose pattern appears in the text
    pub fn bank(&self, text: &str) -> &'static str {
        self.banks
            .iter()
            .find(|(_, re)| re.is_match(text))
            .map(|(name, _)| *name)
            .unwrap_or(UNKNOWN_BANK)
    }
}

/// One-shot parse with a freshly compiled [`SmsParser`]
pub fn parse_upi_sms(text: &str, now: NaiveDateTime) -> Result<Option<ParsedSms>> {
    Ok(SmsParser::new()?.parse(text, now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::at;

    fn parser() -> SmsParser {
        SmsParser::new().unwrap()
    }

    #[test]
    fn test_parse_debit() {
        let now = at(2024, 6, 20, 12);
        let sms = "Rs.1,250.50 debited from HDFC Bank A/c XX1234 on 20-06-24 to VPA shop@upi";
        let parsed = parser().parse(sms, now).unwrap();

        assert_eq!(parsed.transaction.amount, 1250.5);
        assert_eq!(parsed.transaction.kind, TransactionKind::Expense);
        assert_eq!(parsed.transaction.category, "other");
        assert_eq!(parsed.transaction.occurred_at, now);
        assert_eq!(parsed.bank, "HDFC");
    }

    #[test]
    fn test_parse_credit() {
        let sms = "Your a/c is credited with Rs 5000 by NEFT. -State Bank of India";
        let parsed = parser().parse(sms, at(2024, 6, 20, 12)).unwrap();

        assert_eq!(parsed.transaction.amount, 5000.0);
        assert_eq!(parsed.transaction.kind, TransactionKind::Income);
        assert_eq!(parsed.bank, "SBI");
    }

    #[test]
    fn test_bank_is_case_insensitive() {
        let p = parser();
        assert_eq!(p.bank("kotak: Rs.10 spent"), "Kotak");
        assert_eq!(p.bank("icici card alert"), "ICICI");
        assert_eq!(p.bank("Some other bank"), UNKNOWN_BANK);
    }

    #[test]
    fn test_first_matching_bank_wins() {
        assert_eq!(parser().bank("HDFC transfer to Axis Bank"), "HDFC");
    }

    #[test]
    fn test_description_truncated() {
        let sms = format!("Rs.10 debited {}", "x".repeat(200));
        let parsed = parser().parse(&sms, at(2024, 6, 20, 12)).unwrap();
        assert_eq!(
            parsed.transaction.description.as_deref().map(|d| d.chars().count()),
            Some(100)
        );
    }

    #[test]
    fn test_no_amount() {
        let parsed = parse_upi_sms("Your OTP is 123456", at(2024, 6, 20, 12)).unwrap();
        assert!(parsed.is_none());
    }

    #[test]
    fn test_serializes_flat() {
        let parsed = parser()
            .parse("Rs.99 paid via Axis", at(2024, 6, 20, 12))
            .unwrap();
        let json = serde_json::to_value(&parsed).unwrap();
        assert_eq!(json["amount"], 99.0);
        assert_eq!(json["type"], "expense");
        assert_eq!(json["bank"], "Axis");
    }
}
