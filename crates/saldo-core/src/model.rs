use crate::error::SaldoError;
use crate::parsing::amount::parse_amount;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Date format used by statements (`10.10.2025`).
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// A single transaction recovered from statement text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// `DD.MM.YYYY`
    pub booking_date: String,
    /// `DD.MM.YYYY`, equal to `booking_date` when the statement gives no value date.
    pub value_date: String,
    pub counterparty_name: String,
    /// Signed amount as printed, comma decimal separator, currency stripped (`-2,50`).
    pub amount: String,
}

impl TransactionRecord {
    /// Numeric value of the amount.
    pub fn amount_value(&self) -> Result<Decimal, SaldoError> {
        parse_amount(&self.amount)
    }

    pub fn booking_date_parsed(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.booking_date, DATE_FORMAT).ok()
    }
}

impl fmt::Display for TransactionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.booking_date, self.counterparty_name, self.amount
        )
    }
}

/// Closing account balance as printed on the statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    pub amount: String,
}

impl AccountBalance {
    pub fn amount_value(&self) -> Result<Decimal, SaldoError> {
        parse_amount(&self.amount)
    }
}

/// Everything parsed from one statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedStatement {
    /// Detected statement language (e.g. "es", "en").
    pub language: String,
    /// In the order they appear in the text, not chronological.
    pub transactions: Vec<TransactionRecord>,
    pub balance: Option<AccountBalance>,
}

/// Sort transactions by booking date, oldest first.
///
/// The sort is stable, so same-day transactions keep their statement order.
/// Records with an unparseable booking date sort last.
pub fn sort_chronological(transactions: &mut [TransactionRecord]) {
    transactions.sort_by_key(|tx| match tx.booking_date_parsed() {
        Some(date) => (0, Some(date)),
        None => (1, None),
    });
}
