use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A rule table describing one bank's statement wording and number formats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleTableDef {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    /// Regex locating a `DD.MM.YYYY` style date anywhere in a line.
    pub date_pattern: String,
    pub amount: AmountGrammarDef,
    /// Regex for counterparty names that are really page numbers ("1 / 3").
    pub page_number_pattern: String,
    /// Phrase introducing a value date line (case-sensitive).
    pub value_date_marker: String,
    /// Locale -> phrases whose following line carries the closing balance.
    /// Matched case-insensitively.
    pub balance_markers: BTreeMap<String, Vec<String>>,
    /// Locale -> phrases identifying the statement language.
    #[serde(default)]
    pub language_markers: BTreeMap<String, Vec<String>>,
    #[serde(default = "default_language")]
    pub default_language: String,
    /// Substrings that disqualify a line from being a counterparty name (case-sensitive).
    #[serde(default)]
    pub counterparty_skip: Vec<String>,
    /// Substrings that reject a detected block as a non-transaction (case-insensitive).
    #[serde(default)]
    pub rejection_phrases: Vec<String>,
    #[serde(default)]
    pub windows: WindowDef,
}

/// How amounts are written in the statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmountGrammarDef {
    /// General amount regex, matched anywhere in a line.
    pub pattern: String,
    /// Full-line regex for a line that is nothing but a transaction amount.
    pub candidate_pattern: String,
    /// Currency glyph stripped from the end of extracted amounts.
    #[serde(default)]
    pub currency_symbol: Option<String>,
}

/// Sizes of the backward windows scanned around an amount line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowDef {
    /// Lines scanned before the amount for booking/value dates.
    pub date_lookback: usize,
    /// Lines scanned before the amount for the counterparty, excluding the
    /// line immediately before it.
    pub counterparty_lookback: usize,
    /// A booking date line must be shorter than this (bytes).
    pub max_date_line_len: usize,
    /// Shortest accepted counterparty line (bytes).
    pub min_counterparty_len: usize,
}

impl Default for WindowDef {
    fn default() -> Self {
        WindowDef {
            date_lookback: 10,
            counterparty_lookback: 8,
            max_date_line_len: 20,
            min_counterparty_len: 3,
        }
    }
}

fn default_language() -> String {
    "en".into()
}
