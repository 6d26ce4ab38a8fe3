pub mod amount;
pub mod balance;
pub mod transactions;

pub use balance::parse_balance;
pub use transactions::parse_transactions;

use crate::error::SaldoError;
use crate::model::ParsedStatement;
use crate::rules::StatementRules;

/// Split extracted text into lines, each trimmed of surrounding whitespace.
///
/// Line positions are preserved: blank lines stay in place as empty strings.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n').map(str::trim).collect()
}

/// Detect the statement language from the rule table's language markers.
pub fn detect_language(text: &str, rules: &StatementRules) -> String {
    rules
        .language_markers
        .iter()
        .find(|(_, phrases)| phrases.iter().any(|p| text.contains(p.as_str())))
        .map(|(locale, _)| locale.clone())
        .unwrap_or_else(|| rules.default_language.clone())
}

/// Parse statement text into transactions and the closing balance.
///
/// A missing balance is not an error here; it is reported as `None`.
pub fn parse_text(text: &str, rules: &StatementRules) -> ParsedStatement {
    let language = detect_language(text, rules);
    let transactions = parse_transactions(text, rules);

    let balance = match parse_balance(text, rules) {
        Ok(balance) => Some(balance),
        Err(SaldoError::BalanceNotFound) => {
            tracing::warn!(rules = %rules.name, "no closing balance found in statement");
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to parse closing balance");
            None
        }
    };

    tracing::info!(
        language = %language,
        transactions = transactions.len(),
        has_balance = balance.is_some(),
        "parsed statement"
    );

    ParsedStatement {
        language,
        transactions,
        balance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::builtin::compiled_preset;

    #[test]
    fn test_split_lines_trims_and_keeps_positions() {
        let lines = split_lines("  a  \n\n\tb\r\n");
        assert_eq!(lines, vec!["a", "", "b", ""]);
    }

    #[test]
    fn test_detect_language() {
        let rules = compiled_preset("n26").unwrap();
        assert_eq!(detect_language("Actividad de la cuenta\n...", &rules), "es");
        assert_eq!(detect_language("Account activity\n...", &rules), "en");
    }

    #[test]
    fn test_parse_text_without_balance() {
        let rules = compiled_preset("n26").unwrap();
        let text = "Mercadona\nCompras\n01.10.2025\n-23,10€";
        let parsed = parse_text(text, &rules);
        assert_eq!(parsed.transactions.len(), 1);
        assert!(parsed.balance.is_none());
    }

    #[test]
    fn test_parse_text_is_idempotent() {
        let rules = compiled_preset("n26").unwrap();
        let text = "Mercadona\nCompras\n01.10.2025\n-23,10€\nTu nuevo saldo\n976,90€";
        let first = parse_text(text, &rules);
        let second = parse_text(text, &rules);
        assert_eq!(first.transactions, second.transactions);
        assert_eq!(first.balance, second.balance);
    }
}
