use crate::error::SaldoError;
use crate::model::AccountBalance;
use crate::parsing::amount::strip_currency;
use crate::parsing::split_lines;
use crate::rules::StatementRules;

/// Find the closing balance: the line after the first balance marker that carries an amount.
///
/// The following line may hold other numbers before the balance, so the
/// rightmost amount on it is taken.
pub fn parse_balance(text: &str, rules: &StatementRules) -> Result<AccountBalance, SaldoError> {
    let lines = split_lines(text);

    for (i, line) in lines.iter().enumerate() {
        let lower = line.to_lowercase();
        if !rules
            .balance_markers
            .iter()
            .any(|marker| lower.contains(marker.as_str()))
        {
            continue;
        }

        let Some(next) = lines.get(i + 1) else {
            continue;
        };

        match rules.amount.find_iter(next).last() {
            Some(m) => {
                let amount = strip_currency(m.as_str(), rules.currency_symbol.as_deref());
                return Ok(AccountBalance {
                    amount: amount.to_string(),
                });
            }
            None => {
                tracing::debug!(line = i, "balance marker without amount on following line");
            }
        }
    }

    Err(SaldoError::BalanceNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::builtin::compiled_preset;

    fn balance(text: &str) -> Result<AccountBalance, SaldoError> {
        parse_balance(text, &compiled_preset("n26").unwrap())
    }

    #[test]
    fn test_spanish_marker_grouped_amount() {
        let b = balance("Resumen\nTu nuevo saldo\nRef 12 1.234,56€\n").unwrap();
        assert_eq!(b.amount, "1.234,56");
    }

    #[test]
    fn test_english_marker() {
        let b = balance("Your new balance\n+2,500.00€").unwrap();
        assert_eq!(b.amount, "+2,500.00");
    }

    #[test]
    fn test_marker_is_case_insensitive() {
        assert_eq!(balance("TU NUEVO SALDO\n-5,00€").unwrap().amount, "-5,00");
        assert_eq!(balance("your New Balance:\n 2.50 ").unwrap().amount, "2.50");
    }

    #[test]
    fn test_last_amount_on_line_wins() {
        let b = balance("Tu nuevo saldo\n10,00€ 25,50€").unwrap();
        assert_eq!(b.amount, "25,50");
    }

    #[test]
    fn test_first_marker_wins() {
        let b = balance("Tu nuevo saldo\n100,00€\nTu nuevo saldo\n200,00€").unwrap();
        assert_eq!(b.amount, "100,00");
    }

    #[test]
    fn test_marker_without_amount_keeps_scanning() {
        let b = balance("Tu nuevo saldo\nsee next page\nYour new balance\n42,00€").unwrap();
        assert_eq!(b.amount, "42,00");
    }

    #[test]
    fn test_marker_on_last_line() {
        assert!(matches!(
            balance("Tu nuevo saldo"),
            Err(SaldoError::BalanceNotFound)
        ));
    }

    #[test]
    fn test_empty_text() {
        assert!(matches!(balance(""), Err(SaldoError::BalanceNotFound)));
    }
}
