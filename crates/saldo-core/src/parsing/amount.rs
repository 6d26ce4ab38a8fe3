use crate::error::SaldoError;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Trim an amount token and drop a trailing currency glyph.
///
/// - "-2,50€" -> "-2,50"
/// - "1.234,56 €" -> "1.234,56"
/// - "2.50" -> "2.50"
pub fn strip_currency<'a>(amount: &'a str, currency_symbol: Option<&str>) -> &'a str {
    let amount = amount.trim();
    match currency_symbol {
        Some(symbol) => amount.strip_suffix(symbol).unwrap_or(amount).trim(),
        None => amount,
    }
}

/// Parse a printed amount into a decimal.
///
/// Handles formats like:
/// - "-2,50" -> -2.50 (comma decimal)
/// - "2.50" -> 2.50 (period decimal)
/// - "1.234,56" -> 1234.56 (period grouping)
/// - "+1,234.56" -> 1234.56 (comma grouping)
///
/// When both separators appear, the rightmost one is the decimal separator.
pub fn parse_amount(s: &str) -> Result<Decimal, SaldoError> {
    let s = s.trim();
    let decimal_sep = match (s.rfind(','), s.rfind('.')) {
        (Some(c), Some(p)) => {
            if c > p {
                ','
            } else {
                '.'
            }
        }
        (Some(_), None) => ',',
        _ => '.',
    };

    let normalized: String = s
        .trim_start_matches('+')
        .chars()
        .filter_map(|ch| match ch {
            ',' | '.' if ch == decimal_sep => Some('.'),
            ',' | '.' => None,
            other => Some(other),
        })
        .collect();

    Decimal::from_str(&normalized).map_err(|_| SaldoError::InvalidAmount(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_strip_currency() {
        assert_eq!(strip_currency("-2,50€", Some("€")), "-2,50");
        assert_eq!(strip_currency(" 1.234,56 € ", Some("€")), "1.234,56");
        assert_eq!(strip_currency("2.50", Some("€")), "2.50");
        assert_eq!(strip_currency(" 2,50€ ", None), "2,50€");
    }

    #[test]
    fn test_comma_decimal() {
        assert_eq!(parse_amount("-2,50").unwrap(), dec!(-2.50));
    }

    #[test]
    fn test_period_decimal() {
        assert_eq!(parse_amount("2.50").unwrap(), dec!(2.50));
    }

    #[test]
    fn test_period_grouping() {
        assert_eq!(parse_amount("1.234,56").unwrap(), dec!(1234.56));
    }

    #[test]
    fn test_comma_grouping_with_sign() {
        assert_eq!(parse_amount("+1,234.56").unwrap(), dec!(1234.56));
    }

    #[test]
    fn test_invalid_amount() {
        assert!(matches!(
            parse_amount("N/A"),
            Err(SaldoError::InvalidAmount(_))
        ));
        assert!(parse_amount("").is_err());
    }
}
