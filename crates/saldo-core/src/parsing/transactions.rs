//! Transaction block detection.
//!
//! A transaction is anchored on a line that is nothing but an amount. Its
//! dates and counterparty are recovered by scanning a bounded window of lines
//! above that amount; nothing after the amount is looked at.

use crate::model::TransactionRecord;
use crate::parsing::amount::strip_currency;
use crate::parsing::split_lines;
use crate::rules::StatementRules;

/// Extract transactions from statement text, in the order their amount lines appear.
///
/// Never fails: text without recognizable blocks yields an empty list.
pub fn parse_transactions(text: &str, rules: &StatementRules) -> Vec<TransactionRecord> {
    let lines = split_lines(text);
    let mut transactions = Vec::new();

    for (i, &line) in lines.iter().enumerate() {
        if line.is_empty() || !rules.amount_candidate.is_match(line) {
            continue;
        }

        let amount = strip_currency(line, rules.currency_symbol.as_deref());
        let dates = resolve_dates(&lines, i, rules);
        let counterparty = resolve_counterparty(&lines, i, rules).unwrap_or("");

        let Some(booking_date) = dates.booking else {
            tracing::debug!(line = i, amount, "rejected block: no booking date");
            continue;
        };
        if amount.is_empty() || !amount.contains(',') {
            tracing::debug!(line = i, amount, "rejected block: malformed amount");
            continue;
        }
        if !is_real_transaction(counterparty, rules) {
            tracing::debug!(line = i, amount, counterparty, "rejected block: not a transaction");
            continue;
        }

        let record = TransactionRecord {
            booking_date: booking_date.to_string(),
            value_date: dates.value.unwrap_or(booking_date).to_string(),
            counterparty_name: counterparty.trim().to_string(),
            amount: amount.to_string(),
        };
        tracing::debug!(line = i, %record, "accepted block");
        transactions.push(record);
    }

    transactions
}

#[derive(Debug, Default, PartialEq, Eq)]
struct BlockDates<'a> {
    booking: Option<&'a str>,
    value: Option<&'a str>,
}

/// Scan the lines before the amount at `i` for booking and value dates.
///
/// A value-date line overrides the value date every time it is seen. The
/// first short line carrying a date is the booking date and is never
/// replaced; it also seeds the value date if none was seen yet.
fn resolve_dates<'a>(lines: &[&'a str], i: usize, rules: &StatementRules) -> BlockDates<'a> {
    let start = i.saturating_sub(rules.windows.date_lookback);
    let mut dates = BlockDates::default();

    for &line in &lines[start..i] {
        if line.contains(rules.value_date_marker.as_str()) {
            if let Some(m) = rules.date.find(line) {
                dates.value = Some(m.as_str());
            }
            continue;
        }

        if dates.booking.is_none() && line.len() < rules.windows.max_date_line_len {
            if let Some(m) = rules.date.find(line) {
                dates.booking = Some(m.as_str());
                if dates.value.is_none() {
                    dates.value = Some(m.as_str());
                }
            }
        }
    }

    dates
}

/// Pick the longest plausible name in the window before the amount at `i`,
/// skipping the line directly above it. Ties keep the earliest line.
fn resolve_counterparty<'a>(lines: &[&'a str], i: usize, rules: &StatementRules) -> Option<&'a str> {
    let start = i.saturating_sub(rules.windows.counterparty_lookback);
    let end = i.saturating_sub(1);
    let mut best: Option<&'a str> = None;

    for &line in &lines[start..end] {
        if is_counterparty_noise(line, rules) {
            continue;
        }
        if best.map_or(true, |b| line.len() > b.len()) {
            best = Some(line);
        }
    }

    best
}

/// Lines that can never be a counterparty: too short, dates, amounts, headers.
fn is_counterparty_noise(line: &str, rules: &StatementRules) -> bool {
    line.len() < rules.windows.min_counterparty_len
        || rules.date.is_match(line)
        || rules.amount.is_match(line)
        || rules
            .counterparty_skip
            .iter()
            .any(|word| line.contains(word.as_str()))
}

/// Reject blocks whose "counterparty" is a page number, a balance or a table header.
fn is_real_transaction(counterparty: &str, rules: &StatementRules) -> bool {
    let name = counterparty.trim();
    if name.is_empty() || rules.page_number.is_match(name) {
        return false;
    }

    let lower = name.to_lowercase();
    if rules
        .rejection_phrases
        .iter()
        .any(|phrase| lower.contains(phrase.as_str()))
    {
        return false;
    }

    name.len() >= rules.windows.min_counterparty_len
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::builtin::compiled_preset;

    fn n26() -> StatementRules {
        compiled_preset("n26").unwrap()
    }

    fn parse(lines: &[&str]) -> Vec<TransactionRecord> {
        parse_transactions(&lines.join("\n"), &n26())
    }

    #[test]
    fn test_value_date_and_booking_date_block() {
        let txs = parse(&[
            "Fecha de valor 05.10.2025",
            "05.10.2025",
            "SUPERMARKET XYZ",
            "Compras",
            "-12,34€",
        ]);
        assert_eq!(
            txs,
            vec![TransactionRecord {
                booking_date: "05.10.2025".into(),
                value_date: "05.10.2025".into(),
                counterparty_name: "SUPERMARKET XYZ".into(),
                amount: "-12,34".into(),
            }]
        );
    }

    #[test]
    fn test_value_date_defaults_to_booking_date() {
        let txs = parse(&["Café Central", "Compras", "03.10.2025", "-4,20€"]);
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].booking_date, "03.10.2025");
        assert_eq!(txs[0].value_date, "03.10.2025");
    }

    #[test]
    fn test_value_date_line_seen_after_booking_overrides_value() {
        let txs = parse(&[
            "Amazon Marketplace",
            "Compras",
            "02.10.2025",
            "Fecha de valor 04.10.2025",
            "-19,99€",
        ]);
        assert_eq!(txs[0].booking_date, "02.10.2025");
        assert_eq!(txs[0].value_date, "04.10.2025");
    }

    #[test]
    fn test_long_date_line_is_not_booking_date() {
        // 20+ bytes: a sentence containing a date, not a standalone date line
        let txs = parse(&["Some Merchant GmbH", "Issued on 01.10.2025 in Berlin", "x", "-1,00"]);
        assert!(txs.is_empty());
    }

    #[test]
    fn test_booking_date_is_first_in_window() {
        let txs = parse(&["01.10.2025", "Lidl Sagt Danke", "Compras", "02.10.2025", "-8,00€"]);
        assert_eq!(txs[0].booking_date, "01.10.2025");
    }

    #[test]
    fn test_date_window_is_ten_lines() {
        let block = |filler: usize| {
            let mut lines = vec!["01.10.2025"];
            lines.extend(std::iter::repeat("..").take(filler));
            lines.extend(["Lidl Sagt Danke", "x", "-8,00€"]);
            lines
        };
        // date 11 lines above the amount
        assert!(parse(&block(8)).is_empty());
        // date 10 lines above the amount
        assert_eq!(parse(&block(7)).len(), 1);
    }

    #[test]
    fn test_line_directly_above_amount_is_not_counterparty() {
        let txs = parse(&["Bar", "05.10.2025", "A Much Longer Name Right Above", "-3,00€"]);
        assert_eq!(txs[0].counterparty_name, "Bar");
    }

    #[test]
    fn test_longest_counterparty_wins_first_on_tie() {
        let txs = parse(&["Netflix.com", "Spotify AB1", "Ocio", "05.10.2025", "x", "-9,99€"]);
        // "Netflix.com" and "Spotify AB1" have equal length
        assert_eq!(txs[0].counterparty_name, "Netflix.com");

        let txs = parse(&["Uber", "Uber Eats Madrid", "05.10.2025", "x", "-9,99€"]);
        assert_eq!(txs[0].counterparty_name, "Uber Eats Madrid");
    }

    #[test]
    fn test_counterparty_skips_headers_and_amounts() {
        let txs = parse(&[
            "Transferencias salientes",
            "IBAN: ES91 2100 0418 4502 0005 1332",
            "Ref 2.50 EUR",
            "Rent",
            "05.10.2025",
            "x",
            "-750,00€",
        ]);
        assert_eq!(txs[0].counterparty_name, "Rent");
    }

    #[test]
    fn test_page_number_counterparty_rejected() {
        let txs = parse(&["1 / 3", "05.10.2025", "x", "-12,34€"]);
        assert!(txs.is_empty());
    }

    #[test]
    fn test_balance_rows_rejected() {
        let txs = parse(&["Saldo previo", "01.10.2025", "x", "250,00€"]);
        assert!(txs.is_empty());
        let txs = parse(&["Opening BALANCE", "01.10.2025", "x", "100,00€"]);
        assert!(txs.is_empty());
    }

    #[test]
    fn test_non_candidate_amount_lines_ignored() {
        for amount_line in ["-12.34€", "-12,34€ total", "Total -12,34€", "-12,3€", "1.234,56€"] {
            let txs = parse(&["SUPERMARKET XYZ", "05.10.2025", "x", amount_line]);
            assert!(txs.is_empty(), "unexpected transaction for {:?}", amount_line);
        }
    }

    #[test]
    fn test_only_ascii_whitespace_before_currency() {
        let txs = parse(&["Bizum Maria", "05.10.2025", "x", "7,50\u{a0}€"]);
        assert!(txs.is_empty());
        let txs = parse(&["Bizum Maria", "05.10.2025", "x", "7,50\t€"]);
        assert_eq!(txs[0].amount, "7,50");
    }

    #[test]
    fn test_candidate_amount_variants() {
        for (line, expected) in [("+25,00€", "+25,00"), ("7,50 €", "7,50"), ("1234,56", "1234,56")] {
            let txs = parse(&["Bizum Maria", "05.10.2025", "x", line]);
            assert_eq!(txs[0].amount, expected);
        }
    }

    #[test]
    fn test_amount_without_window_rejected() {
        assert!(parse(&["-1,00€"]).is_empty());
        assert!(parse(&["", "-1,00€"]).is_empty());
    }

    #[test]
    fn test_order_follows_text_not_dates() {
        let mut lines = vec!["Newest Shop", "10.10.2025", "x", "-1,00€"];
        lines.extend(std::iter::repeat("--").take(10));
        lines.extend(["Oldest Shop", "01.10.2025", "x", "-2,00€"]);

        let txs = parse(&lines);
        let summary: Vec<(&str, &str)> = txs
            .iter()
            .map(|t| (t.counterparty_name.as_str(), t.booking_date.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![("Newest Shop", "10.10.2025"), ("Oldest Shop", "01.10.2025")]
        );
    }

    #[test]
    fn test_adjacent_blocks_share_window() {
        // without separation the second block sees the first block's lines
        let txs = parse(&[
            "Newest Shop",
            "10.10.2025",
            "x",
            "-1,00€",
            "Oldest Shop Madrid",
            "01.10.2025",
            "x",
            "-2,00€",
        ]);
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[1].counterparty_name, "Oldest Shop Madrid");
        assert_eq!(txs[1].booking_date, "10.10.2025");
    }

    #[test]
    fn test_is_real_transaction() {
        let rules = n26();
        assert!(is_real_transaction("REWE Markt", &rules));
        assert!(!is_real_transaction("  ", &rules));
        assert!(!is_real_transaction("2 / 3", &rules));
        assert!(!is_real_transaction("Fecha de reserva", &rules));
        assert!(!is_real_transaction("ab", &rules));
    }

    #[test]
    fn test_resolve_dates_window_start() {
        let rules = n26();
        let lines = ["05.10.2025", "-1,00"];
        let dates = resolve_dates(&lines, 1, &rules);
        assert_eq!(dates.booking, Some("05.10.2025"));
        assert_eq!(dates.value, Some("05.10.2025"));
        assert_eq!(resolve_dates(&lines, 0, &rules), BlockDates::default());
    }
}
