use saldo_core::model::ParsedStatement;

pub fn format_parsed(parsed: &ParsedStatement) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Statement ({}): {} transaction(s)\n\n",
        parsed.language,
        parsed.transactions.len()
    ));

    if !parsed.transactions.is_empty() {
        let name_width = parsed
            .transactions
            .iter()
            .map(|t| t.counterparty_name.chars().count())
            .max()
            .unwrap_or(12)
            .max("Counterparty".len());
        let amount_width = parsed
            .transactions
            .iter()
            .map(|t| t.amount.len())
            .max()
            .unwrap_or(6)
            .max("Amount".len());

        out.push_str(&format!(
            "  {:<10}  {:<10}  {:<name_width$}  {:>amount_width$}\n",
            "Booked", "Value", "Counterparty", "Amount",
        ));
        out.push_str(&format!(
            "  {}\n",
            "-".repeat(10 + 2 + 10 + 2 + name_width + 2 + amount_width)
        ));

        for tx in &parsed.transactions {
            out.push_str(&format!(
                "  {:<10}  {:<10}  {:<name_width$}  {:>amount_width$}\n",
                tx.booking_date, tx.value_date, tx.counterparty_name, tx.amount,
            ));
        }
        out.push('\n');

        let net = parsed
            .transactions
            .iter()
            .map(|t| t.amount_value())
            .sum::<Result<rust_decimal::Decimal, _>>();
        match net {
            Ok(net) => out.push_str(&format!("  Net movement: {}\n", net)),
            Err(e) => out.push_str(&format!("  Net movement: unavailable ({})\n", e)),
        }
    }

    match &parsed.balance {
        Some(balance) => out.push_str(&format!("  Balance: {}\n", balance.amount)),
        None => out.push_str("  Balance: not found\n"),
    }

    out
}
