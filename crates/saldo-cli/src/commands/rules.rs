use saldo_core::error::SaldoError;
use saldo_core::rules::builtin;
use saldo_core::rules::schema::RuleTableDef;
use std::path::Path;

pub fn list() -> Result<(), SaldoError> {
    println!("Available built-in rule tables:\n");
    for name in builtin::PRESETS {
        let def = builtin::load_preset(name)?;
        let default_marker = if *name == builtin::DEFAULT_PRESET {
            " [default]"
        } else {
            ""
        };
        println!("  {:<8} {} (v{}){}", name, def.name, def.version, default_marker);
        if let Some(ref desc) = def.description {
            println!("           {}", desc);
        }
        println!("           Balance markers: {}", locales(&def));
        println!();
    }
    Ok(())
}

pub fn show(preset: &str) -> Result<(), SaldoError> {
    let def = builtin::load_preset(preset)?;
    println!("{}", serde_json::to_string_pretty(&def)?);
    Ok(())
}

pub fn schema() -> Result<(), SaldoError> {
    print!(
        r#"JSON Rule Table Schema
======================

A rule table tells the parser how one bank words and formats its
statements. Transactions are anchored on lines holding only an amount;
dates and the counterparty are searched in the lines above it.

Top-level fields:
  name                (string, required)  Human-readable name
  description         (string, optional)  What statements this table reads
  version             (string, required)  Version identifier (e.g., "2025.1")
  date_pattern        (regex, required)   Finds a date anywhere in a line.
  amount              (object, required)  Amount grammar (see below)
  page_number_pattern (regex, required)   Counterparty lines matching this are
                                          page numbers ("1 / 3"), not names.
  value_date_marker   (string, required)  Phrase of the value date line
                                          (case-sensitive).
  balance_markers     (object, required)  Locale -> phrases. The line after
                                          a phrase holds the closing balance.
                                          Case-insensitive.
  language_markers    (object, optional)  Locale -> phrases identifying the
                                          statement language.
  default_language    (string, optional)  Locale when no marker matches.
                                          Default: "en"
  counterparty_skip   (array, optional)   Substrings that disqualify a line
                                          as counterparty (case-sensitive).
  rejection_phrases   (array, optional)   Substrings that reject a block
                                          whose counterparty contains them
                                          (case-insensitive).
  windows             (object, optional)  Window sizes, in lines (see below)

The "amount" object:
  pattern             (regex, required)   Amount anywhere in a line; used for
                                          the balance and to skip amount lines.
  candidate_pattern   (regex, required)   Whole line that is a transaction
                                          amount. Anchor it with ^ and $.
  currency_symbol     (string, optional)  Glyph stripped from amounts.

The "windows" object (every field optional):
  date_lookback         (default 10)  Lines above the amount searched for dates
  counterparty_lookback (default 8)   Lines above the amount searched for the
                                      counterparty; the line directly above
                                      the amount is never used.
  max_date_line_len     (default 20)  Booking date lines are shorter (bytes)
  min_counterparty_len  (default 3)   Shorter names are ignored (bytes)

Example:
{{
  "name": "My bank",
  "version": "1.0",
  "date_pattern": "[0-9]{{2}}/[0-9]{{2}}/[0-9]{{4}}",
  "amount": {{
    "pattern": "[+-]?[0-9]+\\.[0-9]{{2}}",
    "candidate_pattern": "^[+-]?[0-9]+\\.[0-9]{{2}}$"
  }},
  "page_number_pattern": "^Page [0-9]+$",
  "value_date_marker": "Value date",
  "balance_markers": {{ "en": ["Closing balance"] }},
  "rejection_phrases": ["Balance"]
}}

Use `saldo rules show n26` for a complete table.
"#
    );
    Ok(())
}

pub fn validate(file: &Path) -> Result<(), SaldoError> {
    let def = saldo_core::rules::load_rules(file)?;
    saldo_core::rules::StatementRules::compile(&def)?;

    println!("Rule table '{}' (v{}) is valid.", def.name, def.version);
    println!("  Balance markers: {}", locales(&def));
    println!(
        "  Windows: dates {} lines, counterparty {} lines",
        def.windows.date_lookback, def.windows.counterparty_lookback
    );

    // Check for potential issues (warnings, not errors)
    let mut warnings = Vec::new();
    if !def.amount.candidate_pattern.starts_with('^') || !def.amount.candidate_pattern.ends_with('$') {
        warnings.push("amount.candidate_pattern is not anchored with ^...$".to_string());
    }
    if def.rejection_phrases.is_empty() {
        warnings.push("no rejection_phrases: balance rows may parse as transactions".to_string());
    }
    if def.windows.counterparty_lookback < 2 {
        warnings.push("counterparty_lookback below 2 never finds a counterparty".to_string());
    }

    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in &warnings {
            println!("  - {}", w);
        }
    }

    Ok(())
}

fn locales(def: &RuleTableDef) -> String {
    def.balance_markers
        .iter()
        .map(|(locale, phrases)| format!("{} ({})", locale, phrases.join(", ")))
        .collect::<Vec<_>>()
        .join("; ")
}
