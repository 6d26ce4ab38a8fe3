pub mod builtin;
pub mod schema;

use crate::error::SaldoError;
use regex::Regex;
use schema::{RuleTableDef, WindowDef};
use std::path::Path;

/// Load a rule table from a JSON file.
pub fn load_rules(path: &Path) -> Result<RuleTableDef, SaldoError> {
    let content = std::fs::read_to_string(path).map_err(|e| SaldoError::RulesLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_rules(&content, path)
}

/// Parse a rule table from a JSON string.
pub fn parse_rules(json: &str, source: &Path) -> Result<RuleTableDef, SaldoError> {
    let def: RuleTableDef = serde_json::from_str(json).map_err(|e| SaldoError::RulesLoad {
        path: source.to_path_buf(),
        reason: e.to_string(),
    })?;
    validate_rules(&def)?;
    Ok(def)
}

/// Parse a rule table from a JSON string (no file path context).
pub fn parse_rules_str(json: &str) -> Result<RuleTableDef, SaldoError> {
    let def: RuleTableDef = serde_json::from_str(json).map_err(SaldoError::Json)?;
    validate_rules(&def)?;
    Ok(def)
}

/// Validate that a rule table is well-formed, including that its patterns compile.
pub fn validate_rules(def: &RuleTableDef) -> Result<(), SaldoError> {
    if def.name.trim().is_empty() {
        return Err(SaldoError::RulesInvalid("name must not be empty".into()));
    }

    compile_pattern("date_pattern", &def.date_pattern)?;
    compile_pattern("amount.pattern", &def.amount.pattern)?;
    compile_pattern("amount.candidate_pattern", &def.amount.candidate_pattern)?;
    compile_pattern("page_number_pattern", &def.page_number_pattern)?;

    if def.value_date_marker.is_empty() {
        return Err(SaldoError::RulesInvalid(
            "value_date_marker must not be empty".into(),
        ));
    }

    if def.balance_markers.values().all(|phrases| phrases.is_empty()) {
        return Err(SaldoError::RulesInvalid(
            "balance_markers must define at least one phrase".into(),
        ));
    }

    for (field, locales) in [
        ("balance_markers", &def.balance_markers),
        ("language_markers", &def.language_markers),
    ] {
        for (locale, phrases) in locales {
            if phrases.iter().any(|p| p.trim().is_empty()) {
                return Err(SaldoError::RulesInvalid(format!(
                    "{} for locale '{}' contains an empty phrase",
                    field, locale
                )));
            }
        }
    }

    for (field, phrases) in [
        ("counterparty_skip", &def.counterparty_skip),
        ("rejection_phrases", &def.rejection_phrases),
    ] {
        if phrases.iter().any(|p| p.is_empty()) {
            return Err(SaldoError::RulesInvalid(format!(
                "{} contains an empty phrase",
                field
            )));
        }
    }

    let w = &def.windows;
    if w.date_lookback == 0 || w.counterparty_lookback == 0 {
        return Err(SaldoError::RulesInvalid(
            "windows.date_lookback and windows.counterparty_lookback must be positive".into(),
        ));
    }

    Ok(())
}

fn compile_pattern(field: &str, pattern: &str) -> Result<Regex, SaldoError> {
    if pattern.is_empty() {
        return Err(SaldoError::RulesInvalid(format!("{} must not be empty", field)));
    }
    Regex::new(pattern)
        .map_err(|e| SaldoError::RulesInvalid(format!("{} is not a valid regex: {}", field, e)))
}

/// A validated rule table with its patterns compiled, ready for the parser.
#[derive(Debug, Clone)]
pub struct StatementRules {
    pub name: String,
    pub(crate) date: Regex,
    pub(crate) amount: Regex,
    pub(crate) amount_candidate: Regex,
    pub(crate) page_number: Regex,
    pub(crate) currency_symbol: Option<String>,
    pub(crate) value_date_marker: String,
    /// Lowercased.
    pub(crate) balance_markers: Vec<String>,
    pub(crate) language_markers: Vec<(String, Vec<String>)>,
    pub(crate) default_language: String,
    pub(crate) counterparty_skip: Vec<String>,
    /// Lowercased.
    pub(crate) rejection_phrases: Vec<String>,
    pub(crate) windows: WindowDef,
}

impl StatementRules {
    pub fn compile(def: &RuleTableDef) -> Result<Self, SaldoError> {
        validate_rules(def)?;

        Ok(StatementRules {
            name: def.name.clone(),
            date: compile_pattern("date_pattern", &def.date_pattern)?,
            amount: compile_pattern("amount.pattern", &def.amount.pattern)?,
            amount_candidate: compile_pattern(
                "amount.candidate_pattern",
                &def.amount.candidate_pattern,
            )?,
            page_number: compile_pattern("page_number_pattern", &def.page_number_pattern)?,
            currency_symbol: def
                .amount
                .currency_symbol
                .clone()
                .filter(|s| !s.is_empty()),
            value_date_marker: def.value_date_marker.clone(),
            balance_markers: def
                .balance_markers
                .values()
                .flatten()
                .map(|p| p.to_lowercase())
                .collect(),
            language_markers: def
                .language_markers
                .iter()
                .map(|(locale, phrases)| (locale.clone(), phrases.clone()))
                .collect(),
            default_language: def.default_language.clone(),
            counterparty_skip: def.counterparty_skip.clone(),
            rejection_phrases: def
                .rejection_phrases
                .iter()
                .map(|p| p.to_lowercase())
                .collect(),
            windows: def.windows.clone(),
        })
    }

    pub fn windows(&self) -> &WindowDef {
        &self.windows
    }
}
