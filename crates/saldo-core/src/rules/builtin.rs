use crate::error::SaldoError;
use crate::rules::schema::RuleTableDef;
use crate::rules::StatementRules;

const N26_JSON: &str = include_str!("../../../../rules/n26.json");

/// Available predefined rule tables.
pub const PRESETS: &[&str] = &["n26"];

/// Preset used when none is given.
pub const DEFAULT_PRESET: &str = "n26";

/// Load a predefined rule table by name.
pub fn load_preset(name: &str) -> Result<RuleTableDef, SaldoError> {
    match name {
        "n26" => {
            let def: RuleTableDef = serde_json::from_str(N26_JSON)?;
            Ok(def)
        }
        _ => Err(SaldoError::RulesInvalid(format!(
            "unknown preset '{}'. Available: {}",
            name,
            PRESETS.join(", ")
        ))),
    }
}

/// Load and compile a predefined rule table.
pub fn compiled_preset(name: &str) -> Result<StatementRules, SaldoError> {
    StatementRules::compile(&load_preset(name)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_n26_preset() {
        let def = load_preset("n26").unwrap();
        assert_eq!(def.name, "N26");
        assert_eq!(def.value_date_marker, "Fecha de valor");
        assert_eq!(def.balance_markers["es"], vec!["Tu nuevo saldo"]);
        assert_eq!(def.balance_markers["en"], vec!["Your new balance"]);
        assert_eq!(def.counterparty_skip.len(), 11);
        assert_eq!(def.rejection_phrases.len(), 8);
    }

    #[test]
    fn test_n26_preset_compiles() {
        let rules = compiled_preset("n26").unwrap();
        assert_eq!(rules.windows().date_lookback, 10);
        assert_eq!(rules.windows().counterparty_lookback, 8);
    }

    #[test]
    fn test_unknown_preset() {
        assert!(load_preset("xyz").is_err());
    }
}
