pub mod digest;
pub mod parse;
pub mod rules;
pub mod state;
pub mod text;

use crate::{ExtractionArgs, RulesArgs};
use saldo_core::error::SaldoError;
use saldo_core::extraction::pdftotext::PdftotextExtractor;
use saldo_core::model::ParsedStatement;
use saldo_core::rules::builtin;
use saldo_core::rules::StatementRules;
use std::path::Path;

/// Compile the rule table chosen on the command line, the default preset otherwise.
pub fn load_rules(args: &RulesArgs) -> Result<StatementRules, SaldoError> {
    match (&args.rules, &args.preset) {
        (Some(path), _) => {
            let def = saldo_core::rules::load_rules(path)?;
            StatementRules::compile(&def)
        }
        (None, Some(name)) => builtin::compiled_preset(name),
        (None, None) => builtin::compiled_preset(builtin::DEFAULT_PRESET),
    }
}

/// Parse a statement PDF, or a `.txt` file holding text extracted earlier.
pub fn read_statement(
    path: &Path,
    rules: &StatementRules,
    extraction: &ExtractionArgs,
) -> Result<ParsedStatement, SaldoError> {
    let is_text = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("txt"))
        .unwrap_or(false);

    if is_text {
        let text = std::fs::read_to_string(path)?;
        Ok(saldo_core::parse_text(&text, rules))
    } else {
        let pdf_bytes = std::fs::read(path)?;
        let extractor = PdftotextExtractor::new().with_layout(extraction.layout);
        saldo_core::parse_pdf(&pdf_bytes, &extractor, rules)
    }
}
