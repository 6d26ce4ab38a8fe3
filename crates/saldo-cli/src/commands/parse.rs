use saldo_core::error::SaldoError;
use saldo_core::model::sort_chronological;
use std::path::{Path, PathBuf};

use crate::commands;
use crate::output::{self, OutputFormat};
use crate::{ExtractionArgs, RulesArgs};

pub fn run(
    input_file: &Path,
    rules_args: &RulesArgs,
    extraction: &ExtractionArgs,
    output_format: OutputFormat,
    output_file: Option<PathBuf>,
    chronological: bool,
) -> Result<(), SaldoError> {
    let rules = commands::load_rules(rules_args)?;
    let mut parsed = commands::read_statement(input_file, &rules, extraction)?;
    if chronological {
        sort_chronological(&mut parsed.transactions);
    }

    match output_file {
        Some(path) => {
            // Always write JSON when saving to file
            output::json::write(&parsed, &path)?;
            eprintln!(
                "Parsed {} transaction(s), written to {}",
                parsed.transactions.len(),
                path.display()
            );
            if parsed.balance.is_none() {
                eprintln!("  warning: no closing balance found");
            }
        }
        None => match output_format {
            OutputFormat::Json => output::json::print(&parsed)?,
            OutputFormat::Table => println!("{}", output::table::format_parsed(&parsed)),
        },
    }

    Ok(())
}
