use saldo_core::error::SaldoError;
use saldo_core::model::ParsedStatement;
use std::path::Path;

pub fn print(parsed: &ParsedStatement) -> Result<(), SaldoError> {
    let json = serde_json::to_string_pretty(parsed)?;
    println!("{json}");
    Ok(())
}

pub fn write(parsed: &ParsedStatement, path: &Path) -> Result<(), SaldoError> {
    let json = serde_json::to_string_pretty(parsed)?;
    std::fs::write(path, json)?;
    Ok(())
}
