use saldo_core::error::SaldoError;
use saldo_core::extraction::pdftotext::PdftotextExtractor;
use std::path::Path;

use crate::ExtractionArgs;

pub fn run(pdf_file: &Path, extraction: &ExtractionArgs) -> Result<(), SaldoError> {
    let pdf_bytes = std::fs::read(pdf_file)?;
    let extractor = PdftotextExtractor::new().with_layout(extraction.layout);
    let text = saldo_core::extract_text(&pdf_bytes, &extractor)?;
    println!("{text}");
    Ok(())
}
