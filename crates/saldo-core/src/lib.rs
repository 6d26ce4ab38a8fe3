pub mod digest;
pub mod error;
pub mod extraction;
pub mod model;
pub mod parsing;
pub mod rules;
pub mod state;

use error::SaldoError;
use extraction::TextExtractor;
use model::ParsedStatement;
use rules::StatementRules;

pub use extraction::extract_text;
pub use parsing::{parse_balance, parse_text, parse_transactions};

/// Main API entry point: extract a statement PDF and parse it.
///
/// Extraction failures abort; a missing balance does not (it is `None` in
/// the result), and a statement without transactions parses to an empty list.
pub fn parse_pdf(
    pdf_bytes: &[u8],
    extractor: &dyn TextExtractor,
    rules: &StatementRules,
) -> Result<ParsedStatement, SaldoError> {
    let text = extract_text(pdf_bytes, extractor)?;
    tracing::debug!(chars = text.chars().count(), "statement text extracted");
    Ok(parse_text(&text, rules))
}
