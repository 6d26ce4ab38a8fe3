pub mod pdftotext;

use crate::error::SaldoError;

/// Text extracted from a single page of a PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContent {
    /// 1-based page number.
    pub page_number: usize,
    pub text: String,
}

/// Trait for PDF text extraction backends.
pub trait TextExtractor: Send + Sync {
    /// Extract text from PDF bytes, returning one PageContent per page in page order.
    ///
    /// Extraction is all-or-nothing: a failure on any page discards the pages
    /// already extracted.
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageContent>, SaldoError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Extract the full text of a PDF: every page's text, joined by a single newline.
pub fn extract_text(pdf_bytes: &[u8], extractor: &dyn TextExtractor) -> Result<String, SaldoError> {
    let pages = extractor.extract_pages(pdf_bytes)?;
    tracing::info!(
        backend = extractor.backend_name(),
        pages = pages.len(),
        "extracted statement text"
    );
    Ok(join_pages(&pages))
}

/// Concatenate page texts in page order, separated by `\n`.
pub fn join_pages(pages: &[PageContent]) -> String {
    pages
        .iter()
        .map(|p| p.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedExtractor;

    impl TextExtractor for FixedExtractor {
        fn extract_pages(&self, _pdf_bytes: &[u8]) -> Result<Vec<PageContent>, SaldoError> {
            Ok(vec![
                PageContent {
                    page_number: 1,
                    text: "first".into(),
                },
                PageContent {
                    page_number: 2,
                    text: "second".into(),
                },
            ])
        }

        fn backend_name(&self) -> &str {
            "fixed"
        }
    }

    struct FailingExtractor;

    impl TextExtractor for FailingExtractor {
        fn extract_pages(&self, _pdf_bytes: &[u8]) -> Result<Vec<PageContent>, SaldoError> {
            Err(SaldoError::PageExtraction {
                page: 2,
                reason: "broken content stream".into(),
            })
        }

        fn backend_name(&self) -> &str {
            "failing"
        }
    }

    #[test]
    fn test_pages_joined_with_newline() {
        let text = extract_text(&[], &FixedExtractor).unwrap();
        assert_eq!(text, "first\nsecond");
    }

    #[test]
    fn test_no_pages_is_empty_text() {
        assert_eq!(join_pages(&[]), "");
    }

    #[test]
    fn test_page_failure_discards_text() {
        let err = extract_text(&[], &FailingExtractor).unwrap_err();
        assert!(matches!(err, SaldoError::PageExtraction { page: 2, .. }));
    }
}
