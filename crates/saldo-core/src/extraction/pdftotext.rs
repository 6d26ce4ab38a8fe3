use crate::error::SaldoError;
use crate::extraction::{PageContent, TextExtractor};
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output};

/// PDF extraction backend using pdfinfo and pdftotext (from poppler-utils).
///
/// Pages are extracted one at a time so a failure can be attributed to the
/// page that caused it.
pub struct PdftotextExtractor {
    layout: bool,
}

impl PdftotextExtractor {
    pub fn new() -> Self {
        PdftotextExtractor { layout: false }
    }

    /// Use `pdftotext -layout` instead of reading-order output.
    pub fn with_layout(mut self, layout: bool) -> Self {
        self.layout = layout;
        self
    }

    /// Check if both pdfinfo and pdftotext are installed.
    pub fn is_available() -> bool {
        ["pdfinfo", "pdftotext"].iter().all(|tool| {
            Command::new(tool)
                .arg("-v")
                .output()
                .map(|o| o.status.success() || !o.stderr.is_empty())
                .unwrap_or(false)
        })
    }

    /// Open a document: copy the bytes to a temp file and read its page count.
    pub fn open(&self, pdf_bytes: &[u8]) -> Result<PdfDocument, SaldoError> {
        let mut file = tempfile::Builder::new()
            .suffix(".pdf")
            .tempfile()
            .map_err(|e| SaldoError::DocumentOpen(e.to_string()))?;
        file.write_all(pdf_bytes)
            .and_then(|_| file.flush())
            .map_err(|e| SaldoError::DocumentOpen(e.to_string()))?;

        let output = run_tool(Command::new("pdfinfo").arg(file.path()), "pdfinfo")
            .map_err(|e| match e {
                SaldoError::ToolNotFound { .. } => e,
                other => SaldoError::DocumentOpen(other.to_string()),
            })?;
        if !output.status.success() {
            return Err(SaldoError::DocumentOpen(failure_reason(&output)));
        }

        let info = String::from_utf8_lossy(&output.stdout);
        let page_count = parse_page_count(&info).ok_or_else(|| {
            SaldoError::DocumentOpen("pdfinfo did not report a page count".into())
        })?;

        Ok(PdfDocument { file, page_count })
    }

    /// Extract the text of a single 1-based page.
    pub fn extract_page(&self, doc: &PdfDocument, page: usize) -> Result<String, SaldoError> {
        let page_arg = page.to_string();
        let mut cmd = Command::new("pdftotext");
        if self.layout {
            cmd.arg("-layout");
        }
        cmd.args(["-enc", "UTF-8", "-f", &page_arg, "-l", &page_arg])
            .arg(doc.path())
            .arg("-"); // output to stdout

        let output = run_tool(&mut cmd, "pdftotext").map_err(|e| match e {
            SaldoError::ToolNotFound { .. } => e,
            other => SaldoError::PageExtraction {
                page,
                reason: other.to_string(),
            },
        })?;

        if !output.status.success() {
            return Err(SaldoError::PageExtraction {
                page,
                reason: failure_reason(&output),
            });
        }

        Ok(strip_page_separator(&String::from_utf8_lossy(&output.stdout)).to_string())
    }

    fn extract_all(&self, doc: &PdfDocument) -> Result<Vec<PageContent>, SaldoError> {
        (1..=doc.page_count())
            .map(|page_number| {
                let text = self.extract_page(doc, page_number)?;
                tracing::debug!(page = page_number, bytes = text.len(), "extracted page");
                Ok(PageContent { page_number, text })
            })
            .collect()
    }
}

impl Default for PdftotextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor for PdftotextExtractor {
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageContent>, SaldoError> {
        let doc = self.open(pdf_bytes)?;
        let pages = self.extract_all(&doc);
        let closed = doc.close();
        let pages = pages?;
        closed?;
        Ok(pages)
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}

/// An opened PDF document backed by a temporary file.
///
/// Release it with [`PdfDocument::close`]; dropping the handle also removes
/// the file, but without reporting errors.
#[derive(Debug)]
pub struct PdfDocument {
    file: tempfile::NamedTempFile,
    page_count: usize,
}

impl PdfDocument {
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Release the document's resources.
    pub fn close(self) -> Result<(), SaldoError> {
        self.file.close()?;
        Ok(())
    }
}

fn run_tool(cmd: &mut Command, tool: &str) -> Result<Output, SaldoError> {
    cmd.output().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SaldoError::ToolNotFound { tool: tool.into() }
        } else {
            SaldoError::Io(e)
        }
    })
}

fn failure_reason(output: &Output) -> String {
    let code = output.status.code().unwrap_or(-1);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("exit code {}: {}", code, stderr.trim())
}

/// Read the `Pages:` line of pdfinfo output.
fn parse_page_count(info: &str) -> Option<usize> {
    info.lines()
        .find_map(|line| line.strip_prefix("Pages:"))
        .and_then(|rest| rest.trim().parse().ok())
}

/// pdftotext terminates every page with a form feed.
fn strip_page_separator(text: &str) -> &str {
    text.strip_suffix('\x0c').unwrap_or(text)
}
