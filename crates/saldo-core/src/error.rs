use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SaldoError {
    #[error("failed to open PDF document: {0}")]
    DocumentOpen(String),

    #[error("failed to extract text from page {page}: {reason}")]
    PageExtraction { page: usize, reason: String },

    #[error("{tool} not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    ToolNotFound { tool: String },

    #[error("balance not found in statement text")]
    BalanceNotFound,

    #[error("statement has no transaction data")]
    NoTransactions,

    #[error("invalid amount '{0}'")]
    InvalidAmount(String),

    #[error("failed to load rule table from {path}: {reason}")]
    RulesLoad { path: PathBuf, reason: String },

    #[error("invalid rule table: {0}")]
    RulesInvalid(String),

    #[error("state store error: {0}")]
    Store(String),

    #[error("notification failed: {0}")]
    Notify(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
