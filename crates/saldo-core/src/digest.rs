//! Deduplication of parsed transactions and the notification payload built from them.

use crate::error::SaldoError;
use crate::model::{AccountBalance, ParsedStatement, TransactionRecord};
use crate::state::StateStore;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Shown in place of the balance when the statement has none.
pub const MISSING_BALANCE: &str = "N/A";

pub const DEFAULT_MAX_EMBEDDED: usize = 10;

const EMBED_COLOR: u32 = 0x00FF00;

/// Identity of a transaction across runs.
pub fn statement_key(tx: &TransactionRecord) -> String {
    format!(
        "{}|{}|{}",
        tx.booking_date, tx.counterparty_name, tx.amount
    )
}

/// A transaction that has not been notified yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingStatement {
    pub key: String,
    pub date: String,
    pub partner: String,
    pub amount: String,
}

impl From<&TransactionRecord> for PendingStatement {
    fn from(tx: &TransactionRecord) -> Self {
        PendingStatement {
            key: statement_key(tx),
            date: tx.booking_date.clone(),
            partner: tx.counterparty_name.clone(),
            amount: tx.amount.clone(),
        }
    }
}

/// Keep the transactions whose key the store has not seen, in statement order.
///
/// If the store cannot answer for a key, the transaction counts as new.
pub fn select_new(
    transactions: &[TransactionRecord],
    store: &dyn StateStore,
) -> Vec<PendingStatement> {
    transactions
        .iter()
        .map(PendingStatement::from)
        .filter(|pending| match store.is_notified(&pending.key) {
            Ok(notified) => !notified,
            Err(e) => {
                tracing::warn!(key = %pending.key, error = %e, "failed to check notified state");
                true
            }
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct DigestOptions {
    pub title: String,
    /// Currency code appended to amounts ("EUR").
    pub currency: String,
    /// Lines listed in the embed before the remainder is summarized.
    pub max_embedded: usize,
}

impl Default for DigestOptions {
    fn default() -> Self {
        DigestOptions {
            title: "✅ Statement Movements".into(),
            currency: "EUR".into(),
            max_embedded: DEFAULT_MAX_EMBEDDED,
        }
    }
}

/// Webhook message body (Discord-compatible).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookPayload {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub inline: bool,
}

impl EmbedField {
    fn new(name: &str, value: String, inline: bool) -> Self {
        EmbedField {
            name: name.into(),
            value,
            inline,
        }
    }
}

/// `**date** | partner | `amount CUR``
pub fn format_line(stmt: &PendingStatement, currency: &str) -> String {
    format!(
        "**{}** | {} | `{} {}`",
        stmt.date, stmt.partner, stmt.amount, currency
    )
}

/// Build the notification for `new` transactions out of `total` parsed ones.
pub fn build_payload(
    new: &[PendingStatement],
    total: usize,
    balance: Option<&AccountBalance>,
    options: &DigestOptions,
    timestamp: DateTime<Utc>,
) -> WebhookPayload {
    let balance = balance.map_or(MISSING_BALANCE, |b| b.amount.as_str());

    let shown = new.len().min(options.max_embedded);
    let mut listing = String::new();
    for stmt in &new[..shown] {
        listing.push_str(&format_line(stmt, &options.currency));
        listing.push('\n');
    }
    if new.len() > shown {
        listing.push_str(&format!(
            "\n_... and {} more new transactions_",
            new.len() - shown
        ));
    }

    let content = new
        .iter()
        .map(|stmt| format_line(stmt, &options.currency))
        .collect::<Vec<_>>()
        .join("\n\n");

    WebhookPayload {
        content,
        embeds: vec![Embed {
            title: options.title.clone(),
            description: String::new(),
            color: EMBED_COLOR,
            fields: vec![
                EmbedField::new("New Transactions", new.len().to_string(), true),
                EmbedField::new("Total Transactions", total.to_string(), true),
                EmbedField::new(
                    "Account Balance",
                    format!("{} {}", balance, options.currency),
                    true,
                ),
                EmbedField::new("Transactions", listing, false),
            ],
            timestamp: Some(timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)),
        }],
    }
}

/// Delivery channel for digests (webhook, chat, stdout...).
pub trait Notifier {
    fn notify(&self, payload: &WebhookPayload) -> Result<(), SaldoError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestOutcome {
    /// Every transaction was already notified; nothing was sent.
    NothingNew { total: usize },
    Delivered { new: usize, total: usize },
}

/// Notify about the statement's new transactions and remember them.
///
/// An empty statement is an error: a statement period without movements is
/// indistinguishable from a parser that stopped recognizing the layout.
pub fn deliver_digest(
    statement: &ParsedStatement,
    store: &mut dyn StateStore,
    notifier: &dyn Notifier,
    options: &DigestOptions,
    now: DateTime<Utc>,
) -> Result<DigestOutcome, SaldoError> {
    let total = statement.transactions.len();
    if total == 0 {
        return Err(SaldoError::NoTransactions);
    }

    let new = select_new(&statement.transactions, &*store);
    if new.is_empty() {
        tracing::info!(total, "no new statements to notify");
        return Ok(DigestOutcome::NothingNew { total });
    }

    tracing::info!(new = new.len(), total, "notifying new statements");
    let payload = build_payload(&new, total, statement.balance.as_ref(), options, now);
    notifier.notify(&payload)?;

    let keys: Vec<String> = new.iter().map(|s| s.key.clone()).collect();
    if let Err(e) = store.mark_notified(&keys) {
        // the notification already went out
        tracing::warn!(error = %e, "failed to mark statements as notified");
    }

    Ok(DigestOutcome::Delivered {
        new: new.len(),
        total,
    })
}
