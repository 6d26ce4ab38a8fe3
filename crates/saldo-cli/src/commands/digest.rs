use chrono::Utc;
use saldo_core::digest::{deliver_digest, DigestOptions, DigestOutcome, Notifier, WebhookPayload};
use saldo_core::error::SaldoError;
use saldo_core::state::JsonStateStore;
use std::path::{Path, PathBuf};

use crate::commands;
use crate::{ExtractionArgs, RulesArgs};

/// Emits the payload JSON instead of posting it: stdout, or a file.
struct JsonNotifier {
    target: Option<PathBuf>,
}

impl Notifier for JsonNotifier {
    fn notify(&self, payload: &WebhookPayload) -> Result<(), SaldoError> {
        let json = serde_json::to_string_pretty(payload)?;
        match &self.target {
            Some(path) => std::fs::write(path, json)
                .map_err(|e| SaldoError::Notify(format!("{}: {}", path.display(), e))),
            None => {
                println!("{json}");
                Ok(())
            }
        }
    }
}

pub fn run(
    input_file: &Path,
    state_file: &Path,
    rules_args: &RulesArgs,
    extraction: &ExtractionArgs,
    payload_out: Option<PathBuf>,
    currency: String,
    max_embedded: usize,
) -> Result<(), SaldoError> {
    let rules = commands::load_rules(rules_args)?;
    let parsed = commands::read_statement(input_file, &rules, extraction)?;

    let mut store = JsonStateStore::open(state_file)?;
    let notifier = JsonNotifier {
        target: payload_out.clone(),
    };
    let options = DigestOptions {
        currency,
        max_embedded,
        ..DigestOptions::default()
    };

    match deliver_digest(&parsed, &mut store, &notifier, &options, Utc::now())? {
        DigestOutcome::NothingNew { total } => {
            eprintln!("No new transactions ({total} already notified)");
        }
        DigestOutcome::Delivered { new, total } => {
            eprintln!("{new} new of {total} transaction(s)");
            if let Some(path) = payload_out {
                eprintln!("  payload written to {}", path.display());
            }
        }
    }

    Ok(())
}
