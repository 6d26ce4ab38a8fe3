use saldo_core::error::SaldoError;
use saldo_core::state::{JsonStateStore, StateStore};
use std::path::Path;

pub fn show(state_file: &Path) -> Result<(), SaldoError> {
    let store = JsonStateStore::open(state_file)?;
    let state = store.state();

    println!("State file: {}\n", store.path().display());
    match &state.session {
        Some(session) => println!("  Session saved at {}", session.saved_at.to_rfc3339()),
        None => println!("  No session stored"),
    }

    println!("  Notified transactions: {}", state.notified.len());
    for key in &state.notified {
        println!("    {}", key);
    }

    Ok(())
}

pub fn set_session(state_file: &Path, value: &str) -> Result<(), SaldoError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(SaldoError::Store("session value is empty".into()));
    }

    let mut store = JsonStateStore::open(state_file)?;
    store.save_session(value)?;
    println!("Session stored in {}", store.path().display());
    Ok(())
}
