use crate::error::SaldoError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Persistent state shared between runs: which statements were already
/// notified, and the last authenticated session.
pub trait StateStore {
    fn is_notified(&self, key: &str) -> Result<bool, SaldoError>;

    fn mark_notified(&mut self, keys: &[String]) -> Result<(), SaldoError>;

    /// The last saved session credentials, if any.
    fn session(&self) -> Result<Option<String>, SaldoError>;

    fn save_session(&mut self, value: &str) -> Result<(), SaldoError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub value: String,
    pub saved_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredState {
    #[serde(default)]
    pub session: Option<StoredSession>,
    #[serde(default)]
    pub notified: BTreeSet<String>,
}

/// State store backed by a single JSON file.
///
/// Every mutation rewrites the file through a temp file in the same directory,
/// so a crash never leaves a half-written state behind.
#[derive(Debug)]
pub struct JsonStateStore {
    path: PathBuf,
    state: StoredState,
}

impl JsonStateStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: &Path) -> Result<Self, SaldoError> {
        let state = match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                SaldoError::Store(format!("corrupt state file {}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "state file missing, starting empty");
                StoredState::default()
            }
            Err(e) => return Err(SaldoError::Io(e)),
        };

        Ok(JsonStateStore {
            path: path.to_path_buf(),
            state,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> &StoredState {
        &self.state
    }

    /// Write `state` to disk and adopt it only once the write succeeded.
    fn commit(&mut self, state: StoredState) -> Result<(), SaldoError> {
        self.persist(&state)?;
        self.state = state;
        Ok(())
    }

    fn persist(&self, state: &StoredState) -> Result<(), SaldoError> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, state)?;
        tmp.write_all(b"\n")?;
        tmp.persist(&self.path).map_err(|e| SaldoError::Io(e.error))?;
        Ok(())
    }
}

impl StateStore for JsonStateStore {
    fn is_notified(&self, key: &str) -> Result<bool, SaldoError> {
        Ok(self.state.notified.contains(key))
    }

    fn mark_notified(&mut self, keys: &[String]) -> Result<(), SaldoError> {
        if keys.is_empty() {
            return Ok(());
        }
        let mut next = self.state.clone();
        next.notified.extend(keys.iter().cloned());
        self.commit(next)
    }

    fn session(&self) -> Result<Option<String>, SaldoError> {
        Ok(self.state.session.as_ref().map(|s| s.value.clone()))
    }

    fn save_session(&mut self, value: &str) -> Result<(), SaldoError> {
        let mut next = self.state.clone();
        next.session = Some(StoredSession {
            value: value.to_string(),
            saved_at: Utc::now(),
        });
        self.commit(next)
    }
}
