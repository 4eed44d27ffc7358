// * Config Store - single JSON document holding settings plus the cached panel session
// * The document is read once per run and rewritten in full at most once (after a login)

use crate::config::settings::{ConfigError, Settings};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Config file {path} is not accessible: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config file {path} could not be parsed: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Config file {0} does not contain a JSON object")]
    NotAnObject(PathBuf),

    #[error("Failed to serialize config document: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// File-backed store for [`Settings`] and the panel cookie jar.
///
/// Concurrent runs sharing one file race on [`persist_session`](Self::persist_session):
/// both read, both write, last writer wins. Nothing here locks the file.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reads and validates the document. No side effects beyond the read.
    pub fn load(&self) -> Result<Settings, ConfigError> {
        info!(path = %self.path.display(), "Loading config");

        let raw = std::fs::read_to_string(&self.path).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })?;
        let settings = Settings::from_json(&raw, &self.path)?;

        debug!(settings = ?settings, "Config loaded");
        Ok(settings)
    }

    /// Merges `cookies` and `timestamp` into the existing document and writes it back.
    ///
    /// Every other key, known or not, is carried over untouched.
    pub fn persist_session(
        &self,
        cookies: &BTreeMap<String, String>,
        timestamp: f64,
    ) -> Result<(), PersistenceError> {
        let raw = std::fs::read_to_string(&self.path).map_err(|source| PersistenceError::Io {
            path: self.path.clone(),
            source,
        })?;
        let mut doc: Map<String, Value> = match serde_json::from_str(&raw) {
            Ok(Value::Object(map)) => map,
            Ok(_) => return Err(PersistenceError::NotAnObject(self.path.clone())),
            Err(source) => {
                return Err(PersistenceError::Parse {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let jar = cookies
            .iter()
            .map(|(name, value)| (name.clone(), Value::String(value.clone())))
            .collect::<Map<_, _>>();
        doc.insert("cookies".to_string(), Value::Object(jar));
        doc.insert("cookie_timestamp".to_string(), Value::from(timestamp));

        let rendered = render_document(&Value::Object(doc))?;
        std::fs::write(&self.path, rendered).map_err(|source| PersistenceError::Io {
            path: self.path.clone(),
            source,
        })?;

        info!(
            path = %self.path.display(),
            cookie_count = cookies.len(),
            "Session cookies saved"
        );
        Ok(())
    }
}

// * 4-space indent, non-ASCII written as-is
fn render_document(doc: &Value) -> Result<Vec<u8>, PersistenceError> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    doc.serialize(&mut serializer)
        .map_err(PersistenceError::Serialize)?;
    out.push(b'\n');
    Ok(out)
}

/// Current wall-clock time as fractional epoch seconds.
pub fn now_epoch_secs() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
}
