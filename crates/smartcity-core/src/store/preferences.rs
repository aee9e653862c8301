// ── Durable key-value preferences ──
//
// A single JSON object on disk, read and rewritten as a whole. Writes go to
// a sibling temp file which is then renamed over the original, so the file
// is never observed half written.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::trace;

use crate::error::CoreError;

/// Handle to a preferences file. Missing file == no keys.
#[derive(Debug, Clone)]
pub struct Preferences {
    path: PathBuf,
}

impl Preferences {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read a string-set value. `None` if the key is absent.
    pub async fn get_string_set(&self, key: &str) -> Result<Option<BTreeSet<String>>, CoreError> {
        let map = self.read_all().await?;
        let Some(value) = map.get(key) else {
            return Ok(None);
        };
        let Value::Array(items) = value else {
            return Err(CoreError::storage(&self.path, format!("'{key}' is not a list")));
        };

        items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(CoreError::storage(
                    &self.path,
                    format!("'{key}' holds a non-string entry: {other}"),
                )),
            })
            .collect::<Result<BTreeSet<_>, _>>()
            .map(Some)
    }

    /// Replace a string-set value.
    pub async fn put_string_set(&self, key: &str, values: &BTreeSet<String>) -> Result<(), CoreError> {
        let mut map = self.read_all().await?;
        map.insert(
            key.to_owned(),
            Value::Array(values.iter().cloned().map(Value::String).collect()),
        );
        self.write_all(&map).await
    }

    /// Remove a key. Removing an absent key is a no-op.
    pub async fn remove(&self, key: &str) -> Result<(), CoreError> {
        let mut map = self.read_all().await?;
        if map.remove(key).is_none() {
            return Ok(());
        }
        self.write_all(&map).await
    }

    // ── Private helpers ──────────────────────────────────────────────

    async fn read_all(&self) -> Result<Map<String, Value>, CoreError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(CoreError::storage(&self.path, e)),
        };
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }
        serde_json::from_str(&raw).map_err(|e| CoreError::storage(&self.path, e))
    }

    async fn write_all(&self, map: &Map<String, Value>) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| CoreError::storage(parent, e))?;
        }

        let body = serde_json::to_string_pretty(map).map_err(|e| CoreError::storage(&self.path, e))?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, body)
            .await
            .map_err(|e| CoreError::storage(&tmp, e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| CoreError::storage(&self.path, e))?;

        trace!(path = %self.path.display(), keys = map.len(), "preferences written");
        Ok(())
    }
}
