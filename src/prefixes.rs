//! Per-scope command prefixes, persisted as a flat JSON object mapping
//! a scope ID (server or user) to its prefix.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum PrefixStoreError {
    #[error("prefix file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("prefix file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("prefix must not be empty")]
    EmptyPrefix,
}

pub struct PrefixStore {
    path: PathBuf,
    prefixes: HashMap<String, String>,
}

impl PrefixStore {
    /// Load the store from `path`, creating an empty file if none exists.
    pub fn load(path: &Path) -> Result<Self, PrefixStoreError> {
        let prefixes = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            if content.trim().is_empty() {
                HashMap::new()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            HashMap::new()
        };

        let store = Self {
            path: path.to_path_buf(),
            prefixes,
        };
        if !path.exists() {
            store.save()?;
        }
        Ok(store)
    }

    /// Server override wins over user override; otherwise `default`.
    pub fn resolve<'a>(&'a self, guild_id: Option<u64>, user_id: u64, default: &'a str) -> &'a str {
        if let Some(prefix) = guild_id.and_then(|g| self.prefixes.get(&g.to_string())) {
            return prefix;
        }
        self.prefixes
            .get(&user_id.to_string())
            .map(String::as_str)
            .unwrap_or(default)
    }

    /// Set the prefix for a scope and rewrite the file. The in-memory value
    /// is rolled back if the write fails.
    pub fn set(&mut self, scope_id: u64, prefix: &str) -> Result<(), PrefixStoreError> {
        let prefix = prefix.trim();
        if prefix.is_empty() {
            return Err(PrefixStoreError::EmptyPrefix);
        }

        let key = scope_id.to_string();
        let previous = self.prefixes.insert(key.clone(), prefix.to_string());
        if let Err(e) = self.save() {
            match previous {
                Some(old) => self.prefixes.insert(key, old),
                None => self.prefixes.remove(&key),
            };
            return Err(e);
        }
        Ok(())
    }

    /// Drop a scope's override. Like `set`, the entry is restored if the
    /// file cannot be rewritten.
    pub fn remove(&mut self, scope_id: u64) -> Result<bool, PrefixStoreError> {
        let key = scope_id.to_string();
        let Some(old) = self.prefixes.remove(&key) else {
            return Ok(false);
        };
        if let Err(e) = self.save() {
            self.prefixes.insert(key, old);
            return Err(e);
        }
        Ok(true)
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    fn save(&self) -> Result<(), PrefixStoreError> {
        let json = serde_json::to_string_pretty(&self.prefixes)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
