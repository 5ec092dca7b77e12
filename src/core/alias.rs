//! Alias table.
//!
//! Maps user-defined alias names to canonical command names. Built once
//! at startup and only read afterwards. Aliases resolve a single hop: an
//! alias whose target is itself an alias is not followed further.

use std::collections::HashMap;
use std::path::Path;

use super::config::Config;

/// Immutable alias -> canonical command name mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    entries: HashMap<String, String>,
}

impl AliasTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the `[aliases]` section of a configuration file.
    ///
    /// Never fails: a missing file, a missing section or an unreadable
    /// file all produce an empty table.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(path = ?path, "No alias source, alias table is empty");
            return Self::new();
        }

        match Config::load_from_file(path) {
            Ok(config) => Self::from_config(&config),
            Err(e) => {
                tracing::warn!(path = ?path, error = %e, "Ignoring unreadable alias source");
                Self::new()
            }
        }
    }

    /// Take the aliases of an already loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        config.aliases.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    /// Canonical name for `alias`. Matching is exact on the stored key.
    pub fn lookup(&self, alias: &str) -> Option<&str> {
        self.entries.get(alias).map(String::as_str)
    }

    /// Get number of aliases.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by alias name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        let mut entries: Vec<_> =
            self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        entries.sort_unstable();
        entries.into_iter()
    }
}

impl<K, V> FromIterator<(K, V)> for AliasTable
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self { entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }
}
