//! Localized strings for menu chrome.
//!
//! Only group header titles go through here: the builder asks for
//! `"choose_" + model`.  Lookups that miss fall back to the key itself so an
//! untranslated model still gets a visible header.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

/// Prefix of the key used for a group header title.
pub const GROUP_TITLE_PREFIX: &str = "choose_";

/// String-keyed lookup supplied by the host.
pub trait Localize {
    fn string_for(&self, key: &str) -> String;
}

pub fn group_title_key(model: &str) -> String {
    format!("{GROUP_TITLE_PREFIX}{model}")
}

#[derive(Debug, thiserror::Error)]
pub enum StringsError {
    #[error("failed to read strings file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse strings file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Deserialize)]
struct StringsFile {
    #[serde(default)]
    strings: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringTable {
    entries: BTreeMap<String, String>,
}

impl Default for StringTable {
    fn default() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(group_title_key("group"), "Groups".to_string());
        Self { entries }
    }
}

impl StringTable {
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn extend<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.entries.extend(entries);
    }

    /// Overlay a `[strings]` table parsed from TOML.
    pub fn merge_toml(&mut self, content: &str) -> Result<(), StringsError> {
        let file: StringsFile = toml::from_str(content)?;
        debug!("merging {} localized strings", file.strings.len());
        self.entries.extend(file.strings);
        Ok(())
    }

    /// Overlay strings from `path`.  A missing file is not an error.
    pub fn merge_file(&mut self, path: &Path) -> Result<(), StringsError> {
        if !path.exists() {
            debug!("no strings file at {}", path.display());
            return Ok(());
        }
        let content = std::fs::read_to_string(path).map_err(|source| StringsError::Read {
            path: path.display().to_string(),
            source,
        })?;
        self.merge_toml(&content)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl Localize for StringTable {
    fn string_for(&self, key: &str) -> String {
        self.get(key).unwrap_or(key).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_group_title() {
        let table = StringTable::default();
        assert_eq!(table.string_for(&group_title_key("group")), "Groups");
    }

    #[test]
    fn test_missing_key_falls_back_to_key() {
        let table = StringTable::empty();
        assert_eq!(table.string_for("choose_zone"), "choose_zone");
    }

    #[test]
    fn test_merge_toml_overrides_defaults() {
        let mut table = StringTable::default();
        table
            .merge_toml(
                r#"
                [strings]
                choose_group = "Sync groups"
                choose_zone = "Zones"
                "#,
            )
            .unwrap();
        assert_eq!(table.string_for("choose_group"), "Sync groups");
        assert_eq!(table.string_for("choose_zone"), "Zones");
    }

    #[test]
    fn test_merge_toml_rejects_garbage() {
        let mut table = StringTable::default();
        assert!(matches!(
            table.merge_toml("[strings\nbroken"),
            Err(StringsError::Parse(_))
        ));
        assert_eq!(table, StringTable::default());
    }

    #[test]
    fn test_merge_missing_file_is_noop() {
        let mut table = StringTable::default();
        table
            .merge_file(Path::new("/nonexistent/squeeze-menu/strings.toml"))
            .unwrap();
        assert_eq!(table, StringTable::default());
    }
}
