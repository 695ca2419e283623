use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::platform;
use super::strings::StringTable;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub menu: MenuConfig,
    #[serde(default)]
    pub strings: StringsConfig,
}

/// Where player commands are sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout applied by the HTTP transport.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuConfig {
    /// Prefix for control icon URLs (`{webroot}html/images/b_play.gif`).
    #[serde(default = "default_webroot")]
    pub webroot: String,
    /// Model tags that get their own submenu instead of a row in the main list.
    #[serde(default = "default_grouped_models")]
    pub grouped_models: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StringsConfig {
    /// Optional TOML file with a `[strings]` table.
    #[serde(default = "default_strings_toml")]
    pub strings_toml: PathBuf,
    /// Inline overrides, applied after the file.
    #[serde(default)]
    pub overrides: BTreeMap<String, String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            webroot: default_webroot(),
            grouped_models: default_grouped_models(),
        }
    }
}

impl Default for StringsConfig {
    fn default() -> Self {
        Self {
            strings_toml: default_strings_toml(),
            overrides: BTreeMap::new(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:9000".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_webroot() -> String {
    "/".to_string()
}

fn default_grouped_models() -> Vec<String> {
    vec!["group".to_string()]
}

fn default_strings_toml() -> PathBuf {
    platform::config_dir().join("strings.toml")
}

impl ServerConfig {
    pub fn jsonrpc_url(&self) -> String {
        format!("{}/jsonrpc.js", self.base_url.trim_end_matches('/'))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl StringsConfig {
    /// Built-in strings, then the strings file, then inline overrides.
    pub fn load_table(&self) -> anyhow::Result<StringTable> {
        let mut table = StringTable::default();
        table.merge_file(&self.strings_toml)?;
        table.extend(self.overrides.clone());
        Ok(table)
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Read the config at `path`, writing defaults there first if it is missing.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.server.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.menu.webroot, "/");
        assert_eq!(config.menu.grouped_models, vec!["group".to_string()]);
        assert!(config
            .strings
            .strings_toml
            .ends_with("squeeze-menu/strings.toml"));
    }

    #[test]
    fn test_jsonrpc_url_trims_trailing_slash() {
        let server = ServerConfig {
            base_url: "http://lms.local:9000/".to_string(),
            ..Default::default()
        };
        assert_eq!(server.jsonrpc_url(), "http://lms.local:9000/jsonrpc.js");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [server]
            base_url = "http://10.0.0.2:9000"

            [menu]
            grouped_models = ["group", "zone"]
            "#,
        )
        .unwrap();
        assert_eq!(config.server.base_url, "http://10.0.0.2:9000");
        assert_eq!(config.server.request_timeout_secs, 10);
        assert_eq!(config.menu.webroot, "/");
        assert_eq!(config.menu.grouped_models, vec!["group", "zone"]);
    }

    #[test]
    fn test_overrides_win_over_defaults() {
        let mut strings = StringsConfig {
            strings_toml: PathBuf::from("/nonexistent/strings.toml"),
            overrides: BTreeMap::new(),
        };
        strings
            .overrides
            .insert("choose_group".to_string(), "Sync groups".to_string());
        let table = strings.load_table().unwrap();
        assert_eq!(table.get("choose_group"), Some("Sync groups"));
    }
}
