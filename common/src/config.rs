//! Configuration parsing – reads an optional `KEY=VALUE` file and lets
//! environment variables override individual keys.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

/// Public inference host used when `API_BASE_URL` is not set.
pub const DEFAULT_API_BASE_URL: &str = "https://agriscience.onrender.com";

/// Which identity backend the web server talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Firebase Identity Toolkit REST API.
    Firebase,
    /// Process-local accounts, for offline development.
    Memory,
}

/// Application configuration, shared between the web server and the CLI.
#[derive(Debug, Clone)]
pub struct Config {
    // ── inference ────────────────────────────────────────────────────
    /// Base URL of the crop / disease inference API, without trailing slash.
    pub api_base_url: String,
    /// Substitute placeholder results when an inference call fails.
    pub demo_mode: bool,
    pub request_timeout_secs: u64,

    // ── identity ─────────────────────────────────────────────────────
    pub auth_mode: AuthMode,
    pub firebase_api_key: Option<String>,

    // ── web server ───────────────────────────────────────────────────
    pub listen_addr: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            demo_mode: false,
            request_timeout_secs: 30,
            auth_mode: AuthMode::Firebase,
            firebase_api_key: None,
            listen_addr: None,
        }
    }
}

impl Config {
    /// Default config path.
    pub fn default_path() -> &'static str {
        "/etc/agriscience/agro.conf"
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Build a config from file values, with `env` taking precedence.
    pub fn from_sources(
        file: &HashMap<String, String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Config {
        let get = |key: &str| -> Option<String> {
            env(key)
                .or_else(|| file.get(key).cloned())
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let defaults = Config::default();

        Config {
            api_base_url: get("API_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base_url),
            demo_mode: get("DEMO_MODE").map(|v| parse_bool(&v)).unwrap_or(false),
            request_timeout_secs: get("REQUEST_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.request_timeout_secs),
            auth_mode: match get("AUTH_MODE").as_deref() {
                Some(m) if m.eq_ignore_ascii_case("memory") => AuthMode::Memory,
                _ => AuthMode::Firebase,
            },
            firebase_api_key: get("FIREBASE_API_KEY"),
            listen_addr: get("LISTEN_ADDR"),
        }
    }
}

/// Load configuration.
///
/// The file is optional: when `path` does not exist only the environment
/// and built-in defaults are used.
pub fn load(path: &Path) -> Result<Config> {
    let file = if path.exists() {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read config: {}", path.display()))?;
        info!("Loaded config from {}", path.display());
        parse_conf(&text)
    } else {
        HashMap::new()
    };

    Ok(Config::from_sources(&file, |key| std::env::var(key).ok()))
}

fn parse_bool(v: &str) -> bool {
    v == "1" || v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("yes")
}

/// Parse `KEY=VALUE` lines into a map, stripping optional double-quotes.
fn parse_conf(text: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, val)) = line.split_once('=') {
            let key = key.trim();
            let val = val.trim().trim_matches('"');
            map.insert(key.to_string(), val.to_string());
        }
    }
    map
}

// ─── tests ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_conf() {
        let text = r#"
# comment
API_BASE_URL="http://localhost:8000/"
DEMO_MODE=true
AUTH_MODE=memory
"#;
        let map = parse_conf(text);
        assert_eq!(map["API_BASE_URL"], "http://localhost:8000/");
        assert_eq!(map["DEMO_MODE"], "true");
        assert!(!map.contains_key("# comment"));
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_sources(&HashMap::new(), |_| None);
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert!(!config.demo_mode);
        assert_eq!(config.auth_mode, AuthMode::Firebase);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_env_overrides_file() {
        let file = parse_conf("API_BASE_URL=http://file:1\nDEMO_MODE=1\n");
        let config = Config::from_sources(&file, |key| match key {
            "API_BASE_URL" => Some("http://env:2/".into()),
            _ => None,
        });
        assert_eq!(config.api_base_url, "http://env:2");
        assert!(config.demo_mode);
    }

    #[test]
    fn test_missing_file_is_not_an_error() {
        let path = std::env::temp_dir().join("agro_test_missing").join("agro.conf");
        let config = load(&path).unwrap();
        assert!(!config.api_base_url.is_empty());
    }
}
