//! Client configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::error::CoreError;
use crate::Result;

const DEFAULT_API_URL: &str = "http://localhost:8080";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub const ENV_API_URL: &str = "AERODESK_API_URL";
pub const ENV_DB_PATH: &str = "AERODESK_DB_PATH";
pub const ENV_TIMEOUT_SECS: &str = "AERODESK_TIMEOUT_SECS";
pub const ENV_KEEP_CREDENTIALS: &str = "AERODESK_KEEP_CREDENTIALS_ON_OUTAGE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the booking backend
    pub api_base_url: Url,
    /// Path to the credential database
    pub database_path: PathBuf,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Keep stored credentials when the backend is down during restore
    pub keep_credentials_on_outage: bool,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            api_base_url: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            database_path: data_dir.join("aerodesk.db"),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            keep_credentials_on_outage: true,
        }
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("AeroDesk"))
            .unwrap_or_else(|| PathBuf::from(".aerodesk"))
    }

    /// Defaults overlaid with `AERODESK_*` environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Read a JSON config file, then apply environment overrides
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let mut config: Config = serde_json::from_str(&raw).map_err(|e| {
            CoreError::Config(format!("{}: {}", path.as_ref().display(), e))
        })?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL) {
            self.api_base_url = Url::parse(url.trim())
                .map_err(|e| CoreError::Config(format!("{}: {}", ENV_API_URL, e)))?;
        }

        if let Some(path) = lookup(ENV_DB_PATH) {
            self.database_path = PathBuf::from(path);
        }

        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            self.request_timeout_secs = secs
                .trim()
                .parse()
                .map_err(|e| CoreError::Config(format!("{}: {}", ENV_TIMEOUT_SECS, e)))?;
        }

        if let Some(flag) = lookup(ENV_KEEP_CREDENTIALS) {
            self.keep_credentials_on_outage = parse_flag(&flag).ok_or_else(|| {
                CoreError::Config(format!("{}: expected true or false, got {:?}", ENV_KEEP_CREDENTIALS, flag))
            })?;
        }

        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        match self.api_base_url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(CoreError::Config(format!(
                    "api_base_url must be http or https, got {}",
                    other
                )))
            }
        }

        if self.request_timeout_secs == 0 {
            return Err(CoreError::Config(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::new(PathBuf::from("/data"));
        assert_eq!(config.api_base_url.as_str(), "http://localhost:8080/");
        assert_eq!(config.database_path, PathBuf::from("/data/aerodesk.db"));
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert!(config.keep_credentials_on_outage);
        config.validate().unwrap();
    }

    #[test]
    fn test_overrides() {
        let mut config = Config::new(PathBuf::from("/data"));
        config
            .apply_overrides(lookup(&[
                (ENV_API_URL, "https://booking.example.com/backend"),
                (ENV_DB_PATH, "/tmp/creds.db"),
                (ENV_TIMEOUT_SECS, "3"),
                (ENV_KEEP_CREDENTIALS, "off"),
            ]))
            .unwrap();

        assert_eq!(
            config.api_base_url.as_str(),
            "https://booking.example.com/backend"
        );
        assert_eq!(config.database_path, PathBuf::from("/tmp/creds.db"));
        assert_eq!(config.request_timeout_secs, 3);
        assert!(!config.keep_credentials_on_outage);
    }

    #[test]
    fn test_invalid_overrides() {
        let base = Config::new(PathBuf::from("/data"));

        for vars in [
            vec![(ENV_API_URL, "not a url")],
            vec![(ENV_API_URL, "ftp://example.com")],
            vec![(ENV_TIMEOUT_SECS, "soon")],
            vec![(ENV_TIMEOUT_SECS, "0")],
            vec![(ENV_KEEP_CREDENTIALS, "maybe")],
        ] {
            let mut config = base.clone();
            let err = config.apply_overrides(lookup(&vars)).unwrap_err();
            assert!(matches!(err, CoreError::Config(_)), "{:?}", vars);
        }
    }

    #[test]
    fn test_default_lives_in_the_platform_data_dir() {
        let config = Config::default();
        assert_eq!(config.database_path.file_name().unwrap(), "aerodesk.db");
        if let Some(base) = dirs::data_local_dir() {
            assert_eq!(config.database_path, base.join("AeroDesk").join("aerodesk.db"));
        }
    }

    #[test]
    fn test_json_round_trip() {
        let config = Config::new(PathBuf::from("/data"));
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
