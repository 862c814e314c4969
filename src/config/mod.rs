//! Configuration system (layered: defaults < file < env < command line).

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use bon::Builder;
use directories::ProjectDirs;
use serde::Deserialize;

use crate::error::{BriefError, Result};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-lite";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Immutable service configuration, loaded once at startup.
#[derive(Clone, Builder)]
pub struct BriefConfig {
    #[builder(into)]
    api_key: String,
    #[builder(into, default = DEFAULT_MODEL.to_string())]
    model: String,
    #[builder(into, default = DEFAULT_BASE_URL.to_string())]
    base_url: String,
    #[builder(into, default = DEFAULT_HOST.to_string())]
    host: String,
    #[builder(default = DEFAULT_PORT)]
    port: u16,
    #[builder(default = Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))]
    request_timeout: Duration,
}

impl fmt::Debug for BriefConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BriefConfig")
            .field("api_key", &"..")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Settings read from a TOML file. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileSettings {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub request_timeout_secs: Option<u64>,
}

impl FileSettings {
    /// Parse settings from a TOML file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            BriefError::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        toml::from_str(&raw).map_err(|e| {
            BriefError::Configuration(format!("invalid config file {}: {e}", path.display()))
        })
    }

    /// Default location: `config.toml` in the platform config directory.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "music-brief").map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

/// Command-line overrides, applied last.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl BriefConfig {
    /// Load configuration for the server process.
    ///
    /// Reads `.env` if present, then the config file (`explicit_file`, or the
    /// default location when it exists), then the process environment.
    pub fn load(explicit_file: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let _ = dotenvy::dotenv();

        let file = match explicit_file {
            Some(path) => FileSettings::from_path(path)?,
            None => match FileSettings::default_path().filter(|p| p.is_file()) {
                Some(path) => FileSettings::from_path(&path)?,
                None => FileSettings::default(),
            },
        };

        Self::resolve(file, |key| std::env::var(key).ok(), overrides)
    }

    /// Merge the layers. `env` looks up a variable by name.
    pub fn resolve(
        file: FileSettings,
        env: impl Fn(&str) -> Option<String>,
        overrides: Overrides,
    ) -> Result<Self> {
        let api_key = env("GEMINI_API_KEY")
            .or(file.api_key)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| BriefError::Configuration("GEMINI_API_KEY is not set".to_string()))?;

        let model = env("GEMINI_MODEL")
            .or(file.model)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let base_url = env("GEMINI_BASE_URL")
            .or(file.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let host = overrides
            .host
            .or_else(|| env("HOST"))
            .or(file.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match overrides.port {
            Some(port) => port,
            None => match env("PORT") {
                Some(raw) => parse_number::<u16>("PORT", &raw)?,
                None => file.port.unwrap_or(DEFAULT_PORT),
            },
        };

        let timeout_secs = match env("BRIEF_REQUEST_TIMEOUT_SECS") {
            Some(raw) => parse_number::<u64>("BRIEF_REQUEST_TIMEOUT_SECS", &raw)?,
            None => file
                .request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        };
        if timeout_secs == 0 {
            return Err(BriefError::Configuration(
                "request timeout must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            host,
            port,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// `host:port` string for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| BriefError::Configuration(format!("{name} is not a valid number: {raw}")))
}
