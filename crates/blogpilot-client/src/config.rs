use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ClientConfig {
    pub fn validate(&self) -> Result<(), String> {
        // API
        let base = self.api.base_url.trim();
        if base.is_empty() {
            return Err("api.base_url must not be empty".into());
        }
        let url = Url::parse(base).map_err(|e| format!("api.base_url is not a valid URL: {e}"))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err("api.base_url must use http or https".into());
        }
        if !self.api.login_route.starts_with('/') {
            return Err("api.login_route must start with '/'".into());
        }
        // HTTP
        if self.http.timeout_ms == 0 {
            return Err("http.timeout_ms must be > 0".into());
        }
        if let Some(code) = self
            .http
            .retry_status_codes
            .iter()
            .find(|c| !(400..600).contains(*c))
        {
            return Err(format!("http.retry_status_codes contains non-error status {code}"));
        }
        if self.http.retry_status_codes.contains(&401) {
            return Err("http.retry_status_codes must not contain 401; it triggers token refresh".into());
        }
        if self.http.retry_min_delay_ms > self.http.retry_max_delay_ms {
            return Err("http.retry_min_delay_ms must be <= http.retry_max_delay_ms".into());
        }
        // Logging
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(format!("logging.level must be one of {valid_levels:?}"));
        }
        Ok(())
    }

    pub fn base_url(&self) -> Result<Url, String> {
        Url::parse(self.api.base_url.trim()).map_err(|e| format!("invalid api.base_url: {e}"))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.http.timeout_ms)
    }

    /// Explicit `storage.dir`, else `~/.blogpilot`.
    pub fn storage_dir(&self) -> Option<PathBuf> {
        self.storage
            .dir
            .clone()
            .or_else(|| dirs::home_dir().map(|home| home.join(".blogpilot")))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Route reported to the front end when the session expires.
    #[serde(default = "default_login_route")]
    pub login_route: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            login_route: default_login_route(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080".into()
}

fn default_login_route() -> String {
    "/auth".into()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Additional attempts after the first one.
    #[serde(default = "default_retry_limit")]
    pub retry_limit: usize,
    #[serde(default = "default_retry_status_codes")]
    pub retry_status_codes: Vec<u16>,
    #[serde(default = "default_retry_min_delay_ms")]
    pub retry_min_delay_ms: u64,
    #[serde(default = "default_retry_max_delay_ms")]
    pub retry_max_delay_ms: u64,
}

impl HttpConfig {
    pub fn is_retryable_status(&self, status: u16) -> bool {
        self.retry_status_codes.contains(&status)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            retry_limit: default_retry_limit(),
            retry_status_codes: default_retry_status_codes(),
            retry_min_delay_ms: default_retry_min_delay_ms(),
            retry_max_delay_ms: default_retry_max_delay_ms(),
        }
    }
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_retry_limit() -> usize {
    2
}

fn default_retry_status_codes() -> Vec<u16> {
    vec![408, 413, 429, 500, 502, 503, 504]
}

fn default_retry_min_delay_ms() -> u64 {
    300
}

fn default_retry_max_delay_ms() -> u64 {
    3_000
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CacheConfig {
    /// Staleness for queries without their own policy.
    #[serde(default)]
    pub default_stale_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".into()
}

pub mod loader {
    use super::ClientConfig;
    use config::{Config, Environment, File};
    use std::path::PathBuf;

    pub const DEFAULT_CONFIG_FILE: &str = "blogpilot.toml";

    pub fn load_config(path: Option<&str>) -> Result<ClientConfig, String> {
        let mut builder = Config::builder();
        let pathbuf = PathBuf::from(path.unwrap_or(DEFAULT_CONFIG_FILE));
        if pathbuf.exists() {
            builder = builder.add_source(File::from(pathbuf));
        }
        // Environment variable overrides, e.g., BLOGPILOT__HTTP__TIMEOUT_MS=5000
        builder = builder.add_source(
            Environment::with_prefix("BLOGPILOT")
                .try_parsing(true)
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("http.retry_status_codes"),
        );
        let cfg = builder
            .build()
            .map_err(|e| format!("config build error: {e}"))?;
        let merged: ClientConfig = cfg
            .try_deserialize()
            .map_err(|e| format!("config deserialize error: {e}"))?;
        merged.validate()?;
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let cfg = ClientConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.timeout(), Duration::from_secs(30));
        assert_eq!(cfg.http.retry_limit, 2);
        assert!(cfg.http.is_retryable_status(503));
        assert!(!cfg.http.is_retryable_status(404));
        assert!(!cfg.http.is_retryable_status(401));
    }

    #[test]
    fn test_validation_rejections() {
        let mut cfg = ClientConfig::default();
        cfg.http.retry_status_codes.push(401);
        assert!(cfg.validate().unwrap_err().contains("401"));

        let mut cfg = ClientConfig::default();
        cfg.http.retry_status_codes.push(204);
        assert!(cfg.validate().is_err());

        let mut cfg = ClientConfig::default();
        cfg.http.timeout_ms = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = ClientConfig::default();
        cfg.api.base_url = "not a url".into();
        assert!(cfg.validate().is_err());

        let mut cfg = ClientConfig::default();
        cfg.http.retry_min_delay_ms = 5_000;
        assert!(cfg.validate().is_err());

        let mut cfg = ClientConfig::default();
        cfg.logging.level = "verbose".into();
        assert!(cfg.validate().is_err());
    }
}
