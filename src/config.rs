use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

const DEFAULT_AUTH_BASE_URL: &str = "http://localhost:8080/auth";
const DEFAULT_JWT_SECRET: &str = "your-secret-key-change-this-in-production";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortalConfig {
    #[serde(default)]
    pub auth: AuthServiceConfig,
    #[serde(default)]
    pub token_slot: TokenSlotConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Where the remote auth service lives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthServiceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Durable slot for the session token
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TokenSlotConfig {
    #[default]
    Memory,
    File { path: PathBuf },
}

/// Development auth service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    #[serde(default = "default_token_expiration")]
    pub token_expiration_secs: i64,
    #[serde(default = "default_max_failed_attempts")]
    pub max_failed_attempts: u32,
    #[serde(default = "default_block_duration")]
    pub block_duration_secs: u64,
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            jwt_secret: default_jwt_secret(),
            token_expiration_secs: default_token_expiration(),
            max_failed_attempts: default_max_failed_attempts(),
            block_duration_secs: default_block_duration(),
            bcrypt_cost: default_bcrypt_cost(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_AUTH_BASE_URL.to_string()
}

fn default_request_timeout() -> u64 {
    10
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_jwt_secret() -> String {
    DEFAULT_JWT_SECRET.to_string()
}

fn default_token_expiration() -> i64 {
    86400 // 24 hours
}

fn default_max_failed_attempts() -> u32 {
    5
}

fn default_block_duration() -> u64 {
    300
}

fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

impl PortalConfig {
    pub fn validate(&self) -> Result<(), String> {
        let base_url = self.auth.base_url.trim();
        if base_url.is_empty() {
            return Err("auth.base_url must not be empty".to_string());
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(format!(
                "auth.base_url must be an http(s) URL, got '{}'",
                base_url
            ));
        }
        if self.auth.request_timeout_secs == 0 {
            return Err("auth.request_timeout_secs must be greater than zero".to_string());
        }
        if let TokenSlotConfig::File { path } = &self.token_slot
            && path.as_os_str().is_empty()
        {
            return Err("token_slot.path must not be empty".to_string());
        }
        if self.server.jwt_secret.is_empty() {
            return Err("server.jwt_secret must not be empty".to_string());
        }
        if self.server.token_expiration_secs <= 0 {
            return Err("server.token_expiration_secs must be greater than zero".to_string());
        }
        if self.server.max_failed_attempts == 0 {
            return Err("server.max_failed_attempts must be greater than zero".to_string());
        }
        if !(4..=31).contains(&self.server.bcrypt_cost) {
            return Err(format!(
                "server.bcrypt_cost must be between 4 and 31, got {}",
                self.server.bcrypt_cost
            ));
        }
        Ok(())
    }

    /// Apply `AUTH_BASE_URL` and `JWT_SECRET` from the environment
    pub fn apply_env_overrides(&mut self) {
        if let Ok(base_url) = std::env::var("AUTH_BASE_URL") {
            info!("Using auth service URL from AUTH_BASE_URL");
            self.auth.base_url = base_url;
        }
        if let Ok(secret) = std::env::var("JWT_SECRET") {
            self.server.jwt_secret = secret;
        }
    }
}

/// Load configuration from a YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Arc<PortalConfig>, String> {
    let path = path.as_ref();
    info!("Loading configuration from: {}", path.display());

    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;

    let mut config: PortalConfig = serde_yaml::from_str(&contents)
        .map_err(|e| format!("Failed to parse YAML config: {}", e))?;

    config.apply_env_overrides();
    config.validate()?;

    info!(
        "Configuration loaded: auth service at {}, token slot {:?}",
        config.auth.base_url, config.token_slot
    );

    Ok(Arc::new(config))
}

/// Load configuration with fallback options. Without any file the defaults
/// (plus environment overrides) are used.
pub fn load_config_with_fallback() -> Result<Arc<PortalConfig>, String> {
    if let Ok(config_path) = std::env::var("CONFIG_PATH") {
        match load_config(&config_path) {
            Ok(config) => return Ok(config),
            Err(e) => warn!(
                "Failed to load config from CONFIG_PATH ({}): {}",
                config_path, e
            ),
        }
    }

    for path in ["config.yaml", "config.yml"] {
        if Path::new(path).exists() {
            match load_config(path) {
                Ok(config) => return Ok(config),
                Err(e) => warn!("Failed to load config from '{}': {}", path, e),
            }
        }
    }

    info!("No configuration file found, using defaults");
    let mut config = PortalConfig::default();
    config.apply_env_overrides();
    config.validate()?;
    Ok(Arc::new(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
auth:
  base_url: "https://visits.example.org/auth"
  request_timeout_secs: 5
token_slot:
  type: file
  path: "/var/lib/portal/storage.json"
server:
  bind_addr: "127.0.0.1:9000"
  jwt_secret: "test-secret"
  token_expiration_secs: 3600
  max_failed_attempts: 3
  block_duration_secs: 60
"#;

        let config: PortalConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.auth.base_url, "https://visits.example.org/auth");
        assert_eq!(config.auth.request_timeout_secs, 5);
        assert_eq!(
            config.token_slot,
            TokenSlotConfig::File {
                path: PathBuf::from("/var/lib/portal/storage.json")
            }
        );
        assert_eq!(config.server.max_failed_attempts, 3);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: PortalConfig = serde_yaml::from_str("{}").unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.auth.base_url, DEFAULT_AUTH_BASE_URL);
        assert_eq!(config.token_slot, TokenSlotConfig::Memory);
        assert_eq!(config.server.token_expiration_secs, 86400);
    }

    #[test]
    fn test_validation_rejects_bad_base_url() {
        let mut config = PortalConfig::default();
        config.auth.base_url = "localhost:8080".to_string();

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("http(s)"));
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        let mut config = PortalConfig::default();
        config.auth.request_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_attempts() {
        let mut config = PortalConfig::default();
        config.server.max_failed_attempts = 0;
        assert!(config.validate().unwrap_err().contains("max_failed_attempts"));
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "auth:\n  request_timeout_secs: 3\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.auth.request_timeout_secs, 3);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("/nonexistent/portal.yaml");
        assert!(result.unwrap_err().contains("Failed to read config file"));
    }
}
