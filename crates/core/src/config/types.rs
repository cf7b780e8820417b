use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub uploads: UploadConfig,
    #[serde(default)]
    pub encoder: EncoderConfig,
    #[serde(default)]
    pub counter_store: CounterStoreConfig,
}

/// Deployment mode flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentMode {
    #[default]
    Development,
    Production,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub mode: DeploymentMode,
    /// Origin permitted for cross-origin requests in production mode.
    #[serde(default)]
    pub allowed_origin: Option<String>,
    /// Directory served for any path not matched by the API.
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            mode: DeploymentMode::default(),
            allowed_origin: None,
            static_dir: None,
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    3000
}

/// Limits and staging location for uploaded files.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UploadConfig {
    /// Maximum number of files per batch.
    #[serde(default = "default_max_files")]
    pub max_files: usize,
    /// Maximum size of a single file.
    #[serde(default = "default_max_file_size")]
    pub max_file_size_bytes: u64,
    /// Directory uploads are staged in while they are converted.
    #[serde(default = "default_staging_dir")]
    pub staging_dir: PathBuf,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_files: default_max_files(),
            max_file_size_bytes: default_max_file_size(),
            staging_dir: default_staging_dir(),
        }
    }
}

fn default_max_files() -> usize {
    10
}

fn default_max_file_size() -> u64 {
    10 * 1024 * 1024
}

fn default_staging_dir() -> PathBuf {
    std::env::temp_dir().join("imagepress-uploads")
}

/// Encoder tuning.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EncoderConfig {
    /// Lossy WebP quality factor (0-100).
    #[serde(default = "default_webp_quality")]
    pub webp_quality: f32,
    /// GIF quantization speed (1 = best quality, 30 = fastest).
    #[serde(default = "default_gif_speed")]
    pub gif_speed: i32,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            webp_quality: default_webp_quality(),
            gif_speed: default_gif_speed(),
        }
    }
}

fn default_webp_quality() -> f32 {
    75.0
}

fn default_gif_speed() -> i32 {
    10
}

/// Usage counter store configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CounterStoreConfig {
    #[serde(default)]
    pub backend: CounterBackend,
    #[serde(default)]
    pub sqlite: SqliteCounterConfig,
    /// Upstash-specific configuration (required when backend = "upstash")
    #[serde(default)]
    pub upstash: Option<UpstashConfig>,
}

/// Available counter store backends
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CounterBackend {
    #[default]
    Sqlite,
    Upstash,
}

/// SQLite counter store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SqliteCounterConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for SqliteCounterConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("imagepress.db")
}

/// Upstash Redis REST configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstashConfig {
    /// REST endpoint (e.g., "https://eu1-example.upstash.io")
    pub url: String,
    /// REST bearer token
    pub token: String,
    /// Request timeout in seconds (default: 10)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_timeout() -> u32 {
    10
}

/// Sanitized config for logging (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub uploads: UploadConfig,
    pub encoder: EncoderConfig,
    pub counter_store: SanitizedCounterStoreConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedCounterStoreConfig {
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sqlite_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstash: Option<SanitizedUpstashConfig>,
}

/// Sanitized Upstash config (token hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedUpstashConfig {
    pub url: String,
    pub token_configured: bool,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        let store = &config.counter_store;
        Self {
            server: config.server.clone(),
            uploads: config.uploads.clone(),
            encoder: config.encoder.clone(),
            counter_store: SanitizedCounterStoreConfig {
                backend: match store.backend {
                    CounterBackend::Sqlite => "sqlite".to_string(),
                    CounterBackend::Upstash => "upstash".to_string(),
                },
                sqlite_path: match store.backend {
                    CounterBackend::Sqlite => Some(store.sqlite.path.clone()),
                    CounterBackend::Upstash => None,
                },
                upstash: store.upstash.as_ref().map(|u| SanitizedUpstashConfig {
                    url: u.url.clone(),
                    token_configured: !u.token.is_empty(),
                    timeout_secs: u.timeout_secs,
                }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_with_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert_eq!(config.server.mode, DeploymentMode::Development);
        assert!(config.server.allowed_origin.is_none());
        assert_eq!(config.uploads.max_files, 10);
        assert_eq!(config.uploads.max_file_size_bytes, 10_485_760);
        assert_eq!(config.encoder.webp_quality, 75.0);
        assert_eq!(config.encoder.gif_speed, 10);
    }

    #[test]
    fn test_deserialize_production_server() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 9000
mode = "production"
allowed_origin = "https://app.example.com"
static_dir = "public"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.mode, DeploymentMode::Production);
        assert_eq!(
            config.server.allowed_origin.as_deref(),
            Some("https://app.example.com")
        );
        assert_eq!(config.server.static_dir, Some(PathBuf::from("public")));
    }

    #[test]
    fn test_deserialize_with_custom_uploads() {
        let toml = r#"
[uploads]
max_files = 3
max_file_size_bytes = 1024
staging_dir = "/data/staging"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.uploads.max_files, 3);
        assert_eq!(config.uploads.max_file_size_bytes, 1024);
        assert_eq!(config.uploads.staging_dir, PathBuf::from("/data/staging"));
    }

    #[test]
    fn test_deserialize_with_upstash_config() {
        let toml = r#"
[counter_store]
backend = "upstash"

[counter_store.upstash]
url = "https://eu1-example.upstash.io"
token = "test-token"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.counter_store.backend, CounterBackend::Upstash);

        let upstash = config.counter_store.upstash.as_ref().unwrap();
        assert_eq!(upstash.url, "https://eu1-example.upstash.io");
        assert_eq!(upstash.token, "test-token");
        assert_eq!(upstash.timeout_secs, 10); // default
    }

    #[test]
    fn test_sanitized_config_hides_token() {
        let mut config = Config::default();
        config.counter_store.backend = CounterBackend::Upstash;
        config.counter_store.upstash = Some(UpstashConfig {
            url: "https://eu1-example.upstash.io".to_string(),
            token: "secret-token".to_string(),
            timeout_secs: 5,
        });

        let sanitized = SanitizedConfig::from(&config);
        assert_eq!(sanitized.counter_store.backend, "upstash");
        assert!(sanitized.counter_store.sqlite_path.is_none());
        let upstash = sanitized.counter_store.upstash.as_ref().unwrap();
        assert!(upstash.token_configured);
        assert_eq!(upstash.timeout_secs, 5);

        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("secret-token"));
    }

    #[test]
    fn test_sanitized_config_sqlite() {
        let sanitized = SanitizedConfig::from(&Config::default());
        assert_eq!(sanitized.counter_store.backend, "sqlite");
        assert_eq!(
            sanitized.counter_store.sqlite_path,
            Some(PathBuf::from("imagepress.db"))
        );
    }
}
