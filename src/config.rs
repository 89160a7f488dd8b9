//! Configuration loading and constants.
//!
//! Loads the dev-server configuration from a TOML file and defines constants
//! for default ports, the Strict-Transport-Security header, logging, and
//! default paths. `DevConfig` is the root configuration struct.
//!
//! The server runs in one of three TLS modes selected by `[server.tls] mode`:
//! plain HTTP, TLS with PEM material embedded in the config file, or TLS with
//! key/certificate files read from disk at startup.

use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use const_format::formatcp;
use http::header::{HeaderName, HeaderValue};
use serde::Deserialize;

// =============================================================================
// Ports
// =============================================================================

/// Default listen port for plain HTTP
pub const DEFAULT_HTTP_PORT: u16 = 5080;

/// Default listen port when TLS is enabled
pub const DEFAULT_HTTPS_PORT: u16 = 5443;

/// Default port for the HTTP->HTTPS redirect listener
pub const DEFAULT_REDIRECT_PORT: u16 = DEFAULT_HTTP_PORT;

// =============================================================================
// Strict-Transport-Security
// =============================================================================

/// HSTS max-age in seconds: one year (365 days)
pub const HSTS_MAX_AGE_SECS: u32 = 365 * 24 * 60 * 60;

/// Pre-formatted Strict-Transport-Security value (compile-time concatenation)
pub const HSTS_HEADER_VALUE: &str = formatcp!("max-age={}", HSTS_MAX_AGE_SECS);

// =============================================================================
// Default Paths and Strings
// =============================================================================

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "config/focust-dev.toml";

/// Default directory holding the built client assets
pub const DEFAULT_ASSET_ROOT: &str = "dist";

/// Default index document served for SPA routes
pub const DEFAULT_INDEX_FILE: &str = "index.html";

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "focust_dev=debug,tower_http=info";

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

/// Root configuration for the dev server.
#[derive(Debug, Clone, Deserialize)]
pub struct DevConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Ordered plugin pipeline applied to served responses
    #[serde(rename = "plugin", default)]
    pub plugins: Vec<PluginConfig>,
    /// Built client assets to serve
    #[serde(rename = "static", default)]
    pub assets: AssetConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfig {
    /// Listen port. Defaults to 5080 in plain mode and 5443 when TLS is on.
    pub port: Option<u16>,
    /// Host binding: `true` binds all interfaces, `false` binds loopback,
    /// or an explicit IP address.
    #[serde(default)]
    pub host: HostBinding,
    /// TLS transport settings
    #[serde(default)]
    pub tls: TlsConfig,
    /// Extra response headers, validated at load time
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl ServerConfig {
    /// Effective listen port: explicit value, or the mode-appropriate default.
    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or(if self.tls.mode.enabled() {
            DEFAULT_HTTPS_PORT
        } else {
            DEFAULT_HTTP_PORT
        })
    }

    /// Socket address the server binds.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host.ip(), self.effective_port())
    }

    /// Parse the configured extra headers into typed name/value pairs.
    pub fn header_pairs(&self) -> Result<Vec<(HeaderName, HeaderValue)>, ConfigError> {
        let mut pairs = Vec::with_capacity(self.headers.len());
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                ConfigError::Validation(format!("Invalid header name '{}': {}", name, e))
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                ConfigError::Validation(format!("Invalid value for header '{}': {}", name, e))
            })?;
            pairs.push((name, value));
        }
        Ok(pairs)
    }
}

/// Host binding: a bare boolean (all interfaces / loopback) or an explicit
/// address.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub enum HostBinding {
    /// `true` binds 0.0.0.0, `false` binds 127.0.0.1
    Open(bool),
    /// An explicit address to bind
    Addr(IpAddr),
}

impl Default for HostBinding {
    fn default() -> Self {
        HostBinding::Open(false)
    }
}

impl HostBinding {
    /// The IP address this binding resolves to.
    pub fn ip(&self) -> IpAddr {
        match self {
            HostBinding::Open(true) => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            HostBinding::Open(false) => IpAddr::V4(Ipv4Addr::LOCALHOST),
            HostBinding::Addr(ip) => *ip,
        }
    }
}

/// TLS mode selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TlsMode {
    /// Plain HTTP, no TLS
    #[default]
    None,
    /// PEM key/certificate embedded in the configuration file
    Inline,
    /// PEM key/certificate files read from disk at startup
    Manual,
}

impl TlsMode {
    /// Whether this mode serves HTTPS.
    pub fn enabled(&self) -> bool {
        !matches!(self, TlsMode::None)
    }
}

/// TLS transport settings
#[derive(Debug, Clone, Deserialize)]
pub struct TlsConfig {
    #[serde(default)]
    pub mode: TlsMode,
    /// PEM-encoded private key (inline mode)
    pub key_pem: Option<String>,
    /// PEM-encoded certificate chain (inline mode)
    pub cert_pem: Option<String>,
    /// Path to the PEM private key file (manual mode)
    pub key_path: Option<String>,
    /// Path to the PEM certificate file (manual mode)
    pub cert_path: Option<String>,
    /// Run a plain-HTTP listener that redirects to HTTPS
    #[serde(default)]
    pub redirect_http: bool,
    /// Port for the redirect listener
    #[serde(default = "TlsConfig::default_redirect_port")]
    pub redirect_port: u16,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            mode: TlsMode::None,
            key_pem: None,
            cert_pem: None,
            key_path: None,
            cert_path: None,
            redirect_http: false,
            redirect_port: Self::default_redirect_port(),
        }
    }
}

impl TlsConfig {
    fn default_redirect_port() -> u16 {
        DEFAULT_REDIRECT_PORT
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self.mode {
            TlsMode::None => Ok(()),
            TlsMode::Inline => {
                if self.key_pem.as_deref().map_or(true, str::is_empty) {
                    return Err(ConfigError::Validation(
                        "TLS mode 'inline' requires a non-empty 'key_pem' in [server.tls]"
                            .to_string(),
                    ));
                }
                if self.cert_pem.as_deref().map_or(true, str::is_empty) {
                    return Err(ConfigError::Validation(
                        "TLS mode 'inline' requires a non-empty 'cert_pem' in [server.tls]"
                            .to_string(),
                    ));
                }
                Ok(())
            }
            TlsMode::Manual => {
                if self.key_path.is_none() {
                    return Err(ConfigError::Validation(
                        "TLS mode 'manual' requires 'key_path' in [server.tls]".to_string(),
                    ));
                }
                if self.cert_path.is_none() {
                    return Err(ConfigError::Validation(
                        "TLS mode 'manual' requires 'cert_path' in [server.tls]".to_string(),
                    ));
                }
                Ok(())
            }
        }
    }
}

/// A single entry in the plugin pipeline. The name is resolved against the
/// plugin registry at startup; the pipeline runs in declaration order.
#[derive(Debug, Clone, Deserialize)]
pub struct PluginConfig {
    pub name: String,
}

impl PluginConfig {
    /// Default pipeline when no `[[plugin]]` sections are configured:
    /// the framework plugin followed by the CSS plugin.
    pub fn default_pipeline() -> Vec<Self> {
        vec![
            Self {
                name: "react".to_string(),
            },
            Self {
                name: "tailwindcss".to_string(),
            },
        ]
    }
}

/// Static asset configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AssetConfig {
    /// Directory holding the built client assets
    #[serde(default = "AssetConfig::default_root")]
    pub root: String,
    /// Index document, served as SPA fallback
    #[serde(default = "AssetConfig::default_index")]
    pub index: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            root: Self::default_root(),
            index: Self::default_index(),
        }
    }
}

impl AssetConfig {
    fn default_root() -> String {
        DEFAULT_ASSET_ROOT.to_string()
    }

    fn default_index() -> String {
        DEFAULT_INDEX_FILE.to_string()
    }

    /// Full path to the index document.
    pub fn index_path(&self) -> PathBuf {
        Path::new(&self.root).join(&self.index)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    #[serde(default = "LoggingConfig::default_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_LOG_FORMAT.to_string(),
        }
    }
}

impl LoggingConfig {
    fn default_format() -> String {
        DEFAULT_LOG_FORMAT.to_string()
    }
}

impl DevConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate a configuration from TOML text.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let mut config: DevConfig = toml::from_str(contents)?;

        // No [[plugin]] sections means the stock pipeline
        if config.plugins.is_empty() {
            config.plugins = PluginConfig::default_pipeline();
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.server.tls.validate()?;
        self.server.header_pairs()?;
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hsts_value_is_one_year() {
        assert_eq!(HSTS_HEADER_VALUE, "max-age=31536000");
    }

    #[test]
    fn empty_config_defaults_to_plain_http() {
        let config = DevConfig::from_toml("").unwrap();
        assert_eq!(config.server.tls.mode, TlsMode::None);
        assert_eq!(config.server.effective_port(), 5080);
        assert_eq!(
            config.server.bind_addr().ip(),
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        );
    }

    #[test]
    fn tls_mode_shifts_default_port() {
        let config = DevConfig::from_toml(
            r#"
            [server.tls]
            mode = "manual"
            key_path = "/etc/ssl/certs/focust-react-client.key"
            cert_path = "/etc/ssl/certs/focust-react-client.crt"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.effective_port(), 5443);
    }

    #[test]
    fn explicit_port_wins_over_default() {
        let config = DevConfig::from_toml("[server]\nport = 3000").unwrap();
        assert_eq!(config.server.effective_port(), 3000);
    }

    #[test]
    fn host_true_binds_all_interfaces() {
        let config = DevConfig::from_toml("[server]\nhost = true").unwrap();
        assert_eq!(
            config.server.bind_addr().ip(),
            IpAddr::V4(Ipv4Addr::UNSPECIFIED)
        );
    }

    #[test]
    fn host_accepts_explicit_address() {
        let config = DevConfig::from_toml("[server]\nhost = \"192.168.1.10\"").unwrap();
        assert_eq!(
            config.server.bind_addr().ip(),
            "192.168.1.10".parse::<IpAddr>().unwrap()
        );
    }

    #[test]
    fn manual_mode_records_configured_paths() {
        let config = DevConfig::from_toml(
            r#"
            [server.tls]
            mode = "manual"
            key_path = "/etc/ssl/certs/focust-react-client.key"
            cert_path = "/etc/ssl/certs/focust-react-client.crt"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.server.tls.key_path.as_deref(),
            Some("/etc/ssl/certs/focust-react-client.key")
        );
        assert_eq!(
            config.server.tls.cert_path.as_deref(),
            Some("/etc/ssl/certs/focust-react-client.crt")
        );
    }

    #[test]
    fn manual_mode_requires_both_paths() {
        let err =
            DevConfig::from_toml("[server.tls]\nmode = \"manual\"\nkey_path = \"/tmp/k.pem\"")
                .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn inline_mode_rejects_empty_pem() {
        let err =
            DevConfig::from_toml("[server.tls]\nmode = \"inline\"\nkey_pem = \"\"\ncert_pem = \"\"")
                .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn default_pipeline_is_react_then_tailwind() {
        let config = DevConfig::from_toml("").unwrap();
        let names: Vec<&str> = config.plugins.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["react", "tailwindcss"]);
    }

    #[test]
    fn configured_plugin_order_is_preserved() {
        let config =
            DevConfig::from_toml("[[plugin]]\nname = \"tailwindcss\"\n[[plugin]]\nname = \"react\"")
                .unwrap();
        let names: Vec<&str> = config.plugins.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["tailwindcss", "react"]);
    }

    #[test]
    fn malformed_header_name_is_rejected() {
        let err = DevConfig::from_toml("[server.headers]\n\"bad header\" = \"x\"").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn headers_parse_into_typed_pairs() {
        let config =
            DevConfig::from_toml("[server.headers]\n\"X-Frame-Options\" = \"DENY\"").unwrap();
        let pairs = config.server.header_pairs().unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0.as_str(), "x-frame-options");
    }
}
