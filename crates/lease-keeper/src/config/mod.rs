//! Service settings read from `APP_*` environment variables, optionally through a `.env` file.
//!
//! | Variable | Default | Meaning |
//! | --- | --- | --- |
//! | `APP_ENV` | `development` | `production`/`prod`, `test`/`ci`, anything else is development |
//! | `APP_HOST` | `127.0.0.1` | IP address (or `localhost`) the lease API binds to |
//! | `APP_PORT` | `3000` | TCP port of the lease API |
//! | `APP_LOG_LEVEL` | `info` | `tracing` filter directive, e.g. `lease_keeper=debug` |
//! | `APP_LOG_FORMAT` | `compact` | `compact` or `json` |
//! | `APP_SEED_DEMO` | `false` | seed the in-memory store with the demo portfolio at startup |
//!
//! Empty values count as unset.

use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_LOG_LEVEL: &str = "info";

/// Deployment stage, reported in the startup log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Everything the lease keeper service needs before it can serve.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    /// Start with sample housings, tenants and leases instead of an empty store.
    pub seed_demo: bool,
}

fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = var("APP_ENV")
            .map(|value| AppEnvironment::parse(&value))
            .unwrap_or(AppEnvironment::Development);

        let port = match var("APP_PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort { value })?,
            None => DEFAULT_PORT,
        };
        let server = ServerConfig {
            host: var("APP_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
        };

        let telemetry = TelemetryConfig {
            log_level: var("APP_LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            log_format: var("APP_LOG_FORMAT")
                .map(|value| LogFormat::parse(&value))
                .transpose()?
                .unwrap_or(LogFormat::Compact),
        };

        let seed_demo = var("APP_SEED_DEMO")
            .map(|value| parse_flag("APP_SEED_DEMO", &value))
            .transpose()?
            .unwrap_or(false);

        Ok(Self {
            environment,
            server,
            telemetry,
            seed_demo,
        })
    }
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            name,
            value: value.to_string(),
        }),
    }
}

/// Where the lease API listens. `--host` and `--port` on `serve` override both fields.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip = if self.host.eq_ignore_ascii_case("localhost") {
            IpAddr::from([127, 0, 0, 1])
        } else {
            self.host
                .parse()
                .map_err(|source| ConfigError::InvalidHost {
                    host: self.host.clone(),
                    source,
                })?
        };
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable single-line events.
    Compact,
    /// One JSON object per event with fields flattened to the top level.
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" | "text" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::InvalidLogFormat {
                value: value.to_string(),
            }),
        }
    }
}

/// Input to [`crate::telemetry::init`].
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_format: LogFormat::Compact,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort {
        value: String,
    },
    InvalidHost {
        host: String,
        source: std::net::AddrParseError,
    },
    InvalidLogFormat {
        value: String,
    },
    InvalidFlag {
        name: &'static str,
        value: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort { value } => {
                write!(f, "APP_PORT must be a port number (found '{value}')")
            }
            ConfigError::InvalidHost { host, .. } => {
                write!(f, "APP_HOST must be an IP address or localhost (found '{host}')")
            }
            ConfigError::InvalidLogFormat { value } => {
                write!(f, "APP_LOG_FORMAT must be 'compact' or 'json' (found '{value}')")
            }
            ConfigError::InvalidFlag { name, value } => {
                write!(f, "{name} must be a boolean flag (found '{value}')")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source, .. } => Some(source),
            ConfigError::InvalidPort { .. }
            | ConfigError::InvalidLogFormat { .. }
            | ConfigError::InvalidFlag { .. } => None,
        }
    }
}
