use crate::workflows::requisition::StageId;
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub workflow: WorkflowConfig,
    pub rate_limit: RateLimitConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let reject_stages = match env::var("APP_REJECT_STAGES") {
            Ok(raw) => Some(parse_reject_stages(&raw)?),
            Err(_) => None,
        };

        // Zero would silently block (or never limit) every mutating request,
        // so both knobs must be at least one.
        let rate_limit_max = env::var("APP_RATE_LIMIT_MAX")
            .unwrap_or_else(|_| "60".to_string())
            .parse::<usize>()
            .ok()
            .filter(|max| *max > 0)
            .ok_or(ConfigError::InvalidRateLimit)?;
        let rate_limit_window_secs = env::var("APP_RATE_LIMIT_WINDOW_SECS")
            .unwrap_or_else(|_| "60".to_string())
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or(ConfigError::InvalidRateLimit)?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            workflow: WorkflowConfig { reject_stages },
            rate_limit: RateLimitConfig {
                max_requests: rate_limit_max,
                window: Duration::from_secs(rate_limit_window_secs),
            },
        })
    }
}

fn parse_reject_stages(raw: &str) -> Result<Vec<StageId>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(|tag| {
            StageId::parse(tag).ok_or_else(|| ConfigError::InvalidRejectStage {
                value: tag.to_string(),
            })
        })
        .collect()
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Workflow policy knobs. `reject_stages` absent means rejection is allowed
/// from any non-terminal stage.
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    pub reject_stages: Option<Vec<StageId>>,
}

/// Per-caller request throttling for the mutating endpoints.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub max_requests: usize,
    pub window: Duration,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("APP_PORT must be a valid u16")]
    InvalidPort,
    #[error("APP_HOST must parse to an IPv4 or IPv6 address")]
    InvalidHost { source: std::net::AddrParseError },
    #[error("APP_REJECT_STAGES contains an unknown stage tag '{value}'")]
    InvalidRejectStage { value: String },
    #[error("APP_RATE_LIMIT_MAX and APP_RATE_LIMIT_WINDOW_SECS must be positive integers")]
    InvalidRateLimit,
}
