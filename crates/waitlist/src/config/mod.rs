use std::env;
use std::net::{IpAddr, SocketAddr};

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

    /// Listing and reset endpoints are only mounted outside production.
    pub fn exposes_admin_routes(self) -> bool {
        !matches!(self, Self::Production)
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub waitlist: WaitlistConfig,
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
        let format = match env::var("APP_LOG_FORMAT") {
            Ok(raw) => LogFormat::parse(&raw).ok_or(ConfigError::InvalidLogFormat(raw))?,
            Err(_) => LogFormat::Compact,
        };

        let base_url = env::var("WAITLIST_BASE_URL")
            .unwrap_or_else(|_| WaitlistConfig::DEFAULT_BASE_URL.to_string());
        let referral_code_length = match env::var("WAITLIST_CODE_LENGTH") {
            Ok(raw) => parse_code_length(&raw)?,
            Err(_) => WaitlistConfig::DEFAULT_CODE_LENGTH,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level, format },
            waitlist: WaitlistConfig::new(base_url, referral_code_length),
        })
    }
}

fn parse_code_length(raw: &str) -> Result<usize, ConfigError> {
    let length = raw
        .trim()
        .parse::<usize>()
        .map_err(|_| ConfigError::InvalidCodeLength)?;
    if WaitlistConfig::CODE_LENGTH_RANGE.contains(&length) {
        Ok(length)
    } else {
        Err(ConfigError::InvalidCodeLength)
    }
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
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" | "text" => Some(Self::Compact),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Public-facing waitlist settings: where referral links point and how long codes are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitlistConfig {
    pub base_url: String,
    pub referral_code_length: usize,
}

impl WaitlistConfig {
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:3000";
    pub const DEFAULT_CODE_LENGTH: usize = 8;
    pub const CODE_LENGTH_RANGE: std::ops::RangeInclusive<usize> = 4..=32;

    pub fn new(base_url: impl Into<String>, referral_code_length: usize) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            referral_code_length,
        }
    }

    /// Shareable link for a referral code: `<base-url>/waitlist?ref=<code>`.
    pub fn referral_link(&self, code: &str) -> String {
        format!("{}/waitlist?ref={}", self.base_url, code)
    }
}

impl Default for WaitlistConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BASE_URL, Self::DEFAULT_CODE_LENGTH)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("APP_PORT must be a valid u16")]
    InvalidPort,
    #[error("APP_HOST must parse to an IPv4 or IPv6 address")]
    InvalidHost {
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("APP_LOG_FORMAT must be 'compact' or 'json', got '{0}'")]
    InvalidLogFormat(String),
    #[error("WAITLIST_CODE_LENGTH must be an integer between 4 and 32")]
    InvalidCodeLength,
}
