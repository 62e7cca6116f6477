/*
 * Responsibility
 * - Load settings from the environment (.env is honoured via dotenvy)
 * - Validate them once at startup (missing required keys abort the process)
 * - Handlers receive these through AppState and never read the environment
 */
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use secrecy::SecretString;

pub const DEFAULT_LOGIN_ENDPOINT: &str = "https://login.microsoftonline.com";
pub const DEFAULT_GRAPH_SCOPE: &str = "https://graph.microsoft.com/.default";
pub const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.microsoft.com/v1.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<&str>) -> Self {
        match raw.unwrap_or("development").to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Client-credentials settings for the identity provider.
///
/// The authority is kept as a raw string: it is only checked when a
/// requester is built, so a malformed value surfaces per request as 503.
#[derive(Debug)]
pub struct IdentityConfig {
    pub authority: String,
    pub client_id: String,
    pub client_secret: SecretString,
    pub scopes: Vec<String>,
}

#[derive(Debug)]
pub struct GraphConfig {
    pub base_url: String,
    pub max_pages: usize,
}

#[derive(Debug)]
pub struct HttpConfig {
    pub request_timeout: Duration,
    /// Per outbound call (token endpoint, each Graph page). Kept below
    /// `request_timeout` so a slow upstream is reported as an upstream error.
    pub upstream_timeout: Duration,
    pub body_limit_bytes: usize,
}

#[derive(Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub identity: IdentityConfig,
    pub graph: GraphConfig,
    pub http: HttpConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup (the process environment in
    /// production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        // The Functions host hands custom handlers their port through this variable.
        let port = match get("FUNCTIONS_CUSTOMHANDLER_PORT") {
            Some(raw) => parse_number::<u16>(&raw, "FUNCTIONS_CUSTOMHANDLER_PORT")?,
            None => match get("PORT") {
                Some(raw) => parse_number::<u16>(&raw, "PORT")?,
                None => 3000,
            },
        };
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let app_env = AppEnv::parse(get("APP_ENV").as_deref());

        let authority = match get("AZURE_AUTHORITY") {
            Some(authority) => authority,
            None => {
                let tenant = get("AZURE_TENANT_ID")
                    .ok_or(ConfigError::Missing("AZURE_AUTHORITY or AZURE_TENANT_ID"))?;
                format!("{}/{}", DEFAULT_LOGIN_ENDPOINT, tenant.trim())
            }
        };

        let client_id = get("AZURE_CLIENT_ID").ok_or(ConfigError::Missing("AZURE_CLIENT_ID"))?;

        let client_secret: SecretString = get("CLIENT_CREDENTIAL")
            .ok_or(ConfigError::Missing("CLIENT_CREDENTIAL"))?
            .into();

        let scopes = get("GRAPH_SCOPE")
            .unwrap_or_else(|| DEFAULT_GRAPH_SCOPE.to_string())
            .split_whitespace()
            .map(str::to_string)
            .collect::<Vec<_>>();

        let base_url = get("GRAPH_BASE_URL").unwrap_or_else(|| DEFAULT_GRAPH_BASE_URL.to_string());

        let max_pages = match get("GRAPH_MAX_PAGES") {
            Some(raw) => parse_number::<usize>(&raw, "GRAPH_MAX_PAGES")?,
            None => 10,
        };
        if max_pages == 0 {
            return Err(ConfigError::Invalid("GRAPH_MAX_PAGES"));
        }

        let request_timeout_seconds = match get("REQUEST_TIMEOUT_SECONDS") {
            Some(raw) => parse_number::<u64>(&raw, "REQUEST_TIMEOUT_SECONDS")?,
            None => 30,
        };

        let upstream_timeout_seconds = match get("UPSTREAM_TIMEOUT_SECONDS") {
            Some(raw) => parse_number::<u64>(&raw, "UPSTREAM_TIMEOUT_SECONDS")?,
            None => request_timeout_seconds.saturating_sub(1).clamp(1, 10),
        };
        if upstream_timeout_seconds == 0 || upstream_timeout_seconds >= request_timeout_seconds {
            return Err(ConfigError::Invalid("UPSTREAM_TIMEOUT_SECONDS"));
        }

        let body_limit_bytes = match get("REQUEST_BODY_LIMIT_BYTES") {
            Some(raw) => parse_number::<usize>(&raw, "REQUEST_BODY_LIMIT_BYTES")?,
            None => 64 * 1024,
        };

        Ok(Self {
            addr,
            app_env,
            identity: IdentityConfig {
                authority: authority.trim_end_matches('/').to_string(),
                client_id,
                client_secret,
                scopes,
            },
            graph: GraphConfig {
                base_url,
                max_pages,
            },
            http: HttpConfig {
                request_timeout: Duration::from_secs(request_timeout_seconds),
                upstream_timeout: Duration::from_secs(upstream_timeout_seconds),
                body_limit_bytes,
            },
        })
    }
}

fn parse_number<T: std::str::FromStr>(raw: &str, key: &'static str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid(key))
}
