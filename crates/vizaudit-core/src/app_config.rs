use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub directories_path: PathBuf,
    pub places_api_key: Option<String>,
    pub pagespeed_api_key: Option<String>,
    pub default_country: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub webcheck_timeout_secs: u64,
    pub webcheck_user_agent: String,
    pub cache_freshness_days: i32,
    pub places_timeout_secs: u64,
    pub places_max_retries: u32,
    pub places_retry_backoff_base_ms: u64,
    pub competitor_limit: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("directories_path", &self.directories_path)
            .field("database_url", &"[redacted]")
            .field(
                "places_api_key",
                &self.places_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "pagespeed_api_key",
                &self.pagespeed_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("default_country", &self.default_country)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("webcheck_timeout_secs", &self.webcheck_timeout_secs)
            .field("webcheck_user_agent", &self.webcheck_user_agent)
            .field("cache_freshness_days", &self.cache_freshness_days)
            .field("places_timeout_secs", &self.places_timeout_secs)
            .field("places_max_retries", &self.places_max_retries)
            .field(
                "places_retry_backoff_base_ms",
                &self.places_retry_backoff_base_ms,
            )
            .field("competitor_limit", &self.competitor_limit)
            .finish()
    }
}
