//! Fetch settings, with environment overrides.

use std::time::Duration;

use b3od_api::SessionConfig;

/// Settings shared by every fetch a [`crate::B3Client`] performs.
#[derive(Clone, Debug)]
pub struct FetchConfig {
    pub connect_retries: u32,
    /// Backoff multiplier in seconds.
    pub backoff_factor: f64,
    pub backoff_max: Duration,
    /// Per-request deadline.
    pub timeout: Duration,
    /// Maximum number of dates fetched at the same time.
    pub concurrency: usize,
    /// Non-JSON pages tolerated in a row before pagination stops early.
    pub max_page_errors: u32,
    pub tables_base_url: String,
    pub api_base_url: String,
    pub bmf_base_url: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        let session = SessionConfig::default();
        Self {
            connect_retries: session.connect_retries,
            backoff_factor: session.backoff_factor,
            backoff_max: session.backoff_max,
            timeout: session.timeout,
            concurrency: default_concurrency(),
            max_page_errors: 5,
            tables_base_url: "https://arquivos.b3.com.br/tabelas/table".to_string(),
            api_base_url: "https://arquivos.b3.com.br/api".to_string(),
            bmf_base_url: "https://bvmf.bmfbovespa.com.br".to_string(),
        }
    }
}

impl FetchConfig {
    /// Defaults overridden by `B3OD_*` environment variables. Unparseable
    /// values are ignored.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            connect_retries: env_parse("B3OD_CONNECT_RETRIES", defaults.connect_retries),
            backoff_factor: env_parse("B3OD_BACKOFF_FACTOR", defaults.backoff_factor),
            backoff_max: Duration::from_secs(env_parse(
                "B3OD_BACKOFF_MAX",
                defaults.backoff_max.as_secs(),
            )),
            timeout: Duration::from_secs(env_parse("B3OD_TIMEOUT_SECS", defaults.timeout.as_secs())),
            concurrency: env_parse("B3OD_CONCURRENCY", defaults.concurrency),
            max_page_errors: env_parse("B3OD_MAX_PAGE_ERRORS", defaults.max_page_errors),
            tables_base_url: env_string("B3OD_TABLES_URL", defaults.tables_base_url),
            api_base_url: env_string("B3OD_API_URL", defaults.api_base_url),
            bmf_base_url: env_string("B3OD_BMF_URL", defaults.bmf_base_url),
        }
    }

    /// Points every endpoint at one host. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            tables_base_url: format!("{}/tabelas/table", base),
            api_base_url: format!("{}/api", base),
            bmf_base_url: base.to_string(),
            ..Self::default()
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            connect_retries: self.connect_retries,
            backoff_factor: self.backoff_factor,
            backoff_max: self.backoff_max,
            timeout: self.timeout,
        }
    }
}

fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|val| val.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn env_string(key: &str, default: String) -> String {
    std::env::var(key)
        .ok()
        .filter(|val| !val.trim().is_empty())
        .unwrap_or(default)
}
