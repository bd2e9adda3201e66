use std::env;
use std::time::Duration;

use tracing::warn;

/// Connection settings for the question bank.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TriviaConfig {
    pub base_url: String,
    /// Minimum spacing between two dispatched requests.
    pub min_interval: Duration,
    /// Per-request timeout; `None` waits for the transport default.
    pub timeout: Option<Duration>,
}

impl TriviaConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://opentdb.com";
    pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(5_000);

    /// Read overrides from `TRIVIA_BASE_URL`, `TRIVIA_MIN_INTERVAL_MS` and
    /// `TRIVIA_TIMEOUT_SECS`, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(base_url) = env::var("TRIVIA_BASE_URL") {
            if !base_url.trim().is_empty() {
                config.base_url = base_url.trim().to_string();
            }
        }
        if let Some(ms) = read_u64("TRIVIA_MIN_INTERVAL_MS") {
            config.min_interval = Duration::from_millis(ms);
        }
        if let Some(secs) = read_u64("TRIVIA_TIMEOUT_SECS") {
            config.timeout = Some(Duration::from_secs(secs));
        }
        config
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_min_interval(mut self, min_interval: Duration) -> Self {
        self.min_interval = min_interval;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

impl Default for TriviaConfig {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            min_interval: Self::DEFAULT_MIN_INTERVAL,
            timeout: None,
        }
    }
}

fn read_u64(key: &str) -> Option<u64> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse::<u64>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "ignoring non-numeric setting");
            None
        }
    }
}
