use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub timing: TimingConfig,
    pub polling: PollingConfig,
    pub notifications: NotificationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Backend base URL, e.g. "https://api.prepfrog.app"
    pub base_url: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

/// Wall-clock budgets for one question
#[derive(Debug, Clone, Deserialize)]
pub struct TimingConfig {
    /// Seconds allowed before recording starts
    pub grace_secs: u64,
    /// Seconds allowed once recording has started
    pub answer_secs: u64,
    /// Re-recording attempts allowed per question
    pub retry_budget: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollingConfig {
    /// Seconds between result polls
    pub interval_secs: u64,
    /// Polls attempted before giving up
    pub max_attempts: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    /// Server-push subscription path (SSE)
    pub path: String,
    /// Reconnect backoff floor in seconds
    pub backoff_base_secs: u64,
    /// Reconnect backoff cap in seconds
    pub backoff_cap_secs: u64,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "http://localhost:8080".to_string(),
                request_timeout_secs: 30,
            },
            timing: TimingConfig::default(),
            polling: PollingConfig::default(),
            notifications: NotificationConfig::default(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            grace_secs: 30,  // pre-recording grace
            answer_secs: 80, // recording budget
            retry_budget: 1,
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_secs: 3,
            max_attempts: 60,
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            path: "/api/subscribe".to_string(),
            backoff_base_secs: 1,
            backoff_cap_secs: 30,
        }
    }
}
