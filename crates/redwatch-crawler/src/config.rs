use serde::{Deserialize, Serialize};

use crate::client::Backend;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Polite delay between successive page fetches, also reused as the
    /// backoff between retries of a single fetch.
    #[serde(default = "default_request_delay")]
    pub request_delay_seconds: f64,

    #[serde(default = "default_timeout")]
    pub timeout_seconds: f64,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_backend")]
    pub backend: Backend,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            request_delay_seconds: default_request_delay(),
            timeout_seconds: default_timeout(),
            max_retries: default_max_retries(),
            backend: default_backend(),
        }
    }
}

fn default_base_url() -> String {
    String::from("https://old.reddit.com")
}

fn default_user_agent() -> String {
    String::from("redwatch/0.1")
}

fn default_request_delay() -> f64 {
    1.0
}

fn default_timeout() -> f64 {
    10.0
}

fn default_max_retries() -> u32 {
    3
}

fn default_backend() -> Backend {
    Backend::Html
}
