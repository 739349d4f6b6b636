use std::env;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::CrawlerConfig;
use crate::crawler::Crawler;
use crate::fetch::{Fetch, HttpFetcher};
use crate::models::ContentItem;

/// Anything able to serve the two crawl modes. Implementations decide
/// *how* the data is collected (HTML scraping, official API); the rest
/// of the pipeline only sees `ContentItem`s.
pub trait ContentClient {
    /// Recent posts for a community, newest-first, best-effort `limit`.
    fn fetch_new_posts(&self, community: &str, limit: usize) -> Vec<ContentItem>;

    /// User activity since `since`, newest-first. `None` means no cap on
    /// the total number of items.
    fn fetch_user_history(
        &self,
        username: &str,
        since: DateTime<Utc>,
        max_items: Option<usize>,
    ) -> Vec<ContentItem>;
}

impl<F: Fetch> ContentClient for Crawler<F> {
    fn fetch_new_posts(&self, community: &str, limit: usize) -> Vec<ContentItem> {
        Crawler::fetch_new_posts(self, community, limit)
    }

    fn fetch_user_history(
        &self,
        username: &str,
        since: DateTime<Utc>,
        max_items: Option<usize>,
    ) -> Vec<ContentItem> {
        Crawler::fetch_user_history(self, username, since, max_items)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Html,
    Api,
}

#[derive(Debug, Clone)]
pub struct ApiCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
}

impl ApiCredentials {
    /// Read `REDWATCH_CLIENT_ID`, `REDWATCH_CLIENT_SECRET` and
    /// `REDWATCH_API_USER_AGENT`; `None` if any is missing.
    pub fn from_env() -> Option<Self> {
        let client_id = env::var("REDWATCH_CLIENT_ID").ok()?;
        let client_secret = env::var("REDWATCH_CLIENT_SECRET").ok()?;
        let user_agent = env::var("REDWATCH_API_USER_AGENT").ok()?;
        Some(Self {
            client_id,
            client_secret,
            user_agent,
        })
    }
}

/// Official-API placeholder. Wiring exists so a real implementation can
/// slot in behind the same trait; both methods currently return empty
/// lists and issue no requests.
pub struct ApiClient {
    _credentials: ApiCredentials,
}

impl ApiClient {
    pub fn new(credentials: ApiCredentials) -> Self {
        Self {
            _credentials: credentials,
        }
    }
}

impl ContentClient for ApiClient {
    fn fetch_new_posts(&self, _community: &str, _limit: usize) -> Vec<ContentItem> {
        Vec::new()
    }

    fn fetch_user_history(
        &self,
        _username: &str,
        _since: DateTime<Utc>,
        _max_items: Option<usize>,
    ) -> Vec<ContentItem> {
        Vec::new()
    }
}

/// Backend selection is an explicit construction-time decision: the API
/// backend is only used when requested *and* credentials resolve,
/// otherwise the HTML crawler is returned.
pub fn make_client(config: &CrawlerConfig) -> anyhow::Result<Box<dyn ContentClient>> {
    if config.backend == Backend::Api {
        match ApiCredentials::from_env() {
            Some(credentials) => return Ok(Box::new(ApiClient::new(credentials))),
            None => {
                log::warn!("api backend requested but credentials missing, using html crawler");
            }
        }
    }
    let fetcher = HttpFetcher::new(config)?;
    Ok(Box::new(Crawler::new(config, fetcher)))
}
