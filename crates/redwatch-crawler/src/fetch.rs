use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;

use crate::config::CrawlerConfig;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// 403/404: the resource is suspended, private or deleted. Never
    /// retried.
    #[error("resource gone: {0}")]
    Gone(String),
    /// Transient failures (network error, timeout, unexpected status)
    /// that survived every retry.
    #[error("retries exhausted for {url}: {source}")]
    Exhausted {
        url: String,
        #[source]
        source: anyhow::Error,
    },
}

/// A single bounded page download. Callers treat any error as "stop
/// crawling this URL chain", whatever the variant.
pub trait Fetch {
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

impl<T: Fetch + ?Sized> Fetch for &T {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        (**self).fetch(url)
    }
}

pub struct HttpFetcher {
    client: Client,
    retry_delay: Duration,
    max_retries: u32,
}

impl HttpFetcher {
    pub fn new(config: &CrawlerConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs_f64(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .build()?;
        Ok(Self {
            client,
            retry_delay: Duration::from_secs_f64(config.request_delay_seconds),
            max_retries: config.max_retries,
        })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let mut last_err = anyhow::anyhow!("no attempt made");

        for attempt in 0..self.max_retries {
            if attempt > 0 {
                thread::sleep(self.retry_delay);
            }

            match self.client.get(url).send() {
                Ok(resp) => match resp.status() {
                    StatusCode::OK => match resp.text() {
                        Ok(body) => return Ok(body),
                        Err(e) => last_err = e.into(),
                    },
                    StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => {
                        return Err(FetchError::Gone(url.to_string()));
                    }
                    status => {
                        last_err = anyhow::anyhow!("unexpected status {status} for {url}");
                    }
                },
                Err(e) => last_err = e.into(),
            }
        }

        Err(FetchError::Exhausted {
            url: url.to_string(),
            source: last_err,
        })
    }
}
