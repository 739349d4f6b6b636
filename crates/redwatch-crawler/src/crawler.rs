use std::cmp::Ordering;
use std::thread;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::config::CrawlerConfig;
use crate::fetch::Fetch;
use crate::models::{ContentItem, ItemKind};
use crate::parse::{parse_listing_page, parse_user_page};

/// Drives fetch -> parse -> accumulate loops over paginated listings.
///
/// One engine serves both crawl modes: the community "new" feed (capped
/// by item count) and per-user history streams (capped by item count and
/// a time cutoff). A fetch failure truncates the crawl to whatever was
/// collected so far; partial results are kept, never discarded.
pub struct Crawler<F> {
    fetcher: F,
    base_url: String,
    page_delay: Duration,
}

impl<F: Fetch> Crawler<F> {
    pub fn new(config: &CrawlerConfig, fetcher: F) -> Self {
        Self {
            fetcher,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            page_delay: Duration::from_secs_f64(config.request_delay_seconds),
        }
    }

    /// Newest submissions from a community feed, at most `max_posts`,
    /// drawn in page order.
    pub fn fetch_new_posts(&self, community: &str, max_posts: usize) -> Vec<ContentItem> {
        let mut collected = Vec::new();
        let mut url = format!("{}/r/{}/?sort=new", self.base_url, community);

        while collected.len() < max_posts {
            let html = match self.fetcher.fetch(&url) {
                Ok(html) => html,
                Err(e) => {
                    log::warn!("stopping r/{community} feed crawl: {e}");
                    break;
                }
            };

            let (page_items, next_url) = parse_listing_page(&html, community, &self.base_url);
            for item in page_items {
                if collected.len() >= max_posts {
                    break;
                }
                collected.push(item);
            }

            if collected.len() >= max_posts {
                break;
            }
            match next_url {
                Some(next) => {
                    thread::sleep(self.page_delay);
                    url = next;
                }
                None => break,
            }
        }

        collected
    }

    /// A user's submissions and comments since `since`, newest-first.
    ///
    /// `max_items` is the combined budget across both streams (`None`
    /// means unbounded). Submissions get the larger half of an odd
    /// budget; comments fill whatever the submissions stream left over.
    pub fn fetch_user_history(
        &self,
        username: &str,
        since: DateTime<Utc>,
        max_items: Option<usize>,
    ) -> Vec<ContentItem> {
        if max_items == Some(0) {
            return Vec::new();
        }
        let cutoff_ts = since.timestamp() as f64;

        let mut history = Vec::new();

        let max_submissions = max_items.map(|n| (n + 1) / 2);
        if max_submissions != Some(0) {
            history.extend(self.fetch_user_stream(
                username,
                ItemKind::Submission,
                "submitted",
                cutoff_ts,
                max_submissions,
            ));
        }

        let remaining = max_items.map(|n| n.saturating_sub(history.len()));
        if remaining != Some(0) {
            history.extend(self.fetch_user_stream(
                username,
                ItemKind::Comment,
                "comments",
                cutoff_ts,
                remaining,
            ));
        }

        history.sort_by(|a, b| {
            b.created_utc
                .partial_cmp(&a.created_utc)
                .unwrap_or(Ordering::Equal)
        });
        history
    }

    fn fetch_user_stream(
        &self,
        username: &str,
        kind: ItemKind,
        path: &str,
        cutoff_ts: f64,
        max_items: Option<usize>,
    ) -> Vec<ContentItem> {
        let mut collected = Vec::new();
        let mut url = format!("{}/user/{}/{}/", self.base_url, username, path);

        loop {
            if let Some(cap) = max_items {
                if collected.len() >= cap {
                    break;
                }
            }

            let html = match self.fetcher.fetch(&url) {
                Ok(html) => html,
                Err(e) => {
                    log::warn!("stopping u/{username} {path} crawl: {e}");
                    break;
                }
            };

            let (mut page_items, next_url, mut stop) =
                parse_user_page(&html, username, kind, cutoff_ts, &self.base_url);

            if let Some(cap) = max_items {
                let remaining = cap - collected.len();
                if page_items.len() > remaining {
                    page_items.truncate(remaining);
                    // At the cap after this page; no point following next_url.
                    stop = true;
                }
            }
            collected.extend(page_items);

            match (next_url, stop) {
                (Some(next), false) => {
                    thread::sleep(self.page_delay);
                    url = next;
                }
                _ => break,
            }
        }

        collected
    }
}
