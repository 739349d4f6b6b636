mod client;
mod config;
mod crawler;
mod fetch;
mod models;
mod parse;

pub use client::{make_client, ApiClient, ApiCredentials, Backend, ContentClient};
pub use config::CrawlerConfig;
pub use crawler::Crawler;
pub use fetch::{Fetch, FetchError, HttpFetcher};
pub use models::{ContentItem, ItemKind, DELETED_AUTHOR};
pub use parse::{parse_listing_page, parse_user_page};

pub use anyhow;
