use std::fs::File;
use std::path::{Path, PathBuf};

use redwatch_crawler::CrawlerConfig;
use redwatch_scoring::Thresholds;
use serde::{Deserialize, Serialize};

/// Full application configuration, deserialized once at startup from an
/// optional YAML file and passed by reference into every stage. Every
/// field has a default so an empty (or absent) file is valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default)]
    pub crawler: CrawlerConfig,

    #[serde(default)]
    pub collection: CollectionConfig,

    #[serde(default)]
    pub scoring: ScoringConfig,

    #[serde(default)]
    pub paths: PathsConfig,
}

impl AppConfig {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Ok(serde_yaml::from_reader(File::open(path)?)?),
            None => Ok(Self::default()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionConfig {
    /// Communities whose "new" feeds are scanned.
    #[serde(default = "default_target_communities")]
    pub target_communities: Vec<String>,

    #[serde(default = "default_max_posts_per_community")]
    pub max_posts_per_community: usize,

    /// Safety cap for an entire collection run.
    #[serde(default = "default_max_total_posts")]
    pub max_total_posts: usize,

    /// Lookback window for user history, in days.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: i64,

    /// Hard cap per user, so very active accounts don't crawl forever.
    #[serde(default = "default_max_user_history_items")]
    pub max_user_history_items: usize,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            target_communities: default_target_communities(),
            max_posts_per_community: default_max_posts_per_community(),
            max_total_posts: default_max_total_posts(),
            lookback_days: default_lookback_days(),
            max_user_history_items: default_max_user_history_items(),
        }
    }
}

fn default_target_communities() -> Vec<String> {
    ["news", "worldnews", "politics", "PublicFreakout", "unpopularopinion", "Palestine"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_max_posts_per_community() -> usize {
    50
}

fn default_max_total_posts() -> usize {
    150
}

fn default_lookback_days() -> i64 {
    60
}

fn default_max_user_history_items() -> usize {
    300
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringConfig {
    #[serde(default)]
    pub thresholds: Thresholds,

    /// Below this many items a user profile carries a low-confidence
    /// caveat.
    #[serde(default = "default_min_confident_count")]
    pub min_confident_count: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            min_confident_count: default_min_confident_count(),
        }
    }
}

fn default_min_confident_count() -> usize {
    5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathsConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

impl PathsConfig {
    pub fn raw_posts(&self) -> PathBuf {
        self.data_dir.join("raw_posts.json")
    }

    pub fn users_enriched(&self) -> PathBuf {
        self.data_dir.join("users_enriched.json")
    }

    pub fn posts_scored_jsonl(&self) -> PathBuf {
        self.data_dir.join("posts_scored.jsonl")
    }

    pub fn posts_scored_csv(&self) -> PathBuf {
        self.data_dir.join("posts_scored.csv")
    }

    pub fn users_scored_jsonl(&self) -> PathBuf {
        self.data_dir.join("users_scored.jsonl")
    }

    pub fn users_scored_csv(&self) -> PathBuf {
        self.data_dir.join("users_scored.csv")
    }
}
