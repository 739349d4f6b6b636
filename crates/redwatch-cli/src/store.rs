use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;

use redwatch_crawler::ContentItem;
use redwatch_scoring::{ItemRisk, RiskLabel, UserRiskProfile};
use serde::Serialize;
use serde_json::Value;

/// One scored post: the original item fields merged with its risk result.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredPostRecord {
    pub id: String,
    pub url: String,
    pub community: String,
    pub author: String,
    pub title: String,
    pub text: String,
    pub created_utc: f64,
    pub language: String,
    pub risk_score: f64,
    pub risk_label: RiskLabel,
    pub risk_explanation: String,
    pub risk_features: BTreeMap<String, f64>,
}

impl ScoredPostRecord {
    pub fn new(item: &ContentItem, risk: &ItemRisk) -> Self {
        Self {
            id: item.id.clone(),
            url: item.url.clone(),
            community: item.community.clone(),
            author: item.author.clone(),
            title: item.title.clone(),
            text: item.text.clone(),
            created_utc: item.created_utc,
            language: risk.language.clone(),
            risk_score: risk.score,
            risk_label: risk.label,
            risk_explanation: risk.explanation.clone(),
            risk_features: risk.feature_values.clone(),
        }
    }
}

pub fn save_raw_posts(posts: &[ContentItem], path: &Path) -> anyhow::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, serde_json::to_string_pretty(posts)?)?;
    Ok(())
}

/// Load collected posts, defensively: non-object entries and records that
/// don't deserialize are skipped, missing fields default to empty / 0.0.
pub fn load_raw_posts(path: &Path) -> anyhow::Result<Vec<ContentItem>> {
    let raw: Vec<Value> = serde_json::from_str(&fs::read_to_string(path)?)?;
    let mut posts = Vec::with_capacity(raw.len());
    for value in raw {
        if !value.is_object() {
            continue;
        }
        match serde_json::from_value::<ContentItem>(value) {
            Ok(post) => posts.push(post),
            Err(e) => log::warn!("skipping malformed post record: {e}"),
        }
    }
    Ok(posts)
}

pub fn save_users_enriched(
    users: &BTreeMap<String, Vec<ContentItem>>,
    path: &Path,
) -> anyhow::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, serde_json::to_string_pretty(users)?)?;
    Ok(())
}

/// Load the username -> history mapping; a missing file is an empty map
/// and malformed item records are skipped per-record.
pub fn load_users_enriched(path: &Path) -> anyhow::Result<BTreeMap<String, Vec<ContentItem>>> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let raw: BTreeMap<String, Vec<Value>> = serde_json::from_str(&fs::read_to_string(path)?)?;
    let mut users = BTreeMap::new();
    for (username, values) in raw {
        let items = values
            .into_iter()
            .filter_map(|v| match serde_json::from_value::<ContentItem>(v) {
                Ok(item) => Some(item),
                Err(e) => {
                    log::warn!("skipping malformed history record for {username}: {e}");
                    None
                }
            })
            .collect();
        users.insert(username, items);
    }
    Ok(users)
}

pub fn write_posts_jsonl(records: &[ScoredPostRecord], path: &Path) -> anyhow::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let mut out = fs::File::create(path)?;
    for record in records {
        writeln!(out, "{}", serde_json::to_string(record)?)?;
    }
    Ok(())
}

pub const POSTS_CSV_COLUMNS: [&str; 12] = [
    "id",
    "url",
    "community",
    "author",
    "title",
    "text",
    "created_utc",
    "language",
    "risk_score",
    "risk_label",
    "risk_explanation",
    "risk_features",
];

/// Flat tabular export; the nested feature map is embedded as compact
/// JSON text in the last column.
pub fn write_posts_csv(records: &[ScoredPostRecord], path: &Path) -> anyhow::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(POSTS_CSV_COLUMNS)?;
    for r in records {
        let created_utc = r.created_utc.to_string();
        let risk_score = r.risk_score.to_string();
        let risk_features = serde_json::to_string(&r.risk_features)?;
        wtr.write_record([
            r.id.as_str(),
            r.url.as_str(),
            r.community.as_str(),
            r.author.as_str(),
            r.title.as_str(),
            r.text.as_str(),
            created_utc.as_str(),
            r.language.as_str(),
            risk_score.as_str(),
            r.risk_label.as_str(),
            r.risk_explanation.as_str(),
            risk_features.as_str(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Author -> post-level score lists from the scored-posts CSV, used to
/// approximate users with no crawled history. A missing file simply
/// disables the fallback.
pub fn load_fallback_scores(path: &Path) -> anyhow::Result<BTreeMap<String, Vec<f64>>> {
    if !path.exists() {
        log::info!("no scored posts at {}, skipping fallback", path.display());
        return Ok(BTreeMap::new());
    }

    let mut rdr = csv::Reader::from_path(path)?;
    let headers = rdr.headers()?.clone();
    let author_idx = headers.iter().position(|h| h == "author");
    let score_idx = headers.iter().position(|h| h == "risk_score");
    let (Some(author_idx), Some(score_idx)) = (author_idx, score_idx) else {
        log::warn!("scored posts file {} misses author/risk_score columns", path.display());
        return Ok(BTreeMap::new());
    };

    let mut fallback: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for record in rdr.records() {
        let record = record?;
        let (Some(author), Some(score)) = (record.get(author_idx), record.get(score_idx)) else {
            continue;
        };
        if author.is_empty() {
            continue;
        }
        let Ok(score) = score.parse::<f64>() else {
            continue;
        };
        fallback.entry(author.to_string()).or_default().push(score);
    }
    Ok(fallback)
}

pub const USERS_CSV_COLUMNS: [&str; 8] = [
    "username",
    "score",
    "label",
    "max_item_score",
    "average_score",
    "count_high_risk_items",
    "total_items",
    "explanation",
];

pub fn write_users_csv(
    profiles: &BTreeMap<String, UserRiskProfile>,
    path: &Path,
) -> anyhow::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(USERS_CSV_COLUMNS)?;
    for p in profiles.values() {
        let score = format!("{:.4}", p.score);
        let max_item_score = format!("{:.4}", p.max_item_score);
        let average_score = format!("{:.4}", p.average_score);
        let count_high = p.count_high_risk_items.to_string();
        let total = p.total_items.to_string();
        wtr.write_record([
            p.username.as_str(),
            score.as_str(),
            p.label.as_str(),
            max_item_score.as_str(),
            average_score.as_str(),
            count_high.as_str(),
            total.as_str(),
            p.explanation.as_str(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_users_jsonl(
    profiles: &BTreeMap<String, UserRiskProfile>,
    path: &Path,
) -> anyhow::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let mut out = fs::File::create(path)?;
    for profile in profiles.values() {
        writeln!(out, "{}", serde_json::to_string(profile)?)?;
    }
    Ok(())
}
