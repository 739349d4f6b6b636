use std::collections::BTreeMap;

use chrono::{Duration, Utc};
use redwatch_crawler::{ContentClient, ContentItem, DELETED_AUTHOR};
use redwatch_scoring::{score_users, Scorer};

use crate::config::AppConfig;
use crate::store::{self, ScoredPostRecord};

/// Stage 1: scan each target community's "new" feed until the per-community
/// and total caps are hit, then persist the collected posts.
pub fn collect(config: &AppConfig, client: &dyn ContentClient) -> anyhow::Result<Vec<ContentItem>> {
    let mut all_posts: Vec<ContentItem> = Vec::new();
    let total_limit = config.collection.max_total_posts;
    let per_community = config.collection.max_posts_per_community;

    for community in &config.collection.target_communities {
        if all_posts.len() >= total_limit {
            break;
        }
        let remaining = total_limit - all_posts.len();
        let limit = per_community.min(remaining);

        log::info!("fetching r/{community} (limit {limit})");
        let posts = client.fetch_new_posts(community, limit);
        log::info!("retrieved {} posts from r/{community}", posts.len());
        all_posts.extend(posts);
    }

    let path = config.paths.raw_posts();
    store::save_raw_posts(&all_posts, &path)?;
    log::info!("saved {} posts to {}", all_posts.len(), path.display());
    Ok(all_posts)
}

/// Stage 2: fetch recent history for every author of the collected posts,
/// skipping authors already present in the enrichment cache.
pub fn enrich(config: &AppConfig, client: &dyn ContentClient) -> anyhow::Result<()> {
    let existing = store::load_users_enriched(&config.paths.users_enriched())?;
    let posts = store::load_raw_posts(&config.paths.raw_posts())?;

    let authors = unique_authors(&posts);
    let since = Utc::now() - Duration::days(config.collection.lookback_days);
    let to_fetch: Vec<&String> = authors
        .iter()
        .filter(|a| !existing.contains_key(a.as_str()))
        .collect();

    log::info!(
        "{} unique authors, {} already enriched, {} to fetch (history since {})",
        authors.len(),
        existing.len(),
        to_fetch.len(),
        since.to_rfc3339()
    );

    let mut combined = existing;
    let total = to_fetch.len();
    for (idx, username) in to_fetch.into_iter().enumerate() {
        log::info!("[{}/{}] fetching history for u/{username}", idx + 1, total);
        let history = client.fetch_user_history(
            username,
            since,
            Some(config.collection.max_user_history_items),
        );
        log::info!("u/{username}: {} activities", history.len());
        combined.insert(username.clone(), history);
    }

    let path = config.paths.users_enriched();
    store::save_users_enriched(&combined, &path)?;
    log::info!("wrote history for {} users to {}", combined.len(), path.display());
    Ok(())
}

/// Stage 3: score every collected post and export JSONL + CSV.
pub fn score_posts(config: &AppConfig) -> anyhow::Result<()> {
    let posts = store::load_raw_posts(&config.paths.raw_posts())?;
    log::info!("loaded {} posts", posts.len());

    let scorer = Scorer::with_thresholds(config.scoring.thresholds);
    let records: Vec<ScoredPostRecord> = posts
        .iter()
        .map(|post| ScoredPostRecord::new(post, &scorer.score_item(post)))
        .collect();

    store::write_posts_jsonl(&records, &config.paths.posts_scored_jsonl())?;
    store::write_posts_csv(&records, &config.paths.posts_scored_csv())?;

    summarize(&records);
    Ok(())
}

/// Stage 4: aggregate per-user profiles from enriched history, falling
/// back to post-level scores for users with no history, and export them.
pub fn score_user_profiles(config: &AppConfig) -> anyhow::Result<()> {
    let users_history = store::load_users_enriched(&config.paths.users_enriched())?;
    let fallback = store::load_fallback_scores(&config.paths.posts_scored_csv())?;

    let scorer = Scorer::with_thresholds(config.scoring.thresholds);
    let profiles = score_users(
        &scorer,
        &users_history,
        &fallback,
        config.scoring.min_confident_count,
    );

    store::write_users_csv(&profiles, &config.paths.users_scored_csv())?;
    store::write_users_jsonl(&profiles, &config.paths.users_scored_jsonl())?;
    log::info!(
        "wrote {} user profiles to {}",
        profiles.len(),
        config.paths.users_scored_csv().display()
    );
    Ok(())
}

/// The full pipeline: collect, enrich, score posts, score users.
pub fn run(config: &AppConfig, client: &dyn ContentClient) -> anyhow::Result<()> {
    log::info!("step 1/4: collect");
    collect(config, client)?;
    log::info!("step 2/4: enrich");
    enrich(config, client)?;
    log::info!("step 3/4: score posts");
    score_posts(config)?;
    log::info!("step 4/4: score users");
    score_user_profiles(config)?;
    log::info!("pipeline complete, outputs under {}", config.paths.data_dir.display());
    Ok(())
}

/// Sorted distinct authors, skipping the deleted-user placeholder.
fn unique_authors(posts: &[ContentItem]) -> Vec<String> {
    let mut authors: Vec<String> = posts
        .iter()
        .map(|p| p.author.clone())
        .filter(|a| !a.is_empty() && a != DELETED_AUTHOR)
        .collect();
    authors.sort();
    authors.dedup();
    authors
}

fn summarize(records: &[ScoredPostRecord]) {
    let total = records.len();
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for r in records {
        *counts.entry(r.risk_label.as_str()).or_default() += 1;
    }

    println!("Scored {total} posts.");
    for label in ["high", "medium", "low"] {
        let count = counts.get(label).copied().unwrap_or(0);
        let pct = if total > 0 {
            count as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        println!("  {label:6}: {count:5} ({pct:5.1}%)");
    }

    let mut top: Vec<&ScoredPostRecord> = records.iter().collect();
    top.sort_by(|a, b| b.risk_score.total_cmp(&a.risk_score));
    println!("Top 5 highest-risk posts:");
    for r in top.iter().take(5) {
        println!(
            "  - id={}, score={:.2}, label={}",
            r.id, r.risk_score, r.risk_label
        );
    }
}
