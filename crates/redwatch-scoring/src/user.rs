use std::collections::BTreeMap;

use redwatch_crawler::ContentItem;
use serde::{Deserialize, Serialize};

use crate::item::{RiskLabel, Scorer};

/// Aggregated risk profile for one user, rebuilt wholesale on every
/// aggregation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRiskProfile {
    pub username: String,
    pub score: f64,
    pub label: RiskLabel,
    pub max_item_score: f64,
    pub average_score: f64,
    pub count_high_risk_items: usize,
    pub total_items: usize,
    pub explanation: String,
}

/// Fold every user's scored history (or a fallback list of post-level
/// scores) into one profile per user.
///
/// The aggregate is `max(max_score, avg + 0.2 * ln(1 + count_high))` and
/// is deliberately not re-clamped to [0, 1]: a user with many high-risk
/// items can score above 1.0.
pub fn score_users(
    scorer: &Scorer,
    users_history: &BTreeMap<String, Vec<ContentItem>>,
    fallback_scores: &BTreeMap<String, Vec<f64>>,
    min_confident_count: usize,
) -> BTreeMap<String, UserRiskProfile> {
    let mut profiles = BTreeMap::new();

    for (username, history) in users_history {
        let mut scores: Vec<f64> = history
            .iter()
            .map(|item| scorer.score_item(item).score)
            .collect();
        let has_history = !scores.is_empty();

        let mut used_fallback = false;
        if scores.is_empty() {
            if let Some(fallback) = fallback_scores.get(username) {
                if !fallback.is_empty() {
                    scores.extend(fallback);
                    used_fallback = true;
                }
            }
        }

        if scores.is_empty() {
            profiles.insert(
                username.clone(),
                UserRiskProfile {
                    username: username.clone(),
                    score: 0.0,
                    label: RiskLabel::Low,
                    max_item_score: 0.0,
                    average_score: 0.0,
                    count_high_risk_items: 0,
                    total_items: 0,
                    explanation: "No historical activity or scored posts found for this \
                                  user; user_score set to 0.00 (low)."
                        .to_string(),
                },
            );
            continue;
        }

        let total_items = scores.len();
        let max_item_score = scores.iter().cloned().fold(f64::MIN, f64::max);
        let average_score = scores.iter().sum::<f64>() / total_items as f64;
        let count_high = scores
            .iter()
            .filter(|s| **s >= scorer.thresholds().high)
            .count();

        let user_score =
            max_item_score.max(average_score + 0.2 * (1.0 + count_high as f64).ln());
        let label = scorer.label_for(user_score);

        let mut parts = vec![
            format!("{count_high} high-risk posts out of {total_items} items"),
            format!("max_post_score={max_item_score:.2}"),
            format!("user_score={user_score:.2} ({label})"),
        ];
        parts.push(
            if has_history && !used_fallback {
                "derived from historical activity only (last window)."
            } else if has_history && used_fallback {
                "derived from historical activity plus current scored posts."
            } else {
                "no user history found; score derived from current scored posts only."
            }
            .to_string(),
        );
        if total_items < min_confident_count {
            parts.push(format!(
                "low-confidence estimate (only {total_items} items available)."
            ));
        }

        profiles.insert(
            username.clone(),
            UserRiskProfile {
                username: username.clone(),
                score: user_score,
                label,
                max_item_score,
                average_score,
                count_high_risk_items: count_high,
                total_items,
                explanation: parts.join("; "),
            },
        );
    }

    profiles
}
