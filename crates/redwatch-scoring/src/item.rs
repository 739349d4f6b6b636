use std::collections::BTreeMap;
use std::fmt;

use redwatch_crawler::ContentItem;
use serde::{Deserialize, Serialize};

use crate::features::{detect_language, FeatureExtractor};
use crate::vocab::{Thresholds, Vocabulary, Weights};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLabel {
    Low,
    Medium,
    High,
}

impl RiskLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scoring result for one item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemRisk {
    pub item_id: String,
    pub language: String,
    pub score: f64,
    pub label: RiskLabel,
    pub explanation: String,
    pub feature_values: BTreeMap<String, f64>,
}

/// Pure function of text + vocabulary + weights: re-scoring the same item
/// always yields identical feature values and score.
pub struct Scorer {
    extractor: FeatureExtractor,
    weights: Weights,
    thresholds: Thresholds,
}

impl Scorer {
    pub fn new(
        vocab: Vocabulary,
        weights: Weights,
        thresholds: Thresholds,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            extractor: FeatureExtractor::new(vocab)?,
            weights,
            thresholds,
        })
    }

    pub fn with_thresholds(thresholds: Thresholds) -> Self {
        Self::new(Vocabulary::default(), Weights::default(), thresholds).unwrap()
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    pub fn label_for(&self, score: f64) -> RiskLabel {
        if score >= self.thresholds.high {
            RiskLabel::High
        } else if score >= self.thresholds.medium {
            RiskLabel::Medium
        } else {
            RiskLabel::Low
        }
    }

    pub fn score_item(&self, item: &ContentItem) -> ItemRisk {
        let text = combined_text(item);
        let language = detect_language(&text);
        let f = self.extractor.extract(&text);

        let weighted = self.weights.violent * f.violent
            + self.weights.hate * f.hate
            + self.weights.keyword_density * f.keyword_density
            + self.weights.threat * f.threat
            + self.weights.all_caps * f.all_caps
            + self.weights.intensifiers * f.intensifiers;
        let score = weighted.clamp(0.0, 1.0);
        let label = self.label_for(score);

        let mut parts = vec![
            format!("language={language}"),
            format!("score={score:.2} ({label})"),
        ];
        if f.violent_count > 0 {
            parts.push(format!(
                "violent={} ({})",
                f.violent_count,
                f.violent_terms
                    .iter()
                    .take(5)
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }
        if f.hate_count > 0 {
            parts.push(format!(
                "hate={} ({})",
                f.hate_count,
                f.hate_terms
                    .iter()
                    .take(5)
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }
        if f.intensifier_count > 0 {
            parts.push(format!("intensifiers={}", f.intensifier_count));
        }
        if !f.threat_hits.is_empty() {
            parts.push(format!(
                "threat=({})",
                f.threat_hits
                    .iter()
                    .take(3)
                    .cloned()
                    .collect::<Vec<_>>()
                    .join("; ")
            ));
        }
        if f.all_caps > 0.0 {
            parts.push(format!("allcaps={:.2}", f.all_caps));
        }
        if f.keyword_density > 0.0 {
            parts.push(format!("density={:.2}", f.keyword_density));
        }
        if f.violent_count == 0 && f.hate_count == 0 && f.threat_hits.is_empty() {
            parts.push("no explicit harmful keywords".to_string());
        }

        ItemRisk {
            item_id: item.id.clone(),
            language,
            score,
            label,
            explanation: parts.join("; "),
            feature_values: f.values(),
        }
    }
}

impl Default for Scorer {
    fn default() -> Self {
        Self::with_thresholds(Thresholds::default())
    }
}

/// Title plus body. Listing submissions already carry the title inside
/// `text`; keeping both mirrors how the original feed was scored.
fn combined_text(item: &ContentItem) -> String {
    format!("{}\n{}", item.title, item.text)
        .trim()
        .to_string()
}
