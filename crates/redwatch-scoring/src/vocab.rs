use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Immutable term lists and threat patterns. Injected into the feature
/// extractor at construction so tests can swap in a small vocabulary.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    pub violent: BTreeSet<String>,
    pub hate: BTreeSet<String>,
    pub intensifiers: BTreeSet<String>,
    /// Compiled case-insensitively by the feature extractor.
    pub threat_patterns: Vec<String>,
}

impl Vocabulary {
    fn from_terms(violent: &[&str], hate: &[&str], intensifiers: &[&str], threat: &[&str]) -> Self {
        Self {
            violent: violent.iter().map(|t| t.to_string()).collect(),
            hate: hate.iter().map(|t| t.to_string()).collect(),
            intensifiers: intensifiers.iter().map(|t| t.to_string()).collect(),
            threat_patterns: threat.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::from_terms(
            &[
                "kill",
                "killing",
                "murder",
                "attack",
                "shoot",
                "shooting",
                "bomb",
                "bombing",
                "stab",
                "stabbing",
                "genocide",
                "execute",
                "execution",
                "lynch",
                "slaughter",
                "massacre",
                "terrorist",
                "terrorism",
            ],
            &[
                "racist",
                "racism",
                "nazi",
                "nazis",
                "hitler",
                "subhuman",
                "vermin",
                "garbage",
                "retard",
                "retarded",
                "scum",
                "freaks",
                "trash",
                "animals",
            ],
            &[
                "very",
                "really",
                "extremely",
                "super",
                "totally",
                "literally",
                "so",
                "utterly",
                "completely",
            ],
            &[
                r"\bi[' ]?m going to (kill|hurt|beat|destroy)\b",
                r"\bi will (kill|hurt|beat|destroy)\b",
                r"\bwe should (kill|bomb|lynch|wipe out)\b",
                r"\b(deserve|deserves) to die\b",
                r"\bshould be (killed|shot|bombed|wiped out)\b",
            ],
        )
    }
}

/// Fixed linear-combination weights; the defaults sum to 1.0.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Weights {
    pub violent: f64,
    pub hate: f64,
    pub keyword_density: f64,
    pub threat: f64,
    pub all_caps: f64,
    pub intensifiers: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            violent: 0.30,
            hate: 0.25,
            keyword_density: 0.15,
            threat: 0.15,
            all_caps: 0.10,
            intensifiers: 0.05,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thresholds {
    #[serde(default = "default_high")]
    pub high: f64,
    #[serde(default = "default_medium")]
    pub medium: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            high: default_high(),
            medium: default_medium(),
        }
    }
}

fn default_high() -> f64 {
    0.8
}

fn default_medium() -> f64 {
    0.5
}
