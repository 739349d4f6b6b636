use std::collections::{BTreeMap, BTreeSet};

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use crate::vocab::Vocabulary;

pub const UNKNOWN_LANGUAGE: &str = "unknown";

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").unwrap());

/// Independent lexical signals for one item, each normalized to [0, 1],
/// plus the matched evidence kept for explanation text.
#[derive(Debug, Clone)]
pub struct Features {
    pub violent: f64,
    pub hate: f64,
    pub intensifiers: f64,
    pub keyword_density: f64,
    pub threat: f64,
    pub all_caps: f64,

    pub violent_count: usize,
    pub violent_terms: Vec<String>,
    pub hate_count: usize,
    pub hate_terms: Vec<String>,
    pub intensifier_count: usize,
    pub threat_hits: Vec<String>,
}

impl Features {
    pub fn values(&self) -> BTreeMap<String, f64> {
        BTreeMap::from([
            ("violent".to_string(), self.violent),
            ("hate".to_string(), self.hate),
            ("keyword_density".to_string(), self.keyword_density),
            ("intensifiers".to_string(), self.intensifiers),
            ("threat".to_string(), self.threat),
            ("all_caps".to_string(), self.all_caps),
        ])
    }
}

pub struct FeatureExtractor {
    vocab: Vocabulary,
    threat_regexes: Vec<Regex>,
}

impl FeatureExtractor {
    pub fn new(vocab: Vocabulary) -> anyhow::Result<Self> {
        let threat_regexes = vocab
            .threat_patterns
            .iter()
            .map(|p| RegexBuilder::new(p).case_insensitive(true).build())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            vocab,
            threat_regexes,
        })
    }

    pub fn extract(&self, text: &str) -> Features {
        let tokens = tokenize(text);

        let (violent, violent_count, violent_terms) = term_feature(&tokens, &self.vocab.violent);
        let (hate, hate_count, hate_terms) = term_feature(&tokens, &self.vocab.hate);
        let (intensifiers, intensifier_count, _) = term_feature(&tokens, &self.vocab.intensifiers);

        // 10% of tokens being violent/hate terms saturates the signal.
        let keyword_density = if tokens.is_empty() {
            0.0
        } else {
            let density = (violent_count + hate_count) as f64 / tokens.len() as f64;
            (density / 0.10).min(1.0)
        };

        let mut threat_hits = Vec::new();
        for re in &self.threat_regexes {
            for m in re.find_iter(text) {
                threat_hits.push(m.as_str().to_string());
            }
        }
        let threat = if threat_hits.is_empty() { 0.0 } else { 1.0 };

        let all_caps = all_caps_feature(text);

        Features {
            violent,
            hate,
            intensifiers,
            keyword_density,
            threat,
            all_caps,
            violent_count,
            violent_terms,
            hate_count,
            hate_terms,
            intensifier_count,
            threat_hits,
        }
    }
}

fn tokenize(text: &str) -> Vec<String> {
    WORD_RE
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// Count of tokens in `terms`, saturating at 3 hits; evidence is the
/// sorted set of distinct matched terms.
fn term_feature(tokens: &[String], terms: &BTreeSet<String>) -> (f64, usize, Vec<String>) {
    let hits: Vec<&String> = tokens.iter().filter(|t| terms.contains(*t)).collect();
    let count = hits.len();
    let distinct: BTreeSet<String> = hits.into_iter().cloned().collect();
    ((count as f64 / 3.0).min(1.0), count, distinct.into_iter().collect())
}

/// Share of whitespace-separated words that are "shouted": at least three
/// letters, all of them uppercase. 30% of words saturates the signal.
fn all_caps_feature(text: &str) -> f64 {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return 0.0;
    }
    let caps = words.iter().filter(|w| is_all_caps(w)).count();
    let ratio = caps as f64 / words.len() as f64;
    (ratio / 0.3).min(1.0)
}

fn is_all_caps(word: &str) -> bool {
    let letters: Vec<char> = word.chars().filter(|c| c.is_alphabetic()).collect();
    letters.len() >= 3 && letters.iter().all(|c| c.is_uppercase())
}

/// Best-effort language tag; `"unknown"` for short texts or when
/// detection fails.
pub fn detect_language(text: &str) -> String {
    if text.chars().count() < 20 {
        return UNKNOWN_LANGUAGE.to_string();
    }
    match whatlang::detect_lang(text) {
        Some(lang) => lang.code().to_string(),
        None => UNKNOWN_LANGUAGE.to_string(),
    }
}
