mod features;
mod item;
mod user;
mod vocab;

pub use features::{detect_language, FeatureExtractor, Features, UNKNOWN_LANGUAGE};
pub use item::{ItemRisk, RiskLabel, Scorer};
pub use user::{score_users, UserRiskProfile};
pub use vocab::{Thresholds, Vocabulary, Weights};

pub use anyhow;
