// src/config.rs
//! Scoring configuration (TOML), with env overrides.
//!
//! Resolution:
//! 1) $SCORING_CONFIG_PATH (must exist)
//! 2) config/scoring.toml (optional)
//! 3) built-in defaults
//!
//! Then `SCORING_POLICY` and `SCORING_POSITIVE_THRESHOLD` override the file.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_SCORING_CONFIG_PATH: &str = "config/scoring.toml";

pub const ENV_SCORING_CONFIG_PATH: &str = "SCORING_CONFIG_PATH";
pub const ENV_SCORING_POLICY: &str = "SCORING_POLICY";
pub const ENV_SCORING_POSITIVE_THRESHOLD: &str = "SCORING_POSITIVE_THRESHOLD";

/// Which tokens contribute polarity, and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringPolicy {
    /// Every content word, adjectives/adverbs weighted up, negation cues honoured.
    #[default]
    FullTokenWithNegation,
    /// Adjectives only, unweighted, no negation.
    AdjectiveOnly,
}

impl FromStr for ScoringPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "full_token_with_negation" | "full_token" | "full" => {
                Ok(ScoringPolicy::FullTokenWithNegation)
            }
            "adjective_only" | "adjective" | "adj" => Ok(ScoringPolicy::AdjectiveOnly),
            other => anyhow::bail!("unknown scoring policy `{other}`"),
        }
    }
}

impl fmt::Display for ScoringPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoringPolicy::FullTokenWithNegation => f.write_str("full_token_with_negation"),
            ScoringPolicy::AdjectiveOnly => f.write_str("adjective_only"),
        }
    }
}

/// What a negation cue does to the next polarity-bearing token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegationMode {
    /// Swap the running positive/negative totals right after adding the token.
    /// Earlier tokens flip too.
    #[default]
    SwapRunningTotals,
    /// Swap only the negated token's own contribution.
    FlipToken,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FullTokenParams {
    pub positive_threshold: f32,
    pub negative_threshold: f32,
    /// Weight for adjectives and adverbs; nouns and verbs weigh 1.0.
    pub modifier_weight: f32,
    pub negation_cues: Vec<String>,
}

impl Default for FullTokenParams {
    fn default() -> Self {
        Self {
            positive_threshold: 0.3,
            negative_threshold: 0.0,
            modifier_weight: 1.5,
            negation_cues: [
                "not", "no", "never", "none", "hardly", "barely", "dont", "don't", "n't",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjectiveOnlyParams {
    pub positive_threshold: f32,
    pub negative_threshold: f32,
    /// Words never scored even when tagged as adjectives.
    pub excluded: Vec<String>,
}

impl Default for AdjectiveOnlyParams {
    fn default() -> Self {
        Self {
            positive_threshold: 0.0,
            negative_threshold: 0.0,
            excluded: vec!["i".to_string()],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub policy: ScoringPolicy,
    pub negation_mode: NegationMode,
    pub full_token: FullTokenParams,
    pub adjective_only: AdjectiveOnlyParams,
}

impl ScoringConfig {
    pub fn with_policy(policy: ScoringPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Load using env vars and fallbacks (see module docs).
    pub fn from_env() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var(ENV_SCORING_CONFIG_PATH) {
            Ok(p) => {
                let path = PathBuf::from(p);
                if !path.exists() {
                    anyhow::bail!(
                        "{ENV_SCORING_CONFIG_PATH} points to non-existent path {}",
                        path.display()
                    );
                }
                Self::from_path(&path)?
            }
            Err(_) => {
                let path = PathBuf::from(DEFAULT_SCORING_CONFIG_PATH);
                if path.exists() {
                    Self::from_path(&path)?
                } else {
                    Self::default()
                }
            }
        };

        if let Ok(raw) = std::env::var(ENV_SCORING_POLICY) {
            cfg.policy = raw
                .parse()
                .with_context(|| format!("{ENV_SCORING_POLICY}={raw}"))?;
        }
        if let Some(t) = parse_threshold_env(std::env::var(ENV_SCORING_POSITIVE_THRESHOLD).ok()) {
            match cfg.policy {
                ScoringPolicy::FullTokenWithNegation => cfg.full_token.positive_threshold = t,
                ScoringPolicy::AdjectiveOnly => cfg.adjective_only.positive_threshold = t,
            }
        }

        Ok(cfg)
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading scoring config at {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("parsing scoring config at {}", path.display()))
    }

    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        let mut cfg: ScoringConfig = toml::from_str(s)?;
        cfg.sanitize();
        Ok(cfg)
    }

    /// `(positive, negative)` thresholds of the active policy.
    pub fn thresholds(&self) -> (f32, f32) {
        match self.policy {
            ScoringPolicy::FullTokenWithNegation => (
                self.full_token.positive_threshold,
                self.full_token.negative_threshold,
            ),
            ScoringPolicy::AdjectiveOnly => (
                self.adjective_only.positive_threshold,
                self.adjective_only.negative_threshold,
            ),
        }
    }

    fn sanitize(&mut self) {
        let ft = FullTokenParams::default();
        if !self.full_token.positive_threshold.is_finite() {
            self.full_token.positive_threshold = ft.positive_threshold;
        }
        if !self.full_token.negative_threshold.is_finite() {
            self.full_token.negative_threshold = ft.negative_threshold;
        }
        if !self.full_token.modifier_weight.is_finite() || self.full_token.modifier_weight < 0.0 {
            self.full_token.modifier_weight = ft.modifier_weight;
        }
        normalize_words(&mut self.full_token.negation_cues);

        let ao = AdjectiveOnlyParams::default();
        if !self.adjective_only.positive_threshold.is_finite() {
            self.adjective_only.positive_threshold = ao.positive_threshold;
        }
        if !self.adjective_only.negative_threshold.is_finite() {
            self.adjective_only.negative_threshold = ao.negative_threshold;
        }
        normalize_words(&mut self.adjective_only.excluded);
    }
}

fn normalize_words(words: &mut Vec<String>) {
    for w in words.iter_mut() {
        *w = w.trim().to_lowercase().replace('\u{2019}', "'");
    }
    words.retain(|w| !w.is_empty());
    words.sort();
    words.dedup();
}

// parse optional float env; non-finite values are ignored
fn parse_threshold_env(raw: Option<String>) -> Option<f32> {
    raw.and_then(|s| s.trim().parse::<f32>().ok())
        .filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    #[test]
    fn defaults_match_calibration() {
        let c = ScoringConfig::default();
        assert_eq!(c.policy, ScoringPolicy::FullTokenWithNegation);
        assert_eq!(c.negation_mode, NegationMode::SwapRunningTotals);
        assert_eq!(c.thresholds(), (0.3, 0.0));
        assert_eq!(c.full_token.modifier_weight, 1.5);
        assert!(c.full_token.negation_cues.iter().any(|w| w == "n't"));

        let b = ScoringConfig::with_policy(ScoringPolicy::AdjectiveOnly);
        assert_eq!(b.thresholds(), (0.0, 0.0));
        assert_eq!(b.adjective_only.excluded, vec!["i"]);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = ScoringConfig::from_toml_str(
            r#"
policy = "adjective_only"

[full_token]
modifier_weight = 2.0
negation_cues = [" NOT ", "Never", "never", ""]
"#,
        )
        .unwrap();
        assert_eq!(c.policy, ScoringPolicy::AdjectiveOnly);
        assert_eq!(c.full_token.modifier_weight, 2.0);
        assert_eq!(c.full_token.positive_threshold, 0.3);
        assert_eq!(c.full_token.negation_cues, vec!["never", "not"]);
        assert_eq!(c.adjective_only.excluded, vec!["i"]);
    }

    #[test]
    fn negative_weight_falls_back() {
        let c = ScoringConfig::from_toml_str("[full_token]\nmodifier_weight = -1.0\n").unwrap();
        assert_eq!(c.full_token.modifier_weight, 1.5);
    }

    #[test]
    fn bad_policy_is_an_error() {
        assert!(ScoringConfig::from_toml_str(r#"policy = "sarcasm""#).is_err());
        assert!("nope".parse::<ScoringPolicy>().is_err());
        assert_eq!(
            "Adjective-Only".parse::<ScoringPolicy>().unwrap(),
            ScoringPolicy::AdjectiveOnly
        );
    }

    #[test]
    fn negation_mode_from_toml() {
        let c = ScoringConfig::from_toml_str(r#"negation_mode = "flip_token""#).unwrap();
        assert_eq!(c.negation_mode, NegationMode::FlipToken);
    }

    #[test]
    fn threshold_env_parsing() {
        assert_eq!(parse_threshold_env(Some(" 0.5 ".into())), Some(0.5));
        assert_eq!(parse_threshold_env(Some("abc".into())), None);
        assert_eq!(parse_threshold_env(Some("NaN".into())), None);
        assert_eq!(parse_threshold_env(None), None);
    }

    #[test]
    #[serial]
    fn env_overrides_policy_and_threshold() {
        env::remove_var(ENV_SCORING_CONFIG_PATH);
        env::set_var(ENV_SCORING_POLICY, "adjective_only");
        env::set_var(ENV_SCORING_POSITIVE_THRESHOLD, "0.25");
        let c = ScoringConfig::from_env().unwrap();
        env::remove_var(ENV_SCORING_POLICY);
        env::remove_var(ENV_SCORING_POSITIVE_THRESHOLD);

        assert_eq!(c.policy, ScoringPolicy::AdjectiveOnly);
        assert_eq!(c.adjective_only.positive_threshold, 0.25);
        assert_eq!(c.full_token.positive_threshold, 0.3);
    }

    #[test]
    #[serial]
    fn explicit_missing_path_is_an_error() {
        env::set_var(ENV_SCORING_CONFIG_PATH, "__no_such_scoring_config__.toml");
        let r = ScoringConfig::from_env();
        env::remove_var(ENV_SCORING_CONFIG_PATH);
        assert!(r.is_err());
    }
}
