// src/sentiment.rs
//! Comment scorer: lexicon polarity over POS-tagged, lemmatized tokens.
//!
//! Two policies share the same tokenize/tag/lemmatize/lookup steps:
//! - `FullTokenWithNegation`: every content word counts, adjectives and adverbs
//!   are weighted up, and a negation cue affects the next scored token.
//! - `AdjectiveOnly`: adjectives only, unweighted, no negation.
//!
//! Lexicon misses are never errors; the token simply does not count.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::config::{NegationMode, ScoringConfig, ScoringPolicy};
use crate::nlp::{enrich, LexicalResource, Pos};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Positive,
    Neutral,
    Negative,
}

impl Label {
    pub fn as_str(self) -> &'static str {
        match self {
            Label::Positive => "positive",
            Label::Neutral => "neutral",
            Label::Negative => "negative",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One token's share of the totals, in scoring order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contribution {
    pub word: String,
    pub lemma: String,
    pub pos: Pos,
    pub positive: f32,
    pub negative: f32,
    pub weight: f32,
    pub negated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentScore {
    pub positive: f32,
    pub negative: f32,
    /// `positive - negative`
    pub score: f32,
    /// Number of tokens that found a polarity entry.
    pub scored: usize,
    pub label: Label,
    pub contributions: Vec<Contribution>,
}

#[derive(Clone)]
pub struct SentimentAnalyzer {
    resource: Arc<dyn LexicalResource>,
    config: Arc<ScoringConfig>,
}

impl fmt::Debug for SentimentAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SentimentAnalyzer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SentimentAnalyzer {
    pub fn new(resource: Arc<dyn LexicalResource>, config: ScoringConfig) -> Self {
        Self {
            resource,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Lemmatization pass: content words replaced by their lemmas.
    pub fn enrich(&self, text: &str) -> String {
        enrich(self.resource.as_ref(), text)
    }

    /// Full pipeline for a raw comment: lowercase, enrich, score.
    pub fn analyze(&self, comment: &str) -> SentimentScore {
        let lowered = comment.to_lowercase();
        let enriched = self.enrich(&lowered);
        let out = self.score_enriched(&enriched);
        debug!(
            target: "sentiment",
            id = %anon_hash(comment),
            policy = %self.config.policy,
            positive = out.positive,
            negative = out.negative,
            scored = out.scored,
            label = %out.label,
            "comment scored"
        );
        out
    }

    pub fn label(&self, comment: &str) -> Label {
        self.analyze(comment).label
    }

    /// Score text that has already been lowercased and enriched.
    pub fn score_enriched(&self, text: &str) -> SentimentScore {
        let acc = match self.config.policy {
            ScoringPolicy::FullTokenWithNegation => self.accumulate_full(text),
            ScoringPolicy::AdjectiveOnly => self.accumulate_adjectives(text),
        };
        let (pos_thr, neg_thr) = self.config.thresholds();
        acc.finish(pos_thr, neg_thr)
    }

    fn accumulate_full(&self, text: &str) -> Accumulator {
        let params = &self.config.full_token;
        let mode = self.config.negation_mode;
        let mut acc = Accumulator::default();
        let mut negation = false;

        for tok in self.resource.tag_text(text) {
            let word = tok.word.to_lowercase();
            if params.negation_cues.iter().any(|c| *c == word) {
                negation = true;
                continue;
            }

            let pos = tok.pos();
            if !pos.is_content() {
                continue;
            }
            let lemma = self.resource.lemmatize(&word, pos);
            let Some(polarity) = self.resource.polarity(&lemma, pos) else {
                continue;
            };

            let weight = match pos {
                Pos::Adj | Pos::Adv => params.modifier_weight,
                _ => 1.0,
            };
            let (p, n) = (polarity.positive * weight, polarity.negative * weight);

            if negation && mode == NegationMode::FlipToken {
                acc.add(n, p);
            } else {
                acc.add(p, n);
            }
            if negation && mode == NegationMode::SwapRunningTotals {
                std::mem::swap(&mut acc.positive, &mut acc.negative);
            }

            acc.record(Contribution {
                word,
                lemma,
                pos,
                positive: p,
                negative: n,
                weight,
                negated: negation,
            });
            negation = false;
        }
        acc
    }

    fn accumulate_adjectives(&self, text: &str) -> Accumulator {
        let params = &self.config.adjective_only;
        let mut acc = Accumulator::default();

        for tok in self.resource.tag_text(text) {
            if tok.pos() != Pos::Adj {
                continue;
            }
            let word = tok.word.to_lowercase();
            if params.excluded.iter().any(|x| *x == word) {
                continue;
            }
            let lemma = self.resource.lemmatize(&word, Pos::Adj);
            let Some(polarity) = self.resource.polarity(&lemma, Pos::Adj) else {
                continue;
            };

            acc.add(polarity.positive, polarity.negative);
            acc.record(Contribution {
                word,
                lemma,
                pos: Pos::Adj,
                positive: polarity.positive,
                negative: polarity.negative,
                weight: 1.0,
                negated: false,
            });
        }
        acc
    }
}

#[derive(Debug, Default)]
struct Accumulator {
    positive: f32,
    negative: f32,
    contributions: Vec<Contribution>,
}

impl Accumulator {
    fn add(&mut self, positive: f32, negative: f32) {
        self.positive += positive;
        self.negative += negative;
    }

    fn record(&mut self, c: Contribution) {
        trace!(
            target: "sentiment",
            lemma = %c.lemma,
            pos = %c.pos,
            positive = c.positive,
            negative = c.negative,
            weight = c.weight,
            negated = c.negated,
            "token scored"
        );
        self.contributions.push(c);
    }

    fn finish(self, pos_thr: f32, neg_thr: f32) -> SentimentScore {
        let scored = self.contributions.len();
        let score = self.positive - self.negative;
        let label = if scored == 0 {
            Label::Neutral
        } else if score > pos_thr {
            Label::Positive
        } else if score < neg_thr {
            Label::Negative
        } else {
            Label::Neutral
        };
        SentimentScore {
            positive: self.positive,
            negative: self.negative,
            score,
            scored,
            label,
            contributions: self.contributions,
        }
    }
}

/// Short, stable id for log lines so raw comment text never hits the logs.
pub(crate) fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}
