// src/nlp/lexicon.rs
//! Sense-annotated polarity lexicon.
//!
//! JSON shape (`lexicon.json`):
//! {
//!   "version": "...",
//!   "senses": {
//!     "good.a":  [[0.75, 0.0], [0.625, 0.0]],   // senses in frequency order
//!     "bank.n":  [null, [0.0, 0.0]]             // null = sense without polarity
//!   }
//! }
//!
//! Lookups always use the first listed sense.

use serde::Deserialize;
use std::collections::{HashMap, HashSet};

use super::{PolarityScore, Pos};

#[derive(Debug, Clone, Deserialize)]
pub struct LexiconData {
    #[serde(default)]
    pub version: String,
    pub senses: HashMap<String, Vec<Option<(f32, f32)>>>,
}

#[derive(Debug, Clone, Default)]
pub struct PolarityLexicon {
    senses: HashMap<(String, Pos), Vec<Option<PolarityScore>>>,
}

impl PolarityLexicon {
    pub fn from_data(data: LexiconData) -> anyhow::Result<Self> {
        let mut senses = HashMap::with_capacity(data.senses.len());
        for (key, list) in data.senses {
            let (lemma, pos) = parse_key(&key)?;
            let mut parsed = Vec::with_capacity(list.len());
            for sense in list {
                match sense {
                    Some((p, n)) => {
                        if !in_unit(p) || !in_unit(n) {
                            anyhow::bail!("lexicon entry `{key}`: polarity ({p}, {n}) outside [0,1]");
                        }
                        parsed.push(Some(PolarityScore {
                            positive: p,
                            negative: n,
                        }));
                    }
                    None => parsed.push(None),
                }
            }
            if senses.insert((lemma, pos), parsed).is_some() {
                anyhow::bail!("lexicon entry `{key}` duplicates another key for the same lemma/POS");
            }
        }
        Ok(Self { senses })
    }

    /// First-sense polarity; `None` when there is no sense or it carries no scores.
    pub fn lookup(&self, lemma: &str, pos: Pos) -> Option<PolarityScore> {
        self.senses
            .get(&(lemma.to_string(), pos))
            .and_then(|s| s.first().copied().flatten())
    }

    /// All `(lemma, pos)` keys, used by the lemmatizer as its vocabulary.
    pub fn vocabulary(&self) -> HashSet<(String, Pos)> {
        self.senses
            .iter()
            .filter(|(_, s)| !s.is_empty())
            .map(|(k, _)| k.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.senses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.senses.is_empty()
    }
}

fn in_unit(x: f32) -> bool {
    x.is_finite() && (0.0..=1.0).contains(&x)
}

fn parse_key(key: &str) -> anyhow::Result<(String, Pos)> {
    let (lemma, letter) = key
        .rsplit_once('.')
        .ok_or_else(|| anyhow::anyhow!("lexicon key `{key}` must look like `lemma.p`"))?;
    let mut chars = letter.chars();
    let pos = match (chars.next(), chars.next()) {
        (Some(c), None) => Pos::from_key_letter(c),
        _ => None,
    }
    .ok_or_else(|| anyhow::anyhow!("lexicon key `{key}` has unknown POS `{letter}`"))?;
    if lemma.is_empty() {
        anyhow::bail!("lexicon key `{key}` has an empty lemma");
    }
    Ok((lemma.to_lowercase(), pos))
}
