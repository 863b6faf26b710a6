// src/nlp/tagger.rs
//! Dictionary POS tagger with suffix fallback and a few context rules.
//!
//! JSON shape (`tagger.json`):
//! {
//!   "version": "...",
//!   "default": "NN",
//!   "words": { "good": ["JJ", "NN"], ... },        // most frequent tag first
//!   "suffixes": [["ly", "RB"], ["ing", "VBG"], ...] // checked in order
//! }
//!
//! Context rules only ever pick among the tags a word already lists, so an
//! unambiguous word always gets its dictionary tag.

use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Deserialize)]
pub struct TaggerData {
    #[serde(default)]
    pub version: String,
    #[serde(default = "default_tag")]
    pub default: String,
    #[serde(default)]
    pub words: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub suffixes: Vec<(String, String)>,
}

fn default_tag() -> String {
    "NN".to_string()
}

#[derive(Debug, Clone)]
pub struct Tagger {
    words: HashMap<String, Vec<String>>,
    suffixes: Vec<(String, String)>,
    default: String,
}

impl Tagger {
    pub fn from_data(data: TaggerData) -> anyhow::Result<Self> {
        let mut words = HashMap::with_capacity(data.words.len());
        for (w, tags) in data.words {
            if tags.is_empty() {
                anyhow::bail!("tagger entry `{w}` has no tags");
            }
            words.insert(w.to_lowercase(), tags);
        }
        if data.default.trim().is_empty() {
            anyhow::bail!("tagger default tag is empty");
        }
        Ok(Self {
            words,
            suffixes: data.suffixes,
            default: data.default,
        })
    }

    pub fn tag(&self, words: &[String]) -> Vec<String> {
        let mut out: Vec<String> = Vec::with_capacity(words.len());
        for w in words {
            let lower = w.to_lowercase();
            let tag = match self.words.get(&lower) {
                Some(candidates) => {
                    let prev = out.last().map(String::as_str);
                    pick_in_context(candidates, prev).to_string()
                }
                None => self.guess(&lower),
            };
            out.push(tag);
        }
        out
    }

    /// Tag for a word the dictionary does not know.
    fn guess(&self, word: &str) -> String {
        if is_number(word) {
            return "CD".to_string();
        }
        if !word.chars().any(char::is_alphabetic) {
            return "SYM".to_string();
        }
        for (suffix, tag) in &self.suffixes {
            if word.len() > suffix.len() + 1 && word.ends_with(suffix.as_str()) {
                return tag.clone();
            }
        }
        self.default.clone()
    }
}

fn is_number(word: &str) -> bool {
    let mut digits = 0;
    for c in word.chars() {
        if c.is_ascii_digit() {
            digits += 1;
        } else if !matches!(c, '.' | ',') {
            return false;
        }
    }
    digits > 0
}

fn pick_in_context<'a>(candidates: &'a [String], prev: Option<&str>) -> &'a str {
    let first = candidates[0].as_str();
    if candidates.len() == 1 {
        return first;
    }
    match prev {
        // "will love", "to like"
        Some("MD") | Some("TO") => find_tag(candidates, |t| t == "VB").unwrap_or(first),
        // "the love", "my like", "great fun"
        Some("DT") | Some("PRP$") | Some("JJ") | Some("POS") => {
            find_tag(candidates, |t| t.starts_with("NN")).unwrap_or(first)
        }
        // "i love", "she likes"
        Some("PRP") => find_tag(candidates, |t| t.starts_with("VB")).unwrap_or(first),
        _ => first,
    }
}

fn find_tag(candidates: &[String], pred: impl Fn(&str) -> bool) -> Option<&str> {
    candidates.iter().map(String::as_str).find(|t| pred(t))
}
