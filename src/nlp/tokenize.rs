// src/nlp/tokenize.rs
//! Word tokenizer with treebank-style clitic splitting.

use once_cell::sync::Lazy;
use regex::Regex;

// A standalone clitic first (so "'s" survives a re-tokenize), then words made of
// letters/marks/digits with optional apostrophe segments ("don't", "rock'n'roll").
// Marks keep lowercased "İ" (i + U+0307) in one word.
static WORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?u)'(?:s|m|re|ve|ll|d)\b|[\p{L}\p{M}\p{N}]+(?:'[\p{L}\p{M}]+)*").expect("tokenizer regex")
});

const CLITICS: [&str; 6] = ["'s", "'m", "'re", "'ve", "'ll", "'d"];

#[derive(Debug, Clone, Default)]
pub struct Tokenizer;

impl Tokenizer {
    pub fn new() -> Self {
        Self
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let text = normalize(text);
        let mut out = Vec::new();
        for m in WORD_RE.find_iter(&text) {
            split_clitics(m.as_str(), &mut out);
        }
        out
    }
}

/// Decode HTML entities and fold typographic apostrophes to `'`.
fn normalize(text: &str) -> String {
    let decoded = html_escape::decode_html_entities(text);
    decoded
        .chars()
        .map(|c| match c {
            '\u{2019}' | '\u{2018}' | '\u{02bc}' => '\'',
            other => other,
        })
        .collect()
}

fn split_clitics(word: &str, out: &mut Vec<String>) {
    if word.eq_ignore_ascii_case("cannot") {
        out.push(word[..3].to_string());
        out.push(word[3..].to_string());
        return;
    }

    let lower = word.to_lowercase();

    if lower.ends_with("n't") {
        let stem = &word[..word.len() - 3];
        if !stem.is_empty() {
            out.push(stem.to_string());
        }
        out.push(word[word.len() - 3..].to_string());
        return;
    }

    for clitic in CLITICS {
        if lower.ends_with(clitic) && lower.len() > clitic.len() {
            let cut = word.len() - clitic.len();
            out.push(word[..cut].to_string());
            out.push(word[cut..].to_string());
            return;
        }
    }

    out.push(word.to_string());
}
