// src/nlp/lemmatize.rs
//! Morphological lemmatizer (exception lists + suffix detachment) and the
//! enrichment pass that rewrites a comment into its lemmas.
//!
//! JSON shape (`morphology.json`):
//! {
//!   "version": "...",
//!   "exceptions": {
//!     "verb": { "was": ["be"], "went": ["go"] },
//!     "adj":  { "better": ["good", "well"] },
//!     "noun": { "children": ["child"] },
//!     "adv":  { "best": ["well"] }
//!   }
//! }
//!
//! A candidate lemma is accepted only if the vocabulary knows it under the
//! requested POS; the shortest accepted candidate wins. A word that is already
//! a known lemma is returned unchanged, which keeps the pass idempotent.

use serde::Deserialize;
use std::collections::{HashMap, HashSet};

use super::{LexicalResource, Pos};

/// Detachment rules per category, `(suffix, replacement)`.
const NOUN_RULES: &[(&str, &str)] = &[
    ("s", ""),
    ("ses", "s"),
    ("ves", "f"),
    ("xes", "x"),
    ("zes", "z"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("men", "man"),
    ("ies", "y"),
];
const VERB_RULES: &[(&str, &str)] = &[
    ("s", ""),
    ("ies", "y"),
    ("es", "e"),
    ("es", ""),
    ("ed", "e"),
    ("ed", ""),
    ("ing", "e"),
    ("ing", ""),
];
const ADJ_RULES: &[(&str, &str)] = &[("er", ""), ("est", ""), ("er", "e"), ("est", "e")];

// Rules never lengthen a word, so this only guards against pathological input.
const MAX_ROUNDS: usize = 8;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MorphologyData {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub exceptions: ExceptionTables,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExceptionTables {
    #[serde(default)]
    pub noun: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub verb: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub adj: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub adv: HashMap<String, Vec<String>>,
}

impl ExceptionTables {
    fn for_pos(&self, pos: Pos) -> Option<&HashMap<String, Vec<String>>> {
        match pos {
            Pos::Noun => Some(&self.noun),
            Pos::Verb => Some(&self.verb),
            Pos::Adj => Some(&self.adj),
            Pos::Adv => Some(&self.adv),
            Pos::Other => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Lemmatizer {
    exceptions: ExceptionTables,
    vocabulary: HashSet<(String, Pos)>,
}

impl Lemmatizer {
    pub fn new(data: MorphologyData, vocabulary: HashSet<(String, Pos)>) -> Self {
        Self {
            exceptions: data.exceptions,
            vocabulary,
        }
    }

    fn known(&self, form: &str, pos: Pos) -> bool {
        !form.is_empty() && self.vocabulary.contains(&(form.to_string(), pos))
    }

    /// Base form of `word` under `pos`, or `word` itself when nothing matches.
    pub fn lemmatize(&self, word: &str, pos: Pos) -> String {
        if !pos.is_content() {
            return word.to_string();
        }
        if self.known(word, pos) {
            return word.to_string();
        }
        self.candidates(word, pos)
            .into_iter()
            .min_by_key(|c| c.chars().count())
            .unwrap_or_else(|| word.to_string())
    }

    fn candidates(&self, word: &str, pos: Pos) -> Vec<String> {
        if let Some(forms) = self.exceptions.for_pos(pos).and_then(|t| t.get(word)) {
            return self.filter_known(forms.iter().cloned(), pos);
        }

        let rules = rules_for(pos);
        let mut forms = apply_rules(std::slice::from_ref(&word.to_string()), rules);
        let mut rounds = 0;
        while !forms.is_empty() && rounds < MAX_ROUNDS {
            let hits = self.filter_known(forms.iter().cloned(), pos);
            if !hits.is_empty() {
                return hits;
            }
            forms = apply_rules(&forms, rules);
            rounds += 1;
        }
        Vec::new()
    }

    fn filter_known(&self, forms: impl Iterator<Item = String>, pos: Pos) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for f in forms {
            if self.known(&f, pos) && !out.contains(&f) {
                out.push(f);
            }
        }
        out
    }
}

fn rules_for(pos: Pos) -> &'static [(&'static str, &'static str)] {
    match pos {
        Pos::Noun => NOUN_RULES,
        Pos::Verb => VERB_RULES,
        Pos::Adj => ADJ_RULES,
        Pos::Adv | Pos::Other => &[],
    }
}

fn apply_rules(forms: &[String], rules: &[(&str, &str)]) -> Vec<String> {
    let mut out = Vec::new();
    for form in forms {
        for (suffix, repl) in rules {
            if let Some(stem) = form.strip_suffix(suffix) {
                out.push(format!("{stem}{repl}"));
            }
        }
    }
    out
}

/// Rewrite `text` with every content word replaced by its lemma; other tokens
/// pass through. Tokens are rejoined with single spaces.
pub fn enrich(resource: &dyn LexicalResource, text: &str) -> String {
    resource
        .tag_text(text)
        .into_iter()
        .map(|t| {
            let pos = t.pos();
            if pos.is_content() {
                resource.lemmatize(&t.word, pos)
            } else {
                t.word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
