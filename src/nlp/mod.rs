// src/nlp/mod.rs
//! Lexical resource: tokenizer, POS tagger, lemmatizer and polarity lexicon.
//!
//! The scorer only talks to the [`LexicalResource`] trait. The bundled
//! implementation ([`LexicalBundle`]) is loaded once per process and shared
//! read-only between requests; see [`init_shared`].

pub mod lemmatize;
pub mod lexicon;
pub mod resource;
pub mod tagger;
pub mod tokenize;

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;

pub use lemmatize::{enrich, Lemmatizer};
pub use lexicon::PolarityLexicon;
pub use resource::{LexicalBundle, ENV_LEXICON_DIR};
pub use tagger::Tagger;
pub use tokenize::Tokenizer;

/// Coarse grammatical category used for lemmatization and lexicon lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Pos {
    Noun,
    Verb,
    Adj,
    Adv,
    Other,
}

impl Pos {
    /// Map a Penn-Treebank style tag onto its coarse category by first letter.
    pub fn from_tag(tag: &str) -> Pos {
        match tag.as_bytes().first() {
            Some(b'N') => Pos::Noun,
            Some(b'V') => Pos::Verb,
            Some(b'J') => Pos::Adj,
            Some(b'R') => Pos::Adv,
            _ => Pos::Other,
        }
    }

    /// Whether the lexicon can hold entries for this category.
    pub fn is_content(self) -> bool {
        !matches!(self, Pos::Other)
    }

    /// Category for a lexicon key suffix (`good.a`); satellites (`s`) are adjectives.
    pub fn from_key_letter(c: char) -> Option<Pos> {
        match c {
            'n' => Some(Pos::Noun),
            'v' => Some(Pos::Verb),
            'a' | 's' => Some(Pos::Adj),
            'r' => Some(Pos::Adv),
            _ => None,
        }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Pos::Noun => "noun",
            Pos::Verb => "verb",
            Pos::Adj => "adj",
            Pos::Adv => "adv",
            Pos::Other => "other",
        };
        f.write_str(s)
    }
}

/// A surface word with its fine-grained tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedToken {
    pub word: String,
    pub tag: String,
}

impl TaggedToken {
    pub fn pos(&self) -> Pos {
        Pos::from_tag(&self.tag)
    }
}

/// Positive / negative strength of a word sense, both in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PolarityScore {
    pub positive: f32,
    pub negative: f32,
}

/// Capabilities the scorer needs from a language resource.
///
/// Implementations must be immutable after construction: the same instance is
/// read concurrently by every in-flight request.
pub trait LexicalResource: Send + Sync {
    /// Split text into word tokens; punctuation and whitespace are dropped.
    fn tokenize(&self, text: &str) -> Vec<String>;

    /// Assign one fine-grained tag per word (same length and order as `words`).
    fn tag(&self, words: &[String]) -> Vec<String>;

    /// Base form of `word` under `pos`; unknown words come back unchanged.
    fn lemmatize(&self, word: &str, pos: Pos) -> String;

    /// First-sense polarity of `(lemma, pos)`, if the lexicon has one.
    fn polarity(&self, lemma: &str, pos: Pos) -> Option<PolarityScore>;

    fn tag_text(&self, text: &str) -> Vec<TaggedToken> {
        let words = self.tokenize(text);
        let tags = self.tag(&words);
        words
            .into_iter()
            .zip(tags)
            .map(|(word, tag)| TaggedToken { word, tag })
            .collect()
    }
}

static SHARED: OnceCell<Arc<LexicalBundle>> = OnceCell::new();

/// Process-wide resource, loaded on first call (embedded data, or `$LEXICON_DIR`).
/// A failed load is returned and retried on the next call; nothing is cached.
pub fn init_shared() -> anyhow::Result<Arc<LexicalBundle>> {
    SHARED
        .get_or_try_init(|| LexicalBundle::from_env().map(Arc::new))
        .cloned()
}
