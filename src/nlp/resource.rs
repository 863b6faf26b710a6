// src/nlp/resource.rs
//! The bundled English resource: tokenizer + tagger + lemmatizer + lexicon,
//! built from three JSON documents.

use anyhow::Context;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::info;

use super::lemmatize::{Lemmatizer, MorphologyData};
use super::lexicon::{LexiconData, PolarityLexicon};
use super::tagger::{Tagger, TaggerData};
use super::tokenize::Tokenizer;
use super::{LexicalResource, PolarityScore, Pos};

pub const ENV_LEXICON_DIR: &str = "LEXICON_DIR";

pub const TAGGER_FILE: &str = "tagger.json";
pub const MORPHOLOGY_FILE: &str = "morphology.json";
pub const LEXICON_FILE: &str = "lexicon.json";

const EMBEDDED_TAGGER: &str = include_str!("../../data/tagger.json");
const EMBEDDED_MORPHOLOGY: &str = include_str!("../../data/morphology.json");
const EMBEDDED_LEXICON: &str = include_str!("../../data/lexicon.json");

/// Versions of the three documents a bundle was built from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResourceVersions {
    pub tagger: String,
    pub morphology: String,
    pub lexicon: String,
}

#[derive(Debug, Clone)]
pub struct LexicalBundle {
    tokenizer: Tokenizer,
    tagger: Tagger,
    lemmatizer: Lemmatizer,
    lexicon: PolarityLexicon,
    versions: ResourceVersions,
}

impl LexicalBundle {
    /// Build from the data compiled into the binary.
    pub fn embedded() -> anyhow::Result<Self> {
        Self::from_json_strs(EMBEDDED_TAGGER, EMBEDDED_MORPHOLOGY, EMBEDDED_LEXICON)
            .context("embedded lexical resource")
    }

    /// Build from `tagger.json`, `morphology.json` and `lexicon.json` in `dir`.
    pub fn from_dir(dir: &Path) -> anyhow::Result<Self> {
        let read = |name: &str| {
            let p = dir.join(name);
            fs::read_to_string(&p).with_context(|| format!("reading {}", p.display()))
        };
        let tagger = read(TAGGER_FILE)?;
        let morphology = read(MORPHOLOGY_FILE)?;
        let lexicon = read(LEXICON_FILE)?;
        Self::from_json_strs(&tagger, &morphology, &lexicon)
            .with_context(|| format!("lexical resource in {}", dir.display()))
    }

    /// `$LEXICON_DIR` if set, otherwise the embedded data.
    pub fn from_env() -> anyhow::Result<Self> {
        let bundle = match std::env::var(ENV_LEXICON_DIR) {
            Ok(dir) if !dir.trim().is_empty() => Self::from_dir(Path::new(dir.trim()))?,
            _ => Self::embedded()?,
        };
        info!(
            target: "lexicon",
            tagger = %bundle.versions.tagger,
            morphology = %bundle.versions.morphology,
            lexicon = %bundle.versions.lexicon,
            entries = bundle.lexicon.len(),
            "lexical resource loaded"
        );
        Ok(bundle)
    }

    pub fn from_json_strs(tagger: &str, morphology: &str, lexicon: &str) -> anyhow::Result<Self> {
        let tagger_data: TaggerData = serde_json::from_str(tagger).context("parsing tagger data")?;
        let morph_data: MorphologyData =
            serde_json::from_str(morphology).context("parsing morphology data")?;
        let lexicon_data: LexiconData =
            serde_json::from_str(lexicon).context("parsing lexicon data")?;

        let versions = ResourceVersions {
            tagger: tagger_data.version.clone(),
            morphology: morph_data.version.clone(),
            lexicon: lexicon_data.version.clone(),
        };

        let lexicon = PolarityLexicon::from_data(lexicon_data)?;
        if lexicon.is_empty() {
            anyhow::bail!("lexicon has no entries");
        }
        let lemmatizer = Lemmatizer::new(morph_data, lexicon.vocabulary());
        let tagger = Tagger::from_data(tagger_data)?;

        Ok(Self {
            tokenizer: Tokenizer::new(),
            tagger,
            lemmatizer,
            lexicon,
            versions,
        })
    }

    pub fn versions(&self) -> &ResourceVersions {
        &self.versions
    }
}

impl LexicalResource for LexicalBundle {
    fn tokenize(&self, text: &str) -> Vec<String> {
        self.tokenizer.tokenize(text)
    }

    fn tag(&self, words: &[String]) -> Vec<String> {
        self.tagger.tag(words)
    }

    fn lemmatize(&self, word: &str, pos: Pos) -> String {
        self.lemmatizer.lemmatize(word, pos)
    }

    fn polarity(&self, lemma: &str, pos: Pos) -> Option<PolarityScore> {
        self.lexicon.lookup(lemma, pos)
    }
}
