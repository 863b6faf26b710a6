// tests/pipeline.rs
//
// End-to-end scoring against the bundled English resource:
// raw comment -> lowercase -> enrich -> score -> label.

use std::sync::Arc;

use comment_sentiment::nlp::{enrich, LexicalBundle};
use comment_sentiment::{Label, NegationMode, ScoringConfig, ScoringPolicy, SentimentAnalyzer};

fn bundle() -> Arc<LexicalBundle> {
    Arc::new(LexicalBundle::embedded().expect("embedded data loads"))
}

fn full_token() -> SentimentAnalyzer {
    SentimentAnalyzer::new(bundle(), ScoringConfig::default())
}

fn adjective_only() -> SentimentAnalyzer {
    SentimentAnalyzer::new(
        bundle(),
        ScoringConfig::with_policy(ScoringPolicy::AdjectiveOnly),
    )
}

#[test]
fn wonderful_movie_is_positive_under_both_policies() {
    let text = "This movie is absolutely wonderful";

    let s = full_token().analyze(text);
    assert_eq!(s.label, Label::Positive);
    // movie, be, absolutely, wonderful
    assert_eq!(s.scored, 4);
    assert!((s.positive - 1.5).abs() < 1e-6, "positive={}", s.positive);
    assert_eq!(s.negative, 0.0);

    let s = adjective_only().analyze(text);
    assert_eq!(s.label, Label::Positive);
    assert_eq!(s.scored, 1);
    assert_eq!(s.contributions[0].lemma, "wonderful");
}

#[test]
fn do_not_like_is_negative_with_swap() {
    let text = "I do not like this at all";

    let s = full_token().analyze(text);
    assert_eq!(s.label, Label::Negative);
    let like = s
        .contributions
        .iter()
        .find(|c| c.lemma == "like")
        .expect("'like' is scored");
    assert!(like.negated);
    assert!((s.negative - 0.375).abs() < 1e-6);

    // no adjectives at all
    let s = adjective_only().analyze(text);
    assert_eq!(s.label, Label::Neutral);
    assert_eq!(s.scored, 0);
}

#[test]
fn no_alphabetic_content_is_neutral() {
    for a in [full_token(), adjective_only()] {
        for text in ["!!!", "123", "", "   ", "... ?!"] {
            let s = a.analyze(text);
            assert_eq!(s.label, Label::Neutral, "{text:?}");
            assert_eq!(s.scored, 0, "{text:?}");
        }
    }
}

#[test]
fn only_negation_cues_is_neutral() {
    let s = full_token().analyze("not never no, hardly... barely");
    assert_eq!(s.label, Label::Neutral);
    assert_eq!(s.scored, 0);
}

#[test]
fn clitic_negation_is_a_cue() {
    // "don't" -> "do n't"; "n't" negates "hate"
    let s = full_token().analyze("I don't hate it");
    assert_eq!(s.label, Label::Positive);
    assert!(s.contributions.iter().any(|c| c.lemma == "hate" && c.negated));
}

#[test]
fn cannot_negates_the_next_scored_token() {
    let a = full_token();
    let s = a.analyze("Great cast but I cannot love it");
    assert_eq!(s.label, Label::Negative);
    let love = s
        .contributions
        .iter()
        .find(|c| c.lemma == "love")
        .expect("'love' is scored");
    assert!(love.negated);
    assert!((s.score + 1.4375).abs() < 1e-6, "score={}", s.score);

    assert_eq!(s, a.analyze("great cast but i can not love it"));
    assert_eq!(a.enrich("i cannot love it"), "i can not love it");
}

#[test]
fn swap_and_flip_modes_disagree_on_earlier_praise() {
    let text = "Wonderful cast, not bad at all";

    let s = full_token().analyze(text);
    assert_eq!(s.label, Label::Negative);

    let mut cfg = ScoringConfig::default();
    cfg.negation_mode = NegationMode::FlipToken;
    let s = SentimentAnalyzer::new(bundle(), cfg).analyze(text);
    assert_eq!(s.label, Label::Positive);
    assert_eq!(s.negative, 0.0);
}

#[test]
fn policies_can_disagree() {
    // full-token: "good" is negated and the running totals swap
    let text = "Great acting but not good";
    assert_eq!(full_token().label(text), Label::Negative);
    assert_eq!(adjective_only().label(text), Label::Positive);
}

#[test]
fn inflected_forms_hit_the_lexicon() {
    let a = full_token();
    assert_eq!(a.enrich("this is the worst movie ever"), "this be the bad movie ever");
    assert_eq!(a.label("This is the worst movie ever"), Label::Negative);
    assert_eq!(
        a.label("The food was terrible and the service was awful"),
        Label::Negative
    );
    assert_eq!(a.label("I love this, it's great"), Label::Positive);
}

#[test]
fn enrichment_is_idempotent() {
    let b = bundle();
    for text in [
        "the movies were better than the books",
        "she was running and loved the happiest moments",
        "i don't like this at all",
        "i cannot love it",
        "wonderful cast, not bad at all",
    ] {
        let once = enrich(b.as_ref(), text);
        assert_eq!(enrich(b.as_ref(), &once), once, "{text:?}");
    }
    assert_eq!(
        enrich(b.as_ref(), "she was running and loved the happiest moments"),
        "she be run and love the happy moment"
    );
}

#[test]
fn labels_are_deterministic() {
    let a = full_token();
    let b = adjective_only();
    for text in [
        "This movie is absolutely wonderful",
        "I do not like this at all",
        "Great acting but not good",
    ] {
        assert_eq!(a.analyze(text), a.analyze(text));
        assert_eq!(b.analyze(text), b.analyze(text));
    }
}

#[test]
fn analyzer_is_shareable_across_threads() {
    let a = Arc::new(full_token());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let a = Arc::clone(&a);
            std::thread::spawn(move || a.label("This movie is absolutely wonderful"))
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap(), Label::Positive);
    }
}
