use redwatch_crawler::{ContentItem, ItemKind};
use redwatch_scoring::Scorer;

fn item(text: &str) -> ContentItem {
    ContentItem {
        id: "abc123".to_string(),
        url: "https://test.local/r/testsub/comments/abc123/x/".to_string(),
        community: "testsub".to_string(),
        author: "alice".to_string(),
        kind: ItemKind::Submission,
        title: String::new(),
        text: text.to_string(),
        created_utc: 1_700_000_000.0,
    }
}

#[test]
fn score_is_always_within_unit_interval() {
    let scorer = Scorer::default();
    let texts = [
        "",
        "Nice weather today.",
        "kill kill kill murder murder bomb bomb nazi nazi scum scum vermin \
         I will kill everyone they deserve to die KILL THEM ALL NOW",
        "very really extremely super totally literally so utterly completely",
    ];
    for text in texts {
        let risk = scorer.score_item(&item(text));
        assert!(
            (0.0..=1.0).contains(&risk.score),
            "score {} out of range for {text:?}",
            risk.score
        );
        for (name, value) in &risk.feature_values {
            assert!(
                (0.0..=1.0).contains(value),
                "feature {name} = {value} out of range"
            );
        }
    }
}

#[test]
fn benign_text_is_low_with_no_keyword_marker() {
    let scorer = Scorer::default();
    let risk = scorer.score_item(&item(
        "The weather is nice today and the garden looks lovely.",
    ));
    assert_eq!(risk.label.as_str(), "low");
    assert!(risk.explanation.contains("no explicit harmful keywords"));
}

#[test]
fn threat_regex_forces_threat_feature_to_one() {
    let scorer = Scorer::default();
    for text in [
        "I'm going to kill you",
        "i will destroy them",
        "we should bomb that place",
        "they deserve to die",
        "he should be shot",
    ] {
        let risk = scorer.score_item(&item(text));
        assert_eq!(
            risk.feature_values["threat"], 1.0,
            "threat not detected in {text:?}"
        );
        assert!(risk.explanation.contains("threat=("));
    }
}

#[test]
fn three_term_hits_saturate_a_signal() {
    let scorer = Scorer::default();
    let risk = scorer.score_item(&item("kill murder slaughter and then some"));
    assert_eq!(risk.feature_values["violent"], 1.0);
    let risk = scorer.score_item(&item("one kill only"));
    assert!((risk.feature_values["violent"] - 1.0 / 3.0).abs() < 1e-9);
}

#[test]
fn shouted_words_raise_the_all_caps_signal() {
    let scorer = Scorer::default();
    let risk = scorer.score_item(&item("WOW AMAZING NEWS today"));
    assert_eq!(risk.feature_values["all_caps"], 1.0);

    // Two-letter words never count as shouting.
    let risk = scorer.score_item(&item("OK so it is fine"));
    assert_eq!(risk.feature_values["all_caps"], 0.0);
}

#[test]
fn empty_text_scores_zero() {
    let scorer = Scorer::default();
    let risk = scorer.score_item(&item(""));
    assert_eq!(risk.score, 0.0);
    assert_eq!(risk.label.as_str(), "low");
    assert_eq!(risk.feature_values["keyword_density"], 0.0);
    assert_eq!(risk.feature_values["all_caps"], 0.0);
}

#[test]
fn short_text_language_is_unknown() {
    let scorer = Scorer::default();
    let risk = scorer.score_item(&item("short"));
    assert_eq!(risk.language, "unknown");
    assert!(risk.explanation.starts_with("language=unknown"));
}

#[test]
fn rescoring_is_byte_identical() {
    let scorer = Scorer::default();
    let subject = item("They are all vermin and deserve to die, KILL them, really.");
    let a = scorer.score_item(&subject);
    let b = scorer.score_item(&subject);
    assert_eq!(a.score.to_bits(), b.score.to_bits());
    assert_eq!(a.feature_values, b.feature_values);
    assert_eq!(a.explanation, b.explanation);
}

#[test]
fn explanation_lists_matched_terms() {
    let scorer = Scorer::default();
    let risk = scorer.score_item(&item("kill the nazi scum, kill them"));
    assert!(risk.explanation.contains("violent=2 (kill)"));
    assert!(risk.explanation.contains("hate=2 (nazi, scum)"));
}
