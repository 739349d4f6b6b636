use std::collections::BTreeMap;

use redwatch_crawler::{ContentItem, ItemKind};
use redwatch_scoring::{score_users, RiskLabel, Scorer};

fn history_item(id: &str, text: &str) -> ContentItem {
    ContentItem {
        id: id.to_string(),
        url: format!("https://test.local/r/somesub/comments/{id}/x/"),
        community: "somesub".to_string(),
        author: "carol".to_string(),
        kind: ItemKind::Comment,
        title: String::new(),
        text: text.to_string(),
        created_utc: 1_700_000_000.0,
    }
}

fn single_user(
    username: &str,
    items: Vec<ContentItem>,
) -> BTreeMap<String, Vec<ContentItem>> {
    BTreeMap::from([(username.to_string(), items)])
}

#[test]
fn user_score_is_never_below_max_item_score() {
    let scorer = Scorer::default();
    let history = single_user(
        "carol",
        vec![
            history_item("a", "Nice weather today, honestly."),
            history_item("b", "kill murder slaughter nazi scum I will kill them"),
            history_item("c", "Totally normal gardening chat."),
        ],
    );
    let profiles = score_users(&scorer, &history, &BTreeMap::new(), 5);
    let p = &profiles["carol"];
    assert!(p.score >= p.max_item_score);
    assert_eq!(p.total_items, 3);
}

#[test]
fn no_activity_yields_a_zero_profile() {
    let scorer = Scorer::default();
    let history = single_user("ghost", vec![]);
    let profiles = score_users(&scorer, &history, &BTreeMap::new(), 5);
    let p = &profiles["ghost"];
    assert_eq!(p.score, 0.0);
    assert_eq!(p.label, RiskLabel::Low);
    assert_eq!(p.total_items, 0);
    assert_eq!(p.count_high_risk_items, 0);
    assert!(p.explanation.contains("No historical activity"));
}

#[test]
fn single_fallback_score_drives_a_high_label() {
    let scorer = Scorer::default();
    let history = single_user("dave", vec![]);
    let fallback = BTreeMap::from([("dave".to_string(), vec![0.9])]);
    let profiles = score_users(&scorer, &history, &fallback, 5);
    let p = &profiles["dave"];
    assert!(p.score >= 0.8);
    assert_eq!(p.label, RiskLabel::High);
    assert_eq!(p.total_items, 1);
    assert!(p
        .explanation
        .contains("no user history found; score derived from current scored posts only."));
    assert!(p.explanation.contains("low-confidence estimate"));
}

#[test]
fn history_provenance_is_reported() {
    let scorer = Scorer::default();
    let history = single_user(
        "carol",
        vec![
            history_item("a", "Plain comment number one, nothing odd."),
            history_item("b", "Plain comment number two, nothing odd."),
        ],
    );
    // A fallback list exists but history takes precedence.
    let fallback = BTreeMap::from([("carol".to_string(), vec![0.9])]);
    let profiles = score_users(&scorer, &history, &fallback, 5);
    let p = &profiles["carol"];
    assert!(p
        .explanation
        .contains("derived from historical activity only (last window)."));
    assert_eq!(p.total_items, 2);
}

#[test]
fn many_high_risk_items_can_push_the_score_above_one() {
    let scorer = Scorer::default();
    let history = single_user("eve", vec![]);
    let fallback = BTreeMap::from([("eve".to_string(), vec![0.95; 10])]);
    let profiles = score_users(&scorer, &history, &fallback, 5);
    let p = &profiles["eve"];
    // avg 0.95 + 0.2 * ln(11) > 1.0; the aggregate is intentionally not
    // clamped back into [0, 1].
    assert!(p.score > 1.0);
    assert_eq!(p.label, RiskLabel::High);
    assert_eq!(p.count_high_risk_items, 10);
}

#[test]
fn confident_count_suppresses_the_caveat() {
    let scorer = Scorer::default();
    let items = (0..5)
        .map(|i| history_item(&format!("i{i}"), "Plain text, calm and uneventful."))
        .collect();
    let profiles = score_users(&scorer, &single_user("carol", items), &BTreeMap::new(), 5);
    assert!(!profiles["carol"].explanation.contains("low-confidence"));
}
