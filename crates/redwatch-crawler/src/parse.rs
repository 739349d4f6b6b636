use chrono::{DateTime, NaiveDateTime};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::models::{ContentItem, ItemKind, DELETED_AUTHOR};

static THING_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("div.thing").unwrap());
static TIME_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("time").unwrap());
static TITLE_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("a.title").unwrap());
static EXPANDO_MD_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.expando div.md").unwrap());
static MD_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("div.md").unwrap());
static NEXT_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("span.next-button a").unwrap());

/// Parse one community listing page into submissions plus the "next page"
/// locator, if any. Promoted entries and nodes without an identifier or a
/// resolvable timestamp are skipped.
pub fn parse_listing_page(
    html: &str,
    default_community: &str,
    base_url: &str,
) -> (Vec<ContentItem>, Option<String>) {
    let doc = Html::parse_document(html);
    let mut items = Vec::new();

    for thing in doc.select(&THING_SEL) {
        if thing.value().attr("data-promoted") == Some("true") {
            continue;
        }

        let Some(created_utc) = extract_created_utc(&thing) else {
            continue;
        };
        let Some(id) = extract_item_id(&thing) else {
            continue;
        };

        let community = thing
            .value()
            .attr("data-subreddit")
            .unwrap_or(default_community)
            .to_string();
        let author = thing
            .value()
            .attr("data-author")
            .unwrap_or(DELETED_AUTHOR)
            .to_string();
        let url = absolute_url(base_url, permalink(&thing));

        let title = thing
            .select(&TITLE_SEL)
            .next()
            .map(|a| a.text().collect::<String>().trim().to_string())
            .unwrap_or_default();
        let body = thing
            .select(&EXPANDO_MD_SEL)
            .next()
            .map(|md| node_text(&md))
            .unwrap_or_default();
        let text = [title.as_str(), body.as_str()]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join("\n\n");

        items.push(ContentItem {
            id,
            url,
            community,
            author,
            kind: ItemKind::Submission,
            title,
            text,
            created_utc,
        });
    }

    (items, find_next_url(&doc))
}

/// Parse one user history page. Pages are newest-first, so the first node
/// older than `cutoff_ts` sets the stop flag and ends processing; a
/// stopped page reports no next locator.
pub fn parse_user_page(
    html: &str,
    username: &str,
    kind: ItemKind,
    cutoff_ts: f64,
    base_url: &str,
) -> (Vec<ContentItem>, Option<String>, bool) {
    let doc = Html::parse_document(html);
    let mut items = Vec::new();
    let mut stop = false;

    for thing in doc.select(&THING_SEL) {
        let Some(created_utc) = extract_created_utc(&thing) else {
            continue;
        };
        if created_utc < cutoff_ts {
            stop = true;
            break;
        }

        let Some(id) = extract_item_id(&thing) else {
            continue;
        };

        let community = thing
            .value()
            .attr("data-subreddit")
            .unwrap_or("")
            .to_string();
        let fallback_author = if username.is_empty() {
            DELETED_AUTHOR
        } else {
            username
        };
        let author = thing
            .value()
            .attr("data-author")
            .unwrap_or(fallback_author)
            .to_string();
        let url = absolute_url(base_url, permalink(&thing));
        let text = thing
            .select(&MD_SEL)
            .next()
            .map(|md| node_text(&md))
            .unwrap_or_default();

        items.push(ContentItem {
            id,
            url,
            community,
            author,
            kind,
            title: String::new(),
            text,
            created_utc,
        });
    }

    let next_url = if stop { None } else { find_next_url(&doc) };
    (items, next_url, stop)
}

/// Timestamp extraction, two strategies in order: a raw `data-timestamp`
/// attribute (millisecond precision auto-detected by magnitude), then a
/// nested `<time datetime="...">` element.
fn extract_created_utc(thing: &ElementRef) -> Option<f64> {
    if let Some(raw) = thing.value().attr("data-timestamp") {
        if let Ok(ts) = raw.trim().parse::<i64>() {
            if ts > 10_000_000_000 {
                return Some(ts as f64 / 1000.0);
            }
            return Some(ts as f64);
        }
    }

    let time = thing.select(&TIME_SEL).next()?;
    let datetime = time.value().attr("datetime")?;
    parse_datetime(datetime)
}

fn parse_datetime(raw: &str) -> Option<f64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp() as f64);
    }
    // Naive datetimes are taken as UTC.
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|dt| dt.and_utc().timestamp() as f64)
}

/// Site-local identifier: the suffix of the fullname-style attribute
/// after its last underscore (e.g. `t3_abc123` -> `abc123`).
fn extract_item_id(thing: &ElementRef) -> Option<String> {
    let fullname = thing
        .value()
        .attr("data-fullname")
        .or_else(|| thing.value().id())?;
    fullname.rsplit('_').next().map(str::to_string)
}

fn permalink<'a>(thing: &'a ElementRef) -> &'a str {
    thing
        .value()
        .attr("data-permalink")
        .or_else(|| thing.value().attr("data-url"))
        .unwrap_or("")
}

fn absolute_url(base_url: &str, permalink: &str) -> String {
    let permalink = permalink.trim();
    if permalink.starts_with('/') {
        format!("{base_url}{permalink}")
    } else {
        permalink.to_string()
    }
}

fn node_text(elem: &ElementRef) -> String {
    elem.text()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn find_next_url(doc: &Html) -> Option<String> {
    doc.select(&NEXT_SEL)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string)
}
