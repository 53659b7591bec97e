//! Field extraction rules.
//!
//! Each rule reads one parsed view (or the JSON-LD record) and returns the
//! attribute's value or its empty form. Rules never fail loudly: a missing
//! node, an unparsable selector or a wrong JSON type all end in `None` or an
//! empty `Vec`, so one broken rule cannot take its siblings down.

use crate::config::Selectors;
use crate::sanitize::{
    decode_entities, digits_only, normalize_ws, parse_duration_minutes, sanitize_plot,
    sanitize_release_date,
};
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use serde_json::Value;

/// One alternative title from the release-info view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlsoKnownAs {
    pub version: String,
    pub title: String,
}

// ── Generic helpers ─────────────────────────────────────────────────────────

pub(crate) fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(sel) => Some(sel),
        Err(e) => {
            tracing::debug!("invalid selector {css:?}: {e}");
            None
        }
    }
}

pub(crate) fn element_text(el: &ElementRef<'_>) -> String {
    normalize_ws(&el.text().collect::<String>())
}

/// Trimmed text of every node matching `css`, in document order.
pub fn texts(doc: &Html, css: &str) -> Vec<String> {
    let Some(sel) = selector(css) else {
        return Vec::new();
    };
    doc.select(&sel).map(|el| element_text(&el)).collect()
}

/// Trimmed text of the first node matching `css`.
pub fn first_text(doc: &Html, css: &str) -> Option<String> {
    let sel = selector(css)?;
    let el = doc.select(&sel).next()?;
    Some(element_text(&el))
}

/// First JSON-LD block that parses to an object.
///
/// Script bodies are raw text; reading them through `inner_html` would
/// re-escape every `&`.
pub fn jsonld(doc: &Html, selectors: &Selectors) -> Option<Value> {
    let sel = selector(&selectors.jsonld)?;
    doc.select(&sel).find_map(|el| {
        let text: String = el.text().collect();
        match serde_json::from_str::<Value>(text.trim()) {
            Ok(value) if value.is_object() => Some(value),
            _ => None,
        }
    })
}

fn json_str(value: &Value) -> Option<String> {
    value.as_str().map(|s| s.to_string())
}

fn json_f64(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

fn json_u64(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_str()
            .and_then(|s| s.trim().replace(',', "").parse().ok())
    })
}

// ── People ──────────────────────────────────────────────────────────────────

pub fn cast_members(doc: &Html, selectors: &Selectors) -> Vec<String> {
    texts(doc, &selectors.cast_link)
}

/// Person ids (`nm…`) from the cast links' targets.
pub fn cast_member_ids(doc: &Html, selectors: &Selectors) -> Vec<String> {
    let Some(sel) = selector(&selectors.cast_link) else {
        return Vec::new();
    };
    doc.select(&sel)
        .filter_map(|el| el.value().attr("href"))
        .filter_map(person_id)
        .collect()
}

fn person_id(href: &str) -> Option<String> {
    let rest = &href[href.find("/name/")? + "/name/".len()..];
    let id: String = rest.chars().take_while(|c| *c != '/' && *c != '?').collect();
    (!id.is_empty()).then_some(id)
}

pub fn cast_characters(doc: &Html, selectors: &Selectors) -> Vec<String> {
    texts(doc, &selectors.cast_character)
}

/// Pair members with characters by position.
///
/// The shorter list decides how many pairs come out. When a credit has no
/// character link the pairing shifts; that misalignment is kept as is.
pub fn zip_members_characters(members: &[String], characters: &[String], sep: &str) -> Vec<String> {
    members
        .iter()
        .zip(characters)
        .map(|(member, character)| format!("{member} {sep} {character}"))
        .collect()
}

pub fn writers(doc: &Html, selectors: &Selectors) -> Vec<String> {
    texts(doc, &selectors.writer_link)
}

pub fn directors(doc: &Html, selectors: &Selectors) -> Vec<String> {
    texts(doc, &selectors.director_link)
}

/// First director name; `director` may be an object or an array of them.
pub fn director(ld: &Value) -> Option<String> {
    let director = ld.get("director")?;
    let first = match director.as_array() {
        Some(list) => list.first()?,
        None => director,
    };
    first.get("name").and_then(json_str)
}

// ── Labeled link sections ───────────────────────────────────────────────────

/// Genres from JSON-LD (string or array of strings).
pub fn genres_from_jsonld(ld: &Value) -> Vec<String> {
    match ld.get("genre") {
        Some(Value::String(genre)) => vec![genre.clone()],
        Some(Value::Array(list)) => list.iter().filter_map(json_str).collect(),
        _ => Vec::new(),
    }
}

pub fn genres_from_links(doc: &Html, selectors: &Selectors) -> Vec<String> {
    texts(doc, &selectors.genre_link)
}

pub fn languages(doc: &Html, selectors: &Selectors) -> Vec<String> {
    texts(doc, &selectors.language_link)
}

pub fn countries(doc: &Html, selectors: &Selectors) -> Vec<String> {
    texts(doc, &selectors.country_link)
}

pub fn companies(doc: &Html, selectors: &Selectors) -> Vec<String> {
    texts(doc, &selectors.company_link)
}

// ── Text fields ─────────────────────────────────────────────────────────────

pub fn plot(ld: &Value) -> Option<String> {
    plot_summary(ld).map(|s| sanitize_plot(&s))
}

pub fn plot_summary(ld: &Value) -> Option<String> {
    ld.get("description")
        .and_then(Value::as_str)
        .map(decode_entities)
}

pub fn plot_synopsis(doc: &Html, selectors: &Selectors) -> Option<String> {
    first_text(doc, &selectors.synopsis)
}

pub fn tagline(doc: &Html, selectors: &Selectors) -> Option<String> {
    first_text(doc, &selectors.tagline).map(|s| decode_entities(&s))
}

pub fn release_date(doc: &Html, selectors: &Selectors) -> Option<String> {
    first_text(doc, &selectors.release_date).map(|s| sanitize_release_date(&s))
}

/// Localized name wins over the primary one.
pub fn title(ld: &Value) -> Option<String> {
    ld.get("alternateName")
        .and_then(Value::as_str)
        .or_else(|| ld.get("name").and_then(Value::as_str))
        .map(decode_entities)
}

pub fn mpaa_rating(ld: &Value) -> Option<String> {
    ld.get("contentRating").and_then(json_str)
}

pub fn poster(ld: &Value) -> Option<String> {
    ld.get("image").and_then(json_str)
}

pub fn trailer_url(ld: &Value) -> Option<String> {
    ld.get("trailer")?.get("url").and_then(json_str)
}

// ── Numbers ─────────────────────────────────────────────────────────────────

/// Runtime in whole minutes from the ISO-8601 `duration`.
pub fn length(ld: &Value) -> Option<u32> {
    parse_duration_minutes(ld.get("duration")?.as_str()?)
}

pub fn rating(ld: &Value) -> Option<f64> {
    json_f64(ld.get("aggregateRating")?.get("ratingValue")?)
}

pub fn votes(ld: &Value) -> Option<u64> {
    json_u64(ld.get("aggregateRating")?.get("ratingCount")?)
}

pub fn metascore(doc: &Html, selectors: &Selectors) -> Option<u32> {
    first_text(doc, &selectors.metascore)?.parse().ok()
}

/// Year from the suffix next to the page heading, e.g. `(1988)`.
pub fn year(doc: &Html, selectors: &Selectors) -> Option<u32> {
    digits_only(&first_text(doc, &selectors.year_suffix)?)
        .parse()
        .ok()
}

// ── Secondary views ─────────────────────────────────────────────────────────

pub fn filming_locations(doc: &Html, selectors: &Selectors) -> Vec<String> {
    texts(doc, &selectors.filming_location)
}

/// `{version, title}` rows of the release-info AKA table.
pub fn also_known_as(doc: &Html, selectors: &Selectors) -> Vec<AlsoKnownAs> {
    let (Some(row), Some(version), Some(title)) = (
        selector(&selectors.aka_row),
        selector(&selectors.aka_version),
        selector(&selectors.aka_title),
    ) else {
        return Vec::new();
    };

    doc.select(&row)
        .filter_map(|tr| {
            let cell = |sel: &Selector| {
                tr.select(sel)
                    .next()
                    .map(|td| element_text(&td))
                    .unwrap_or_default()
            };
            let aka = AlsoKnownAs {
                version: cell(&version),
                title: cell(&title),
            };
            (!aka.version.is_empty() || !aka.title.is_empty()).then_some(aka)
        })
        .collect()
}
