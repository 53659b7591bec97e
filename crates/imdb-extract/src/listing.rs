//! Listing pages → entity references.

use crate::entity::Movie;
use crate::extract::{element_text, selector};
use crate::fetch::FetchClient;
use crate::sanitize::decode_entities;
use regex::Regex;
use scraper::Html;
use serde::Serialize;
use std::sync::OnceLock;

/// Minimal (id, title) pair; enough to build a full entity lazily.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitleRef {
    pub id: String,
    pub title: Option<String>,
}

impl TitleRef {
    pub fn into_movie(self, client: FetchClient) -> Movie {
        match self.title {
            Some(title) => Movie::with_title(client, self.id, &title),
            None => Movie::new(client, self.id),
        }
    }
}

/// Digits of the first `/title/tt…` in a link target.
pub fn title_id(href: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"/title/tt(\d+)").expect("title id regex is valid"));
    re.captures(href).map(|caps| caps[1].to_string())
}

/// `"12. Forrest Gump"` → `"Forrest Gump"`.
fn strip_rank(text: &str) -> &str {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^\d+\.\s+").expect("rank regex is valid"));
    match re.find(text) {
        Some(m) => &text[m.end()..],
        None => text,
    }
}

/// One reference per row, in document order.
///
/// The id comes from the row's first `link_css` match. The title comes from
/// `title_css` when given, with any leading rank removed, otherwise from the
/// link text as is. Rows without a title link are skipped.
pub fn parse_rows(doc: &Html, row_css: &str, link_css: &str, title_css: Option<&str>) -> Vec<TitleRef> {
    let (Some(row), Some(link)) = (selector(row_css), selector(link_css)) else {
        return Vec::new();
    };
    let title_sel = title_css.and_then(selector);

    doc.select(&row)
        .filter_map(|el| {
            let anchor = el
                .select(&link)
                .find(|a| a.value().attr("href").and_then(title_id).is_some())?;
            let id = anchor.value().attr("href").and_then(title_id)?;
            let text = match &title_sel {
                Some(sel) => el
                    .select(sel)
                    .next()
                    .map(|t| strip_rank(&element_text(&t)).to_string()),
                None => Some(element_text(&anchor)),
            };
            let title = text
                .map(|t| decode_entities(&t))
                .filter(|t| !t.is_empty());
            Some(TitleRef { id, title })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_id() {
        assert_eq!(title_id("/title/tt0095016/?ref_=fn_al_tt_1").as_deref(), Some("0095016"));
        assert_eq!(
            title_id("https://www.imdb.com/title/tt0111161/").as_deref(),
            Some("0111161")
        );
        assert_eq!(title_id("/name/nm0000158/"), None);
    }

    #[test]
    fn test_parse_chart_rows_strips_rank() {
        let html = r#"
        <ul>
          <li class="ipc-metadata-list-summary-item">
            <a class="ipc-title-link-wrapper" href="/title/tt0111161/?ref_=chttp_t_1">
              <h3 class="ipc-title__text">1. The Shawshank Redemption</h3></a>
          </li>
          <li class="ipc-metadata-list-summary-item">
            <a class="ipc-title-link-wrapper" href="/title/tt0068646/?ref_=chttp_t_2">
              <h3 class="ipc-title__text">2. The Godfather</h3></a>
          </li>
        </ul>
        "#;
        let doc = Html::parse_document(html);
        let refs = parse_rows(
            &doc,
            "li.ipc-metadata-list-summary-item",
            "a.ipc-title-link-wrapper",
            Some("h3.ipc-title__text"),
        );
        assert_eq!(
            refs,
            vec![
                TitleRef {
                    id: "0111161".to_string(),
                    title: Some("The Shawshank Redemption".to_string())
                },
                TitleRef {
                    id: "0068646".to_string(),
                    title: Some("The Godfather".to_string())
                },
            ]
        );
    }

    #[test]
    fn test_parse_rows_skips_rows_without_title_link() {
        let html = r#"
        <ul>
          <li class="row"><a href="/name/nm1/">Somebody</a></li>
          <li class="row"><a href="/name/nm2/">Cast</a> <a href="/title/tt0000042/">Answer</a></li>
        </ul>
        "#;
        let doc = Html::parse_document(html);
        let refs = parse_rows(&doc, "li.row", "a", None);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].id, "0000042");
        assert_eq!(refs[0].title.as_deref(), Some("Answer"));
    }

    #[test]
    fn test_link_text_keeps_leading_number() {
        let html = r#"
        <ul><li class="find-title-result"><a href="/title/tt0021097/">1. Mai</a></li></ul>
        "#;
        let doc = Html::parse_document(html);
        let refs = parse_rows(&doc, "li.find-title-result", "a", None);
        assert_eq!(refs[0].title.as_deref(), Some("1. Mai"));
    }
}
