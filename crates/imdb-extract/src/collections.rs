//! Search results, the top-ranked chart and the box-office list.
//!
//! Each collection fetches one listing document and turns it into movies
//! that load lazily. Unlike attribute accessors, these return errors: a
//! fetch failure, or an exact-match page without the nodes that identify it.

use crate::entity::Movie;
use crate::error::{Result, ScrapeError};
use crate::extract::selector;
use crate::fetch::FetchClient;
use crate::listing::{parse_rows, TitleRef};
use crate::sanitize::{clean_title, decode_entities};
use scraper::Html;
use tracing::info;

/// Search for titles matching a free-text query.
pub async fn search(client: &FetchClient, query: &str) -> Result<Vec<Movie>> {
    Search::new(client.clone(), query).movies().await
}

/// The top-ranked chart.
pub async fn top_ranked(client: &FetchClient) -> Result<Vec<Movie>> {
    TopRanked::new(client.clone()).movies().await
}

/// Current box-office ranking.
pub async fn box_office(client: &FetchClient) -> Result<Vec<Movie>> {
    BoxOffice::new(client.clone()).movies().await
}

/// A lazy search: nothing is fetched until `movies` or `refs` is called.
pub struct Search {
    client: FetchClient,
    query: String,
    document: Option<Html>,
}

impl Search {
    pub fn new(client: FetchClient, query: impl Into<String>) -> Self {
        Self {
            client,
            query: query.into(),
            document: None,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// `{base}/find/?q={query}`
    pub fn url(&self) -> String {
        let q: String = url::form_urlencoded::byte_serialize(self.query.as_bytes()).collect();
        self.client.endpoint_url(&format!("find/?q={q}"))
    }

    async fn document(&mut self) -> Result<&Html> {
        if self.document.is_none() {
            let markup = self.client.fetch_url(&self.url()).await?;
            self.document = Some(Html::parse_document(&markup));
        }
        self.document
            .as_ref()
            .ok_or_else(|| ScrapeError::Structure("search document missing".to_string()))
    }

    /// Matching references. An exact match yields exactly one.
    pub async fn refs(&mut self) -> Result<Vec<TitleRef>> {
        let client = self.client.clone();
        let selectors = &client.config().selectors;
        let doc = self.document().await?;

        let refs = if is_exact_match(doc, &selectors.search_exact_marker) {
            vec![parse_exact_match(doc, &selectors.canonical_link, &selectors.heading)?]
        } else {
            parse_rows(doc, &selectors.search_row, &selectors.search_link, None)
        };
        info!("search {:?} returned {} titles", self.query, refs.len());
        Ok(refs)
    }

    pub async fn movies(&mut self) -> Result<Vec<Movie>> {
        let refs = self.refs().await?;
        Ok(into_movies(refs, &self.client))
    }
}

fn is_exact_match(doc: &Html, marker_css: &str) -> bool {
    selector(marker_css).is_some_and(|sel| doc.select(&sel).next().is_some())
}

/// Id from the canonical link, title from the heading before its first
/// `<span`.
fn parse_exact_match(doc: &Html, canonical_css: &str, heading_css: &str) -> Result<TitleRef> {
    let structure = |what: &str| ScrapeError::Structure(format!("exact match page without {what}"));

    let canonical = selector(canonical_css).ok_or_else(|| structure("canonical selector"))?;
    let href = doc
        .select(&canonical)
        .next()
        .and_then(|el| el.value().attr("href"))
        .ok_or_else(|| structure("canonical link"))?;
    let id: String = href
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if id.is_empty() {
        return Err(structure("id in canonical link"));
    }

    let title = selector(heading_css)
        .and_then(|sel| doc.select(&sel).next())
        .map(|h1| {
            let inner = h1.inner_html();
            let before_span = inner.split("<span").next().unwrap_or_default();
            clean_title(&decode_entities(before_span))
        })
        .filter(|t| !t.is_empty());

    Ok(TitleRef { id, title })
}

fn into_movies(refs: Vec<TitleRef>, client: &FetchClient) -> Vec<Movie> {
    refs.into_iter()
        .map(|r| r.into_movie(client.clone()))
        .collect()
}

macro_rules! chart {
    ($(#[$meta:meta])* $name:ident, $path:expr) => {
        $(#[$meta])*
        pub struct $name {
            client: FetchClient,
        }

        impl $name {
            pub fn new(client: FetchClient) -> Self {
                Self { client }
            }

            pub fn url(&self) -> String {
                self.client.endpoint_url($path)
            }

            pub async fn refs(&self) -> Result<Vec<TitleRef>> {
                let markup = self.client.fetch_url(&self.url()).await?;
                let doc = Html::parse_document(&markup);
                let selectors = &self.client.config().selectors;
                let refs = parse_rows(
                    &doc,
                    &selectors.chart_row,
                    &selectors.chart_link,
                    Some(selectors.chart_title.as_str()),
                );
                info!("{} returned {} titles", stringify!($name), refs.len());
                Ok(refs)
            }

            pub async fn movies(&self) -> Result<Vec<Movie>> {
                let refs = self.refs().await?;
                Ok(into_movies(refs, &self.client))
            }
        }
    };
}

chart!(
    /// `{base}/chart/top`
    TopRanked,
    "chart/top"
);

chart!(
    /// `{base}/boxoffice/`
    BoxOffice,
    "boxoffice/"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exact_match() {
        let html = r#"
        <html><head><link rel="canonical" href="https://www.imdb.com/title/tt0095016/"></head>
        <body><table id="title-overview-widget-layout"></table>
        <h1>Die Hard &amp; Friends <span>(1988)</span></h1></body></html>
        "#;
        let doc = Html::parse_document(html);
        assert!(is_exact_match(&doc, "table#title-overview-widget-layout"));
        let r = parse_exact_match(&doc, "head link[rel='canonical']", "h1").unwrap();
        assert_eq!(r.id, "0095016");
        assert_eq!(r.title.as_deref(), Some("Die Hard & Friends"));
    }

    #[test]
    fn test_exact_match_without_canonical_is_an_error() {
        let doc = Html::parse_document("<html><body><h1>Die Hard</h1></body></html>");
        let err = parse_exact_match(&doc, "head link[rel='canonical']", "h1").unwrap_err();
        assert!(matches!(err, ScrapeError::Structure(_)));
    }
}
