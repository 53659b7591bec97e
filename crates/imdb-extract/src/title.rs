//! Per-title document cache and attribute accessors.
//!
//! A `TitlePage` performs no I/O when constructed. Each accessor resolves
//! the view it needs on first use, keeps the parsed document for the rest of
//! the instance's life, and runs one extraction rule against it. Fetch
//! failures are logged and turned into the attribute's empty value; the
//! failed view is not cached, so a later accessor may try it again.
//!
//! `scraper::Html` is `!Send`, so a page and its cache stay on the task that
//! created them.

use crate::config::{ScraperConfig, Selectors};
use crate::error::Result;
use crate::extract::{self, AlsoKnownAs};
use crate::fetch::FetchClient;
use crate::sanitize::clean_title;
use crate::view::View;
use scraper::Html;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

pub struct TitlePage {
    id: String,
    url: String,
    title_hint: Option<String>,
    client: FetchClient,
    views: HashMap<View, Html>,
    jsonld: Option<Value>,
}

impl TitlePage {
    /// Lazily-loaded title; `url` is the canonical combined view.
    pub fn new(client: FetchClient, id: impl Into<String>) -> Self {
        let id = id.into();
        let url = client.title_url(&id, View::Combined);
        Self::with_url(client, id, url)
    }

    pub(crate) fn with_url(client: FetchClient, id: String, url: String) -> Self {
        Self {
            id,
            url,
            title_hint: None,
            client,
            views: HashMap::new(),
            jsonld: None,
        }
    }

    /// Attach a title known up front, e.g. from a listing.
    pub fn with_title_hint(mut self, title: &str) -> Self {
        self.title_hint = Some(clean_title(title));
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn client(&self) -> &FetchClient {
        &self.client
    }

    /// Whether a view has already been fetched and parsed.
    pub fn is_cached(&self, view: View) -> bool {
        self.views.contains_key(&view)
    }

    /// Parsed document for `view`, fetched on first access.
    pub async fn document(&mut self, view: View) -> Result<&Html> {
        if !self.views.contains_key(&view) {
            let markup = self.client.fetch(&self.id, view).await?;
            debug!("cached view {view} for tt{} ({} bytes)", self.id, markup.len());
            self.views.insert(view, Html::parse_document(&markup));
        }
        Ok(&self.views[&view])
    }

    /// JSON-LD record of the main view, parsed once.
    pub async fn jsonld(&mut self) -> Option<&Value> {
        if self.jsonld.is_none() {
            let config = Arc::clone(self.client.config());
            let parsed = match self.document(View::Main).await {
                Ok(doc) => extract::jsonld(doc, &config.selectors),
                Err(e) => {
                    debug!("jsonld unavailable for tt{}: {e}", self.id);
                    return None;
                }
            };
            self.jsonld = parsed;
        }
        self.jsonld.as_ref()
    }

    async fn with_document<T>(
        &mut self,
        view: View,
        rule: impl FnOnce(&Html, &Selectors) -> T,
    ) -> Option<T> {
        let config: Arc<ScraperConfig> = Arc::clone(self.client.config());
        match self.document(view).await {
            Ok(doc) => Some(rule(doc, &config.selectors)),
            Err(e) => {
                debug!("view {view} unavailable for tt{}: {e}", self.id);
                None
            }
        }
    }

    async fn with_jsonld<T>(&mut self, rule: impl FnOnce(&Value) -> Option<T>) -> Option<T> {
        rule(self.jsonld().await?)
    }

    // ── People ──

    pub async fn cast_members(&mut self) -> Vec<String> {
        self.with_document(View::FullCredits, extract::cast_members)
            .await
            .unwrap_or_default()
    }

    pub async fn cast_member_ids(&mut self) -> Vec<String> {
        self.with_document(View::FullCredits, extract::cast_member_ids)
            .await
            .unwrap_or_default()
    }

    pub async fn cast_characters(&mut self) -> Vec<String> {
        self.with_document(View::FullCredits, extract::cast_characters)
            .await
            .unwrap_or_default()
    }

    /// `"{member} {sep} {character}"` pairs, matched by position.
    pub async fn cast_members_characters(&mut self, sep: &str) -> Vec<String> {
        let members = self.cast_members().await;
        let characters = self.cast_characters().await;
        extract::zip_members_characters(&members, &characters, sep)
    }

    pub async fn writers(&mut self) -> Vec<String> {
        self.with_document(View::FullCredits, extract::writers)
            .await
            .unwrap_or_default()
    }

    pub async fn directors(&mut self) -> Vec<String> {
        self.with_document(View::FullCredits, extract::directors)
            .await
            .unwrap_or_default()
    }

    pub async fn director(&mut self) -> Option<String> {
        self.with_jsonld(extract::director).await
    }

    // ── Classification ──

    /// JSON-LD genres, falling back to the storyline genre links.
    pub async fn genres(&mut self) -> Vec<String> {
        let from_ld = self
            .with_jsonld(|ld| Some(extract::genres_from_jsonld(ld)))
            .await
            .unwrap_or_default();
        if !from_ld.is_empty() {
            return from_ld;
        }
        self.with_document(View::Combined, extract::genres_from_links)
            .await
            .unwrap_or_default()
    }

    pub async fn languages(&mut self) -> Vec<String> {
        self.with_document(View::Combined, extract::languages)
            .await
            .unwrap_or_default()
    }

    pub async fn countries(&mut self) -> Vec<String> {
        self.with_document(View::Combined, extract::countries)
            .await
            .unwrap_or_default()
    }

    pub async fn companies(&mut self) -> Vec<String> {
        self.with_document(View::Combined, extract::companies)
            .await
            .unwrap_or_default()
    }

    pub async fn company(&mut self) -> Option<String> {
        self.companies().await.into_iter().next()
    }

    pub async fn mpaa_rating(&mut self) -> Option<String> {
        self.with_jsonld(extract::mpaa_rating).await
    }

    // ── Text ──

    /// Plot with boilerplate links stripped.
    pub async fn plot(&mut self) -> Option<String> {
        self.with_jsonld(extract::plot).await
    }

    pub async fn plot_summary(&mut self) -> Option<String> {
        self.with_jsonld(extract::plot_summary).await
    }

    pub async fn plot_synopsis(&mut self) -> Option<String> {
        self.with_document(View::Synopsis, extract::plot_synopsis)
            .await
            .flatten()
    }

    pub async fn tagline(&mut self) -> Option<String> {
        self.with_document(View::Combined, extract::tagline)
            .await
            .flatten()
    }

    /// Title known at construction, unless `force_refresh` asks for the
    /// page's own (localized when available) name.
    pub async fn title(&mut self, force_refresh: bool) -> Option<String> {
        if !force_refresh {
            if let Some(hint) = &self.title_hint {
                return Some(hint.clone());
            }
        }
        self.with_jsonld(extract::title).await
    }

    pub async fn release_date(&mut self) -> Option<String> {
        self.with_document(View::Combined, extract::release_date)
            .await
            .flatten()
    }

    // ── Numbers ──

    /// Runtime in minutes.
    pub async fn length(&mut self) -> Option<u32> {
        self.with_jsonld(extract::length).await
    }

    pub async fn rating(&mut self) -> Option<f64> {
        self.with_jsonld(extract::rating).await
    }

    pub async fn votes(&mut self) -> Option<u64> {
        self.with_jsonld(extract::votes).await
    }

    pub async fn metascore(&mut self) -> Option<u32> {
        self.with_document(View::CriticReviews, extract::metascore)
            .await
            .flatten()
    }

    pub async fn year(&mut self) -> Option<u32> {
        self.with_document(View::Combined, extract::year)
            .await
            .flatten()
    }

    // ── Media ──

    pub async fn poster(&mut self) -> Option<String> {
        self.with_jsonld(extract::poster).await
    }

    pub async fn trailer_url(&mut self) -> Option<String> {
        self.with_jsonld(extract::trailer_url).await
    }

    // ── Secondary views ──

    pub async fn filming_locations(&mut self) -> Vec<String> {
        self.with_document(View::Locations, extract::filming_locations)
            .await
            .unwrap_or_default()
    }

    pub async fn also_known_as(&mut self) -> Vec<AlsoKnownAs> {
        self.with_document(View::ReleaseInfo, extract::also_known_as)
            .await
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for TitlePage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TitlePage")
            .field("id", &self.id)
            .field("url", &self.url)
            .field("title_hint", &self.title_hint)
            .field("cached_views", &self.views.len())
            .finish()
    }
}
