//! Scraper configuration: endpoints, delays, user agent, and the selector set.
//!
//! Layered as defaults → JSON file → environment. The selectors are
//! configuration data bound to one snapshot of the site's markup, so they can
//! be overridden from the same file without a rebuild.

use crate::error::{Result, ScrapeError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_URL: &str = "https://www.imdb.com";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/142.0.0.0 Safari/537.36";

pub const DEFAULT_INTERSTITIAL_MARKER: &str = "Enable JavaScript and then reload the page.";

/// Runtime configuration for the fetch client and extractors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Scheme and host every URL is built from.
    pub base_url: String,
    /// Desktop browser identification sent with every navigation.
    pub user_agent: String,
    /// Wait after navigation for client-side rendering.
    pub settle_delay_ms: u64,
    /// Wait before re-reading a page that came back as the interstitial.
    pub retry_delay_ms: u64,
    /// Upper bound on a single navigation.
    pub navigation_timeout_ms: u64,
    /// Text that marks the "JavaScript required" placeholder page.
    pub interstitial_marker: String,
    /// How many trailing bytes of markup are searched for the marker.
    pub interstitial_tail: usize,
    /// Explicit Chromium binary; discovered when unset.
    pub chromium_path: Option<PathBuf>,
    pub selectors: Selectors,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            settle_delay_ms: 2000,
            retry_delay_ms: 4000,
            navigation_timeout_ms: 30_000,
            interstitial_marker: DEFAULT_INTERSTITIAL_MARKER.to_string(),
            interstitial_tail: 1000,
            chromium_path: None,
            selectors: Selectors::default(),
        }
    }
}

impl ScraperConfig {
    /// Load a JSON config file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ScrapeError::Config(format!("failed to read {}: {e}", path.display())))?;
        serde_json::from_str(&raw)
            .map_err(|e| ScrapeError::Config(format!("failed to parse {}: {e}", path.display())))
    }

    /// Overlay `IMDB_*` environment variables on top of this config.
    pub fn apply_env(mut self) -> Self {
        if let Ok(base) = std::env::var("IMDB_BASE_URL") {
            self.base_url = base;
        }
        if let Ok(ua) = std::env::var("IMDB_USER_AGENT") {
            self.user_agent = ua;
        }
        if let Some(ms) = env_millis("IMDB_SETTLE_MS") {
            self.settle_delay_ms = ms;
        }
        if let Some(ms) = env_millis("IMDB_RETRY_MS") {
            self.retry_delay_ms = ms;
        }
        if let Ok(path) = std::env::var("IMDB_CHROMIUM_PATH") {
            self.chromium_path = Some(PathBuf::from(path));
        }
        self
    }

    /// Base URL without a trailing slash.
    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

fn env_millis(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// CSS selectors for every extraction rule and listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub jsonld: String,
    pub cast_link: String,
    pub cast_character: String,
    pub writer_link: String,
    pub director_link: String,
    pub genre_link: String,
    pub language_link: String,
    pub country_link: String,
    pub company_link: String,
    pub synopsis: String,
    pub metascore: String,
    pub tagline: String,
    pub year_suffix: String,
    pub release_date: String,
    pub filming_location: String,
    pub aka_row: String,
    pub aka_version: String,
    pub aka_title: String,
    pub season_tab: String,
    pub episode_row: String,
    pub episode_link: String,
    pub episode_title: String,
    pub episode_numbers: String,
    pub series_link: String,
    pub search_exact_marker: String,
    pub canonical_link: String,
    pub heading: String,
    pub search_row: String,
    pub search_link: String,
    pub chart_row: String,
    pub chart_link: String,
    pub chart_title: String,
}

impl Default for Selectors {
    fn default() -> Self {
        let credits = |section: &str| {
            format!(
                "div[data-testid='sub-section-{section}'] \
                 li[data-testid='name-credits-list-item'] a.name-credits--title-text-big"
            )
        };
        Self {
            jsonld: r#"script[type="application/ld+json"]"#.to_string(),
            cast_link: credits("cast"),
            cast_character: "div[data-testid='sub-section-cast'] \
                             li[data-testid='name-credits-list-item'] a[href*=character]"
                .to_string(),
            writer_link: credits("writer"),
            director_link: credits("director"),
            genre_link: "li[data-testid='storyline-genres'] li a".to_string(),
            language_link: "li[data-testid='title-details-languages'] li a".to_string(),
            country_link: "li[data-testid='title-details-origin'] li a".to_string(),
            company_link: "li[data-testid='title-details-companies'] li a".to_string(),
            synopsis: "div[data-testid='sub-section-synopsis'] > ul > li".to_string(),
            metascore: "div[data-testid='critic-reviews-title'] div".to_string(),
            tagline: "li[data-testid='storyline-taglines'] span".to_string(),
            year_suffix: "h1[data-testid='hero__pageTitle'] \
                          span[data-testid='hero__primary-text-suffix']"
                .to_string(),
            release_date: "a[href$='ttrv_ov_rdat']".to_string(),
            filming_location: "div[data-testid='item-id'] a[data-testid='item-text-with-link']"
                .to_string(),
            aka_row: "#akas tr".to_string(),
            aka_version: "td:nth-child(1)".to_string(),
            aka_title: "td:nth-child(2)".to_string(),
            season_tab: "a[data-testid='tab-season-entry']".to_string(),
            episode_row: "article.episode-item-wrapper".to_string(),
            episode_link: "a[href*='/title/tt']".to_string(),
            episode_title: ".ipc-title__text".to_string(),
            episode_numbers: "div[data-testid='hero-subnav-bar-season-episode-numbers-section']"
                .to_string(),
            series_link: "a[data-testid='hero-title-block__series-link']".to_string(),
            search_exact_marker: "table#title-overview-widget-layout".to_string(),
            canonical_link: "head link[rel='canonical']".to_string(),
            heading: "h1".to_string(),
            search_row: "li.find-title-result".to_string(),
            search_link: "a[href*='/title/tt']".to_string(),
            chart_row: "li.ipc-metadata-list-summary-item".to_string(),
            chart_link: "a.ipc-title-link-wrapper".to_string(),
            chart_title: "h3.ipc-title__text".to_string(),
        }
    }
}
