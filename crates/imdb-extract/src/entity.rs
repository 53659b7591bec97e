//! Movie, Series, Season and Episode.
//!
//! All kinds share the `TitlePage` extraction surface through `Deref`; they
//! differ in their canonical URL and in the few accessors only they carry.
//! A season reads title-level attributes from its series.

use crate::extract::{self, element_text, selector};
use crate::fetch::FetchClient;
use crate::listing::title_id;
use crate::sanitize::{digits_only, normalize_ws};
use crate::title::TitlePage;
use crate::view::View;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Movie,
    Series,
    Season,
    Episode,
}

/// Extraction contract shared by every kind of title.
pub trait Entity: Deref<Target = TitlePage> + DerefMut {
    fn kind(&self) -> EntityKind;
}

macro_rules! title_entity {
    ($name:ident, $kind:expr) => {
        impl $name {
            pub fn new(client: FetchClient, id: impl Into<String>) -> Self {
                Self(TitlePage::new(client, id))
            }

            pub fn with_title(client: FetchClient, id: impl Into<String>, title: &str) -> Self {
                Self(TitlePage::new(client, id).with_title_hint(title))
            }
        }

        impl Deref for $name {
            type Target = TitlePage;
            fn deref(&self) -> &TitlePage {
                &self.0
            }
        }

        impl DerefMut for $name {
            fn deref_mut(&mut self) -> &mut TitlePage {
                &mut self.0
            }
        }

        impl Entity for $name {
            fn kind(&self) -> EntityKind {
                $kind
            }
        }
    };
}

#[derive(Debug)]
pub struct Movie(TitlePage);
title_entity!(Movie, EntityKind::Movie);

#[derive(Debug)]
pub struct Series(TitlePage);
title_entity!(Series, EntityKind::Series);

#[derive(Debug)]
pub struct Episode(TitlePage);
title_entity!(Episode, EntityKind::Episode);

impl Series {
    /// Season numbers listed on the episode guide.
    pub async fn season_numbers(&mut self) -> Vec<u32> {
        let config = std::sync::Arc::clone(self.client().config());
        match self.document(View::Episodes { season: 1 }).await {
            Ok(doc) => season_numbers(doc, &config.selectors.season_tab),
            Err(e) => {
                tracing::debug!("episode guide unavailable for tt{}: {e}", self.id());
                Vec::new()
            }
        }
    }

    pub fn season(&self, number: u32) -> Season {
        Season::new(self.client().clone(), self.id(), number)
    }
}

fn season_numbers(doc: &scraper::Html, css: &str) -> Vec<u32> {
    let mut numbers: Vec<u32> = extract::texts(doc, css)
        .iter()
        .filter_map(|s| digits_only(s).parse().ok())
        .collect();
    numbers.dedup();
    numbers
}

impl Episode {
    /// `(season, episode)` from the hero block, e.g. `S2.E7`.
    async fn numbers(&mut self) -> Option<(u32, u32)> {
        let config = std::sync::Arc::clone(self.client().config());
        let doc = self.document(View::Combined).await.ok()?;
        parse_episode_numbers(&extract::first_text(doc, &config.selectors.episode_numbers)?)
    }

    pub async fn season_number(&mut self) -> Option<u32> {
        self.numbers().await.map(|(season, _)| season)
    }

    pub async fn episode_number(&mut self) -> Option<u32> {
        self.numbers().await.map(|(_, episode)| episode)
    }

    /// Id of the series this episode belongs to.
    pub async fn series_id(&mut self) -> Option<String> {
        let config = std::sync::Arc::clone(self.client().config());
        let doc = self.document(View::Combined).await.ok()?;
        let sel = selector(&config.selectors.series_link)?;
        let href = doc.select(&sel).next()?.value().attr("href")?;
        title_id(href)
    }
}

fn parse_episode_numbers(text: &str) -> Option<(u32, u32)> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"(?i)S(\d+)\s*\.?\s*E\s*(\d+)").expect("episode number regex is valid")
    });
    let caps = re.captures(text)?;
    Some((caps[1].parse().ok()?, caps[2].parse().ok()?))
}

/// One season of a series; its canonical page is the season's episode list.
///
/// A season has no title page of its own. It derefs to a `TitlePage` keyed
/// on the series id, so title-level accessors (`title`, `cast_members`,
/// `rating`, ...) return the series' values.
#[derive(Debug)]
pub struct Season {
    page: TitlePage,
    number: u32,
}

impl Season {
    pub fn new(client: FetchClient, series_id: impl Into<String>, number: u32) -> Self {
        let series_id = series_id.into();
        let url = client.title_url(&series_id, View::Episodes { season: number });
        Self {
            page: TitlePage::with_url(client, series_id, url),
            number,
        }
    }

    pub fn series_id(&self) -> &str {
        self.page.id()
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    /// Episodes in listing order, each carrying its listed title.
    pub async fn episodes(&mut self) -> Vec<Episode> {
        let client = self.page.client().clone();
        let view = View::Episodes {
            season: self.number,
        };
        let doc = match self.page.document(view).await {
            Ok(doc) => doc,
            Err(e) => {
                tracing::debug!("season {} unavailable: {e}", self.number);
                return Vec::new();
            }
        };
        episode_rows(doc, &client.config().selectors)
            .into_iter()
            .map(|(id, title)| match title {
                Some(title) => Episode::with_title(client.clone(), id, &title),
                None => Episode::new(client.clone(), id),
            })
            .collect()
    }
}

fn episode_rows(
    doc: &scraper::Html,
    selectors: &crate::config::Selectors,
) -> Vec<(String, Option<String>)> {
    let (Some(row), Some(link), Some(title)) = (
        selector(&selectors.episode_row),
        selector(&selectors.episode_link),
        selector(&selectors.episode_title),
    ) else {
        return Vec::new();
    };
    doc.select(&row)
        .filter_map(|el| {
            let id = title_id(el.select(&link).next()?.value().attr("href")?)?;
            let name = el
                .select(&title)
                .next()
                .map(|t| strip_episode_prefix(&element_text(&t)))
                .filter(|t| !t.is_empty());
            Some((id, name))
        })
        .collect()
}

/// `"S1.E3 ∙ Pilot"` → `"Pilot"`.
fn strip_episode_prefix(text: &str) -> String {
    match text.split_once('∙') {
        Some((_, rest)) => normalize_ws(rest),
        None => normalize_ws(text),
    }
}

impl Deref for Season {
    type Target = TitlePage;
    fn deref(&self) -> &TitlePage {
        &self.page
    }
}

impl DerefMut for Season {
    fn deref_mut(&mut self) -> &mut TitlePage {
        &mut self.page
    }
}

impl Entity for Season {
    fn kind(&self) -> EntityKind {
        EntityKind::Season
    }
}
