//! JSON rendering for the `imdb-extract` binary.

use crate::entity::{EntityKind, Episode, Movie, Series};
use crate::extract::AlsoKnownAs;
use crate::fetch::FetchClient;
use crate::listing::TitleRef;
use crate::title::TitlePage;
use anyhow::Result;
use serde::Serialize;

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum KindArg {
    Movie,
    Series,
    Episode,
}

impl From<KindArg> for EntityKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Movie => EntityKind::Movie,
            KindArg::Series => EntityKind::Series,
            KindArg::Episode => EntityKind::Episode,
        }
    }
}

/// Every attribute of one title.
#[derive(Debug, Serialize)]
pub struct TitleRecord {
    pub id: String,
    pub kind: EntityKind,
    pub url: String,
    pub title: Option<String>,
    pub year: Option<u32>,
    pub release_date: Option<String>,
    pub length: Option<u32>,
    pub rating: Option<f64>,
    pub votes: Option<u64>,
    pub metascore: Option<u32>,
    pub mpaa_rating: Option<String>,
    pub genres: Vec<String>,
    pub languages: Vec<String>,
    pub countries: Vec<String>,
    pub companies: Vec<String>,
    pub director: Option<String>,
    pub directors: Vec<String>,
    pub writers: Vec<String>,
    pub cast_members: Vec<String>,
    pub cast_member_ids: Vec<String>,
    pub cast_characters: Vec<String>,
    pub plot: Option<String>,
    pub plot_synopsis: Option<String>,
    pub tagline: Option<String>,
    pub poster: Option<String>,
    pub trailer_url: Option<String>,
    pub filming_locations: Vec<String>,
    pub also_known_as: Vec<AlsoKnownAs>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seasons: Option<Vec<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series_id: Option<String>,
}

impl TitleRecord {
    pub async fn collect(page: &mut TitlePage, kind: EntityKind) -> Self {
        Self {
            id: page.id().to_string(),
            kind,
            url: page.url().to_string(),
            title: page.title(false).await,
            year: page.year().await,
            release_date: page.release_date().await,
            length: page.length().await,
            rating: page.rating().await,
            votes: page.votes().await,
            metascore: page.metascore().await,
            mpaa_rating: page.mpaa_rating().await,
            genres: page.genres().await,
            languages: page.languages().await,
            countries: page.countries().await,
            companies: page.companies().await,
            director: page.director().await,
            directors: page.directors().await,
            writers: page.writers().await,
            cast_members: page.cast_members().await,
            cast_member_ids: page.cast_member_ids().await,
            cast_characters: page.cast_characters().await,
            plot: page.plot().await,
            plot_synopsis: page.plot_synopsis().await,
            tagline: page.tagline().await,
            poster: page.poster().await,
            trailer_url: page.trailer_url().await,
            filming_locations: page.filming_locations().await,
            also_known_as: page.also_known_as().await,
            seasons: None,
            season_number: None,
            episode_number: None,
            series_id: None,
        }
    }
}

/// Pretty JSON record for one title.
pub async fn title_record(client: &FetchClient, id: &str, kind: EntityKind) -> Result<String> {
    let record = match kind {
        EntityKind::Series => {
            let mut series = Series::new(client.clone(), id);
            let mut record = TitleRecord::collect(&mut series, kind).await;
            record.seasons = Some(series.season_numbers().await);
            record
        }
        EntityKind::Episode => {
            let mut episode = Episode::new(client.clone(), id);
            let mut record = TitleRecord::collect(&mut episode, kind).await;
            record.season_number = episode.season_number().await;
            record.episode_number = episode.episode_number().await;
            record.series_id = episode.series_id().await;
            record
        }
        EntityKind::Movie | EntityKind::Season => {
            let mut movie = Movie::new(client.clone(), id);
            TitleRecord::collect(&mut movie, EntityKind::Movie).await
        }
    };
    Ok(serde_json::to_string_pretty(&record)?)
}

/// Pretty JSON array of `{id, title}`.
pub fn list_json(refs: &[TitleRef]) -> Result<String> {
    Ok(serde_json::to_string_pretty(refs)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_json_shape() {
        let refs = vec![
            TitleRef {
                id: "0111161".to_string(),
                title: Some("The Shawshank Redemption".to_string()),
            },
            TitleRef {
                id: "0068646".to_string(),
                title: None,
            },
        ];
        let json: serde_json::Value = serde_json::from_str(&list_json(&refs).unwrap()).unwrap();
        assert_eq!(json[0]["id"], "0111161");
        assert_eq!(json[0]["title"], "The Shawshank Redemption");
        assert!(json[1]["title"].is_null());
    }

    #[test]
    fn test_kind_arg_conversion() {
        assert_eq!(EntityKind::from(KindArg::Series), EntityKind::Series);
    }
}
