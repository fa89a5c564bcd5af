use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use crate::catalog::Collection;

pub const ANILIST_ENDPOINT: &str = "https://graphql.anilist.co";
/// Only the first page of each listing is fetched.
pub const PER_PAGE: u32 = 50;

const MEDIA_FIELDS: &str = r#"
      id
      title { romaji english native }
      description
      coverImage { large medium }
      bannerImage
      genres
      episodes
      status
      season
      seasonYear
      format
      averageScore
      popularity
      studios { nodes { name } }
      startDate { year month day }
      endDate { year month day }
      nextAiringEpisode { airingAt timeUntilAiring episode }
"#;

#[derive(Debug, Clone)]
pub struct AniListClient {
    client: Client,
    endpoint: String,
}

fn media_filter(collection: Collection) -> &'static str {
    match collection {
        Collection::Latest => "sort: UPDATED_AT_DESC, status_not: NOT_YET_RELEASED",
        Collection::Popular => "sort: POPULARITY_DESC, status_not: NOT_YET_RELEASED",
        Collection::NewReleases => "sort: START_DATE_DESC, status: RELEASING",
    }
}

pub(crate) fn page_query(collection: Collection) -> String {
    format!(
        "query {{\n  Page(page: 1, perPage: {}) {{\n    media(type: ANIME, {}) {{{}    }}\n  }}\n}}\n",
        PER_PAGE,
        media_filter(collection),
        MEDIA_FIELDS
    )
}

impl AniListClient {
    pub fn new() -> Result<Self> {
        Self::with_endpoint(ANILIST_ENDPOINT)
    }

    pub fn with_endpoint(endpoint: &str) -> Result<Self> {
        let user_agent = format!("anime-catalog/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .user_agent(user_agent)
            .build()
            .context("Failed to build AniList HTTP client")?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    pub(crate) async fn fetch_page(&self, collection: Collection) -> Result<Vec<Media>> {
        #[derive(Deserialize)]
        struct Data {
            #[serde(rename = "Page")]
            page: Option<PageMedia>,
        }

        #[derive(Deserialize)]
        struct PageMedia {
            media: Option<Vec<Media>>,
        }

        let body = json!({ "query": page_query(collection) });
        debug!("Querying AniList for {} collection", collection.as_str());

        let res = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await
            .with_context(|| format!("AniList {} request failed", collection.as_str()))?;

        let status = res.status();
        let bytes = res
            .bytes()
            .await
            .with_context(|| format!("Failed to read AniList {} body", collection.as_str()))?;
        if !status.is_success() {
            return Err(anyhow!(
                "AniList {} HTTP error (status {}): {}",
                collection.as_str(),
                status,
                String::from_utf8_lossy(&bytes)
            ));
        }

        let parsed: GraphQlResponse<Data> = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse AniList {} JSON", collection.as_str()))?;
        if let Some(errors) = parsed.errors {
            return Err(anyhow!(
                "AniList {} GraphQL error: {}",
                collection.as_str(),
                join_errors(errors)
            ));
        }

        Ok(parsed
            .data
            .and_then(|d| d.page)
            .and_then(|p| p.media)
            .unwrap_or_default())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlResponse<T> {
    pub(crate) data: Option<T>,
    pub(crate) errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlError {
    pub(crate) message: String,
    pub(crate) status: Option<i32>,
}

fn join_errors(errors: Vec<GraphQlError>) -> String {
    errors
        .into_iter()
        .map(|e| match e.status {
            Some(s) => format!("{} (status {})", e.message, s),
            None => e.message,
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Deserialize)]
pub(crate) struct Media {
    pub(crate) id: i32,
    pub(crate) title: Option<MediaTitle>,
    pub(crate) description: Option<String>,
    #[serde(rename = "coverImage")]
    pub(crate) cover_image: Option<MediaCoverImage>,
    #[serde(rename = "bannerImage")]
    pub(crate) banner_image: Option<String>,
    pub(crate) genres: Option<Vec<String>>,
    pub(crate) episodes: Option<i32>,
    pub(crate) status: Option<String>,
    pub(crate) season: Option<String>,
    #[serde(rename = "seasonYear")]
    pub(crate) season_year: Option<i32>,
    pub(crate) format: Option<String>,
    #[serde(rename = "averageScore")]
    pub(crate) average_score: Option<i32>,
    pub(crate) popularity: Option<i32>,
    pub(crate) studios: Option<StudioConnection>,
    #[serde(rename = "startDate")]
    pub(crate) start_date: Option<MediaDate>,
    #[serde(rename = "endDate")]
    pub(crate) end_date: Option<MediaDate>,
    #[serde(rename = "nextAiringEpisode")]
    pub(crate) next_airing_episode: Option<AiringSchedule>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct MediaTitle {
    pub(crate) romaji: Option<String>,
    pub(crate) english: Option<String>,
    pub(crate) native: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MediaCoverImage {
    pub(crate) large: Option<String>,
    pub(crate) medium: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StudioConnection {
    pub(crate) nodes: Option<Vec<StudioNode>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StudioNode {
    pub(crate) name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MediaDate {
    pub(crate) year: Option<i32>,
    pub(crate) month: Option<u32>,
    pub(crate) day: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AiringSchedule {
    #[serde(rename = "airingAt")]
    pub(crate) airing_at: i64,
    #[serde(rename = "timeUntilAiring")]
    pub(crate) time_until_airing: i64,
    pub(crate) episode: i32,
}
