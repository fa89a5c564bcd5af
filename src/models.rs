use serde::{Deserialize, Deserializer, Serialize};

/// One anime as stored in the snapshot files.
///
/// Field names follow the AniList/snapshot JSON shape so a record can be
/// served back verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimeRecord {
    pub id: i32,
    pub title: AnimeTitle,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "coverImage", default)]
    pub cover_image: CoverImage,
    #[serde(rename = "bannerImage", default)]
    pub banner_image: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<String>,
    #[serde(default)]
    pub episodes: Option<i32>,
    #[serde(default)]
    pub status: Option<MediaStatus>,
    #[serde(default)]
    pub season: Option<String>,
    #[serde(rename = "seasonYear", default)]
    pub season_year: Option<i32>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(rename = "averageScore", default)]
    pub average_score: Option<i32>,
    #[serde(default)]
    pub popularity: Option<i32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub studios: Vec<String>,
    #[serde(rename = "startDate", default)]
    pub start_date: FuzzyDate,
    #[serde(rename = "endDate", default)]
    pub end_date: FuzzyDate,
    #[serde(rename = "nextAiringEpisode", default)]
    pub next_airing_episode: Option<NextAiringEpisode>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimeTitle {
    #[serde(default, deserialize_with = "null_as_default")]
    pub romaji: String,
    #[serde(default)]
    pub english: Option<String>,
    #[serde(default)]
    pub native: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverImage {
    #[serde(default)]
    pub large: Option<String>,
    #[serde(default)]
    pub medium: Option<String>,
}

impl CoverImage {
    pub fn best(&self) -> Option<&str> {
        self.large.as_deref().or(self.medium.as_deref())
    }
}

/// AniList "fuzzy" date: any part may be unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuzzyDate {
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub month: Option<u32>,
    #[serde(default)]
    pub day: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextAiringEpisode {
    #[serde(rename = "airingAt")]
    pub airing_at: i64,
    /// Seconds until the episode airs; negative once it has aired.
    #[serde(rename = "timeUntilAiring")]
    pub time_until_airing: i64,
    pub episode: i32,
}

/// Release status. Values AniList adds later (or ones we don't display
/// specially) are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MediaStatus {
    Releasing,
    Finished,
    NotYetReleased,
    Other(String),
}

impl From<String> for MediaStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "RELEASING" => MediaStatus::Releasing,
            "FINISHED" => MediaStatus::Finished,
            "NOT_YET_RELEASED" => MediaStatus::NotYetReleased,
            _ => MediaStatus::Other(value),
        }
    }
}

impl From<MediaStatus> for String {
    fn from(value: MediaStatus) -> Self {
        match value {
            MediaStatus::Releasing => "RELEASING".to_string(),
            MediaStatus::Finished => "FINISHED".to_string(),
            MediaStatus::NotYetReleased => "NOT_YET_RELEASED".to_string(),
            MediaStatus::Other(s) => s,
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_snapshot_record_with_nulls() {
        let value = json!({
            "id": 16498,
            "title": { "romaji": "Shingeki no Kyojin", "english": "Attack on Titan", "native": null },
            "description": null,
            "coverImage": { "large": "https://img/large.jpg", "medium": null },
            "bannerImage": null,
            "genres": ["Action", "Drama"],
            "episodes": null,
            "status": "FINISHED",
            "averageScore": 85,
            "popularity": 900000,
            "studios": null,
            "startDate": { "year": 2013, "month": 4, "day": 7 },
            "nextAiringEpisode": null
        });
        let record: AnimeRecord = serde_json::from_value(value).expect("record deserialize");
        assert_eq!(record.id, 16498);
        assert_eq!(record.title.native, None);
        assert_eq!(record.status, Some(MediaStatus::Finished));
        assert!(record.studios.is_empty());
        assert_eq!(record.cover_image.best(), Some("https://img/large.jpg"));
        assert_eq!(record.start_date.month, Some(4));
        assert_eq!(record.end_date, FuzzyDate::default());
    }

    #[test]
    fn unknown_status_survives_a_round_trip() {
        let status: MediaStatus = serde_json::from_value(json!("HIATUS")).unwrap();
        assert_eq!(status, MediaStatus::Other("HIATUS".to_string()));
        assert_eq!(serde_json::to_value(&status).unwrap(), json!("HIATUS"));
    }

    #[test]
    fn missing_romaji_becomes_empty() {
        let title: AnimeTitle = serde_json::from_value(json!({ "romaji": null })).unwrap();
        assert_eq!(title.romaji, "");
        assert_eq!(title.english, None);
    }
}
