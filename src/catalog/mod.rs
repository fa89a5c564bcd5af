//! The in-memory catalog built from one snapshot.
//!
//! Everything here is synchronous and read-only: the snapshot is loaded once,
//! reconciled into a unified view, and every request only filters, sorts or
//! slices references into it.

use serde::Serialize;
use std::collections::HashMap;

use crate::models::AnimeRecord;
use crate::snapshot::Snapshot;

mod merge;
mod page;
mod query;

pub use merge::merge;
pub use page::{
    clamp_page, page_window, paginate, total_pages, Page, PageWindow, DEFAULT_PAGE_SIZE,
};
pub use query::{search, sort_by_popularity_desc, sort_by_time_until_airing};

/// Episodes assumed when AniList doesn't know the count yet.
pub const DEFAULT_EPISODE_COUNT: i32 = 12;
/// How many items each home-page row shows.
pub const HOME_SECTION_LEN: usize = 20;
/// Watch pages pre-generated per title.
const STATIC_WATCH_EPISODES: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Latest,
    Popular,
    NewReleases,
}

impl Collection {
    pub const ALL: [Collection; 3] = [
        Collection::Latest,
        Collection::Popular,
        Collection::NewReleases,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Latest => "latest",
            Collection::Popular => "popular",
            Collection::NewReleases => "newReleases",
        }
    }
}

#[derive(Debug)]
pub struct Catalog {
    snapshot: Snapshot,
    unified: Vec<AnimeRecord>,
    by_id: HashMap<i32, usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaticParams {
    pub anime: Vec<i32>,
    pub watch: Vec<(i32, i32)>,
}

impl Catalog {
    pub fn new(snapshot: Snapshot) -> Self {
        let unified: Vec<AnimeRecord> = merge(Collection::ALL.map(|c| snapshot.collection(c)))
            .into_iter()
            .cloned()
            .collect();
        let by_id = unified
            .iter()
            .enumerate()
            .map(|(idx, record)| (record.id, idx))
            .collect();
        Self {
            snapshot,
            unified,
            by_id,
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Every distinct title, in first-seen order across latest, popular and
    /// new releases.
    pub fn unified(&self) -> &[AnimeRecord] {
        &self.unified
    }

    pub fn get(&self, id: i32) -> Option<&AnimeRecord> {
        self.by_id.get(&id).map(|&idx| &self.unified[idx])
    }

    pub fn search(&self, query: &str) -> Vec<&AnimeRecord> {
        search(&self.unified, query)
    }

    /// The "latest" listing, re-ordered by popularity.
    pub fn latest(&self) -> Vec<&AnimeRecord> {
        sort_by_popularity_desc(self.snapshot.latest.iter().collect())
    }

    pub fn popular(&self) -> Vec<&AnimeRecord> {
        self.snapshot.popular.iter().collect()
    }

    /// New releases, soonest next episode first.
    pub fn weekly(&self) -> Vec<&AnimeRecord> {
        sort_by_time_until_airing(self.snapshot.new_releases.iter().collect())
    }

    pub fn home_section(&self, collection: Collection) -> &[AnimeRecord] {
        let records = self.snapshot.collection(collection);
        &records[..records.len().min(HOME_SECTION_LEN)]
    }

    pub fn static_params(&self) -> StaticParams {
        let anime = self.unified.iter().map(|r| r.id).collect();
        let watch = self
            .unified
            .iter()
            .flat_map(|r| {
                let upto = episode_count(r).min(STATIC_WATCH_EPISODES);
                (1..=upto).map(move |ep| (r.id, ep))
            })
            .collect();
        StaticParams { anime, watch }
    }
}

pub fn episode_count(record: &AnimeRecord) -> i32 {
    record
        .episodes
        .filter(|&n| n > 0)
        .unwrap_or(DEFAULT_EPISODE_COUNT)
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::models::{AnimeRecord, AnimeTitle, CoverImage, FuzzyDate, NextAiringEpisode};

    pub(crate) fn titled(
        id: i32,
        romaji: &str,
        english: Option<&str>,
        native: Option<&str>,
    ) -> AnimeRecord {
        AnimeRecord {
            id,
            title: AnimeTitle {
                romaji: romaji.to_string(),
                english: english.map(str::to_string),
                native: native.map(str::to_string),
            },
            description: None,
            cover_image: CoverImage::default(),
            banner_image: None,
            genres: Vec::new(),
            episodes: None,
            status: None,
            season: None,
            season_year: None,
            format: None,
            average_score: None,
            popularity: None,
            studios: Vec::new(),
            start_date: FuzzyDate::default(),
            end_date: FuzzyDate::default(),
            next_airing_episode: None,
        }
    }

    pub(crate) fn record(id: i32, romaji: &str) -> AnimeRecord {
        titled(id, romaji, None, None)
    }

    pub(crate) fn airing(id: i32, time_until_airing: i64) -> AnimeRecord {
        let mut r = record(id, &format!("Airing {}", id));
        r.next_airing_episode = Some(NextAiringEpisode {
            airing_at: 1_700_000_000 + time_until_airing,
            time_until_airing,
            episode: 2,
        });
        r
    }
}
