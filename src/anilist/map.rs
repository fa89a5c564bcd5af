use std::collections::HashSet;

use super::client::{Media, MediaDate, MediaTitle};
use crate::models::{AnimeRecord, AnimeTitle, CoverImage, FuzzyDate, NextAiringEpisode};

pub(crate) fn media_to_record(media: Media) -> AnimeRecord {
    let studios = media
        .studios
        .and_then(|s| s.nodes)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|n| n.name)
        .filter(|name| !name.trim().is_empty())
        .collect::<Vec<_>>();

    AnimeRecord {
        id: media.id,
        title: map_title(media.title.unwrap_or_default()),
        description: media.description.filter(|d| !d.trim().is_empty()),
        cover_image: media
            .cover_image
            .map(|c| CoverImage {
                large: c.large,
                medium: c.medium,
            })
            .unwrap_or_default(),
        banner_image: media.banner_image,
        genres: media.genres.unwrap_or_default(),
        episodes: media.episodes.filter(|&n| n > 0),
        status: media.status.map(Into::into),
        season: media.season,
        season_year: media.season_year,
        format: media.format,
        average_score: media.average_score,
        popularity: media.popularity,
        studios: dedupe_preserve_order(studios),
        start_date: media.start_date.map(map_date).unwrap_or_default(),
        end_date: media.end_date.map(map_date).unwrap_or_default(),
        next_airing_episode: media.next_airing_episode.map(|n| NextAiringEpisode {
            airing_at: n.airing_at,
            time_until_airing: n.time_until_airing,
            episode: n.episode,
        }),
    }
}

fn map_title(title: MediaTitle) -> AnimeTitle {
    let non_empty = |s: Option<String>| {
        s.map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };
    let english = non_empty(title.english);
    let native = non_empty(title.native);
    // romaji is the display fallback, so fill it from the other variants
    // when AniList has none.
    let romaji = non_empty(title.romaji)
        .or_else(|| english.clone())
        .or_else(|| native.clone())
        .unwrap_or_default();
    AnimeTitle {
        romaji,
        english,
        native,
    }
}

fn map_date(date: MediaDate) -> FuzzyDate {
    FuzzyDate {
        year: date.year,
        month: date.month.filter(|m| (1..=12).contains(m)),
        day: date.day.filter(|d| (1..=31).contains(d)),
    }
}

fn dedupe_preserve_order(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        if seen.insert(item.clone()) {
            out.push(item);
        }
    }
    out
}
