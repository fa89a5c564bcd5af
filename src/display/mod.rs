//! Locale-dependent display strings and the view models built from them.
//!
//! Every fallback for a missing field lives here, so callers never check
//! optional record fields themselves.

use serde::Serialize;

use crate::catalog::episode_count;
use crate::i18n::{format_template, Locale};
use crate::models::{AnimeRecord, AnimeTitle, FuzzyDate, MediaStatus};

mod text;

pub use text::{group_thousands, sanitize_description, strip_tags};

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub fn select_title(title: &AnimeTitle, locale: Locale) -> &str {
    match (locale, title.native.as_deref(), title.english.as_deref()) {
        (Locale::Ja, Some(native), _) => native,
        (_, _, Some(english)) => english,
        _ => &title.romaji,
    }
}

/// The native title shown under the main heading, except in Japanese where
/// it already is the heading.
pub fn secondary_title(title: &AnimeTitle, locale: Locale) -> Option<&str> {
    match locale {
        Locale::Ja => None,
        _ => title.native.as_deref(),
    }
}

fn month_abbrev(month: u32) -> Option<&'static str> {
    let idx = usize::try_from(month).ok()?.checked_sub(1)?;
    MONTHS.get(idx).copied()
}

/// Full first-air date: `Apr 7, 2013` in English, `2013年4月7日` otherwise.
/// Missing month/day parts are left out; no year at all is "no data".
pub fn format_start_date(date: &FuzzyDate, locale: Locale) -> String {
    let Some(year) = date.year else {
        return locale.strings().no_data.to_string();
    };
    match locale {
        Locale::En => match (date.month.and_then(month_abbrev), date.day) {
            (Some(month), Some(day)) => format!("{} {}, {}", month, day, year),
            (Some(month), None) => format!("{} {}", month, year),
            _ => year.to_string(),
        },
        Locale::Zh | Locale::Ja => {
            let mut out = format!("{}年", year);
            if let Some(month) = date.month {
                out.push_str(&format!("{}月", month));
            }
            if let Some(day) = date.day {
                out.push_str(&format!("{}日", day));
            }
            out
        }
    }
}

/// Short date for listing cards: `2013-4` in English, `2013年4月` otherwise.
pub fn format_card_date(date: &FuzzyDate, locale: Locale) -> String {
    let Some(year) = date.year else {
        return locale.strings().no_data.to_string();
    };
    match (locale, date.month) {
        (Locale::En, Some(month)) => format!("{}-{}", year, month),
        (Locale::En, None) => year.to_string(),
        (_, Some(month)) => format!("{}年{}月", year, month),
        (_, None) => format!("{}年", year),
    }
}

pub fn status_text(status: Option<&MediaStatus>, locale: Locale) -> &'static str {
    let strings = &locale.strings().status;
    match status {
        Some(MediaStatus::Releasing) => strings.releasing,
        Some(MediaStatus::Finished) => strings.finished,
        Some(MediaStatus::NotYetReleased) => strings.not_yet_released,
        Some(MediaStatus::Other(_)) | None => strings.unknown,
    }
}

/// `85` -> `8.5`. A zero or missing score has nothing to show.
pub fn score_value(average_score: Option<i32>) -> Option<String> {
    average_score
        .filter(|&s| s > 0)
        .map(|s| (f64::from(s) / 10.0).to_string())
}

pub fn format_score(average_score: Option<i32>, locale: Locale) -> String {
    match score_value(average_score) {
        Some(score) => format!("{} / 10", score),
        None => locale.strings().no_data.to_string(),
    }
}

pub fn format_popularity(popularity: Option<i32>, locale: Locale) -> String {
    match popularity {
        Some(p) => group_thousands(i64::from(p)),
        None => locale.strings().no_data.to_string(),
    }
}

pub fn format_episodes(episodes: Option<i32>, locale: Locale) -> String {
    let strings = locale.strings();
    match episodes.filter(|&n| n > 0) {
        Some(n) => format!("{} {}", n, strings.episodes),
        None => strings.no_data.to_string(),
    }
}

pub fn description_text(record: &AnimeRecord, locale: Locale) -> String {
    sanitize_description(record.description.as_deref())
        .unwrap_or_else(|| locale.strings().no_data.to_string())
}

pub fn episode_label(episode: i32, locale: Locale) -> String {
    format_template(locale.strings().episode, "number", episode)
}

#[derive(Debug, Clone, Serialize)]
pub struct AnimeCard {
    pub id: i32,
    pub title: String,
    pub cover_image: Option<String>,
    pub score: Option<String>,
    pub status: &'static str,
    pub date: String,
    pub episodes: String,
    pub description: String,
}

impl AnimeCard {
    pub fn new(record: &AnimeRecord, locale: Locale) -> Self {
        Self {
            id: record.id,
            title: select_title(&record.title, locale).to_string(),
            cover_image: record.cover_image.best().map(str::to_string),
            score: score_value(record.average_score),
            status: status_text(record.status.as_ref(), locale),
            date: format_card_date(&record.start_date, locale),
            episodes: format_episodes(record.episodes, locale),
            description: description_text(record, locale),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EpisodeLink {
    pub number: i32,
    pub label: String,
    pub current: bool,
}

fn episode_links(count: i32, current: i32, locale: Locale) -> Vec<EpisodeLink> {
    (1..=count)
        .map(|number| EpisodeLink {
            number,
            label: episode_label(number, locale),
            current: number == current,
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct AnimeDetail {
    pub id: i32,
    pub title: String,
    pub native_title: Option<String>,
    pub cover_image: Option<String>,
    pub banner_image: Option<String>,
    pub genres: Vec<String>,
    pub status: &'static str,
    pub first_air_date: String,
    pub score: String,
    pub popularity: String,
    pub description: String,
    pub studios: Vec<String>,
    pub episodes: Vec<EpisodeLink>,
}

impl AnimeDetail {
    pub fn new(record: &AnimeRecord, locale: Locale) -> Self {
        Self {
            id: record.id,
            title: select_title(&record.title, locale).to_string(),
            native_title: secondary_title(&record.title, locale).map(str::to_string),
            cover_image: record.cover_image.best().map(str::to_string),
            banner_image: record.banner_image.clone(),
            genres: record.genres.clone(),
            status: status_text(record.status.as_ref(), locale),
            first_air_date: format_start_date(&record.start_date, locale),
            score: format_score(record.average_score, locale),
            popularity: format_popularity(record.popularity, locale),
            description: description_text(record, locale),
            studios: record.studios.clone(),
            episodes: episode_links(episode_count(record), 1, locale),
        }
    }
}

/// The placeholder player page for one episode.
#[derive(Debug, Clone, Serialize)]
pub struct WatchView {
    pub id: i32,
    pub title: String,
    pub heading: String,
    pub episode: i32,
    pub previous: Option<i32>,
    pub next: Option<i32>,
    pub banner_image: Option<String>,
    pub placeholder: &'static str,
    pub placeholder_desc: &'static str,
    pub episodes: Vec<EpisodeLink>,
}

impl WatchView {
    pub fn new(record: &AnimeRecord, episode: i32, locale: Locale) -> Self {
        let strings = locale.strings();
        let count = episode_count(record);
        let title = select_title(&record.title, locale).to_string();
        Self {
            id: record.id,
            heading: format!("{} - {}", title, episode_label(episode, locale)),
            title,
            episode,
            previous: (episode > 1).then(|| episode - 1),
            next: (episode < count).then(|| episode + 1),
            banner_image: record.banner_image.clone(),
            placeholder: strings.video_placeholder,
            placeholder_desc: strings.video_placeholder_desc,
            episodes: episode_links(count, episode, locale),
        }
    }
}
