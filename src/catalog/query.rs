use crate::models::AnimeRecord;

/// Case-insensitive substring filter over the romaji, English and native
/// titles. A blank query matches nothing. Input order is kept.
pub fn search<'a, I>(records: I, query: &str) -> Vec<&'a AnimeRecord>
where
    I: IntoIterator<Item = &'a AnimeRecord>,
{
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    records
        .into_iter()
        .filter(|record| title_matches(record, &needle))
        .collect()
}

fn title_matches(record: &AnimeRecord, needle: &str) -> bool {
    let title = &record.title;
    std::iter::once(Some(title.romaji.as_str()))
        .chain([title.english.as_deref(), title.native.as_deref()])
        .flatten()
        .any(|candidate| candidate.to_lowercase().contains(needle))
}

/// Stable sort, highest popularity first. Missing popularity sorts as 0.
pub fn sort_by_popularity_desc(mut records: Vec<&AnimeRecord>) -> Vec<&AnimeRecord> {
    records.sort_by_key(|r| std::cmp::Reverse(r.popularity.unwrap_or(0)));
    records
}

/// Orders airing titles by seconds until their next episode, soonest first.
///
/// Only pairs where both records have a next episode are ever compared, so a
/// record without one never moves and splits the list into runs; each run is
/// sorted on its own and keeps ties in input order.
pub fn sort_by_time_until_airing(mut records: Vec<&AnimeRecord>) -> Vec<&AnimeRecord> {
    let mut start = 0;
    while start < records.len() {
        if records[start].next_airing_episode.is_none() {
            start += 1;
            continue;
        }
        let end = records[start..]
            .iter()
            .position(|r| r.next_airing_episode.is_none())
            .map_or(records.len(), |offset| start + offset);
        records[start..end].sort_by_key(|r| {
            r.next_airing_episode
                .map(|next| next.time_until_airing)
                .unwrap_or(i64::MAX)
        });
        start = end;
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_support::{airing, record, titled};
    use crate::models::AnimeRecord;

    fn ids(records: &[&AnimeRecord]) -> Vec<i32> {
        records.iter().map(|r| r.id).collect()
    }

    fn sample() -> Vec<AnimeRecord> {
        vec![
            titled(1, "Naruto", Some("Naruto"), Some("ナルト")),
            titled(2, "Shingeki no Kyojin", Some("Attack on Titan"), Some("進撃の巨人")),
            titled(3, "Naruto: Shippuuden", None, None),
            titled(4, "Boruto", Some("Boruto: Naruto Next Generations"), None),
        ]
    }

    #[test]
    fn blank_query_returns_nothing() {
        let records = sample();
        assert!(search(&records, "").is_empty());
        assert!(search(&records, "   \t").is_empty());
    }

    #[test]
    fn search_is_case_insensitive_and_keeps_order() {
        let records = sample();
        let upper = search(&records, "Naruto");
        let lower = search(&records, "naruto");
        assert_eq!(ids(&upper), vec![1, 3, 4]);
        assert_eq!(ids(&upper), ids(&lower));
    }

    #[test]
    fn search_matches_english_and_native_titles() {
        let records = sample();
        assert_eq!(ids(&search(&records, "titan")), vec![2]);
        assert_eq!(ids(&search(&records, "巨人")), vec![2]);
        assert_eq!(ids(&search(&records, "  kyojin ")), vec![2]);
        assert!(search(&records, "bleach").is_empty());
    }

    #[test]
    fn popularity_sort_is_stable_and_idempotent() {
        let mut a = record(1, "A");
        a.popularity = Some(50);
        let mut b = record(2, "B");
        b.popularity = Some(100);
        let mut c = record(3, "C");
        c.popularity = Some(50);
        let d = record(4, "D");
        let records = vec![a, b, c, d];

        let once = sort_by_popularity_desc(records.iter().collect());
        assert_eq!(ids(&once), vec![2, 1, 3, 4]);
        let twice = sort_by_popularity_desc(once.clone());
        assert_eq!(ids(&twice), ids(&once));
    }

    #[test]
    fn airing_sort_orders_known_countdowns() {
        let records = vec![airing(1, 3600), airing(2, -60), airing(3, 60), airing(4, 60)];
        let sorted = sort_by_time_until_airing(records.iter().collect());
        assert_eq!(ids(&sorted), vec![2, 3, 4, 1]);
    }

    #[test]
    fn records_without_next_episode_stay_in_place() {
        let records = vec![
            airing(1, 500),
            airing(2, 100),
            record(3, "finished"),
            airing(4, 900),
            airing(5, 10),
            record(6, "also finished"),
        ];
        let sorted = sort_by_time_until_airing(records.iter().collect());
        assert_eq!(ids(&sorted), vec![2, 1, 3, 5, 4, 6]);
    }
}
