use std::collections::HashSet;

use crate::models::AnimeRecord;

/// Concatenates the collections in order and keeps the first record seen for
/// each id. Later duplicates are dropped whole; output keeps first-seen order.
pub fn merge<'a, I>(collections: I) -> Vec<&'a AnimeRecord>
where
    I: IntoIterator<Item = &'a [AnimeRecord]>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for record in collections.into_iter().flatten() {
        if seen.insert(record.id) {
            out.push(record);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_support::record;

    #[test]
    fn keeps_first_instance_of_each_id() {
        let mut a_dup = record(2, "From A");
        a_dup.popularity = Some(10);
        let a = vec![record(1, "One"), a_dup.clone()];
        let mut b_dup = record(2, "From B");
        b_dup.popularity = Some(99);
        let b = vec![b_dup, record(3, "Three")];
        let c = vec![record(3, "Three again"), record(1, "One again"), record(4, "Four")];

        let merged = merge([a.as_slice(), b.as_slice(), c.as_slice()]);
        let ids: Vec<i32> = merged.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(merged[1], &a_dup);
        assert_eq!(merged[2].title.romaji, "Three");
    }

    #[test]
    fn empty_collections_contribute_nothing() {
        let a: Vec<AnimeRecord> = Vec::new();
        let b = vec![record(7, "Seven")];
        let merged = merge([a.as_slice(), b.as_slice(), a.as_slice()]);
        assert_eq!(merged.len(), 1);
        assert!(merge(std::iter::empty::<&[AnimeRecord]>()).is_empty());
    }

    #[test]
    fn duplicates_inside_one_collection_are_dropped() {
        let a = vec![record(5, "First"), record(5, "Second")];
        let merged = merge([a.as_slice()]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].title.romaji, "First");
    }
}
