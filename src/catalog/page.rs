use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: usize = 24;
const WINDOW_SIZE: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub total_pages: usize,
}

pub fn total_pages(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    len.div_ceil(page_size)
}

/// Clamps a requested 1-indexed page into `[1, total_pages]`.
/// An empty listing still reports page 1.
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Slices out one 1-indexed page. `page` must already be clamped; anything
/// past the end yields an empty slice rather than panicking.
pub fn paginate<T>(records: &[T], page_size: usize, page: usize) -> Page<'_, T> {
    let total_pages = total_pages(records.len(), page_size);
    let start = page.saturating_sub(1).saturating_mul(page_size).min(records.len());
    let end = start.saturating_add(page_size).min(records.len());
    Page {
        items: &records[start..end],
        total_pages,
    }
}

/// The numbered buttons a pager shows around the current page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub current: usize,
    pub total_pages: usize,
    pub pages: Vec<usize>,
    pub previous: Option<usize>,
    pub next: Option<usize>,
    /// The window does not start at 1, so a separate "1" button is shown.
    pub show_first: bool,
    pub leading_ellipsis: bool,
    /// The window does not reach the last page, so a separate button is shown.
    pub show_last: bool,
    pub trailing_ellipsis: bool,
}

/// Up to five contiguous page numbers centred on `current`. Near either end
/// the window is shifted instead of shrunk; with fewer than five pages every
/// page is listed.
pub fn page_window(current: usize, total_pages: usize) -> PageWindow {
    if total_pages == 0 {
        return PageWindow {
            current: 1,
            total_pages,
            pages: Vec::new(),
            previous: None,
            next: None,
            show_first: false,
            leading_ellipsis: false,
            show_last: false,
            trailing_ellipsis: false,
        };
    }

    let current = clamp_page(current, total_pages);
    let mut start = current.saturating_sub(WINDOW_SIZE / 2).max(1);
    let end = (start + WINDOW_SIZE - 1).min(total_pages);
    if end + 1 - start < WINDOW_SIZE {
        start = (end + 1).saturating_sub(WINDOW_SIZE).max(1);
    }

    PageWindow {
        current,
        total_pages,
        pages: (start..=end).collect(),
        previous: (current > 1).then(|| current - 1),
        next: (current < total_pages).then(|| current + 1),
        show_first: start > 1,
        leading_ellipsis: start > 2,
        show_last: end < total_pages,
        trailing_ellipsis: end + 1 < total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifty_items_split_into_three_pages() {
        let items: Vec<u32> = (0..50).collect();
        let first = paginate(&items, 24, 1);
        assert_eq!(first.items.len(), 24);
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.items[0], 0);

        let second = paginate(&items, 24, 2);
        assert_eq!(second.items.first(), Some(&24));

        let last = paginate(&items, 24, 3);
        assert_eq!(last.items, &[48, 49]);
        assert_eq!(last.total_pages, 3);
    }

    #[test]
    fn empty_listing_has_zero_pages() {
        let items: Vec<u32> = Vec::new();
        let page = paginate(&items, 24, 1);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);
        assert_eq!(clamp_page(7, 0), 1);
    }

    #[test]
    fn exact_multiple_does_not_add_a_page() {
        assert_eq!(total_pages(48, 24), 2);
        assert_eq!(total_pages(1, 24), 1);
    }

    #[test]
    fn clamps_out_of_range_pages() {
        assert_eq!(clamp_page(0, 3), 1);
        assert_eq!(clamp_page(9, 3), 3);
        assert_eq!(clamp_page(2, 3), 2);
    }

    #[test]
    fn window_is_centred_in_the_middle() {
        let w = page_window(6, 10);
        assert_eq!(w.pages, vec![4, 5, 6, 7, 8]);
        assert!(w.show_first && w.leading_ellipsis);
        assert!(w.show_last && w.trailing_ellipsis);
        assert_eq!((w.previous, w.next), (Some(5), Some(7)));
    }

    #[test]
    fn window_shifts_at_the_edges() {
        assert_eq!(page_window(1, 10).pages, vec![1, 2, 3, 4, 5]);
        assert_eq!(page_window(2, 10).pages, vec![1, 2, 3, 4, 5]);
        assert_eq!(page_window(10, 10).pages, vec![6, 7, 8, 9, 10]);
        assert_eq!(page_window(9, 10).pages, vec![6, 7, 8, 9, 10]);

        let w = page_window(10, 10);
        assert!(w.show_first);
        assert!(!w.show_last);
        assert_eq!(w.next, None);
    }

    #[test]
    fn short_listings_show_every_page() {
        let w = page_window(2, 3);
        assert_eq!(w.pages, vec![1, 2, 3]);
        assert!(!w.show_first && !w.show_last);
        assert!(!w.leading_ellipsis && !w.trailing_ellipsis);
    }

    #[test]
    fn ellipsis_only_when_pages_are_skipped() {
        let w = page_window(4, 6);
        assert_eq!(w.pages, vec![2, 3, 4, 5, 6]);
        assert!(w.show_first);
        assert!(!w.leading_ellipsis);
    }
}
