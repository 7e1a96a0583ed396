//! Page arithmetic for feeds.
//!
//! Page numbers are 1-indexed. Out-of-range requests are clamped rather than
//! rejected: anything below 1 (or unparseable) becomes page 1, anything past
//! the end becomes the last page.

use serde::Serialize;

/// Resolved position of one page within a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_size: i64,
    total_count: i64,
}

impl Paginator {
    /// `page_size` below 1 is treated as 1.
    #[must_use]
    pub fn new(page_size: usize, total_count: i64) -> Self {
        Self {
            page_size: (page_size as i64).max(1),
            total_count: total_count.max(0),
        }
    }

    /// Number of pages; an empty collection still has one (empty) page.
    #[must_use]
    pub fn num_pages(&self) -> i64 {
        if self.total_count == 0 {
            1
        } else {
            (self.total_count + self.page_size - 1) / self.page_size
        }
    }

    /// Clamp a requested page number into `1..=num_pages`.
    #[must_use]
    pub fn clamp(&self, requested: i64) -> i64 {
        requested.clamp(1, self.num_pages())
    }

    /// SQL `(limit, offset)` for an already clamped page number.
    #[must_use]
    pub fn limit_offset(&self, page: i64) -> (i64, i64) {
        (self.page_size, (page - 1) * self.page_size)
    }

    #[must_use]
    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    #[must_use]
    pub fn total_count(&self) -> i64 {
        self.total_count
    }
}

/// Parse a `?page=` value the lenient way: missing or garbage means page 1.
#[must_use]
pub fn parse_page_number(raw: Option<&str>) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok()).unwrap_or(1)
}

/// One page of a feed plus what navigation controls need.
#[derive(Debug, Clone, Serialize)]
pub struct FeedPage<T> {
    pub items: Vec<T>,
    /// 1-indexed page number actually served.
    pub number: i64,
    pub num_pages: i64,
    pub total_count: i64,
    pub page_size: i64,
}

impl<T> FeedPage<T> {
    #[must_use]
    pub fn new(items: Vec<T>, paginator: &Paginator, number: i64) -> Self {
        Self {
            items,
            number,
            num_pages: paginator.num_pages(),
            total_count: paginator.total_count(),
            page_size: paginator.page_size(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_pages() {
        assert_eq!(Paginator::new(10, 0).num_pages(), 1);
        assert_eq!(Paginator::new(10, 1).num_pages(), 1);
        assert_eq!(Paginator::new(10, 10).num_pages(), 1);
        assert_eq!(Paginator::new(10, 15).num_pages(), 2);
        assert_eq!(Paginator::new(10, 21).num_pages(), 3);
    }

    #[test]
    fn test_clamp() {
        let p = Paginator::new(10, 15);
        assert_eq!(p.clamp(-3), 1);
        assert_eq!(p.clamp(0), 1);
        assert_eq!(p.clamp(1), 1);
        assert_eq!(p.clamp(2), 2);
        assert_eq!(p.clamp(3), 2);
        assert_eq!(p.clamp(i64::MAX), 2);
    }

    #[test]
    fn test_clamp_empty_collection() {
        let p = Paginator::new(10, 0);
        assert_eq!(p.clamp(5), 1);
        assert_eq!(p.limit_offset(1), (10, 0));
    }

    #[test]
    fn test_limit_offset() {
        let p = Paginator::new(10, 15);
        assert_eq!(p.limit_offset(1), (10, 0));
        assert_eq!(p.limit_offset(2), (10, 10));
    }

    #[test]
    fn test_zero_page_size_treated_as_one() {
        let p = Paginator::new(0, 3);
        assert_eq!(p.page_size(), 1);
        assert_eq!(p.num_pages(), 3);
    }

    #[test]
    fn test_parse_page_number() {
        assert_eq!(parse_page_number(None), 1);
        assert_eq!(parse_page_number(Some("")), 1);
        assert_eq!(parse_page_number(Some("abc")), 1);
        assert_eq!(parse_page_number(Some("3")), 3);
        assert_eq!(parse_page_number(Some(" 2 ")), 2);
        assert_eq!(parse_page_number(Some("-1")), -1);
    }

    #[test]
    fn test_feed_page_navigation() {
        let p = Paginator::new(10, 25);
        let first: FeedPage<i32> = FeedPage::new(vec![1; 10], &p, 1);
        assert!(!first.has_previous());
        assert!(first.has_next());

        let last: FeedPage<i32> = FeedPage::new(vec![1; 5], &p, 3);
        assert!(last.has_previous());
        assert!(!last.has_next());
        assert_eq!(last.len(), 5);
        assert_eq!(last.total_count, 25);
    }
}
