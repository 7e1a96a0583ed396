//! Pagination component for navigating through multi-page feeds.
//!
//! Renders first, previous, nearby page numbers, next and last links.
//! Page numbers are 1-indexed, matching the `?page=` query parameter.

use maud::{html, Markup, Render};

use crate::feed::FeedPage;

/// Pagination controls for a feed.
///
/// Displays: Previous, 1, ..., current-2 ..= current+2, ..., last, Next.
/// Automatically hides if there's only 1 page.
#[derive(Debug, Clone)]
pub struct Pagination {
    /// Current page number (1-indexed)
    pub current_page: i64,
    /// Total number of pages
    pub total_pages: i64,
    /// Base URL for page links (the `page` query param will be appended)
    pub base_url: String,
}

impl Pagination {
    #[must_use]
    pub fn new(current_page: i64, total_pages: i64, base_url: &str) -> Self {
        Self {
            current_page,
            total_pages,
            base_url: base_url.to_string(),
        }
    }

    /// Controls for a composed feed page.
    #[must_use]
    pub fn for_page<T>(page: &FeedPage<T>, base_url: &str) -> Self {
        Self::new(page.number, page.num_pages, base_url)
    }

    /// Build URL for a specific page number. Page 1 links to the bare URL.
    fn build_url(&self, page_num: i64) -> String {
        if page_num <= 1 {
            self.base_url.clone()
        } else {
            format!("{}?page={page_num}", self.base_url)
        }
    }

    /// Check if pagination should be displayed.
    #[must_use]
    pub fn should_display(&self) -> bool {
        self.total_pages > 1
    }
}

impl Render for Pagination {
    fn render(&self) -> Markup {
        if !self.should_display() {
            return html! {};
        }

        let current = self.current_page;
        let total = self.total_pages;

        let start = (current - 2).max(1);
        let end = (current + 2).min(total);

        html! {
            nav class="pagination" {
                @if current > 1 {
                    a href=(self.build_url(current - 1)) { "\u{00ab} Previous" }
                } @else {
                    span class="disabled" { "\u{00ab} Previous" }
                }

                @if start > 1 {
                    a href=(self.build_url(1)) { "1" }
                    @if start > 2 {
                        span { "..." }
                    }
                }

                @for page_num in start..=end {
                    @if page_num == current {
                        span class="current" { (page_num) }
                    } @else {
                        a href=(self.build_url(page_num)) { (page_num) }
                    }
                }

                @if end < total {
                    @if end < total - 1 {
                        span { "..." }
                    }
                    a href=(self.build_url(total)) { (total) }
                }

                @if current < total {
                    a href=(self.build_url(current + 1)) { "Next \u{00bb}" }
                } @else {
                    span class="disabled" { "Next \u{00bb}" }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_first_page_has_no_param() {
        let pagination = Pagination::new(1, 10, "/group/cats/");
        assert_eq!(pagination.build_url(1), "/group/cats/");
    }

    #[test]
    fn test_build_url_with_page() {
        let pagination = Pagination::new(1, 10, "/");
        assert_eq!(pagination.build_url(5), "/?page=5");
    }

    #[test]
    fn test_should_display() {
        assert!(!Pagination::new(1, 1, "/").should_display());
        assert!(Pagination::new(1, 2, "/").should_display());
    }

    #[test]
    fn test_render_single_page_empty() {
        let html = Pagination::new(1, 1, "/").render().into_string();
        assert!(html.is_empty());
    }

    #[test]
    fn test_render_first_page() {
        let html = Pagination::new(1, 10, "/").render().into_string();

        assert!(html.contains("class=\"disabled\""));
        assert!(html.contains(r#"<span class="current">1</span>"#));
        assert!(html.contains(r#"href="/?page=2""#));
        assert!(html.contains(">10<"));
    }

    #[test]
    fn test_render_middle_page() {
        let html = Pagination::new(6, 10, "/").render().into_string();

        assert!(html.contains(">1<"));
        assert!(html.contains("..."));
        for n in 4..=8 {
            assert!(html.contains(&format!(">{n}<")), "missing page {n}");
        }
        assert!(html.contains(">10<"));
    }

    #[test]
    fn test_render_last_page() {
        let html = Pagination::new(10, 10, "/").render().into_string();

        assert!(html.contains(r#"href="/?page=9""#));
        assert!(html.contains(r#"<span class="disabled">Next"#));
    }
}
