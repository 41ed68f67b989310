/// Sorting, pagination and the view state that ties the pipeline together.
///
/// `ViewState::apply` runs author match → criteria filter → sort → paginate
/// over a borrowed snapshot without touching it.
use serde::Serialize;

use crate::comment::Comment;
use crate::config::DEFAULT_PAGE_SIZE;
use crate::filter::{filter_comments, match_author, FilterCriteria};

/// Pages shown at once by the pager before it starts sliding.
const PAGER_WIDTH: usize = 7;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest" | "desc" => Ok(SortOrder::Newest),
            "oldest" | "asc" => Ok(SortOrder::Oldest),
            other => Err(format!("expected newest or oldest, got '{}'", other)),
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOrder::Newest => write!(f, "Newest First"),
            SortOrder::Oldest => write!(f, "Oldest First"),
        }
    }
}

/// Orders top-level comments by publish time.
///
/// The sort is stable, so comments with identical timestamps keep their input
/// order. Replies are left in the order they were received.
pub fn sort_comments(comments: &[Comment], order: SortOrder) -> Vec<Comment> {
    let mut sorted = comments.to_vec();
    match order {
        SortOrder::Newest => sorted.sort_by(|a, b| b.published_at.cmp(&a.published_at)),
        SortOrder::Oldest => sorted.sort_by(|a, b| a.published_at.cmp(&b.published_at)),
    }
    sorted
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub items: Vec<Comment>,
    /// One-indexed page number that was requested
    pub number: usize,
    pub page_count: usize,
    /// Number of comments across all pages
    pub total_items: usize,
}

/// Slices out page `page_number` (one-indexed).
///
/// A page outside `1..=page_count` is empty rather than an error.
pub fn paginate(comments: &[Comment], page_size: usize, page_number: usize) -> Page {
    let total_items = comments.len();
    if page_size == 0 {
        return Page {
            items: Vec::new(),
            number: page_number,
            page_count: 0,
            total_items,
        };
    }

    let page_count = total_items.div_ceil(page_size);
    let items = if page_number == 0 {
        Vec::new()
    } else {
        let start = (page_number - 1).saturating_mul(page_size);
        let end = start.saturating_add(page_size).min(total_items);
        comments.get(start..end).map(<[Comment]>::to_vec).unwrap_or_default()
    };

    Page {
        items,
        number: page_number,
        page_count,
        total_items,
    }
}

/// Page numbers the pager displays around the current page.
///
/// All pages when there are at most seven; otherwise a five-page window
/// pinned to the start or end, or centered on the current page.
pub fn page_window(current: usize, total: usize) -> Vec<usize> {
    if total <= PAGER_WIDTH {
        return (1..=total).collect();
    }

    let (start, end) = if current <= 4 {
        (1, 5)
    } else if current + 3 >= total {
        (total - 4, total)
    } else {
        (current - 2, current + 2)
    };

    (start..=end).collect()
}

/// User-selected view parameters.
///
/// Changing the author filter, the criteria or the order resets the page to 1.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    author_filter: String,
    criteria: FilterCriteria,
    order: SortOrder,
    page: usize,
    page_size: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl ViewState {
    pub fn new(page_size: usize) -> Self {
        Self {
            author_filter: String::new(),
            criteria: FilterCriteria::default(),
            order: SortOrder::default(),
            page: 1,
            page_size,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn author_filter(&self) -> &str {
        &self.author_filter
    }

    pub fn set_author_filter(&mut self, needle: impl Into<String>) {
        self.author_filter = needle.into();
        self.page = 1;
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.page = 1;
    }

    pub fn set_order(&mut self, order: SortOrder) {
        self.order = order;
        self.page = 1;
    }

    pub fn toggle_order(&mut self) {
        let next = match self.order {
            SortOrder::Newest => SortOrder::Oldest,
            SortOrder::Oldest => SortOrder::Newest,
        };
        self.set_order(next);
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    /// Filtered and sorted comments, before pagination.
    pub fn visible(&self, comments: &[Comment]) -> Vec<Comment> {
        let by_author = match_author(comments, &self.author_filter);
        let filtered = filter_comments(&by_author, &self.criteria);
        sort_comments(&filtered, self.order)
    }

    /// Runs the full pipeline and returns the current page.
    pub fn apply(&self, comments: &[Comment]) -> Page {
        paginate(&self.visible(comments), self.page_size, self.page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn comment(id: &str, day: u32) -> Comment {
        Comment {
            id: id.to_string(),
            text: format!("comment {}", id),
            author_name: format!("author-{}", id),
            author_image_url: None,
            like_count: 0,
            reply_count: 0,
            published_at: Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
            replies: vec![],
        }
    }

    fn ids(comments: &[Comment]) -> Vec<&str> {
        comments.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_sort_orders() {
        let comments = vec![comment("jan3", 3), comment("jan1", 1)];
        assert_eq!(
            ids(&sort_comments(&comments, SortOrder::Oldest)),
            vec!["jan1", "jan3"]
        );
        assert_eq!(
            ids(&sort_comments(&comments, SortOrder::Newest)),
            vec!["jan3", "jan1"]
        );
    }

    #[test]
    fn test_sort_is_stable() {
        let comments = vec![
            comment("a", 2),
            comment("b", 1),
            comment("c", 2),
            comment("d", 1),
        ];
        assert_eq!(
            ids(&sort_comments(&comments, SortOrder::Oldest)),
            vec!["b", "d", "a", "c"]
        );
        assert_eq!(
            ids(&sort_comments(&comments, SortOrder::Newest)),
            vec!["a", "c", "b", "d"]
        );
    }

    #[test]
    fn test_sort_keeps_reply_order() {
        let mut parent = comment("p", 5);
        parent.replies = vec![comment("r2", 9), comment("r1", 1)];
        let sorted = sort_comments(&[parent], SortOrder::Oldest);
        assert_eq!(ids(&sorted[0].replies), vec!["r2", "r1"]);
    }

    #[test]
    fn test_paginate_basic() {
        let comments: Vec<_> = (1..=25).map(|d| comment(&d.to_string(), d)).collect();
        let page = paginate(&comments, 10, 3);
        assert_eq!(page.page_count, 3);
        assert_eq!(page.total_items, 25);
        assert_eq!(ids(&page.items), vec!["21", "22", "23", "24", "25"]);
    }

    #[test]
    fn test_paginate_out_of_range_is_empty() {
        let comments: Vec<_> = (1..=5).map(|d| comment(&d.to_string(), d)).collect();
        assert!(paginate(&comments, 10, 2).items.is_empty());
        assert!(paginate(&comments, 10, 0).items.is_empty());
        assert!(paginate(&comments, 10, usize::MAX).items.is_empty());
        assert!(paginate(&comments, 0, 1).items.is_empty());
        assert_eq!(paginate(&[], 10, 1).page_count, 0);
    }

    #[test]
    fn test_pages_reconstruct_input() {
        let comments: Vec<_> = (1..=23).map(|d| comment(&d.to_string(), d)).collect();
        let sorted = sort_comments(&comments, SortOrder::Newest);
        let page_count = paginate(&sorted, 4, 1).page_count;
        let rebuilt: Vec<Comment> = (1..=page_count)
            .flat_map(|p| paginate(&sorted, 4, p).items)
            .collect();
        assert_eq!(rebuilt, sorted);
    }

    #[test]
    fn test_page_window() {
        assert_eq!(page_window(1, 3), vec![1, 2, 3]);
        assert_eq!(page_window(2, 20), vec![1, 2, 3, 4, 5]);
        assert_eq!(page_window(10, 20), vec![8, 9, 10, 11, 12]);
        assert_eq!(page_window(18, 20), vec![16, 17, 18, 19, 20]);
    }

    #[test]
    fn test_view_state_resets_page() {
        let mut view = ViewState::new(2);
        view.set_page(4);
        view.set_order(SortOrder::Oldest);
        assert_eq!(view.page(), 1);

        view.set_page(3);
        view.set_author_filter("bob");
        assert_eq!(view.page(), 1);

        view.set_page(2);
        view.set_criteria(FilterCriteria::default().with_tag("#cat"));
        assert_eq!(view.page(), 1);

        view.set_page(2);
        view.toggle_order();
        assert_eq!(view.page(), 1);
        assert_eq!(view.order(), SortOrder::Newest);
    }

    #[test]
    fn test_view_state_apply() {
        let comments: Vec<_> = (1..=5).map(|d| comment(&d.to_string(), d)).collect();
        let mut view = ViewState::new(2);
        view.set_order(SortOrder::Oldest);
        view.set_page(2);
        let page = view.apply(&comments);
        assert_eq!(ids(&page.items), vec!["3", "4"]);
        assert_eq!(page.page_count, 3);
    }
}
