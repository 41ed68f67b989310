/// Comment thread pagination.
///
/// Follows `nextPageToken` through `commentThreads.list` until the API stops
/// returning a token or the page limit is reached.
use std::future::Future;
use tracing::{debug, warn};

use super::types::{CommentThread, CommentThreadListResponse};
use crate::comment::Comment;
use crate::error::Result;

/// Threads requested per page (the API maximum).
pub const PAGE_SIZE: u32 = 100;

/// Outcome of a paginated fetch.
#[derive(Debug)]
pub struct PaginationOutcome {
    pub comments: Vec<Comment>,
    pub pages_fetched: usize,
    /// True when the last page had no continuation token
    pub exhausted: bool,
}

/// Fetches up to `max_pages` pages (at least one) through `fetch_page`.
///
/// Stops early when the API hands back the token it was just given.
///
/// `fetch_page` receives the continuation token (`None` for the first page).
/// `progress_callback` is invoked after each page with (`pages_fetched`, `comments_so_far`).
pub async fn paginate_threads<F, Fut, P>(
    max_pages: usize,
    mut fetch_page: F,
    progress_callback: P,
) -> Result<PaginationOutcome>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<CommentThreadListResponse>>,
    P: Fn(usize, usize),
{
    let max_pages = max_pages.max(1);
    let mut outcome = PaginationOutcome {
        comments: Vec::new(),
        pages_fetched: 0,
        exhausted: false,
    };
    let mut token: Option<String> = None;

    loop {
        let requested = token.take();
        let page = fetch_page(requested.clone()).await?;
        outcome.pages_fetched += 1;

        debug!(
            "Fetched comment page {} ({} threads, more: {})",
            outcome.pages_fetched,
            page.items.len(),
            page.next_page_token.is_some()
        );

        outcome
            .comments
            .extend(page.items.into_iter().map(CommentThread::into_comment));

        progress_callback(outcome.pages_fetched, outcome.comments.len());

        match page.next_page_token {
            Some(next) if !next.is_empty() => {
                if requested.as_deref() == Some(next.as_str()) {
                    warn!("API repeated page token {}, stopping", next);
                    break;
                }
                if outcome.pages_fetched >= max_pages {
                    break;
                }
                token = Some(next);
            }
            _ => {
                outcome.exhausted = true;
                break;
            }
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExplorerError;
    use std::cell::RefCell;

    fn page(ids: &[&str], next: Option<&str>) -> CommentThreadListResponse {
        let items = ids
            .iter()
            .map(|id| {
                serde_json::from_value(serde_json::json!({
                    "id": id,
                    "snippet": {
                        "totalReplyCount": 0,
                        "topLevelComment": {
                            "id": format!("top-{}", id),
                            "snippet": {
                                "textDisplay": "text",
                                "authorDisplayName": "author",
                                "likeCount": 0,
                                "publishedAt": "2024-01-01T00:00:00Z"
                            }
                        }
                    }
                }))
                .unwrap()
            })
            .collect();
        CommentThreadListResponse {
            items,
            next_page_token: next.map(str::to_string),
        }
    }

    fn pages() -> Vec<CommentThreadListResponse> {
        vec![
            page(&["a", "b"], Some("t1")),
            page(&["c"], Some("t2")),
            page(&["d"], None),
        ]
    }

    #[tokio::test]
    async fn test_single_page_by_default() {
        let served = RefCell::new(pages().into_iter());
        let tokens = RefCell::new(Vec::new());
        let outcome = paginate_threads(
            1,
            |token| {
                tokens.borrow_mut().push(token);
                let next = served.borrow_mut().next().unwrap();
                async move { Ok(next) }
            },
            |_, _| {},
        )
        .await
        .unwrap();

        assert_eq!(outcome.pages_fetched, 1);
        assert!(!outcome.exhausted);
        assert_eq!(outcome.comments.len(), 2);
        assert_eq!(tokens.into_inner(), vec![None]);
    }

    #[tokio::test]
    async fn test_follows_tokens_until_exhausted() {
        let served = RefCell::new(pages().into_iter());
        let tokens = RefCell::new(Vec::new());
        let progress = RefCell::new(Vec::new());
        let outcome = paginate_threads(
            10,
            |token| {
                tokens.borrow_mut().push(token);
                let next = served.borrow_mut().next().unwrap();
                async move { Ok(next) }
            },
            |pages, comments| progress.borrow_mut().push((pages, comments)),
        )
        .await
        .unwrap();

        assert!(outcome.exhausted);
        assert_eq!(outcome.pages_fetched, 3);
        let ids: Vec<_> = outcome.comments.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);
        assert_eq!(
            tokens.into_inner(),
            vec![None, Some("t1".to_string()), Some("t2".to_string())]
        );
        assert_eq!(progress.into_inner(), vec![(1, 2), (2, 3), (3, 4)]);
    }

    #[tokio::test]
    async fn test_zero_pages_fetches_one() {
        let served = RefCell::new(pages().into_iter());
        let outcome = paginate_threads(
            0,
            |_| {
                let next = served.borrow_mut().next().unwrap();
                async move { Ok(next) }
            },
            |_, _| {},
        )
        .await
        .unwrap();
        assert_eq!(outcome.pages_fetched, 1);
    }

    #[tokio::test]
    async fn test_repeated_token_stops() {
        let served = RefCell::new(
            vec![
                page(&["a"], Some("t1")),
                page(&["b"], Some("t1")),
                page(&["c"], None),
            ]
            .into_iter(),
        );
        let outcome = paginate_threads(
            10,
            |_| {
                let next = served.borrow_mut().next().unwrap();
                async move { Ok(next) }
            },
            |_, _| {},
        )
        .await
        .unwrap();

        assert_eq!(outcome.pages_fetched, 2);
        assert!(!outcome.exhausted);
        let ids: Vec<_> = outcome.comments.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_error_propagates() {
        let result = paginate_threads(
            3,
            |_| async { Err(ExplorerError::UpstreamFetch("quota exceeded".to_string())) },
            |_, _| {},
        )
        .await;
        assert!(matches!(result, Err(ExplorerError::UpstreamFetch(_))));
    }
}
