/// YouTube comment fetching.
///
/// Reads video metadata and comment threads from the YouTube Data API v3 and
/// produces a `CommentSnapshot`.
///
/// # Architecture
///
/// - **types**: Wire types of the two API endpoints and their conversion to `Comment`
/// - **pagination**: `nextPageToken` loop over `commentThreads.list`
/// - **progress**: Spinner / plain-text progress reporting
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use crate::comment::CommentSnapshot;
use crate::config::Config;
use crate::error::{ExplorerError, Result};
use crate::video_id::extract_video_id;

pub mod pagination;
pub mod progress;
pub mod types;

use pagination::{paginate_threads, PAGE_SIZE};
use progress::FetchProgress;
use types::{ApiErrorResponse, CommentThreadListResponse, VideoItem, VideoListResponse};

/// Default number of comment pages to fetch (one request of up to 100 threads).
pub const DEFAULT_MAX_PAGES: usize = 1;

pub struct YouTubeClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl YouTubeClient {
    /// Builds a client from the configuration; fails when no API key is set.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.require_api_key()?;
        Self::new(api_key, &config.api_base_url, config.http_timeout)
    }

    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Builds `{base}/{resource}?key=..&{params}`.
    fn endpoint(&self, resource: &str, params: &[(&str, &str)]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/{}", self.base_url, resource)).map_err(|e| {
            ExplorerError::UpstreamConfig(format!("Invalid API base URL {}: {}", self.base_url, e))
        })?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("key", &self.api_key);
            for (name, value) in params {
                query.append_pair(name, value);
            }
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .map(|e| e.error.message)
                .ok()
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| format!("HTTP {}", status));
            return Err(ExplorerError::UpstreamFetch(message));
        }

        serde_json::from_str(&body)
            .map_err(|e| ExplorerError::UpstreamFetch(format!("Unexpected response: {}", e)))
    }

    /// `videos.list` for a single id.
    pub async fn video(&self, video_id: &str) -> Result<VideoItem> {
        let url = self.endpoint("videos", &[("part", "snippet,statistics"), ("id", video_id)])?;
        let response: VideoListResponse = self.get_json(url).await?;
        response
            .items
            .into_iter()
            .next()
            .ok_or_else(|| ExplorerError::UpstreamNotFound("Video not found".to_string()))
    }

    /// One page of `commentThreads.list`, most relevant first.
    pub async fn comment_threads(
        &self,
        video_id: &str,
        page_token: Option<String>,
    ) -> Result<CommentThreadListResponse> {
        let max_results = PAGE_SIZE.to_string();
        let mut params = vec![
            ("part", "snippet,replies"),
            ("videoId", video_id),
            ("maxResults", max_results.as_str()),
            ("order", "relevance"),
        ];
        if let Some(ref token) = page_token {
            params.push(("pageToken", token.as_str()));
        }
        let url = self.endpoint("commentThreads", &params)?;
        self.get_json(url).await
    }

    /// Fetches video metadata and up to `max_pages` pages of comment threads.
    pub async fn fetch_snapshot(
        &self,
        video_id: &str,
        max_pages: usize,
        progress: &mut FetchProgress,
    ) -> Result<CommentSnapshot> {
        if video_id.trim().is_empty() {
            return Err(ExplorerError::Validation("Video ID is required".to_string()));
        }

        let video = self.video(video_id).await?;
        let total_comments = video.total_comments();
        let video_info = video.video_info();
        if let Some(ref title) = video_info.title {
            progress.set_title(title);
        }
        info!(
            "Video {} reports {} comments, fetching up to {} page(s)",
            video_id, total_comments, max_pages
        );

        let progress_ref = &*progress;
        let outcome = paginate_threads(
            max_pages,
            |token| self.comment_threads(video_id, token),
            |pages, comments| progress_ref.page_done(pages, comments),
        )
        .await?;

        debug!(
            "Pagination finished after {} page(s), exhausted: {}",
            outcome.pages_fetched, outcome.exhausted
        );

        Ok(CommentSnapshot::new(
            outcome.comments,
            total_comments,
            video_info,
        ))
    }
}

/// Entry point for the fetch command.
///
/// Resolves the video id from a URL or bare id, fetches, and returns the snapshot.
pub async fn run(config: &Config, input: &str, max_pages: usize) -> Result<CommentSnapshot> {
    let video_id = extract_video_id(input)?;
    let client = YouTubeClient::from_config(config)?;

    eprintln!("📥 Fetching comments for video {}", video_id);
    let mut progress = FetchProgress::new(&video_id);
    let result = client.fetch_snapshot(&video_id, max_pages, &mut progress).await;
    progress.finish();

    let snapshot = result?;
    info!(
        "Fetched {} top-level comments ({} including replies) of {}",
        snapshot.comments.len(),
        snapshot.fetched_comments,
        snapshot.total_comments
    );
    eprintln!(
        "✅ Fetched {} of {} comments",
        snapshot.fetched_comments, snapshot.total_comments
    );
    Ok(snapshot)
}
