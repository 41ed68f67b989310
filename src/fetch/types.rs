/// Wire types for the YouTube Data API v3 responses used by the fetch.
///
/// Only the fields the explorer reads are modelled; everything else in the
/// payload is ignored by serde.
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::comment::{Comment, VideoInfo};

/// `videos.list` response.
#[derive(Debug, Deserialize)]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
pub struct VideoItem {
    #[serde(default)]
    pub snippet: Option<VideoSnippet>,
    #[serde(default)]
    pub statistics: Option<VideoStatistics>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnippet {
    pub title: Option<String>,
    pub channel_title: Option<String>,
    pub published_at: Option<String>,
    #[serde(default)]
    pub thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Deserialize)]
pub struct Thumbnails {
    pub high: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
pub struct Thumbnail {
    pub url: String,
}

/// Counters come back as decimal strings.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatistics {
    pub view_count: Option<String>,
    pub like_count: Option<String>,
    pub comment_count: Option<String>,
}

impl VideoItem {
    /// Comment count reported by the video statistics, 0 when absent or unparsable.
    pub fn total_comments(&self) -> u64 {
        self.statistics
            .as_ref()
            .and_then(|s| s.comment_count.as_deref())
            .and_then(|count| count.parse().ok())
            .unwrap_or(0)
    }

    pub fn video_info(&self) -> VideoInfo {
        let snippet = self.snippet.as_ref();
        let statistics = self.statistics.as_ref();
        VideoInfo {
            title: snippet.and_then(|s| s.title.clone()),
            channel_title: snippet.and_then(|s| s.channel_title.clone()),
            published_at: snippet.and_then(|s| s.published_at.clone()),
            thumbnail_url: snippet
                .and_then(|s| s.thumbnails.as_ref())
                .and_then(|t| t.high.as_ref())
                .map(|t| t.url.clone()),
            view_count: statistics.and_then(|s| s.view_count.clone()),
            like_count: statistics.and_then(|s| s.like_count.clone()),
        }
    }
}

/// `commentThreads.list` response page.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentThreadListResponse {
    #[serde(default)]
    pub items: Vec<CommentThread>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommentThread {
    pub id: String,
    pub snippet: ThreadSnippet,
    #[serde(default)]
    pub replies: Option<ThreadReplies>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadSnippet {
    pub top_level_comment: ApiComment,
    #[serde(default)]
    pub total_reply_count: u64,
}

#[derive(Debug, Deserialize)]
pub struct ThreadReplies {
    #[serde(default)]
    pub comments: Vec<ApiComment>,
}

#[derive(Debug, Deserialize)]
pub struct ApiComment {
    pub id: String,
    pub snippet: CommentSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentSnippet {
    pub text_display: String,
    pub author_display_name: String,
    pub author_profile_image_url: Option<String>,
    #[serde(default)]
    pub like_count: u64,
    pub published_at: DateTime<Utc>,
}

impl ApiComment {
    fn into_comment(self, reply_count: u64, replies: Vec<Comment>) -> Comment {
        Comment {
            id: self.id,
            text: self.snippet.text_display,
            author_name: self.snippet.author_display_name,
            author_image_url: self.snippet.author_profile_image_url,
            like_count: self.snippet.like_count,
            reply_count,
            published_at: self.snippet.published_at,
            replies,
        }
    }
}

impl CommentThread {
    /// Flattens a thread into its top-level comment carrying the returned replies.
    ///
    /// The thread id (not the top-level comment id) identifies the comment;
    /// replies always get `reply_count = 0`.
    pub fn into_comment(self) -> Comment {
        let replies = self
            .replies
            .map(|r| r.comments)
            .unwrap_or_default()
            .into_iter()
            .map(|reply| reply.into_comment(0, Vec::new()))
            .collect();

        let mut comment = self
            .snippet
            .top_level_comment
            .into_comment(self.snippet.total_reply_count, replies);
        comment.id = self.id;
        comment
    }
}

/// Error envelope returned with non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
}
