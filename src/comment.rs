/// Comment data model and snapshot persistence.
///
/// A snapshot is the result of one fetch. It is loaded once and treated as
/// read-only; every derived view borrows from it.
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ExplorerError;

/// A top-level comment or a reply.
///
/// Replies never carry replies of their own. `reply_count` is the total
/// reported by the API and may exceed `replies.len()`, since only the first
/// page of replies comes back with a thread.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    #[serde(rename = "textDisplay")]
    pub text: String,
    #[serde(rename = "authorDisplayName")]
    pub author_name: String,
    #[serde(
        rename = "authorProfileImageUrl",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub author_image_url: Option<String>,
    pub like_count: u64,
    pub reply_count: u64,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub replies: Vec<Comment>,
}

impl Comment {
    /// Text length in characters (not bytes).
    pub fn text_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Metadata about the video the comments belong to.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_count: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub like_count: Option<String>,
}

/// The payload of one fetch: comments plus video-level counters.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentSnapshot {
    pub comments: Vec<Comment>,
    /// Comment count reported by the video statistics (all comments, not just fetched ones)
    pub total_comments: u64,
    /// Top-level comments plus the replies that came back with them
    pub fetched_comments: u64,
    #[serde(default)]
    pub video_info: VideoInfo,
}

impl CommentSnapshot {
    pub fn new(comments: Vec<Comment>, total_comments: u64, video_info: VideoInfo) -> Self {
        let fetched_comments = count_fetched(&comments) as u64;
        Self {
            comments,
            total_comments,
            fetched_comments,
            video_info,
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot file: {}", path.display()))?;

        let snapshot: CommentSnapshot = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON from: {}", path.display()))?;

        snapshot
            .validate()
            .with_context(|| format!("Invalid snapshot: {}", path.display()))?;

        Ok(snapshot)
    }

    /// Checks the shape guarantees every consumer relies on: replies are one
    /// level deep and `fetched_comments` matches the comments held.
    pub fn validate(&self) -> crate::error::Result<()> {
        for comment in &self.comments {
            if let Some(reply) = comment.replies.iter().find(|r| !r.replies.is_empty()) {
                return Err(ExplorerError::Validation(format!(
                    "Reply {} of comment {} has nested replies",
                    reply.id, comment.id
                )));
            }
        }

        let counted = count_fetched(&self.comments) as u64;
        if counted != self.fetched_comments {
            return Err(ExplorerError::Validation(format!(
                "fetchedComments is {} but the snapshot holds {} comments",
                self.fetched_comments, counted
            )));
        }
        Ok(())
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize snapshot")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write snapshot file: {}", path.display()))?;
        Ok(())
    }

    /// Finds a top-level comment or reply by id.
    pub fn find(&self, id: &str) -> Option<&Comment> {
        self.comments.iter().find_map(|c| {
            if c.id == id {
                Some(c)
            } else {
                c.replies.iter().find(|r| r.id == id)
            }
        })
    }
}

/// Counts top-level comments plus every fetched reply.
pub fn count_fetched(comments: &[Comment]) -> usize {
    comments.len() + comments.iter().map(|c| c.replies.len()).sum::<usize>()
}
