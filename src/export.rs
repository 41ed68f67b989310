/// CSV and JSON export of a comment list.
use std::fmt;
use std::str::FromStr;

use chrono::SecondsFormat;

use crate::comment::Comment;
use crate::error::{ExplorerError, Result};

const CSV_HEADER: [&str; 7] = [
    "Author",
    "Comment",
    "Published At",
    "Likes",
    "Reply Count",
    "Channel URL",
    "Parent ID",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn file_name(self) -> &'static str {
        match self {
            ExportFormat::Csv => "youtube-comments.csv",
            ExportFormat::Json => "youtube-comments.json",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv;charset=utf-8",
            ExportFormat::Json => "text/json;charset=utf-8",
        }
    }

    /// Serializes `comments` in this format.
    pub fn render(self, comments: &[Comment]) -> Result<String> {
        match self {
            ExportFormat::Csv => Ok(to_csv(comments)),
            ExportFormat::Json => to_json(comments),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExplorerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(ExplorerError::Validation(format!(
                "Unknown export format: {} (expected csv or json)",
                other
            ))),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Json => write!(f, "json"),
        }
    }
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn csv_row(comment: &Comment, reply_count: u64, parent_id: &str) -> String {
    let published_at = comment
        .published_at
        .to_rfc3339_opts(SecondsFormat::AutoSi, true);
    let likes = comment.like_count.to_string();
    let replies = reply_count.to_string();
    [
        comment.author_name.as_str(),
        comment.text.as_str(),
        published_at.as_str(),
        likes.as_str(),
        replies.as_str(),
        "",
        parent_id,
    ]
    .iter()
    .map(|field| quote(field))
    .collect::<Vec<_>>()
    .join(",")
}

/// Top-level rows first, then every reply grouped after them in thread order.
pub fn to_csv(comments: &[Comment]) -> String {
    let mut lines = vec![CSV_HEADER.join(",")];

    lines.extend(
        comments
            .iter()
            .map(|comment| csv_row(comment, comment.reply_count, "")),
    );

    for parent in comments {
        lines.extend(
            parent
                .replies
                .iter()
                .map(|reply| csv_row(reply, 0, &parent.id)),
        );
    }

    lines.join("\n")
}

pub fn to_json(comments: &[Comment]) -> Result<String> {
    Ok(serde_json::to_string_pretty(comments)?)
}

pub fn from_json(json: &str) -> Result<Vec<Comment>> {
    Ok(serde_json::from_str(json)?)
}
