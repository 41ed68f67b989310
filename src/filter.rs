/// Comment filtering.
///
/// Two stages, both pure: the author match (`match_author`) runs first and the
/// criteria filter (`filter_comments`) runs on its output. Only top-level
/// comments are examined by the criteria filter; a thread passes or fails as a
/// unit.
use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::comment::Comment;

static LINK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://\S+").expect("valid link regex"));
static HASHTAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"#\S+").expect("valid hashtag regex"));
static MENTION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"@\S+").expect("valid mention regex"));

/// Three-valued presence flag. `Any` means no constraint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TriState {
    #[default]
    Any,
    Yes,
    No,
}

impl TriState {
    fn accepts(self, detected: bool) -> bool {
        match self {
            TriState::Any => true,
            TriState::Yes => detected,
            TriState::No => !detected,
        }
    }
}

impl std::str::FromStr for TriState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "any" | "" => Ok(TriState::Any),
            "yes" | "true" | "y" => Ok(TriState::Yes),
            "no" | "false" | "n" => Ok(TriState::No),
            other => Err(format!("expected yes, no or any, got '{}'", other)),
        }
    }
}

/// Inclusive date range; a missing bound is unbounded on that side.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    /// Expands calendar dates to whole days: start of `from`, last nanosecond of `to`.
    pub fn from_dates(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self {
            start: from.and_then(|d| d.and_hms_opt(0, 0, 0)).map(|dt| dt.and_utc()),
            end: to
                .and_then(|d| d.and_hms_nano_opt(23, 59, 59, 999_999_999))
                .map(|dt| dt.and_utc()),
        }
    }

    fn contains(&self, ts: &DateTime<Utc>) -> bool {
        self.start.is_none_or(|start| *ts >= start) && self.end.is_none_or(|end| *ts <= end)
    }
}

/// Inclusive text length range in characters; `max = None` is unbounded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LengthRange {
    pub min: usize,
    pub max: Option<usize>,
}

impl LengthRange {
    fn contains(&self, len: usize) -> bool {
        len >= self.min && self.max.is_none_or(|max| len <= max)
    }
}

/// Filter configuration. `FilterCriteria::default()` constrains nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub date_range: DateRange,
    pub length: LengthRange,
    pub min_likes: u64,
    pub has_links: TriState,
    pub has_hashtags: TriState,
    pub has_mentions: TriState,
    /// Case-insensitive substring; empty means no constraint
    pub search_text: String,
    /// Lower-cased hashtags (with leading '#'); empty means no constraint
    tags: Vec<String>,
}

impl FilterCriteria {
    /// Adds a required tag. Tags are lower-cased, prefixed with '#' when missing
    /// and de-duplicated. Returns false when the tag was already present or blank.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let Some(tag) = normalize_tag(tag) else {
            return false;
        };
        if self.tags.contains(&tag) {
            return false;
        }
        self.tags.push(tag);
        true
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        self.add_tag(tag);
        self
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// True when no criterion is active.
    pub fn is_empty(&self) -> bool {
        *self == FilterCriteria::default()
    }

    /// Checks a single comment against every active criterion.
    pub fn matches(&self, comment: &Comment) -> bool {
        if !self.date_range.contains(&comment.published_at) {
            return false;
        }

        if !self.length.contains(comment.text_len()) {
            return false;
        }

        if comment.like_count < self.min_likes {
            return false;
        }

        if !self.has_links.accepts(has_link(&comment.text)) {
            return false;
        }
        if !self.has_hashtags.accepts(has_hashtag(&comment.text)) {
            return false;
        }
        if !self.has_mentions.accepts(has_mention(&comment.text)) {
            return false;
        }

        if !self.search_text.is_empty()
            && !comment
                .text
                .to_lowercase()
                .contains(&self.search_text.to_lowercase())
        {
            return false;
        }

        if !self.tags.is_empty() {
            let comment_tags = extract_tags(&comment.text);
            if !self.tags.iter().any(|tag| comment_tags.contains(tag)) {
                return false;
            }
        }

        true
    }
}

fn normalize_tag(tag: &str) -> Option<String> {
    let tag = tag.trim();
    if tag.is_empty() || tag == "#" {
        return None;
    }
    let tag = tag.to_lowercase();
    Some(if tag.starts_with('#') {
        tag
    } else {
        format!("#{}", tag)
    })
}

pub fn has_link(text: &str) -> bool {
    LINK_RE.is_match(text)
}

pub fn has_hashtag(text: &str) -> bool {
    HASHTAG_RE.is_match(text)
}

pub fn has_mention(text: &str) -> bool {
    MENTION_RE.is_match(text)
}

/// All `#\S+` tokens of the text, lower-cased, in order of appearance.
pub fn extract_tags(text: &str) -> Vec<String> {
    HASHTAG_RE
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// Applies the criteria to top-level comments.
///
/// The result is always a subsequence of the input; an empty criteria set
/// returns every comment.
pub fn filter_comments(comments: &[Comment], criteria: &FilterCriteria) -> Vec<Comment> {
    comments
        .iter()
        .filter(|c| criteria.matches(c))
        .cloned()
        .collect()
}

/// Keeps top-level comments whose author, or any reply's author, contains
/// `needle` (case-insensitive). An empty needle keeps everything.
pub fn match_author(comments: &[Comment], needle: &str) -> Vec<Comment> {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return comments.to_vec();
    }

    comments
        .iter()
        .filter(|c| {
            c.author_name.to_lowercase().contains(&needle)
                || c
                    .replies
                    .iter()
                    .any(|r| r.author_name.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}
