/// Bulk keyword sentiment estimator.
///
/// Used for the positive/neutral/negative breakdown over a whole comment set.
/// It is deliberately independent of the per-comment analysis lexicon.
///
/// Note on the score: the raw signed hit count is divided by its own absolute
/// value, so every comment scores exactly -1.0, 0.0 or +1.0 no matter how many
/// keywords it contains. The 0.2 thresholds therefore only ever separate
/// "any net positive" from "any net negative". Kept as-is so breakdowns stay
/// comparable with earlier reports.
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashSet;

use crate::comment::Comment;

static POSITIVE_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "good", "great", "awesome", "excellent", "amazing", "love", "best", "fantastic",
        "wonderful", "perfect", "beautiful", "happy", "thanks", "thank", "helpful", "nice",
        "well", "super", "cool", "brilliant", "👍", "❤️", "😊", "🙂", "😄",
    ]
    .into_iter()
    .collect()
});

static NEGATIVE_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "bad", "terrible", "awful", "horrible", "hate", "worst", "poor", "disappointed",
        "waste", "boring", "stupid", "useless", "wrong", "annoying", "dislike", "worse",
        "fail", "failed", "disappointing", "👎", "😠", "😡", "😤", "😒",
    ]
    .into_iter()
    .collect()
});

/// Scores above this are positive.
pub const POSITIVE_THRESHOLD: f64 = 0.2;
/// Scores below this are negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    pub fn from_score(score: f64) -> Self {
        if score > POSITIVE_THRESHOLD {
            SentimentLabel::Positive
        } else if score < NEGATIVE_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            SentimentLabel::Positive => "😊",
            SentimentLabel::Neutral => "😐",
            SentimentLabel::Negative => "😟",
        }
    }
}

/// Scores a text as -1.0, 0.0 or +1.0 (see module docs).
pub fn score_text(text: &str) -> f64 {
    let lowered = text.to_lowercase();
    let raw: i64 = lowered
        .split_whitespace()
        .map(|word| {
            let mut hit = 0;
            if POSITIVE_WORDS.contains(word) {
                hit += 1;
            }
            if NEGATIVE_WORDS.contains(word) {
                hit -= 1;
            }
            hit
        })
        .sum();

    if raw == 0 {
        0.0
    } else {
        raw as f64 / (raw.abs().max(1)) as f64
    }
}

/// Sentiment distribution over a comment set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SentimentBreakdown {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
    /// Mean score over all comments, 0.0 for an empty set
    pub overall_score: f64,
}

impl SentimentBreakdown {
    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }

    pub fn overall_label(&self) -> SentimentLabel {
        SentimentLabel::from_score(self.overall_score)
    }

    /// Percentage of `count` over the total, 0.0 for an empty set.
    pub fn percent(&self, count: usize) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            count as f64 / total as f64 * 100.0
        }
    }
}

/// Classifies every top-level comment and tallies the result.
pub fn breakdown(comments: &[Comment]) -> SentimentBreakdown {
    let mut result = SentimentBreakdown::default();
    let mut total_score = 0.0;

    for comment in comments {
        let score = score_text(&comment.text);
        total_score += score;
        match SentimentLabel::from_score(score) {
            SentimentLabel::Positive => result.positive += 1,
            SentimentLabel::Neutral => result.neutral += 1,
            SentimentLabel::Negative => result.negative += 1,
        }
    }

    if !comments.is_empty() {
        result.overall_score = total_score / comments.len() as f64;
    }
    result
}
