/// Statistics aggregation.
///
/// Reduces a comment collection into a `StatsSnapshot`: one pass over the
/// top-level comments and a nested pass over each comment's fetched replies.
/// Replies count toward totals, likes, date/length/hour histograms and the
/// author table, but not toward the reply totals or the reply-chain histogram.
use chrono::{DateTime, Local, TimeZone, Timelike, Utc};
use indexmap::IndexMap;
use std::collections::BTreeMap;

use crate::comment::Comment;
use crate::stats::*;

/// Number of entries in the top commenters table.
const TOP_COMMENTERS: usize = 10;

// ============================================================================
// Intermediate Aggregation Structs (private, internal to stats_builder)
// ============================================================================

/// Running totals (private).
#[derive(Default)]
struct Totals {
    comments: u64,
    likes: u64,
    replies: u64,
    top_level: u64,
}

/// Date and hour buckets in the report timezone (private).
struct TemporalAggregates<'tz, Tz: TimeZone> {
    tz: &'tz Tz,
    by_date: BTreeMap<String, u64>,
    by_hour: BTreeMap<u32, u64>,
}

impl<'tz, Tz: TimeZone> TemporalAggregates<'tz, Tz>
where
    Tz::Offset: std::fmt::Display,
{
    fn new(tz: &'tz Tz) -> Self {
        Self {
            tz,
            by_date: BTreeMap::new(),
            by_hour: BTreeMap::new(),
        }
    }

    fn record(&mut self, published_at: &DateTime<Utc>) {
        let local = published_at.with_timezone(self.tz);
        let day = local.format("%Y-%m-%d").to_string();
        *self.by_date.entry(day).or_insert(0) += 1;
        *self.by_hour.entry(local.hour()).or_insert(0) += 1;
    }
}

/// Author frequency in first-seen order (private).
#[derive(Default)]
struct AuthorTally {
    counts: IndexMap<String, u64>,
}

impl AuthorTally {
    fn record(&mut self, author: &str) {
        *self.counts.entry(author.to_string()).or_insert(0) += 1;
    }

    /// Highest counts first; ties keep first-seen order.
    fn top(self, n: usize) -> Vec<AuthorEntry> {
        let mut entries: Vec<_> = self.counts.into_iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
            .into_iter()
            .take(n)
            .map(|(author, count)| AuthorEntry { author, count })
            .collect()
    }
}

/// Maps a text length (in characters) to its histogram bucket.
///
/// Upper bounds are exclusive, so a 50-character comment lands in "51-100".
pub fn categorize_length_bucket(length: usize) -> LengthBucket {
    if length < 50 {
        LengthBucket::UpTo50
    } else if length < 100 {
        LengthBucket::UpTo100
    } else if length < 200 {
        LengthBucket::UpTo200
    } else if length < 500 {
        LengthBucket::UpTo500
    } else {
        LengthBucket::Over500
    }
}

/// Aggregates statistics using the local timezone for date and hour buckets.
pub fn aggregate(comments: &[Comment]) -> StatsSnapshot {
    aggregate_in(comments, &Local)
}

/// Aggregates statistics, bucketing dates and hours in `tz`.
pub fn aggregate_in<Tz>(comments: &[Comment], tz: &Tz) -> StatsSnapshot
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut totals = Totals::default();
    let mut temporal = TemporalAggregates::new(tz);
    let mut authors = AuthorTally::default();
    let mut length_distribution: BTreeMap<LengthBucket, u64> = BTreeMap::new();
    let mut reply_chain_lengths: BTreeMap<usize, u64> = BTreeMap::new();

    let mut record_common = |comment: &Comment, totals: &mut Totals| {
        totals.comments += 1;
        totals.likes += comment.like_count;
        temporal.record(&comment.published_at);
        *length_distribution
            .entry(categorize_length_bucket(comment.text_len()))
            .or_insert(0) += 1;
        authors.record(&comment.author_name);
    };

    for comment in comments {
        totals.top_level += 1;
        totals.replies += comment.reply_count;
        record_common(comment, &mut totals);

        *reply_chain_lengths
            .entry(comment.replies.len())
            .or_insert(0) += 1;

        for reply in &comment.replies {
            record_common(reply, &mut totals);
        }
    }

    let summary = Summary {
        total_comments: totals.comments,
        total_likes: totals.likes,
        total_replies: totals.replies,
        average_likes: ratio(totals.likes, totals.comments),
        average_replies: ratio(totals.replies, totals.top_level),
    };

    StatsSnapshot {
        schema_version: SCHEMA_VERSION,
        summary,
        activity: Activity {
            by_date: temporal.by_date,
            by_hour: temporal.by_hour,
        },
        length_distribution,
        top_commenters: authors.top(TOP_COMMENTERS),
        reply_chain_lengths,
    }
}

/// Division guarded to 0.0 for an empty denominator.
fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(id: &str, author: &str, text: &str, likes: u64, hour: u32) -> Comment {
        Comment {
            id: id.to_string(),
            text: text.to_string(),
            author_name: author.to_string(),
            author_image_url: None,
            like_count: likes,
            reply_count: 0,
            published_at: Utc.with_ymd_and_hms(2024, 3, 15, hour, 30, 0).unwrap(),
            replies: vec![],
        }
    }

    fn create_test_thread() -> Comment {
        let mut parent = comment("c1", "Alice", "First!", 10, 9);
        parent.reply_count = 5;
        parent.replies = vec![
            comment("r1", "Bob", &"x".repeat(120), 2, 10),
            comment("r2", "Alice", "thanks", 0, 10),
        ];
        parent
    }

    #[test]
    fn test_length_bucket_boundaries() {
        assert_eq!(categorize_length_bucket(0).as_str(), "0-50");
        assert_eq!(categorize_length_bucket(49).as_str(), "0-50");
        assert_eq!(categorize_length_bucket(50).as_str(), "51-100");
        assert_eq!(categorize_length_bucket(99).as_str(), "51-100");
        assert_eq!(categorize_length_bucket(100).as_str(), "101-200");
        assert_eq!(categorize_length_bucket(200).as_str(), "201-500");
        assert_eq!(categorize_length_bucket(499).as_str(), "201-500");
        assert_eq!(categorize_length_bucket(500).as_str(), "500+");
    }

    #[test]
    fn test_aggregate_single_thread() {
        let comments = vec![create_test_thread(), comment("c2", "Carol", "Nice", 3, 22)];
        let stats = aggregate_in(&comments, &Utc);

        assert_eq!(stats.summary.total_comments, 4);
        assert_eq!(stats.summary.total_likes, 15);
        // API-reported reply counts of top-level comments only
        assert_eq!(stats.summary.total_replies, 5);
        assert!((stats.summary.average_likes - 3.75).abs() < f64::EPSILON);
        assert!((stats.summary.average_replies - 2.5).abs() < f64::EPSILON);

        assert_eq!(stats.activity.by_date.get("2024-03-15"), Some(&4));
        assert_eq!(stats.activity.by_hour.get(&9), Some(&1));
        assert_eq!(stats.activity.by_hour.get(&10), Some(&2));
        assert_eq!(stats.activity.by_hour.get(&22), Some(&1));

        assert_eq!(stats.length_distribution.get(&LengthBucket::UpTo50), Some(&3));
        assert_eq!(stats.length_distribution.get(&LengthBucket::UpTo200), Some(&1));

        // Keyed by fetched replies of the parent; replies themselves are not counted
        assert_eq!(stats.reply_chain_lengths.get(&2), Some(&1));
        assert_eq!(stats.reply_chain_lengths.get(&0), Some(&1));
        assert_eq!(stats.reply_chain_lengths.values().sum::<u64>(), 2);
    }

    #[test]
    fn test_total_comments_counts_replies() {
        let comments = vec![create_test_thread(), create_test_thread()];
        let stats = aggregate_in(&comments, &Utc);
        let expected = comments.len() + comments.iter().map(|c| c.replies.len()).sum::<usize>();
        assert_eq!(stats.summary.total_comments, expected as u64);
    }

    #[test]
    fn test_top_commenters_ranking() {
        let comments = vec![
            comment("1", "Zed", "a", 0, 1),
            comment("2", "Amy", "b", 0, 1),
            comment("3", "Amy", "c", 0, 1),
            comment("4", "Bea", "d", 0, 1),
        ];
        let stats = aggregate_in(&comments, &Utc);
        let top: Vec<_> = stats
            .top_commenters
            .iter()
            .map(|e| (e.author.as_str(), e.count))
            .collect();
        // Ties keep first-seen order
        assert_eq!(top, vec![("Amy", 2), ("Zed", 1), ("Bea", 1)]);
    }

    #[test]
    fn test_top_commenters_capped() {
        let comments: Vec<_> = (0..15)
            .map(|i| comment(&i.to_string(), &format!("user{}", i), "hi", 0, 1))
            .collect();
        let stats = aggregate_in(&comments, &Utc);
        assert_eq!(stats.top_commenters.len(), 10);
    }

    #[test]
    fn test_aggregate_empty() {
        let stats = aggregate_in(&[], &Utc);
        assert_eq!(stats.summary.total_comments, 0);
        assert_eq!(stats.summary.average_likes, 0.0);
        assert_eq!(stats.summary.average_replies, 0.0);
        assert!(stats.activity.by_date.is_empty());
        assert!(stats.top_commenters.is_empty());
    }

    #[test]
    fn test_buckets_follow_timezone() {
        let offset = chrono::FixedOffset::east_opt(3 * 3600).unwrap();
        let late = Comment {
            published_at: Utc.with_ymd_and_hms(2024, 3, 15, 22, 0, 0).unwrap(),
            ..comment("c", "Dan", "late night", 0, 0)
        };
        let stats = aggregate_in(&[late], &offset);
        assert_eq!(stats.activity.by_date.get("2024-03-16"), Some(&1));
        assert_eq!(stats.activity.by_hour.get(&1), Some(&1));
    }
}
