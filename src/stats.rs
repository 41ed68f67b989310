use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[cfg(test)]
use anyhow::{anyhow, bail, Context, Result};
#[cfg(test)]
use std::path::Path;
#[cfg(test)]
use jsonschema::{Draft, JSONSchema};

pub const SCHEMA_VERSION: i32 = 1;

/// Statistics derived from a comment snapshot.
///
/// Recomputed from scratch whenever the snapshot changes; never updated in place.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StatsSnapshot {
    pub schema_version: i32,
    pub summary: Summary,
    pub activity: Activity,
    /// Comment count per text-length bucket, in bucket order
    pub length_distribution: BTreeMap<LengthBucket, u64>,
    pub top_commenters: Vec<AuthorEntry>,
    /// Number of threads per count of fetched replies (keyed by `replies.len()`)
    pub reply_chain_lengths: BTreeMap<usize, u64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Summary {
    /// Top-level comments plus fetched replies
    pub total_comments: u64,
    pub total_likes: u64,
    /// Sum of API-reported reply counts of top-level comments
    pub total_replies: u64,
    pub average_likes: f64,
    pub average_replies: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Activity {
    /// Keyed by local date, "YYYY-MM-DD"
    pub by_date: BTreeMap<String, u64>,
    /// Keyed by local hour of day, 0-23
    pub by_hour: BTreeMap<u32, u64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AuthorEntry {
    pub author: String,
    pub count: u64,
}

/// Fixed text-length buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub enum LengthBucket {
    #[serde(rename = "0-50")]
    UpTo50,
    #[serde(rename = "51-100")]
    UpTo100,
    #[serde(rename = "101-200")]
    UpTo200,
    #[serde(rename = "201-500")]
    UpTo500,
    #[serde(rename = "500+")]
    Over500,
}

impl LengthBucket {
    pub const ALL: [LengthBucket; 5] = [
        LengthBucket::UpTo50,
        LengthBucket::UpTo100,
        LengthBucket::UpTo200,
        LengthBucket::UpTo500,
        LengthBucket::Over500,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LengthBucket::UpTo50 => "0-50",
            LengthBucket::UpTo100 => "51-100",
            LengthBucket::UpTo200 => "101-200",
            LengthBucket::UpTo500 => "201-500",
            LengthBucket::Over500 => "500+",
        }
    }
}

impl std::fmt::Display for LengthBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
impl StatsSnapshot {
    /// Validate stats JSON against the JSON schema
    pub fn validate_with_schema(stats_json: &serde_json::Value, schema: &JSONSchema) -> Result<()> {
        match schema.validate(stats_json) {
            Ok(_) => Ok(()),
            Err(errors) => {
                let error_messages: Vec<String> = errors
                    .map(|e| format!("  - {}: {}", e.instance_path, e))
                    .collect();
                bail!("Stats validation failed:\n{}", error_messages.join("\n"))
            }
        }
    }

    /// Load and compile the JSON schema
    pub fn load_schema(schema_path: &Path) -> Result<JSONSchema> {
        let schema_content = std::fs::read_to_string(schema_path)
            .with_context(|| format!("Failed to read schema file: {}", schema_path.display()))?;

        let schema_json: serde_json::Value =
            serde_json::from_str(&schema_content).with_context(|| {
                format!(
                    "Failed to parse schema JSON from: {}",
                    schema_path.display()
                )
            })?;

        JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&schema_json)
            .map_err(|e| anyhow!("Failed to compile JSON schema: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::Comment;
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use std::path::PathBuf;

    fn get_schema_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("stats_schema.json")
    }

    fn sample_comments() -> Vec<Comment> {
        let reply = Comment {
            id: "r1".to_string(),
            text: "Agreed!".to_string(),
            author_name: "Bob".to_string(),
            author_image_url: None,
            like_count: 1,
            reply_count: 0,
            published_at: Utc.with_ymd_and_hms(2024, 1, 2, 8, 0, 0).unwrap(),
            replies: vec![],
        };
        vec![Comment {
            id: "c1".to_string(),
            text: "What a great video, thanks for sharing".to_string(),
            author_name: "Alice".to_string(),
            author_image_url: None,
            like_count: 10,
            reply_count: 3,
            published_at: Utc.with_ymd_and_hms(2024, 1, 1, 20, 0, 0).unwrap(),
            replies: vec![reply],
        }]
    }

    #[test]
    fn test_load_schema() {
        let schema_path = get_schema_path();
        let result = StatsSnapshot::load_schema(&schema_path);
        assert!(result.is_ok(), "Failed to load schema: {:?}", result.err());
    }

    #[test]
    fn test_built_stats_match_schema() {
        let schema = StatsSnapshot::load_schema(&get_schema_path()).unwrap();
        let stats = crate::stats_builder::aggregate_in(&sample_comments(), &Utc);
        let value = serde_json::to_value(&stats).unwrap();

        let result = StatsSnapshot::validate_with_schema(&value, &schema);
        assert!(result.is_ok(), "Built stats failed validation: {:?}", result.err());
    }

    #[test]
    fn test_empty_stats_match_schema() {
        let schema = StatsSnapshot::load_schema(&get_schema_path()).unwrap();
        let stats = crate::stats_builder::aggregate_in(&[], &Utc);
        let value = serde_json::to_value(&stats).unwrap();
        assert!(StatsSnapshot::validate_with_schema(&value, &schema).is_ok());
    }

    #[test]
    fn test_length_bucket_keys_serialize_as_labels() {
        let stats = crate::stats_builder::aggregate_in(&sample_comments(), &Utc);
        let value = serde_json::to_value(&stats).unwrap();
        assert_eq!(value["length_distribution"]["0-50"], json!(2));
    }

    #[test]
    fn test_stats_json_round_trip() {
        let stats = crate::stats_builder::aggregate_in(&sample_comments(), &Utc);
        let json = serde_json::to_string_pretty(&stats).unwrap();
        let parsed: StatsSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, stats);
    }

    #[test]
    fn test_validate_negative_count() {
        let schema = StatsSnapshot::load_schema(&get_schema_path()).unwrap();

        let invalid_stats = json!({
            "schema_version": 1,
            "summary": {
                "total_comments": -1,
                "total_likes": 0,
                "total_replies": 0,
                "average_likes": 0.0,
                "average_replies": 0.0
            },
            "activity": { "by_date": {}, "by_hour": {} },
            "length_distribution": {},
            "top_commenters": [],
            "reply_chain_lengths": {}
        });

        let result = StatsSnapshot::validate_with_schema(&invalid_stats, &schema);
        assert!(result.is_err(), "Should fail validation for negative count");
    }

    #[test]
    fn test_validate_unknown_length_bucket() {
        let schema = StatsSnapshot::load_schema(&get_schema_path()).unwrap();

        let invalid_stats = json!({
            "schema_version": 1,
            "summary": {
                "total_comments": 1,
                "total_likes": 0,
                "total_replies": 0,
                "average_likes": 0.0,
                "average_replies": 0.0
            },
            "activity": { "by_date": {}, "by_hour": {} },
            "length_distribution": { "50-60": 1 },
            "top_commenters": [],
            "reply_chain_lengths": {}
        });

        let result = StatsSnapshot::validate_with_schema(&invalid_stats, &schema);
        assert!(result.is_err(), "Should fail validation for unknown bucket");
    }

    #[test]
    fn test_validate_missing_summary() {
        let schema = StatsSnapshot::load_schema(&get_schema_path()).unwrap();

        let invalid_stats = json!({
            "schema_version": 1,
            "activity": { "by_date": {}, "by_hour": {} },
            "length_distribution": {},
            "top_commenters": [],
            "reply_chain_lengths": {}
        });

        let result = StatsSnapshot::validate_with_schema(&invalid_stats, &schema);
        assert!(result.is_err());
        let err_msg = format!("{:?}", result.err().unwrap());
        assert!(err_msg.contains("summary"), "Error should mention missing field");
    }
}
