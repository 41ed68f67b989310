/// Per-comment analysis: lexical sentiment, toxicity flags, word frequency
/// and hashtag topics.
///
/// The lexical part is synchronous. Toxicity goes through an injected
/// classifier; when it fails the analysis still completes without flags.
pub mod lexicon;
pub mod session;
pub mod toxicity;

use futures_util::stream::{self, StreamExt};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};

use crate::comment::Comment;
use crate::config::Config;
use crate::error::Result;
use lexicon::{LexicalScorer, STOP_WORDS};
use toxicity::{ToxicityClassifier, ToxicityFlags};

pub use lexicon::AfinnLexicon;
pub use session::{AnalysisSession, Ticket};
pub use toxicity::{HttpToxicityClassifier, NoopClassifier};

/// Maximum number of analyses in flight for `analyze_many`.
pub const ANALYSIS_CONCURRENCY: usize = 8;

/// Minimum token length (exclusive) kept in the word frequency table.
const MIN_WORD_LEN: usize = 2;

static NON_WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").expect("valid non-word regex"));
static TOPIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"#\w+").expect("valid topic regex"));

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SentimentSummary {
    pub score: i32,
    pub comparative: f64,
    pub positive_words: Vec<String>,
    pub negative_words: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CommentAnalysis {
    pub sentiment: SentimentSummary,
    /// `None` when the classifier was unavailable
    pub toxicity: Option<ToxicityFlags>,
    pub word_frequency: IndexMap<String, usize>,
    pub topics: Vec<String>,
}

/// Word counts in order of first occurrence.
pub fn word_frequency(text: &str) -> IndexMap<String, usize> {
    let lowered = text.to_lowercase();
    let cleaned = NON_WORD_RE.replace_all(&lowered, "");

    let mut frequency = IndexMap::new();
    for word in cleaned.split_whitespace() {
        if STOP_WORDS.contains(word) || word.chars().count() <= MIN_WORD_LEN {
            continue;
        }
        *frequency.entry(word.to_string()).or_insert(0) += 1;
    }
    frequency
}

/// Distinct lower-cased hashtags in order of first occurrence.
pub fn extract_topics(text: &str) -> Vec<String> {
    let mut topics: Vec<String> = Vec::new();
    for found in TOPIC_RE.find_iter(text) {
        let topic = found.as_str().to_lowercase();
        if !topics.contains(&topic) {
            topics.push(topic);
        }
    }
    topics
}

pub struct Analyzer {
    scorer: Box<dyn LexicalScorer>,
    classifier: Box<dyn ToxicityClassifier>,
}

impl Analyzer {
    pub fn new(scorer: Box<dyn LexicalScorer>, classifier: Box<dyn ToxicityClassifier>) -> Self {
        Self { scorer, classifier }
    }

    /// Analyzer with the bundled lexicon and no toxicity classifier.
    pub fn offline() -> Self {
        Self::new(Box::new(AfinnLexicon::new()), Box::new(NoopClassifier))
    }

    /// Bundled lexicon plus the HTTP classifier when an endpoint is configured.
    pub fn from_config(config: &Config) -> Result<Self> {
        let classifier: Box<dyn ToxicityClassifier> = match config.toxicity_url {
            Some(ref url) => {
                debug!("Using toxicity classifier at {}", url);
                Box::new(HttpToxicityClassifier::new(url.clone(), config.http_timeout)?)
            }
            None => Box::new(NoopClassifier),
        };
        Ok(Self::new(Box::new(AfinnLexicon::new()), classifier))
    }

    pub async fn analyze(&self, text: &str) -> CommentAnalysis {
        let lexical = self.scorer.score(text);

        let toxicity = match self.classifier.classify(text).await {
            Ok(flags) => Some(flags),
            Err(e) => {
                warn!("Toxicity classification failed: {}", e);
                None
            }
        };

        CommentAnalysis {
            sentiment: SentimentSummary {
                score: lexical.score,
                comparative: lexical.comparative,
                positive_words: lexical.positive,
                negative_words: lexical.negative,
            },
            toxicity,
            word_frequency: word_frequency(text),
            topics: extract_topics(text),
        }
    }

    /// Analyzes each comment's text, results in input order.
    pub async fn analyze_many(&self, comments: &[Comment]) -> Vec<(String, CommentAnalysis)> {
        debug!("Analyzing {} comments", comments.len());
        stream::iter(comments)
            .map(|comment| async move { (comment.id.clone(), self.analyze(&comment.text).await) })
            .buffered(ANALYSIS_CONCURRENCY)
            .collect()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use chrono::{TimeZone, Utc};
    use futures_util::future::BoxFuture;

    struct FixedClassifier(ToxicityFlags);

    impl ToxicityClassifier for FixedClassifier {
        fn classify<'a>(&'a self, _text: &'a str) -> BoxFuture<'a, Result<ToxicityFlags>> {
            let flags = self.0;
            Box::pin(async move { Ok(flags) })
        }
    }

    fn comment(id: &str, text: &str) -> Comment {
        Comment {
            id: id.to_string(),
            text: text.to_string(),
            author_name: "someone".to_string(),
            author_image_url: None,
            like_count: 0,
            reply_count: 0,
            published_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            replies: vec![],
        }
    }

    #[test]
    fn test_word_frequency() {
        let frequency = word_frequency("Rust is great, really GREAT. Go rust!");
        let entries: Vec<_> = frequency.iter().map(|(w, c)| (w.as_str(), *c)).collect();
        // "is", "go" are too short, "really" is a stop word
        assert_eq!(entries, vec![("rust", 2), ("great", 2)]);
    }

    #[test]
    fn test_word_frequency_empty() {
        assert!(word_frequency("").is_empty());
        assert!(word_frequency("a an the").is_empty());
    }

    #[test]
    fn test_extract_topics() {
        let topics = extract_topics("#Rust and #rust, then #cli and #Rust again");
        assert_eq!(topics, vec!["#rust", "#cli"]);
        assert!(extract_topics("no tags").is_empty());
    }

    #[tokio::test]
    async fn test_analyze_with_classifier() {
        let flags = ToxicityFlags {
            insult: true,
            ..ToxicityFlags::default()
        };
        let analyzer = Analyzer::new(
            Box::new(AfinnLexicon::new()),
            Box::new(FixedClassifier(flags)),
        );
        let analysis = analyzer.analyze("Awesome tutorial #rust").await;
        assert_eq!(analysis.sentiment.score, 4);
        assert_eq!(analysis.sentiment.positive_words, vec!["awesome"]);
        assert_eq!(analysis.toxicity, Some(flags));
        assert_eq!(analysis.topics, vec!["#rust"]);
        assert_eq!(analysis.word_frequency.get("tutorial"), Some(&1));
    }

    #[tokio::test]
    async fn test_classifier_failure_degrades() {
        let analysis = Analyzer::offline().analyze("this is bad").await;
        assert!(analysis.toxicity.is_none());
        assert_eq!(analysis.sentiment.score, -3);
    }

    #[tokio::test]
    async fn test_from_config_without_endpoint() {
        let analyzer = Analyzer::from_config(&Config::default()).unwrap();
        assert!(analyzer.analyze("nice").await.toxicity.is_none());
    }

    #[tokio::test]
    async fn test_analyze_many_keeps_order() {
        let comments: Vec<_> = (0..20)
            .map(|i| comment(&format!("c{}", i), "good video"))
            .collect();
        let results = Analyzer::offline().analyze_many(&comments).await;
        let ids: Vec<_> = results.iter().map(|(id, _)| id.clone()).collect();
        let expected: Vec<_> = comments.iter().map(|c| c.id.clone()).collect();
        assert_eq!(ids, expected);
        assert!(results.iter().all(|(_, a)| a.sentiment.score == 3));
    }
}
