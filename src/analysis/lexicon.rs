/// Word lists used by the per-comment analysis: an AFINN-style weighted
/// sentiment lexicon and an English stop-word list.
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

/// Result of lexical scoring.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LexicalScore {
    /// Sum of matched word weights
    pub score: i32,
    /// `score` divided by token count
    pub comparative: f64,
    pub positive: Vec<String>,
    pub negative: Vec<String>,
}

/// Scores text by summing weights of known words.
pub trait LexicalScorer: Send + Sync {
    fn score(&self, text: &str) -> LexicalScore;
}

static AFINN: Lazy<HashMap<&'static str, i32>> = Lazy::new(|| {
    [
        // positive
        ("love", 3), ("loved", 3), ("loving", 2), ("like", 2), ("liked", 2),
        ("good", 3), ("great", 3), ("awesome", 4), ("amazing", 4), ("excellent", 3),
        ("fantastic", 4), ("wonderful", 4), ("best", 3), ("better", 2), ("beautiful", 3),
        ("happy", 3), ("nice", 3), ("cool", 1), ("thanks", 2), ("thank", 2),
        ("helpful", 2), ("perfect", 3), ("brilliant", 4), ("fun", 4), ("funny", 4),
        ("enjoy", 2), ("enjoyed", 2), ("lol", 3), ("haha", 3), ("wow", 4),
        ("interesting", 2), ("useful", 2), ("glad", 3), ("super", 3), ("superb", 5),
        ("outstanding", 5), ("win", 4), ("winner", 4), ("agree", 1), ("support", 2),
        ("recommend", 2), ("impressive", 3), ("hope", 2), ("yes", 1), ("cute", 2),
        ("masterpiece", 4), ("laugh", 1), ("smile", 2), ("excited", 3), ("exciting", 3),
        ("favorite", 2), ("beautifully", 3), ("appreciate", 2), ("thankful", 2),
        // negative
        ("bad", -3), ("terrible", -3), ("awful", -3), ("horrible", -3), ("hate", -3),
        ("hated", -3), ("worst", -3), ("worse", -3), ("poor", -2), ("disappointed", -2),
        ("disappointing", -2), ("waste", -1), ("wasted", -2), ("boring", -3),
        ("stupid", -2), ("useless", -2), ("wrong", -2), ("annoying", -2), ("dislike", -2),
        ("fail", -2), ("failed", -2), ("sad", -2), ("angry", -3), ("ugly", -3),
        ("crap", -3), ("sucks", -3), ("fake", -3), ("scam", -2), ("lie", -1),
        ("lies", -2), ("no", -1), ("dumb", -3), ("idiot", -3), ("hurt", -2),
        ("cry", -1), ("kill", -3), ("dead", -3), ("problem", -2), ("broken", -1),
        ("confused", -2), ("fear", -2), ("pathetic", -2), ("rude", -2),
        ("ridiculous", -3), ("nonsense", -2), ("damn", -4), ("shit", -4), ("fuck", -4),
    ]
    .into_iter()
    .collect()
});

pub static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any",
        "are", "aren't", "as", "at", "be", "because", "been", "before", "being", "below",
        "between", "both", "but", "by", "can", "cannot", "could", "couldn't", "did", "didn't",
        "do", "does", "doesn't", "doing", "don't", "down", "during", "each", "few", "for",
        "from", "further", "had", "hadn't", "has", "hasn't", "have", "haven't", "having", "he",
        "her", "here", "hers", "herself", "him", "himself", "his", "how", "i", "if", "in",
        "into", "is", "isn't", "it", "its", "itself", "just", "let's", "me", "more", "most",
        "my", "myself", "no", "nor", "not", "now", "of", "off", "on", "once", "only", "or",
        "other", "ought", "our", "ours", "ourselves", "out", "over", "own", "same", "she",
        "should", "so", "some", "such", "than", "that", "the", "their", "theirs", "them",
        "themselves", "then", "there", "these", "they", "this", "those", "through", "to",
        "too", "under", "until", "up", "very", "was", "wasn't", "we", "were", "weren't",
        "what", "when", "where", "which", "while", "who", "whom", "why", "will", "with",
        "won't", "would", "wouldn't", "you", "your", "yours", "yourself", "yourselves",
        "also", "get", "got", "really", "one", "im", "dont", "thats", "youre",
    ]
    .into_iter()
    .collect()
});

/// Bundled AFINN-style lexicon.
#[derive(Debug, Clone, Copy, Default)]
pub struct AfinnLexicon;

impl AfinnLexicon {
    pub fn new() -> Self {
        Self
    }

    fn tokenize(text: &str) -> Vec<String> {
        text.to_lowercase()
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '\'' || c == '-' {
                    c
                } else {
                    ' '
                }
            })
            .collect::<String>()
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }
}

impl LexicalScorer for AfinnLexicon {
    fn score(&self, text: &str) -> LexicalScore {
        let tokens = Self::tokenize(text);
        let mut result = LexicalScore::default();

        for token in &tokens {
            let Some(&weight) = AFINN.get(token.as_str()) else {
                continue;
            };
            result.score += weight;
            if weight > 0 {
                result.positive.push(token.clone());
            } else if weight < 0 {
                result.negative.push(token.clone());
            }
        }

        if !tokens.is_empty() {
            result.comparative = result.score as f64 / tokens.len() as f64;
        }
        result
    }
}
