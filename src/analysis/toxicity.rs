/// Toxicity classifier clients.
///
/// The classifier is an external model behind an HTTP endpoint. Clients are
/// constructed once and handed to the `Analyzer`; there is no lazily
/// initialized global model.
use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::error::{ExplorerError, Result};

/// Probability at or above which a label counts as a match.
pub const MATCH_THRESHOLD: f64 = 0.9;

/// The six toxicity categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToxicityFlags {
    pub toxic: bool,
    pub severe_toxic: bool,
    pub obscene: bool,
    pub threat: bool,
    pub insult: bool,
    pub identity_hate: bool,
}

impl ToxicityFlags {
    pub fn any(&self) -> bool {
        self.toxic
            || self.severe_toxic
            || self.obscene
            || self.threat
            || self.insult
            || self.identity_hate
    }

    /// (label, flag) pairs in display order.
    pub fn entries(&self) -> [(&'static str, bool); 6] {
        [
            ("Toxic", self.toxic),
            ("Severe toxic", self.severe_toxic),
            ("Obscene", self.obscene),
            ("Threat", self.threat),
            ("Insult", self.insult),
            ("Identity hate", self.identity_hate),
        ]
    }
}

/// One label prediction returned by the classifier service.
#[derive(Debug, Clone, Deserialize)]
pub struct Prediction {
    pub label: String,
    /// Explicit decision, when the service makes one
    #[serde(default, rename = "match")]
    pub is_match: Option<bool>,
    #[serde(default)]
    pub probability: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ClassifyResponse {
    predictions: Vec<Prediction>,
}

#[derive(Debug, Serialize)]
struct ClassifyRequest<'a> {
    text: &'a str,
}

/// Maps label predictions onto the six flags.
///
/// Labels are matched by name, accepting both the short ("toxic") and the
/// model's long ("toxicity") spelling. Unknown labels are ignored.
pub fn flags_from_predictions(predictions: &[Prediction], threshold: f64) -> ToxicityFlags {
    let mut flags = ToxicityFlags::default();
    for prediction in predictions {
        let matched = prediction
            .is_match
            .unwrap_or_else(|| prediction.probability.is_some_and(|p| p >= threshold));

        let slot = match prediction.label.to_ascii_lowercase().as_str() {
            "toxic" | "toxicity" => &mut flags.toxic,
            "severe_toxic" | "severe_toxicity" => &mut flags.severe_toxic,
            "obscene" => &mut flags.obscene,
            "threat" => &mut flags.threat,
            "insult" => &mut flags.insult,
            "identity_hate" | "identity_attack" => &mut flags.identity_hate,
            other => {
                debug!("Ignoring unknown toxicity label: {}", other);
                continue;
            }
        };
        *slot = matched;
    }
    flags
}

/// Classifies text into toxicity flags.
pub trait ToxicityClassifier: Send + Sync {
    fn classify<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<ToxicityFlags>>;
}

/// Classifier backed by an HTTP service.
///
/// POSTs `{"text": ...}` and expects `{"predictions": [{"label", "match"?, "probability"?}]}`.
pub struct HttpToxicityClassifier {
    client: reqwest::Client,
    endpoint: String,
    threshold: f64,
}

impl HttpToxicityClassifier {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ExplorerError::Analysis(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            threshold: MATCH_THRESHOLD,
        })
    }

    async fn classify_inner(&self, text: &str) -> Result<ToxicityFlags> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&ClassifyRequest { text })
            .send()
            .await
            .map_err(|e| ExplorerError::Analysis(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ExplorerError::Analysis(format!(
                "classifier returned {}",
                response.status()
            )));
        }

        let body: ClassifyResponse = response
            .json()
            .await
            .map_err(|e| ExplorerError::Analysis(format!("invalid classifier response: {}", e)))?;

        Ok(flags_from_predictions(&body.predictions, self.threshold))
    }
}

impl ToxicityClassifier for HttpToxicityClassifier {
    fn classify<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<ToxicityFlags>> {
        Box::pin(self.classify_inner(text))
    }
}

/// Classifier used when no endpoint is configured; always unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopClassifier;

impl ToxicityClassifier for NoopClassifier {
    fn classify<'a>(&'a self, _text: &'a str) -> BoxFuture<'a, Result<ToxicityFlags>> {
        Box::pin(async {
            Err(ExplorerError::Analysis(
                "no toxicity classifier configured".to_string(),
            ))
        })
    }
}
