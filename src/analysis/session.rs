/// Last-selected-wins bookkeeping for per-comment analysis.
///
/// Every selection bumps a generation counter. An analysis that finishes after
/// the user has moved on to another comment carries an older generation and
/// is dropped instead of overwriting the newer selection.
use tracing::debug;

use super::CommentAnalysis;

/// Handle for one in-flight analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub comment_id: String,
    generation: u64,
}

#[derive(Debug, Default)]
pub struct AnalysisSession {
    generation: u64,
    selected: Option<String>,
    result: Option<CommentAnalysis>,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects a comment and discards any result for the previous one.
    pub fn select(&mut self, comment_id: impl Into<String>) -> Ticket {
        self.generation += 1;
        let comment_id = comment_id.into();
        self.selected = Some(comment_id.clone());
        self.result = None;
        Ticket {
            comment_id,
            generation: self.generation,
        }
    }

    /// Stores `analysis` if `ticket` is still the current selection.
    pub fn complete(&mut self, ticket: &Ticket, analysis: CommentAnalysis) -> bool {
        if ticket.generation != self.generation {
            debug!(
                "Dropping stale analysis for comment {} (generation {}, current {})",
                ticket.comment_id, ticket.generation, self.generation
            );
            return false;
        }
        self.result = Some(analysis);
        true
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Analysis of the current selection, once it has completed.
    pub fn current(&self) -> Option<&CommentAnalysis> {
        self.result.as_ref()
    }
}
