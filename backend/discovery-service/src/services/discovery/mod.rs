// ============================================
// Profile Discovery Pipeline
// ============================================
//
// Two-step flow: try the semantic ranker, recover with the
// deterministic keyword ranker when the provider is unreachable or its
// reply fails validation. Only a contract violation (empty candidate
// set) escapes to the handler.

pub mod assembler;
pub mod keyword;
pub mod semantic;

pub use keyword::KeywordRanker;
pub use semantic::SemanticRanker;

use crate::models::{RankQuery, RankResult};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum RankError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("semantic ranker unavailable: {0}")]
    RankerUnavailable(String),

    #[error("malformed ranker response: {0}")]
    MalformedResponse(String),
}

/// Generic guidance attached only when the keyword ranker substituted
/// for a failed (or unconfigured) semantic ranking.
const FALLBACK_SUGGESTIONS: [&str; 2] = [
    "Try more specific search terms",
    "Mention concrete technologies or skills",
];

pub struct DiscoveryService {
    semantic: Option<SemanticRanker>,
    keyword: KeywordRanker,
}

impl DiscoveryService {
    pub fn new(semantic: Option<SemanticRanker>, keyword: KeywordRanker) -> Self {
        Self { semantic, keyword }
    }

    pub fn semantic_enabled(&self) -> bool {
        self.semantic.is_some()
    }

    /// Rank `query.candidates` against `query.text`. The returned
    /// result always satisfies the response contract (subset ids, no
    /// duplicates, capped length, clamped confidence).
    pub async fn search(&self, query: &RankQuery) -> Result<RankResult, RankError> {
        if query.candidates.is_empty() {
            return Err(RankError::InvalidRequest(
                "candidate set must not be empty".to_string(),
            ));
        }

        // Trivial queries skip the provider entirely.
        if query.text.trim().is_empty() {
            let result = self.keyword.rank(query)?;
            return Ok(assembler::finalize(result, &query.candidates, &query.text));
        }

        if let Some(semantic) = &self.semantic {
            match semantic.rank(query).await {
                Ok(result) => {
                    return Ok(assembler::finalize(result, &query.candidates, &query.text));
                }
                Err(err @ RankError::InvalidRequest(_)) => return Err(err),
                Err(err) => {
                    warn!(error = %err, "semantic ranking failed, falling back to keyword ranking");
                }
            }
        } else {
            debug!("semantic ranker not configured, using keyword ranking");
        }

        let mut result = self.keyword.rank(query)?;
        result.insights.suggestions = FALLBACK_SUGGESTIONS
            .iter()
            .map(|s| s.to_string())
            .collect();
        Ok(assembler::finalize(result, &query.candidates, &query.text))
    }
}
