use serde::{Deserialize, Serialize};

/// Hard cap on the number of ids a ranking may return, enforced on every
/// path before the response leaves the service.
pub const MAX_RECOMMENDATIONS: usize = 10;

/// One student profile under consideration for a discovery query.
///
/// Candidates are supplied by the caller per request and never persisted
/// here; `id` only has to be unique within a single request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileCandidate {
    pub id: String,
    pub name: String,
    pub career: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub projects: Vec<ProjectSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
}

/// A discovery query plus the candidate set to rank against it.
#[derive(Debug, Clone)]
pub struct RankQuery {
    pub text: String,
    pub candidates: Vec<ProfileCandidate>,
}

/// Ranked outcome of a discovery query, produced by either ranker and
/// normalized by the assembler before it is returned.
///
/// `recommended_ids` is a subset of the candidate ids, free of
/// duplicates, at most [`MAX_RECOMMENDATIONS`] long, ordered by
/// descending relevance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankResult {
    pub recommended_ids: Vec<String>,
    pub insights: RankInsights,
    pub reasoning: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankInsights {
    pub query: String,
    pub matched_skills: Vec<String>,
    pub matched_projects: Vec<String>,
    pub confidence_score: f32,
    pub suggestions: Vec<String>,
}
