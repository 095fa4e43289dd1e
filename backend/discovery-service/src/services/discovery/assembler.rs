use crate::models::{ProfileCandidate, RankResult, MAX_RECOMMENDATIONS};
use std::collections::HashSet;
use tracing::warn;

/// Enforce the response contract on a ranking, whichever ranker
/// produced it: ids must exist in the candidate set (unknown ids are
/// dropped and logged, not errored), duplicates collapse to their first
/// occurrence, at most [`MAX_RECOMMENDATIONS`] survive, and the
/// confidence score is clamped into [0, 1].
pub fn finalize(
    mut result: RankResult,
    candidates: &[ProfileCandidate],
    query_text: &str,
) -> RankResult {
    let known: HashSet<&str> = candidates.iter().map(|c| c.id.as_str()).collect();

    let mut seen: HashSet<String> = HashSet::new();
    let mut ids: Vec<String> = Vec::new();
    for id in result.recommended_ids {
        if ids.len() == MAX_RECOMMENDATIONS {
            break;
        }
        if !known.contains(id.as_str()) {
            warn!(id = %id, "ranker recommended an unknown candidate id, dropping");
            continue;
        }
        if seen.insert(id.clone()) {
            ids.push(id);
        }
    }

    result.recommended_ids = ids;
    result.insights.query = query_text.to_string();
    result.insights.confidence_score = result.insights.confidence_score.clamp(0.0, 1.0);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RankInsights;

    fn candidates(ids: &[&str]) -> Vec<ProfileCandidate> {
        ids.iter()
            .map(|id| ProfileCandidate {
                id: id.to_string(),
                name: String::new(),
                career: String::new(),
                skills: vec![],
                bio: String::new(),
                projects: vec![],
            })
            .collect()
    }

    fn result_with_ids(ids: &[&str], confidence: f32) -> RankResult {
        RankResult {
            recommended_ids: ids.iter().map(|s| s.to_string()).collect(),
            insights: RankInsights {
                confidence_score: confidence,
                ..Default::default()
            },
            reasoning: String::new(),
        }
    }

    #[test]
    fn test_unknown_ids_are_dropped() {
        let finalized = finalize(
            result_with_ids(&["a", "ghost", "b"], 0.8),
            &candidates(&["a", "b"]),
            "q",
        );
        assert_eq!(finalized.recommended_ids, vec!["a", "b"]);
    }

    #[test]
    fn test_duplicates_keep_first_occurrence() {
        let finalized = finalize(
            result_with_ids(&["a", "b", "a"], 0.8),
            &candidates(&["a", "b"]),
            "q",
        );
        assert_eq!(finalized.recommended_ids, vec!["a", "b"]);
    }

    #[test]
    fn test_truncates_to_cap() {
        let ids: Vec<String> = (0..15).map(|i| format!("c{i}")).collect();
        let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let finalized = finalize(
            result_with_ids(&id_refs, 0.8),
            &candidates(&id_refs),
            "q",
        );
        assert_eq!(finalized.recommended_ids.len(), MAX_RECOMMENDATIONS);
        assert_eq!(finalized.recommended_ids[0], "c0");
    }

    #[test]
    fn test_confidence_is_clamped() {
        let finalized = finalize(result_with_ids(&["a"], 3.5), &candidates(&["a"]), "q");
        assert_eq!(finalized.insights.confidence_score, 1.0);

        let finalized = finalize(result_with_ids(&["a"], -0.2), &candidates(&["a"]), "q");
        assert_eq!(finalized.insights.confidence_score, 0.0);
    }

    #[test]
    fn test_query_is_echoed_into_insights() {
        let finalized = finalize(
            result_with_ids(&["a"], 0.5),
            &candidates(&["a"]),
            "rust backend",
        );
        assert_eq!(finalized.insights.query, "rust backend");
    }
}
