use super::RankError;
use crate::models::{ProfileCandidate, RankInsights, RankQuery, RankResult};

/// Heuristic confidence reported by the keyword path. It is a term
/// count, not a semantic judgment, so it never claims full confidence.
pub const FALLBACK_CONFIDENCE: f32 = 0.65;

/// Deterministic term-frequency ranker. Runs when the semantic ranker
/// is unavailable or returned garbage, and directly for empty queries.
/// Pure function of its input, no I/O.
pub struct KeywordRanker;

impl Default for KeywordRanker {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordRanker {
    pub fn new() -> Self {
        Self
    }

    pub fn rank(&self, query: &RankQuery) -> Result<RankResult, RankError> {
        if query.candidates.is_empty() {
            return Err(RankError::InvalidRequest(
                "candidate set must not be empty".to_string(),
            ));
        }

        let text = query.text.trim();

        // Empty query means "no filter": every candidate, input order.
        if text.is_empty() {
            return Ok(RankResult {
                recommended_ids: query.candidates.iter().map(|c| c.id.clone()).collect(),
                insights: RankInsights {
                    query: query.text.clone(),
                    confidence_score: 1.0,
                    ..Default::default()
                },
                reasoning: "Showing all profiles".to_string(),
            });
        }

        let terms: Vec<String> = text
            .to_lowercase()
            .split_whitespace()
            .map(str::to_string)
            .collect();

        let mut scored: Vec<(usize, &ProfileCandidate)> = query
            .candidates
            .iter()
            .filter_map(|candidate| {
                let haystack = flatten_candidate(candidate);
                let score: usize = terms
                    .iter()
                    .map(|term| haystack.matches(term.as_str()).count())
                    .sum();
                (score > 0).then_some((score, candidate))
            })
            .collect();

        // Stable sort keeps input order among equal scores.
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        let matched = scored.len();
        let recommended_ids: Vec<String> =
            scored.into_iter().map(|(_, c)| c.id.clone()).collect();

        Ok(RankResult {
            recommended_ids,
            insights: RankInsights {
                query: query.text.clone(),
                confidence_score: FALLBACK_CONFIDENCE,
                ..Default::default()
            },
            reasoning: format!(
                "Matched {} of {} profiles by keyword frequency",
                matched,
                query.candidates.len()
            ),
        })
    }
}

/// One lowercase searchable string per candidate: name, career, bio,
/// skills, and every project's name, description and technologies.
fn flatten_candidate(candidate: &ProfileCandidate) -> String {
    let mut parts: Vec<&str> = vec![&candidate.name, &candidate.career, &candidate.bio];
    parts.extend(candidate.skills.iter().map(String::as_str));
    for project in &candidate.projects {
        parts.push(&project.name);
        parts.push(&project.description);
        parts.extend(project.technologies.iter().map(String::as_str));
    }
    parts.join(" ").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProjectSummary;

    fn candidate(id: &str, bio: &str) -> ProfileCandidate {
        ProfileCandidate {
            id: id.to_string(),
            name: format!("Student {id}"),
            career: "Ingeniería en Computación".to_string(),
            skills: vec![],
            bio: bio.to_string(),
            projects: vec![],
        }
    }

    fn query(text: &str, candidates: Vec<ProfileCandidate>) -> RankQuery {
        RankQuery {
            text: text.to_string(),
            candidates,
        }
    }

    #[test]
    fn test_empty_query_returns_all_in_input_order() {
        let ranker = KeywordRanker::new();
        let result = ranker
            .rank(&query(
                "   ",
                vec![candidate("a", ""), candidate("b", ""), candidate("c", "")],
            ))
            .unwrap();

        assert_eq!(result.recommended_ids, vec!["a", "b", "c"]);
        assert_eq!(result.insights.confidence_score, 1.0);
        assert!(result.insights.matched_skills.is_empty());
        assert!(result.insights.suggestions.is_empty());
    }

    #[test]
    fn test_keyword_scoring_selects_matching_candidate() {
        let ranker = KeywordRanker::new();
        let result = ranker
            .rank(&query(
                "python",
                vec![
                    candidate("a", "python expert"),
                    candidate("b", "java developer"),
                ],
            ))
            .unwrap();

        assert_eq!(result.recommended_ids, vec!["a"]);
        assert_eq!(result.insights.confidence_score, FALLBACK_CONFIDENCE);
    }

    #[test]
    fn test_equal_scores_keep_input_order() {
        let ranker = KeywordRanker::new();
        let result = ranker
            .rank(&query(
                "rust",
                vec![
                    candidate("first", "rust fan"),
                    candidate("second", "rust fan"),
                ],
            ))
            .unwrap();

        assert_eq!(result.recommended_ids, vec!["first", "second"]);
    }

    #[test]
    fn test_higher_frequency_ranks_first() {
        let ranker = KeywordRanker::new();
        let result = ranker
            .rank(&query(
                "rust",
                vec![
                    candidate("once", "rust"),
                    candidate("twice", "rust and more rust"),
                ],
            ))
            .unwrap();

        assert_eq!(result.recommended_ids, vec!["twice", "once"]);
    }

    #[test]
    fn test_project_technologies_are_searched() {
        let ranker = KeywordRanker::new();
        let mut with_project = candidate("match", "backend developer");
        with_project.projects.push(ProjectSummary {
            name: "Course portal".to_string(),
            description: "Web portal built with React".to_string(),
            technologies: vec!["React".to_string(), "Node.js".to_string()],
        });

        let result = ranker
            .rank(&query(
                "react node",
                vec![
                    candidate("a", "databases"),
                    with_project,
                    candidate("c", "compilers"),
                ],
            ))
            .unwrap();

        // "react" matches twice (description + technologies), "node" once.
        assert_eq!(result.recommended_ids, vec!["match"]);
    }

    #[test]
    fn test_rank_is_idempotent() {
        let ranker = KeywordRanker::new();
        let q = query(
            "python data",
            vec![
                candidate("a", "python and data science"),
                candidate("b", "data engineering"),
                candidate("c", "frontend"),
            ],
        );

        let first = ranker.rank(&q).unwrap();
        let second = ranker.rank(&q).unwrap();
        assert_eq!(first.recommended_ids, second.recommended_ids);
        assert_eq!(first.reasoning, second.reasoning);
    }

    #[test]
    fn test_empty_candidates_is_invalid_request() {
        let ranker = KeywordRanker::new();
        let err = ranker.rank(&query("python", vec![])).unwrap_err();
        assert!(matches!(err, RankError::InvalidRequest(_)));
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let ranker = KeywordRanker::new();
        let result = ranker
            .rank(&query("PYTHON", vec![candidate("a", "Python Expert")]))
            .unwrap();
        assert_eq!(result.recommended_ids, vec!["a"]);
    }
}
