use super::RankError;
use crate::models::{ProfileCandidate, RankInsights, RankQuery, RankResult, MAX_RECOMMENDATIONS};
use crate::services::llm::{extract_json_block, LlmProvider};
use serde::Deserialize;
use std::fmt::Write;
use std::sync::Arc;

/// Project descriptions are capped in the prompt to keep the request
/// size bounded for large candidate sets.
const PROJECT_DESCRIPTION_LIMIT: usize = 100;

/// Ranks candidates by sending the query and a serialized candidate
/// list to the language-model provider and validating its JSON reply.
///
/// Every failure mode maps to a [`RankError`] variant; the discovery
/// pipeline decides whether to fall back, this adapter never does.
pub struct SemanticRanker {
    provider: Arc<dyn LlmProvider>,
    max_tokens: u32,
}

impl SemanticRanker {
    pub fn new(provider: Arc<dyn LlmProvider>, max_tokens: u32) -> Self {
        Self {
            provider,
            max_tokens,
        }
    }

    pub async fn rank(&self, query: &RankQuery) -> Result<RankResult, RankError> {
        if query.text.trim().is_empty() {
            return Err(RankError::InvalidRequest(
                "query text must not be empty".to_string(),
            ));
        }
        if query.candidates.is_empty() {
            return Err(RankError::InvalidRequest(
                "candidate set must not be empty".to_string(),
            ));
        }

        let prompt = build_rank_prompt(query);

        let response = self
            .provider
            .complete(&prompt, self.max_tokens)
            .await
            .map_err(|e| RankError::RankerUnavailable(e.to_string()))?;

        parse_rank_response(&response, &query.text)
    }
}

fn build_rank_prompt(query: &RankQuery) -> String {
    let mut blocks = String::new();
    for candidate in &query.candidates {
        let _ = write!(blocks, "{}", candidate_block(candidate));
    }

    format!(
        r#"You are the search assistant of a university student directory. A visitor is looking for student profiles.

SEARCH QUERY:
{query}

CANDIDATE PROFILES:
{blocks}
TASK:
1. Extract the requirements implied by the query (skills, technologies, career, project experience).
2. Score every candidate from 0 to 100 for relevance to those requirements.
3. Select at most {max} candidate ids, ordered by descending score. Omit candidates that are clearly irrelevant.

Respond with a single JSON object in exactly this format:
{{
  "recommendedIds": ["candidate ids ordered by descending relevance"],
  "insights": {{
    "query": "the original query",
    "matchedSkills": ["skills from the profiles that match the query"],
    "matchedProjects": ["project names that match the query"],
    "confidenceScore": 0.85,
    "suggestions": ["up to 3 ways the visitor could sharpen the query"]
  }},
  "reasoning": "one or two sentences explaining the ranking"
}}

"confidenceScore" must be a number between 0 and 1. Return ONLY valid JSON, no other text."#,
        query = query.text,
        blocks = blocks,
        max = MAX_RECOMMENDATIONS,
    )
}

fn candidate_block(candidate: &ProfileCandidate) -> String {
    let mut block = format!(
        "[{id}]\nName: {name}\nCareer: {career}\nSkills: {skills}\nBio: {bio}\n",
        id = candidate.id,
        name = candidate.name,
        career = candidate.career,
        skills = candidate.skills.join(", "),
        bio = candidate.bio,
    );

    if !candidate.projects.is_empty() {
        block.push_str("Projects:\n");
        for project in &candidate.projects {
            let _ = writeln!(
                block,
                "- {}: {} [{}]",
                project.name,
                truncate_chars(&project.description, PROJECT_DESCRIPTION_LIMIT),
                project.technologies.join(", "),
            );
        }
    }

    block.push('\n');
    block
}

fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawRankResponse {
    recommended_ids: Vec<String>,
    insights: RawInsights,
    reasoning: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawInsights {
    matched_skills: Vec<String>,
    matched_projects: Vec<String>,
    confidence_score: f32,
    suggestions: Vec<String>,
}

/// Strict validation of the provider reply.
///
/// A reply that is not JSON at all counts as the provider being
/// unavailable; a JSON reply without a usable `recommendedIds` array is
/// malformed. Everything else is defaulted and left to the assembler.
fn parse_rank_response(response: &str, query_text: &str) -> Result<RankResult, RankError> {
    let json = extract_json_block(response).trim();

    let value: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| RankError::RankerUnavailable(format!("completion is not valid JSON: {e}")))?;

    let object = value.as_object().ok_or_else(|| {
        RankError::MalformedResponse("completion is not a JSON object".to_string())
    })?;

    match object.get("recommendedIds") {
        Some(ids) if ids.is_array() => {}
        Some(_) => {
            return Err(RankError::MalformedResponse(
                "recommendedIds is not an array".to_string(),
            ))
        }
        None => {
            return Err(RankError::MalformedResponse(
                "recommendedIds is missing".to_string(),
            ))
        }
    }

    let raw: RawRankResponse = serde_json::from_value(value)
        .map_err(|e| RankError::MalformedResponse(format!("unexpected field types: {e}")))?;

    Ok(RankResult {
        recommended_ids: raw.recommended_ids,
        insights: RankInsights {
            query: query_text.to_string(),
            matched_skills: raw.insights.matched_skills,
            matched_projects: raw.insights.matched_projects,
            confidence_score: raw.insights.confidence_score,
            suggestions: raw.insights.suggestions,
        },
        reasoning: raw.reasoning,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProjectSummary;
    use crate::services::llm::MockLlmProvider;

    fn sample_query() -> RankQuery {
        RankQuery {
            text: "react developer".to_string(),
            candidates: vec![ProfileCandidate {
                id: "p1".to_string(),
                name: "Ana Torres".to_string(),
                career: "Ingeniería en Computación".to_string(),
                skills: vec!["React".to_string(), "TypeScript".to_string()],
                bio: "Frontend enthusiast".to_string(),
                projects: vec![ProjectSummary {
                    name: "Kiosko".to_string(),
                    description: "x".repeat(300),
                    technologies: vec!["React".to_string()],
                }],
            }],
        }
    }

    #[test]
    fn test_prompt_contains_query_and_candidate_fields() {
        let prompt = build_rank_prompt(&sample_query());
        assert!(prompt.contains("react developer"));
        assert!(prompt.contains("[p1]"));
        assert!(prompt.contains("React, TypeScript"));
        assert!(prompt.contains("recommendedIds"));
    }

    #[test]
    fn test_prompt_truncates_project_descriptions() {
        let prompt = build_rank_prompt(&sample_query());
        assert!(!prompt.contains(&"x".repeat(PROJECT_DESCRIPTION_LIMIT + 1)));
        assert!(prompt.contains(&"x".repeat(PROJECT_DESCRIPTION_LIMIT)));
    }

    #[test]
    fn test_parse_valid_response() {
        let reply = r#"{
            "recommendedIds": ["p1"],
            "insights": {
                "query": "react developer",
                "matchedSkills": ["React"],
                "matchedProjects": ["Kiosko"],
                "confidenceScore": 0.9,
                "suggestions": []
            },
            "reasoning": "Strong React match"
        }"#;

        let result = parse_rank_response(reply, "react developer").unwrap();
        assert_eq!(result.recommended_ids, vec!["p1"]);
        assert_eq!(result.insights.matched_skills, vec!["React"]);
        assert_eq!(result.reasoning, "Strong React match");
    }

    #[test]
    fn test_parse_fenced_response() {
        let reply = "```json\n{\"recommendedIds\": [\"p1\"]}\n```";
        let result = parse_rank_response(reply, "q").unwrap();
        assert_eq!(result.recommended_ids, vec!["p1"]);
        // Missing insight fields come back defaulted, never absent.
        assert!(result.insights.matched_skills.is_empty());
        assert_eq!(result.insights.query, "q");
    }

    #[test]
    fn test_parse_non_json_is_unavailable() {
        let err = parse_rank_response("I could not rank the profiles.", "q").unwrap_err();
        assert!(matches!(err, RankError::RankerUnavailable(_)));
    }

    #[test]
    fn test_parse_missing_recommended_ids_is_malformed() {
        let err = parse_rank_response(r#"{"reasoning": "no ids"}"#, "q").unwrap_err();
        assert!(matches!(err, RankError::MalformedResponse(_)));
    }

    #[test]
    fn test_parse_non_array_recommended_ids_is_malformed() {
        let err = parse_rank_response(r#"{"recommendedIds": "p1"}"#, "q").unwrap_err();
        assert!(matches!(err, RankError::MalformedResponse(_)));
    }

    #[test]
    fn test_parse_non_object_is_malformed() {
        let err = parse_rank_response("[1, 2, 3]", "q").unwrap_err();
        assert!(matches!(err, RankError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_rank_rejects_empty_query_before_calling_provider() {
        let mut provider = MockLlmProvider::new();
        provider.expect_complete().times(0);

        let ranker = SemanticRanker::new(Arc::new(provider), 1024);
        let err = ranker
            .rank(&RankQuery {
                text: "  ".to_string(),
                candidates: sample_query().candidates,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, RankError::InvalidRequest(_)));
    }
}
