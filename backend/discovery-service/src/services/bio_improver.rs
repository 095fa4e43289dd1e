use crate::services::llm::{extract_json_block, LlmError, LlmProvider};
use serde::Deserialize;
use std::fmt::Write;
use std::sync::Arc;
use thiserror::Error;

/// Drafts longer than this are rejected before any provider call.
pub const MAX_BIO_LENGTH: usize = 2000;

#[derive(Debug, Error)]
pub enum BioImproveError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("bio improver is not configured")]
    Disabled,

    #[error("provider call failed: {0}")]
    Provider(#[from] LlmError),

    #[error("provider reply failed validation: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Clone)]
pub struct ImprovedBio {
    pub improved: String,
    pub tips: Vec<String>,
    pub provider: String,
}

/// Rewrites a student's draft bio into a sharper professional one.
/// Unlike the discovery flow there is no deterministic fallback; the
/// handler surfaces provider failures as upstream errors.
pub struct BioImprover {
    provider: Option<Arc<dyn LlmProvider>>,
    max_tokens: u32,
}

impl BioImprover {
    pub fn new(provider: Option<Arc<dyn LlmProvider>>, max_tokens: u32) -> Self {
        Self {
            provider,
            max_tokens,
        }
    }

    pub fn enabled(&self) -> bool {
        self.provider.is_some()
    }

    pub async fn improve(
        &self,
        text: &str,
        career: Option<&str>,
        skills: &[String],
    ) -> Result<ImprovedBio, BioImproveError> {
        let draft = text.trim();
        if draft.is_empty() {
            return Err(BioImproveError::InvalidRequest(
                "bio text must not be empty".to_string(),
            ));
        }
        if draft.chars().count() > MAX_BIO_LENGTH {
            return Err(BioImproveError::InvalidRequest(format!(
                "bio text must not exceed {MAX_BIO_LENGTH} characters"
            )));
        }

        let provider = self.provider.as_ref().ok_or(BioImproveError::Disabled)?;

        let prompt = build_improve_prompt(draft, career, skills);
        let response = provider.complete(&prompt, self.max_tokens).await?;
        let raw = parse_improve_response(&response)?;

        Ok(ImprovedBio {
            improved: raw.improved_bio,
            tips: raw.tips,
            provider: provider.name().to_string(),
        })
    }
}

fn build_improve_prompt(draft: &str, career: Option<&str>, skills: &[String]) -> String {
    let mut context = String::new();
    if let Some(career) = career {
        let _ = writeln!(context, "Career: {career}");
    }
    if !skills.is_empty() {
        let _ = writeln!(context, "Skills: {}", skills.join(", "));
    }

    format!(
        r#"You help university students present themselves in a professional directory. Improve this draft bio: keep it truthful to the draft, first person, concise (at most 3 sentences), and oriented to recruiters. Do not invent experience the draft does not mention.

{context}DRAFT BIO:
{draft}

Respond with a single JSON object in exactly this format:
{{
  "improvedBio": "the rewritten bio",
  "tips": ["up to 3 short writing tips for the student"]
}}

Return ONLY valid JSON, no other text."#
    )
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawImproveResponse {
    improved_bio: String,
    tips: Vec<String>,
}

fn parse_improve_response(response: &str) -> Result<RawImproveResponse, BioImproveError> {
    let json = extract_json_block(response).trim();

    let raw: RawImproveResponse = serde_json::from_str(json)
        .map_err(|e| BioImproveError::MalformedResponse(format!("reply is not valid JSON: {e}")))?;

    if raw.improved_bio.trim().is_empty() {
        return Err(BioImproveError::MalformedResponse(
            "improvedBio is missing or empty".to_string(),
        ));
    }

    Ok(raw)
}
