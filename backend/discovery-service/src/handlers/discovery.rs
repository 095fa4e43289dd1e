use crate::error::AppError;
use crate::models::{ProfileCandidate, RankQuery};
use crate::services::discovery::{DiscoveryService, RankError};
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct SearchProfilesRequest {
    #[validate(length(max = 500, message = "query must not exceed 500 characters"))]
    pub query: String,
    #[validate(length(min = 1, message = "profiles must not be empty"))]
    pub profiles: Vec<ProfileCandidate>,
}

/// Rank the submitted profiles against the search query.
///
/// Responds 200 with the ranking whichever ranker produced it; the
/// semantic/keyword distinction never surfaces as an error here.
pub async fn search_profiles(
    service: web::Data<DiscoveryService>,
    payload: web::Json<SearchProfilesRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;
    let request = payload.into_inner();

    if request.query.trim().is_empty() {
        return Err(AppError::Validation("query must not be empty".to_string()));
    }

    let query = RankQuery {
        text: request.query,
        candidates: request.profiles,
    };

    // Both guards above make a pipeline-level InvalidRequest impossible;
    // anything that still escapes the fallback is a hard search failure.
    let result = service
        .search(&query)
        .await
        .map_err(|e: RankError| AppError::SearchFailed(e.to_string()))?;

    Ok(HttpResponse::Ok().json(result))
}
