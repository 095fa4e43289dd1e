use crate::error::AppError;
use crate::services::bio_improver::{BioImproveError, BioImprover};
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct ImproveBioRequest {
    #[validate(length(min = 1, max = 2000, message = "text must be 1-2000 characters"))]
    pub text: String,
    pub career: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ImproveBioResponse {
    pub original: String,
    pub improved: String,
    pub tips: Vec<String>,
    pub provider: String,
}

pub async fn improve_bio(
    improver: web::Data<BioImprover>,
    payload: web::Json<ImproveBioRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;
    let request = payload.into_inner();

    let improved = improver
        .improve(&request.text, request.career.as_deref(), &request.skills)
        .await
        .map_err(|e| match e {
            BioImproveError::InvalidRequest(msg) => AppError::Validation(msg),
            BioImproveError::Disabled => {
                AppError::ServiceUnavailable("bio improver is not configured".to_string())
            }
            BioImproveError::Provider(err) => AppError::Upstream(err.to_string()),
            BioImproveError::MalformedResponse(msg) => AppError::Upstream(msg),
        })?;

    Ok(HttpResponse::Ok().json(ImproveBioResponse {
        original: request.text,
        improved: improved.improved,
        tips: improved.tips,
        provider: improved.provider,
    }))
}
