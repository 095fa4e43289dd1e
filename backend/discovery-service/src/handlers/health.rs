use crate::services::DiscoveryService;
use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    semantic_ranker: String,
    timestamp: String,
}

/// Basic health check. The service holds no connections, so this only
/// reports whether the semantic ranker is configured.
pub async fn health_check(service: web::Data<DiscoveryService>) -> impl Responder {
    let semantic_ranker = if service.semantic_enabled() {
        "enabled"
    } else {
        "disabled"
    };

    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        semantic_ranker: semantic_ranker.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

pub async fn liveness_check() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({"alive": true}))
}
