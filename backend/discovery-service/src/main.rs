use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use discovery_service::services::llm;
use discovery_service::{
    handlers, BioImprover, Config, DiscoveryService, KeywordRanker, SemanticRanker,
};

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().expect("Failed to load configuration");

    tracing::info!(
        "Starting {} v{}",
        config.service.service_name,
        env!("CARGO_PKG_VERSION")
    );

    // Construct the LLM provider once and share it between the semantic
    // ranker and the bio improver. None means both degrade: keyword-only
    // search, bio improvement disabled.
    let provider = llm::from_config(&config.llm);

    let semantic = provider
        .clone()
        .map(|p| SemanticRanker::new(p, config.llm.max_tokens));
    let discovery = web::Data::new(DiscoveryService::new(semantic, KeywordRanker::new()));
    let bio_improver = web::Data::new(BioImprover::new(provider, config.llm.max_tokens));

    let port = config.service.http_port;
    let server_config = config.clone();

    let server = HttpServer::new(move || {
        // Build CORS configuration from allowed_origins
        let mut cors = Cors::default();
        for origin in server_config.cors.allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(discovery.clone())
            .app_data(bio_improver.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            // Health
            .route("/api/v1/health", web::get().to(handlers::health::health_check))
            .route(
                "/api/v1/health/live",
                web::get().to(handlers::health::liveness_check),
            )
            // Discovery
            .route(
                "/api/v1/discovery/search",
                web::post().to(handlers::discovery::search_profiles),
            )
            // Profile editing
            .route(
                "/api/v1/profiles/bio/improve",
                web::post().to(handlers::bio::improve_bio),
            )
            // OpenAPI JSON endpoint
            .route(
                "/api/v1/openapi.json",
                web::get().to(|| async {
                    use utoipa::OpenApi;
                    HttpResponse::Ok()
                        .content_type("application/json")
                        .json(discovery_service::openapi::ApiDoc::openapi())
                }),
            )
            // Swagger UI (CDN-hosted)
            .route(
                "/swagger-ui",
                web::get().to(|| async {
                    HttpResponse::Ok()
                        .content_type("text/html; charset=utf-8")
                        .body(
                            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>PerfilUAM Discovery Service API</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-standalone-preset.js"></script>
    <script>
        window.onload = function() {
            SwaggerUIBundle({
                url: "/api/v1/openapi.json",
                dom_id: '#swagger-ui',
                deepLinking: true,
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIStandalonePreset
                ],
                plugins: [
                    SwaggerUIBundle.plugins.DownloadUrl
                ],
                layout: "StandaloneLayout"
            });
        };
    </script>
</body>
</html>"#,
                        )
                }),
            )
    })
    .bind(("0.0.0.0", port))?
    .run();

    tracing::info!("discovery-service listening on 0.0.0.0:{}", port);

    server.await
}
