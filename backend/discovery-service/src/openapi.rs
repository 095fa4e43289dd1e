/// OpenAPI documentation for the PerfilUAM Discovery Service
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "PerfilUAM Discovery Service API",
        version = "1.0.0",
        description = "Profile discovery: semantic ranking of student profiles with a deterministic keyword fallback, plus AI-assisted bio improvement",
        contact(
            name = "PerfilUAM Team",
            email = "equipo@perfiluam.mx"
        ),
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8097", description = "Development server"),
        (url = "https://api.perfiluam.mx/discovery", description = "Production server"),
    ),
    tags(
        (name = "Health", description = "Service health checks"),
        (name = "Discovery", description = "Profile search and ranking"),
        (name = "Profiles", description = "AI-assisted profile editing"),
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    pub fn openapi_json_path() -> &'static str {
        "/api/v1/openapi.json"
    }
}
