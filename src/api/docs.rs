//! OpenAPI document + Swagger UI (development only).

use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::v1::{dto, handlers};
use crate::state::AppState;

pub const SWAGGER_UI_PATH: &str = "/swagger-ui";
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

/// Adds the `bearer_auth` JWT scheme referenced by the protected operations.
#[derive(Debug)]
pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,
        handlers::me::me,
        handlers::calc::double,
        handlers::calc::square,
    ),
    components(schemas(dto::calc::CalcResponse, dto::me::MeResponse)),
    modifiers(&SecurityAddon),
    tags(
        (name = "calc", description = "Scope-protected arithmetic"),
        (name = "identity", description = "Authenticated caller"),
        (name = "health", description = "Liveness"),
    ),
    info(title = "calc-api", version = "0.1.0")
)]
pub struct ApiDoc;

pub fn swagger() -> Router<AppState> {
    SwaggerUi::new(SWAGGER_UI_PATH)
        .url(OPENAPI_JSON_PATH, ApiDoc::openapi())
        .into()
}
