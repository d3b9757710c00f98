/*
 * Responsibility
 * - GET /api/v1/me: 認証のみ (scope policy なし) の route
 */
use axum::Json;

use crate::api::v1::dto::me::MeResponse;
use crate::api::v1::extractors::CurrentPrincipal;

#[utoipa::path(
    get,
    path = "/api/v1/me",
    tag = "identity",
    responses(
        (status = 200, description = "Caller identity", body = MeResponse),
        (status = 401, description = "Missing or invalid bearer token"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn me(CurrentPrincipal(principal): CurrentPrincipal) -> Json<MeResponse> {
    Json(MeResponse::from(&principal))
}
