/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - 全 route に Bearer 認証 (1 回だけ)、calc route には scope policy を route 単位で適用
 */
use axum::{Router, routing::get};

use crate::authz::{CALC_DOUBLE, CALC_SQUARE, PolicyError};
use crate::middleware::auth::{access, scope};
use crate::state::AppState;

use crate::api::v1::handlers::{
    calc::{double, square},
    me::me,
};

pub fn routes(state: &AppState) -> Result<Router<AppState>, PolicyError> {
    let double_routes = scope::require(
        Router::new().route("/calc/double/{value}", get(double)),
        state,
        CALC_DOUBLE,
    )?;
    let square_routes = scope::require(
        Router::new().route("/calc/square/{value}", get(square)),
        state,
        CALC_SQUARE,
    )?;

    let protected = Router::new()
        .route("/me", get(me))
        .merge(double_routes)
        .merge(square_routes);

    // layer 順: access (外側) → scope (route_layer, 内側) → handler
    Ok(access::apply(protected, state.clone()))
}
