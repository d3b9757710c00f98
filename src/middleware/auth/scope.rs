//! route 単位の scope policy 強制
//!
//! - `access` middleware が extensions に入れた Principal を使って Policy を評価する
//! - Principal が無い → 401 (認証 middleware 未適用)、Deny → 403

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::authz::{AuthorizationDecision, Policy, PolicyError, Principal};
use crate::error::AppError;
use crate::state::AppState;

/// `router` の全 route に、登録済み policy `name` を要求する。
///
/// policy は起動時に解決する。未登録なら起動失敗。
pub fn require(
    router: Router<AppState>,
    state: &AppState,
    name: &str,
) -> Result<Router<AppState>, PolicyError> {
    let policy = state.policies.get(name)?;
    Ok(router.route_layer(middleware::from_fn_with_state(policy, scope_middleware)))
}

async fn scope_middleware(
    State(policy): State<Arc<Policy>>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let principal = req
        .extensions()
        .get::<Principal>()
        .ok_or(AppError::Unauthorized)?;

    match policy.evaluate(principal) {
        AuthorizationDecision::Allow => {
            tracing::debug!(
                policy = policy.name(),
                subject = principal.subject().unwrap_or("-"),
                "authorization allowed"
            );
            Ok(next.run(req).await)
        }
        AuthorizationDecision::Deny(reason) => {
            tracing::info!(
                policy = policy.name(),
                reason = reason.code(),
                subject = principal.subject().unwrap_or("-"),
                "authorization denied"
            );
            Err(AppError::Forbidden)
        }
    }
}
