//! access token (JWT) 検証 → Principal を extensions に入れる
//!
//! - `Authorization: Bearer <jwt>` の署名 / iss / exp / nbf / typ を TokenVerifier で検証する
//! - 失敗は全て 401 (理由はログにのみ出す)
//! - 認可 (scope) はここでは行わない。`middleware::auth::scope` が route 単位で担当する

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::state::AppState;

/// 保護対象の routes に認証を掛ける。
///
/// `route_layer` なので、未定義パスは認証なしで 404 になる。
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.route_layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(req.headers()).ok_or(AppError::Unauthorized)?;

    let principal = match state.verifier.authenticate(token) {
        Ok(principal) => principal,
        Err(err) => {
            tracing::warn!(
                error = %err,
                "access token verification failed"
            );
            return Err(AppError::Unauthorized);
        }
    };

    tracing::debug!(
        subject = principal.subject().unwrap_or("-"),
        "access token verified"
    );

    // middleware → extractor / scope middleware への受け渡し
    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}

/// Scheme match is case-insensitive (RFC 7235); the token itself must be non-empty.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
