/*
 * Responsibility
 * - tracing / panic hook の初期化
 * - Config読み込み → 依存生成 (TokenVerifier, PolicyRegistry) → Router 組み立て
 * - Middleware の適用 (認証は /api/v1 の保護 route に 1 回だけ)
 * - axum::serve() で起動、シグナルで graceful shutdown
 */
use std::{panic, process};

use anyhow::{Context, Result};
use axum::{Router, routing::get};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::{self, v1::handlers::health::health};
use crate::authz::{self, PolicyError};
use crate::config::Config;
use crate::middleware::{http, security_headers};
use crate::services::auth::build_token_verifier;
use crate::state::AppState;

pub fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,calc_api=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Always surface panics via tracing so they don't get "lost"
        tracing::error!(?info, "panic");

        // Development: crash the whole process so we notice immediately.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    let config = Config::from_env().context("failed to load configuration")?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        env = ?config.app_env,
        addr = %config.addr,
        authority = %config.auth_authority,
        algorithm = ?config.access_jwt_algorithm,
        validate_audience = config.auth_validate_audience,
        "starting API"
    );

    let state = build_state(&config)?;
    let app = build_router(state, &config).context("failed to build router")?;

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

pub fn build_state(config: &Config) -> Result<AppState> {
    let verifier = build_token_verifier(config).context("failed to build token verifier")?;
    let policies = authz::default_policies(&config.auth_authority)
        .context("failed to register authorization policies")?;

    tracing::info!(policies = policies.len(), "authorization policies registered");

    Ok(AppState::new(verifier, policies))
}

pub fn build_router(state: AppState, config: &Config) -> Result<Router, PolicyError> {
    let mut router = Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api::v1::routes(&state)?);

    if !config.app_env.is_production() {
        router = router.merge(api::docs::swagger());
    }

    let router = router.with_state(state);
    let router = security_headers::apply(router, config);
    Ok(http::apply(router, config))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppEnv;
    use crate::test_support::{ISSUER, PUBLIC_KEY_PEM, mint, now, token_with_scope};
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn config(app_env: AppEnv) -> Config {
        Config {
            addr: "127.0.0.1:0".parse().expect("addr"),
            app_env,
            auth_authority: ISSUER.to_string(),
            auth_audience: None,
            auth_validate_audience: false,
            access_jwt_algorithm: jsonwebtoken::Algorithm::EdDSA,
            access_jwt_public_key_pem: PUBLIC_KEY_PEM.to_string(),
            access_token_leeway_seconds: 0,
            request_timeout_seconds: 5,
            request_body_limit_bytes: 1024,
        }
    }

    fn app(app_env: AppEnv) -> Router {
        let config = config(app_env);
        let state = build_state(&config).expect("state");
        build_router(state, &config).expect("router")
    }

    async fn send(app: Router, uri: &str, token: Option<&str>) -> (StatusCode, axum::http::HeaderMap, Value) {
        let mut req = Request::builder().uri(uri);
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let res = app
            .oneshot(req.body(Body::empty()).expect("request"))
            .await
            .expect("response");

        let status = res.status();
        let headers = res.headers().clone();
        let bytes = res.into_body().collect().await.expect("body").to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, headers, json)
    }

    #[tokio::test]
    async fn health_is_public() {
        let (status, headers, body) = send(app(AppEnv::Development), "/health", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok"}));
        assert!(headers.contains_key("x-request-id"));
        assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    }

    #[tokio::test]
    async fn protected_route_without_token_is_401() {
        let (status, headers, body) =
            send(app(AppEnv::Development), "/api/v1/calc/double/21", None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(headers[header::WWW_AUTHENTICATE], "Bearer");
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn granted_scope_reaches_handler() {
        let token = token_with_scope("calc:double calc:square");

        let (status, _, body) =
            send(app(AppEnv::Development), "/api/v1/calc/double/21", Some(&token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"value": 21, "result": 42}));

        let (status, _, body) =
            send(app(AppEnv::Development), "/api/v1/calc/square/-12", Some(&token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"value": -12, "result": 144}));
    }

    #[tokio::test]
    async fn missing_scope_is_403() {
        let token = token_with_scope("calc:double");

        let (status, headers, body) =
            send(app(AppEnv::Development), "/api/v1/calc/square/3", Some(&token)).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(headers.get(header::WWW_AUTHENTICATE).is_none());
        assert_eq!(body["error"]["code"], "FORBIDDEN");
    }

    #[tokio::test]
    async fn token_without_scope_claim_is_403() {
        let token = mint(json!({"iss": ISSUER, "sub": "user-1", "exp": now() + 300}));

        let (status, _, _) =
            send(app(AppEnv::Development), "/api/v1/calc/double/1", Some(&token)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn array_scopes_are_honoured() {
        let token = mint(json!({
            "iss": ISSUER,
            "sub": "user-1",
            "exp": now() + 300,
            "scope": ["calc:square"],
        }));

        let (status, _, _) =
            send(app(AppEnv::Development), "/api/v1/calc/square/4", Some(&token)).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _, _) =
            send(app(AppEnv::Development), "/api/v1/calc/double/4", Some(&token)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn invalid_tokens_are_401() {
        let expired = mint(json!({
            "iss": ISSUER,
            "sub": "user-1",
            "exp": now() - 600,
            "scope": "calc:double",
        }));
        let foreign = mint(json!({
            "iss": "https://evil.example.com",
            "sub": "user-1",
            "exp": now() + 300,
            "scope": "calc:double",
        }));

        for token in [expired.as_str(), foreign.as_str(), "garbage"] {
            let (status, _, _) =
                send(app(AppEnv::Development), "/api/v1/calc/double/1", Some(token)).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
        }
    }

    #[tokio::test]
    async fn me_requires_authentication_only() {
        let token = mint(json!({"iss": ISSUER, "sub": "user-1", "exp": now() + 300}));

        let (status, _, body) = send(app(AppEnv::Development), "/api/v1/me", Some(&token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"subject": "user-1", "issuer": ISSUER, "scopes": []})
        );

        let (status, _, _) = send(app(AppEnv::Development), "/api/v1/me", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn invalid_operand_is_400() {
        let token = token_with_scope("calc:double");

        let (status, _, body) =
            send(app(AppEnv::Development), "/api/v1/calc/double/abc", Some(&token)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_VALUE");

        let (status, _, body) = send(
            app(AppEnv::Development),
            &format!("/api/v1/calc/double/{}", i64::MAX),
            Some(&token),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "OVERFLOW");
    }

    #[tokio::test]
    async fn unknown_route_is_404_even_without_token() {
        let (status, _, _) = send(app(AppEnv::Development), "/api/v1/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn swagger_is_served_in_development_only() {
        let (status, _, body) =
            send(app(AppEnv::Development), api::docs::OPENAPI_JSON_PATH, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/api/v1/calc/double/{value}"].is_object());

        let (status, headers, _) =
            send(app(AppEnv::Production), api::docs::OPENAPI_JSON_PATH, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(headers.contains_key(header::STRICT_TRANSPORT_SECURITY));
    }
}
