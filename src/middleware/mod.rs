/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth::access (Bearer 認証), auth::scope (policy), http, security_headers
 */
pub mod auth;
pub mod http;
pub mod security_headers;
