/*!
 * Authenticated principal extractor
 *
 * Responsibility:
 * - 認証済みリクエストの Principal を handler に提供する
 * - 型定義は authz に置き、ここは axum 依存 (FromRequestParts) だけを持つ
 */

mod core;

pub use self::core::CurrentPrincipal;
