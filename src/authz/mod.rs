/*!
 * Scope-based authorization
 *
 * Responsibility:
 * - 検証済み Principal が、必要な scope を期待する issuer から付与されているかを判定する
 * - HTTP / axum には依存しない (middleware::auth::scope が呼び出し側)
 */

mod decision;
mod policy;
mod principal;
mod requirement;
mod scope;

pub use decision::{AuthorizationDecision, DenyReason};
pub use policy::{Policy, PolicyError, PolicyRegistry};
pub use principal::{Claim, Principal, SCOPE_CLAIM};
pub use requirement::{RequirementError, ScopeRequirement};
pub use scope::ScopeAuthorizer;

/// Policy guarding `GET /api/v1/calc/double/{value}`.
pub const CALC_DOUBLE: &str = "calc:double";
/// Policy guarding `GET /api/v1/calc/square/{value}`.
pub const CALC_SQUARE: &str = "calc:square";

/// Policies this service registers, each requiring the same-named scope from `issuer`.
pub fn default_policies(issuer: &str) -> Result<PolicyRegistry, PolicyError> {
    PolicyRegistry::builder()
        .scope_policy(CALC_DOUBLE, CALC_DOUBLE, issuer)
        .scope_policy(CALC_SQUARE, CALC_SQUARE, issuer)
        .build()
}
