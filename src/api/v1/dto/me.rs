/*
 * Responsibility
 * - GET /me の response DTO (Principal → 公開してよい項目だけ)
 */
use serde::Serialize;
use utoipa::ToSchema;

use crate::authz::Principal;

#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    pub subject: Option<String>,
    pub issuer: Option<String>,
    /// Granted scope tokens, deduplicated.
    pub scopes: Vec<String>,
}

impl From<&Principal> for MeResponse {
    fn from(p: &Principal) -> Self {
        Self {
            subject: p.subject().map(str::to_string),
            issuer: p.find_first("iss").map(|c| c.value().to_string()),
            scopes: p.scopes().into_iter().map(str::to_string).collect(),
        }
    }
}
