/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - verifier: TokenVerifier, policies: PolicyRegistry
 * - Clone 前提で持つ (内部は Arc/Clone cheap)。起動後は読み取り専用
 */
use std::sync::Arc;

use crate::authz::PolicyRegistry;
use crate::services::auth::TokenVerifier;

#[derive(Clone, Debug)]
pub struct AppState {
    pub verifier: Arc<TokenVerifier>,
    pub policies: Arc<PolicyRegistry>,
}

impl AppState {
    pub fn new(verifier: Arc<TokenVerifier>, policies: PolicyRegistry) -> Self {
        Self {
            verifier,
            policies: Arc::new(policies),
        }
    }
}
