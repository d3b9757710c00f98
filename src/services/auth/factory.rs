/// Factory: build `TokenVerifier` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::{AccessJwtError, TokenVerifier, VerifierSettings};

pub fn build_token_verifier(config: &Config) -> Result<Arc<TokenVerifier>, AccessJwtError> {
    let audience = if config.auth_validate_audience {
        config.auth_audience.clone()
    } else {
        None
    };

    let verifier = TokenVerifier::new(&VerifierSettings {
        algorithm: config.access_jwt_algorithm,
        public_key_pem: config.access_jwt_public_key_pem.clone(),
        issuer: config.auth_authority.clone(),
        audience,
        leeway_seconds: config.access_token_leeway_seconds,
    })?;

    Ok(Arc::new(verifier))
}
