use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde_json::{Map, Value};
use std::{error::Error as StdError, fmt};

use crate::authz::Principal;

/// Only tokens with this `typ` header are accepted.
pub const ACCEPTED_TOKEN_TYPE: &str = "JWT";

// Errors returned by access-token verification.
#[derive(Debug)]
pub enum AccessJwtError {
    Jwt(jsonwebtoken::errors::Error),
    InvalidKey(jsonwebtoken::errors::Error),
    UnsupportedAlgorithm(Algorithm),
    InvalidTokenType(Option<String>),
    EmptyClaim(&'static str),
}

impl fmt::Display for AccessJwtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jwt(e) => write!(f, "jwt verification failed: {}", e),
            Self::InvalidKey(e) => write!(f, "invalid public key pem: {}", e),
            Self::UnsupportedAlgorithm(alg) => write!(f, "unsupported algorithm: {:?}", alg),
            Self::InvalidTokenType(Some(typ)) => write!(f, "invalid token type '{}'", typ),
            Self::InvalidTokenType(None) => write!(f, "missing token type"),
            Self::EmptyClaim(name) => write!(f, "empty '{}' claim", name),
        }
    }
}

impl StdError for AccessJwtError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Jwt(e) | Self::InvalidKey(e) => Some(e),
            _ => None,
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AccessJwtError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        Self::Jwt(e)
    }
}

/// Settings for [`TokenVerifier::new`].
#[derive(Debug, Clone)]
pub struct VerifierSettings {
    pub algorithm: Algorithm,
    pub public_key_pem: String,
    pub issuer: String,
    /// `Some` enables audience validation.
    pub audience: Option<String>,
    pub leeway_seconds: u64,
}

/// Access-token verifier for a single authority and a statically configured key.
///
/// `jsonwebtoken::Validation` checks the signature, `exp`, `nbf` and `iss`;
/// this type adds the `typ` header check and turns the payload into a [`Principal`].
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
}

impl fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("TokenVerifier")
            .field("issuer", &self.issuer)
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenVerifier {
    pub fn new(settings: &VerifierSettings) -> Result<Self, AccessJwtError> {
        let pem = settings.public_key_pem.as_bytes();
        let decoding_key = match settings.algorithm {
            Algorithm::EdDSA => DecodingKey::from_ed_pem(pem),
            Algorithm::RS256
            | Algorithm::RS384
            | Algorithm::RS512
            | Algorithm::PS256
            | Algorithm::PS384
            | Algorithm::PS512 => DecodingKey::from_rsa_pem(pem),
            Algorithm::ES256 | Algorithm::ES384 => DecodingKey::from_ec_pem(pem),
            // Shared secrets have no place in a resource server trusting an external authority.
            other => return Err(AccessJwtError::UnsupportedAlgorithm(other)),
        }
        .map_err(AccessJwtError::InvalidKey)?;

        let mut validation = Validation::new(settings.algorithm);
        validation.set_issuer(&[settings.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss"]);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = settings.leeway_seconds;
        match &settings.audience {
            Some(aud) => validation.set_audience(&[aud.as_str()]),
            None => validation.validate_aud = false,
        }

        Ok(Self {
            decoding_key,
            validation,
            issuer: settings.issuer.clone(),
        })
    }

    /// Verify and decode a JWT access token into its raw payload.
    pub fn verify(&self, token: &str) -> Result<Map<String, Value>, AccessJwtError> {
        let header = jsonwebtoken::decode_header(token)?;
        if header.typ.as_deref() != Some(ACCEPTED_TOKEN_TYPE) {
            return Err(AccessJwtError::InvalidTokenType(header.typ));
        }

        let data = jsonwebtoken::decode::<Map<String, Value>>(
            token,
            &self.decoding_key,
            &self.validation,
        )?;

        Ok(data.claims)
    }

    /// Verify, then convert the payload into the principal handed to authorization.
    ///
    /// This is the recommended entry-point for middleware.
    pub fn authenticate(&self, token: &str) -> Result<Principal, AccessJwtError> {
        let claims = self.verify(token)?;

        // `iss` has already been matched against the configured authority.
        let issuer = claims
            .get("iss")
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .ok_or(AccessJwtError::EmptyClaim("iss"))?
            .to_string();

        Ok(Principal::from_token_claims(&issuer, &claims))
    }
}
