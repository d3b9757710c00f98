/*
 * Responsibility
 * - 検証済みトークンから作られる「認証済み主体」(Principal) の型
 * - claim は (type, value, issuer) の組。1 リクエストの間は不変
 *
 * Notes
 * - 署名/exp/iss の検証は services::auth 側の責務。ここは検証後の値を持つだけ
 */
use serde_json::{Map, Value};

/// Claim type carrying OAuth2 scopes.
pub const SCOPE_CLAIM: &str = "scope";
/// Claim type carrying the subject identifier.
pub const SUBJECT_CLAIM: &str = "sub";

/// A single fact asserted about a principal by an issuer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    typ: String,
    value: String,
    issuer: String,
}

impl Claim {
    pub fn new(typ: impl Into<String>, value: impl Into<String>, issuer: impl Into<String>) -> Self {
        Self {
            typ: typ.into(),
            value: value.into(),
            issuer: issuer.into(),
        }
    }

    pub fn typ(&self) -> &str {
        &self.typ
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }
}

/// An authenticated caller, represented as the claims of its validated token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Principal {
    claims: Vec<Claim>,
}

impl Principal {
    pub fn new(claims: Vec<Claim>) -> Self {
        Self { claims }
    }

    /// Flatten a decoded JWT payload into claims, all attributed to `issuer`.
    ///
    /// - string → one claim
    /// - array → one claim per element (`null` elements skipped)
    /// - number/bool → JSON text
    /// - object → compact JSON text
    /// - `null` → no claim
    pub fn from_token_claims(issuer: &str, payload: &Map<String, Value>) -> Self {
        let mut claims = Vec::with_capacity(payload.len());

        for (typ, value) in payload {
            match value {
                Value::Array(items) => claims.extend(
                    items
                        .iter()
                        .filter_map(claim_text)
                        .map(|v| Claim::new(typ.as_str(), v, issuer)),
                ),
                other => {
                    if let Some(v) = claim_text(other) {
                        claims.push(Claim::new(typ.as_str(), v, issuer));
                    }
                }
            }
        }

        Self { claims }
    }

    pub fn find_all<'a, 't>(&'a self, typ: &'t str) -> impl Iterator<Item = &'a Claim> {
        self.claims.iter().filter(move |c| c.typ == typ)
    }

    pub fn find_first(&self, typ: &str) -> Option<&Claim> {
        self.find_all(typ).next()
    }

    pub fn subject(&self) -> Option<&str> {
        self.find_first(SUBJECT_CLAIM).map(Claim::value)
    }

    /// Every scope token granted by any issuer, in claim order, without duplicates.
    pub fn scopes(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for token in self
            .find_all(SCOPE_CLAIM)
            .flat_map(|c| c.value.split_whitespace())
        {
            if !out.contains(&token) {
                out.push(token);
            }
        }
        out
    }
}

fn claim_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(_) | Value::Number(_) | Value::Object(_) | Value::Array(_) => {
            Some(value.to_string())
        }
    }
}
