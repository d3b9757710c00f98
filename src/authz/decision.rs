/// Why a requirement was not satisfied. These are ordinary outcomes, not faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DenyReason {
    /// The principal carries no scope claim at all.
    NoScopeClaim,
    /// Scope claims exist, but none from the expected issuer.
    IssuerMismatch,
    /// Scope claim from the expected issuer lacks the required token.
    ScopeNotPresent,
}

impl DenyReason {
    pub fn code(&self) -> &'static str {
        match self {
            DenyReason::NoScopeClaim => "no_scope_claim",
            DenyReason::IssuerMismatch => "issuer_mismatch",
            DenyReason::ScopeNotPresent => "scope_not_present",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[must_use]
pub enum AuthorizationDecision {
    Allow,
    Deny(DenyReason),
}

impl AuthorizationDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AuthorizationDecision::Allow)
    }
}
