//! Scope check: does the principal hold the required scope from the expected issuer?

use super::decision::{AuthorizationDecision, DenyReason};
use super::principal::{Principal, SCOPE_CLAIM};
use super::requirement::ScopeRequirement;

/// Stateless evaluator for [`ScopeRequirement`].
///
/// Holds nothing, so one instance is shared by every in-flight request.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScopeAuthorizer;

impl ScopeAuthorizer {
    pub const fn new() -> Self {
        Self
    }

    pub fn evaluate(
        &self,
        principal: &Principal,
        requirement: &ScopeRequirement,
    ) -> AuthorizationDecision {
        let mut scope_claims = principal.find_all(SCOPE_CLAIM).peekable();
        if scope_claims.peek().is_none() {
            return AuthorizationDecision::Deny(DenyReason::NoScopeClaim);
        }

        // Issuer comparison is exact (case-sensitive).
        let mut issued = scope_claims
            .filter(|c| c.issuer() == requirement.issuer())
            .peekable();
        if issued.peek().is_none() {
            return AuthorizationDecision::Deny(DenyReason::IssuerMismatch);
        }

        let granted = issued
            .flat_map(|c| c.value().split_whitespace())
            .any(|token| token == requirement.required_scope());

        if granted {
            AuthorizationDecision::Allow
        } else {
            AuthorizationDecision::Deny(DenyReason::ScopeNotPresent)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authz::principal::Claim;

    const ISS: &str = "https://auth.example.com";

    fn principal_with_scope(value: &str) -> Principal {
        Principal::new(vec![
            Claim::new("sub", "user-1", ISS),
            Claim::new(SCOPE_CLAIM, value, ISS),
        ])
    }

    fn require(scope: &str) -> ScopeRequirement {
        ScopeRequirement::new(scope, ISS).expect("valid requirement")
    }

    #[test]
    fn allows_when_scope_is_one_of_several() {
        let p = principal_with_scope("calc:double calc:square");

        assert_eq!(
            ScopeAuthorizer.evaluate(&p, &require("calc:double")),
            AuthorizationDecision::Allow
        );
        assert_eq!(
            ScopeAuthorizer.evaluate(&p, &require("calc:square")),
            AuthorizationDecision::Allow
        );
    }

    #[test]
    fn denies_when_scope_missing_from_set() {
        let p = principal_with_scope("calc:double");

        assert_eq!(
            ScopeAuthorizer.evaluate(&p, &require("calc:square")),
            AuthorizationDecision::Deny(DenyReason::ScopeNotPresent)
        );
    }

    #[test]
    fn denies_without_any_scope_claim_regardless_of_requirement() {
        let p = Principal::new(vec![Claim::new("sub", "user-1", ISS)]);

        for scope in ["calc:double", "calc:square", "anything"] {
            assert_eq!(
                ScopeAuthorizer.evaluate(&p, &require(scope)),
                AuthorizationDecision::Deny(DenyReason::NoScopeClaim)
            );
        }
        assert_eq!(
            ScopeAuthorizer.evaluate(&Principal::default(), &require("calc:double")),
            AuthorizationDecision::Deny(DenyReason::NoScopeClaim)
        );
    }

    #[test]
    fn denies_scope_issued_by_another_authority() {
        let p = Principal::new(vec![Claim::new(
            SCOPE_CLAIM,
            "calc:double",
            "https://evil.example.com",
        )]);

        assert_eq!(
            ScopeAuthorizer.evaluate(&p, &require("calc:double")),
            AuthorizationDecision::Deny(DenyReason::IssuerMismatch)
        );
    }

    #[test]
    fn issuer_comparison_is_case_sensitive() {
        let p = Principal::new(vec![Claim::new(
            SCOPE_CLAIM,
            "calc:double",
            "https://AUTH.example.com",
        )]);

        assert_eq!(
            ScopeAuthorizer.evaluate(&p, &require("calc:double")),
            AuthorizationDecision::Deny(DenyReason::IssuerMismatch)
        );
    }

    #[test]
    fn only_claims_from_expected_issuer_count() {
        let p = Principal::new(vec![
            Claim::new(SCOPE_CLAIM, "calc:square", "https://evil.example.com"),
            Claim::new(SCOPE_CLAIM, "calc:double", ISS),
        ]);

        assert!(ScopeAuthorizer.evaluate(&p, &require("calc:double")).is_allowed());
        assert_eq!(
            ScopeAuthorizer.evaluate(&p, &require("calc:square")),
            AuthorizationDecision::Deny(DenyReason::ScopeNotPresent)
        );
    }

    #[test]
    fn token_match_is_exact_not_substring() {
        let p = principal_with_scope("calc:double calc:square");

        for scope in ["calc", "calc:", "double", "Calc:double", "calc:doubl"] {
            assert_eq!(
                ScopeAuthorizer.evaluate(&p, &require(scope)),
                AuthorizationDecision::Deny(DenyReason::ScopeNotPresent),
                "{scope} must not match"
            );
        }
    }

    #[test]
    fn splits_on_any_whitespace() {
        let p = principal_with_scope("\tcalc:double\n  calc:square  ");

        assert!(ScopeAuthorizer.evaluate(&p, &require("calc:double")).is_allowed());
        assert!(ScopeAuthorizer.evaluate(&p, &require("calc:square")).is_allowed());
    }

    #[test]
    fn empty_scope_value_grants_nothing() {
        for value in ["", "   "] {
            let p = principal_with_scope(value);
            assert_eq!(
                ScopeAuthorizer.evaluate(&p, &require("calc:double")),
                AuthorizationDecision::Deny(DenyReason::ScopeNotPresent)
            );
        }
    }

    #[test]
    fn discrete_scope_claims_are_combined() {
        let p = Principal::new(vec![
            Claim::new(SCOPE_CLAIM, "calc:double", ISS),
            Claim::new(SCOPE_CLAIM, "calc:square", ISS),
        ]);

        assert!(ScopeAuthorizer.evaluate(&p, &require("calc:square")).is_allowed());
    }

    #[test]
    fn evaluation_is_repeatable() {
        let p = principal_with_scope("calc:double");
        let r = require("calc:square");

        let first = ScopeAuthorizer.evaluate(&p, &r);
        for _ in 0..10 {
            assert_eq!(ScopeAuthorizer.evaluate(&p, &r), first);
        }
    }
}
