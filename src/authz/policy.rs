/*
 * Responsibility
 * - 名前付き policy (→ ScopeRequirement の集合) の登録と参照
 * - 起動時に一度だけ組み立て、以降は読み取り専用 (Arc で共有)
 */
use std::collections::HashMap;
use std::{error::Error, fmt, sync::Arc};

use super::decision::AuthorizationDecision;
use super::principal::Principal;
use super::requirement::{RequirementError, ScopeRequirement};
use super::scope::ScopeAuthorizer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    Duplicate(String),
    Unknown(String),
    Requirement {
        policy: String,
        source: RequirementError,
    },
}

impl fmt::Display for PolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyError::Duplicate(name) => write!(f, "policy '{}' registered twice", name),
            PolicyError::Unknown(name) => write!(f, "policy '{}' is not registered", name),
            PolicyError::Requirement { policy, source } => {
                write!(f, "invalid requirement in policy '{}': {}", policy, source)
            }
        }
    }
}

impl Error for PolicyError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PolicyError::Requirement { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// A named rule; allows only when every requirement allows.
#[derive(Debug, Clone)]
pub struct Policy {
    name: String,
    requirements: Vec<ScopeRequirement>,
    authorizer: ScopeAuthorizer,
}

impl Policy {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn requirements(&self) -> &[ScopeRequirement] {
        &self.requirements
    }

    /// Reports the first failing requirement's reason on deny.
    pub fn evaluate(&self, principal: &Principal) -> AuthorizationDecision {
        for requirement in &self.requirements {
            let decision = self.authorizer.evaluate(principal, requirement);
            if !decision.is_allowed() {
                return decision;
            }
        }
        AuthorizationDecision::Allow
    }
}

#[derive(Debug, Default)]
pub struct PolicyRegistryBuilder {
    policies: HashMap<String, Arc<Policy>>,
    error: Option<PolicyError>,
}

impl PolicyRegistryBuilder {
    /// Register `name` requiring `scope` from `issuer`.
    pub fn scope_policy(self, name: &str, scope: &str, issuer: &str) -> Self {
        self.policy(name, [scope], issuer)
    }

    /// Register `name` requiring all of `scopes` from `issuer`.
    pub fn policy<'a, I>(mut self, name: &str, scopes: I, issuer: &str) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        if self.error.is_some() {
            return self;
        }
        if self.policies.contains_key(name) {
            self.error = Some(PolicyError::Duplicate(name.to_string()));
            return self;
        }

        let requirements = scopes
            .into_iter()
            .map(|scope| ScopeRequirement::new(scope, issuer))
            .collect::<Result<Vec<_>, _>>();

        match requirements {
            // A policy with no requirements would allow everyone.
            Ok(requirements) if requirements.is_empty() => {
                self.error = Some(PolicyError::Requirement {
                    policy: name.to_string(),
                    source: RequirementError::EmptyScope,
                });
            }
            Ok(requirements) => {
                let policy = Policy {
                    name: name.to_string(),
                    requirements,
                    authorizer: ScopeAuthorizer::new(),
                };
                self.policies.insert(name.to_string(), Arc::new(policy));
            }
            Err(source) => {
                self.error = Some(PolicyError::Requirement {
                    policy: name.to_string(),
                    source,
                });
            }
        }
        self
    }

    pub fn build(self) -> Result<PolicyRegistry, PolicyError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(PolicyRegistry {
                policies: self.policies,
            }),
        }
    }
}

/// Policies registered at startup, static for the process lifetime.
#[derive(Debug, Clone, Default)]
pub struct PolicyRegistry {
    policies: HashMap<String, Arc<Policy>>,
}

impl PolicyRegistry {
    pub fn builder() -> PolicyRegistryBuilder {
        PolicyRegistryBuilder::default()
    }

    pub fn get(&self, name: &str) -> Result<Arc<Policy>, PolicyError> {
        self.policies
            .get(name)
            .cloned()
            .ok_or_else(|| PolicyError::Unknown(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}
