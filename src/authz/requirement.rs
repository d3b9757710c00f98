use std::{error::Error, fmt};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequirementError {
    EmptyScope,
    ScopeContainsWhitespace,
    EmptyIssuer,
}

impl fmt::Display for RequirementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequirementError::EmptyScope => write!(f, "required scope must not be empty"),
            RequirementError::ScopeContainsWhitespace => {
                write!(f, "required scope must be a single token")
            }
            RequirementError::EmptyIssuer => write!(f, "expected issuer must not be empty"),
        }
    }
}

impl Error for RequirementError {}

/// "The caller must hold `required_scope`, granted by `issuer`."
///
/// Built once at startup per protected operation and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeRequirement {
    required_scope: String,
    issuer: String,
}

impl ScopeRequirement {
    pub fn new(
        required_scope: impl Into<String>,
        issuer: impl Into<String>,
    ) -> Result<Self, RequirementError> {
        let required_scope = required_scope.into();
        let issuer = issuer.into();

        if required_scope.trim().is_empty() {
            return Err(RequirementError::EmptyScope);
        }
        // Would never match a single whitespace-delimited token.
        if required_scope.contains(char::is_whitespace) {
            return Err(RequirementError::ScopeContainsWhitespace);
        }
        if issuer.trim().is_empty() {
            return Err(RequirementError::EmptyIssuer);
        }

        Ok(Self {
            required_scope,
            issuer,
        })
    }

    pub fn required_scope(&self) -> &str {
        &self.required_scope
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }
}
