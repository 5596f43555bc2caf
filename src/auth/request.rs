use crate::core::types::{Scope, ScopeIdentifier, TokenValue};

/// Every operation a message can ask for, keyed by its `action` field.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Deserialize)]
#[serde(tag = "action")]
#[serde(rename_all = "snake_case")]
pub enum Request {
    ValidateToken(TokenValidation),
    AddScope(ScopeCreation),
    CheckScope(ScopeLookup),
    EditScope(ScopeUpdate),
    DeleteScope(ScopeLookup),
}

#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Deserialize)]
pub struct TokenValidation {
    pub token: TokenValue,
    #[serde(default, alias = "scope")]
    pub scopes: Option<Scope>,
}

#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Deserialize)]
pub struct ScopeCreation {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(alias = "scope_string_value")]
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Deserialize)]
pub struct ScopeLookup {
    pub scope_identifier: ScopeIdentifier,
}

#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Deserialize)]
pub struct ScopeUpdate {
    pub scope_identifier: ScopeIdentifier,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug)]
#[derive(thiserror::Error)]
pub enum RequestError {
    #[error("{0}")]
    Decode(#[from] serde_json::Error),
    #[error("{0}")]
    Invalid(&'static str),
}

impl Request {
    /// Decode a raw message payload. No side effects.
    pub fn from_slice(message: &[u8]) -> Result<Self, RequestError> {
        let request: Request = serde_json::from_slice(message)?;
        request.check()?;
        Ok(request)
    }

    pub fn action(&self) -> &'static str {
        match self {
            Self::ValidateToken(_) => "validate_token",
            Self::AddScope(_) => "add_scope",
            Self::CheckScope(_) => "check_scope",
            Self::EditScope(_) => "edit_scope",
            Self::DeleteScope(_) => "delete_scope",
        }
    }

    /// Field rules serde cannot express.
    pub fn check(&self) -> Result<(), RequestError> {
        match self {
            Self::ValidateToken(req) => {
                if req.token.0.is_empty() {
                    return Err(RequestError::Invalid("token must not be empty"));
                }
            }
            Self::AddScope(req) => {
                if req.name.trim().is_empty() {
                    return Err(RequestError::Invalid("scope name must not be empty"));
                }
                if req.value.is_empty() || req.value.contains(char::is_whitespace) {
                    return Err(RequestError::Invalid(
                        "scope value must be a single non-empty word",
                    ));
                }
            }
            Self::EditScope(req) => {
                if matches!(&req.name, Some(name) if name.trim().is_empty()) {
                    return Err(RequestError::Invalid("scope name must not be empty"));
                }
            }
            Self::CheckScope(_) | Self::DeleteScope(_) => {}
        }
        Ok(())
    }
}
