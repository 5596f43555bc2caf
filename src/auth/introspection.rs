use crate::core::models::{Account, AccountSummary, Token};
use crate::core::types::{Scope, TokenKind};

/// Why an introspection did not end in an active token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    NoTokenFound,
    TokenExpired,
    #[serde(rename = "token_not_alive")]
    TokenUsedBeforeCreation,
    TokenRevoked,
    NoUserAssociated,
    UserDisabled,
    InsufficientScope,
}

#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize)]
pub struct IntrospectionResult {
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<Scope>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_type: Option<TokenKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<AccountSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<FailureReason>,
}

impl IntrospectionResult {
    pub fn inactive(reason: FailureReason) -> Self {
        Self {
            active: false,
            scope: None,
            token_type: None,
            exp: None,
            iat: None,
            username: None,
            account: None,
            reason: Some(reason),
        }
    }

    pub fn active(token: &Token, account: &Account, scope: Scope) -> Self {
        Self {
            active: true,
            scope: Some(scope),
            token_type: Some(token.kind),
            exp: Some(token.expires_at),
            iat: Some(token.created_at),
            username: Some(account.username.clone()),
            account: Some(account.into()),
            reason: None,
        }
    }
}
