use super::types::*;

#[derive(Debug, Clone)]
pub struct Account {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password: HashedPassword,
    pub active: bool,
}

/// The part of an account that may leave the service.
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(serde::Serialize)]
pub struct AccountSummary {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
}

impl From<&Account> for AccountSummary {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            username: account.username.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(serde::Serialize)]
pub struct ScopeRecord {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct NewScope {
    pub name: String,
    pub description: String,
    pub value: String,
}

/// Partial update of a scope; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct ScopeChanges {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl ScopeChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

/// An issued access or refresh token. The value itself stays with the store.
#[derive(Debug, Clone)]
pub struct Token {
    pub id: i32,
    pub kind: TokenKind,
    pub active: bool,
    pub created_at: i64,
    pub expires_at: i64,
    pub account_id: i32,
}
