use crate::core::models::{Account, NewScope, ScopeChanges, ScopeRecord, Token};
use crate::core::types::{HashedTokenValue, ScopeIdentifier};
use crate::provider::error::Error;

pub mod error;
pub mod introspection;
pub mod request;

pub use introspection::{FailureReason, IntrospectionResult};
pub use request::{Request, ScopeCreation, ScopeLookup, ScopeUpdate, TokenValidation};

/// Access to accounts, tokens and scopes.
///
/// Calls block until the backing store answers. Uniqueness of scope names and values is the
/// store's job: `insert_scope` reports a clash as `Error::Constraint`.
pub trait Store {
    fn get_token(&self, value: &HashedTokenValue) -> Result<Option<Token>, Error>;
    fn get_account(&self, id: i32) -> Result<Option<Account>, Error>;
    fn get_scope(&self, identifier: &ScopeIdentifier) -> Result<Option<ScopeRecord>, Error>;
    fn list_scopes(&self) -> Result<Vec<ScopeRecord>, Error>;
    fn list_token_scopes(&self, token: &Token) -> Result<Vec<ScopeRecord>, Error>;
    fn insert_scope(&self, scope: NewScope) -> Result<ScopeRecord, Error>;
    fn update_scope(&self, id: i32, changes: ScopeChanges) -> Result<ScopeRecord, Error>;
    fn delete_scope(&self, id: i32) -> Result<(), Error>;
}
