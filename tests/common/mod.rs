#![allow(dead_code)]

use std::collections::BTreeMap;
use std::convert::TryFrom;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use kagi::auth::error::ServiceError;
use kagi::auth::Store;
use kagi::core::models::{Account, NewScope, ScopeChanges, ScopeRecord, Token};
use kagi::core::types::{
    unix_now, HashedPassword, HashedTokenValue, ScopeIdentifier, TokenKind, TokenValue,
};
use kagi::provider::{AuthorizationProvider, Error};
use kagi::util::hash::HashingService;

pub const HOUR: i64 = 60 * 60;

#[derive(Debug, Default)]
struct Tables {
    accounts: BTreeMap<i32, Account>,
    scopes: BTreeMap<i32, ScopeRecord>,
    tokens: Vec<(HashedTokenValue, Token)>,
    token_scopes: Vec<(TokenKind, i32, i32)>,
    next_id: i32,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-process stand-in for the PostgreSQL store. Enforces the same uniqueness rules and
/// counts every call so tests can assert that nothing was read.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding the two reserved scopes, as a fresh migration leaves it.
    pub fn seeded() -> Self {
        let store = Self::new();
        store.add_scope("Administrator", "administrator");
        store.add_scope("Own account", "me");
        store
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    pub fn add_scope(&self, name: &str, value: &str) -> ScopeRecord {
        let mut tables = self.tables.lock().unwrap();
        let id = tables.next_id();
        let scope = ScopeRecord {
            id,
            name: name.to_string(),
            description: String::new(),
            value: value.to_string(),
        };
        tables.scopes.insert(id, scope.clone());
        scope
    }

    pub fn add_account(&self, username: &str, active: bool) -> Account {
        let mut tables = self.tables.lock().unwrap();
        let id = tables.next_id();
        let account = Account {
            id,
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            username: username.to_string(),
            password: HashedPassword("not-a-real-hash".to_string()),
            active,
        };
        tables.accounts.insert(id, account.clone());
        account
    }

    pub fn remove_account(&self, id: i32) {
        self.tables.lock().unwrap().accounts.remove(&id);
    }

    /// Store a token under the hash of `value`, granted the scopes with the given values.
    pub fn issue_token(&self, value: &str, spec: TokenSpec, scopes: &[&str]) -> Token {
        let hashed: HashedTokenValue =
            HashingService::new().hash_without_salt(&TokenValue(value.to_string()));

        let mut tables = self.tables.lock().unwrap();
        let id = tables.next_id();
        let token = Token {
            id,
            kind: spec.kind,
            active: spec.active,
            created_at: spec.created_at,
            expires_at: spec.expires_at,
            account_id: spec.account_id,
        };

        let scope_ids: Vec<i32> = tables
            .scopes
            .values()
            .filter(|s| scopes.contains(&s.value.as_str()))
            .map(|s| s.id)
            .collect();
        for scope_id in scope_ids {
            tables.token_scopes.push((spec.kind, id, scope_id));
        }

        tables.tokens.push((hashed, token.clone()));
        token
    }
}

/// Token attributes; `TokenSpec::valid_for(account)` gives a live access token.
#[derive(Debug, Clone, Copy)]
pub struct TokenSpec {
    pub kind: TokenKind,
    pub active: bool,
    pub created_at: i64,
    pub expires_at: i64,
    pub account_id: i32,
}

impl TokenSpec {
    pub fn valid_for(account_id: i32) -> Self {
        let now = unix_now();
        Self {
            kind: TokenKind::AccessToken,
            active: true,
            created_at: now - HOUR,
            expires_at: now + HOUR,
            account_id,
        }
    }
}

impl Store for MemoryStore {
    fn get_token(&self, value: &HashedTokenValue) -> Result<Option<Token>, Error> {
        self.touch();
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .tokens
            .iter()
            .find(|(hashed, _)| hashed == value)
            .map(|(_, token)| token.clone()))
    }

    fn get_account(&self, id: i32) -> Result<Option<Account>, Error> {
        self.touch();
        Ok(self.tables.lock().unwrap().accounts.get(&id).cloned())
    }

    fn get_scope(&self, identifier: &ScopeIdentifier) -> Result<Option<ScopeRecord>, Error> {
        self.touch();
        let tables = self.tables.lock().unwrap();
        Ok(match identifier {
            ScopeIdentifier::Id(id) => i32::try_from(*id)
                .ok()
                .and_then(|id| tables.scopes.get(&id).cloned()),
            ScopeIdentifier::Value(value) => {
                tables.scopes.values().find(|s| &s.value == value).cloned()
            }
        })
    }

    fn list_scopes(&self) -> Result<Vec<ScopeRecord>, Error> {
        self.touch();
        Ok(self.tables.lock().unwrap().scopes.values().cloned().collect())
    }

    fn list_token_scopes(&self, token: &Token) -> Result<Vec<ScopeRecord>, Error> {
        self.touch();
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .token_scopes
            .iter()
            .filter(|(kind, token_id, _)| *kind == token.kind && *token_id == token.id)
            .filter_map(|(_, _, scope_id)| tables.scopes.get(scope_id).cloned())
            .collect())
    }

    fn insert_scope(&self, scope: NewScope) -> Result<ScopeRecord, Error> {
        self.touch();
        let mut tables = self.tables.lock().unwrap();
        if tables.scopes.values().any(|s| s.name == scope.name) {
            return Err(Error::Constraint("scopes_scope_name_key".to_string()));
        }
        if tables.scopes.values().any(|s| s.value == scope.value) {
            return Err(Error::Constraint("scopes_scope_value_key".to_string()));
        }

        let id = tables.next_id();
        let record = ScopeRecord {
            id,
            name: scope.name,
            description: scope.description,
            value: scope.value,
        };
        tables.scopes.insert(id, record.clone());
        Ok(record)
    }

    fn update_scope(&self, id: i32, changes: ScopeChanges) -> Result<ScopeRecord, Error> {
        self.touch();
        let mut tables = self.tables.lock().unwrap();
        if let Some(name) = &changes.name {
            if tables.scopes.values().any(|s| s.id != id && &s.name == name) {
                return Err(Error::Constraint("scopes_scope_name_key".to_string()));
            }
        }

        let scope = tables
            .scopes
            .get_mut(&id)
            .ok_or(ServiceError::ScopeNotFound)?;
        if let Some(name) = changes.name {
            scope.name = name;
        }
        if let Some(description) = changes.description {
            scope.description = description;
        }
        Ok(scope.clone())
    }

    fn delete_scope(&self, id: i32) -> Result<(), Error> {
        self.touch();
        let mut tables = self.tables.lock().unwrap();
        tables.scopes.remove(&id);
        tables.token_scopes.retain(|(_, _, scope_id)| *scope_id != id);
        Ok(())
    }
}

pub fn provider(store: MemoryStore) -> AuthorizationProvider<MemoryStore> {
    AuthorizationProvider::new(store)
}
