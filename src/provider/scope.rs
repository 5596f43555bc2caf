use crate::auth::error::ServiceError;
use crate::auth::{ScopeCreation, ScopeUpdate, Store};
use crate::core::models::{NewScope, ScopeChanges, ScopeRecord};
use crate::core::types::{is_reserved_scope, ScopeIdentifier};

use super::{AuthorizationProvider, Error};

use tracing::{event, Level};

impl<S: Store> AuthorizationProvider<S> {
    /// Uniqueness of name and value is left to the store, so two racing creations cannot
    /// both succeed.
    #[tracing::instrument(skip(self, request), fields(value = %request.value))]
    pub fn create_scope(&self, request: ScopeCreation) -> Result<ScopeRecord, Error> {
        let scope = self.store.insert_scope(NewScope {
            name: request.name,
            description: request.description,
            value: request.value,
        })?;

        event!(Level::INFO, scope_id = scope.id, "Created scope");
        Ok(scope)
    }

    pub fn get_scope(&self, identifier: &ScopeIdentifier) -> Result<ScopeRecord, Error> {
        self.store
            .get_scope(identifier)?
            .ok_or_else(|| ServiceError::ScopeNotFound.into())
    }

    #[tracing::instrument(skip(self, request), fields(identifier = %request.scope_identifier))]
    pub fn update_scope(&self, request: ScopeUpdate) -> Result<ScopeRecord, Error> {
        let scope = self.modifiable_scope(&request.scope_identifier)?;

        let changes = ScopeChanges {
            name: request.name,
            description: request.description,
        };
        let updated = self.store.update_scope(scope.id, changes)?;

        event!(Level::INFO, scope_id = updated.id, "Updated scope");
        Ok(updated)
    }

    /// Returns the scope as it was stored before removal.
    #[tracing::instrument(skip(self))]
    pub fn delete_scope(&self, identifier: &ScopeIdentifier) -> Result<ScopeRecord, Error> {
        let scope = self.modifiable_scope(identifier)?;

        self.store.delete_scope(scope.id)?;

        event!(Level::INFO, scope_id = scope.id, "Deleted scope");
        Ok(scope)
    }

    fn modifiable_scope(&self, identifier: &ScopeIdentifier) -> Result<ScopeRecord, Error> {
        if identifier.is_reserved() {
            event!(Level::WARN, %identifier, "Refusing to modify reserved scope");
            return Err(ServiceError::ScopeNotModifiable.into());
        }

        let scope = self.get_scope(identifier)?;
        if is_reserved_scope(&scope.value) {
            event!(
                Level::WARN,
                %identifier,
                value = %scope.value,
                "Refusing to modify reserved scope"
            );
            return Err(ServiceError::ScopeNotModifiable.into());
        }

        Ok(scope)
    }
}
