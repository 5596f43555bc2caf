use crate::auth::{IntrospectionResult, Request, Store};
use crate::core::models::ScopeRecord;
use crate::util::hash::HashingService;

pub mod error;
pub mod introspection;
pub mod scope;

pub use error::Error;

use tracing::{event, Level};

/// The decision engine. Holds no per-request state, so one instance serves any number of
/// concurrent requests as long as the store does.
#[derive(Debug)]
pub struct AuthorizationProvider<S> {
    store: S,
    hasher: HashingService,
}

/// What a successfully handled request produces.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize)]
#[serde(untagged)]
pub enum Response {
    Introspection(IntrospectionResult),
    Scope(ScopeRecord),
}

impl<S: Store> AuthorizationProvider<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            hasher: HashingService::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run the one operation `request` names.
    #[tracing::instrument(skip(self, request), fields(action = request.action()))]
    pub fn handle(&self, request: Request) -> Result<Response, Error> {
        event!(Level::DEBUG, "Dispatching request");

        match request {
            Request::ValidateToken(req) => {
                self.introspection_request(&req).map(Response::Introspection)
            }
            Request::AddScope(req) => self.create_scope(req).map(Response::Scope),
            Request::CheckScope(req) => self.get_scope(&req.scope_identifier).map(Response::Scope),
            Request::EditScope(req) => self.update_scope(req).map(Response::Scope),
            Request::DeleteScope(req) => {
                self.delete_scope(&req.scope_identifier).map(Response::Scope)
            }
        }
    }
}
