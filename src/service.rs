use crate::auth::error::{ErrorResponse, ServiceError};
use crate::auth::request::Request;
use crate::auth::Store;
use crate::provider::{AuthorizationProvider, Error};

use tracing::{event, Level};
use warp::http::StatusCode;

/// Envelope returned when even the error envelope cannot be serialized.
fn fallback_response(service_name: &str) -> Vec<u8> {
    let response = ErrorResponse::new(
        service_name,
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "Internal Service Error",
        "The service was unable to encode its response".to_string(),
    );
    serde_json::to_vec(&response).unwrap_or_default()
}

/// The two hooks a message transport needs: a content validator that decides whether a
/// payload is accepted at all, and an executor that turns an accepted payload into response
/// bytes.
#[derive(Debug)]
pub struct MessageHandler<S> {
    provider: AuthorizationProvider<S>,
    service_name: String,
    fallback: Vec<u8>,
}

impl<S: Store> MessageHandler<S> {
    pub fn new(provider: AuthorizationProvider<S>, service_name: impl Into<String>) -> Self {
        let service_name = service_name.into();
        Self {
            provider,
            fallback: fallback_response(&service_name),
            service_name,
        }
    }

    pub fn provider(&self) -> &AuthorizationProvider<S> {
        &self.provider
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Never touches the store.
    pub fn validate(&self, message: &[u8]) -> bool {
        match Request::from_slice(message) {
            Ok(_) => true,
            Err(e) => {
                event!(Level::WARN, error = %e, size = message.len(), "Rejected message");
                false
            }
        }
    }

    pub fn execute(&self, message: &[u8]) -> Vec<u8> {
        let result = Request::from_slice(message)
            .map_err(|e| Error::from(ServiceError::MalformedRequest(e.to_string())))
            .and_then(|request| self.provider.handle(request));

        let encoded = match result {
            Ok(response) => serde_json::to_vec(&response).map_err(Error::from),
            Err(e) => Err(e),
        };

        match encoded {
            Ok(bytes) => bytes,
            Err(e) => self.encode_error(&e),
        }
    }

    fn encode_error(&self, error: &Error) -> Vec<u8> {
        let response: ErrorResponse = error.to_response(&self.service_name);
        serde_json::to_vec(&response).unwrap_or_else(|_| self.fallback.clone())
    }
}
