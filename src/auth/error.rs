use warp::http::StatusCode;

/// Errors raised by registry and introspection logic that callers are expected to handle.
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(thiserror::Error)]
pub enum ServiceError {
    #[error("scope not found")]
    ScopeNotFound,
    #[error("scope not modifiable")]
    ScopeNotModifiable,
    #[error("malformed request: {0}")]
    MalformedRequest(String),
}

impl ServiceError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::ScopeNotFound => "SCOPE_NOT_FOUND",
            Self::ScopeNotModifiable => "SCOPE_NOT_MODIFIABLE",
            Self::MalformedRequest(_) => "MALFORMED_REQUEST",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::ScopeNotFound => "Scope unavailable",
            Self::ScopeNotModifiable => "Scope not modifiable",
            Self::MalformedRequest(_) => "Malformed request",
        }
    }

    pub fn description(&self) -> String {
        match self {
            Self::ScopeNotFound => "The requested scope does not exist".to_string(),
            Self::ScopeNotModifiable => "The requested scope may not be changed since the scope \
                 is a core scope used by the authorization service"
                .to_string(),
            Self::MalformedRequest(reason) => {
                format!("The request could not be understood: {}", reason)
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::ScopeNotFound => StatusCode::NOT_FOUND,
            Self::ScopeNotModifiable => StatusCode::FORBIDDEN,
            Self::MalformedRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

/// The envelope every failed request is answered with.
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub http_code: u16,
    pub http_error: String,
    pub error: String,
    pub error_name: String,
    pub error_description: String,
}

impl ErrorResponse {
    pub fn new(
        service_name: &str,
        status: StatusCode,
        code: &str,
        name: &str,
        description: String,
    ) -> Self {
        Self {
            http_code: status.as_u16(),
            http_error: status.canonical_reason().unwrap_or_default().to_string(),
            error: format!("{}.{}", service_name, code),
            error_name: name.to_string(),
            error_description: description,
        }
    }

    pub fn from_service_error(service_name: &str, error: &ServiceError) -> Self {
        Self::new(
            service_name,
            error.status(),
            error.code(),
            error.name(),
            error.description(),
        )
    }

    pub fn duplicate_entry(service_name: &str) -> Self {
        Self::new(
            service_name,
            StatusCode::CONFLICT,
            "DUPLICATE_ENTRY",
            "Constraint Violation",
            "The resource you are trying to create already exists".to_string(),
        )
    }

    pub fn internal_error(service_name: &str, fault: &dyn std::fmt::Display) -> Self {
        Self::new(
            service_name,
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "Internal Service Error",
            format!("The service encountered an internal error: {}", fault),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_uses_camel_case_keys() {
        let response = ErrorResponse::from_service_error(
            "authorization-service",
            &ServiceError::ScopeNotFound,
        );
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "httpCode": 404,
                "httpError": "Not Found",
                "error": "authorization-service.SCOPE_NOT_FOUND",
                "errorName": "Scope unavailable",
                "errorDescription": "The requested scope does not exist",
            })
        );
    }

    #[test]
    fn reserved_scope_error_is_forbidden() {
        let response = ErrorResponse::from_service_error("svc", &ServiceError::ScopeNotModifiable);
        assert_eq!(response.http_code, 403);
        assert_eq!(response.http_error, "Forbidden");
        assert_eq!(response.error, "svc.SCOPE_NOT_MODIFIABLE");
    }

    #[test]
    fn generic_envelopes() {
        let conflict = ErrorResponse::duplicate_entry("svc");
        assert_eq!(conflict.http_code, 409);
        assert_eq!(conflict.error, "svc.DUPLICATE_ENTRY");

        let internal = ErrorResponse::internal_error("svc", &"pool exhausted");
        assert_eq!(internal.http_code, 500);
        assert_eq!(internal.http_error, "Internal Server Error");
        assert!(internal.error_description.ends_with("pool exhausted"));
    }
}
