use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::{event, Level};

use crate::auth::error::{ErrorResponse, ServiceError};

#[derive(Debug)]
#[derive(thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("constraint violation: {0}")]
    Constraint(String),
    #[error("database error: {0}")]
    Db(DieselError),
    #[error("connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    #[error("migration error: {0}")]
    Migration(String),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl From<DieselError> for Error {
    fn from(e: DieselError) -> Self {
        match e {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info)
            | DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                Self::Constraint(info.message().to_string())
            }
            e => Self::Db(e),
        }
    }
}

impl Error {
    /// Map the error onto the response envelope. Faults outside the known taxonomy are
    /// logged here, once.
    pub fn to_response(&self, service_name: &str) -> ErrorResponse {
        match self {
            Self::Service(e) => {
                event!(Level::DEBUG, code = e.code(), "Request failed");
                ErrorResponse::from_service_error(service_name, e)
            }
            Self::Constraint(detail) => {
                event!(Level::INFO, %detail, "Constraint violation");
                ErrorResponse::duplicate_entry(service_name)
            }
            fault => {
                event!(Level::ERROR, error = ?fault, "Unexpected fault while handling request");
                ErrorResponse::internal_error(service_name, fault)
            }
        }
    }
}
