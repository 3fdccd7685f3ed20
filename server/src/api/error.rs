use crate::error::ErrorKind;
use crate::model::enums::{ResourceProperty, ResourceType};
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use diesel::QueryResult;
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub enum ApiError {
    #[error("{0} already exists")]
    AlreadyExists(ResourceProperty),
    FailedConnection(#[from] diesel::r2d2::PoolError),
    FailedQuery(#[from] diesel::result::Error),
    #[error("Query parameter '{0}' has an invalid value")]
    InvalidParam(&'static str),
    #[error("Voice must be either -1 or 1, not {0}")]
    InvalidVoice(i64),
    JsonRejection(#[from] axum::extract::rejection::JsonRejection),
    #[error("{0} not found")]
    NotFound(ResourceType),
    PathRejection(#[from] axum::extract::rejection::PathRejection),
    QueryRejection(#[from] axum::extract::rejection::QueryRejection),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        type QueryError = diesel::result::Error;

        match self {
            Self::JsonRejection(err) => err.status(),
            Self::PathRejection(err) => err.status(),
            Self::QueryRejection(err) => err.status(),
            Self::InvalidParam(_) | Self::InvalidVoice(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::AlreadyExists(_) => StatusCode::CONFLICT,
            Self::FailedConnection(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::FailedQuery(QueryError::NotFound) => StatusCode::NOT_FOUND,
            Self::FailedQuery(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Storage errors are reported to the caller with a fixed message. Their details only go to the log.
    fn response(&self) -> ErrorResponse {
        let message = match self {
            Self::FailedConnection(_) => String::from("Database is unavailable"),
            Self::FailedQuery(diesel::result::Error::NotFound) => String::from("Resource not found"),
            Self::FailedQuery(_) => String::from("Internal server error"),
            _ => self.to_string(),
        };
        ErrorResponse {
            name: self.kind(),
            message,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::FailedConnection(_) | Self::FailedQuery(_) = self {
            error!(kind = self.kind(), "{self}");
        }
        let mut response = (self.status_code(), Json(self.response())).into_response();
        response.extensions_mut().insert(ErrorName(self.kind()));
        response
    }
}

/// Attached to error responses so that request logging can report what went wrong.
#[derive(Debug, Clone, Copy)]
pub struct ErrorName(pub &'static str);

pub fn map_unique_violation<T>(result: QueryResult<T>, property: ResourceProperty) -> ApiResult<T> {
    use diesel::result::DatabaseErrorKind;
    use diesel::result::Error as DieselError;

    match result {
        Ok(value) => Ok(value),
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => Err(ApiError::AlreadyExists(property)),
        Err(err) => Err(err.into()),
    }
}

pub fn map_foreign_key_violation<T>(result: QueryResult<T>, resource: ResourceType) -> ApiResult<T> {
    use diesel::result::DatabaseErrorKind;
    use diesel::result::Error as DieselError;

    match result {
        Ok(value) => Ok(value),
        Err(DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _)) => Err(ApiError::NotFound(resource)),
        Err(err) => Err(err.into()),
    }
}

pub fn map_unique_or_foreign_key_violation<T>(
    result: QueryResult<T>,
    unique_property: ResourceProperty,
    foreign_resource: ResourceType,
) -> ApiResult<T> {
    use diesel::result::DatabaseErrorKind;
    use diesel::result::Error as DieselError;

    match result {
        Ok(value) => Ok(value),
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            Err(ApiError::AlreadyExists(unique_property))
        }
        Err(DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _)) => {
            Err(ApiError::NotFound(foreign_resource))
        }
        Err(err) => Err(err.into()),
    }
}

/// Represents a response if an error occured.
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable error name, such as `ThreadNotFound`.
    name: &'static str,
    /// Human-readable description of the error.
    message: String,
}
