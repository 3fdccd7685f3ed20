use crate::api::ApiError;
use crate::model::enums::{ResourceProperty, ResourceType};

/// Stable, machine-readable name of an error variant.
pub trait ErrorKind {
    fn kind(&self) -> &'static str;
}

impl ErrorKind for std::env::VarError {
    fn kind(&self) -> &'static str {
        match self {
            Self::NotPresent => "NotPresent",
            Self::NotUnicode(_) => "NotUnicode",
        }
    }
}

impl ErrorKind for diesel::result::DatabaseErrorKind {
    fn kind(&self) -> &'static str {
        match self {
            Self::CheckViolation => "CheckViolation",
            Self::ClosedConnection => "ClosedConnection",
            Self::ForeignKeyViolation => "ForeignKeyViolation",
            Self::NotNullViolation => "NotNullViolation",
            Self::ReadOnlyTransaction => "ReadOnlyTransaction",
            Self::SerializationFailure => "SerializationFailure",
            Self::UnableToSendCommand => "UnableToSendCommand",
            Self::UniqueViolation => "UniqueViolation",
            _ => "UnknownDatabaseError",
        }
    }
}

impl ErrorKind for diesel::result::Error {
    fn kind(&self) -> &'static str {
        match self {
            Self::AlreadyInTransaction => "AlreadyInTransaction",
            Self::BrokenTransactionManager => "BrokenTransactionManager",
            Self::DatabaseError(err, _) => err.kind(),
            Self::DeserializationError(_) => "DeserializationError",
            Self::InvalidCString(_) => "InvalidCString",
            Self::NotFound => "NotFound",
            Self::NotInTransaction => "NotInTransaction",
            Self::QueryBuilderError(_) => "QueryBuilderError",
            Self::RollbackErrorOnCommit { rollback_error, .. } => rollback_error.kind(),
            Self::RollbackTransaction => "RollbackTransaction",
            Self::SerializationError(_) => "SerializationError",
            _ => "UnknownQueryError",
        }
    }
}

impl ErrorKind for ResourceType {
    fn kind(&self) -> &'static str {
        match self {
            Self::Forum => "ForumNotFound",
            Self::ParentPost => "ParentPostNotFound",
            Self::Post => "PostNotFound",
            Self::Thread => "ThreadNotFound",
            Self::User => "UserNotFound",
        }
    }
}

impl ErrorKind for ResourceProperty {
    fn kind(&self) -> &'static str {
        match self {
            Self::ForumSlug => "ForumAlreadyExists",
            Self::ThreadSlug => "ThreadAlreadyExists",
            Self::UserEmail => "UserAlreadyExists",
            Self::Vote => "VoteAlreadyExists",
        }
    }
}

impl ErrorKind for ApiError {
    fn kind(&self) -> &'static str {
        match self {
            Self::AlreadyExists(property) => property.kind(),
            Self::FailedConnection(_) => "FailedConnection",
            Self::FailedQuery(err) => err.kind(),
            Self::InvalidParam(_) | Self::PathRejection(_) | Self::QueryRejection(_) => "InvalidParam",
            Self::InvalidVoice(_) | Self::JsonRejection(_) => "BadInput",
            Self::NotFound(resource) => resource.kind(),
        }
    }
}
