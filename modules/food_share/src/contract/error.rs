use std::collections::BTreeMap;

use thiserror::Error;
use uuid::Uuid;

/// Flat field → message map, as shown next to form inputs.
pub type FieldErrors = BTreeMap<String, String>;

/// Errors that are safe to expose to callers of the store
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FoodShareError {
    #[error("Validation error: {}", describe_fields(.fields))]
    Validation { fields: FieldErrors },

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Request cancelled")]
    Cancelled,

    #[error("Service unavailable: {message}")]
    Unavailable { message: String },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Not found: {id}")]
    NotFound { id: Uuid },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Internal error")]
    Internal,
}

impl FoodShareError {
    pub fn validation(fields: FieldErrors) -> Self {
        Self::Validation { fields }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn not_found(id: Uuid) -> Self {
        Self::NotFound { id }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn internal() -> Self {
        Self::Internal
    }
}

pub(crate) fn describe_fields(fields: &FieldErrors) -> String {
    fields
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<crate::domain::error::DomainError> for FoodShareError {
    fn from(domain_error: crate::domain::error::DomainError) -> Self {
        use crate::domain::error::DomainError::*;
        match domain_error {
            Validation { errors } => Self::validation(errors),
            InvalidCredentials => Self::InvalidCredentials,
            Cancelled => Self::Cancelled,
            TimedOut { after } => Self::Unavailable {
                message: format!("no answer within {}ms", after.as_millis()),
            },
            NotAuthenticated => Self::unauthorized("sign in first"),
            Forbidden { required } => Self::unauthorized(format!("requires the {required} role")),
            PostNotFound { id } | NotificationNotFound { id } => Self::not_found(id),
            PostUnavailable { id, status } => {
                Self::conflict(format!("food post {id} is already {status}"))
            }
            Storage { .. } => Self::internal(),
        }
    }
}
