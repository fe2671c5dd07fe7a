use std::time::Duration;

use thiserror::Error;
use uuid::Uuid;

use crate::contract::error::{describe_fields, FieldErrors};
use crate::contract::model::{PostStatus, Role};

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation failed: {}", describe_fields(.errors))]
    Validation { errors: FieldErrors },

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Operation timed out after {after:?}")]
    TimedOut { after: Duration },

    #[error("No active session")]
    NotAuthenticated,

    #[error("This action requires the {required} role")]
    Forbidden { required: Role },

    #[error("Food post not found: {id}")]
    PostNotFound { id: Uuid },

    #[error("Notification not found: {id}")]
    NotificationNotFound { id: Uuid },

    #[error("Food post {id} is no longer available (status: {status})")]
    PostUnavailable { id: Uuid, status: PostStatus },

    #[error("Storage error: {message}")]
    Storage { message: String },
}

impl DomainError {
    pub fn validation(errors: FieldErrors) -> Self {
        Self::Validation { errors }
    }

    pub fn timed_out(after: Duration) -> Self {
        Self::TimedOut { after }
    }

    pub fn forbidden(required: Role) -> Self {
        Self::Forbidden { required }
    }

    pub fn post_not_found(id: Uuid) -> Self {
        Self::PostNotFound { id }
    }

    pub fn notification_not_found(id: Uuid) -> Self {
        Self::NotificationNotFound { id }
    }

    pub fn post_unavailable(id: Uuid, status: PostStatus) -> Self {
        Self::PostUnavailable { id, status }
    }

    /// Wrap an infrastructure error, keeping the whole context chain.
    pub fn storage(err: anyhow::Error) -> Self {
        Self::Storage {
            message: format!("{err:#}"),
        }
    }
}
