use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::contract::model::User;
use crate::domain::error::DomainError;
use crate::domain::ports::{AuthRequest, Authenticator};

/// Accepts any non-empty credentials after a simulated round trip.
/// There is no account store: the user is fabricated from the request.
#[derive(Debug, Clone)]
pub struct MockAuthenticator {
    latency: Duration,
    reject_all: bool,
}

impl MockAuthenticator {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            reject_all: false,
        }
    }

    /// A backend that turns every request down.
    pub fn rejecting(latency: Duration) -> Self {
        Self {
            latency,
            reject_all: true,
        }
    }
}

fn display_name_for(email: &str) -> String {
    let local = email.trim().split('@').next().unwrap_or_default();
    if local.is_empty() {
        email.trim().to_string()
    } else {
        local.to_string()
    }
}

#[async_trait]
impl Authenticator for MockAuthenticator {
    async fn authenticate(&self, request: &AuthRequest) -> Result<User, DomainError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.reject_all {
            return Err(DomainError::InvalidCredentials);
        }
        let user = match request {
            AuthRequest::Login(c) => {
                User::fabricate(display_name_for(&c.email), c.email.trim(), c.role)
            }
            AuthRequest::Signup(r) => User::fabricate(r.name.trim(), r.email.trim(), r.role),
        };
        debug!(user_id = %user.id, role = %user.role, "mock identity issued");
        Ok(user)
    }
}
