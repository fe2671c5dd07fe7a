use async_trait::async_trait;

use crate::contract::model::{Credentials, Registration, User};
use crate::domain::error::DomainError;

/// What the session layer asks the identity backend to do.
#[derive(Debug, Clone)]
pub enum AuthRequest {
    Login(Credentials),
    Signup(Registration),
}

/// Identity backend port. Implementations may take arbitrarily long; the
/// service bounds and cancels the call.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, request: &AuthRequest) -> Result<User, DomainError>;
}
