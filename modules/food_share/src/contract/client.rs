use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::contract::{
    error::FoodShareError,
    model::{
        Credentials, FoodPost, NewFoodPost, NewNotification, Notification, PostStatus,
        Registration, User,
    },
};

/// Public API of the food_share store that views and other crates use
#[async_trait]
pub trait FoodShareApi: Send + Sync {
    /// Start a session. Cancelling `cancel` abandons the (simulated) backend call.
    async fn login(
        &self,
        credentials: Credentials,
        cancel: CancellationToken,
    ) -> Result<User, FoodShareError>;

    /// Create an account and start a session.
    async fn signup(
        &self,
        registration: Registration,
        cancel: CancellationToken,
    ) -> Result<User, FoodShareError>;

    /// End the session; posts survive, notifications do not.
    fn logout(&self);

    /// Publish a new donation listing.
    async fn create_food_post(&self, draft: NewFoodPost) -> Result<FoodPost, FoodShareError>;

    /// Rewrite a post's status and claimer without any transition check.
    async fn update_post_status(
        &self,
        post_id: Uuid,
        status: PostStatus,
        claimed_by: Option<String>,
    ) -> Result<FoodPost, FoodShareError>;

    /// Claim an available post for the signed-in volunteer.
    async fn claim_post(&self, post_id: Uuid) -> Result<FoodPost, FoodShareError>;

    /// Remove a post.
    async fn delete_post(&self, post_id: Uuid) -> Result<(), FoodShareError>;

    fn add_notification(&self, notification: NewNotification) -> Notification;

    fn mark_notification_read(&self, notification_id: Uuid) -> Result<(), FoodShareError>;

    fn current_user(&self) -> Option<User>;

    /// Snapshot of all posts, newest first.
    fn posts(&self) -> Vec<FoodPost>;

    /// Snapshot of the session's notifications, newest first.
    fn notifications(&self) -> Vec<Notification>;
}
