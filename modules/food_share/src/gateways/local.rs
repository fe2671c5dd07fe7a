use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::contract::{
    client::FoodShareApi,
    error::FoodShareError,
    model::{
        Credentials, FoodPost, NewFoodPost, NewNotification, Notification, PostStatus,
        Registration, User,
    },
};
use crate::domain::service::Service;

/// Local implementation of the FoodShareApi trait that delegates to the domain service
pub struct FoodShareLocalClient {
    service: Arc<Service>,
}

impl FoodShareLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl FoodShareApi for FoodShareLocalClient {
    async fn login(
        &self,
        credentials: Credentials,
        cancel: CancellationToken,
    ) -> Result<User, FoodShareError> {
        self.service
            .login(credentials, cancel)
            .await
            .map_err(Into::into)
    }

    async fn signup(
        &self,
        registration: Registration,
        cancel: CancellationToken,
    ) -> Result<User, FoodShareError> {
        self.service
            .signup(registration, cancel)
            .await
            .map_err(Into::into)
    }

    fn logout(&self) {
        self.service.logout();
    }

    async fn create_food_post(&self, draft: NewFoodPost) -> Result<FoodPost, FoodShareError> {
        self.service.create_food_post(draft).await.map_err(Into::into)
    }

    async fn update_post_status(
        &self,
        post_id: Uuid,
        status: PostStatus,
        claimed_by: Option<String>,
    ) -> Result<FoodPost, FoodShareError> {
        self.service
            .update_post_status(post_id, status, claimed_by)
            .await
            .map_err(Into::into)
    }

    async fn claim_post(&self, post_id: Uuid) -> Result<FoodPost, FoodShareError> {
        self.service.claim_post(post_id).await.map_err(Into::into)
    }

    async fn delete_post(&self, post_id: Uuid) -> Result<(), FoodShareError> {
        self.service.delete_post(post_id).await.map_err(Into::into)
    }

    fn add_notification(&self, notification: NewNotification) -> Notification {
        self.service.add_notification(notification)
    }

    fn mark_notification_read(&self, notification_id: Uuid) -> Result<(), FoodShareError> {
        self.service
            .mark_notification_read(notification_id)
            .map_err(Into::into)
    }

    fn current_user(&self) -> Option<User> {
        self.service.current_user()
    }

    fn posts(&self) -> Vec<FoodPost> {
        self.service.posts()
    }

    fn notifications(&self) -> Vec<Notification> {
        self.service.notifications()
    }
}
