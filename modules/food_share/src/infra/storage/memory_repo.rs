use async_trait::async_trait;
use parking_lot::Mutex;
use uuid::Uuid;

use crate::contract::model::FoodPost;
use crate::domain::repo::{
    apply_in, remove_from, upsert_into, ChangeOutcome, FoodPostRepository, PostChange,
};

/// Process-local repository; nothing survives a restart.
#[derive(Default)]
pub struct InMemoryPostRepository {
    posts: Mutex<Vec<FoodPost>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FoodPostRepository for InMemoryPostRepository {
    async fn load_all(&self) -> anyhow::Result<Vec<FoodPost>> {
        Ok(self.posts.lock().clone())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<FoodPost>> {
        Ok(self.posts.lock().iter().find(|p| p.id == id).cloned())
    }

    async fn upsert(&self, post: FoodPost) -> anyhow::Result<()> {
        upsert_into(&mut self.posts.lock(), post);
        Ok(())
    }

    async fn apply(&self, id: Uuid, change: PostChange) -> anyhow::Result<ChangeOutcome> {
        Ok(apply_in(&mut self.posts.lock(), id, &change))
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        Ok(remove_from(&mut self.posts.lock(), id))
    }
}
