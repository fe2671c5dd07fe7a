use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::model::{FoodPost, PostStatus};

/// A single keyed change, applied by the repository under its write lock so
/// the read-modify-write happens against the latest stored record.
#[derive(Debug, Clone, PartialEq)]
pub enum PostChange {
    /// Unconditional rewrite of status and claimer fields.
    SetStatus {
        status: PostStatus,
        claimed_by: Option<String>,
        claimed_by_id: Option<Uuid>,
    },
    /// `available → claimed`, rejected for any other current status.
    Claim { claimer: String, claimer_id: Uuid },
}

impl PostChange {
    /// Apply the change in place. `Err` carries the status that blocked it.
    pub fn apply_to(&self, post: &mut FoodPost) -> Result<(), PostStatus> {
        match self {
            PostChange::SetStatus {
                status,
                claimed_by,
                claimed_by_id,
            } => {
                post.status = *status;
                post.claimed_by = claimed_by.clone();
                post.claimed_by_id = *claimed_by_id;
                Ok(())
            }
            PostChange::Claim {
                claimer,
                claimer_id,
            } => {
                if post.status != PostStatus::Available {
                    return Err(post.status);
                }
                post.status = PostStatus::Claimed;
                post.claimed_by = Some(claimer.clone());
                post.claimed_by_id = Some(*claimer_id);
                Ok(())
            }
        }
    }
}

/// Result of `FoodPostRepository::apply`.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeOutcome {
    Applied(FoodPost),
    NotFound,
    Rejected { current: FoodPost },
}

/// Port for the domain layer: persistence operations the store needs.
/// Every write touches exactly one record; there is no whole-collection save.
#[async_trait]
pub trait FoodPostRepository: Send + Sync {
    /// All posts, newest first.
    async fn load_all(&self) -> anyhow::Result<Vec<FoodPost>>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<FoodPost>>;
    /// Replace the record with the same id in place, or insert it at the head.
    async fn upsert(&self, post: FoodPost) -> anyhow::Result<()>;
    /// Atomically apply `change` to the stored record.
    async fn apply(&self, id: Uuid, change: PostChange) -> anyhow::Result<ChangeOutcome>;
    /// Delete by id. Returns true if a record was removed.
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
}

/// Shared by the repository adapters: keyed upsert into a newest-first list.
pub(crate) fn upsert_into(posts: &mut Vec<FoodPost>, post: FoodPost) {
    match posts.iter_mut().find(|p| p.id == post.id) {
        Some(slot) => *slot = post,
        None => posts.insert(0, post),
    }
}

/// Shared by the repository adapters: apply a change to the matching record.
pub(crate) fn apply_in(posts: &mut [FoodPost], id: Uuid, change: &PostChange) -> ChangeOutcome {
    let Some(post) = posts.iter_mut().find(|p| p.id == id) else {
        return ChangeOutcome::NotFound;
    };
    match change.apply_to(post) {
        Ok(()) => ChangeOutcome::Applied(post.clone()),
        Err(_) => ChangeOutcome::Rejected {
            current: post.clone(),
        },
    }
}

/// Shared by the repository adapters: order-preserving removal.
pub(crate) fn remove_from(posts: &mut Vec<FoodPost>, id: Uuid) -> bool {
    match posts.iter().position(|p| p.id == id) {
        Some(idx) => {
            posts.remove(idx);
            true
        }
        None => false,
    }
}
