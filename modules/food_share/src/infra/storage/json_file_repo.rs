//! Post collection persisted as one JSON array per storage key.
//!
//! Every write takes the in-process gate and then the cross-process lock
//! file, re-reads the current document, applies exactly one keyed change
//! and replaces the file atomically (temp file + rename). Readers never take
//! the lock; they always see either the old or the new document.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::contract::model::FoodPost;
use crate::domain::repo::{
    apply_in, remove_from, upsert_into, ChangeOutcome, FoodPostRepository, PostChange,
};
use crate::infra::storage::file_lock::{FileLock, LockConfig};

pub struct JsonFilePostRepository {
    path: PathBuf,
    lock_path: PathBuf,
    lock: LockConfig,
    write_gate: Mutex<()>,
}

impl JsonFilePostRepository {
    /// `<dir>/<storage_key>.json`, guarded by `<dir>/<storage_key>.json.lock`.
    pub fn new(dir: impl AsRef<Path>, storage_key: &str, lock: LockConfig) -> Self {
        let path = dir.as_ref().join(format!("{storage_key}.json"));
        let lock_path = dir.as_ref().join(format!("{storage_key}.json.lock"));
        Self {
            path,
            lock_path,
            lock,
            write_gate: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> Result<Vec<FoodPost>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", self.path.display()))
            }
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        serde_json::from_slice(&bytes)
            .with_context(|| format!("failed to parse {}", self.path.display()))
    }

    async fn write_document(&self, posts: &[FoodPost]) -> Result<()> {
        let json = serde_json::to_vec_pretty(posts).context("failed to serialize posts")?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || replace_atomically(&path, &json))
            .await
            .context("storage writer task failed")?
    }

    /// Serialised read-modify-write of the whole document.
    async fn modify<T>(&self, f: impl FnOnce(&mut Vec<FoodPost>) -> (T, bool)) -> Result<T> {
        let _gate = self.write_gate.lock().await;
        let guard = FileLock::acquire(&self.lock_path, &self.lock).await?;

        let mut posts = self.read_document().await?;
        let (out, dirty) = f(&mut posts);
        if dirty {
            self.write_document(&posts).await?;
            debug!(count = posts.len(), path = %self.path.display(), "document written");
        }

        guard.release();
        Ok(out)
    }
}

fn replace_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create storage dir {}", dir.display()))?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create temp file in {}", dir.display()))?;
    tmp.write_all(bytes).context("failed to write temp file")?;
    tmp.as_file().sync_all().context("failed to sync temp file")?;
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("failed to replace {}", path.display()))?;
    Ok(())
}

#[async_trait]
impl FoodPostRepository for JsonFilePostRepository {
    #[instrument(name = "food_share.repo.load_all", skip(self), fields(path = %self.path.display()))]
    async fn load_all(&self) -> Result<Vec<FoodPost>> {
        self.read_document().await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<FoodPost>> {
        Ok(self.read_document().await?.into_iter().find(|p| p.id == id))
    }

    #[instrument(name = "food_share.repo.upsert", skip(self, post), fields(post_id = %post.id))]
    async fn upsert(&self, post: FoodPost) -> Result<()> {
        self.modify(|posts| {
            upsert_into(posts, post);
            ((), true)
        })
        .await
    }

    #[instrument(name = "food_share.repo.apply", skip(self, id, change), fields(post_id = %id))]
    async fn apply(&self, id: Uuid, change: PostChange) -> Result<ChangeOutcome> {
        self.modify(|posts| {
            let outcome = apply_in(posts, id, &change);
            let dirty = matches!(outcome, ChangeOutcome::Applied(_));
            (outcome, dirty)
        })
        .await
    }

    #[instrument(name = "food_share.repo.delete", skip(self, id), fields(post_id = %id))]
    async fn delete(&self, id: Uuid) -> Result<bool> {
        self.modify(|posts| {
            let removed = remove_from(posts, id);
            (removed, removed)
        })
        .await
    }
}
