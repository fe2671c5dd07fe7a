//! Cross-process exclusive lock backed by a kernel advisory lock.
//!
//! The lock file itself is permanent; ownership is the exclusive `flock`
//! (`LockFileEx` on Windows) held on an open descriptor. The kernel drops the
//! lock when the descriptor closes, including when the holder crashes, so a
//! leftover file never blocks anyone and no holder can remove another's lock.
//! Waiters retry with exponential backoff until `max_wait`.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Configuration for lock acquisition attempts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LockConfig {
    /// Maximum duration to wait for the lock.
    #[serde(default = "default_max_wait", with = "humantime_serde")]
    pub max_wait: Duration,
    /// Initial delay between retry attempts.
    #[serde(default = "default_initial_backoff", with = "humantime_serde")]
    pub initial_backoff: Duration,
    /// Cap for exponential backoff.
    #[serde(default = "default_max_backoff", with = "humantime_serde")]
    pub max_backoff: Duration,
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            max_wait: default_max_wait(),
            initial_backoff: default_initial_backoff(),
            max_backoff: default_max_backoff(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

fn default_max_wait() -> Duration {
    Duration::from_secs(5)
}

fn default_initial_backoff() -> Duration {
    Duration::from_millis(10)
}

fn default_max_backoff() -> Duration {
    Duration::from_millis(500)
}

fn default_backoff_multiplier() -> f64 {
    1.5
}

/// Held lock. Prefer `release()`; closing the descriptor on `Drop` unlocks too.
#[derive(Debug)]
pub struct FileLockGuard {
    path: PathBuf,
    file: Option<File>,
}

impl FileLockGuard {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn release(mut self) {
        if let Some(file) = self.file.take() {
            if let Err(e) = FileExt::unlock(&file) {
                warn!(error = %e, path = %self.path.display(), "failed to unlock lock file");
            }
            debug!(path = %self.path.display(), "lock released");
        }
    }
}

impl Drop for FileLockGuard {
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            let _ = FileExt::unlock(&file);
        }
    }
}

pub struct FileLock;

impl FileLock {
    /// Acquire the lock at `path`, waiting up to `config.max_wait`.
    pub async fn acquire(path: &Path, config: &LockConfig) -> Result<FileLockGuard> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("create lock directory {}", parent.display()))?;
        }

        let file = tokio::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .await
            .with_context(|| format!("failed to open lock file {}", path.display()))?
            .into_std()
            .await;

        let start = Instant::now();
        let mut backoff = config.initial_backoff;
        loop {
            match FileExt::try_lock_exclusive(&file) {
                Ok(()) => {
                    debug!(path = %path.display(), "lock acquired");
                    return Ok(FileLockGuard {
                        path: path.to_path_buf(),
                        file: Some(file),
                    });
                }
                Err(e) if is_contended(&e) => {}
                Err(e) => {
                    return Err(e).with_context(|| format!("failed to lock {}", path.display()))
                }
            }

            let remaining = config.max_wait.saturating_sub(start.elapsed());
            if remaining.is_zero() {
                anyhow::bail!(
                    "timed out after {:?} waiting for lock {}",
                    config.max_wait,
                    path.display()
                );
            }
            tokio::time::sleep(std::cmp::min(backoff, remaining)).await;
            let next = backoff.mul_f64(config.backoff_multiplier);
            backoff = std::cmp::min(next, config.max_backoff);
        }
    }
}

fn is_contended(e: &io::Error) -> bool {
    let contended = fs2::lock_contended_error();
    e.kind() == contended.kind() || e.raw_os_error() == contended.raw_os_error()
}
