use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::contract::model::GeoPoint;
use crate::infra::storage::LockConfig;

/// Configuration for the food_share module (`modules.food_share` in YAML)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FoodShareConfig {
    /// File stem of the persisted post collection.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    /// Relative paths are resolved against the app home directory.
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,
    /// Simulated identity backend round trip.
    #[serde(default = "default_auth_latency", with = "humantime_serde")]
    pub auth_latency: Duration,
    #[serde(default = "default_auth_timeout", with = "humantime_serde")]
    pub auth_timeout: Duration,
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
    #[serde(default = "default_max_photos")]
    pub max_photos: usize,
    /// Map centre used when a post has no coordinates.
    #[serde(default = "default_location")]
    pub default_location: GeoPoint,
    #[serde(default)]
    pub lock: LockConfig,
}

impl Default for FoodShareConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            storage_dir: default_storage_dir(),
            auth_latency: default_auth_latency(),
            auth_timeout: default_auth_timeout(),
            event_capacity: default_event_capacity(),
            max_photos: default_max_photos(),
            default_location: default_location(),
            lock: LockConfig::default(),
        }
    }
}

impl FoodShareConfig {
    pub fn resolve_storage_dir(&self, home_dir: &Path) -> PathBuf {
        if self.storage_dir.is_absolute() {
            self.storage_dir.clone()
        } else {
            home_dir.join(&self.storage_dir)
        }
    }
}

fn default_storage_key() -> String {
    "foodloop_posts".to_string()
}

fn default_storage_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_auth_latency() -> Duration {
    Duration::from_secs(1)
}

fn default_auth_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_event_capacity() -> usize {
    256
}

fn default_max_photos() -> usize {
    5
}

fn default_location() -> GeoPoint {
    GeoPoint {
        lat: 40.7128,
        lng: -74.0060,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_section_keeps_defaults() {
        let cfg: FoodShareConfig = serde_json::from_value(serde_json::json!({
            "auth_latency": "250ms",
            "storage_dir": "/var/lib/foodloop",
            "lock": { "max_wait": "2s" }
        }))
        .unwrap();
        assert_eq!(cfg.auth_latency, Duration::from_millis(250));
        assert_eq!(cfg.auth_timeout, Duration::from_secs(10));
        assert_eq!(cfg.storage_key, "foodloop_posts");
        assert_eq!(cfg.lock.max_wait, Duration::from_secs(2));
        assert_eq!(cfg.lock.max_backoff, Duration::from_millis(500));
        assert_eq!(
            cfg.resolve_storage_dir(Path::new("/home/x")),
            PathBuf::from("/var/lib/foodloop")
        );
    }

    #[test]
    fn relative_storage_dir_hangs_off_home() {
        let cfg = FoodShareConfig::default();
        assert_eq!(
            cfg.resolve_storage_dir(Path::new("/home/x/.foodloop")),
            PathBuf::from("/home/x/.foodloop/data")
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let res: Result<FoodShareConfig, _> =
            serde_json::from_value(serde_json::json!({ "storage_kye": "typo" }));
        assert!(res.is_err());
    }
}
