use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use futures::Stream;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::config::FoodShareConfig;
use crate::contract::client::FoodShareApi;
use crate::domain::events::StoreEvent;
use crate::domain::repo::FoodPostRepository;
use crate::domain::service::{Service, ServiceConfig};
use crate::gateways::local::FoodShareLocalClient;
use crate::infra::auth::MockAuthenticator;
use crate::infra::events::EventBroadcaster;
use crate::infra::storage::{InMemoryPostRepository, JsonFilePostRepository};

/// Wired module: storage adapter, authenticator and event fan-out behind one
/// domain service, plus the in-process client views talk to.
pub struct FoodShare {
    service: Arc<Service>,
    events: EventBroadcaster<StoreEvent>,
    client: Arc<dyn FoodShareApi>,
    storage_path: Option<PathBuf>,
}

impl FoodShare {
    /// Build from configuration. `ephemeral` keeps posts in memory only.
    pub async fn init(
        cfg: FoodShareConfig,
        home_dir: &Path,
        ephemeral: bool,
    ) -> anyhow::Result<Self> {
        info!("Initializing food_share module");
        debug!(
            "Loaded food_share config: storage_key={}, auth_latency={:?}, auth_timeout={:?}",
            cfg.storage_key, cfg.auth_latency, cfg.auth_timeout
        );

        if ephemeral {
            info!("Using in-memory post storage");
            return Self::with_repository(cfg, Arc::new(InMemoryPostRepository::new()), None)
                .await;
        }

        let dir = cfg.resolve_storage_dir(home_dir);
        let repo = JsonFilePostRepository::new(&dir, &cfg.storage_key, cfg.lock.clone());
        let path = repo.path().to_path_buf();
        info!(path = %path.display(), "Using JSON file post storage");
        Self::with_repository(cfg, Arc::new(repo), Some(path)).await
    }

    /// Build around an existing repository.
    pub async fn with_repository(
        cfg: FoodShareConfig,
        repo: Arc<dyn FoodPostRepository>,
        storage_path: Option<PathBuf>,
    ) -> anyhow::Result<Self> {
        let events = EventBroadcaster::new(cfg.event_capacity);
        let auth = Arc::new(MockAuthenticator::new(cfg.auth_latency));
        let service_config = ServiceConfig {
            auth_timeout: cfg.auth_timeout,
            max_photos: cfg.max_photos,
            default_location: cfg.default_location,
        };

        let service = Service::open(repo, auth, Arc::new(events.clone()), service_config)
            .await
            .context("failed to load food posts")?;
        let service = Arc::new(service);

        let client: Arc<dyn FoodShareApi> = Arc::new(FoodShareLocalClient::new(service.clone()));
        info!(posts = service.posts().len(), "food_share module ready");
        Ok(Self {
            service,
            events,
            client,
            storage_path,
        })
    }

    /// Public in-process API.
    pub fn client(&self) -> Arc<dyn FoodShareApi> {
        self.client.clone()
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    pub fn subscribe_stream(&self) -> impl Stream<Item = StoreEvent> {
        self.events.subscribe_stream()
    }

    /// `None` when running in-memory.
    pub fn storage_path(&self) -> Option<&Path> {
        self.storage_path.as_deref()
    }
}
