use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::contract::model::{
    Badge, Credentials, FoodPost, GeoPoint, NewFoodPost, NewNotification, Notification,
    NotificationKind, PostStatus, Registration, Role, User, UserStats,
};
use crate::domain::badges;
use crate::domain::error::DomainError;
use crate::domain::events::StoreEvent;
use crate::domain::insights::VolunteerSummary;
use crate::domain::ports::{AuthRequest, Authenticator, EventPublisher};
use crate::domain::repo::{upsert_into, ChangeOutcome, FoodPostRepository, PostChange};
use crate::domain::validation::{validate_credentials, validate_draft, validate_registration};

/// Audience id for notifications meant for every volunteer.
pub const VOLUNTEERS_AUDIENCE: &str = "volunteers";
pub const ANONYMOUS_DONOR: &str = "Anonymous Donor";

/// Shared application state: the session, the post collection and the
/// session's notifications. Depends only on ports, not on infra types.
pub struct Service {
    repo: Arc<dyn FoodPostRepository>,
    auth: Arc<dyn Authenticator>,
    events: Arc<dyn EventPublisher<StoreEvent>>,
    config: ServiceConfig,
    state: RwLock<StoreState>,
}

/// Configuration for the domain service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub auth_timeout: Duration,
    pub max_photos: usize,
    pub default_location: GeoPoint,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            auth_timeout: Duration::from_secs(10),
            max_photos: 5,
            default_location: GeoPoint {
                lat: 40.7128,
                lng: -74.0060,
            },
        }
    }
}

#[derive(Debug, Default)]
struct StoreState {
    session: Option<User>,
    posts: Vec<FoodPost>,
    notifications: Vec<Notification>,
}

impl StoreState {
    /// Recompute a signed-in volunteer's totals from the posts held locally,
    /// so they match what the next login rebuilds. Returns the volunteer id
    /// and any badges the change unlocked.
    fn resync_volunteer_stats(&mut self) -> Option<(Uuid, Vec<&'static Badge>)> {
        let user = self.session.as_mut().filter(|u| u.role == Role::Volunteer)?;
        let stats = stats_from_history(&self.posts, user.id);
        let earned = badges::newly_earned(&user.stats, &stats);
        user.stats = stats;
        Some((user.id, earned))
    }
}

impl Service {
    /// Create a service with an empty in-memory view.
    pub fn new(
        repo: Arc<dyn FoodPostRepository>,
        auth: Arc<dyn Authenticator>,
        events: Arc<dyn EventPublisher<StoreEvent>>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            repo,
            auth,
            events,
            config,
            state: RwLock::new(StoreState::default()),
        }
    }

    /// Create a service and hydrate the post collection from storage.
    pub async fn open(
        repo: Arc<dyn FoodPostRepository>,
        auth: Arc<dyn Authenticator>,
        events: Arc<dyn EventPublisher<StoreEvent>>,
        config: ServiceConfig,
    ) -> Result<Self, DomainError> {
        let service = Self::new(repo, auth, events, config);
        service.refresh_posts().await?;
        Ok(service)
    }

    // --- session ---

    #[instrument(
        name = "food_share.service.login",
        skip(self, credentials, cancel),
        fields(email = %credentials.email, role = %credentials.role)
    )]
    pub async fn login(
        &self,
        credentials: Credentials,
        cancel: CancellationToken,
    ) -> Result<User, DomainError> {
        info!("Signing in");
        validate_credentials(&credentials)?;
        let user = self
            .authenticate(AuthRequest::Login(credentials), &cancel)
            .await?;
        self.start_session(user).await
    }

    #[instrument(
        name = "food_share.service.signup",
        skip(self, registration, cancel),
        fields(email = %registration.email, role = %registration.role)
    )]
    pub async fn signup(
        &self,
        registration: Registration,
        cancel: CancellationToken,
    ) -> Result<User, DomainError> {
        info!("Creating account");
        validate_registration(&registration)?;
        let user = self
            .authenticate(AuthRequest::Signup(registration), &cancel)
            .await?;
        self.start_session(user).await
    }

    #[instrument(name = "food_share.service.logout", skip(self))]
    pub fn logout(&self) {
        let ended = {
            let mut state = self.state.write();
            state.notifications.clear();
            state.session.take()
        };
        match ended {
            Some(user) => info!(user_id = %user.id, "Signed out"),
            None => debug!("Sign-out without an active session"),
        }
        self.events.publish(&StoreEvent::SessionEnded { at: Utc::now() });
    }

    async fn authenticate(
        &self,
        request: AuthRequest,
        cancel: &CancellationToken,
    ) -> Result<User, DomainError> {
        let limit = self.config.auth_timeout;
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!("Authentication cancelled");
                Err(DomainError::Cancelled)
            }
            outcome = tokio::time::timeout(limit, self.auth.authenticate(&request)) => {
                match outcome {
                    Ok(result) => result,
                    Err(_) => {
                        warn!(timeout = ?limit, "Authentication timed out");
                        Err(DomainError::timed_out(limit))
                    }
                }
            }
        }
    }

    async fn start_session(&self, mut user: User) -> Result<User, DomainError> {
        let posts = self.repo.load_all().await.map_err(DomainError::storage)?;
        if user.role == Role::Volunteer {
            user.stats = stats_from_history(&posts, user.id);
        }
        {
            let mut state = self.state.write();
            state.posts = posts;
            state.session = Some(user.clone());
        }
        self.events.publish(&StoreEvent::SessionStarted {
            user_id: user.id,
            role: user.role,
            at: Utc::now(),
        });
        info!(user_id = %user.id, "Session started");
        Ok(user)
    }

    // --- posts ---

    #[instrument(
        name = "food_share.service.create_food_post",
        skip(self, draft),
        fields(food_name = %draft.food_name)
    )]
    pub async fn create_food_post(&self, draft: NewFoodPost) -> Result<FoodPost, DomainError> {
        info!("Creating food post");
        validate_draft(&draft)?;

        let viewer = self.current_user();
        let (donor_id, donor_name) = viewer
            .as_ref()
            .map(|u| (u.id, u.name.clone()))
            .unwrap_or_else(|| (Uuid::nil(), ANONYMOUS_DONOR.to_string()));

        let mut photos = draft.photos;
        if photos.len() > self.config.max_photos {
            debug!(
                dropped = photos.len() - self.config.max_photos,
                "Dropping photos over the limit"
            );
            photos.truncate(self.config.max_photos);
        }

        let post = FoodPost {
            id: Uuid::new_v4(),
            donor_id,
            donor_name,
            food_name: draft.food_name,
            quantity: draft.quantity,
            description: draft.description.filter(|d| !d.trim().is_empty()),
            estimated_weight: draft.estimated_weight,
            pickup_date: draft.pickup_date,
            pickup_time: draft.pickup_time,
            contact_number: draft.contact_number,
            address: draft.address,
            location: draft.location.unwrap_or(self.config.default_location),
            photos,
            status: PostStatus::Available,
            claimed_by: None,
            claimed_by_id: None,
            created_at: Utc::now(),
        };

        self.repo
            .upsert(post.clone())
            .await
            .map_err(DomainError::storage)?;
        upsert_into(&mut self.state.write().posts, post.clone());

        self.events.publish(&StoreEvent::PostCreated {
            id: post.id,
            at: post.created_at,
        });

        let notice = match viewer {
            Some(donor) if donor.role == Role::Donor => NewNotification {
                user_id: donor.id.to_string(),
                kind: NotificationKind::NewPost,
                title: "✅ Food Post Created!".into(),
                message: format!(
                    "Your {} post is now live and volunteers can see it",
                    post.food_name
                ),
                post_id: Some(post.id),
            },
            _ => NewNotification {
                user_id: VOLUNTEERS_AUDIENCE.into(),
                kind: NotificationKind::NewPost,
                title: "🍽️ New Food Available!".into(),
                message: format!(
                    "{} from {} is now available for pickup",
                    post.food_name, post.donor_name
                ),
                post_id: Some(post.id),
            },
        };
        self.add_notification(notice);

        info!(post_id = %post.id, "Food post created");
        Ok(post)
    }

    /// Unconditional status rewrite. The claimer id comes from the session.
    #[instrument(
        name = "food_share.service.update_post_status",
        skip(self, post_id, status),
        fields(post_id = %post_id, status = %status)
    )]
    pub async fn update_post_status(
        &self,
        post_id: Uuid,
        status: PostStatus,
        claimed_by: Option<String>,
    ) -> Result<FoodPost, DomainError> {
        info!("Updating post status");
        let claimed_by_id = claimed_by
            .as_ref()
            .and_then(|_| self.current_user().map(|u| u.id));
        let change = PostChange::SetStatus {
            status,
            claimed_by,
            claimed_by_id,
        };
        let post = self.apply_change(post_id, change).await?;

        let resynced = {
            let mut state = self.state.write();
            upsert_into(&mut state.posts, post.clone());
            state.resync_volunteer_stats()
        };
        self.events.publish(&StoreEvent::PostUpdated {
            id: post.id,
            status: post.status,
            at: Utc::now(),
        });
        if let Some((volunteer_id, earned)) = resynced {
            self.announce_badges(volunteer_id, earned);
        }
        info!("Post status updated");
        Ok(post)
    }

    /// Guarded `available → claimed` for the signed-in volunteer.
    #[instrument(
        name = "food_share.service.claim_post",
        skip(self, post_id),
        fields(post_id = %post_id)
    )]
    pub async fn claim_post(&self, post_id: Uuid) -> Result<FoodPost, DomainError> {
        let volunteer = self.require_role(Role::Volunteer)?;
        info!(user_id = %volunteer.id, "Claiming post");

        let change = PostChange::Claim {
            claimer: volunteer.name.clone(),
            claimer_id: volunteer.id,
        };
        let post = self.apply_change(post_id, change).await?;

        let resynced = {
            let mut state = self.state.write();
            upsert_into(&mut state.posts, post.clone());
            state.resync_volunteer_stats()
        };

        self.events.publish(&StoreEvent::PostUpdated {
            id: post.id,
            status: post.status,
            at: Utc::now(),
        });

        self.add_notification(NewNotification {
            user_id: volunteer.id.to_string(),
            kind: NotificationKind::PostClaimed,
            title: "Food Claimed Successfully!".into(),
            message: format!("You've claimed {} from {}", post.food_name, post.donor_name),
            post_id: Some(post.id),
        });
        if let Some((volunteer_id, earned)) = resynced {
            self.announce_badges(volunteer_id, earned);
        }

        info!("Post claimed");
        Ok(post)
    }

    #[instrument(
        name = "food_share.service.delete_post",
        skip(self, post_id),
        fields(post_id = %post_id)
    )]
    pub async fn delete_post(&self, post_id: Uuid) -> Result<(), DomainError> {
        info!("Deleting post");
        let deleted = self
            .repo
            .delete(post_id)
            .await
            .map_err(DomainError::storage)?;
        self.forget_post(post_id);
        if !deleted {
            return Err(DomainError::post_not_found(post_id));
        }
        self.events.publish(&StoreEvent::PostDeleted {
            id: post_id,
            at: Utc::now(),
        });
        info!("Post deleted");
        Ok(())
    }

    /// Reload the collection from storage, picking up other writers.
    #[instrument(name = "food_share.service.refresh_posts", skip(self))]
    pub async fn refresh_posts(&self) -> Result<Vec<FoodPost>, DomainError> {
        let posts = self.repo.load_all().await.map_err(DomainError::storage)?;
        debug!(count = posts.len(), "Loaded posts");
        self.state.write().posts = posts.clone();
        Ok(posts)
    }

    /// Apply one keyed change in storage. A lost race refreshes the local copy.
    async fn apply_change(
        &self,
        post_id: Uuid,
        change: PostChange,
    ) -> Result<FoodPost, DomainError> {
        match self
            .repo
            .apply(post_id, change)
            .await
            .map_err(DomainError::storage)?
        {
            ChangeOutcome::Applied(post) => Ok(post),
            ChangeOutcome::NotFound => {
                self.forget_post(post_id);
                Err(DomainError::post_not_found(post_id))
            }
            ChangeOutcome::Rejected { current } => {
                let status = current.status;
                warn!(current = %status, "Change rejected");
                upsert_into(&mut self.state.write().posts, current);
                Err(DomainError::post_unavailable(post_id, status))
            }
        }
    }

    fn forget_post(&self, post_id: Uuid) {
        self.state.write().posts.retain(|p| p.id != post_id);
    }

    // --- notifications ---

    pub fn add_notification(&self, notification: NewNotification) -> Notification {
        let notification = Notification {
            id: Uuid::new_v4(),
            user_id: notification.user_id,
            kind: notification.kind,
            title: notification.title,
            message: notification.message,
            read: false,
            post_id: notification.post_id,
            created_at: Utc::now(),
        };
        self.state
            .write()
            .notifications
            .insert(0, notification.clone());
        info!(
            notification_id = %notification.id,
            kind = ?notification.kind,
            "{} {}",
            notification.kind.icon(),
            notification.title
        );
        self.events.publish(&StoreEvent::NotificationAdded {
            notification: notification.clone(),
        });
        notification
    }

    fn announce_badges(&self, volunteer_id: Uuid, earned: Vec<&'static Badge>) {
        for badge in earned {
            info!(badge = badge.name, "Badge earned");
            self.add_notification(NewNotification {
                user_id: volunteer_id.to_string(),
                kind: NotificationKind::BadgeEarned,
                title: "New Badge Earned! 🏆".into(),
                message: format!(
                    "Congratulations! You've earned the \"{}\" badge!",
                    badge.name
                ),
                post_id: None,
            });
        }
    }

    pub fn mark_notification_read(&self, notification_id: Uuid) -> Result<(), DomainError> {
        {
            let mut state = self.state.write();
            let notification = state
                .notifications
                .iter_mut()
                .find(|n| n.id == notification_id)
                .ok_or_else(|| DomainError::notification_not_found(notification_id))?;
            notification.read = true;
        }
        self.events.publish(&StoreEvent::NotificationRead {
            id: notification_id,
            at: Utc::now(),
        });
        Ok(())
    }

    // --- read accessors ---

    pub fn current_user(&self) -> Option<User> {
        self.state.read().session.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().session.is_some()
    }

    pub fn posts(&self) -> Vec<FoodPost> {
        self.state.read().posts.clone()
    }

    pub fn post(&self, post_id: Uuid) -> Option<FoodPost> {
        self.state
            .read()
            .posts
            .iter()
            .find(|p| p.id == post_id)
            .cloned()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.state.read().notifications.clone()
    }

    pub fn unread_count(&self) -> usize {
        self.state
            .read()
            .notifications
            .iter()
            .filter(|n| !n.read)
            .count()
    }

    // --- guards ---

    fn require_session(&self) -> Result<User, DomainError> {
        self.current_user().ok_or(DomainError::NotAuthenticated)
    }

    fn require_role(&self, role: Role) -> Result<User, DomainError> {
        let user = self.require_session()?;
        if user.role != role {
            return Err(DomainError::forbidden(role));
        }
        Ok(user)
    }
}

/// Rebuild a volunteer's totals from the claims already in storage.
fn stats_from_history(posts: &[FoodPost], volunteer_id: Uuid) -> UserStats {
    let summary = VolunteerSummary::compute(posts, volunteer_id, Utc::now());
    let mut stats = UserStats {
        total_claims: u32::try_from(summary.total_claims).unwrap_or(u32::MAX),
        total_food_saved: summary.total_food_saved,
        badges: Vec::new(),
    };
    stats.badges = badges::earned(&stats)
        .iter()
        .map(|b| b.id.to_string())
        .collect();
    stats
}
