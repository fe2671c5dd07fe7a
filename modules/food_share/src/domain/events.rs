use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::contract::model::{Notification, PostStatus, Role};

/// Transport-agnostic store change, fanned out to every subscribed view.
#[derive(Debug, Clone)]
pub enum StoreEvent {
    SessionStarted {
        user_id: Uuid,
        role: Role,
        at: DateTime<Utc>,
    },
    SessionEnded {
        at: DateTime<Utc>,
    },
    PostCreated {
        id: Uuid,
        at: DateTime<Utc>,
    },
    PostUpdated {
        id: Uuid,
        status: PostStatus,
        at: DateTime<Utc>,
    },
    PostDeleted {
        id: Uuid,
        at: DateTime<Utc>,
    },
    /// Carries the full record so a view can raise a toast without re-reading.
    NotificationAdded {
        notification: Notification,
    },
    NotificationRead {
        id: Uuid,
        at: DateTime<Utc>,
    },
}
