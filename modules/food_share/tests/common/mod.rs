#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use food_share::contract::model::{Credentials, NewFoodPost, Role, User};
use food_share::domain::events::StoreEvent;
use food_share::domain::ports::EventPublisher;
use food_share::domain::repo::FoodPostRepository;
use food_share::domain::service::{Service, ServiceConfig};
use food_share::infra::auth::MockAuthenticator;
use food_share::infra::storage::InMemoryPostRepository;

/// Keeps every published event for later inspection.
#[derive(Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<StoreEvent>>,
}

impl RecordingPublisher {
    pub fn events(&self) -> Vec<StoreEvent> {
        self.events.lock().clone()
    }
}

impl EventPublisher<StoreEvent> for RecordingPublisher {
    fn publish(&self, event: &StoreEvent) {
        self.events.lock().push(event.clone());
    }
}

pub fn service_with(
    repo: Arc<dyn FoodPostRepository>,
    auth: MockAuthenticator,
    config: ServiceConfig,
) -> (Service, Arc<RecordingPublisher>) {
    let events = Arc::new(RecordingPublisher::default());
    let service = Service::new(repo, Arc::new(auth), events.clone(), config);
    (service, events)
}

/// In-memory store with an instant authenticator.
pub fn quick_service() -> (Service, Arc<RecordingPublisher>) {
    service_with(
        Arc::new(InMemoryPostRepository::new()),
        MockAuthenticator::new(Duration::ZERO),
        ServiceConfig::default(),
    )
}

pub fn draft(food_name: &str) -> NewFoodPost {
    NewFoodPost {
        food_name: food_name.to_string(),
        quantity: "10 portions".into(),
        pickup_date: "2025-03-01".into(),
        pickup_time: "18:30".into(),
        contact_number: "+1 555 0100".into(),
        address: "12 Harbour Road".into(),
        estimated_weight: Some(4.0),
        ..Default::default()
    }
}

pub async fn login_as(service: &Service, email: &str, role: Role) -> User {
    service
        .login(
            Credentials {
                email: email.to_string(),
                password: "secret".into(),
                role,
            },
            CancellationToken::new(),
        )
        .await
        .expect("login should succeed")
}
