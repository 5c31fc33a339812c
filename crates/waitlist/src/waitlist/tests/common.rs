use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::config::WaitlistConfig;
use crate::waitlist::domain::{EntryId, JoinRequest, ReferralCode};
use crate::waitlist::identity::{IdentityGenerator, SequentialIdentityGenerator};
use crate::waitlist::repository::{
    InMemoryWaitlistRepository, RepositoryError, WaitlistRepository,
};
use crate::waitlist::store::EntrySet;
use crate::waitlist::{waitlist_router, WaitlistService};

pub(super) type MemoryService =
    WaitlistService<InMemoryWaitlistRepository, SequentialIdentityGenerator>;

pub(super) fn at(offset_minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
        + Duration::minutes(offset_minutes)
}

pub(super) fn config() -> WaitlistConfig {
    WaitlistConfig::new("https://launch.example.com", 8)
}

pub(super) fn request(key: &str) -> JoinRequest {
    JoinRequest::new(key.to_uppercase(), format!("{key}@example.com"))
}

pub(super) fn build_service() -> (MemoryService, Arc<InMemoryWaitlistRepository>) {
    let repository = Arc::new(InMemoryWaitlistRepository::default());
    let service = WaitlistService::new(
        repository.clone(),
        Arc::new(SequentialIdentityGenerator::default()),
        config(),
    );
    (service, repository)
}

pub(super) fn snapshot(repository: &InMemoryWaitlistRepository) -> EntrySet {
    repository
        .read(|entries| entries.clone())
        .expect("repository readable")
}

/// Hands out the same referral code forever.
#[derive(Default)]
pub(super) struct StuckCodeGenerator {
    inner: SequentialIdentityGenerator,
}

impl IdentityGenerator for StuckCodeGenerator {
    fn generate_id(&self) -> EntryId {
        self.inner.generate_id()
    }

    fn generate_referral_code(&self) -> ReferralCode {
        ReferralCode("STUCK".to_string())
    }
}

pub(super) struct UnavailableRepository;

impl WaitlistRepository for UnavailableRepository {
    fn read<T, F>(&self, _op: F) -> Result<T, RepositoryError>
    where
        F: FnOnce(&EntrySet) -> T,
    {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn write<T, F>(&self, _op: F) -> Result<T, RepositoryError>
    where
        F: FnOnce(&mut EntrySet) -> T,
    {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn router_with_service(service: MemoryService, expose_admin: bool) -> axum::Router {
    waitlist_router(Arc::new(service), expose_admin)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
