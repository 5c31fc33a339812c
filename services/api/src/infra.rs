use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use waitlist::config::WaitlistConfig;
use waitlist::waitlist::{
    IdentityGenerator, InMemoryWaitlistRepository, RandomIdentityGenerator, WaitlistService,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type MemoryWaitlistService<G> = WaitlistService<InMemoryWaitlistRepository, G>;

/// Fresh in-memory waitlist using random ids and codes.
pub(crate) fn random_waitlist_service(
    config: WaitlistConfig,
) -> MemoryWaitlistService<RandomIdentityGenerator> {
    let identities = RandomIdentityGenerator::new(config.referral_code_length);
    memory_waitlist_service(identities, config)
}

pub(crate) fn memory_waitlist_service<G>(
    identities: G,
    config: WaitlistConfig,
) -> MemoryWaitlistService<G>
where
    G: IdentityGenerator + 'static,
{
    WaitlistService::new(
        Arc::new(InMemoryWaitlistRepository::new()),
        Arc::new(identities),
        config,
    )
}
