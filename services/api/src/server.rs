use crate::cli::ServeArgs;
use crate::infra::{random_waitlist_service, AppState};
use crate::routes::with_waitlist_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;
use waitlist::config::AppConfig;
use waitlist::error::AppError;
use waitlist::telemetry;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let expose_admin_routes = config.environment.exposes_admin_routes();
    let service = Arc::new(random_waitlist_service(config.waitlist.clone()));

    let app = with_waitlist_routes(service, expose_admin_routes)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        base_url = %config.waitlist.base_url,
        expose_admin_routes,
        "waitlist service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
