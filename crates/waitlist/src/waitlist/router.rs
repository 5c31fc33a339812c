use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::json;

use super::domain::{JoinRequest, WaitlistEntry, WaitlistStats};
use super::identity::IdentityGenerator;
use super::repository::WaitlistRepository;
use super::service::{WaitlistError, WaitlistService};

const NOT_FOUND_MESSAGE: &str = "This email is not on the waitlist.";

/// Submission result in the shape the signup form consumes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<WaitlistEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referral_link: Option<String>,
}

impl JoinResponse {
    fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            entry: None,
            error: Some(error.into()),
            referral_link: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: WaitlistStats,
    pub referral_link: String,
}

/// Router builder exposing signup and lookup endpoints.
///
/// The full listing and reset endpoints are only mounted when
/// `expose_admin_routes` is set.
pub fn waitlist_router<R, G>(
    service: Arc<WaitlistService<R, G>>,
    expose_admin_routes: bool,
) -> Router
where
    R: WaitlistRepository + 'static,
    G: IdentityGenerator + 'static,
{
    let mut router = Router::new()
        .route("/api/v1/waitlist", post(join_handler::<R, G>))
        .route("/api/v1/waitlist/stats/:email", get(stats_handler::<R, G>))
        .route(
            "/api/v1/waitlist/position/:email",
            get(position_handler::<R, G>),
        );

    if expose_admin_routes {
        router = router.route(
            "/api/v1/waitlist/entries",
            get(entries_handler::<R, G>).delete(reset_handler::<R, G>),
        );
    }

    router.with_state(service)
}

pub(crate) async fn join_handler<R, G>(
    State(service): State<Arc<WaitlistService<R, G>>>,
    payload: Result<axum::Json<JoinRequest>, JsonRejection>,
) -> Response
where
    R: WaitlistRepository + 'static,
    G: IdentityGenerator + 'static,
{
    let request = match payload {
        Ok(axum::Json(request)) => request,
        Err(rejection) => {
            let payload = JoinResponse::failure(rejection.body_text());
            return (rejection.status(), axum::Json(payload)).into_response();
        }
    };

    match service.join(request) {
        Ok(entry) => {
            let referral_link = service.referral_link(&entry.referral_code);
            let payload = JoinResponse {
                success: true,
                entry: Some(entry),
                error: None,
                referral_link: Some(referral_link),
            };
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(WaitlistError::DuplicateEmail) => {
            let payload = JoinResponse::failure(WaitlistError::DuplicateEmail.to_string());
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(WaitlistError::Validation(errors)) => {
            let payload = JoinResponse::failure(errors.to_string());
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = JoinResponse::failure(other.to_string());
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn stats_handler<R, G>(
    State(service): State<Arc<WaitlistService<R, G>>>,
    Path(email): Path<String>,
) -> Response
where
    R: WaitlistRepository + 'static,
    G: IdentityGenerator + 'static,
{
    match service.stats(&email) {
        Ok(Some(stats)) => {
            let referral_link = service.referral_link(&stats.referral_code);
            let payload = StatsResponse {
                stats,
                referral_link,
            };
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Ok(None) => not_found(),
        Err(err) => internal_error(err),
    }
}

pub(crate) async fn position_handler<R, G>(
    State(service): State<Arc<WaitlistService<R, G>>>,
    Path(email): Path<String>,
) -> Response
where
    R: WaitlistRepository + 'static,
    G: IdentityGenerator + 'static,
{
    match service.position(&email) {
        Ok(Some(position)) => {
            let payload = json!({ "email": email.trim(), "position": position });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Ok(None) => not_found(),
        Err(err) => internal_error(err),
    }
}

pub(crate) async fn entries_handler<R, G>(
    State(service): State<Arc<WaitlistService<R, G>>>,
) -> Response
where
    R: WaitlistRepository + 'static,
    G: IdentityGenerator + 'static,
{
    match service.entries() {
        Ok(entries) => (StatusCode::OK, axum::Json(entries)).into_response(),
        Err(err) => internal_error(err),
    }
}

pub(crate) async fn reset_handler<R, G>(
    State(service): State<Arc<WaitlistService<R, G>>>,
) -> Response
where
    R: WaitlistRepository + 'static,
    G: IdentityGenerator + 'static,
{
    match service.reset() {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => internal_error(err),
    }
}

fn not_found() -> Response {
    let payload = json!({
        "success": false,
        "error": NOT_FOUND_MESSAGE,
    });
    (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
}

fn internal_error(err: WaitlistError) -> Response {
    let payload = json!({
        "success": false,
        "error": err.to_string(),
    });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
