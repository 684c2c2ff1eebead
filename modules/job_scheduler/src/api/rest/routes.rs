use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post, put},
    Extension, Json, Router,
};
use utoipa::OpenApi;

use crate::api::rest::dto::JobEvent;
use crate::api::rest::handlers::{self, RefreshInterval};
use crate::api::rest::openapi::ApiDoc;
use crate::api::rest::sse::SseBroadcaster;
use crate::domain::service::Service;
use crate::domain::session::SessionService;

/// Everything the REST handlers pull from request extensions.
#[derive(Clone)]
pub struct RestState {
    pub service: Arc<Service>,
    pub sessions: Arc<SessionService>,
    pub events: SseBroadcaster<JobEvent>,
    pub refresh_interval: Duration,
}

pub fn register_routes(router: Router, state: RestState) -> Router {
    router
        .route("/auth/login", post(handlers::login))
        .route("/auth/session", get(handlers::session))
        .route("/auth/logout", post(handlers::logout))
        .route("/teams", get(handlers::list_teams))
        .route("/jobs", get(handlers::list_jobs).post(handlers::create_job))
        .route("/jobs/estimate", post(handlers::estimate))
        .route("/jobs/events", get(handlers::job_events))
        .route("/jobs/{id}", get(handlers::get_job).put(handlers::update_job))
        .route("/jobs/{id}/status", put(handlers::set_status))
        .route("/calendar", get(handlers::calendar))
        .route("/calendar/stream", get(handlers::calendar_stream))
        .route(
            "/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .layer(Extension(state.service))
        .layer(Extension(state.sessions))
        .layer(Extension(state.events))
        .layer(Extension(RefreshInterval(state.refresh_interval)))
}
