use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::Path,
    http::{StatusCode, Uri},
    response::{IntoResponse, Json},
    Extension,
};
use tokio_stream::wrappers::WatchStream;
use tokio_stream::StreamExt;
use tracing::{error, info, warn};

use crate::api::rest::auth::Viewer;
use crate::api::rest::dto::{
    CalendarDto, EstimateDto, EstimateReq, JobDto, JobEvent, JobFormReq, LoginReq,
    ScheduledJobDto, SessionDto, StatusUpdateReq, TeamDto, UserDto,
};
use crate::api::rest::error::map_domain_error;
use crate::api::rest::problem::{Problem, ProblemResponse};
use crate::api::rest::sse::{named_sse, SseBroadcaster};
use crate::domain::refresh::CalendarFeed;
use crate::domain::service::Service;
use crate::domain::session::SessionService;

/// Period of the calendar stream's refresh timer.
#[derive(Debug, Clone, Copy)]
pub struct RefreshInterval(pub Duration);

/// Sign in with email and password
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginReq,
    responses(
        (status = 200, description = "Signed in", body = SessionDto),
        (status = 401, description = "Invalid credentials", body = Problem),
    )
)]
pub async fn login(
    uri: Uri,
    Extension(sessions): Extension<Arc<SessionService>>,
    Json(req): Json<LoginReq>,
) -> Result<Json<SessionDto>, ProblemResponse> {
    match sessions.login(&req.email, &req.password).await {
        Ok(session) => Ok(Json(session.into())),
        Err(e) => Err(map_domain_error(&e, uri.path())),
    }
}

/// Current signed-in user
#[utoipa::path(
    get,
    path = "/auth/session",
    tag = "auth",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Current user", body = UserDto),
        (status = 401, description = "Not signed in", body = Problem),
    )
)]
pub async fn session(viewer: Viewer) -> Json<UserDto> {
    Json(viewer.user.into())
}

/// End the current session
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    security(("bearer" = [])),
    responses(
        (status = 204, description = "Signed out"),
        (status = 401, description = "Not signed in", body = Problem),
    )
)]
pub async fn logout(
    uri: Uri,
    Extension(sessions): Extension<Arc<SessionService>>,
    viewer: Viewer,
) -> Result<StatusCode, ProblemResponse> {
    sessions
        .logout(&viewer.token)
        .map(|()| StatusCode::NO_CONTENT)
        .map_err(|e| map_domain_error(&e, uri.path()))
}

/// List teams
#[utoipa::path(
    get,
    path = "/teams",
    tag = "teams",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Teams", body = [TeamDto]),
        (status = 401, description = "Not signed in", body = Problem),
    )
)]
pub async fn list_teams(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    _viewer: Viewer,
) -> Result<Json<Vec<TeamDto>>, ProblemResponse> {
    match svc.list_teams().await {
        Ok(teams) => Ok(Json(teams.into_iter().map(Into::into).collect())),
        Err(e) => {
            error!("Failed to list teams: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// List the jobs visible to the caller
#[utoipa::path(
    get,
    path = "/jobs",
    tag = "jobs",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Jobs", body = [JobDto]),
        (status = 401, description = "Not signed in", body = Problem),
    )
)]
pub async fn list_jobs(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    viewer: Viewer,
) -> Result<Json<Vec<JobDto>>, ProblemResponse> {
    match svc.list_jobs(&viewer.user).await {
        Ok(jobs) => Ok(Json(jobs.into_iter().map(Into::into).collect())),
        Err(e) => {
            error!("Failed to list jobs: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Schedule a new job
#[utoipa::path(
    post,
    path = "/jobs",
    tag = "jobs",
    security(("bearer" = [])),
    request_body = JobFormReq,
    responses(
        (status = 201, description = "Scheduled", body = ScheduledJobDto),
        (status = 400, description = "Invalid job", body = Problem),
        (status = 403, description = "Not a manager", body = Problem),
        (status = 409, description = "Team already busy at that time", body = Problem),
    )
)]
pub async fn create_job(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    viewer: Viewer,
    Json(req): Json<JobFormReq>,
) -> Result<(StatusCode, Json<ScheduledJobDto>), ProblemResponse> {
    info!(contract = %req.contract_number, team_id = %req.team_id, "Scheduling job");

    let (new_job, options) = req
        .into_new_job()
        .map_err(|e| map_domain_error(&e, uri.path()))?;

    match svc.schedule_job(&viewer.user, new_job, options).await {
        Ok(scheduled) => Ok((StatusCode::CREATED, Json(scheduled.into()))),
        Err(e) => {
            warn!("Failed to schedule job: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Get a job by id
#[utoipa::path(
    get,
    path = "/jobs/{id}",
    tag = "jobs",
    security(("bearer" = [])),
    params(("id" = String, Path, description = "Job id")),
    responses(
        (status = 200, description = "Job", body = JobDto),
        (status = 404, description = "Not found", body = Problem),
    )
)]
pub async fn get_job(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    viewer: Viewer,
    Path(id): Path<String>,
) -> Result<Json<JobDto>, ProblemResponse> {
    match svc.get_job(&viewer.user, &id).await {
        Ok(job) => Ok(Json(job.into())),
        Err(e) => Err(map_domain_error(&e, uri.path())),
    }
}

/// Replace a job's editable fields
#[utoipa::path(
    put,
    path = "/jobs/{id}",
    tag = "jobs",
    security(("bearer" = [])),
    params(("id" = String, Path, description = "Job id")),
    request_body = JobFormReq,
    responses(
        (status = 200, description = "Updated", body = ScheduledJobDto),
        (status = 400, description = "Invalid job", body = Problem),
        (status = 403, description = "Not a manager", body = Problem),
        (status = 404, description = "Not found", body = Problem),
        (status = 409, description = "Team already busy at that time", body = Problem),
    )
)]
pub async fn update_job(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    viewer: Viewer,
    Path(id): Path<String>,
    Json(req): Json<JobFormReq>,
) -> Result<Json<ScheduledJobDto>, ProblemResponse> {
    info!(job_id = %id, "Updating job");

    let (new_job, options) = req
        .into_new_job()
        .map_err(|e| map_domain_error(&e, uri.path()))?;

    match svc.update_job(&viewer.user, &id, new_job, options).await {
        Ok(updated) => Ok(Json(updated.into())),
        Err(e) => {
            warn!("Failed to update job {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Move a job to another status
#[utoipa::path(
    put,
    path = "/jobs/{id}/status",
    tag = "jobs",
    security(("bearer" = [])),
    params(("id" = String, Path, description = "Job id")),
    request_body = StatusUpdateReq,
    responses(
        (status = 204, description = "Status stored"),
        (status = 400, description = "Unknown status", body = Problem),
        (status = 403, description = "Not a manager", body = Problem),
        (status = 404, description = "Not found", body = Problem),
    )
)]
pub async fn set_status(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    viewer: Viewer,
    Path(id): Path<String>,
    Json(req): Json<StatusUpdateReq>,
) -> Result<StatusCode, ProblemResponse> {
    let status = req.parse().map_err(|e| map_domain_error(&e, uri.path()))?;

    match svc.set_status(&viewer.user, &id, status).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => {
            warn!("Failed to set status of job {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Suggest a duration for a job
#[utoipa::path(
    post,
    path = "/jobs/estimate",
    tag = "jobs",
    security(("bearer" = [])),
    request_body = EstimateReq,
    responses(
        (status = 200, description = "Suggestion, possibly empty", body = EstimateDto),
        (status = 403, description = "Not a manager", body = Problem),
    )
)]
pub async fn estimate(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    viewer: Viewer,
    Json(req): Json<EstimateReq>,
) -> Result<Json<EstimateDto>, ProblemResponse> {
    let specs = req
        .into_specs()
        .map_err(|e| map_domain_error(&e, uri.path()))?;

    svc.suggest_estimated_time(&viewer.user, specs)
        .await
        .map(|estimated_time| Json(EstimateDto { estimated_time }))
        .map_err(|e| map_domain_error(&e, uri.path()))
}

/// Calendar events for the caller
#[utoipa::path(
    get,
    path = "/calendar",
    tag = "calendar",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Calendar projection", body = CalendarDto),
        (status = 401, description = "Not signed in", body = Problem),
    )
)]
pub async fn calendar(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    viewer: Viewer,
) -> Result<Json<CalendarDto>, ProblemResponse> {
    match svc.calendar(&viewer.user).await {
        Ok(projection) => Ok(Json(projection.into())),
        Err(e) => {
            error!("Failed to project calendar: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// SSE stream of calendar projections, refreshed on changes and on a timer.
pub async fn calendar_stream(
    Extension(svc): Extension<Arc<Service>>,
    Extension(sse): Extension<SseBroadcaster<JobEvent>>,
    Extension(RefreshInterval(interval)): Extension<RefreshInterval>,
    viewer: Viewer,
) -> impl IntoResponse {
    info!(viewer = %viewer.user.uid, "New SSE connection for calendar");
    let feed = CalendarFeed::spawn(svc, viewer.user, interval, sse.subscribe());
    let updates = WatchStream::from_changes(feed.subscribe()).map(move |projection| {
        // the feed's task lives as long as the stream
        let _feed = &feed;
        CalendarDto::from(projection)
    });
    named_sse(updates, "calendar")
}

/// SSE stream of raw job events. Team members only receive their team's events.
pub async fn job_events(
    Extension(sse): Extension<SseBroadcaster<JobEvent>>,
    viewer: Viewer,
) -> impl IntoResponse {
    info!(viewer = %viewer.user.uid, "New SSE connection for job events");
    let user = viewer.user;
    let events = sse.subscribe_stream().filter(move |event| {
        user.is_manager() || user.team_id.as_deref() == Some(event.team_id.as_str())
    });
    named_sse(events, "jobs_events")
}
