use axum::http::StatusCode;

use crate::api::rest::problem::{Problem, ProblemResponse};
use crate::domain::error::DomainError;

/// Build a problem response tagged with the current span id.
pub fn from_parts(
    status: StatusCode,
    code: &str,
    title: &str,
    detail: impl Into<String>,
    instance: &str,
) -> ProblemResponse {
    let problem = Problem::new(status, code, title, detail, instance);
    let problem = match tracing::Span::current().id() {
        Some(id) => problem.with_trace_id(id.into_u64().to_string()),
        None => problem,
    };
    ProblemResponse(problem)
}

/// Map a domain error to its HTTP problem.
pub fn map_domain_error(e: &DomainError, instance: &str) -> ProblemResponse {
    match e {
        DomainError::Validation { field, message } => {
            let ProblemResponse(problem) = from_parts(
                StatusCode::BAD_REQUEST,
                "JOBS_VALIDATION",
                "Validation error",
                e.to_string(),
                instance,
            );
            ProblemResponse(problem.with_field(field, message.clone()))
        }
        DomainError::Conflict { team_id, starts_at } => from_parts(
            StatusCode::CONFLICT,
            "JOBS_SLOT_CONFLICT",
            "Scheduling conflict",
            format!(
                "Team '{team_id}' already has a job starting at {}",
                starts_at.format("%Y-%m-%d %H:%M")
            ),
            instance,
        ),
        DomainError::JobNotFound { id } => from_parts(
            StatusCode::NOT_FOUND,
            "JOBS_NOT_FOUND",
            "Job not found",
            format!("Job with id {id} was not found"),
            instance,
        ),
        DomainError::Forbidden { .. } => from_parts(
            StatusCode::FORBIDDEN,
            "JOBS_FORBIDDEN",
            "Forbidden",
            e.to_string(),
            instance,
        ),
        DomainError::Unauthenticated => from_parts(
            StatusCode::UNAUTHORIZED,
            "AUTH_REQUIRED",
            "Unauthorized",
            "A valid session token is required",
            instance,
        ),
        DomainError::Database { .. } => {
            // details go to the log only
            tracing::error!(error = ?e, "Database error occurred");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_DB",
                "Internal error",
                "An internal database error occurred",
                instance,
            )
        }
    }
}
