use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Content type for Problem Details as per RFC 9457.
pub const APPLICATION_PROBLEM_JSON: &str = "application/problem+json";

/// Base of the `type` URI; the error code is appended.
pub const PROBLEM_TYPE_BASE: &str = "https://errors.clearvue.dev/";

/// RFC 9457 Problem Details body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(
    title = "Problem",
    description = "RFC 9457 Problem Details for HTTP APIs"
)]
pub struct Problem {
    #[serde(rename = "type")]
    pub type_url: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    /// Request path that failed.
    pub instance: String,
    /// Stable machine-readable code, e.g. `JOBS_SLOT_CONFLICT`.
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    /// Offending form fields, for validation problems only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(title = "FieldError")]
pub struct FieldError {
    pub detail: String,
    /// JSON Pointer to the invalid member (e.g., "/window_count").
    pub pointer: String,
}

impl Problem {
    /// A problem whose `type` is derived from `code`.
    pub fn new(
        status: StatusCode,
        code: &str,
        title: impl Into<String>,
        detail: impl Into<String>,
        instance: impl Into<String>,
    ) -> Self {
        Self {
            type_url: format!("{PROBLEM_TYPE_BASE}{code}"),
            title: title.into(),
            status: status.as_u16(),
            detail: detail.into(),
            instance: instance.into(),
            code: code.to_string(),
            trace_id: None,
            errors: None,
        }
    }

    /// Attach one invalid form field.
    pub fn with_field(mut self, field: &str, detail: impl Into<String>) -> Self {
        self.errors.get_or_insert_with(Vec::new).push(FieldError {
            detail: detail.into(),
            pointer: format!("/{field}"),
        });
        self
    }

    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

/// Axum response wrapper that renders `Problem` with its status and content type.
#[derive(Debug, Clone)]
pub struct ProblemResponse(pub Problem);

impl From<Problem> for ProblemResponse {
    fn from(p: Problem) -> Self {
        Self(p)
    }
}

impl IntoResponse for ProblemResponse {
    fn into_response(self) -> Response {
        let status = self.0.status_code();
        let mut resp = axum::Json(self.0).into_response();
        *resp.status_mut() = status;
        resp.headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_PROBLEM_JSON));
        resp
    }
}
