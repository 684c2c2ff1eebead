//! Pure scheduling rules: input validation and the start-instant conflict check.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::contract::model::{Job, NewJob};
use crate::domain::error::DomainError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

/// Largest window count the job store can hold.
pub const MAX_WINDOW_COUNT: u32 = i32::MAX as u32;

pub fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, DomainError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(DomainError::validation(field, "is required"));
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| DomainError::validation(field, format!("'{raw}' is not a YYYY-MM-DD date")))
}

/// Accepts `HH:MM` and `HH:MM:SS`; seconds are truncated.
pub fn parse_time(field: &str, raw: &str) -> Result<NaiveTime, DomainError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(DomainError::validation(field, "is required"));
    }
    NaiveTime::parse_from_str(raw, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map(truncate_seconds)
        .map_err(|_| DomainError::validation(field, format!("'{raw}' is not an HH:MM time")))
}

fn truncate_seconds(t: NaiveTime) -> NaiveTime {
    use chrono::Timelike;
    t.with_second(0).and_then(|t| t.with_nanosecond(0)).unwrap_or(t)
}

fn require_text(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        Err(DomainError::validation(field, "is required"))
    } else {
        Ok(())
    }
}

fn require_positive(field: &str, value: f64) -> Result<(), DomainError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(DomainError::validation(field, "must be greater than 0"))
    }
}

/// Check required fields and numeric bounds of a candidate job.
pub fn validate(job: &NewJob) -> Result<(), DomainError> {
    require_text("estimated_time", &job.estimated_time)?;
    require_text("contract_number", &job.contract_number)?;
    require_text("client_address", &job.client_address)?;
    require_text("client_phone", &job.client_phone)?;
    require_text("team_id", &job.team_id)?;
    if job.window_count < 1 {
        return Err(DomainError::validation("window_count", "must be at least 1"));
    }
    if job.window_count > MAX_WINDOW_COUNT {
        return Err(DomainError::validation(
            "window_count",
            format!("must be at most {MAX_WINDOW_COUNT}"),
        ));
    }
    require_positive("square_meters", job.square_meters)?;
    require_positive("circumference", job.circumference)?;
    Ok(())
}

/// First job in `existing` that belongs to `team_id` and starts at exactly
/// `starts_at`. The job with id `exclude` (the one being edited) is ignored.
///
/// Only identical start instants collide; durations are not considered.
pub fn find_conflict<'a>(
    team_id: &str,
    starts_at: NaiveDateTime,
    existing: &'a [Job],
    exclude: Option<&str>,
) -> Option<&'a Job> {
    existing.iter().find(|job| {
        job.team_id == team_id
            && job.date == starts_at.date()
            && Some(job.id.as_str()) != exclude
            && job.starts_at() == starts_at
    })
}

/// `Err(Conflict)` if `candidate` collides with a job in `existing`.
pub fn ensure_no_conflict(
    candidate: &NewJob,
    existing: &[Job],
    exclude: Option<&str>,
) -> Result<(), DomainError> {
    let starts_at = candidate.starts_at();
    match find_conflict(&candidate.team_id, starts_at, existing, exclude) {
        Some(_) => Err(DomainError::conflict(candidate.team_id.clone(), starts_at)),
        None => Ok(()),
    }
}
