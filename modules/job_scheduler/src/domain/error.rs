use chrono::NaiveDateTime;
use thiserror::Error;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Job not found: {id}")]
    JobNotFound { id: String },

    #[error("Team '{team_id}' already has a job starting at {starts_at}")]
    Conflict {
        team_id: String,
        starts_at: NaiveDateTime,
    },

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Only managers may {action}")]
    Forbidden { action: String },

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn job_not_found(id: impl Into<String>) -> Self {
        Self::JobNotFound { id: id.into() }
    }

    pub fn conflict(team_id: impl Into<String>, starts_at: NaiveDateTime) -> Self {
        Self::Conflict {
            team_id: team_id.into(),
            starts_at,
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn forbidden(action: impl Into<String>) -> Self {
        Self::Forbidden {
            action: action.into(),
        }
    }

    pub fn unauthenticated() -> Self {
        Self::Unauthenticated
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}
