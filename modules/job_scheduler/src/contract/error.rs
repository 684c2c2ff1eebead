use chrono::NaiveDateTime;
use thiserror::Error;

/// Errors that are safe to expose to other modules
#[derive(Error, Debug, Clone, PartialEq)]
pub enum JobSchedulerError {
    #[error("Job not found: {id}")]
    NotFound { id: String },

    #[error("Team '{team_id}' already has a job starting at {starts_at}")]
    Conflict {
        team_id: String,
        starts_at: NaiveDateTime,
    },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Not allowed to {action}")]
    Forbidden { action: String },

    #[error("Not signed in")]
    Unauthenticated,

    #[error("Internal error")]
    Internal,
}

impl JobSchedulerError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn internal() -> Self {
        Self::Internal
    }
}

impl From<crate::domain::error::DomainError> for JobSchedulerError {
    fn from(domain_error: crate::domain::error::DomainError) -> Self {
        use crate::domain::error::DomainError::*;
        match domain_error {
            JobNotFound { id } => Self::not_found(id),
            Conflict { team_id, starts_at } => Self::Conflict { team_id, starts_at },
            Validation { field, message } => Self::validation(format!("{field}: {message}")),
            Forbidden { action } => Self::Forbidden { action },
            Unauthenticated => Self::Unauthenticated,
            Database { .. } => Self::internal(),
        }
    }
}
