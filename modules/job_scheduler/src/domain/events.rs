use chrono::{DateTime, Utc};

use crate::contract::model::JobStatus;

/// Transport-agnostic domain event.
#[derive(Debug, Clone, PartialEq)]
pub enum JobDomainEvent {
    Scheduled {
        id: String,
        team_id: String,
        at: DateTime<Utc>,
    },
    Updated {
        id: String,
        team_id: String,
        at: DateTime<Utc>,
    },
    StatusChanged {
        id: String,
        team_id: String,
        status: JobStatus,
        at: DateTime<Utc>,
    },
}

impl JobDomainEvent {
    pub fn job_id(&self) -> &str {
        match self {
            Self::Scheduled { id, .. } | Self::Updated { id, .. } | Self::StatusChanged { id, .. } => {
                id
            }
        }
    }

    pub fn team_id(&self) -> &str {
        match self {
            Self::Scheduled { team_id, .. }
            | Self::Updated { team_id, .. }
            | Self::StatusChanged { team_id, .. } => team_id,
        }
    }
}
