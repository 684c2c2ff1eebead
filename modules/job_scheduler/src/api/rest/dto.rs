use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::contract::model::{
    Addons, CalendarEvent, CalendarProjection, InvalidJobRecord, Job, JobSpecs, JobStatus, NewJob,
    Role, ScheduleOptions, ScheduledJob, Session, Team, User,
};
use crate::domain::error::DomainError;
use crate::domain::events::JobDomainEvent;
use crate::domain::scheduling::{parse_date, parse_time, DATE_FORMAT, TIME_FORMAT};

/// Wire names of the job statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum JobStatusDto {
    Scheduled,
    Finished,
    #[serde(rename = "To Be Continued")]
    ToBeContinued,
    Problem,
}

impl From<JobStatus> for JobStatusDto {
    fn from(s: JobStatus) -> Self {
        match s {
            JobStatus::Scheduled => Self::Scheduled,
            JobStatus::Finished => Self::Finished,
            JobStatus::ToBeContinued => Self::ToBeContinued,
            JobStatus::Problem => Self::Problem,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct AddonsDto {
    pub inner_sills: bool,
    pub outer_sills: bool,
    pub finishing: bool,
    pub tape: bool,
    pub extras: bool,
}

impl From<Addons> for AddonsDto {
    fn from(a: Addons) -> Self {
        Self {
            inner_sills: a.inner_sills,
            outer_sills: a.outer_sills,
            finishing: a.finishing,
            tape: a.tape,
            extras: a.extras,
        }
    }
}

impl From<AddonsDto> for Addons {
    fn from(a: AddonsDto) -> Self {
        Self {
            inner_sills: a.inner_sills,
            outer_sills: a.outer_sills,
            finishing: a.finishing,
            tape: a.tape,
            extras: a.extras,
        }
    }
}

/// REST DTO for job representation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct JobDto {
    pub id: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub time: String,
    pub estimated_time: String,
    pub contract_number: String,
    pub client_address: String,
    pub client_phone: String,
    pub window_count: u32,
    pub square_meters: f64,
    pub circumference: f64,
    pub addons: AddonsDto,
    pub notes: String,
    pub status: JobStatusDto,
    pub team_id: String,
    pub team_name: String,
    pub created_by: String,
    #[schema(format = "date-time")]
    pub created_at: DateTime<Utc>,
}

impl From<Job> for JobDto {
    fn from(job: Job) -> Self {
        Self {
            date: job.date.format(DATE_FORMAT).to_string(),
            time: job.time.format(TIME_FORMAT).to_string(),
            id: job.id,
            estimated_time: job.estimated_time,
            contract_number: job.contract_number,
            client_address: job.client_address,
            client_phone: job.client_phone,
            window_count: job.window_count,
            square_meters: job.square_meters,
            circumference: job.circumference,
            addons: job.addons.into(),
            notes: job.notes,
            status: job.status.into(),
            team_id: job.team_id,
            team_name: job.team_name,
            created_by: job.created_by,
            created_at: job.created_at,
        }
    }
}

/// Job form payload for creation and full replacement.
/// Missing members default to empty values and are reported as validation errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct JobFormReq {
    pub date: String,
    pub time: String,
    pub estimated_time: String,
    pub contract_number: String,
    pub client_address: String,
    pub client_phone: String,
    pub window_count: i64,
    pub square_meters: f64,
    pub circumference: f64,
    pub addons: AddonsDto,
    pub notes: String,
    pub team_id: String,
    /// Prepend a generated summary to the notes (creation only).
    pub enhance_notes: bool,
}

fn window_count(raw: i64) -> Result<u32, DomainError> {
    u32::try_from(raw)
        .ok()
        .filter(|n| *n >= 1)
        .ok_or_else(|| DomainError::validation("window_count", "must be at least 1"))
}

impl JobFormReq {
    pub fn into_new_job(self) -> Result<(NewJob, ScheduleOptions), DomainError> {
        let options = ScheduleOptions {
            enhance_notes: self.enhance_notes,
        };
        let new_job = NewJob {
            date: parse_date("date", &self.date)?,
            time: parse_time("time", &self.time)?,
            estimated_time: self.estimated_time,
            contract_number: self.contract_number,
            client_address: self.client_address,
            client_phone: self.client_phone,
            window_count: window_count(self.window_count)?,
            square_meters: self.square_meters,
            circumference: self.circumference,
            addons: self.addons.into(),
            notes: self.notes,
            team_id: self.team_id,
        };
        Ok((new_job, options))
    }
}

/// Result of scheduling or editing a job.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScheduledJobDto {
    pub job: JobDto,
    /// Non-blocking notices (enrichment fallback, unknown team).
    pub warnings: Vec<String>,
}

impl From<ScheduledJob> for ScheduledJobDto {
    fn from(s: ScheduledJob) -> Self {
        Self {
            job: s.job.into(),
            warnings: s.warnings,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusUpdateReq {
    /// One of `Scheduled`, `Finished`, `To Be Continued`, `Problem`.
    pub status: String,
}

impl StatusUpdateReq {
    pub fn parse(&self) -> Result<JobStatus, DomainError> {
        self.status
            .parse()
            .map_err(|e: crate::contract::model::UnknownStatus| {
                DomainError::validation("status", e.to_string())
            })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct EstimateReq {
    pub window_count: i64,
    pub square_meters: f64,
    pub circumference: f64,
    pub addons: AddonsDto,
    pub notes: String,
}

impl EstimateReq {
    pub fn into_specs(self) -> Result<JobSpecs, DomainError> {
        Ok(JobSpecs {
            window_count: window_count(self.window_count)?,
            square_meters: self.square_meters,
            circumference: self.circumference,
            addons: self.addons.into(),
            notes: self.notes,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EstimateDto {
    /// `None` when no suggestion could be produced.
    pub estimated_time: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TeamDto {
    pub id: String,
    pub name: String,
}

impl From<Team> for TeamDto {
    fn from(t: Team) -> Self {
        Self {
            id: t.id,
            name: t.name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub uid: String,
    pub email: String,
    pub name: String,
    /// `manager` or `team`
    pub role: String,
    pub team_id: Option<String>,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            role: match u.role {
                Role::Manager => "manager".into(),
                Role::Team => "team".into(),
            },
            uid: u.uid,
            email: u.email,
            name: u.name,
            team_id: u.team_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginReq {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionDto {
    /// Send as `Authorization: Bearer <token>`.
    pub token: String,
    pub user: UserDto,
}

impl From<Session> for SessionDto {
    fn from(s: Session) -> Self {
        Self {
            token: s.token,
            user: s.user.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CalendarEventDto {
    pub id: String,
    pub title: String,
    /// Local start instant, `YYYY-MM-DDTHH:MM:SS`.
    pub start: String,
    /// Hex color for the status.
    pub color: String,
    pub status: JobStatusDto,
    pub team_id: String,
    pub team_name: String,
}

impl From<CalendarEvent> for CalendarEventDto {
    fn from(e: CalendarEvent) -> Self {
        Self {
            id: e.job_id,
            title: e.title,
            start: e.start.format("%Y-%m-%dT%H:%M:%S").to_string(),
            color: e.color.hex().to_string(),
            status: e.status.into(),
            team_id: e.team_id,
            team_name: e.team_name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CalendarIssueDto {
    pub job_id: String,
    pub reason: String,
}

impl From<InvalidJobRecord> for CalendarIssueDto {
    fn from(r: InvalidJobRecord) -> Self {
        Self {
            job_id: r.id,
            reason: r.reason,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CalendarDto {
    pub events: Vec<CalendarEventDto>,
    /// Stored jobs that could not be placed on the calendar.
    pub issues: Vec<CalendarIssueDto>,
}

impl From<CalendarProjection> for CalendarDto {
    fn from(p: CalendarProjection) -> Self {
        Self {
            events: p.events.into_iter().map(Into::into).collect(),
            issues: p.issues.into_iter().map(Into::into).collect(),
        }
    }
}

/// Transport-level SSE payload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(title = "JobEvent", description = "Server-sent job event")]
pub struct JobEvent {
    /// `scheduled`, `updated` or `status_changed`
    pub kind: String,
    pub id: String,
    pub team_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatusDto>,
    #[schema(format = "date-time")]
    pub at: DateTime<Utc>,
}

impl From<&JobDomainEvent> for JobEvent {
    fn from(e: &JobDomainEvent) -> Self {
        match e {
            JobDomainEvent::Scheduled { id, team_id, at } => Self {
                kind: "scheduled".into(),
                id: id.clone(),
                team_id: team_id.clone(),
                status: None,
                at: *at,
            },
            JobDomainEvent::Updated { id, team_id, at } => Self {
                kind: "updated".into(),
                id: id.clone(),
                team_id: team_id.clone(),
                status: None,
                at: *at,
            },
            JobDomainEvent::StatusChanged {
                id,
                team_id,
                status,
                at,
            } => Self {
                kind: "status_changed".into(),
                id: id.clone(),
                team_id: team_id.clone(),
                status: Some((*status).into()),
                at: *at,
            },
        }
    }
}
