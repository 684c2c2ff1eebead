use async_trait::async_trait;

use crate::contract::{
    error::JobSchedulerError,
    model::{
        CalendarProjection, Job, JobSpecs, JobStatus, NewJob, ScheduleOptions, ScheduledJob, Team,
        User,
    },
};

/// Public API of the job_scheduler module for in-process consumers.
/// Every call is made on behalf of `actor`.
#[async_trait]
pub trait JobSchedulerApi: Send + Sync {
    /// Schedule a new job (managers only)
    async fn schedule_job(
        &self,
        actor: &User,
        new_job: NewJob,
        options: ScheduleOptions,
    ) -> Result<ScheduledJob, JobSchedulerError>;

    /// Replace every editable field of an existing job (managers only)
    async fn update_job(
        &self,
        actor: &User,
        id: &str,
        new_job: NewJob,
        options: ScheduleOptions,
    ) -> Result<ScheduledJob, JobSchedulerError>;

    /// Move a job to another status (managers only)
    async fn set_status(
        &self,
        actor: &User,
        id: &str,
        status: JobStatus,
    ) -> Result<(), JobSchedulerError>;

    /// Get a job visible to `actor`
    async fn get_job(&self, actor: &User, id: &str) -> Result<Job, JobSchedulerError>;

    /// List the jobs visible to `actor`
    async fn list_jobs(&self, actor: &User) -> Result<Vec<Job>, JobSchedulerError>;

    /// Calendar events visible to `actor`
    async fn calendar(&self, actor: &User) -> Result<CalendarProjection, JobSchedulerError>;

    async fn list_teams(&self) -> Result<Vec<Team>, JobSchedulerError>;

    /// Best-effort duration suggestion; `None` when enrichment is unavailable
    async fn suggest_estimated_time(
        &self,
        actor: &User,
        specs: JobSpecs,
    ) -> Result<Option<String>, JobSchedulerError>;
}
