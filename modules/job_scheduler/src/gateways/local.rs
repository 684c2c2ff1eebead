use std::sync::Arc;

use async_trait::async_trait;

use crate::contract::{
    client::JobSchedulerApi,
    error::JobSchedulerError,
    model::{
        CalendarProjection, Job, JobSpecs, JobStatus, NewJob, ScheduleOptions, ScheduledJob, Team,
        User,
    },
};
use crate::domain::service::Service;

/// Local implementation of the JobSchedulerApi trait that delegates to the domain service
pub struct JobSchedulerLocalClient {
    service: Arc<Service>,
}

impl JobSchedulerLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl JobSchedulerApi for JobSchedulerLocalClient {
    async fn schedule_job(
        &self,
        actor: &User,
        new_job: NewJob,
        options: ScheduleOptions,
    ) -> Result<ScheduledJob, JobSchedulerError> {
        self.service
            .schedule_job(actor, new_job, options)
            .await
            .map_err(Into::into)
    }

    async fn update_job(
        &self,
        actor: &User,
        id: &str,
        new_job: NewJob,
        options: ScheduleOptions,
    ) -> Result<ScheduledJob, JobSchedulerError> {
        self.service
            .update_job(actor, id, new_job, options)
            .await
            .map_err(Into::into)
    }

    async fn set_status(
        &self,
        actor: &User,
        id: &str,
        status: JobStatus,
    ) -> Result<(), JobSchedulerError> {
        self.service
            .set_status(actor, id, status)
            .await
            .map_err(Into::into)
    }

    async fn get_job(&self, actor: &User, id: &str) -> Result<Job, JobSchedulerError> {
        self.service.get_job(actor, id).await.map_err(Into::into)
    }

    async fn list_jobs(&self, actor: &User) -> Result<Vec<Job>, JobSchedulerError> {
        self.service.list_jobs(actor).await.map_err(Into::into)
    }

    async fn calendar(&self, actor: &User) -> Result<CalendarProjection, JobSchedulerError> {
        self.service.calendar(actor).await.map_err(Into::into)
    }

    async fn list_teams(&self) -> Result<Vec<Team>, JobSchedulerError> {
        self.service.list_teams().await.map_err(Into::into)
    }

    async fn suggest_estimated_time(
        &self,
        actor: &User,
        specs: JobSpecs,
    ) -> Result<Option<String>, JobSchedulerError> {
        self.service
            .suggest_estimated_time(actor, specs)
            .await
            .map_err(Into::into)
    }
}
