use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::contract::model::{
    CalendarProjection, Job, JobPatch, JobSpecs, JobStatus, NewJob, ScheduleOptions, ScheduledJob,
    Team, User,
};
use crate::domain::calendar::{self, TeamDirectory};
use crate::domain::error::DomainError;
use crate::domain::events::JobDomainEvent;
use crate::domain::ports::{EnrichmentError, EnrichmentPort, EventPublisher, NotesSummary};
use crate::domain::repo::JobsRepository;
use crate::domain::scheduling;

/// Domain service with the scheduling rules.
/// Depends only on ports, not on infra types.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn JobsRepository>,
    events: Arc<dyn EventPublisher<JobDomainEvent>>,
    enrichment: Arc<dyn EnrichmentPort>,
    config: ServiceConfig,
}

/// Configuration for the domain service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Upper bound for a single text-generation call.
    pub enrichment_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            enrichment_timeout: Duration::from_secs(30),
        }
    }
}

fn db_err(e: anyhow::Error) -> DomainError {
    DomainError::database(format!("{e:#}"))
}

fn require_manager(actor: &User, action: &str) -> Result<(), DomainError> {
    if actor.is_manager() {
        Ok(())
    } else {
        Err(DomainError::forbidden(action))
    }
}

fn unknown_team_warning(team_id: &str) -> String {
    format!("team '{team_id}' is not a known team; shown as Unknown Team")
}

impl Service {
    /// Create a service with dependencies.
    pub fn new(
        repo: Arc<dyn JobsRepository>,
        events: Arc<dyn EventPublisher<JobDomainEvent>>,
        enrichment: Arc<dyn EnrichmentPort>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            repo,
            events,
            enrichment,
            config,
        }
    }

    async fn with_timeout<T>(
        &self,
        fut: impl Future<Output = Result<T, EnrichmentError>>,
    ) -> Result<T, EnrichmentError> {
        let limit = self.config.enrichment_timeout;
        tokio::time::timeout(limit, fut)
            .await
            .unwrap_or(Err(EnrichmentError::Timeout {
                secs: limit.as_secs(),
            }))
    }

    /// Replace the notes with the enhanced text, or keep them and record a warning.
    async fn enhance_notes_of(&self, new_job: &mut NewJob, warnings: &mut Vec<String>) {
        let summary = NotesSummary {
            contract_number: new_job.contract_number.clone(),
            client_address: new_job.client_address.clone(),
            window_count: new_job.window_count,
            square_meters: new_job.square_meters,
            circumference: new_job.circumference,
            addons: new_job.addons,
        };
        match self
            .with_timeout(self.enrichment.enhance_notes(&new_job.notes, &summary))
            .await
        {
            Ok(enhanced) => new_job.notes = enhanced,
            Err(e) => {
                warn!(error = %e, "Notes enhancement failed, keeping original notes");
                warnings.push(format!("notes were not enhanced: {e}"));
            }
        }
    }

    async fn teams(&self) -> Result<Vec<Team>, DomainError> {
        self.repo.list_teams().await.map_err(db_err)
    }

    /// Schedule a new job for a team.
    ///
    /// The conflict check runs before any enrichment call, so a rejected
    /// job never reaches the text-generation service.
    #[instrument(
        name = "job_scheduler.service.schedule_job",
        skip(self, actor, new_job, options),
        fields(actor = %actor.uid, team_id = %new_job.team_id, date = %new_job.date, time = %new_job.time)
    )]
    pub async fn schedule_job(
        &self,
        actor: &User,
        mut new_job: NewJob,
        options: ScheduleOptions,
    ) -> Result<ScheduledJob, DomainError> {
        info!("Scheduling new job");
        require_manager(actor, "schedule jobs")?;
        scheduling::validate(&new_job)?;

        let same_day = self
            .repo
            .list_jobs_for_team_on(&new_job.team_id, new_job.date)
            .await
            .map_err(db_err)?;
        scheduling::ensure_no_conflict(&new_job, &same_day, None)?;

        let mut warnings = Vec::new();

        if options.enhance_notes {
            self.enhance_notes_of(&mut new_job, &mut warnings).await;
        }

        let teams = self.teams().await?;
        let directory = TeamDirectory::new(&teams);
        if !directory.contains(&new_job.team_id) {
            warn!("Job assigned to unknown team");
            warnings.push(unknown_team_warning(&new_job.team_id));
        }

        let job = Job {
            id: Uuid::new_v4().to_string(),
            date: new_job.date,
            time: new_job.time,
            estimated_time: new_job.estimated_time,
            contract_number: new_job.contract_number,
            client_address: new_job.client_address,
            client_phone: new_job.client_phone,
            window_count: new_job.window_count,
            square_meters: new_job.square_meters,
            circumference: new_job.circumference,
            addons: new_job.addons,
            notes: new_job.notes,
            status: JobStatus::Scheduled,
            team_name: directory.name_of(&new_job.team_id).to_string(),
            team_id: new_job.team_id,
            created_by: actor.uid.clone(),
            created_at: Utc::now(),
        };

        self.repo.save_job(&job).await.map_err(db_err)?;

        self.events.publish(&JobDomainEvent::Scheduled {
            id: job.id.clone(),
            team_id: job.team_id.clone(),
            at: job.created_at,
        });

        info!(job_id = %job.id, "Successfully scheduled job");
        Ok(ScheduledJob { job, warnings })
    }

    /// Replace every editable field of a job. Status and creation metadata are kept.
    /// Like scheduling, notes are only enhanced once the new slot is known to be free.
    #[instrument(
        name = "job_scheduler.service.update_job",
        skip(self, actor, new_job, options),
        fields(actor = %actor.uid, job_id = %id)
    )]
    pub async fn update_job(
        &self,
        actor: &User,
        id: &str,
        mut new_job: NewJob,
        options: ScheduleOptions,
    ) -> Result<ScheduledJob, DomainError> {
        info!("Updating job");
        require_manager(actor, "edit jobs")?;
        scheduling::validate(&new_job)?;

        let mut current = self
            .repo
            .find_job(id)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::job_not_found(id))?;

        let same_day = self
            .repo
            .list_jobs_for_team_on(&new_job.team_id, new_job.date)
            .await
            .map_err(db_err)?;
        scheduling::ensure_no_conflict(&new_job, &same_day, Some(id))?;

        let mut warnings = Vec::new();
        if options.enhance_notes {
            self.enhance_notes_of(&mut new_job, &mut warnings).await;
        }

        let teams = self.teams().await?;
        let directory = TeamDirectory::new(&teams);
        if !directory.contains(&new_job.team_id) {
            warn!(team_id = %new_job.team_id, "Job assigned to unknown team");
            warnings.push(unknown_team_warning(&new_job.team_id));
        }

        let team_name = directory.name_of(&new_job.team_id).to_string();
        let patch = JobPatch::replace_with(new_job, team_name);
        let found = self
            .repo
            .update_job(id, patch.clone())
            .await
            .map_err(db_err)?;
        if !found {
            return Err(DomainError::job_not_found(id));
        }

        patch.apply_to(&mut current);

        self.events.publish(&JobDomainEvent::Updated {
            id: current.id.clone(),
            team_id: current.team_id.clone(),
            at: Utc::now(),
        });

        info!("Successfully updated job");
        Ok(ScheduledJob {
            job: current,
            warnings,
        })
    }

    /// Persist a new status. Only the status field is written; repeating the
    /// same status is not an error.
    #[instrument(
        name = "job_scheduler.service.set_status",
        skip(self, actor),
        fields(actor = %actor.uid, job_id = %id, status = %status)
    )]
    pub async fn set_status(
        &self,
        actor: &User,
        id: &str,
        status: JobStatus,
    ) -> Result<(), DomainError> {
        info!("Changing job status");
        require_manager(actor, "change job status")?;

        let job = self
            .repo
            .find_job(id)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::job_not_found(id))?;

        let found = self
            .repo
            .update_job(id, JobPatch::status(status))
            .await
            .map_err(db_err)?;
        if !found {
            return Err(DomainError::job_not_found(id));
        }

        self.events.publish(&JobDomainEvent::StatusChanged {
            id: job.id,
            team_id: job.team_id,
            status,
            at: Utc::now(),
        });

        info!("Successfully changed job status");
        Ok(())
    }

    /// A job visible to `actor`. Jobs of other teams look absent to team members.
    #[instrument(
        name = "job_scheduler.service.get_job",
        skip(self, actor),
        fields(actor = %actor.uid, job_id = %id)
    )]
    pub async fn get_job(&self, actor: &User, id: &str) -> Result<Job, DomainError> {
        debug!("Getting job by id");
        let mut job = self
            .repo
            .find_job(id)
            .await
            .map_err(db_err)?
            .filter(|job| actor.can_view(job))
            .ok_or_else(|| DomainError::job_not_found(id))?;

        let teams = self.teams().await?;
        job.team_name = TeamDirectory::new(&teams).name_of(&job.team_id).to_string();
        Ok(job)
    }

    #[instrument(name = "job_scheduler.service.list_jobs", skip(self, actor), fields(actor = %actor.uid))]
    pub async fn list_jobs(&self, actor: &User) -> Result<Vec<Job>, DomainError> {
        debug!("Listing jobs");
        let set = self.repo.list_jobs().await.map_err(db_err)?;
        if !set.invalid.is_empty() {
            warn!(count = set.invalid.len(), "Skipping unreadable job records");
        }

        let teams = self.teams().await?;
        let directory = TeamDirectory::new(&teams);
        let jobs: Vec<Job> = calendar::visible_jobs(&set.jobs, actor)
            .map(|job| Job {
                team_name: directory.name_of(&job.team_id).to_string(),
                ..job.clone()
            })
            .collect();

        debug!("Listed {} jobs", jobs.len());
        Ok(jobs)
    }

    #[instrument(name = "job_scheduler.service.calendar", skip(self, viewer), fields(viewer = %viewer.uid))]
    pub async fn calendar(&self, viewer: &User) -> Result<CalendarProjection, DomainError> {
        let set = self.repo.list_jobs().await.map_err(db_err)?;
        let teams = self.teams().await?;
        let projection = calendar::project_calendar(&set, &teams, viewer);
        debug!(
            events = projection.events.len(),
            issues = projection.issues.len(),
            "Projected calendar"
        );
        Ok(projection)
    }

    #[instrument(name = "job_scheduler.service.list_teams", skip(self))]
    pub async fn list_teams(&self) -> Result<Vec<Team>, DomainError> {
        self.teams().await
    }

    /// Ask the text-generation service for a duration. `None` when it is
    /// disabled, slow, or failing.
    #[instrument(
        name = "job_scheduler.service.suggest_estimated_time",
        skip(self, actor, specs),
        fields(actor = %actor.uid, windows = specs.window_count)
    )]
    pub async fn suggest_estimated_time(
        &self,
        actor: &User,
        specs: JobSpecs,
    ) -> Result<Option<String>, DomainError> {
        require_manager(actor, "request estimates")?;
        match self
            .with_timeout(self.enrichment.estimate_duration(&specs))
            .await
        {
            Ok(estimate) => Ok(Some(estimate)),
            Err(EnrichmentError::Disabled) => {
                debug!("Enrichment disabled, no estimate");
                Ok(None)
            }
            Err(e) => {
                warn!(error = %e, "Duration estimate failed");
                Ok(None)
            }
        }
    }
}
