//! In-process repository keeping rows in their persisted shape.
//! Used by `--mock` runs and tests.

use std::collections::HashMap;

use chrono::NaiveDate;
use parking_lot::RwLock;
use tracing::warn;

use crate::contract::model::{Job, JobPatch, Team, User};
use crate::domain::repo::{JobSet, JobsRepository, UserCredentials};
use crate::domain::scheduling::DATE_FORMAT;
use crate::infra::storage::entity::{job, user};
use crate::infra::storage::mapper;

#[derive(Default)]
struct Tables {
    jobs: HashMap<String, job::Model>,
    teams: Vec<Team>,
    users: HashMap<String, user::Model>,
}

#[derive(Default)]
pub struct InMemoryJobsRepository {
    tables: RwLock<Tables>,
}

impl InMemoryJobsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a row as-is, bypassing validation.
    pub fn insert_row(&self, row: job::Model) {
        self.tables.write().jobs.insert(row.id.clone(), row);
    }
}

#[async_trait::async_trait]
impl JobsRepository for InMemoryJobsRepository {
    async fn list_jobs(&self) -> anyhow::Result<JobSet> {
        let mut rows: Vec<job::Model> = self.tables.read().jobs.values().cloned().collect();
        rows.sort_by(|a, b| (&a.date, &a.time, &a.id).cmp(&(&b.date, &b.time, &b.id)));

        let mut set = JobSet::default();
        for row in rows {
            match mapper::job_from_row(row) {
                Ok(job) => set.jobs.push(job),
                Err(issue) => set.invalid.push(issue),
            }
        }
        Ok(set)
    }

    async fn list_jobs_for_team_on(
        &self,
        team_id: &str,
        date: NaiveDate,
    ) -> anyhow::Result<Vec<Job>> {
        let date = date.format(DATE_FORMAT).to_string();
        let rows: Vec<job::Model> = self
            .tables
            .read()
            .jobs
            .values()
            .filter(|row| row.team_id == team_id && row.date == date)
            .cloned()
            .collect();
        Ok(rows
            .into_iter()
            .filter_map(|row| match mapper::job_from_row(row) {
                Ok(job) => Some(job),
                Err(issue) => {
                    warn!(job_id = %issue.id, reason = %issue.reason, "Skipping unreadable job");
                    None
                }
            })
            .collect())
    }

    async fn find_job(&self, id: &str) -> anyhow::Result<Option<Job>> {
        let row = self.tables.read().jobs.get(id).cloned();
        row.map(|row| {
            mapper::job_from_row(row)
                .map_err(|issue| anyhow::anyhow!("job {} is unreadable: {}", issue.id, issue.reason))
        })
        .transpose()
    }

    async fn save_job(&self, job: &Job) -> anyhow::Result<()> {
        self.insert_row(mapper::job_to_row(job)?);
        Ok(())
    }

    async fn update_job(&self, id: &str, patch: JobPatch) -> anyhow::Result<bool> {
        let mut tables = self.tables.write();
        match tables.jobs.get_mut(id) {
            Some(row) => {
                mapper::apply_patch_to_row(row, patch)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_teams(&self) -> anyhow::Result<Vec<Team>> {
        Ok(self.tables.read().teams.clone())
    }

    async fn upsert_team(&self, team: &Team) -> anyhow::Result<()> {
        let mut tables = self.tables.write();
        match tables.teams.iter_mut().find(|t| t.id == team.id) {
            Some(existing) => existing.name = team.name.clone(),
            None => tables.teams.push(team.clone()),
        }
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        Ok(self.find_credentials(email).await?.map(|c| c.user))
    }

    async fn insert_user(&self, user: &User, password_hash: &str) -> anyhow::Result<()> {
        let mut tables = self.tables.write();
        if tables.users.values().any(|u| u.email == user.email) {
            anyhow::bail!("user with email '{}' already exists", user.email);
        }
        tables
            .users
            .insert(user.uid.clone(), mapper::user_to_row(user, password_hash));
        Ok(())
    }

    async fn find_credentials(&self, email: &str) -> anyhow::Result<Option<UserCredentials>> {
        let row = self
            .tables
            .read()
            .users
            .values()
            .find(|u| u.email == email)
            .cloned();
        row.map(mapper::credentials_from_row).transpose()
    }
}
