use async_trait::async_trait;
use chrono::NaiveDate;

use crate::contract::model::{InvalidJobRecord, Job, JobPatch, Team, User};

/// Snapshot of all stored jobs. Records that could not be read back
/// are reported in `invalid` instead of being dropped.
#[derive(Debug, Clone, Default)]
pub struct JobSet {
    pub jobs: Vec<Job>,
    pub invalid: Vec<InvalidJobRecord>,
}

/// A user together with the stored password hash.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

/// Port for the domain layer: persistence operations the domain needs.
/// Object-safe and async-friendly via `async_trait`.
#[async_trait]
pub trait JobsRepository: Send + Sync {
    async fn list_jobs(&self) -> anyhow::Result<JobSet>;

    /// Jobs of `team_id` on `date`. Unreadable records are skipped.
    async fn list_jobs_for_team_on(&self, team_id: &str, date: NaiveDate)
        -> anyhow::Result<Vec<Job>>;

    async fn find_job(&self, id: &str) -> anyhow::Result<Option<Job>>;

    /// Insert or fully replace a job by id.
    async fn save_job(&self, job: &Job) -> anyhow::Result<()>;

    /// Write only the `Some` fields of `patch`. Returns `false` when `id` is absent.
    async fn update_job(&self, id: &str, patch: JobPatch) -> anyhow::Result<bool>;

    async fn list_teams(&self) -> anyhow::Result<Vec<Team>>;

    async fn upsert_team(&self, team: &Team) -> anyhow::Result<()>;

    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;

    async fn insert_user(&self, user: &User, password_hash: &str) -> anyhow::Result<()>;

    async fn find_credentials(&self, email: &str) -> anyhow::Result<Option<UserCredentials>>;
}
