//! SeaORM-backed repository implementation for the domain port.
//!
//! Generic over `C: ConnectionTrait`, so it can be built on a
//! `DatabaseConnection` or on a transaction.

use anyhow::Context;
use chrono::NaiveDate;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder,
};
use tracing::warn;

use crate::contract::model::{Job, JobPatch, Team, User};
use crate::domain::repo::{JobSet, JobsRepository, UserCredentials};
use crate::domain::scheduling::DATE_FORMAT;
use crate::infra::storage::entity::{job, team, user};
use crate::infra::storage::mapper;

/// SeaORM repository impl.
/// Holds a connection object; its lifetime/ownership is up to the caller.
pub struct SeaOrmJobsRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmJobsRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

#[async_trait::async_trait]
impl<C> JobsRepository for SeaOrmJobsRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn list_jobs(&self) -> anyhow::Result<JobSet> {
        let rows = job::Entity::find()
            .order_by_asc(job::Column::Date)
            .order_by_asc(job::Column::Time)
            .all(&self.conn)
            .await
            .context("list_jobs failed")?;

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
        let rows = job::Entity::find()
            .filter(job::Column::TeamId.eq(team_id))
            .filter(job::Column::Date.eq(date.format(DATE_FORMAT).to_string()))
            .all(&self.conn)
            .await
            .context("list_jobs_for_team_on failed")?;

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
        let found = job::Entity::find_by_id(id.to_string())
            .one(&self.conn)
            .await
            .context("find_job failed")?;

        found
            .map(|row| {
                mapper::job_from_row(row)
                    .map_err(|issue| anyhow::anyhow!("job {} is unreadable: {}", issue.id, issue.reason))
            })
            .transpose()
    }

    async fn save_job(&self, job: &Job) -> anyhow::Result<()> {
        let am = mapper::job_to_row(job)?.into_active_model();
        job::Entity::insert(am)
            .on_conflict(
                OnConflict::column(job::Column::Id)
                    .update_columns([
                        job::Column::Date,
                        job::Column::Time,
                        job::Column::EstimatedTime,
                        job::Column::ContractNumber,
                        job::Column::ClientAddress,
                        job::Column::ClientPhone,
                        job::Column::WindowCount,
                        job::Column::SquareMeters,
                        job::Column::Circumference,
                        job::Column::InnerSills,
                        job::Column::OuterSills,
                        job::Column::Finishing,
                        job::Column::Tape,
                        job::Column::Extras,
                        job::Column::Notes,
                        job::Column::Status,
                        job::Column::TeamId,
                        job::Column::TeamName,
                        job::Column::CreatedBy,
                        job::Column::CreatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.conn)
            .await
            .context("save_job failed")?;
        Ok(())
    }

    async fn update_job(&self, id: &str, patch: JobPatch) -> anyhow::Result<bool> {
        let exists = job::Entity::find_by_id(id.to_string())
            .one(&self.conn)
            .await
            .context("update_job lookup failed")?
            .is_some();
        if !exists {
            return Ok(false);
        }

        if patch == JobPatch::default() {
            return Ok(true);
        }
        let am = mapper::patch_to_active(id, patch)?;
        am.update(&self.conn).await.context("update_job failed")?;
        Ok(true)
    }

    async fn list_teams(&self) -> anyhow::Result<Vec<Team>> {
        let rows = team::Entity::find()
            .order_by_asc(team::Column::Id)
            .all(&self.conn)
            .await
            .context("list_teams failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn upsert_team(&self, t: &Team) -> anyhow::Result<()> {
        let am = team::Model {
            id: t.id.clone(),
            name: t.name.clone(),
        }
        .into_active_model();
        team::Entity::insert(am)
            .on_conflict(
                OnConflict::column(team::Column::Id)
                    .update_column(team::Column::Name)
                    .to_owned(),
            )
            .exec(&self.conn)
            .await
            .context("upsert_team failed")?;
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        Ok(self.find_credentials(email).await?.map(|c| c.user))
    }

    async fn insert_user(&self, u: &User, password_hash: &str) -> anyhow::Result<()> {
        let am = mapper::user_to_row(u, password_hash).into_active_model();
        user::Entity::insert(am)
            .exec(&self.conn)
            .await
            .context("insert_user failed")?;
        Ok(())
    }

    async fn find_credentials(&self, email: &str) -> anyhow::Result<Option<UserCredentials>> {
        let found = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("find_credentials failed")?;
        found.map(mapper::credentials_from_row).transpose()
    }
}
