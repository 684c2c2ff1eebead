use sea_orm::{NotSet, Set};

use crate::contract::model::{
    Addons, InvalidJobRecord, Job, JobPatch, JobStatus, Role, Team, User,
};
use crate::domain::repo::UserCredentials;
use crate::domain::scheduling::{DATE_FORMAT, TIME_FORMAT};
use crate::infra::storage::entity::{job, team, user};

fn invalid(row: &job::Model, reason: impl Into<String>) -> InvalidJobRecord {
    InvalidJobRecord {
        id: row.id.clone(),
        team_id: Some(row.team_id.clone()),
        reason: reason.into(),
    }
}

/// Convert a stored row to a contract job. Rows whose date, time, status
/// or window count cannot be read are reported instead.
pub fn job_from_row(row: job::Model) -> Result<Job, InvalidJobRecord> {
    let date = chrono::NaiveDate::parse_from_str(&row.date, DATE_FORMAT)
        .map_err(|e| invalid(&row, format!("date '{}': {e}", row.date)))?;
    let time = chrono::NaiveTime::parse_from_str(&row.time, TIME_FORMAT)
        .or_else(|_| chrono::NaiveTime::parse_from_str(&row.time, "%H:%M:%S"))
        .map_err(|e| invalid(&row, format!("time '{}': {e}", row.time)))?;
    let status = row
        .status
        .parse::<JobStatus>()
        .map_err(|e| invalid(&row, format!("{e}")))?;
    let window_count = u32::try_from(row.window_count)
        .map_err(|_| invalid(&row, format!("window count {}", row.window_count)))?;

    Ok(Job {
        id: row.id,
        date,
        time,
        estimated_time: row.estimated_time,
        contract_number: row.contract_number,
        client_address: row.client_address,
        client_phone: row.client_phone,
        window_count,
        square_meters: row.square_meters,
        circumference: row.circumference,
        addons: Addons {
            inner_sills: row.inner_sills,
            outer_sills: row.outer_sills,
            finishing: row.finishing,
            tape: row.tape,
            extras: row.extras,
        },
        notes: row.notes,
        status,
        team_id: row.team_id,
        team_name: row.team_name,
        created_by: row.created_by,
        created_at: row.created_at,
    })
}

/// The column is a signed 32-bit integer; larger counts are refused, never clamped.
fn stored_window_count(n: u32) -> anyhow::Result<i32> {
    i32::try_from(n).map_err(|_| anyhow::anyhow!("window count {n} does not fit the jobs table"))
}

pub fn job_to_row(job: &Job) -> anyhow::Result<job::Model> {
    Ok(job::Model {
        id: job.id.clone(),
        date: job.date.format(DATE_FORMAT).to_string(),
        time: job.time.format(TIME_FORMAT).to_string(),
        estimated_time: job.estimated_time.clone(),
        contract_number: job.contract_number.clone(),
        client_address: job.client_address.clone(),
        client_phone: job.client_phone.clone(),
        window_count: stored_window_count(job.window_count)?,
        square_meters: job.square_meters,
        circumference: job.circumference,
        inner_sills: job.addons.inner_sills,
        outer_sills: job.addons.outer_sills,
        finishing: job.addons.finishing,
        tape: job.addons.tape,
        extras: job.addons.extras,
        notes: job.notes.clone(),
        status: job.status.as_str().to_string(),
        team_id: job.team_id.clone(),
        team_name: job.team_name.clone(),
        created_by: job.created_by.clone(),
        created_at: job.created_at,
    })
}

fn set_or_skip<T: Into<sea_orm::Value>>(value: Option<T>) -> sea_orm::ActiveValue<T> {
    match value {
        Some(v) => Set(v),
        None => NotSet,
    }
}

/// Active model writing only the `Some` fields of `patch`.
pub fn patch_to_active(id: &str, patch: JobPatch) -> anyhow::Result<job::ActiveModel> {
    let addons = patch.addons;
    let window_count = patch.window_count.map(stored_window_count).transpose()?;
    Ok(job::ActiveModel {
        id: Set(id.to_string()),
        date: set_or_skip(patch.date.map(|d| d.format(DATE_FORMAT).to_string())),
        time: set_or_skip(patch.time.map(|t| t.format(TIME_FORMAT).to_string())),
        estimated_time: set_or_skip(patch.estimated_time),
        contract_number: set_or_skip(patch.contract_number),
        client_address: set_or_skip(patch.client_address),
        client_phone: set_or_skip(patch.client_phone),
        window_count: set_or_skip(window_count),
        square_meters: set_or_skip(patch.square_meters),
        circumference: set_or_skip(patch.circumference),
        inner_sills: set_or_skip(addons.map(|a| a.inner_sills)),
        outer_sills: set_or_skip(addons.map(|a| a.outer_sills)),
        finishing: set_or_skip(addons.map(|a| a.finishing)),
        tape: set_or_skip(addons.map(|a| a.tape)),
        extras: set_or_skip(addons.map(|a| a.extras)),
        notes: set_or_skip(patch.notes),
        status: set_or_skip(patch.status.map(|s| s.as_str().to_string())),
        team_id: set_or_skip(patch.team_id),
        team_name: set_or_skip(patch.team_name),
        created_by: NotSet,
        created_at: NotSet,
    })
}

/// In-place variant of [`patch_to_active`] for rows held in memory.
pub fn apply_patch_to_row(row: &mut job::Model, patch: JobPatch) -> anyhow::Result<()> {
    let window_count = patch.window_count.map(stored_window_count).transpose()?;
    if let Some(v) = patch.date {
        row.date = v.format(DATE_FORMAT).to_string();
    }
    if let Some(v) = patch.time {
        row.time = v.format(TIME_FORMAT).to_string();
    }
    if let Some(v) = patch.estimated_time {
        row.estimated_time = v;
    }
    if let Some(v) = patch.contract_number {
        row.contract_number = v;
    }
    if let Some(v) = patch.client_address {
        row.client_address = v;
    }
    if let Some(v) = patch.client_phone {
        row.client_phone = v;
    }
    if let Some(v) = window_count {
        row.window_count = v;
    }
    if let Some(v) = patch.square_meters {
        row.square_meters = v;
    }
    if let Some(v) = patch.circumference {
        row.circumference = v;
    }
    if let Some(a) = patch.addons {
        row.inner_sills = a.inner_sills;
        row.outer_sills = a.outer_sills;
        row.finishing = a.finishing;
        row.tape = a.tape;
        row.extras = a.extras;
    }
    if let Some(v) = patch.notes {
        row.notes = v;
    }
    if let Some(v) = patch.status {
        row.status = v.as_str().to_string();
    }
    if let Some(v) = patch.team_id {
        row.team_id = v;
    }
    if let Some(v) = patch.team_name {
        row.team_name = v;
    }
    Ok(())
}

impl From<team::Model> for Team {
    fn from(m: team::Model) -> Self {
        Team {
            id: m.id,
            name: m.name,
        }
    }
}

pub fn credentials_from_row(row: user::Model) -> anyhow::Result<UserCredentials> {
    let role: Role = row
        .role
        .parse()
        .map_err(|e: String| anyhow::anyhow!("user {}: {e}", row.uid))?;
    Ok(UserCredentials {
        user: User {
            uid: row.uid,
            email: row.email,
            name: row.name,
            role,
            team_id: row.team_id,
        },
        password_hash: row.password_hash,
    })
}

pub fn user_to_row(user: &User, password_hash: &str) -> user::Model {
    user::Model {
        uid: user.uid.clone(),
        email: user.email.clone(),
        name: user.name.clone(),
        role: user.role.as_str().to_string(),
        team_id: user.team_id.clone(),
        password_hash: password_hash.to_string(),
    }
}
