use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// Persisted job row. `date` and `time` are stored as text (`YYYY-MM-DD`, `HH:MM`)
/// and parsed on read.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "jobs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub date: String,
    pub time: String,
    pub estimated_time: String,
    pub contract_number: String,
    pub client_address: String,
    pub client_phone: String,
    pub window_count: i32,
    pub square_meters: f64,
    pub circumference: f64,
    pub inner_sills: bool,
    pub outer_sills: bool,
    pub finishing: bool,
    pub tape: bool,
    pub extras: bool,
    pub notes: String,
    pub status: String,
    pub team_id: String,
    pub team_name: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
