use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// Display name used when a job references a team that is not in the reference set.
pub const UNKNOWN_TEAM: &str = "Unknown Team";

/// Lifecycle state of a job. Any state may move to any other state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobStatus {
    Scheduled,
    Finished,
    ToBeContinued,
    Problem,
}

impl JobStatus {
    pub const ALL: [JobStatus; 4] = [
        JobStatus::Scheduled,
        JobStatus::Finished,
        JobStatus::ToBeContinued,
        JobStatus::Problem,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Scheduled => "Scheduled",
            JobStatus::Finished => "Finished",
            JobStatus::ToBeContinued => "To Be Continued",
            JobStatus::Problem => "Problem",
        }
    }

    /// Calendar color for this status.
    pub fn color(self) -> StatusColor {
        match self {
            JobStatus::Scheduled => StatusColor::Blue,
            JobStatus::Finished => StatusColor::Green,
            JobStatus::ToBeContinued => StatusColor::Amber,
            JobStatus::Problem => StatusColor::Red,
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown job status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for JobStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusColor {
    Blue,
    Green,
    Amber,
    Red,
}

impl StatusColor {
    pub fn hex(self) -> &'static str {
        match self {
            StatusColor::Blue => "#60A5FA",
            StatusColor::Green => "#34D399",
            StatusColor::Amber => "#FBBF24",
            StatusColor::Red => "#F87171",
        }
    }
}

/// Optional work items that come with an installation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Addons {
    pub inner_sills: bool,
    pub outer_sills: bool,
    pub finishing: bool,
    pub tape: bool,
    pub extras: bool,
}

impl Addons {
    /// (label, selected) for every add-on, in display order.
    pub fn entries(&self) -> [(&'static str, bool); 5] {
        [
            ("Inner Sills", self.inner_sills),
            ("Outer Sills", self.outer_sills),
            ("Finishing", self.finishing),
            ("Tape", self.tape),
            ("Extras", self.extras),
        ]
    }

    /// Labels of the selected add-ons.
    pub fn selected_labels(&self) -> Vec<&'static str> {
        self.entries()
            .into_iter()
            .filter_map(|(label, on)| on.then_some(label))
            .collect()
    }
}

/// A scheduled window-installation work order.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub id: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub estimated_time: String,
    pub contract_number: String,
    pub client_address: String,
    pub client_phone: String,
    pub window_count: u32,
    pub square_meters: f64,
    pub circumference: f64,
    pub addons: Addons,
    pub notes: String,
    pub status: JobStatus,
    pub team_id: String,
    /// Display cache, resolved from the team list on read.
    pub team_name: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl Job {
    /// Date and time combined into the job's start instant.
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }
}

/// Everything a manager fills in when scheduling a job.
#[derive(Debug, Clone, PartialEq)]
pub struct NewJob {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub estimated_time: String,
    pub contract_number: String,
    pub client_address: String,
    pub client_phone: String,
    pub window_count: u32,
    pub square_meters: f64,
    pub circumference: f64,
    pub addons: Addons,
    pub notes: String,
    pub team_id: String,
}

impl NewJob {
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    pub fn specs(&self) -> JobSpecs {
        JobSpecs {
            window_count: self.window_count,
            square_meters: self.square_meters,
            circumference: self.circumference,
            addons: self.addons,
            notes: self.notes.clone(),
        }
    }
}

/// Per-request scheduling switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScheduleOptions {
    /// Ask the text-generation service to prepend a summary to the notes.
    pub enhance_notes: bool,
}

/// Result of a successful scheduling call. Warnings are non-blocking
/// (enrichment fell back, team id did not resolve).
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledJob {
    pub job: Job,
    pub warnings: Vec<String>,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JobPatch {
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub estimated_time: Option<String>,
    pub contract_number: Option<String>,
    pub client_address: Option<String>,
    pub client_phone: Option<String>,
    pub window_count: Option<u32>,
    pub square_meters: Option<f64>,
    pub circumference: Option<f64>,
    pub addons: Option<Addons>,
    pub notes: Option<String>,
    pub status: Option<JobStatus>,
    pub team_id: Option<String>,
    pub team_name: Option<String>,
}

impl JobPatch {
    pub fn status(status: JobStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Patch carrying every user-editable field of `new_job`, with the
    /// team name resolved for its team.
    pub fn replace_with(new_job: NewJob, team_name: impl Into<String>) -> Self {
        Self {
            date: Some(new_job.date),
            time: Some(new_job.time),
            estimated_time: Some(new_job.estimated_time),
            contract_number: Some(new_job.contract_number),
            client_address: Some(new_job.client_address),
            client_phone: Some(new_job.client_phone),
            window_count: Some(new_job.window_count),
            square_meters: Some(new_job.square_meters),
            circumference: Some(new_job.circumference),
            addons: Some(new_job.addons),
            notes: Some(new_job.notes),
            status: None,
            team_id: Some(new_job.team_id),
            team_name: Some(team_name.into()),
        }
    }

    pub fn apply_to(self, job: &mut Job) {
        if let Some(v) = self.date {
            job.date = v;
        }
        if let Some(v) = self.time {
            job.time = v;
        }
        if let Some(v) = self.estimated_time {
            job.estimated_time = v;
        }
        if let Some(v) = self.contract_number {
            job.contract_number = v;
        }
        if let Some(v) = self.client_address {
            job.client_address = v;
        }
        if let Some(v) = self.client_phone {
            job.client_phone = v;
        }
        if let Some(v) = self.window_count {
            job.window_count = v;
        }
        if let Some(v) = self.square_meters {
            job.square_meters = v;
        }
        if let Some(v) = self.circumference {
            job.circumference = v;
        }
        if let Some(v) = self.addons {
            job.addons = v;
        }
        if let Some(v) = self.notes {
            job.notes = v;
        }
        if let Some(v) = self.status {
            job.status = v;
        }
        if let Some(v) = self.team_id {
            job.team_id = v;
        }
        if let Some(v) = self.team_name {
            job.team_name = v;
        }
    }
}

/// Inputs for a duration estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct JobSpecs {
    pub window_count: u32,
    pub square_meters: f64,
    pub circumference: f64,
    pub addons: Addons,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Manager,
    Team,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Manager => "manager",
            Role::Team => "team",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manager" => Ok(Role::Manager),
            "team" => Ok(Role::Team),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

/// An authenticated actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub uid: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    /// Set only for `Role::Team`.
    pub team_id: Option<String>,
}

impl User {
    pub fn is_manager(&self) -> bool {
        self.role == Role::Manager
    }

    /// Whether this user may see `job`.
    pub fn can_view(&self, job: &Job) -> bool {
        match self.role {
            Role::Manager => true,
            Role::Team => self.team_id.as_deref() == Some(job.team_id.as_str()),
        }
    }
}

/// A signed-in user and the token identifying the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// One job as shown on the calendar.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    pub job_id: String,
    pub title: String,
    pub start: NaiveDateTime,
    pub color: StatusColor,
    pub status: JobStatus,
    pub team_id: String,
    pub team_name: String,
}

/// A stored job record that could not be read back as a `Job`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidJobRecord {
    pub id: String,
    /// Owning team, when that column was readable.
    pub team_id: Option<String>,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CalendarProjection {
    pub events: Vec<CalendarEvent>,
    /// Records left out of `events` because their date or time is unreadable.
    pub issues: Vec<InvalidJobRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_strings_roundtrip() {
        for status in JobStatus::ALL {
            assert_eq!(status.as_str().parse::<JobStatus>().unwrap(), status);
        }
        assert_eq!(JobStatus::ToBeContinued.to_string(), "To Be Continued");
        assert!("Done".parse::<JobStatus>().is_err());
    }

    #[test]
    fn color_table_is_fixed() {
        assert_eq!(JobStatus::Scheduled.color(), StatusColor::Blue);
        assert_eq!(JobStatus::Finished.color(), StatusColor::Green);
        assert_eq!(JobStatus::ToBeContinued.color(), StatusColor::Amber);
        assert_eq!(JobStatus::Problem.color(), StatusColor::Red);
        assert_eq!(StatusColor::Amber.hex(), "#FBBF24");
    }

    #[test]
    fn selected_addon_labels() {
        let addons = Addons {
            inner_sills: true,
            finishing: true,
            ..Default::default()
        };
        assert_eq!(addons.selected_labels(), vec!["Inner Sills", "Finishing"]);
        assert!(Addons::default().selected_labels().is_empty());
    }

    #[test]
    fn team_member_sees_only_own_team() {
        let member = User {
            uid: "u".into(),
            email: "team@clearvue.dev".into(),
            name: "Alice".into(),
            role: Role::Team,
            team_id: Some("team-1".into()),
        };
        let mut job = Job {
            id: "job-1".into(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            estimated_time: "4 hours".into(),
            contract_number: "C-1".into(),
            client_address: "Main St".into(),
            client_phone: "555".into(),
            window_count: 1,
            square_meters: 1.0,
            circumference: 1.0,
            addons: Addons::default(),
            notes: String::new(),
            status: JobStatus::Scheduled,
            team_id: "team-1".into(),
            team_name: "Alpha Team".into(),
            created_by: "m".into(),
            created_at: Utc::now(),
        };
        assert!(member.can_view(&job));
        job.team_id = "team-2".into();
        assert!(!member.can_view(&job));
    }
}
