use std::collections::HashMap;

use tracing::warn;

use crate::contract::model::{
    CalendarEvent, CalendarProjection, Job, Role, Team, User, UNKNOWN_TEAM,
};
use crate::domain::repo::JobSet;

/// Team id to display name, with the fallback for ids not in the list.
pub struct TeamDirectory<'a> {
    names: HashMap<&'a str, &'a str>,
}

impl<'a> TeamDirectory<'a> {
    pub fn new(teams: &'a [Team]) -> Self {
        Self {
            names: teams
                .iter()
                .map(|t| (t.id.as_str(), t.name.as_str()))
                .collect(),
        }
    }

    pub fn contains(&self, team_id: &str) -> bool {
        self.names.contains_key(team_id)
    }

    pub fn name_of(&self, team_id: &str) -> &'a str {
        self.names.get(team_id).copied().unwrap_or(UNKNOWN_TEAM)
    }
}

fn visible_team(viewer: &User) -> Option<Option<&str>> {
    match viewer.role {
        Role::Manager => None,
        Role::Team => Some(viewer.team_id.as_deref()),
    }
}

/// Jobs `viewer` may see. A team viewer without a team sees nothing.
pub fn visible_jobs<'j>(jobs: &'j [Job], viewer: &User) -> impl Iterator<Item = &'j Job> + 'j {
    let only = visible_team(viewer).map(|t| t.map(str::to_owned));
    jobs.iter().filter(move |job| match &only {
        None => true,
        Some(Some(team)) => job.team_id == *team,
        Some(None) => false,
    })
}

pub fn event_title(job: &Job) -> String {
    format!("Job #{}", job.contract_number)
}

pub fn to_event(job: &Job, teams: &TeamDirectory<'_>) -> CalendarEvent {
    CalendarEvent {
        job_id: job.id.clone(),
        title: event_title(job),
        start: job.starts_at(),
        color: job.status.color(),
        status: job.status,
        team_id: job.team_id.clone(),
        team_name: teams.name_of(&job.team_id).to_string(),
    }
}

/// Color-coded calendar events for `viewer`. Unreadable records the viewer
/// could see are reported as issues.
pub fn project_calendar(set: &JobSet, teams: &[Team], viewer: &User) -> CalendarProjection {
    let directory = TeamDirectory::new(teams);
    let events = visible_jobs(&set.jobs, viewer)
        .map(|job| to_event(job, &directory))
        .collect();

    let issues: Vec<_> = set
        .invalid
        .iter()
        .filter(|record| match visible_team(viewer) {
            None => true,
            Some(team) => team.is_some() && record.team_id.as_deref() == team,
        })
        .cloned()
        .collect();

    for issue in &issues {
        warn!(job_id = %issue.id, reason = %issue.reason, "job left off the calendar");
    }

    CalendarProjection { events, issues }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::model::{Addons, InvalidJobRecord, JobStatus, StatusColor};
    use chrono::{NaiveDate, NaiveTime, Utc};

    fn job(id: &str, team: &str, status: JobStatus) -> Job {
        Job {
            id: id.into(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            estimated_time: "2 hours".into(),
            contract_number: format!("C-{id}"),
            client_address: "Main St".into(),
            client_phone: "555".into(),
            window_count: 2,
            square_meters: 3.0,
            circumference: 7.0,
            addons: Addons::default(),
            notes: String::new(),
            status,
            team_id: team.into(),
            team_name: String::new(),
            created_by: "manager-1".into(),
            created_at: Utc::now(),
        }
    }

    fn teams() -> Vec<Team> {
        vec![
            Team {
                id: "team-1".into(),
                name: "Alpha Team".into(),
            },
            Team {
                id: "team-2".into(),
                name: "Beta Team".into(),
            },
        ]
    }

    fn viewer(role: Role, team: Option<&str>) -> User {
        User {
            uid: "u".into(),
            email: "u@clearvue.dev".into(),
            name: "U".into(),
            role,
            team_id: team.map(Into::into),
        }
    }

    fn set() -> JobSet {
        JobSet {
            jobs: vec![
                job("1", "team-1", JobStatus::Scheduled),
                job("2", "team-2", JobStatus::Problem),
                job("3", "team-9", JobStatus::Finished),
            ],
            invalid: vec![InvalidJobRecord {
                id: "4".into(),
                team_id: Some("team-2".into()),
                reason: "bad time".into(),
            }],
        }
    }

    #[test]
    fn manager_sees_everything() {
        let projection = project_calendar(&set(), &teams(), &viewer(Role::Manager, None));
        assert_eq!(projection.events.len(), 3);
        assert_eq!(projection.issues.len(), 1);
    }

    #[test]
    fn team_viewer_sees_own_team_only() {
        let projection = project_calendar(&set(), &teams(), &viewer(Role::Team, Some("team-1")));
        assert_eq!(projection.events.len(), 1);
        assert!(projection.events.iter().all(|e| e.team_id == "team-1"));
        assert!(projection.issues.is_empty());

        let projection = project_calendar(&set(), &teams(), &viewer(Role::Team, Some("team-2")));
        assert_eq!(projection.issues.len(), 1);
    }

    #[test]
    fn team_viewer_without_team_sees_nothing() {
        let projection = project_calendar(&set(), &teams(), &viewer(Role::Team, None));
        assert!(projection.events.is_empty());
        assert!(projection.issues.is_empty());
    }

    #[test]
    fn events_carry_title_color_and_team_name() {
        let projection = project_calendar(&set(), &teams(), &viewer(Role::Manager, None));
        let by_id = |id: &str| {
            projection
                .events
                .iter()
                .find(|e| e.job_id == id)
                .unwrap()
                .clone()
        };

        let first = by_id("1");
        assert_eq!(first.title, "Job #C-1");
        assert_eq!(first.color, StatusColor::Blue);
        assert_eq!(first.team_name, "Alpha Team");
        assert_eq!(first.start.to_string(), "2024-06-01 09:00:00");

        assert_eq!(by_id("2").color, StatusColor::Red);
        assert_eq!(by_id("3").team_name, UNKNOWN_TEAM);
    }
}
