#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use parking_lot::Mutex;
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use job_scheduler::config::{SeedConfig, TeamSeed, UserSeed};
use job_scheduler::contract::model::{Addons, JobSpecs, NewJob, Role, User};
use job_scheduler::domain::events::JobDomainEvent;
use job_scheduler::domain::ports::{EnrichmentError, EnrichmentPort, EventPublisher, NotesSummary};
use job_scheduler::domain::repo::JobsRepository;
use job_scheduler::domain::service::{Service, ServiceConfig};
use job_scheduler::infra::enrichment::DisabledEnrichment;
use job_scheduler::infra::storage::memory_repo::InMemoryJobsRepository;
use job_scheduler::infra::storage::migrations::Migrator;
use job_scheduler::infra::storage::seed;

pub const MANAGER_EMAIL: &str = "manager@clearvue.dev";
pub const TEAM_EMAIL: &str = "team@clearvue.dev";
pub const PASSWORD: &str = "password";

pub fn manager() -> User {
    User {
        uid: "manager-1".into(),
        email: MANAGER_EMAIL.into(),
        name: "John Manager".into(),
        role: Role::Manager,
        team_id: None,
    }
}

pub fn team_member(team_id: &str) -> User {
    User {
        uid: format!("{team_id}-user"),
        email: TEAM_EMAIL.into(),
        name: "Alice Worker".into(),
        role: Role::Team,
        team_id: Some(team_id.into()),
    }
}

/// Demo accounts used across the tests.
pub fn demo_seed() -> SeedConfig {
    SeedConfig {
        teams: vec![
            TeamSeed {
                id: "team-1".into(),
                name: "Alpha Team".into(),
            },
            TeamSeed {
                id: "team-2".into(),
                name: "Beta Team".into(),
            },
            TeamSeed {
                id: "team-3".into(),
                name: "Gamma Team".into(),
            },
        ],
        users: vec![
            UserSeed {
                uid: "manager-1".into(),
                email: MANAGER_EMAIL.into(),
                name: "John Manager".into(),
                role: "manager".into(),
                team_id: None,
                password: PASSWORD.into(),
            },
            UserSeed {
                uid: "team-1-user".into(),
                email: TEAM_EMAIL.into(),
                name: "Alice Worker".into(),
                role: "team".into(),
                team_id: Some("team-1".into()),
                password: PASSWORD.into(),
            },
        ],
    }
}

pub fn new_job(team_id: &str, date: &str, time: &str) -> NewJob {
    NewJob {
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        time: NaiveTime::parse_from_str(time, "%H:%M").unwrap(),
        estimated_time: "4 hours".into(),
        contract_number: "C-1001".into(),
        client_address: "12 Glazier Lane".into(),
        client_phone: "555-0101".into(),
        window_count: 4,
        square_meters: 6.0,
        circumference: 14.0,
        addons: Addons {
            inner_sills: true,
            ..Default::default()
        },
        notes: "Back entrance".into(),
        team_id: team_id.into(),
    }
}

pub async fn create_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to test database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

pub async fn seeded_memory_repo() -> Arc<InMemoryJobsRepository> {
    let repo = Arc::new(InMemoryJobsRepository::new());
    seed::seed(repo.as_ref(), &demo_seed()).await.unwrap();
    repo
}

#[derive(Default)]
pub struct RecordingPublisher {
    pub events: Mutex<Vec<JobDomainEvent>>,
}

impl EventPublisher<JobDomainEvent> for RecordingPublisher {
    fn publish(&self, event: &JobDomainEvent) {
        self.events.lock().push(event.clone());
    }
}

/// Enrichment double with a canned answer, an error, or a delay.
pub enum FakeEnrichment {
    Answer(String),
    Fail,
    Hang,
}

#[async_trait]
impl EnrichmentPort for FakeEnrichment {
    async fn estimate_duration(&self, _specs: &JobSpecs) -> Result<String, EnrichmentError> {
        self.respond().await
    }

    async fn enhance_notes(
        &self,
        notes: &str,
        summary: &NotesSummary,
    ) -> Result<String, EnrichmentError> {
        self.respond()
            .await
            .map(|s| format!("{s} ({}) {notes}", summary.contract_number))
    }
}

impl FakeEnrichment {
    async fn respond(&self) -> Result<String, EnrichmentError> {
        match self {
            FakeEnrichment::Answer(s) => Ok(s.clone()),
            FakeEnrichment::Fail => Err(EnrichmentError::Api {
                status: 529,
                message: "overloaded".into(),
            }),
            FakeEnrichment::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(EnrichmentError::EmptyResponse)
            }
        }
    }
}

pub struct Harness {
    pub service: Service,
    pub events: Arc<RecordingPublisher>,
}

pub fn service_with(
    repo: Arc<dyn JobsRepository>,
    enrichment: Arc<dyn EnrichmentPort>,
    timeout: Duration,
) -> Harness {
    let events = Arc::new(RecordingPublisher::default());
    let service = Service::new(
        repo,
        events.clone(),
        enrichment,
        ServiceConfig {
            enrichment_timeout: timeout,
        },
    );
    Harness { service, events }
}

pub async fn memory_harness() -> Harness {
    service_with(
        seeded_memory_repo().await,
        Arc::new(DisabledEnrichment),
        Duration::from_secs(30),
    )
}
