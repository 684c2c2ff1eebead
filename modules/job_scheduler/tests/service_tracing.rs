//! Tests to verify that the service layer emits expected tracing spans

mod common;

use std::sync::Arc;
use std::time::Duration;

use tracing_test::traced_test;

use job_scheduler::contract::model::{JobStatus, ScheduleOptions};
use job_scheduler::domain::session::SessionService;
use job_scheduler::infra::enrichment::DisabledEnrichment;
use job_scheduler::infra::storage::entity::job;
use job_scheduler::infra::auth::{InMemorySessionStore, PasswordAuthenticator};

use common::{
    manager, memory_harness, new_job, seeded_memory_repo, service_with, MANAGER_EMAIL, PASSWORD,
};

#[traced_test]
#[tokio::test]
async fn schedule_job_emits_spans() {
    // Arrange
    let h = memory_harness().await;

    // Act
    let result = h
        .service
        .schedule_job(&manager(), new_job("team-1", "2025-05-05", "07:30"), ScheduleOptions::default())
        .await;

    // Assert
    assert!(result.is_ok());
    assert!(logs_contain("job_scheduler.service.schedule_job"));
    assert!(logs_contain("Successfully scheduled job"));
}

#[traced_test]
#[tokio::test]
async fn rejected_schedule_is_logged() {
    // Arrange
    let h = memory_harness().await;
    h.service
        .schedule_job(&manager(), new_job("team-1", "2025-05-05", "07:30"), ScheduleOptions::default())
        .await
        .unwrap();

    // Act
    let result = h
        .service
        .schedule_job(&manager(), new_job("team-1", "2025-05-05", "07:30"), ScheduleOptions::default())
        .await;

    // Assert
    assert!(result.is_err());
    assert!(logs_contain("team_id=team-1"));
}

#[traced_test]
#[tokio::test]
async fn set_status_emits_spans() {
    // Arrange
    let h = memory_harness().await;
    let job = h
        .service
        .schedule_job(&manager(), new_job("team-3", "2025-05-05", "07:30"), ScheduleOptions::default())
        .await
        .unwrap()
        .job;

    // Act
    let result = h.service.set_status(&manager(), &job.id, JobStatus::Finished).await;

    // Assert
    assert!(result.is_ok());
    assert!(logs_contain("job_scheduler.service.set_status"));
    assert!(logs_contain("Successfully changed job status"));
}

#[traced_test]
#[tokio::test]
async fn calendar_emits_spans() {
    // Arrange
    let h = memory_harness().await;

    // Act
    let result = h.service.calendar(&manager()).await;

    // Assert
    assert!(result.is_ok());
    assert!(logs_contain("job_scheduler.service.calendar"));
}

#[traced_test]
#[tokio::test]
async fn login_does_not_log_password() {
    // Arrange
    let repo = seeded_memory_repo().await;
    let sessions = SessionService::new(
        Arc::new(PasswordAuthenticator::new(repo)),
        Arc::new(InMemorySessionStore::new()),
    );

    // Act
    let session = sessions.login(MANAGER_EMAIL, PASSWORD).await;
    let rejected = sessions.login(MANAGER_EMAIL, "hunter2").await;

    // Assert
    assert!(session.is_ok());
    assert!(rejected.is_err());
    assert!(logs_contain("job_scheduler.session.login"));
    assert!(logs_contain("Rejected sign-in"));
    assert!(!logs_contain("hunter2"));
}

#[traced_test]
#[tokio::test]
async fn unreadable_same_day_row_is_logged_during_conflict_check() {
    // Arrange
    let repo = seeded_memory_repo().await;
    repo.insert_row(job::Model {
        id: "stale-status".into(),
        date: "2025-05-05".into(),
        time: "07:30".into(),
        estimated_time: "2 hours".into(),
        contract_number: "C-9".into(),
        client_address: "1 Main St".into(),
        client_phone: "555".into(),
        window_count: 1,
        square_meters: 1.0,
        circumference: 4.0,
        inner_sills: false,
        outer_sills: false,
        finishing: false,
        tape: false,
        extras: false,
        notes: String::new(),
        status: "Done".into(),
        team_id: "team-1".into(),
        team_name: "Alpha Team".into(),
        created_by: "manager-1".into(),
        created_at: chrono::Utc::now(),
    });
    let h = service_with(repo, Arc::new(DisabledEnrichment), Duration::from_secs(5));

    // Act
    let result = h
        .service
        .schedule_job(&manager(), new_job("team-1", "2025-05-05", "08:00"), ScheduleOptions::default())
        .await;

    // Assert
    assert!(result.is_ok());
    assert!(logs_contain("Skipping unreadable job"));
    assert!(logs_contain("stale-status"));
}
