//! Scheduling scenarios against the domain service on the in-memory store.

mod common;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use job_scheduler::contract::model::{JobStatus, ScheduleOptions, UNKNOWN_TEAM};
use job_scheduler::domain::error::DomainError;
use job_scheduler::domain::events::JobDomainEvent;
use job_scheduler::domain::repo::JobsRepository;
use job_scheduler::infra::storage::entity::job;

use common::{manager, memory_harness, new_job, seeded_memory_repo, service_with, team_member};
use common::FakeEnrichment;

#[tokio::test]
async fn same_team_same_instant_is_rejected() {
    let h = memory_harness().await;
    let actor = manager();

    let first = h
        .service
        .schedule_job(&actor, new_job("team-1", "2025-03-10", "09:00"), ScheduleOptions::default())
        .await
        .unwrap();
    assert!(first.warnings.is_empty());

    let err = h
        .service
        .schedule_job(&actor, new_job("team-1", "2025-03-10", "09:00"), ScheduleOptions::default())
        .await
        .unwrap_err();
    match err {
        DomainError::Conflict { team_id, starts_at } => {
            assert_eq!(team_id, "team-1");
            assert_eq!(starts_at, first.job.starts_at());
        }
        other => panic!("expected conflict, got {other:?}"),
    }

    assert_eq!(h.service.list_jobs(&actor).await.unwrap().len(), 1);
    assert_eq!(h.events.events.lock().len(), 1);
}

#[tokio::test]
async fn a_minute_later_or_another_team_is_accepted() {
    let h = memory_harness().await;
    let actor = manager();

    for (team, time) in [("team-1", "09:00"), ("team-1", "09:01"), ("team-2", "09:00")] {
        h.service
            .schedule_job(&actor, new_job(team, "2025-03-10", time), ScheduleOptions::default())
            .await
            .unwrap();
    }

    let jobs = h.service.list_jobs(&actor).await.unwrap();
    assert_eq!(jobs.len(), 3);

    let mut ids: Vec<_> = jobs.iter().map(|j| j.id.clone()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 3, "ids must be unique");
}

#[tokio::test]
async fn new_jobs_start_scheduled_with_creator() {
    let h = memory_harness().await;
    let before = Utc::now();

    let scheduled = h
        .service
        .schedule_job(&manager(), new_job("team-1", "2025-03-10", "09:00"), ScheduleOptions::default())
        .await
        .unwrap();

    let job = scheduled.job;
    assert_eq!(job.status, JobStatus::Scheduled);
    assert_eq!(job.created_by, "manager-1");
    assert_eq!(job.team_name, "Alpha Team");
    assert!(job.created_at >= before);

    let events = h.events.events.lock();
    assert!(matches!(
        &events[0],
        JobDomainEvent::Scheduled { id, team_id, .. } if *id == job.id && team_id == "team-1"
    ));
}

#[tokio::test]
async fn team_members_cannot_mutate() {
    let h = memory_harness().await;
    let member = team_member("team-1");

    let err = h
        .service
        .schedule_job(&member, new_job("team-1", "2025-03-10", "09:00"), ScheduleOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden { .. }));

    let job = h
        .service
        .schedule_job(&manager(), new_job("team-1", "2025-03-10", "09:00"), ScheduleOptions::default())
        .await
        .unwrap()
        .job;

    let err = h
        .service
        .set_status(&member, &job.id, JobStatus::Finished)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden { .. }));

    let err = h
        .service
        .update_job(
            &member,
            &job.id,
            new_job("team-1", "2025-03-11", "10:00"),
            ScheduleOptions::default(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden { .. }));

    let stored = h.service.get_job(&manager(), &job.id).await.unwrap();
    assert_eq!(stored.status, JobStatus::Scheduled);
    assert_eq!(stored.time, job.time);
}

#[tokio::test]
async fn setting_the_same_status_twice_is_idempotent() {
    let h = memory_harness().await;
    let actor = manager();
    let job = h
        .service
        .schedule_job(&actor, new_job("team-1", "2025-03-10", "09:00"), ScheduleOptions::default())
        .await
        .unwrap()
        .job;

    h.service.set_status(&actor, &job.id, JobStatus::Problem).await.unwrap();
    h.service.set_status(&actor, &job.id, JobStatus::Problem).await.unwrap();

    let stored = h.service.get_job(&actor, &job.id).await.unwrap();
    assert_eq!(stored.status, JobStatus::Problem);
    assert_eq!(stored.notes, job.notes);
    assert_eq!(stored.created_at, job.created_at);

    let calendar = h.service.calendar(&actor).await.unwrap();
    assert_eq!(calendar.events[0].color.hex(), "#F87171");
}

#[tokio::test]
async fn status_of_missing_job_is_not_found() {
    let h = memory_harness().await;
    let err = h
        .service
        .set_status(&manager(), "nope", JobStatus::Finished)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::JobNotFound { id } if id == "nope"));
    assert!(h.events.events.lock().is_empty());
}

#[tokio::test]
async fn update_keeps_own_slot_but_not_a_taken_one() {
    let h = memory_harness().await;
    let actor = manager();
    let a = h
        .service
        .schedule_job(&actor, new_job("team-1", "2025-03-10", "09:00"), ScheduleOptions::default())
        .await
        .unwrap()
        .job;
    h.service
        .schedule_job(&actor, new_job("team-1", "2025-03-10", "13:00"), ScheduleOptions::default())
        .await
        .unwrap();

    let mut same_slot = new_job("team-1", "2025-03-10", "09:00");
    same_slot.notes = "Use the side gate".into();
    let updated = h
        .service
        .update_job(&actor, &a.id, same_slot, ScheduleOptions::default())
        .await
        .unwrap();
    assert_eq!(updated.job.notes, "Use the side gate");
    assert_eq!(updated.job.status, JobStatus::Scheduled);

    let err = h
        .service
        .update_job(
            &actor,
            &a.id,
            new_job("team-1", "2025-03-10", "13:00"),
            ScheduleOptions::default(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict { .. }));
}

#[tokio::test]
async fn unknown_team_is_accepted_with_warning() {
    let h = memory_harness().await;
    let scheduled = h
        .service
        .schedule_job(&manager(), new_job("team-9", "2025-03-10", "09:00"), ScheduleOptions::default())
        .await
        .unwrap();

    assert_eq!(scheduled.job.team_name, UNKNOWN_TEAM);
    assert_eq!(scheduled.warnings.len(), 1);
    assert!(scheduled.warnings[0].contains("team-9"));

    let calendar = h.service.calendar(&manager()).await.unwrap();
    assert_eq!(calendar.events[0].team_name, UNKNOWN_TEAM);
}

#[tokio::test]
async fn invalid_input_is_rejected_before_storage() {
    let h = memory_harness().await;

    let mut job = new_job("team-1", "2025-03-10", "09:00");
    job.window_count = 0;
    let err = h
        .service
        .schedule_job(&manager(), job, ScheduleOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "window_count"));

    let mut job = new_job("team-1", "2025-03-10", "09:00");
    job.contract_number = "   ".into();
    let err = h
        .service
        .schedule_job(&manager(), job, ScheduleOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { .. }));

    assert!(h.service.list_jobs(&manager()).await.unwrap().is_empty());
}

#[tokio::test]
async fn enhanced_notes_replace_the_originals() {
    let h = service_with(
        seeded_memory_repo().await,
        Arc::new(FakeEnrichment::Answer("Summary:".into())),
        Duration::from_secs(5),
    );

    let scheduled = h
        .service
        .schedule_job(
            &manager(),
            new_job("team-1", "2025-03-10", "09:00"),
            ScheduleOptions { enhance_notes: true },
        )
        .await
        .unwrap();

    assert_eq!(scheduled.job.notes, "Summary: (C-1001) Back entrance");
    assert!(scheduled.warnings.is_empty());
}

#[tokio::test]
async fn edits_can_ask_for_enhanced_notes() {
    let repo = seeded_memory_repo().await;
    let h = service_with(
        repo.clone(),
        Arc::new(FakeEnrichment::Answer("Summary:".into())),
        Duration::from_secs(5),
    );
    let job = h
        .service
        .schedule_job(&manager(), new_job("team-1", "2025-03-10", "09:00"), ScheduleOptions::default())
        .await
        .unwrap()
        .job;
    assert_eq!(job.notes, "Back entrance");

    let mut edit = new_job("team-1", "2025-03-10", "09:00");
    edit.notes = "Ring twice".into();
    let updated = h
        .service
        .update_job(&manager(), &job.id, edit, ScheduleOptions { enhance_notes: true })
        .await
        .unwrap();

    assert_eq!(updated.job.notes, "Summary: (C-1001) Ring twice");
    assert!(updated.warnings.is_empty());
    let stored = repo.find_job(&job.id).await.unwrap().unwrap();
    assert_eq!(stored.notes, "Summary: (C-1001) Ring twice");
}

#[tokio::test]
async fn failing_enrichment_keeps_original_notes() {
    let h = service_with(
        seeded_memory_repo().await,
        Arc::new(FakeEnrichment::Fail),
        Duration::from_secs(5),
    );

    let scheduled = h
        .service
        .schedule_job(
            &manager(),
            new_job("team-1", "2025-03-10", "09:00"),
            ScheduleOptions { enhance_notes: true },
        )
        .await
        .unwrap();

    assert_eq!(scheduled.job.notes, "Back entrance");
    assert_eq!(scheduled.warnings.len(), 1);
    assert!(scheduled.warnings[0].contains("not enhanced"));
}

#[tokio::test(start_paused = true)]
async fn slow_enrichment_times_out() {
    let h = service_with(
        seeded_memory_repo().await,
        Arc::new(FakeEnrichment::Hang),
        Duration::from_secs(2),
    );

    let scheduled = h
        .service
        .schedule_job(
            &manager(),
            new_job("team-1", "2025-03-10", "09:00"),
            ScheduleOptions { enhance_notes: true },
        )
        .await
        .unwrap();
    assert_eq!(scheduled.job.notes, "Back entrance");
    assert!(scheduled.warnings[0].contains("timed out"));

    let specs = new_job("team-1", "2025-03-10", "09:00").specs();
    let estimate = h
        .service
        .suggest_estimated_time(&manager(), specs)
        .await
        .unwrap();
    assert_eq!(estimate, None);
}

#[tokio::test]
async fn estimates_are_manager_only_and_best_effort() {
    let h = service_with(
        seeded_memory_repo().await,
        Arc::new(FakeEnrichment::Answer("3 hours".into())),
        Duration::from_secs(5),
    );
    let specs = new_job("team-1", "2025-03-10", "09:00").specs();

    let estimate = h
        .service
        .suggest_estimated_time(&manager(), specs.clone())
        .await
        .unwrap();
    assert_eq!(estimate.as_deref(), Some("3 hours"));

    let err = h
        .service
        .suggest_estimated_time(&team_member("team-1"), specs.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden { .. }));

    let disabled = memory_harness().await;
    let estimate = disabled
        .service
        .suggest_estimated_time(&manager(), specs)
        .await
        .unwrap();
    assert_eq!(estimate, None);
}

#[tokio::test]
async fn team_members_see_only_their_team() {
    let h = memory_harness().await;
    let actor = manager();
    let own = h
        .service
        .schedule_job(&actor, new_job("team-1", "2025-03-10", "09:00"), ScheduleOptions::default())
        .await
        .unwrap()
        .job;
    let other = h
        .service
        .schedule_job(&actor, new_job("team-2", "2025-03-10", "09:00"), ScheduleOptions::default())
        .await
        .unwrap()
        .job;

    let member = team_member("team-1");
    let jobs = h.service.list_jobs(&member).await.unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].id, own.id);

    let calendar = h.service.calendar(&member).await.unwrap();
    assert_eq!(calendar.events.len(), 1);
    assert_eq!(calendar.events[0].title, "Job #C-1001");

    let err = h.service.get_job(&member, &other.id).await.unwrap_err();
    assert!(matches!(err, DomainError::JobNotFound { .. }));

    assert_eq!(h.service.calendar(&actor).await.unwrap().events.len(), 2);
}

#[tokio::test]
async fn unreadable_rows_become_calendar_issues() {
    let repo = seeded_memory_repo().await;
    repo.insert_row(job::Model {
        id: "broken".into(),
        date: "10/03/2025".into(),
        time: "09:00".into(),
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
        status: "Scheduled".into(),
        team_id: "team-1".into(),
        team_name: "Alpha Team".into(),
        created_by: "manager-1".into(),
        created_at: Utc::now(),
    });
    let h = service_with(
        repo,
        Arc::new(job_scheduler::infra::enrichment::DisabledEnrichment),
        Duration::from_secs(5),
    );
    h.service
        .schedule_job(&manager(), new_job("team-1", "2025-03-10", "09:00"), ScheduleOptions::default())
        .await
        .unwrap();

    let calendar = h.service.calendar(&manager()).await.unwrap();
    assert_eq!(calendar.events.len(), 1);
    assert_eq!(calendar.issues.len(), 1);
    assert_eq!(calendar.issues[0].id, "broken");

    let other_team = h.service.calendar(&team_member("team-2")).await.unwrap();
    assert!(other_team.issues.is_empty());
}
