mod common;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::timeout;

use job_scheduler::contract::model::{JobStatus, ScheduleOptions};
use job_scheduler::domain::refresh::CalendarFeed;

use common::{manager, memory_harness, new_job, team_member};

const WAIT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn feed_refreshes_on_change_notifications() {
    let h = memory_harness().await;
    let service = Arc::new(h.service);
    let (tx, rx) = broadcast::channel::<()>(8);

    let feed = CalendarFeed::spawn(service.clone(), manager(), Duration::from_secs(3600), rx);
    let mut updates = feed.subscribe();

    // first tick fires immediately
    timeout(WAIT, updates.changed()).await.unwrap().unwrap();
    assert!(feed.latest().events.is_empty());

    let job = service
        .schedule_job(&manager(), new_job("team-1", "2025-06-01", "10:00"), ScheduleOptions::default())
        .await
        .unwrap()
        .job;
    tx.send(()).unwrap();
    timeout(WAIT, updates.changed()).await.unwrap().unwrap();
    assert_eq!(feed.latest().events.len(), 1);

    service
        .set_status(&manager(), &job.id, JobStatus::Finished)
        .await
        .unwrap();
    tx.send(()).unwrap();
    timeout(WAIT, updates.changed()).await.unwrap().unwrap();
    assert_eq!(feed.latest().events[0].status, JobStatus::Finished);
    assert_eq!(feed.latest().events[0].color.hex(), "#34D399");
}

#[tokio::test(start_paused = true)]
async fn feed_falls_back_to_timer_when_channel_closes() {
    let h = memory_harness().await;
    let service = Arc::new(h.service);
    let (tx, rx) = broadcast::channel::<()>(8);
    drop(tx);

    let viewer = team_member("team-1");
    let feed = CalendarFeed::spawn(service.clone(), viewer, Duration::from_secs(30), rx);
    let mut updates = feed.subscribe();
    timeout(WAIT, updates.changed()).await.unwrap().unwrap();

    service
        .schedule_job(&manager(), new_job("team-1", "2025-06-01", "10:00"), ScheduleOptions::default())
        .await
        .unwrap();
    service
        .schedule_job(&manager(), new_job("team-2", "2025-06-01", "10:00"), ScheduleOptions::default())
        .await
        .unwrap();

    timeout(Duration::from_secs(60), updates.changed())
        .await
        .unwrap()
        .unwrap();
    let projection = feed.latest();
    assert_eq!(projection.events.len(), 1);
    assert_eq!(projection.events[0].team_id, "team-1");
}
