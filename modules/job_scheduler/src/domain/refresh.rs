use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::contract::model::{CalendarProjection, User};
use crate::domain::service::Service;

/// Keeps one viewer's calendar projection current.
///
/// The projection is recomputed on every interval tick and whenever a change
/// notification arrives. The background task stops when the feed is dropped.
pub struct CalendarFeed {
    rx: watch::Receiver<CalendarProjection>,
    task: JoinHandle<()>,
}

impl CalendarFeed {
    pub fn spawn<T>(
        service: Arc<Service>,
        viewer: User,
        interval: Duration,
        mut changes: broadcast::Receiver<T>,
    ) -> Self
    where
        T: Clone + Send + 'static,
    {
        let (tx, rx) = watch::channel(CalendarProjection::default());

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            let mut push_open = true;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    change = changes.recv(), if push_open => match change {
                        Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {}
                        Err(broadcast::error::RecvError::Closed) => {
                            debug!("Change channel closed, falling back to timer only");
                            push_open = false;
                            continue;
                        }
                    },
                }

                match service.calendar(&viewer).await {
                    Ok(projection) => {
                        if tx.send(projection).is_err() {
                            break;
                        }
                    }
                    // keep the previous projection and retry on the next trigger
                    Err(e) => warn!(viewer = %viewer.uid, error = %e, "Calendar refresh failed"),
                }
            }
        });

        Self { rx, task }
    }

    pub fn subscribe(&self) -> watch::Receiver<CalendarProjection> {
        self.rx.clone()
    }

    pub fn latest(&self) -> CalendarProjection {
        self.rx.borrow().clone()
    }
}

impl Drop for CalendarFeed {
    fn drop(&mut self) {
        self.task.abort();
    }
}
