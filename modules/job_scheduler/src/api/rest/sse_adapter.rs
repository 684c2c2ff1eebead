use tracing::trace;

use crate::api::rest::dto::JobEvent;
use crate::api::rest::sse::SseBroadcaster;
use crate::domain::{events::JobDomainEvent, ports::EventPublisher};

/// Forwards domain events to the `jobs_events` SSE channel and wakes calendar feeds.
pub struct SseJobEventPublisher {
    out: SseBroadcaster<JobEvent>,
}

impl SseJobEventPublisher {
    pub fn new(out: SseBroadcaster<JobEvent>) -> Self {
        Self { out }
    }
}

impl EventPublisher<JobDomainEvent> for SseJobEventPublisher {
    fn publish(&self, event: &JobDomainEvent) {
        let delivered = self.out.send(JobEvent::from(event));
        trace!(job_id = %event.job_id(), delivered, "Published job event");
    }
}
