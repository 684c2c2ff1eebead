pub mod auth;
pub mod enrichment;

pub use auth::{Authenticator, SessionStore};
pub use enrichment::{EnrichmentError, EnrichmentPort, NotesSummary};

/// Output port: publish domain events (no knowledge of transport).
pub trait EventPublisher<E>: Send + Sync + 'static {
    fn publish(&self, event: &E);
}
