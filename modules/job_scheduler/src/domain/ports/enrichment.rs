use async_trait::async_trait;
use thiserror::Error;

use crate::contract::model::{Addons, JobSpecs};

#[derive(Error, Debug)]
pub enum EnrichmentError {
    #[error("enrichment is disabled")]
    Disabled,

    #[error("enrichment timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("empty response from text-generation service")]
    EmptyResponse,
}

/// Job fields quoted in the notes-enhancement prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct NotesSummary {
    pub contract_number: String,
    pub client_address: String,
    pub window_count: u32,
    pub square_meters: f64,
    pub circumference: f64,
    pub addons: Addons,
}

/// Best-effort text generation. Callers never fail because of it.
#[async_trait]
pub trait EnrichmentPort: Send + Sync {
    /// A short duration string such as "4 hours".
    async fn estimate_duration(&self, specs: &JobSpecs) -> Result<String, EnrichmentError>;

    /// `notes` with a generated summary prepended.
    async fn enhance_notes(
        &self,
        notes: &str,
        summary: &NotesSummary,
    ) -> Result<String, EnrichmentError>;
}
