use async_trait::async_trait;

use crate::contract::model::JobSpecs;
use crate::domain::ports::{EnrichmentError, EnrichmentPort, NotesSummary};

/// Adapter used when no text-generation service is configured.
pub struct DisabledEnrichment;

#[async_trait]
impl EnrichmentPort for DisabledEnrichment {
    async fn estimate_duration(&self, _specs: &JobSpecs) -> Result<String, EnrichmentError> {
        Err(EnrichmentError::Disabled)
    }

    async fn enhance_notes(
        &self,
        _notes: &str,
        _summary: &NotesSummary,
    ) -> Result<String, EnrichmentError> {
        Err(EnrichmentError::Disabled)
    }
}
