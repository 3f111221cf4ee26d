use crate::domain::entities::candidate::{RawCandidate, VerificationInfo};
use crate::domain::error::DomainError;
use crate::domain::ports::verifier::DealVerifier;
use async_trait::async_trait;

/// Verifier stand-in when no scrape/LLM collaborator is wired: every
/// candidate falls through to text-only scoring.
pub struct NoopVerifier;

#[async_trait]
impl DealVerifier for NoopVerifier {
    async fn verify(
        &self,
        _candidate: &RawCandidate,
    ) -> Result<Option<VerificationInfo>, DomainError> {
        Ok(None)
    }
}
