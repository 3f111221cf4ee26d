use crate::domain::entities::candidate::{RawCandidate, VerificationInfo};
use crate::domain::error::DomainError;
use async_trait::async_trait;

/// The external scrape + language-model collaborator that checks a claim
/// against the official listing. `Ok(None)` means the collaborator could
/// not produce a verdict; the core then falls back to text-only scoring.
#[async_trait]
pub trait DealVerifier: Send + Sync {
    async fn verify(
        &self,
        candidate: &RawCandidate,
    ) -> Result<Option<VerificationInfo>, DomainError>;
}
