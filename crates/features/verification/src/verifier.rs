use crate::error::VerificationError;
use crate::journal::RevocationJournal;
use crate::model::{Proof, ProofRequest, VerificationReport, VerifyRequest};
use crate::revocation::RevocationRegistry;
use crate::scheme::ProofScheme;
use std::sync::Arc;
use tracing::{info, warn};

/// Combines a [`ProofScheme`] with a [`RevocationRegistry`].
///
/// A proof verifies only if the scheme accepts it **and** its credential is not revoked.
/// With a [`RevocationJournal`] attached, revocations outlive the process.
#[derive(Debug, Clone)]
pub struct Verifier {
    scheme: Arc<dyn ProofScheme>,
    registry: Arc<dyn RevocationRegistry>,
    journal: Option<Arc<RevocationJournal>>,
}

impl Verifier {
    pub fn new(
        scheme: impl ProofScheme + 'static,
        registry: impl RevocationRegistry + 'static,
    ) -> Self {
        Self { scheme: Arc::new(scheme), registry: Arc::new(registry), journal: None }
    }

    /// Persists every revocation through `journal`.
    #[must_use]
    pub fn with_journal(mut self, journal: RevocationJournal) -> Self {
        self.journal = Some(Arc::new(journal));
        self
    }

    /// Loads persisted revocations into the registry. Returns how many were loaded.
    ///
    /// # Errors
    /// Returns an error if the journal cannot be read.
    pub async fn restore(&self) -> Result<usize, VerificationError> {
        let Some(journal) = &self.journal else {
            return Ok(0);
        };

        let revoked = journal.load().await?;
        for id in &revoked {
            self.registry.revoke(id);
        }
        info!(revoked = revoked.len(), "Revocations restored");
        Ok(revoked.len())
    }

    #[must_use]
    pub fn scheme_name(&self) -> &'static str {
        self.scheme.name()
    }

    /// # Errors
    /// See [`ProofScheme::generate`].
    pub fn generate(&self, request: &ProofRequest) -> Result<Proof, VerificationError> {
        self.scheme.generate(request)
    }

    /// Verifies a submitted proof.
    ///
    /// # Errors
    /// Returns [`VerificationError::Validation`] if the proof names no credential.
    pub fn verify(&self, request: VerifyRequest) -> Result<VerificationReport, VerificationError> {
        let proof = request.into_proof();
        let credential_id = proof
            .credential_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| VerificationError::validation("proof has no credentialId"))?;

        let proof_valid = self.scheme.verify(&proof);
        let revoked = self.registry.is_revoked(credential_id);
        let verified = proof_valid && !revoked;

        info!(
            credential_id,
            proof_id = proof.proof_id.as_deref().unwrap_or_default(),
            scheme = self.scheme.name(),
            proof_valid,
            revoked,
            verified,
            "Proof verified"
        );

        Ok(VerificationReport {
            verified,
            revoked,
            revealed: proof.revealed,
            proof_id: proof.proof_id,
            timestamp: chrono::Utc::now().timestamp_millis(),
        })
    }

    /// Revokes a credential. Returns `true` if it was not revoked before.
    ///
    /// The journal is rewritten on every call, so a failed write is repaired by retrying.
    ///
    /// # Errors
    /// * [`VerificationError::Validation`] For a blank id.
    /// * [`VerificationError::Storage`] If the journal cannot be written.
    pub async fn revoke(&self, credential_id: &str) -> Result<bool, VerificationError> {
        let credential_id = credential_id.trim();
        if credential_id.is_empty() {
            return Err(VerificationError::validation("credentialId is required"));
        }

        let newly = self.registry.revoke(credential_id);
        if let Some(journal) = &self.journal {
            journal.persist(self.registry.as_ref()).await?;
        }
        warn!(credential_id, newly, "Credential revoked");
        Ok(newly)
    }

    #[must_use]
    pub fn is_revoked(&self, credential_id: &str) -> bool {
        self.registry.is_revoked(credential_id.trim())
    }

    #[must_use]
    pub fn revoked_count(&self) -> usize {
        self.registry.revoked_count()
    }
}
