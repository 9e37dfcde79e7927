//! Proof and revocation feature slice.
//!
//! Holders request selective-disclosure proofs over their decrypted credentials;
//! verifiers submit proofs and get back a report that also reflects revocation.
//! The proof system is pluggable through [`ProofScheme`]. [`MockProofScheme`] accepts
//! every proof and stands in until a real scheme is wired.

mod error;
mod handlers;
mod journal;
mod model;
mod revocation;
pub mod router;
mod scheme;
mod verifier;

pub use error::{VerificationError, VerificationErrorExt};
pub use model::{
    GenerateProofRequest, Proof, ProofRequest, ProofResponse, RevocationStatus, RevokeRequest,
    VerificationReport, VerifyRequest,
};
pub use journal::{REVOCATIONS_RECORD, RevocationJournal};
pub use revocation::{MemoryRevocationRegistry, RevocationRegistry};
pub use scheme::{MockProofScheme, ProofScheme, disclose};
pub use verifier::Verifier;

/// Verification feature state
#[skc_derive::skc_slice]
pub struct Verification {
    pub verifier: Verifier,
}

/// Initialize the verification feature.
#[must_use]
pub fn init(verifier: Verifier) -> Verification {
    tracing::info!(scheme = verifier.scheme_name(), "Verification slice initialized");

    Verification::new(VerificationInner { verifier })
}
