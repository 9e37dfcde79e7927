use crate::error::VerificationError;
use crate::model::{Proof, ProofRequest};
use serde_json::{Map, Value};
use skc_kernel::safe_nanoid;
use std::fmt::Debug;

/// A proof system over decrypted credential claims.
///
/// Implementations must be thread-safe; one instance serves every request.
pub trait ProofScheme: Debug + Send + Sync {
    /// Stable identifier written into every proof.
    fn name(&self) -> &'static str;

    /// Produces a proof that discloses only the requested fields of `request.claims`.
    ///
    /// # Errors
    /// Returns [`VerificationError::Validation`] if a requested field does not exist.
    fn generate(&self, request: &ProofRequest) -> Result<Proof, VerificationError>;

    /// Checks a proof. Revocation is not the scheme's concern.
    fn verify(&self, proof: &Proof) -> bool;
}

/// Stand-in scheme: accepts every proof, but discloses fields for real.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockProofScheme;

impl MockProofScheme {
    pub const NAME: &'static str = "mock";
}

impl ProofScheme for MockProofScheme {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn generate(&self, request: &ProofRequest) -> Result<Proof, VerificationError> {
        let revealed = disclose(&request.claims, &request.reveal)?;

        Ok(Proof {
            proof_id: Some(safe_nanoid!(16)),
            scheme: Self::NAME.to_owned(),
            credential_id: Some(request.credential_id.clone()),
            revealed,
            issued_at: chrono::Utc::now().timestamp_millis(),
        })
    }

    fn verify(&self, _proof: &Proof) -> bool {
        true
    }
}

/// Copies the fields named by `paths` out of `claims`, keeping their nesting.
///
/// # Errors
/// Returns [`VerificationError::Validation`] for an empty path or a field that is absent.
pub fn disclose(claims: &Value, paths: &[String]) -> Result<Map<String, Value>, VerificationError> {
    let mut revealed = Map::new();

    for path in paths {
        let segments: Vec<&str> = path.split('.').map(str::trim).collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(VerificationError::validation(format!("invalid field path `{path}`")));
        }

        let value = segments
            .iter()
            .try_fold(claims, |node, segment| node.get(*segment))
            .ok_or_else(|| VerificationError::validation(format!("unknown claim `{path}`")))?;

        insert_at(&mut revealed, &segments, value.clone());
    }

    Ok(revealed)
}

fn insert_at(target: &mut Map<String, Value>, segments: &[&str], value: Value) {
    match segments {
        [] => {}
        [last] => {
            target.insert((*last).to_owned(), value);
        }
        [head, rest @ ..] => {
            let child = target
                .entry((*head).to_owned())
                .or_insert_with(|| Value::Object(Map::new()));
            if !child.is_object() {
                *child = Value::Object(Map::new());
            }
            if let Value::Object(map) = child {
                insert_at(map, rest, value);
            }
        }
    }
}
