use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// Selective-disclosure proof over a credential.
///
/// Every field is optional on input so that proofs produced by other tools can still be
/// submitted; verification rejects them later if the credential id is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Proof {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof_id: Option<String>,
    /// Name of the scheme that produced the proof
    pub scheme: String,
    #[serde(alias = "cid", alias = "credId", skip_serializing_if = "Option::is_none")]
    pub credential_id: Option<String>,
    /// Disclosed claims
    #[schema(value_type = Object)]
    pub revealed: Map<String, Value>,
    /// Milliseconds since the Unix epoch
    pub issued_at: i64,
}

/// Input of [`crate::ProofScheme::generate`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProofRequest {
    pub credential_id: String,
    /// Full plaintext claims the proof is taken over
    pub claims: Value,
    /// Field paths to disclose; nested fields use dots, e.g. `credential.title`
    pub reveal: Vec<String>,
}

/// Body of `POST /verify`: either `{ "proof": { .. } }` or the bare proof.
#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum VerifyRequest {
    Wrapped { proof: Proof },
    Bare(Proof),
}

impl VerifyRequest {
    #[must_use]
    pub fn into_proof(self) -> Proof {
        match self {
            Self::Wrapped { proof } | Self::Bare(proof) => proof,
        }
    }
}

/// Outcome of a verification.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerificationReport {
    /// Proof is valid and the credential is not revoked
    pub verified: bool,
    pub revoked: bool,
    #[schema(value_type = Object)]
    pub revealed: Map<String, Value>,
    pub proof_id: Option<String>,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

/// Body of `POST /proofs`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateProofRequest {
    /// Content address of the credential
    #[serde(alias = "cid", alias = "address")]
    pub credential_id: String,
    #[serde(default)]
    pub reveal: Vec<String>,
}

/// Response of `POST /proofs`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProofResponse {
    pub success: bool,
    pub proof: Proof,
}

/// Body of `POST /revocations`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RevokeRequest {
    #[serde(alias = "cid", alias = "credId")]
    pub credential_id: String,
}

/// Revocation state of one credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RevocationStatus {
    pub success: bool,
    pub credential_id: String,
    pub revoked: bool,
    /// Set on `POST /revocations`: `false` if the credential was already revoked
    #[serde(skip_serializing_if = "Option::is_none")]
    pub newly_revoked: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_verify_request_accepts_both_shapes() {
        let wrapped: VerifyRequest =
            serde_json::from_value(json!({ "proof": { "credentialId": "abc" } })).unwrap();
        let bare: VerifyRequest = serde_json::from_value(json!({ "cid": "abc" })).unwrap();

        assert_eq!(wrapped.into_proof().credential_id.as_deref(), Some("abc"));
        assert_eq!(bare.into_proof().credential_id.as_deref(), Some("abc"));
    }

    #[test]
    fn test_proof_serializes_camel_case() {
        let proof = Proof {
            proof_id: Some("p1".to_owned()),
            scheme: "mock".to_owned(),
            credential_id: Some("abc".to_owned()),
            revealed: Map::new(),
            issued_at: 1,
        };
        let value = serde_json::to_value(&proof).unwrap();
        assert_eq!(value["proofId"], "p1");
        assert_eq!(value["credentialId"], "abc");
        assert_eq!(value["issuedAt"], 1);
    }
}
