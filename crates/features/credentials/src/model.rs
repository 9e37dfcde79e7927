use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use skc_storage::ContentAddress;
use skc_vault::CiphertextBlob;
use utoipa::ToSchema;

/// Academic credential as submitted by an issuer.
///
/// Fields beyond the known ones are kept verbatim in `extra` and travel inside the
/// encrypted envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CredentialDetails {
    /// Credential type, e.g. `degree`
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: Map<String, Value>,
}

/// The plaintext that gets encrypted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CredentialEnvelope {
    /// Wallet address of the student
    pub holder: String,
    /// Wallet address of the issuing institution
    pub issuer: String,
    pub credential: CredentialDetails,
    pub created_at: DateTime<Utc>,
}

/// Request body of `POST /credentials`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssueRequest {
    pub student_address: String,
    pub issuer_address: String,
    pub credential: CredentialDetails,
}

/// Outcome of a successful issuance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct IssueReceipt {
    pub success: bool,
    /// Content address of the pinned document
    #[schema(value_type = String)]
    pub address: ContentAddress,
}

/// Public metadata published next to the ciphertext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PinMeta {
    pub app: String,
    pub timestamp: DateTime<Utc>,
    pub holder: String,
    pub issuer: String,
}

/// The document stored in the content store.
///
/// `encrypted` is written in the versioned record form and read from any wire form,
/// including the bare hex string of older documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PinnedCredential {
    #[schema(value_type = Object)]
    pub encrypted: CiphertextBlob,
    pub meta: PinMeta,
}

/// Response of `GET /credentials/{address}`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CredentialResponse {
    pub success: bool,
    #[serde(flatten)]
    pub credential: PinnedCredential,
}

/// Response of `GET /holders/{holder}/credentials`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HolderCredentials {
    pub success: bool,
    pub holder: String,
    #[schema(value_type = Vec<String>)]
    pub addresses: Vec<ContentAddress>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_details_keep_extra_fields() {
        let raw = json!({
            "type": "degree",
            "title": "B.Tech",
            "issueDate": "2024-06-01",
            "gpa": 3.9,
            "honors": ["cum laude"]
        });

        let details: CredentialDetails = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(details.kind, "degree");
        assert_eq!(details.issue_date.as_deref(), Some("2024-06-01"));
        assert_eq!(details.extra["gpa"], json!(3.9));

        assert_eq!(serde_json::to_value(&details).unwrap(), raw);
    }

    #[test]
    fn test_envelope_is_camel_case() {
        let envelope = CredentialEnvelope {
            holder: "0xABC".to_owned(),
            issuer: "0xDEF".to_owned(),
            credential: serde_json::from_value(json!({ "type": "degree", "title": "B.Tech" }))
                .unwrap(),
            created_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        };

        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["createdAt"], "2023-11-14T22:13:20Z");
        assert_eq!(value["credential"]["type"], "degree");
    }

    #[test]
    fn test_pinned_reads_legacy_hex() {
        let doc = json!({
            "encrypted": format!("{}{}", "00".repeat(16), "11".repeat(16)),
            "meta": {
                "app": "SkillChain Passport",
                "timestamp": "2024-01-01T00:00:00.000Z",
                "holder": "0xABC",
                "issuer": "0xDEF"
            }
        });

        let pinned: PinnedCredential = serde_json::from_value(doc).unwrap();
        assert_eq!(pinned.encrypted.iv(), &[0u8; 16]);

        let rewritten = serde_json::to_value(&pinned).unwrap();
        assert_eq!(rewritten["encrypted"]["v"], 1);
        assert_eq!(rewritten["encrypted"]["alg"], "aes-256-cbc");
    }
}
