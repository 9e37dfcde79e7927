use serde_json::json;
use skc_storage::{BlobStore, ContentStore, FsContentStore, MemoryContentStore};
use skc_verification::{
    MemoryRevocationRegistry, MockProofScheme, Proof, ProofRequest, ProofScheme,
    REVOCATIONS_RECORD, RevocationJournal, VerificationError, Verifier, VerifyRequest,
};

/// Rejects everything, to check that the scheme verdict is honored.
#[derive(Debug)]
struct RejectingScheme;

impl ProofScheme for RejectingScheme {
    fn name(&self) -> &'static str {
        "rejecting"
    }

    fn generate(&self, request: &ProofRequest) -> Result<Proof, VerificationError> {
        MockProofScheme.generate(request)
    }

    fn verify(&self, _proof: &Proof) -> bool {
        false
    }
}

fn proof_for(id: &str) -> Proof {
    MockProofScheme
        .generate(&ProofRequest {
            credential_id: id.to_owned(),
            claims: json!({ "holder": "0xABC", "credential": { "title": "B.Tech" } }),
            reveal: vec!["credential.title".to_owned()],
        })
        .unwrap()
}

#[test]
fn valid_unrevoked_proof_verifies() {
    let verifier = Verifier::new(MockProofScheme, MemoryRevocationRegistry::new());
    let proof = proof_for("cred-1");

    let report = verifier.verify(VerifyRequest::Bare(proof.clone())).unwrap();
    assert!(report.verified);
    assert!(!report.revoked);
    assert_eq!(report.proof_id, proof.proof_id);
    assert_eq!(report.revealed["credential"]["title"], "B.Tech");
    assert!(report.timestamp > 0);
}

#[tokio::test]
async fn revocation_flips_the_verdict() {
    let verifier = Verifier::new(MockProofScheme, MemoryRevocationRegistry::new());
    let proof = proof_for("cred-1");

    assert!(verifier.revoke(" cred-1 ").await.unwrap());
    assert!(!verifier.revoke("cred-1").await.unwrap());
    assert!(verifier.is_revoked("cred-1"));
    assert_eq!(verifier.revoked_count(), 1);

    let report = verifier.verify(VerifyRequest::Wrapped { proof }).unwrap();
    assert!(!report.verified);
    assert!(report.revoked);

    let other = verifier.verify(VerifyRequest::Bare(proof_for("cred-2"))).unwrap();
    assert!(other.verified);
}

#[test]
fn scheme_verdict_is_honored() {
    let verifier = Verifier::new(RejectingScheme, MemoryRevocationRegistry::new());
    assert_eq!(verifier.scheme_name(), "rejecting");

    let report = verifier.verify(VerifyRequest::Bare(proof_for("cred-1"))).unwrap();
    assert!(!report.verified);
    assert!(!report.revoked);
}

#[tokio::test]
async fn missing_credential_id_is_rejected() {
    let verifier = Verifier::new(MockProofScheme, MemoryRevocationRegistry::new());

    let bare: VerifyRequest = serde_json::from_value(json!({ "proofId": "p1" })).unwrap();
    assert!(matches!(verifier.verify(bare), Err(VerificationError::Validation { .. })));

    let blank: VerifyRequest = serde_json::from_value(json!({ "proof": { "cid": "  " } })).unwrap();
    assert!(matches!(verifier.verify(blank), Err(VerificationError::Validation { .. })));

    assert!(matches!(verifier.revoke("").await, Err(VerificationError::Validation { .. })));
}

#[test]
fn legacy_cred_id_alias_is_accepted() {
    let verifier = Verifier::new(MockProofScheme, MemoryRevocationRegistry::new());
    let request: VerifyRequest =
        serde_json::from_value(json!({ "credId": "cred-9", "revealed": { "gpa": 3.9 } })).unwrap();

    let report = verifier.verify(request).unwrap();
    assert!(report.verified);
    assert_eq!(report.revealed["gpa"], json!(3.9));
    assert!(report.proof_id.is_none());
}

async fn journaled_verifier(root: &std::path::Path) -> Verifier {
    let store: BlobStore = FsContentStore::builder().root(root).connect().await.unwrap().into();
    Verifier::new(MockProofScheme, MemoryRevocationRegistry::new())
        .with_journal(RevocationJournal::new(store))
}

#[tokio::test]
async fn revocations_survive_restart() {
    let dir = tempfile::tempdir().unwrap();

    {
        let verifier = journaled_verifier(dir.path()).await;
        assert_eq!(verifier.restore().await.unwrap(), 0);
        assert!(verifier.revoke("cred-1").await.unwrap());
        assert!(verifier.revoke("cred-2").await.unwrap());
    }

    let restarted = journaled_verifier(dir.path()).await;
    assert!(!restarted.is_revoked("cred-1"));
    assert_eq!(restarted.restore().await.unwrap(), 2);

    assert!(restarted.is_revoked("cred-1"));
    assert!(!restarted.revoke("cred-2").await.unwrap());
    let report = restarted.verify(VerifyRequest::Bare(proof_for("cred-1"))).unwrap();
    assert!(!report.verified);
    assert!(report.revoked);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_revocations_are_all_persisted() {
    let store = BlobStore::from(MemoryContentStore::new());
    let verifier = Verifier::new(MockProofScheme, MemoryRevocationRegistry::new())
        .with_journal(RevocationJournal::new(store.clone()));

    let tasks: Vec<_> = (0..16)
        .map(|i| {
            let verifier = verifier.clone();
            tokio::spawn(async move { verifier.revoke(&format!("cred-{i}")).await })
        })
        .collect();
    for task in tasks {
        assert!(task.await.unwrap().unwrap());
    }

    let record = store.read_record(REVOCATIONS_RECORD).await.unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_slice(&record).unwrap();
    assert_eq!(value["revoked"].as_array().unwrap().len(), 16);
}

#[tokio::test]
async fn malformed_journal_is_reported() {
    let store = BlobStore::from(MemoryContentStore::new());
    store.write_record(REVOCATIONS_RECORD, b"not json").await.unwrap();

    let verifier = Verifier::new(MockProofScheme, MemoryRevocationRegistry::new())
        .with_journal(RevocationJournal::new(store));
    assert!(matches!(verifier.restore().await, Err(VerificationError::Record { .. })));
}
