use serde_json::json;
use skc_credentials::{CredentialError, Credentials, IssueRequest, PinnedCredential};
use skc_storage::{BlobStore, ContentStore, FsContentStore, MemoryContentStore, StorageError};
use skc_vault::{CipherMode, Vault, VaultError};

const SECRET: &str = "test-secret-value";

fn vault(secret: &str, mode: CipherMode) -> Vault {
    Vault::builder().secret(secret).unwrap().mode(mode).build()
}

fn request(holder: &str) -> IssueRequest {
    serde_json::from_value(json!({
        "studentAddress": holder,
        "issuerAddress": "0xDEF",
        "credential": {
            "type": "degree",
            "title": "B.Tech",
            "description": "Computer Science",
            "issueDate": "2024-06-01",
            "gpa": 3.9
        }
    }))
    .unwrap()
}

fn memory_credentials(mode: CipherMode) -> Credentials {
    skc_credentials::init(vault(SECRET, mode), MemoryContentStore::new().into())
}

#[tokio::test]
async fn issue_then_open_roundtrips() {
    let credentials = memory_credentials(CipherMode::Cbc);

    let receipt = credentials.issue(request("0xABC")).await.unwrap();
    assert!(receipt.success);

    let envelope = credentials.open(&receipt.address).await.unwrap();
    assert_eq!(envelope.holder, "0xABC");
    assert_eq!(envelope.issuer, "0xDEF");
    assert_eq!(envelope.credential.title, "B.Tech");
    assert_eq!(envelope.credential.extra["gpa"], json!(3.9));
}

#[tokio::test]
async fn pinned_document_exposes_only_metadata() {
    let credentials = memory_credentials(CipherMode::Cbc);
    let receipt = credentials.issue(request("0xABC")).await.unwrap();

    let pinned = credentials.fetch(&receipt.address).await.unwrap();
    assert_eq!(pinned.meta.app, "SkillChain Passport");
    assert_eq!(pinned.meta.holder, "0xABC");
    assert_eq!(pinned.encrypted.mode(), CipherMode::Cbc);
    assert_eq!(pinned.encrypted.iv().len(), 16);

    let raw = credentials.store.fetch(&receipt.address).await.unwrap();
    let text = String::from_utf8(raw).unwrap();
    assert!(!text.contains("B.Tech"));
    assert!(!text.contains("Computer Science"));
}

#[tokio::test]
async fn gcm_vault_issues_v2_blobs() {
    let credentials = memory_credentials(CipherMode::Gcm);
    let receipt = credentials.issue(request("0xABC")).await.unwrap();

    let pinned = credentials.fetch(&receipt.address).await.unwrap();
    assert_eq!(pinned.encrypted.version(), 2);
    assert_eq!(credentials.open(&receipt.address).await.unwrap().holder, "0xABC");
}

#[tokio::test]
async fn list_tracks_holders_case_insensitively() {
    let credentials = memory_credentials(CipherMode::Cbc);
    let first = credentials.issue(request("0xAbC")).await.unwrap();
    let second = credentials.issue(request("0xabc")).await.unwrap();
    credentials.issue(request("0x123")).await.unwrap();

    assert_ne!(first.address, second.address);
    assert_eq!(credentials.list("0XABC"), vec![first.address, second.address]);
    assert!(credentials.list("0xnobody").is_empty());
}

#[tokio::test]
async fn blank_addresses_are_rejected() {
    let credentials = memory_credentials(CipherMode::Cbc);

    let mut missing_holder = request("  ");
    let err = credentials.issue(missing_holder.clone()).await.unwrap_err();
    assert!(matches!(err, CredentialError::Validation { .. }));

    missing_holder.student_address = "0xABC".to_owned();
    missing_holder.issuer_address = String::new();
    let err = credentials.issue(missing_holder).await.unwrap_err();
    assert!(matches!(err, CredentialError::Validation { .. }));
}

#[tokio::test]
async fn wrong_secret_cannot_open() {
    let store = MemoryContentStore::new();
    let issuer = skc_credentials::init(vault(SECRET, CipherMode::Gcm), store.clone().into());
    let receipt = issuer.issue(request("0xABC")).await.unwrap();

    let reader = skc_credentials::init(vault("another-secret", CipherMode::Gcm), store.into());
    let err = reader.open(&receipt.address).await.unwrap_err();
    assert!(matches!(err, CredentialError::Vault { source: VaultError::Authentication { .. }, .. }));
}

#[tokio::test]
async fn legacy_hex_documents_still_open() {
    let store = MemoryContentStore::new();
    let vault = vault(SECRET, CipherMode::Cbc);
    let blob = vault
        .encrypt(&json!({
            "holder": "0xABC",
            "issuer": "0xDEF",
            "credential": { "type": "degree", "title": "B.Tech" },
            "createdAt": "2024-01-01T00:00:00.000Z"
        }))
        .unwrap();

    let legacy = json!({
        "encrypted": blob.to_concatenated_hex().unwrap(),
        "meta": {
            "app": "SkillChain Passport",
            "timestamp": "2024-01-01T00:00:00.000Z",
            "holder": "0xABC",
            "issuer": "0xDEF"
        }
    });
    let address = store.publish(&serde_json::to_vec(&legacy).unwrap());

    let credentials = skc_credentials::init(vault, store.into());
    let envelope = credentials.open(&address).await.unwrap();
    assert_eq!(envelope.credential.title, "B.Tech");
}

#[tokio::test]
async fn non_credential_documents_are_rejected() {
    let store = MemoryContentStore::new();
    let address = store.publish(b"{\"hello\":\"world\"}");

    let credentials = skc_credentials::init(vault(SECRET, CipherMode::Cbc), store.into());
    let err = credentials.fetch(&address).await.unwrap_err();
    assert!(matches!(err, CredentialError::Document { .. }));
}

#[tokio::test]
async fn unknown_address_is_not_found() {
    let credentials = memory_credentials(CipherMode::Cbc);
    let address = skc_storage::ContentAddress::of(b"never published");

    let err = credentials.fetch(&address).await.unwrap_err();
    assert!(matches!(err, CredentialError::Storage { source: StorageError::NotFound { .. }, .. }));
}

#[tokio::test]
async fn filesystem_backend_roundtrips() {
    let dir = tempfile::tempdir().unwrap();
    let store: BlobStore = FsContentStore::builder().root(dir.path()).connect().await.unwrap().into();
    let credentials = skc_credentials::init(vault(SECRET, CipherMode::Cbc), store);

    let receipt = credentials.issue(request("0xABC")).await.unwrap();
    let pinned: PinnedCredential = credentials.fetch(&receipt.address).await.unwrap();
    assert_eq!(pinned.meta.issuer, "0xDEF");
    assert_eq!(credentials.open(&receipt.address).await.unwrap().holder, "0xABC");
}

async fn fs_credentials(root: &std::path::Path) -> Credentials {
    let store: BlobStore = FsContentStore::builder().root(root).connect().await.unwrap().into();
    skc_credentials::init(vault(SECRET, CipherMode::Cbc), store)
}

#[tokio::test]
async fn index_is_restored_after_restart() {
    let dir = tempfile::tempdir().unwrap();

    let (first, second, other) = {
        let credentials = fs_credentials(dir.path()).await;
        let first = credentials.issue(request("0xABC")).await.unwrap().address;
        std::thread::sleep(std::time::Duration::from_millis(5));
        let second = credentials.issue(request("0xabc")).await.unwrap().address;
        let other = credentials.issue(request("0x123")).await.unwrap().address;
        (first, second, other)
    };

    let restarted = fs_credentials(dir.path()).await;
    assert!(restarted.list("0xABC").is_empty());

    assert_eq!(restarted.restore().await.unwrap(), 3);
    assert_eq!(restarted.list("0xABC"), vec![first.clone(), second]);
    assert_eq!(restarted.list("0x123"), vec![other]);
    assert_eq!(restarted.open(&first).await.unwrap().holder, "0xABC");

    assert_eq!(restarted.restore().await.unwrap(), 3);
    assert_eq!(restarted.list("0xabc").len(), 2, "restoring twice adds no duplicates");
}

#[tokio::test]
async fn restore_skips_foreign_objects() {
    let store = MemoryContentStore::new();
    let _ = store.publish(br#"{"not":"a credential"}"#);
    let credentials = skc_credentials::init(vault(SECRET, CipherMode::Cbc), store.into());

    assert_eq!(credentials.restore().await.unwrap(), 0);
    assert_eq!(credentials.index.holders(), 0);
}
