use skc::domain::config::{ApiConfig, CipherKind, StorageBackend};
use skc::domain::registry::InitializedSlice;
use skc::features::credentials::Credentials;
use skc::features::verification::Verification;
use skc::kernel::server::ApiState;
use skc::vault::{CipherMode, VaultError};
use skc::{PlatformError, bootstrap, vault_from_config};

fn config(secret: Option<&str>) -> ApiConfig {
    let mut config = ApiConfig::default();
    config.security.shared_secret = secret.map(str::to_owned);
    config.storage.backend = StorageBackend::Memory;
    config
}

#[test]
fn missing_secret_is_a_configuration_error() {
    for secret in [None, Some(""), Some("   ")] {
        let err = vault_from_config(&config(secret)).unwrap_err();
        assert!(matches!(err, VaultError::Configuration { .. }));
    }
}

#[test]
fn cipher_follows_config() {
    let mut cfg = config(Some("test-secret-value"));
    assert_eq!(vault_from_config(&cfg).unwrap().mode(), CipherMode::Cbc);

    cfg.security.cipher = CipherKind::Aes256Gcm;
    assert_eq!(vault_from_config(&cfg).unwrap().mode(), CipherMode::Gcm);
}

#[tokio::test]
async fn bootstrap_registers_every_slice() {
    let cfg = config(Some("test-secret-value"));
    let slices = bootstrap(&cfg).await.unwrap();
    assert_eq!(slices.len(), skc::features::ENABLED.len());

    let state = ApiState::builder().config(cfg).register_slices(slices).build().unwrap();
    assert!(state.get_slice::<Credentials>().is_some());
    assert!(state.get_slice::<Verification>().is_some());

    let mut names: Vec<_> = state.slice_names().collect();
    names.sort_unstable();
    assert_eq!(names, skc::features::ENABLED);
    assert!(skc::features::is_enabled("verification"));
}

#[tokio::test]
async fn bootstrap_opens_filesystem_store() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config(Some("test-secret-value"));
    cfg.storage.backend = StorageBackend::Fs;
    cfg.storage.data_dir = dir.path().join("objects");

    bootstrap(&cfg).await.unwrap();
    assert!(dir.path().join("objects").is_dir());
}

#[tokio::test]
async fn bootstrap_without_secret_fails() {
    let err = bootstrap(&config(None)).await.unwrap_err();
    assert!(matches!(err, PlatformError::Vault { source: VaultError::Configuration { .. }, .. }));
}

#[test]
fn api_router_documents_every_route() {
    let (_, api) = skc::server::router::api_router().split_for_parts();
    for path in [
        "/health",
        "/credentials",
        "/credentials/{address}",
        "/holders/{holder}/credentials",
        "/proofs",
        "/verify",
        "/revocations",
        "/revocations/{id}",
    ] {
        assert!(api.paths.paths.contains_key(path), "{path}");
    }
}

#[tokio::test]
async fn restart_restores_index_and_revocations() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config(Some("test-secret-value"));
    cfg.storage.backend = StorageBackend::Fs;
    cfg.storage.data_dir = dir.path().join("objects");

    let build_state = |slices: Vec<InitializedSlice>| {
        ApiState::builder().config(cfg.clone()).register_slices(slices).build().unwrap()
    };

    let address = {
        let state = build_state(bootstrap(&cfg).await.unwrap());
        let credentials = state.get_slice::<Credentials>().unwrap();
        let request = serde_json::from_value(serde_json::json!({
            "studentAddress": "0xABC",
            "issuerAddress": "0xDEF",
            "credential": { "type": "degree", "title": "B.Tech" }
        }))
        .unwrap();
        let address = credentials.issue(request).await.unwrap().address;

        let verification = state.get_slice::<Verification>().unwrap();
        verification.verifier.revoke(address.as_str()).await.unwrap();
        address
    };

    let state = build_state(bootstrap(&cfg).await.unwrap());
    let credentials = state.get_slice::<Credentials>().unwrap();
    assert_eq!(credentials.list("0xabc"), vec![address.clone()]);

    let verification = state.get_slice::<Verification>().unwrap();
    assert!(verification.verifier.is_revoked(address.as_str()));
}
