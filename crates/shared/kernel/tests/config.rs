use skc_kernel::config::{ConfigError, load_config};
use skc_kernel::domain::config::{ApiConfig, CipherKind, StorageBackend};
use std::fs;

#[test]
fn loads_toml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("server.toml");
    fs::write(
        &path,
        r#"
[server]
port = 7070

[security]
shared_secret = "test-secret-value"
cipher = "aes-256-gcm"

[storage]
backend = "memory"
"#,
    )
    .unwrap();

    let cfg: ApiConfig = load_config(Some(&path)).unwrap();
    assert_eq!(cfg.server.port, 7070);
    assert_eq!(cfg.security.shared_secret.as_deref(), Some("test-secret-value"));
    assert_eq!(cfg.security.cipher, CipherKind::Aes256Gcm);
    assert_eq!(cfg.storage.backend, StorageBackend::Memory);
    assert_eq!(cfg.log.level, "info");
}

#[test]
fn explicit_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_config::<ApiConfig>(Some(dir.path().join("absent.toml"))).unwrap_err();
    assert!(matches!(err, ConfigError::Config { .. }));
    assert_eq!(err.kind(), "config");
    assert_eq!(err.public_message(), "invalid configuration");
}

#[test]
fn malformed_value_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("server.toml");
    fs::write(&path, "[server]\nport = \"not-a-port\"\n").unwrap();

    assert!(load_config::<ApiConfig>(Some(&path)).is_err());
}
