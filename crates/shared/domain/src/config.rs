use serde::Deserialize;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level API configuration shared across services.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfigInner {
    pub server: ServerConfig,
    pub security: SecurityConfig,
    pub storage: StorageConfig,
    pub log: LogConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(flatten, default)]
    inner: Arc<ApiConfigInner>,
}

impl Deref for ApiConfig {
    type Target = ApiConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for ApiConfig {
    fn deref_mut(&mut self) -> &mut ApiConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: IpAddr,
    pub port: u16,
    pub ssl: Option<SslConfig>,
}

/// TLS certificate/key paths.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SslConfig {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Cipher used for newly issued credentials.
///
/// Reading is mode-agnostic: every blob names its own cipher.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum CipherKind {
    #[default]
    #[serde(rename = "aes-256-cbc")]
    Aes256Cbc,
    #[serde(rename = "aes-256-gcm")]
    Aes256Gcm,
}

/// Secrets and access control.
///
/// `Debug` never prints the secret or the admin token.
#[derive(Default, Clone, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Credential encryption secret. Required to start the server.
    pub shared_secret: Option<String>,
    pub cipher: CipherKind,
    /// Operator token for the revocation endpoint. Revocation is disabled when unset.
    pub admin_token: Option<String>,
}

impl fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const REDACTED: &str = "[redacted]";
        f.debug_struct("SecurityConfig")
            .field("shared_secret", &self.shared_secret.as_ref().map(|_| REDACTED))
            .field("cipher", &self.cipher)
            .field("admin_token", &self.admin_token.as_ref().map(|_| REDACTED))
            .finish()
    }
}

/// Where pinned credentials live.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Fs,
    Memory,
}

/// Content store settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub data_dir: PathBuf,
}

/// Log output settings, mapped onto the logger builder by the server.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    /// Full `EnvFilter` directive; overrides `level` when set.
    pub filter: Option<String>,
    pub console: bool,
    pub json: bool,
    /// Rolling file output is enabled when a directory is set.
    pub directory: Option<PathBuf>,
    pub max_files: usize,
}

// --- Default ---

impl Default for ServerConfig {
    fn default() -> Self {
        Self { address: IpAddr::V4(Ipv4Addr::UNSPECIFIED), port: 9696, ssl: None }
    }
}

impl Default for SslConfig {
    fn default() -> Self {
        Self { cert: PathBuf::from("cert.pem"), key: PathBuf::from("key.pem") }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { backend: StorageBackend::Fs, data_dir: PathBuf::from("data") }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            filter: None,
            console: true,
            json: false,
            directory: None,
            max_files: 7,
        }
    }
}
