use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Prefix of environment overrides, e.g. `SKC__SECURITY__SHARED_SECRET`.
pub const ENV_PREFIX: &str = "SKC";

/// Base name of the configuration file looked up when no path is given.
pub const DEFAULT_CONFIG: &str = "server";

/// Custom error type for config loading.
#[skc_derive::skc_error]
pub enum ConfigError {
    #[public = "invalid configuration"]
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// A reusable configuration loader that combines file-based settings with environment overrides.
///
/// This function implements a layered configuration strategy:
/// 1. **Base File**: Loads settings from a file (e.g., `server.toml`). An explicit path must
///    exist. Without one, the `server` file in the working directory is used when present,
///    so a server can run from environment variables alone.
/// 2. **Environment Overrides**: Overlays values from environment variables prefixed with `SKC__`.
///    Nested structures are accessed using double underscores (e.g., `SKC__SERVER__PORT` maps to `server.port`).
///
/// # Errors
/// This function will return an error if:
/// * An explicitly given configuration file cannot be found.
/// * The content of the file does not match the structure of type `T`.
///
/// # Example
/// ```rust
/// use skc_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let required = path.is_some();
    let effective_path =
        path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG), |p| p.as_ref().to_path_buf());

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(required))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .convert_case(config::Case::Snake),
        );

    info!(path = %effective_path.display(), required, "Loading config");

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
