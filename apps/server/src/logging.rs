use anyhow::{Context, Result};
use skc::domain::config::LogConfig;
use skc_logger::{LogFormat, Logger, parse_level};

/// Initializes the global logger from the `[log]` section.
///
/// `filter` wins over `level` when both are set. File output is enabled by `directory`.
///
/// # Errors
/// Returns an error if the level is unknown or a logger is already installed.
pub fn init_logger(name: &str, cfg: &LogConfig) -> Result<Logger> {
    let format = if cfg.json { LogFormat::Json } else { LogFormat::Compact };
    let level = parse_level(&cfg.level).context("Invalid log.level")?;

    let mut builder =
        Logger::builder().name(name).level(level).console(cfg.console).console_format(format);
    if let Some(filter) = &cfg.filter {
        builder = builder.env_filter(filter.clone());
    }

    let logger = match &cfg.directory {
        Some(dir) => {
            let file = builder.path(dir).max_files(cfg.max_files).file_format(format);
            file.init()
        }
        None => builder.init(),
    };

    logger.context("Failed to initialize logger")
}
