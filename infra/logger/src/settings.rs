use crate::error::LoggerError;
use std::str::FromStr;
use tracing::level_filters::LevelFilter;
use tracing_appender::rolling::Rotation;

/// Line format of an output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Single-line human-readable output.
    #[default]
    Compact,
    /// Multi-line human-readable output for local debugging.
    Pretty,
    /// One JSON object per event, for log shippers.
    Json,
}

impl FromStr for LogFormat {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" | "text" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(LoggerError::invalid(format!("unknown log format '{other}'"))),
        }
    }
}

/// Parses a level name such as `info` or `DEBUG`; `off` disables output.
///
/// # Errors
/// Returns [`LoggerError::InvalidConfiguration`] for unknown names.
pub fn parse_level(level: &str) -> Result<LevelFilter, LoggerError> {
    LevelFilter::from_str(level.trim())
        .map_err(|_| LoggerError::invalid(format!("unknown log level '{level}'")))
}

/// Parses a rotation period: `minutely`, `hourly`, `daily`, `weekly` or `never`.
///
/// # Errors
/// Returns [`LoggerError::InvalidConfiguration`] for unknown periods.
pub fn parse_rotation(rotation: &str) -> Result<Rotation, LoggerError> {
    match rotation.trim().to_ascii_lowercase().as_str() {
        "minutely" => Ok(Rotation::MINUTELY),
        "hourly" => Ok(Rotation::HOURLY),
        "daily" => Ok(Rotation::DAILY),
        "weekly" => Ok(Rotation::WEEKLY),
        "never" => Ok(Rotation::NEVER),
        other => Err(LoggerError::invalid(format!("unknown rotation '{other}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug").unwrap(), LevelFilter::DEBUG);
        assert_eq!(parse_level(" WARN ").unwrap(), LevelFilter::WARN);
        assert_eq!(parse_level("off").unwrap(), LevelFilter::OFF);
        assert!(matches!(parse_level("chatty"), Err(LoggerError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_parse_format_and_rotation() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("text".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert!("xml".parse::<LogFormat>().is_err());
        assert_eq!(parse_rotation("hourly").unwrap(), Rotation::HOURLY);
        assert!(parse_rotation("yearly").is_err());
    }
}
