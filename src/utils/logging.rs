//! Structured logging setup.
//!
//! The codec itself only emits `tracing` events; applications that want them on a
//! console call [`init_logging`] once at startup.

use crate::config::LoggingConfig;
use crate::error::{constants, CodecError, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Install a global fmt subscriber configured from `config`.
///
/// `RUST_LOG` takes precedence over the configured level when set.
///
/// # Errors
/// Returns `CodecError::Config` if a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string().to_lowercase()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = if config.json_format {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| CodecError::Config(format!("{}: {e}", constants::ERR_LOGGING_INIT)))?;

    info!(app = %config.app_name, level = %config.log_level, "Logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_fails() {
        let config = LoggingConfig::default();
        // whichever call comes first may win; the second must report a config error
        let _ = init_logging(&config);
        assert!(matches!(init_logging(&config), Err(CodecError::Config(_))));
    }
}
