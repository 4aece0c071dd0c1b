//! Structured logging setup.
//!
//! Installs a global `tracing-subscriber` formatter from a [`LoggingConfig`].
//! Trace records from [`TracingSink`](crate::transport::tap::TracingSink) are
//! emitted at debug level, so `log_level = "debug"` is needed to see them.

use tracing_subscriber::fmt;

use crate::config::LoggingConfig;
use crate::error::{ProtocolError, Result};

/// Install the global subscriber described by `config`.
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let builder = fmt()
        .with_max_level(config.log_level)
        .with_target(true);

    let installed = if config.json_format {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| {
        ProtocolError::ConfigError(format!(
            "Failed to initialise logging for {}: {e}",
            config.app_name
        ))
    })
}
