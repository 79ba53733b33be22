//! Tracing setup for binaries embedding the client.
//!
//! The library itself only emits `tracing` events (targets `vitrine::http`,
//! `vitrine::invoke`, `vitrine::session`). Call [`init_tracing`] once at
//! startup to print them.
//!
//! ```rust,ignore
//! vitrine::observability::init_tracing("vitrine=debug")?;
//! ```

use crate::error::ClientError;
use tracing_subscriber::EnvFilter;

/// Default filter when neither `RUST_LOG` nor an explicit filter is set.
pub const DEFAULT_FILTER: &str = "vitrine=info";

/// Resolve the filter: `RUST_LOG` wins, then `default_filter`.
pub fn env_filter(default_filter: &str) -> Result<EnvFilter, ClientError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    let directives = if default_filter.trim().is_empty() {
        DEFAULT_FILTER
    } else {
        default_filter
    };
    EnvFilter::try_new(directives).map_err(|e| {
        ClientError::Configuration(format!("Invalid log filter '{directives}': {e}"))
    })
}

/// Install a global fmt subscriber.
///
/// Calling this when a subscriber is already installed is not an error.
pub fn init_tracing(default_filter: &str) -> Result<(), ClientError> {
    let filter = env_filter(default_filter)?;
    let init_result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .try_init();

    match init_result {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_msg = e.to_string();
            if error_msg.contains("global default trace dispatcher has already been set") {
                Ok(())
            } else {
                Err(ClientError::Configuration(format!(
                    "Failed to initialize tracing: {e}"
                )))
            }
        }
    }
}
