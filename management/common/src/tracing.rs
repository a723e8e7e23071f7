//! Utils to enable [::tracing].

use std::panic::Location;

use nameth::NamedEnumValues as _;
use nameth::nameth;
use tracing::debug;
use tracing::subscriber::SetGlobalDefaultError;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set.
const DEFAULT_FILTER: &str = "info,swf_management=debug,tower_http=debug,hyper=info";

/// Enables tracing and registers a [panic hook](std::panic::set_hook).
///
/// The filter is read from `RUST_LOG`, falling back to [DEFAULT_FILTER].
pub fn enable_tracing() -> Result<(), EnableTracingError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_file(cfg!(debug_assertions))
        .with_line_number(cfg!(debug_assertions))
        .with_target(false)
        .with_env_filter(env_filter)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    debug!("Tracing enabled");

    std::panic::set_hook(Box::new(|panic_info| {
        let payload = panic_info.payload();
        let message = payload
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| payload.downcast_ref::<String>().map(String::as_str));
        let location = panic_info
            .location()
            .map(Location::to_string)
            .unwrap_or_else(|| "???".into());
        match message {
            Some(message) => warn!("Panic: {message} at {location}"),
            None => warn!("Panic at {location}"),
        }
    }));
    Ok(())
}

/// Errors thrown by [enable_tracing] when trying to enable tracing multiple times.
#[nameth]
#[derive(thiserror::Error, Debug)]
pub enum EnableTracingError {
    #[error("[{n}] {0}", n = self.name())]
    SetGlobalDefault(#[from] SetGlobalDefaultError),
}

pub mod test_utils {
    use std::sync::Once;

    /// Enables tracing once for all the tests of the process.
    pub fn enable_tracing_for_tests() {
        static ONCE: Once = Once::new();
        ONCE.call_once(|| {
            if let Err(error) = super::enable_tracing() {
                eprintln!("Tracing not enabled: {error}");
            }
        });
    }
}
