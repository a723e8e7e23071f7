use std::sync::Arc;

use crate::aggregator::listing_config::ListingConfig;
use crate::registry::ProcessRegistry;

/// Configuration of the management [Server](super::Server).
pub trait ManagementConfig: Send + Sync + 'static {
    fn enable_tracing(&self) -> bool {
        true
    }

    fn host(&self) -> &str {
        "127.0.0.1"
    }

    fn port(&self) -> u16 {
        if cfg!(debug_assertions) { 8080 } else { 8081 }
    }

    fn listing(&self) -> ListingConfig {
        ListingConfig::default()
    }

    /// The process engine whose definitions are listed.
    ///
    /// Called once when the server starts.
    fn registry(&self) -> Arc<dyn ProcessRegistry>;
}

impl<T: ManagementConfig> ManagementConfig for Arc<T> {
    fn enable_tracing(&self) -> bool {
        self.as_ref().enable_tracing()
    }

    fn host(&self) -> &str {
        self.as_ref().host()
    }

    fn port(&self) -> u16 {
        self.as_ref().port()
    }

    fn listing(&self) -> ListingConfig {
        self.as_ref().listing()
    }

    fn registry(&self) -> Arc<dyn ProcessRegistry> {
        self.as_ref().registry()
    }
}
