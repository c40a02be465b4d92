//! The control-plane contract consumed by port handles.

use async_trait::async_trait;

use crate::types::{PortDescriptor, PortOptions};

/// Calls a port handle makes to the engine.
///
/// Implementations own transport, naming uniqueness and statistics
/// collection. Errors and statistics records are the implementation's own
/// types and are handed back to callers unchanged.
#[async_trait]
pub trait BessControl: Send + Sync {
    /// Error reported by the engine or its transport.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Statistics record returned for a port.
    type Stats: Send;

    /// Creates a port of kind `driver`.
    ///
    /// `name` is a hint; the returned descriptor carries the authoritative
    /// name.
    async fn create_port(
        &self,
        driver: &str,
        name: Option<&str>,
        options: PortOptions,
    ) -> Result<PortDescriptor, Self::Error>;

    /// Returns the statistics of the port called `name`.
    async fn get_port_stats(&self, name: &str) -> Result<Self::Stats, Self::Error>;
}
