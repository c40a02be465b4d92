//! PortHandle - local proxy of an engine-owned port.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use bess_client::BessControl;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::PortConfig;
use crate::driver::{is_base_driver, AssertConcrete, Port, BASE_PORT_DRIVER};

/// Error of [`PortHandle::create_by_driver`].
#[derive(Debug, Error)]
pub enum PortError<E>
where
    E: std::error::Error + 'static,
{
    /// The abstract base port was requested. No engine call was made.
    #[error("Do not instantiate '{driver}' directly")]
    InvariantViolation { driver: String },

    /// The engine rejected the request; the error is its own.
    #[error(transparent)]
    Remote(E),
}

impl<E> PortError<E>
where
    E: std::error::Error + 'static,
{
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, PortError::InvariantViolation { .. })
    }

    /// Returns the engine error, if this is one.
    pub fn remote(&self) -> Option<&E> {
        match self {
            PortError::Remote(err) => Some(err),
            PortError::InvariantViolation { .. } => None,
        }
    }

    pub fn into_remote(self) -> Option<E> {
        match self {
            PortError::Remote(err) => Some(err),
            PortError::InvariantViolation { .. } => None,
        }
    }
}

/// A port allocated in the engine.
///
/// The handle only exists once the engine has created the port, so its
/// `name` is always the engine-assigned one. Dropping a handle does not
/// touch the remote port.
pub struct PortHandle<C: BessControl> {
    name: String,
    driver: Cow<'static, str>,
    bess: Arc<C>,
}

impl<C: BessControl> PortHandle<C> {
    /// Creates a port of driver `D` and binds the engine-assigned name.
    ///
    /// Issues exactly one `create_port` call. Engine errors are returned
    /// unchanged.
    ///
    /// ```
    /// use std::sync::Arc;
    /// use bess_client::LocalEngine;
    /// use bess_port::{PortConfig, PortHandle, VPort};
    ///
    /// #[tokio::main]
    /// async fn main() {
    ///     let bess = Arc::new(LocalEngine::new());
    ///     let port = PortHandle::create::<VPort>(bess, PortConfig::new().with_name("v0"))
    ///         .await
    ///         .unwrap();
    ///     assert_eq!(port.to_string(), "v0/VPort");
    /// }
    /// ```
    ///
    /// A driver claiming the base port name does not build:
    ///
    /// ```compile_fail,E0080
    /// use std::sync::Arc;
    /// use bess_client::LocalEngine;
    /// use bess_port::{Port, PortConfig, PortHandle};
    ///
    /// struct BasePort;
    ///
    /// impl Port for BasePort {
    ///     const DRIVER: &'static str = "Port";
    /// }
    ///
    /// #[tokio::main]
    /// async fn main() {
    ///     let bess = Arc::new(LocalEngine::new());
    ///     let _ = PortHandle::create::<BasePort>(bess, PortConfig::new()).await;
    /// }
    /// ```
    pub async fn create<D: Port>(bess: Arc<C>, config: PortConfig) -> Result<Self, C::Error> {
        #[allow(clippy::let_unit_value)]
        let () = AssertConcrete::<D>::OK;
        Self::bind(bess, Cow::Borrowed(D::DRIVER), config).await
    }

    /// Creates a port whose driver is only known by name.
    ///
    /// Fails with [`PortError::InvariantViolation`] before contacting the
    /// engine if `driver` is the abstract base port. Unknown driver names are
    /// left for the engine to reject.
    pub async fn create_by_driver(
        bess: Arc<C>,
        driver: &str,
        config: PortConfig,
    ) -> Result<Self, PortError<C::Error>> {
        if is_base_driver(driver) {
            return Err(PortError::InvariantViolation {
                driver: BASE_PORT_DRIVER.to_string(),
            });
        }
        Self::bind(bess, Cow::Owned(driver.to_string()), config)
            .await
            .map_err(PortError::Remote)
    }

    async fn bind(
        bess: Arc<C>,
        driver: Cow<'static, str>,
        config: PortConfig,
    ) -> Result<Self, C::Error> {
        let PortConfig { name, options } = config;
        debug!(
            driver = %driver,
            name_hint = ?name,
            options = options.len(),
            "Requesting port creation"
        );

        let descriptor = bess.create_port(&driver, name.as_deref(), options).await?;

        info!(port = %descriptor.name, driver = %driver, "Port bound");
        Ok(Self {
            name: descriptor.name,
            driver,
            bess,
        })
    }

    /// Engine-assigned port name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Driver the port was created with.
    pub fn driver(&self) -> &str {
        &self.driver
    }

    /// The engine this port lives in.
    pub fn bess(&self) -> &Arc<C> {
        &self.bess
    }

    /// Fetches the port's statistics from the engine, unchanged.
    pub async fn get_port_stats(&self) -> Result<C::Stats, C::Error> {
        debug!(port = %self.name, "Querying port stats");
        self.bess.get_port_stats(&self.name).await
    }
}

impl<C: BessControl> fmt::Display for PortHandle<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.driver)
    }
}

impl<C: BessControl> fmt::Debug for PortHandle<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PortHandle")
            .field("name", &self.name)
            .field("driver", &self.driver)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{PmdPort, VPort};
    use bess_client::{BessError, LocalEngine, PacketDir};

    #[tokio::test]
    async fn test_create_binds_engine_name() {
        let bess = Arc::new(LocalEngine::new());
        let port = PortHandle::create::<VPort>(bess, PortConfig::new())
            .await
            .unwrap();

        assert_eq!(port.name(), "vport0");
        assert_eq!(port.driver(), "VPort");
        assert_eq!(port.to_string(), "vport0/VPort");
    }

    #[tokio::test]
    async fn test_create_with_name_hint() {
        let bess = Arc::new(LocalEngine::new());
        let config = PortConfig::new().with_name("eth0").with_option("port_id", 0);
        let port = PortHandle::create::<PmdPort>(bess.clone(), config)
            .await
            .unwrap();

        assert_eq!(port.to_string(), "eth0/PMDPort");
        assert_eq!(bess.port_driver("eth0").await.as_deref(), Some("PMDPort"));
    }

    #[tokio::test]
    async fn test_engine_error_is_returned_unchanged() {
        let bess = Arc::new(LocalEngine::new());
        let err = PortHandle::create::<PmdPort>(bess.clone(), PortConfig::new())
            .await
            .unwrap_err();

        assert_eq!(err, BessError::invalid_argument("No port specified"));
        assert!(bess.port_names().await.is_empty());
    }

    #[tokio::test]
    async fn test_create_by_driver_rejects_base() {
        let bess = Arc::new(LocalEngine::new());
        let err = PortHandle::create_by_driver(bess.clone(), "Port", PortConfig::new())
            .await
            .unwrap_err();

        assert!(err.is_invariant_violation());
        assert_eq!(err.to_string(), "Do not instantiate 'Port' directly");
        assert!(bess.port_names().await.is_empty());
    }

    #[tokio::test]
    async fn test_create_by_driver_wraps_engine_error() {
        let bess = Arc::new(LocalEngine::new());
        let err = PortHandle::create_by_driver(bess, "NoSuchPort", PortConfig::new())
            .await
            .unwrap_err();

        assert_eq!(
            err.remote(),
            Some(&BessError::not_found("No port driver 'NoSuchPort' found"))
        );
        assert_eq!(err.to_string(), "Not found: No port driver 'NoSuchPort' found");
    }

    #[tokio::test]
    async fn test_stats_passthrough() {
        let bess = Arc::new(LocalEngine::new());
        let port = PortHandle::create_by_driver(bess.clone(), "VPort", PortConfig::new())
            .await
            .unwrap();

        bess.record_traffic(port.name(), PacketDir::Out, 7, 448, 0)
            .await
            .unwrap();

        let stats = port.get_port_stats().await.unwrap();
        assert_eq!(stats.out.packets, 7);
        assert_eq!(stats.out.bytes, 448);
        assert_eq!(stats.inc.packets, 0);
    }

    #[tokio::test]
    async fn test_debug_omits_engine() {
        let bess = Arc::new(LocalEngine::new());
        let port = PortHandle::create::<VPort>(bess, PortConfig::new().with_name("v1"))
            .await
            .unwrap();
        let debug = format!("{:?}", port);
        assert!(debug.contains("\"v1\""));
        assert!(debug.contains("VPort"));
    }
}
