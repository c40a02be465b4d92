//! Port handles for a BESS engine.
//!
//! A [`PortHandle`] is the local half of a port living inside the engine.
//! Building one allocates the remote port; the name the engine hands back
//! becomes the handle's identity for every later call.
//!
//! - [`Port`]: implemented by each concrete driver (`PmdPort`, `VPort`, ...)
//! - [`PortConfig`]: name hint plus opaque driver options
//! - [`PortHandle`]: creation, display and statistics passthrough
//! - [`PortError`]: error of the by-name creation path
//!
//! # Architecture
//!
//! ```text
//!   PortHandle::create::<PmdPort>(bess, config)
//!        │
//!        ▼
//!   BessControl::create_port("PMDPort", name_hint, options)
//!        │
//!        ▼
//!   PortDescriptor { name } ──> PortHandle { name, driver }
//! ```
//!
//! There is no generic "Port" value to construct. The drivers are the only
//! way in, so a handle always names a concrete driver.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use bess_client::LocalEngine;
//! use bess_port::{PmdPort, PortConfig, PortHandle};
//!
//! let bess = Arc::new(LocalEngine::new());
//! let config = PortConfig::new().with_name("eth0").with_option("port_id", 0);
//! let port = PortHandle::create::<PmdPort>(bess, config).await?;
//! assert_eq!(port.to_string(), "eth0/PMDPort");
//! let stats = port.get_port_stats().await?;
//! ```

mod config;
mod driver;
mod handle;

pub use config::PortConfig;
pub use driver::{
    is_base_driver, Port, PcapPort, PmdPort, UnixSocketPort, VPort, ZeroCopyVPort,
    BASE_PORT_DRIVER, BUILTIN_DRIVERS,
};
pub use handle::{PortError, PortHandle};
