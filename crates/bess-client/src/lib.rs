//! Client-side view of the BESS control plane.
//!
//! This crate fixes the shape of the calls a port handle makes to the
//! packet-processing engine, and ships an in-process engine that honours
//! that contract:
//!
//! - [`BessControl`]: the collaborator trait (`create_port`, `get_port_stats`)
//! - [`types`]: descriptors, statistics records and the opaque option bag
//! - [`error`]: errno-style status codes and the engine error type
//! - [`LocalEngine`]: port registry with driver catalogue, naming and counters
//!
//! # Example
//!
//! ```ignore
//! use bess_client::{BessControl, LocalEngine, PortOptions};
//!
//! let engine = LocalEngine::new();
//! let port = engine.create_port("VPort", None, PortOptions::new()).await?;
//! assert_eq!(port.name, "vport0");
//! let stats = engine.get_port_stats(&port.name).await?;
//! ```

pub mod control;
pub mod engine;
pub mod error;
pub mod types;

pub use control::BessControl;
pub use engine::{builtin_drivers, DriverInfo, LocalEngine};
pub use error::{BessError, BessResult, BessStatus};
pub use types::{PacketDir, PacketDirStats, PortDescriptor, PortOptions, PortStats};
