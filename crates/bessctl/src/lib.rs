//! Port scripting for BESS.
//!
//! `bessctl` reads a YAML port script, creates each port through a
//! [`PortHandle`](bess_port::PortHandle) and reports the statistics the
//! engine returns for it.
//!
//! # Script format
//!
//! ```yaml
//! ports:
//!   - driver: PMDPort
//!     name: eth0
//!     port_id: 0
//!   - driver: VPort
//!     num_inc_q: 2
//! ```
//!
//! Every key besides `driver` and `name` is a driver option and is passed
//! to the engine untouched.

pub mod run;
pub mod script;

pub use run::{collect_stats, create_ports, engine_status, PortReport};
pub use script::{PortScript, PortSpec, ScriptError};
