//! Port drivers.
//!
//! Each concrete driver is a marker type implementing [`Port`]. The driver
//! name it carries is what the engine is asked to instantiate, and what a
//! handle prints after the port name.

/// Name of the abstract base port. Never a valid driver.
pub const BASE_PORT_DRIVER: &str = "Port";

/// Returns true if `driver` names the abstract base port.
pub const fn is_base_driver(driver: &str) -> bool {
    let driver = driver.as_bytes();
    let base = BASE_PORT_DRIVER.as_bytes();
    if driver.len() != base.len() {
        return false;
    }
    let mut i = 0;
    while i < driver.len() {
        if driver[i] != base[i] {
            return false;
        }
        i += 1;
    }
    true
}

/// A concrete port driver.
///
/// Implementors supply the driver name the engine knows them by. Using a
/// driver whose name is [`BASE_PORT_DRIVER`] to build a handle is rejected
/// at compile time.
///
/// ```ignore
/// struct EthernetPort;
///
/// impl Port for EthernetPort {
///     const DRIVER: &'static str = "EthernetPort";
/// }
/// ```
pub trait Port: Send + Sync + 'static {
    /// Driver name sent to the engine.
    const DRIVER: &'static str;

    /// One-line description.
    const HELP: &'static str = "";

    /// Returns the driver name.
    fn driver_kind() -> &'static str {
        Self::DRIVER
    }
}

/// Post-monomorphisation check that `D` is not the abstract base.
pub(crate) struct AssertConcrete<D>(std::marker::PhantomData<D>);

impl<D: Port> AssertConcrete<D> {
    pub(crate) const OK: () = assert!(
        !is_base_driver(D::DRIVER),
        "Do not instantiate 'Port' directly"
    );
}

macro_rules! define_port_driver {
    ($(#[$meta:meta])* $name:ident, $driver:literal, $help:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        pub struct $name;

        impl Port for $name {
            const DRIVER: &'static str = $driver;
            const HELP: &'static str = $help;
        }
    };
}

define_port_driver!(
    /// DPDK poll mode driver port (`port_id`, `pci` or `vdev`).
    PmdPort,
    "PMDPort",
    "DPDK poll mode driver"
);
define_port_driver!(
    /// libpcap capture port (`dev`).
    PcapPort,
    "PCAPPort",
    "libpcap live packet capture"
);
define_port_driver!(
    /// UNIX domain socket port (`path`).
    UnixSocketPort,
    "UnixSocketPort",
    "packet exchange via a UNIX domain socket"
);
define_port_driver!(
    /// Virtual port towards the Linux host.
    VPort,
    "VPort",
    "Virtual port for Linux host"
);
define_port_driver!(
    /// Zero copy virtual port for guest VMs.
    ZeroCopyVPort,
    "ZeroCopyVPort",
    "zero copy virtual port for guest VMs"
);

/// Driver names of the built-in ports.
pub const BUILTIN_DRIVERS: &[&str] = &[
    PmdPort::DRIVER,
    PcapPort::DRIVER,
    UnixSocketPort::DRIVER,
    VPort::DRIVER,
    ZeroCopyVPort::DRIVER,
];
