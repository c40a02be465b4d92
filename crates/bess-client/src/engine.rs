//! In-process engine implementing [`BessControl`].
//!
//! `LocalEngine` keeps the port registry the daemon would keep: a catalogue
//! of drivers, the set of live ports with their queue layout, and
//! per-direction packet counters. Option checks follow the daemon's
//! behaviour so that callers see the same rejections they would get from a
//! real engine.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use crate::control::BessControl;
use crate::error::{BessError, BessResult};
use crate::types::{PacketDir, PacketDirStats, PortDescriptor, PortOptions, PortStats};

/// Maximum number of queues per direction.
pub const MAX_QUEUES_PER_DIR: u64 = 32;

/// Queue count used when `num_inc_q` / `num_out_q` is absent.
pub const DEFAULT_NUM_QUEUES: u64 = 1;

/// Queue size bounds (0 selects the driver default).
pub const MIN_QUEUE_SIZE: u64 = 8;
pub const MAX_QUEUE_SIZE: u64 = 4096;

/// Number of DPDK port ids the PMD driver accepts.
pub const MAX_DPDK_PORTS: u64 = 32;

static PORT_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid port name pattern"));

static PCI_ADDR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[0-9A-Fa-f]{4}:)?[0-9A-Fa-f]{2}:[0-9A-Fa-f]{2}\.[0-7]$")
        .expect("valid PCI address pattern")
});

/// A port driver known to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriverInfo {
    /// Driver name as used in creation requests (e.g. "PMDPort").
    pub name: String,
    /// Prefix for generated port names (e.g. "pmd_port").
    pub name_template: String,
    pub help: String,
}

impl DriverInfo {
    pub fn new(
        name: impl Into<String>,
        name_template: impl Into<String>,
        help: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            name_template: name_template.into(),
            help: help.into(),
        }
    }
}

/// The drivers every engine ships with.
pub fn builtin_drivers() -> Vec<DriverInfo> {
    vec![
        DriverInfo::new("PMDPort", "pmd_port", "DPDK poll mode driver"),
        DriverInfo::new("PCAPPort", "pcap_port", "libpcap live packet capture"),
        DriverInfo::new(
            "UnixSocketPort",
            "unix_port",
            "packet exchange via a UNIX domain socket",
        ),
        DriverInfo::new("VPort", "vport", "Virtual port for Linux host"),
        DriverInfo::new("ZeroCopyVPort", "zcvport", "zero copy virtual port for guest VMs"),
    ]
}

#[derive(Debug)]
struct PortEntry {
    driver: String,
    num_inc_q: u64,
    num_out_q: u64,
    inc: PacketDirStats,
    out: PacketDirStats,
}

impl PortEntry {
    fn dir_mut(&mut self, dir: PacketDir) -> &mut PacketDirStats {
        match dir {
            PacketDir::Inc => &mut self.inc,
            PacketDir::Out => &mut self.out,
        }
    }
}

#[derive(Debug, Default)]
struct EngineState {
    drivers: BTreeMap<String, DriverInfo>,
    ports: BTreeMap<String, PortEntry>,
    /// DPDK ports attached at startup; ids `0..dpdk_ports` are usable.
    dpdk_ports: u64,
}

impl EngineState {
    /// Picks `<template><N>` with the lowest free N.
    fn default_name(&self, template: &str) -> String {
        let mut idx: u64 = 0;
        loop {
            let candidate = format!("{}{}", template, idx);
            if !self.ports.contains_key(&candidate) {
                return candidate;
            }
            idx += 1;
        }
    }

    fn port_mut(&mut self, name: &str) -> BessResult<&mut PortEntry> {
        self.ports
            .get_mut(name)
            .ok_or_else(|| BessError::not_found(format!("No port '{}' found", name)))
    }
}

/// Port registry living in the caller's process.
#[derive(Debug)]
pub struct LocalEngine {
    state: Mutex<EngineState>,
}

impl Default for LocalEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalEngine {
    /// Creates an engine with the built-in drivers.
    pub fn new() -> Self {
        Self::with_drivers(builtin_drivers())
    }

    /// Creates an engine knowing only `drivers`.
    pub fn with_drivers(drivers: impl IntoIterator<Item = DriverInfo>) -> Self {
        let drivers = drivers
            .into_iter()
            .map(|info| (info.name.clone(), info))
            .collect();
        Self {
            state: Mutex::new(EngineState {
                drivers,
                ports: BTreeMap::new(),
                dpdk_ports: MAX_DPDK_PORTS,
            }),
        }
    }

    /// Limits the DPDK ports the engine has attached to `0..count`.
    ///
    /// Ids past `count` but below [`MAX_DPDK_PORTS`] are valid yet absent,
    /// and fail with [`BessError::NoDevice`].
    pub fn with_dpdk_ports(self, count: u64) -> Self {
        let mut state = self.state.into_inner();
        state.dpdk_ports = count.min(MAX_DPDK_PORTS);
        Self {
            state: Mutex::new(state),
        }
    }

    /// Adds a driver to the catalogue.
    pub async fn register_driver(&self, info: DriverInfo) -> BessResult<()> {
        let mut state = self.state.lock().await;
        if state.drivers.contains_key(&info.name) {
            return Err(BessError::already_exists(format!(
                "Driver '{}' already registered",
                info.name
            )));
        }
        debug!(driver = %info.name, "Registered port driver");
        state.drivers.insert(info.name.clone(), info);
        Ok(())
    }

    /// Lists the driver catalogue, sorted by name.
    pub async fn list_drivers(&self) -> Vec<DriverInfo> {
        self.state.lock().await.drivers.values().cloned().collect()
    }

    /// Names of all live ports, sorted.
    pub async fn port_names(&self) -> Vec<String> {
        self.state.lock().await.ports.keys().cloned().collect()
    }

    /// Driver of the port called `name`, if it exists.
    pub async fn port_driver(&self, name: &str) -> Option<String> {
        self.state
            .lock()
            .await
            .ports
            .get(name)
            .map(|port| port.driver.clone())
    }

    /// Queue layout `(num_inc_q, num_out_q)` of the port called `name`.
    pub async fn port_queues(&self, name: &str) -> Option<(u64, u64)> {
        self.state
            .lock()
            .await
            .ports
            .get(name)
            .map(|port| (port.num_inc_q, port.num_out_q))
    }

    /// Accounts traffic on a port.
    #[instrument(skip(self))]
    pub async fn record_traffic(
        &self,
        name: &str,
        dir: PacketDir,
        packets: u64,
        bytes: u64,
        dropped: u64,
    ) -> BessResult<()> {
        let mut state = self.state.lock().await;
        state
            .port_mut(name)?
            .dir_mut(dir)
            .accumulate(packets, bytes, dropped);
        Ok(())
    }

    /// Zeroes the counters of a port.
    #[instrument(skip(self))]
    pub async fn reset_port_stats(&self, name: &str) -> BessResult<()> {
        let mut state = self.state.lock().await;
        let port = state.port_mut(name)?;
        port.inc = PacketDirStats::default();
        port.out = PacketDirStats::default();
        debug!("Port counters reset");
        Ok(())
    }
}

#[async_trait]
impl BessControl for LocalEngine {
    type Error = BessError;
    type Stats = PortStats;

    async fn create_port(
        &self,
        driver: &str,
        name: Option<&str>,
        options: PortOptions,
    ) -> BessResult<PortDescriptor> {
        let mut state = self.state.lock().await;

        let template = state
            .drivers
            .get(driver)
            .map(|info| info.name_template.clone())
            .ok_or_else(|| BessError::not_found(format!("No port driver '{}' found", driver)))?;

        let name = match name {
            Some(name) => {
                validate_port_name(name)?;
                if state.ports.contains_key(name) {
                    return Err(BessError::already_exists(format!(
                        "Port '{}' already exists",
                        name
                    )));
                }
                name.to_string()
            }
            None => state.default_name(&template),
        };

        let num_inc_q = queue_count(&options, "num_inc_q")?;
        let num_out_q = queue_count(&options, "num_out_q")?;
        queue_size(&options, "size_inc_q")?;
        queue_size(&options, "size_out_q")?;
        check_driver_options(driver, &options, state.dpdk_ports)?;

        state.ports.insert(
            name.clone(),
            PortEntry {
                driver: driver.to_string(),
                num_inc_q,
                num_out_q,
                inc: PacketDirStats::default(),
                out: PacketDirStats::default(),
            },
        );

        info!(port = %name, driver, num_inc_q, num_out_q, "Port created");
        Ok(PortDescriptor::new(name))
    }

    async fn get_port_stats(&self, name: &str) -> BessResult<PortStats> {
        let state = self.state.lock().await;
        let port = state
            .ports
            .get(name)
            .ok_or_else(|| BessError::not_found(format!("No port '{}' found", name)))?;

        debug!(port = %name, "Collected port stats");
        Ok(PortStats {
            inc: port.inc,
            out: port.out,
            timestamp: Utc::now(),
        })
    }
}

fn validate_port_name(name: &str) -> BessResult<()> {
    if PORT_NAME_RE.is_match(name) {
        Ok(())
    } else {
        Err(BessError::invalid_argument(format!(
            "Invalid port name '{}'",
            name
        )))
    }
}

fn queue_count(options: &PortOptions, key: &str) -> BessResult<u64> {
    match options.get(key) {
        None | Some(Value::Null) => Ok(DEFAULT_NUM_QUEUES),
        Some(value) => match value.as_u64() {
            Some(n) if n <= MAX_QUEUES_PER_DIR => Ok(n),
            _ => Err(BessError::invalid_argument(format!(
                "Invalid number of queues for '{}': {}",
                key, value
            ))),
        },
    }
}

fn queue_size(options: &PortOptions, key: &str) -> BessResult<u64> {
    match options.get(key) {
        None | Some(Value::Null) => Ok(0),
        Some(value) => match value.as_u64() {
            Some(0) => Ok(0),
            Some(n) if n.is_power_of_two() && (MIN_QUEUE_SIZE..=MAX_QUEUE_SIZE).contains(&n) => {
                Ok(n)
            }
            _ => Err(BessError::invalid_argument(format!(
                "Invalid queue size for '{}': {}. Must be a power of two between {} and {}",
                key, value, MIN_QUEUE_SIZE, MAX_QUEUE_SIZE
            ))),
        },
    }
}

fn require_string(options: &PortOptions, key: &str, missing: &str) -> BessResult<()> {
    match options.get(key).and_then(Value::as_str) {
        Some(s) if !s.is_empty() => Ok(()),
        _ => Err(BessError::invalid_argument(missing)),
    }
}

fn check_driver_options(driver: &str, options: &PortOptions, dpdk_ports: u64) -> BessResult<()> {
    match driver {
        "PMDPort" => check_pmd_options(options, dpdk_ports),
        "PCAPPort" => require_string(options, "dev", "No PCAP device specified"),
        "UnixSocketPort" => require_string(options, "path", "No socket path specified"),
        _ => Ok(()),
    }
}

fn check_pmd_options(options: &PortOptions, dpdk_ports: u64) -> BessResult<()> {
    let selectors: Vec<&str> = ["port_id", "pci", "vdev"]
        .into_iter()
        .filter(|key| options.contains_key(*key))
        .collect();

    match selectors.as_slice() {
        [] => return Err(BessError::invalid_argument("No port specified")),
        ["port_id"] => {
            let port_id = options.get("port_id").and_then(Value::as_u64);
            match port_id {
                Some(id) if id < dpdk_ports => {}
                Some(id) if id < MAX_DPDK_PORTS => {
                    return Err(BessError::no_device(format!(
                        "Port id {} is not available",
                        id
                    )))
                }
                _ => {
                    return Err(BessError::invalid_argument(format!(
                        "Invalid port id {}",
                        options.get("port_id").unwrap_or(&Value::Null)
                    )))
                }
            }
        }
        ["pci"] => {
            let pci = options.get("pci").and_then(Value::as_str).unwrap_or_default();
            if pci.is_empty() {
                return Err(BessError::invalid_argument("No PCI address specified"));
            }
            if !PCI_ADDR_RE.is_match(pci) {
                return Err(BessError::invalid_argument(
                    "PCI address must be like dddd:bb:dd.f or bb:dd.f",
                ));
            }
        }
        ["vdev"] => require_string(options, "vdev", "No vdev specified")?,
        _ => {
            return Err(BessError::invalid_argument(format!(
                "Only one of port_id, pci or vdev may be specified, got {}",
                selectors.join(", ")
            )))
        }
    }

    match options.get("loopback") {
        None | Some(Value::Bool(_)) => Ok(()),
        Some(_) => Err(BessError::invalid_argument("'loopback' must be a boolean")),
    }
}
