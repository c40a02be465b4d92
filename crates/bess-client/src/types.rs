//! Values exchanged with the engine.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Driver-specific port options.
///
/// Keys and values are passed to the engine untouched; the engine owns
/// their validation.
pub type PortOptions = serde_json::Map<String, serde_json::Value>;

/// Reply to a port creation request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortDescriptor {
    /// Name assigned by the engine.
    pub name: String,
}

impl PortDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Packet direction, seen from the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PacketDir {
    /// Packets received from the wire.
    Inc,
    /// Packets sent to the wire.
    Out,
}

impl fmt::Display for PacketDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PacketDir::Inc => write!(f, "inc"),
            PacketDir::Out => write!(f, "out"),
        }
    }
}

/// Counters for one direction of a port.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacketDirStats {
    pub packets: u64,
    pub bytes: u64,
    pub dropped: u64,
}

impl PacketDirStats {
    /// Adds another sample, saturating on overflow.
    pub fn accumulate(&mut self, packets: u64, bytes: u64, dropped: u64) {
        self.packets = self.packets.saturating_add(packets);
        self.bytes = self.bytes.saturating_add(bytes);
        self.dropped = self.dropped.saturating_add(dropped);
    }
}

/// Statistics record returned by `get_port_stats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortStats {
    pub inc: PacketDirStats,
    pub out: PacketDirStats,
    /// When the counters were sampled.
    pub timestamp: DateTime<Utc>,
}

impl PortStats {
    /// Returns the counters for one direction.
    pub fn dir(&self, dir: PacketDir) -> &PacketDirStats {
        match dir {
            PacketDir::Inc => &self.inc,
            PacketDir::Out => &self.out,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulate_saturates() {
        let mut stats = PacketDirStats {
            packets: u64::MAX - 1,
            ..Default::default()
        };
        stats.accumulate(5, 64, 1);
        assert_eq!(stats.packets, u64::MAX);
        assert_eq!(stats.bytes, 64);
        assert_eq!(stats.dropped, 1);
    }

    #[test]
    fn test_stats_dir() {
        let stats = PortStats {
            inc: PacketDirStats {
                packets: 1,
                bytes: 60,
                dropped: 0,
            },
            out: PacketDirStats::default(),
            timestamp: Utc::now(),
        };
        assert_eq!(stats.dir(PacketDir::Inc).bytes, 60);
        assert_eq!(stats.dir(PacketDir::Out).packets, 0);
    }

    #[test]
    fn test_packet_dir_serde() {
        assert_eq!(serde_json::to_string(&PacketDir::Inc).unwrap(), "\"inc\"");
        assert_eq!(PacketDir::Out.to_string(), "out");
    }
}
