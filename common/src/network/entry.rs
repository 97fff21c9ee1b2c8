//! # Device Entry Model
//!
//! A single observation of a device on the local network, produced either by
//! the passive neighbor cache or by an active ARP scan.

use std::fmt;
use std::net::Ipv4Addr;

use pnet::datalink::NetworkInterface;
use pnet::util::MacAddr;

/// A discovered or cached device.
///
/// Every field is best-effort. A cache row with a malformed field still yields
/// an `Entry`, with that field left at its zero value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    pub address: Option<Ipv4Addr>,
    pub hw_type: u8,
    pub flags: u8,
    pub mac: Option<MacAddr>,
    /// Copied verbatim from the cache, never interpreted.
    pub mask: String,
    /// Snapshot of the interface the entry was seen on, for lookup only.
    pub device: Option<NetworkInterface>,
}

impl Entry {
    pub fn new(address: Ipv4Addr) -> Self {
        Self {
            address: Some(address),
            ..Default::default()
        }
    }

    pub fn with_mac(mut self, mac: MacAddr) -> Self {
        self.mac = Some(mac);
        self
    }

    pub fn with_device(mut self, device: NetworkInterface) -> Self {
        self.device = Some(device);
        self
    }

    /// Deduplication key: the textual address, or `""` when it failed to parse.
    pub fn key(&self) -> String {
        self.address.map(|ip| ip.to_string()).unwrap_or_default()
    }

    pub fn device_name(&self) -> Option<&str> {
        self.device.as_ref().map(|intf| intf.name.as_str())
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mac = self.mac.map(|m| m.to_string()).unwrap_or_default();
        write!(
            f,
            "{} at {} on {}",
            self.key(),
            mac,
            self.device_name().unwrap_or("unknown")
        )
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
