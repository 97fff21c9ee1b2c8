//! # Network Discovery Service
//!
//! Implements the "who is on my network" use case.
//!
//! Two sources feed a discovery: the kernel's ARP cache, read passively, and an
//! active ARP scan of every eligible interface. Their entries are merged, with
//! scan results taking precedence, and returned sorted by address.

use std::path::PathBuf;

use macseek_common::config::Config;
use macseek_common::network::entry::Entry;
use pnet::datalink::NetworkInterface;
use tracing::info;

use crate::cache;
use crate::error::ScanError;
use crate::merge;
use crate::scanner::{InterfaceFailure, Scanner};

/// The merged view of the network.
#[derive(Debug, Default)]
pub struct Discovery {
    pub entries: Vec<Entry>,
    /// Interfaces whose scan failed while others went on.
    pub failures: Vec<InterfaceFailure>,
}

/// Application service for network discovery.
///
/// Orchestrates the discovery process by:
/// 1. delegating the active scan to the [`Scanner`].
/// 2. reading the ARP cache.
/// 3. merging both, filtering and ordering the result.
pub struct DiscoveryService {
    scanner: Scanner,
    /// `None` reads the system cache.
    cache_path: Option<PathBuf>,
}

impl Default for DiscoveryService {
    fn default() -> Self {
        Self::new(Scanner::default())
    }
}

impl DiscoveryService {
    pub fn new(scanner: Scanner) -> Self {
        Self {
            scanner,
            cache_path: None,
        }
    }

    /// Reads the neighbor cache from `path` instead of `/proc/net/arp`.
    pub fn with_cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_path = Some(path.into());
        self
    }

    pub async fn perform_discovery(
        &self,
        interfaces: Vec<NetworkInterface>,
        cfg: &Config,
    ) -> Result<Discovery, ScanError> {
        let (scanned, failures) = if cfg.scan_enabled {
            let report = self.scanner.run(interfaces.clone(), &cfg.scan).await?;
            (report.entries, report.failures)
        } else {
            (Vec::new(), Vec::new())
        };

        let cached = match &self.cache_path {
            Some(path) => cache::read_cache_file(path, &interfaces),
            None => cache::read_system_cache(&interfaces),
        };
        info!(cached = cached.len(), scanned = scanned.len(), "merging discovery sources");

        let mut entries = merge::merge(cached, scanned);
        if let Some(name) = cfg.scan.interface.as_deref() {
            entries.retain(|entry| on_interface(entry, name));
        }
        merge::sort_by_address(&mut entries);

        Ok(Discovery { entries, failures })
    }
}

/// Entries with no known device cannot be ruled out, so they are kept.
fn on_interface(entry: &Entry, name: &str) -> bool {
    entry.device_name().is_none_or(|device| device == name)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
