use std::net::Ipv4Addr;

use pnet::ipnetwork::{IpNetwork, Ipv4Network};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv4Range {
    pub start_addr: Ipv4Addr,
    pub end_addr: Ipv4Addr,
}

impl Ipv4Range {
    pub fn new(start_addr: Ipv4Addr, end_addr: Ipv4Addr) -> Self {
        Self {
            start_addr,
            end_addr,
        }
    }

    /// Range of addresses a host can hold in `network`, i.e. without the
    /// network and broadcast addresses. `None` for /31 and /32.
    pub fn usable(network: Ipv4Network) -> Option<Self> {
        let start = u32::from(network.network()).checked_add(1)?;
        let end = u32::from(network.broadcast()).checked_sub(1)?;
        (start <= end).then(|| Self::new(Ipv4Addr::from(start), Ipv4Addr::from(end)))
    }

    pub fn to_iter(&self) -> impl Iterator<Item = Ipv4Addr> {
        let start: u32 = self.start_addr.into();
        let end: u32 = self.end_addr.into();
        (start..=end).map(Ipv4Addr::from)
    }

    pub fn len(&self) -> usize {
        let start: u32 = self.start_addr.into();
        let end: u32 = self.end_addr.into();
        if start > end {
            return 0;
        }
        (end - start) as usize + 1
    }

    pub fn is_empty(&self) -> bool {
        self.start_addr > self.end_addr
    }
}

/// Usable host addresses of an interface assignment, in ascending order.
///
/// IPv6 assignments yield nothing, so an interface's full address list can be
/// passed through without filtering.
pub fn usable_hosts(network: &IpNetwork) -> Vec<Ipv4Addr> {
    match network {
        IpNetwork::V4(v4) => Ipv4Range::usable(*v4)
            .map(|range| range.to_iter().collect())
            .unwrap_or_default(),
        IpNetwork::V6(_) => Vec::new(),
    }
}

/// Same as [`usable_hosts`] for CIDR text such as `192.168.1.7/24`.
/// Malformed input yields nothing.
pub fn hosts_from_cidr(cidr: &str) -> Vec<Ipv4Addr> {
    cidr.parse::<IpNetwork>()
        .map(|network| usable_hosts(&network))
        .unwrap_or_default()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
