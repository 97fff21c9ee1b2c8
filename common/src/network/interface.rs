use std::collections::HashSet;
use std::net::Ipv4Addr;

use pnet::datalink::NetworkInterface;
use pnet::ipnetwork::{IpNetwork, Ipv4Network};
use thiserror::Error;

use crate::network::range;

/// Why an interface was not handed a discovery worker.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum SkipReason {
    /// The interface is administratively down.
    #[error("interface is down")]
    IsDown,
    #[error("loopback interface")]
    IsLoopback,
    /// The interface is a point-to-point link (e.g., a VPN).
    #[error("point-to-point interface")]
    IsPointToPoint,
}

pub trait NetworkInterfaceExtension {
    fn get_ipv4_nets(&self) -> Vec<Ipv4Network>;
    /// Own non-loopback IPv4 addresses, used to recognise our own replies.
    fn own_ipv4_addrs(&self) -> HashSet<Ipv4Addr>;
    /// Every usable host address across all IPv4 assignments, in assignment order.
    fn scan_targets(&self) -> Vec<Ipv4Addr>;
}

impl NetworkInterfaceExtension for NetworkInterface {
    fn get_ipv4_nets(&self) -> Vec<Ipv4Network> {
        self.ips
            .iter()
            .filter_map(|ip| {
                if let IpNetwork::V4(ipv4) = ip {
                    Some(*ipv4)
                } else {
                    None
                }
            })
            .collect()
    }

    fn own_ipv4_addrs(&self) -> HashSet<Ipv4Addr> {
        self.get_ipv4_nets()
            .into_iter()
            .map(|net| net.ip())
            .filter(|ip| !ip.is_loopback())
            .collect()
    }

    fn scan_targets(&self) -> Vec<Ipv4Addr> {
        self.ips.iter().flat_map(range::usable_hosts).collect()
    }
}

/// Decides whether an interface takes part in an active scan.
pub fn check_eligibility(interface: &NetworkInterface) -> Result<(), SkipReason> {
    if interface.is_loopback() {
        return Err(SkipReason::IsLoopback);
    }
    if interface.is_point_to_point() {
        return Err(SkipReason::IsPointToPoint);
    }
    if !interface.is_up() {
        return Err(SkipReason::IsDown);
    }
    Ok(())
}

/// Finds an interface by name in a previously enumerated list.
pub fn find_by_name<'a>(interfaces: &'a [NetworkInterface], name: &str) -> Option<&'a NetworkInterface> {
    interfaces.iter().find(|intf| intf.name == name)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
