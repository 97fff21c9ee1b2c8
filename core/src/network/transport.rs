//! The capability boundary between the discovery engine and the link layer.
//!
//! Workers only ever talk to an [`ArpTransport`]. The production implementation
//! lives in [`super::channel`]; tests drive workers with in-memory transports.

use std::net::Ipv4Addr;
use std::sync::Arc;

use async_trait::async_trait;
use macseek_protocols::arp::ArpReply;
use pnet::datalink::NetworkInterface;
use tokio::time::Instant;

use crate::error::TransportError;

/// A handle able to issue ARP requests and read ARP packets on one interface.
///
/// One request and one read may be in flight at the same time on the same
/// handle. Concurrent requests from different callers are not supported.
#[async_trait]
pub trait ArpTransport: Send + Sync {
    /// Broadcasts a who-has request for `target`.
    async fn request(&self, target: Ipv4Addr) -> Result<(), TransportError>;

    /// Waits for the next ARP packet, returning the decoded packet and the raw frame.
    async fn read(&self) -> Result<(ArpReply, Vec<u8>), TransportError>;

    /// Bounds how long subsequent requests may take.
    fn set_write_deadline(&self, deadline: Instant) -> Result<(), TransportError>;

    fn close(&self) -> Result<(), TransportError>;
}

/// Opens transports and reports whether the process may open them at all.
pub trait TransportFactory: Send + Sync {
    fn has_privilege(&self) -> bool;

    fn open(&self, interface: &NetworkInterface) -> Result<Arc<dyn ArpTransport>, TransportError>;
}
