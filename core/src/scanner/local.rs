//! A **local area network (LAN)** ARP scanner bound to one interface.
//!
//! The scanner broadcasts one ARP request per usable host address of the
//! interface's subnets while concurrently listening for replies. Replies from
//! any address other than the interface's own become [`Entry`] values.

use std::collections::HashSet;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use macseek_common::config::ScanConfig;
use macseek_common::network::entry::Entry;
use macseek_common::network::interface::NetworkInterfaceExtension;
use macseek_protocols::arp::ArpReply;
use pnet::datalink::NetworkInterface;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::error::TransportError;
use crate::network::transport::{ArpTransport, TransportFactory};

pub struct LocalScanner {
    interface: NetworkInterface,
    transport: Arc<dyn ArpTransport>,
    targets: Vec<Ipv4Addr>,
    my_addresses: HashSet<Ipv4Addr>,
    write_timeout: Duration,
    send_interval: Duration,
}

impl LocalScanner {
    pub fn new(
        interface: NetworkInterface,
        factory: &dyn TransportFactory,
        cfg: &ScanConfig,
    ) -> Result<Self, TransportError> {
        let transport = factory.open(&interface)?;
        Ok(Self::with_transport(interface, transport, cfg))
    }

    pub fn with_transport(interface: NetworkInterface, transport: Arc<dyn ArpTransport>, cfg: &ScanConfig) -> Self {
        let targets = interface.scan_targets();
        let my_addresses = interface.own_ipv4_addrs();
        debug!(
            interface = %interface.name,
            targets = targets.len(),
            "prepared ARP scan"
        );
        Self {
            interface,
            transport,
            targets,
            my_addresses,
            write_timeout: cfg.write_timeout,
            send_interval: cfg.send_interval,
        }
    }

    pub fn targets(&self) -> &[Ipv4Addr] {
        &self.targets
    }

    /// Probes every target while streaming discovered hosts into `results`.
    ///
    /// Returns `Ok(())` once `cancel` fires and `Err` as soon as a read from the
    /// transport fails. Either way both loops have stopped when this returns.
    pub async fn find(&self, cancel: &CancellationToken, results: mpsc::Sender<Entry>) -> Result<(), TransportError> {
        let local = cancel.child_token();
        let receive = async {
            let outcome = self.receive_replies(&local, &results).await;
            local.cancel();
            outcome
        };
        let ((), outcome) = tokio::join!(self.send_requests(&local), receive);
        outcome
    }

    /// Releases the transport. Consumes the scanner, so it cannot be restarted.
    pub fn close(self) -> Result<(), TransportError> {
        self.transport.close()
    }

    async fn send_requests(&self, cancel: &CancellationToken) {
        for &target in &self.targets {
            if cancel.is_cancelled() {
                return;
            }
            if let Err(e) = self.transport.set_write_deadline(Instant::now() + self.write_timeout) {
                warn!(interface = %self.interface.name, %target, "setting write deadline: {e}");
                continue;
            }
            tokio::select! {
                _ = cancel.cancelled() => return,
                sent = self.transport.request(target) => {
                    if let Err(e) = sent {
                        warn!(interface = %self.interface.name, %target, "ARP request failed: {e}");
                    }
                }
            }
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = tokio::time::sleep(self.send_interval) => {}
            }
        }
        debug!(interface = %self.interface.name, "all ARP requests sent");
    }

    async fn receive_replies(&self, cancel: &CancellationToken, results: &mpsc::Sender<Entry>) -> Result<(), TransportError> {
        loop {
            let (reply, _frame) = tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                read = self.transport.read() => read?,
            };

            let Some(entry) = self.process_reply(&reply) else {
                continue;
            };

            tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                sent = results.send(entry) => {
                    if sent.is_err() {
                        return Ok(());
                    }
                }
            }
        }
    }

    fn process_reply(&self, reply: &ArpReply) -> Option<Entry> {
        if !reply.is_reply() {
            debug!(interface = %self.interface.name, operation = reply.operation.0, "ignoring non-reply ARP packet");
            return None;
        }
        if self.my_addresses.contains(&reply.sender_ip) {
            trace!(interface = %self.interface.name, sender = %reply.sender_ip, "ignoring own address");
            return None;
        }
        trace!(interface = %self.interface.name, sender = %reply.sender_ip, mac = %reply.sender_mac, "host found");
        Some(Entry {
            address: Some(reply.sender_ip),
            hw_type: reply.hardware_type as u8,
            flags: reply.protocol_type as u8,
            mac: Some(reply.sender_mac),
            mask: String::new(),
            device: Some(self.interface.clone()),
        })
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
