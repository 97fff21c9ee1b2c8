//! In-memory transports for exercising scanners without raw sockets.

use std::collections::VecDeque;
use std::io;
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use macseek_protocols::arp::ArpReply;
use pnet::datalink::NetworkInterface;
use pnet::ipnetwork::IpNetwork;
use pnet::packet::arp::ArpOperations;
use pnet::util::MacAddr;
use tokio::time::Instant;

use crate::error::TransportError;
use crate::network::transport::{ArpTransport, TransportFactory};

pub const IFF_UP: u32 = 1;
pub const IFF_BROADCAST: u32 = 1 << 1;
pub const IFF_LOOPBACK: u32 = 1 << 3;

pub fn mock_interface(name: &str, cidr: &str) -> NetworkInterface {
    NetworkInterface {
        name: name.to_string(),
        description: String::new(),
        index: 0,
        mac: Some(MacAddr::new(1, 2, 3, 4, 5, 6)),
        ips: vec![cidr.parse::<IpNetwork>().unwrap()],
        flags: IFF_UP | IFF_BROADCAST,
    }
}

pub fn reply(sender_ip: Ipv4Addr, sender_mac: MacAddr) -> ArpReply {
    ArpReply {
        operation: ArpOperations::Reply,
        sender_ip,
        sender_mac,
        hardware_type: 1,
        protocol_type: 0x0800,
    }
}

pub fn request(sender_ip: Ipv4Addr, sender_mac: MacAddr) -> ArpReply {
    ArpReply {
        operation: ArpOperations::Request,
        ..reply(sender_ip, sender_mac)
    }
}

enum Inbound {
    Packet(ArpReply),
    Failure,
}

#[derive(Default)]
pub struct MockTransport {
    inbound: Mutex<VecDeque<Inbound>>,
    requests: Mutex<Vec<Ipv4Addr>>,
    deadlines: AtomicUsize,
    closes: AtomicUsize,
    fail_requests: AtomicBool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_requests(self) -> Self {
        self.fail_requests.store(true, Ordering::Relaxed);
        self
    }

    pub fn push_reply(&self, reply: ArpReply) {
        self.inbound.lock().unwrap().push_back(Inbound::Packet(reply));
    }

    pub fn push_read_error(&self) {
        self.inbound.lock().unwrap().push_back(Inbound::Failure);
    }

    pub fn requests(&self) -> Vec<Ipv4Addr> {
        self.requests.lock().unwrap().clone()
    }

    pub fn deadlines_set(&self) -> usize {
        self.deadlines.load(Ordering::Relaxed)
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ArpTransport for MockTransport {
    async fn request(&self, target: Ipv4Addr) -> Result<(), TransportError> {
        self.requests.lock().unwrap().push(target);
        if self.fail_requests.load(Ordering::Relaxed) {
            return Err(TransportError::Send(io::Error::other("mock send failure")));
        }
        Ok(())
    }

    async fn read(&self) -> Result<(ArpReply, Vec<u8>), TransportError> {
        let next = self.inbound.lock().unwrap().pop_front();
        match next {
            Some(Inbound::Packet(reply)) => Ok((reply, Vec::new())),
            Some(Inbound::Failure) => Err(TransportError::Receive(io::Error::other("mock read failure"))),
            None => std::future::pending().await,
        }
    }

    fn set_write_deadline(&self, _deadline: Instant) -> Result<(), TransportError> {
        self.deadlines.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn close(&self) -> Result<(), TransportError> {
        self.closes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

/// Hands out pre-registered transports by interface name.
pub struct MockFactory {
    privileged: bool,
    transports: Vec<(String, Arc<MockTransport>)>,
}

impl MockFactory {
    pub fn new() -> Self {
        Self {
            privileged: true,
            transports: Vec::new(),
        }
    }

    pub fn unprivileged() -> Self {
        Self {
            privileged: false,
            ..Self::new()
        }
    }

    pub fn with(mut self, name: &str, transport: Arc<MockTransport>) -> Self {
        self.transports.push((name.to_string(), transport));
        self
    }
}

impl TransportFactory for MockFactory {
    fn has_privilege(&self) -> bool {
        self.privileged
    }

    fn open(&self, interface: &NetworkInterface) -> Result<Arc<dyn ArpTransport>, TransportError> {
        self.transports
            .iter()
            .find(|(name, _)| *name == interface.name)
            .map(|(_, transport)| transport.clone() as Arc<dyn ArpTransport>)
            .ok_or_else(|| TransportError::Open {
                interface: interface.name.clone(),
                source: io::Error::new(io::ErrorKind::NotFound, "no mock transport"),
            })
    }
}
