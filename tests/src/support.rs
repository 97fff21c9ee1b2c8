//! A simulated Ethernet segment behind the `ArpTransport` seam.
//!
//! Requests are encoded and decoded with the real ARP codec. Every broadcast
//! is echoed back onto the segment, and each known neighbor answers its own
//! address with a reply frame.

use std::collections::HashMap;
use std::io;
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use macseek_core::error::TransportError;
use macseek_core::network::transport::{ArpTransport, TransportFactory};
use macseek_protocols::arp::{self, ArpReply, ARP_LEN, ETH_HDR_LEN, MIN_ETH_FRAME_NO_FCS};
use pnet::datalink::NetworkInterface;
use pnet::ipnetwork::IpNetwork;
use pnet::packet::arp::{ArpHardwareTypes, ArpOperations, MutableArpPacket};
use pnet::packet::ethernet::{EtherTypes, MutableEthernetPacket};
use pnet::util::MacAddr;
use tokio::sync::mpsc;
use tokio::time::Instant;

const IFF_UP: u32 = 1;
const IFF_BROADCAST: u32 = 1 << 1;

pub fn interface(name: &str, cidr: &str, mac: MacAddr) -> NetworkInterface {
    NetworkInterface {
        name: name.into(),
        description: String::new(),
        index: 0,
        mac: Some(mac),
        ips: vec![cidr.parse::<IpNetwork>().unwrap()],
        flags: IFF_UP | IFF_BROADCAST,
    }
}

pub fn reply_frame(sender_mac: MacAddr, sender_ip: Ipv4Addr, target_mac: MacAddr, target_ip: Ipv4Addr) -> Vec<u8> {
    let mut buffer = vec![0u8; MIN_ETH_FRAME_NO_FCS];
    {
        let mut eth = MutableEthernetPacket::new(&mut buffer[..ETH_HDR_LEN]).unwrap();
        eth.set_destination(target_mac);
        eth.set_source(sender_mac);
        eth.set_ethertype(EtherTypes::Arp);
    }
    let mut arp_pkt = MutableArpPacket::new(&mut buffer[ETH_HDR_LEN..ETH_HDR_LEN + ARP_LEN]).unwrap();
    arp_pkt.set_hardware_type(ArpHardwareTypes::Ethernet);
    arp_pkt.set_protocol_type(EtherTypes::Ipv4);
    arp_pkt.set_hw_addr_len(6);
    arp_pkt.set_proto_addr_len(4);
    arp_pkt.set_operation(ArpOperations::Reply);
    arp_pkt.set_sender_hw_addr(sender_mac);
    arp_pkt.set_sender_proto_addr(sender_ip);
    arp_pkt.set_target_hw_addr(target_mac);
    arp_pkt.set_target_proto_addr(target_ip);
    buffer
}

pub struct SimulatedLan {
    own_mac: MacAddr,
    own_ip: Ipv4Addr,
    neighbors: HashMap<Ipv4Addr, MacAddr>,
    wire_tx: mpsc::UnboundedSender<Vec<u8>>,
    wire_rx: tokio::sync::Mutex<mpsc::UnboundedReceiver<Vec<u8>>>,
    link_down: AtomicBool,
    sent: Mutex<Vec<Ipv4Addr>>,
    closes: AtomicUsize,
}

impl SimulatedLan {
    pub fn new(own_mac: MacAddr, own_ip: Ipv4Addr, neighbors: &[(Ipv4Addr, MacAddr)]) -> Arc<Self> {
        let (wire_tx, wire_rx) = mpsc::unbounded_channel();
        Arc::new(Self {
            own_mac,
            own_ip,
            neighbors: neighbors.iter().copied().collect(),
            wire_tx,
            wire_rx: tokio::sync::Mutex::new(wire_rx),
            link_down: AtomicBool::new(false),
            sent: Mutex::new(Vec::new()),
            closes: AtomicUsize::new(0),
        })
    }

    /// Every read fails from now on.
    pub fn cut(&self) {
        self.link_down.store(true, Ordering::Relaxed);
    }

    pub fn inject(&self, frame: Vec<u8>) {
        let _ = self.wire_tx.send(frame);
    }

    pub fn sent(&self) -> Vec<Ipv4Addr> {
        self.sent.lock().unwrap().clone()
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ArpTransport for SimulatedLan {
    async fn request(&self, target: Ipv4Addr) -> Result<(), TransportError> {
        let frame = arp::create_request(self.own_mac, self.own_ip, target)?;
        self.sent.lock().unwrap().push(target);
        self.inject(frame);
        if let Some(&mac) = self.neighbors.get(&target) {
            self.inject(reply_frame(mac, target, self.own_mac, self.own_ip));
        }
        Ok(())
    }

    async fn read(&self) -> Result<(ArpReply, Vec<u8>), TransportError> {
        if self.link_down.load(Ordering::Relaxed) {
            return Err(TransportError::Receive(io::Error::other("link down")));
        }
        let mut wire = self.wire_rx.lock().await;
        match wire.recv().await {
            Some(frame) => Ok((arp::parse_frame(&frame)?, frame)),
            None => Err(TransportError::Closed),
        }
    }

    fn set_write_deadline(&self, _deadline: Instant) -> Result<(), TransportError> {
        Ok(())
    }

    fn close(&self) -> Result<(), TransportError> {
        self.closes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

#[derive(Default)]
pub struct SimulatedFactory {
    segments: HashMap<String, Arc<SimulatedLan>>,
}

impl SimulatedFactory {
    pub fn with(mut self, name: &str, lan: Arc<SimulatedLan>) -> Self {
        self.segments.insert(name.to_string(), lan);
        self
    }
}

impl TransportFactory for SimulatedFactory {
    fn has_privilege(&self) -> bool {
        true
    }

    fn open(&self, interface: &NetworkInterface) -> Result<Arc<dyn ArpTransport>, TransportError> {
        match self.segments.get(&interface.name) {
            Some(lan) => Ok(lan.clone() as Arc<dyn ArpTransport>),
            None => Err(TransportError::Open {
                interface: interface.name.clone(),
                source: io::Error::new(io::ErrorKind::NotFound, "no simulated segment"),
            }),
        }
    }
}
