use std::net::Ipv4Addr;

use pnet::packet::Packet;
use pnet::packet::arp::{ArpHardwareTypes, ArpOperation, ArpOperations, ArpPacket, MutableArpPacket};
use pnet::packet::ethernet::{EtherTypes, EthernetPacket, MutableEthernetPacket};
use pnet::util::MacAddr;

use crate::PacketError;

pub const ETH_HDR_LEN: usize = 14;
pub const ARP_LEN: usize = 28;
pub const MIN_ETH_FRAME_NO_FCS: usize = 60;

/// The fields of an ARP packet the discovery engine looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArpReply {
    pub operation: ArpOperation,
    pub sender_ip: Ipv4Addr,
    pub sender_mac: MacAddr,
    pub hardware_type: u16,
    pub protocol_type: u16,
}

impl ArpReply {
    pub fn is_reply(&self) -> bool {
        self.operation == ArpOperations::Reply
    }
}

/// Builds a broadcast Ethernet frame carrying an ARP request for `dst_addr`.
pub fn create_request(src_mac: MacAddr, src_addr: Ipv4Addr, dst_addr: Ipv4Addr) -> Result<Vec<u8>, PacketError> {
    let mut buffer = [0u8; MIN_ETH_FRAME_NO_FCS];
    {
        let mut eth = MutableEthernetPacket::new(&mut buffer[..ETH_HDR_LEN])
            .ok_or(PacketError::BufferTooSmall("ethernet header"))?;
        eth.set_destination(MacAddr::broadcast());
        eth.set_source(src_mac);
        eth.set_ethertype(EtherTypes::Arp);
    }
    let mut arp_packet = MutableArpPacket::new(&mut buffer[ETH_HDR_LEN..ETH_HDR_LEN + ARP_LEN])
        .ok_or(PacketError::BufferTooSmall("arp packet"))?;
    arp_packet.set_hardware_type(ArpHardwareTypes::Ethernet);
    arp_packet.set_protocol_type(EtherTypes::Ipv4);
    arp_packet.set_hw_addr_len(6);
    arp_packet.set_proto_addr_len(4);
    arp_packet.set_operation(ArpOperations::Request);
    arp_packet.set_sender_hw_addr(src_mac);
    arp_packet.set_target_hw_addr(MacAddr::zero());
    arp_packet.set_sender_proto_addr(src_addr);
    arp_packet.set_target_proto_addr(dst_addr);
    Ok(Vec::from(buffer))
}

/// Extracts the ARP payload of an Ethernet frame.
pub fn parse_frame(frame: &[u8]) -> Result<ArpReply, PacketError> {
    let ethernet_packet = EthernetPacket::new(frame).ok_or(PacketError::Truncated { len: frame.len() })?;
    if ethernet_packet.get_ethertype() != EtherTypes::Arp {
        return Err(PacketError::NotArp(ethernet_packet.get_ethertype().0));
    }
    let payload = ethernet_packet.payload();
    let arp_packet = ArpPacket::new(payload).ok_or(PacketError::Truncated { len: payload.len() })?;
    Ok(ArpReply {
        operation: arp_packet.get_operation(),
        sender_ip: arp_packet.get_sender_proto_addr(),
        sender_mac: arp_packet.get_sender_hw_addr(),
        hardware_type: arp_packet.get_hardware_type().0,
        protocol_type: arp_packet.get_protocol_type().0,
    })
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
