use std::io;

use macseek_protocols::PacketError;
use thiserror::Error;

/// Failures of a single interface's ARP transport.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("opening datalink channel on {interface}")]
    Open {
        interface: String,
        #[source]
        source: io::Error,
    },
    #[error("non-ethernet channel for {0}")]
    UnsupportedChannel(String),
    #[error("{0} has no hardware address")]
    NoMacAddress(String),
    #[error("{0} has no IPv4 address")]
    NoIpv4Address(String),
    #[error("write deadline exceeded")]
    WriteTimeout,
    #[error("sending ARP request")]
    Send(#[source] io::Error),
    #[error("reading from datalink channel")]
    Receive(#[source] io::Error),
    #[error(transparent)]
    Packet(#[from] PacketError),
    #[error("transport closed")]
    Closed,
}

/// Failures that end a coordinated scan.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("insufficient permissions: active ARP scanning requires root privileges")]
    InsufficientPrivilege,
    #[error("ARP scan failed on {interface}")]
    Transport {
        interface: String,
        #[source]
        source: TransportError,
    },
}
