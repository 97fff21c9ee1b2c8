//! Wire codecs for the frames macseek puts on the link.

pub mod arp;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PacketError {
    #[error("buffer too small for {0}")]
    BufferTooSmall(&'static str),
    #[error("truncated or invalid ARP packet (payload len {len})")]
    Truncated { len: usize },
    #[error("not an ARP frame (ethertype 0x{0:04x})")]
    NotArp(u16),
}
