//! Raw-socket ARP transport on top of a pnet datalink channel.
//!
//! Requires **root privileges** to open the underlying Layer 2 socket.

use std::io;
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use macseek_common::network::interface::NetworkInterfaceExtension;
use macseek_protocols::arp::{self, ArpReply};
use pnet::datalink::{self, Channel, Config, DataLinkReceiver, DataLinkSender, NetworkInterface};
use pnet::util::MacAddr;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::time::Instant;
use tracing::{debug, trace};

use crate::error::TransportError;
use crate::network::transport::{ArpTransport, TransportFactory};

const READ_TIMEOUT: Duration = Duration::from_millis(50);

type FrameQueue = UnboundedReceiver<io::Result<Vec<u8>>>;

pub struct DatalinkTransport {
    interface: String,
    src_mac: MacAddr,
    src_addr: Ipv4Addr,
    tx: Arc<Mutex<Box<dyn DataLinkSender>>>,
    rx: tokio::sync::Mutex<FrameQueue>,
    write_deadline: Mutex<Option<Instant>>,
    running: Arc<AtomicBool>,
}

impl DatalinkTransport {
    pub fn open(interface: &NetworkInterface) -> Result<Self, TransportError> {
        let src_mac = interface
            .mac
            .ok_or_else(|| TransportError::NoMacAddress(interface.name.clone()))?;
        let src_addr = interface
            .get_ipv4_nets()
            .into_iter()
            .map(|net| net.ip())
            .find(|ip| !ip.is_loopback())
            .ok_or_else(|| TransportError::NoIpv4Address(interface.name.clone()))?;

        let (tx, rx) = open_eth_channel(interface, &get_config(), datalink::channel)?;
        let running = Arc::new(AtomicBool::new(true));
        let (queue_tx, queue_rx) = mpsc::unbounded_channel();
        spawn_listener(rx, queue_tx, running.clone());
        debug!(interface = %interface.name, %src_addr, "datalink channel opened");

        Ok(Self {
            interface: interface.name.clone(),
            src_mac,
            src_addr,
            tx: Arc::new(Mutex::new(tx)),
            rx: tokio::sync::Mutex::new(queue_rx),
            write_deadline: Mutex::new(None),
            running,
        })
    }
}

#[async_trait]
impl ArpTransport for DatalinkTransport {
    async fn request(&self, target: Ipv4Addr) -> Result<(), TransportError> {
        if !self.running.load(Ordering::Relaxed) {
            return Err(TransportError::Closed);
        }
        let frame = arp::create_request(self.src_mac, self.src_addr, target)?;
        let tx = Arc::clone(&self.tx);
        let send = tokio::task::spawn_blocking(move || {
            let mut tx = tx.lock().unwrap_or_else(PoisonError::into_inner);
            match tx.send_to(&frame, None) {
                Some(result) => result.map_err(TransportError::Send),
                None => Err(TransportError::Send(io::Error::other("send buffer exhausted"))),
            }
        });

        let deadline = *self.write_deadline.lock().unwrap_or_else(PoisonError::into_inner);
        let joined = match deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, send)
                .await
                .map_err(|_| TransportError::WriteTimeout)?,
            None => send.await,
        };
        joined.map_err(|e| TransportError::Send(io::Error::other(e)))?
    }

    async fn read(&self) -> Result<(ArpReply, Vec<u8>), TransportError> {
        let mut queue = self.rx.lock().await;
        loop {
            match queue.recv().await {
                Some(Ok(frame)) => match arp::parse_frame(&frame) {
                    Ok(reply) => return Ok((reply, frame)),
                    Err(e) => trace!(interface = %self.interface, "dropping frame: {e}"),
                },
                Some(Err(e)) => return Err(TransportError::Receive(e)),
                None => return Err(TransportError::Closed),
            }
        }
    }

    fn set_write_deadline(&self, deadline: Instant) -> Result<(), TransportError> {
        *self.write_deadline.lock().unwrap_or_else(PoisonError::into_inner) = Some(deadline);
        Ok(())
    }

    fn close(&self) -> Result<(), TransportError> {
        self.running.store(false, Ordering::Relaxed);
        debug!(interface = %self.interface, "datalink channel closed");
        Ok(())
    }
}

impl Drop for DatalinkTransport {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
    }
}

/// Opens [`DatalinkTransport`]s, guarded by a root check.
#[derive(Debug, Clone, Copy, Default)]
pub struct DatalinkFactory;

impl TransportFactory for DatalinkFactory {
    fn has_privilege(&self) -> bool {
        is_root::is_root()
    }

    fn open(&self, interface: &NetworkInterface) -> Result<Arc<dyn ArpTransport>, TransportError> {
        Ok(Arc::new(DatalinkTransport::open(interface)?))
    }
}

/// Forwards every frame from the blocking receiver to the async queue until
/// the transport is closed or the queue is dropped.
fn spawn_listener(mut rx: Box<dyn DataLinkReceiver>, queue: UnboundedSender<io::Result<Vec<u8>>>, running: Arc<AtomicBool>) {
    std::thread::spawn(move || {
        while running.load(Ordering::Relaxed) {
            match rx.next() {
                Ok(frame) => {
                    if queue.send(Ok(frame.to_vec())).is_err() {
                        break;
                    }
                }
                Err(e) if matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock) => {}
                Err(e) => {
                    let _ = queue.send(Err(e));
                    break;
                }
            }
        }
    });
}

fn open_eth_channel<F>(
    intf: &NetworkInterface,
    cfg: &Config,
    channel_opener: F,
) -> Result<(Box<dyn DataLinkSender>, Box<dyn DataLinkReceiver>), TransportError>
where
    F: FnOnce(&NetworkInterface, Config) -> io::Result<Channel>,
{
    let ch = channel_opener(intf, *cfg).map_err(|source| TransportError::Open {
        interface: intf.name.clone(),
        source,
    })?;
    match ch {
        Channel::Ethernet(tx, rx) => Ok((tx, rx)),
        _ => Err(TransportError::UnsupportedChannel(intf.name.clone())),
    }
}

fn get_config() -> Config {
    Config {
        read_timeout: Some(READ_TIMEOUT),
        ..Default::default()
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
