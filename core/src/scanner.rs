//! Coordinates active ARP discovery across every eligible interface.
//!
//! One [`LocalScanner`] runs per interface, all of them concurrently and all
//! bound to a single deadline. Their results and failures are fanned in here.
//!
//! Hitting the deadline is the normal way a scan ends: whatever was collected
//! up to that point is returned. How worker failures are handled depends on
//! the configured [`FailurePolicy`].

use std::sync::Arc;

use macseek_common::config::{FailurePolicy, ScanConfig};
use macseek_common::network::entry::Entry;
use macseek_common::network::interface;
use pnet::datalink::NetworkInterface;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::error::{ScanError, TransportError};
use crate::network::channel::DatalinkFactory;
use crate::network::transport::TransportFactory;

mod local;
#[cfg(test)]
pub(crate) mod mock;

pub use local::LocalScanner;

const RESULT_QUEUE_SIZE: usize = 256;

/// A worker failure tied to the interface it happened on.
#[derive(Debug)]
pub struct InterfaceFailure {
    pub interface: String,
    pub error: TransportError,
}

impl From<InterfaceFailure> for ScanError {
    fn from(failure: InterfaceFailure) -> Self {
        ScanError::Transport {
            interface: failure.interface,
            source: failure.error,
        }
    }
}

/// Everything a finished scan produced.
///
/// `failures` is always empty under [`FailurePolicy::FailFast`], since the
/// first failure turns into the scan's error instead.
#[derive(Debug, Default)]
pub struct ScanReport {
    pub entries: Vec<Entry>,
    pub failures: Vec<InterfaceFailure>,
}

pub struct Scanner {
    factory: Arc<dyn TransportFactory>,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new(Arc::new(DatalinkFactory))
    }
}

impl Scanner {
    pub fn new(factory: Arc<dyn TransportFactory>) -> Self {
        Self { factory }
    }

    /// Scans every eligible interface in `interfaces` until `cfg.timeout` elapses.
    pub async fn run(&self, interfaces: Vec<NetworkInterface>, cfg: &ScanConfig) -> Result<ScanReport, ScanError> {
        if !self.factory.has_privilege() {
            return Err(ScanError::InsufficientPrivilege);
        }

        let deadline = Instant::now() + cfg.timeout;
        let cancel = CancellationToken::new();
        let (entry_tx, mut entry_rx) = mpsc::channel::<Entry>(RESULT_QUEUE_SIZE);
        let (failure_tx, mut failure_rx) = mpsc::channel::<InterfaceFailure>(RESULT_QUEUE_SIZE);

        let mut workers = JoinSet::new();
        for intf in select_interfaces(interfaces, cfg.interface.as_deref()) {
            workers.spawn(run_worker(
                intf,
                self.factory.clone(),
                cfg.clone(),
                cancel.clone(),
                entry_tx.clone(),
                failure_tx.clone(),
            ));
        }
        drop(entry_tx);
        drop(failure_tx);

        let mut report = ScanReport::default();
        let mut entries_open = true;
        let mut failures_open = true;
        let expiry = tokio::time::sleep_until(deadline);
        tokio::pin!(expiry);

        let outcome = loop {
            tokio::select! {
                _ = &mut expiry => break Ok(()),
                entry = entry_rx.recv(), if entries_open => match entry {
                    Some(entry) => report.entries.push(entry),
                    None => entries_open = false,
                },
                failure = failure_rx.recv(), if failures_open => match failure {
                    Some(failure) => match cfg.failure_policy {
                        FailurePolicy::FailFast => break Err(ScanError::from(failure)),
                        FailurePolicy::KeepPartial => {
                            warn!(interface = %failure.interface, "interface scan failed: {}", failure.error);
                            report.failures.push(failure);
                        }
                    },
                    None => failures_open = false,
                },
            }
        };

        cancel.cancel();
        drop(entry_rx);
        drop(failure_rx);
        while workers.join_next().await.is_some() {}

        outcome.map(|()| {
            info!(found = report.entries.len(), "ARP scan finished");
            report
        })
    }
}

/// Applies the optional name filter, then drops interfaces unfit for scanning.
fn select_interfaces(interfaces: Vec<NetworkInterface>, only: Option<&str>) -> Vec<NetworkInterface> {
    let selected: Vec<NetworkInterface> = interfaces
        .into_iter()
        .filter(|intf| only.is_none_or(|name| intf.name == name))
        .filter(|intf| match interface::check_eligibility(intf) {
            Ok(()) => true,
            Err(reason) => {
                info!(interface = %intf.name, "skip interface: {reason}");
                false
            }
        })
        .collect();

    if selected.is_empty() {
        warn!("no interface eligible for an ARP scan");
    }
    selected
}

async fn run_worker(
    intf: NetworkInterface,
    factory: Arc<dyn TransportFactory>,
    cfg: ScanConfig,
    cancel: CancellationToken,
    results: mpsc::Sender<Entry>,
    failures: mpsc::Sender<InterfaceFailure>,
) {
    let name = intf.name.clone();
    info!(interface = %name, "start scan on interface");

    let scanner = match LocalScanner::new(intf, factory.as_ref(), &cfg) {
        Ok(scanner) => scanner,
        Err(error) => {
            let _ = failures.send(InterfaceFailure { interface: name, error }).await;
            return;
        }
    };

    let outcome = scanner.find(&cancel, results).await;
    if let Err(e) = scanner.close() {
        warn!(interface = %name, "closing transport: {e}");
    }
    if let Err(error) = outcome {
        let _ = failures.send(InterfaceFailure { interface: name, error }).await;
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
