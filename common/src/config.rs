use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SCAN_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(2);
pub const DEFAULT_SEND_INTERVAL: Duration = Duration::from_millis(10);
pub const DEFAULT_TRIM_ADDRESS: usize = 40;

/// What the coordinator does when one interface's worker fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// The first worker error aborts the whole scan and discards all results.
    #[default]
    FailFast,
    /// Worker errors are recorded per interface and the scan keeps collecting
    /// from the remaining interfaces until the deadline.
    KeepPartial,
}

/// Settings for one coordinated active scan.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Overall deadline for the coordinated scan, measured from its start.
    pub timeout: Duration,
    /// Restricts the scan to a single interface by name.
    pub interface: Option<String>,
    /// Deadline applied to each individual ARP request.
    pub write_timeout: Duration,
    /// Pause between two consecutive ARP requests on the same interface.
    pub send_interval: Duration,
    pub failure_policy: FailurePolicy,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_SCAN_TIMEOUT,
            interface: None,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
            send_interval: DEFAULT_SEND_INTERVAL,
            failure_policy: FailurePolicy::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Runs the active ARP scan next to the neighbor cache lookup.
    /// When off, only the cache is consulted.
    ///
    /// The active scan needs raw socket privileges.
    pub scan_enabled: bool,
    pub scan: ScanConfig,
    /// Maximum number of characters printed for an organization address.
    pub trim_address: usize,
    /// Optional file receiving a copy of the report.
    pub output: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scan_enabled: true,
            scan: ScanConfig::default(),
            trim_address: DEFAULT_TRIM_ADDRESS,
            output: None,
        }
    }
}
