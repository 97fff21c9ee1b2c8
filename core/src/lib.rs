pub mod cache;
pub mod discovery;
pub mod error;
pub mod merge;
pub mod network;
pub mod scanner;
pub mod vendors;

pub use discovery::{Discovery, DiscoveryService};
pub use error::{ScanError, TransportError};
pub use scanner::{InterfaceFailure, ScanReport, Scanner};
pub use vendors::{VendorError, VendorTable};
