//! # Vendor Prefix Table
//!
//! Maps hardware-address assignment blocks (MA-L, MA-M and MA-S, i.e. 24, 28
//! and 36 bit prefixes) to the organization they are registered to.
//!
//! Lookups try the longest prefix first, so a caller never needs to know which
//! block size applies to an address.

pub mod sources;

use std::collections::HashMap;
use std::io::Read;

use csv::ReaderBuilder;
use macseek_common::vendors::{Organization, VendorRepository};
use pnet::util::MacAddr;
use thiserror::Error;
use tracing::debug;

pub use sources::{Registry, VendorSource, load_table};

const COLUMN_ASSIGNMENT: usize = 1;
const COLUMN_NAME: usize = 2;
const COLUMN_ADDRESS: usize = 3;
const COLUMN_BOUND: usize = 4;

#[derive(Debug, Error)]
pub enum VendorError {
    #[error("malformed vendor CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("vendor CSV has no header row")]
    MissingHeader,

    #[error("vendor CSV line {line} has {columns} columns, expected at least 4")]
    ShortRow { line: u64, columns: usize },

    #[error("reading vendor source {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("fetching vendor source {url}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("building HTTP client")]
    Client(#[source] reqwest::Error),
}

#[derive(Debug, Clone, Default)]
pub struct VendorTable {
    entries: HashMap<String, Organization>,
}

impl VendorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from registry CSV sources, in order.
    ///
    /// Expected layout: `Registry,Assignment,Organization Name,Organization Address`.
    /// Later sources overwrite earlier assignments. Any malformed source fails
    /// the whole build.
    pub fn build<I, R>(sources: I) -> Result<Self, VendorError>
    where
        I: IntoIterator<Item = R>,
        R: Read,
    {
        let mut table = Self::new();
        for source in sources {
            let parsed = parse_source(source)?;
            debug!(assignments = parsed.len(), "loaded vendor source");
            table.entries.extend(parsed);
        }
        Ok(table)
    }

    pub fn insert(&mut self, assignment: &str, organization: Organization) {
        self.entries.insert(assignment.to_lowercase(), organization);
    }

    /// Longest-prefix lookup. Accepts `AA:BB:CC:DD:EE:FF` as well as
    /// `aabbccddeeff`, in any case.
    pub fn get(&self, hw_addr: &str) -> Option<&Organization> {
        let normalized = hw_addr.replace(':', "").to_lowercase();
        let mut prefix = normalized.as_str();
        while !prefix.is_empty() {
            if let Some(org) = self.entries.get(prefix) {
                return Some(org);
            }
            let mut chars = prefix.chars();
            chars.next_back();
            prefix = chars.as_str();
        }
        None
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl VendorRepository for VendorTable {
    fn get_vendor(&self, mac: MacAddr) -> Option<&Organization> {
        self.get(&mac.to_string())
    }
}

fn parse_source<R: Read>(source: R) -> Result<HashMap<String, Organization>, VendorError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(source);

    if reader.headers()?.is_empty() {
        return Err(VendorError::MissingHeader);
    }

    let mut parsed = HashMap::new();
    for record in reader.records() {
        let record = record?;
        if record.len() < COLUMN_BOUND {
            return Err(VendorError::ShortRow {
                line: record.position().map_or(0, |p| p.line()),
                columns: record.len(),
            });
        }
        parsed.insert(
            record[COLUMN_ASSIGNMENT].to_lowercase(),
            Organization::new(&record[COLUMN_NAME], &record[COLUMN_ADDRESS]),
        );
    }
    Ok(parsed)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
