//! Where vendor CSV data comes from: local files or HTTP registries.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::info;

use super::{VendorError, VendorTable};

// https://regauth.standards.ieee.org/standards-ra-web/pub/view.html#registries
pub const IEEE_MA_L_URL: &str = "http://standards-oui.ieee.org/oui/oui.csv";
pub const IEEE_MA_M_URL: &str = "http://standards-oui.ieee.org/oui28/mam.csv";
pub const IEEE_MA_S_URL: &str = "http://standards-oui.ieee.org/oui36/oui36.csv";

pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// IEEE assignment registries, by block size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Registry {
    /// MA-L, 24 bit prefixes.
    Large,
    /// MA-M, 28 bit prefixes.
    Medium,
    /// MA-S, 36 bit prefixes.
    Small,
}

impl Registry {
    pub const ALL: [Registry; 3] = [Registry::Large, Registry::Medium, Registry::Small];

    pub fn url(self) -> &'static str {
        match self {
            Registry::Large => IEEE_MA_L_URL,
            Registry::Medium => IEEE_MA_M_URL,
            Registry::Small => IEEE_MA_S_URL,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Registry::Large => "ieee-mal",
            Registry::Medium => "ieee-mam",
            Registry::Small => "ieee-mas",
        }
    }
}

impl fmt::Display for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Registry {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "large" | "mal" | "ma-l" | "ieee-mal" => Ok(Registry::Large),
            "medium" | "mam" | "ma-m" | "ieee-mam" => Ok(Registry::Medium),
            "small" | "mas" | "ma-s" | "ieee-mas" => Ok(Registry::Small),
            other => Err(format!("unknown registry '{other}' (expected large, medium or small)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VendorSource {
    Local(PathBuf),
    Remote(String),
}

impl fmt::Display for VendorSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VendorSource::Local(path) => write!(f, "{}", path.display()),
            VendorSource::Remote(url) => f.write_str(url),
        }
    }
}

impl From<Registry> for VendorSource {
    fn from(registry: Registry) -> Self {
        VendorSource::Remote(registry.url().to_string())
    }
}

pub fn http_client() -> Result<reqwest::Client, VendorError> {
    reqwest::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(VendorError::Client)
}

/// Reads the raw CSV bytes of one source.
pub async fn fetch(source: &VendorSource, client: &reqwest::Client) -> Result<Vec<u8>, VendorError> {
    match source {
        VendorSource::Local(path) => tokio::fs::read(path).await.map_err(|source| VendorError::Io {
            path: path.display().to_string(),
            source,
        }),
        VendorSource::Remote(url) => {
            info!(%url, "fetching vendor registry");
            let fetch_err = |source| VendorError::Fetch {
                url: url.clone(),
                source,
            };
            let response = client
                .get(url)
                .send()
                .await
                .and_then(reqwest::Response::error_for_status)
                .map_err(fetch_err)?;
            let body = response.bytes().await.map_err(fetch_err)?;
            Ok(body.to_vec())
        }
    }
}

/// Fetches every source in order and builds one table from them.
/// The first failing source aborts the load.
pub async fn load_table(sources: &[VendorSource]) -> Result<VendorTable, VendorError> {
    let client = http_client()?;
    let mut bodies = Vec::with_capacity(sources.len());
    for source in sources {
        bodies.push(fetch(source, &client).await?);
    }
    let table = VendorTable::build(bodies.iter().map(Vec::as_slice))?;
    info!(sources = sources.len(), assignments = table.len(), "vendor table ready");
    Ok(table)
}
