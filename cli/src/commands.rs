pub mod fetch;
pub mod lookup;

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand};
use macseek_common::config::{
    Config, DEFAULT_SCAN_TIMEOUT, DEFAULT_TRIM_ADDRESS, FailurePolicy, ScanConfig,
};
use macseek_core::vendors::{Registry, VendorSource};

#[derive(Parser)]
#[command(name = "macseek", version)]
#[command(about = "Find the devices on your local network and who made them.")]
#[command(args_conflicts_with_subcommands = true)]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub lookup: LookupArgs,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List devices from the ARP cache and an active scan, with their vendors (default)
    #[command(alias = "l")]
    Lookup(LookupArgs),
    /// Download IEEE registry CSVs for offline use
    #[command(alias = "f")]
    Fetch(FetchArgs),
}

#[derive(Args, Clone, Debug)]
pub struct LookupArgs {
    /// IEEE registry to resolve vendors with; repeatable
    #[arg(long = "registry", value_name = "large|medium|small")]
    pub registries: Vec<Registry>,

    /// Local registry CSV to resolve vendors with; repeatable
    #[arg(long = "source-file", value_name = "PATH")]
    pub source_files: Vec<PathBuf>,

    /// How long to wait for ARP replies (e.g. 10s, 500ms)
    #[arg(long, value_parser = parse_duration, default_value = "10s")]
    pub timeout: Duration,

    /// Only read the ARP cache; skip the active scan (which requires root)
    #[arg(long)]
    pub no_scan: bool,

    /// Restrict the scan and the report to one interface
    #[arg(short, long)]
    pub interface: Option<String>,

    /// Also write the report to this file
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Maximum length of the organization address column
    #[arg(long, default_value_t = DEFAULT_TRIM_ADDRESS)]
    pub trim_address: usize,

    /// Keep results from healthy interfaces when another interface fails
    #[arg(long)]
    pub keep_partial: bool,
}

impl LookupArgs {
    /// Registries first, then local files; the large registry when none is named.
    pub fn sources(&self) -> Vec<VendorSource> {
        let mut sources: Vec<VendorSource> = self.registries.iter().copied().map(VendorSource::from).collect();
        sources.extend(self.source_files.iter().cloned().map(VendorSource::Local));
        if sources.is_empty() {
            sources.push(Registry::Large.into());
        }
        sources
    }

    pub fn to_config(&self) -> Config {
        let failure_policy = if self.keep_partial {
            FailurePolicy::KeepPartial
        } else {
            FailurePolicy::FailFast
        };
        Config {
            scan_enabled: !self.no_scan,
            scan: ScanConfig {
                timeout: self.timeout,
                interface: self.interface.clone(),
                failure_policy,
                ..ScanConfig::default()
            },
            trim_address: self.trim_address,
            output: self.output.clone(),
        }
    }
}

impl Default for LookupArgs {
    fn default() -> Self {
        Self {
            registries: Vec::new(),
            source_files: Vec::new(),
            timeout: DEFAULT_SCAN_TIMEOUT,
            no_scan: false,
            interface: None,
            output: None,
            trim_address: DEFAULT_TRIM_ADDRESS,
            keep_partial: false,
        }
    }
}

#[derive(Args, Clone, Debug)]
pub struct FetchArgs {
    /// IEEE registry to download; repeatable
    #[arg(long = "registry", value_name = "large|medium|small")]
    pub registries: Vec<Registry>,

    /// Download all three IEEE registries
    #[arg(long, conflicts_with = "registries")]
    pub all: bool,

    /// Download a custom CSV url as well
    #[arg(long)]
    pub url: Option<String>,

    /// Name used in the output file names instead of the registry name
    #[arg(short = 'o', long)]
    pub name: Option<String>,

    /// Directory the files are written to
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    /// HTTP timeout per download
    #[arg(long, value_parser = parse_duration, default_value = "30s")]
    pub timeout: Duration,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The subcommand to run; a bare invocation is a lookup.
    pub fn into_command(self) -> Commands {
        self.command.unwrap_or(Commands::Lookup(self.lookup))
    }
}

/// Accepts `250ms`, `10s`, `2m` or a bare number of seconds.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    let (value, unit) = match s.find(|c: char| !c.is_ascii_digit()) {
        Some(idx) => s.split_at(idx),
        None => (s, "s"),
    };
    let value: u64 = value.parse().map_err(|_| format!("invalid duration '{s}'"))?;
    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        "m" => value
            .checked_mul(60)
            .map(Duration::from_secs)
            .ok_or_else(|| format!("duration '{s}' is too large")),
        _ => Err(format!("invalid duration unit in '{s}' (use ms, s or m)")),
    }
}
