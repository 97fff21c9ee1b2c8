//! Plain-text device table. Kept free of colors so it can be written to a file
//! verbatim.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use macseek_common::network::entry::Entry;
use macseek_common::vendors::VendorRepository;

const UNKNOWN_INTERFACE: &str = "unknown";
const NOT_FOUND: &str = "not found";

fn row(out: &mut String, cols: [&str; 6]) {
    let [idx, interface, ip, mac, name, address] = cols;
    let _ = writeln!(out, "{idx:<5} {interface:<10} {ip:<20} {mac:<20} {name:<20} {address:<15}");
}

/// Renders one row per entry, in the given order.
pub fn render(entries: &[Entry], vendors: &dyn VendorRepository, trim_address: usize) -> String {
    let mut out = String::new();
    row(&mut out, ["idx", "interface", "IP", "MAC", "Name", "Address"]);
    row(&mut out, ["---", "---------", "--", "---", "----", "-------"]);

    for (idx, entry) in entries.iter().enumerate() {
        let mac = entry.mac.map(|m| m.to_string()).unwrap_or_default();
        let (name, address) = match entry.mac.and_then(|m| vendors.get_vendor(m)) {
            Some(org) => (org.name.as_str(), trim(&org.address, trim_address)),
            None => (NOT_FOUND, ""),
        };
        row(
            &mut out,
            [
                &idx.to_string(),
                entry.device_name().unwrap_or(UNKNOWN_INTERFACE),
                &entry.key(),
                &mac,
                name,
                address,
            ],
        );
    }
    out
}

/// Cuts `s` to at most `max` characters.
fn trim(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

/// Prints the report to stdout and, when `output` is set, to that file too.
pub fn emit(report: &str, output: Option<&Path>) -> io::Result<()> {
    if let Some(path) = output {
        File::create(path)?.write_all(report.as_bytes())?;
    }
    let mut stdout = io::stdout().lock();
    stdout.write_all(report.as_bytes())?;
    stdout.flush()
}
