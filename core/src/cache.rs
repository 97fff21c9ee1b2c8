//! Reads the kernel's ARP cache.
//!
//! The cache is an opportunistic source: rows are parsed field by field and a
//! field that does not parse is simply left empty.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use macseek_common::network::entry::Entry;
use macseek_common::network::interface;
use pnet::datalink::NetworkInterface;
use tracing::{debug, warn};

pub const PROC_NET_ARP: &str = "/proc/net/arp";

const COLUMN_IP_ADDR: usize = 0;
const COLUMN_HW_TYPE: usize = 1;
const COLUMN_FLAGS: usize = 2;
const COLUMN_HW_ADDR: usize = 3;
const COLUMN_MASK: usize = 4;
const COLUMN_DEVICE: usize = 5;
const COLUMN_BOUND: usize = 6;

/// Parses a table shaped like `/proc/net/arp`:
///
/// ```text
/// IP address       HW type     Flags       HW address            Mask     Device
/// 192.168.1.1      0x1         0x2         aa:bb:cc:dd:ee:ff     *        eth0
/// ```
///
/// The first line is always skipped. Rows with fewer than six columns are
/// dropped. Bytes that are not UTF-8 are replaced rather than ending the
/// parse. Device names are resolved against `interfaces`.
pub fn parse_entries<R: BufRead>(reader: R, interfaces: &[NetworkInterface]) -> Vec<Entry> {
    let mut entries = Vec::new();
    for line in reader.split(b'\n').skip(1) {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("ARP cache read stopped: {e}");
                break;
            }
        };
        if let Some(entry) = parse_row(&String::from_utf8_lossy(&line), interfaces) {
            entries.push(entry);
        }
    }
    entries
}

/// Reads the system ARP cache. An unreadable cache yields no entries.
pub fn read_system_cache(interfaces: &[NetworkInterface]) -> Vec<Entry> {
    read_cache_file(Path::new(PROC_NET_ARP), interfaces)
}

pub fn read_cache_file(path: &Path, interfaces: &[NetworkInterface]) -> Vec<Entry> {
    match File::open(path) {
        Ok(file) => {
            let entries = parse_entries(BufReader::new(file), interfaces);
            debug!(path = %path.display(), count = entries.len(), "read ARP cache");
            entries
        }
        Err(e) => {
            warn!(path = %path.display(), "ARP cache unavailable: {e}");
            Vec::new()
        }
    }
}

fn parse_row(line: &str, interfaces: &[NetworkInterface]) -> Option<Entry> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < COLUMN_BOUND {
        return None;
    }

    Some(Entry {
        address: fields[COLUMN_IP_ADDR].parse().ok(),
        hw_type: parse_hex_byte(fields[COLUMN_HW_TYPE]),
        flags: parse_hex_byte(fields[COLUMN_FLAGS]),
        mac: fields[COLUMN_HW_ADDR].parse().ok(),
        mask: fields[COLUMN_MASK].to_string(),
        device: interface::find_by_name(interfaces, fields[COLUMN_DEVICE]).cloned(),
    })
}

/// `0x1` style values; anything that is not a single hex byte becomes zero.
fn parse_hex_byte(field: &str) -> u8 {
    let digits = field
        .strip_prefix("0x")
        .or_else(|| field.strip_prefix("0X"))
        .unwrap_or(field);
    u8::from_str_radix(digits, 16).unwrap_or(0)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
