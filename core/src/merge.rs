//! Folds the cached and scanned views of the network into one list.

use std::cmp::Ordering;
use std::collections::HashMap;

use macseek_common::network::entry::Entry;

/// Combines cached and freshly scanned entries, one per address.
///
/// A scanned entry replaces a cached one with the same address. Entries whose
/// address could not be parsed have no identity to merge on, so each of them
/// is kept as is. The result is unordered; see [`sort_by_address`].
pub fn merge(cached: Vec<Entry>, scanned: Vec<Entry>) -> Vec<Entry> {
    let mut by_address: HashMap<String, Entry> = HashMap::with_capacity(cached.len() + scanned.len());
    let mut unaddressed = Vec::new();

    for entry in cached.into_iter().chain(scanned) {
        if entry.address.is_none() {
            unaddressed.push(entry);
            continue;
        }
        by_address.insert(entry.key(), entry);
    }

    by_address.into_values().chain(unaddressed).collect()
}

/// Orders entries by IPv4 address, address-less ones last.
pub fn sort_by_address(entries: &mut [Entry]) {
    entries.sort_by(|a, b| match (a.address, b.address) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
