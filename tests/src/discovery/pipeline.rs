use std::io::Write;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use macseek_common::config::Config;
use macseek_common::vendors::VendorRepository;
use macseek_core::{DiscoveryService, Scanner, VendorTable};
use pnet::util::MacAddr;
use tempfile::NamedTempFile;

use crate::support::{interface, SimulatedFactory, SimulatedLan};

const OWN_MAC: MacAddr = MacAddr(0x02, 0, 0, 0, 0, 0x01);
const NEW_PRINTER: MacAddr = MacAddr(0xaa, 0xbb, 0xcc, 0x00, 0x00, 0x22);

const MA_L: &str = "Registry,Assignment,Organization Name,Organization Address
MA-L,AABBCC,Acme Printing,1 Long Street Springfield
MA-L,70B3D5,IEEE Registration Authority,445 Hoes Lane Piscataway NJ US 08554
";

const MA_S: &str = "Registry,Assignment,Organization Name,Organization Address
MA-S,70B3D5F2F,TELEPLATFORMS,\"Polbina st., 3/1 Moscow  RU 109388\"
";

fn arp_cache() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        "IP address       HW type     Flags       HW address            Mask     Device
10.0.0.2         0x1         0x2         00:00:5e:00:53:01     *        eth0
10.0.0.9         0x1         0x2         70:b3:d5:f2:f1:23     *        eth0
bogus            0x1         0x2         00:00:5e:00:53:aa     *        eth0
10.0.0.3         0x1         0x2
"
    )
    .unwrap();
    file
}

fn vendor_name(table: &VendorTable, mac: Option<MacAddr>) -> Option<&str> {
    mac.and_then(|m| table.get_vendor(m)).map(|org| org.name.as_str())
}

#[tokio::test(start_paused = true)]
async fn cache_and_scan_merge_and_resolve_vendors() {
    let lan = SimulatedLan::new(OWN_MAC, Ipv4Addr::new(10, 0, 0, 1), &[(Ipv4Addr::new(10, 0, 0, 2), NEW_PRINTER)]);
    let factory = SimulatedFactory::default().with("eth0", lan);
    let cache = arp_cache();
    let service = DiscoveryService::new(Scanner::new(Arc::new(factory))).with_cache_path(cache.path());

    let mut cfg = Config::default();
    cfg.scan.timeout = Duration::from_secs(1);
    let discovery = service
        .perform_discovery(vec![interface("eth0", "10.0.0.1/28", OWN_MAC)], &cfg)
        .await
        .unwrap();
    let table = VendorTable::build([MA_L.as_bytes(), MA_S.as_bytes()]).unwrap();

    let entries = discovery.entries;
    assert_eq!(entries.len(), 3, "short cache row dropped, unparsable address kept");

    assert_eq!(entries[0].address, Some(Ipv4Addr::new(10, 0, 0, 2)));
    assert_eq!(entries[0].mac, Some(NEW_PRINTER), "scan result wins over the cache");
    assert_eq!(vendor_name(&table, entries[0].mac), Some("Acme Printing"));

    assert_eq!(entries[1].address, Some(Ipv4Addr::new(10, 0, 0, 9)));
    assert_eq!(vendor_name(&table, entries[1].mac), Some("TELEPLATFORMS"), "MA-S beats MA-L");

    assert_eq!(entries[2].address, None);
    assert_eq!(entries[2].device_name(), Some("eth0"));
    assert_eq!(vendor_name(&table, entries[2].mac), None);
}

#[test]
fn malformed_vendor_source_fails_the_lookup_table() {
    let truncated = "Registry,Assignment,Organization Name,Organization Address\nMA-L,AABBCC\n";
    assert!(VendorTable::build([MA_L.as_bytes(), truncated.as_bytes()]).is_err());
}
