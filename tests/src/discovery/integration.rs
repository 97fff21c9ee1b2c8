use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use macseek_common::config::{FailurePolicy, ScanConfig};
use macseek_common::network::entry::Entry;
use macseek_core::merge;
use macseek_core::{ScanError, Scanner};
use pnet::util::MacAddr;

use crate::support::{interface, reply_frame, SimulatedFactory, SimulatedLan};

const ETH0_MAC: MacAddr = MacAddr(0x02, 0, 0, 0, 0, 0x01);
const WLAN0_MAC: MacAddr = MacAddr(0x02, 0, 0, 0, 0, 0x02);
const PRINTER: MacAddr = MacAddr(0xaa, 0xbb, 0xcc, 0x00, 0x00, 0x02);
const ROUTER: MacAddr = MacAddr(0xaa, 0xbb, 0xcc, 0x00, 0x00, 0x05);
const PHONE: MacAddr = MacAddr(0x70, 0xb3, 0xd5, 0xf2, 0xf1, 0x23);

fn scan_config(policy: FailurePolicy) -> ScanConfig {
    ScanConfig {
        timeout: Duration::from_secs(2),
        failure_policy: policy,
        ..ScanConfig::default()
    }
}

fn eth0_lan() -> Arc<SimulatedLan> {
    SimulatedLan::new(
        ETH0_MAC,
        Ipv4Addr::new(10, 0, 0, 1),
        &[(Ipv4Addr::new(10, 0, 0, 2), PRINTER), (Ipv4Addr::new(10, 0, 0, 5), ROUTER)],
    )
}

fn wlan0_lan() -> Arc<SimulatedLan> {
    SimulatedLan::new(
        WLAN0_MAC,
        Ipv4Addr::new(192, 168, 7, 1),
        &[(Ipv4Addr::new(192, 168, 7, 2), PHONE)],
    )
}

fn summary(entries: &[Entry]) -> Vec<(Ipv4Addr, MacAddr, String)> {
    entries
        .iter()
        .map(|e| (e.address.unwrap(), e.mac.unwrap(), e.device_name().unwrap().to_string()))
        .collect()
}

#[tokio::test(start_paused = true)]
async fn scan_finds_neighbors_on_every_interface() {
    let eth0 = eth0_lan();
    let wlan0 = wlan0_lan();
    // A gratuitous announcement of our own address must not show up as a device.
    wlan0.inject(reply_frame(
        WLAN0_MAC,
        Ipv4Addr::new(192, 168, 7, 1),
        MacAddr::broadcast(),
        Ipv4Addr::new(192, 168, 7, 1),
    ));
    let factory = SimulatedFactory::default()
        .with("eth0", eth0.clone())
        .with("wlan0", wlan0.clone());

    let interfaces = vec![
        interface("eth0", "10.0.0.1/29", ETH0_MAC),
        interface("wlan0", "192.168.7.1/30", WLAN0_MAC),
    ];
    let report = Scanner::new(Arc::new(factory))
        .run(interfaces, &scan_config(FailurePolicy::FailFast))
        .await
        .unwrap();

    let mut entries = report.entries;
    merge::sort_by_address(&mut entries);
    assert_eq!(
        summary(&entries),
        vec![
            (Ipv4Addr::new(10, 0, 0, 2), PRINTER, "eth0".to_string()),
            (Ipv4Addr::new(10, 0, 0, 5), ROUTER, "eth0".to_string()),
            (Ipv4Addr::new(192, 168, 7, 2), PHONE, "wlan0".to_string()),
        ]
    );
    assert!(report.failures.is_empty());

    let eth0_targets: Vec<Ipv4Addr> = (1..=6).map(|d| Ipv4Addr::new(10, 0, 0, d)).collect();
    assert_eq!(eth0.sent(), eth0_targets);
    assert_eq!(wlan0.sent(), vec![Ipv4Addr::new(192, 168, 7, 1), Ipv4Addr::new(192, 168, 7, 2)]);
    assert_eq!(eth0.close_count(), 1);
    assert_eq!(wlan0.close_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn broken_link_aborts_the_whole_scan_by_default() {
    let eth0 = eth0_lan();
    let wlan0 = wlan0_lan();
    wlan0.cut();
    let factory = SimulatedFactory::default()
        .with("eth0", eth0.clone())
        .with("wlan0", wlan0.clone());

    let interfaces = vec![
        interface("eth0", "10.0.0.1/29", ETH0_MAC),
        interface("wlan0", "192.168.7.1/30", WLAN0_MAC),
    ];
    let outcome = Scanner::new(Arc::new(factory))
        .run(interfaces, &scan_config(FailurePolicy::FailFast))
        .await;

    match outcome {
        Err(ScanError::Transport { interface, .. }) => assert_eq!(interface, "wlan0"),
        other => panic!("expected a transport failure, got {other:?}"),
    }
    assert_eq!(eth0.close_count(), 1);
    assert_eq!(wlan0.close_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn broken_link_is_reported_next_to_partial_results() {
    let eth0 = eth0_lan();
    let wlan0 = wlan0_lan();
    wlan0.cut();
    let factory = SimulatedFactory::default().with("eth0", eth0).with("wlan0", wlan0);

    let interfaces = vec![
        interface("eth0", "10.0.0.1/29", ETH0_MAC),
        interface("wlan0", "192.168.7.1/30", WLAN0_MAC),
    ];
    let report = Scanner::new(Arc::new(factory))
        .run(interfaces, &scan_config(FailurePolicy::KeepPartial))
        .await
        .unwrap();

    assert_eq!(report.entries.len(), 2);
    assert!(report.entries.iter().all(|e| e.device_name() == Some("eth0")));
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].interface, "wlan0");
}

#[tokio::test(start_paused = true)]
async fn interface_without_segment_fails_to_open() {
    let factory = SimulatedFactory::default();
    let outcome = Scanner::new(Arc::new(factory))
        .run(
            vec![interface("eth9", "10.9.0.1/30", ETH0_MAC)],
            &scan_config(FailurePolicy::FailFast),
        )
        .await;
    assert!(matches!(outcome, Err(ScanError::Transport { interface, .. }) if interface == "eth9"));
}
