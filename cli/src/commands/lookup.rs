use std::time::Instant;

use anyhow::Context;
use macseek_common::config::Config;
use macseek_common::network::entry::Entry;
use macseek_common::vendors::VendorRepository;
use macseek_core::DiscoveryService;
use macseek_core::vendors::load_table;
use pnet::datalink;
use tracing::{info, warn};

use crate::commands::LookupArgs;
use crate::terminal::{print, report, spinner};

pub async fn lookup(args: LookupArgs) -> anyhow::Result<()> {
    let cfg = args.to_config();
    let sources = args.sources();
    let interfaces = datalink::interfaces();
    let service = DiscoveryService::default();

    let start_time = Instant::now();
    let progress = spinner::start(if cfg.scan_enabled {
        "scanning the network and loading vendor data"
    } else {
        "loading vendor data"
    });

    // Vendor data does not depend on the scan, so both run side by side.
    let (table, discovery) = tokio::join!(
        load_table(&sources),
        service.perform_discovery(interfaces, &cfg)
    );
    drop(progress);

    let discovery = discovery.context("network discovery failed")?;
    let table = table.context("loading vendor data failed")?;
    info!("check {} vendor entries", table.len());

    for failure in &discovery.failures {
        warn!(interface = %failure.interface, "results incomplete: {}", failure.error);
    }

    print::header("devices");
    write_report(&discovery.entries, &table, &cfg)?;
    if discovery.entries.is_empty() {
        print::no_results();
    } else {
        print::summary(discovery.entries.len(), start_time.elapsed());
    }
    Ok(())
}

/// The table is written even with no rows, so `-o` always leaves a file.
fn write_report(entries: &[Entry], vendors: &dyn VendorRepository, cfg: &Config) -> anyhow::Result<()> {
    let rendered = report::render(entries, vendors, cfg.trim_address);
    report::emit(&rendered, cfg.output.as_deref()).with_context(|| match &cfg.output {
        Some(path) => format!("writing report to {}", path.display()),
        None => "writing report".to_string(),
    })
}
