use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use chrono::{Local, NaiveDate};
use macseek_core::vendors::sources::{self, Registry, VendorSource};
use tracing::info;

use crate::commands::FetchArgs;

const CUSTOM_NAME: &str = "custom";

/// One download: where from and what to call it.
#[derive(Debug, PartialEq, Eq)]
struct Download {
    source: VendorSource,
    label: String,
}

pub async fn fetch(args: FetchArgs) -> anyhow::Result<()> {
    let downloads = plan(&args);
    if downloads.is_empty() {
        bail!("nothing to fetch: pass --registry, --all or --url");
    }

    let client = reqwest::Client::builder()
        .timeout(args.timeout)
        .build()
        .context("Failed to create HTTP client")?;
    let today = Local::now().date_naive();

    for (idx, download) in downloads.iter().enumerate() {
        info!("{idx}) get: {}", download.source);
        let body = sources::fetch(&download.source, &client)
            .await
            .with_context(|| format!("downloading {}", download.source))?;
        let path = target_path(&args.dir, today, idx, &download.label);
        tokio::fs::write(&path, &body)
            .await
            .with_context(|| format!("writing {}", path.display()))?;
        info!(bytes = body.len(), "saved {}", path.display());
    }
    Ok(())
}

fn plan(args: &FetchArgs) -> Vec<Download> {
    let registries: Vec<Registry> = if args.all {
        Registry::ALL.to_vec()
    } else {
        args.registries.clone()
    };

    let mut downloads: Vec<Download> = registries
        .into_iter()
        .map(|registry| Download {
            source: registry.into(),
            label: registry.name().to_string(),
        })
        .collect();
    if let Some(url) = &args.url {
        downloads.push(Download {
            source: VendorSource::Remote(url.clone()),
            label: CUSTOM_NAME.to_string(),
        });
    }

    if let Some(name) = &args.name {
        for download in &mut downloads {
            download.label.clone_from(name);
        }
    }
    downloads
}

/// `<dir>/<yyyy-mm-dd>_<idx>_<label>.csv`
fn target_path(dir: &Path, date: NaiveDate, idx: usize, label: &str) -> PathBuf {
    dir.join(format!("{}_{idx}_{label}.csv", date.format("%Y-%m-%d")))
}
