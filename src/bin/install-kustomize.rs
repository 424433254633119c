// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use webhook_cert_setup::cli::{parse_or_exit, DownloadArgs};
use webhook_cert_setup::release::ReleaseDownloader;

#[tokio::main]
async fn main() -> Result<()> {
    let args: DownloadArgs = parse_or_exit();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let downloader = ReleaseDownloader::new(args.options())?;
    let path = downloader.run().await?;
    info!("Downloaded {}", path.display());

    Ok(())
}
