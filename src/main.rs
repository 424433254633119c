// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use webhook_cert_setup::cli::{parse_or_exit, ProvisionArgs};
use webhook_cert_setup::config::Config;
use webhook_cert_setup::kubernetes::create_client;
use webhook_cert_setup::provision::{ProvisionOutcome, Provisioner};

#[tokio::main]
async fn main() -> Result<()> {
    let args: ProvisionArgs = parse_or_exit();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    // Reject bad input before touching the cluster
    let identity = args.identity()?;
    let config = args.apply_to(Config::from_env()?);
    config.validate()?;
    info!(
        "Configuration loaded: signer={} key={:?} csr_timeout={:?}",
        config.signer_name, config.key_algorithm, config.csr_timeout
    );

    let client = create_client(args.kubeconfig.as_deref(), args.context.as_deref()).await?;
    info!("Connected to Kubernetes cluster");

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling");
            on_signal.cancel();
        }
    });

    match Provisioner::new(client, config, cancel).run(&identity).await? {
        ProvisionOutcome::AlreadyPresent => {
            info!("Secret {} already present, skipping", identity.secret())
        }
        ProvisionOutcome::Created { csr_name } => {
            info!("Secret {} created from CSR {}", identity.secret(), csr_name)
        }
    }

    Ok(())
}
