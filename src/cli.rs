// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Command-line arguments of the two binaries

use crate::config::Config;
use crate::constants::release;
use crate::error::Result;
use crate::identity::ServiceIdentity;
use crate::pki::KeyAlgorithm;
use crate::release::{DownloadOptions, SelectionStrategy};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Generate a certificate suitable for an admission webhook service.
///
/// The certificate is signed through the cluster's CertificateSigningRequest
/// API and stored, together with its key, in a secret.
#[derive(Debug, Parser)]
#[command(name = "webhook-create-signed-cert", version)]
pub struct ProvisionArgs {
    /// Service name of the webhook
    #[arg(long)]
    pub service: String,

    /// Namespace where the webhook service and secret reside
    #[arg(short = 'n', long)]
    pub namespace: String,

    /// Secret name for the CA certificate and server certificate/key pair
    #[arg(long)]
    pub secret: String,

    /// Path to a kubeconfig file instead of the inferred configuration
    #[arg(long)]
    pub kubeconfig: Option<PathBuf>,

    /// Kubeconfig context to use
    #[arg(long)]
    pub context: Option<String>,

    /// Seconds to wait for the submitted CSR to become visible
    #[arg(long)]
    pub csr_timeout: Option<u64>,

    /// Signer requested on the CSR
    #[arg(long)]
    pub signer_name: Option<String>,

    /// Algorithm of the generated private key
    #[arg(long, value_enum)]
    pub key_algorithm: Option<KeyAlgorithm>,
}

impl ProvisionArgs {
    pub fn identity(&self) -> Result<ServiceIdentity> {
        ServiceIdentity::new(&self.service, &self.namespace, &self.secret)
    }

    /// Apply command-line overrides on top of the environment configuration
    pub fn apply_to(&self, mut config: Config) -> Config {
        if let Some(secs) = self.csr_timeout {
            config.csr_timeout = Duration::from_secs(secs);
        }
        if let Some(signer) = &self.signer_name {
            config.signer_name = signer.clone();
        }
        if let Some(algorithm) = self.key_algorithm {
            config.key_algorithm = algorithm;
        }
        config
    }
}

/// Download the latest kustomize release archive.
#[derive(Debug, Parser)]
#[command(name = "install-kustomize", version)]
pub struct DownloadArgs {
    /// Release listing endpoint
    #[arg(long, env = "KUSTOMIZE_RELEASES_URL", default_value = release::DEFAULT_RELEASES_URL)]
    pub releases_url: url::Url,

    /// Platform suffix of the wanted archive
    #[arg(long, default_value = release::DEFAULT_PLATFORM)]
    pub platform: String,

    /// Directory the archive is written to
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Pick the newest release by plain string order instead of by version number
    #[arg(long)]
    pub lexicographic: bool,

    /// Token sent as a bearer credential to the release API
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

impl DownloadArgs {
    pub fn options(&self) -> DownloadOptions {
        DownloadOptions {
            releases_url: self.releases_url.clone(),
            platform: self.platform.clone(),
            output_dir: self.output_dir.clone(),
            strategy: if self.lexicographic {
                SelectionStrategy::Lexicographic
            } else {
                SelectionStrategy::Semantic
            },
            token: self.token.clone(),
        }
    }
}

/// Parse arguments; usage errors exit with status 1, help and version with 0
pub fn parse_or_exit<T: Parser>() -> T {
    match T::try_parse() {
        Ok(args) => args,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    }
}
