// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Webhook certificate provisioning through the cluster CSR workflow

use crate::config::Config;
use crate::error::{CertSetupError, Result};
use crate::identity::ServiceIdentity;
use crate::kubernetes::csr::{
    approve_csr, build_csr, delete_stale_csr, submit_csr, wait_for_certificate, wait_for_csr,
};
use crate::kubernetes::{apply_tls_secret, ensure_namespace_exists, secret_exists};
use crate::pki::{generate_key_and_request, validate_certificate_pem};
use kube::Client;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

/// Result of a provisioning run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// The secret was already there; nothing was changed
    AlreadyPresent,
    /// A new certificate was issued through the named CSR and stored
    Created { csr_name: String },
}

pub struct Provisioner {
    client: Client,
    config: Config,
    cancel: CancellationToken,
}

impl Provisioner {
    pub fn new(client: Client, config: Config, cancel: CancellationToken) -> Self {
        Self {
            client,
            config,
            cancel,
        }
    }

    /// Ensure the identity's secret holds a key and a cluster-signed certificate.
    ///
    /// Cancelling the token abandons the workflow at whichever cluster call is
    /// in flight, not only while polling.
    #[instrument(skip(self, identity), fields(secret = %format!("{}/{}", identity.namespace(), identity.secret())))]
    pub async fn run(&self, identity: &ServiceIdentity) -> Result<ProvisionOutcome> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                warn!("Provisioning of {} cancelled", identity.csr_name());
                Err(CertSetupError::Cancelled(identity.csr_name()))
            }
            outcome = self.provision(identity) => outcome,
        }
    }

    async fn provision(&self, identity: &ServiceIdentity) -> Result<ProvisionOutcome> {
        let namespace = identity.namespace();

        if secret_exists(&self.client, namespace, identity.secret()).await? {
            info!(
                "Secret {}/{} already exists, nothing to do",
                namespace,
                identity.secret()
            );
            return Ok(ProvisionOutcome::AlreadyPresent);
        }

        ensure_namespace_exists(&self.client, namespace).await?;

        let csr_name = identity.csr_name();
        info!("Creating certificate for {} via CSR {}", identity.service(), csr_name);
        let generated = generate_key_and_request(identity, self.config.key_algorithm)?;

        delete_stale_csr(&self.client, &csr_name).await?;
        submit_csr(
            &self.client,
            &build_csr(&csr_name, &generated.csr_pem, &self.config.signer_name),
        )
        .await?;

        wait_for_csr(
            &self.client,
            &csr_name,
            self.config.poll_interval,
            self.config.csr_timeout,
            &self.cancel,
        )
        .await?;
        approve_csr(&self.client, &csr_name).await?;

        let certificate = wait_for_certificate(
            &self.client,
            &csr_name,
            self.config.poll_interval,
            self.config.sign_attempts,
            &self.cancel,
        )
        .await?;
        validate_certificate_pem(&certificate)?;

        apply_tls_secret(
            &self.client,
            namespace,
            identity.secret(),
            &generated.key_pem,
            &certificate,
        )
        .await?;

        info!(
            "Secret {}/{} holds a certificate signed through CSR {}",
            namespace,
            identity.secret(),
            csr_name
        );
        Ok(ProvisionOutcome::Created { csr_name })
    }
}
