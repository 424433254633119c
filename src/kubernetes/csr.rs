// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! CertificateSigningRequest submission, approval and polling

use crate::constants::csr::{APPROVAL_REASON, REQUEST_GROUP, USAGES};
use crate::error::{CertSetupError, Result};
use k8s_openapi::api::certificates::v1::{
    CertificateSigningRequest, CertificateSigningRequestSpec,
};
use k8s_openapi::ByteString;
use kube::{
    api::{DeleteParams, ObjectMeta, Patch, PatchParams, PostParams},
    Api, Client,
};
use serde_json::json;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// Build the CSR resource submitted to the control plane
pub fn build_csr(name: &str, csr_pem: &str, signer_name: &str) -> CertificateSigningRequest {
    CertificateSigningRequest {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            ..Default::default()
        },
        spec: CertificateSigningRequestSpec {
            groups: Some(vec![REQUEST_GROUP.to_string()]),
            request: ByteString(csr_pem.as_bytes().to_vec()),
            signer_name: signer_name.to_string(),
            usages: Some(USAGES.iter().map(|u| u.to_string()).collect()),
            ..Default::default()
        },
        status: None,
    }
}

/// Delete a CSR left over from a previous run, if any
#[instrument(skip(client))]
pub async fn delete_stale_csr(client: &Client, name: &str) -> Result<()> {
    let csrs: Api<CertificateSigningRequest> = Api::all(client.clone());

    match csrs.delete(name, &DeleteParams::default()).await {
        Ok(_) => {
            info!("Deleted previous CSR {}", name);
            Ok(())
        }
        Err(kube::Error::Api(err)) if err.code == 404 => {
            debug!("No previous CSR {}", name);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Submit a new CSR
#[instrument(skip(client, csr))]
pub async fn submit_csr(client: &Client, csr: &CertificateSigningRequest) -> Result<()> {
    let csrs: Api<CertificateSigningRequest> = Api::all(client.clone());
    csrs.create(&PostParams::default(), csr).await?;
    info!(
        "Submitted CSR {}",
        csr.metadata.name.as_deref().unwrap_or_default()
    );
    Ok(())
}

/// Poll until the CSR can be read back, bounded by `deadline` and `cancel`
#[instrument(skip(client, cancel))]
pub async fn wait_for_csr(
    client: &Client,
    name: &str,
    interval: Duration,
    deadline: Duration,
    cancel: &CancellationToken,
) -> Result<CertificateSigningRequest> {
    let csrs: Api<CertificateSigningRequest> = Api::all(client.clone());

    let poll = async {
        loop {
            match csrs.get_opt(name).await {
                Ok(Some(csr)) => return csr,
                Ok(None) => debug!("CSR {} not yet visible, retrying in {:?}", name, interval),
                Err(e) => warn!("Error reading CSR {}: {}, retrying in {:?}", name, e, interval),
            }
            sleep(interval).await;
        }
    };

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(CertSetupError::Cancelled(name.to_string())),
        found = timeout(deadline, poll) => found.map_err(|_| CertSetupError::CsrTimeout {
            name: name.to_string(),
            waited: deadline,
        }),
    }
}

/// Approve a CSR through its approval subresource
#[instrument(skip(client))]
pub async fn approve_csr(client: &Client, name: &str) -> Result<()> {
    let csrs: Api<CertificateSigningRequest> = Api::all(client.clone());

    let patch = json!({
        "status": {
            "conditions": [{
                "type": "Approved",
                "status": "True",
                "reason": APPROVAL_REASON,
                "message": "This CSR was approved by webhook-cert-setup"
            }]
        }
    });
    csrs.patch_subresource("approval", name, &PatchParams::default(), &Patch::Merge(&patch))
        .await?;

    info!("Approved CSR {}", name);
    Ok(())
}

/// Poll up to `attempts` times for the signed certificate attached to the CSR
#[instrument(skip(client, cancel))]
pub async fn wait_for_certificate(
    client: &Client,
    name: &str,
    interval: Duration,
    attempts: u32,
    cancel: &CancellationToken,
) -> Result<Vec<u8>> {
    let csrs: Api<CertificateSigningRequest> = Api::all(client.clone());

    for attempt in 1..=attempts {
        match csrs.get_opt(name).await {
            Ok(Some(csr)) => {
                if let Some(reason) = rejection(&csr) {
                    return Err(CertSetupError::CsrDenied {
                        name: name.to_string(),
                        reason,
                    });
                }
                if let Some(certificate) = signed_certificate(&csr) {
                    info!("CSR {} signed after {} attempt(s)", name, attempt);
                    return Ok(certificate);
                }
                debug!("CSR {} not signed yet (attempt {}/{})", name, attempt, attempts);
            }
            Ok(None) => warn!("CSR {} not found (attempt {}/{})", name, attempt, attempts),
            Err(e) => warn!("Error reading CSR {}: {} (attempt {}/{})", name, e, attempt, attempts),
        }

        if attempt < attempts {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(CertSetupError::Cancelled(name.to_string())),
                _ = sleep(interval) => {}
            }
        }
    }

    Err(CertSetupError::CsrNotSigned {
        name: name.to_string(),
        attempts,
    })
}

/// The issued certificate, if the signer has attached a non-empty one
fn signed_certificate(csr: &CertificateSigningRequest) -> Option<Vec<u8>> {
    csr.status
        .as_ref()
        .and_then(|s| s.certificate.as_ref())
        .filter(|c| !c.0.is_empty())
        .map(|c| c.0.clone())
}

/// Reason from a Denied or Failed condition, if the CSR will never be signed
fn rejection(csr: &CertificateSigningRequest) -> Option<String> {
    csr.status
        .as_ref()?
        .conditions
        .as_ref()?
        .iter()
        .find(|c| (c.type_ == "Denied" || c.type_ == "Failed") && c.status == "True")
        .map(|c| {
            format!(
                "{}: {}",
                c.type_,
                c.message.as_deref().or(c.reason.as_deref()).unwrap_or("no reason given")
            )
        })
}
