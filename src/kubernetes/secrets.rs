// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Secret lookup and TLS secret materialization

use crate::constants::{secret, FIELD_MANAGER};
use crate::error::Result;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::ByteString;
use kube::{
    api::{ObjectMeta, Patch, PatchParams},
    Api, Client,
};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// Check whether a secret with the given name exists in the namespace
#[instrument(skip(client))]
pub async fn secret_exists(client: &Client, namespace: &str, name: &str) -> Result<bool> {
    let secrets: Api<Secret> = Api::namespaced(client.clone(), namespace);
    let found = secrets.get_opt(name).await?.is_some();
    debug!("Secret {}/{} exists: {}", namespace, name, found);
    Ok(found)
}

/// Create or update the secret holding the TLS key and certificate
#[instrument(skip(client, key_pem, cert_pem))]
pub async fn apply_tls_secret(
    client: &Client,
    namespace: &str,
    name: &str,
    key_pem: &str,
    cert_pem: &[u8],
) -> Result<()> {
    let secrets: Api<Secret> = Api::namespaced(client.clone(), namespace);
    let tls_secret = build_tls_secret(namespace, name, key_pem, cert_pem);

    let pp = PatchParams::apply(FIELD_MANAGER).force();
    secrets.patch(name, &pp, &Patch::Apply(&tls_secret)).await?;

    info!("Applied secret {}/{}", namespace, name);
    Ok(())
}

/// Build a generic secret with the `tls.key` and `tls.crt` entries
fn build_tls_secret(namespace: &str, name: &str, key_pem: &str, cert_pem: &[u8]) -> Secret {
    let data = BTreeMap::from([
        (
            secret::TLS_KEY.to_string(),
            ByteString(key_pem.as_bytes().to_vec()),
        ),
        (secret::TLS_CERT.to_string(), ByteString(cert_pem.to_vec())),
    ]);

    Secret {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        data: Some(data),
        type_: Some("Opaque".to_string()),
        ..Default::default()
    }
}
