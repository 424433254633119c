// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Names derived from the webhook service a certificate is issued for

use crate::error::{CertSetupError, Result};

/// The service, namespace and secret a certificate is provisioned for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceIdentity {
    service: String,
    namespace: String,
    secret: String,
}

impl ServiceIdentity {
    /// Build an identity, rejecting empty identifiers
    pub fn new(
        service: impl Into<String>,
        namespace: impl Into<String>,
        secret: impl Into<String>,
    ) -> Result<Self> {
        let identity = ServiceIdentity {
            service: service.into(),
            namespace: namespace.into(),
            secret: secret.into(),
        };

        for (flag, value) in [
            ("--service", &identity.service),
            ("--namespace", &identity.namespace),
            ("--secret", &identity.secret),
        ] {
            if value.trim().is_empty() {
                return Err(CertSetupError::InvalidArgument(format!(
                    "{} must not be empty",
                    flag
                )));
            }
        }

        Ok(identity)
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Name of the CertificateSigningRequest resource
    pub fn csr_name(&self) -> String {
        format!("{}.{}", self.service, self.namespace)
    }

    /// DNS names the certificate is valid for
    pub fn dns_names(&self) -> Vec<String> {
        vec![
            self.service.clone(),
            format!("{}.{}", self.service, self.namespace),
            format!("{}.{}.svc", self.service, self.namespace),
        ]
    }

    /// Subject common name in the form the kubelet-serving signer accepts
    pub fn common_name(&self) -> String {
        format!("system:node:{}.{}.svc", self.service, self.namespace)
    }
}
