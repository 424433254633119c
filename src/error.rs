// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CertSetupError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to load kubeconfig: {0}")]
    KubeconfigError(String),

    #[error("Namespace creation failed: {0}")]
    NamespaceError(String),

    #[error("Key generation failed: {0}")]
    KeyGenerationError(#[from] rcgen::Error),

    #[error("CSR {name} did not appear within {waited:?}")]
    CsrTimeout { name: String, waited: Duration },

    #[error("after approving csr {name}, the signed certificate did not appear on the resource. Giving up after {attempts} attempts.")]
    CsrNotSigned { name: String, attempts: u32 },

    #[error("CSR {name} was not signed: {reason}")]
    CsrDenied { name: String, reason: String },

    #[error("Operation cancelled while waiting for CSR {0}")]
    Cancelled(String),

    #[error("Signed certificate is invalid: {0}")]
    InvalidCertificate(String),

    #[error("Release request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("No release asset matches {0}")]
    NoMatchingAsset(String),

    #[error("No release asset has a usable version: {0}")]
    NoUsableVersion(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CertSetupError>;
