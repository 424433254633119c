// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// The field manager name used for server-side apply
pub const FIELD_MANAGER: &str = "webhook-cert-setup";

/// CertificateSigningRequest settings
pub mod csr {
    /// Signer used when none is configured
    pub const DEFAULT_SIGNER_NAME: &str = "kubernetes.io/kubelet-serving";
    /// Group recorded on the submitted request
    pub const REQUEST_GROUP: &str = "system:authenticated";
    /// Subject organisation expected by the kubelet-serving signer
    pub const SUBJECT_ORGANIZATION: &str = "system:nodes";
    /// Key usages requested for a serving certificate
    pub const USAGES: [&str; 3] = ["digital signature", "key encipherment", "server auth"];
    /// Reason recorded on the Approved condition
    pub const APPROVAL_REASON: &str = "WebhookCertSetupApprove";
}

/// Secret data keys
pub mod secret {
    pub const TLS_KEY: &str = "tls.key";
    pub const TLS_CERT: &str = "tls.crt";
}

/// CSR polling configuration
pub mod polling {
    /// Delay between polls in seconds
    pub const INTERVAL_SECS: u64 = 1;
    /// Deadline in seconds for the CSR to become retrievable
    pub const APPEAR_TIMEOUT_SECS: u64 = 60;
    /// Number of checks for a signed certificate before giving up
    pub const SIGN_ATTEMPTS: u32 = 10;
}

/// Release download configuration
pub mod release {
    pub const DEFAULT_RELEASES_URL: &str =
        "https://api.github.com/repos/kubernetes-sigs/kustomize/releases";
    pub const DEFAULT_PLATFORM: &str = "linux_amd64";
    pub const ASSET_PREFIX: &str = "kustomize_v";
    pub const ASSET_SUFFIX: &str = ".tar.gz";
    pub const USER_AGENT: &str = concat!("install-kustomize/", env!("CARGO_PKG_VERSION"));
}
