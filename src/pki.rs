// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Private key and certificate request generation

use crate::constants::csr::SUBJECT_ORGANIZATION;
use crate::error::{CertSetupError, Result};
use crate::identity::ServiceIdentity;
use clap::ValueEnum;
use rcgen::{CertificateParams, DistinguishedName, DnType, DnValue, KeyPair};
use tracing::{debug, instrument};

/// Algorithm of the generated private key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum KeyAlgorithm {
    /// RSA 2048 with SHA-256 signatures
    #[default]
    Rsa2048,
    /// ECDSA on P-256 with SHA-256 signatures
    EcdsaP256,
}

impl KeyAlgorithm {
    fn generate(self) -> Result<KeyPair> {
        let key_pair = match self {
            KeyAlgorithm::Rsa2048 => KeyPair::generate_for(&rcgen::PKCS_RSA_SHA256)?,
            KeyAlgorithm::EcdsaP256 => KeyPair::generate_for(&rcgen::PKCS_ECDSA_P256_SHA256)?,
        };
        Ok(key_pair)
    }
}

/// A private key and the PKCS#10 request signed with it, both PEM encoded
#[derive(Debug, Clone)]
pub struct KeyAndRequest {
    pub key_pem: String,
    pub csr_pem: String,
}

/// Generate a key pair and a certificate request covering the service DNS names
#[instrument(skip(identity), fields(csr = %identity.csr_name()))]
pub fn generate_key_and_request(
    identity: &ServiceIdentity,
    algorithm: KeyAlgorithm,
) -> Result<KeyAndRequest> {
    let key_pair = algorithm.generate()?;

    let mut params = CertificateParams::new(identity.dns_names())?;
    let mut dn = DistinguishedName::new();
    dn.push(
        DnType::CommonName,
        DnValue::Utf8String(identity.common_name()),
    );
    dn.push(
        DnType::OrganizationName,
        DnValue::Utf8String(SUBJECT_ORGANIZATION.to_string()),
    );
    params.distinguished_name = dn;

    let csr_pem = params.serialize_request(&key_pair)?.pem()?;
    debug!("Generated {:?} key and certificate request", algorithm);

    Ok(KeyAndRequest {
        key_pem: key_pair.serialize_pem(),
        csr_pem,
    })
}

/// Check that the bytes returned by the signer hold at least one PEM certificate
pub fn validate_certificate_pem(data: &[u8]) -> Result<()> {
    let blocks = pem::parse_many(data)
        .map_err(|e| CertSetupError::InvalidCertificate(format!("not valid PEM: {}", e)))?;

    if blocks.iter().any(|b| b.tag() == "CERTIFICATE") {
        Ok(())
    } else {
        Err(CertSetupError::InvalidCertificate(
            "no CERTIFICATE block found".to_string(),
        ))
    }
}
