// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::{csr, polling};
use crate::pki::KeyAlgorithm;
use anyhow::{anyhow, bail, Context, Result};
use clap::ValueEnum;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Provisioning configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Signer requested on the CertificateSigningRequest
    pub signer_name: String,
    pub key_algorithm: KeyAlgorithm,
    /// Delay between CSR polls
    pub poll_interval: Duration,
    /// Deadline for a submitted CSR to become retrievable
    pub csr_timeout: Duration,
    /// Number of checks for a signed certificate after approval
    pub sign_attempts: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            signer_name: csr::DEFAULT_SIGNER_NAME.to_string(),
            key_algorithm: KeyAlgorithm::default(),
            poll_interval: Duration::from_secs(polling::INTERVAL_SECS),
            csr_timeout: Duration::from_secs(polling::APPEAR_TIMEOUT_SECS),
            sign_attempts: polling::SIGN_ATTEMPTS,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self> {
        let defaults = Config::default();

        let signer_name = env::var("CERT_SIGNER_NAME").unwrap_or(defaults.signer_name);
        let key_algorithm = match env::var("CERT_KEY_ALGORITHM") {
            Ok(value) => <KeyAlgorithm as ValueEnum>::from_str(&value, true)
                .map_err(|e| anyhow!(e))
                .context("CERT_KEY_ALGORITHM is not a supported key algorithm")?,
            Err(_) => defaults.key_algorithm,
        };
        let poll_interval = env_parse::<u64>("CSR_POLL_INTERVAL_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.poll_interval);
        let csr_timeout = env_parse::<u64>("CSR_TIMEOUT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.csr_timeout);
        let sign_attempts =
            env_parse::<u32>("CSR_SIGN_ATTEMPTS")?.unwrap_or(defaults.sign_attempts);

        let config = Config {
            signer_name,
            key_algorithm,
            poll_interval,
            csr_timeout,
            sign_attempts,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make the CSR polling give up before polling
    pub fn validate(&self) -> Result<()> {
        if self.sign_attempts == 0 {
            bail!("CSR_SIGN_ATTEMPTS must be at least 1");
        }
        if self.csr_timeout.is_zero() {
            bail!("CSR timeout must be at least 1 second");
        }
        Ok(())
    }
}

fn env_parse<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map(Some)
            .with_context(|| format!("{} must be a non-negative integer, got '{}'", name, value)),
        Err(_) => Ok(None),
    }
}
