// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Cluster client creation and kubeconfig utilities

use crate::error::{CertSetupError, Result};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config as KConfig};
use std::path::Path;
use tracing::{debug, instrument};

/// Create a client from an explicit kubeconfig file, or infer one from the environment
#[instrument]
pub async fn create_client(kubeconfig: Option<&Path>, context: Option<&str>) -> Result<Client> {
    let options = KubeConfigOptions {
        context: context.map(str::to_string),
        ..Default::default()
    };

    let config = match kubeconfig {
        Some(path) => {
            debug!("Loading kubeconfig from {}", path.display());
            let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
                CertSetupError::KubeconfigError(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                ))
            })?;
            config_from_kubeconfig(&contents, &options).await?
        }
        None if context.is_some() => KConfig::from_kubeconfig(&options)
            .await
            .map_err(|e| CertSetupError::KubeconfigError(format!("Failed to load config: {}", e)))?,
        None => KConfig::infer()
            .await
            .map_err(|e| CertSetupError::KubeconfigError(format!("Failed to infer config: {}", e)))?,
    };

    Client::try_from(config)
        .map_err(|e| CertSetupError::KubeconfigError(format!("Failed to create client: {}", e)))
}

/// Build a client config from a kubeconfig document
async fn config_from_kubeconfig(kubeconfig: &str, options: &KubeConfigOptions) -> Result<KConfig> {
    let kubeconfig_parsed: Kubeconfig = serde_yaml::from_str(kubeconfig).map_err(|e| {
        CertSetupError::KubeconfigError(format!("Failed to parse kubeconfig: {}", e))
    })?;

    KConfig::from_custom_kubeconfig(kubeconfig_parsed, options)
        .await
        .map_err(|e| CertSetupError::KubeconfigError(format!("Failed to create config: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const KUBECONFIG: &str = r#"
apiVersion: v1
kind: Config
current-context: dev
clusters:
- name: dev
  cluster:
    server: https://dev.example.com:6443
    insecure-skip-tls-verify: true
- name: prod
  cluster:
    server: https://prod.example.com:6443
    insecure-skip-tls-verify: true
users:
- name: admin
  user:
    token: abc123
contexts:
- name: dev
  context:
    cluster: dev
    user: admin
- name: prod
  context:
    cluster: prod
    user: admin
"#;

    #[tokio::test]
    async fn test_config_uses_current_context() {
        let config = config_from_kubeconfig(KUBECONFIG, &KubeConfigOptions::default())
            .await
            .unwrap();
        assert_eq!(config.cluster_url.host(), Some("dev.example.com"));
    }

    #[tokio::test]
    async fn test_config_honours_context_override() {
        let options = KubeConfigOptions {
            context: Some("prod".to_string()),
            ..Default::default()
        };
        let config = config_from_kubeconfig(KUBECONFIG, &options).await.unwrap();
        assert_eq!(config.cluster_url.host(), Some("prod.example.com"));
    }

    #[tokio::test]
    async fn test_invalid_kubeconfig_is_environment_error() {
        let err = config_from_kubeconfig("clusters: [", &KubeConfigOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CertSetupError::KubeconfigError(_)));
    }

    #[tokio::test]
    async fn test_missing_kubeconfig_file() {
        let err = create_client(Some(Path::new("/nonexistent/kubeconfig")), None)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, CertSetupError::KubeconfigError(ref m) if m.contains("/nonexistent/kubeconfig")));
    }
}
