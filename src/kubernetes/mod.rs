// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities for client creation, namespaces, secrets and CSRs.

pub mod client;
pub mod csr;
pub mod namespaces;
pub mod secrets;

pub use client::create_client;
pub use namespaces::ensure_namespace_exists;
pub use secrets::{apply_tls_secret, secret_exists};
