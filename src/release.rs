// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Lookup and download of kustomize release archives

use crate::constants::release::{ASSET_PREFIX, ASSET_SUFFIX, USER_AGENT};
use crate::error::{CertSetupError, Result};
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// A release entry from the GitHub releases API
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    #[serde(default)]
    pub tag_name: String,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseAsset {
    pub browser_download_url: String,
}

/// How the newest archive is chosen among the matching assets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectionStrategy {
    /// Compare parsed `major.minor.patch` numbers
    #[default]
    Semantic,
    /// Compare download URLs as plain strings, so `v1.9.0` sorts after `v1.10.0`
    Lexicographic,
}

/// A `major.minor.patch` release number
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReleaseVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl FromStr for ReleaseVersion {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.strip_prefix('v').unwrap_or(s);
        let parts: Vec<&str> = trimmed.split('.').collect();
        if parts.len() != 3 {
            return Err(format!("expected major.minor.patch, got '{}'", s));
        }

        let number = |p: &str| {
            p.parse::<u64>()
                .map_err(|_| format!("version parts must be numbers, got '{}'", s))
        };
        Ok(ReleaseVersion {
            major: number(parts[0])?,
            minor: number(parts[1])?,
            patch: number(parts[2])?,
        })
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// A downloadable archive for the wanted platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub url: Url,
    pub file_name: String,
    /// Version text taken from the file name, without the leading `v`
    pub version: String,
}

/// Collect every `kustomize_v<version>_<platform>.tar.gz` asset
pub fn matching_assets(releases: &[Release], platform: &str) -> Vec<Candidate> {
    let suffix = format!("_{}{}", platform, ASSET_SUFFIX);

    releases
        .iter()
        .flat_map(|r| r.assets.iter())
        .filter_map(|asset| {
            let url = Url::parse(&asset.browser_download_url).ok()?;
            let file_name = url.path_segments()?.last()?.to_string();
            let version = file_name
                .strip_prefix(ASSET_PREFIX)?
                .strip_suffix(&suffix)?
                .to_string();
            if version.is_empty() {
                return None;
            }
            Some(Candidate {
                url,
                file_name,
                version,
            })
        })
        .collect()
}

/// Pick the newest candidate according to `strategy`
pub fn select_latest(candidates: Vec<Candidate>, strategy: SelectionStrategy) -> Option<Candidate> {
    match strategy {
        SelectionStrategy::Lexicographic => candidates
            .into_iter()
            .max_by(|a, b| a.url.as_str().cmp(b.url.as_str())),
        SelectionStrategy::Semantic => candidates
            .into_iter()
            .filter_map(|c| match c.version.parse::<ReleaseVersion>() {
                Ok(v) => Some((v, c)),
                Err(e) => {
                    warn!("Skipping {}: {}", c.file_name, e);
                    None
                }
            })
            .max_by_key(|(v, _)| *v)
            .map(|(_, c)| c),
    }
}

#[derive(Debug, Clone)]
pub struct DownloadOptions {
    pub releases_url: Url,
    pub platform: String,
    pub output_dir: PathBuf,
    pub strategy: SelectionStrategy,
    pub token: Option<String>,
}

pub struct ReleaseDownloader {
    http: reqwest::Client,
    options: DownloadOptions,
}

impl ReleaseDownloader {
    pub fn new(options: DownloadOptions) -> Result<Self> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { http, options })
    }

    /// Download the newest matching archive and return where it was written
    pub async fn run(&self) -> Result<PathBuf> {
        let releases = self.fetch_releases().await?;
        let candidates = matching_assets(&releases, &self.options.platform);
        debug!(
            "{} release(s) listed, {} matching asset(s)",
            releases.len(),
            candidates.len()
        );

        let pattern = format!(
            "{}<version>_{}{} at {}",
            ASSET_PREFIX, self.options.platform, ASSET_SUFFIX, self.options.releases_url
        );
        let matched = candidates.len();

        let latest = select_latest(candidates, self.options.strategy).ok_or_else(|| {
            if matched == 0 {
                CertSetupError::NoMatchingAsset(pattern.clone())
            } else {
                CertSetupError::NoUsableVersion(format!(
                    "{} asset(s) match {} but none carries a major.minor.patch version",
                    matched, pattern
                ))
            }
        })?;
        info!("Latest release is {} ({:?} order)", latest.version, self.options.strategy);

        self.download(&latest).await
    }

    #[instrument(skip(self), fields(url = %self.options.releases_url))]
    async fn fetch_releases(&self) -> Result<Vec<Release>> {
        let mut request = self.http.get(self.options.releases_url.clone());
        if let Some(token) = &self.options.token {
            request = request.bearer_auth(token);
        }

        let releases = request
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<Release>>()
            .await?;
        Ok(releases)
    }

    #[instrument(skip(self, candidate), fields(url = %candidate.url))]
    async fn download(&self, candidate: &Candidate) -> Result<PathBuf> {
        let bytes = self
            .http
            .get(candidate.url.clone())
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        let target = self.options.output_dir.join(&candidate.file_name);
        tokio::fs::write(&target, &bytes).await?;

        info!("Wrote {} ({} bytes)", target.display(), bytes.len());
        Ok(target)
    }
}
