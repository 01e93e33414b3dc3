//! Resolves deployed commit SHAs to release tags.
//!
//! Lookups go through [`TagLookup`]; the GitHub implementation hits the git
//! tags endpoint. [`ReleaseResolver`] owns a [`TagCache`] for the whole run so
//! each distinct SHA reaches the remote at most once, no matter how many
//! servers share it.

use crate::config::GithubConfig;
use crate::error::{LookupError, ReportError};
use crate::types::{FleetMapping, Release, TagResponse};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::Url;
use std::collections::{BTreeSet, HashMap};
use std::time::Duration;
use tracing::{debug, info, warn};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagLookup: Send + Sync {
    /// Tag name attached to `sha`, or `None` if the commit carries no tag.
    async fn lookup_tag(&self, sha: &str) -> Result<Option<String>, LookupError>;
}

pub struct GithubTagClient {
    client: reqwest::Client,
    tags_url: Url,
    token: String,
}

impl GithubTagClient {
    /// Fails with [`ReportError::MissingCredential`] when no usable token is given.
    pub fn new(config: &GithubConfig, token: Option<String>) -> Result<Self, ReportError> {
        let token = token
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| ReportError::MissingCredential {
                var: config.token_env.clone(),
            })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ReportError::Client)?;

        let raw_url = format!(
            "{}/repos/{}/git/tags",
            config.api_url.trim_end_matches('/'),
            config.repository
        );
        let tags_url = Url::parse(&raw_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or(ReportError::InvalidApiUrl(raw_url))?;

        Ok(Self {
            client,
            tags_url,
            token,
        })
    }

    /// URL of the tag object for `sha`, with the SHA as a single path segment.
    fn tag_url(&self, sha: &str) -> Result<Url, LookupError> {
        if !is_commit_sha(sha) {
            return Err(LookupError::InvalidSha(sha.to_string()));
        }
        let mut url = self.tags_url.clone();
        url.path_segments_mut()
            .map_err(|_| LookupError::InvalidSha(sha.to_string()))?
            .pop_if_empty()
            .push(sha);
        Ok(url)
    }
}

/// Hex object id, SHA-1 or SHA-256 sized at most.
fn is_commit_sha(sha: &str) -> bool {
    !sha.is_empty() && sha.len() <= 64 && sha.chars().all(|c| c.is_ascii_hexdigit())
}

#[async_trait]
impl TagLookup for GithubTagClient {
    async fn lookup_tag(&self, sha: &str) -> Result<Option<String>, LookupError> {
        let url = self.tag_url(sha)?;
        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, format!("token {}", self.token))
            .header(ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .map_err(LookupError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status));
        }

        let body: TagResponse = response.json().await.map_err(|e| {
            if e.is_decode() {
                LookupError::Payload(e.to_string())
            } else {
                LookupError::Transport(e)
            }
        })?;
        Ok(body.tag)
    }
}

/// Outcome of one lookup, kept for the rest of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedTag {
    Resolved(Release),
    Failed,
}

#[derive(Debug, Default)]
pub struct TagCache {
    entries: HashMap<String, CachedTag>,
}

impl TagCache {
    pub fn get(&self, sha: &str) -> Option<&CachedTag> {
        self.entries.get(sha)
    }

    pub fn insert(&mut self, sha: String, outcome: CachedTag) {
        self.entries.insert(sha, outcome);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub struct ReleaseResolver<L> {
    lookup: L,
    cache: TagCache,
    concurrency: usize,
    show_progress: bool,
    lookups: usize,
}

impl ReleaseResolver<GithubTagClient> {
    pub fn from_config(config: &GithubConfig, token: Option<String>) -> Result<Self, ReportError> {
        let client = GithubTagClient::new(config, token)?;
        Ok(Self::new(client).with_concurrency(config.concurrency))
    }
}

impl<L: TagLookup> ReleaseResolver<L> {
    pub fn new(lookup: L) -> Self {
        Self {
            lookup,
            cache: TagCache::default(),
            concurrency: 4,
            show_progress: false,
            lookups: 0,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn cache(&self) -> &TagCache {
        &self.cache
    }

    /// Number of lookups attempted so far.
    pub fn lookups_performed(&self) -> usize {
        self.lookups
    }

    /// Attaches a release to every record that has a `sha`.
    ///
    /// A failed lookup leaves `release` unset on the affected records and the
    /// remaining SHAs are still resolved.
    pub async fn resolve(&mut self, mut mapping: FleetMapping) -> FleetMapping {
        let pending: BTreeSet<String> = mapping
            .values()
            .filter_map(|record| record.sha())
            .filter(|sha| self.cache.get(sha).is_none())
            .map(str::to_string)
            .collect();

        let progress = self.progress_bar(pending.len());
        let lookup = &self.lookup;
        let outcomes: Vec<(String, CachedTag)> = stream::iter(pending)
            .map(|sha| {
                let progress = progress.clone();
                async move {
                    let outcome = match lookup.lookup_tag(&sha).await {
                        Ok(tag) => CachedTag::Resolved(Release::from(tag)),
                        Err(e) => {
                            warn!(%sha, error = %e, "release lookup failed");
                            CachedTag::Failed
                        }
                    };
                    progress.inc(1);
                    (sha, outcome)
                }
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;
        progress.finish_and_clear();

        self.lookups += outcomes.len();
        info!(
            lookups = outcomes.len(),
            cached = self.cache.len(),
            servers = mapping.len(),
            "resolved releases"
        );
        for (sha, outcome) in outcomes {
            self.cache.insert(sha, outcome);
        }

        for (server, record) in mapping.iter_mut() {
            let Some(sha) = record.sha() else {
                continue;
            };
            match self.cache.get(sha) {
                Some(CachedTag::Resolved(release)) => record.release = Some(release.clone()),
                _ => debug!(%server, "release left unresolved"),
            }
        }
        mapping
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.show_progress || len == 0 {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(len as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} lookups ({eta})")
        {
            bar.set_style(style.progress_chars("#>-"));
        }
        bar
    }
}
