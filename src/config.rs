use serde::Deserialize;
use std::path::Path;
use anyhow::{bail, Context, Result};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub github: GithubConfig,
}

/// Where and how release tags are looked up.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GithubConfig {
    pub api_url: String,
    /// `owner/name` of the repository holding the release tags.
    pub repository: String,
    /// Environment variable holding the access token.
    pub token_env: String,
    pub timeout_secs: u64,
    /// Upper bound on lookups in flight at once.
    pub concurrency: usize,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            repository: "alphagov/govuk-puppet".to_string(),
            token_env: "GITHUB_ACCESS_TOKEN".to_string(),
            timeout_secs: 10,
            concurrency: 4,
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let valid_repo = matches!(
            self.github.repository.split_once('/'),
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/')
        );
        if !valid_repo {
            bail!("github.repository must look like owner/name, got '{}'", self.github.repository);
        }
        if self.github.concurrency == 0 {
            bail!("github.concurrency must be at least 1");
        }
        Ok(())
    }
}

impl GithubConfig {
    /// Reads the access token from the configured variable. Empty counts as unset.
    pub fn token_from_env(&self) -> Option<String> {
        std::env::var(&self.token_env)
            .ok()
            .filter(|token| !token.trim().is_empty())
    }
}
