use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

/// Metric key carrying the deployed commit.
pub const SHA_KEY: &str = "sha";
/// Metric key carrying the unix time of the last run.
pub const TIME_KEY: &str = "time";

/// One row of the data file: a server name and a `key:value` metric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub server_name: String,
    pub metric: String,
}

impl RawEntry {
    pub fn new(server_name: impl Into<String>, metric: impl Into<String>) -> Self {
        Self {
            server_name: server_name.into(),
            metric: metric.into(),
        }
    }
}

/// Release resolved for a commit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Release {
    Tag(String),
    /// The remote answered but has no tag for the commit.
    Untagged,
}

impl fmt::Display for Release {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Release::Tag(name) => f.write_str(name),
            Release::Untagged => f.write_str("untagged"),
        }
    }
}

impl From<Option<String>> for Release {
    fn from(tag: Option<String>) -> Self {
        match tag {
            Some(name) => Release::Tag(name),
            None => Release::Untagged,
        }
    }
}

/// Everything known about a single server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerRecord {
    pub metrics: BTreeMap<String, String>,
    pub release: Option<Release>,
}

impl ServerRecord {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.metrics.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metrics.insert(key.into(), value.into());
    }

    pub fn sha(&self) -> Option<&str> {
        self.get(SHA_KEY)
    }

    pub fn time(&self) -> Option<&str> {
        self.get(TIME_KEY)
    }
}

/// Server name to record, ordered by name.
pub type FleetMapping = BTreeMap<String, ServerRecord>;

/// Body of the git tag endpoint. Only the tag name is of interest.
#[derive(Debug, Deserialize)]
pub struct TagResponse {
    #[serde(default)]
    pub tag: Option<String>,
}
