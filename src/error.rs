use std::path::PathBuf;

/// Fatal errors. Any of these stops the run before output is printed.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Invalid environment '{name}'. It should be one of: {}", .accepted.join(", "))]
    InvalidEnvironment { name: String, accepted: Vec<String> },
    #[error("Please set {var} in order to continue")]
    MissingCredential { var: String },
    #[error("Failed to read input file {}: {source}", .path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("Invalid GitHub API URL: {0}")]
    InvalidApiUrl(String),
}

/// Failure of a single tag lookup. Recovered per SHA, never fatal.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("not a commit sha: '{0}'")]
    InvalidSha(String),
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed payload: {0}")]
    Payload(String),
}
