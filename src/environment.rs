use crate::error::ReportError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Deployment tier a fleet belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Training,
    Integration,
    Staging,
    Production,
}

impl Environment {
    pub const ALL: [Environment; 4] = [
        Environment::Training,
        Environment::Integration,
        Environment::Staging,
        Environment::Production,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Training => "training",
            Environment::Integration => "integration",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ReportError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Environment::ALL
            .into_iter()
            .find(|env| env.as_str() == name)
            .ok_or_else(|| ReportError::InvalidEnvironment {
                name: name.to_string(),
                accepted: Environment::ALL.iter().map(|env| env.to_string()).collect(),
            })
    }
}

/// Checks that `name` is one of the known environments.
pub fn validate(name: &str) -> Result<Environment, ReportError> {
    name.parse()
}
