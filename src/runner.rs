use crate::config::Config;
use crate::environment;
use crate::grouper::group;
use crate::input::read_input_file;
use crate::report::Report;
use crate::resolver::ReleaseResolver;
use anyhow::Result;
use std::path::Path;
use tracing::info;

pub struct ReleaseReporter {
    config: Config,
    token: Option<String>,
    show_progress: bool,
}

impl ReleaseReporter {
    pub fn new(config: Config, token: Option<String>) -> Self {
        Self {
            config,
            token,
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Builds the report for `environment` from the rows in `data_file`.
    ///
    /// The environment and the credential are both checked before the data
    /// file is read or any lookup is made.
    pub async fn run(&self, environment: &str, data_file: &Path) -> Result<Report> {
        let environment = environment::validate(environment)?;
        let mut resolver = ReleaseResolver::from_config(&self.config.github, self.token.clone())?
            .with_progress(self.show_progress);

        let entries = read_input_file(data_file)?;
        let mapping = group(entries);
        info!(servers = mapping.len(), %environment, "grouped input rows");

        let mapping = resolver.resolve(mapping).await;
        let report = Report::new(&mapping, environment);
        info!(
            releases = report.releases.len(),
            lookups = resolver.lookups_performed(),
            "report ready"
        );
        Ok(report)
    }
}
