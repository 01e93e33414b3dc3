use crate::environment::Environment;
use crate::types::{FleetMapping, ServerRecord};
use chrono::{DateTime, Utc};
use chrono_humanize::HumanTime;
use clap::ValueEnum;
use serde::Serialize;
use std::collections::BTreeSet;
use std::io::{self, Write};

pub const UNKNOWN_LAST_RUN: &str = "could not determine, please try again";
pub const UNRESOLVED_RELEASE: &str = "unresolved";

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerDetail {
    pub qualified_name: String,
    pub release: String,
    pub last_run: String,
    pub last_run_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub environment: Environment,
    pub releases: BTreeSet<String>,
    pub servers: Vec<ServerDetail>,
}

/// Distinct releases across the fleet.
pub fn render_summary(mapping: &FleetMapping, _environment: Environment) -> BTreeSet<String> {
    mapping.values().map(release_label).collect()
}

pub fn render_detail(mapping: &FleetMapping, environment: Environment) -> Vec<ServerDetail> {
    mapping
        .iter()
        .map(|(server, record)| {
            let last_run_at = last_run(record);
            ServerDetail {
                qualified_name: format!("{}.{}", server, environment),
                release: release_label(record),
                last_run: last_run_at
                    .map(|at| at.format("%a %b %e %H:%M:%S %Y").to_string())
                    .unwrap_or_else(|| UNKNOWN_LAST_RUN.to_string()),
                last_run_at,
            }
        })
        .collect()
}

fn release_label(record: &ServerRecord) -> String {
    record
        .release
        .as_ref()
        .map(|release| release.to_string())
        .unwrap_or_else(|| UNRESOLVED_RELEASE.to_string())
}

fn last_run(record: &ServerRecord) -> Option<DateTime<Utc>> {
    let secs = record.time()?.trim().parse::<i64>().ok().filter(|secs| *secs >= 0)?;
    DateTime::<Utc>::from_timestamp(secs, 0)
}

impl Report {
    pub fn new(mapping: &FleetMapping, environment: Environment) -> Self {
        Self {
            environment,
            releases: render_summary(mapping, environment),
            servers: render_detail(mapping, environment),
        }
    }

    pub fn write<W: Write>(&self, out: &mut W, format: OutputFormat) -> io::Result<()> {
        match format {
            OutputFormat::Text => self.write_text(out),
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *out, self)?;
                writeln!(out)
            }
        }
    }

    pub fn write_text<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "\n==> The following releases are live in {}\n", self.environment)?;
        for release in &self.releases {
            writeln!(out, "{}", release)?;
        }

        writeln!(out, "\n==> Release details per server\n")?;
        for server in &self.servers {
            writeln!(out, "{}", server.qualified_name)?;
            writeln!(out, "    Current release: {}", server.release)?;
            write!(out, "    Last run: {}", server.last_run)?;
            if let Some(at) = server.last_run_at {
                let duration = at.signed_duration_since(Utc::now());
                write!(out, " ({})", HumanTime::from(duration))?;
            }
            writeln!(out)?;
        }
        Ok(())
    }
}
