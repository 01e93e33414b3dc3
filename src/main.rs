use fleet_releases::{config::Config, report::OutputFormat, runner::ReleaseReporter};
use clap::Parser;
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(name = "show-releases")]
#[command(about = "Show which releases are live on each server of an environment")]
struct Cli {
    /// One of training, integration, staging, production
    environment: String,

    /// File of `server,key:value` rows
    data_file: PathBuf,

    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    /// Hide the lookup progress bar
    #[arg(short, long)]
    quiet: bool,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let token = config.github.token_from_env();

    let report = ReleaseReporter::new(config, token)
        .with_progress(!cli.quiet)
        .run(&cli.environment, &cli.data_file)
        .await?;

    let mut stdout = std::io::stdout().lock();
    report.write(&mut stdout, cli.output)?;
    Ok(())
}
