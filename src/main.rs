use clap::Parser;
use cloudtape::config::{Config, DEFAULT_CONFIG_PATH};
use cloudtape::error::{ErrorKind, Result};
use cloudtape::{Pipeline, Report};
use exn::ResultExt;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Download every SoundCloud link mentioned in a YAML file and build a local
/// listening page for them.
#[derive(Parser, Debug)]
#[command(name = "cloudtape", version, about)]
struct Cli {
    /// YAML file with a `soundcloud_links` list.
    #[arg(long, visible_alias = "yaml", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "cloudtape=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(report) => {
            log_report(&report);
            ExitCode::SUCCESS
        },
        Err(e) => {
            tracing::error!("{e:?}");
            ExitCode::FAILURE
        },
    }
}

fn run(cli: &Cli) -> Result<Report> {
    let config = Config::load(&cli.config).or_raise(|| ErrorKind::Config)?;
    Pipeline::from_config(config)?.run()
}

fn log_report(report: &Report) {
    tracing::info!(
        links = report.links_found,
        resolved = report.links_resolved,
        fallbacks = report.resolution_fallbacks,
        failed = report.links_failed,
        tracks = report.tracks,
        duplicates = report.duplicates,
        covers = report.covers,
        archive = ?report.archive,
        archived = report.archived,
        missing = ?report.missing_from_archive,
        page = ?report.page,
        "Run complete"
    );
}
