use std::process::ExitCode;

use clap::Parser;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

use cedict_build::{Cli, Config, HttpFetcher, run};

fn main() -> ExitCode {
    init_tracing();

    let config = Cli::parse().into_config();
    log_config(&config);

    let result = HttpFetcher::new()
        .map_err(anyhow::Error::from)
        .and_then(|fetcher| run(&config, &fetcher));
    match result {
        Ok(summary) => {
            info!(
                "wrote {} entries ({:.2} MB) to {}",
                summary.records,
                summary.megabytes(),
                summary.output.display()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn log_config(config: &Config) {
    info!("dictionary source: {}", config.source);
    info!("output: {}", config.output.display());
    if config.frequency_pages.is_empty() {
        info!("frequency lists disabled");
    } else {
        info!("frequency pages: {}", config.frequency_pages.len());
    }
    if let Some(limit) = config.max_entries {
        info!("entry limit: {limit}");
    }
    if let Some(span) = config.rank_span {
        info!("rank span: {span}");
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let max_level = env_filter
        .max_level_hint()
        .and_then(|hint| hint.into_level())
        .unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true)
        .with_max_level(max_level)
        .with_writer(std::io::stderr)
        .init();
}
