use clap::Parser;
use std::{error::Error, io, path::PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use typespeed::{
    config::{ConfigStore, FileConfigStore},
    prompt::REFERENCE_TEXT,
    recorder::CsvResultLog,
    runtime::{SessionRunner, SystemClock},
};

/// typing speed test: type one paragraph, get wpm, accuracy and a rating
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Shows a fixed paragraph, times how long it takes you to retype it, rates your speed and accuracy, and appends the result to a csv log."
)]
pub struct Cli {
    /// csv file results are appended to (overrides the config file)
    #[clap(short = 'r', long)]
    results: Option<PathBuf>,

    /// config file to read preferences from
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// remember the effective results path in the config file
    #[clap(long)]
    save_config: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let store = match &cli.config {
        Some(path) => FileConfigStore::with_path(path),
        None => FileConfigStore::new(),
    };
    let mut config = store.load();
    if let Some(results) = cli.results {
        config.results_path = results;
    }
    tracing::debug!(
        config = %store.path().display(),
        results = %config.results_path.display(),
        "resolved settings"
    );

    if cli.save_config {
        if let Err(e) = store.save(&config) {
            tracing::warn!(path = %store.path().display(), error = %e, "failed to save config");
            eprintln!("Could not save config to {}: {}", store.path().display(), e);
        }
    }

    let runner = SessionRunner::new(SystemClock, CsvResultLog::new(&config.results_path));

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout().lock();
    let mut err = io::stderr();

    runner.run(REFERENCE_TEXT, &mut input, &mut out, &mut err)?;

    Ok(())
}
