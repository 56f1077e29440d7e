//! CLI entry point for apache-dl.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use apache_downloader::download::constants::{
    CONNECT_TIMEOUT_SECS, DEFAULT_CHUNK_SIZE, READ_TIMEOUT_SECS,
};
use apache_downloader::{Destination, Fetcher, FetcherOptions, SiteHosts};
use clap::Parser;
use tracing::{debug, warn};

mod app_config;
mod cli;
mod progress;
mod terminal;

use app_config::{FileConfig, VerbositySetting, load_file_config};
use cli::Args;
use progress::ProgressObserver;
use terminal::{LogLevel, Terminal};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();
    let file_config = load_file_config(args.config.as_deref())?;

    let quiet = args.quiet
        || (args.verbose == 0 && file_config.verbosity == Some(VerbositySetting::Quiet));
    let term = Terminal::detect();
    let log_level = LogLevel::resolve(
        args.quiet,
        args.verbose,
        file_config.verbosity.map(VerbositySetting::log_level),
    );
    terminal::init_tracing(log_level, term.color(args.no_color));

    debug!(?args, "CLI arguments parsed");
    if let Some(verbosity) = file_config.verbosity {
        debug!(verbosity = verbosity.as_str(), "verbosity from config file");
    }

    let options = build_fetcher_options(&args, &file_config)?;
    let interrupt = Arc::new(AtomicBool::new(false));
    let fetcher = Fetcher::new(options)?.with_interrupt_flag(Arc::clone(&interrupt));
    spawn_interrupt_listener(interrupt);

    let observer = ProgressObserver::new(term.progress(quiet, args.no_progress));

    let result = if args.writes_to_stdout() {
        let mut stdout = tokio::io::stdout();
        fetcher
            .download_and_verify(&args.path, Destination::Writer(&mut stdout), &observer)
            .await
    } else {
        fetcher
            .download_and_verify(&args.path, Destination::from(args.output.clone()), &observer)
            .await
    };
    observer.clear();

    let report = result.with_context(|| format!("Failed to download '{}'", args.path))?;
    if let Some(path) = &report.path {
        debug!(path = %path.display(), chunks = report.chunks, "artifact written");
    }
    if !quiet {
        eprintln!("Done.");
    }
    Ok(())
}

/// Merges CLI flags over the config file over built-in defaults.
fn build_fetcher_options(args: &Args, file_config: &FileConfig) -> Result<FetcherOptions> {
    let chunk_size = match args.chunk_size {
        Some(size) => usize::try_from(size).context("chunk size does not fit in memory")?,
        None => file_config.chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE),
    };
    let connect_timeout = args
        .connect_timeout
        .or(file_config.connect_timeout_secs)
        .unwrap_or(CONNECT_TIMEOUT_SECS);
    let read_timeout = args
        .read_timeout
        .or(file_config.read_timeout_secs)
        .unwrap_or(READ_TIMEOUT_SECS);

    let mut hosts = SiteHosts::default();
    if let Some(url) = args.mirror_url.as_ref().or(file_config.mirror_url.as_ref()) {
        hosts = hosts
            .with_mirror_selection(url)
            .context("Invalid mirror-selection URL")?;
    }
    if let Some(url) = args.downloads_url.as_ref().or(file_config.downloads_url.as_ref()) {
        hosts = hosts.with_downloads(url).context("Invalid downloads URL")?;
    }
    if let Some(url) = args.archive_url.as_ref().or(file_config.archive_url.as_ref()) {
        hosts = hosts.with_archive(url).context("Invalid archive URL")?;
    }

    Ok(FetcherOptions {
        chunk_size,
        hosts,
        connect_timeout: Duration::from_secs(connect_timeout),
        read_timeout: Duration::from_secs(read_timeout),
    })
}

/// Raises `flag` on Ctrl-C; the fetcher stops at the next chunk boundary.
fn spawn_interrupt_listener(flag: Arc<AtomicBool>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, stopping after the current chunk");
            flag.store(true, Ordering::SeqCst);
        }
    });
}
