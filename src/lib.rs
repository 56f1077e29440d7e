//! Apache Downloader Library
//!
//! Downloads a release artifact from the Apache Software Foundation's
//! distribution network and verifies it against the SHA-512 digest published
//! by the authoritative host, falling back to the archive for retired releases.
//!
//! # Architecture
//!
//! - [`download`] - site resolution, digest lookup and the verified streaming fetcher
//!
//! The `apache-dl` binary adds configuration, logging and a progress bar on top.

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod download;
mod user_agent;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use download::{
    ArtifactPath, Destination, DownloadError, DownloadObserver, DownloadReport, Fetcher,
    FetcherOptions, HttpClient, Site, SiteHosts, TracingObserver, download_and_verify,
};
