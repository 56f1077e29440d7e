//! Download lifecycle events.
//!
//! The fetcher never logs or draws progress itself; it reports to a
//! [`DownloadObserver`] supplied by the caller. Every method has an empty
//! default so implementations only handle what they render.

use std::path::Path;

use tracing::{debug, info, warn};
use url::Url;

use super::digest::ExpectedDigest;
use super::fetcher::DownloadReport;
use super::site::{ArtifactPath, Site};

/// Receives events from one verified download, in order.
pub trait DownloadObserver: Send + Sync {
    /// The destination was resolved; `target` is `None` for caller writers.
    fn download_started(&self, _artifact: &ArtifactPath, _target: Option<&Path>) {}

    /// The digest lookup on `from` returned 404; retrying on `to`.
    fn site_fallback(&self, _from: Site, _to: Site) {}

    /// The expected digest was obtained from `site`, which is now committed.
    fn digest_resolved(&self, _site: Site, _digest: &ExpectedDigest) {}

    /// The artifact response is open at `url` (after redirects).
    fn stream_opened(&self, _url: &Url) {}

    /// The response declared its length; `total_chunks` ticks will follow.
    fn progress_total(&self, _total_chunks: u64, _content_length: u64) {}

    /// The response has no declared length; progress is indeterminate.
    fn progress_indeterminate(&self) {}

    /// One chunk was written and hashed.
    fn chunk_completed(&self, _len: usize) {}

    /// The digest matched and the download is complete.
    fn download_finished(&self, _report: &DownloadReport) {}
}

/// Ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl DownloadObserver for NoopObserver {}

/// Forwards lifecycle events to `tracing`; chunk ticks are not logged.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl DownloadObserver for TracingObserver {
    fn download_started(&self, artifact: &ArtifactPath, target: Option<&Path>) {
        match target {
            Some(path) => info!(artifact = %artifact, destination = %path.display(), "Downloading Apache artifact"),
            None => info!(artifact = %artifact, "Downloading Apache artifact"),
        }
    }

    fn site_fallback(&self, from: Site, to: Site) {
        warn!(%from, %to, "digest not found; artifact may be retired, trying archive");
    }

    fn digest_resolved(&self, site: Site, digest: &ExpectedDigest) {
        debug!(%site, expected = %digest, "expected digest");
    }

    fn stream_opened(&self, url: &Url) {
        debug!(%url, "artifact stream opened");
    }

    fn progress_total(&self, total_chunks: u64, content_length: u64) {
        info!(bytes = content_length, chunks = total_chunks, "File size");
    }

    fn progress_indeterminate(&self) {
        debug!("server did not declare a content length");
    }

    fn download_finished(&self, report: &DownloadReport) {
        info!(
            site = %report.site,
            bytes = report.bytes,
            sha512 = %report.digest,
            "download verified"
        );
    }
}
