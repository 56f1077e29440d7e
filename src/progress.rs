//! Progress UI for a single download.

use std::path::Path;
use std::time::Duration;

use apache_downloader::download::{
    ArtifactPath, DownloadObserver, DownloadReport, ExpectedDigest, Site, TracingObserver,
};
use indicatif::{HumanBytes, ProgressBar, ProgressStyle};
use url::Url;

const BAR_TEMPLATE: &str = "{bar:40} {pos}/{len} chunks ({msg})";
const SPINNER_TEMPLATE: &str = "{spinner} {pos} chunks downloaded";

/// Draws one bar tick per chunk on stderr and forwards lifecycle events to
/// [`TracingObserver`], suspending the bar while a log line is written.
pub(crate) struct ProgressObserver {
    bar: ProgressBar,
    log: TracingObserver,
}

impl ProgressObserver {
    /// `visible = false` keeps the position counter but draws nothing.
    pub(crate) fn new(visible: bool) -> Self {
        let bar = if visible {
            ProgressBar::new(0)
        } else {
            ProgressBar::hidden()
        };
        Self {
            bar,
            log: TracingObserver,
        }
    }

    /// Removes the bar, e.g. after a failed download.
    pub(crate) fn clear(&self) {
        self.bar.finish_and_clear();
    }

    #[cfg(test)]
    fn position(&self) -> u64 {
        self.bar.position()
    }
}

impl DownloadObserver for ProgressObserver {
    fn download_started(&self, artifact: &ArtifactPath, target: Option<&Path>) {
        self.bar
            .suspend(|| self.log.download_started(artifact, target));
    }

    fn site_fallback(&self, from: Site, to: Site) {
        self.bar.suspend(|| self.log.site_fallback(from, to));
    }

    fn digest_resolved(&self, site: Site, digest: &ExpectedDigest) {
        self.bar.suspend(|| self.log.digest_resolved(site, digest));
    }

    fn stream_opened(&self, url: &Url) {
        self.bar.suspend(|| self.log.stream_opened(url));
    }

    fn progress_total(&self, total_chunks: u64, content_length: u64) {
        self.bar
            .suspend(|| self.log.progress_total(total_chunks, content_length));
        self.bar.set_style(
            ProgressStyle::with_template(BAR_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        self.bar.set_length(total_chunks);
        self.bar.set_message(HumanBytes(content_length).to_string());
    }

    fn progress_indeterminate(&self) {
        self.bar.suspend(|| self.log.progress_indeterminate());
        self.bar.set_style(
            ProgressStyle::with_template(SPINNER_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        self.bar.enable_steady_tick(Duration::from_millis(100));
    }

    fn chunk_completed(&self, _len: usize) {
        self.bar.inc(1);
    }

    fn download_finished(&self, report: &DownloadReport) {
        self.bar.finish_and_clear();
        self.log.download_finished(report);
    }
}
