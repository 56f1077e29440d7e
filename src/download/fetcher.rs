//! Verified streaming fetcher.
//!
//! Orchestrates one download: resolve the destination, obtain the expected
//! digest (falling back from the current site to the archive on 404), open
//! the artifact stream on the committed site, then write and hash the body
//! chunk by chunk and compare digests at the end.
//!
//! # Example
//!
//! ```no_run
//! use apache_downloader::download::{Destination, Fetcher, FetcherOptions, TracingObserver};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let fetcher = Fetcher::new(FetcherOptions::default())?;
//! let report = fetcher
//!     .download_and_verify(
//!         "kafka/3.7.0/kafka_2.13-3.7.0.tgz",
//!         Destination::Default,
//!         &TracingObserver,
//!     )
//!     .await?;
//! println!("verified {} bytes from the {} site", report.bytes, report.site);
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures_util::Stream;
use tokio::fs::OpenOptions;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};
use tracing::{debug, instrument};
use url::Url;

use super::chunks::FixedChunks;
use super::client::HttpClient;
use super::constants::{CONNECT_TIMEOUT_SECS, DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE, READ_TIMEOUT_SECS};
use super::destination::{Destination, Target};
use super::digest::{ExpectedDigest, Sha512Accumulator, fetch_expected_digest};
use super::error::DownloadError;
use super::mirror::resolve_download_url;
use super::observer::{DownloadObserver, TracingObserver};
use super::site::{ArtifactPath, Site, SiteHosts};

/// Label used in IO errors when writing to a caller-supplied writer.
const WRITER_LABEL: &str = "<writer>";

/// Configuration owned by a [`Fetcher`].
#[derive(Debug, Clone)]
pub struct FetcherOptions {
    /// Bytes per streamed chunk; one progress tick per chunk.
    pub chunk_size: usize,
    /// Mirror-selection, downloads and archive hosts.
    pub hosts: SiteHosts,
    /// HTTP connect timeout.
    pub connect_timeout: Duration,
    /// Idle timeout between body reads.
    pub read_timeout: Duration,
}

impl Default for FetcherOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            hosts: SiteHosts::default(),
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
            read_timeout: Duration::from_secs(READ_TIMEOUT_SECS),
        }
    }
}

/// Outcome of a verified download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadReport {
    /// Site the digest and artifact were taken from.
    pub site: Site,
    /// Artifact URL as resolved, before redirects.
    pub url: Url,
    /// URL that actually served the bytes (the mirror, for the current site).
    pub final_url: Url,
    /// Verified lowercase hex SHA-512.
    pub digest: String,
    /// Bytes written to the destination.
    pub bytes: u64,
    /// Chunks written; equals the number of progress ticks.
    pub chunks: u64,
    /// The created file, `None` when a caller writer was used.
    pub path: Option<PathBuf>,
}

struct StreamSummary {
    digest: String,
    bytes: u64,
    chunks: u64,
}

/// Downloads Apache artifacts and verifies them against their published SHA-512.
///
/// Holds only immutable configuration and a pooled HTTP client; every call
/// owns its own hash state, destination and response.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: HttpClient,
    hosts: SiteHosts,
    chunk_size: usize,
    interrupt: Option<Arc<AtomicBool>>,
}

impl Fetcher {
    /// Creates a fetcher with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::InvalidChunkSize`] for a zero or oversized
    /// chunk size and [`DownloadError::Client`] if the HTTP client cannot be built.
    pub fn new(options: FetcherOptions) -> Result<Self, DownloadError> {
        let client = HttpClient::with_timeouts(options.connect_timeout, options.read_timeout)?;
        Self::with_client(client, options)
    }

    /// Creates a fetcher around an existing client; the timeouts in
    /// `options` are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::InvalidChunkSize`] for a zero or oversized chunk size.
    pub fn with_client(client: HttpClient, options: FetcherOptions) -> Result<Self, DownloadError> {
        if !(1..=MAX_CHUNK_SIZE).contains(&options.chunk_size) {
            return Err(DownloadError::InvalidChunkSize {
                size: options.chunk_size,
                max: MAX_CHUNK_SIZE,
            });
        }
        Ok(Self {
            client,
            hosts: options.hosts,
            chunk_size: options.chunk_size,
            interrupt: None,
        })
    }

    /// Checks `flag` between chunks and fails with
    /// [`DownloadError::Interrupted`] once it is set.
    #[must_use]
    pub fn with_interrupt_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupt = Some(flag);
        self
    }

    /// Configured chunk size in bytes.
    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Configured hosts.
    #[must_use]
    pub fn hosts(&self) -> &SiteHosts {
        &self.hosts
    }

    /// Downloads `path` to `destination` and verifies its SHA-512.
    ///
    /// Success is reported only after the computed digest matches the
    /// published one. On a mismatch or a write failure the partially written
    /// file is left in place for inspection.
    ///
    /// # Errors
    ///
    /// - [`DownloadError::InvalidArtifactPath`] for an empty path
    /// - [`DownloadError::AlreadyExists`] if the destination file exists (no request is made)
    /// - [`DownloadError::NotFound`] if neither site publishes a digest
    /// - [`DownloadError::HttpStatus`] for other error statuses, including a
    ///   404 on the artifact itself
    /// - [`DownloadError::Network`] / [`DownloadError::Timeout`] on connection failures
    /// - [`DownloadError::Io`] if the destination cannot be created or written
    /// - [`DownloadError::DigestMismatch`] if the bytes do not match the digest
    /// - [`DownloadError::WriteVerification`] if the file is missing afterwards
    /// - [`DownloadError::Interrupted`] if the interrupt flag was raised
    #[instrument(skip(self, destination, observer), fields(path = %path))]
    pub async fn download_and_verify(
        &self,
        path: &str,
        destination: Destination<'_>,
        observer: &dyn DownloadObserver,
    ) -> Result<DownloadReport, DownloadError> {
        let artifact = ArtifactPath::parse(path)?;
        let target = Target::resolve(destination, &artifact)?;
        observer.download_started(&artifact, target.file_path());

        let (site, expected) = self.resolve_digest(&artifact, observer).await?;
        observer.digest_resolved(site, &expected);

        let url = resolve_download_url(&artifact, site, &self.hosts);
        // NotFound is reserved for the digest lookup; a missing artifact is fatal.
        let response = self
            .client
            .open_stream(url.as_str())
            .await
            .map_err(|error| match error {
                DownloadError::NotFound { url } => DownloadError::HttpStatus { url, status: 404 },
                other => other,
            })?;
        let final_url = response.url().clone();
        observer.stream_opened(&final_url);

        match response.content_length() {
            Some(length) => {
                observer.progress_total(length.div_ceil(self.chunk_size as u64), length);
            }
            None => observer.progress_indeterminate(),
        }

        let (summary, path) = match target {
            Target::File(file_path) => {
                let file = OpenOptions::new()
                    .write(true)
                    .create_new(true)
                    .open(&file_path)
                    .await
                    .map_err(|e| match e.kind() {
                        std::io::ErrorKind::AlreadyExists => {
                            DownloadError::already_exists(&file_path)
                        }
                        _ => DownloadError::io(&file_path, e),
                    })?;
                let mut writer = BufWriter::new(file);
                let summary = self
                    .write_and_hash(response, &mut writer, &file_path, observer)
                    .await?;
                (summary, Some(file_path))
            }
            Target::Writer(writer) => {
                let summary = self
                    .write_and_hash(response, writer, Path::new(WRITER_LABEL), observer)
                    .await?;
                (summary, None)
            }
        };

        if !expected.matches(&summary.digest) {
            return Err(DownloadError::digest_mismatch(
                expected.as_str(),
                summary.digest,
            ));
        }

        if let Some(file_path) = &path {
            verify_written(file_path).await?;
        }

        let report = DownloadReport {
            site,
            url,
            final_url,
            digest: summary.digest,
            bytes: summary.bytes,
            chunks: summary.chunks,
            path,
        };
        observer.download_finished(&report);
        Ok(report)
    }

    /// Looks up the digest on the current site, falling back to the archive
    /// only when the current site answers 404.
    async fn resolve_digest(
        &self,
        artifact: &ArtifactPath,
        observer: &dyn DownloadObserver,
    ) -> Result<(Site, ExpectedDigest), DownloadError> {
        match fetch_expected_digest(&self.client, artifact, Site::Current, &self.hosts).await {
            Ok(digest) => Ok((Site::Current, digest)),
            Err(error) if error.is_not_found() => {
                observer.site_fallback(Site::Current, Site::Archive);
                let digest =
                    fetch_expected_digest(&self.client, artifact, Site::Archive, &self.hosts)
                        .await?;
                Ok((Site::Archive, digest))
            }
            Err(error) => Err(error),
        }
    }

    /// Streams the body into `writer` in fixed-size chunks. Each chunk is
    /// written, then hashed, then ticked, strictly in arrival order.
    ///
    /// The writer is flushed on every exit, so after a failure the sink holds
    /// every chunk that was ticked.
    async fn write_and_hash<W>(
        &self,
        response: reqwest::Response,
        writer: &mut W,
        sink: &Path,
        observer: &dyn DownloadObserver,
    ) -> Result<StreamSummary, DownloadError>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let url = response.url().to_string();
        let mut chunks = FixedChunks::new(response.bytes_stream(), self.chunk_size);
        let mut hasher = Sha512Accumulator::new();

        let copied = self
            .copy_chunks(&mut chunks, writer, sink, &mut hasher, &url, observer)
            .await;
        let flushed = writer.flush().await.map_err(|e| DownloadError::io(sink, e));
        if copied.is_err()
            && let Err(error) = &flushed
        {
            debug!(%error, "flushing partial download failed");
        }
        let count = copied?;
        flushed?;

        let bytes = hasher.bytes();
        Ok(StreamSummary {
            digest: hasher.finalize_hex(),
            bytes,
            chunks: count,
        })
    }

    async fn copy_chunks<S, B, W>(
        &self,
        chunks: &mut FixedChunks<S>,
        writer: &mut W,
        sink: &Path,
        hasher: &mut Sha512Accumulator,
        url: &str,
        observer: &dyn DownloadObserver,
    ) -> Result<u64, DownloadError>
    where
        S: Stream<Item = Result<B, reqwest::Error>> + Unpin,
        B: AsRef<[u8]>,
        W: AsyncWrite + Unpin + ?Sized,
    {
        let mut count: u64 = 0;
        loop {
            if self.is_interrupted() {
                debug!(chunks = count, "interrupt flag raised");
                return Err(DownloadError::Interrupted);
            }
            let Some(chunk) = chunks.next_chunk().await else {
                return Ok(count);
            };
            let chunk = chunk.map_err(|e| DownloadError::network(url, e))?;

            writer
                .write_all(&chunk)
                .await
                .map_err(|e| DownloadError::io(sink, e))?;
            hasher.update(&chunk);
            count += 1;
            observer.chunk_completed(chunk.len());
        }
    }

    fn is_interrupted(&self) -> bool {
        self.interrupt
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }
}

/// Confirms the destination file exists after a verified write.
async fn verify_written(path: &Path) -> Result<(), DownloadError> {
    let exists = tokio::fs::try_exists(path)
        .await
        .map_err(|e| DownloadError::io(path, e))?;
    if exists {
        Ok(())
    } else {
        Err(DownloadError::WriteVerification {
            path: path.to_path_buf(),
        })
    }
}

/// Downloads and verifies `path` against the public Apache hosts with
/// default options, logging through [`TracingObserver`].
///
/// # Errors
///
/// See [`Fetcher::download_and_verify`].
pub async fn download_and_verify(
    path: &str,
    destination: Destination<'_>,
) -> Result<DownloadReport, DownloadError> {
    Fetcher::new(FetcherOptions::default())?
        .download_and_verify(path, destination, &TracingObserver)
        .await
}
