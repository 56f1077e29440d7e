//! Verified downloads of Apache release artifacts.
//!
//! An artifact is named by its path inside the Apache distribution tree. The
//! bytes come from a mirror chosen by the Apache mirror-selection endpoint
//! (or from the archive host for retired releases); the SHA-512 digest always
//! comes from the authoritative host of the same site.
//!
//! # Features
//!
//! - Current-site first, archive fallback when the digest lookup returns 404
//! - Streaming in fixed-size chunks, hashed as they are written
//! - Refuses to overwrite existing files
//! - Pluggable progress and diagnostics via [`DownloadObserver`]
//!
//! # Example
//!
//! ```no_run
//! use apache_downloader::download::{Destination, download_and_verify};
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let report = download_and_verify(
//!     "nifi/nifi-registry/nifi-registry-0.5.0/nifi-registry-0.5.0-bin.tar.gz",
//!     Destination::Path(PathBuf::from("./downloads")),
//! )
//! .await?;
//! println!("Downloaded: {:?}", report.path);
//! # Ok(())
//! # }
//! ```

mod chunks;
mod client;
pub mod constants;
mod destination;
mod digest;
mod error;
mod fetcher;
mod mirror;
mod observer;
mod site;

pub use client::HttpClient;
pub use constants::{DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE};
pub use destination::{Destination, resolve_file_path};
pub use digest::{
    ExpectedDigest, Sha512Accumulator, digest_url, fetch_expected_digest, normalize_digest,
};
pub use error::DownloadError;
pub use fetcher::{DownloadReport, Fetcher, FetcherOptions, download_and_verify};
pub use mirror::resolve_download_url;
pub use observer::{DownloadObserver, NoopObserver, TracingObserver};
pub use site::{ArtifactPath, Site, SiteHosts};
