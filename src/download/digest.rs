//! Expected-digest lookup and the running SHA-512 accumulator.
//!
//! Digests always come from the authoritative host of a site, never from a
//! mirror: `downloads.apache.org` for [`Site::Current`] and
//! `archive.apache.org` for [`Site::Archive`].

use std::fmt;

use sha2::{Digest, Sha512};
use tracing::{debug, instrument};
use url::Url;

use super::client::HttpClient;
use super::constants::DIGEST_SUFFIX;
use super::error::DownloadError;
use super::site::{ArtifactPath, Site, SiteHosts, dist_url};

/// Length of a hex-encoded SHA-512 digest.
const SHA512_HEX_LEN: usize = 128;

/// A normalized, lowercase hex SHA-512 digest published for an artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedDigest(String);

impl ExpectedDigest {
    /// Normalizes the body of a digest file.
    #[must_use]
    pub fn from_digest_file(body: &str) -> Self {
        Self(normalize_digest(body))
    }

    /// The normalized hex string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison with a computed hex digest.
    #[must_use]
    pub fn matches(&self, actual_hex: &str) -> bool {
        self.0.eq_ignore_ascii_case(actual_hex)
    }
}

impl fmt::Display for ExpectedDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalizes a `.sha512` file body to a bare lowercase hex digest.
///
/// Handles the layouts found on the Apache hosts:
/// - a bare digest, possibly hand-wrapped over several lines
/// - `<filename>: <digest>` (also wrapped)
/// - `SHA512(<filename>)= <digest>`
/// - `sha512sum` output: `<digest>  <filename>`
///
/// Whitespace is removed first, then the result is lowercased, then only the
/// part after the last `:` or `=` is kept. Idempotent.
#[must_use]
pub fn normalize_digest(body: &str) -> String {
    if let Some(first) = body.split_whitespace().next()
        && body.split_whitespace().nth(1).is_some()
        && is_full_sha512_hex(first)
    {
        return first.to_ascii_lowercase();
    }

    let compact: String = body.chars().filter(|c| !c.is_whitespace()).collect();
    let lowered = compact.to_lowercase();
    match lowered.rfind([':', '=']) {
        Some(index) => lowered[index + 1..].to_string(),
        None => lowered,
    }
}

fn is_full_sha512_hex(token: &str) -> bool {
    token.len() == SHA512_HEX_LEN && token.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Returns the URL of the digest file for `path` on `site`.
#[must_use]
pub fn digest_url(path: &ArtifactPath, site: Site, hosts: &SiteHosts) -> Url {
    let relative = format!("{}{DIGEST_SUFFIX}", path.relative());
    dist_url(hosts.digest_host(site), &relative)
}

/// Fetches and normalizes the expected digest of `path` from `site`.
///
/// # Errors
///
/// - [`DownloadError::NotFound`] if the digest host answers 404
/// - [`DownloadError::HttpStatus`] for any other non-success status
/// - [`DownloadError::Network`] / [`DownloadError::Timeout`] on connection failures
#[instrument(level = "debug", skip(client, hosts), fields(path = %path, site = %site))]
pub async fn fetch_expected_digest(
    client: &HttpClient,
    path: &ArtifactPath,
    site: Site,
    hosts: &SiteHosts,
) -> Result<ExpectedDigest, DownloadError> {
    let url = digest_url(path, site, hosts);
    let body = client.get_text(url.as_str()).await?;
    let digest = ExpectedDigest::from_digest_file(&body);
    debug!(expected = %digest, "resolved expected digest");
    Ok(digest)
}

/// Incremental SHA-512 over the bytes handed to the destination.
#[derive(Debug, Clone, Default)]
pub struct Sha512Accumulator {
    hasher: Sha512,
    bytes: u64,
}

impl Sha512Accumulator {
    /// Starts an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds the next chunk.
    pub fn update(&mut self, chunk: &[u8]) {
        self.hasher.update(chunk);
        self.bytes += chunk.len() as u64;
    }

    /// Number of bytes fed so far.
    #[must_use]
    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    /// Consumes the accumulator and returns the lowercase hex digest.
    #[must_use]
    pub fn finalize_hex(self) -> String {
        hex::encode(self.hasher.finalize())
    }
}
