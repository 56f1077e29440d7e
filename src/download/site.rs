//! Distribution sites and artifact paths.

use std::fmt;

use url::Url;

use super::constants::{ARCHIVE_URL, DOWNLOADS_URL, MIRROR_SELECTION_URL};
use super::error::DownloadError;

/// Which part of the Apache distribution network to download from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Site {
    /// The rotating mirror network, with digests from the canonical downloads host.
    Current,
    /// The permanent archive host serving retired releases.
    Archive,
}

impl Site {
    /// Returns the stable lowercase label used in logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Archive => "archive",
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file inside the Apache distribution tree, e.g.
/// `nifi/nifi-registry/nifi-registry-0.5.0/nifi-registry-0.5.0-bin.tar.gz`.
///
/// The raw form is kept verbatim for the mirror-selection query; `/dist/`
/// URLs use [`relative`](Self::relative), which has leading slashes stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPath {
    raw: String,
}

impl ArtifactPath {
    /// Parses an artifact path.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::InvalidArtifactPath`] when the path is empty
    /// after stripping leading slashes or ends with `/`.
    pub fn parse(raw: impl Into<String>) -> Result<Self, DownloadError> {
        let raw = raw.into();
        let relative = raw.trim_start_matches('/');
        if relative.trim().is_empty() || relative.ends_with('/') {
            return Err(DownloadError::invalid_artifact_path(raw));
        }
        Ok(Self { raw })
    }

    /// The path exactly as supplied.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The path with leading slashes stripped.
    #[must_use]
    pub fn relative(&self) -> &str {
        self.raw.trim_start_matches('/')
    }

    /// The last path segment, used as the default destination file name.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.raw.rsplit('/').next().unwrap_or(&self.raw)
    }
}

impl fmt::Display for ArtifactPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Base URLs of the three hosts involved in a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteHosts {
    mirror_selection: Url,
    downloads: Url,
    archive: Url,
}

impl Default for SiteHosts {
    /// The public Apache hosts.
    ///
    /// # Panics
    ///
    /// Panics if the built-in host constants fail to parse. This should never
    /// happen in practice.
    #[allow(clippy::expect_used)]
    fn default() -> Self {
        Self::parse(MIRROR_SELECTION_URL, DOWNLOADS_URL, ARCHIVE_URL)
            .expect("built-in Apache host URLs are valid")
    }
}

impl SiteHosts {
    /// Builds host configuration from three URL strings.
    ///
    /// `mirror_selection` is the full endpoint URL; `downloads` and `archive`
    /// are host roots under which `dist/...` is appended.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::InvalidUrl`] if a URL does not parse or cannot
    /// carry a path (e.g. `mailto:`).
    pub fn parse(
        mirror_selection: &str,
        downloads: &str,
        archive: &str,
    ) -> Result<Self, DownloadError> {
        Ok(Self {
            mirror_selection: parse_base(mirror_selection)?,
            downloads: parse_base(downloads)?,
            archive: parse_base(archive)?,
        })
    }

    /// Replaces the mirror-selection endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::InvalidUrl`] for unusable URLs.
    pub fn with_mirror_selection(mut self, url: &str) -> Result<Self, DownloadError> {
        self.mirror_selection = parse_base(url)?;
        Ok(self)
    }

    /// Replaces the canonical downloads host.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::InvalidUrl`] for unusable URLs.
    pub fn with_downloads(mut self, url: &str) -> Result<Self, DownloadError> {
        self.downloads = parse_base(url)?;
        Ok(self)
    }

    /// Replaces the archive host.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::InvalidUrl`] for unusable URLs.
    pub fn with_archive(mut self, url: &str) -> Result<Self, DownloadError> {
        self.archive = parse_base(url)?;
        Ok(self)
    }

    /// The mirror-selection endpoint.
    #[must_use]
    pub fn mirror_selection(&self) -> &Url {
        &self.mirror_selection
    }

    /// Host serving digests for `site`.
    #[must_use]
    pub fn digest_host(&self, site: Site) -> &Url {
        match site {
            Site::Current => &self.downloads,
            Site::Archive => &self.archive,
        }
    }

    /// The archive host.
    #[must_use]
    pub fn archive(&self) -> &Url {
        &self.archive
    }
}

fn parse_base(raw: &str) -> Result<Url, DownloadError> {
    let url = Url::parse(raw.trim()).map_err(|_| DownloadError::invalid_url(raw))?;
    if url.cannot_be_a_base() {
        return Err(DownloadError::invalid_url(raw));
    }
    Ok(url)
}

/// Appends `dist/<relative>` to `base`, percent-encoding each segment.
pub(crate) fn dist_url(base: &Url, relative: &str) -> Url {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    // SiteHosts only holds base-capable URLs, so the segments are always available.
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push("dist").extend(relative.split('/'));
    }
    url
}
