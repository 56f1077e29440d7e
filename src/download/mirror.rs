//! Artifact URL resolution.

use url::Url;

use super::site::{ArtifactPath, Site, SiteHosts, dist_url};

/// Returns the URL the artifact bytes are fetched from on `site`.
///
/// - [`Site::Current`]: the mirror-selection endpoint with
///   `action=download&filename=<path>`; the server redirects to a mirror.
/// - [`Site::Archive`]: `<archive>/dist/<path>`, served directly.
///
/// Pure: the same inputs always produce the same URL.
#[must_use]
pub fn resolve_download_url(path: &ArtifactPath, site: Site, hosts: &SiteHosts) -> Url {
    match site {
        Site::Current => {
            let mut url = hosts.mirror_selection().clone();
            url.query_pairs_mut()
                .clear()
                .append_pair("action", "download")
                .append_pair("filename", path.as_str());
            url
        }
        Site::Archive => dist_url(hosts.archive(), path.relative()),
    }
}
