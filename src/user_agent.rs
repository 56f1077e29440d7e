//! User-Agent string sent with every digest and artifact request.

/// Crate name as it appears in the User-Agent product token.
const PRODUCT: &str = env!("CARGO_PKG_NAME");

/// Default User-Agent: `apache-downloader/<version>`, plus the repository
/// URL when the package declares one.
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    let repository = env!("CARGO_PKG_REPOSITORY");
    if repository.is_empty() {
        format!("{PRODUCT}/{version}")
    } else {
        format!("{PRODUCT}/{version} (+{repository})")
    }
}
