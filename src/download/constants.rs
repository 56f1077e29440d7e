//! Constants for the download module (chunking, timeouts, hosts).

/// Default streaming chunk size in bytes. One progress tick per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 8192;

/// Largest accepted chunk size (16 MiB).
pub const MAX_CHUNK_SIZE: usize = 16 * 1024 * 1024;

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default idle read timeout between body reads (5 minutes).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// Mirror-selection endpoint; redirects to a nearby mirror.
pub const MIRROR_SELECTION_URL: &str = "https://www.apache.org/dyn/mirrors/mirrors.cgi";

/// Canonical host for current-release digests.
pub const DOWNLOADS_URL: &str = "https://downloads.apache.org/";

/// Permanent host for retired releases and their digests.
pub const ARCHIVE_URL: &str = "https://archive.apache.org/";

/// Suffix of the digest file published next to each artifact.
pub const DIGEST_SUFFIX: &str = ".sha512";
