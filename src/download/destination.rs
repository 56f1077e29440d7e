//! Download destinations: a filesystem target or a caller-supplied writer.

use std::ffi::OsString;
use std::fmt;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};

use tokio::io::AsyncWrite;

use super::error::DownloadError;
use super::site::ArtifactPath;

/// Where the verified bytes go.
pub enum Destination<'a> {
    /// `<artifact file name>` in the current directory.
    Default,
    /// An existing directory (the artifact file name is appended) or a
    /// literal file path. An empty path behaves like [`Destination::Default`].
    Path(PathBuf),
    /// An already-open writer owned by the caller. Nothing is created on disk.
    Writer(&'a mut (dyn AsyncWrite + Send + Unpin)),
}

impl fmt::Debug for Destination<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("Default"),
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::Writer(_) => f.write_str("Writer(..)"),
        }
    }
}

impl From<PathBuf> for Destination<'_> {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<Option<PathBuf>> for Destination<'_> {
    fn from(path: Option<PathBuf>) -> Self {
        path.map_or(Self::Default, Self::Path)
    }
}

/// A destination resolved at call entry.
pub(crate) enum Target<'a> {
    File(PathBuf),
    Writer(&'a mut (dyn AsyncWrite + Send + Unpin)),
}

impl<'a> Target<'a> {
    /// Resolves `destination` for `artifact` and checks that a file target
    /// does not exist yet.
    pub(crate) fn resolve(
        destination: Destination<'a>,
        artifact: &ArtifactPath,
    ) -> Result<Self, DownloadError> {
        let path = match destination {
            Destination::Writer(writer) => return Ok(Self::Writer(writer)),
            Destination::Default => PathBuf::from(artifact.file_name()),
            Destination::Path(path) => resolve_file_path(&path, artifact),
        };
        if path.exists() {
            return Err(DownloadError::already_exists(path));
        }
        Ok(Self::File(path))
    }

    pub(crate) fn file_path(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            Self::Writer(_) => None,
        }
    }
}

/// Maps a user-supplied path to the final file path.
///
/// - empty → artifact file name in the current directory
/// - existing directory, or a path ending in a separator → `<dir>/<artifact file name>`
/// - anything else → the path itself
#[must_use]
pub fn resolve_file_path(destination: &Path, artifact: &ArtifactPath) -> PathBuf {
    if destination.as_os_str().is_empty() {
        return PathBuf::from(artifact.file_name());
    }
    let expanded = expand_home(destination);
    if expanded.is_dir() || ends_with_separator(&expanded) {
        expanded.join(artifact.file_name())
    } else {
        expanded
    }
}

fn ends_with_separator(path: &Path) -> bool {
    let raw = path.as_os_str().to_string_lossy();
    raw.ends_with('/') || raw.ends_with(MAIN_SEPARATOR)
}

/// Expands a leading `~` to `$HOME`. Other paths are returned unchanged.
fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match home_dir() {
        Some(home) => PathBuf::from(home).join(rest),
        None => path.to_path_buf(),
    }
}

fn home_dir() -> Option<OsString> {
    let value = std::env::var_os("HOME")?;
    if value.is_empty() { None } else { Some(value) }
}
