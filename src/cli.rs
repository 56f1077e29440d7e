//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

/// Download an Apache release artifact and verify its SHA-512 digest.
///
/// PATH is the artifact's path inside the Apache distribution tree, e.g.
/// `kafka/3.7.0/kafka_2.13-3.7.0.tgz`. Releases no longer on the mirrors are
/// fetched from archive.apache.org automatically.
#[derive(Parser, Debug)]
#[command(name = "apache-dl")]
#[command(author, version, about)]
pub struct Args {
    /// Artifact path inside the Apache distribution tree
    #[arg(value_name = "PATH")]
    pub path: String,

    /// Output file or directory; `-` writes to stdout (default: artifact file name in the current directory)
    #[arg(short, long, value_name = "DEST")]
    pub output: Option<PathBuf>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored log output
    #[arg(long)]
    pub no_color: bool,

    /// Do not draw a progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Bytes per chunk (one progress tick per chunk, 1-16777216)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..=16_777_216))]
    pub chunk_size: Option<u64>,

    /// HTTP connect timeout in seconds (1-3600)
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub connect_timeout: Option<u64>,

    /// Idle read timeout in seconds (1-3600)
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub read_timeout: Option<u64>,

    /// Read defaults from this config file instead of the standard location
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Mirror-selection endpoint
    #[arg(long, value_name = "URL")]
    pub mirror_url: Option<String>,

    /// Canonical downloads host for current releases
    #[arg(long, value_name = "URL")]
    pub downloads_url: Option<String>,

    /// Archive host for retired releases
    #[arg(long, value_name = "URL")]
    pub archive_url: Option<String>,
}

impl Args {
    /// True when `-o -` asks for the artifact on stdout.
    #[must_use]
    pub fn writes_to_stdout(&self) -> bool {
        self.output.as_deref().is_some_and(|p| p.as_os_str() == "-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PATH: &str = "nifi/nifi-1.0/nifi-1.0-bin.tar.gz";

    #[test]
    fn test_cli_minimal_args_parses_successfully() {
        let args = Args::try_parse_from(["apache-dl", PATH]).unwrap();
        assert_eq!(args.path, PATH);
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
        assert!(args.output.is_none());
        assert!(args.chunk_size.is_none());
        assert!(!args.writes_to_stdout());
    }

    #[test]
    fn test_cli_path_is_required() {
        let err = Args::try_parse_from(["apache-dl"]).unwrap_err();
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let args = Args::try_parse_from(["apache-dl", "-v", PATH]).unwrap();
        assert_eq!(args.verbose, 1);

        let args = Args::try_parse_from(["apache-dl", "-vv", PATH]).unwrap();
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_cli_quiet_flag_sets_quiet() {
        let args = Args::try_parse_from(["apache-dl", "--quiet", PATH]).unwrap();
        assert!(args.quiet);
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let err = Args::try_parse_from(["apache-dl", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_version_flag_shows_version() {
        let err = Args::try_parse_from(["apache-dl", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_cli_invalid_flag_returns_error() {
        let err = Args::try_parse_from(["apache-dl", "--invalid-flag", PATH]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_cli_output_short_and_long() {
        let args = Args::try_parse_from(["apache-dl", "-o", "/tmp/out", PATH]).unwrap();
        assert_eq!(args.output, Some(PathBuf::from("/tmp/out")));

        let args = Args::try_parse_from(["apache-dl", PATH, "--output", "dl/"]).unwrap();
        assert_eq!(args.output, Some(PathBuf::from("dl/")));
    }

    #[test]
    fn test_cli_dash_output_means_stdout() {
        let args = Args::try_parse_from(["apache-dl", "-o", "-", PATH]).unwrap();
        assert!(args.writes_to_stdout());
    }

    #[test]
    fn test_cli_chunk_size_bounds() {
        let args = Args::try_parse_from(["apache-dl", "--chunk-size", "1", PATH]).unwrap();
        assert_eq!(args.chunk_size, Some(1));

        let err = Args::try_parse_from(["apache-dl", "--chunk-size", "0", PATH]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);

        let err =
            Args::try_parse_from(["apache-dl", "--chunk-size", "16777217", PATH]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_timeout_bounds() {
        let args = Args::try_parse_from([
            "apache-dl",
            "--connect-timeout",
            "5",
            "--read-timeout",
            "3600",
            PATH,
        ])
        .unwrap();
        assert_eq!(args.connect_timeout, Some(5));
        assert_eq!(args.read_timeout, Some(3600));

        let err =
            Args::try_parse_from(["apache-dl", "--read-timeout", "0", PATH]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_host_overrides() {
        let args = Args::try_parse_from([
            "apache-dl",
            "--mirror-url",
            "http://127.0.0.1:1/closer.cgi",
            "--downloads-url",
            "http://127.0.0.1:2/",
            "--archive-url",
            "http://127.0.0.1:3/",
            PATH,
        ])
        .unwrap();
        assert_eq!(args.mirror_url.as_deref(), Some("http://127.0.0.1:1/closer.cgi"));
        assert_eq!(args.downloads_url.as_deref(), Some("http://127.0.0.1:2/"));
        assert_eq!(args.archive_url.as_deref(), Some("http://127.0.0.1:3/"));
    }
}
