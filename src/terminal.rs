//! Terminal capabilities and tracing setup for the CLI.

use std::io::IsTerminal;

/// What the process's stderr and environment allow us to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Terminal {
    stderr_is_tty: bool,
    dumb: bool,
    no_color_env: bool,
}

impl Terminal {
    /// Reads `TERM`, `NO_COLOR` and whether stderr is a terminal.
    pub(crate) fn detect() -> Self {
        Self {
            stderr_is_tty: std::io::stderr().is_terminal(),
            dumb: std::env::var("TERM").is_ok_and(|term| term.eq_ignore_ascii_case("dumb")),
            no_color_env: std::env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty()),
        }
    }

    /// ANSI colour is off with `--no-color`, a non-empty `NO_COLOR`, or `TERM=dumb`.
    pub(crate) fn color(self, no_color_flag: bool) -> bool {
        !(no_color_flag || self.no_color_env || self.dumb)
    }

    /// The bar is drawn only on an interactive, non-dumb stderr and never
    /// when quiet or disabled.
    pub(crate) fn progress(self, quiet: bool, no_progress: bool) -> bool {
        self.stderr_is_tty && !self.dumb && !quiet && !no_progress
    }
}

/// Log filter chosen from the command line and config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LogLevel {
    pub(crate) directive: &'static str,
    /// Set when a flag chose the level; `RUST_LOG` is then ignored.
    pub(crate) from_flag: bool,
}

impl LogLevel {
    /// `-q` wins, then the `-v` count, then the config file, then `info`.
    pub(crate) fn resolve(quiet: bool, verbose: u8, config_level: Option<&'static str>) -> Self {
        let (directive, from_flag) = match (quiet, verbose) {
            (true, _) => ("error", true),
            (false, 0) => (config_level.unwrap_or("info"), false),
            (false, 1) => ("debug", true),
            (false, _) => ("trace", true),
        };
        Self {
            directive,
            from_flag,
        }
    }
}

/// Installs the stderr subscriber. A second call is a no-op.
pub(crate) fn init_tracing(level: LogLevel, color: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if level.from_flag {
        EnvFilter::new(level.directive)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.directive))
    };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(color)
        .with_env_filter(filter)
        .try_init();
}
