//! Skips wiremock-backed tests where a localhost socket cannot be bound.
//!
//! Used by the unit tests and, through `#[path]`, by the integration tests.

use wiremock::MockServer;

/// When set to `1`/`true`/`yes`, an unbindable localhost fails the test
/// instead of skipping it.
const STRICT_ENV: &str = "APACHE_DL_REQUIRE_SOCKET_TESTS";

fn strict_mode() -> bool {
    std::env::var(STRICT_ENV)
        .is_ok_and(|value| ["1", "true", "yes"].iter().any(|on| value.eq_ignore_ascii_case(on)))
}

fn localhost_bindable() -> bool {
    std::net::TcpListener::bind(("127.0.0.1", 0)).is_ok()
}

/// Starts a mock server, or returns `None` when localhost cannot be bound.
///
/// # Panics
///
/// Panics in strict mode when localhost cannot be bound.
pub async fn start_mock_server_or_skip() -> Option<MockServer> {
    if localhost_bindable() {
        return Some(MockServer::start().await);
    }
    assert!(
        !strict_mode(),
        "cannot bind a localhost socket and {STRICT_ENV} requires socket tests"
    );
    eprintln!(
        "skipping socket-bound test: cannot bind a localhost socket (set {STRICT_ENV}=1 to fail instead)"
    );
    None
}
