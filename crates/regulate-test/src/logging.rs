//! Test logging utilities
//!
//! Provides utilities for initializing logging in test environments.

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Initialize logging for tests (call once)
///
/// Output goes through the test writer so it is captured per test. The
/// filter is read from `RUST_LOG` and defaults to `debug` for the Regulate
/// crates.
///
/// # Examples
///
/// ```
/// use regulate_test::logging::init_test_logging;
///
/// init_test_logging();
/// init_test_logging();
/// ```
pub fn init_test_logging() {
	INIT.call_once(|| {
		let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
			EnvFilter::new("regulate_core=debug,regulate_forms=debug,regulate_admin=debug")
		});
		let _ = tracing_subscriber::fmt()
			.with_env_filter(filter)
			.with_test_writer()
			.try_init();
	});
}
