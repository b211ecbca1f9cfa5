//! Shared helpers for tabledump's integration tests.

pub mod builders;
pub mod fake_backend;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tabledump::DumpTool;
use tabledump::logging::{LOG_ENV, build_filter};
use tracing_subscriber::{EnvFilter, fmt};

/// Upper bound for a single awaited step in a test.
pub const TEST_DEADLINE: Duration = Duration::from_secs(10);

static INIT: Once = Once::new();

/// Install a per-test capturing subscriber, filtered like the binary.
///
/// `TABLEDUMP_LOG=tabledump::exec=debug cargo test -- --nocapture` shows
/// the process runner's logs for a failing test.
pub fn init_tracing() {
    INIT.call_once(|| {
        let env_value = std::env::var(LOG_ENV).ok();
        let filter = build_filter(None, env_value.as_deref())
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}

/// Await `f`, failing the test if it outlives [`TEST_DEADLINE`].
///
/// Keeps a hung dump process or a lost join from stalling the suite.
pub async fn with_deadline<F>(f: F) -> F::Output
where
    F: Future,
{
    tokio::time::timeout(TEST_DEADLINE, f)
        .await
        .unwrap_or_else(|_| panic!("test step exceeded {TEST_DEADLINE:?}"))
}

/// A dump tool that runs `script` under `sh`.
///
/// The generated dump arguments arrive as `$@` (with `$0` = `mysqldump`),
/// so the script sees exactly what the real tool would.
pub fn script_tool(script: &str) -> DumpTool {
    DumpTool::new("sh").with_args(["-c", script, "mysqldump"])
}
