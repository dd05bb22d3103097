//! Access to the shared embedded PostgreSQL cluster.
//!
//! Suites skip instead of failing when `SKIP_TEST_CLUSTER` is truthy, so
//! machines without PostgreSQL binaries can still run the unit tests.

use std::time::Duration;

use pg_embedded_setup_unpriv::{BootstrapResult, ClusterHandle};

const SHARED_CLUSTER_RETRIES: usize = 5;
const SHARED_CLUSTER_RETRY_DELAY: Duration = Duration::from_millis(500);
const STABLE_PASSWORD: &str = "scoreboard_embedded_test";

/// Return the process-wide cluster, retrying transient bootstrap failures.
pub fn shared_cluster_handle() -> BootstrapResult<&'static ClusterHandle> {
    ensure_stable_password();
    let mut attempt = 1;
    loop {
        match pg_embedded_setup_unpriv::test_support::shared_cluster_handle() {
            Ok(handle) => return Ok(handle),
            Err(error) if attempt >= SHARED_CLUSTER_RETRIES => return Err(error),
            Err(_) => {
                std::thread::sleep(SHARED_CLUSTER_RETRY_DELAY);
                attempt += 1;
            }
        }
    }
}

/// Pin `PG_PASSWORD` so a reused data directory keeps accepting logins.
fn ensure_stable_password() {
    if std::env::var_os("PG_PASSWORD").is_none() {
        // SAFETY: runs before the cluster bootstrap spawns threads.
        unsafe {
            std::env::set_var("PG_PASSWORD", STABLE_PASSWORD);
        }
    }
}

fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Skip with a marker when `SKIP_TEST_CLUSTER` is set, otherwise panic.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}
