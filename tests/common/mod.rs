//! Common test utilities, fixtures, and mocks shared by the integration
//! test suite.

pub mod fixtures;
pub mod mocks;

use std::sync::Once;
use std::time::Duration;
use tracing::Level;

static INIT: Once = Once::new();

/// Initialize tracing for tests.
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_test_writer()
            .init();
    });
}

/// Polls a condition until it holds, yielding to the runtime in between.
/// Completion events travel through the engine's worker task, so tests
/// need to wait for observable state rather than asserting immediately.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..400 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not met within deadline");
}
