//! A process-wide cancellation flag checked at step granularity by the
//! [agent loop](crate::agent) and by TEXPLORE's background workers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Once;

static INTERRUPTED: AtomicBool = AtomicBool::new(false);
static INSTALL: Once = Once::new();

/// Install the SIGINT/SIGTERM handler exactly once per process.
///
/// Subsequent calls are no-ops. Safe to call from multiple independent
/// agent loops or tests; the flag itself is global by design (§5 of the
/// harness's concurrency model: a single atomic signal).
pub fn install_handler() {
    INSTALL.call_once(|| {
        if let Err(e) = ctrlc::set_handler(|| {
            log::warn!("interrupt received, finishing current step before exiting");
            INTERRUPTED.store(true, Ordering::SeqCst);
        }) {
            log::error!("failed to install interrupt handler: {e}");
        }
    });
}

/// Check whether an interrupt has been requested.
pub fn is_interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

/// Reset the flag. Intended for tests that run multiple loops in one process.
pub fn reset() {
    INTERRUPTED.store(false, Ordering::SeqCst);
}
