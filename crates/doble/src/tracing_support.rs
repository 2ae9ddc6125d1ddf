//! Structured logging for mock activity.
//!
//! Every setup registration and dispatch emits a `tracing` event so a
//! failing test can show which setup answered which call. Nothing is printed
//! unless a subscriber is installed; [`init_test_tracing`] installs one that
//! writes through the test harness.

use crate::result::Thrown;
use crate::signature::MemberId;
use tracing_subscriber::EnvFilter;

/// Environment variable read before `RUST_LOG`
pub const LOG_ENV: &str = "DOBLE_LOG";

/// Install a test-friendly subscriber.
///
/// The filter comes from `DOBLE_LOG`, then `RUST_LOG`, then `warn`. Calling
/// this more than once is harmless.
pub fn init_test_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

pub(crate) fn log_registered(mock: &str, member: &MemberId, sequence: u64) {
    tracing::debug!(mock, member = %member, sequence, "Setup registered");
}

pub(crate) fn log_matched(mock: &str, member: &MemberId, sequence: u64) {
    tracing::trace!(mock, member = %member, sequence, "Setup matched");
}

pub(crate) fn log_unmatched(mock: &str, member: &MemberId, warn: bool) {
    if warn {
        tracing::warn!(mock, member = %member, "No setup matched; returning default");
    } else {
        tracing::debug!(mock, member = %member, "No setup matched; returning default");
    }
}

pub(crate) fn log_thrown(mock: &str, member: &MemberId, thrown: &Thrown) {
    tracing::debug!(mock, member = %member, error = %thrown, "Call raised");
}
