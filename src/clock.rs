//! Process-wide monotonic clock.
//!
//! Filters and detectors accept explicit timestamps; this is the default
//! source when the caller does not supply one.

use std::sync::OnceLock;
use std::time::Instant;

static ORIGIN: OnceLock<Instant> = OnceLock::new();

/// Seconds elapsed since the first call in this process.
pub fn now() -> f64 {
    ORIGIN.get_or_init(Instant::now).elapsed().as_secs_f64()
}
