//! Minimum spacing between consecutive actions.
//!
//! The spacing target is drawn per evaluation rather than fixed, so the
//! cadence of automated actions does not look mechanical. The draw is behind
//! a trait so tests can pin it.

use rand::Rng;
use std::time::Duration;

/// Default lower bound of the spacing draw, in seconds.
pub const DEFAULT_MIN_SPACING_SECS: u64 = 120;
/// Default upper bound of the spacing draw, in seconds.
pub const DEFAULT_MAX_SPACING_SECS: u64 = 300;

/// Source of the target spacing between two consecutive actions of the same
/// (platform, kind) pair.
pub trait SpacingSource: Send + Sync {
    fn target_spacing(&self) -> Duration;
}

/// Draws the spacing uniformly from a closed range.
#[derive(Debug, Clone)]
pub struct UniformSpacing {
    min_secs: u64,
    max_secs: u64,
}

impl UniformSpacing {
    /// Spacing drawn uniformly from `[min_secs, max_secs]`.
    pub fn new(min_secs: u64, max_secs: u64) -> Self {
        assert!(min_secs <= max_secs, "spacing range is inverted");
        Self { min_secs, max_secs }
    }
}

impl Default for UniformSpacing {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_SPACING_SECS, DEFAULT_MAX_SPACING_SECS)
    }
}

impl SpacingSource for UniformSpacing {
    fn target_spacing(&self) -> Duration {
        let secs = rand::thread_rng().gen_range(self.min_secs as f64..=self.max_secs as f64);
        Duration::from_secs_f64(secs)
    }
}

/// Always returns the same spacing. For deterministic tests.
#[derive(Debug, Clone)]
pub struct FixedSpacing(pub Duration);

impl SpacingSource for FixedSpacing {
    fn target_spacing(&self) -> Duration {
        self.0
    }
}
