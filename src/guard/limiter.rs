//! Core rate limit guard implementation.

use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::PlatformLimits;
use crate::error::{GuardError, Result};

use super::decision::{Decision, Reason};
use super::log::{ActionLog, ActionRecord, Fingerprint};
use super::spacing::{SpacingSource, UniformSpacing};

/// Advisory wait reported when a daily threshold has fired: the full
/// decision window.
const FULL_WINDOW_WAIT: Duration = Duration::from_secs(24 * 60 * 60);

/// Gates automated actions per (platform, action kind) pair.
///
/// Two independent policies apply: a rolling 24-hour daily cap with an 80%
/// soft-stop threshold, and a randomized minimum spacing between consecutive
/// actions of the same pair. [`evaluate`](RateLimitGuard::evaluate) is
/// read-only and fails closed on malfunction;
/// [`record`](RateLimitGuard::record) appends to the audit log after the
/// caller has performed the gated action.
///
/// The guard is thread-safe and can be shared across callers.
pub struct RateLimitGuard {
    /// Static daily caps per platform and kind
    limits: PlatformLimits,
    /// Chronological log of recorded actions
    log: RwLock<ActionLog>,
    /// Injected time source
    clock: Arc<dyn Clock>,
    /// Injected spacing draw
    spacing: Arc<dyn SpacingSource>,
}

impl RateLimitGuard {
    /// Create a guard with the given limits, the system clock, and the
    /// default 120-300 second spacing draw.
    pub fn new(limits: PlatformLimits) -> Self {
        Self {
            limits,
            log: RwLock::new(ActionLog::new()),
            clock: Arc::new(SystemClock),
            spacing: Arc::new(UniformSpacing::default()),
        }
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the spacing draw.
    pub fn with_spacing(mut self, spacing: Arc<dyn SpacingSource>) -> Self {
        self.spacing = spacing;
        self
    }

    /// Decide whether an action of the given kind may be performed now.
    ///
    /// Never mutates the log; repeated calls without an intervening
    /// [`record`](RateLimitGuard::record) (and at a fixed clock and spacing)
    /// return the same decision. Every throttled decision carries a reason
    /// code and an advisory wait hint. Malfunctions (unknown platform, clock
    /// failure) resolve to a throttled decision rather than an error, so a
    /// caller can never act on an evaluation that did not complete.
    pub fn evaluate(&self, platform: &str, kind: &str) -> Decision {
        trace!(platform = %platform, kind = %kind, "Evaluating action safety");

        let Some(cap) = self.limits.cap_for(platform, kind) else {
            warn!(platform = %platform, "Platform not configured, failing closed");
            return Decision::throttled(Reason::UnknownPlatform, FULL_WINDOW_WAIT, false);
        };

        let now = match self.clock.now() {
            Ok(now) => now,
            Err(e) => {
                warn!(error = %e, "Clock read failed, failing closed");
                return Decision::throttled(Reason::ClockUnavailable, FULL_WINDOW_WAIT, false);
            }
        };

        let log = self.log.read();
        let (window_cutoff, _) = ActionLog::window_cutoffs(now);
        let recent = log.count_recent(platform, kind, window_cutoff);

        // The soft stop runs before the hard cap so that crossing 80% always
        // reports the soft-stop reason, even once the cap itself is reached.
        let soft = soft_threshold(cap);
        if recent >= soft as usize {
            debug!(
                platform = %platform,
                kind = %kind,
                recent = recent,
                cap = cap,
                "Soft-stop threshold reached"
            );
            return Decision::throttled(Reason::ApproachingDailyCap { cap }, FULL_WINDOW_WAIT, true);
        }

        if recent >= cap as usize {
            debug!(
                platform = %platform,
                kind = %kind,
                recent = recent,
                cap = cap,
                "Daily cap exceeded"
            );
            return Decision::throttled(Reason::DailyCapExceeded { cap }, FULL_WINDOW_WAIT, false);
        }

        if recent > 0 {
            // count_recent > 0 guarantees the newest match is inside the window
            if let Some(last) = log.last_occurrence(platform, kind) {
                let elapsed = (now - last).to_std().unwrap_or(Duration::ZERO);
                let target = self.spacing.target_spacing();
                if elapsed < target {
                    let wait = Duration::from_secs((target - elapsed).as_secs_f64().ceil() as u64);
                    debug!(
                        platform = %platform,
                        kind = %kind,
                        elapsed_secs = elapsed.as_secs(),
                        wait_secs = wait.as_secs(),
                        "Minimum spacing not yet elapsed"
                    );
                    return Decision::throttled(Reason::MinimumSpacing, wait, false);
                }
            }
        }

        Decision::Safe
    }

    /// Record a performed action and evict aged history.
    ///
    /// Must be called only after the gated side effect has actually been (or
    /// is irrevocably about to be) performed; calling it beforehand or
    /// skipping it after success breaks the quota's accuracy for subsequent
    /// evaluations. Failure to append is fatal to the guard's safety
    /// guarantee and propagates.
    pub fn record(&self, platform: &str, kind: &str, fingerprint: Fingerprint) -> Result<()> {
        let now = self
            .clock
            .now()
            .map_err(|e| GuardError::AppendFailure(format!("clock read failed: {}", e)))?;

        let mut log = self.log.write();
        log.append(ActionRecord {
            platform: platform.to_string(),
            kind: kind.to_string(),
            occurred_at: now,
            fingerprint,
        })?;

        let (_, retention_cutoff) = ActionLog::window_cutoffs(now);
        log.evict_older_than(retention_cutoff);

        trace!(
            platform = %platform,
            kind = %kind,
            retained = log.len(),
            "Recorded action"
        );
        Ok(())
    }

    /// Read-only listing of all retained records, oldest first. For host-side
    /// display and audit logging.
    pub fn recent_activity(&self) -> Vec<ActionRecord> {
        self.log.read().snapshot()
    }

    /// The limits table this guard was built with.
    pub fn limits(&self) -> &PlatformLimits {
        &self.limits
    }
}

impl Default for RateLimitGuard {
    fn default() -> Self {
        Self::new(PlatformLimits::default())
    }
}

/// Integer soft-stop threshold: the smallest count at or above 80% of the cap.
fn soft_threshold(cap: u32) -> u32 {
    ((cap as u64 * 4).div_ceil(5)) as u32
}
