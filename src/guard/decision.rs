//! Guard decisions and throttle reasons.

use std::fmt;
use std::time::Duration;

/// Machine-readable reason an action was not permitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    /// Recent activity has reached 80% of the daily cap
    ApproachingDailyCap { cap: u32 },
    /// Recent activity has reached the daily cap itself
    DailyCapExceeded { cap: u32 },
    /// The minimum spacing since the previous action has not yet elapsed
    MinimumSpacing,
    /// The platform is not present in the limits table; fail closed
    UnknownPlatform,
    /// The time source failed; fail closed
    ClockUnavailable,
}

impl Reason {
    /// Stable identifier for logs and host-side handling.
    pub fn code(&self) -> &'static str {
        match self {
            Reason::ApproachingDailyCap { .. } => "approaching_daily_cap",
            Reason::DailyCapExceeded { .. } => "daily_cap_exceeded",
            Reason::MinimumSpacing => "minimum_spacing",
            Reason::UnknownPlatform => "unknown_platform",
            Reason::ClockUnavailable => "clock_unavailable",
        }
    }

    /// Whether this reason indicates a guard malfunction rather than
    /// ordinary throttling.
    pub fn is_malfunction(&self) -> bool {
        matches!(self, Reason::UnknownPlatform | Reason::ClockUnavailable)
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::ApproachingDailyCap { cap } => {
                write!(f, "reached 80% of the daily cap ({})", cap)
            }
            Reason::DailyCapExceeded { cap } => write!(f, "daily cap of {} exceeded", cap),
            Reason::MinimumSpacing => write!(f, "minimum spacing not yet elapsed"),
            Reason::UnknownPlatform => write!(f, "platform is not configured"),
            Reason::ClockUnavailable => write!(f, "time source unavailable"),
        }
    }
}

/// Outcome of a safety evaluation.
///
/// Throttled outcomes always carry a reason and an advisory wait hint; the
/// guard never sleeps or reschedules on the caller's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The action may proceed
    Safe,
    /// The action must be skipped or deferred
    Throttled {
        reason: Reason,
        /// Advisory hint for how long the caller should wait before retrying
        wait: Duration,
        /// Set when the soft-stop threshold fired and the host should halt
        /// this pair's automation for the rest of the window
        auto_stop: bool,
    },
}

impl Decision {
    pub(crate) fn throttled(reason: Reason, wait: Duration, auto_stop: bool) -> Self {
        Decision::Throttled {
            reason,
            wait,
            auto_stop,
        }
    }

    pub fn is_safe(&self) -> bool {
        matches!(self, Decision::Safe)
    }

    pub fn reason(&self) -> Option<Reason> {
        match self {
            Decision::Safe => None,
            Decision::Throttled { reason, .. } => Some(*reason),
        }
    }

    pub fn wait(&self) -> Option<Duration> {
        match self {
            Decision::Safe => None,
            Decision::Throttled { wait, .. } => Some(*wait),
        }
    }

    pub fn auto_stop(&self) -> bool {
        match self {
            Decision::Safe => false,
            Decision::Throttled { auto_stop, .. } => *auto_stop,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Safe => write!(f, "safe"),
            Decision::Throttled { reason, wait, .. } => {
                write!(f, "throttled: {} (wait {}s)", reason, wait.as_secs())
            }
        }
    }
}
