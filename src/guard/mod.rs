//! Action gating logic and state management.

mod decision;
mod limiter;
mod log;
mod spacing;

pub use decision::{Decision, Reason};
pub use limiter::RateLimitGuard;
pub use log::{ActionLog, ActionRecord, Fingerprint, DECISION_WINDOW_HOURS, RETENTION_HOURS};
pub use spacing::{FixedSpacing, SpacingSource, UniformSpacing};
