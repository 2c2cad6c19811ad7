//! Actionguard - Safety Rate-Limit Guard
//!
//! This crate implements the safety controller that gates automated
//! social media actions (posts, likes, DMs, comments) against per-platform
//! rate limits. It enforces a rolling 24-hour daily cap, an 80% soft-stop
//! threshold, and a randomized minimum spacing between consecutive actions,
//! and maintains the audit trail needed to evaluate both.

pub mod clock;
pub mod config;
pub mod error;
pub mod guard;
