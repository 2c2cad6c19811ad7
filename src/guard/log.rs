//! Append-only action log backing the guard's decisions.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{GuardError, Result};

/// Hours of history the decision window looks back over.
pub const DECISION_WINDOW_HOURS: i64 = 24;

/// Hours a record is retained before eviction. Wider than the decision
/// window so the 24-hour count is always backed by in-memory history.
pub const RETENTION_HOURS: i64 = 48;

/// Ceiling on retained records. Eviction keeps the log far below this in
/// normal operation; hitting it means eviction is not keeping up and the
/// guard's count can no longer be trusted to grow.
const MAX_RECORDS: usize = 100_000;

/// A short opaque digest of acted-upon content.
///
/// Retained for audit and display only; it plays no role in safety
/// decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Fingerprint(pub u64);

impl Fingerprint {
    /// Digest a piece of content into a four-digit fingerprint.
    pub fn of(content: &str) -> Self {
        let mut hasher = DefaultHasher::new();
        content.hash(&mut hasher);
        Fingerprint(hasher.finish() % 10_000)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

/// A single recorded automated action. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionRecord {
    /// Platform the action was performed on
    pub platform: String,
    /// Action kind within the platform ("posts", "likes", ...)
    pub kind: String,
    /// When the action occurred
    pub occurred_at: DateTime<Utc>,
    /// Digest of the acted-upon content, for audit
    pub fingerprint: Fingerprint,
}

/// Append-only chronological log of [`ActionRecord`]s.
///
/// Insertion order is chronological order; the only mutations are append and
/// age-based eviction.
#[derive(Debug, Default)]
pub struct ActionLog {
    records: Vec<ActionRecord>,
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record to the log.
    pub fn append(&mut self, record: ActionRecord) -> Result<()> {
        if self.records.len() >= MAX_RECORDS {
            return Err(GuardError::AppendFailure(format!(
                "action log at capacity ({} records)",
                MAX_RECORDS
            )));
        }
        self.records.push(record);
        Ok(())
    }

    /// Drop all records that occurred at or before the cutoff.
    pub fn evict_older_than(&mut self, cutoff: DateTime<Utc>) {
        self.records.retain(|r| r.occurred_at > cutoff);
    }

    /// Count records for a (platform, kind) pair newer than the cutoff.
    pub fn count_recent(&self, platform: &str, kind: &str, cutoff: DateTime<Utc>) -> usize {
        self.records
            .iter()
            .filter(|r| r.platform == platform && r.kind == kind && r.occurred_at > cutoff)
            .count()
    }

    /// Timestamp of the newest record for a (platform, kind) pair.
    pub fn last_occurrence(&self, platform: &str, kind: &str) -> Option<DateTime<Utc>> {
        self.records
            .iter()
            .rev()
            .find(|r| r.platform == platform && r.kind == kind)
            .map(|r| r.occurred_at)
    }

    /// Read-only projection of the retained log, oldest first.
    pub fn snapshot(&self) -> Vec<ActionRecord> {
        self.records.clone()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Cutoff instants for the decision window and retention horizon,
    /// anchored at `now`.
    pub fn window_cutoffs(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        (
            now - Duration::hours(DECISION_WINDOW_HOURS),
            now - Duration::hours(RETENTION_HOURS),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record_at(platform: &str, kind: &str, occurred_at: DateTime<Utc>) -> ActionRecord {
        ActionRecord {
            platform: platform.to_string(),
            kind: kind.to_string(),
            occurred_at,
            fingerprint: Fingerprint(0),
        }
    }

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_append_and_count() {
        let mut log = ActionLog::new();
        let now = base_time();

        log.append(record_at("instagram", "posts", now)).unwrap();
        log.append(record_at("instagram", "likes", now)).unwrap();
        log.append(record_at("tiktok", "posts", now)).unwrap();

        let cutoff = now - Duration::hours(DECISION_WINDOW_HOURS);
        assert_eq!(log.count_recent("instagram", "posts", cutoff), 1);
        assert_eq!(log.count_recent("instagram", "likes", cutoff), 1);
        assert_eq!(log.count_recent("tiktok", "posts", cutoff), 1);
        assert_eq!(log.count_recent("tiktok", "likes", cutoff), 0);
    }

    #[test]
    fn test_count_excludes_records_outside_window() {
        let mut log = ActionLog::new();
        let now = base_time();

        log.append(record_at("instagram", "posts", now - Duration::hours(30)))
            .unwrap();
        log.append(record_at("instagram", "posts", now - Duration::hours(2)))
            .unwrap();

        let (window_cutoff, _) = ActionLog::window_cutoffs(now);
        assert_eq!(log.count_recent("instagram", "posts", window_cutoff), 1);
        // The 30-hour-old record is outside the window but still retained
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_eviction_drops_aged_records() {
        let mut log = ActionLog::new();
        let now = base_time();

        log.append(record_at("instagram", "posts", now - Duration::hours(50)))
            .unwrap();
        log.append(record_at("instagram", "posts", now - Duration::hours(30)))
            .unwrap();
        log.append(record_at("instagram", "posts", now)).unwrap();

        let (_, retention_cutoff) = ActionLog::window_cutoffs(now);
        log.evict_older_than(retention_cutoff);

        assert_eq!(log.len(), 2);
        assert!(log
            .snapshot()
            .iter()
            .all(|r| r.occurred_at > retention_cutoff));
    }

    #[test]
    fn test_last_occurrence_is_newest_match() {
        let mut log = ActionLog::new();
        let now = base_time();

        log.append(record_at("instagram", "posts", now - Duration::minutes(10)))
            .unwrap();
        log.append(record_at("instagram", "posts", now - Duration::minutes(5)))
            .unwrap();
        log.append(record_at("tiktok", "posts", now)).unwrap();

        assert_eq!(
            log.last_occurrence("instagram", "posts"),
            Some(now - Duration::minutes(5))
        );
        assert_eq!(log.last_occurrence("telegram", "posts"), None);
    }

    #[test]
    fn test_snapshot_preserves_insertion_order() {
        let mut log = ActionLog::new();
        let now = base_time();

        for i in 0..5 {
            log.append(record_at("telegram", "messages", now + Duration::seconds(i)))
                .unwrap();
        }

        let snapshot = log.snapshot();
        assert_eq!(snapshot.len(), 5);
        for pair in snapshot.windows(2) {
            assert!(pair[0].occurred_at <= pair[1].occurred_at);
        }
    }

    #[test]
    fn test_append_fails_at_capacity() {
        let mut log = ActionLog::new();
        let now = base_time();

        for _ in 0..MAX_RECORDS {
            log.append(record_at("telegram", "messages", now)).unwrap();
        }

        let err = log
            .append(record_at("telegram", "messages", now))
            .unwrap_err();
        assert!(matches!(err, GuardError::AppendFailure(_)));
    }

    #[test]
    fn test_fingerprint_is_short_and_stable() {
        let a = Fingerprint::of("VIP signals inside");
        let b = Fingerprint::of("VIP signals inside");
        let c = Fingerprint::of("different content");

        assert_eq!(a, b);
        assert!(a.0 < 10_000);
        assert!(c.0 < 10_000);
    }
}
