use chrono::{DateTime, TimeDelta, Utc};

/// Result of a staleness check against the published build.
///
/// The local binary's modification time stands in for its version: the build
/// is stale when the server's copy was modified after the local file was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metadata {
    /// When the published build was last modified, per the server.
    pub updated_at: DateTime<Utc>,
    /// `updated_at` minus the local binary's modification time.
    ///
    /// Positive means the published build is newer.
    pub age_delta: TimeDelta,
}

impl Metadata {
    /// Compare the published build's time with the local binary's.
    pub fn new(updated_at: DateTime<Utc>, local_modified: DateTime<Utc>) -> Self {
        Self {
            updated_at,
            age_delta: updated_at - local_modified,
        }
    }

    /// True when the local binary is older than the published build.
    pub fn outdated(&self) -> bool {
        self.age_delta > TimeDelta::zero()
    }

    /// How many days the local binary is behind, rounded to the nearest day.
    pub fn days_old(&self) -> i64 {
        let hours = self.age_delta.num_milliseconds() as f64 / 3_600_000.0;
        (hours / 24.0 + 0.5) as i64
    }
}
