//! Validation metrics
//!
//! One process-wide metrics value owned by the controller and guarded by a
//! single read/write lock: increments and duration accumulation take the
//! write lock, snapshots take the read lock. Snapshots are computed under
//! the lock so readers never observe a torn state.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

/// Mutable counters updated on every validation call.
#[derive(Debug, Default, Clone)]
pub struct ValidationMetrics {
    /// Validation calls started
    pub total: u64,
    /// Calls that passed every stage
    pub successful: u64,
    /// Calls rejected at any stage
    pub failed: u64,
    /// Cumulative wall-clock time spent validating
    pub duration: Duration,
    /// When the most recent call finished
    pub last_validation_time: Option<DateTime<Utc>>,
}

impl ValidationMetrics {
    /// Records one finished call. Called exactly once per validation,
    /// success or failure.
    pub fn record(&mut self, succeeded: bool, elapsed: Duration) {
        if succeeded {
            self.successful += 1;
        } else {
            self.failed += 1;
        }
        self.duration += elapsed;
        self.last_validation_time = Some(Utc::now());
    }

    /// Derives the read-only snapshot callers see.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let success_rate = if self.total == 0 {
            0.0
        } else {
            self.successful as f64 / self.total as f64 * 100.0
        };
        let average_duration = if self.total == 0 {
            Duration::ZERO
        } else {
            // Saturate rather than truncate when total exceeds u32
            self.duration / u32::try_from(self.total).unwrap_or(u32::MAX)
        };
        MetricsSnapshot {
            total: self.total,
            successful: self.successful,
            failed: self.failed,
            success_rate,
            average_duration,
            last_validation_time: self.last_validation_time,
        }
    }
}

/// A read-consistent view of the metrics at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub total: u64,
    pub successful: u64,
    pub failed: u64,
    /// successful / total * 100, 0 when nothing has run
    pub success_rate: f64,
    /// duration / total, zero when nothing has run
    pub average_duration: Duration,
    pub last_validation_time: Option<DateTime<Utc>>,
}
