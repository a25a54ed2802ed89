use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::primitives::datetime_to_unix_seconds;

/// Dense, strictly increasing position of a sample in time order.
///
/// Indices are assigned by whoever owns real time; the pipeline only
/// orders and compares them.
pub type TimePointIndex = i64;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Normalized sample time in UTC seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimePoint {
    pub timestamp: i64,
}

impl TimePoint {
    #[must_use]
    pub const fn new(timestamp: i64) -> Self {
        Self { timestamp }
    }

    #[must_use]
    pub fn from_datetime(time: DateTime<Utc>) -> Self {
        Self {
            timestamp: datetime_to_unix_seconds(time),
        }
    }
}

/// Time exactly as the host supplied it, carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OriginalTime {
    Timestamp(i64),
    BusinessDay(NaiveDate),
    Text(String),
}

impl From<TimePoint> for OriginalTime {
    fn from(time: TimePoint) -> Self {
        Self::Timestamp(time.timestamp)
    }
}

/// Half-open `[from, to)` range of logical indices visible in the current frame.
///
/// Bounds may reference indices outside the populated store; consumers clamp
/// before dereferencing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisibleRange {
    pub from: TimePointIndex,
    pub to: TimePointIndex,
}

impl VisibleRange {
    #[must_use]
    pub const fn new(from: TimePointIndex, to: TimePointIndex) -> Self {
        Self { from, to }
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.to <= self.from
    }

    #[must_use]
    pub fn contains(self, index: TimePointIndex) -> bool {
        self.from <= index && index < self.to
    }

    /// Clamps this range to positions `0..len` of a dense item buffer.
    #[must_use]
    pub fn clamp_to_len(self, len: usize) -> Option<std::ops::Range<usize>> {
        let len = len as TimePointIndex;
        let from = self.from.clamp(0, len);
        let to = self.to.clamp(0, len);
        if from >= to {
            return None;
        }
        Some(from as usize..to as usize)
    }
}
