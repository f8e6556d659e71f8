// Time range model and chunk splitting
use crate::error::{DashboardError, Result};
use chrono::{DateTime, Duration, FixedOffset, SecondsFormat, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start_at: DateTime<FixedOffset>,
    pub end_at: DateTime<FixedOffset>,
}

impl TimeRange {
    pub fn new(start_at: DateTime<FixedOffset>, end_at: DateTime<FixedOffset>) -> Self {
        Self { start_at, end_at }
    }

    /// Construct a range, rejecting `start_at > end_at`.
    pub fn checked(start_at: DateTime<FixedOffset>, end_at: DateTime<FixedOffset>) -> Result<Self> {
        if start_at > end_at {
            return Err(DashboardError::InvalidRange {
                start: start_at,
                end: end_at,
            });
        }
        Ok(Self { start_at, end_at })
    }

    pub fn is_empty(&self) -> bool {
        self.start_at == self.end_at
    }

    /// Split into consecutive sub-ranges of at most `chunk_days` days.
    ///
    /// The cursor loop is inclusive of `end_at`, so a range that divides evenly
    /// ends with a zero-width chunk. A non-positive chunk size yields nothing.
    pub fn split(&self, chunk_days: i64) -> Vec<TimeRange> {
        let mut chunks = Vec::new();
        if chunk_days <= 0 {
            return chunks;
        }

        let step = Duration::days(chunk_days);
        let mut cursor = self.start_at;
        while cursor <= self.end_at {
            let chunk_end = cursor + step;
            chunks.push(TimeRange {
                start_at: cursor,
                end_at: if chunk_end > self.end_at { self.end_at } else { chunk_end },
            });
            cursor += step;
        }

        chunks
    }
}

/// A range as picked in the UI, either endpoint possibly unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingRange {
    pub start_at: Option<DateTime<FixedOffset>>,
    pub end_at: Option<DateTime<FixedOffset>>,
}

impl PendingRange {
    /// `Ok(None)` when not ready to fetch (unset endpoint or zero width).
    pub fn ready(&self) -> Result<Option<TimeRange>> {
        let (Some(start), Some(end)) = (self.start_at, self.end_at) else {
            return Ok(None);
        };
        let range = TimeRange::checked(start, end)?;
        // A zero-width pick is still mid-selection in the UI, not a request
        // for an empty chart; it is skipped rather than fetched.
        if range.is_empty() {
            return Ok(None);
        }
        Ok(Some(range))
    }
}

impl From<TimeRange> for PendingRange {
    fn from(range: TimeRange) -> Self {
        Self {
            start_at: Some(range.start_at),
            end_at: Some(range.end_at),
        }
    }
}

/// Wire format for backend request bodies: UTC, millisecond precision, `Z` suffix.
pub fn to_wire_timestamp(ts: &DateTime<FixedOffset>) -> String {
    ts.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
pub(crate) fn ts(s: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(s).expect("valid rfc3339 timestamp in test")
}
