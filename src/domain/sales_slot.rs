use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::SalesSlotId;
use crate::error::{SalesError, SalesResult};

/// A bounded time window during which products may be ordered.
///
/// `is_active` is switched explicitly; it is never derived from the clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesSlot {
    pub id: SalesSlotId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SalesSlot {
    /// New slots start inactive.
    pub fn new(id: SalesSlotId, start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> SalesResult<Self> {
        validate_time_range(start_time, end_time)?;
        let now = Utc::now();
        Ok(Self {
            id,
            start_time,
            end_time,
            is_active: false,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn reschedule(&mut self, start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> SalesResult<()> {
        validate_time_range(start_time, end_time)?;
        self.start_time = start_time;
        self.end_time = end_time;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Returns whether the flag actually changed.
    pub fn set_active(&mut self, is_active: bool) -> bool {
        if self.is_active == is_active {
            return false;
        }
        self.is_active = is_active;
        self.updated_at = Utc::now();
        true
    }

    /// Start inclusive, end exclusive.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start_time <= at && at < self.end_time
    }
}

pub fn validate_time_range(start: DateTime<Utc>, end: DateTime<Utc>) -> SalesResult<()> {
    if end <= start {
        return Err(SalesError::InvalidTimeRange { start, end });
    }
    Ok(())
}
