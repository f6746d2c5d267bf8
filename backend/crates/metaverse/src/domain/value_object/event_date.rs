//! EventDate Value Object
//!
//! Event start as unsigned epoch milliseconds. Zero is rejected.

use chrono::{DateTime, Utc};

use crate::error::{MetaverseError, MetaverseResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventDate(u64);

impl EventDate {
    pub fn new(epoch_ms: u64) -> MetaverseResult<Self> {
        if epoch_ms == 0 {
            return Err(MetaverseError::validation(
                "event date",
                "must be a positive timestamp",
            ));
        }
        Ok(Self(epoch_ms))
    }

    #[inline]
    pub const fn as_millis(&self) -> u64 {
        self.0
    }

    /// `None` when the value is beyond chrono's range
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        i64::try_from(self.0)
            .ok()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
    }
}

impl TryFrom<i64> for EventDate {
    type Error = MetaverseError;

    fn try_from(value: i64) -> MetaverseResult<Self> {
        let ms = u64::try_from(value).map_err(|_| {
            MetaverseError::validation("event date", "must be a positive timestamp")
        })?;
        EventDate::new(ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let date = EventDate::new(1_735_689_600_000).unwrap();
        assert_eq!(date.as_millis(), 1_735_689_600_000);
        assert_eq!(
            date.to_datetime().unwrap().to_rfc3339(),
            "2025-01-01T00:00:00+00:00"
        );
    }

    #[test]
    fn test_rejects_zero_and_negative() {
        assert!(EventDate::new(0).is_err());
        assert!(EventDate::try_from(-5i64).is_err());
        assert!(EventDate::try_from(42i64).is_ok());
    }

    #[test]
    fn test_far_future_has_no_datetime() {
        let date = EventDate::new(u64::MAX).unwrap();
        assert!(date.to_datetime().is_none());
    }
}
