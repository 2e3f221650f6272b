//! Header clock and deal countdown in the store's local time.
use chrono::{DateTime, Duration, FixedOffset, Offset, TimeZone, Utc};

const CLOCK_FORMAT: &str = "%A, %B %-d, %Y at %I:%M %p";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreClock {
    offset: FixedOffset,
}

impl StoreClock {
    /// `None` when `hours` is not a real UTC offset.
    #[must_use]
    pub fn new(hours: i32) -> Option<Self> {
        if !(-12..=14).contains(&hours) {
            return None;
        }
        FixedOffset::east_opt(hours * 3_600).map(|offset| Self { offset })
    }

    #[must_use]
    pub fn utc() -> Self {
        Self { offset: Utc.fix() }
    }

    #[must_use]
    pub const fn offset(&self) -> FixedOffset {
        self.offset
    }

    #[must_use]
    pub fn local(&self, now: DateTime<Utc>) -> DateTime<FixedOffset> {
        now.with_timezone(&self.offset)
    }

    /// e.g. `Sunday, October 18, 2026 at 09:41 PM`.
    #[must_use]
    pub fn format(&self, now: DateTime<Utc>) -> String {
        self.local(now).format(CLOCK_FORMAT).to_string()
    }

    /// Seconds left until local midnight, when the daily deals reset.
    #[must_use]
    pub fn seconds_until_midnight(&self, now: DateTime<Utc>) -> u64 {
        let local = self.local(now);
        let next_day = local.date_naive() + Duration::days(1);
        let Some(midnight) = next_day
            .and_hms_opt(0, 0, 0)
            .and_then(|naive| self.offset.from_local_datetime(&naive).single())
        else {
            return 0;
        };
        u64::try_from((midnight - local).num_seconds()).unwrap_or(0)
    }
}

/// Build a UTC timestamp from epoch milliseconds, as reported by the browser.
#[must_use]
pub fn utc_from_millis(millis: f64) -> Option<DateTime<Utc>> {
    #[allow(clippy::cast_possible_truncation)]
    let millis = millis as i64;
    DateTime::from_timestamp_millis(millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn formats_in_store_offset() {
        let clock = StoreClock::new(7).unwrap();
        assert_eq!(
            clock.format(at(2026, 10, 18, 14, 41, 5)),
            "Sunday, October 18, 2026 at 09:41 PM"
        );
        assert_eq!(
            clock.format(at(2026, 10, 18, 18, 5, 0)),
            "Monday, October 19, 2026 at 01:05 AM"
        );
    }

    #[test]
    fn midnight_countdown_uses_local_day() {
        let clock = StoreClock::new(7).unwrap();
        assert_eq!(clock.seconds_until_midnight(at(2026, 10, 18, 16, 59, 0)), 60);
        assert_eq!(clock.seconds_until_midnight(at(2026, 10, 18, 17, 0, 0)), 86_400);
    }

    #[test]
    fn rejects_impossible_offsets() {
        assert!(StoreClock::new(15).is_none());
        assert!(StoreClock::new(-13).is_none());
        assert!(StoreClock::new(0).is_some());
    }

    #[test]
    fn converts_browser_millis() {
        let ts = utc_from_millis(1_000.0).unwrap();
        assert_eq!(ts.timestamp(), 1);
    }
}
