//! Wall-clock Time
//!
//! Calendar timestamps used to stamp accounting entries, and the `Clock`
//! trait through which the dispatcher reads the current time.

use core::fmt;

/// A broken-down UTC calendar time.
///
/// Fields are ordered most significant first, so the derived ordering is
/// chronological.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RtcDate {
    pub year: u32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

const SECS_PER_DAY: u64 = 86_400;

impl RtcDate {
    /// Convert seconds since the Unix epoch into a calendar date.
    pub fn from_unix_seconds(secs: u64) -> Self {
        let days = (secs / SECS_PER_DAY) as i64;
        let rem = secs % SECS_PER_DAY;

        // Days-to-civil over 400-year eras, with years starting in March.
        let z = days + 719_468;
        let era = z.div_euclid(146_097);
        let doe = z.rem_euclid(146_097);
        let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
        let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
        let mp = (5 * doy + 2) / 153;
        let day = doy - (153 * mp + 2) / 5 + 1;
        let month = if mp < 10 { mp + 3 } else { mp - 9 };
        let year = yoe + era * 400 + i64::from(month <= 2);

        Self {
            year: year as u32,
            month: month as u8,
            day: day as u8,
            hour: (rem / 3_600) as u8,
            minute: (rem / 60 % 60) as u8,
            second: (rem % 60) as u8,
        }
    }
}

impl fmt::Display for RtcDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// Source of the current wall-clock time.
pub trait Clock: Sync {
    fn now(&self) -> RtcDate;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch() {
        let date = RtcDate::from_unix_seconds(0);
        assert_eq!(date.to_string(), "1970-01-01 00:00:00");
    }

    #[test]
    fn test_leap_day() {
        let date = RtcDate::from_unix_seconds(951_782_400);
        assert_eq!((date.year, date.month, date.day), (2000, 2, 29));
    }

    #[test]
    fn test_time_of_day() {
        assert_eq!(
            RtcDate::from_unix_seconds(1_700_000_000).to_string(),
            "2023-11-14 22:13:20"
        );
        assert_eq!(
            RtcDate::from_unix_seconds(4_102_444_799).to_string(),
            "2099-12-31 23:59:59"
        );
    }

    #[test]
    fn test_ordering_is_chronological() {
        let earlier = RtcDate::from_unix_seconds(1_699_999_999);
        let later = RtcDate::from_unix_seconds(1_700_000_000);
        assert!(earlier < later);
    }
}
