//! UTC timestamps without timezone dependencies.
//!
//! Generated files carry a millisecond timestamp (the browser `Date.now()`
//! convention) and a human readable RFC 3339 header line.

use std::time::{SystemTime, UNIX_EPOCH};

/// UTC datetime without timezone complexity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTimeUtc {
    pub year: i64,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl DateTimeUtc {
    /// Convert seconds since the Unix epoch into a calendar date.
    pub fn from_unix_secs(secs: u64) -> Self {
        let days = (secs / 86_400) as i64;
        let rem = secs % 86_400;

        // Civil-from-days (proleptic Gregorian calendar).
        let z = days + 719_468;
        let era = z.div_euclid(146_097);
        let doe = z.rem_euclid(146_097);
        let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
        let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
        let mp = (5 * doy + 2) / 153;
        let day = (doy - (153 * mp + 2) / 5 + 1) as u8;
        let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u8;
        let year = yoe + era * 400 + i64::from(month <= 2);

        Self {
            year,
            month,
            day,
            hour: (rem / 3_600) as u8,
            minute: ((rem / 60) % 60) as u8,
            second: (rem % 60) as u8,
        }
    }

    /// Format as RFC 3339: `YYYY-MM-DDTHH:MM:SSZ`
    pub fn to_rfc3339(self) -> String {
        format!(
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// RFC 3339 rendering of a millisecond timestamp.
pub fn rfc3339_from_millis(millis: u64) -> String {
    DateTimeUtc::from_unix_secs(millis / 1_000).to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch() {
        assert_eq!(rfc3339_from_millis(0), "1970-01-01T00:00:00Z");
    }

    #[test]
    fn test_known_dates() {
        // 2024-02-29T12:34:56Z (leap day)
        assert_eq!(
            DateTimeUtc::from_unix_secs(1_709_210_096).to_rfc3339(),
            "2024-02-29T12:34:56Z"
        );
        // 2000-01-01T00:00:00Z
        assert_eq!(
            DateTimeUtc::from_unix_secs(946_684_800).to_rfc3339(),
            "2000-01-01T00:00:00Z"
        );
    }
}
