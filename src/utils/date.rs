//! UTC datetime utilities without timezone dependencies.
//!
//! Notion hands out timestamps in two shapes: `last_edited_time` as
//! milliseconds since the Unix epoch, and date properties as
//! `YYYY-MM-DD` strings. Both end up as a `DateTimeUtc`, which knows just
//! enough to print the month-style labels used in page headers.
//!
//! # Examples
//!
//! ```ignore
//! let dt = DateTimeUtc::parse("2023-03-15").unwrap();
//! assert_eq!(dt.month_name(), "March");
//! assert_eq!(dt.format_short(), "Mar 15, 2023");
//!
//! let dt = DateTimeUtc::from_unix_millis(1_678_838_400_000).unwrap();
//! assert_eq!(dt.to_rfc3339(), "2023-03-15T00:00:00Z");
//! ```

use anyhow::{Result, bail};

const MONTHS_LONG: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const MONTHS_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// UTC datetime without timezone complexity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTimeUtc {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl DateTimeUtc {
    pub const fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    #[cfg(test)]
    pub const fn from_ymd(year: u16, month: u8, day: u8) -> Self {
        Self::new(year, month, day, 0, 0, 0)
    }

    /// Parse from "YYYY-MM-DD" or "YYYY-MM-DDTHH:MM:SS[.fff]Z" format
    pub fn parse(s: &str) -> Option<Self> {
        let bytes = s.trim().as_bytes();

        // Minimum: "YYYY-MM-DD" (10 chars)
        if bytes.len() < 10 {
            return None;
        }

        let year = parse_u16(&bytes[0..4])?;
        if bytes[4] != b'-' {
            return None;
        }
        let month = parse_u8(&bytes[5..7])?;
        if bytes[7] != b'-' {
            return None;
        }
        let day = parse_u8(&bytes[8..10])?;

        let (hour, minute, second) = if bytes.len() == 10 {
            (0, 0, 0)
        } else if bytes.len() >= 20 && bytes[10] == b'T' && bytes[bytes.len() - 1] == b'Z' {
            if bytes[13] != b':' || bytes[16] != b':' {
                return None;
            }
            // Fractional seconds are accepted and dropped
            let tail = &bytes[19..bytes.len() - 1];
            if !tail.is_empty()
                && (tail[0] != b'.' || !tail[1..].iter().all(u8::is_ascii_digit))
            {
                return None;
            }
            (
                parse_u8(&bytes[11..13])?,
                parse_u8(&bytes[14..16])?,
                parse_u8(&bytes[17..19])?,
            )
        } else {
            return None;
        };

        let dt = Self::new(year, month, day, hour, minute, second);
        dt.validate().ok()?;
        Some(dt)
    }

    /// Build from milliseconds since the Unix epoch.
    ///
    /// Returns `None` for instants before 1970 or past year 9999.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_unix_millis(millis: i64) -> Option<Self> {
        if millis < 0 {
            return None;
        }
        let secs = millis / 1000;
        let days = secs / 86_400;
        let rem = secs % 86_400;

        let (year, month, day) = civil_from_days(days);
        if year > 9999 {
            return None;
        }

        Some(Self::new(
            year as u16,
            month,
            day,
            (rem / 3600) as u8,
            ((rem / 60) % 60) as u8,
            (rem % 60) as u8,
        ))
    }

    pub fn validate(&self) -> Result<()> {
        let Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        } = *self;

        if !(1..=12).contains(&month) {
            bail!("month is invalid: {month}");
        }

        let max_days = Self::days_in_month(year, month);
        if day == 0 || day > max_days {
            bail!("day is invalid: {day}");
        }
        if hour > 23 {
            bail!("hour is invalid: {hour}");
        }
        if minute > 59 {
            bail!("minute is invalid: {minute}");
        }
        if second > 59 {
            bail!("second is invalid: {second}");
        }

        Ok(())
    }

    #[inline]
    #[allow(clippy::manual_is_multiple_of)] // Manual impl for const fn
    const fn is_leap_year(year: u16) -> bool {
        year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
    }

    #[inline]
    const fn days_in_month(year: u16, month: u8) -> u8 {
        match month {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            2 if Self::is_leap_year(year) => 29,
            2 => 28,
            _ => 0,
        }
    }

    /// Full English month name, e.g. `March`.
    pub fn month_name(self) -> &'static str {
        MONTHS_LONG[usize::from(self.month - 1)]
    }

    /// Short date label, e.g. `Mar 15, 2023`.
    pub fn format_short(self) -> String {
        format!(
            "{} {}, {}",
            MONTHS_SHORT[usize::from(self.month - 1)],
            self.day,
            self.year
        )
    }

    /// Format as RFC 3339 (ISO 8601).
    ///
    /// Returns: `YYYY-MM-DDTHH:MM:SSZ`
    pub fn to_rfc3339(self) -> String {
        format!(
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// Days since 1970-01-01 to (year, month, day), proleptic Gregorian.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn civil_from_days(days: i64) -> (i64, u8, u8) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u8;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u8;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

/// Parse 2-digit ASCII number
#[inline]
fn parse_u8(bytes: &[u8]) -> Option<u8> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = bytes[0].wrapping_sub(b'0');
    let d2 = bytes[1].wrapping_sub(b'0');
    if d1 > 9 || d2 > 9 {
        return None;
    }
    Some(d1 * 10 + d2)
}

/// Parse 4-digit ASCII number
#[inline]
fn parse_u16(bytes: &[u8]) -> Option<u16> {
    if bytes.len() != 4 {
        return None;
    }
    let mut result = 0u16;
    for &b in bytes {
        let d = b.wrapping_sub(b'0');
        if d > 9 {
            return None;
        }
        result = result * 10 + u16::from(d);
    }
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_only() {
        let dt = DateTimeUtc::parse("2023-03-15").unwrap();
        assert_eq!(dt, DateTimeUtc::from_ymd(2023, 3, 15));
    }

    #[test]
    fn test_parse_rfc3339() {
        let dt = DateTimeUtc::parse("2024-06-15T14:30:45Z").unwrap();
        assert_eq!(dt, DateTimeUtc::new(2024, 6, 15, 14, 30, 45));
    }

    #[test]
    fn test_parse_fractional_seconds() {
        let dt = DateTimeUtc::parse("2023-03-15T00:00:00.000Z").unwrap();
        assert_eq!(dt, DateTimeUtc::from_ymd(2023, 3, 15));
    }

    #[test]
    fn test_parse_invalid() {
        assert!(DateTimeUtc::parse("").is_none());
        assert!(DateTimeUtc::parse("2023/03/15").is_none());
        assert!(DateTimeUtc::parse("2023-13-01").is_none());
        assert!(DateTimeUtc::parse("2023-02-29").is_none());
        assert!(DateTimeUtc::parse("2023-03-15T00:00:00+01:00").is_none());
    }

    #[test]
    fn test_leap_day() {
        assert!(DateTimeUtc::parse("2024-02-29").is_some());
        assert!(DateTimeUtc::from_ymd(1900, 2, 29).validate().is_err());
        assert!(DateTimeUtc::from_ymd(2000, 2, 29).validate().is_ok());
    }

    #[test]
    fn test_from_unix_millis() {
        assert_eq!(
            DateTimeUtc::from_unix_millis(0),
            Some(DateTimeUtc::from_ymd(1970, 1, 1))
        );
        // 2023-03-15T00:00:00Z
        assert_eq!(
            DateTimeUtc::from_unix_millis(1_678_838_400_000),
            Some(DateTimeUtc::from_ymd(2023, 3, 15))
        );
        // 2024-02-29T12:34:56Z
        assert_eq!(
            DateTimeUtc::from_unix_millis(1_709_210_096_000),
            Some(DateTimeUtc::new(2024, 2, 29, 12, 34, 56))
        );
        assert!(DateTimeUtc::from_unix_millis(-1).is_none());
    }

    #[test]
    fn test_month_labels() {
        let dt = DateTimeUtc::from_ymd(2023, 3, 15);
        assert_eq!(dt.month_name(), "March");
        assert_eq!(dt.format_short(), "Mar 15, 2023");
        assert_eq!(DateTimeUtc::from_ymd(2023, 12, 1).month_name(), "December");
    }

    #[test]
    fn test_to_rfc3339() {
        let dt = DateTimeUtc::new(2024, 1, 5, 9, 3, 7);
        assert_eq!(dt.to_rfc3339(), "2024-01-05T09:03:07Z");
    }
}
