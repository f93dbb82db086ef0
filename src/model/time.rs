//! ADM timestamps.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::AdmError;

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// A non-negative point or span on the file timeline, in nanoseconds.
///
/// Parses both ADM timecode forms: `hh:mm:ss.fffff` (any number of decimal
/// digits) and the fractional `hh:mm:ss.NNNNNSdddd` (`NNNNN / dddd` seconds).
/// Prints `hh:mm:ss.fffff` when five decimals are exact, otherwise nine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time {
    nanos: u64,
}

impl Time {
    pub const ZERO: Time = Time { nanos: 0 };

    #[inline]
    pub const fn from_nanos(nanos: u64) -> Self {
        Self { nanos }
    }

    /// Saturates at the largest representable time.
    #[inline]
    pub const fn from_millis(millis: u64) -> Self {
        Self::from_nanos(millis.saturating_mul(1_000_000))
    }

    /// Saturates at the largest representable time.
    #[inline]
    pub const fn from_secs(secs: u64) -> Self {
        Self::from_nanos(secs.saturating_mul(NANOS_PER_SEC))
    }

    /// Builds a time from `numerator / denominator` seconds, rounding down.
    pub fn from_fraction(numerator: u64, denominator: u64) -> Result<Self, AdmError> {
        if denominator == 0 {
            return Err(AdmError::invalid("time", "fractional denominator is zero"));
        }
        let nanos = numerator as u128 * NANOS_PER_SEC as u128 / denominator as u128;
        u64::try_from(nanos)
            .map(Self::from_nanos)
            .map_err(|_| AdmError::invalid("time", "value out of range"))
    }

    #[inline]
    pub const fn as_nanos(&self) -> u64 {
        self.nanos
    }

    #[inline]
    pub fn as_secs_f64(&self) -> f64 {
        self.nanos as f64 / NANOS_PER_SEC as f64
    }

    pub fn checked_add(self, other: Time) -> Option<Time> {
        self.nanos.checked_add(other.nanos).map(Time::from_nanos)
    }

    pub fn saturating_sub(self, other: Time) -> Time {
        Time::from_nanos(self.nanos.saturating_sub(other.nanos))
    }
}

impl From<std::time::Duration> for Time {
    fn from(d: std::time::Duration) -> Self {
        Time::from_nanos(u64::try_from(d.as_nanos()).unwrap_or(u64::MAX))
    }
}

impl From<Time> for std::time::Duration {
    fn from(t: Time) -> Self {
        std::time::Duration::from_nanos(t.nanos)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_secs = self.nanos / NANOS_PER_SEC;
        let frac = self.nanos % NANOS_PER_SEC;
        let (h, m, s) = (total_secs / 3600, (total_secs / 60) % 60, total_secs % 60);
        if frac % 10_000 == 0 {
            write!(f, "{h:02}:{m:02}:{s:02}.{:05}", frac / 10_000)
        } else {
            write!(f, "{h:02}:{m:02}:{s:02}.{frac:09}")
        }
    }
}

impl FromStr for Time {
    type Err = AdmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || AdmError::invalid("time", format!("malformed timecode '{s}'"));

        let mut parts = s.splitn(3, ':');
        let (Some(h), Some(m), Some(rest)) = (parts.next(), parts.next(), parts.next()) else {
            return Err(bad());
        };
        let (sec, frac) = rest.split_once('.').ok_or_else(bad)?;

        let field = |text: &str| -> Result<u64, AdmError> {
            if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
                return Err(bad());
            }
            text.parse::<u64>().map_err(|_| bad())
        };
        let (h, m, sec) = (field(h)?, field(m)?, field(sec)?);
        if m >= 60 || sec >= 60 {
            return Err(bad());
        }

        let frac_nanos = match frac.split_once('S') {
            Some((numerator, denominator)) => {
                let numerator = field(numerator)?;
                let denominator = field(denominator)?;
                if numerator >= denominator {
                    return Err(bad());
                }
                Time::from_fraction(numerator, denominator)?.as_nanos()
            }
            None => {
                if frac.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(bad());
                }
                // Scale (or truncate) the decimal digits to nanoseconds.
                let digits: String = frac.chars().chain(std::iter::repeat('0')).take(9).collect();
                digits.parse::<u64>().map_err(|_| bad())?
            }
        };

        let whole = h
            .checked_mul(3600)
            .and_then(|v| v.checked_add(m * 60 + sec))
            .and_then(|v| v.checked_mul(NANOS_PER_SEC))
            .and_then(|v| v.checked_add(frac_nanos))
            .ok_or_else(bad)?;
        Ok(Time::from_nanos(whole))
    }
}

impl Serialize for Time {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Time {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal_timecode() {
        let t: Time = "00:01:02.50000".parse().unwrap();
        assert_eq!(t, Time::from_millis(62_500));
        let t: Time = "01:00:00.000000001".parse().unwrap();
        assert_eq!(t.as_nanos(), 3600 * NANOS_PER_SEC + 1);
    }

    #[test]
    fn test_constructors_saturate() {
        assert_eq!(Time::from_secs(u64::MAX).as_nanos(), u64::MAX);
        assert_eq!(Time::from_millis(u64::MAX / 2).as_nanos(), u64::MAX);
        assert_eq!(Time::from_secs(3).as_nanos(), 3 * NANOS_PER_SEC);
    }

    #[test]
    fn test_parse_fractional_timecode() {
        let t: Time = "00:00:01.24000S48000".parse().unwrap();
        assert_eq!(t, Time::from_millis(1_500));
    }

    #[test]
    fn test_display_uses_five_digits_when_exact() {
        assert_eq!(Time::from_millis(2_500).to_string(), "00:00:02.50000");
        assert_eq!(Time::from_nanos(1).to_string(), "00:00:00.000000001");
        assert_eq!(Time::from_secs(3723).to_string(), "01:02:03.00000");
    }

    #[test]
    fn test_malformed_timecodes() {
        for bad in ["", "1:2", "00:00:05", "00:61:00.0", "aa:00:00.0", "00:00:00.5S4", "00:00:00.1S0"] {
            assert!(bad.parse::<Time>().is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn test_duration_conversion() {
        let t = Time::from(std::time::Duration::from_millis(1500));
        assert_eq!(t, Time::from_millis(1500));
        assert_eq!(std::time::Duration::from(t).as_millis(), 1500);
    }

    #[test]
    fn test_saturating_sub() {
        assert_eq!(
            Time::from_secs(2).saturating_sub(Time::from_secs(5)),
            Time::ZERO
        );
    }
}
