//! Value types shared by annotations that end up as nginx directive arguments.
//!
//! # Design Decisions
//! - `Size` and `Time` keep the raw annotation text; an invalid value is
//!   representable and only rejected when `validate()` is asked
//! - Grammars follow the nginx documentation ("Syntax" section)
//! - Parsed values are exposed as `Option` so callers never see a panic

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Setting that accepts `on` or `off`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnOff {
    On,
    Off,
}

impl OnOff {
    pub fn as_str(&self) -> &'static str {
        match self {
            OnOff::On => "on",
            OnOff::Off => "off",
        }
    }

    pub fn is_on(&self) -> bool {
        matches!(self, OnOff::On)
    }
}

impl From<bool> for OnOff {
    fn from(enabled: bool) -> Self {
        if enabled {
            OnOff::On
        } else {
            OnOff::Off
        }
    }
}

impl fmt::Display for OnOff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is neither `on` nor `off`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid on/off value {0:?}")]
pub struct ParseOnOffError(pub String);

impl FromStr for OnOff {
    type Err = ParseOnOffError;

    // nginx compares flag arguments case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("on") {
            Ok(OnOff::On)
        } else if s.eq_ignore_ascii_case("off") {
            Ok(OnOff::Off)
        } else {
            Err(ParseOnOffError(s.to_string()))
        }
    }
}

/// Size in bytes, kilobytes (suffix `k`/`K`) or megabytes (suffix `m`/`M`),
/// e.g. `"1024"`, `"8k"`, `"1m"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Size(String);

impl Size {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the value follows the size grammar.
    pub fn validate(&self) -> bool {
        self.bytes().is_some()
    }

    /// Number of bytes denoted by the value, `None` if invalid or overflowing.
    pub fn bytes(&self) -> Option<u64> {
        let raw = self.0.as_str();
        let (digits, multiplier) = match raw.as_bytes().last()? {
            b'k' | b'K' => (&raw[..raw.len() - 1], 1024),
            b'm' | b'M' => (&raw[..raw.len() - 1], 1024 * 1024),
            _ => (raw, 1),
        };

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        digits.parse::<u64>().ok()?.checked_mul(multiplier)
    }
}

impl From<&str> for Size {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Size {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Time interval made of one or more `<number><unit>` pairs.
///
/// Units, from least to most significant:
///
/// | suffix | meaning |
/// |---|---|
/// | `ms` | milliseconds |
/// | `s` | seconds |
/// | `m` | minutes |
/// | `h` | hours |
/// | `d` | days |
/// | `w` | weeks |
/// | `M` | months, 30 days |
/// | `y` | years, 365 days |
///
/// Pairs must appear from the most to the least significant unit and may be
/// separated by whitespace, so `"1h 30m"`, `"90m"` and `"5400s"` are the same
/// interval. A number without a suffix means seconds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Time(String);

impl Time {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the value follows the time grammar.
    pub fn validate(&self) -> bool {
        self.duration().is_some()
    }

    /// Interval denoted by the value, `None` if invalid or overflowing.
    pub fn duration(&self) -> Option<Duration> {
        parse_time_millis(&self.0).map(Duration::from_millis)
    }
}

impl From<&str> for Time {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Time {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

const MILLIS_PER_SECOND: u64 = 1000;
const MILLIS_PER_MINUTE: u64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: u64 = 60 * MILLIS_PER_MINUTE;
const MILLIS_PER_DAY: u64 = 24 * MILLIS_PER_HOUR;

/// Returns (milliseconds per unit, significance rank) for the unit at `pos`,
/// plus the number of bytes the suffix occupies.
fn time_unit(bytes: &[u8], pos: usize) -> Option<(u64, u8, usize)> {
    match bytes.get(pos) {
        Some(b'm') if bytes.get(pos + 1) == Some(&b's') => Some((1, 0, 2)),
        Some(b's') => Some((MILLIS_PER_SECOND, 1, 1)),
        Some(b'm') => Some((MILLIS_PER_MINUTE, 2, 1)),
        Some(b'h') => Some((MILLIS_PER_HOUR, 3, 1)),
        Some(b'd') => Some((MILLIS_PER_DAY, 4, 1)),
        Some(b'w') => Some((7 * MILLIS_PER_DAY, 5, 1)),
        Some(b'M') => Some((30 * MILLIS_PER_DAY, 6, 1)),
        Some(b'y') => Some((365 * MILLIS_PER_DAY, 7, 1)),
        // bare number
        None => Some((MILLIS_PER_SECOND, 1, 0)),
        Some(b) if b.is_ascii_whitespace() => Some((MILLIS_PER_SECOND, 1, 0)),
        Some(_) => None,
    }
}

fn parse_time_millis(raw: &str) -> Option<u64> {
    let bytes = raw.trim().as_bytes();
    if bytes.is_empty() {
        return None;
    }

    let mut pos = 0;
    let mut total: u64 = 0;
    let mut last_rank: Option<u8> = None;

    while pos < bytes.len() {
        let start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        if pos == start {
            return None;
        }

        // digits only, so from_utf8 cannot fail
        let magnitude: u64 = std::str::from_utf8(&bytes[start..pos]).ok()?.parse().ok()?;
        let (unit_millis, rank, suffix_len) = time_unit(bytes, pos)?;
        pos += suffix_len;

        if last_rank.is_some_and(|prev| rank >= prev) {
            return None;
        }
        last_rank = Some(rank);

        total = total.checked_add(magnitude.checked_mul(unit_millis)?)?;

        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
    }

    Some(total)
}
