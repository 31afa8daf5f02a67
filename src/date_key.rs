use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const KEY_FORMAT: &str = "%Y-%m-%d";

/// One calendar day, rendered as `YYYY-MM-DD`.
///
/// Ordering follows the calendar, which is also the lexicographic order of
/// the text form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// The following calendar day.
    pub fn succ(&self) -> Option<Self> {
        self.0.succ_opt().map(Self)
    }

    /// Signed number of days from `earlier` to `self`.
    pub fn days_since(&self, earlier: &DateKey) -> i64 {
        self.0.signed_duration_since(earlier.0).num_days()
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(KEY_FORMAT))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDateKeyError(pub String);

impl fmt::Display for ParseDateKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid date key '{}', expected YYYY-MM-DD", self.0)
    }
}

impl std::error::Error for ParseDateKeyError {}

impl FromStr for DateKey {
    type Err = ParseDateKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // chrono accepts unpadded fields; the key form does not
        if s.len() != 10 {
            return Err(ParseDateKeyError(s.to_string()));
        }
        NaiveDate::parse_from_str(s, KEY_FORMAT)
            .map(Self)
            .map_err(|_| ParseDateKeyError(s.to_string()))
    }
}

impl TryFrom<String> for DateKey {
    type Error = ParseDateKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DateKey> for String {
    fn from(key: DateKey) -> Self {
        key.to_string()
    }
}

/// Source of "today".
pub trait Clock {
    fn today(&self) -> DateKey;
}

/// Device local time truncated to the day.
///
/// The puzzle is meant to roll over on a fixed regional calendar; local time
/// stands in for it, so players far from that region see the boundary shift.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn today(&self) -> DateKey {
        DateKey(Local::now().date_naive())
    }
}

/// Always reports the same day. Used by tests and the `--date` override.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateKey);

impl Clock for FixedClock {
    fn today(&self) -> DateKey {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn today(&self) -> DateKey {
        (**self).today()
    }
}
