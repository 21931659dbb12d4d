// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Half-open civil time intervals.
//!
//! This module provides:
//! - [`Interval<T>`]: generic `[start, end)` interval over any [`TimeInstant`]
//! - [`CivilRange`]: wall-clock alias used for skipped and repeated ranges

use super::TimeInstant;
use chrono::{Duration, NaiveDateTime};
use qtty::{Day, Days, Seconds};

#[cfg(feature = "serde")]
use serde::{ser::SerializeStruct, Deserialize, Deserializer, Serialize, Serializer};

/// Represents the interval `[start, end)` between two instants.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use zonegap::CivilRange;
///
/// let day = NaiveDate::from_ymd_opt(1994, 12, 31).unwrap();
/// let range = CivilRange::new(
///     day.and_hms_opt(0, 0, 0).unwrap(),
///     day.succ_opt().unwrap().and_hms_opt(0, 0, 0).unwrap(),
/// );
///
/// assert!(range.contains(&day.and_hms_opt(12, 0, 0).unwrap()));
/// assert!(!range.contains(&range.end));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval<T: TimeInstant> {
    pub start: T,
    pub end: T,
}

/// Civil (wall-clock) interval alias.
pub type CivilRange = Interval<NaiveDateTime>;

impl<T: TimeInstant> Interval<T> {
    /// Creates a new interval between two time instants.
    pub fn new(start: T, end: T) -> Self {
        Interval { start, end }
    }

    /// Returns the duration of the interval as the difference between end and start.
    pub fn duration(&self) -> T::Duration {
        self.end.difference(&self.start)
    }

    /// Half-open membership: `start <= t < end`.
    #[inline]
    pub fn contains(&self, t: &T) -> bool {
        self.start <= *t && *t < self.end
    }

    /// Both endpoints shifted by `years` calendar years.
    ///
    /// Returns `None` when either endpoint would leave the representable range.
    pub fn shifted_years(&self, years: i32) -> Option<Self> {
        Some(Self::new(
            self.start.checked_add_years(years)?,
            self.end.checked_add_years(years)?,
        ))
    }
}

impl Interval<NaiveDateTime> {
    /// Returns the duration in days as a [`Days`] quantity.
    pub fn duration_days(&self) -> Days {
        const NANOS_PER_SECOND: f64 = 1e9;

        let duration: Duration = self.duration();
        let seconds = match duration.num_nanoseconds() {
            Some(ns) => ns as f64 / NANOS_PER_SECOND,
            // Fallback for spans that do not fit in i64 nanoseconds.
            None => duration.num_seconds() as f64,
        };
        Seconds::new(seconds).to::<Day>()
    }
}

// Serde support for CivilRange
//
// Field names spell out the half-open semantics so serialized ranges are
// unambiguous to consumers outside this crate.
#[cfg(feature = "serde")]
impl Serialize for Interval<NaiveDateTime> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut s = serializer.serialize_struct("CivilRange", 2)?;
        s.serialize_field("from_inclusive", &self.start)?;
        s.serialize_field("to_exclusive", &self.end)?;
        s.end()
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Interval<NaiveDateTime> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            from_inclusive: NaiveDateTime,
            to_exclusive: NaiveDateTime,
        }

        let raw = Raw::deserialize(deserializer)?;
        Ok(Interval::new(raw.from_inclusive, raw.to_exclusive))
    }
}
