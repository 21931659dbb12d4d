// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Annual daylight-saving transition points.
//!
//! A [`TransitionTime`] is either a fixed calendar date ("October 1 at
//! 00:00") or a floating weekday rule ("last Sunday of March at 02:00").
//! [`TransitionTime::resolve`] turns it into a concrete civil date-time for a
//! given year.
//!
//! | Variant | Resolution |
//! |---------|------------|
//! | `Fixed { month, day }` | `year-month-day`, day clamped to the month's length |
//! | `Floating { week: 1..=4 }` | the `week`-th `day_of_week` counted from the 1st |
//! | `Floating { week: 5 }` | the last `day_of_week` of the month |

use crate::error::{Result, ZoneRuleError};
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const DAYS_PER_WEEK: u32 = 7;

/// Week number meaning "last occurrence in the month".
pub const LAST_WEEK: u32 = 5;

/// One annual recurrence point of a daylight-saving rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum TransitionTime {
    Fixed {
        month: u32,
        day: u32,
        time_of_day: NaiveTime,
    },
    Floating {
        month: u32,
        /// `1..=4` counts from the 1st; [`LAST_WEEK`] means the last occurrence.
        week: u32,
        day_of_week: Weekday,
        time_of_day: NaiveTime,
    },
}

impl TransitionTime {
    /// A fixed-date transition, e.g. March 15 at 02:00.
    pub fn fixed(time_of_day: NaiveTime, month: u32, day: u32) -> Result<Self> {
        let transition = Self::Fixed {
            month,
            day,
            time_of_day,
        };
        transition.validate()?;
        Ok(transition)
    }

    /// A floating transition, e.g. the last (`week = 5`) Sunday of October at 03:00.
    pub fn floating(
        time_of_day: NaiveTime,
        month: u32,
        week: u32,
        day_of_week: Weekday,
    ) -> Result<Self> {
        let transition = Self::Floating {
            month,
            week,
            day_of_week,
            time_of_day,
        };
        transition.validate()?;
        Ok(transition)
    }

    /// Checks month, day and week ranges.
    pub fn validate(&self) -> Result<()> {
        if !(1..=12).contains(&self.month()) {
            return Err(ZoneRuleError::InvalidTransition(format!(
                "month {} is not in 1..=12",
                self.month()
            )));
        }
        match *self {
            Self::Fixed { day, .. } if !(1..=31).contains(&day) => Err(
                ZoneRuleError::InvalidTransition(format!("day {day} is not in 1..=31")),
            ),
            Self::Floating { week, .. } if !(1..=LAST_WEEK).contains(&week) => Err(
                ZoneRuleError::InvalidTransition(format!("week {week} is not in 1..=5")),
            ),
            _ => Ok(()),
        }
    }

    #[inline]
    pub fn month(&self) -> u32 {
        match *self {
            Self::Fixed { month, .. } | Self::Floating { month, .. } => month,
        }
    }

    #[inline]
    pub fn time_of_day(&self) -> NaiveTime {
        match *self {
            Self::Fixed { time_of_day, .. } | Self::Floating { time_of_day, .. } => time_of_day,
        }
    }

    #[inline]
    pub fn is_fixed_date_rule(&self) -> bool {
        matches!(self, Self::Fixed { .. })
    }

    /// Resolves this transition to a civil date-time in `year`.
    ///
    /// Returns `None` only when `year` (or the transition's month) lies outside
    /// the representable calendar.
    pub fn resolve(&self, year: i32) -> Option<NaiveDateTime> {
        let date = match *self {
            Self::Fixed { month, day, .. } => {
                let day = day.clamp(1, days_in_month(year, month)?);
                NaiveDate::from_ymd_opt(year, month, day)?
            }
            Self::Floating {
                month,
                week,
                day_of_week,
                ..
            } if week < LAST_WEEK => {
                let first = NaiveDate::from_ymd_opt(year, month, 1)?;
                let lead = (DAYS_PER_WEEK + day_of_week.num_days_from_sunday()
                    - first.weekday().num_days_from_sunday())
                    % DAYS_PER_WEEK;
                let day = 1 + lead + DAYS_PER_WEEK * week.saturating_sub(1);
                NaiveDate::from_ymd_opt(year, month, day)?
            }
            Self::Floating {
                month, day_of_week, ..
            } => {
                let last = NaiveDate::from_ymd_opt(year, month, days_in_month(year, month)?)?;
                let lag = (DAYS_PER_WEEK + last.weekday().num_days_from_sunday()
                    - day_of_week.num_days_from_sunday())
                    % DAYS_PER_WEEK;
                NaiveDate::from_ymd_opt(year, month, last.day() - lag)?
            }
        };
        Some(date.and_time(self.time_of_day()))
    }

    /// "January 1 at 00:00:00" (sub-second tolerance): daylight time is
    /// already in effect when the year begins.
    pub fn is_beginning_of_year_marker(&self) -> bool {
        match *self {
            Self::Fixed {
                month: 1,
                day: 1,
                time_of_day,
            } => time_of_day.num_seconds_from_midnight() == 0,
            _ => false,
        }
    }

    /// Daylight time is still in effect when the year ends.
    ///
    /// The marker is "December 31 just before midnight of the next day": a
    /// time of day in the last second of December 31. A transition already
    /// normalized onto that midnight, January 1 within its first second, is
    /// accepted as the same marker.
    pub fn is_end_of_year_marker(&self) -> bool {
        const LAST_SECOND_OF_DAY: u32 = 86_399;

        match *self {
            Self::Fixed {
                month: 1,
                day: 1,
                time_of_day,
            } => time_of_day.num_seconds_from_midnight() == 0,
            Self::Fixed {
                month: 12,
                day: 31,
                time_of_day,
            } => time_of_day.num_seconds_from_midnight() >= LAST_SECOND_OF_DAY,
            _ => false,
        }
    }
}

/// Number of days in `month` of `year`, or `None` for an unrepresentable month.
pub(crate) fn days_in_month(year: i32, month: u32) -> Option<u32> {
    if month == 12 {
        // Avoid building January of `year + 1`, which may not be representable.
        return NaiveDate::from_ymd_opt(year, 12, 31).map(|_| 31);
    }
    NaiveDate::from_ymd_opt(year, month + 1, 1)?
        .pred_opt()
        .map(|d| d.day())
}
