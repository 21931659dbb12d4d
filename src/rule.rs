// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Adjustment rules: one dated period of a zone's offset behaviour.
//!
//! An [`AdjustmentRule`] covers a range of civil dates (or, for
//! boundary-anchored rules, a range of UTC instants) and carries two deltas
//! on top of the zone's nominal standard offset:
//!
//! - `base_utc_offset_delta`: permanent change of the standard offset while
//!   the rule is active;
//! - `daylight_delta`: extra offset while daylight saving time is in effect.
//!
//! Recurring rules describe their daylight period with a pair of
//! [`TransitionTime`]s. Boundary-anchored rules have no annual pattern: the
//! rule's own start and end *are* the UTC instants of the offset change.

use crate::error::{Result, ZoneRuleError};
use crate::transition::TransitionTime;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One end of an adjustment rule's active range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RuleBoundary {
    /// A civil date. As a start it means 00:00 of that day; as an end it is
    /// inclusive through the last instant of that day.
    Date(NaiveDate),
    /// An exact UTC instant.
    Utc(NaiveDateTime),
}

impl RuleBoundary {
    /// The boundary as a date-time value (midnight for [`RuleBoundary::Date`]).
    #[inline]
    pub fn as_datetime(&self) -> NaiveDateTime {
        match *self {
            Self::Date(date) => date.and_time(NaiveTime::MIN),
            Self::Utc(instant) => instant,
        }
    }

    #[inline]
    pub fn is_utc(&self) -> bool {
        matches!(self, Self::Utc(_))
    }
}

/// How a rule's daylight period is laid out within each year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum DaylightTransitions {
    /// Daylight time runs from `start` to `end` every year.
    Recurring {
        start: TransitionTime,
        end: TransitionTime,
    },
    /// No annual pattern; the rule's boundaries are the UTC instants of the change.
    BoundaryAnchored,
}

/// An immutable record of a zone's offset behaviour over a contiguous period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AdjustmentRule {
    date_start: RuleBoundary,
    date_end: RuleBoundary,
    #[cfg_attr(feature = "serde", serde(with = "duration_seconds"))]
    daylight_delta: Duration,
    #[cfg_attr(feature = "serde", serde(with = "duration_seconds"))]
    base_utc_offset_delta: Duration,
    transitions: DaylightTransitions,
}

impl AdjustmentRule {
    pub fn new(
        date_start: RuleBoundary,
        date_end: RuleBoundary,
        daylight_delta: Duration,
        base_utc_offset_delta: Duration,
        transitions: DaylightTransitions,
    ) -> Result<Self> {
        let rule = Self {
            date_start,
            date_end,
            daylight_delta,
            base_utc_offset_delta,
            transitions,
        };
        rule.validate()?;
        Ok(rule)
    }

    /// A rule with an annual daylight period, active over whole civil dates.
    pub fn recurring(
        date_start: NaiveDate,
        date_end: NaiveDate,
        daylight_delta: Duration,
        transition_start: TransitionTime,
        transition_end: TransitionTime,
        base_utc_offset_delta: Duration,
    ) -> Result<Self> {
        Self::new(
            RuleBoundary::Date(date_start),
            RuleBoundary::Date(date_end),
            daylight_delta,
            base_utc_offset_delta,
            DaylightTransitions::Recurring {
                start: transition_start,
                end: transition_end,
            },
        )
    }

    /// A rule whose start and end are the UTC instants of an offset change.
    pub fn boundary_anchored(
        utc_start: NaiveDateTime,
        utc_end: NaiveDateTime,
        daylight_delta: Duration,
        base_utc_offset_delta: Duration,
    ) -> Result<Self> {
        Self::new(
            RuleBoundary::Utc(utc_start),
            RuleBoundary::Utc(utc_end),
            daylight_delta,
            base_utc_offset_delta,
            DaylightTransitions::BoundaryAnchored,
        )
    }

    /// Checks that the range is not inverted and the transition times are well formed.
    pub fn validate(&self) -> Result<()> {
        if self.date_start.as_datetime() > self.date_end.as_datetime() {
            return Err(ZoneRuleError::InvertedRule {
                start: self.date_start.as_datetime().to_string(),
                end: self.date_end.as_datetime().to_string(),
            });
        }
        if let DaylightTransitions::Recurring { start, end } = self.transitions {
            start.validate()?;
            end.validate()?;
        }
        Ok(())
    }

    #[inline]
    pub fn date_start(&self) -> RuleBoundary {
        self.date_start
    }

    #[inline]
    pub fn date_end(&self) -> RuleBoundary {
        self.date_end
    }

    #[inline]
    pub fn daylight_delta(&self) -> Duration {
        self.daylight_delta
    }

    #[inline]
    pub fn base_utc_offset_delta(&self) -> Duration {
        self.base_utc_offset_delta
    }

    #[inline]
    pub fn transitions(&self) -> DaylightTransitions {
        self.transitions
    }

    #[inline]
    pub fn no_daylight_transitions(&self) -> bool {
        matches!(self.transitions, DaylightTransitions::BoundaryAnchored)
    }

    /// Whether daylight saving is observed at all under this rule.
    #[inline]
    pub fn has_daylight_saving(&self) -> bool {
        !self.daylight_delta.is_zero()
    }

    /// Daylight time is already active when each year begins.
    pub fn is_start_date_marker_for_beginning_of_year(&self) -> bool {
        match self.transitions {
            DaylightTransitions::Recurring { start, .. } => start.is_beginning_of_year_marker(),
            DaylightTransitions::BoundaryAnchored => false,
        }
    }

    /// Daylight time is still active when each year ends.
    pub fn is_end_date_marker_for_end_of_year(&self) -> bool {
        match self.transitions {
            DaylightTransitions::Recurring { end, .. } => end.is_end_of_year_marker(),
            DaylightTransitions::BoundaryAnchored => false,
        }
    }
}

#[cfg(feature = "serde")]
pub(crate) mod duration_seconds {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(value.num_seconds())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let seconds = i64::deserialize(deserializer)?;
        Duration::try_seconds(seconds)
            .ok_or_else(|| serde::de::Error::custom("duration out of range"))
    }
}
