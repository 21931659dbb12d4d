// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Invalid (skipped) and ambiguous (repeated) civil time.
//!
//! With a positive daylight delta, clocks jump forward at the window start
//! (skipping `[start, start + delta)`) and back at the window end (repeating
//! `[end - delta, end)`). A negative delta, used by zones whose daylight offset
//! is the baseline, mirrors both: the skip happens at the window end and the
//! repeat at the window start.
//!
//! A window whose start is the beginning-of-year marker (or whose end is the
//! end-of-year marker) has no discontinuity on that side: daylight time simply
//! carries over the year boundary.
//!
//! When a computed range straddles December 31 / January 1, the query year may
//! have picked the wrong occurrence of it, so membership is retried with the
//! range shifted one year forward and then one year back.

use crate::daylight::DaylightWindow;
use crate::instant::{DateTimeKind, Timestamp};
use crate::period::CivilRange;
use crate::rule::AdjustmentRule;
use crate::table::ZoneRules;
use chrono::{Datelike, Duration, NaiveDateTime};
use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How a civil timestamp maps onto a zone's timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CivilTimeStatus {
    /// Occurs exactly once.
    Valid,
    /// Never occurs: clocks jumped forward over it.
    Invalid,
    /// Occurs twice: clocks jumped backward through it.
    Ambiguous,
}

/// The skipped range implied by `rule`'s daylight `window`, if any.
pub fn invalid_range(rule: &AdjustmentRule, window: &DaylightWindow) -> Option<CivilRange> {
    let delta = rule.daylight_delta();
    if delta > Duration::zero() {
        if rule.is_start_date_marker_for_beginning_of_year() {
            return None;
        }
        Some(CivilRange::new(window.start, window.start.checked_add_signed(delta)?))
    } else if delta < Duration::zero() {
        if rule.is_end_date_marker_for_end_of_year() {
            return None;
        }
        Some(CivilRange::new(window.end, window.end.checked_sub_signed(delta)?))
    } else {
        None
    }
}

/// The repeated range implied by `rule`'s daylight `window`, if any.
///
/// The earlier instant is always the inclusive bound.
pub fn ambiguous_range(rule: &AdjustmentRule, window: &DaylightWindow) -> Option<CivilRange> {
    let delta = rule.daylight_delta();
    if delta > Duration::zero() {
        if rule.is_end_date_marker_for_end_of_year() {
            return None;
        }
        Some(CivilRange::new(window.end.checked_sub_signed(delta)?, window.end))
    } else if delta < Duration::zero() {
        if rule.is_start_date_marker_for_beginning_of_year() {
            return None;
        }
        Some(CivilRange::new(window.start.checked_add_signed(delta)?, window.start))
    } else {
        None
    }
}

/// Membership with the year-boundary correction.
fn contains_across_years(range: CivilRange, time: NaiveDateTime) -> bool {
    if range.contains(&time) {
        return true;
    }
    if range.start.year() == range.end.year() {
        return false;
    }

    debug!("range {range:?} straddles a year boundary, retrying shifted by one year");
    [1, -1].into_iter().any(|years| {
        range
            .shifted_years(years)
            .is_some_and(|shifted| shifted.contains(&time))
    })
}

impl ZoneRules {
    /// Whether `timestamp` never occurs in this zone.
    ///
    /// Only [`Unspecified`](DateTimeKind::Unspecified) timestamps, and
    /// [`Local`](DateTimeKind::Local) ones when this zone is the local zone, are
    /// classified; anything else is reported as not invalid.
    pub fn is_invalid_time(&self, timestamp: impl Into<Timestamp>) -> bool {
        self.civil_range_containing(timestamp.into(), invalid_range)
    }

    /// Whether `timestamp` occurs twice in this zone.
    ///
    /// Same timestamp-kind rules as [`ZoneRules::is_invalid_time`].
    pub fn is_ambiguous_time(&self, timestamp: impl Into<Timestamp>) -> bool {
        self.civil_range_containing(timestamp.into(), ambiguous_range)
    }

    /// Classifies `timestamp` as valid, invalid or ambiguous.
    pub fn classify(&self, timestamp: impl Into<Timestamp>) -> CivilTimeStatus {
        let timestamp = timestamp.into();
        if self.is_invalid_time(timestamp) {
            CivilTimeStatus::Invalid
        } else if self.is_ambiguous_time(timestamp) {
            CivilTimeStatus::Ambiguous
        } else {
            CivilTimeStatus::Valid
        }
    }

    fn applies_to(&self, kind: DateTimeKind) -> bool {
        match kind {
            DateTimeKind::Unspecified => true,
            DateTimeKind::Local => self.is_local(),
            DateTimeKind::Utc => false,
        }
    }

    fn civil_range_containing(
        &self,
        timestamp: Timestamp,
        range_of: fn(&AdjustmentRule, &DaylightWindow) -> Option<CivilRange>,
    ) -> bool {
        if !self.supports_daylight_saving_time() || !self.applies_to(timestamp.kind) {
            return false;
        }

        let time = timestamp.civil;
        let Some((index, rule)) = self.rule_for(time) else {
            return false;
        };
        if !rule.has_daylight_saving() {
            return false;
        }

        self.daylight_window_for(time.year(), rule, index)
            .and_then(|window| range_of(rule, &window))
            .is_some_and(|range| contains_across_years(range, time))
    }
}
