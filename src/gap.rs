// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Skipped civil time caused by a change of standard offset between rules.

use crate::period::CivilRange;
use crate::rule::AdjustmentRule;
use crate::table::ZoneRules;
use chrono::Duration;
use log::debug;

/// Civil range skipped when `current` hands over to `next`.
///
/// The handover is taken to happen at the end of `current`'s last day. If the
/// standard offset grows (`next.base_utc_offset_delta() >
/// current.base_utc_offset_delta()`, with a missing `next` counting as zero),
/// the clock jumps forward there and the final `delta` of that day never
/// occurs. A shrinking or unchanged offset produces no gap.
///
/// ```
/// use chrono::{Duration, NaiveDate, NaiveTime};
/// use zonegap::{gap_window, AdjustmentRule, TransitionTime};
///
/// let day = |m, d| NaiveDate::from_ymd_opt(1994, m, d).unwrap();
/// let midnight = NaiveTime::from_hms_opt(0, 0, 0).unwrap();
/// let rule = AdjustmentRule::recurring(
///     day(1, 1),
///     day(12, 31),
///     Duration::zero(),
///     TransitionTime::fixed(midnight, 1, 1).unwrap(),
///     TransitionTime::fixed(midnight, 1, 1).unwrap(),
///     Duration::days(-1),
/// )
/// .unwrap();
///
/// let gap = gap_window(&rule, None).unwrap();
/// assert_eq!(gap.start, day(12, 31).and_time(midnight));
/// assert_eq!(gap.end, NaiveDate::from_ymd_opt(1995, 1, 1).unwrap().and_time(midnight));
/// ```
pub fn gap_window(current: &AdjustmentRule, next: Option<&AdjustmentRule>) -> Option<CivilRange> {
    let next_delta = next.map_or_else(Duration::zero, AdjustmentRule::base_utc_offset_delta);
    let Some(delta) = next_delta.checked_sub(&current.base_utc_offset_delta()) else {
        debug!(
            "standard offset change after rule ending {:?} is not representable",
            current.date_end()
        );
        return None;
    };

    if delta <= Duration::zero() {
        debug!(
            "no offset gap after rule ending {:?}: standard offset changes by {}s",
            current.date_end(),
            delta.num_seconds()
        );
        return None;
    }

    let handover = current
        .date_end()
        .as_datetime()
        .checked_add_signed(Duration::days(1))?;
    let start = handover.checked_sub_signed(delta)?;
    Some(CivilRange::new(start, handover))
}

impl ZoneRules {
    /// Every civil range skipped by a standard-offset change between
    /// consecutive rules, in table order.
    pub fn offset_change_gaps(&self) -> Vec<CivilRange> {
        self.rules()
            .iter()
            .enumerate()
            .filter_map(|(index, rule)| gap_window(rule, self.next_rule(index)))
            .collect()
    }
}
