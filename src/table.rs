// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! The ordered rule table of one zone.
//!
//! [`ZoneRules`] owns a zone's [`AdjustmentRule`]s together with the zone-wide
//! data they are relative to: the nominal standard offset and whether the zone
//! observes daylight saving at all. Rules are validated once at construction
//! (ordering, non-overlap, offset range) and never mutated afterwards, so a
//! `ZoneRules` can be shared freely between threads.
//!
//! Lookup is a binary search. Civil-dated rule boundaries are compared against
//! the query's calendar date; UTC-anchored boundaries are compared against the
//! query converted to UTC, using the *previous* rule's offset for the start
//! boundary and the rule's own offset for the end boundary.

use crate::error::{Result, ZoneRuleError};
use crate::rule::{AdjustmentRule, RuleBoundary};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use log::{debug, trace};
use std::cmp::Ordering;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest magnitude, in hours, of the UTC offset a rule may produce.
pub const MAX_UTC_OFFSET_HOURS: i64 = 14;

/// A zone's validated, immutable rule table.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "ZoneRulesConfig", into = "ZoneRulesConfig"))]
pub struct ZoneRules {
    base_utc_offset: Duration,
    supports_daylight_saving_time: bool,
    rules: Vec<AdjustmentRule>,
    is_local: bool,
}

impl ZoneRules {
    /// Builds a rule table, failing fast on malformed rule data.
    ///
    /// # Errors
    ///
    /// - [`ZoneRuleError::InvertedRule`] / [`ZoneRuleError::InvalidTransition`] for a bad rule;
    /// - [`ZoneRuleError::Unordered`] when a rule ends after its successor starts;
    /// - [`ZoneRuleError::BaseOffsetOutOfRange`] / [`ZoneRuleError::OffsetOutOfRange`] when the
    ///   base offset or a rule's offset exceeds [`MAX_UTC_OFFSET_HOURS`].
    pub fn new(
        base_utc_offset: Duration,
        supports_daylight_saving_time: bool,
        rules: Vec<AdjustmentRule>,
    ) -> Result<Self> {
        let max_offset = Duration::hours(MAX_UTC_OFFSET_HOURS);
        if base_utc_offset.abs() > max_offset {
            return Err(ZoneRuleError::BaseOffsetOutOfRange {
                offset: base_utc_offset,
            });
        }

        for (index, rule) in rules.iter().enumerate() {
            rule.validate()?;

            let mut offset = base_utc_offset;
            for delta in [rule.base_utc_offset_delta(), rule.daylight_delta()] {
                offset = match offset.checked_add(&delta) {
                    Some(sum) if sum.abs() <= max_offset => sum,
                    // The running offset is in range, so only an out-of-range delta overflows.
                    sum => {
                        return Err(ZoneRuleError::OffsetOutOfRange {
                            index,
                            offset: sum.unwrap_or(delta),
                        })
                    }
                };
            }
        }

        for (previous, pair) in rules.windows(2).enumerate() {
            let (end, start) = match (pair[0].date_end(), pair[1].date_start()) {
                (RuleBoundary::Utc(end), RuleBoundary::Utc(start)) => (end, start),
                (RuleBoundary::Date(end), RuleBoundary::Date(start)) => {
                    (end.and_time(NaiveTime::MIN), start.and_time(NaiveTime::MIN))
                }
                // Mixed kinds meet in civil time under the outgoing rule's offset.
                (end, start) => (
                    civil_end(base_utc_offset, &pair[0], end),
                    boundary_to_civil(base_utc_offset, &pair[0], start),
                ),
            };
            if end > start {
                return Err(ZoneRuleError::Unordered {
                    previous,
                    next: previous + 1,
                });
            }
        }

        debug!(
            "built zone rules: {} adjustment rules, base offset {}s, daylight saving {}",
            rules.len(),
            base_utc_offset.num_seconds(),
            supports_daylight_saving_time
        );

        Ok(Self {
            base_utc_offset,
            supports_daylight_saving_time,
            rules,
            is_local: false,
        })
    }

    /// Marks whether this zone is the caller's local zone.
    ///
    /// Only a local zone classifies [`DateTimeKind::Local`](crate::DateTimeKind::Local)
    /// timestamps.
    pub fn with_local(mut self, is_local: bool) -> Self {
        self.is_local = is_local;
        self
    }

    #[inline]
    pub fn base_utc_offset(&self) -> Duration {
        self.base_utc_offset
    }

    #[inline]
    pub fn supports_daylight_saving_time(&self) -> bool {
        self.supports_daylight_saving_time
    }

    #[inline]
    pub fn is_local(&self) -> bool {
        self.is_local
    }

    #[inline]
    pub fn rules(&self) -> &[AdjustmentRule] {
        &self.rules
    }

    /// The rule in effect at civil time `date_time`, with its index.
    ///
    /// Returns `None` before the first rule, after the last one, and in any
    /// hole between two rules.
    pub fn rule_for(&self, date_time: NaiveDateTime) -> Option<(usize, &AdjustmentRule)> {
        let date = date_time.date();
        let mut low = 0usize;
        let mut high = self.rules.len();

        while low < high {
            let median = low + (high - low) / 2;
            let rule = &self.rules[median];
            let previous = self.previous_rule(median).unwrap_or(rule);

            match self.compare_rule_to(rule, previous, date_time, date) {
                Ordering::Equal => {
                    trace!("{date_time} falls under adjustment rule {median}");
                    return Some((median, rule));
                }
                Ordering::Less => low = median + 1,
                Ordering::Greater => high = median,
            }
        }

        trace!("no adjustment rule in effect at {date_time}");
        None
    }

    /// Where `rule` lies relative to the query: `Less` if it ends before it,
    /// `Greater` if it starts after it, `Equal` if it covers it.
    fn compare_rule_to(
        &self,
        rule: &AdjustmentRule,
        previous: &AdjustmentRule,
        date_time: NaiveDateTime,
        date: NaiveDate,
    ) -> Ordering {
        let is_after_start = match rule.date_start() {
            RuleBoundary::Utc(start) => {
                // The change happens while the previous rule's offset is still in force.
                self.convert_to_utc(
                    date_time,
                    previous.daylight_delta(),
                    previous.base_utc_offset_delta(),
                ) >= start
            }
            RuleBoundary::Date(start) => date >= start,
        };
        if !is_after_start {
            return Ordering::Greater;
        }

        let is_before_end = match rule.date_end() {
            RuleBoundary::Utc(end) => {
                self.convert_to_utc(date_time, rule.daylight_delta(), rule.base_utc_offset_delta())
                    <= end
            }
            RuleBoundary::Date(end) => date <= end,
        };
        if is_before_end {
            Ordering::Equal
        } else {
            Ordering::Less
        }
    }

    /// The rule immediately before `index`, or `None` at the start of the table.
    #[inline]
    pub fn previous_rule(&self, index: usize) -> Option<&AdjustmentRule> {
        index.checked_sub(1).and_then(|i| self.rules.get(i))
    }

    /// The rule immediately after `index`, or `None` at the end of the table.
    #[inline]
    pub fn next_rule(&self, index: usize) -> Option<&AdjustmentRule> {
        index.checked_add(1).and_then(|i| self.rules.get(i))
    }

    /// UTC → zone civil time under the given deltas, saturating at the
    /// representable range.
    pub fn convert_from_utc(
        &self,
        utc: NaiveDateTime,
        daylight_delta: Duration,
        base_utc_offset_delta: Duration,
    ) -> NaiveDateTime {
        shift_saturating(
            utc,
            self.base_utc_offset + daylight_delta + base_utc_offset_delta,
        )
    }

    /// Zone civil time → UTC under the given deltas, saturating at the
    /// representable range.
    pub fn convert_to_utc(
        &self,
        civil: NaiveDateTime,
        daylight_delta: Duration,
        base_utc_offset_delta: Duration,
    ) -> NaiveDateTime {
        shift_saturating(
            civil,
            -(self.base_utc_offset + daylight_delta + base_utc_offset_delta),
        )
    }
}

fn boundary_to_civil(
    base_utc_offset: Duration,
    rule: &AdjustmentRule,
    boundary: RuleBoundary,
) -> NaiveDateTime {
    match boundary {
        RuleBoundary::Utc(instant) => shift_saturating(
            instant,
            base_utc_offset + rule.daylight_delta() + rule.base_utc_offset_delta(),
        ),
        RuleBoundary::Date(_) => boundary.as_datetime(),
    }
}

/// Exclusive civil end of a rule: a date end covers its whole day.
fn civil_end(
    base_utc_offset: Duration,
    rule: &AdjustmentRule,
    boundary: RuleBoundary,
) -> NaiveDateTime {
    match boundary {
        RuleBoundary::Date(end) => end
            .succ_opt()
            .map_or(NaiveDateTime::MAX, |next| next.and_time(NaiveTime::MIN)),
        RuleBoundary::Utc(_) => boundary_to_civil(base_utc_offset, rule, boundary),
    }
}

fn shift_saturating(value: NaiveDateTime, offset: Duration) -> NaiveDateTime {
    value
        .checked_add_signed(offset)
        .unwrap_or(if offset > Duration::zero() {
            NaiveDateTime::MAX
        } else {
            NaiveDateTime::MIN
        })
}

/// Serialized form of [`ZoneRules`] as supplied by a zone-data provider.
///
/// Deserializing a `ZoneRules` goes through [`ZoneRules::new`], so malformed
/// rule data is rejected on load.
#[cfg(feature = "serde")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneRulesConfig {
    /// Nominal standard offset, in seconds.
    #[serde(with = "crate::rule::duration_seconds")]
    pub base_utc_offset: Duration,
    pub supports_daylight_saving_time: bool,
    pub rules: Vec<AdjustmentRule>,
    #[serde(default)]
    pub is_local: bool,
}

#[cfg(feature = "serde")]
impl TryFrom<ZoneRulesConfig> for ZoneRules {
    type Error = ZoneRuleError;

    fn try_from(config: ZoneRulesConfig) -> Result<Self> {
        Ok(ZoneRules::new(
            config.base_utc_offset,
            config.supports_daylight_saving_time,
            config.rules,
        )?
        .with_local(config.is_local))
    }
}

#[cfg(feature = "serde")]
impl From<ZoneRules> for ZoneRulesConfig {
    fn from(zone: ZoneRules) -> Self {
        Self {
            base_utc_offset: zone.base_utc_offset,
            supports_daylight_saving_time: zone.supports_daylight_saving_time,
            rules: zone.rules,
            is_local: zone.is_local,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transition::TransitionTime;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(h, min, 0).unwrap()
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn plain_rule(start: NaiveDate, end: NaiveDate) -> AdjustmentRule {
        AdjustmentRule::recurring(
            start,
            end,
            Duration::hours(1),
            TransitionTime::floating(hm(2, 0), 3, 5, Weekday::Sun).unwrap(),
            TransitionTime::floating(hm(3, 0), 10, 5, Weekday::Sun).unwrap(),
            Duration::zero(),
        )
        .unwrap()
    }

    fn three_rule_zone() -> ZoneRules {
        ZoneRules::new(
            Duration::hours(1),
            true,
            vec![
                plain_rule(date(1981, 1, 1), date(1995, 12, 31)),
                plain_rule(date(1996, 1, 1), date(2009, 12, 31)),
                plain_rule(date(2010, 1, 1), date(9999, 12, 31)),
            ],
        )
        .unwrap()
    }

    /// Asunción-like: a one-off boundary-anchored daylight period between two
    /// standard periods, base offset -03:00.
    fn anchored_zone() -> ZoneRules {
        ZoneRules::new(
            Duration::hours(-3),
            true,
            vec![
                AdjustmentRule::boundary_anchored(
                    at(2024, 3, 24, 3, 0),
                    date(2024, 10, 6).and_hms_milli_opt(3, 59, 59, 999).unwrap(),
                    Duration::zero(),
                    Duration::hours(-1),
                )
                .unwrap(),
                AdjustmentRule::boundary_anchored(
                    at(2024, 10, 6, 4, 0),
                    date(2024, 10, 15).and_hms_milli_opt(2, 59, 59, 999).unwrap(),
                    Duration::hours(1),
                    Duration::hours(-1),
                )
                .unwrap(),
                plain_rule(date(2024, 10, 15), date(9999, 12, 31)),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_rule_for_finds_each_civil_rule() {
        let zone = three_rule_zone();
        assert_eq!(zone.rule_for(at(1990, 6, 1, 12, 0)).map(|(i, _)| i), Some(0));
        assert_eq!(zone.rule_for(at(2000, 6, 1, 12, 0)).map(|(i, _)| i), Some(1));
        assert_eq!(zone.rule_for(at(2025, 6, 1, 12, 0)).map(|(i, _)| i), Some(2));
    }

    #[test]
    fn test_rule_for_civil_end_is_inclusive_through_the_day() {
        let zone = three_rule_zone();
        let last_instant = date(1995, 12, 31).and_hms_milli_opt(23, 59, 59, 999).unwrap();
        assert_eq!(zone.rule_for(last_instant).map(|(i, _)| i), Some(0));
        assert_eq!(zone.rule_for(at(1996, 1, 1, 0, 0)).map(|(i, _)| i), Some(1));
    }

    #[test]
    fn test_rule_for_outside_table_is_none() {
        let zone = three_rule_zone();
        assert!(zone.rule_for(at(1970, 1, 1, 0, 0)).is_none());

        let bounded = ZoneRules::new(
            Duration::hours(1),
            true,
            vec![plain_rule(date(2000, 1, 1), date(2000, 12, 31))],
        )
        .unwrap();
        assert!(bounded.rule_for(at(2001, 1, 1, 0, 0)).is_none());
        assert!(bounded.rule_for(at(1999, 12, 31, 23, 59)).is_none());
    }

    #[test]
    fn test_rule_for_hole_between_rules_is_none() {
        let zone = ZoneRules::new(
            Duration::zero(),
            true,
            vec![
                plain_rule(date(2000, 1, 1), date(2000, 12, 31)),
                plain_rule(date(2002, 1, 1), date(2002, 12, 31)),
            ],
        )
        .unwrap();
        assert!(zone.rule_for(at(2001, 6, 1, 0, 0)).is_none());
    }

    #[test]
    fn test_rule_for_empty_table_is_none() {
        let zone = ZoneRules::new(Duration::zero(), false, Vec::new()).unwrap();
        assert!(zone.rule_for(at(2025, 1, 1, 0, 0)).is_none());
    }

    #[test]
    fn test_rule_for_utc_start_uses_previous_offset() {
        let zone = anchored_zone();
        // 00:00 local at -04:00 is 04:00 UTC, exactly the change.
        assert_eq!(zone.rule_for(at(2024, 10, 6, 0, 0)).map(|(i, _)| i), Some(1));
        // One minute earlier still belongs to the outgoing rule.
        assert_eq!(zone.rule_for(at(2024, 10, 5, 23, 59)).map(|(i, _)| i), Some(0));
    }

    #[test]
    fn test_rule_for_utc_end_uses_own_offset() {
        let zone = anchored_zone();
        // Rule 1 runs at -03:00 and ends 02:59:59.999 UTC on the 15th.
        assert_eq!(zone.rule_for(at(2024, 10, 14, 23, 59)).map(|(i, _)| i), Some(1));
        assert_eq!(zone.rule_for(at(2024, 10, 15, 0, 0)).map(|(i, _)| i), Some(2));
    }

    #[test]
    fn test_neighbours_are_none_at_table_edges() {
        let zone = three_rule_zone();
        assert!(zone.previous_rule(0).is_none());
        assert_eq!(zone.previous_rule(1), Some(&zone.rules()[0]));
        assert_eq!(zone.next_rule(1), Some(&zone.rules()[2]));
        assert!(zone.next_rule(2).is_none());
        assert!(zone.next_rule(usize::MAX).is_none());
    }

    #[test]
    fn test_convert_round_trip() {
        let zone = three_rule_zone();
        let utc = at(2025, 3, 30, 1, 0);
        let local = zone.convert_from_utc(utc, Duration::hours(1), Duration::zero());
        assert_eq!(local, at(2025, 3, 30, 3, 0));
        assert_eq!(
            zone.convert_to_utc(local, Duration::hours(1), Duration::zero()),
            utc
        );
    }

    #[test]
    fn test_convert_saturates() {
        let zone = three_rule_zone();
        assert_eq!(
            zone.convert_from_utc(NaiveDateTime::MAX, Duration::zero(), Duration::zero()),
            NaiveDateTime::MAX
        );
        assert_eq!(
            zone.convert_to_utc(NaiveDateTime::MIN, Duration::zero(), Duration::zero()),
            NaiveDateTime::MIN
        );
    }

    #[test]
    fn test_unordered_rules_are_rejected() {
        let err = ZoneRules::new(
            Duration::zero(),
            true,
            vec![
                plain_rule(date(2010, 1, 1), date(2020, 12, 31)),
                plain_rule(date(2000, 1, 1), date(2009, 12, 31)),
            ],
        )
        .unwrap_err();
        assert_eq!(
            err,
            ZoneRuleError::Unordered {
                previous: 0,
                next: 1
            }
        );
    }

    #[test]
    fn test_overlapping_rules_are_rejected() {
        let result = ZoneRules::new(
            Duration::zero(),
            true,
            vec![
                plain_rule(date(2000, 1, 1), date(2010, 12, 31)),
                plain_rule(date(2010, 6, 1), date(2020, 12, 31)),
            ],
        );
        assert!(matches!(result, Err(ZoneRuleError::Unordered { .. })));
    }

    #[test]
    fn test_touching_rules_are_accepted() {
        let zone = ZoneRules::new(
            Duration::zero(),
            false,
            vec![
                plain_rule(date(2024, 3, 24), date(2024, 10, 6)),
                plain_rule(date(2024, 10, 6), date(2024, 10, 14)),
            ],
        );
        assert!(zone.is_ok());
    }

    #[test]
    fn test_offset_out_of_range_is_rejected() {
        let rule = AdjustmentRule::recurring(
            date(2000, 1, 1),
            date(2000, 12, 31),
            Duration::hours(2),
            TransitionTime::fixed(hm(0, 0), 4, 1).unwrap(),
            TransitionTime::fixed(hm(0, 0), 10, 1).unwrap(),
            Duration::zero(),
        )
        .unwrap();
        let err = ZoneRules::new(Duration::hours(13), true, vec![rule]).unwrap_err();
        assert_eq!(
            err,
            ZoneRuleError::OffsetOutOfRange {
                index: 0,
                offset: Duration::hours(15)
            }
        );
    }

    fn rule_with_deltas(daylight: Duration, base: Duration) -> AdjustmentRule {
        AdjustmentRule::recurring(
            date(2000, 1, 1),
            date(2000, 12, 31),
            daylight,
            TransitionTime::fixed(hm(0, 0), 4, 1).unwrap(),
            TransitionTime::fixed(hm(0, 0), 10, 1).unwrap(),
            base,
        )
        .unwrap()
    }

    #[test]
    fn test_overflowing_offsets_are_errors() {
        let huge = Duration::seconds(i64::MAX / 1000 - 1);

        let err = ZoneRules::new(
            Duration::hours(14),
            true,
            vec![rule_with_deltas(Duration::zero(), huge)],
        )
        .unwrap_err();
        assert_eq!(
            err,
            ZoneRuleError::OffsetOutOfRange {
                index: 0,
                offset: huge
            }
        );

        let err = ZoneRules::new(
            Duration::hours(14),
            true,
            vec![rule_with_deltas(huge, Duration::zero())],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ZoneRuleError::OffsetOutOfRange { index: 0, .. }
        ));
    }

    #[test]
    fn test_base_offset_is_range_checked_without_rules() {
        let huge = Duration::seconds(i64::MAX / 1000 - 1);
        assert_eq!(
            ZoneRules::new(huge, false, Vec::new()),
            Err(ZoneRuleError::BaseOffsetOutOfRange { offset: huge })
        );
        assert!(matches!(
            ZoneRules::new(Duration::hours(-15), false, Vec::new()),
            Err(ZoneRuleError::BaseOffsetOutOfRange { .. })
        ));
        assert!(ZoneRules::new(Duration::hours(-14), false, Vec::new()).is_ok());
    }

    #[test]
    fn test_date_end_covers_its_whole_day_against_utc_start() {
        let anchored = AdjustmentRule::boundary_anchored(
            at(2024, 10, 15, 3, 0),
            at(2025, 3, 1, 0, 0),
            Duration::zero(),
            Duration::zero(),
        )
        .unwrap();

        // The UTC start is 00:00 or later on the 15th in civil time, inside
        // the dated rule's last day.
        let overlapping = ZoneRules::new(
            Duration::hours(-3),
            true,
            vec![plain_rule(date(2024, 1, 1), date(2024, 10, 15)), anchored],
        );
        assert_eq!(
            overlapping,
            Err(ZoneRuleError::Unordered {
                previous: 0,
                next: 1
            })
        );

        let touching = ZoneRules::new(
            Duration::hours(-3),
            true,
            vec![plain_rule(date(2024, 1, 1), date(2024, 10, 14)), anchored],
        );
        assert!(touching.is_ok());
    }

    #[test]
    fn test_with_local_flag() {
        let zone = three_rule_zone();
        assert!(!zone.is_local());
        assert!(zone.with_local(true).is_local());
    }
}
