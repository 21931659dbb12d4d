// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Concrete daylight-saving window of one rule in one year.

use crate::rule::{AdjustmentRule, DaylightTransitions};
use crate::table::ZoneRules;
use chrono::{Duration, NaiveDateTime};

/// Start and end of a rule's daylight period for a specific year, in zone
/// civil time, plus the daylight delta in force between them.
///
/// Derived per query; never cached across years.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaylightWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub delta: Duration,
}

impl ZoneRules {
    /// Daylight window of the rule at `rule_index` for `year`.
    ///
    /// Returns `None` if `rule_index` is out of bounds or `year` cannot be
    /// represented.
    pub fn daylight_window(&self, year: i32, rule_index: usize) -> Option<DaylightWindow> {
        let rule = self.rules().get(rule_index)?;
        self.daylight_window_for(year, rule, rule_index)
    }

    pub(crate) fn daylight_window_for(
        &self,
        year: i32,
        rule: &AdjustmentRule,
        rule_index: usize,
    ) -> Option<DaylightWindow> {
        let (start, end) = match rule.transitions() {
            DaylightTransitions::Recurring { start, end } => {
                (start.resolve(year)?, end.resolve(year)?)
            }
            DaylightTransitions::BoundaryAnchored => {
                // The start instant is read under the outgoing offset; the first
                // rule of a table has no predecessor and uses its own.
                let previous = self.previous_rule(rule_index).unwrap_or(rule);
                let start = self.convert_from_utc(
                    rule.date_start().as_datetime(),
                    previous.daylight_delta(),
                    previous.base_utc_offset_delta(),
                );
                let end = self.convert_from_utc(
                    rule.date_end().as_datetime(),
                    rule.daylight_delta(),
                    rule.base_utc_offset_delta(),
                );
                (start, end)
            }
        };

        Some(DaylightWindow {
            start,
            end,
            delta: rule.daylight_delta(),
        })
    }
}
