// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Zone Gap Module
//!
//! This crate decides, from a time zone's adjustment rules, whether a civil
//! (wall-clock) timestamp was skipped or repeated by an offset change.
//!
//! # Core types
//!
//! - [`TransitionTime`] — when in a year a daylight transition happens
//!   (fixed date or n-th weekday of a month).
//! - [`AdjustmentRule`] — one dated period of a zone's offset behaviour.
//! - [`ZoneRules`] — a zone's validated, ordered rule table.
//! - [`DaylightWindow`] — a rule's concrete daylight period in one year.
//! - [`Interval<T>`] — a half-open range over any [`TimeInstant`];
//!   [`CivilRange`] is the civil-time instantiation.
//! - [`Timestamp`] — a civil date-time tagged with a [`DateTimeKind`].
//!
//! # Queries
//!
//! | Query | Answer |
//! |-------|--------|
//! | [`ZoneRules::is_invalid_time`] | the timestamp never occurs |
//! | [`ZoneRules::is_ambiguous_time`] | the timestamp occurs twice |
//! | [`ZoneRules::classify`] | [`CivilTimeStatus`] for the timestamp |
//! | [`ZoneRules::offset_change_gaps`] | ranges skipped by standard-offset changes |
//! | [`gap_window`] | range skipped between two given rules |
//!
//! ```
//! use chrono::{Duration, NaiveDate, NaiveTime, Weekday};
//! use zonegap::{AdjustmentRule, CivilTimeStatus, TransitionTime, ZoneRules};
//!
//! let two = NaiveTime::from_hms_opt(2, 0, 0).unwrap();
//! let three = NaiveTime::from_hms_opt(3, 0, 0).unwrap();
//! let eu = AdjustmentRule::recurring(
//!     NaiveDate::from_ymd_opt(1996, 1, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(9999, 12, 31).unwrap(),
//!     Duration::hours(1),
//!     TransitionTime::floating(two, 3, 5, Weekday::Sun).unwrap(),
//!     TransitionTime::floating(three, 10, 5, Weekday::Sun).unwrap(),
//!     Duration::zero(),
//! )
//! .unwrap();
//! let berlin = ZoneRules::new(Duration::hours(1), true, vec![eu]).unwrap();
//!
//! let skipped = NaiveDate::from_ymd_opt(2025, 3, 30).unwrap().and_hms_opt(2, 30, 0).unwrap();
//! assert_eq!(berlin.classify(skipped), CivilTimeStatus::Invalid);
//! ```

mod classify;
mod daylight;
mod error;
mod gap;
pub(crate) mod instant;
mod period;
mod rule;
mod table;
mod transition;

// ── Re-exports ────────────────────────────────────────────────────────────

pub use classify::{ambiguous_range, invalid_range, CivilTimeStatus};
pub use daylight::DaylightWindow;
pub use error::{Result, ZoneRuleError};
pub use gap::gap_window;
pub use instant::{DateTimeKind, TimeInstant, Timestamp};
pub use period::{CivilRange, Interval};
pub use rule::{AdjustmentRule, DaylightTransitions, RuleBoundary};
#[cfg(feature = "serde")]
pub use table::ZoneRulesConfig;
pub use table::{ZoneRules, MAX_UTC_OFFSET_HOURS};
pub use transition::{TransitionTime, LAST_WEEK};
