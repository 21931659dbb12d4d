// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Civil instants and timestamp kinds.
//!
//! [`TimeInstant`] is the small arithmetic surface that [`Interval`](crate::Interval)
//! needs from its endpoints. All of it is *checked*: shifting a civil instant
//! past the representable calendar yields `None` instead of panicking, which
//! is what lets the year-boundary correction treat an overflowing candidate
//! as "does not apply".
//!
//! [`Timestamp`] pairs a civil date-time with a [`DateTimeKind`], so callers
//! state explicitly whether a value is wall-clock time, a UTC instant, or
//! the caller's own local time.

use chrono::{Duration, Months, NaiveDateTime};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════════
// TimeInstant trait
// ═══════════════════════════════════════════════════════════════════════════

/// Trait for types that represent a point in civil time.
///
/// Types implementing this trait can be used as endpoints of an
/// [`Interval`](crate::Interval).
pub trait TimeInstant: Copy + Clone + PartialEq + PartialOrd + Sized {
    /// The duration type used for arithmetic operations.
    type Duration;

    /// Compute the difference between two time instants.
    fn difference(&self, other: &Self) -> Self::Duration;

    /// Add a duration, or `None` if the result is not representable.
    fn checked_add_duration(&self, duration: Self::Duration) -> Option<Self>;

    /// Subtract a duration, or `None` if the result is not representable.
    fn checked_sub_duration(&self, duration: Self::Duration) -> Option<Self>;

    /// Shift by whole calendar years (negative shifts go backwards).
    ///
    /// February 29 maps to February 28 in non-leap target years.
    fn checked_add_years(&self, years: i32) -> Option<Self>;
}

impl TimeInstant for NaiveDateTime {
    type Duration = Duration;

    #[inline]
    fn difference(&self, other: &Self) -> Self::Duration {
        *self - *other
    }

    #[inline]
    fn checked_add_duration(&self, duration: Self::Duration) -> Option<Self> {
        self.checked_add_signed(duration)
    }

    #[inline]
    fn checked_sub_duration(&self, duration: Self::Duration) -> Option<Self> {
        self.checked_sub_signed(duration)
    }

    fn checked_add_years(&self, years: i32) -> Option<Self> {
        let months = Months::new(years.unsigned_abs().checked_mul(12)?);
        if years >= 0 {
            self.checked_add_months(months)
        } else {
            self.checked_sub_months(months)
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Timestamp
// ═══════════════════════════════════════════════════════════════════════════

/// How a [`Timestamp`]'s civil value should be read.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DateTimeKind {
    /// Wall-clock time with no attached zone; read against whichever zone is queried.
    #[default]
    Unspecified,
    /// A UTC instant.
    Utc,
    /// Wall-clock time in the caller's local zone.
    Local,
}

/// A civil date-time tagged with its [`DateTimeKind`].
///
/// A bare `NaiveDateTime` converts into an [`Unspecified`](DateTimeKind::Unspecified)
/// timestamp, so the query methods on [`ZoneRules`](crate::ZoneRules) accept
/// either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Timestamp {
    pub civil: NaiveDateTime,
    pub kind: DateTimeKind,
}

impl Timestamp {
    #[inline]
    pub const fn new(civil: NaiveDateTime, kind: DateTimeKind) -> Self {
        Self { civil, kind }
    }

    #[inline]
    pub const fn unspecified(civil: NaiveDateTime) -> Self {
        Self::new(civil, DateTimeKind::Unspecified)
    }

    #[inline]
    pub const fn utc(civil: NaiveDateTime) -> Self {
        Self::new(civil, DateTimeKind::Utc)
    }

    #[inline]
    pub const fn local(civil: NaiveDateTime) -> Self {
        Self::new(civil, DateTimeKind::Local)
    }
}

impl From<NaiveDateTime> for Timestamp {
    #[inline]
    fn from(civil: NaiveDateTime) -> Self {
        Self::unspecified(civil)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════
