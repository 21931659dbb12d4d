// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Error types for building transition times, adjustment rules and rule tables.
//!
//! Errors only arise while zone data is being assembled. Queries against a
//! built [`ZoneRules`](crate::ZoneRules) never fail: "no rule in effect" and
//! "year out of range" are ordinary `None` / `false` outcomes.

use chrono::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ZoneRuleError {
    #[error("Invalid transition time: {0}")]
    InvalidTransition(String),

    #[error("Adjustment rule starts at {start} but ends at {end}")]
    InvertedRule { start: String, end: String },

    #[error("Adjustment rules {previous} and {next} overlap or are out of order")]
    Unordered { previous: usize, next: usize },

    #[error("Base UTC offset {offset} is outside of ±14 hours")]
    BaseOffsetOutOfRange { offset: Duration },

    #[error("Adjustment rule {index} yields UTC offset {offset}, outside of ±14 hours")]
    OffsetOutOfRange { index: usize, offset: Duration },
}

pub type Result<T> = std::result::Result<T, ZoneRuleError>;
