/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Aggregation modes and missing-sample recovery policies.
//!
//! Both enums deserialise from their upper-case option names (`"INST"`,
//! `"CLOSEST"`, …) and parse case-insensitively through [`FromStr`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── AggregationMode ───────────────────────────────────────────────────────────

/// How a series is reduced to one scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AggregationMode {
    /// Mean of all valid samples.
    Mean,
    /// Minimum over valid samples.
    Min,
    /// Maximum over valid samples.
    Max,
    /// The sample at one index, with a [`RecoveryPolicy`] if it is missing.
    #[default]
    Inst,
}

impl AggregationMode {
    pub const ALL: [AggregationMode; 4] = [
        AggregationMode::Mean,
        AggregationMode::Min,
        AggregationMode::Max,
        AggregationMode::Inst,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AggregationMode::Mean => "MEAN",
            AggregationMode::Min => "MIN",
            AggregationMode::Max => "MAX",
            AggregationMode::Inst => "INST",
        }
    }

    /// `true` for the whole-series modes, which ignore any index.
    pub fn is_whole_series(self) -> bool {
        !matches!(self, AggregationMode::Inst)
    }
}

impl fmt::Display for AggregationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AggregationMode {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseOptionError::UnknownMode(s.to_string()))
    }
}

// ── RecoveryPolicy ────────────────────────────────────────────────────────────

/// What to substitute when the instantaneous sample is missing.
///
/// Only consulted by [`AggregationMode::Inst`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecoveryPolicy {
    /// No recovery: a missing sample is a failure.
    #[default]
    None,
    /// Whole-series mean of valid samples.
    Mean,
    /// Nearest valid sample strictly before the index.
    #[serde(alias = "PREVIOUS")]
    Prev,
    /// Nearest valid sample strictly after the index.
    Next,
    /// Nearer of `Prev` / `Next`; the average of both on a distance tie.
    Closest,
    /// Linear interpolation across the missing run, constant at the edges.
    Interp,
}

impl RecoveryPolicy {
    pub const ALL: [RecoveryPolicy; 6] = [
        RecoveryPolicy::None,
        RecoveryPolicy::Mean,
        RecoveryPolicy::Prev,
        RecoveryPolicy::Next,
        RecoveryPolicy::Closest,
        RecoveryPolicy::Interp,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RecoveryPolicy::None => "NONE",
            RecoveryPolicy::Mean => "MEAN",
            RecoveryPolicy::Prev => "PREV",
            RecoveryPolicy::Next => "NEXT",
            RecoveryPolicy::Closest => "CLOSEST",
            RecoveryPolicy::Interp => "INTERP",
        }
    }
}

impl fmt::Display for RecoveryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecoveryPolicy {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("PREVIOUS") {
            return Ok(RecoveryPolicy::Prev);
        }
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseOptionError::UnknownPolicy(s.to_string()))
    }
}

// ── Parse error ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseOptionError {
    #[error("unknown aggregation mode: '{0}' (valid: MEAN, MIN, MAX, INST)")]
    UnknownMode(String),

    #[error("unknown recovery policy: '{0}' (valid: NONE, MEAN, PREV, NEXT, CLOSEST, INTERP)")]
    UnknownPolicy(String),
}

// ── Tests ─────────────────────────────────────────────────────────────────────
