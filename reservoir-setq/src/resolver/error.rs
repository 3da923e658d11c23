/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Structured failure types for value resolution.
//!
//! There is exactly one *data* failure, `NoData`: the request was well formed
//! but no valid scalar exists under the chosen policy.  [`NoDataReason`]
//! records which rule gave up so the caller can log it or choose a fallback
//! without parsing strings.  The remaining [`ResolveError`] variants are
//! malformed requests, not missing data.

use thiserror::Error;

use super::mode::RecoveryPolicy;

// ── NoData reasons ────────────────────────────────────────────────────────────

/// Why no value could be produced.
#[derive(Debug, Clone, PartialEq)]
pub enum NoDataReason {
    /// A whole-series aggregation found no valid sample.
    AllMissing,

    /// The instantaneous sample is missing and the policy is `NONE`.
    MissingSample { index: usize },

    /// `PREV` found no valid sample before `index`.
    NoPreviousSample { index: usize },

    /// `NEXT` found no valid sample after `index`.
    NoNextSample { index: usize },

    /// `CLOSEST` / `INTERP` found no valid sample on either side of `index`.
    NoNeighbour {
        index: usize,
        policy: RecoveryPolicy,
    },

    /// The named parameter does not exist.
    ParameterNotFound { name: String },

    /// The named parameter exists but holds a missing (non-finite) value.
    ParameterMissing { name: String },

    /// A literal input is `NaN` or infinite.
    LiteralNotFinite,

    /// No series of that name is known to the source.
    SeriesNotFound { name: String },

    /// The valid samples combined to a value outside the finite range.
    NonFiniteResult,
}

impl std::fmt::Display for NoDataReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoDataReason::AllMissing => write!(f, "every sample in the series is missing"),

            NoDataReason::MissingSample { index } => write!(
                f,
                "sample at index {} is missing and no recovery policy is set",
                index
            ),

            NoDataReason::NoPreviousSample { index } => {
                write!(f, "no valid sample before index {}", index)
            }

            NoDataReason::NoNextSample { index } => {
                write!(f, "no valid sample after index {}", index)
            }

            NoDataReason::NoNeighbour { index, policy } => write!(
                f,
                "{} found no valid sample on either side of index {}",
                policy, index
            ),

            NoDataReason::ParameterNotFound { name } => {
                write!(f, "parameter '{}' not found", name)
            }

            NoDataReason::ParameterMissing { name } => {
                write!(f, "parameter '{}' has no valid value", name)
            }

            NoDataReason::LiteralNotFinite => write!(f, "literal input is not a finite number"),

            NoDataReason::SeriesNotFound { name } => write!(f, "series '{}' not found", name),

            NoDataReason::NonFiniteResult => write!(f, "resolved value is not a finite number"),
        }
    }
}

// ── ResolveError ──────────────────────────────────────────────────────────────

/// Error returned by [`resolve()`](super::resolve).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    #[error("no data: {0}")]
    NoData(NoDataReason),

    /// `INST` was requested without an index.
    #[error("instantaneous mode requires an index")]
    IndexRequired,

    #[error("index {index} is outside the series (length {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

impl ResolveError {
    pub fn is_no_data(&self) -> bool {
        matches!(self, ResolveError::NoData(_))
    }
}

impl From<NoDataReason> for ResolveError {
    fn from(reason: NoDataReason) -> Self {
        ResolveError::NoData(reason)
    }
}
