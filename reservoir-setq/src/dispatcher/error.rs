/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Error type for [`set_q`](super::set_q).
//!
//! | Variant | Meaning | Caller reaction |
//! |---|---|---|
//! | `NoData` | the data cannot produce a value under the requested policy | fall back to another scheme or abort the step |
//! | `EmptyTarget` | malformed request | fix the scheme |
//! | `IndexOutOfRange` | malformed request | fix the scheme |
//! | `IndexRequired` | malformed request | fix the scheme |
//!
//! `set_q` never writes the target when it returns any of these.

use thiserror::Error;

use crate::resolver::{NoDataReason, ResolveError};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SetQError {
    /// No valid value exists for `target`.
    #[error("no data for '{target}': {reason}")]
    NoData {
        target: String,
        reason: NoDataReason,
    },

    /// The request names no target variable.
    #[error("set_q request has an empty target variable")]
    EmptyTarget,

    /// An explicit index points past the end of the series.
    #[error("index {index} is outside series '{series}' (length {len})")]
    IndexOutOfRange {
        series: String,
        index: usize,
        len: usize,
    },

    /// `INST` resolution ran without an index.
    #[error("instantaneous mode requires an index")]
    IndexRequired,
}

impl SetQError {
    /// `true` for the data failure that callers may recover from.
    pub fn is_no_data(&self) -> bool {
        matches!(self, SetQError::NoData { .. })
    }

    pub(crate) fn no_data(target: &str, reason: NoDataReason) -> Self {
        SetQError::NoData {
            target: target.to_string(),
            reason,
        }
    }

    /// Attach request context to a resolver failure.
    pub(crate) fn from_resolve(target: &str, series: &str, err: ResolveError) -> Self {
        match err {
            ResolveError::NoData(reason) => Self::no_data(target, reason),
            ResolveError::IndexOutOfRange { index, len } => SetQError::IndexOutOfRange {
                series: series.to_string(),
                index,
                len,
            },
            ResolveError::IndexRequired => SetQError::IndexRequired,
        }
    }
}
