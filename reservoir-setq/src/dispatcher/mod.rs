/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! The `set_q` entry point: resolve an input and write it into the model.
//!
//! ```text
//! SetQRequest ──► resolve input ──► resolver::resolve ──► set_variable(target)
//!                 Literal            (series only)          exactly one write,
//!                 Parameter                                  only on success
//!                 Series
//! ```
//!
//! # Index defaulting
//! For a series in `INST` mode without an explicit index, the index is the
//! source's current *step index*.  Whole-series modes ignore the index.
//!
//! # Reporting
//! Nothing here logs.  A successful call returns a [`SetQReport`] describing
//! what was written and whether a recovery policy was needed; the caller
//! decides what to do with it.  A failed call returns a [`SetQError`] and
//! leaves the model untouched.

pub mod error;

pub use error::SetQError;

use serde::{Deserialize, Serialize};

use crate::resolver::{self, AggregationMode, NoDataReason, RecoveryPolicy};
use crate::series::finite;
use crate::source::SeriesSource;

// ── Request types ─────────────────────────────────────────────────────────────

/// Where the raw input of a `set_q` call comes from.
///
/// In YAML: `{ literal: 0.4 }`, `{ parameter: target_Q }` or
/// `{ series: Q_in }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputSpec {
    /// A fixed value.  Mode, policy and index do not apply.
    Literal(f64),
    /// A named scalar parameter.  Mode, policy and index do not apply.
    Parameter(String),
    /// A named series, reduced with the request's mode and policy.
    Series(String),
}

impl std::fmt::Display for InputSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputSpec::Literal(v) => write!(f, "literal {}", v),
            InputSpec::Parameter(name) => write!(f, "parameter '{}'", name),
            InputSpec::Series(name) => write!(f, "series '{}'", name),
        }
    }
}

/// One `set_q` call.
///
/// Built with [`SetQRequest::new`] and the chained setters:
///
/// ```rust
/// use reservoir_setq::dispatcher::{InputSpec, SetQRequest};
/// use reservoir_setq::resolver::{AggregationMode, RecoveryPolicy};
///
/// let req = SetQRequest::new("Q_turbine", InputSpec::Series("Q_in".into()))
///     .mode(AggregationMode::Inst)
///     .recovery(RecoveryPolicy::Closest)
///     .index(4);
/// assert_eq!(req.index, Some(4));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SetQRequest {
    /// Model variable that receives the value.
    pub target: String,
    pub input: InputSpec,
    pub mode: AggregationMode,
    pub recovery: RecoveryPolicy,
    /// Explicit step index for `INST`; `None` means the current step.
    pub index: Option<usize>,
}

impl SetQRequest {
    /// `INST` mode, no recovery, current step.
    pub fn new(target: impl Into<String>, input: InputSpec) -> Self {
        Self {
            target: target.into(),
            input,
            mode: AggregationMode::default(),
            recovery: RecoveryPolicy::default(),
            index: None,
        }
    }

    pub fn mode(mut self, mode: AggregationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn recovery(mut self, recovery: RecoveryPolicy) -> Self {
        self.recovery = recovery;
        self
    }

    pub fn index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }
}

// ── Report ────────────────────────────────────────────────────────────────────

/// What a successful `set_q` call wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct SetQReport {
    pub target: String,
    pub value: f64,
    pub input: InputSpec,
    pub mode: AggregationMode,
    /// Index read in `INST` mode; `None` for literals, parameters and
    /// whole-series modes.
    pub index: Option<usize>,
    /// Policy that replaced a missing sample, if one was needed.
    pub recovered_with: Option<RecoveryPolicy>,
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Resolve `request` against `source` and write the result into
/// `request.target`.
///
/// # Errors
/// See [`SetQError`].  On error nothing is written.
pub fn set_q<S>(source: &mut S, request: &SetQRequest) -> Result<SetQReport, SetQError>
where
    S: SeriesSource + ?Sized,
{
    if request.target.trim().is_empty() {
        return Err(SetQError::EmptyTarget);
    }

    let resolved = resolve_input(&*source, request)?;
    source.set_variable(&request.target, resolved.value);

    Ok(SetQReport {
        target: request.target.clone(),
        value: resolved.value,
        input: request.input.clone(),
        mode: request.mode,
        index: resolved.index,
        recovered_with: resolved.recovered_with,
    })
}

struct Resolved {
    value: f64,
    index: Option<usize>,
    recovered_with: Option<RecoveryPolicy>,
}

impl Resolved {
    fn scalar(value: f64) -> Self {
        Self {
            value,
            index: None,
            recovered_with: None,
        }
    }
}

fn resolve_input<S>(source: &S, request: &SetQRequest) -> Result<Resolved, SetQError>
where
    S: SeriesSource + ?Sized,
{
    let target = request.target.as_str();

    match &request.input {
        InputSpec::Literal(x) => finite(*x)
            .map(Resolved::scalar)
            .ok_or_else(|| SetQError::no_data(target, NoDataReason::LiteralNotFinite)),

        InputSpec::Parameter(name) => {
            let raw = source.get_parameter(name).ok_or_else(|| {
                SetQError::no_data(target, NoDataReason::ParameterNotFound { name: name.clone() })
            })?;
            finite(raw).map(Resolved::scalar).ok_or_else(|| {
                SetQError::no_data(target, NoDataReason::ParameterMissing { name: name.clone() })
            })
        }

        InputSpec::Series(name) => {
            let series = source.get_series(name).ok_or_else(|| {
                SetQError::no_data(target, NoDataReason::SeriesNotFound { name: name.clone() })
            })?;

            let index = match request.mode {
                AggregationMode::Inst => {
                    Some(request.index.unwrap_or_else(|| source.current_index()))
                }
                _ => None,
            };

            let value = resolver::resolve(&series, request.mode, request.recovery, index)
                .map_err(|e| SetQError::from_resolve(target, name, e))?;

            let recovered_with = index
                .filter(|&i| series.get(i) == Some(None))
                .map(|_| request.recovery);

            Ok(Resolved {
                value,
                index,
                recovered_with,
            })
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
