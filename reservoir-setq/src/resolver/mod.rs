/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Reduce a [`Series`] to one scalar.
//!
//! [`resolve`] either summarises the whole series (`MEAN` / `MIN` / `MAX`,
//! missing samples ignored) or picks the sample at one index (`INST`).  When
//! the picked sample is missing, the [`RecoveryPolicy`] decides what replaces
//! it:
//!
//! | Policy | Result | Fails when |
//! |---|---|---|
//! | `NONE` | - | always |
//! | `MEAN` | whole-series mean | whole series missing |
//! | `PREV` | nearest valid sample before | nothing before |
//! | `NEXT` | nearest valid sample after | nothing after |
//! | `CLOSEST` | nearer side; average of both on a tie; the only side if one-sided | nothing on either side |
//! | `INTERP` | linear across the run; constant extension if one-sided | nothing on either side |
//!
//! Resolution is pure: nothing is cached, nothing is logged.  Identical
//! arguments always give identical results.

pub mod error;
pub mod mode;

pub use error::{NoDataReason, ResolveError};
pub use mode::{AggregationMode, ParseOptionError, RecoveryPolicy};

use std::cmp::Ordering;

use crate::interpolate;
use crate::series::{finite, Series};

// ── Public entry point ────────────────────────────────────────────────────────

/// Resolve `series` to a single finite value.
///
/// `index` is only read for [`AggregationMode::Inst`]; the whole-series modes
/// ignore it.
///
/// # Errors
/// * [`ResolveError::NoData`]: no valid value under the requested policy, or
///   the arithmetic left the finite range.
/// * [`ResolveError::IndexRequired`]: `INST` without an index.
/// * [`ResolveError::IndexOutOfRange`]: `index >= series.len()`.
pub fn resolve(
    series: &Series,
    mode: AggregationMode,
    policy: RecoveryPolicy,
    index: Option<usize>,
) -> Result<f64, ResolveError> {
    let value = match mode {
        AggregationMode::Mean => mean(series),
        AggregationMode::Min => min(series),
        AggregationMode::Max => max(series),
        AggregationMode::Inst => {
            let index = index.ok_or(ResolveError::IndexRequired)?;
            instantaneous(series, index, policy)
        }
    }?;
    checked(value)
}

/// Every resolved value is finite.
fn checked(value: f64) -> Result<f64, ResolveError> {
    finite(value).ok_or(ResolveError::NoData(NoDataReason::NonFiniteResult))
}

// ── Whole-series statistics ───────────────────────────────────────────────────

/// Mean of the valid samples.
pub fn mean(series: &Series) -> Result<f64, ResolveError> {
    let (sum, count) = series
        .valid()
        .fold((0.0_f64, 0usize), |(sum, count), (_, v)| (sum + v, count + 1));
    if count == 0 {
        return Err(NoDataReason::AllMissing.into());
    }
    let n = count as f64;
    if sum.is_finite() {
        return Ok(sum / n);
    }
    // The plain sum overflowed; fall back to a running mean.
    Ok(series
        .valid()
        .enumerate()
        .fold(0.0, |m, (k, (_, v))| m + (v - m) / (k + 1) as f64))
}

/// Minimum over the valid samples.
pub fn min(series: &Series) -> Result<f64, ResolveError> {
    series
        .valid()
        .map(|(_, v)| v)
        .reduce(f64::min)
        .ok_or(ResolveError::NoData(NoDataReason::AllMissing))
}

/// Maximum over the valid samples.
pub fn max(series: &Series) -> Result<f64, ResolveError> {
    series
        .valid()
        .map(|(_, v)| v)
        .reduce(f64::max)
        .ok_or(ResolveError::NoData(NoDataReason::AllMissing))
}

// ── Instantaneous selection ───────────────────────────────────────────────────

fn instantaneous(
    series: &Series,
    index: usize,
    policy: RecoveryPolicy,
) -> Result<f64, ResolveError> {
    match series.get(index) {
        None => Err(ResolveError::IndexOutOfRange {
            index,
            len: series.len(),
        }),
        Some(Some(v)) => Ok(v),
        Some(None) => recover(series, index, policy),
    }
}

/// Substitute for the missing sample at `index`.
fn recover(
    series: &Series,
    index: usize,
    policy: RecoveryPolicy,
) -> Result<f64, ResolveError> {
    match policy {
        RecoveryPolicy::None => Err(NoDataReason::MissingSample { index }.into()),

        RecoveryPolicy::Mean => mean(series),

        RecoveryPolicy::Prev => series
            .prev_valid(index)
            .map(|(_, v)| v)
            .ok_or(ResolveError::NoData(NoDataReason::NoPreviousSample { index })),

        RecoveryPolicy::Next => series
            .next_valid(index)
            .map(|(_, v)| v)
            .ok_or(ResolveError::NoData(NoDataReason::NoNextSample { index })),

        RecoveryPolicy::Closest => closest(series, index),

        RecoveryPolicy::Interp => interpolate::fill_at(series, index).ok_or(
            ResolveError::NoData(NoDataReason::NoNeighbour {
                index,
                policy: RecoveryPolicy::Interp,
            }),
        ),
    }
}

fn closest(series: &Series, index: usize) -> Result<f64, ResolveError> {
    match (series.prev_valid(index), series.next_valid(index)) {
        (Some((pi, pv)), Some((ni, nv))) => Ok(match (index - pi).cmp(&(ni - index)) {
            Ordering::Less => pv,
            Ordering::Greater => nv,
            Ordering::Equal => midpoint(pv, nv),
        }),
        (Some((_, v)), None) | (None, Some((_, v))) => Ok(v),
        (None, None) => Err(NoDataReason::NoNeighbour {
            index,
            policy: RecoveryPolicy::Closest,
        }
        .into()),
    }
}

/// Average of two finite values, halving first when the sum overflows.
fn midpoint(a: f64, b: f64) -> f64 {
    let m = (a + b) / 2.0;
    if m.is_finite() {
        m
    } else {
        a / 2.0 + b / 2.0
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const NAN: f64 = f64::NAN;

    fn series(values: &[f64]) -> Series {
        Series::from_values(values.iter().copied())
    }

    fn ts() -> Series {
        series(&[1.0, 2.0, 3.0, 1.0, 3.0, 5.0])
    }
    fn nan_ts_1() -> Series {
        series(&[1.0, 2.0, 3.0, 7.0, NAN, 5.0])
    }
    fn nan_ts_0() -> Series {
        series(&[NAN, 2.0, 3.0, 7.0, 3.0, 5.0])
    }
    fn nan_ts_5() -> Series {
        series(&[5.0, 2.0, 3.0, 7.0, 3.0, NAN])
    }
    fn nan_ts_interp() -> Series {
        series(&[5.0, 7.0, NAN, NAN, NAN, 3.0])
    }
    fn nan_end() -> Series {
        series(&[5.0, 7.0, NAN, NAN, NAN, NAN])
    }

    fn inst(s: &Series, index: usize, policy: RecoveryPolicy) -> Result<f64, ResolveError> {
        resolve(s, AggregationMode::Inst, policy, Some(index))
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    // ── Whole-series modes ────────────────────────────────────────────────────

    #[test]
    fn mean_ignores_missing_samples() {
        assert_close(
            resolve(&ts(), AggregationMode::Mean, RecoveryPolicy::None, None).unwrap(),
            2.5,
        );
        assert_close(mean(&nan_ts_1()).unwrap(), 3.6);
    }

    #[test]
    fn min_and_max_ignore_missing_samples() {
        assert_eq!(min(&ts()).unwrap(), 1.0);
        assert_eq!(min(&nan_ts_1()).unwrap(), 1.0);
        assert_eq!(max(&ts()).unwrap(), 5.0);
        assert_eq!(max(&nan_ts_1()).unwrap(), 7.0);
    }

    #[test]
    fn whole_series_modes_ignore_index() {
        let s = nan_ts_1();
        for index in [None, Some(0), Some(4), Some(999)] {
            assert_eq!(
                resolve(&s, AggregationMode::Max, RecoveryPolicy::None, index).unwrap(),
                7.0
            );
        }
    }

    #[test]
    fn whole_series_modes_fail_on_all_missing() {
        let s = Series::missing(6);
        for mode in [AggregationMode::Mean, AggregationMode::Min, AggregationMode::Max] {
            let err = resolve(&s, mode, RecoveryPolicy::Mean, None).unwrap_err();
            assert_eq!(err, ResolveError::NoData(NoDataReason::AllMissing), "{mode}");
        }
    }

    #[test]
    fn empty_series_has_no_data() {
        assert!(mean(&Series::default()).unwrap_err().is_no_data());
    }

    // ── INST ──────────────────────────────────────────────────────────────────

    #[test]
    fn inst_returns_valid_sample_regardless_of_policy() {
        for policy in RecoveryPolicy::ALL {
            assert_eq!(inst(&ts(), 2, policy).unwrap(), 3.0);
        }
    }

    #[test]
    fn inst_without_index_is_rejected() {
        let err = resolve(&ts(), AggregationMode::Inst, RecoveryPolicy::None, None).unwrap_err();
        assert_eq!(err, ResolveError::IndexRequired);
    }

    #[test]
    fn inst_out_of_range_is_rejected() {
        let err = inst(&ts(), 6, RecoveryPolicy::Closest).unwrap_err();
        assert_eq!(err, ResolveError::IndexOutOfRange { index: 6, len: 6 });
        assert!(!err.is_no_data());
    }

    #[test]
    fn inst_missing_with_none_policy_fails() {
        let err = inst(&nan_ts_1(), 4, RecoveryPolicy::None).unwrap_err();
        assert_eq!(err, ResolveError::NoData(NoDataReason::MissingSample { index: 4 }));
    }

    // ── Recovery policies ─────────────────────────────────────────────────────

    #[test]
    fn recovery_mean_uses_whole_series_mean() {
        assert_close(inst(&nan_ts_1(), 4, RecoveryPolicy::Mean).unwrap(), 3.6);
    }

    #[test]
    fn recovery_prev_and_next() {
        assert_eq!(inst(&nan_ts_1(), 4, RecoveryPolicy::Prev).unwrap(), 7.0);
        assert_eq!(inst(&nan_ts_1(), 4, RecoveryPolicy::Next).unwrap(), 5.0);
    }

    #[test]
    fn recovery_prev_fails_at_start() {
        let err = inst(&nan_ts_0(), 0, RecoveryPolicy::Prev).unwrap_err();
        assert_eq!(err, ResolveError::NoData(NoDataReason::NoPreviousSample { index: 0 }));
    }

    #[test]
    fn recovery_next_fails_at_end() {
        let err = inst(&nan_ts_5(), 5, RecoveryPolicy::Next).unwrap_err();
        assert_eq!(err, ResolveError::NoData(NoDataReason::NoNextSample { index: 5 }));
    }

    #[test]
    fn closest_at_end_uses_only_available_side() {
        assert_eq!(inst(&nan_ts_5(), 5, RecoveryPolicy::Closest).unwrap(), 3.0);
    }

    #[test]
    fn closest_and_interp_agree_on_single_gap() {
        assert_eq!(inst(&nan_ts_1(), 4, RecoveryPolicy::Closest).unwrap(), 6.0);
        assert_eq!(inst(&nan_ts_1(), 4, RecoveryPolicy::Interp).unwrap(), 6.0);
    }

    #[test]
    fn closest_prefers_nearer_side() {
        let s = nan_ts_interp(); // valid at 1 (7.0) and 5 (3.0)
        assert_eq!(inst(&s, 2, RecoveryPolicy::Closest).unwrap(), 7.0);
        assert_eq!(inst(&s, 3, RecoveryPolicy::Closest).unwrap(), 5.0, "tie averages");
        assert_eq!(inst(&s, 4, RecoveryPolicy::Closest).unwrap(), 3.0);
    }

    #[test]
    fn interp_follows_linear_ramp() {
        let s = nan_ts_interp();
        assert_eq!(inst(&s, 2, RecoveryPolicy::Interp).unwrap(), 6.0);
        assert_eq!(inst(&s, 3, RecoveryPolicy::Interp).unwrap(), 5.0);
        assert_eq!(inst(&s, 4, RecoveryPolicy::Interp).unwrap(), 4.0);
    }

    #[test]
    fn one_sided_run_extends_constant() {
        assert_eq!(inst(&nan_end(), 3, RecoveryPolicy::Interp).unwrap(), 7.0);
        assert_eq!(inst(&nan_end(), 3, RecoveryPolicy::Closest).unwrap(), 7.0);
    }

    #[test]
    fn every_recovery_fails_on_all_missing() {
        let s = Series::missing(6);
        for policy in RecoveryPolicy::ALL {
            let err = inst(&s, 3, policy).unwrap_err();
            assert!(err.is_no_data(), "{policy} should fail with NoData, got {err:?}");
        }
    }

    #[test]
    fn no_neighbour_reason_names_policy() {
        let err = inst(&Series::missing(3), 1, RecoveryPolicy::Interp).unwrap_err();
        assert_eq!(
            err,
            ResolveError::NoData(NoDataReason::NoNeighbour {
                index: 1,
                policy: RecoveryPolicy::Interp
            })
        );
        assert!(err.to_string().contains("INTERP"));
    }

    #[test]
    fn resolution_is_repeatable() {
        let s = nan_ts_interp();
        let first = inst(&s, 3, RecoveryPolicy::Interp);
        let second = inst(&s, 3, RecoveryPolicy::Interp);
        assert_eq!(first, second);
    }

    // ── Overflow ──────────────────────────────────────────────────────────────

    #[test]
    fn mean_of_huge_samples_stays_finite() {
        let s = series(&[f64::MAX, f64::MAX, f64::MAX]);
        let v = resolve(&s, AggregationMode::Mean, RecoveryPolicy::None, None).unwrap();
        assert_eq!(v, f64::MAX);
    }

    #[test]
    fn closest_tie_of_huge_samples_stays_finite() {
        let s = series(&[f64::MAX, NAN, f64::MAX]);
        assert_eq!(inst(&s, 1, RecoveryPolicy::Closest).unwrap(), f64::MAX);
    }

    #[test]
    fn interp_across_full_range_stays_finite() {
        let s = series(&[-f64::MAX, NAN, f64::MAX]);
        assert_eq!(inst(&s, 1, RecoveryPolicy::Interp).unwrap(), 0.0);
    }

    #[test]
    fn non_finite_result_is_no_data() {
        assert_eq!(
            checked(f64::INFINITY),
            Err(ResolveError::NoData(NoDataReason::NonFiniteResult))
        );
        assert!(checked(f64::NAN).unwrap_err().is_no_data());
        assert_eq!(checked(-1.5), Ok(-1.5));
    }
}
