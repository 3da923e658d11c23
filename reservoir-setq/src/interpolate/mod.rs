/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Gap filling for sample sequences.
//!
//! Every missing sample is replaced using its nearest valid neighbours:
//!
//! | Neighbours | Fill |
//! |---|---|
//! | before and after | linear interpolation |
//! | only one side (run touches an edge) | constant extension of that neighbour |
//! | none (whole series missing) | stays missing; callers must detect this |
//!
//! All functions are pure: the input [`Series`] is never mutated, the output
//! always has the same length, and valid samples pass through unchanged (so
//! filling an already complete series is a no-op).
//!
//! Interpolation runs over sample indices by default.  [`fill_gaps_over`]
//! accepts explicit coordinates (e.g. times in seconds) for unevenly spaced
//! data.

pub mod math;

use thiserror::Error;

use crate::series::Series;

// ── Error type ────────────────────────────────────────────────────────────────

/// Rejected coordinate vectors for [`fill_gaps_over`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InterpolateError {
    #[error("coordinate count {coords} does not match sample count {samples}")]
    LengthMismatch { coords: usize, samples: usize },

    #[error("coordinate at index {index} is not finite")]
    NonFiniteCoordinate { index: usize },

    #[error("coordinates must be strictly increasing (index {index}: {value} after {previous})")]
    NotIncreasing {
        index: usize,
        previous: f64,
        value: f64,
    },
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Fill every missing sample, interpolating over sample indices.
pub fn fill_gaps(series: &Series) -> Series {
    fill_with(series, |i| i as f64)
}

/// Fill every missing sample, interpolating over the given coordinates.
///
/// Library utility for callers whose samples are not evenly spaced (for
/// example times in seconds).  `set_q` and the scenario runner work on step
/// indices and use [`fill_gaps`] semantics through [`fill_at`].
///
/// # Errors
/// `coords` must have one finite, strictly increasing entry per sample.
pub fn fill_gaps_over(coords: &[f64], series: &Series) -> Result<Series, InterpolateError> {
    if coords.len() != series.len() {
        return Err(InterpolateError::LengthMismatch {
            coords: coords.len(),
            samples: series.len(),
        });
    }
    for (index, &value) in coords.iter().enumerate() {
        if !value.is_finite() {
            return Err(InterpolateError::NonFiniteCoordinate { index });
        }
        if index > 0 && value <= coords[index - 1] {
            return Err(InterpolateError::NotIncreasing {
                index,
                previous: coords[index - 1],
                value,
            });
        }
    }
    Ok(fill_with(series, |i| coords[i]))
}

/// Value at `index` after filling only the run that contains it.
///
/// Returns the sample itself when it is valid, and `None` when `index` is out
/// of range or the series has no valid sample at all.  Agrees with
/// `fill_gaps(series).get(index)` without filling the rest of the series.
pub fn fill_at(series: &Series, index: usize) -> Option<f64> {
    match series.get(index)? {
        Some(v) => Some(v),
        None => math::fill_between(
            series.prev_valid(index),
            series.next_valid(index),
            |i| i as f64,
            index,
        ),
    }
}

// ── Internals ─────────────────────────────────────────────────────────────────

/// Two passes: the backward one records the next valid sample for every
/// position, the forward one carries the previous valid sample and fills.
fn fill_with<F>(series: &Series, coord: F) -> Series
where
    F: Fn(usize) -> f64,
{
    let samples = series.samples();

    let mut next = vec![None; samples.len()];
    let mut upcoming = None;
    for (i, sample) in samples.iter().enumerate().rev() {
        if let Some(v) = *sample {
            upcoming = Some((i, v));
        }
        next[i] = upcoming;
    }

    let mut prev = None;
    samples
        .iter()
        .enumerate()
        .map(|(i, sample)| match *sample {
            Some(v) => {
                prev = Some((i, v));
                Some(v)
            }
            None => math::fill_between(prev, next[i], &coord, i),
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
