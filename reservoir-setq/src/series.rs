/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Sample sequences aligned 1:1 with simulation timesteps.
//!
//! A [`Series`] is an ordered run of samples indexed from `0`.  Every sample is
//! either a finite `f64` or *missing*:
//!
//! ```text
//! index:   0     1     2      3      4     5
//! value:  5.0   7.0   None   None   None  3.0
//!                     └──── missing run ───┘
//! ```
//!
//! # Missing-value model
//! Missing samples are `None`, never a magic number.  Every constructor
//! normalises non-finite input (`NaN`, `±inf`) to `None`, so a `Some(v)` read
//! back from a `Series` is always finite.  Zero is a valid sample.

use serde::{Deserialize, Serialize};

// ── Series ────────────────────────────────────────────────────────────────────

/// Ordered sequence of possibly-missing samples.
///
/// Serialises as a plain list (`[1.0, null, 3.0]`); `NaN` entries coming from
/// YAML (`.nan`) are folded into missing samples on the way in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Option<f64>>", into = "Vec<Option<f64>>")]
pub struct Series {
    samples: Vec<Option<f64>>,
}

impl Series {
    /// Build from raw floats; any non-finite value becomes a missing sample.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        Self {
            samples: values.into_iter().map(finite).collect(),
        }
    }

    /// Build from explicit samples, normalising `Some(NaN)` to `None`.
    pub fn from_samples<I>(samples: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        Self {
            samples: samples.into_iter().map(|s| s.and_then(finite)).collect(),
        }
    }

    /// A series of `len` missing samples.
    pub fn missing(len: usize) -> Self {
        Self {
            samples: vec![None; len],
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample at `index`.
    ///
    /// The outer `Option` is `None` when `index` is out of range; the inner one
    /// is `None` when the sample is missing.
    pub fn get(&self, index: usize) -> Option<Option<f64>> {
        self.samples.get(index).copied()
    }

    /// All samples in index order.
    pub fn samples(&self) -> &[Option<f64>] {
        &self.samples
    }

    /// `(index, value)` pairs of every valid sample, in index order.
    pub fn valid(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.samples
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.map(|v| (i, v)))
    }

    /// Number of valid samples.
    pub fn valid_count(&self) -> usize {
        self.samples.iter().filter(|s| s.is_some()).count()
    }

    /// `true` when no sample carries a value (including the empty series).
    pub fn is_all_missing(&self) -> bool {
        self.samples.iter().all(Option::is_none)
    }

    /// `true` when every sample carries a value.
    pub fn is_complete(&self) -> bool {
        self.samples.iter().all(Option::is_some)
    }

    /// Nearest valid sample strictly before `index`.
    pub fn prev_valid(&self, index: usize) -> Option<(usize, f64)> {
        let end = index.min(self.samples.len());
        self.samples[..end]
            .iter()
            .enumerate()
            .rev()
            .find_map(|(i, s)| s.map(|v| (i, v)))
    }

    /// Nearest valid sample strictly after `index`.
    pub fn next_valid(&self, index: usize) -> Option<(usize, f64)> {
        let start = index.saturating_add(1);
        self.samples
            .iter()
            .enumerate()
            .skip(start)
            .find_map(|(i, s)| s.map(|v| (i, v)))
    }

    /// Overwrite the sample at `index`.  Out-of-range writes are ignored.
    pub(crate) fn set(&mut self, index: usize, value: Option<f64>) {
        if let Some(slot) = self.samples.get_mut(index) {
            *slot = value.and_then(finite);
        }
    }
}

impl From<Vec<Option<f64>>> for Series {
    fn from(samples: Vec<Option<f64>>) -> Self {
        Self::from_samples(samples)
    }
}

impl From<Series> for Vec<Option<f64>> {
    fn from(series: Series) -> Self {
        series.samples
    }
}

impl FromIterator<Option<f64>> for Series {
    fn from_iter<T: IntoIterator<Item = Option<f64>>>(iter: T) -> Self {
        Self::from_samples(iter)
    }
}

/// `Some(v)` when `v` is finite.
pub(crate) fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_values_maps_non_finite_to_missing() {
        let s = Series::from_values([1.0, f64::NAN, f64::INFINITY, 0.0]);
        assert_eq!(s.samples(), &[Some(1.0), None, None, Some(0.0)]);
    }

    #[test]
    fn from_samples_normalises_nan() {
        let s = Series::from_samples([Some(f64::NAN), None, Some(2.0)]);
        assert_eq!(s.samples(), &[None, None, Some(2.0)]);
    }

    #[test]
    fn get_distinguishes_out_of_range_from_missing() {
        let s = Series::from_samples([Some(1.0), None]);
        assert_eq!(s.get(0), Some(Some(1.0)));
        assert_eq!(s.get(1), Some(None));
        assert_eq!(s.get(2), None);
    }

    #[test]
    fn valid_skips_missing_samples() {
        let s = Series::from_values([1.0, 2.0, 3.0, 7.0, f64::NAN, 5.0]);
        let valid: Vec<_> = s.valid().collect();
        assert_eq!(valid, vec![(0, 1.0), (1, 2.0), (2, 3.0), (3, 7.0), (5, 5.0)]);
        assert_eq!(s.valid_count(), 5);
    }

    #[test]
    fn all_missing_and_complete() {
        assert!(Series::missing(3).is_all_missing());
        assert!(Series::default().is_all_missing());
        assert!(Series::from_values([1.0, 2.0]).is_complete());
        assert!(!Series::from_samples([Some(1.0), None]).is_complete());
    }

    #[test]
    fn prev_valid_scans_strictly_backward() {
        let s = Series::from_samples([Some(1.0), None, Some(3.0), None, None]);
        assert_eq!(s.prev_valid(4), Some((2, 3.0)));
        assert_eq!(s.prev_valid(2), Some((0, 1.0)), "index itself is excluded");
        assert_eq!(s.prev_valid(0), None);
        assert_eq!(s.prev_valid(100), Some((2, 3.0)));
    }

    #[test]
    fn next_valid_scans_strictly_forward() {
        let s = Series::from_samples([None, None, Some(3.0), None, Some(5.0)]);
        assert_eq!(s.next_valid(0), Some((2, 3.0)));
        assert_eq!(s.next_valid(2), Some((4, 5.0)), "index itself is excluded");
        assert_eq!(s.next_valid(4), None);
        assert_eq!(s.next_valid(usize::MAX), None);
    }

    #[test]
    fn set_ignores_out_of_range_and_normalises() {
        let mut s = Series::missing(2);
        s.set(0, Some(4.0));
        s.set(1, Some(f64::NAN));
        s.set(5, Some(1.0));
        assert_eq!(s.samples(), &[Some(4.0), None]);
    }

    #[test]
    fn yaml_null_and_nan_are_missing() {
        let s: Series = serde_yaml::from_str("[1.0, null, .nan, 4]").unwrap();
        assert_eq!(s.samples(), &[Some(1.0), None, None, Some(4.0)]);

        let out = serde_yaml::to_string(&s).unwrap();
        let back: Series = serde_yaml::from_str(&out).unwrap();
        assert_eq!(back, s);
    }
}
