/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Pure arithmetic helpers for gap filling.
//!
//! Free functions so they can be tested independently of the run-scanning
//! logic in the parent module.

/// Linear interpolation between `(x0, y0)` and `(x1, y1)` evaluated at `x`.
///
/// Evaluated as `y0 + (y1 - y0) * (x - x0) / (x1 - x0)`, in that exact order,
/// so results are reproducible bit-for-bit.  When that form overflows (the
/// endpoints span more than the finite range) the weighted form
/// `y0 * (1 - t) + y1 * t` is used instead.  Callers guarantee `x0 != x1`.
pub fn lerp(x0: f64, y0: f64, x1: f64, y1: f64, x: f64) -> f64 {
    let y = y0 + (y1 - y0) * (x - x0) / (x1 - x0);
    if y.is_finite() {
        return y;
    }
    let t = (x - x0) / (x1 - x0);
    y0 * (1.0 - t) + y1 * t
}

/// Fill value for a missing position given its nearest valid neighbours.
///
/// * both neighbours → linear interpolation
/// * one neighbour   → constant extension of that neighbour
/// * none            → `None` (unrecoverable)
pub fn fill_between<F>(
    prev: Option<(usize, f64)>,
    next: Option<(usize, f64)>,
    coord: F,
    index: usize,
) -> Option<f64>
where
    F: Fn(usize) -> f64,
{
    match (prev, next) {
        (Some((pi, pv)), Some((ni, nv))) => {
            Some(lerp(coord(pi), pv, coord(ni), nv, coord(index)))
        }
        (Some((_, v)), None) | (None, Some((_, v))) => Some(v),
        (None, None) => None,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
