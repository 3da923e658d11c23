/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! The data boundary between the resolution engine and the model.
//!
//! [`SeriesSource`] is the whole interface the dispatcher needs: read a named
//! series or parameter, ask for the current step, and write one variable.
//! [`ModelState`] is the in-memory implementation driven by
//! [`Simulation`](crate::simulation::Simulation).
//!
//! # Series lookup order
//! `ModelState::get_series(name)` returns, in order of preference:
//! 1. the input series `name`;
//! 2. the recorded history of model variable `name` (steps that have not been
//!    recorded yet are missing samples).

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

use thiserror::Error;
use tracing::warn;

use crate::series::{finite, Series};

// ── SeriesSource ──────────────────────────────────────────────────────────────

/// Read/write access to the model, as seen by
/// [`set_q`](crate::dispatcher::set_q).
pub trait SeriesSource {
    /// Named series aligned with the simulation steps.
    fn get_series(&self, name: &str) -> Option<Cow<'_, Series>>;

    /// Named scalar parameter.  `None` if it does not exist.
    fn get_parameter(&self, name: &str) -> Option<f64>;

    /// Index of the step being simulated.
    fn current_index(&self) -> usize;

    /// Total number of steps in the run.
    fn step_count(&self) -> usize;

    /// Write one model variable.
    ///
    /// [`set_q`](crate::dispatcher::set_q) only ever writes finite values.
    fn set_variable(&mut self, name: &str, value: f64);
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("a run needs at least one step")]
    NoSteps,

    #[error("series '{name}' has {len} samples but the run has {steps} steps")]
    LengthMismatch {
        name: String,
        len: usize,
        steps: usize,
    },

    #[error("step index {index} is outside the run (steps {steps})")]
    StepOutOfRange { index: usize, steps: usize },
}

// ── ModelState ────────────────────────────────────────────────────────────────

/// In-memory model: input series, parameters, current variable values and the
/// per-step history of every variable.
///
/// `BTreeMap` for variables and history so results iterate in name order.
#[derive(Debug, Clone)]
pub struct ModelState {
    step_count: usize,
    current: usize,
    inputs: HashMap<String, Series>,
    parameters: HashMap<String, f64>,
    variables: BTreeMap<String, f64>,
    history: BTreeMap<String, Series>,
    default_inputs: Vec<String>,
}

impl ModelState {
    /// An empty model for a run of `step_count` steps.
    ///
    /// # Errors
    /// [`SourceError::NoSteps`] when `step_count` is zero.
    pub fn new(step_count: usize) -> Result<Self, SourceError> {
        if step_count == 0 {
            return Err(SourceError::NoSteps);
        }
        Ok(Self {
            step_count,
            current: 0,
            inputs: HashMap::new(),
            parameters: HashMap::new(),
            variables: BTreeMap::new(),
            history: BTreeMap::new(),
            default_inputs: Vec::new(),
        })
    }

    /// Add (or replace) an input series.
    ///
    /// # Errors
    /// The series length must equal the step count.
    pub fn insert_series(
        &mut self,
        name: impl Into<String>,
        series: Series,
    ) -> Result<(), SourceError> {
        let name = name.into();
        if series.len() != self.step_count {
            return Err(SourceError::LengthMismatch {
                name,
                len: series.len(),
                steps: self.step_count,
            });
        }
        self.inputs.insert(name, series);
        Ok(())
    }

    /// Add (or replace) a parameter.  A non-finite value is kept and later
    /// resolves as a missing parameter.
    pub fn insert_parameter(&mut self, name: impl Into<String>, value: f64) {
        self.parameters.insert(name.into(), value);
    }

    /// Seed `name` from the same-named input series at the start of each step.
    pub fn add_default_input(&mut self, name: impl Into<String>) {
        self.default_inputs.push(name.into());
    }

    /// Current value of a model variable.
    pub fn get_variable(&self, name: &str) -> Option<f64> {
        self.variables.get(name).copied()
    }

    /// Move to step `index`.
    ///
    /// # Errors
    /// [`SourceError::StepOutOfRange`] when `index >= step_count`.
    pub fn set_current_index(&mut self, index: usize) -> Result<(), SourceError> {
        if index >= self.step_count {
            return Err(SourceError::StepOutOfRange {
                index,
                steps: self.step_count,
            });
        }
        self.current = index;
        Ok(())
    }

    /// Apply the default inputs for the current step.
    ///
    /// A variable is only seeded when its input sample is valid; otherwise it
    /// keeps its previous value.  Returns the number of variables seeded.
    pub fn seed_default_inputs(&mut self) -> usize {
        let mut seeded = 0;
        for name in &self.default_inputs {
            let sample = self
                .inputs
                .get(name)
                .and_then(|s| s.get(self.current))
                .flatten();
            if let Some(value) = sample {
                self.variables.insert(name.clone(), value);
                seeded += 1;
            }
        }
        seeded
    }

    /// Store every variable's current value as the sample for this step.
    pub fn record_step(&mut self) {
        let steps = self.step_count;
        for (name, &value) in &self.variables {
            self.history
                .entry(name.clone())
                .or_insert_with(|| Series::missing(steps))
                .set(self.current, Some(value));
        }
    }

    /// Consume the state and return the recorded history.
    pub fn into_history(self) -> BTreeMap<String, Series> {
        self.history
    }
}

impl SeriesSource for ModelState {
    fn get_series(&self, name: &str) -> Option<Cow<'_, Series>> {
        self.inputs
            .get(name)
            .or_else(|| self.history.get(name))
            .map(Cow::Borrowed)
    }

    fn get_parameter(&self, name: &str) -> Option<f64> {
        self.parameters.get(name).copied()
    }

    fn current_index(&self) -> usize {
        self.current
    }

    fn step_count(&self) -> usize {
        self.step_count
    }

    /// Non-finite values are rejected and the variable keeps its value.
    fn set_variable(&mut self, name: &str, value: f64) {
        match finite(value) {
            Some(v) => {
                self.variables.insert(name.to_string(), v);
            }
            None => warn!(variable = name, value, "ignoring non-finite write"),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn state(steps: usize) -> ModelState {
        ModelState::new(steps).unwrap()
    }

    #[test]
    fn zero_steps_is_rejected() {
        assert_eq!(ModelState::new(0).unwrap_err(), SourceError::NoSteps);
    }

    #[test]
    fn series_length_must_match_step_count() {
        let mut s = state(3);
        let err = s
            .insert_series("Q_in", Series::from_values([1.0, 2.0]))
            .unwrap_err();
        assert_eq!(
            err,
            SourceError::LengthMismatch {
                name: "Q_in".into(),
                len: 2,
                steps: 3
            }
        );
        assert!(s.get_series("Q_in").is_none());
    }

    #[test]
    fn input_series_is_borrowed() {
        let mut s = state(2);
        s.insert_series("Q_in", Series::from_values([1.0, 2.0])).unwrap();
        let series = s.get_series("Q_in").unwrap();
        assert!(matches!(series, Cow::Borrowed(_)));
        assert_eq!(series.get(1), Some(Some(2.0)));
    }

    #[test]
    fn parameters_round_trip() {
        let mut s = state(1);
        s.insert_parameter("target_Q", 4.0);
        assert_eq!(s.get_parameter("target_Q"), Some(4.0));
        assert_eq!(s.get_parameter("other"), None);
    }

    #[test]
    fn current_index_is_bounded() {
        let mut s = state(3);
        s.set_current_index(2).unwrap();
        assert_eq!(s.current_index(), 2);
        assert!(s.set_current_index(3).is_err());
        assert_eq!(s.current_index(), 2);
    }

    #[test]
    fn history_is_visible_as_series_with_future_missing() {
        let mut s = state(3);
        s.set_variable("H", 10.0);
        s.record_step();
        s.set_current_index(1).unwrap();
        s.set_variable("H", 11.0);
        s.record_step();

        let h = s.get_series("H").unwrap();
        assert_eq!(h.samples(), &[Some(10.0), Some(11.0), None]);
    }

    #[test]
    fn input_series_shadows_history() {
        let mut s = state(2);
        s.insert_series("Q", Series::from_values([1.0, 2.0])).unwrap();
        s.set_variable("Q", 9.0);
        s.record_step();
        assert_eq!(s.get_series("Q").unwrap().get(0), Some(Some(1.0)));
    }

    #[test]
    fn default_inputs_seed_only_valid_samples() {
        let mut s = state(2);
        s.insert_series("Q_turbine", Series::from_samples([Some(3.0), None]))
            .unwrap();
        s.add_default_input("Q_turbine");

        assert_eq!(s.seed_default_inputs(), 1);
        assert_eq!(s.get_variable("Q_turbine"), Some(3.0));

        s.set_current_index(1).unwrap();
        assert_eq!(s.seed_default_inputs(), 0);
        assert_eq!(s.get_variable("Q_turbine"), Some(3.0), "previous value kept");
    }

    #[test]
    fn non_finite_write_keeps_previous_value() {
        let mut s = state(1);
        s.set_variable("Q", 1.0);
        s.set_variable("Q", f64::NAN);
        s.set_variable("Q", f64::INFINITY);
        assert_eq!(s.get_variable("Q"), Some(1.0));

        s.set_variable("R", f64::NEG_INFINITY);
        assert_eq!(s.get_variable("R"), None);
    }
}
