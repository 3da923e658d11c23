/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Fixed simulation driver.
//!
//! [`Simulation::run`] walks a [`ModelState`] through every step in strictly
//! increasing order.  Per step:
//!
//! 1. move the state to the step index;
//! 2. seed default inputs from their series;
//! 3. call the [`Scheme`] (which usually issues one or more `set_q` calls);
//! 4. record every variable into the history.
//!
//! Control logic is supplied as a [`Scheme`] value instead of by subclassing
//! the model.  Closures implement `Scheme`, as does the configured scheme list
//! in [`crate::config`].

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::dispatcher::SetQError;
use crate::series::Series;
use crate::source::{ModelState, SeriesSource, SourceError};

// ── Scheme ────────────────────────────────────────────────────────────────────

/// Control logic applied once per step.
pub trait Scheme {
    /// Apply the scheme for the step `state.current_index()`.
    ///
    /// # Errors
    /// Any error aborts the run.
    fn apply(&mut self, state: &mut ModelState) -> Result<(), SetQError>;
}

impl<F> Scheme for F
where
    F: FnMut(&mut ModelState) -> Result<(), SetQError>,
{
    fn apply(&mut self, state: &mut ModelState) -> Result<(), SetQError> {
        self(state)
    }
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("scheme failed at step {step}: {source}")]
    Scheme {
        step: usize,
        #[source]
        source: SetQError,
    },

    #[error(transparent)]
    State(#[from] SourceError),
}

// ── Results ───────────────────────────────────────────────────────────────────

/// Recorded history of a finished run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResults {
    pub steps: usize,
    /// Variable name → one sample per step.
    pub series: BTreeMap<String, Series>,
}

impl SimulationResults {
    /// Recorded series of one variable.
    pub fn get(&self, name: &str) -> Option<&Series> {
        self.series.get(name)
    }

    /// Recorded value of `name` at `step`, if any.
    pub fn value_at(&self, name: &str, step: usize) -> Option<f64> {
        self.series.get(name)?.get(step)?
    }
}

// ── Simulation ────────────────────────────────────────────────────────────────

/// Single-threaded stepping driver.
pub struct Simulation<S> {
    state: ModelState,
    scheme: S,
}

impl<S: Scheme> Simulation<S> {
    pub fn new(state: ModelState, scheme: S) -> Self {
        Self { state, scheme }
    }

    /// Run every step and return the recorded history.
    ///
    /// # Errors
    /// The first scheme failure stops the run and is returned together with
    /// the failing step.
    pub fn run(mut self) -> Result<SimulationResults, SimulationError> {
        let steps = self.state.step_count();
        info!(steps, "simulation starting");

        for step in 0..steps {
            self.state.set_current_index(step)?;

            let seeded = self.state.seed_default_inputs();
            debug!(step, seeded, "default inputs applied");

            self.scheme
                .apply(&mut self.state)
                .map_err(|source| SimulationError::Scheme { step, source })?;

            self.state.record_step();
        }

        let series = self.state.into_history();
        info!(steps, variables = series.len(), "simulation complete");
        Ok(SimulationResults { steps, series })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
