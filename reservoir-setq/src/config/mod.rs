/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Scenario loading.
//!
//! A scenario file describes one simulation run: input series, parameters,
//! initial variables and the `set_q` schemes applied at each step.
//!
//! The expected YAML structure is:
//! ```yaml
//! steps: 6                        # optional, defaults to the series length
//! timeseries:
//!   Q_in: [1.0, 2.0, 3.0, 7.0, null, 5.0]
//! parameters:
//!   target_Q: 4.0
//! variables:
//!   Q_turbine: 0.0
//! default_inputs: [Q_turbine]
//! schemes:
//!   - target: Q_turbine
//!     input: { series: Q_in }
//!     mode: INST
//!     nan_option: CLOSEST
//!     steps: [2]
//!     on_no_data: skip
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::dispatcher::{set_q, InputSpec, SetQError, SetQRequest};
use crate::resolver::{AggregationMode, RecoveryPolicy};
use crate::series::Series;
use crate::simulation::Scheme;
use crate::source::{ModelState, SeriesSource};

// ── Private YAML deserialization types ────────────────────────────────────────

/// Top-level wrapper that maps directly onto the YAML file layout.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScenarioFile {
    steps: Option<usize>,
    #[serde(default)]
    timeseries: BTreeMap<String, Series>,
    #[serde(default)]
    parameters: BTreeMap<String, f64>,
    #[serde(default)]
    variables: BTreeMap<String, f64>,
    #[serde(default)]
    default_inputs: Vec<String>,
    #[serde(default)]
    schemes: Vec<SchemeEntry>,
}

/// One scheme as it appears in the YAML file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SchemeEntry {
    target: String,
    input: InputSpec,
    #[serde(default)]
    mode: AggregationMode,
    #[serde(default)]
    nan_option: RecoveryPolicy,
    index: Option<usize>,
    steps: Option<Vec<usize>>,
    #[serde(default)]
    on_no_data: OnNoData,
}

// ── Public data structures ────────────────────────────────────────────────────

/// What a configured scheme does when `set_q` reports `NoData`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnNoData {
    /// Stop the run.
    #[default]
    Abort,
    /// Warn and leave the target unchanged for this step.
    Skip,
}

/// One configured `set_q` call and when it applies.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemeRule {
    pub request: SetQRequest,
    /// Steps at which the rule applies; `None` means every step.
    pub steps: Option<BTreeSet<usize>>,
    pub on_no_data: OnNoData,
}

impl SchemeRule {
    pub fn applies_at(&self, step: usize) -> bool {
        self.steps.as_ref().map_or(true, |s| s.contains(&step))
    }
}

/// Ordered list of rules, applied top to bottom at each step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfiguredSchemes {
    rules: Vec<SchemeRule>,
}

impl ConfiguredSchemes {
    pub fn new(rules: Vec<SchemeRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[SchemeRule] {
        &self.rules
    }
}

impl Scheme for ConfiguredSchemes {
    fn apply(&mut self, state: &mut ModelState) -> Result<(), SetQError> {
        let step = state.current_index();
        for rule in self.rules.iter().filter(|r| r.applies_at(step)) {
            match set_q(state, &rule.request) {
                Ok(report) => debug!(
                    step,
                    variable  = %report.target,
                    value     = report.value,
                    input     = %report.input,
                    mode      = %report.mode,
                    index     = ?report.index,
                    recovered = ?report.recovered_with,
                    "set_q applied"
                ),
                Err(e) if e.is_no_data() && rule.on_no_data == OnNoData::Skip => {
                    warn!(step, variable = %rule.request.target, "skipping set_q: {}", e);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

/// A fully validated scenario.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub steps: usize,
    pub timeseries: BTreeMap<String, Series>,
    pub parameters: BTreeMap<String, f64>,
    pub variables: BTreeMap<String, f64>,
    pub default_inputs: Vec<String>,
    pub schemes: ConfiguredSchemes,
}

impl Scenario {
    /// Read and validate a scenario file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, the YAML is malformed, or
    /// the scenario is inconsistent (see [`from_yaml_str`](Self::from_yaml_str)).
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading scenario from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open scenario file: {}", path.display()))?;

        let scenario = Self::from_yaml_str(&content)
            .with_context(|| format!("Invalid scenario file: {}", path.display()))?;

        info!(
            steps = scenario.steps,
            series = scenario.timeseries.len(),
            parameters = scenario.parameters.len(),
            schemes = scenario.schemes.rules().len(),
            "Scenario loaded"
        );
        Ok(scenario)
    }

    /// Parse and validate a scenario from YAML text.
    ///
    /// * `steps` defaults to the common series length.
    /// * Every series must have exactly `steps` samples.
    /// * Scheme targets must be non-empty; fixed indices and step filters must
    ///   lie inside the run.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let file: ScenarioFile =
            serde_yaml::from_str(content).context("Failed to parse scenario YAML")?;

        let steps = match file.steps {
            Some(steps) => steps,
            None => match file.timeseries.values().next() {
                Some(series) => series.len(),
                None => bail!("scenario has no timeseries and no 'steps' value"),
            },
        };
        if steps == 0 {
            bail!("scenario must have at least one step");
        }

        for (name, series) in &file.timeseries {
            if series.len() != steps {
                bail!(
                    "timeseries '{}' has {} samples, expected {}",
                    name,
                    series.len(),
                    steps
                );
            }
            if series.is_all_missing() {
                warn!(series = %name, "timeseries contains no valid samples");
            }
        }

        for name in &file.default_inputs {
            if !file.timeseries.contains_key(name) {
                warn!(variable = %name, "default input has no timeseries of the same name");
            }
        }

        let mut rules = Vec::with_capacity(file.schemes.len());
        for (i, entry) in file.schemes.into_iter().enumerate() {
            rules.push(
                Self::build_rule(entry, steps).with_context(|| format!("scheme #{}", i + 1))?,
            );
        }

        Ok(Self {
            steps,
            timeseries: file.timeseries,
            parameters: file.parameters,
            variables: file.variables,
            default_inputs: file.default_inputs,
            schemes: ConfiguredSchemes::new(rules),
        })
    }

    fn build_rule(entry: SchemeEntry, steps: usize) -> Result<SchemeRule> {
        if entry.target.trim().is_empty() {
            bail!("scheme target must not be empty");
        }
        if let Some(index) = entry.index {
            if index >= steps {
                bail!("index {} is outside the run ({} steps)", index, steps);
            }
            if entry.mode.is_whole_series() {
                warn!(
                    variable = %entry.target,
                    mode = %entry.mode,
                    "index is ignored by whole-series modes"
                );
            }
        }
        let step_filter = match entry.steps {
            Some(list) => {
                if let Some(&bad) = list.iter().find(|&&s| s >= steps) {
                    bail!("step {} is outside the run ({} steps)", bad, steps);
                }
                Some(list.into_iter().collect::<BTreeSet<_>>())
            }
            None => None,
        };

        let mut request = SetQRequest::new(entry.target, entry.input)
            .mode(entry.mode)
            .recovery(entry.nan_option);
        request.index = entry.index;

        debug!(
            variable = %request.target,
            input = %request.input,
            mode = %request.mode,
            recovery = %request.recovery,
            "scheme configured"
        );

        Ok(SchemeRule {
            request,
            steps: step_filter,
            on_no_data: entry.on_no_data,
        })
    }

    /// Build the initial model state described by this scenario.
    ///
    /// # Errors
    /// Propagates [`SourceError`](crate::source::SourceError) from the state
    /// builder; unreachable for a scenario produced by the loaders above.
    pub fn build_state(&self) -> Result<ModelState> {
        let mut state = ModelState::new(self.steps)?;
        for (name, series) in &self.timeseries {
            state.insert_series(name.clone(), series.clone())?;
        }
        for (name, &value) in &self.parameters {
            state.insert_parameter(name.clone(), value);
        }
        for (name, &value) in &self.variables {
            state.set_variable(name, value);
        }
        for name in &self.default_inputs {
            state.add_default_input(name.clone());
        }
        Ok(state)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
