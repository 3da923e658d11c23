/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Reservoir SetQ – time-series / parameter resolution engine
//!
//! Module layout:
//!
//! ```text
//! lib.rs
//! ├── series/        – possibly-missing sample sequences
//! ├── interpolate/   – gap filling (linear, edge extension)
//! ├── resolver/      – MEAN / MIN / MAX / INST + recovery policies
//! ├── source/        – SeriesSource boundary + in-memory model state
//! ├── dispatcher/    – set_q: resolve an input, write one target variable
//! ├── simulation/    – fixed stepping driver with pluggable schemes
//! └── config/        – YAML scenario loading
//! ```

pub mod config;
pub mod dispatcher;
pub mod interpolate;
pub mod resolver;
pub mod series;
pub mod simulation;
pub mod source;
