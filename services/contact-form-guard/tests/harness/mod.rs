// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test harness for contact form abuse simulation.
//!
//! Attacks run against a guard driven by a manual clock, so simulated
//! minutes pass instantly and outcomes are deterministic.

pub mod attacks;
pub mod generators;
pub mod metrics;
