// ABOUTME: Re-exports the domain models defined in nutriplan-core
// ABOUTME: Profile, plan, food and progress types used throughout the main crate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan Contributors

//! # Data Models
//!
//! All persisted shapes live in `nutriplan-core`; see its `models` module for
//! field-level documentation.

pub use nutriplan_core::models::*;
