// ABOUTME: Re-exports the unified error types from nutriplan-core
// ABOUTME: Keeps crate::errors paths stable for every module of the main crate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan Contributors

//! # Unified Error Handling System
//!
//! Error types are defined in `nutriplan-core` so persisted models and the
//! main crate share one taxonomy. This module re-exports them.

pub use nutriplan_core::errors::{AppError, AppResult, ErrorCode, RecommendationError};
