// ABOUTME: Core types and constants for the NutriPlan nutrition and training planner
// ABOUTME: Foundation crate with error handling, domain models, and storage key constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan Contributors

#![deny(unsafe_code)]

//! # NutriPlan Core
//!
//! Foundation crate providing shared types for the NutriPlan planner. It holds
//! everything that has no behaviour beyond validation and (de)serialization,
//! so the main crate can change freely without touching persisted shapes.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and the
//!   recommendation failure taxonomy
//! - **constants**: Storage keys, schema version, and physiological bounds
//! - **models**: User profile, meal/workout plans, foods, and progress entries

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models (profile, plans, foods, progress)
pub mod models;
