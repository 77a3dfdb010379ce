// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan Contributors
// ABOUTME: Command modules for the nutriplan CLI
// ABOUTME: Profile, plan, meal log and progress commands

pub mod meals;
pub mod plan;
pub mod profile;
pub mod progress;
