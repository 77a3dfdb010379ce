// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan Contributors
// ABOUTME: Helper modules for the nutriplan CLI
// ABOUTME: Output formatting shared by every command

pub mod display;
