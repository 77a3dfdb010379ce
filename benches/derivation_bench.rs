// ABOUTME: Criterion benchmarks for profile derivation and completion normalization
// ABOUTME: Measures the per-request CPU cost outside of the network round trip
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan Contributors

//! Criterion benchmarks for the derivation and normalization hot paths.

#![allow(clippy::missing_docs_in_private_items, missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nutriplan::config::NutritionConfig;
use nutriplan::extraction::extract_json_block;
use nutriplan::intelligence::{compute_macro_targets, derive_metrics};
use nutriplan::models::{ActivityLevel, BodyMetrics, Gender, Goal};
use nutriplan::recommendations::{fallback_workout_plan, normalize_completion};

fn completion(prose_lines: usize) -> String {
    let days: Vec<String> = (1..=7)
        .map(|day| {
            format!(r#"{{"day":"Day {day}","exercises":["Walk","Plank"],"duration":"30 minutes","intensity":"Moderate","focus":"General"}}"#)
        })
        .collect();
    format!(
        "{}```json\n{{\"meals\":{{\"breakfast\":{{\"menu\":\"Oats\",\"calories\":\"600 kcal\"}},\
         \"lunch\":{{\"menu\":\"Rice\",\"calories\":850}},\"dinner\":{{\"menu\":\"Fish\",\"calories\":750}},\
         \"snacks\":{{\"menu\":\"Fruit\",\"calories\":266}}}},\"workout\":{{\"weeklyPlan\":[{}]}}}}\n```",
        "Here is a plan that fits you (see notes).\n".repeat(prose_lines),
        days.join(",")
    )
}

fn bench_profile_derivation(c: &mut Criterion) {
    let config = NutritionConfig::default();
    let metrics = BodyMetrics {
        weight_kg: 70.0,
        height_cm: 170.0,
        age: 25,
        gender: Gender::Male,
    };

    let mut group = c.benchmark_group("profile_derivation");
    group.bench_function("derive_metrics", |b| {
        b.iter(|| {
            derive_metrics(
                black_box(&metrics),
                black_box(ActivityLevel::Moderate),
                black_box(Goal::MaintainWeight),
                &config,
            )
        });
    });
    for goal in Goal::ALL {
        group.bench_with_input(BenchmarkId::new("macro_targets", goal), &goal, |b, goal| {
            b.iter(|| compute_macro_targets(black_box(2546), *goal, &config.macro_splits));
        });
    }
    group.finish();
}

fn bench_normalization(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalization");
    for prose_lines in [0, 10, 100] {
        let text = completion(prose_lines);
        group.bench_with_input(
            BenchmarkId::new("extract_json_block", prose_lines),
            &text,
            |b, text| b.iter(|| extract_json_block(black_box(text)).map(str::len)),
        );
        group.bench_with_input(
            BenchmarkId::new("normalize_completion", prose_lines),
            &text,
            |b, text| b.iter(|| normalize_completion(black_box(text), fallback_workout_plan)),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_profile_derivation, bench_normalization);
criterion_main!(benches);
