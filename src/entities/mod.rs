// ABOUTME: Entity types shipped with the core, each with its column constants and descriptor set
// ABOUTME: Alpha and Beta carry managed timestamps; AllTypes spans every supported affinity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Uuid-keyed animal rows with `FirstInsert` / `LastUpdate`
pub mod alpha;
/// Every supported column affinity in one table
pub mod all_types;
/// Named rows with `first_insert` / `last_update`
pub mod beta;

pub use all_types::AllTypes;
pub use alpha::Alpha;
pub use beta::Beta;
