// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod layer;
pub mod probe;

pub use layer::{LayerDescriptor, LayerGroup, LayerKind, LayerSummary};
pub use probe::{ProbeEntry, ProbeOutcome, ProbePoint, ProbeReport};
