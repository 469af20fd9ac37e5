// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # Cadence Core
//!
//! Foundational crate containing the shared types and interface contracts of
//! the adaptive performance scheduler: frame samples, quality tiers and their
//! profiles, animation phase identifiers, device capability probing, and the
//! scheduler configuration.
//!
//! `cadence-control` builds the sampler, classifier, phase registry and
//! provider on top of these types, `cadence-offload` provides the computation
//! bridge, and `cadence-infra` provides concrete device probes.

#![warn(missing_docs)]

pub mod config;
pub mod frame;
pub mod phase;
pub mod platform;
pub mod quality;

pub use config::{ConfigError, OffloadConfig, SamplerConfig, SchedulerConfig};
pub use frame::{FrameSample, PerformanceState};
pub use phase::{priorities, PhaseId, PhaseLease, PhaseLiveness};
pub use platform::{DeviceProbe, StaticProbe};
pub use quality::{QualityProfile, QualityTable, QualityThresholds, QualityTier};
