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

//! # Cadence Control
//!
//! The adaptive part of the scheduler: frame-rate sampling, tier
//! classification, animation phase gating and the per-subtree provider that
//! ties them together.

#![warn(missing_docs)]

pub mod classifier;
pub mod history;
pub mod phases;
pub mod provider;
pub mod sampler;

pub use classifier::{classify, QualityClassifier};
pub use history::{FrameHistory, FrameStats};
pub use phases::{runs_on_frame, skip_interval, PhaseRegistry};
pub use provider::{PhaseHandle, SchedulerContext, SchedulerProvider};
pub use sampler::FrameSampler;
