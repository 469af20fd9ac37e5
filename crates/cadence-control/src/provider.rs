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

//! Per-subtree scheduler provider and the consumer-facing context.
//!
//! A [`SchedulerProvider`] is mounted for one scene subtree and owns the
//! sampler, classifier and phase registry of that subtree. Consumers never
//! touch it directly; they receive a [`SchedulerContext`], a cheap clonable
//! view holding a weak reference to the provider's state. When no provider
//! exists (or it has been unmounted) the context answers with safe defaults:
//! `High` tier, every phase animates, registration is a no-op.
//!
//! Phases are acquired as scoped [`PhaseHandle`]s. Dropping the handle
//! releases the phase on every path, and invalidates the handle's
//! [`PhaseLiveness`] so late offload results are discarded.

use crate::classifier::QualityClassifier;
use crate::history::{FrameHistory, FrameStats};
use crate::phases::PhaseRegistry;
use crate::sampler::FrameSampler;
use cadence_core::{
    ConfigError, DeviceProbe, FrameSample, PerformanceState, PhaseId, PhaseLease, PhaseLiveness,
    QualityProfile, QualityTier, SchedulerConfig,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

/// Everything one provider owns.
#[derive(Debug)]
struct SchedulerCore {
    label: String,
    sampler: FrameSampler,
    classifier: QualityClassifier,
    registry: PhaseRegistry,
    history: FrameHistory,
    state: PerformanceState,
}

impl SchedulerCore {
    fn advance(&mut self, delta_seconds: f32) -> PerformanceState {
        let fps = self.sampler.sample(delta_seconds);
        self.history.push(delta_seconds * 1000.0);

        let tier = self
            .classifier
            .classify(fps, self.state.is_low_performance_device);
        if tier != self.state.quality_tier {
            log::info!(
                "Scheduler[{}]: quality tier {} -> {} at {:.1} fps",
                self.label,
                self.state.quality_tier,
                tier,
                fps
            );
        }

        self.state.fps = fps;
        self.state.quality_tier = tier;
        self.state.frame_index = self.state.frame_index.wrapping_add(1);
        log::trace!(
            "Scheduler[{}]: tick {} fps={:.2} tier={}",
            self.label,
            self.state.frame_index,
            fps,
            tier
        );
        self.state
    }
}

type SharedCore = Arc<RwLock<SchedulerCore>>;

fn read(core: &RwLock<SchedulerCore>) -> RwLockReadGuard<'_, SchedulerCore> {
    core.read().unwrap_or_else(PoisonError::into_inner)
}

fn write(core: &RwLock<SchedulerCore>) -> RwLockWriteGuard<'_, SchedulerCore> {
    core.write().unwrap_or_else(PoisonError::into_inner)
}

/// Owns the scheduler state of one scene subtree.
///
/// Mount one per subtree; instances never share state. Dropping the
/// provider clears its phase registry and detaches every context handed out.
#[derive(Debug)]
pub struct SchedulerProvider {
    core: SharedCore,
}

impl SchedulerProvider {
    /// Validates `config` and mounts a provider for the subtree `label`.
    ///
    /// The low-performance flag comes from `config.low_performance_override`
    /// when set, otherwise from `probe`.
    pub fn mount(
        label: impl Into<String>,
        config: SchedulerConfig,
        probe: &dyn DeviceProbe,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let label = label.into();

        let is_low_performance_device = match config.low_performance_override {
            Some(forced) => forced,
            None => probe.is_low_performance_device(),
        };

        let classifier = QualityClassifier::new(config.thresholds, config.quality);
        let sampler = FrameSampler::new(config.sampler);
        let fps = sampler.fps();
        let state = PerformanceState {
            fps,
            quality_tier: classifier.classify(fps, is_low_performance_device),
            is_low_performance_device,
            frame_index: 0,
        };

        let device = if is_low_performance_device {
            String::from("low-performance device")
        } else {
            probe.describe()
        };
        log::info!(
            "Scheduler[{}]: mounted ({}, initial tier {})",
            label,
            device,
            state.quality_tier
        );

        Ok(Self {
            core: Arc::new(RwLock::new(SchedulerCore {
                label,
                sampler,
                classifier,
                registry: PhaseRegistry::new(),
                history: FrameHistory::new(),
                state,
            })),
        })
    }

    /// Render-loop callback: folds one tick into the scheduler state.
    ///
    /// Must be called exactly once per tick with the elapsed delta time.
    pub fn tick(&mut self, delta_seconds: f32) -> PerformanceState {
        write(&self.core).advance(delta_seconds)
    }

    /// Same as [`tick`](Self::tick) for a millisecond-based sample.
    pub fn record(&mut self, sample: FrameSample) -> PerformanceState {
        self.tick(sample.delta_secs() as f32)
    }

    /// Returns a consumer view of this provider.
    pub fn context(&self) -> SchedulerContext {
        SchedulerContext {
            core: Some(Arc::downgrade(&self.core)),
            warned: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Current performance snapshot.
    pub fn state(&self) -> PerformanceState {
        read(&self.core).state
    }

    /// Summary of the recent frame-time window.
    pub fn frame_stats(&self) -> FrameStats {
        read(&self.core).history.stats()
    }

    /// Number of currently registered phases.
    pub fn phase_count(&self) -> usize {
        read(&self.core).registry.len()
    }

    /// The subtree label given at mount time.
    pub fn label(&self) -> String {
        read(&self.core).label.clone()
    }
}

impl Drop for SchedulerProvider {
    fn drop(&mut self) {
        let mut core = write(&self.core);
        let remaining = core.registry.len();
        core.registry.clear();
        log::info!(
            "Scheduler[{}]: unmounted, released {} phase(s)",
            core.label,
            remaining
        );
    }
}

/// Consumer-facing view of a scheduler provider.
///
/// Cloning is cheap. All clones of one context share the "already warned"
/// flag used when it operates without a provider.
#[derive(Debug, Clone)]
pub struct SchedulerContext {
    core: Option<Weak<RwLock<SchedulerCore>>>,
    warned: Arc<AtomicBool>,
}

impl Default for SchedulerContext {
    fn default() -> Self {
        Self::detached()
    }
}

impl SchedulerContext {
    /// A context with no provider behind it.
    pub fn detached() -> Self {
        Self {
            core: None,
            warned: Arc::new(AtomicBool::new(false)),
        }
    }

    fn core(&self) -> Option<SharedCore> {
        self.core.as_ref().and_then(Weak::upgrade)
    }

    fn warn_detached(&self, operation: &str, id: &str) {
        if !self.warned.swap(true, Ordering::Relaxed) {
            log::warn!(
                "SchedulerContext: {operation}('{id}') called without a scheduler provider; \
                 falling back to defaults"
            );
        }
    }

    /// Returns `true` while the provider behind this context is mounted.
    pub fn is_attached(&self) -> bool {
        self.core().is_some()
    }

    /// Current performance snapshot, or the default snapshot when detached.
    pub fn state(&self) -> PerformanceState {
        self.core()
            .map(|core| read(&core).state)
            .unwrap_or_default()
    }

    /// Smoothed frame rate.
    pub fn fps(&self) -> f32 {
        self.state().fps
    }

    /// Current quality tier (`High` when detached).
    pub fn quality_tier(&self) -> QualityTier {
        self.state().quality_tier
    }

    /// Whether the provider flagged the device as low-performance.
    pub fn is_low_performance_device(&self) -> bool {
        self.state().is_low_performance_device
    }

    /// Profile for the current tier.
    ///
    /// `None` when the provider's table has no entry for the current tier.
    /// Detached contexts return [`QualityProfile::HIGH`].
    pub fn quality_settings(&self) -> Option<QualityProfile> {
        match self.core() {
            Some(core) => {
                let core = read(&core);
                core.classifier.quality_settings(core.state.quality_tier)
            }
            None => Some(QualityProfile::HIGH),
        }
    }

    /// Registers (or re-prioritizes) a phase. No-op when detached.
    pub fn register(&self, id: impl Into<PhaseId>, priority: i32) {
        let id = id.into();
        match self.core() {
            Some(core) => {
                write(&core).registry.register(id, priority);
            }
            None => self.warn_detached("register", id.as_str()),
        }
    }

    /// Removes a phase. Idempotent; no-op when detached.
    pub fn unregister(&self, id: &str) {
        match self.core() {
            Some(core) => {
                write(&core).registry.unregister(id);
            }
            None => self.warn_detached("unregister", id),
        }
    }

    /// Whether `id` may animate on the current tick. Always `true` when
    /// detached or when `id` is not registered.
    pub fn should_animate_this_frame(&self, id: &str) -> bool {
        match self.core() {
            Some(core) => {
                let core = read(&core);
                core.registry
                    .should_animate(id, core.state.quality_tier, core.state.frame_index)
            }
            None => true,
        }
    }

    /// Priority currently registered for `id`.
    pub fn priority_of(&self, id: &str) -> Option<i32> {
        self.core()
            .and_then(|core| read(&core).registry.priority(id))
    }

    /// Registers a phase and returns a handle that releases it when dropped.
    pub fn acquire_phase(&self, id: impl Into<PhaseId>, priority: i32) -> PhaseHandle {
        let id = id.into();
        let generation = match self.core() {
            Some(core) => Some(write(&core).registry.register(id.clone(), priority)),
            None => {
                self.warn_detached("register", id.as_str());
                None
            }
        };
        PhaseHandle {
            id,
            priority,
            generation,
            context: self.clone(),
            lease: PhaseLease::new(),
        }
    }

    fn release(&self, id: &str, generation: u64) {
        if let Some(core) = self.core() {
            write(&core).registry.unregister_owned(id, generation);
        }
    }
}

/// Scoped registration of one animation phase.
///
/// The phase stays registered for as long as the handle lives.
#[derive(Debug)]
pub struct PhaseHandle {
    id: PhaseId,
    priority: i32,
    generation: Option<u64>,
    context: SchedulerContext,
    lease: PhaseLease,
}

impl PhaseHandle {
    /// The phase id.
    pub fn id(&self) -> &PhaseId {
        &self.id
    }

    /// The priority this handle registered with.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Whether the phase may animate on the current tick.
    pub fn should_animate(&self) -> bool {
        self.context.should_animate_this_frame(self.id.as_str())
    }

    /// Re-registers the phase with a new priority.
    pub fn set_priority(&mut self, priority: i32) {
        self.priority = priority;
        if let Some(core) = self.context.core() {
            self.generation = Some(write(&core).registry.register(self.id.clone(), priority));
        }
    }

    /// Observer that turns dead once this handle is dropped.
    pub fn liveness(&self) -> PhaseLiveness {
        self.lease.liveness()
    }

    /// The context this phase was acquired from.
    pub fn context(&self) -> &SchedulerContext {
        &self.context
    }

    /// Releases the phase now. Equivalent to dropping the handle.
    pub fn release(self) {}
}

impl Drop for PhaseHandle {
    fn drop(&mut self) {
        if let Some(generation) = self.generation.take() {
            self.context.release(self.id.as_str(), generation);
        }
    }
}
