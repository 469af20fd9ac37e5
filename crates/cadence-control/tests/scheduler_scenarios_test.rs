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

use cadence_control::{SchedulerContext, SchedulerProvider};
use cadence_core::{priorities, QualityTier, SchedulerConfig, StaticProbe};

fn drive(provider: &mut SchedulerProvider, fps: f32, ticks: usize) {
    for _ in 0..ticks {
        provider.tick(1.0 / fps);
    }
}

/// Counts how many of the next `ticks` ticks let `id` animate.
fn count_runs(
    provider: &mut SchedulerProvider,
    ctx: &SchedulerContext,
    id: &str,
    fps: f32,
    ticks: usize,
) -> usize {
    let mut runs = 0;
    for _ in 0..ticks {
        provider.tick(1.0 / fps);
        if ctx.should_animate_this_frame(id) {
            runs += 1;
        }
    }
    runs
}

#[test]
fn test_healthy_frame_rate_animates_every_phase() {
    // --- 1. ARRANGE ---
    let mut provider =
        SchedulerProvider::mount("panel", SchedulerConfig::default(), &StaticProbe::CAPABLE)
            .expect("default config is valid");
    let ctx = provider.context();
    let _leds = ctx.acquire_phase("leds", priorities::LED);
    let _scan = ctx.acquire_phase("scanline", priorities::SCANLINE);

    // --- 2. ACT ---
    drive(&mut provider, 55.0, 60);

    // --- 3. ASSERT ---
    assert_eq!(ctx.quality_tier(), QualityTier::High);
    assert_eq!(count_runs(&mut provider, &ctx, "leds", 55.0, 16), 16);
    assert_eq!(count_runs(&mut provider, &ctx, "scanline", 55.0, 16), 16);
}

#[test]
fn test_slow_frame_rate_thins_out_low_priority_phases() {
    // --- 1. ARRANGE ---
    let mut provider =
        SchedulerProvider::mount("panel", SchedulerConfig::default(), &StaticProbe::CAPABLE)
            .expect("default config is valid");
    let ctx = provider.context();
    let _leds = ctx.acquire_phase("leds", priorities::LED);
    let _scan = ctx.acquire_phase("scanline", priorities::SCANLINE);
    let _spin = ctx.acquire_phase("spinner", priorities::SPINNER);

    // --- 2. ACT ---
    drive(&mut provider, 20.0, 120);

    // --- 3. ASSERT ---
    assert_eq!(ctx.quality_tier(), QualityTier::Low);
    let leds = count_runs(&mut provider, &ctx, "leds", 20.0, 16);
    let scan = count_runs(&mut provider, &ctx, "scanline", 20.0, 16);
    let spin = count_runs(&mut provider, &ctx, "spinner", 20.0, 16);
    assert!(leds < 16, "LEDs must skip ticks at Low tier");
    assert!(leds <= scan && scan <= spin, "higher priority never runs less often");
    assert_eq!(spin, 16);
}

#[test]
fn test_recovery_restores_full_rate() {
    let mut provider =
        SchedulerProvider::mount("panel", SchedulerConfig::default(), &StaticProbe::CAPABLE)
            .expect("default config is valid");
    let ctx = provider.context();
    let _leds = ctx.acquire_phase("leds", priorities::LED);

    drive(&mut provider, 20.0, 120);
    assert_eq!(ctx.quality_tier(), QualityTier::Low);
    drive(&mut provider, 60.0, 120);
    assert_eq!(ctx.quality_tier(), QualityTier::High);
    assert_eq!(count_runs(&mut provider, &ctx, "leds", 60.0, 8), 8);
}

#[test]
fn test_context_without_provider_uses_defaults() {
    let ctx = SchedulerContext::detached();
    let handle = ctx.acquire_phase("leds", priorities::LED);

    assert_eq!(ctx.quality_tier(), QualityTier::High);
    assert!(ctx.quality_settings().is_some());
    assert!(handle.should_animate());
    ctx.unregister("leds");
    ctx.unregister("leds");
}

#[test]
fn test_unmounting_provider_releases_everything() {
    // --- 1. ARRANGE ---
    let provider =
        SchedulerProvider::mount("panel", SchedulerConfig::default(), &StaticProbe::CAPABLE)
            .expect("default config is valid");
    let ctx = provider.context();
    let handle = ctx.acquire_phase("leds", priorities::LED);
    let liveness = handle.liveness();

    // --- 2. ACT ---
    drop(provider);

    // --- 3. ASSERT ---
    assert!(!ctx.is_attached());
    assert!(ctx.should_animate_this_frame("leds"));
    // The handle outlives the provider and drops cleanly.
    drop(handle);
    assert!(!liveness.is_alive());
}

#[test]
fn test_sibling_subtrees_do_not_interfere() {
    let mut busy =
        SchedulerProvider::mount("busy", SchedulerConfig::default(), &StaticProbe::CAPABLE)
            .expect("default config is valid");
    let idle = SchedulerProvider::mount("idle", SchedulerConfig::default(), &StaticProbe::CAPABLE)
        .expect("default config is valid");
    let busy_ctx = busy.context();
    let idle_ctx = idle.context();
    busy_ctx.register("leds", priorities::LED);

    drive(&mut busy, 20.0, 120);

    assert_eq!(busy_ctx.quality_tier(), QualityTier::Low);
    assert_eq!(idle_ctx.quality_tier(), QualityTier::High);
    assert_eq!(idle_ctx.priority_of("leds"), None);
}

#[test]
fn test_provider_from_ron_config() {
    let config = SchedulerConfig::from_ron_str(
        "(thresholds: (low_fps: 20.0, high_fps: 40.0), low_performance_override: Some(false))",
    )
    .expect("config should parse");
    let mut provider = SchedulerProvider::mount("ron", config, &StaticProbe::LOW_END)
        .expect("config is valid");

    drive(&mut provider, 30.0, 120);

    assert_eq!(provider.state().quality_tier, QualityTier::Medium);
    assert!(!provider.state().is_low_performance_device);
}

#[test]
fn test_frame_stats_track_recent_ticks() {
    let mut provider =
        SchedulerProvider::mount("stats", SchedulerConfig::default(), &StaticProbe::CAPABLE)
            .expect("default config is valid");
    for i in 0..60 {
        provider.tick(if i % 2 == 0 { 0.010 } else { 0.030 });
    }
    let stats = provider.frame_stats();
    assert_eq!(stats.samples, 60);
    assert!(stats.is_stuttering());
}
