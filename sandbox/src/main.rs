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

// Cadence Sandbox
// Headless run of a scene subtree under a synthetic frame-time trace.
//
// Usage: sandbox [config.ron]

use anyhow::{Context as _, Result};
use cadence_control::SchedulerProvider;
use cadence_core::{QualityTier, SchedulerConfig};
use cadence_infra::SysinfoProbe;
use cadence_offload::OffloadBridge;
use cadence_scene::{PartKind, Showcase, ShowcaseLayout, SlotTable};

/// Segments of the trace: (seconds, frames per second).
const TRACE: &[(f32, f32)] = &[(3.0, 60.0), (3.0, 20.0), (3.0, 40.0), (3.0, 60.0)];

fn load_config() -> Result<SchedulerConfig> {
    match std::env::args().nth(1) {
        Some(path) => SchedulerConfig::load(&path)
            .with_context(|| format!("failed to load scheduler config '{path}'")),
        None => Ok(SchedulerConfig::default()),
    }
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = load_config()?;
    let probe = SysinfoProbe::new();
    let mut bridge = OffloadBridge::new(&config.offload);
    let mut provider = SchedulerProvider::mount("sandbox", config, &probe)?;
    let ctx = provider.context();

    let layout = ShowcaseLayout::default();
    let slots = SlotTable::parts(
        layout.wanted_slots().into_iter().map(|kind| (kind, kind.to_string())),
        &[PartKind::LedSphere],
    )?;
    let mut showcase = Showcase::mount(&ctx, &slots, &layout);

    let mut elapsed = 0.0_f32;
    let mut led_updates = 0_u64;
    let mut spinner_moves = 0_u64;
    let mut ticks_per_tier = [0_u64; 3];

    for &(seconds, fps) in TRACE {
        log::info!("Sandbox: running {seconds}s at {fps} fps");
        let delta = 1.0 / fps;
        let frames = (seconds * fps).round() as u32;
        for frame in 0..frames {
            elapsed += delta;
            let state = provider.tick(delta);
            let report = showcase.update(&bridge, elapsed, delta);

            led_updates += u64::from(report.leds_applied);
            spinner_moves += u64::from(report.spinner_advanced);
            ticks_per_tier[match state.quality_tier {
                QualityTier::Low => 0,
                QualityTier::Medium => 1,
                QualityTier::High => 2,
            }] += 1;

            if frame + 1 == frames {
                let stats = provider.frame_stats();
                log::info!(
                    "Sandbox: t={:.1}s fps={:.1} tier={} frame avg={:.2}ms var={:.2}{}",
                    elapsed,
                    state.fps,
                    state.quality_tier,
                    stats.average_ms,
                    stats.variance_ms2,
                    if stats.is_stuttering() { " (stuttering)" } else { "" }
                );
            }
        }
    }

    bridge.shutdown();
    let offload = bridge.stats();
    log::info!(
        "Sandbox: {} LED update(s), {} spinner move(s), ticks per tier LOW/MEDIUM/HIGH = {:?}",
        led_updates,
        spinner_moves,
        ticks_per_tier
    );
    log::info!(
        "Sandbox: offload submitted={} offloaded={} inline={} fallbacks={} discarded={}",
        offload.submitted,
        offload.offloaded,
        offload.inline,
        offload.fallbacks,
        offload.discarded
    );
    Ok(())
}
