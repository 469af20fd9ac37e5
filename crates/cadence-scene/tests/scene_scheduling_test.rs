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

use cadence_control::SchedulerProvider;
use cadence_core::{QualityProfile, QualityTable, QualityTier, SchedulerConfig, StaticProbe};
use cadence_offload::OffloadBridge;
use cadence_scene::{
    compute_led_colors, LedBank, LedColorRequest, PartKind, ScanlineAnimator, ScreenSpec,
    ScreenSurface, Showcase, ShowcaseLayout, SlotTable, LED_BASE_COLOR,
};
use std::time::{Duration, Instant};

fn full_slots() -> SlotTable<PartKind, &'static str> {
    let layout = ShowcaseLayout::default();
    SlotTable::parts(
        layout.wanted_slots().into_iter().map(|kind| (kind, "mesh")),
        &[PartKind::LedSphere],
    )
    .expect("slots are valid")
}

fn mount() -> SchedulerProvider {
    SchedulerProvider::mount("scene", SchedulerConfig::default(), &StaticProbe::CAPABLE)
        .expect("default config is valid")
}

fn settle_low(provider: &mut SchedulerProvider) {
    for _ in 0..120 {
        provider.tick(1.0 / 20.0);
    }
    assert_eq!(provider.state().quality_tier, QualityTier::Low);
}

#[test]
fn test_led_bank_applies_colors_inline_every_tick_at_high_tier() {
    // --- 1. ARRANGE ---
    let mut provider = mount();
    let ctx = provider.context();
    let bridge = OffloadBridge::inline();
    let positions = vec![[-2.0, 0.0, 0.0], [0.5, 0.0, 0.0]];
    let mut leds =
        LedBank::mount(&ctx, &full_slots(), positions.clone()).expect("sphere slot present");

    // --- 2. ACT ---
    let mut applied = 0;
    for i in 0..10 {
        provider.tick(1.0 / 60.0);
        if leds.update(&bridge, i as f32 / 60.0) {
            applied += 1;
        }
    }

    // --- 3. ASSERT ---
    assert_eq!(applied, 10);
    let expected = compute_led_colors(LedColorRequest {
        positions,
        time: 9.0 / 60.0,
        base_color: LED_BASE_COLOR,
    })
    .unwrap();
    assert_eq!(leds.colors(), expected.as_slice());
}

#[test]
fn test_led_bank_updates_less_often_at_low_tier() {
    let mut provider = mount();
    let ctx = provider.context();
    let bridge = OffloadBridge::inline();
    let mut leds = LedBank::mount(&ctx, &full_slots(), vec![[0.1, 0.0, 0.0]]).unwrap();
    settle_low(&mut provider);

    let mut applied = 0;
    for i in 0..16 {
        provider.tick(1.0 / 20.0);
        if leds.update(&bridge, i as f32) {
            applied += 1;
        }
    }
    assert_eq!(applied, 4);
}

#[test]
fn test_led_bank_with_workers_eventually_applies() {
    let mut provider = mount();
    let ctx = provider.context();
    let bridge = OffloadBridge::with_workers(1, 4);
    let mut leds = LedBank::mount(&ctx, &full_slots(), vec![[0.3, 0.0, 0.0]; 8]).unwrap();

    let deadline = Instant::now() + Duration::from_secs(10);
    let mut elapsed = 0.0;
    while leds.updates_applied() == 0 {
        assert!(Instant::now() < deadline, "worker result never applied");
        provider.tick(1.0 / 60.0);
        elapsed += 1.0 / 60.0;
        leds.update(&bridge, elapsed);
        std::thread::sleep(Duration::from_millis(1));
    }
    assert_eq!(leds.colors().len(), 8);
}

#[test]
fn test_dropping_bank_with_result_in_flight_is_safe() {
    let mut provider = mount();
    let ctx = provider.context();
    let bridge = OffloadBridge::with_workers(1, 4);
    let mut leds = LedBank::mount(&ctx, &full_slots(), vec![[0.3, 0.0, 0.0]; 64]).unwrap();

    provider.tick(1.0 / 60.0);
    leds.update(&bridge, 0.0);
    drop(leds);

    assert_eq!(provider.phase_count(), 0);
    // Let the worker finish and reply into the void.
    drop(bridge);
}

#[test]
fn test_bank_without_sphere_slot_renders_nothing() {
    let ctx = mount().context();
    let slots = SlotTable::parts([(PartKind::Basic, "mesh")], &[]).unwrap();
    assert!(LedBank::mount(&ctx, &slots, vec![[0.0; 3]]).is_none());
}

#[test]
fn test_scanline_holds_value_on_skipped_ticks() {
    let mut provider = mount();
    let ctx = provider.context();
    let mut scanline = ScanlineAnimator::new(&ctx, "screen-0");
    settle_low(&mut provider);

    let mut advanced = 0;
    for i in 1..=16 {
        provider.tick(1.0 / 20.0);
        let before = scanline.time_uniform();
        if scanline.update(i as f32) {
            advanced += 1;
            assert_eq!(scanline.time_uniform(), i as f32 * 2.0);
        } else {
            assert_eq!(scanline.time_uniform(), before);
        }
    }
    assert_eq!(advanced, 8);
}

#[test]
fn test_screen_target_follows_tier() {
    let mut provider = mount();
    let ctx = provider.context();
    let spec = ScreenSpec {
        index: 0,
        custom_effect: true,
    };
    let mut screen = ScreenSurface::resolve(&ctx, &full_slots(), spec).expect("panel present");
    assert_eq!(screen.render_target().width, QualityProfile::HIGH.texture_width);

    settle_low(&mut provider);
    assert!(screen.update(6.0));
    assert_eq!(screen.tier(), QualityTier::Low);
    assert_eq!(screen.render_target().width, QualityProfile::LOW.texture_width);
    assert_eq!(screen.render_target().cache_key, None);
    assert!(!screen.update(6.1));
}

#[test]
fn test_missing_profile_skips_only_the_screen() {
    let config = SchedulerConfig {
        quality: QualityTable::from_entries([(QualityTier::High, QualityProfile::HIGH)]),
        ..SchedulerConfig::default()
    };
    let mut provider =
        SchedulerProvider::mount("partial", config, &StaticProbe::CAPABLE).expect("valid config");
    let ctx = provider.context();
    settle_low(&mut provider);

    let showcase = Showcase::mount(&ctx, &full_slots(), &ShowcaseLayout::default());
    assert!(showcase.screens().is_empty());
    assert!(showcase.leds().is_some());
    assert!(showcase.spinner().is_some());
}

#[test]
fn test_showcase_runs_without_provider() {
    let ctx = cadence_control::SchedulerContext::detached();
    let bridge = OffloadBridge::inline();
    let mut showcase = Showcase::mount(&ctx, &full_slots(), &ShowcaseLayout::default());
    assert_eq!(showcase.screens().len(), 3);

    for i in 0..5 {
        let report = showcase.update(&bridge, i as f32 * 0.016, 0.016);
        assert!(report.leds_applied);
        assert!(report.spinner_advanced);
        assert_eq!(report.targets_changed, 0);
    }
    if let Some(spinner) = showcase.spinner_mut() {
        spinner.click();
    }
    assert!(showcase.spinner().unwrap().scale() > 0.6);
}
