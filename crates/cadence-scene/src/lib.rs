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

//! # Cadence Scene
//!
//! Scene elements that adapt to the scheduler: a blinking LED bank computed
//! through the offload bridge, screens whose render targets follow the
//! quality tier, a scanline overlay and a spinning box. Every element works
//! without a scheduler provider, using the context defaults.

#![warn(missing_docs)]

pub mod leds;
pub mod scanline;
pub mod screen;
pub mod showcase;
pub mod slots;
pub mod spinner;

pub use leds::{compute_led_colors, LedBank, LedColorRequest, Rgb, LED_BASE_COLOR};
pub use scanline::ScanlineAnimator;
pub use screen::{RenderTargetSettings, ScreenSpec, ScreenSurface};
pub use showcase::{FrameReport, Showcase, ShowcaseLayout};
pub use slots::{PartKind, SlotError, SlotTable};
pub use spinner::SpinningBox;
