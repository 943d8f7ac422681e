//! Shared test infrastructure for key-pipeline integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use key_pipeline::{Host, Hsv, KeyCode, Layer, LayerMask, TimeDuration, TimeInstant, TimeSource};
use palette::Srgb;

// ============================================================================
// Mock Time Types
// ============================================================================

/// Mock duration type for testing (wraps milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestDuration(pub u64);

impl TimeDuration for TestDuration {
    const ZERO: Self = TestDuration(0);

    fn as_millis(&self) -> u64 {
        self.0
    }

    fn from_millis(millis: u64) -> Self {
        TestDuration(millis)
    }
}

/// Mock instant type for testing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestInstant(pub u64);

impl TimeInstant for TestInstant {
    type Duration = TestDuration;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        TestDuration(self.0 - earlier.0)
    }
}

// ============================================================================
// Mock Time Source
// ============================================================================

/// Mock time source with controllable time advancement
pub struct MockTimeSource {
    current_time: core::cell::Cell<TestInstant>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self {
            current_time: core::cell::Cell::new(TestInstant(0)),
        }
    }

    /// Advance time by the given number of milliseconds
    pub fn advance(&self, millis: u64) {
        let current = self.current_time.get();
        self.current_time.set(TestInstant(current.0 + millis));
    }

    pub fn set_time(&self, time: TestInstant) {
        self.current_time.set(time);
    }
}

impl TimeSource<TestInstant> for MockTimeSource {
    fn now(&self) -> TestInstant {
        self.current_time.get()
    }
}

// ============================================================================
// Mock Host
// ============================================================================

/// Mock host runtime that records every side effect for inspection
pub struct MockHost {
    pub layers: LayerMask,
    /// (layer, activated) in call order
    pub layer_log: Vec<(Layer, bool)>,
    pub oneshot: Option<Layer>,
    /// (keycode, pressed) in call order
    pub keys: Vec<(KeyCode, bool)>,
    pub modifiers: u8,
    pub keyboard_clears: usize,
    /// (led index, color) in call order
    pub led_writes: Vec<(u8, Srgb<u8>)>,
    pub led_count: u8,
    pub hsv: Hsv,
    pub speed: u8,
    pub effect_steps: i32,
    pub solid_selects: usize,
    pub nkro: bool,
    pub resets: usize,
    pub config_clears: usize,
    pub soft_resets: usize,
    pub delays: Vec<u32>,
}

impl MockHost {
    pub fn new() -> Self {
        Self {
            layers: LayerMask::EMPTY,
            layer_log: Vec::new(),
            oneshot: None,
            keys: Vec::new(),
            modifiers: 0,
            keyboard_clears: 0,
            led_writes: Vec::new(),
            led_count: 66,
            hsv: Hsv::new(128, 255, 128),
            speed: 128,
            effect_steps: 0,
            solid_selects: 0,
            nkro: false,
            resets: 0,
            config_clears: 0,
            soft_resets: 0,
            delays: Vec::new(),
        }
    }

    /// All colors written to one LED, in order
    pub fn writes_for(&self, led: u8) -> Vec<Srgb<u8>> {
        self.led_writes
            .iter()
            .filter(|(index, _)| *index == led)
            .map(|(_, color)| *color)
            .collect()
    }

    /// The most recent color written to one LED
    pub fn last_color(&self, led: u8) -> Option<Srgb<u8>> {
        self.writes_for(led).last().copied()
    }

    /// Collapses one LED's write history into its distinct phases
    pub fn phases_for(&self, led: u8) -> Vec<Srgb<u8>> {
        let mut phases: Vec<Srgb<u8>> = Vec::new();
        for color in self.writes_for(led) {
            if phases.last() != Some(&color) {
                phases.push(color);
            }
        }
        phases
    }

    pub fn presses_of(&self, code: KeyCode) -> usize {
        self.keys
            .iter()
            .filter(|(key, pressed)| *key == code && *pressed)
            .count()
    }

    pub fn releases_of(&self, code: KeyCode) -> usize {
        self.keys
            .iter()
            .filter(|(key, pressed)| *key == code && !*pressed)
            .count()
    }
}

impl Host for MockHost {
    fn activate_layer(&mut self, layer: Layer) {
        self.layers.set(layer);
        self.layer_log.push((layer, true));
    }

    fn deactivate_layer(&mut self, layer: Layer) {
        self.layers.clear(layer);
        self.layer_log.push((layer, false));
    }

    fn is_layer_active(&self, layer: Layer) -> bool {
        self.layers.contains(layer)
    }

    fn highest_active_layer(&self) -> Layer {
        self.layers.iter().last().unwrap_or(0)
    }

    fn layer_state(&self) -> LayerMask {
        self.layers
    }

    fn oneshot_layer(&self) -> Option<Layer> {
        self.oneshot
    }

    fn clear_oneshot_layer(&mut self) {
        self.oneshot = None;
    }

    fn send_keycode(&mut self, code: KeyCode) {
        self.keys.push((code, true));
    }

    fn release_keycode(&mut self, code: KeyCode) {
        self.keys.push((code, false));
    }

    fn modifiers(&self) -> u8 {
        self.modifiers
    }

    fn set_modifiers(&mut self, mods: u8) {
        self.modifiers = mods;
    }

    fn clear_keyboard(&mut self) {
        self.keyboard_clears += 1;
    }

    fn set_led_color(&mut self, index: u8, color: Srgb<u8>) {
        self.led_writes.push((index, color));
    }

    fn led_count(&self) -> u8 {
        self.led_count
    }

    fn rgb_hsv(&self) -> Hsv {
        self.hsv
    }

    fn set_rgb_hsv(&mut self, hsv: Hsv) {
        self.hsv = hsv;
    }

    fn rgb_speed(&self) -> u8 {
        self.speed
    }

    fn set_rgb_speed(&mut self, speed: u8) {
        self.speed = speed;
    }

    fn next_effect(&mut self) {
        self.effect_steps += 1;
    }

    fn prev_effect(&mut self) {
        self.effect_steps -= 1;
    }

    fn solid_effect(&mut self) {
        self.solid_selects += 1;
    }

    fn nkro(&self) -> bool {
        self.nkro
    }

    fn set_nkro(&mut self, enabled: bool) {
        self.nkro = enabled;
    }

    fn reset_keyboard(&mut self) {
        self.resets += 1;
    }

    fn clear_config(&mut self) {
        self.config_clears += 1;
    }

    fn soft_reset(&mut self) {
        self.soft_resets += 1;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delays.push(ms);
    }
}
