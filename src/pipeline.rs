//! The key-event dispatcher and per-frame renderer.
//!
//! [`KeyPipeline`] is the single context object owning every subsystem's
//! state: the indicator queue, the layer-lock overlay, the tap-dance slots
//! and the mode flags. The host calls [`KeyPipeline::process_key_event`] for
//! each matrix transition and [`KeyPipeline::render`] once per frame; dances
//! additionally report through [`KeyPipeline::dance_finished`] and
//! [`KeyPipeline::dance_reset`].
//!
//! Event dispatch walks an explicit ordered list of stages. A stage either
//! consumes the event ([`HandlerResult::Handled`], short-circuiting the rest
//! of the list and the host's default processing) or passes it along. No
//! stage can fail: cosmetic paths degrade silently, and a keycode is always
//! either definitively sent or definitively suppressed.

use core::marker::PhantomData;

use heapless::Vec;
use palette::Srgb;

use crate::colors::{self, complementary, hsv_to_rgb};
use crate::feedback::{
    FLASHES_EXTRA_LONG, FLASHES_LONG, FLASHES_SHORT, FeedbackMap, INTERVAL_FAST_MS,
    INTERVAL_NORMAL_MS,
};
use crate::fn_mode::process_fn_mode;
use crate::host::Host;
use crate::indicator::IndicatorQueue;
use crate::layer_lock::{LayerLock, LockObserver};
use crate::rgb_control::{self, RgbStepConfig};
use crate::tap_dance::{DanceId, DanceKind, DanceSlot, DanceSnapshot};
use crate::time::{TimeDuration, TimeInstant, TimeSource};
use crate::types::{
    ConfigError, HandlerResult, KeyAction, KeyCode, KeyEvent, Layer, MAX_LAYERS, RgbCommand,
};

/// Maximum number of layer highlights a pipeline can carry.
pub const MAX_HIGHLIGHTS: usize = 8;

/// Maximum number of tap-hold keys a pipeline can carry.
pub const MAX_TAP_HOLDS: usize = 8;

/// Settle time around NKRO toggles, letting the host flush its report before
/// and after the report format changes.
const NKRO_SETTLE_DELAY_MS: u32 = 50;

/// A group of LEDs painted with a fixed color while a layer is active.
#[derive(Debug, Clone, Copy)]
pub struct Highlight {
    pub layer: Layer,
    pub leds: &'static [u8],
    pub color: Srgb<u8>,
}

/// A layer-tap carrier key: taps type `carrier` through default processing,
/// a genuine hold taps `hold` instead.
///
/// Reuses the layer-tap machinery on the base layer as a zero-cost way to
/// get a second keycode onto a key; the synthesized hold tap does not
/// auto-repeat.
#[derive(Debug, Clone, Copy)]
pub struct TapHold {
    pub carrier: KeyCode,
    pub hold: KeyCode,
}

/// The input-subsystem context object.
///
/// # Type Parameters
/// * `'t` - Lifetime of the time source reference
/// * `I` - Time instant type
/// * `T` - Time source implementation type
/// * `QN` - Indicator queue capacity
/// * `DN` - Tap-dance capacity
pub struct KeyPipeline<'t, I: TimeInstant, T: TimeSource<I>, const QN: usize, const DN: usize> {
    time_source: &'t T,
    indicators: IndicatorQueue<I, QN>,
    lock: LayerLock,
    dances: Vec<DanceSlot, DN>,
    tap_holds: Vec<TapHold, MAX_TAP_HOLDS>,
    highlights: Vec<Highlight, MAX_HIGHLIGHTS>,
    feedback: FeedbackMap,
    rgb_steps: RgbStepConfig,
    fn_mode_enabled: bool,
    effects_enabled: bool,
    base_layer: Layer,
}

impl<'t, I, T, const QN: usize, const DN: usize> KeyPipeline<'t, I, T, QN, DN>
where
    I: TimeInstant,
    T: TimeSource<I>,
{
    /// Starts building a pipeline around the given time source.
    pub fn builder(time_source: &'t T) -> KeyPipelineBuilder<'t, I, T, QN, DN> {
        KeyPipelineBuilder::new(time_source)
    }

    /// Dispatches one key event through the stage list.
    ///
    /// Returns [`HandlerResult::Handled`] when a stage consumed the event;
    /// the host should then skip its default processing.
    pub fn process_key_event<H: Host>(&mut self, host: &mut H, event: KeyEvent) -> HandlerResult {
        // Heal any lock-state drift before anything looks at the lock.
        self.lock.sync(host);

        let stages: [fn(&mut Self, &mut H, &KeyEvent) -> HandlerResult; 6] = [
            Self::stage_fn_swap,
            Self::stage_fn_mode,
            Self::stage_nkro,
            Self::stage_rgb,
            Self::stage_layer_lock,
            Self::stage_tap_hold,
        ];

        for stage in stages {
            if stage(self, host, &event) == HandlerResult::Handled {
                return HandlerResult::Handled;
            }
        }

        HandlerResult::PassThrough
    }

    /// Window-close callback for the dance with the given id.
    pub fn dance_finished<H: Host>(&mut self, host: &mut H, id: DanceId, snapshot: DanceSnapshot) {
        let now = self.time_source.now();
        let Self {
            dances,
            lock,
            indicators,
            feedback,
            ..
        } = self;
        if let Some(slot) = dances.get_mut(id.0) {
            slot.finished(host, lock, indicators, feedback, now, snapshot);
        }
    }

    /// Cleanup callback once the dance with the given id fully resolves.
    pub fn dance_reset<H: Host>(&mut self, host: &mut H, id: DanceId) {
        if let Some(slot) = self.dances.get_mut(id.0) {
            slot.reset(host, &self.lock);
        }
    }

    /// Computes the LED frame for `[led_min, led_max)`.
    ///
    /// Walks the active-layer highlights and ticks the indicator queue. The
    /// pass re-derives the image from current state every call; apart from
    /// expiring indicator slots it mutates nothing. Returns true: the host's
    /// own indicator rendering still runs afterwards.
    pub fn render<H: Host>(&mut self, host: &mut H, led_min: u8, led_max: u8) -> bool {
        let now = self.time_source.now();

        if !self.effects_enabled && host.highest_active_layer() == self.base_layer {
            for index in led_min..led_max {
                host.set_led_color(index, colors::BLACK);
            }
        }

        // Blank the window under any highlighted layer so the highlight
        // groups stand out against the animation.
        if self
            .highlights
            .iter()
            .any(|highlight| host.is_layer_active(highlight.layer))
        {
            for index in led_min..led_max {
                host.set_led_color(index, colors::BLACK);
            }
        }

        if self.fn_mode_enabled {
            self.highlight_fn_row(host, led_min, led_max);
        }

        for highlight in self.highlights.iter() {
            if host.is_layer_active(highlight.layer) {
                for &led in highlight.leds {
                    if led >= led_min && led < led_max {
                        host.set_led_color(led, highlight.color);
                    }
                }
            }
        }

        self.indicators.tick(host, led_min, led_max, now);

        true
    }

    /// The indicator queue.
    pub fn indicator_queue(&self) -> &IndicatorQueue<I, QN> {
        &self.indicators
    }

    /// The layer-lock overlay.
    pub fn layer_lock(&self) -> &LayerLock {
        &self.lock
    }

    /// Mutable access to the layer-lock overlay, e.g. for a host-level
    /// "unlock everything" binding.
    pub fn layer_lock_mut(&mut self) -> &mut LayerLock {
        &mut self.lock
    }

    /// Registers the lock-change observer.
    pub fn set_lock_observer(&mut self, observer: LockObserver) {
        self.lock.set_observer(observer);
    }

    /// Whether the fn-row remap is currently enabled.
    pub fn fn_mode_enabled(&self) -> bool {
        self.fn_mode_enabled
    }

    /// Whether RGB effects are enabled (as opposed to indicators-only).
    pub fn rgb_effects_enabled(&self) -> bool {
        self.effects_enabled
    }

    // --- Stages, in dispatch order ---

    fn stage_fn_swap<H: Host>(&mut self, _host: &mut H, event: &KeyEvent) -> HandlerResult {
        if event.action != KeyAction::FnSwap {
            return HandlerResult::PassThrough;
        }
        if event.pressed {
            self.fn_mode_enabled = !self.fn_mode_enabled;
            let now = self.time_source.now();
            self.feedback
                .blink_numbers(&mut self.indicators, now, self.fn_mode_enabled);
            self.feedback.blink_space(&mut self.indicators, now, true);
        }
        HandlerResult::Handled
    }

    fn stage_fn_mode<H: Host>(&mut self, host: &mut H, event: &KeyEvent) -> HandlerResult {
        process_fn_mode(self.fn_mode_enabled, host, event)
    }

    fn stage_nkro<H: Host>(&mut self, host: &mut H, event: &KeyEvent) -> HandlerResult {
        if event.action != KeyAction::NkroToggle {
            return HandlerResult::PassThrough;
        }
        if event.pressed {
            // Flush the report around the format change to prevent stuck keys.
            host.clear_keyboard();
            host.delay_ms(NKRO_SETTLE_DELAY_MS);
            let enabled = !host.nkro();
            host.set_nkro(enabled);
            let now = self.time_source.now();
            self.feedback.blink_nkro(&mut self.indicators, now, enabled);
            host.delay_ms(NKRO_SETTLE_DELAY_MS);
            host.clear_keyboard();
        }
        HandlerResult::Handled
    }

    fn stage_rgb<H: Host>(&mut self, host: &mut H, event: &KeyEvent) -> HandlerResult {
        let KeyAction::Rgb(command) = event.action else {
            return HandlerResult::PassThrough;
        };
        if !event.pressed {
            return HandlerResult::Handled;
        }

        let now = self.time_source.now();
        match command {
            RgbCommand::Toggle => {
                if self.effects_enabled {
                    self.effects_enabled = false;
                    let normal = I::Duration::from_millis(INTERVAL_NORMAL_MS);
                    self.indicators.enqueue(
                        now,
                        self.feedback.space_led,
                        normal,
                        FLASHES_LONG,
                        colors::DARK_RED,
                    );
                    self.indicators.enqueue(
                        now,
                        self.feedback.left_alt_led,
                        normal,
                        FLASHES_LONG,
                        colors::DARK_RED,
                    );
                    self.indicators.enqueue(
                        now,
                        self.feedback.right_alt_led,
                        normal,
                        FLASHES_LONG,
                        colors::DARK_RED,
                    );
                } else {
                    let base = hsv_to_rgb(host.rgb_hsv());
                    for index in 0..host.led_count() {
                        host.set_led_color(index, base);
                    }
                    self.effects_enabled = true;
                    self.feedback.blink_space(&mut self.indicators, now, true);
                }
            }
            RgbCommand::NextEffect => host.next_effect(),
            RgbCommand::PrevEffect => host.prev_effect(),
            RgbCommand::SolidEffect => {
                host.solid_effect();
                self.feedback.blink_space(&mut self.indicators, now, true);
            }
            RgbCommand::SpeedUp => {
                let speed = host.rgb_speed();
                if rgb_control::at_ceiling(speed, self.rgb_steps.speed_step, 255) {
                    self.feedback.blink_arrows(&mut self.indicators, now);
                    self.boundary_feedback(now, self.feedback.speed_leds, true);
                }
                host.set_rgb_speed(rgb_control::step_up(speed, self.rgb_steps.speed_step, 255));
            }
            RgbCommand::SpeedDown => {
                let speed = host.rgb_speed();
                if rgb_control::at_floor(speed, self.rgb_steps.speed_step) {
                    self.feedback.blink_arrows(&mut self.indicators, now);
                    self.boundary_feedback(now, self.feedback.speed_leds, false);
                }
                host.set_rgb_speed(rgb_control::step_down(speed, self.rgb_steps.speed_step));
            }
            RgbCommand::HueUp => {
                let mut hsv = host.rgb_hsv();
                if rgb_control::at_ceiling(hsv.hue, self.rgb_steps.hue_step, 255) {
                    self.boundary_feedback(now, self.feedback.hue_leds, true);
                } else {
                    self.step_feedback(now, self.feedback.hue_leds[0]);
                }
                hsv.hue = rgb_control::step_up(hsv.hue, self.rgb_steps.hue_step, 255);
                host.set_rgb_hsv(hsv);
            }
            RgbCommand::HueDown => {
                let mut hsv = host.rgb_hsv();
                if rgb_control::at_floor(hsv.hue, self.rgb_steps.hue_step) {
                    self.boundary_feedback(now, self.feedback.hue_leds, false);
                } else {
                    self.step_feedback(now, self.feedback.hue_leds[1]);
                }
                hsv.hue = rgb_control::step_down(hsv.hue, self.rgb_steps.hue_step);
                host.set_rgb_hsv(hsv);
            }
            RgbCommand::SatUp => {
                let mut hsv = host.rgb_hsv();
                if rgb_control::at_ceiling(hsv.sat, self.rgb_steps.sat_step, 255) {
                    self.boundary_feedback(now, self.feedback.sat_leds, true);
                } else {
                    self.step_feedback(now, self.feedback.sat_leds[0]);
                }
                hsv.sat = rgb_control::step_up(hsv.sat, self.rgb_steps.sat_step, 255);
                host.set_rgb_hsv(hsv);
            }
            RgbCommand::SatDown => {
                let mut hsv = host.rgb_hsv();
                if rgb_control::at_floor(hsv.sat, self.rgb_steps.sat_step) {
                    self.boundary_feedback(now, self.feedback.sat_leds, false);
                } else {
                    self.step_feedback(now, self.feedback.sat_leds[1]);
                }
                hsv.sat = rgb_control::step_down(hsv.sat, self.rgb_steps.sat_step);
                host.set_rgb_hsv(hsv);
            }
            RgbCommand::ValUp => {
                let mut hsv = host.rgb_hsv();
                let max = self.rgb_steps.max_brightness;
                if rgb_control::at_ceiling(hsv.val, self.rgb_steps.val_step, max) {
                    self.feedback.blink_arrows(&mut self.indicators, now);
                    self.boundary_feedback(now, self.feedback.val_leds, true);
                } else {
                    self.step_feedback(now, self.feedback.val_leds[0]);
                }
                hsv.val = rgb_control::step_up(hsv.val, self.rgb_steps.val_step, max);
                host.set_rgb_hsv(hsv);
            }
            RgbCommand::ValDown => {
                let mut hsv = host.rgb_hsv();
                if rgb_control::at_floor(hsv.val, self.rgb_steps.val_step) {
                    self.feedback.blink_arrows(&mut self.indicators, now);
                    self.boundary_feedback(now, self.feedback.val_leds, false);
                } else {
                    self.step_feedback(now, self.feedback.val_leds[1]);
                }
                hsv.val = rgb_control::step_down(hsv.val, self.rgb_steps.val_step);
                host.set_rgb_hsv(hsv);
            }
        }

        HandlerResult::Handled
    }

    fn stage_layer_lock<H: Host>(&mut self, host: &mut H, event: &KeyEvent) -> HandlerResult {
        self.lock.intercept(host, event)
    }

    fn stage_tap_hold<H: Host>(&mut self, host: &mut H, event: &KeyEvent) -> HandlerResult {
        let KeyAction::LayerTap(0, code) = event.action else {
            return HandlerResult::PassThrough;
        };
        if event.tap_count == 0 && event.pressed {
            if let Some(tap_hold) = self.tap_holds.iter().find(|entry| entry.carrier == code) {
                host.tap_keycode(tap_hold.hold);
                return HandlerResult::Handled;
            }
        }
        HandlerResult::PassThrough
    }

    // --- Feedback helpers ---

    /// Boundary pattern: a long dark-red blink on the key that was pushed
    /// past its limit, a short black blink on its opposite, and the space
    /// blink. `up_down[0]` is the "up" key.
    fn boundary_feedback(&mut self, now: I, up_down: [u8; 2], pushed_up: bool) {
        let normal = I::Duration::from_millis(INTERVAL_NORMAL_MS);
        let (pushed, opposite) = if pushed_up {
            (up_down[0], up_down[1])
        } else {
            (up_down[1], up_down[0])
        };
        self.indicators
            .enqueue(now, pushed, normal, FLASHES_EXTRA_LONG, colors::DARK_RED);
        self.indicators
            .enqueue(now, opposite, normal, FLASHES_SHORT, colors::BLACK);
        self.feedback.blink_space(&mut self.indicators, now, false);
    }

    /// A single quick white flash acknowledging an ordinary step.
    fn step_feedback(&mut self, now: I, led: u8) {
        self.indicators.enqueue(
            now,
            led,
            I::Duration::from_millis(INTERVAL_FAST_MS),
            1,
            colors::WHITE,
        );
    }

    /// Paints the number row with the complement of the host's base color at
    /// full brightness while the fn-row remap is on.
    fn highlight_fn_row<H: Host>(&self, host: &mut H, led_min: u8, led_max: u8) {
        let mut hsv = host.rgb_hsv();
        hsv.val = 255;
        let color = complementary(hsv_to_rgb(hsv), false);
        for &led in self.feedback.number_row.iter() {
            if led >= led_min && led < led_max {
                host.set_led_color(led, color);
            }
        }
    }
}

/// Builder for a validated [`KeyPipeline`].
///
/// Registration order assigns [`DanceId`]s: the first `dance` call is
/// `DanceId(0)`, and so on.
pub struct KeyPipelineBuilder<'t, I: TimeInstant, T: TimeSource<I>, const QN: usize, const DN: usize>
{
    time_source: &'t T,
    feedback: FeedbackMap,
    rgb_steps: RgbStepConfig,
    base_layer: Layer,
    dances: Vec<DanceKind, DN>,
    tap_holds: Vec<TapHold, MAX_TAP_HOLDS>,
    highlights: Vec<Highlight, MAX_HIGHLIGHTS>,
    overflow: Option<ConfigError>,
    _marker: PhantomData<I>,
}

impl<'t, I, T, const QN: usize, const DN: usize> KeyPipelineBuilder<'t, I, T, QN, DN>
where
    I: TimeInstant,
    T: TimeSource<I>,
{
    fn new(time_source: &'t T) -> Self {
        Self {
            time_source,
            feedback: FeedbackMap::default(),
            rgb_steps: RgbStepConfig::default(),
            base_layer: 0,
            dances: Vec::new(),
            tap_holds: Vec::new(),
            highlights: Vec::new(),
            overflow: None,
            _marker: PhantomData,
        }
    }

    /// Sets the per-board feedback LED table.
    pub fn feedback_map(mut self, feedback: FeedbackMap) -> Self {
        self.feedback = feedback;
        self
    }

    /// Sets the RGB step sizes and limits.
    pub fn rgb_steps(mut self, rgb_steps: RgbStepConfig) -> Self {
        self.rgb_steps = rgb_steps;
        self
    }

    /// Sets the base layer (default 0).
    pub fn base_layer(mut self, layer: Layer) -> Self {
        self.base_layer = layer;
        self
    }

    /// Registers a tap dance.
    pub fn dance(mut self, kind: DanceKind) -> Self {
        if self.dances.push(kind).is_err() {
            self.overflow.get_or_insert(ConfigError::TooManyDances);
        }
        self
    }

    /// Registers a tap-hold carrier key.
    pub fn tap_hold(mut self, carrier: KeyCode, hold: KeyCode) -> Self {
        if self.tap_holds.push(TapHold { carrier, hold }).is_err() {
            self.overflow.get_or_insert(ConfigError::TooManyTapHolds);
        }
        self
    }

    /// Registers a layer highlight group.
    pub fn highlight(mut self, layer: Layer, leds: &'static [u8], color: Srgb<u8>) -> Self {
        if self.highlights.push(Highlight { layer, leds, color }).is_err() {
            self.overflow.get_or_insert(ConfigError::TooManyHighlights);
        }
        self
    }

    /// Builds the pipeline, validating every configured layer.
    pub fn build(self) -> Result<KeyPipeline<'t, I, T, QN, DN>, ConfigError> {
        if let Some(error) = self.overflow {
            return Err(error);
        }

        validate_layer(self.base_layer)?;
        for highlight in self.highlights.iter() {
            validate_layer(highlight.layer)?;
        }
        for kind in self.dances.iter() {
            if let DanceKind::Chord(chord) = kind {
                for layer in [chord.hold_layer, chord.double_hold_layer, chord.lock_layer]
                    .into_iter()
                    .flatten()
                {
                    validate_layer(layer)?;
                }
            }
        }

        let mut dances: Vec<DanceSlot, DN> = Vec::new();
        for kind in self.dances {
            // Capacity matches by construction.
            let _ = dances.push(DanceSlot::new(kind));
        }

        Ok(KeyPipeline {
            time_source: self.time_source,
            indicators: IndicatorQueue::new(),
            lock: LayerLock::new(),
            dances,
            tap_holds: self.tap_holds,
            highlights: self.highlights,
            feedback: self.feedback,
            rgb_steps: self.rgb_steps,
            fn_mode_enabled: false,
            effects_enabled: true,
            base_layer: self.base_layer,
        })
    }
}

fn validate_layer(layer: Layer) -> Result<(), ConfigError> {
    if layer >= MAX_LAYERS {
        Err(ConfigError::LayerOutOfRange(layer))
    } else {
        Ok(())
    }
}
