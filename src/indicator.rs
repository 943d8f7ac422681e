//! Non-blocking timed indicator queue.
//!
//! Provides [`IndicatorQueue`], a fixed pool of blink effects layered over
//! whatever the RGB matrix is already showing. Key handlers enqueue a blink
//! and move on; the render hook advances the pool once per frame. The queue
//! is purely cosmetic, so every operation is best-effort: a full pool drops
//! new requests instead of blocking or reporting an error.

use crate::colors::{self, complementary};
use crate::host::Host;
use crate::time::{TimeDuration, TimeInstant};
use palette::Srgb;

/// Default pool capacity, enough for the largest grouped feedback pattern.
pub const DEFAULT_QUEUE_CAPACITY: usize = 20;

/// One in-flight blink effect.
///
/// A slot owns its target LED's override color for its lifetime. The
/// half-cycle count is twice the requested flash count, so a blink always
/// ends on the complement ("off") phase.
#[derive(Clone, Copy)]
struct IndicatorSlot<I: TimeInstant> {
    active: bool,
    led_index: u8,
    last_update: Option<I>,
    interval: I::Duration,
    half_cycles: u8,
    color: Srgb<u8>,
}

impl<I: TimeInstant> IndicatorSlot<I> {
    const FREE: Self = IndicatorSlot {
        active: false,
        led_index: 0,
        last_update: None,
        interval: <I::Duration as TimeDuration>::ZERO,
        half_cycles: 0,
        color: colors::BLACK,
    };
}

/// Fixed-capacity pool of timed blink effects.
///
/// # Type Parameters
/// * `I` - Time instant type
/// * `N` - Pool capacity
pub struct IndicatorQueue<I: TimeInstant, const N: usize> {
    slots: [IndicatorSlot<I>; N],
}

impl<I: TimeInstant, const N: usize> IndicatorQueue<I, N> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            slots: [IndicatorSlot::FREE; N],
        }
    }

    /// Enqueues a blink: `flashes` visible on-phases on `led_index`, one
    /// half-cycle per `interval`, alternating `color` with its complement.
    ///
    /// Claims the first free slot. If the pool is full the request is
    /// silently dropped.
    pub fn enqueue(
        &mut self,
        now: I,
        led_index: u8,
        interval: I::Duration,
        flashes: u8,
        color: Srgb<u8>,
    ) {
        for slot in self.slots.iter_mut() {
            if !slot.active {
                slot.active = true;
                slot.led_index = led_index;
                slot.last_update = Some(now);
                slot.interval = interval;
                slot.half_cycles = flashes.saturating_mul(2);
                slot.color = color;
                break;
            }
        }
    }

    /// Frees every slot targeting `led_index`.
    ///
    /// Deliberately scans the whole pool so accidental duplicate enqueues for
    /// the same LED are all removed.
    pub fn dequeue(&mut self, led_index: u8) {
        for slot in self.slots.iter_mut() {
            if slot.active && slot.led_index == led_index {
                slot.active = false;
                slot.last_update = None;
            }
        }
    }

    /// Number of live slots.
    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.active).count()
    }

    /// Advances the pool and renders it. Call exactly once per render frame.
    ///
    /// For each live slot: once `interval` has elapsed since the last update,
    /// the update stamp resets and a half-cycle is consumed; at zero
    /// half-cycles the slot is freed. The slot's LED is then drawn: odd
    /// half-cycles show the color, even ones the complement, so the freeing
    /// frame still paints the terminal "off" phase. Only LEDs inside
    /// `[led_min, led_max)` are written.
    pub fn tick<H: Host>(&mut self, host: &mut H, led_min: u8, led_max: u8, now: I) {
        for slot in self.slots.iter_mut() {
            if !slot.active {
                continue;
            }

            if let Some(last) = slot.last_update {
                if now.duration_since(last).as_millis() >= slot.interval.as_millis() {
                    slot.last_update = Some(now);

                    if slot.half_cycles > 0 {
                        slot.half_cycles -= 1;
                    }

                    if slot.half_cycles == 0 {
                        slot.active = false;
                        slot.last_update = None;
                    }
                }
            }

            if slot.led_index < led_min || slot.led_index >= led_max {
                continue;
            }

            if slot.half_cycles % 2 == 1 {
                host.set_led_color(slot.led_index, slot.color);
            } else {
                host.set_led_color(slot.led_index, complementary(slot.color, false));
            }
        }
    }
}

impl<I: TimeInstant, const N: usize> Default for IndicatorQueue<I, N> {
    fn default() -> Self {
        Self::new()
    }
}
