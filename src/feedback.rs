//! Grouped indicator feedback patterns.
//!
//! Mode toggles and boundary conditions answer with multi-LED blink patterns
//! rather than a single flash: the space row for "something global changed",
//! the arrow cluster for speed and brightness limits, the number row for the
//! fn-row swap, and key clusters spelling out NKRO state. [`FeedbackMap`]
//! names the LED indices those groups use on a given board.

use crate::colors;
use crate::indicator::IndicatorQueue;
use crate::time::{TimeDuration, TimeInstant};

/// Blink cadences.
pub const INTERVAL_FAST_MS: u64 = 150;
pub const INTERVAL_NORMAL_MS: u64 = 200;

/// Blink lengths, in visible flashes.
pub const FLASHES_SHORT: u8 = 2;
pub const FLASHES_LONG: u8 = 3;
pub const FLASHES_EXTRA_LONG: u8 = 4;

/// Per-board table of the LED indices used by grouped feedback.
///
/// The defaults describe a 65% board with a 66-LED matrix laid out
/// right-to-left from the top row; adjust per board.
#[derive(Debug, Clone)]
pub struct FeedbackMap {
    pub space_led: u8,
    pub left_alt_led: u8,
    pub right_alt_led: u8,
    /// Left, down, up, right.
    pub arrow_leds: [u8; 4],
    /// The number row `1` through `=`, in matrix order.
    pub number_row: [u8; 12],
    /// Blinked when a layer is locked or unlocked.
    pub lock_led: Option<u8>,
    /// Cluster blinked when N-key rollover turns on.
    pub nkro_on_leds: [u8; 12],
    /// Cluster blinked when N-key rollover turns off.
    pub nkro_off_leds: [u8; 4],
    // Per-channel RGB step keys; "up" first.
    pub hue_leds: [u8; 2],
    pub sat_leds: [u8; 2],
    pub val_leds: [u8; 2],
    pub speed_leds: [u8; 2],
}

impl Default for FeedbackMap {
    fn default() -> Self {
        Self {
            space_led: 65,
            left_alt_led: 0,
            right_alt_led: 64,
            arrow_leds: [62, 61, 15, 60],
            number_row: [55, 54, 53, 52, 51, 50, 49, 48, 47, 46, 45, 44],
            lock_led: Some(64),
            nkro_on_leds: [7, 8, 9, 10, 11, 20, 21, 22, 23, 35, 36, 37],
            nkro_off_leds: [8, 10, 21, 22],
            hue_leds: [38, 37],
            sat_leds: [19, 20],
            val_leds: [12, 11],
            speed_leds: [17, 18],
        }
    }
}

impl FeedbackMap {
    /// Blinks the space key; `extended` adds the alt keys in black so the
    /// pattern reads across the bottom row.
    pub fn blink_space<I: TimeInstant, const N: usize>(
        &self,
        queue: &mut IndicatorQueue<I, N>,
        now: I,
        extended: bool,
    ) {
        let normal = I::Duration::from_millis(INTERVAL_NORMAL_MS);
        queue.enqueue(now, self.space_led, normal, FLASHES_LONG, colors::WHITE);
        if extended {
            queue.enqueue(now, self.left_alt_led, normal, FLASHES_LONG, colors::BLACK);
            queue.enqueue(now, self.right_alt_led, normal, FLASHES_LONG, colors::BLACK);
        }
    }

    /// Blinks the arrow cluster white.
    pub fn blink_arrows<I: TimeInstant, const N: usize>(
        &self,
        queue: &mut IndicatorQueue<I, N>,
        now: I,
    ) {
        let normal = I::Duration::from_millis(INTERVAL_NORMAL_MS);
        for &led in self.arrow_leds.iter() {
            queue.enqueue(now, led, normal, FLASHES_LONG, colors::WHITE);
        }
    }

    /// Blinks the number row: white when the fn-row swap turns on, fast red
    /// when it turns off.
    pub fn blink_numbers<I: TimeInstant, const N: usize>(
        &self,
        queue: &mut IndicatorQueue<I, N>,
        now: I,
        enabling: bool,
    ) {
        for &led in self.number_row.iter() {
            if enabling {
                queue.enqueue(
                    now,
                    led,
                    I::Duration::from_millis(INTERVAL_NORMAL_MS),
                    FLASHES_LONG,
                    colors::WHITE,
                );
            } else {
                queue.enqueue(
                    now,
                    led,
                    I::Duration::from_millis(INTERVAL_FAST_MS),
                    FLASHES_EXTRA_LONG,
                    colors::RED,
                );
            }
        }
    }

    /// Blinks the NKRO clusters: the wide white pattern when enabling, the
    /// tight red one when disabling.
    pub fn blink_nkro<I: TimeInstant, const N: usize>(
        &self,
        queue: &mut IndicatorQueue<I, N>,
        now: I,
        enabling: bool,
    ) {
        if enabling {
            let normal = I::Duration::from_millis(INTERVAL_NORMAL_MS);
            for &led in self.nkro_on_leds.iter() {
                queue.enqueue(now, led, normal, FLASHES_LONG, colors::WHITE);
            }
        } else {
            let fast = I::Duration::from_millis(INTERVAL_FAST_MS);
            for &led in self.nkro_off_leds.iter() {
                queue.enqueue(now, led, fast, FLASHES_LONG, colors::RED);
            }
        }
    }

    /// Blinks the lock LED: long when a layer just locked, short when it
    /// just unlocked.
    pub fn blink_lock<I: TimeInstant, const N: usize>(
        &self,
        queue: &mut IndicatorQueue<I, N>,
        now: I,
        locked: bool,
    ) {
        if let Some(led) = self.lock_led {
            let flashes = if locked { FLASHES_LONG } else { FLASHES_SHORT };
            queue.enqueue(
                now,
                led,
                I::Duration::from_millis(INTERVAL_NORMAL_MS),
                flashes,
                colors::LAYER_LOCK,
            );
        }
    }
}
