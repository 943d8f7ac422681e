//! The host-runtime abstraction.
//!
//! Everything the pipeline needs from the surrounding firmware (layer state,
//! HID reporting, the LED matrix, persisted config) comes through [`Host`].
//! All methods are infallible: the runtimes this models report nothing back,
//! and the pipeline degrades silently rather than propagate hardware errors
//! into key processing.

use crate::types::{Hsv, KeyCode, Layer, LayerMask};
use palette::Srgb;

/// Services provided by the host firmware runtime.
///
/// Methods with default implementations are optional host capabilities
/// (one-shot layers, NKRO persistence, system resets); the no-op defaults let
/// minimal hosts and test doubles implement only what they exercise.
pub trait Host {
    // --- Layer state ---

    /// Turns a layer on.
    fn activate_layer(&mut self, layer: Layer);

    /// Turns a layer off.
    fn deactivate_layer(&mut self, layer: Layer);

    /// Returns true if the layer is currently on.
    fn is_layer_active(&self, layer: Layer) -> bool;

    /// Returns the highest currently-active layer.
    fn highest_active_layer(&self) -> Layer;

    /// Returns the full live layer state, one bit per layer.
    fn layer_state(&self) -> LayerMask;

    /// The layer a pending one-shot activation targets, if any.
    fn oneshot_layer(&self) -> Option<Layer> {
        None
    }

    /// Clears any pending one-shot layer activation.
    fn clear_oneshot_layer(&mut self) {}

    // --- HID report ---

    /// Registers a keycode in the outgoing report.
    fn send_keycode(&mut self, code: KeyCode);

    /// Releases a previously registered keycode.
    fn release_keycode(&mut self, code: KeyCode);

    /// Registers and immediately releases a keycode.
    fn tap_keycode(&mut self, code: KeyCode) {
        self.send_keycode(code);
        self.release_keycode(code);
    }

    /// Returns the currently held modifier bitmask.
    fn modifiers(&self) -> u8;

    /// Replaces the held modifier bitmask.
    fn set_modifiers(&mut self, mods: u8);

    /// Releases every key and modifier in the outgoing report.
    fn clear_keyboard(&mut self) {}

    // --- LED matrix ---

    /// Writes one LED's color for the current frame.
    fn set_led_color(&mut self, index: u8, color: Srgb<u8>);

    /// Number of LEDs in the matrix.
    fn led_count(&self) -> u8;

    /// Current base HSV of the RGB animation.
    fn rgb_hsv(&self) -> Hsv;

    /// Sets the base HSV of the RGB animation.
    fn set_rgb_hsv(&mut self, hsv: Hsv);

    /// Current animation speed.
    fn rgb_speed(&self) -> u8;

    /// Sets the animation speed.
    fn set_rgb_speed(&mut self, speed: u8);

    /// Steps to the next animation effect.
    fn next_effect(&mut self) {}

    /// Steps to the previous animation effect.
    fn prev_effect(&mut self) {}

    /// Switches to the solid-color effect.
    fn solid_effect(&mut self) {}

    // --- Config and system ---

    /// Whether N-key rollover is enabled in the host config.
    fn nkro(&self) -> bool {
        false
    }

    /// Persists the N-key rollover setting.
    fn set_nkro(&mut self, _enabled: bool) {}

    /// Reboots into the bootloader.
    fn reset_keyboard(&mut self) {}

    /// Clears persisted configuration.
    fn clear_config(&mut self) {}

    /// Soft-resets the firmware.
    fn soft_reset(&mut self) {}

    /// Cooperative busy-delay; callers keep this bounded to tens of
    /// milliseconds.
    fn delay_ms(&mut self, _ms: u32) {}
}
