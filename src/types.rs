//! Core types shared across the pipeline.

use crate::tap_dance::DanceId;

/// Maximum number of layers the lock overlay can track.
///
/// Matches the 16-bit layer state word used by common keyboard firmwares.
pub const MAX_LAYERS: u8 = 16;

/// A layer index. Valid values are `0..MAX_LAYERS`; anything a pipeline is
/// configured with is validated at build time.
pub type Layer = u8;

/// A keycode forwarded verbatim to the host report layer.
///
/// The pipeline never interprets the value beyond equality checks against its
/// own configuration; use whatever encoding your host firmware expects
/// (HID usage IDs work, see [`crate::keycodes`]).
pub type KeyCode = u16;

/// A set of layers, one bit per layer.
///
/// Bit `k` set means layer `k` is a member. Out-of-range layers are treated
/// as absent by every operation; nothing here panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LayerMask(u16);

impl LayerMask {
    /// The empty set.
    pub const EMPTY: Self = LayerMask(0);

    /// Creates a mask from a raw bit pattern.
    pub const fn from_bits(bits: u16) -> Self {
        LayerMask(bits)
    }

    /// Returns the raw bit pattern.
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Returns true if `layer` is a member.
    pub fn contains(self, layer: Layer) -> bool {
        layer < MAX_LAYERS && self.0 & (1 << layer) != 0
    }

    /// Adds `layer` to the set.
    pub fn set(&mut self, layer: Layer) {
        if layer < MAX_LAYERS {
            self.0 |= 1 << layer;
        }
    }

    /// Removes `layer` from the set.
    pub fn clear(&mut self, layer: Layer) {
        if layer < MAX_LAYERS {
            self.0 &= !(1 << layer);
        }
    }

    /// Flips `layer`'s membership.
    pub fn toggle(&mut self, layer: Layer) {
        if layer < MAX_LAYERS {
            self.0 ^= 1 << layer;
        }
    }

    /// Returns true if no layer is a member.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates over the member layers, lowest first.
    pub fn iter(self) -> impl Iterator<Item = Layer> {
        (0..MAX_LAYERS).filter(move |&layer| self.contains(layer))
    }
}

/// An HSV color in the 0-255 convention used by keyboard RGB drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Hsv {
    pub hue: u8,
    pub sat: u8,
    pub val: u8,
}

impl Hsv {
    /// Creates an HSV color.
    pub const fn new(hue: u8, sat: u8, val: u8) -> Self {
        Hsv { hue, sat, val }
    }
}

/// RGB matrix commands the pipeline handles on behalf of the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RgbCommand {
    /// Toggle between full effects and indicators-only rendering.
    Toggle,
    /// Step to the next animation effect.
    NextEffect,
    /// Step to the previous animation effect.
    PrevEffect,
    /// Switch to the solid-color effect.
    SolidEffect,
    SpeedUp,
    SpeedDown,
    HueUp,
    HueDown,
    SatUp,
    SatDown,
    ValUp,
    ValDown,
}

/// What a physical key resolves to, as decided by the host's keymap lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyAction {
    /// A plain keycode.
    Key(KeyCode),
    /// Momentary layer switch: layer active while held.
    Momentary(Layer),
    /// Tap-toggle layer key.
    TapToggle(Layer),
    /// Toggle layer key: flips the layer on each press.
    Toggle(Layer),
    /// Layer plus modifiers while held.
    LayerMod(Layer, u8),
    /// Layer-tap key: `code` on tap, `layer` while held.
    LayerTap(Layer, KeyCode),
    /// The layer-lock key, resolved against the layer it was pressed on.
    LayerLockKey(Layer),
    /// Toggles the function-row remap mode.
    FnSwap,
    /// Toggles N-key rollover in the host config.
    NkroToggle,
    /// An RGB matrix command.
    Rgb(RgbCommand),
    /// A registered tap dance; the host's dance timing engine drives the
    /// [`crate::pipeline::KeyPipeline::dance_finished`] /
    /// [`crate::pipeline::KeyPipeline::dance_reset`] callbacks for it.
    Dance(DanceId),
}

/// One key transition reported by the host's matrix scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyEvent {
    /// The resolved action for the key position.
    pub action: KeyAction,
    /// True for press, false for release.
    pub pressed: bool,
    /// The host's tap count for tap-hold style keys; zero means the event
    /// belongs to a genuine hold.
    pub tap_count: u8,
}

impl KeyEvent {
    /// A press event with no tap-hold history.
    pub const fn press(action: KeyAction) -> Self {
        KeyEvent {
            action,
            pressed: true,
            tap_count: 0,
        }
    }

    /// A release event with no tap-hold history.
    pub const fn release(action: KeyAction) -> Self {
        KeyEvent {
            action,
            pressed: false,
            tap_count: 0,
        }
    }
}

/// The outcome of a pipeline stage for one key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HandlerResult {
    /// The event was fully consumed; later stages and the host's default
    /// processing are skipped.
    Handled,
    /// The event was not consumed; hand it to the next stage.
    PassThrough,
}

/// Pipeline construction errors.
///
/// These only surface from [`crate::pipeline::KeyPipelineBuilder::build`];
/// the running pipeline itself never fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A configured layer is outside `0..MAX_LAYERS`.
    LayerOutOfRange(Layer),
    /// More dances registered than the pipeline's dance capacity.
    TooManyDances,
    /// More layer highlights registered than the highlight capacity.
    TooManyHighlights,
    /// More tap-hold keys registered than the tap-hold capacity.
    TooManyTapHolds,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::LayerOutOfRange(layer) => {
                write!(f, "layer {} is outside the supported range", layer)
            }
            ConfigError::TooManyDances => {
                write!(f, "dance registrations exceed the pipeline capacity")
            }
            ConfigError::TooManyHighlights => {
                write!(f, "layer highlights exceed the pipeline capacity")
            }
            ConfigError::TooManyTapHolds => {
                write!(f, "tap-hold registrations exceed the pipeline capacity")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_set_clear_toggle() {
        let mut mask = LayerMask::EMPTY;
        mask.set(2);
        assert!(mask.contains(2));
        mask.toggle(2);
        assert!(!mask.contains(2));
        mask.toggle(5);
        mask.set(5);
        assert!(mask.contains(5));
        mask.clear(5);
        assert!(mask.is_empty());
    }

    #[test]
    fn mask_ignores_out_of_range_layers() {
        let mut mask = LayerMask::EMPTY;
        mask.set(MAX_LAYERS);
        mask.toggle(42);
        assert!(mask.is_empty());
        assert!(!mask.contains(MAX_LAYERS));
    }

    #[test]
    fn mask_iterates_members_in_order() {
        let mask = LayerMask::from_bits(0b1010);
        let mut layers = mask.iter();
        assert_eq!(layers.next(), Some(1));
        assert_eq!(layers.next(), Some(3));
        assert_eq!(layers.next(), None);
    }
}
