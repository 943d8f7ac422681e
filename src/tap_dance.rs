//! Tap-dance classification and dispatch.
//!
//! The host's dance timing engine tracks taps within the tapping term and
//! reports a [`DanceSnapshot`] when the window closes; [`classify`] turns
//! that snapshot into a [`DanceState`]. Each registered dance owns one state
//! slot, written when the dance finishes and consumed by the matching reset,
//! so concurrent dances on different keys never interfere.

use crate::feedback::FeedbackMap;
use crate::host::Host;
use crate::indicator::IndicatorQueue;
use crate::layer_lock::LayerLock;
use crate::time::TimeInstant;
use crate::types::{KeyCode, Layer};

/// Taps required before a guarded destructive dance fires.
///
/// Two quick taps happen by accident; three do not. Fixed by design.
pub const GUARD_TAP_THRESHOLD: u8 = 3;

/// Delay before releasing a tapped dance keycode, so the host report layer
/// registers the press and release as distinct events.
const TAP_RELEASE_DELAY_MS: u32 = 50;

/// Identifies a registered dance, in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DanceId(pub usize);

/// Classification of one completed dance cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DanceState {
    /// No dance in flight.
    None,
    /// Tap count outside the expected range; not actioned.
    Unknown,
    SingleTap,
    SingleHold,
    DoubleTap,
    DoubleHold,
    /// A second tap with another key pressed mid-sequence. Dispatched the
    /// same as [`DanceState::DoubleTap`].
    InterruptedDoubleTap,
}

/// What the host's timing window observed when it closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DanceSnapshot {
    /// Number of taps within the window.
    pub count: u8,
    /// True if the dance key is still held.
    pub pressed: bool,
    /// True if another key was hit before the window closed.
    pub interrupted: bool,
}

/// Classifies a dance from its tap count, current press state and
/// interruption flag.
///
/// A single tap is judged purely by whether the key is still held when the
/// window closes; the interruption flag is ignored for count one. Three or
/// more taps classify the same as two.
pub fn classify(count: u8, pressed: bool, interrupted: bool) -> DanceState {
    if count == 1 {
        if pressed {
            DanceState::SingleHold
        } else {
            DanceState::SingleTap
        }
    } else if count >= 2 {
        if interrupted {
            DanceState::InterruptedDoubleTap
        } else if pressed {
            DanceState::DoubleHold
        } else {
            DanceState::DoubleTap
        }
    } else {
        DanceState::Unknown
    }
}

/// Destructive actions behind the [`GUARD_TAP_THRESHOLD`] gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GuardedAction {
    /// Reboot into the bootloader.
    ResetKeyboard,
    /// Clear persisted configuration, then soft-reset.
    ClearConfig,
}

/// A tap/hold/double-tap chord bound to layers and a fallback keycode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChordDance {
    /// Sent for plain taps and any classification without a binding below.
    pub tap_code: KeyCode,
    /// Activated while singly held.
    pub hold_layer: Option<Layer>,
    /// Activated while held after a double tap.
    pub double_hold_layer: Option<Layer>,
    /// Lock-inverted on a double tap, interrupted or not.
    pub lock_layer: Option<Layer>,
}

/// A registered dance definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DanceKind {
    Chord(ChordDance),
    Guarded(GuardedAction),
}

/// A dance definition plus its per-cycle state slot.
pub(crate) struct DanceSlot {
    kind: DanceKind,
    state: DanceState,
}

impl DanceSlot {
    pub(crate) fn new(kind: DanceKind) -> Self {
        Self {
            kind,
            state: DanceState::None,
        }
    }

    /// Handles the window-close callback for this dance.
    pub(crate) fn finished<H: Host, I: TimeInstant, const QN: usize>(
        &mut self,
        host: &mut H,
        lock: &mut LayerLock,
        indicators: &mut IndicatorQueue<I, QN>,
        feedback: &FeedbackMap,
        now: I,
        snapshot: DanceSnapshot,
    ) {
        match self.kind {
            DanceKind::Guarded(action) => {
                if snapshot.count >= GUARD_TAP_THRESHOLD {
                    match action {
                        GuardedAction::ResetKeyboard => host.reset_keyboard(),
                        GuardedAction::ClearConfig => {
                            host.clear_config();
                            host.soft_reset();
                        }
                    }
                }
            }
            DanceKind::Chord(chord) => {
                let state = classify(snapshot.count, snapshot.pressed, snapshot.interrupted);
                self.state = state;
                match state {
                    DanceState::SingleHold if chord.hold_layer.is_some() => {
                        if let Some(layer) = chord.hold_layer {
                            host.activate_layer(layer);
                        }
                    }
                    DanceState::DoubleHold if chord.double_hold_layer.is_some() => {
                        if let Some(layer) = chord.double_hold_layer {
                            host.activate_layer(layer);
                        }
                    }
                    DanceState::DoubleTap | DanceState::InterruptedDoubleTap
                        if chord.lock_layer.is_some() =>
                    {
                        if let Some(layer) = chord.lock_layer {
                            lock.invert(host, layer);
                            feedback.blink_lock(indicators, now, lock.is_locked(layer));
                        }
                    }
                    DanceState::Unknown | DanceState::None => {}
                    _ => host.send_keycode(chord.tap_code),
                }
            }
        }
    }

    /// Handles the cleanup callback once the dance fully resolves.
    pub(crate) fn reset<H: Host>(&mut self, host: &mut H, lock: &LayerLock) {
        if let DanceKind::Chord(chord) = self.kind {
            match self.state {
                DanceState::SingleHold if chord.hold_layer.is_some() => {
                    if let Some(layer) = chord.hold_layer {
                        // The hold's natural release must not undo a lock
                        // taken while it was down.
                        if !lock.is_locked(layer) {
                            host.deactivate_layer(layer);
                        }
                    }
                }
                DanceState::DoubleHold if chord.double_hold_layer.is_some() => {
                    if let Some(layer) = chord.double_hold_layer {
                        if !lock.is_locked(layer) {
                            host.deactivate_layer(layer);
                        }
                    }
                }
                DanceState::DoubleTap | DanceState::InterruptedDoubleTap
                    if chord.lock_layer.is_some() => {} // fully handled at finish
                DanceState::Unknown | DanceState::None => {}
                _ => {
                    host.delay_ms(TAP_RELEASE_DELAY_MS);
                    host.release_keycode(chord.tap_code);
                }
            }
        }
        self.state = DanceState::None;
    }
}
