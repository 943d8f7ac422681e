//! Layer-lock overlay.
//!
//! A locked layer stays on regardless of the momentary or tap-toggle key
//! that originally activated it; pressing such a key again while its layer is
//! locked unlocks it instead of re-triggering the default behavior. The
//! overlay keeps itself honest against the host's live layer state: if
//! anything else turns a locked layer off, the stale lock bit is dropped on
//! the next dispatch.

use crate::host::Host;
use crate::types::{HandlerResult, KeyAction, KeyEvent, Layer, LayerMask};

/// Observer invoked with the lock mask after every mutation.
pub type LockObserver = fn(LayerMask);

/// Tracks which layers are pinned on.
pub struct LayerLock {
    locked: LayerMask,
    on_change: Option<LockObserver>,
}

impl LayerLock {
    /// Creates an overlay with no locked layers and no observer.
    pub fn new() -> Self {
        Self {
            locked: LayerMask::EMPTY,
            on_change: None,
        }
    }

    /// Registers an observer fired after every lock-state change, e.g. to
    /// drive a lock LED without coupling the overlay to rendering.
    pub fn set_observer(&mut self, observer: LockObserver) {
        self.on_change = Some(observer);
    }

    /// Returns true if `layer` is locked.
    pub fn is_locked(&self, layer: Layer) -> bool {
        self.locked.contains(layer)
    }

    /// The current lock mask.
    pub fn mask(&self) -> LayerMask {
        self.locked
    }

    /// Toggles `layer`'s lock.
    ///
    /// Locking clears a pending one-shot activation targeting the same layer
    /// (the one-shot would otherwise turn the layer back off underneath the
    /// lock) and turns the layer on. Unlocking turns the layer off.
    pub fn invert<H: Host>(&mut self, host: &mut H, layer: Layer) {
        if !self.locked.contains(layer) {
            if host.oneshot_layer() == Some(layer) {
                host.clear_oneshot_layer();
            }
            host.activate_layer(layer);
        } else {
            host.deactivate_layer(layer);
        }
        self.locked.toggle(layer);
        self.notify();
    }

    /// Locks and turns on `layer`. No-op if already locked.
    pub fn on<H: Host>(&mut self, host: &mut H, layer: Layer) {
        if !self.is_locked(layer) {
            self.invert(host, layer);
        }
    }

    /// Unlocks and turns off `layer`. No-op if not locked.
    pub fn off<H: Host>(&mut self, host: &mut H, layer: Layer) {
        if self.is_locked(layer) {
            self.invert(host, layer);
        }
    }

    /// Unlocks and turns off every locked layer in one pass.
    pub fn all_off<H: Host>(&mut self, host: &mut H) {
        for layer in self.locked.iter() {
            host.deactivate_layer(layer);
        }
        self.locked = LayerMask::EMPTY;
        self.notify();
    }

    /// Drops lock bits for layers the host has turned off through some other
    /// path. Locked layers are meant to remain on; when the ground truth
    /// disagrees, the lock state yields.
    pub fn sync<H: Host>(&mut self, host: &mut H) {
        let live = host.layer_state();
        let drifted = self.locked.bits() & !live.bits();
        if drifted != 0 {
            self.locked = LayerMask::from_bits(self.locked.bits() & live.bits());
            self.notify();
        }
    }

    /// Intercepts layer-key events whose target layer is locked.
    ///
    /// * Momentary / tap-toggle keys: a press unlocks instead of activating;
    ///   the whole event is consumed while the layer is locked.
    /// * Toggle keys: a press always inverts the lock.
    /// * The layer-lock key: a press inverts the lock for the layer it was
    ///   pressed on.
    /// * Layer+modifier keys: a press unlocks, a release clears held
    ///   modifiers so the overridden hold cannot leave them stuck.
    /// * Layer-tap keys held past the tapping term (tap count zero): the
    ///   release is suppressed so the locked layer stays on.
    pub fn intercept<H: Host>(&mut self, host: &mut H, event: &KeyEvent) -> HandlerResult {
        match event.action {
            KeyAction::Momentary(layer) | KeyAction::TapToggle(layer) => {
                if self.is_locked(layer) {
                    if event.pressed {
                        self.invert(host, layer);
                    }
                    return HandlerResult::Handled;
                }
                HandlerResult::PassThrough
            }
            KeyAction::Toggle(layer) => {
                if event.pressed {
                    self.invert(host, layer);
                }
                HandlerResult::Handled
            }
            KeyAction::LayerLockKey(layer) => {
                if event.pressed {
                    self.invert(host, layer);
                }
                HandlerResult::Handled
            }
            KeyAction::LayerMod(layer, _mods) => {
                if self.is_locked(layer) {
                    if event.pressed {
                        self.invert(host, layer);
                    } else {
                        host.set_modifiers(0);
                    }
                    return HandlerResult::Handled;
                }
                HandlerResult::PassThrough
            }
            KeyAction::LayerTap(layer, _code) => {
                if event.tap_count == 0 && !event.pressed && self.is_locked(layer) {
                    // Release of a held layer-tap key; swallowing it keeps
                    // the locked layer on.
                    return HandlerResult::Handled;
                }
                HandlerResult::PassThrough
            }
            _ => HandlerResult::PassThrough,
        }
    }

    fn notify(&self) {
        if let Some(observer) = self.on_change {
            observer(self.locked);
        }
    }
}

impl Default for LayerLock {
    fn default() -> Self {
        Self::new()
    }
}
