//! Function-row remap mode.
//!
//! While enabled, the number row produces F1-F12, and with Shift held a
//! secondary set of media and launcher keys. Launcher-style entries are sent
//! as a single tap on press; holding them would otherwise let OS auto-repeat
//! re-trigger actions like opening the file manager.

use crate::host::Host;
use crate::keycodes::{self, MOD_MASK_SHIFT};
use crate::types::{HandlerResult, KeyAction, KeyCode, KeyEvent};

/// F-row produced by the number row while fn mode is on.
const FUNCTION_ROW: [KeyCode; 12] = [
    keycodes::KC_F1,
    keycodes::KC_F2,
    keycodes::KC_F3,
    keycodes::KC_F4,
    keycodes::KC_F5,
    keycodes::KC_F6,
    keycodes::KC_F7,
    keycodes::KC_F8,
    keycodes::KC_F9,
    keycodes::KC_F10,
    keycodes::KC_F11,
    keycodes::KC_F12,
];

/// Shift-held alternates: `(keycode, tap_only)`.
const SHIFTED_FUNCTION_ROW: [(KeyCode, bool); 12] = [
    (keycodes::KC_MPRV, false),
    (keycodes::KC_MPLY, false),
    (keycodes::KC_MNXT, false),
    (keycodes::KC_MUTE, false),
    (keycodes::KC_VOLD, false),
    (keycodes::KC_VOLU, false),
    (keycodes::KC_WBAK, false),
    (keycodes::KC_WFWD, false),
    (keycodes::KC_WREF, false),
    (keycodes::KC_CALC, false),
    (keycodes::KC_MYCM, true),
    (keycodes::KC_MSEL, true),
];

/// Remaps number-row events while fn mode is enabled.
///
/// Consumes both the press and release of every remapped key; everything
/// else passes through untouched.
pub fn process_fn_mode<H: Host>(
    enabled: bool,
    host: &mut H,
    event: &KeyEvent,
) -> HandlerResult {
    if !enabled {
        return HandlerResult::PassThrough;
    }

    let KeyAction::Key(code) = event.action else {
        return HandlerResult::PassThrough;
    };
    let Some(index) = keycodes::number_row_index(code) else {
        return HandlerResult::PassThrough;
    };

    if host.modifiers() & MOD_MASK_SHIFT != 0 {
        let (mapped, tap_only) = SHIFTED_FUNCTION_ROW[index];
        if tap_only {
            if event.pressed {
                host.tap_keycode(mapped);
            }
            // The matching release is swallowed; there is nothing to unregister.
        } else if event.pressed {
            host.send_keycode(mapped);
        } else {
            host.release_keycode(mapped);
        }
    } else {
        let mapped = FUNCTION_ROW[index];
        if event.pressed {
            host.send_keycode(mapped);
        } else {
            host.release_keycode(mapped);
        }
    }

    HandlerResult::Handled
}
