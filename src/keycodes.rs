//! Keycode and modifier constants.
//!
//! Plain keys use HID keyboard-page usage IDs; media and system keys use the
//! extended byte values common in keyboard firmwares. The pipeline treats all
//! of these as opaque [`KeyCode`] values, so a host with its own encoding can
//! ignore this module entirely.

use crate::types::KeyCode;

pub const KC_A: KeyCode = 0x04;
pub const KC_Z: KeyCode = 0x1D;

pub const KC_1: KeyCode = 0x1E;
pub const KC_2: KeyCode = 0x1F;
pub const KC_3: KeyCode = 0x20;
pub const KC_4: KeyCode = 0x21;
pub const KC_5: KeyCode = 0x22;
pub const KC_6: KeyCode = 0x23;
pub const KC_7: KeyCode = 0x24;
pub const KC_8: KeyCode = 0x25;
pub const KC_9: KeyCode = 0x26;
pub const KC_0: KeyCode = 0x27;

pub const KC_ENTER: KeyCode = 0x28;
pub const KC_ESC: KeyCode = 0x29;
pub const KC_MINUS: KeyCode = 0x2D;
pub const KC_EQUAL: KeyCode = 0x2E;
pub const KC_GRAVE: KeyCode = 0x35;
pub const KC_CAPS: KeyCode = 0x39;

pub const KC_F1: KeyCode = 0x3A;
pub const KC_F2: KeyCode = 0x3B;
pub const KC_F3: KeyCode = 0x3C;
pub const KC_F4: KeyCode = 0x3D;
pub const KC_F5: KeyCode = 0x3E;
pub const KC_F6: KeyCode = 0x3F;
pub const KC_F7: KeyCode = 0x40;
pub const KC_F8: KeyCode = 0x41;
pub const KC_F9: KeyCode = 0x42;
pub const KC_F10: KeyCode = 0x43;
pub const KC_F11: KeyCode = 0x44;
pub const KC_F12: KeyCode = 0x45;

pub const KC_RALT: KeyCode = 0xE6;

// Media and system keys.
pub const KC_MUTE: KeyCode = 0xA8;
pub const KC_VOLU: KeyCode = 0xA9;
pub const KC_VOLD: KeyCode = 0xAA;
pub const KC_MNXT: KeyCode = 0xAB;
pub const KC_MPRV: KeyCode = 0xAC;
pub const KC_MSTP: KeyCode = 0xAD;
pub const KC_MPLY: KeyCode = 0xAE;
pub const KC_MSEL: KeyCode = 0xAF;
pub const KC_CALC: KeyCode = 0xB2;
pub const KC_MYCM: KeyCode = 0xB3;
pub const KC_WBAK: KeyCode = 0xB6;
pub const KC_WFWD: KeyCode = 0xB7;
pub const KC_WREF: KeyCode = 0xB9;

// HID modifier bitmask, one bit per modifier key.
pub const MOD_LCTL: u8 = 0x01;
pub const MOD_LSFT: u8 = 0x02;
pub const MOD_LALT: u8 = 0x04;
pub const MOD_LGUI: u8 = 0x08;
pub const MOD_RCTL: u8 = 0x10;
pub const MOD_RSFT: u8 = 0x20;
pub const MOD_RALT: u8 = 0x40;
pub const MOD_RGUI: u8 = 0x80;

/// Either shift key.
pub const MOD_MASK_SHIFT: u8 = MOD_LSFT | MOD_RSFT;

/// Returns the number-row position (0-11) of `code`, covering the digit keys
/// plus `-` and `=`, which sit at the end of the row but are not contiguous
/// with the digits in the HID usage table.
pub fn number_row_index(code: KeyCode) -> Option<usize> {
    match code {
        KC_1..=KC_0 => Some((code - KC_1) as usize),
        KC_MINUS => Some(10),
        KC_EQUAL => Some(11),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_row_covers_digits_and_tail_keys() {
        assert_eq!(number_row_index(KC_1), Some(0));
        assert_eq!(number_row_index(KC_0), Some(9));
        assert_eq!(number_row_index(KC_MINUS), Some(10));
        assert_eq!(number_row_index(KC_EQUAL), Some(11));
        assert_eq!(number_row_index(KC_A), None);
    }
}
