//! Color helpers and the indicator palette.
//!
//! Blink effects work in 8-bit RGB. The complement of a color, rather than
//! plain black, is used for the "off" phase of a blink so the flash stays
//! visible against whatever base color the matrix is showing.

use crate::types::Hsv;
use palette::{FromColor, Srgb};

pub const BLACK: Srgb<u8> = Srgb::new(0x00, 0x00, 0x00);
pub const WHITE: Srgb<u8> = Srgb::new(0xFF, 0xFF, 0xFF);
pub const RED: Srgb<u8> = Srgb::new(0xFF, 0x00, 0x00);
pub const DARK_RED: Srgb<u8> = Srgb::new(0x80, 0x00, 0x00);
pub const DARK_GREEN: Srgb<u8> = Srgb::new(0x00, 0x80, 0x00);
pub const DARK_BLUE: Srgb<u8> = Srgb::new(0x00, 0x00, 0x80);
pub const PASTEL_RED: Srgb<u8> = Srgb::new(0xCC, 0x66, 0x99);
pub const PASTEL_GREEN: Srgb<u8> = Srgb::new(0x66, 0x99, 0x66);
pub const PASTEL_BLUE: Srgb<u8> = Srgb::new(0x66, 0x99, 0xCC);
pub const LAYER_LOCK: Srgb<u8> = Srgb::new(0xAA, 0x22, 0x00);
pub const KBCTL_CLEAR: Srgb<u8> = Srgb::new(0x55, 0x00, 0x55);

/// Calculates the complementary color of `color`.
///
/// Each channel is inverted. With `darken`, channels that end up above `0x80`
/// are shifted down by `0x80`, trading brightness for contrast against bright
/// base colors.
pub fn complementary(color: Srgb<u8>, darken: bool) -> Srgb<u8> {
    let mut r = 0xFF - color.red;
    let mut g = 0xFF - color.green;
    let mut b = 0xFF - color.blue;

    if darken {
        if r > 0x80 {
            r -= 0x80;
        }
        if g > 0x80 {
            g -= 0x80;
        }
        if b > 0x80 {
            b -= 0x80;
        }
    }

    Srgb::new(r, g, b)
}

/// Converts a driver-convention HSV color (all components 0-255) to 8-bit RGB.
pub fn hsv_to_rgb(hsv: Hsv) -> Srgb<u8> {
    let hue = f32::from(hsv.hue) / 255.0 * 360.0;
    let sat = f32::from(hsv.sat) / 255.0;
    let val = f32::from(hsv.val) / 255.0;

    Srgb::from_color(palette::Hsv::new(hue, sat, val)).into_format()
}
