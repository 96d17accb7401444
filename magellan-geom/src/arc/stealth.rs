//! Hidden-bit packing of arc metadata into coordinate doubles.
//!
//! A stroked arc hides the exact angular position of its original
//! intermediate point as a 32-bit ratio split into two 16-bit halves. Each
//! half occupies the least-significant mantissa byte of the X and Y doubles
//! of one carrier point, so the perturbation is at most one ULP step of
//! magnitude 2^-45 relative to the coordinate. Nothing else in the pipeline
//! may touch those low bytes or the encoding is destroyed.

/// Byte index of the least-significant mantissa byte in a double's native
/// byte layout.
#[cfg(target_endian = "little")]
pub const DOUBLE_LSB_OFFSET: usize = 0;
/// Byte index of the least-significant mantissa byte in a double's native
/// byte layout.
#[cfg(target_endian = "big")]
pub const DOUBLE_LSB_OFFSET: usize = 7;

/// Scale of the hidden 32-bit angle ratio: ratio 1.0 maps to `0xFFFFFFFE`.
///
/// `0xFFFFFFFF` is reserved as the "no valid ratio" marker.
pub const HIDDEN_ALPHA_SCALE: u32 = 0xFFFF_FFFE;

/// Writes a 16-bit value into the low mantissa bytes of an X/Y pair.
///
/// The low byte of `value` lands in `x`, the high byte in `y`.
pub fn set_hidden_value(value: u16, x: &mut f64, y: &mut f64) {
    let mut bytes = x.to_ne_bytes();
    bytes[DOUBLE_LSB_OFFSET] = (value & 0xff) as u8;
    *x = f64::from_ne_bytes(bytes);

    let mut bytes = y.to_ne_bytes();
    bytes[DOUBLE_LSB_OFFSET] = (value >> 8) as u8;
    *y = f64::from_ne_bytes(bytes);
}

/// Reads back a 16-bit value hidden by [`set_hidden_value`].
pub fn get_hidden_value(x: f64, y: f64) -> u16 {
    let low = x.to_ne_bytes()[DOUBLE_LSB_OFFSET] as u16;
    let high = y.to_ne_bytes()[DOUBLE_LSB_OFFSET] as u16;
    (high << 8) | low
}

/// Encodes an angle ratio in `[0, 1]` as the hidden 32-bit fixed-point value.
pub fn ratio_to_hidden(ratio: f64) -> u32 {
    (0.5 + ratio * HIDDEN_ALPHA_SCALE as f64) as u32
}

/// Decodes a hidden 32-bit value back into an angle ratio, rejecting the
/// reserved marker and out-of-range values.
pub fn hidden_to_ratio(value: u32) -> Option<f64> {
    if value == u32::MAX {
        return None;
    }
    Some(value as f64 / HIDDEN_ALPHA_SCALE as f64)
}
