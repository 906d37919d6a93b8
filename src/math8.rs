/// Scale an 8-bit value by a factor (0-255 = 0.0-1.0)
///
/// Uses integer math for efficiency on embedded systems.
/// `scale == 255` is an exact passthrough and `scale == 0` is always zero.
#[inline]
#[allow(clippy::cast_lossless, clippy::cast_possible_truncation)]
pub const fn scale8(value: u8, scale: u8) -> u8 {
    ((value as u16 * (1 + scale as u16)) >> 8) as u8
}

/// Scale an 8-bit value, keeping the remainder that `scale8` drops.
///
/// Returns `(scaled, fraction)` where `fraction` is the low byte of the
/// 16-bit product. Used for dithering the truncated brightness step.
#[inline]
#[allow(clippy::cast_lossless, clippy::cast_possible_truncation)]
pub const fn scale8_with_fraction(value: u8, scale: u8) -> (u8, u8) {
    let product = value as u16 * (1 + scale as u16);
    ((product >> 8) as u8, (product & 0xFF) as u8)
}

/// Scale an 8-bit value, never dimming a lit channel to zero.
///
/// Non-zero inputs scaled by a non-zero factor stay at least 1.
#[inline]
pub const fn scale8_video(value: u8, scale: u8) -> u8 {
    let scaled = scale8(value, scale);
    if scaled == 0 && value != 0 && scale != 0 {
        1
    } else {
        scaled
    }
}

/// Blend two 8-bit values
#[inline]
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
pub const fn blend8(a: u8, b: u8, amount_of_b: u8) -> u8 {
    let delta = b as i16 - a as i16;

    let mut partial: u32 = (a as u32) << 16; // a * 65536
    partial = partial.wrapping_add(
        (delta as u32)
            .wrapping_mul(amount_of_b as u32)
            .wrapping_mul(257),
    ); // (b - a) * amount_of_b * 257
    partial = partial.wrapping_add(0x8000); // + 32768 for rounding

    (partial >> 16) as u8
}

/// Triangle wave: 0 -> 254 -> 0 over one 0-255 period
#[inline]
pub const fn triwave8(phase: u8) -> u8 {
    let folded = if phase & 0x80 != 0 { 255 - phase } else { phase };
    folded << 1
}

/// Ease in out quadratic
pub fn ease_in_out_quad(i: u8) -> u8 {
    let j = if i & 0x80 != 0 { 255 - i } else { i };
    let jj = scale8(j, j);
    let jj2 = jj << 1;
    if i & 0x80 == 0 { jj2 } else { 255 - jj2 }
}
