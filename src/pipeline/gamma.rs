//! Gamma lookup table
//!
//! WS2812 output is linear in PWM duty, so perceived brightness is not.
//! The table maps requested 8-bit levels through a power-law curve.

use libm::{powf, roundf};

use super::Filter;
use crate::color::Rgb;

/// Gamma exponent commonly used for WS2812 strips
pub const DEFAULT_GAMMA: f32 = 2.8;

/// Precomputed 8-bit gamma curve
#[derive(Clone)]
pub struct GammaTable {
    lut: [u8; 256],
}

impl core::fmt::Debug for GammaTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GammaTable")
            .field("mid", &self.lut[128])
            .finish_non_exhaustive()
    }
}

impl GammaTable {
    /// Build a table for the given exponent.
    ///
    /// Non-finite or non-positive exponents fall back to the identity curve.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn new(gamma: f32) -> Self {
        let mut lut = [0u8; 256];
        let valid = gamma.is_finite() && gamma > 0.0;
        for (index, entry) in lut.iter_mut().enumerate() {
            *entry = if valid {
                let normalized = index as f32 / 255.0;
                roundf(powf(normalized, gamma) * 255.0).clamp(0.0, 255.0) as u8
            } else {
                index as u8
            };
        }
        Self { lut }
    }

    /// Look up a single channel value
    #[inline]
    pub fn lookup(&self, value: u8) -> u8 {
        self.lut[usize::from(value)]
    }
}

impl Default for GammaTable {
    fn default() -> Self {
        Self::new(DEFAULT_GAMMA)
    }
}

impl Filter for GammaTable {
    fn apply(&self, color: Rgb) -> Rgb {
        Rgb {
            r: self.lookup(color.r),
            g: self.lookup(color.g),
            b: self.lookup(color.b),
        }
    }
}
