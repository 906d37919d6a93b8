//! Color correction filter
//!
//! Applies multiplicative color correction to each RGB channel.
//! Used for white balance and color temperature adjustments.
//!
//! The correction color represents the scaling factors for each channel:
//! - 0xFFFFFF = no correction (100% for all channels)
//! - 0xFFAA78 = R at 100%, G at 67%, B at 47%

use super::Filter;
use crate::color::{Rgb, WHITE, kelvin_to_rgb};
use crate::math8::scale8;

/// Per-channel multiplicative scaling.
///
/// Built from a correction matrix and an optional color temperature; both
/// are folded into one set of factors so each pixel costs three `scale8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorCorrection {
    /// Correction factors for each channel (0-255 = 0%-100%)
    factors: Rgb,
}

impl Default for ColorCorrection {
    fn default() -> Self {
        Self { factors: WHITE }
    }
}

impl ColorCorrection {
    /// Create a new color correction from color
    pub const fn new(factors: Rgb) -> Self {
        Self { factors }
    }

    /// Combine a correction matrix with an optional color temperature
    pub fn with_temperature(correction: Rgb, temperature: Option<u16>) -> Self {
        let Some(kelvin) = temperature else {
            return Self::new(correction);
        };
        let tint = kelvin_to_rgb(kelvin);
        Self::new(Rgb {
            r: scale8(correction.r, tint.r),
            g: scale8(correction.g, tint.g),
            b: scale8(correction.b, tint.b),
        })
    }

    /// Get current correction factors
    pub const fn factors(self) -> Rgb {
        self.factors
    }

    /// Check if correction is active (not all channels at 100%)
    pub const fn is_active(self) -> bool {
        self.factors.r != 255 || self.factors.g != 255 || self.factors.b != 255
    }
}

impl Filter for ColorCorrection {
    fn apply(&self, color: Rgb) -> Rgb {
        if !self.is_active() {
            return color;
        }

        Rgb {
            r: scale8(color.r, self.factors.r),
            g: scale8(color.g, self.factors.g),
            b: scale8(color.b, self.factors.b),
        }
    }
}
