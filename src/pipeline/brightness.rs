//! Global brightness scaling
//!
//! Brightness is applied exactly once, as the last pipeline stage. The
//! encoder never scales again.

use super::Filter;
use crate::color::{BLACK, Rgb};
use crate::math8::{scale8, scale8_with_fraction};

/// Ordered dither thresholds for the fractional part of a scaled channel.
///
/// Indexed by `phase & 3`; spreads the rounding error over four frames.
const DITHER_THRESHOLDS: [u8; 4] = [0x20, 0xA0, 0x60, 0xE0];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BrightnessFilter {
    brightness: u8,
}

impl BrightnessFilter {
    pub(crate) const fn new(brightness: u8) -> Self {
        Self { brightness }
    }

    pub(crate) const fn brightness(self) -> u8 {
        self.brightness
    }

    /// Scale with temporal dithering.
    ///
    /// The dropped fraction of each channel is compared against a threshold
    /// chosen by `phase`, rounding up on some frames and down on others.
    pub(crate) fn apply_dithered(self, color: Rgb, phase: u8) -> Rgb {
        if self.brightness == 255 {
            return color;
        }
        if self.brightness == 0 {
            return BLACK;
        }

        let threshold = DITHER_THRESHOLDS[usize::from(phase & 3)];
        let channel = |value: u8| {
            let (scaled, fraction) = scale8_with_fraction(value, self.brightness);
            if fraction > threshold {
                scaled.saturating_add(1)
            } else {
                scaled
            }
        };

        Rgb {
            r: channel(color.r),
            g: channel(color.g),
            b: channel(color.b),
        }
    }
}

impl Filter for BrightnessFilter {
    fn apply(&self, color: Rgb) -> Rgb {
        match self.brightness {
            255 => color,
            0 => BLACK,
            brightness => Rgb {
                r: scale8(color.r, brightness),
                g: scale8(color.g, brightness),
                b: scale8(color.b, brightness),
            },
        }
    }
}
