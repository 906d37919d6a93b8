//! Color pipeline
//!
//! Maps a requested color to the color that is put on the wire. Stages run
//! in a fixed order:
//! 1. Gamma (optional)
//! 2. Color correction matrix and color temperature
//! 3. Global brightness (optionally dithered)
//!
//! The pipeline is a pure value: it is rebuilt from [`ColorSettings`] when
//! the settings change and never mutated while frames are encoded.

mod brightness;
mod correction;
mod gamma;

pub use correction::ColorCorrection;
pub use gamma::{DEFAULT_GAMMA, GammaTable};

use brightness::BrightnessFilter;

use crate::color::{Rgb, WHITE};

pub(crate) trait Filter {
    /// Apply the filter to a single color
    fn apply(&self, color: Rgb) -> Rgb;
}

/// Global color settings, owned by the application.
///
/// Changes take effect on the next encoded frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorSettings {
    /// Global brightness (0-255, 255 = passthrough)
    pub brightness: u8,
    /// Apply the gamma curve
    pub gamma: bool,
    /// Dither the brightness rounding error across frames
    pub dithering: bool,
    /// Per-channel correction multipliers (255 = unity)
    pub correction: Rgb,
    /// Target white point in Kelvin, `None` for no temperature correction
    pub temperature: Option<u16>,
}

impl Default for ColorSettings {
    fn default() -> Self {
        Self {
            brightness: 255,
            gamma: false,
            dithering: false,
            correction: WHITE,
            temperature: None,
        }
    }
}

/// Compiled color pipeline
#[derive(Debug, Clone)]
pub struct ColorPipeline {
    gamma: Option<GammaTable>,
    correction: ColorCorrection,
    brightness: BrightnessFilter,
    dithering: bool,
}

impl Default for ColorPipeline {
    fn default() -> Self {
        Self::new(&ColorSettings::default())
    }
}

impl ColorPipeline {
    /// Build a pipeline from settings using the default gamma exponent
    pub fn new(settings: &ColorSettings) -> Self {
        Self::with_gamma(settings, DEFAULT_GAMMA)
    }

    /// Build a pipeline with a custom gamma exponent
    pub fn with_gamma(settings: &ColorSettings, gamma: f32) -> Self {
        Self {
            gamma: settings.gamma.then(|| GammaTable::new(gamma)),
            correction: ColorCorrection::with_temperature(
                settings.correction,
                settings.temperature,
            ),
            brightness: BrightnessFilter::new(settings.brightness),
            dithering: settings.dithering,
        }
    }

    /// Effective brightness applied by the last stage
    pub const fn brightness(&self) -> u8 {
        self.brightness.brightness()
    }

    /// Combined correction and temperature factors
    pub const fn correction(&self) -> ColorCorrection {
        self.correction
    }

    /// Returns true if `correct` is the identity function
    pub fn is_passthrough(&self) -> bool {
        self.gamma.is_none() && !self.correction.is_active() && self.brightness() == 255
    }

    /// Correct a single color
    pub fn correct(&self, color: Rgb) -> Rgb {
        let color = self.pre_brightness(color);
        self.brightness.apply(color)
    }

    /// Correct a single color, dithering the brightness step when enabled.
    ///
    /// `phase` should change every frame and differ between neighbouring
    /// pixels; with dithering disabled this is exactly [`Self::correct`].
    pub fn correct_dithered(&self, color: Rgb, phase: u8) -> Rgb {
        if !self.dithering {
            return self.correct(color);
        }
        let color = self.pre_brightness(color);
        self.brightness.apply_dithered(color, phase)
    }

    fn pre_brightness(&self, color: Rgb) -> Rgb {
        let color = match &self.gamma {
            Some(table) => table.apply(color),
            None => color,
        };
        self.correction.apply(color)
    }
}
