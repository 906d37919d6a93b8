mod kelvin;
mod utils;

use smart_leds::{RGB8, hsv::Hsv as HSV};

pub use kelvin::kelvin_to_rgb;
pub use utils::{blend_colors, hsv2rgb, is_black, luma, rgb_from_u32};

pub type Rgb = RGB8;
pub type Hsv = HSV;

/// All channels off
pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
/// All channels at full scale
pub const WHITE: Rgb = Rgb {
    r: 255,
    g: 255,
    b: 255,
};
