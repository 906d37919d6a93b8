//! Diagnostic test patterns
//!
//! The set of patterns is fixed, so they are a plain enum rather than a
//! registry of named callbacks. Patterns are rendered with an explicit
//! frame counter; timing is left to the caller.

use crate::color::{BLACK, Hsv, Rgb, WHITE, blend_colors, hsv2rgb};
use crate::layout::StripLayout;
use crate::math8::{ease_in_out_quad, scale8, scale8_video, triwave8};

const PATTERN_NAME_SOLID: &str = "solid";
const PATTERN_NAME_RAINBOW: &str = "rainbow";
const PATTERN_NAME_GRADIENT: &str = "gradient";
const PATTERN_NAME_STROBE: &str = "strobe";
const PATTERN_NAME_BREATHING: &str = "breathing";
const PATTERN_NAME_KNIGHT_RIDER: &str = "knight_rider";
const PATTERN_NAME_STRIP_IDENTIFY: &str = "strip_identify";
const PATTERN_NAME_MOVING_DOT: &str = "moving_dot";

const PATTERN_ID_SOLID: u8 = 0;
const PATTERN_ID_RAINBOW: u8 = 1;
const PATTERN_ID_GRADIENT: u8 = 2;
const PATTERN_ID_STROBE: u8 = 3;
const PATTERN_ID_BREATHING: u8 = 4;
const PATTERN_ID_KNIGHT_RIDER: u8 = 5;
const PATTERN_ID_STRIP_IDENTIFY: u8 = 6;
const PATTERN_ID_MOVING_DOT: u8 = 7;

/// Width of the knight rider scanner in pixels
const SCANNER_WIDTH: usize = 5;

/// Brightness of the moving dot (0-255)
const DOT_BRIGHTNESS: u8 = 128;

/// Frames per strobe half-period
const STROBE_HALF_PERIOD: u32 = 8;

/// One color per strip, used to tell strips apart
pub const STRIP_PALETTE: [Rgb; 8] = [
    Rgb { r: 255, g: 0, b: 0 },
    Rgb { r: 0, g: 255, b: 0 },
    Rgb { r: 0, g: 0, b: 255 },
    Rgb { r: 255, g: 255, b: 0 },
    Rgb { r: 0, g: 255, b: 255 },
    Rgb { r: 255, g: 0, b: 255 },
    WHITE,
    Rgb { r: 255, g: 128, b: 0 },
];

/// Known test patterns
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum TestPattern {
    /// Every pixel set to the pattern color
    Solid = PATTERN_ID_SOLID,
    /// Hue wheel across the whole layout, rotating with the frame counter
    Rainbow = PATTERN_ID_RAINBOW,
    /// Pattern color fading to black along each strip
    Gradient = PATTERN_ID_GRADIENT,
    /// Pattern color blinking on and off
    Strobe = PATTERN_ID_STROBE,
    /// Pattern color slowly fading in and out
    Breathing = PATTERN_ID_BREATHING,
    /// Bouncing scanner over the flat index space
    KnightRider = PATTERN_ID_KNIGHT_RIDER,
    /// Each strip lit with its own palette color
    StripIdentify = PATTERN_ID_STRIP_IDENTIFY,
    /// One dot travelling along every strip
    MovingDot = PATTERN_ID_MOVING_DOT,
}

impl TestPattern {
    pub const ALL: [Self; 8] = [
        Self::Solid,
        Self::Rainbow,
        Self::Gradient,
        Self::Strobe,
        Self::Breathing,
        Self::KnightRider,
        Self::StripIdentify,
        Self::MovingDot,
    ];

    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            PATTERN_ID_SOLID => Self::Solid,
            PATTERN_ID_RAINBOW => Self::Rainbow,
            PATTERN_ID_GRADIENT => Self::Gradient,
            PATTERN_ID_STROBE => Self::Strobe,
            PATTERN_ID_BREATHING => Self::Breathing,
            PATTERN_ID_KNIGHT_RIDER => Self::KnightRider,
            PATTERN_ID_STRIP_IDENTIFY => Self::StripIdentify,
            PATTERN_ID_MOVING_DOT => Self::MovingDot,
            _ => return None,
        })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Solid => PATTERN_NAME_SOLID,
            Self::Rainbow => PATTERN_NAME_RAINBOW,
            Self::Gradient => PATTERN_NAME_GRADIENT,
            Self::Strobe => PATTERN_NAME_STROBE,
            Self::Breathing => PATTERN_NAME_BREATHING,
            Self::KnightRider => PATTERN_NAME_KNIGHT_RIDER,
            Self::StripIdentify => PATTERN_NAME_STRIP_IDENTIFY,
            Self::MovingDot => PATTERN_NAME_MOVING_DOT,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            PATTERN_NAME_SOLID => Some(Self::Solid),
            PATTERN_NAME_RAINBOW => Some(Self::Rainbow),
            PATTERN_NAME_GRADIENT => Some(Self::Gradient),
            PATTERN_NAME_STROBE => Some(Self::Strobe),
            PATTERN_NAME_BREATHING => Some(Self::Breathing),
            PATTERN_NAME_KNIGHT_RIDER => Some(Self::KnightRider),
            PATTERN_NAME_STRIP_IDENTIFY => Some(Self::StripIdentify),
            PATTERN_NAME_MOVING_DOT => Some(Self::MovingDot),
            _ => None,
        }
    }

    /// Render one frame of the pattern into `leds`.
    ///
    /// `leds` must cover the layout's flat index space; pixels past the
    /// layout are left untouched.
    pub fn render(self, leds: &mut [Rgb], layout: &StripLayout, color: Rgb, frame: u32) {
        let total = layout.total_pixels().min(leds.len());
        let leds = &mut leds[..total];

        match self {
            Self::Solid => leds.fill(color),
            Self::Rainbow => render_rainbow(leds, frame),
            Self::Gradient => {
                for strip in layout.strips() {
                    if let Some(pixels) = leds.get_mut(strip.range()) {
                        fill_gradient(pixels, color, BLACK);
                    }
                }
            }
            Self::Strobe => {
                let on = (frame / STROBE_HALF_PERIOD) % 2 == 0;
                leds.fill(if on { color } else { BLACK });
            }
            Self::Breathing => {
                #[allow(clippy::cast_possible_truncation)]
                let level = ease_in_out_quad(triwave8(frame as u8));
                leds.fill(scale_color(color, level));
            }
            Self::KnightRider => render_scanner(leds, color, frame),
            Self::StripIdentify => {
                for strip in layout.strips() {
                    let tint = STRIP_PALETTE[usize::from(strip.index) % STRIP_PALETTE.len()];
                    if let Some(pixels) = leds.get_mut(strip.range()) {
                        pixels.fill(tint);
                    }
                }
            }
            Self::MovingDot => {
                leds.fill(BLACK);
                for strip in layout.strips() {
                    let len = usize::from(strip.len);
                    if len == 0 {
                        continue;
                    }
                    let tint = STRIP_PALETTE[usize::from(strip.index) % STRIP_PALETTE.len()];
                    let position = strip.start + frame as usize % len;
                    if let Some(pixel) = leds.get_mut(position) {
                        *pixel = Rgb {
                            r: scale8_video(tint.r, DOT_BRIGHTNESS),
                            g: scale8_video(tint.g, DOT_BRIGHTNESS),
                            b: scale8_video(tint.b, DOT_BRIGHTNESS),
                        };
                    }
                }
            }
        }
    }
}

fn scale_color(color: Rgb, scale: u8) -> Rgb {
    Rgb {
        r: scale8(color.r, scale),
        g: scale8(color.g, scale),
        b: scale8(color.b, scale),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn render_rainbow(leds: &mut [Rgb], frame: u32) {
    let len = leds.len().max(1);
    for (i, pixel) in leds.iter_mut().enumerate() {
        let hue = (frame as usize + i * 256 / len) as u8;
        *pixel = hsv2rgb(Hsv {
            hue,
            sat: 255,
            val: 255,
        });
    }
}

/// Blend linearly from `from` at the first pixel to `to` at the last.
///
/// A single pixel gets `from`.
#[allow(clippy::cast_possible_truncation)]
pub fn fill_gradient(leds: &mut [Rgb], from: Rgb, to: Rgb) {
    let len = leds.len();
    for (i, pixel) in leds.iter_mut().enumerate() {
        let amount = if len > 1 { (i * 255 / (len - 1)) as u8 } else { 0 };
        *pixel = blend_colors(from, to, amount);
    }
}

#[allow(clippy::cast_possible_truncation)]
fn render_scanner(leds: &mut [Rgb], color: Rgb, frame: u32) {
    leds.fill(BLACK);
    let len = leds.len();
    if len == 0 {
        return;
    }
    let span = (len - 1).max(1);
    let step = frame as usize % (2 * span);
    let head = (if step < span { step } else { 2 * span - step }).min(len - 1);

    for distance in 0..SCANNER_WIDTH {
        let level = (255 - distance * 255 / SCANNER_WIDTH) as u8;
        let dimmed = scale_color(color, level);
        if let Some(pixel) = head.checked_sub(distance).and_then(|i| leds.get_mut(i)) {
            *pixel = dimmed;
        }
        if let Some(pixel) = leds.get_mut(head + distance) {
            *pixel = dimmed;
        }
    }
}
