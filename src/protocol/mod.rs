//! Addressable LED wire protocol
//!
//! Bit-accurate encoding of colors into high/low pulse pairs measured in
//! peripheral ticks, plus the trailing reset gap.

mod encoder;
mod timing;

pub use encoder::Ws2812Encoder;
pub use timing::{
    CLOCK_DIVIDER, MIN_RESET_NS, SOURCE_CLOCK_HZ, TickClock, WS2812B, Ws2812Timing,
};

/// Pulses per pixel: three 8-bit channels
pub const BITS_PER_PIXEL: usize = 24;

/// Largest duration a pulse half can carry (15-bit field)
pub const MAX_PULSE_TICKS: u16 = 0x7FFF;

/// One high/low pulse pair, durations in peripheral ticks.
///
/// A pulse with `high == 0` is a plain low level, used for the reset gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PulseCode {
    /// Ticks the line is driven high
    pub high: u16,
    /// Ticks the line is driven low afterwards
    pub low: u16,
}

impl PulseCode {
    pub const fn new(high: u16, low: u16) -> Self {
        Self { high, low }
    }

    /// Total length in ticks
    #[allow(clippy::cast_lossless)]
    pub const fn ticks(self) -> u32 {
        self.high as u32 + self.low as u32
    }

    /// Pack into a remote-control peripheral item.
    ///
    /// Layout: bits 0-14 first duration, bit 15 first level, bits 16-30
    /// second duration, bit 31 second level. A pure low pulse is emitted as a
    /// single low half followed by a zero-length end marker.
    #[allow(clippy::cast_lossless)]
    pub const fn to_word(self) -> u32 {
        const LEVEL_HIGH: u32 = 1 << 15;
        let high = (self.high & MAX_PULSE_TICKS) as u32;
        let low = (self.low & MAX_PULSE_TICKS) as u32;
        if high == 0 {
            low
        } else {
            (high | LEVEL_HIGH) | (low << 16)
        }
    }
}
