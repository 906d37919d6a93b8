use super::timing::{MIN_RESET_NS, TickClock, WS2812B, Ws2812Timing};
use super::{BITS_PER_PIXEL, PulseCode};
use crate::color::Rgb;
use crate::error::Error;
use crate::pipeline::ColorPipeline;

/// Stateless WS2812 encoder
///
/// Turns colors into pulse codes. Channels go out green, red, blue, most
/// significant bit first. The encoder does not scale colors; brightness and
/// correction are applied by [`ColorPipeline`] before encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ws2812Encoder {
    zero: PulseCode,
    one: PulseCode,
    reset: PulseCode,
}

impl Default for Ws2812Encoder {
    fn default() -> Self {
        // WS2812B at 40 MHz: every width fits and the reset is 2000 ticks
        Self::from_timing(WS2812B, TickClock::new(super::SOURCE_CLOCK_HZ, super::CLOCK_DIVIDER))
    }
}

impl Ws2812Encoder {
    /// Create an encoder with the given timing and peripheral clock.
    ///
    /// Pulse widths are converted to ticks once, here. Fails with
    /// `InvalidParameter` if the clock is stopped, if any width overflows
    /// the 15-bit pulse field, or if the reset gap would come out shorter
    /// than [`MIN_RESET_NS`].
    pub fn new(timing: Ws2812Timing, clock: TickClock) -> Result<Self, Error> {
        if clock.tick_hz() == 0 {
            return Err(Error::InvalidParameter);
        }
        let widths = [
            timing.t0h_ns,
            timing.t0l_ns,
            timing.t1h_ns,
            timing.t1l_ns,
            timing.reset_ns,
        ];
        if widths.iter().any(|&nanos| clock.try_ticks(nanos).is_none()) {
            return Err(Error::InvalidParameter);
        }

        let encoder = Self::from_timing(timing, clock);
        if clock.nanos(encoder.reset.low) < u64::from(MIN_RESET_NS) {
            return Err(Error::InvalidParameter);
        }
        Ok(encoder)
    }

    const fn from_timing(timing: Ws2812Timing, clock: TickClock) -> Self {
        Self {
            zero: PulseCode::new(clock.ticks(timing.t0h_ns), clock.ticks(timing.t0l_ns)),
            one: PulseCode::new(clock.ticks(timing.t1h_ns), clock.ticks(timing.t1l_ns)),
            reset: PulseCode::new(0, clock.ticks(timing.reset_ns)),
        }
    }

    /// Pulse of a logical 0 bit
    pub const fn zero(&self) -> PulseCode {
        self.zero
    }

    /// Pulse of a logical 1 bit
    pub const fn one(&self) -> PulseCode {
        self.one
    }

    /// Encode one color into its 24 pulses
    pub fn encode(&self, color: Rgb) -> [PulseCode; BITS_PER_PIXEL] {
        let mut pulses = [self.zero; BITS_PER_PIXEL];
        self.encode_into(color, &mut pulses);
        pulses
    }

    /// The trailing low pulse that latches a frame
    pub const fn encode_reset(&self) -> PulseCode {
        self.reset
    }

    fn encode_into(&self, color: Rgb, out: &mut [PulseCode; BITS_PER_PIXEL]) {
        // Wire order is GRB regardless of storage order
        let grb = (u32::from(color.g) << 16) | (u32::from(color.r) << 8) | u32::from(color.b);
        for (i, pulse) in out.iter_mut().enumerate() {
            let bit = (grb >> (BITS_PER_PIXEL - 1 - i)) & 1;
            *pulse = if bit == 1 { self.one } else { self.zero };
        }
    }

    /// Number of pulse codes needed for a frame of `pixels` pixels
    pub const fn frame_len(pixels: usize) -> usize {
        pixels * BITS_PER_PIXEL + 1
    }

    /// Encode a full frame into `out`, correcting every pixel on the way.
    ///
    /// `out` is cleared first. On return it holds `frame_len(pixels.len())`
    /// pulses: 24 per pixel followed by the reset pulse. `frame` seeds the
    /// dither phase and should increase with every transmitted frame.
    pub fn encode_frame(
        &self,
        pixels: &[Rgb],
        pipeline: &ColorPipeline,
        frame: u32,
        out: &mut alloc::vec::Vec<PulseCode>,
    ) {
        out.clear();
        let mut chunk = [self.zero; BITS_PER_PIXEL];
        for (index, &pixel) in pixels.iter().enumerate() {
            let corrected = pipeline.correct_dithered(pixel, dither_phase(frame, index));
            self.encode_into(corrected, &mut chunk);
            out.extend_from_slice(&chunk);
        }
        out.push(self.reset);
    }
}

/// Dither phase for a pixel in a given frame
#[allow(clippy::cast_possible_truncation)]
const fn dither_phase(frame: u32, index: usize) -> u8 {
    (frame as u8).wrapping_add(index as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_checked_constructor() {
        let checked = Ws2812Encoder::new(WS2812B, TickClock::default()).unwrap();
        assert_eq!(Ws2812Encoder::default(), checked);
    }
}
