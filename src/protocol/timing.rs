use embassy_time::Duration;

/// Source clock of the remote-control peripheral (80 MHz APB)
pub const SOURCE_CLOCK_HZ: u32 = 80_000_000;

/// Clock divisor applied to the source clock (80 MHz / 2 = 40 MHz, 25 ns ticks)
pub const CLOCK_DIVIDER: u32 = 2;

/// Nanoseconds per second
const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Shortest low time that reliably latches a WS2812 frame
pub const MIN_RESET_NS: u32 = 50_000;

/// Bit timing of a single-wire addressable LED protocol, in nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ws2812Timing {
    /// High time of a 0 bit
    pub t0h_ns: u32,
    /// Low time of a 0 bit
    pub t0l_ns: u32,
    /// High time of a 1 bit
    pub t1h_ns: u32,
    /// Low time of a 1 bit
    pub t1l_ns: u32,
    /// Minimum low time that latches a frame
    pub reset_ns: u32,
}

/// WS2812B timing
pub const WS2812B: Ws2812Timing = Ws2812Timing {
    t0h_ns: 350,
    t0l_ns: 800,
    t1h_ns: 700,
    t1l_ns: 600,
    reset_ns: 50_000,
};

impl Default for Ws2812Timing {
    fn default() -> Self {
        WS2812B
    }
}

impl Ws2812Timing {
    /// Longest of the two bit periods
    pub const fn max_bit_ns(&self) -> u32 {
        let zero = self.t0h_ns + self.t0l_ns;
        let one = self.t1h_ns + self.t1l_ns;
        if zero > one { zero } else { one }
    }

    /// Upper bound of the wire time for a frame of `pixels` pixels.
    ///
    /// Every pixel is 24 bits; the trailing reset is included.
    #[allow(clippy::cast_lossless)]
    pub const fn frame_duration(&self, pixels: usize) -> Duration {
        let bits = pixels as u64 * 24;
        let nanos = bits * self.max_bit_ns() as u64 + self.reset_ns as u64;
        Duration::from_micros(nanos.div_ceil(1000))
    }
}

/// Converts nanoseconds to peripheral ticks at a fixed clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickClock {
    tick_hz: u32,
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new(SOURCE_CLOCK_HZ, CLOCK_DIVIDER)
    }
}

impl TickClock {
    /// Create a tick clock from a source frequency and divisor.
    ///
    /// A zero divisor is treated as 1.
    pub const fn new(source_hz: u32, divider: u32) -> Self {
        let divider = if divider == 0 { 1 } else { divider };
        Self {
            tick_hz: source_hz / divider,
        }
    }

    /// Tick frequency in Hz
    pub const fn tick_hz(self) -> u32 {
        self.tick_hz
    }

    /// Round a duration in nanoseconds to the nearest whole tick count.
    ///
    /// Saturates at the 15-bit duration field of a pulse code.
    pub const fn ticks(self, nanos: u32) -> u16 {
        match self.try_ticks(nanos) {
            Some(ticks) => ticks,
            None => super::MAX_PULSE_TICKS,
        }
    }

    /// Like [`Self::ticks`], but `None` if the result does not fit the
    /// 15-bit duration field.
    #[allow(clippy::cast_lossless, clippy::cast_possible_truncation)]
    pub const fn try_ticks(self, nanos: u32) -> Option<u16> {
        let ticks = (nanos as u64 * self.tick_hz as u64 + NANOS_PER_SEC / 2) / NANOS_PER_SEC;
        if ticks > super::MAX_PULSE_TICKS as u64 {
            None
        } else {
            Some(ticks as u16)
        }
    }

    /// Length of `ticks` ticks in nanoseconds (zero for a zero clock)
    #[allow(clippy::cast_lossless)]
    pub const fn nanos(self, ticks: u16) -> u64 {
        if self.tick_hz == 0 {
            return 0;
        }
        ticks as u64 * NANOS_PER_SEC / self.tick_hz as u64
    }
}
