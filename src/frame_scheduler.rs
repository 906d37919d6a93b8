//! Frame pacing and transmission statistics.
//!
//! Provides portable frame pacing without async/await or platform-specific
//! timers. The caller owns the clock and is responsible for sleeping between
//! frames; [`FramePacer::time_until_due`] tells it for how long.

use embassy_time::{Duration, Instant};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::error::Error;

/// Default target frame rate (60 FPS).
pub const DEFAULT_FPS: u32 = 60;

/// Weight of a new sample in the moving averages (1/8).
const AVERAGE_SHIFT: u32 = 3;

/// Minimum-interval gate derived from a target frame rate.
#[derive(Debug, Clone, Copy)]
pub struct FramePacer {
    frame_duration: Duration,
    last_frame: Option<Instant>,
}

impl Default for FramePacer {
    fn default() -> Self {
        Self {
            frame_duration: frame_duration_for(DEFAULT_FPS),
            last_frame: None,
        }
    }
}

impl FramePacer {
    /// Create a pacer for a target frame rate; zero is rejected.
    pub fn new(fps: u32) -> Result<Self, Error> {
        let mut pacer = Self::default();
        pacer.set_target_fps(fps)?;
        Ok(pacer)
    }

    /// Create a pacer with custom frame duration.
    pub const fn with_frame_duration(frame_duration: Duration) -> Self {
        Self {
            frame_duration,
            last_frame: None,
        }
    }

    /// Change the target frame rate; the last frame time is kept.
    pub fn set_target_fps(&mut self, fps: u32) -> Result<(), Error> {
        if fps == 0 {
            return Err(Error::InvalidParameter);
        }
        self.frame_duration = frame_duration_for(fps);
        Ok(())
    }

    /// Minimum interval between two transmitted frames
    pub const fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    /// Time of the last transmitted frame
    pub const fn last_frame(&self) -> Option<Instant> {
        self.last_frame
    }

    /// Returns true if a frame may be transmitted at `now`
    pub fn is_due(&self, now: Instant) -> bool {
        match self.last_frame {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.frame_duration,
        }
    }

    /// How long to wait from `now` until the next frame is due (may be zero)
    pub fn time_until_due(&self, now: Instant) -> Duration {
        let Some(last) = self.last_frame else {
            return Duration::from_ticks(0);
        };
        let elapsed = now.saturating_duration_since(last);
        self.frame_duration
            .checked_sub(elapsed)
            .unwrap_or(Duration::from_ticks(0))
    }

    /// Record that a frame was transmitted at `now`
    pub fn mark(&mut self, now: Instant) {
        self.last_frame = Some(now);
    }

    /// Forget the last frame; the next check is immediately due
    pub fn reset(&mut self) {
        self.last_frame = None;
    }
}

fn frame_duration_for(fps: u32) -> Duration {
    Duration::from_micros(1_000_000 / u64::from(fps))
}

/// Transmission statistics
///
/// Accumulates for the lifetime of the controller until [`Self::reset`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameStats {
    total_shows: u32,
    last: Duration,
    min: Option<Duration>,
    max: Duration,
    average: Duration,
    total_time: Duration,
    average_interval: Option<Duration>,
    last_show_at: Option<Instant>,
}

impl FrameStats {
    pub const fn new() -> Self {
        Self {
            total_shows: 0,
            last: Duration::from_ticks(0),
            min: None,
            max: Duration::from_ticks(0),
            average: Duration::from_ticks(0),
            total_time: Duration::from_ticks(0),
            average_interval: None,
            last_show_at: None,
        }
    }

    /// Record a completed transmission that started at `started`
    pub fn record(&mut self, duration: Duration, started: Instant) {
        self.total_shows = self.total_shows.saturating_add(1);
        self.last = duration;
        self.min = Some(self.min.map_or(duration, |min| min.min(duration)));
        self.max = self.max.max(duration);
        self.total_time += duration;
        self.average = if self.total_shows == 1 {
            duration
        } else {
            moving_average(self.average, duration)
        };

        if let Some(previous) = self.last_show_at {
            let interval = started.saturating_duration_since(previous);
            self.average_interval = Some(match self.average_interval {
                Some(average) => moving_average(average, interval),
                None => interval,
            });
        }
        self.last_show_at = Some(started);
    }

    /// Number of completed transmissions
    pub const fn total_shows(&self) -> u32 {
        self.total_shows
    }

    /// Duration of the most recent transmission
    pub const fn last(&self) -> Duration {
        self.last
    }

    /// Shortest transmission (zero before the first one)
    pub fn min(&self) -> Duration {
        self.min.unwrap_or(Duration::from_ticks(0))
    }

    /// Longest transmission
    pub const fn max(&self) -> Duration {
        self.max
    }

    /// Exponential moving average of the transmission duration
    pub const fn average(&self) -> Duration {
        self.average
    }

    /// Sum of all transmission durations
    pub const fn total_time(&self) -> Duration {
        self.total_time
    }

    /// Frames per second derived from the average interval between shows.
    ///
    /// Zero until two frames have been transmitted.
    #[allow(clippy::cast_precision_loss)]
    pub fn fps(&self) -> f32 {
        match self.average_interval {
            Some(interval) if interval.as_micros() > 0 => {
                1_000_000.0 / interval.as_micros() as f32
            }
            _ => 0.0,
        }
    }

    /// Clear all counters
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Print the statistics
    pub fn log(&self) {
        #[cfg(feature = "esp32-log")]
        println!(
            "[FrameStats] shows={} last={}us avg={}us min={}us max={}us fps={}",
            self.total_shows,
            self.last.as_micros(),
            self.average.as_micros(),
            self.min().as_micros(),
            self.max.as_micros(),
            self.fps()
        );
    }
}

#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
fn moving_average(average: Duration, sample: Duration) -> Duration {
    let average = average.as_ticks() as i64;
    let sample = sample.as_ticks() as i64;
    let next = average + ((sample - average) >> AVERAGE_SHIFT);
    Duration::from_ticks(next.max(0) as u64)
}
