//! Strip controller
//!
//! Owns the frame buffers, the color pipeline and the transmit path for a set
//! of strips. The controller is an explicitly constructed value; there is no
//! global instance.
//!
//! Lifecycle: `Uninitialized` -> [`StripController::initialize`] ->
//! `Initialized` -> [`StripController::deinitialize`] (also run on drop) ->
//! `Uninitialized`. A failed `initialize` leaves the controller
//! uninitialized with nothing allocated.
//!
//! Drawing calls (`set_pixel` and friends) always target the back buffer and
//! silently ignore out-of-range coordinates. Transmission always reads the
//! front buffer.

use alloc::vec::Vec;

use embassy_time::{Duration, Instant};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::PulseTransmitter;
use crate::color::{BLACK, Rgb, is_black, luma};
use crate::error::Error;
use crate::frame_scheduler::{FramePacer, FrameStats};
use crate::layout::{OutputId, StripLayout};
use crate::memory::{FrameBuffers, HeapPool, MemoryRegion, NoPool, PixelPool};
use crate::pattern::{TestPattern, fill_gradient};
use crate::pipeline::{ColorPipeline, ColorSettings};
use crate::protocol::{PulseCode, Ws2812Encoder};

/// Strip setup handed to [`StripController::initialize`].
///
/// Values are expected to come from an already parsed configuration.
#[derive(Debug, Clone, Copy)]
pub struct StripConfig<'a> {
    /// Number of strips; must match the length of the tables below
    pub strip_count: u8,
    /// Pixel count of each strip
    pub pixels_per_strip: &'a [u16],
    /// Output of each strip
    pub output_ids: &'a [OutputId],
    /// Spatial offset of each strip, or empty
    pub offsets: &'a [[i16; 3]],
    /// Try the large pool before the general one
    pub prefer_large_pool: bool,
    /// Allocate separate front and back buffers
    pub double_buffer: bool,
    /// Upper limit for the global brightness
    pub max_brightness: u8,
}

/// State that only exists while initialized
struct ActiveStrips<L: PixelPool, G: PixelPool> {
    layout: StripLayout,
    buffers: FrameBuffers<L, G>,
    /// Scratch space for the pulses of the longest strip
    pulses: Vec<PulseCode>,
    /// Spatial position of every pixel, empty until set
    coords: Vec<[f32; 3]>,
}

/// Multi-strip controller
///
/// Generic over the transmit peripheral and the two memory pools.
pub struct StripController<T: PulseTransmitter, L: PixelPool = NoPool, G: PixelPool = HeapPool> {
    // External dependencies
    transmitter: T,
    large_pool: L,
    general_pool: G,
    encoder: Ws2812Encoder,

    // Buffers, present while initialized
    active: Option<ActiveStrips<L, G>>,

    // Color configuration
    settings: ColorSettings,
    max_brightness: u8,
    pipeline: ColorPipeline,

    // Scheduling
    pacer: FramePacer,
    stats: FrameStats,
    dirty: bool,
    frame: u32,
}

impl<T: PulseTransmitter> StripController<T> {
    /// Create a controller that allocates from the global heap only
    pub fn with_heap(transmitter: T) -> Self {
        Self::new(transmitter, NoPool, HeapPool)
    }
}

impl<T: PulseTransmitter, L: PixelPool, G: PixelPool> StripController<T, L, G> {
    /// Create an uninitialized controller
    pub fn new(transmitter: T, large_pool: L, general_pool: G) -> Self {
        Self {
            transmitter,
            large_pool,
            general_pool,
            encoder: Ws2812Encoder::default(),
            active: None,
            settings: ColorSettings::default(),
            max_brightness: 255,
            pipeline: ColorPipeline::default(),
            pacer: FramePacer::default(),
            stats: FrameStats::new(),
            dirty: false,
            frame: 0,
        }
    }

    /// Use a custom encoder (timing or peripheral clock)
    #[must_use]
    pub fn with_encoder(mut self, encoder: Ws2812Encoder) -> Self {
        self.encoder = encoder;
        self
    }

    // ========== Lifecycle ==========

    /// Allocate buffers and configure every output.
    ///
    /// Fails with `AlreadyInitialized` if called twice, `InvalidParameter` for
    /// a bad layout, `AllocationFailure` if neither pool can hold a buffer and
    /// `HardwareConfigFailure` if an output cannot be configured. On failure
    /// nothing stays allocated or configured.
    pub fn initialize(&mut self, config: &StripConfig<'_>) -> Result<(), Error> {
        if self.active.is_some() {
            #[cfg(feature = "esp32-log")]
            println!("[StripController.initialize] already initialized");
            return Err(Error::AlreadyInitialized);
        }
        if usize::from(config.strip_count) != config.pixels_per_strip.len() {
            return Err(Error::InvalidParameter);
        }

        let layout = StripLayout::new(config.pixels_per_strip, config.output_ids, config.offsets)?;

        let buffers = FrameBuffers::allocate(
            &mut self.large_pool,
            &mut self.general_pool,
            layout.total_pixels(),
            config.prefer_large_pool,
            config.double_buffer,
        )
        .inspect_err(|_err| {
            #[cfg(feature = "esp32-log")]
            println!(
                "[StripController.initialize] buffer allocation failed: {}",
                _err
            );
        })?;

        let mut pulses = Vec::new();
        pulses
            .try_reserve_exact(Ws2812Encoder::frame_len(layout.longest_strip()))
            .map_err(|_| Error::AllocationFailure)?;

        self.configure_outputs(&layout)?;

        #[cfg(feature = "esp32-log")]
        {
            let (front, back) = buffers.regions();
            println!(
                "[StripController.initialize] {} strips, {} pixels, front={:?} back={:?} double={}",
                layout.strip_count(),
                layout.total_pixels(),
                front,
                back,
                buffers.is_double_buffered()
            );
        }

        self.active = Some(ActiveStrips {
            layout,
            buffers,
            pulses,
            coords: Vec::new(),
        });
        self.max_brightness = config.max_brightness;
        self.rebuild_pipeline();
        self.pacer.reset();
        self.stats.reset();
        self.frame = 0;
        // Strip state is unknown after power-up; the first frame clears it
        self.dirty = true;
        Ok(())
    }

    /// Configure all outputs, releasing the ones already configured if any
    /// of them fails.
    fn configure_outputs(&mut self, layout: &StripLayout) -> Result<(), Error> {
        for (configured, strip) in layout.strips().iter().enumerate() {
            if let Err(_err) = self.transmitter.configure(strip.output) {
                #[cfg(feature = "esp32-log")]
                println!(
                    "[StripController.initialize] output {} config failed: {:?}",
                    strip.output.0, _err
                );
                for done in &layout.strips()[..configured] {
                    self.transmitter.release(done.output);
                }
                return Err(Error::HardwareConfigFailure);
            }
        }
        Ok(())
    }

    /// Release outputs and buffers. No-op when not initialized.
    pub fn deinitialize(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };
        for strip in active.layout.strips() {
            self.transmitter.release(strip.output);
        }
        self.dirty = false;
        #[cfg(feature = "esp32-log")]
        println!(
            "[StripController.deinitialize] released {} pixels",
            active.layout.total_pixels()
        );
    }

    /// Returns true between a successful `initialize` and `deinitialize`
    pub const fn is_initialized(&self) -> bool {
        self.active.is_some()
    }

    /// Strip layout, if initialized
    pub fn layout(&self) -> Option<&StripLayout> {
        self.active.as_ref().map(|active| &active.layout)
    }

    /// Total pixel count (zero when not initialized)
    pub fn total_pixels(&self) -> usize {
        self.layout().map_or(0, StripLayout::total_pixels)
    }

    /// Returns true if front and back are separate buffers
    pub fn is_double_buffered(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| active.buffers.is_double_buffered())
    }

    // ========== Drawing ==========

    /// Set one pixel of a strip in the back buffer
    pub fn set_pixel(&mut self, strip: u8, index: usize, color: Rgb) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let Some(flat) = active.layout.flat_index(strip, index) else {
            return;
        };
        active.buffers.back_mut()[flat] = color;
        self.dirty = true;
    }

    /// Set one pixel by flat index in the back buffer
    pub fn set_led(&mut self, index: usize, color: Rgb) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        if let Some(pixel) = active.buffers.back_mut().get_mut(index) {
            *pixel = color;
            self.dirty = true;
        }
    }

    /// Set `count` pixels starting at flat index `start`.
    ///
    /// The part of the range past the last pixel is ignored.
    pub fn set_range(&mut self, start: usize, count: usize, color: Rgb) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let back = active.buffers.back_mut();
        let end = start.saturating_add(count).min(back.len());
        if let Some(pixels) = back.get_mut(start..end)
            && !pixels.is_empty()
        {
            pixels.fill(color);
            self.dirty = true;
        }
    }

    /// Fill one strip in the back buffer
    pub fn fill_strip(&mut self, strip: u8, color: Rgb) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let Some(range) = active.layout.range(strip) else {
            return;
        };
        active.buffers.back_mut()[range].fill(color);
        self.dirty = true;
    }

    /// Blend one strip in the back buffer from `from` at its first pixel
    /// to `to` at its last
    pub fn fill_gradient(&mut self, strip: u8, from: Rgb, to: Rgb) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let Some(range) = active.layout.range(strip) else {
            return;
        };
        if range.is_empty() {
            return;
        }
        fill_gradient(&mut active.buffers.back_mut()[range], from, to);
        self.dirty = true;
    }

    /// Fill every strip in the back buffer
    pub fn fill_all(&mut self, color: Rgb) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        active.buffers.back_mut().fill(color);
        self.dirty = true;
    }

    /// Set every pixel in the back buffer to black
    pub fn clear(&mut self) {
        self.fill_all(BLACK);
    }

    /// Read a pixel of a strip from the back buffer
    pub fn pixel(&self, strip: u8, index: usize) -> Option<Rgb> {
        let active = self.active.as_ref()?;
        let flat = active.layout.flat_index(strip, index)?;
        active.buffers.back().get(flat).copied()
    }

    /// Draw a test pattern into the back buffer
    pub fn render_pattern(&mut self, pattern: TestPattern, color: Rgb, frame: u32) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        pattern.render(active.buffers.back_mut(), &active.layout, color, frame);
        self.dirty = true;
    }

    /// Buffer the producer draws into.
    ///
    /// Borrowing it marks the frame dirty.
    pub fn render_buffer(&mut self) -> Option<&mut [Rgb]> {
        let active = self.active.as_mut()?;
        self.dirty = true;
        Some(active.buffers.back_mut())
    }

    /// Buffer the transmit path reads from
    pub fn front_buffer(&self) -> Option<&[Rgb]> {
        self.active.as_ref().map(|active| active.buffers.front())
    }

    /// Exchange front and back buffers without copying.
    ///
    /// No-op in single-buffer mode.
    pub fn swap(&mut self) -> Result<(), Error> {
        let active = self.active.as_mut().ok_or(Error::NotInitialized)?;
        if active.buffers.swap() {
            self.dirty = true;
        }
        Ok(())
    }

    // ========== Coordinates ==========

    /// Store the spatial position of every pixel, in flat index order.
    ///
    /// `coords` must hold exactly one entry per pixel. The table lives until
    /// `deinitialize` and replaces any previous one.
    pub fn set_led_coords(&mut self, coords: &[[f32; 3]]) -> Result<(), Error> {
        let active = self.active.as_mut().ok_or(Error::NotInitialized)?;
        if coords.len() != active.layout.total_pixels() {
            return Err(Error::InvalidParameter);
        }
        let mut table = Vec::new();
        table
            .try_reserve_exact(coords.len())
            .map_err(|_| Error::AllocationFailure)?;
        table.extend_from_slice(coords);
        active.coords = table;
        Ok(())
    }

    /// Pixel coordinates in flat index order, if set
    pub fn led_coords(&self) -> Option<&[[f32; 3]]> {
        self.active
            .as_ref()
            .map(|active| active.coords.as_slice())
            .filter(|coords| !coords.is_empty())
    }

    /// Coordinates of one pixel of a strip, if set
    pub fn led_coord(&self, strip: u8, index: usize) -> Option<[f32; 3]> {
        let active = self.active.as_ref()?;
        let flat = active.layout.flat_index(strip, index)?;
        active.coords.get(flat).copied()
    }

    // ========== Color ==========

    /// Replace all color settings
    pub fn set_color_settings(&mut self, settings: ColorSettings) {
        self.settings = settings;
        self.rebuild_pipeline();
    }

    /// Requested color settings (brightness before the cap)
    pub const fn color_settings(&self) -> &ColorSettings {
        &self.settings
    }

    /// Set global brightness, capped at the configured maximum
    pub fn set_brightness(&mut self, brightness: u8) {
        self.settings.brightness = brightness;
        self.rebuild_pipeline();
    }

    /// Brightness actually applied to frames
    pub const fn brightness(&self) -> u8 {
        self.pipeline.brightness()
    }

    pub fn set_gamma_enabled(&mut self, enabled: bool) {
        self.settings.gamma = enabled;
        self.rebuild_pipeline();
    }

    pub fn set_dithering_enabled(&mut self, enabled: bool) {
        self.settings.dithering = enabled;
        self.rebuild_pipeline();
    }

    /// Set per-channel correction multipliers (255 = unity)
    pub fn set_color_correction(&mut self, correction: Rgb) {
        self.settings.correction = correction;
        self.rebuild_pipeline();
    }

    /// Set the white point in Kelvin, or `None` to disable
    pub fn set_color_temperature(&mut self, kelvin: Option<u16>) {
        self.settings.temperature = kelvin;
        self.rebuild_pipeline();
    }

    /// Compiled pipeline used for the next frame
    pub const fn pipeline(&self) -> &ColorPipeline {
        &self.pipeline
    }

    fn rebuild_pipeline(&mut self) {
        let effective = ColorSettings {
            brightness: self.settings.brightness.min(self.max_brightness),
            ..self.settings
        };
        self.pipeline = ColorPipeline::new(&effective);
        self.dirty |= self.active.is_some();
    }

    // ========== Transmission ==========

    /// Set the target frame rate used by [`Self::show_synced`]
    pub fn set_target_fps(&mut self, fps: u32) -> Result<(), Error> {
        self.pacer.set_target_fps(fps)
    }

    /// Minimum interval between synced frames
    pub const fn frame_duration(&self) -> Duration {
        self.pacer.frame_duration()
    }

    /// Time left until [`Self::show_synced`] would transmit
    pub fn time_until_next_frame(&self) -> Duration {
        self.pacer.time_until_due(Instant::now())
    }

    /// Returns true if the back buffer or settings changed since the last
    /// successful transmission
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Encode and transmit the front buffer, strip by strip.
    ///
    /// Blocks until every strip has been handed to the transmitter and
    /// returns the elapsed time. Always transmits, dirty or not. On failure
    /// the buffers, the dirty flag and the statistics are left untouched.
    ///
    /// Strips go out in layout order and the first failure stops the frame,
    /// so when strip `k` fails, strips before it already show the new frame
    /// while the rest keep the previous one. Calling `show` again resends
    /// every strip.
    pub fn show(&mut self) -> Result<Duration, Error> {
        let started = Instant::now();
        self.transmit_front()?;
        let elapsed = started.elapsed();

        self.stats.record(elapsed, started);
        self.pacer.mark(started);
        self.dirty = false;
        self.frame = self.frame.wrapping_add(1);
        Ok(elapsed)
    }

    /// Transmit only if the frame interval has elapsed since the last one.
    ///
    /// Returns `Ok(false)` without touching the hardware when called too
    /// early.
    pub fn show_synced(&mut self) -> Result<bool, Error> {
        if self.active.is_none() {
            return Err(Error::NotInitialized);
        }
        if !self.pacer.is_due(Instant::now()) {
            return Ok(false);
        }
        self.show()?;
        Ok(true)
    }

    fn transmit_front(&mut self) -> Result<(), Error> {
        let active = self.active.as_mut().ok_or(Error::NotInitialized)?;
        let front = active.buffers.front();

        for strip in active.layout.strips() {
            if strip.len == 0 {
                continue;
            }
            self.encoder.encode_frame(
                &front[strip.range()],
                &self.pipeline,
                self.frame,
                &mut active.pulses,
            );
            self.transmitter
                .transmit(strip.output, &active.pulses)
                .map_err(|_err| {
                    #[cfg(feature = "esp32-log")]
                    println!(
                        "[StripController.show] output {} transmit failed: {:?}",
                        strip.output.0, _err
                    );
                    Error::TransmissionFailure
                })?;
        }
        Ok(())
    }

    // ========== Statistics ==========

    pub const fn stats(&self) -> &FrameStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    pub fn log_stats(&self) {
        self.stats.log();
    }

    /// Number of lit pixels in the front buffer
    pub fn active_pixel_count(&self) -> usize {
        self.front_buffer().map_or(0, |front| {
            front.iter().filter(|pixel| !is_black(**pixel)).count()
        })
    }

    /// Count front-buffer pixels per luminance level
    pub fn luminance_histogram(&self, histogram: &mut [u32; 256]) {
        histogram.fill(0);
        let Some(front) = self.front_buffer() else {
            return;
        };
        for pixel in front {
            count_level(histogram, luma(*pixel));
        }
    }

    /// Count front-buffer pixels per channel level
    pub fn color_histogram(
        &self,
        red: &mut [u32; 256],
        green: &mut [u32; 256],
        blue: &mut [u32; 256],
    ) {
        red.fill(0);
        green.fill(0);
        blue.fill(0);
        let Some(front) = self.front_buffer() else {
            return;
        };
        for pixel in front {
            count_level(red, pixel.r);
            count_level(green, pixel.g);
            count_level(blue, pixel.b);
        }
    }

    /// Bytes owned by frame buffers, pulse scratch space and pixel
    /// coordinates
    pub fn memory_usage(&self) -> usize {
        self.active.as_ref().map_or(0, |active| {
            active.buffers.bytes()
                + active.pulses.capacity() * core::mem::size_of::<PulseCode>()
                + active.coords.capacity() * core::mem::size_of::<[f32; 3]>()
        })
    }

    /// Memory regions of the front and back buffers
    pub fn buffer_regions(&self) -> Option<(MemoryRegion, MemoryRegion)> {
        self.active.as_ref().map(|active| active.buffers.regions())
    }

    // ========== Collaborators ==========

    pub const fn transmitter(&self) -> &T {
        &self.transmitter
    }

    pub fn transmitter_mut(&mut self) -> &mut T {
        &mut self.transmitter
    }

    pub const fn encoder(&self) -> &Ws2812Encoder {
        &self.encoder
    }
}

fn count_level(histogram: &mut [u32; 256], level: u8) {
    let bucket = &mut histogram[usize::from(level)];
    *bucket = bucket.saturating_add(1);
}

impl<T: PulseTransmitter, L: PixelPool, G: PixelPool> Drop for StripController<T, L, G> {
    fn drop(&mut self) {
        self.deinitialize();
    }
}
