#![no_std]

//! Multi-strip WS2812 output
//!
//! Architecture layers:
//! - `layout` - Flat pixel index space over several physical strips
//! - `memory` - Pool-backed front/back frame buffers
//! - `pipeline` - Color correction applied at encode time
//! - `protocol` - Pulse encoding of the single-wire LED protocol
//! - `frame_scheduler` - Frame pacing and transmission statistics
//! - `controller` - Owned controller tying the layers together
//!
//! The controller is generic over [`PulseTransmitter`], allowing different
//! hardware backends, and over two [`memory::PixelPool`]s.

extern crate alloc;

pub mod color;
pub mod controller;
pub mod error;
pub mod frame_scheduler;
pub mod layout;
pub mod math8;
pub mod memory;
pub mod pattern;
pub mod pipeline;
pub mod protocol;
pub mod transmitter;

pub use controller::{StripConfig, StripController};
pub use error::Error;
pub use frame_scheduler::{FramePacer, FrameStats};
pub use layout::{OutputId, StripDescriptor, StripLayout};
pub use memory::{HeapPool, MemoryRegion, NoPool, PixelPool};
pub use pattern::TestPattern;
pub use pipeline::{ColorPipeline, ColorSettings};
pub use protocol::{PulseCode, Ws2812Encoder, Ws2812Timing};
pub use transmitter::CriticalSectionTransmitter;

pub use color::{Hsv, Rgb};
pub use embassy_time::{Duration, Instant};

/// Abstract pulse transmitter trait
///
/// Implement this trait to support different hardware platforms (RMT, I2S,
/// SPI, PIO). Calls block until the peripheral has accepted the whole pulse
/// sequence or failed.
pub trait PulseTransmitter {
    /// Peripheral error
    type Error: core::fmt::Debug;

    /// Prepare the peripheral to drive `output`
    fn configure(&mut self, output: OutputId) -> Result<(), Self::Error>;

    /// Drive `pulses` on `output`
    fn transmit(&mut self, output: OutputId, pulses: &[PulseCode]) -> Result<(), Self::Error>;

    /// Give `output` back to the peripheral
    fn release(&mut self, _output: OutputId) {}
}
