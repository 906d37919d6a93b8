//! Frame buffer memory
//!
//! Buffers come from two pool collaborators: a preferred large pool (PSRAM
//! on boards that have it) and a general-purpose fallback. A buffer handle
//! returns its memory to the owning pool when dropped, so every exit path,
//! including a half-finished double-buffer allocation, releases what it took.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::ops::{Deref, DerefMut};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::color::{BLACK, Rgb};
use crate::error::Error;

/// Source of pixel buffer memory
///
/// Implement this trait to support different memory regions.
pub trait PixelPool {
    /// Owned buffer handle; dropping it frees the memory
    type Buffer: DerefMut<Target = [Rgb]>;

    /// Allocate a buffer of exactly `len` pixels, or `None` if the pool
    /// cannot satisfy the request.
    fn allocate(&mut self, len: usize) -> Option<Self::Buffer>;
}

/// Global-allocator backed pool
///
/// Allocation failures are reported as `None` instead of aborting.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeapPool;

impl PixelPool for HeapPool {
    type Buffer = Box<[Rgb]>;

    fn allocate(&mut self, len: usize) -> Option<Self::Buffer> {
        let mut pixels = Vec::new();
        pixels.try_reserve_exact(len).ok()?;
        pixels.resize(len, BLACK);
        Some(pixels.into_boxed_slice())
    }
}

/// Pool for boards without a large memory region; never allocates
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPool;

impl PixelPool for NoPool {
    type Buffer = Box<[Rgb]>;

    fn allocate(&mut self, _len: usize) -> Option<Self::Buffer> {
        None
    }
}

/// Memory region a buffer was served from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryRegion {
    /// Preferred large pool
    Large,
    /// General-purpose fallback pool
    General,
}

/// Buffer owned by one of the two pools
pub enum PooledBuffer<L: PixelPool, G: PixelPool> {
    Large(L::Buffer),
    General(G::Buffer),
}

impl<L: PixelPool, G: PixelPool> PooledBuffer<L, G> {
    /// Allocate `len` pixels, trying the large pool first when preferred.
    pub fn allocate(
        large: &mut L,
        general: &mut G,
        len: usize,
        prefer_large: bool,
    ) -> Result<Self, Error> {
        if prefer_large {
            if let Some(buffer) = large.allocate(len) {
                return Ok(Self::Large(buffer));
            }
            #[cfg(feature = "esp32-log")]
            println!(
                "[PooledBuffer.allocate] large pool failed for {} pixels, falling back",
                len
            );
        }
        match general.allocate(len) {
            Some(buffer) => Ok(Self::General(buffer)),
            None => Err(Error::AllocationFailure),
        }
    }

    /// Region the buffer lives in
    pub const fn region(&self) -> MemoryRegion {
        match self {
            Self::Large(_) => MemoryRegion::Large,
            Self::General(_) => MemoryRegion::General,
        }
    }
}

impl<L: PixelPool, G: PixelPool> Deref for PooledBuffer<L, G> {
    type Target = [Rgb];

    fn deref(&self) -> &[Rgb] {
        match self {
            Self::Large(buffer) => buffer,
            Self::General(buffer) => buffer,
        }
    }
}

impl<L: PixelPool, G: PixelPool> DerefMut for PooledBuffer<L, G> {
    fn deref_mut(&mut self) -> &mut [Rgb] {
        match self {
            Self::Large(buffer) => buffer,
            Self::General(buffer) => buffer,
        }
    }
}

/// Front/back buffer pair
///
/// In single-buffer mode front and back are the same memory. In
/// double-buffer mode a role flag selects which handle is front; swapping
/// flips the flag and never copies pixels.
pub struct FrameBuffers<L: PixelPool, G: PixelPool> {
    primary: PooledBuffer<L, G>,
    secondary: Option<PooledBuffer<L, G>>,
    front_is_secondary: bool,
}

impl<L: PixelPool, G: PixelPool> FrameBuffers<L, G> {
    /// Allocate one or two buffers of `len` pixels, cleared to black.
    ///
    /// Each buffer runs the pool policy independently. If the second buffer
    /// cannot be allocated the first one is released before returning.
    pub fn allocate(
        large: &mut L,
        general: &mut G,
        len: usize,
        prefer_large: bool,
        double_buffer: bool,
    ) -> Result<Self, Error> {
        let mut primary = PooledBuffer::allocate(large, general, len, prefer_large)?;
        primary.fill(BLACK);

        let secondary = if double_buffer {
            let mut buffer = PooledBuffer::allocate(large, general, len, prefer_large)?;
            buffer.fill(BLACK);
            Some(buffer)
        } else {
            None
        };

        Ok(Self {
            primary,
            secondary,
            front_is_secondary: false,
        })
    }

    /// Returns true when front and back are distinct buffers
    pub const fn is_double_buffered(&self) -> bool {
        self.secondary.is_some()
    }

    /// Pixels per buffer
    pub fn len(&self) -> usize {
        self.primary.len()
    }

    /// Returns true if buffers hold no pixels
    pub fn is_empty(&self) -> bool {
        self.primary.is_empty()
    }

    /// Buffer bound to transmission
    pub fn front(&self) -> &[Rgb] {
        match &self.secondary {
            Some(secondary) if self.front_is_secondary => secondary,
            _ => &self.primary,
        }
    }

    /// Buffer open for drawing
    pub fn back(&self) -> &[Rgb] {
        match &self.secondary {
            Some(secondary) if !self.front_is_secondary => secondary,
            _ => &self.primary,
        }
    }

    /// Mutable access to the buffer open for drawing
    pub fn back_mut(&mut self) -> &mut [Rgb] {
        match &mut self.secondary {
            Some(secondary) if !self.front_is_secondary => secondary,
            _ => &mut self.primary,
        }
    }

    /// Exchange front and back roles. No-op in single-buffer mode.
    ///
    /// Returns true if the roles were exchanged.
    pub fn swap(&mut self) -> bool {
        if self.secondary.is_none() {
            return false;
        }
        self.front_is_secondary = !self.front_is_secondary;
        true
    }

    /// Regions of the front and back buffers
    pub fn regions(&self) -> (MemoryRegion, MemoryRegion) {
        let primary = self.primary.region();
        let secondary = self
            .secondary
            .as_ref()
            .map_or(primary, PooledBuffer::region);
        if self.front_is_secondary {
            (secondary, primary)
        } else {
            (primary, secondary)
        }
    }

    /// Bytes held by the pixel buffers
    pub fn bytes(&self) -> usize {
        let buffers = if self.is_double_buffered() { 2 } else { 1 };
        buffers * self.len() * core::mem::size_of::<Rgb>()
    }
}
