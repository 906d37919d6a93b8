//! Strip layout
//!
//! Several physical strips are addressed through one flat logical index
//! space. Strips occupy contiguous, non-overlapping ranges in strip order.

use core::ops::Range;

use heapless::Vec;

use crate::error::Error;

/// Maximum number of strips (one per transmit channel)
pub const MAX_STRIPS: usize = 8;

/// Maximum number of pixels across all strips
pub const MAX_TOTAL_PIXELS: usize = 4096;

/// Hardware output a strip is wired to (GPIO number)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OutputId(pub u8);

/// One physical strip in the layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripDescriptor {
    /// Position of the strip in the layout
    pub index: u8,
    /// Output the strip is driven from
    pub output: OutputId,
    /// Number of pixels on the strip
    pub len: u16,
    /// First flat index of the strip
    pub start: usize,
    /// Spatial offset of the strip origin
    pub offset: [i16; 3],
}

impl StripDescriptor {
    /// Flat index range covered by the strip
    pub const fn range(&self) -> Range<usize> {
        self.start..self.start + self.len as usize
    }
}

/// Validated strip layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripLayout {
    strips: Vec<StripDescriptor, MAX_STRIPS>,
    total: usize,
}

impl StripLayout {
    /// Build a layout from per-strip pixel counts and outputs.
    ///
    /// `offsets` is either empty (all strips at the origin) or has one entry
    /// per strip. Rejects empty or mismatched tables, more than
    /// [`MAX_STRIPS`] strips, a zero total and totals above
    /// [`MAX_TOTAL_PIXELS`].
    pub fn new(
        pixels_per_strip: &[u16],
        outputs: &[OutputId],
        offsets: &[[i16; 3]],
    ) -> Result<Self, Error> {
        let count = pixels_per_strip.len();
        if count == 0 || count > MAX_STRIPS || outputs.len() != count {
            return Err(Error::InvalidParameter);
        }
        if !offsets.is_empty() && offsets.len() != count {
            return Err(Error::InvalidParameter);
        }

        let mut strips = Vec::new();
        let mut total = 0usize;
        for (i, (&len, &output)) in pixels_per_strip.iter().zip(outputs).enumerate() {
            let index = u8::try_from(i).map_err(|_| Error::InvalidParameter)?;
            let descriptor = StripDescriptor {
                index,
                output,
                len,
                start: total,
                offset: offsets.get(i).copied().unwrap_or_default(),
            };
            strips
                .push(descriptor)
                .map_err(|_| Error::InvalidParameter)?;
            total += usize::from(len);
        }

        if total == 0 || total > MAX_TOTAL_PIXELS {
            return Err(Error::InvalidParameter);
        }

        Ok(Self { strips, total })
    }

    /// Total number of pixels across all strips
    pub const fn total_pixels(&self) -> usize {
        self.total
    }

    /// Number of strips
    pub fn strip_count(&self) -> usize {
        self.strips.len()
    }

    /// All strips in layout order
    pub fn strips(&self) -> &[StripDescriptor] {
        &self.strips
    }

    /// Get a strip by index
    pub fn strip(&self, strip: u8) -> Option<&StripDescriptor> {
        self.strips.get(usize::from(strip))
    }

    /// Flat index range of a strip
    pub fn range(&self, strip: u8) -> Option<Range<usize>> {
        self.strip(strip).map(StripDescriptor::range)
    }

    /// Pixel count of the longest strip
    pub fn longest_strip(&self) -> usize {
        self.strips
            .iter()
            .map(|strip| usize::from(strip.len))
            .max()
            .unwrap_or(0)
    }

    /// Map a flat index to `(strip, local index)`
    pub fn locate(&self, flat: usize) -> Option<(u8, usize)> {
        if flat >= self.total {
            return None;
        }
        // First strip whose range ends past `flat`; empty strips are skipped
        let position = self
            .strips
            .partition_point(|strip| strip.range().end <= flat);
        let strip = self.strips.get(position)?;
        Some((strip.index, flat - strip.start))
    }

    /// Map `(strip, local index)` to a flat index
    pub fn flat_index(&self, strip: u8, local: usize) -> Option<usize> {
        let strip = self.strip(strip)?;
        (local < usize::from(strip.len)).then(|| strip.start + local)
    }
}
