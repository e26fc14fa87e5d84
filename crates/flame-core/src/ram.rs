// crates/flame-core/src/ram.rs
use crate::endian::{pack32_be, unpack32_be};
use crate::map::Region;
use std::ops::Range;

/// Backing store for one Wii RAM region (MEM1 or MEM2).
/// Allocated zeroed once and never resized.
pub struct RamRegion {
    data: Vec<u8>,
}

impl RamRegion {
    pub fn new(region: Region) -> Self {
        Self {
            data: vec![0; region.size() as usize],
        }
    }

    /// The 4-byte span starting at `offset`, if `offset + 3` is still inside the region.
    fn span(&self, offset: u32) -> Option<Range<usize>> {
        let start = offset as usize;
        if start + 3 < self.data.len() {
            Some(start..start + 4)
        } else {
            None
        }
    }

    /// Big-endian word read. `None` when the span crosses the end of the region.
    pub fn read32(&self, offset: u32) -> Option<u32> {
        let span = self.span(offset)?;
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&self.data[span]);
        Some(pack32_be(bytes))
    }

    /// Big-endian word write. Returns `false` (and writes nothing) when out of range.
    pub fn write32(&mut self, offset: u32, value: u32) -> bool {
        match self.span(offset) {
            Some(span) => {
                self.data[span].copy_from_slice(&unpack32_be(value));
                true
            }
            None => false,
        }
    }

    /// Raw view of the whole region, for inspection and DMA-style consumers.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
