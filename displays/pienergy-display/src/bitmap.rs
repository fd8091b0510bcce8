//! Page-packed monochrome bitmaps
//!
//! Each byte holds 8 vertically stacked pixels, LSB topmost. Byte
//! `(page, x)` holds pixels `(x, 8*page .. 8*page + 8)`.

/// Logical drawing surface width
pub const LOGICAL_WIDTH: usize = 128;
/// Logical drawing surface height
pub const LOGICAL_HEIGHT: usize = 64;
/// Native panel width
pub const DEVICE_WIDTH: usize = 64;
/// Native panel height
pub const DEVICE_HEIGHT: usize = 128;

/// Landscape surface seen by rendering code
pub type LogicalBitmap = MonoBitmap<LOGICAL_WIDTH, { LOGICAL_HEIGHT / 8 }>;

/// Portrait surface in the panel's native layout (16 pages)
pub type DeviceBitmap = MonoBitmap<DEVICE_WIDTH, { DEVICE_HEIGHT / 8 }>;

/// Monochrome bitmap of `W` columns by `PAGES * 8` rows
#[derive(Clone, PartialEq, Eq)]
pub struct MonoBitmap<const W: usize, const PAGES: usize> {
    pages: [[u8; W]; PAGES],
}

impl<const W: usize, const PAGES: usize> Default for MonoBitmap<W, PAGES> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const W: usize, const PAGES: usize> MonoBitmap<W, PAGES> {
    /// Width in pixels
    pub const WIDTH: usize = W;
    /// Height in pixels
    pub const HEIGHT: usize = PAGES * 8;

    /// Create an all-off bitmap
    pub const fn new() -> Self {
        Self {
            pages: [[0; W]; PAGES],
        }
    }

    /// Turn every pixel off
    pub fn clear(&mut self) {
        self.fill(false);
    }

    /// Set every pixel to `on`
    pub fn fill(&mut self, on: bool) {
        let byte = if on { 0xFF } else { 0x00 };
        for page in self.pages.iter_mut() {
            page.fill(byte);
        }
    }

    /// Set one pixel; out-of-range coordinates are ignored
    pub fn set(&mut self, x: usize, y: usize, on: bool) {
        if x >= W || y >= Self::HEIGHT {
            return;
        }
        let mask = 1 << (y % 8);
        let byte = &mut self.pages[y / 8][x];
        if on {
            *byte |= mask;
        } else {
            *byte &= !mask;
        }
    }

    /// Read one pixel; out-of-range coordinates read as off
    pub fn get(&self, x: usize, y: usize) -> bool {
        if x >= W || y >= Self::HEIGHT {
            return false;
        }
        self.pages[y / 8][x] & (1 << (y % 8)) != 0
    }

    /// Bytes of one page
    pub fn page(&self, page: usize) -> Option<&[u8; W]> {
        self.pages.get(page)
    }

    /// All pages, top first
    pub fn pages(&self) -> &[[u8; W]; PAGES] {
        &self.pages
    }

    /// Number of pixels turned on
    pub fn count_on(&self) -> u32 {
        self.pages
            .iter()
            .flat_map(|page| page.iter())
            .map(|byte| byte.count_ones())
            .sum()
    }
}

impl<const W: usize, const PAGES: usize> core::fmt::Debug for MonoBitmap<W, PAGES> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MonoBitmap")
            .field("width", &W)
            .field("height", &Self::HEIGHT)
            .field("on", &self.count_on())
            .finish()
    }
}
