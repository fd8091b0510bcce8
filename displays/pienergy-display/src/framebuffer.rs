//! Rotating framebuffer
//!
//! All drawing targets the landscape logical bitmap. `present()` rotates it
//! by 90 degrees into the portrait device bitmap and streams every page to
//! the panel. Rotation and transfer are redone in full each frame.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PointsIter, Rectangle};
use pienergy_core::config::Rotation;
use pienergy_core::traits::{FrameSink, FrameStats};

use crate::backend::{PageStage, PanelInterface, PresentError};
use crate::bitmap::{DeviceBitmap, LogicalBitmap, DEVICE_HEIGHT, LOGICAL_HEIGHT, LOGICAL_WIDTH};
use crate::renderer;

/// Page addressing commands
mod cmd {
    pub const SET_PAGE_ADDR: u8 = 0xB0;
    pub const SET_LOW_COLUMN: u8 = 0x00;
    pub const SET_HIGH_COLUMN: u8 = 0x10;
}

/// Map a logical pixel to its device coordinate
pub const fn rotate_point(rotation: Rotation, x: usize, y: usize) -> (usize, usize) {
    match rotation {
        Rotation::Clockwise => (y, DEVICE_HEIGHT - 1 - x),
        Rotation::CounterClockwise => (y, x),
    }
}

fn page_error<E>(page: u8, stage: PageStage) -> impl FnOnce(E) -> PresentError<E> {
    move |source| PresentError {
        page,
        stage,
        source,
    }
}

/// Logical drawing surface plus rotated panel image
pub struct RotatingFramebuffer<I> {
    interface: I,
    rotation: Rotation,
    logical: LogicalBitmap,
    device: DeviceBitmap,
}

impl<I: PanelInterface> RotatingFramebuffer<I> {
    /// Create a blank framebuffer for a panel mounted as `rotation`
    pub fn new(interface: I, rotation: Rotation) -> Self {
        Self {
            interface,
            rotation,
            logical: LogicalBitmap::new(),
            device: DeviceBitmap::new(),
        }
    }

    /// Zero the logical surface
    pub fn clear(&mut self) {
        self.logical.clear();
    }

    /// Rotate and send the frame to the panel
    ///
    /// Stops at the first failed transfer; the panel then shows a partial
    /// frame until the next successful present overwrites every page.
    pub fn present(&mut self) -> Result<(), PresentError<I::Error>> {
        self.rotate();

        for (index, data) in self.device.pages().iter().enumerate() {
            let page = index as u8;

            self.interface
                .write_command(cmd::SET_PAGE_ADDR | page)
                .map_err(page_error(page, PageStage::PageSelect))?;
            self.interface
                .write_command(cmd::SET_LOW_COLUMN)
                .map_err(page_error(page, PageStage::ColumnLow))?;
            self.interface
                .write_command(cmd::SET_HIGH_COLUMN)
                .map_err(page_error(page, PageStage::ColumnHigh))?;
            self.interface
                .write_data(data)
                .map_err(page_error(page, PageStage::Data))?;
        }

        Ok(())
    }

    /// Rebuild the device bitmap from the logical one
    fn rotate(&mut self) {
        self.device.clear();

        for (page, columns) in self.logical.pages().iter().enumerate() {
            for (x, &byte) in columns.iter().enumerate() {
                if byte == 0 {
                    continue;
                }
                for bit in 0..8 {
                    if byte & (1 << bit) != 0 {
                        let (dx, dy) = rotate_point(self.rotation, x, page * 8 + bit);
                        self.device.set(dx, dy, true);
                    }
                }
            }
        }
    }

    /// Mounting orientation
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Logical drawing surface
    pub fn logical(&self) -> &LogicalBitmap {
        &self.logical
    }

    /// Device image built by the last present
    pub fn device(&self) -> &DeviceBitmap {
        &self.device
    }

    /// Panel interface
    pub fn interface(&self) -> &I {
        &self.interface
    }

    /// Panel interface (mutable)
    pub fn interface_mut(&mut self) -> &mut I {
        &mut self.interface
    }

    /// Give back the panel interface
    pub fn release(self) -> I {
        self.interface
    }
}

impl<I> OriginDimensions for RotatingFramebuffer<I> {
    fn size(&self) -> Size {
        Size::new(LOGICAL_WIDTH as u32, LOGICAL_HEIGHT as u32)
    }
}

impl<I> DrawTarget for RotatingFramebuffer<I> {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<P>(&mut self, pixels: P) -> Result<(), Self::Error>
    where
        P: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if coord.x >= 0 && coord.y >= 0 {
                self.logical
                    .set(coord.x as usize, coord.y as usize, color.is_on());
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        let on = color.is_on();
        for point in area.points() {
            self.logical.set(point.x as usize, point.y as usize, on);
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.logical.fill(color.is_on());
        Ok(())
    }
}

impl<I: PanelInterface> FrameSink for RotatingFramebuffer<I> {
    type Error = PresentError<I::Error>;

    fn render(&mut self, stats: &FrameStats) {
        self.logical.clear();
        if let Err(never) = renderer::render_stats(self, stats) {
            match never {}
        }
    }

    fn present(&mut self) -> Result<(), Self::Error> {
        RotatingFramebuffer::present(self)
    }
}
