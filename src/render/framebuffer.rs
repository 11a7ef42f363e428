//! In-memory RGB565 frame that embedded-graphics primitives draw into

use embedded_graphics::{
    pixelcolor::Rgb565,
    prelude::{DrawTarget, OriginDimensions, Pixel, RgbColor, Size},
};
use std::convert::Infallible;

/// Owned RGB565 frame, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    data: Vec<Rgb565>,
    width: u32,
    height: u32,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Framebuffer {
            data: vec![Rgb565::BLACK; width as usize * height as usize],
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb565> {
        if x < self.width && y < self.height {
            self.data.get(y as usize * self.width as usize + x as usize).copied()
        } else {
            None
        }
    }

    pub fn count(&self, color: Rgb565) -> usize {
        self.data.iter().filter(|&&pixel| pixel == color).count()
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for Framebuffer {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 {
                continue;
            }
            let (x, y) = (point.x as usize, point.y as usize);
            if x < self.width as usize && y < self.height as usize {
                self.data[y * self.width as usize + x] = color;
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.data.fill(color);
        Ok(())
    }
}
