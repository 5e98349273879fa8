use alloc::{vec, vec::Vec};

use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Point, Size},
    pixelcolor::Rgb888,
    Pixel,
};

use crate::color_wheel::{scale_brightness, BACKGROUND};
use crate::display::DisplaySink;

/// A chain of addressable LEDs, written all at once.
pub trait LedStrip {
    type Error;

    fn write(&mut self, colors: &[Rgb888]) -> Result<(), Self::Error>;
}

/// Buffered matrix view over an LED strip.
///
/// Pixels are kept in RAM and pushed to the strip, scaled by `brightness`,
/// only when `flush` is called. Writes outside the matrix are dropped.
pub struct PixelFramebuffer<S> {
    strip: S,
    width: u32,
    height: u32,
    alternating: bool,
    brightness: f32,
    pixels: Vec<Rgb888>,
    staging: Vec<Rgb888>,
}

impl<S: LedStrip> PixelFramebuffer<S> {
    /// `alternating` reverses every odd row, for strips wired in a zigzag.
    pub fn new(strip: S, width: u32, height: u32, alternating: bool, brightness: f32) -> Self {
        let len = (width * height) as usize;
        Self {
            strip,
            width,
            height,
            alternating,
            brightness,
            pixels: vec![BACKGROUND; len],
            staging: vec![BACKGROUND; len],
        }
    }

    /// The LED strip behind the buffer.
    pub fn strip(&self) -> &S {
        &self.strip
    }

    pub fn strip_mut(&mut self) -> &mut S {
        &mut self.strip
    }

    /// Give the strip back, dropping the buffer.
    pub fn into_strip(self) -> S {
        self.strip
    }

    /// Buffered (not yet flushed) color at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb888> {
        (x < self.width && y < self.height).then(|| self.pixels[(y * self.width + x) as usize])
    }

    /// Position of matrix pixel `(x, y)` along the strip. `x` and `y` must
    /// be inside the matrix.
    fn strip_index(&self, x: u32, y: u32) -> usize {
        let x = if self.alternating && y % 2 == 1 {
            self.width - 1 - x
        } else {
            x
        };
        (y * self.width + x) as usize
    }

    fn contains(&self, point: Point) -> bool {
        point.x >= 0
            && point.y >= 0
            && (point.x as u32) < self.width
            && (point.y as u32) < self.height
    }
}

impl<S> OriginDimensions for PixelFramebuffer<S> {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl<S: LedStrip> DrawTarget for PixelFramebuffer<S> {
    type Color = Rgb888;
    type Error = S::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if self.contains(point) {
                let index = (point.y as u32 * self.width + point.x as u32) as usize;
                self.pixels[index] = color;
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.pixels.fill(color);
        Ok(())
    }
}

impl<S: LedStrip> DisplaySink for PixelFramebuffer<S> {
    fn flush(&mut self) -> Result<(), Self::Error> {
        for y in 0..self.height {
            for x in 0..self.width {
                let color = self.pixels[(y * self.width + x) as usize];
                let index = self.strip_index(x, y);
                self.staging[index] = scale_brightness(color, self.brightness);
            }
        }
        self.strip.write(&self.staging)
    }
}
