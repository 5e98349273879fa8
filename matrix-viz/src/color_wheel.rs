use embedded_graphics::pixelcolor::{Rgb888, RgbColor};

pub const BACKGROUND: Rgb888 = Rgb888::BLACK;

/// Classic 0..=255 color wheel: red, green, blue, back to red.
pub fn color_wheel(pos: u8) -> Rgb888 {
    if pos < 85 {
        Rgb888::new(255 - pos * 3, pos * 3, 0)
    } else if pos < 170 {
        let pos = pos - 85;
        Rgb888::new(0, 255 - pos * 3, pos * 3)
    } else {
        let pos = pos - 170;
        Rgb888::new(pos * 3, 0, 255 - pos * 3)
    }
}

/// Scale each channel by `brightness` (0.0..=1.0), truncating like the
/// NeoPixel driver does.
pub fn scale_brightness(color: Rgb888, brightness: f32) -> Rgb888 {
    let scale = |c: u8| (c as f32 * brightness.clamp(0.0, 1.0)) as u8;
    Rgb888::new(scale(color.r()), scale(color.g()), scale(color.b()))
}

/// Picks the fixed color of a display column.
pub trait ColumnColor {
    fn column_color(&self, column: usize, num_columns: usize) -> Rgb888;
}

/// Linear hue sweep over the first `span` wheel positions.
pub struct HueSweep {
    span: u32,
}

impl HueSweep {
    /// Sweep `span` wheel positions across the columns.
    pub const fn new(span: u32) -> Self {
        Self { span }
    }
}

impl ColumnColor for HueSweep {
    fn column_color(&self, column: usize, num_columns: usize) -> Rgb888 {
        if num_columns == 0 {
            return BACKGROUND;
        }
        let position = (self.span * column as u32 / num_columns as u32) % 256;
        color_wheel(position as u8)
    }
}
