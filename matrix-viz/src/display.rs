use embedded_graphics::{draw_target::DrawTarget, pixelcolor::Rgb888};

/// A pixel matrix whose writes only become visible on `flush`.
pub trait DisplaySink: DrawTarget<Color = Rgb888> {
    fn flush(&mut self) -> Result<(), Self::Error>;
}
