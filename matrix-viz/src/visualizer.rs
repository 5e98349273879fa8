use alloc::{vec, vec::Vec};

use embedded_graphics::{draw_target::DrawTarget, pixelcolor::Rgb888};

use crate::audio::{AudioSource, SpectrumTransform};
use crate::color_wheel::HueSweep;
use crate::column_renderer::ColumnRenderer;
use crate::column_weight_table::ColumnWeightTable;
use crate::config::VisualizerConfig;
use crate::display::DisplaySink;
use crate::dynamic_range::DynamicRangeTracker;
use crate::error::{ConfigError, FrameError};

const LOG_INTERVAL: u8 = 200;

/// Everything one frame loop needs, built once at startup.
pub struct Visualizer {
    config: VisualizerConfig,
    table: ColumnWeightTable,
    tracker: DynamicRangeTracker,
    renderer: ColumnRenderer,
    samples: Vec<u16>,
    spectrum: Vec<f32>,
    scaled: Vec<f32>,
    frames: u32,
    log_counter: u8,
}

impl Visualizer {
    /// Validate `config`, build the weight table and size the scratch
    /// buffers for one frame.
    pub fn new(config: &VisualizerConfig) -> Result<Self, ConfigError> {
        info!(
            "Visualizer::new fft_size: {}, bins: {}..={}, matrix: {}x{}",
            config.fft_size,
            config.low_bin,
            config.high_bin,
            config.matrix_width,
            config.matrix_height
        );
        let table = ColumnWeightTable::new(config)?;
        let renderer = ColumnRenderer::new(config, &table, &HueSweep::new(config.hue_span));

        Ok(Self {
            config: *config,
            tracker: DynamicRangeTracker::new(config),
            renderer,
            table,
            samples: vec![0; config.fft_size],
            spectrum: vec![0.0; config.spectrum_len()],
            scaled: vec![0.0; config.trimmed_len()],
            frames: 0,
            log_counter: 0,
        })
    }

    /// The config this visualizer was built from.
    pub fn config(&self) -> &VisualizerConfig {
        &self.config
    }

    /// Column layout, fixed until the next restart.
    pub fn table(&self) -> &ColumnWeightTable {
        &self.table
    }

    /// Auto-gain state.
    pub fn tracker(&self) -> &DynamicRangeTracker {
        &self.tracker
    }

    /// Column colors and peak dots.
    pub fn renderer(&self) -> &ColumnRenderer {
        &self.renderer
    }

    /// Rescaled trimmed spectrum of the last rendered frame, in rows. Zero
    /// before the first frame.
    pub fn scaled(&self) -> &[f32] {
        &self.scaled
    }

    /// Frames rendered since this visualizer was built.
    pub fn frames(&self) -> u32 {
        self.frames
    }

    /// Draw one frame from a linear magnitude spectrum of
    /// `config.spectrum_len()` bins. Missing bins read as silence.
    pub fn render_spectrum<D>(&mut self, spectrum: &[f32], target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb888>,
    {
        let mut input = spectrum.iter();
        for bin in self.spectrum.iter_mut() {
            *bin = input.next().copied().unwrap_or(0.0);
        }
        self.render(target)
    }

    /// Capture, transform, draw and flush one frame.
    ///
    /// A failed capture abandons the frame before anything is drawn.
    pub fn frame<A, T, D>(
        &mut self,
        audio: &mut A,
        transform: &mut T,
        display: &mut D,
    ) -> Result<(), FrameError<D::Error>>
    where
        A: AudioSource,
        T: SpectrumTransform,
        D: DisplaySink,
    {
        audio.record(&mut self.samples)?;
        transform.magnitudes(&self.samples, &mut self.spectrum);
        self.render(display).map_err(FrameError::Display)?;
        display.flush().map_err(FrameError::Display)
    }

    fn render<D>(&mut self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb888>,
    {
        let trimmed = &mut self.spectrum[self.config.low_bin..=self.config.high_bin];
        self.tracker.process(trimmed, &mut self.scaled);
        self.renderer.draw(target, &self.table, &self.scaled)?;

        self.frames = self.frames.wrapping_add(1);
        self.log_counter += 1;
        if self.log_counter >= LOG_INTERVAL {
            info!(
                "{} frames rendered, level {}",
                self.frames,
                self.tracker.level()
            );
            self.log_counter = 0;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CaptureError;
    use core::convert::Infallible;
    use embedded_graphics::{
        geometry::{OriginDimensions, Size},
        Pixel,
    };

    #[derive(Default)]
    struct Sink {
        drawn: usize,
        flushes: usize,
    }

    impl OriginDimensions for Sink {
        fn size(&self) -> Size {
            Size::new(8, 4)
        }
    }

    impl DrawTarget for Sink {
        type Color = Rgb888;
        type Error = Infallible;

        fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            self.drawn += pixels.into_iter().count();
            Ok(())
        }
    }

    impl DisplaySink for Sink {
        fn flush(&mut self) -> Result<(), Self::Error> {
            self.flushes += 1;
            Ok(())
        }
    }

    struct Silence;

    impl AudioSource for Silence {
        fn record(&mut self, buf: &mut [u16]) -> Result<(), CaptureError> {
            buf.fill(32768);
            Ok(())
        }
    }

    struct Broken;

    impl AudioSource for Broken {
        fn record(&mut self, _buf: &mut [u16]) -> Result<(), CaptureError> {
            Err(CaptureError::TransientFault)
        }
    }

    fn zeros(_samples: &[u16], out: &mut [f32]) {
        out.fill(0.0);
    }

    #[test]
    fn test_frame_draws_then_flushes_once() {
        let mut viz = Visualizer::new(&VisualizerConfig::default()).unwrap();
        let mut sink = Sink::default();
        viz.frame(&mut Silence, &mut zeros, &mut sink).unwrap();
        assert_eq!(sink.flushes, 1);
        // Four bar rows per column; the resting dot sits below the matrix.
        assert_eq!(sink.drawn, 8 * 4);
        assert_eq!(viz.frames(), 1);
    }

    #[test]
    fn test_failed_capture_draws_nothing() {
        let mut viz = Visualizer::new(&VisualizerConfig::default()).unwrap();
        let mut sink = Sink::default();
        let result = viz.frame(&mut Broken, &mut zeros, &mut sink);
        assert_eq!(
            result,
            Err(FrameError::Capture(CaptureError::TransientFault))
        );
        assert_eq!(sink.drawn, 0);
        assert_eq!(sink.flushes, 0);
        assert_eq!(viz.frames(), 0);
    }

    #[test]
    fn test_short_spectrum_reads_as_silence() {
        let mut viz = Visualizer::new(&VisualizerConfig::default()).unwrap();
        let mut sink = Sink::default();
        viz.render_spectrum(&[1e6; 10], &mut sink).unwrap();
        assert_eq!(sink.flushes, 0);
        // Bins 35..=55 were all missing, so the tracker saw silence.
        assert_eq!(viz.tracker().level(), 35.0 * 0.5 + 4.0 * 0.5);
    }

    #[test]
    fn test_rejects_bad_config() {
        let config = VisualizerConfig::new().with_bins(35, 36);
        assert!(matches!(
            Visualizer::new(&config),
            Err(ConfigError::EmptyColumn { .. })
        ));
    }
}
