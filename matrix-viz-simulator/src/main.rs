use std::{convert::Infallible, f32::consts::PI, thread, time::Duration};

use embedded_graphics::{pixelcolor::Rgb888, prelude::*, Pixel};
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};
use log::{error, info};
use matrix_viz::{
    AudioSource, CaptureError, ConfigError, DisplaySink, SpectrumTransform, Supervisor,
    VisualizerConfig,
};
use micro_dsp::{Spectrogram, Window as FftWindow};
use rand::{rngs::ThreadRng, Rng};

const PIXEL_SCALE: u32 = 48;
const PIXEL_SPACING: u32 = 6;
// One capture in this many fails, to exercise the restart path.
const FAULT_ODDS: u32 = 2000;
const TONE_AMPLITUDE: f32 = 6000.0;
const NOISE_AMPLITUDE: f32 = 400.0;

/// Fake microphone: a tone sweeping up and down the graphed bins, plus noise.
struct SyntheticMic {
    rng: ThreadRng,
    sample_rate_hz: u32,
    low_hz: f32,
    high_hz: f32,
    sweep: f32,
    phase: f32,
}

impl SyntheticMic {
    fn new(config: &VisualizerConfig) -> Self {
        let bin_hz = config.sample_rate_hz as f32 / config.fft_size as f32;
        Self {
            rng: rand::rng(),
            sample_rate_hz: config.sample_rate_hz,
            low_hz: config.low_bin as f32 * bin_hz,
            high_hz: config.high_bin as f32 * bin_hz,
            sweep: 0.0,
            phase: 0.0,
        }
    }
}

impl AudioSource for SyntheticMic {
    fn record(&mut self, buf: &mut [u16]) -> Result<(), CaptureError> {
        // Block for as long as the real capture would.
        let frame_secs = buf.len() as f32 / self.sample_rate_hz as f32;
        thread::sleep(Duration::from_secs_f32(frame_secs));

        if self.rng.random_ratio(1, FAULT_ODDS) {
            return Err(CaptureError::TransientFault);
        }

        self.sweep = (self.sweep + 0.01) % 2.0;
        let t = if self.sweep < 1.0 { self.sweep } else { 2.0 - self.sweep };
        let freq = self.low_hz + (self.high_hz - self.low_hz) * t;
        // Pulse the volume so the auto-gain has something to follow.
        let volume = 0.5 + 0.5 * (self.sweep * 3.0 * PI).sin();
        let step = 2.0 * PI * freq / self.sample_rate_hz as f32;

        for sample in buf.iter_mut() {
            let noise = self.rng.random_range(-NOISE_AMPLITUDE..NOISE_AMPLITUDE);
            let value = 32768.0 + TONE_AMPLITUDE * volume * self.phase.sin() + noise;
            *sample = value.clamp(0.0, u16::MAX as f32) as u16;
            self.phase = (self.phase + step) % (2.0 * PI);
        }
        Ok(())
    }
}

/// `micro-dsp` spectrogram as the visualizer's transform.
struct DspTransform(Spectrogram);

impl SpectrumTransform for DspTransform {
    fn magnitudes(&mut self, samples: &[u16], out: &mut [f32]) {
        if let Err(e) = self.0.process(samples, out) {
            error!("spectrogram failed: {}", e);
            out.fill(0.0);
        }
    }
}

/// Simulator window standing in for the LED matrix.
struct SimulatorSink {
    display: SimulatorDisplay<Rgb888>,
    window: Window,
    quit: bool,
}

impl SimulatorSink {
    fn new(config: &VisualizerConfig) -> Self {
        let settings = OutputSettingsBuilder::new()
            .scale(PIXEL_SCALE)
            .pixel_spacing(PIXEL_SPACING)
            .build();
        Self {
            display: SimulatorDisplay::new(Size::new(config.matrix_width, config.matrix_height)),
            window: Window::new("Matrix Viz Simulator", &settings),
            quit: false,
        }
    }
}

impl OriginDimensions for SimulatorSink {
    fn size(&self) -> Size {
        self.display.size()
    }
}

impl DrawTarget for SimulatorSink {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.display.draw_iter(pixels)
    }
}

impl DisplaySink for SimulatorSink {
    fn flush(&mut self) -> Result<(), Self::Error> {
        self.window.update(&self.display);
        if self.window.events().any(|e| matches!(e, SimulatorEvent::Quit)) {
            self.quit = true;
        }
        Ok(())
    }
}

fn main() -> Result<(), ConfigError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = VisualizerConfig::default();
    let mut supervisor = Supervisor::new(config)?;
    let mut mic = SyntheticMic::new(&config);
    let mut transform = DspTransform(Spectrogram::new(FftWindow::Rectangular));
    let mut sink = SimulatorSink::new(&config);

    info!(
        "simulating {}x{} matrix, {} Hz to {} Hz",
        config.matrix_width,
        config.matrix_height,
        mic.low_hz,
        mic.high_hz
    );
    while !sink.quit {
        supervisor.step(&mut mic, &mut transform, &mut sink)?;
    }
    info!(
        "quit after {} frames and {} restarts",
        supervisor.frames(),
        supervisor.restarts()
    );
    Ok(())
}
