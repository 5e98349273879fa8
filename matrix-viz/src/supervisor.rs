use core::convert::Infallible;

use crate::audio::{AudioSource, SpectrumTransform};
use crate::config::VisualizerConfig;
use crate::display::DisplaySink;
use crate::error::{ConfigError, FrameError};
use crate::visualizer::Visualizer;

/// What happened during one `Supervisor::step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "logging", derive(defmt::Format))]
pub enum StepOutcome {
    Rendered,
    /// The frame was abandoned and the visualizer rebuilt from scratch.
    Restarted,
}

/// Outer frame loop. Any frame fault throws away all visualizer state and
/// starts over from the startup config.
pub struct Supervisor {
    config: VisualizerConfig,
    visualizer: Visualizer,
    frames: u64,
    restarts: u32,
}

impl Supervisor {
    /// Build the first visualizer. A bad config is reported here and never
    /// again.
    pub fn new(config: VisualizerConfig) -> Result<Self, ConfigError> {
        let visualizer = Visualizer::new(&config).inspect_err(|_e| {
            error!("visualizer config rejected: {}", _e);
        })?;
        Ok(Self {
            config,
            visualizer,
            frames: 0,
            restarts: 0,
        })
    }

    /// The visualizer currently running. Replaced on every restart.
    pub fn visualizer(&self) -> &Visualizer {
        &self.visualizer
    }

    /// Frames rendered across all restarts.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Restarts since startup.
    pub fn restarts(&self) -> u32 {
        self.restarts
    }

    /// Run one frame, restarting on failure.
    pub fn step<A, T, D>(
        &mut self,
        audio: &mut A,
        transform: &mut T,
        display: &mut D,
    ) -> Result<StepOutcome, ConfigError>
    where
        A: AudioSource,
        T: SpectrumTransform,
        D: DisplaySink,
    {
        match self.visualizer.frame(audio, transform, display) {
            Ok(()) => {
                self.frames += 1;
                Ok(StepOutcome::Rendered)
            }
            Err(e) => {
                match e {
                    FrameError::Capture(_cause) => warn!("capture failed: {}", _cause),
                    FrameError::Display(_) => warn!("display failed"),
                }
                self.restart()?;
                Ok(StepOutcome::Restarted)
            }
        }
    }

    /// Cold restart: rebuild the weight table, tracker and dots.
    pub fn restart(&mut self) -> Result<(), ConfigError> {
        warn!("Restarting");
        self.visualizer = Visualizer::new(&self.config)?;
        self.restarts = self.restarts.wrapping_add(1);
        Ok(())
    }

    /// Loop forever. Only a config that stops validating can end it.
    pub fn run<A, T, D>(
        &mut self,
        audio: &mut A,
        transform: &mut T,
        display: &mut D,
    ) -> Result<Infallible, ConfigError>
    where
        A: AudioSource,
        T: SpectrumTransform,
        D: DisplaySink,
    {
        loop {
            self.step(audio, transform, display)?;
        }
    }
}
