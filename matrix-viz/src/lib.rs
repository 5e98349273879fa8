//! Audio-reactive spectrum graph for small LED matrices.
//!
//! A [`Visualizer`] turns each microphone frame into one column per display
//! column: the linear FFT spectrum is folded into log-spaced columns by a
//! [`ColumnWeightTable`], auto-scaled by a [`DynamicRangeTracker`] and drawn
//! as bars with falling peak dots by a [`ColumnRenderer`]. The
//! [`Supervisor`] runs the frame loop and restarts from scratch on faults.
#![no_std]

extern crate alloc;

#[cfg(feature = "logging")]
use defmt_rtt as _;

// Must come first so the logging macros are visible to every module below.
mod fmt;

pub mod audio;
pub mod color_wheel;
pub mod column_renderer;
pub mod column_weight_table;
pub mod config;
pub mod display;
pub mod dynamic_range;
pub mod error;
pub mod framebuffer;
pub mod peak_dot;
pub mod supervisor;
pub mod visualizer;

pub use audio::{AudioSource, SpectrumTransform};
pub use color_wheel::{color_wheel, scale_brightness, ColumnColor, HueSweep};
pub use column_renderer::ColumnRenderer;
pub use column_weight_table::{ColumnBand, ColumnWeightTable};
pub use config::VisualizerConfig;
pub use display::DisplaySink;
pub use dynamic_range::{DynamicRangeTracker, SpectrumBounds};
pub use error::{CaptureError, ConfigError, FrameError};
pub use framebuffer::{LedStrip, PixelFramebuffer};
pub use peak_dot::PeakDot;
pub use supervisor::{StepOutcome, Supervisor};
pub use visualizer::Visualizer;
