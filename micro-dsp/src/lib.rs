#![no_std]

//! Magnitude spectrum of one microphone frame.
//!
//! Samples arrive as unsigned 16-bit PDM/I2S counts. They are centred by
//! removing the frame mean but otherwise kept at raw count scale, so the
//! log-domain thresholds used by the visualizer stay meaningful.

use microdsp::common::{apply_window_function, WindowFunctionType::Hann};
use microfft::Complex32;
#[allow(unused_imports)]
use micromath::F32Ext;

/// Largest frame `Spectrogram` can transform.
pub const MAX_FFT_SIZE: usize = 1024;

/// FFT sizes with a matching `microfft::real::rfft_*` routine.
pub const SUPPORTED_FFT_SIZES: [usize; 5] = [64, 128, 256, 512, 1024];

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "logging", derive(defmt::Format))]
pub enum DspError {
    #[error("unsupported FFT size {0}")]
    UnsupportedFftSize(usize),
    #[error("expected {expected} values, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

pub fn is_supported_fft_size(size: usize) -> bool {
    SUPPORTED_FFT_SIZES.contains(&size)
}

/// Window applied before the transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Window {
    /// No windowing, same as a plain spectrogram.
    #[default]
    Rectangular,
    Hann,
}

/// Convert unsigned samples to f32 and subtract the frame mean.
pub fn remove_dc(samples: &[u16], out: &mut [f32]) {
    if samples.is_empty() {
        return;
    }
    let mean = samples.iter().map(|&s| s as f32).sum::<f32>() / samples.len() as f32;
    for (o, &s) in out.iter_mut().zip(samples) {
        *o = s as f32 - mean;
    }
}

/// Apply a Hann window to a slice of f32 samples.
pub fn apply_hann_window(samples: &mut [f32]) {
    apply_window_function(Hann, samples);
}

/// Magnitude of each bin of a packed real FFT.
///
/// microfft stores the Nyquist term in the imaginary part of bin 0, so bin 0
/// only uses its real part.
pub fn compute_magnitude(fft_output: &[Complex32], out: &mut [f32]) -> Result<(), DspError> {
    if fft_output.len() != out.len() {
        return Err(DspError::LengthMismatch {
            expected: fft_output.len(),
            actual: out.len(),
        });
    }
    for (i, (m, c)) in out.iter_mut().zip(fft_output).enumerate() {
        *m = if i == 0 {
            c.re.abs()
        } else {
            (c.re * c.re + c.im * c.im).sqrt()
        };
    }
    Ok(())
}

fn fixed<const N: usize>(buf: &mut [f32]) -> Result<&mut [f32; N], DspError> {
    let len = buf.len();
    buf.get_mut(..N)
        .and_then(|b| b.try_into().ok())
        .ok_or(DspError::LengthMismatch {
            expected: N,
            actual: len,
        })
}

/// Run the real FFT matching `buf.len()` in place and return the packed bins.
fn real_fft(buf: &mut [f32]) -> Result<&mut [Complex32], DspError> {
    use microfft::real::*;
    let bins: &mut [Complex32] = match buf.len() {
        64 => rfft_64(fixed::<64>(buf)?),
        128 => rfft_128(fixed::<128>(buf)?),
        256 => rfft_256(fixed::<256>(buf)?),
        512 => rfft_512(fixed::<512>(buf)?),
        1024 => rfft_1024(fixed::<1024>(buf)?),
        other => return Err(DspError::UnsupportedFftSize(other)),
    };
    Ok(bins)
}

/// Sample frame to linear magnitude spectrum.
pub struct Spectrogram {
    window: Window,
    scratch: [f32; MAX_FFT_SIZE],
}

impl Default for Spectrogram {
    fn default() -> Self {
        Self::new(Window::default())
    }
}

impl Spectrogram {
    pub const fn new(window: Window) -> Self {
        Self {
            window,
            scratch: [0.0; MAX_FFT_SIZE],
        }
    }

    pub fn window(&self) -> Window {
        self.window
    }

    /// Transform `samples` (length N) into `out` (length N/2).
    pub fn process(&mut self, samples: &[u16], out: &mut [f32]) -> Result<(), DspError> {
        let n = samples.len();
        if !is_supported_fft_size(n) {
            return Err(DspError::UnsupportedFftSize(n));
        }
        if out.len() != n / 2 {
            return Err(DspError::LengthMismatch {
                expected: n / 2,
                actual: out.len(),
            });
        }

        let buf = &mut self.scratch[..n];
        remove_dc(samples, buf);
        if self.window == Window::Hann {
            apply_hann_window(buf);
        }

        let bins = real_fft(buf)?;
        compute_magnitude(bins, out)
    }
}

/// Process a frame of samples with a rectangular window.
pub fn process_frame(samples: &[u16], out: &mut [f32]) -> Result<(), DspError> {
    Spectrogram::default().process(samples, out)
}
